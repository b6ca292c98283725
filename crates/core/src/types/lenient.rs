//! Lenient deserializers for upstream identifiers.
//!
//! The upstream API is not consistent about identifier encoding: the same
//! field arrives as `"10124"` in one payload and `10124` in another. These
//! helpers accept either and normalize to `String`.

use serde::{Deserialize, Deserializer};

#[derive(Deserialize)]
#[serde(untagged)]
enum RawId {
    Text(String),
    Signed(i64),
    Unsigned(u64),
}

impl From<RawId> for String {
    fn from(raw: RawId) -> Self {
        match raw {
            RawId::Text(s) => s,
            RawId::Signed(n) => n.to_string(),
            RawId::Unsigned(n) => n.to_string(),
        }
    }
}

/// Deserialize a required identifier given as a JSON string or integer.
///
/// Use with `#[serde(deserialize_with = "lenient::string_or_number")]`.
///
/// # Errors
///
/// Returns the deserializer error if the value is neither a string nor an integer.
pub fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    RawId::deserialize(deserializer).map(String::from)
}

/// Deserialize an optional identifier given as a JSON string, integer, or null.
///
/// Combine with `#[serde(default)]` so a missing key also yields `None`.
///
/// # Errors
///
/// Returns the deserializer error if the value is present but malformed.
pub fn option_string_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<RawId>::deserialize(deserializer)?.map(String::from))
}
