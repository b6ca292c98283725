//! Outbound token resolution.
//!
//! Decides which credential an upstream call carries:
//!
//! - A caller-supplied `Authorization` value always wins and is forwarded
//!   verbatim. Category reads additionally check it against the allow-list.
//! - Without a caller token, category reads use the default token as-is.
//! - Without a caller token, product writes look the source id up in a fixed
//!   table of token-list positions and fall back to the default token for
//!   unknown sources. Both are sent as `Bearer <token>`.

use secrecy::SecretString;
use thiserror::Error;

use crate::config::TokenConfig;
use crate::upstream::AuthToken;

/// Source ids with a dedicated entry in the source token list.
const SOURCE_TOKEN_POSITIONS: &[(&str, usize)] = &[("10124", 0), ("10015", 0), ("10205", 1)];

/// Scheme prefix stripped before the allow-list check.
const BEARER_PREFIX: &str = "Bearer ";

/// Errors that can occur when resolving a token.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TokenError {
    /// Caller token is not on the category allow-list.
    #[error("invalid token")]
    InvalidToken,

    /// The source token list has no entry at the position this source needs.
    #[error("no token configured at position {position} for source {source_id}")]
    MissingSourceToken { source_id: String, position: usize },
}

/// What the resolved token will be used for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenPurpose {
    CategoryRead,
    ProductWrite,
}

/// Resolves outbound credentials from parsed token configuration.
///
/// Pure: the result depends only on configuration and arguments.
#[derive(Debug, Clone)]
pub struct TokenResolver {
    tokens: TokenConfig,
}

impl TokenResolver {
    #[must_use]
    pub const fn new(tokens: TokenConfig) -> Self {
        Self { tokens }
    }

    /// Resolve the credential for one upstream call.
    ///
    /// Blank caller tokens count as absent.
    ///
    /// # Errors
    ///
    /// Returns `TokenError::InvalidToken` if a category-read caller token is
    /// not allowed, and `TokenError::MissingSourceToken` if a product write
    /// needs a source token the configuration does not have.
    pub fn resolve(
        &self,
        caller: Option<&str>,
        source_id: Option<&str>,
        purpose: TokenPurpose,
    ) -> Result<AuthToken, TokenError> {
        let caller = caller.map(str::trim).filter(|token| !token.is_empty());

        match (purpose, caller) {
            (TokenPurpose::CategoryRead, Some(token)) => {
                let bare = token.strip_prefix(BEARER_PREFIX).unwrap_or(token);
                if self.tokens.allows_category_token(bare) {
                    Ok(AuthToken::verbatim(SecretString::from(token.to_owned())))
                } else {
                    tracing::warn!("Caller token rejected by category allow-list");
                    Err(TokenError::InvalidToken)
                }
            }
            (TokenPurpose::CategoryRead, None) => {
                Ok(AuthToken::verbatim(self.tokens.default_token.clone()))
            }
            (TokenPurpose::ProductWrite, Some(token)) => {
                Ok(AuthToken::verbatim(SecretString::from(token.to_owned())))
            }
            (TokenPurpose::ProductWrite, None) => self.fallback(source_id).map(AuthToken::bearer),
        }
    }

    /// Fallback token for a source id without a caller token.
    fn fallback(&self, source_id: Option<&str>) -> Result<SecretString, TokenError> {
        let Some(source_id) = source_id.map(str::trim) else {
            return Ok(self.tokens.default_token.clone());
        };

        let position = SOURCE_TOKEN_POSITIONS
            .iter()
            .find(|(known, _)| *known == source_id)
            .map(|(_, position)| *position);

        match position {
            None => Ok(self.tokens.default_token.clone()),
            Some(position) => self
                .tokens
                .source_tokens
                .get(position)
                .cloned()
                .ok_or_else(|| TokenError::MissingSourceToken {
                    source_id: source_id.to_owned(),
                    position,
                }),
        }
    }
}
