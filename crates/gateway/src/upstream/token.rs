//! Outbound credentials.

use secrecy::{ExposeSecret, SecretString};

/// How a token is rendered into the `Authorization` header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenScheme {
    /// Sent exactly as held (caller-supplied tokens, category default token).
    Verbatim,
    /// Sent as `Bearer <token>`.
    Bearer,
}

/// Credential for one outbound call.
///
/// Implements `Debug` manually so the token never reaches logs.
#[derive(Clone)]
pub struct AuthToken {
    token: SecretString,
    scheme: TokenScheme,
}

impl std::fmt::Debug for AuthToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthToken")
            .field("token", &"[REDACTED]")
            .field("scheme", &self.scheme)
            .finish()
    }
}

impl AuthToken {
    /// A token forwarded as-is.
    #[must_use]
    pub const fn verbatim(token: SecretString) -> Self {
        Self {
            token,
            scheme: TokenScheme::Verbatim,
        }
    }

    /// A token sent with the `Bearer ` scheme prefix.
    #[must_use]
    pub const fn bearer(token: SecretString) -> Self {
        Self {
            token,
            scheme: TokenScheme::Bearer,
        }
    }

    /// The token without any scheme prefix added.
    #[must_use]
    pub fn token(&self) -> &str {
        self.token.expose_secret()
    }

    #[must_use]
    pub const fn scheme(&self) -> TokenScheme {
        self.scheme
    }

    /// Full `Authorization` header value.
    #[must_use]
    pub fn header_value(&self) -> SecretString {
        match self.scheme {
            TokenScheme::Verbatim => self.token.clone(),
            TokenScheme::Bearer => {
                SecretString::from(format!("Bearer {}", self.token.expose_secret()))
            }
        }
    }
}
