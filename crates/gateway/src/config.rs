//! Gateway configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `UPSTREAM_ACCOUNT_INFO_URL` - Account info endpoint (shop list)
//! - `UPSTREAM_CATEGORIES_URL` - Category tree endpoint
//! - `UPSTREAM_PRODUCT_CREATE_URL` - Product creation endpoint
//! - `UPSTREAM_PRODUCT_UPDATE_URL` - Product update URL template containing `{id}`
//! - `UPSTREAM_PRODUCT_QUANTITY_URL` - Quantity update URL template containing `{id}`
//! - `GATEWAY_DEFAULT_TOKEN` - Fallback token when no caller or source token applies
//!
//! ## Optional
//! - `GATEWAY_SOURCE_TOKENS` - Comma-separated per-source override tokens
//! - `GATEWAY_CATEGORY_TOKENS` - Comma-separated category-read allow-list
//!   (default when unset: `GATEWAY_SOURCE_TOKENS`; set but empty rejects every
//!   caller token on category reads)
//! - `GATEWAY_DATABASE_URL` - `PostgreSQL` connection string (fallback: `DATABASE_URL`);
//!   the in-memory store is used when neither is set
//! - `GATEWAY_HOST` - Bind address (default: 127.0.0.1)
//! - `GATEWAY_PORT` - Listen port (default: 8000)
//! - `GATEWAY_LOG_JSON` - Emit JSON logs when set
//! - `UPSTREAM_TIMEOUT_SECS` - Upstream request timeout (default: 30)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name

use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;
use url::Url;

/// Placeholder substituted with the product id in URL templates.
pub const ID_PLACEHOLDER: &str = "{id}";

const DEFAULT_UPSTREAM_TIMEOUT_SECS: u64 = 30;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Gateway application configuration.
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    /// `PostgreSQL` connection URL (contains password); `None` selects the in-memory store
    pub database_url: Option<SecretString>,
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Upstream API endpoints
    pub upstream: UpstreamConfig,
    /// Outbound credential configuration
    pub tokens: TokenConfig,
    /// Emit JSON-formatted logs
    pub log_json: bool,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment name
    pub sentry_environment: Option<String>,
}

/// Upstream API endpoint configuration.
#[derive(Debug, Clone)]
pub struct UpstreamConfig {
    pub account_info_url: Url,
    pub categories_url: Url,
    pub product_create_url: Url,
    pub product_update_url: UrlTemplate,
    pub product_quantity_url: UrlTemplate,
    /// Per-request timeout applied by the HTTP client
    pub timeout: Duration,
}

/// Outbound token configuration, parsed once at startup.
///
/// Implements `Debug` manually to redact secret fields.
#[derive(Clone)]
pub struct TokenConfig {
    /// Token used when neither the caller nor a source override supplies one
    pub default_token: SecretString,
    /// Per-source override tokens, by position
    pub source_tokens: Vec<SecretString>,
    /// Tokens a caller may present for category reads (without `Bearer `)
    pub category_tokens: Vec<SecretString>,
}

impl std::fmt::Debug for TokenConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenConfig")
            .field("default_token", &"[REDACTED]")
            .field("source_tokens", &format!("[{} REDACTED]", self.source_tokens.len()))
            .field(
                "category_tokens",
                &format!("[{} REDACTED]", self.category_tokens.len()),
            )
            .finish()
    }
}

impl TokenConfig {
    /// Parse a comma-separated token list.
    ///
    /// Entries are trimmed and empty entries dropped, so `"a, b,,"` yields two
    /// tokens.
    #[must_use]
    pub fn parse_list(raw: &str) -> Vec<SecretString> {
        raw.split(',')
            .map(str::trim)
            .filter(|token| !token.is_empty())
            .map(|token| SecretString::from(token.to_owned()))
            .collect()
    }
}

/// URL with an `{id}` placeholder, validated at load time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UrlTemplate(String);

/// Errors rendering a [`UrlTemplate`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TemplateError {
    #[error("id {0:?} contains characters not allowed in a path segment")]
    UnsafeId(String),
    #[error("rendered URL is invalid: {0}")]
    InvalidUrl(String),
}

impl UrlTemplate {
    /// Parse a template, checking it contains the placeholder and renders to a valid URL.
    ///
    /// # Errors
    ///
    /// Returns a description of the problem if the template is unusable.
    pub fn parse(raw: &str) -> Result<Self, String> {
        if !raw.contains(ID_PLACEHOLDER) {
            return Err(format!("must contain {ID_PLACEHOLDER}"));
        }
        let template = Self(raw.to_owned());
        template.render("0").map_err(|e| e.to_string())?;
        Ok(template)
    }

    /// Substitute the product id into the template.
    ///
    /// Only RFC 3986 unreserved characters are accepted in `id`, so the
    /// substitution never changes the URL structure.
    ///
    /// # Errors
    ///
    /// Returns `TemplateError::UnsafeId` for empty ids or ids with reserved
    /// characters, `TemplateError::InvalidUrl` if the result does not parse.
    pub fn render(&self, id: &str) -> Result<Url, TemplateError> {
        let safe = !id.is_empty()
            && id
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.' | '~'));
        if !safe {
            return Err(TemplateError::UnsafeId(id.to_owned()));
        }

        Url::parse(&self.0.replace(ID_PLACEHOLDER, id))
            .map_err(|e| TemplateError::InvalidUrl(e.to_string()))
    }

    /// The raw template string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl GatewayConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let env = Env(&lookup);

        let database_url = env
            .optional("GATEWAY_DATABASE_URL")
            .or_else(|| env.optional("DATABASE_URL"))
            .map(SecretString::from);
        let host = env
            .or_default("GATEWAY_HOST", "127.0.0.1")
            .parse::<IpAddr>()
            .map_err(|e| ConfigError::InvalidEnvVar("GATEWAY_HOST".to_string(), e.to_string()))?;
        let port = env
            .or_default("GATEWAY_PORT", "8000")
            .parse::<u16>()
            .map_err(|e| ConfigError::InvalidEnvVar("GATEWAY_PORT".to_string(), e.to_string()))?;

        let upstream = UpstreamConfig::from_env(&env)?;
        let tokens = TokenConfig::from_env(&env)?;

        Ok(Self {
            database_url,
            host,
            port,
            upstream,
            tokens,
            log_json: env.optional("GATEWAY_LOG_JSON").is_some(),
            sentry_dsn: env.optional("SENTRY_DSN"),
            sentry_environment: env.optional("SENTRY_ENVIRONMENT"),
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

impl UpstreamConfig {
    fn from_env(env: &Env<'_>) -> Result<Self, ConfigError> {
        let timeout_secs = env
            .or_default(
                "UPSTREAM_TIMEOUT_SECS",
                &DEFAULT_UPSTREAM_TIMEOUT_SECS.to_string(),
            )
            .parse::<u64>()
            .map_err(|e| {
                ConfigError::InvalidEnvVar("UPSTREAM_TIMEOUT_SECS".to_string(), e.to_string())
            })?;

        Ok(Self {
            account_info_url: env.url("UPSTREAM_ACCOUNT_INFO_URL")?,
            categories_url: env.url("UPSTREAM_CATEGORIES_URL")?,
            product_create_url: env.url("UPSTREAM_PRODUCT_CREATE_URL")?,
            product_update_url: env.template("UPSTREAM_PRODUCT_UPDATE_URL")?,
            product_quantity_url: env.template("UPSTREAM_PRODUCT_QUANTITY_URL")?,
            timeout: Duration::from_secs(timeout_secs),
        })
    }
}

impl TokenConfig {
    fn from_env(env: &Env<'_>) -> Result<Self, ConfigError> {
        let default_token = env.required("GATEWAY_DEFAULT_TOKEN")?;
        if default_token.trim().is_empty() {
            return Err(ConfigError::InvalidEnvVar(
                "GATEWAY_DEFAULT_TOKEN".to_string(),
                "must not be empty".to_string(),
            ));
        }

        let source_raw = env.optional("GATEWAY_SOURCE_TOKENS").unwrap_or_default();
        let category_raw = env
            .raw("GATEWAY_CATEGORY_TOKENS")
            .unwrap_or_else(|| source_raw.clone());

        Ok(Self {
            default_token: SecretString::from(default_token.trim().to_owned()),
            source_tokens: Self::parse_list(&source_raw),
            category_tokens: Self::parse_list(&category_raw),
        })
    }

    /// Whether `token` is on the category-read allow-list.
    #[must_use]
    pub fn allows_category_token(&self, token: &str) -> bool {
        self.category_tokens
            .iter()
            .any(|allowed| allowed.expose_secret() == token)
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Variable lookup wrapper with the typed getters used above.
struct Env<'a>(&'a dyn Fn(&str) -> Option<String>);

impl Env<'_> {
    /// Get a variable as set, including empty values.
    fn raw(&self, key: &str) -> Option<String> {
        (self.0)(key)
    }

    /// Get an optional variable, treating empty values as unset.
    fn optional(&self, key: &str) -> Option<String> {
        self.raw(key).filter(|value| !value.is_empty())
    }

    /// Get a required variable.
    fn required(&self, key: &str) -> Result<String, ConfigError> {
        self.optional(key)
            .ok_or_else(|| ConfigError::MissingEnvVar(key.to_string()))
    }

    /// Get a variable with a default value.
    fn or_default(&self, key: &str, default: &str) -> String {
        self.optional(key).unwrap_or_else(|| default.to_string())
    }

    /// Get a required absolute URL.
    fn url(&self, key: &str) -> Result<Url, ConfigError> {
        Url::parse(&self.required(key)?)
            .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
    }

    /// Get a required URL template.
    fn template(&self, key: &str) -> Result<UrlTemplate, ConfigError> {
        UrlTemplate::parse(&self.required(key)?)
            .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e))
    }
}
