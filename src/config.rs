//! Client configuration: endpoint, credential, timeout and the server-defined
//! response field names the client relies on.

use crate::{Error, ErrorContext, Result};
use std::env;
use std::time::Duration;

/// Default per-request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Role sent by `create_user` when the caller does not pick one.
pub const DEFAULT_ROLE: &str = "user";

/// Immutable connection settings for one client instance.
#[derive(Clone)]
pub struct ClientConfig {
    base_url: String,
    api_key: String,
    timeout: Duration,
}

impl ClientConfig {
    /// Validate and normalize the endpoint and credential.
    ///
    /// The base URL must be an absolute http(s) URL; trailing slashes are removed so
    /// that request paths (which always start with `/`) can be appended directly.
    pub fn new(base_url: &str, api_key: impl Into<String>) -> Result<Self> {
        let base_url = normalize_base_url(base_url)?;
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(Error::configuration_with_context(
                "API key must not be empty",
                ErrorContext::new().with_field_path("api_key"),
            ));
        }
        Ok(Self {
            base_url,
            api_key,
            timeout: DEFAULT_TIMEOUT,
        })
    }

    /// Load settings from the environment.
    ///
    /// - `USER_API_BASE_URL` (required)
    /// - `USER_API_KEY` (required)
    /// - `USER_API_TIMEOUT_SECS` (default 30)
    pub fn from_env() -> Result<Self> {
        let base_url = required_env("USER_API_BASE_URL")?;
        let api_key = required_env("USER_API_KEY")?;
        let mut config = Self::new(&base_url, api_key)?;
        if let Some(secs) = env_parse::<u64>("USER_API_TIMEOUT_SECS") {
            config = config.with_timeout(Duration::from_secs(secs));
        }
        Ok(config)
    }

    /// Zero timeouts are bumped to one second.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout.max(Duration::from_secs(1));
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Absolute URL for a path relative to the service root.
    pub fn url_for(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

// The key never reaches logs.
impl std::fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientConfig")
            .field("base_url", &self.base_url)
            .field("api_key", &"<redacted>")
            .field("timeout", &self.timeout)
            .finish()
    }
}

/// Value of `name` parsed as `T`; unset or unparsable values read as `None`.
pub(crate) fn env_parse<T: std::str::FromStr>(name: &str) -> Option<T> {
    env::var(name).ok().and_then(|s| s.trim().parse().ok())
}

fn required_env(name: &str) -> Result<String> {
    env::var(name).map_err(|_| {
        Error::configuration_with_context(
            format!("environment variable {} is not set", name),
            ErrorContext::new().with_field_path(name),
        )
    })
}

fn normalize_base_url(raw: &str) -> Result<String> {
    let trimmed = raw.trim().trim_end_matches('/');
    let parsed = url::Url::parse(trimmed).map_err(|e| {
        Error::configuration_with_context(
            format!("invalid base URL: {}", e),
            ErrorContext::new()
                .with_field_path("base_url")
                .with_details(raw.to_string()),
        )
    })?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(Error::configuration_with_context(
            format!("unsupported URL scheme '{}'", parsed.scheme()),
            ErrorContext::new()
                .with_field_path("base_url")
                .with_details(raw.to_string()),
        ));
    }
    Ok(trimmed.to_string())
}

/// Field names of the service's response bodies.
///
/// These are inferred from how the service has been used, not from a published
/// schema, so each one can be overridden through the client builder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResponseSchema {
    /// Array of records in a list response.
    pub items_field: String,
    /// Total number of records across all pages in a list response.
    pub total_field: String,
    /// Array of records in a search response.
    pub results_field: String,
    /// Flag in a delete response body.
    pub deleted_field: String,
    /// Array of permissions on a user record.
    pub permissions_field: String,
}

impl Default for ResponseSchema {
    fn default() -> Self {
        Self {
            items_field: "data".to_string(),
            total_field: "total".to_string(),
            results_field: "results".to_string(),
            deleted_field: "deleted".to_string(),
            permissions_field: "permissions".to_string(),
        }
    }
}

impl ResponseSchema {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_items_field(mut self, field: impl Into<String>) -> Self {
        self.items_field = field.into();
        self
    }

    pub fn with_total_field(mut self, field: impl Into<String>) -> Self {
        self.total_field = field.into();
        self
    }

    pub fn with_results_field(mut self, field: impl Into<String>) -> Self {
        self.results_field = field.into();
        self
    }

    pub fn with_deleted_field(mut self, field: impl Into<String>) -> Self {
        self.deleted_field = field.into();
        self
    }

    pub fn with_permissions_field(mut self, field: impl Into<String>) -> Self {
        self.permissions_field = field.into();
        self
    }
}
