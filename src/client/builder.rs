use crate::cache::{Clock, ResponseCache};
use crate::client::core::UserApiClient;
use crate::config::{ClientConfig, ResponseSchema, DEFAULT_ROLE};
use crate::transport::HttpTransport;
use crate::{Error, ErrorContext, Result};
use std::sync::Arc;
use std::time::Duration;

/// Builder for creating clients with custom configuration.
///
/// Either pass a ready [`ClientConfig`] or a base URL plus API key.
pub struct UserApiClientBuilder {
    config: Option<ClientConfig>,
    base_url: Option<String>,
    api_key: Option<String>,
    timeout: Option<Duration>,
    schema: ResponseSchema,
    default_role: String,
    clock: Option<Arc<dyn Clock>>,
}

impl UserApiClientBuilder {
    pub fn new() -> Self {
        Self {
            config: None,
            base_url: None,
            api_key: None,
            timeout: None,
            schema: ResponseSchema::default(),
            default_role: DEFAULT_ROLE.to_string(),
            clock: None,
        }
    }

    /// Use a prepared configuration. Takes precedence over `base_url`/`api_key`.
    pub fn config(mut self, config: ClientConfig) -> Self {
        self.config = Some(config);
        self
    }

    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    pub fn api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    /// Per-request timeout (default 30s).
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Override the assumed response field names.
    pub fn response_schema(mut self, schema: ResponseSchema) -> Self {
        self.schema = schema;
        self
    }

    /// Role used by `create_user` when none is given.
    pub fn default_role(mut self, role: impl Into<String>) -> Self {
        self.default_role = role.into();
        self
    }

    /// Time source for cache expiry. Primarily for tests.
    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = Some(clock);
        self
    }

    /// Build the client.
    pub fn build(self) -> Result<UserApiClient> {
        let mut config = match self.config {
            Some(config) => config,
            None => {
                let base_url = self.base_url.ok_or_else(|| {
                    Error::configuration_with_context(
                        "base URL is required",
                        ErrorContext::new()
                            .with_field_path("base_url")
                            .with_source("client_builder"),
                    )
                })?;
                let api_key = self.api_key.ok_or_else(|| {
                    Error::configuration_with_context(
                        "API key is required",
                        ErrorContext::new()
                            .with_field_path("api_key")
                            .with_source("client_builder"),
                    )
                })?;
                ClientConfig::new(&base_url, api_key)?
            }
        };
        if let Some(timeout) = self.timeout {
            config = config.with_timeout(timeout);
        }

        let transport = HttpTransport::new(config)?;
        let cache = match self.clock {
            Some(clock) => ResponseCache::with_clock(clock),
            None => ResponseCache::new(),
        };

        Ok(UserApiClient {
            transport,
            cache,
            schema: self.schema,
            default_role: self.default_role,
        })
    }
}

impl Default for UserApiClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}
