use crate::config::{env_parse, ClientConfig};
use crate::Result;
use reqwest::header::ACCEPT;
use reqwest::Method;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, error};
use uuid::Uuid;

/// Header carrying the client-generated correlation id.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Owns the connection pool for one client instance.
///
/// Every request gets the bearer credential, the configured timeout and a fresh
/// correlation id. Failures are logged and returned as-is; nothing is retried.
pub struct HttpTransport {
    client: reqwest::Client,
    config: ClientConfig,
}

impl HttpTransport {
    pub fn new(config: ClientConfig) -> Result<Self> {
        // Pool sizing is env-overridable; the timeout comes from the config.
        let client = reqwest::Client::builder()
            .timeout(config.timeout())
            .pool_max_idle_per_host(
                env_parse::<usize>("USER_API_HTTP_POOL_MAX_IDLE_PER_HOST").unwrap_or(32),
            )
            .pool_idle_timeout(Some(Duration::from_secs(
                env_parse::<u64>("USER_API_HTTP_POOL_IDLE_TIMEOUT_SECS").unwrap_or(90),
            )))
            .user_agent(concat!("user-api-client/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| crate::Error::Transport(TransportError::Other(e.to_string())))?;

        Ok(Self { client, config })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Send one authenticated request and hand back the raw response.
    ///
    /// Only connection-level failures (refused, reset, timed out) are errors here;
    /// status classification is left to the caller.
    pub async fn send(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, String)],
        body: Option<&Value>,
    ) -> Result<reqwest::Response> {
        let url = self.config.url_for(path);
        let request_id = Uuid::new_v4().to_string();

        let mut request = self
            .client
            .request(method.clone(), &url)
            .bearer_auth(self.config.api_key())
            .header(ACCEPT, "application/json")
            .header(REQUEST_ID_HEADER, request_id.as_str());

        if !query.is_empty() {
            request = request.query(query);
        }
        if let Some(body) = body {
            request = request.json(body);
        }

        debug!(
            method = %method,
            url = url.as_str(),
            request_id = request_id.as_str(),
            "sending request"
        );

        request.send().await.map_err(|e| {
            error!(
                method = %method,
                url = url.as_str(),
                request_id = request_id.as_str(),
                timeout = e.is_timeout(),
                error = %e,
                "request failed"
            );
            crate::Error::Transport(TransportError::Http(e))
        })
    }
}

#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Transport error: {0}")]
    Other(String),
}
