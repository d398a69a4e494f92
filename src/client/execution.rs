//! 请求执行：附加认证、发送、错误分类、JSON 解码。
//!
//! Request execution logic (single attempt, no retry).

use crate::error::ApiError;
use crate::transport::TransportError;
use crate::{Error, Result};
use reqwest::{Method, StatusCode};
use serde_json::Value;
use tracing::{error, warn};

use super::core::UserApiClient;
use super::error_classification::{classify_status, retry_after_secs};

/// Decoded body of a successful response.
#[derive(Debug)]
pub(crate) struct ApiResponse {
    pub status: u16,
    /// `Value::Null` for 204 No Content.
    pub body: Value,
}

impl UserApiClient {
    /// Perform one request against the service and decode the JSON body.
    ///
    /// 401 and 429 map to their dedicated kinds, any other failing status to a
    /// generic [`ApiError`]. A body that is not JSON is a decode error, kept apart
    /// from transport failures. The caller owns any retry decision.
    pub(crate) async fn execute(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, String)],
        body: Option<&Value>,
    ) -> Result<ApiResponse> {
        let url = self.transport.config().url_for(path);
        let resp = self
            .transport
            .send(method.clone(), path, query, body)
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let code = status.as_u16();
            let kind = classify_status(code);
            let retry_after = retry_after_secs(resp.headers());
            let text = match resp.text().await {
                Ok(text) => text,
                Err(e) => {
                    warn!(
                        method = %method,
                        url = url.as_str(),
                        http_status = code,
                        error = %e,
                        "failed to read error response body"
                    );
                    String::new()
                }
            };
            let message = if text.trim().is_empty() {
                status
                    .canonical_reason()
                    .unwrap_or("request failed")
                    .to_string()
            } else {
                text
            };

            warn!(
                method = %method,
                url = url.as_str(),
                http_status = code,
                error_class = kind.as_str(),
                "user-api request rejected"
            );

            return Err(Error::Api(ApiError {
                kind,
                status: code,
                message,
                method: method.to_string(),
                url,
                retry_after,
            }));
        }

        if status == StatusCode::NO_CONTENT {
            return Ok(ApiResponse {
                status: status.as_u16(),
                body: Value::Null,
            });
        }

        let text = resp.text().await.map_err(|e| {
            error!(
                method = %method,
                url = url.as_str(),
                error = %e,
                "failed to read response body"
            );
            Error::Transport(TransportError::Http(e))
        })?;

        let body = serde_json::from_str(&text).map_err(|e| {
            error!(
                method = %method,
                url = url.as_str(),
                error = %e,
                "failed to decode JSON response"
            );
            Error::Decode {
                url: url.clone(),
                source: e,
            }
        })?;

        Ok(ApiResponse {
            status: status.as_u16(),
            body,
        })
    }
}
