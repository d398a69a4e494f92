use crate::transport::TransportError;
use thiserror::Error;

/// Structured error context for better error handling and debugging.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ErrorContext {
    /// Argument or configuration key that caused the error (e.g., "email", "base_url")
    pub field_path: Option<String>,
    /// Additional context about the error (e.g., the rejected value)
    pub details: Option<String>,
    /// Operation that raised the error (e.g., "create_user")
    pub source: Option<String>,
}

impl ErrorContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_field_path(mut self, path: impl Into<String>) -> Self {
        self.field_path = Some(path.into());
        self
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }
}

/// Classification of a failing HTTP status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ApiErrorKind {
    /// 401: missing, invalid or expired API key
    Authentication,
    /// 429: request rate limit exceeded
    RateLimited,
    /// Any other non-success status
    Status,
}

impl ApiErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Authentication => "authentication",
            Self::RateLimited => "rate_limited",
            Self::Status => "http_error",
        }
    }
}

impl std::fmt::Display for ApiErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A failing response from the user service.
///
/// All three kinds share this type, so matching `Error::Api(_)` catches every
/// classified failure while [`ApiError::kind`] narrows to a specific one.
#[derive(Debug, Clone, Error)]
#[error("{method} {url} failed with HTTP {status} ({kind}): {message}")]
pub struct ApiError {
    pub kind: ApiErrorKind,
    pub status: u16,
    pub message: String,
    pub method: String,
    pub url: String,
    /// Seconds from a `Retry-After` header, when the server sent one.
    pub retry_after: Option<u64>,
}

/// Unified error type for the user API client.
#[derive(Debug, Error)]
pub enum Error {
    #[error("Validation error: {message}{}", format_context(.context))]
    Validation {
        message: String,
        context: ErrorContext,
    },

    #[error("Configuration error: {message}{}", format_context(.context))]
    Configuration {
        message: String,
        context: ErrorContext,
    },

    #[error("Network transport error: {0}")]
    Transport(#[from] TransportError),

    #[error("API error: {0}")]
    Api(#[from] ApiError),

    #[error("Failed to decode JSON response from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },
}

fn format_context(ctx: &ErrorContext) -> String {
    let mut parts = Vec::new();
    if let Some(ref field) = ctx.field_path {
        parts.push(format!("field: {}", field));
    }
    if let Some(ref details) = ctx.details {
        parts.push(format!("details: {}", details));
    }
    if let Some(ref source) = ctx.source {
        parts.push(format!("source: {}", source));
    }
    if parts.is_empty() {
        String::new()
    } else {
        format!(" ({})", parts.join(", "))
    }
}

impl Error {
    pub fn validation_with_context(msg: impl Into<String>, context: ErrorContext) -> Self {
        Error::Validation {
            message: msg.into(),
            context,
        }
    }

    pub fn configuration_with_context(msg: impl Into<String>, context: ErrorContext) -> Self {
        Error::Configuration {
            message: msg.into(),
            context,
        }
    }

    /// Extract error context if available
    pub fn context(&self) -> Option<&ErrorContext> {
        match self {
            Error::Validation { context, .. } | Error::Configuration { context, .. } => {
                Some(context)
            }
            _ => None,
        }
    }

    pub fn api_error(&self) -> Option<&ApiError> {
        match self {
            Error::Api(e) => Some(e),
            _ => None,
        }
    }

    /// HTTP status of a classified API failure.
    pub fn status(&self) -> Option<u16> {
        self.api_error().map(|e| e.status)
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, Error::Validation { .. })
    }

    pub fn is_api_error(&self) -> bool {
        matches!(self, Error::Api(_))
    }

    pub fn is_authentication(&self) -> bool {
        self.api_error()
            .is_some_and(|e| e.kind == ApiErrorKind::Authentication)
    }

    pub fn is_rate_limited(&self) -> bool {
        self.api_error()
            .is_some_and(|e| e.kind == ApiErrorKind::RateLimited)
    }

    pub fn is_transport(&self) -> bool {
        matches!(self, Error::Transport(_))
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, Error::Transport(TransportError::Http(e)) if e.is_timeout())
    }

    pub fn is_decode(&self) -> bool {
        matches!(self, Error::Decode { .. })
    }
}
