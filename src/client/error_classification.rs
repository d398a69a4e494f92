//! Error classification logic

use crate::error::ApiErrorKind;
use reqwest::header::HeaderMap;

/// Map a failing HTTP status onto the client's error kinds.
///
/// Only 401 and 429 get dedicated kinds; everything else (403, 404, 5xx, ...) is a
/// plain status error that still carries the code.
pub(crate) fn classify_status(status: u16) -> ApiErrorKind {
    match status {
        401 => ApiErrorKind::Authentication,
        429 => ApiErrorKind::RateLimited,
        _ => ApiErrorKind::Status,
    }
}

/// Best-effort parsing of `Retry-After`.
///
/// Only the `Retry-After: <seconds>` form is understood; HTTP dates are ignored.
pub(crate) fn retry_after_secs(headers: &HeaderMap) -> Option<u64> {
    let raw = headers.get("retry-after")?.to_str().ok()?.trim();
    raw.parse().ok()
}
