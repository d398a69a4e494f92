//! 参数校验：所有检查都在发出网络请求之前完成。
//!
//! Argument validation, run before any request leaves the process.

use crate::client::types::UserUpdate;
use crate::{Error, ErrorContext, Result};
use once_cell::sync::Lazy;
use regex::Regex;

// Local part, '@', then a domain of at least two non-empty dot-separated labels.
// A minimal shape check, far from RFC 5322.
static EMAIL_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[^@\s]+@[^@\s.]+(\.[^@\s.]+)+$").expect("email pattern is a valid regex")
});

pub(crate) fn validate_email(email: &str) -> Result<()> {
    if EMAIL_PATTERN.is_match(email) {
        return Ok(());
    }
    Err(Error::validation_with_context(
        format!("invalid email address: {:?}", email),
        ErrorContext::new()
            .with_field_path("email")
            .with_source("create_user"),
    ))
}

/// Ids become one path segment, so they may not be blank, contain URL delimiters
/// or be a dot segment that the URL parser would resolve away.
pub(crate) fn validate_user_id(id: &str, source: &str) -> Result<()> {
    if id.trim().is_empty() {
        return Err(Error::validation_with_context(
            "user id must not be empty",
            ErrorContext::new().with_field_path("id").with_source(source),
        ));
    }
    if id.contains(['/', '?', '#']) {
        return Err(Error::validation_with_context(
            format!("user id contains a reserved character: {:?}", id),
            ErrorContext::new().with_field_path("id").with_source(source),
        ));
    }
    if matches!(id, "." | "..") {
        return Err(Error::validation_with_context(
            format!("user id must not be a dot segment: {:?}", id),
            ErrorContext::new().with_field_path("id").with_source(source),
        ));
    }
    Ok(())
}

/// `/users/<id>` with the id percent-encoded as a single segment.
///
/// Everything outside the unreserved set is escaped, so a literal `%` cannot
/// combine with what follows into `%2e`.
pub(crate) fn user_path(id: &str) -> String {
    let mut out = String::with_capacity("/users/".len() + id.len() * 3);
    out.push_str("/users/");
    for b in id.bytes() {
        match b {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                out.push(b as char);
            }
            _ => out.push_str(&format!("%{b:02X}")),
        }
    }
    out
}

pub(crate) fn validate_update(update: &UserUpdate) -> Result<()> {
    if update.is_empty() {
        return Err(Error::validation_with_context(
            "at least one field must be provided for update",
            ErrorContext::new()
                .with_field_path("updates")
                .with_source("update_user"),
        ));
    }
    Ok(())
}

pub(crate) fn validate_paging(page: u32, per_page: u32) -> Result<()> {
    if page < 1 {
        return Err(Error::validation_with_context(
            "page must be >= 1",
            ErrorContext::new()
                .with_field_path("page")
                .with_details(page.to_string())
                .with_source("list_users"),
        ));
    }
    if per_page < 1 {
        return Err(Error::validation_with_context(
            "per_page must be >= 1",
            ErrorContext::new()
                .with_field_path("per_page")
                .with_details(per_page.to_string())
                .with_source("list_users"),
        ));
    }
    Ok(())
}

/// Returns the trimmed query.
pub(crate) fn validate_search_query(query: &str) -> Result<&str> {
    let trimmed = query.trim();
    if trimmed.is_empty() {
        return Err(Error::validation_with_context(
            "search query must not be empty",
            ErrorContext::new()
                .with_field_path("query")
                .with_source("search_users"),
        ));
    }
    Ok(trimmed)
}
