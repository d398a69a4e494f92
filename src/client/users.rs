//! Mutating and collection operations on `/users`.

use crate::Result;
use reqwest::Method;
use serde_json::Value;
use tracing::info;

use super::core::UserApiClient;
use super::types::{array_field, is_truthy, ListUsersQuery, NewUser, UserPage, UserUpdate};
use super::validation::{
    user_path, validate_email, validate_paging, validate_search_query, validate_update,
    validate_user_id,
};

/// Default result cap for `search_users`.
pub const DEFAULT_SEARCH_LIMIT: u32 = 10;

impl UserApiClient {
    /// Create a user. `role` falls back to the client's default role (`"user"`).
    ///
    /// The email gets a minimal shape check first; a malformed one never reaches the server.
    pub async fn create_user(&self, email: &str, name: &str, role: Option<&str>) -> Result<Value> {
        validate_email(email)?;
        let payload = NewUser::new(email, name, role.unwrap_or(&self.default_role));
        let resp = self
            .execute(Method::POST, "/users", &[], Some(&payload.to_json()))
            .await?;
        info!(role = payload.role.as_str(), "user created");
        Ok(resp.body)
    }

    /// Patch the given fields. The cached record for `id` is dropped on success.
    pub async fn update_user(&self, id: &str, updates: &UserUpdate) -> Result<Value> {
        validate_user_id(id, "update_user")?;
        validate_update(updates)?;
        let resp = self
            .execute(
                Method::PATCH,
                &user_path(id),
                &[],
                Some(&updates.to_json()),
            )
            .await?;
        self.invalidate_user(id);
        Ok(resp.body)
    }

    /// Delete a user and drop its cached record.
    ///
    /// `true` for 204 No Content, or when the body carries a truthy `deleted` flag.
    pub async fn delete_user(&self, id: &str) -> Result<bool> {
        validate_user_id(id, "delete_user")?;
        let resp = self
            .execute(Method::DELETE, &user_path(id), &[], None)
            .await?;
        self.invalidate_user(id);
        Ok(resp.status == 204 || is_truthy(resp.body.get(&self.schema.deleted_field)))
    }

    /// One page of users. Not cached.
    pub async fn list_users(&self, query: &ListUsersQuery) -> Result<UserPage> {
        validate_paging(query.page, query.per_page)?;
        let resp = self
            .execute(Method::GET, "/users", &query.to_query(), None)
            .await?;
        Ok(UserPage::from_response(&resp.body, query, &self.schema))
    }

    /// Search users by free text. Not cached.
    ///
    /// The query is trimmed before sending; an empty one is rejected locally.
    pub async fn search_users(&self, query: &str, limit: Option<u32>) -> Result<Vec<Value>> {
        let query = validate_search_query(query)?;
        let limit = limit.unwrap_or(DEFAULT_SEARCH_LIMIT);
        let params = [("q", query.to_string()), ("limit", limit.to_string())];
        let resp = self
            .execute(Method::GET, "/users/search", &params, None)
            .await?;

        // A bare array body is accepted as the result list.
        Ok(match resp.body {
            Value::Array(items) => items,
            ref body => array_field(body, &self.schema.results_field),
        })
    }
}
