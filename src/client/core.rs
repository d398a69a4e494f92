use crate::cache::{CacheKey, CacheStats, ResponseCache};
use crate::config::{ClientConfig, ResponseSchema};
use crate::transport::HttpTransport;
use crate::Result;
use reqwest::Method;
use serde_json::Value;
use tracing::debug;

use super::types::array_field;
use super::validation::{user_path, validate_user_id};

/// Client for the user-management service.
///
/// Owns one connection pool, one credential and one record cache; none of them
/// are shared with other instances.
pub struct UserApiClient {
    pub(crate) transport: HttpTransport,
    pub(crate) cache: ResponseCache,
    pub(crate) schema: ResponseSchema,
    pub(crate) default_role: String,
}

impl UserApiClient {
    /// Client with default timeout, schema and role.
    pub fn new(base_url: &str, api_key: impl Into<String>) -> Result<Self> {
        crate::client::builder::UserApiClientBuilder::new()
            .base_url(base_url)
            .api_key(api_key)
            .build()
    }

    /// Client configured from `USER_API_*` environment variables.
    pub fn from_env() -> Result<Self> {
        crate::client::builder::UserApiClientBuilder::new()
            .config(ClientConfig::from_env()?)
            .build()
    }

    pub fn builder() -> crate::client::builder::UserApiClientBuilder {
        crate::client::builder::UserApiClientBuilder::new()
    }

    pub fn config(&self) -> &ClientConfig {
        self.transport.config()
    }

    pub fn response_schema(&self) -> &ResponseSchema {
        &self.schema
    }

    /// Fetch a user record.
    ///
    /// With `use_cache`, a fresh cached record is returned without touching the
    /// network, and a fetched record replaces whatever was cached before.
    /// Without it the cache is neither read nor written.
    pub async fn get_user(&self, id: &str, use_cache: bool) -> Result<Value> {
        validate_user_id(id, "get_user")?;
        let key = CacheKey::user(id);

        if use_cache {
            if let Some(user) = self.cache.get(&key) {
                return Ok(user);
            }
        }

        let resp = self
            .execute(Method::GET, &user_path(id), &[], None)
            .await?;

        if use_cache {
            self.cache.insert(key, resp.body.clone());
        }
        Ok(resp.body)
    }

    /// Permissions of a user; empty when the record has none.
    ///
    /// Goes through the cached read path.
    pub async fn get_user_permissions(&self, id: &str) -> Result<Vec<Value>> {
        let user = self.get_user(id, true).await?;
        Ok(array_field(&user, &self.schema.permissions_field))
    }

    /// Drop every cached record, fresh or not.
    pub fn clear_cache(&self) {
        self.cache.clear();
        debug!("user cache cleared by caller");
    }

    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }

    /// Number of fresh cached records.
    pub fn cached_len(&self) -> usize {
        self.cache.len()
    }

    pub(crate) fn invalidate_user(&self, id: &str) {
        self.cache.invalidate(&CacheKey::user(id));
    }
}
