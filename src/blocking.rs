//! 同步客户端：在调用线程上阻塞直到请求完成或超时。
//!
//! Blocking facade over [`crate::UserApiClient`].
//!
//! Each call blocks the calling thread until the exchange completes or the
//! per-request timeout fires. The facade drives its own current-thread runtime,
//! so it must not be used from inside an async context.
//!
//! ```rust,no_run
//! use user_api_client::blocking::UserApiClient;
//!
//! fn main() -> user_api_client::Result<()> {
//!     let client = UserApiClient::new("https://users.example.com/api", "secret")?;
//!     let user = client.get_user("42", true)?;
//!     println!("{}", user["name"]);
//!     Ok(())
//! }
//! ```

use crate::cache::CacheStats;
use crate::client::{ListUsersQuery, UserPage, UserUpdate};
use crate::config::ClientConfig;
use crate::{Error, ErrorContext, Result};
use serde_json::Value;
use tokio::runtime::{Builder, Runtime};

pub struct UserApiClient {
    inner: crate::UserApiClient,
    runtime: Runtime,
}

impl UserApiClient {
    pub fn new(base_url: &str, api_key: impl Into<String>) -> Result<Self> {
        Self::from_async(crate::UserApiClient::new(base_url, api_key)?)
    }

    pub fn from_env() -> Result<Self> {
        Self::from_async(crate::UserApiClient::from_env()?)
    }

    /// Wrap a client built with [`crate::UserApiClientBuilder`].
    pub fn from_async(inner: crate::UserApiClient) -> Result<Self> {
        let runtime = Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|e| {
                Error::configuration_with_context(
                    format!("failed to start blocking runtime: {}", e),
                    ErrorContext::new().with_source("blocking_client"),
                )
            })?;
        Ok(Self { inner, runtime })
    }

    pub fn config(&self) -> &ClientConfig {
        self.inner.config()
    }

    pub fn get_user(&self, id: &str, use_cache: bool) -> Result<Value> {
        self.runtime.block_on(self.inner.get_user(id, use_cache))
    }

    pub fn create_user(&self, email: &str, name: &str, role: Option<&str>) -> Result<Value> {
        self.runtime
            .block_on(self.inner.create_user(email, name, role))
    }

    pub fn update_user(&self, id: &str, updates: &UserUpdate) -> Result<Value> {
        self.runtime.block_on(self.inner.update_user(id, updates))
    }

    pub fn delete_user(&self, id: &str) -> Result<bool> {
        self.runtime.block_on(self.inner.delete_user(id))
    }

    pub fn list_users(&self, query: &ListUsersQuery) -> Result<UserPage> {
        self.runtime.block_on(self.inner.list_users(query))
    }

    pub fn search_users(&self, query: &str, limit: Option<u32>) -> Result<Vec<Value>> {
        self.runtime.block_on(self.inner.search_users(query, limit))
    }

    pub fn get_user_permissions(&self, id: &str) -> Result<Vec<Value>> {
        self.runtime.block_on(self.inner.get_user_permissions(id))
    }

    pub fn clear_cache(&self) {
        self.inner.clear_cache();
    }

    pub fn cache_stats(&self) -> CacheStats {
        self.inner.cache_stats()
    }

    pub fn cached_len(&self) -> usize {
        self.inner.cached_len()
    }
}
