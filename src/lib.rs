//! # user-api-client
//!
//! 用户管理服务客户端：带认证的 HTTP 访问与本地 TTL 缓存。
//!
//! Client library for the user-management REST service: authenticated CRUD and
//! search over `/users`, plus a per-client cache of user records.
//!
//! ## Overview
//!
//! Every operation builds a request, sends it through one shared execution path
//! that attaches the bearer credential and timeout, classifies failures, and
//! decodes the JSON body. Reads of single users can be served from a local cache
//! that expires entries 300 seconds after they were fetched; updates and deletes
//! drop the affected entry.
//!
//! ## Key Features
//!
//! - **Unified Client**: [`UserApiClient`] (async) and [`blocking::UserApiClient`]
//! - **Caching**: TTL record cache via the [`cache`] module
//! - **Typed Errors**: validation, transport, classified API and decode failures in one [`Error`]
//! - **No Hidden Retries**: every failure reaches the caller
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use user_api_client::{ListUsersQuery, UserApiClient, UserUpdate};
//!
//! #[tokio::main]
//! async fn main() -> user_api_client::Result<()> {
//!     let client = UserApiClient::new("https://users.example.com/api", "secret")?;
//!
//!     let user = client.get_user("42", true).await?;
//!     println!("{}", user["email"]);
//!
//!     client
//!         .update_user("42", &UserUpdate::new().set("name", "Grace"))
//!         .await?;
//!
//!     let page = client.list_users(&ListUsersQuery::new().role("admin")).await?;
//!     println!("{} admins over {} pages", page.total, page.total_pages);
//!     Ok(())
//! }
//! ```
//!
//! ## Module Organization
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`client`] | Async client, builder and request/result types |
//! | [`blocking`] | Synchronous facade |
//! | [`cache`] | TTL record cache and clocks |
//! | [`config`] | Endpoint, credential, timeout and response field names |
//! | [`transport`] | Pooled, authenticated HTTP transport |
//! | [`error`] | Error taxonomy |

pub mod blocking;
pub mod cache;
pub mod client;
pub mod config;
pub mod transport;

pub use client::{
    ListUsersQuery, NewUser, UserApiClient, UserApiClientBuilder, UserPage, UserUpdate,
    DEFAULT_SEARCH_LIMIT,
};
pub use config::{ClientConfig, ResponseSchema, DEFAULT_ROLE, DEFAULT_TIMEOUT};

/// Result type alias for the library
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for the library
pub mod error;
pub use error::{ApiError, ApiErrorKind, Error, ErrorContext};
