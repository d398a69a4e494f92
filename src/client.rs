//! User service client.
//!
//! The public surface is [`UserApiClient`] and its builder. Request execution,
//! status classification and argument checks live in submodules under `src/client/`.

pub mod builder;
pub mod core;
mod error_classification;
mod execution;
pub mod types;
mod users;
mod validation;

pub use builder::UserApiClientBuilder;
pub use self::core::UserApiClient;
pub use types::{ListUsersQuery, NewUser, UserPage, UserUpdate};
pub use users::DEFAULT_SEARCH_LIMIT;
