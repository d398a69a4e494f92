//! 用户记录缓存：按实体键保存最近一次成功读取的记录，固定 TTL 过期。
//!
//! # Record Cache Module
//!
//! In-memory cache of user records owned by a single client instance. Nothing is
//! shared between clients and nothing survives the process.
//!
//! ## Key Components
//!
//! | Component | Description |
//! |-----------|-------------|
//! | [`ResponseCache`] | Map from [`CacheKey`] to the last fetched record and its fetch time |
//! | [`CacheKey`] | Entity kind + identifier, rendered as `"user:<id>"` |
//! | [`Clock`] | Time source; [`SystemClock`] in production, [`ManualClock`] in tests |
//! | [`CacheStats`] | Hit/miss/insert/invalidation counters |
//!
//! ## Expiration
//!
//! An entry fetched at `t0` is served only while `now - t0 < ttl`. At `t0 + ttl`
//! and later it is treated as absent and dropped on lookup.
//!
//! ```rust
//! use user_api_client::cache::{CacheKey, ManualClock, ResponseCache};
//! use std::sync::Arc;
//! use std::time::Duration;
//!
//! let clock = Arc::new(ManualClock::new());
//! let cache = ResponseCache::with_clock(clock.clone());
//! let key = CacheKey::user("42");
//!
//! cache.insert(key.clone(), serde_json::json!({"id": 42}));
//! assert!(cache.get(&key).is_some());
//!
//! clock.advance(Duration::from_secs(300));
//! assert!(cache.get(&key).is_none());
//! ```

mod clock;
mod key;
mod store;

pub use clock::{Clock, ManualClock, SystemClock};
pub use key::{CacheKey, EntityKind};
pub use store::{CacheStats, ResponseCache, USER_CACHE_TTL};
