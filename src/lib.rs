//! Memo Cache - a process-local TTL cache for memoizing service reads
//!
//! Entries expire a fixed time after they are set. Expired entries are
//! evicted lazily on read or in bulk by `cleanup`, which a background task
//! can run on an interval.

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod models;
pub mod services;
pub mod tasks;

pub use api::AppState;
pub use cache::{create_cache_key, MemoryCache, DEFAULT_TTL, LONG_TTL, SHORT_TTL};
pub use config::{CacheConfig, Config};
pub use tasks::spawn_cleanup_task;
