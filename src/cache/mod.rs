//! Cache Module
//!
//! Provides a process-local memo cache with TTL expiration, lazy eviction
//! on read and an explicit sweep.

mod clock;
mod entry;
mod key;
mod memory;
mod order;
mod stats;


// Re-export public types
pub use clock::{current_timestamp_ms, Clock, ManualClock, SystemClock};
pub use entry::CacheEntry;
pub use key::{create_cache_key, KeyPart};
pub use memory::MemoryCache;
pub use order::KeyOrder;
pub use stats::CacheStats;

// == TTL Constants ==
/// One minute, for data that changes often.
pub const SHORT_TTL: u64 = 60 * 1000;

/// Five minutes, used when a call site gives no TTL.
pub const DEFAULT_TTL: u64 = 5 * 60 * 1000;

/// Fifteen minutes, for data that rarely changes.
pub const LONG_TTL: u64 = 15 * 60 * 1000;
