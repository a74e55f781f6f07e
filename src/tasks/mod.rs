//! Background Tasks Module
//!
//! # Tasks
//! - TTL Cleanup: Sweeps expired cache entries at a fixed interval

mod cleanup;

pub use cleanup::spawn_cleanup_task;
