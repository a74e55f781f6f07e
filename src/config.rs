//! Configuration Module
//!
//! Per-instance cache configuration and the server configuration loaded
//! from environment variables.

use std::env;
use std::str::FromStr;

use crate::cache::DEFAULT_TTL;

// == Cache Config ==
/// Construction parameters for one [`MemoryCache`](crate::cache::MemoryCache).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheConfig {
    /// Instance name, used only in logs and diagnostics
    pub name: String,
    /// TTL in milliseconds applied when a call site omits one
    pub default_ttl_ms: u64,
}

impl CacheConfig {
    /// Creates a config with the default five minute TTL.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            default_ttl_ms: DEFAULT_TTL,
        }
    }

    pub fn with_default_ttl_ms(mut self, default_ttl_ms: u64) -> Self {
        self.default_ttl_ms = default_ttl_ms;
        self
    }
}

/// Server configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// Name of the cache instance served over HTTP
    pub cache_name: String,
    /// Default TTL in milliseconds for entries without explicit TTL
    pub default_ttl_ms: u64,
    /// HTTP server port
    pub server_port: u16,
    /// Background cleanup task interval in milliseconds
    pub cleanup_interval_ms: u64,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `CACHE_NAME` - Cache instance name (default: "inspector")
    /// - `DEFAULT_TTL_MS` - Default TTL in milliseconds (default: 300000)
    /// - `SERVER_PORT` - HTTP server port (default: 3000)
    /// - `CLEANUP_INTERVAL_MS` - Cleanup frequency in milliseconds (default: 1000)
    ///
    /// Unparsable values fall back to their defaults.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            cache_name: env::var("CACHE_NAME")
                .ok()
                .filter(|name| !name.trim().is_empty())
                .unwrap_or(defaults.cache_name),
            default_ttl_ms: parse_var("DEFAULT_TTL_MS").unwrap_or(defaults.default_ttl_ms),
            server_port: parse_var("SERVER_PORT").unwrap_or(defaults.server_port),
            cleanup_interval_ms: parse_var("CLEANUP_INTERVAL_MS")
                .unwrap_or(defaults.cleanup_interval_ms),
        }
    }

    /// Config for the cache instance this server exposes.
    pub fn cache_config(&self) -> CacheConfig {
        CacheConfig::new(self.cache_name.clone()).with_default_ttl_ms(self.default_ttl_ms)
    }
}

fn parse_var<T: FromStr>(name: &str) -> Option<T> {
    env::var(name).ok().and_then(|v| v.trim().parse().ok())
}

impl Default for Config {
    fn default() -> Self {
        Self {
            cache_name: "inspector".to_string(),
            default_ttl_ms: DEFAULT_TTL,
            server_port: 3000,
            cleanup_interval_ms: 1000,
        }
    }
}
