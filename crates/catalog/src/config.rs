use std::{env, str::FromStr, time::Duration};

use crate::cache::CacheTtls;
use crate::refresh::RefreshPeriods;

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Maximum number of entries per named cache (default: 100)
    pub cache_max_entries: usize,
    /// TTL of the full listing in milliseconds (default: 10,000)
    pub find_all_ttl_ms: u64,
    /// TTL of the last updated product in milliseconds (default: 3,000)
    pub update_ttl_ms: u64,
    /// TTL of the last deleted product in milliseconds (default: 1,000)
    pub delete_ttl_ms: u64,
    /// Period of the listing refresh in milliseconds (default: 5,000)
    pub refresh_all_period_ms: u64,
    /// Period of the updated-product refresh in milliseconds (default: 3,000)
    pub refresh_updated_period_ms: u64,
    /// Period of the deleted-product refresh in milliseconds (default: 1,000)
    pub refresh_deleted_period_ms: u64,
    /// Buffered cache events per subscriber (default: 100)
    pub event_channel_capacity: usize,
    /// Path to SQLite database file (default: "catalog.db")
    /// Note: Only used when the `sqlite` feature is enabled.
    #[cfg_attr(not(feature = "sqlite"), allow(dead_code))]
    pub sqlite_path: String,
    /// Seed the demo catalog into an empty store (default: true)
    pub seed_demo_data: bool,
    /// Emit logs as JSON lines instead of human-readable text (default: false)
    pub log_json: bool,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Environment variables:
    /// - `CACHE_MAX_ENTRIES` - Maximum entries per named cache (default: 100)
    /// - `FIND_ALL_TTL_MS` - Listing TTL (default: 10000)
    /// - `UPDATE_TTL_MS` - Last-updated TTL (default: 3000)
    /// - `DELETE_TTL_MS` - Last-deleted TTL (default: 1000)
    /// - `REFRESH_ALL_PERIOD_MS` - Listing refresh period (default: 5000)
    /// - `REFRESH_UPDATED_PERIOD_MS` - Last-updated refresh period (default: 3000)
    /// - `REFRESH_DELETED_PERIOD_MS` - Last-deleted refresh period (default: 1000)
    /// - `EVENT_CHANNEL_CAPACITY` - Cache event buffer (default: 100)
    /// - `SQLITE_PATH` - SQLite database path (default: "catalog.db")
    /// - `SEED_DEMO_DATA` - `true` or `false` (default: true)
    /// - `LOG_FORMAT` - `json` for JSON logs, anything else for text (default: text)
    ///
    /// Unset or unparsable values fall back to their defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        Self {
            cache_max_entries: parse_or(lookup("CACHE_MAX_ENTRIES"), 100),
            find_all_ttl_ms: parse_or(lookup("FIND_ALL_TTL_MS"), 10_000),
            update_ttl_ms: parse_or(lookup("UPDATE_TTL_MS"), 3_000),
            delete_ttl_ms: parse_or(lookup("DELETE_TTL_MS"), 1_000),
            refresh_all_period_ms: parse_or(lookup("REFRESH_ALL_PERIOD_MS"), 5_000),
            refresh_updated_period_ms: parse_or(lookup("REFRESH_UPDATED_PERIOD_MS"), 3_000),
            refresh_deleted_period_ms: parse_or(lookup("REFRESH_DELETED_PERIOD_MS"), 1_000),
            event_channel_capacity: parse_or(lookup("EVENT_CHANNEL_CAPACITY"), 100),
            sqlite_path: lookup("SQLITE_PATH").unwrap_or_else(|| "catalog.db".to_string()),
            seed_demo_data: parse_or(lookup("SEED_DEMO_DATA"), true),
            log_json: lookup("LOG_FORMAT").is_some_and(|v| v.trim().eq_ignore_ascii_case("json")),
        }
    }

    /// Get the TTL of each named cache.
    pub fn cache_ttls(&self) -> CacheTtls {
        CacheTtls {
            find_all: Duration::from_millis(self.find_all_ttl_ms),
            updated: Duration::from_millis(self.update_ttl_ms),
            deleted: Duration::from_millis(self.delete_ttl_ms),
        }
    }

    /// Get the period of each refresh job.
    pub fn refresh_periods(&self) -> RefreshPeriods {
        RefreshPeriods {
            find_all: Duration::from_millis(self.refresh_all_period_ms),
            updated: Duration::from_millis(self.refresh_updated_period_ms),
            deleted: Duration::from_millis(self.refresh_deleted_period_ms),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_lookup(|_| None)
    }
}

fn parse_or<T: FromStr>(value: Option<String>, default: T) -> T {
    value.and_then(|v| v.trim().parse().ok()).unwrap_or(default)
}
