//! Configuration schema definitions
//!
//! Defines the structure of the configuration file using serde for
//! serialization.

use serde::{Deserialize, Serialize};

/// Root configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Listen address for the HTTP server
    #[serde(default = "default_bind")]
    pub bind: String,

    /// Namespace used when a query does not name one
    #[serde(default = "default_namespace")]
    pub default_namespace: String,

    /// Client cache configuration
    #[serde(default)]
    pub cache: CacheConfig,

    /// Per-call timeout applied to cluster requests (connect and read).
    /// Unset means the transport default.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_timeout_secs: Option<u64>,
}

/// Client cache configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CacheConfig {
    /// Cache constructed clients between requests
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Maximum idle lifetime of a cached client before eviction
    #[serde(default = "default_ttl_ms")]
    pub ttl_ms: u64,

    /// Interval between eviction sweeps
    #[serde(default = "default_cleanup_interval_ms")]
    pub cleanup_interval_ms: u64,
}

// Default value functions
fn default_bind() -> String {
    "127.0.0.1:8686".to_string()
}

fn default_namespace() -> String {
    "default".to_string()
}

fn default_true() -> bool {
    true
}

fn default_ttl_ms() -> u64 {
    // Exec-plugin tokens commonly live ~15m; stay well under that
    5 * 60 * 1000
}

fn default_cleanup_interval_ms() -> u64 {
    60 * 1000
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind: default_bind(),
            default_namespace: default_namespace(),
            cache: CacheConfig::default(),
            request_timeout_secs: None,
        }
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: default_true(),
            ttl_ms: default_ttl_ms(),
            cleanup_interval_ms: default_cleanup_interval_ms(),
        }
    }
}
