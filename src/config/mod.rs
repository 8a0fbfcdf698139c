//! Configuration module
//!
//! YAML-backed configuration with per-field defaults, loaded from the
//! platform config directory or an explicit path.

mod loader;
pub mod paths;
mod schema;

pub use loader::ConfigLoader;
pub use schema::{CacheConfig, Config};

use anyhow::Result;

/// Look up a configuration value by dotted key, for the `config get` command
pub fn get_config_value(config: &Config, key: &str) -> Result<String> {
    let value = match key {
        "bind" => config.bind.clone(),
        "defaultNamespace" => config.default_namespace.clone(),
        "cache.enabled" => config.cache.enabled.to_string(),
        "cache.ttlMs" => config.cache.ttl_ms.to_string(),
        "cache.cleanupIntervalMs" => config.cache.cleanup_interval_ms.to_string(),
        "requestTimeoutSecs" => config
            .request_timeout_secs
            .map(|t| t.to_string())
            .unwrap_or_else(|| "unset".to_string()),
        _ => return Err(anyhow::anyhow!("Unknown configuration key: {}", key)),
    };
    Ok(value)
}
