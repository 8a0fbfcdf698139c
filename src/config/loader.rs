//! Configuration loading
//!
//! Loads configuration from an explicit path or the default location and
//! applies environment variable overrides.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use super::{paths, schema::Config};

/// Configuration loader
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration
    ///
    /// Precedence order (highest to lowest):
    /// 1. Environment variable overrides
    /// 2. The given file, or the default config file if it exists
    /// 3. Built-in defaults
    pub fn load(path: Option<&Path>) -> Result<Config> {
        let config = match path {
            Some(p) => Self::load_file(&p.to_path_buf())?,
            None => {
                let default_path = paths::root_config_path();
                if default_path.exists() {
                    Self::load_file(&default_path)?
                } else {
                    Config::default()
                }
            }
        };

        Ok(Self::apply_env_overrides(config))
    }

    /// Load configuration from a file
    pub fn load_file(path: &PathBuf) -> Result<Config> {
        if !path.exists() {
            return Err(anyhow::anyhow!("Config file not found: {}", path.display()));
        }

        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = serde_yaml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    /// Validate configuration by loading and checking for errors
    ///
    /// Fails on invalid YAML syntax, invalid value types, and file read
    /// errors.
    pub fn validate(path: Option<&Path>) -> Result<()> {
        let config = Self::load(path).context("Failed to load configuration")?;

        config
            .bind
            .parse::<std::net::SocketAddr>()
            .with_context(|| format!("bind is not a valid socket address: {}", config.bind))?;

        if config.cache.cleanup_interval_ms == 0 {
            return Err(anyhow::anyhow!("cache.cleanupIntervalMs must be non-zero"));
        }

        Ok(())
    }

    fn apply_env_overrides(mut config: Config) -> Config {
        if let Ok(bind) = std::env::var("KUBEDECK_BIND") {
            if !bind.is_empty() {
                config.bind = bind;
            }
        }
        if let Ok(ns) = std::env::var("KUBEDECK_NAMESPACE") {
            if !ns.is_empty() {
                config.default_namespace = ns;
            }
        }
        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_missing_file_errors() {
        let missing = PathBuf::from("/nonexistent/kubedeck/config.yaml");
        assert!(ConfigLoader::load_file(&missing).is_err());
    }

    #[test]
    fn test_load_without_file_uses_defaults() {
        // No explicit path and (in CI) no config file present: defaults apply,
        // modulo env overrides which the test environment does not set.
        let config = ConfigLoader::load(None).unwrap();
        assert!(!config.bind.is_empty());
        assert!(!config.default_namespace.is_empty());
    }
}
