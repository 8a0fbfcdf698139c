//! Cross-platform directory path resolution
//!
//! Resolves the platform-appropriate configuration directory:
//! - Linux/macOS: XDG Base Directory specification (~/.config)
//! - Windows: Known Folder API (AppData\Roaming)

use std::path::PathBuf;

/// Get the configuration directory path
///
/// Checks the KUBEDECK_CONFIG_DIR environment variable first, then falls
/// back to:
/// - Unix (Linux/macOS): XDG_CONFIG_HOME/kubedeck or ~/.config/kubedeck
/// - Windows: %APPDATA%\kubedeck\config
pub fn config_dir() -> PathBuf {
    std::env::var("KUBEDECK_CONFIG_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            #[cfg(windows)]
            {
                use directories::ProjectDirs;
                ProjectDirs::from("", "", "kubedeck")
                    .map(|dirs| dirs.config_dir().to_path_buf())
                    .unwrap_or_else(|| PathBuf::from(".").join(".config").join("kubedeck"))
            }
            #[cfg(not(windows))]
            {
                use directories::BaseDirs;
                std::env::var("XDG_CONFIG_HOME")
                    .map(PathBuf::from)
                    .unwrap_or_else(|_| {
                        BaseDirs::new()
                            .map(|dirs| dirs.home_dir().join(".config"))
                            .unwrap_or_else(|| PathBuf::from(".").join(".config"))
                    })
                    .join("kubedeck")
            }
        })
}

/// Get the root configuration file path
pub fn root_config_path() -> PathBuf {
    config_dir().join("config.yaml")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_dir() {
        let dir = config_dir();
        assert!(dir.to_string_lossy().contains("kubedeck"));
    }

    #[test]
    fn test_root_config_path_is_yaml() {
        assert!(root_config_path().to_string_lossy().ends_with("config.yaml"));
    }
}
