//! Daemon configuration — TOML file with `ROLLCALL_*` environment overrides.

use std::path::PathBuf;

use serde::Deserialize;

/// Seconds a person must stay unadmitted before a sighting counts again.
const DEFAULT_COOLDOWN_SECS: i64 = 30;

/// On-disk configuration file; every key is optional.
#[derive(Debug, Default, Deserialize)]
struct ConfigFile {
    store_path: Option<PathBuf>,
    cooldown_secs: Option<i64>,
}

/// Resolved daemon configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Path to the attendance CSV.
    pub store_path: PathBuf,
    /// Cooldown window for the sighting gate.
    pub cooldown_secs: i64,
}

impl Config {
    /// Load the config file if present, then apply environment overrides.
    /// Precedence: environment > file > built-in default.
    pub fn load() -> Self {
        let file = read_config_file();

        let store_path = std::env::var("ROLLCALL_STORE_PATH")
            .map(PathBuf::from)
            .ok()
            .or(file.store_path)
            .unwrap_or_else(rollcall_core::default_store_path);

        let cooldown_secs = env_i64("ROLLCALL_COOLDOWN_SECS")
            .or(file.cooldown_secs)
            .unwrap_or(DEFAULT_COOLDOWN_SECS);

        Self {
            store_path,
            cooldown_secs,
        }
    }
}

/// `ROLLCALL_CONFIG`, else `$XDG_CONFIG_HOME/rollcall/config.toml`.
fn config_file_path() -> PathBuf {
    std::env::var("ROLLCALL_CONFIG")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            std::env::var("XDG_CONFIG_HOME")
                .map(PathBuf::from)
                .unwrap_or_else(|_| {
                    let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".to_string());
                    PathBuf::from(home).join(".config")
                })
                .join("rollcall")
                .join("config.toml")
        })
}

fn read_config_file() -> ConfigFile {
    let path = config_file_path();
    match std::fs::read_to_string(&path) {
        Ok(text) => match toml::from_str(&text) {
            Ok(file) => file,
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "bad config TOML, using defaults");
                ConfigFile::default()
            }
        },
        // Absent config file is the normal case.
        Err(_) => ConfigFile::default(),
    }
}

fn env_i64(key: &str) -> Option<i64> {
    std::env::var(key).ok().and_then(|v| v.parse().ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_file_keys_are_optional() {
        let file: ConfigFile = toml::from_str("").unwrap();
        assert!(file.store_path.is_none());
        assert!(file.cooldown_secs.is_none());

        let file: ConfigFile =
            toml::from_str("store_path = \"/var/lib/rollcall/attendance.csv\"\ncooldown_secs = 45\n")
                .unwrap();
        assert_eq!(
            file.store_path.as_deref(),
            Some(std::path::Path::new("/var/lib/rollcall/attendance.csv"))
        );
        assert_eq!(file.cooldown_secs, Some(45));
    }
}
