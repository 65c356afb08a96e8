use std::path::{Path, PathBuf};

use color_eyre::{
    Result,
    eyre::{Context, eyre},
};
use serde::{Deserialize, Serialize};

pub const DEFAULT_PORT: u16 = 5000;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// SQLite database file. A leading `~/` is expanded to the home directory.
    #[serde(default = "default_database")]
    database: String,
    /// Port for `serve` when `--port` is not given.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    port: Option<u16>,
}

fn default_database() -> String {
    "~/.local/share/fyyur/fyyur.db".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database: default_database(),
            port: None,
        }
    }
}

impl Config {
    /// Load config from a TOML file
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .wrap_err_with(|| format!("Failed to read config file: {}", path.display()))?;
        toml::from_str(&contents)
            .wrap_err_with(|| format!("Failed to parse config file: {}", path.display()))
    }

    /// Path of the default config file
    pub fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|path| path.join("fyyur").join("config.toml"))
    }

    /// Load the default config file, or the built-in defaults when it does not exist
    pub fn load() -> Result<Self> {
        let config_path =
            Self::config_path().ok_or_else(|| eyre!("Could not determine config directory"))?;

        if !config_path.exists() {
            log::debug!(
                "No config file at {}, using defaults",
                config_path.display()
            );
            return Ok(Self::default());
        }

        Self::from_file(&config_path)
    }

    /// Write the default config file unless one already exists. Returns its path.
    pub fn create_default() -> Result<PathBuf> {
        let config_path =
            Self::config_path().ok_or_else(|| eyre!("Could not determine config directory"))?;

        if config_path.exists() {
            log::info!("Config file already exists: {}", config_path.display());
            return Ok(config_path);
        }

        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent).wrap_err_with(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let contents =
            toml::to_string_pretty(&Self::default()).wrap_err("Failed to serialize config")?;
        std::fs::write(&config_path, contents)
            .wrap_err_with(|| format!("Failed to write config file: {}", config_path.display()))?;

        log::info!("Created config file: {}", config_path.display());
        Ok(config_path)
    }

    /// Expand ~ to home directory
    fn expand_path(path: &str) -> PathBuf {
        if let Some(rest) = path.strip_prefix("~/") {
            if let Some(home) = dirs::home_dir() {
                return home.join(rest);
            }
        }
        PathBuf::from(path)
    }

    pub fn database_path(&self) -> PathBuf {
        Self::expand_path(&self.database)
    }

    pub fn port(&self) -> u16 {
        self.port.unwrap_or(DEFAULT_PORT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_file_uses_defaults() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.port(), DEFAULT_PORT);
    }

    #[test]
    fn test_parse_database_and_port() {
        let config: Config = toml::from_str(
            r#"
database = "/var/lib/fyyur/fyyur.db"
port = 8080
"#,
        )
        .unwrap();

        assert_eq!(
            config.database_path(),
            PathBuf::from("/var/lib/fyyur/fyyur.db")
        );
        assert_eq!(config.port(), 8080);
    }

    #[test]
    fn test_home_is_expanded() {
        let Some(home) = dirs::home_dir() else {
            return;
        };
        let config = Config::default();
        assert_eq!(
            config.database_path(),
            home.join(".local/share/fyyur/fyyur.db")
        );
    }

    #[test]
    fn test_default_round_trips_through_toml() {
        let written = toml::to_string_pretty(&Config::default()).unwrap();
        let read: Config = toml::from_str(&written).unwrap();
        assert_eq!(read, Config::default());
    }
}
