use std::path::PathBuf;

use color_eyre::Result;
use color_eyre::eyre::{Context, OptionExt};
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize)]
pub struct Config {
    /// Path to the SQLite catalog database
    database: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database: "~/.local/share/playlist-manager/catalog.db".to_string(),
        }
    }
}

impl Config {
    /// Load config from a TOML file
    pub fn from_file(path: &PathBuf) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .context(format!("Failed to read config file: {}", path.display()))?;
        let config: Config = toml::from_str(&contents)
            .context(format!("Failed to parse config file: {}", path.display()))?;
        Ok(config)
    }

    /// Get the config file path
    pub fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|path| path.join("playlist-manager").join("config.toml"))
    }

    /// Load config from the default location, falling back to defaults when
    /// no file exists yet
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path().ok_or_eyre("No config directory available")?;

        if config_path.is_file() {
            Self::from_file(&config_path)
        } else {
            Ok(Self::default())
        }
    }

    /// Create a default config file, if it doesn't exist
    pub fn create_default() -> Result<PathBuf> {
        let config_path = Self::config_path().ok_or_eyre("No config directory available")?;

        if config_path.exists() {
            return Ok(config_path);
        }

        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent).context(format!(
                "Failed to create config directory: {}",
                parent.display()
            ))?;
        }

        let contents = toml::to_string_pretty(&Config::default())
            .context("Failed to serialize default config")?;
        std::fs::write(&config_path, contents).context(format!(
            "Failed to write config file: {}",
            config_path.display()
        ))?;

        Ok(config_path)
    }

    /// Expand ~ to home directory
    fn expand_path(&self, path: &str) -> PathBuf {
        if path.starts_with("~/") {
            if let Some(home) = dirs::home_dir() {
                return home.join(&path[2..]);
            }
        }
        PathBuf::from(path)
    }

    /// Get expanded database path
    pub fn database_path(&self) -> PathBuf {
        self.expand_path(&self.database)
    }
}
