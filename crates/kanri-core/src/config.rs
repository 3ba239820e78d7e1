use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::error::CoreError;

const DEFAULT_CONFIG: &str = include_str!("../config/default.toml");

/// Top-level application configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub list: ListConfig,
    pub follow: FollowConfig,
    pub search: SearchConfig,
    pub log: LogConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub base_url: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            base_url: kanri_api::client::DEFAULT_BASE_URL.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ListConfig {
    pub page_size: u32,
}

impl Default for ListConfig {
    fn default() -> Self {
        Self { page_size: 10 }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FollowConfig {
    /// How many follows one shelf loads when expanded.
    pub group_page_size: u32,
}

impl Default for FollowConfig {
    fn default() -> Self {
        Self {
            group_page_size: 100,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    pub debounce_ms: u64,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self { debounce_ms: 300 }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// `tracing` env-filter directive; `RUST_LOG` takes precedence.
    pub filter: String,
    /// When set, logs are also written to a daily rolling file here.
    pub directory: Option<PathBuf>,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            filter: "kanri=info".into(),
            directory: None,
        }
    }
}

impl AppConfig {
    /// Load config from `path`, or from the platform config dir when `None`.
    ///
    /// A missing file yields the built-in defaults.
    pub fn load(path: Option<&Path>) -> Result<Self, CoreError> {
        let path = path.map(Path::to_path_buf).unwrap_or_else(Self::config_path);
        let config = if path.exists() {
            let text = std::fs::read_to_string(&path)?;
            Self::parse(&text)?
        } else {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            Self::builtin()?
        };
        config.validate()?;
        Ok(config)
    }

    pub fn parse(text: &str) -> Result<Self, CoreError> {
        toml::from_str(text).map_err(|e| CoreError::Config(e.to_string()))
    }

    /// The defaults shipped inside the binary.
    pub fn builtin() -> Result<Self, CoreError> {
        Self::parse(DEFAULT_CONFIG)
    }

    /// Save to `path`, creating parent directories.
    pub fn save(&self, path: &Path) -> Result<(), CoreError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content =
            toml::to_string_pretty(self).map_err(|e| CoreError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn validate(&self) -> Result<(), CoreError> {
        if self.server.base_url.trim().is_empty() {
            return Err(CoreError::Validation("server.base_url is empty".into()));
        }
        if self.list.page_size == 0 {
            return Err(CoreError::Validation("list.page_size must be at least 1".into()));
        }
        if self.follow.group_page_size == 0 {
            return Err(CoreError::Validation(
                "follow.group_page_size must be at least 1".into(),
            ));
        }
        Ok(())
    }

    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.search.debounce_ms)
    }

    /// Path to user config file (XDG on Linux, AppData on Windows).
    pub fn config_path() -> PathBuf {
        ProjectDirs::from("", "", "kanri")
            .map(|d| d.config_dir().join("config.toml"))
            .unwrap_or_else(|| PathBuf::from("config.toml"))
    }
}
