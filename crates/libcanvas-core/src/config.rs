//! Configuration for the server and session components
//!
//! TOML config files with environment overrides; resolution precedence is
//! CLI flag, then `CANVAS_*` environment variable, then config file, then
//! default.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::CanvasError;

/// Server configuration stored in canvas-server.toml
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Listen address
    #[serde(default = "default_bind")]
    pub bind: String,
    /// Store directory; None means the platform data dir
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_dir: Option<PathBuf>,
    /// Origins allowed by CORS
    #[serde(default = "default_origins")]
    pub allowed_origins: Vec<String>,
    /// Treat a store-open failure at startup as fatal
    #[serde(default)]
    pub strict: bool,
}

fn default_bind() -> String {
    "127.0.0.1:5000".to_string()
}

fn default_origins() -> Vec<String> {
    vec![
        "http://localhost:3000".to_string(),
        "http://localhost:5173".to_string(),
    ]
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
            data_dir: None,
            allowed_origins: default_origins(),
            strict: false,
        }
    }
}

impl ServerConfig {
    /// Load from a TOML file; Ok(None) when the file does not exist
    pub fn load(path: &Path) -> Result<Option<Self>, CanvasError> {
        if !path.exists() {
            return Ok(None);
        }
        let content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)?;
        Ok(Some(config))
    }

    /// Save to a TOML file, creating parent directories
    pub fn save(&self, path: &Path) -> Result<(), CanvasError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Apply `CANVAS_BIND`, `CANVAS_DATA_DIR` and `CANVAS_ALLOWED_ORIGINS`
    /// (comma-separated) overrides
    pub fn apply_env(&mut self) {
        if let Ok(bind) = std::env::var("CANVAS_BIND") {
            if !bind.is_empty() {
                self.bind = bind;
            }
        }
        if let Ok(dir) = std::env::var("CANVAS_DATA_DIR") {
            if !dir.is_empty() {
                self.data_dir = Some(PathBuf::from(dir));
            }
        }
        if let Ok(origins) = std::env::var("CANVAS_ALLOWED_ORIGINS") {
            if !origins.is_empty() {
                self.allowed_origins = origins
                    .split(',')
                    .map(|s| s.trim().to_string())
                    .filter(|s| !s.is_empty())
                    .collect();
            }
        }
    }

    /// Resolve the store directory: explicit setting or the platform data dir
    pub fn resolve_data_dir(&self) -> Result<PathBuf, CanvasError> {
        match &self.data_dir {
            Some(dir) => Ok(dir.clone()),
            None => Ok(project_dirs()?.data_dir().join("store")),
        }
    }
}

/// Whether saves are pushed to the remote store automatically.
///
/// The observed frontends disagree on this, so it is configuration rather
/// than fixed behavior.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RemotePersist {
    /// Only an explicit push talks to the remote store
    #[default]
    Manual,
    /// Every autosave tick also pushes to the remote store
    Autosave,
}

/// Session configuration stored in canvas.toml
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Whether the debounced autosave is armed on mutations
    #[serde(default = "default_true")]
    pub autosave: bool,
    /// Autosave quiet period in milliseconds
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,
    /// Remote persistence mode
    #[serde(default)]
    pub remote: RemotePersist,
    /// Base URL of the project store API
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_url: Option<String>,
    /// Local cache directory; None means the platform cache dir
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cache_dir: Option<PathBuf>,
}

fn default_true() -> bool {
    true
}

fn default_debounce_ms() -> u64 {
    2000
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            autosave: true,
            debounce_ms: default_debounce_ms(),
            remote: RemotePersist::Manual,
            api_url: None,
            cache_dir: None,
        }
    }
}

impl SessionConfig {
    /// Load from a TOML file; Ok(None) when the file does not exist
    pub fn load(path: &Path) -> Result<Option<Self>, CanvasError> {
        if !path.exists() {
            return Ok(None);
        }
        let content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)?;
        Ok(Some(config))
    }

    /// Save to a TOML file, creating parent directories
    pub fn save(&self, path: &Path) -> Result<(), CanvasError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Apply `CANVAS_API_URL` and `CANVAS_CACHE_DIR` overrides
    pub fn apply_env(&mut self) {
        if let Ok(url) = std::env::var("CANVAS_API_URL") {
            if !url.is_empty() {
                self.api_url = Some(url);
            }
        }
        if let Ok(dir) = std::env::var("CANVAS_CACHE_DIR") {
            if !dir.is_empty() {
                self.cache_dir = Some(PathBuf::from(dir));
            }
        }
    }

    /// Autosave quiet period as a Duration
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    /// Resolve the cache directory: explicit setting or the platform cache dir
    pub fn resolve_cache_dir(&self) -> Result<PathBuf, CanvasError> {
        match &self.cache_dir {
            Some(dir) => Ok(dir.clone()),
            None => Ok(project_dirs()?.cache_dir().join("projects")),
        }
    }
}

/// Default config file location for the CLI (`<config dir>/canvas.toml`)
pub fn default_session_config_path() -> Result<PathBuf, CanvasError> {
    Ok(project_dirs()?.config_dir().join("canvas.toml"))
}

fn project_dirs() -> Result<directories::ProjectDirs, CanvasError> {
    directories::ProjectDirs::from("", "canvas", "canvas").ok_or_else(|| {
        CanvasError::Internal("could not determine platform directories".to_string())
    })
}
