//! CLI context resolution

use libcanvas_api::ApiClient;
use libcanvas_core::config::default_session_config_path;
use libcanvas_core::{CanvasError, SessionConfig};
use libcanvas_session::SessionService;

use crate::cli::Cli;

/// API URL used when neither config nor flags provide one
pub const DEFAULT_API_URL: &str = "http://localhost:5000";

/// Resolve the session configuration with flag > env > file > default
/// precedence
pub fn resolve_config(cli: &Cli) -> Result<SessionConfig, CanvasError> {
    let mut config = match &cli.config {
        Some(path) => SessionConfig::load(path)?.unwrap_or_default(),
        None => {
            let path = default_session_config_path()?;
            SessionConfig::load(&path)?.unwrap_or_default()
        }
    };

    config.apply_env();

    if let Some(ref dir) = cli.cache_dir {
        config.cache_dir = Some(dir.clone());
    }
    if let Some(ref url) = cli.api_url {
        config.api_url = Some(url.clone());
    }

    Ok(config)
}

/// Open the current session, or explain how to create one
pub fn open_current_session(config: SessionConfig) -> Result<SessionService, CanvasError> {
    SessionService::open_current(config)?.ok_or_else(|| {
        CanvasError::NotFound(
            "no current project; run 'canvas project new' to create one".to_string(),
        )
    })
}

/// Build an API client from the resolved configuration
pub fn api_client(config: &SessionConfig) -> Result<ApiClient, CanvasError> {
    let url = config.api_url.as_deref().unwrap_or(DEFAULT_API_URL);
    ApiClient::new(url).map_err(|e| CanvasError::InvalidArgs(format!("bad API URL: {}", e)))
}
