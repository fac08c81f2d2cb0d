//! Canvas server - REST service for the project store
//!
//! The server provides:
//! - The /api/projects CRUD surface backed by the sled project store
//! - A health route reporting store connectivity
//! - Degraded-mode operation when the store cannot be opened (reads fail,
//!   mutating verbs are rejected 503), unless --strict makes that fatal

use std::path::PathBuf;
use std::time::Duration;

use axum::http::{header, HeaderValue, Method};
use clap::Parser;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use canvas_server::{routes, AppState};
use libcanvas_core::{ProjectStore, ServerConfig};

#[derive(Parser)]
#[command(name = "canvas-server", about = "Canvas project store server", version)]
struct Cli {
    /// Listen address (e.g. 127.0.0.1:5000)
    #[arg(long)]
    bind: Option<String>,

    /// Store directory
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// Config file (TOML)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Comma-separated allowed CORS origins
    #[arg(long)]
    allowed_origins: Option<String>,

    /// Exit instead of serving degraded when the store cannot be opened
    #[arg(long)]
    strict: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Initialize logging
    let filter = EnvFilter::try_from_env("CANVAS_LOG")
        .or_else(|_| EnvFilter::try_new(&cli.log_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("canvas-server starting");

    let config = match resolve_config(&cli) {
        Ok(config) => config,
        Err(e) => {
            error!("invalid configuration: {}", e);
            std::process::exit(2);
        }
    };

    let data_dir = match config.resolve_data_dir() {
        Ok(dir) => dir,
        Err(e) => {
            error!("could not resolve store directory: {}", e);
            std::process::exit(2);
        }
    };

    // Open the store; in non-strict mode a failure leaves the service
    // running degraded instead of exiting
    let store = match ProjectStore::open_locked_blocking(&data_dir, Duration::from_secs(5)) {
        Ok(store) => {
            info!(path = %data_dir.display(), projects = store.count(), "store opened");
            Some(store)
        }
        Err(e) if config.strict => {
            error!(path = %data_dir.display(), "store open failed in strict mode: {}", e);
            std::process::exit(1);
        }
        Err(e) => {
            warn!(
                path = %data_dir.display(),
                "store open failed: {}. Continuing without it; mutating requests will get 503",
                e
            );
            None
        }
    };

    let app_state = AppState::new(store);
    let app = routes::router(app_state).layer(cors_layer(&config.allowed_origins));

    let listener = match tokio::net::TcpListener::bind(&config.bind).await {
        Ok(listener) => listener,
        Err(e) => {
            error!(bind = %config.bind, "failed to bind: {}", e);
            std::process::exit(1);
        }
    };
    info!(bind = %config.bind, origins = ?config.allowed_origins, "canvas-server listening");

    if let Err(e) = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        error!("server error: {}", e);
    }

    info!("canvas-server stopped");
}

/// Resolve configuration with flag > env > file > default precedence
fn resolve_config(cli: &Cli) -> Result<ServerConfig, libcanvas_core::CanvasError> {
    let mut config = match &cli.config {
        Some(path) => ServerConfig::load(path)?.unwrap_or_default(),
        None => ServerConfig::default(),
    };

    config.apply_env();

    if let Some(ref bind) = cli.bind {
        config.bind = bind.clone();
    }
    if let Some(ref dir) = cli.data_dir {
        config.data_dir = Some(dir.clone());
    }
    if let Some(ref origins) = cli.allowed_origins {
        config.allowed_origins = origins
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();
    }
    if cli.strict {
        config.strict = true;
    }

    Ok(config)
}

/// CORS layer for the configured origins. Requests with no Origin header
/// pass untouched.
fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                warn!(%origin, "skipping unparsable CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([header::CONTENT_TYPE])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bare_cli() -> Cli {
        Cli {
            bind: None,
            data_dir: None,
            config: None,
            allowed_origins: None,
            strict: false,
            log_level: "info".to_string(),
        }
    }

    #[test]
    fn test_config_file_supplies_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("server.toml");
        ServerConfig {
            bind: "0.0.0.0:9999".to_string(),
            ..Default::default()
        }
        .save(&path)
        .unwrap();

        let cli = Cli {
            config: Some(path),
            ..bare_cli()
        };
        let config = resolve_config(&cli).unwrap();
        assert_eq!(config.bind, "0.0.0.0:9999");
        assert!(!config.strict);
    }

    #[test]
    fn test_flags_override_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("server.toml");
        ServerConfig {
            bind: "0.0.0.0:9999".to_string(),
            ..Default::default()
        }
        .save(&path)
        .unwrap();

        let cli = Cli {
            bind: Some("127.0.0.1:6000".to_string()),
            config: Some(path),
            allowed_origins: Some("https://a.example, https://b.example".to_string()),
            strict: true,
            ..bare_cli()
        };
        let config = resolve_config(&cli).unwrap();
        assert_eq!(config.bind, "127.0.0.1:6000");
        assert_eq!(
            config.allowed_origins,
            vec!["https://a.example", "https://b.example"]
        );
        assert!(config.strict);
    }

    #[test]
    fn test_missing_config_file_falls_back_to_defaults() {
        let cli = Cli {
            config: Some(PathBuf::from("/nonexistent/server.toml")),
            ..bare_cli()
        };
        let config = resolve_config(&cli).unwrap();
        assert_eq!(config.bind, ServerConfig::default().bind);
    }
}

/// Resolve on ctrl-c or SIGTERM for graceful shutdown
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {}
        _ = terminate => {}
    }

    info!("received shutdown signal");
}
