use libcanvas_core::CanvasError;
use libcanvas_session::service::api_to_canvas;

use crate::cli::Cli;
use crate::context;
use crate::output::{output_success, print_human};

pub async fn run(cli: &Cli) -> Result<(), CanvasError> {
    let config = context::resolve_config(cli)?;
    let client = context::api_client(&config)?;

    let health = client.health().await.map_err(api_to_canvas)?;

    output_success(cli, &health);
    print_human(
        cli,
        &format!(
            "{} (store {})",
            health.message,
            if health.store_connected {
                "connected"
            } else {
                "offline"
            }
        ),
    );
    Ok(())
}
