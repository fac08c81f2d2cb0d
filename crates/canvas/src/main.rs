//! canvas - CLI front-end for editing sessions and the project store

mod cli;
mod commands;
mod context;
mod output;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use cli::{Cli, Command};
use libcanvas_core::CanvasError;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Diagnostics go to stderr and stay out of the way unless CANVAS_LOG
    // asks for them
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_env("CANVAS_LOG").unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run_command(&cli).await {
        output::output_error(&cli, &e);
        std::process::exit(e.exit_code());
    }
}

async fn run_command(cli: &Cli) -> Result<(), CanvasError> {
    match &cli.command {
        Command::Project { cmd } => commands::project::run(cli, cmd.clone()).await,
        Command::File { cmd } => commands::file::run(cli, cmd.clone()).await,
        Command::Save => commands::sync::save(cli).await,
        Command::Push => commands::sync::push(cli).await,
        Command::Pull { id } => commands::sync::pull(cli, id).await,
        Command::Share { cmd } => commands::share::run(cli, cmd.clone()).await,
        Command::Export { dir } => commands::export::run(cli, dir.clone()).await,
        Command::Health => commands::health::run(cli).await,
    }
}
