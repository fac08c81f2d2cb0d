//! CLI output helpers

use comfy_table::Table;
use serde::Serialize;

use libcanvas_core::{CanvasError, Project, ProjectSummary};

use crate::cli::Cli;

/// Emit the structured payload when --json is set
pub fn output_success<T: Serialize>(cli: &Cli, payload: &T) {
    if cli.json && !cli.quiet {
        match serde_json::to_string_pretty(payload) {
            Ok(json) => println!("{}", json),
            Err(e) => eprintln!("failed to serialize output: {}", e),
        }
    }
}

/// Print a human-readable line unless --json or --quiet
pub fn print_human(cli: &Cli, line: &str) {
    if !cli.json && !cli.quiet {
        println!("{}", line);
    }
}

/// Report an error on stderr (JSON envelope when --json)
pub fn output_error(cli: &Cli, error: &CanvasError) {
    if cli.json {
        let envelope = serde_json::json!({
            "ok": false,
            "error": {
                "code": error.error_code(),
                "message": error.to_string(),
            },
        });
        eprintln!("{}", envelope);
    } else {
        eprintln!("error: {}", error);
    }
}

/// Tabulate projects for list views
pub fn project_table(projects: &[Project]) -> Table {
    let mut table = Table::new();
    table.set_header(vec!["ID", "NAME", "FILES", "PUBLIC", "UPDATED"]);
    for project in projects {
        let summary = ProjectSummary::from(project);
        table.add_row(vec![
            summary.project_id.to_string(),
            summary.name,
            summary.file_count.to_string(),
            if summary.is_public { "yes" } else { "no" }.to_string(),
            summary.updated_at.format("%Y-%m-%d %H:%M").to_string(),
        ]);
    }
    table
}
