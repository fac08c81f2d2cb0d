use std::path::PathBuf;

use serde::Serialize;

use libcanvas_core::CanvasError;
use libcanvas_session::export_to_dir;

use crate::cli::Cli;
use crate::context;
use crate::output::{output_success, print_human};

#[derive(Serialize)]
struct ExportOutput {
    target: String,
    files_written: usize,
    folders_created: usize,
}

pub async fn run(cli: &Cli, dir: PathBuf) -> Result<(), CanvasError> {
    let config = context::resolve_config(cli)?;
    let service = context::open_current_session(config)?;

    let snapshot = service.session().snapshot();
    let stats = export_to_dir(&snapshot.files, &dir)?;

    let out = ExportOutput {
        target: dir.display().to_string(),
        files_written: stats.files_written,
        folders_created: stats.folders_created,
    };
    output_success(cli, &out);
    print_human(
        cli,
        &format!(
            "Exported {} files to {}",
            out.files_written, out.target
        ),
    );
    Ok(())
}
