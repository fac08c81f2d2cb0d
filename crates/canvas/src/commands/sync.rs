use serde::Serialize;

use libcanvas_core::{CanvasError, ProjectId};
use libcanvas_session::SessionService;

use crate::cli::Cli;
use crate::context;
use crate::output::{output_success, print_human};

#[derive(Serialize)]
struct SaveOutput {
    project_id: String,
    files: usize,
}

/// Explicit local save of the current session
pub async fn save(cli: &Cli) -> Result<(), CanvasError> {
    let config = context::resolve_config(cli)?;
    let mut service = context::open_current_session(config)?;

    service.save();
    let out = SaveOutput {
        project_id: service.session().project_id().to_string(),
        files: service.session().file_count(),
    };
    service.close().await;

    output_success(cli, &out);
    print_human(cli, &format!("Saved {} locally", out.project_id));
    Ok(())
}

/// Push the current session to the project store
pub async fn push(cli: &Cli) -> Result<(), CanvasError> {
    let config = context::resolve_config(cli)?;
    let mut service = context::open_current_session(config)?;

    service.save();
    let stored = service.push().await?;
    service.close().await;

    output_success(cli, &stored);
    print_human(
        cli,
        &format!(
            "Pushed '{}' ({}) - updated {}",
            stored.name, stored.project_id, stored.updated_at
        ),
    );
    Ok(())
}

/// Fetch a project from the store into the local cache and open it
pub async fn pull(cli: &Cli, id: &str) -> Result<(), CanvasError> {
    let config = context::resolve_config(cli)?;
    let project_id = ProjectId::parse(id)?;

    let service = SessionService::pull(config, &project_id).await?;
    let snapshot = service.session().snapshot();

    output_success(cli, &snapshot);
    print_human(
        cli,
        &format!(
            "Pulled '{}' ({}) - {} files",
            snapshot.name,
            snapshot.project_id,
            snapshot.files.len()
        ),
    );
    Ok(())
}
