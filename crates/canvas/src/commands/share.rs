use serde::Serialize;

use libcanvas_core::{CanvasError, Project, ProjectId};
use libcanvas_session::{decode_share_link, encode_share_link, SessionService};

use crate::cli::{Cli, ShareCommand};
use crate::context;
use crate::output::{output_success, print_human};

pub async fn run(cli: &Cli, cmd: ShareCommand) -> Result<(), CanvasError> {
    match cmd {
        ShareCommand::Link { base } => link(cli, &base),
        ShareCommand::Open { link } => open(cli, &link),
    }
}

#[derive(Serialize)]
struct LinkOutput {
    link: String,
}

fn link(cli: &Cli, base: &str) -> Result<(), CanvasError> {
    let config = context::resolve_config(cli)?;
    let service = context::open_current_session(config)?;

    let snapshot = service.session().snapshot();
    let link = encode_share_link(base, &snapshot.name, &snapshot.files)?;

    output_success(cli, &LinkOutput { link: link.clone() });
    if !cli.json && !cli.quiet {
        println!("{}", link);
    }
    Ok(())
}

fn open(cli: &Cli, input: &str) -> Result<(), CanvasError> {
    let config = context::resolve_config(cli)?;
    let payload = decode_share_link(input)?;

    // Shared code lands as a brand-new local project; the link carries no
    // identity and no integrity guarantee
    let project =
        Project::new(ProjectId::generate(), payload.name.clone()).with_files(payload.files);
    let service = SessionService::import(config, project)?;

    output_success(cli, &service.session().snapshot());
    print_human(
        cli,
        &format!(
            "Imported shared project '{}' as {} ({} files)",
            payload.name,
            service.session().project_id(),
            service.session().file_count()
        ),
    );
    Ok(())
}
