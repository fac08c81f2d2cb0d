use serde::Serialize;

use libcanvas_core::{CanvasError, ProjectId};
use libcanvas_session::service::api_to_canvas;
use libcanvas_session::SessionService;

use crate::cli::{Cli, ProjectCommand};
use crate::context;
use crate::output::{output_success, print_human, project_table};

pub async fn run(cli: &Cli, cmd: ProjectCommand) -> Result<(), CanvasError> {
    match cmd {
        ProjectCommand::New { name } => new_project(cli, &name),
        ProjectCommand::Open { id } => open(cli, &id),
        ProjectCommand::Current => current(cli),
        ProjectCommand::List { user } => list(cli, user.as_deref()).await,
        ProjectCommand::Cached => cached(cli),
        ProjectCommand::Rename { name } => rename(cli, &name).await,
        ProjectCommand::Delete { id } => delete(cli, &id).await,
    }
}

#[derive(Serialize)]
struct ProjectOutput {
    project_id: String,
    name: String,
    files: usize,
    active_file: String,
}

impl ProjectOutput {
    fn from_service(service: &SessionService) -> Self {
        Self {
            project_id: service.session().project_id().to_string(),
            name: service.session().name().to_string(),
            files: service.session().file_count(),
            active_file: service.session().active_file().to_string(),
        }
    }
}

fn new_project(cli: &Cli, name: &str) -> Result<(), CanvasError> {
    let config = context::resolve_config(cli)?;
    let service = SessionService::create(config, name)?;

    output_success(cli, &ProjectOutput::from_service(&service));
    print_human(
        cli,
        &format!(
            "Created project '{}' ({})",
            name,
            service.session().project_id()
        ),
    );
    Ok(())
}

fn open(cli: &Cli, id: &str) -> Result<(), CanvasError> {
    let config = context::resolve_config(cli)?;
    let project_id = ProjectId::parse(id)?;

    let service = SessionService::load(config, &project_id)?.ok_or_else(|| {
        CanvasError::NotFound(format!(
            "no cached copy of '{}'; try 'canvas pull {}'",
            id, id
        ))
    })?;

    output_success(cli, &ProjectOutput::from_service(&service));
    print_human(
        cli,
        &format!("Opened '{}' ({})", service.session().name(), id),
    );
    Ok(())
}

fn current(cli: &Cli) -> Result<(), CanvasError> {
    let config = context::resolve_config(cli)?;
    let service = context::open_current_session(config)?;

    output_success(cli, &ProjectOutput::from_service(&service));
    print_human(
        cli,
        &format!(
            "{} ({}) - {} files, active {}",
            service.session().name(),
            service.session().project_id(),
            service.session().file_count(),
            service.session().active_file()
        ),
    );
    Ok(())
}

async fn list(cli: &Cli, user: Option<&str>) -> Result<(), CanvasError> {
    let config = context::resolve_config(cli)?;
    let client = context::api_client(&config)?;

    let projects = client.list(user).await.map_err(api_to_canvas)?;

    output_success(cli, &projects);
    if !cli.json && !cli.quiet {
        if projects.is_empty() {
            println!("No visible projects.");
        } else {
            println!("{}", project_table(&projects));
        }
    }
    Ok(())
}

fn cached(cli: &Cli) -> Result<(), CanvasError> {
    let config = context::resolve_config(cli)?;
    let cache = libcanvas_session::LocalCache::open(config.resolve_cache_dir()?)?;

    let ids = cache.list()?;
    let current = cache.current()?;

    output_success(cli, &ids);
    for id in &ids {
        let marker = if Some(id) == current.as_ref() { "*" } else { " " };
        print_human(cli, &format!("{} {}", marker, id));
    }
    if ids.is_empty() {
        print_human(cli, "No cached projects.");
    }
    Ok(())
}

async fn rename(cli: &Cli, name: &str) -> Result<(), CanvasError> {
    let config = context::resolve_config(cli)?;
    let mut service = context::open_current_session(config)?;

    service.set_name(name);
    service.save();
    let id = service.session().project_id().clone();
    service.close().await;

    print_human(cli, &format!("Renamed {} to '{}'", id, name));
    Ok(())
}

async fn delete(cli: &Cli, id: &str) -> Result<(), CanvasError> {
    let config = context::resolve_config(cli)?;
    let project_id = ProjectId::parse(id)?;
    let client = context::api_client(&config)?;

    let body = client.delete(&project_id).await.map_err(api_to_canvas)?;

    // Drop the stale cached copy too, if any
    let cache = libcanvas_session::LocalCache::open(config.resolve_cache_dir()?)?;
    cache.remove_project(&project_id)?;

    output_success(cli, &body);
    print_human(cli, &body.message);
    Ok(())
}
