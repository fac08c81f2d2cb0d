use std::path::PathBuf;

use serde::Serialize;

use libcanvas_core::CanvasError;

use crate::cli::{Cli, FileCommand};
use crate::context;
use crate::output::{output_success, print_human};

pub async fn run(cli: &Cli, cmd: FileCommand) -> Result<(), CanvasError> {
    let config = context::resolve_config(cli)?;
    let mut service = context::open_current_session(config)?;

    match cmd {
        FileCommand::Ls => {
            #[derive(Serialize)]
            struct Entry {
                path: String,
                kind: &'static str,
                bytes: usize,
                active: bool,
            }
            let active = service.session().active_file().to_string();
            let entries: Vec<Entry> = service
                .session()
                .files()
                .map(|file| Entry {
                    path: file.path.clone(),
                    kind: file.kind.as_str(),
                    bytes: file.content.len(),
                    active: file.path == active,
                })
                .collect();

            output_success(cli, &entries);
            for entry in &entries {
                let marker = if entry.active { "*" } else { " " };
                print_human(
                    cli,
                    &format!("{} {}  {}  {}B", marker, entry.path, entry.kind, entry.bytes),
                );
            }
        }

        FileCommand::Cat { path } => {
            let file = service
                .session()
                .file(&path)
                .ok_or_else(|| CanvasError::NotFound(format!("no such file: {}", path)))?;
            if cli.json {
                output_success(cli, file);
            } else if !cli.quiet {
                print!("{}", file.content);
            }
        }

        FileCommand::Set {
            path,
            content,
            from,
        } => {
            let content = resolve_content(content, from)?;
            service.update_file(&path, content)?;
            print_human(cli, &format!("Updated {}", path));
        }

        FileCommand::New { path, content } => {
            service.create_file(&path, content)?;
            print_human(cli, &format!("Created {} (now active)", path));
        }

        FileCommand::Rm { path } => {
            service.delete_file(&path)?;
            print_human(
                cli,
                &format!(
                    "Deleted {}; active file is {}",
                    path,
                    service.session().active_file()
                ),
            );
        }

        FileCommand::Mv { old, new } => {
            service.rename_file(&old, &new)?;
            print_human(cli, &format!("Renamed {} -> {}", old, new));
        }

        FileCommand::Active { path } => match path {
            Some(path) => {
                service.set_active(&path)?;
                print_human(cli, &format!("Active file is {}", path));
            }
            None => {
                print_human(cli, service.session().active_file());
            }
        },
    }

    // Teardown flushes any debounced save armed by the mutation above
    service.close().await;
    Ok(())
}

/// Content from --content, --from, or stdin (in that order)
fn resolve_content(content: Option<String>, from: Option<PathBuf>) -> Result<String, CanvasError> {
    if let Some(content) = content {
        return Ok(content);
    }
    if let Some(path) = from {
        return Ok(std::fs::read_to_string(path)?);
    }
    Ok(std::io::read_to_string(std::io::stdin())?)
}
