use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "canvas", about = "Editing sessions and project store client", version)]
pub struct Cli {
    /// Output in JSON format
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress human-readable output
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Override the local cache directory
    #[arg(long, global = true)]
    pub cache_dir: Option<PathBuf>,

    /// Override the project store API URL
    #[arg(long, global = true)]
    pub api_url: Option<String>,

    /// Config file (TOML); defaults to the platform config dir
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Project management commands
    Project {
        #[command(subcommand)]
        cmd: ProjectCommand,
    },

    /// File operations on the current session
    File {
        #[command(subcommand)]
        cmd: FileCommand,
    },

    /// Save the current session to the local cache
    Save,

    /// Push the current session to the project store
    Push,

    /// Fetch a project from the store into the local cache
    Pull {
        /// Project id
        id: String,
    },

    /// Share-link utilities
    Share {
        #[command(subcommand)]
        cmd: ShareCommand,
    },

    /// Export the current session into a directory
    Export {
        /// Target directory
        dir: PathBuf,
    },

    /// Probe the project store health endpoint
    Health,
}

#[derive(Clone, Subcommand)]
pub enum ProjectCommand {
    /// Create a new project from the default template
    New {
        /// Project name
        #[arg(long, default_value = "Untitled Project")]
        name: String,
    },

    /// Open a cached project and mark it current
    Open {
        /// Project id
        id: String,
    },

    /// Show the current project
    Current,

    /// List projects visible on the remote store
    List {
        /// Include this user's private projects
        #[arg(long)]
        user: Option<String>,
    },

    /// List locally cached projects
    Cached,

    /// Rename the current project
    Rename {
        /// New display name
        name: String,
    },

    /// Delete a project from the remote store
    Delete {
        /// Project id
        id: String,
    },
}

#[derive(Clone, Subcommand)]
pub enum FileCommand {
    /// List files in the current session
    Ls,

    /// Print a file's content
    Cat {
        /// Logical path (e.g. /App.js)
        path: String,
    },

    /// Replace a file's content from --content, --from, or stdin
    Set {
        /// Logical path
        path: String,

        /// Literal content
        #[arg(long)]
        content: Option<String>,

        /// Read content from a file on disk
        #[arg(long)]
        from: Option<PathBuf>,
    },

    /// Create a new file; it becomes the active file
    New {
        /// Logical path
        path: String,

        /// Initial content
        #[arg(long, default_value = "")]
        content: String,
    },

    /// Delete a file
    Rm {
        /// Logical path
        path: String,
    },

    /// Rename a file
    Mv {
        /// Current path
        old: String,

        /// New path
        new: String,
    },

    /// Show or move the active-file pointer
    Active {
        /// Path to activate; omitted prints the current one
        path: Option<String>,
    },
}

#[derive(Clone, Subcommand)]
pub enum ShareCommand {
    /// Encode the current session as a share link
    Link {
        /// Base URL for the link
        #[arg(long, default_value = "http://localhost:3000")]
        base: String,
    },

    /// Decode a share link into a new cached project
    Open {
        /// Full link, query string, or bare payload
        link: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }
}
