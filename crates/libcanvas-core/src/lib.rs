//! Core library for canvas: project data model, validation, the sled-backed
//! project store, and configuration for the server and session components.

pub mod config;
pub mod error;
pub mod store;
pub mod template;
pub mod types;

pub use config::{RemotePersist, ServerConfig, SessionConfig};
pub use error::CanvasError;
pub use store::{LockedStore, ProjectStore};
pub use types::ids::ProjectId;
pub use types::project::{FileKind, Project, ProjectChanges, ProjectFile, ProjectSummary};
