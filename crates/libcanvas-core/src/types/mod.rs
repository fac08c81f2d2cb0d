pub mod ids;
pub mod project;

pub use ids::{IdParseError, ProjectId};
pub use project::{FileKind, Project, ProjectChanges, ProjectFile, ProjectSummary};
