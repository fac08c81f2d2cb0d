use thiserror::Error;

/// Main error type for canvas operations
#[derive(Debug, Error)]
pub enum CanvasError {
    #[error("invalid arguments: {0}")]
    InvalidArgs(String),

    #[error("validation failed: {0}")]
    Validation(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("conflict: {0}")]
    Conflict(String),

    #[error("store unavailable: {0}")]
    StoreUnavailable(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("sled error: {0}")]
    Db(#[from] sled::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("TOML serialize error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    #[error("ID parse error: {0}")]
    IdParse(#[from] crate::types::ids::IdParseError),

    #[error("internal error: {0}")]
    Internal(String),
}

impl CanvasError {
    /// Get the stable error code for JSON output
    pub fn error_code(&self) -> &'static str {
        match self {
            CanvasError::InvalidArgs(_) => "invalid_args",
            CanvasError::Validation(_) => "invalid_args",
            CanvasError::NotFound(_) => "not_found",
            CanvasError::Conflict(_) => "conflict",
            CanvasError::StoreUnavailable(_) => "store_unavailable",
            CanvasError::Io(_) => "io_error",
            CanvasError::Db(_) => "db_error",
            CanvasError::Json(_) => "internal_error",
            CanvasError::TomlParse(_) => "invalid_args",
            CanvasError::TomlSerialize(_) => "internal_error",
            CanvasError::IdParse(_) => "invalid_args",
            CanvasError::Internal(_) => "internal_error",
        }
    }

    /// Get the exit code for CLI use
    pub fn exit_code(&self) -> i32 {
        match self {
            CanvasError::InvalidArgs(_) | CanvasError::Validation(_) | CanvasError::IdParse(_) => 2,
            CanvasError::NotFound(_) => 3,
            CanvasError::Conflict(_) => 4,
            CanvasError::StoreUnavailable(_) => 5,
            CanvasError::Io(_) | CanvasError::Db(_) => 5,
            _ => 1,
        }
    }

    /// Create a NotFound error for a project
    pub fn project_not_found(project_id: &str) -> Self {
        CanvasError::NotFound(format!("Project '{}' not found", project_id))
    }

    /// Create a Conflict error for a duplicate project id on create
    pub fn duplicate_project(project_id: &str) -> Self {
        CanvasError::Conflict(format!(
            "Project with id '{}' already exists",
            project_id
        ))
    }
}
