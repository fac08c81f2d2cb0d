use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Maximum accepted length of a project identifier in bytes
pub const MAX_PROJECT_ID_LEN: usize = 128;

/// Opaque project identifier.
///
/// Client-generated (UUID v4 by default) and immutable after creation. Any
/// non-empty printable string up to [`MAX_PROJECT_ID_LEN`] bytes is accepted
/// so identifiers minted by other frontends keep working.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProjectId(String);

#[derive(Debug, Error)]
pub enum IdParseError {
    #[error("project id must not be empty")]
    Empty,
    #[error("project id must not contain whitespace, control or URL-reserved characters")]
    InvalidChars,
    #[error("project id too long: {0} bytes (max {MAX_PROJECT_ID_LEN})")]
    TooLong(usize),
}

impl ProjectId {
    /// Generate a fresh random identifier
    pub fn generate() -> Self {
        ProjectId(Uuid::new_v4().to_string())
    }

    /// Parse and validate an identifier supplied from outside
    pub fn parse(s: &str) -> Result<Self, IdParseError> {
        if s.is_empty() {
            return Err(IdParseError::Empty);
        }
        if s.len() > MAX_PROJECT_ID_LEN {
            return Err(IdParseError::TooLong(s.len()));
        }
        // Identifiers travel in URL path segments, so the separators and
        // escape characters are off limits too.
        if s.chars()
            .any(|c| c.is_whitespace() || c.is_control() || matches!(c, '/' | '?' | '#' | '%'))
        {
            return Err(IdParseError::InvalidChars);
        }
        Ok(ProjectId(s.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ProjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for ProjectId {
    type Err = IdParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ProjectId::parse(s)
    }
}
