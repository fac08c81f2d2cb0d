use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::ids::ProjectId;
use crate::error::CanvasError;

/// Kind of a project file entry (wire name `type`)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileKind {
    #[default]
    File,
    Folder,
}

impl FileKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            FileKind::File => "file",
            FileKind::Folder => "folder",
        }
    }
}

/// A single file (or folder marker) embedded in a project.
///
/// `path` is the full logical path and must be unique within a project's
/// file set. Folder/file hierarchy consistency is not enforced: a file may
/// name a parent that has no folder entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectFile {
    pub name: String,
    pub path: String,
    #[serde(default)]
    pub content: String,
    #[serde(rename = "type", default)]
    pub kind: FileKind,
}

impl ProjectFile {
    /// Create a file entry, deriving `name` from the last path segment
    pub fn new(path: impl Into<String>, content: impl Into<String>) -> Self {
        let path = path.into();
        Self {
            name: base_name(&path),
            path,
            content: content.into(),
            kind: FileKind::File,
        }
    }

    /// Create a folder entry
    pub fn folder(path: impl Into<String>) -> Self {
        let path = path.into();
        Self {
            name: base_name(&path),
            path,
            content: String::new(),
            kind: FileKind::Folder,
        }
    }
}

/// Last segment of a logical path ("/src/App.js" -> "App.js")
pub fn base_name(path: &str) -> String {
    path.rsplit('/')
        .find(|seg| !seg.is_empty())
        .unwrap_or(path)
        .to_string()
}

/// A named collection of files plus visibility and ownership metadata.
/// The unit of persistence for the project store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub project_id: ProjectId,
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Insertion order preserved; only meaningful for default-active-file
    /// selection
    #[serde(default)]
    pub files: Vec<ProjectFile>,
    /// None means anonymous/unowned
    #[serde(default)]
    pub owner: Option<String>,
    #[serde(default)]
    pub is_public: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Project {
    /// Create a new project with fresh timestamps and no files
    pub fn new(project_id: ProjectId, name: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            project_id,
            name: name.into(),
            description: String::new(),
            files: Vec::new(),
            owner: None,
            is_public: false,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn with_files(mut self, files: Vec<ProjectFile>) -> Self {
        self.files = files;
        self
    }

    pub fn with_owner(mut self, owner: Option<String>) -> Self {
        self.owner = owner;
        self
    }

    pub fn with_public(mut self, is_public: bool) -> Self {
        self.is_public = is_public;
        self
    }

    /// Validate the document invariants: non-empty name, non-empty unique
    /// file paths. Called at the boundary of every mutating operation.
    pub fn validate(&self) -> Result<(), CanvasError> {
        if self.name.trim().is_empty() {
            return Err(CanvasError::Validation(
                "project name must not be empty".to_string(),
            ));
        }
        validate_paths(&self.files)?;
        Ok(())
    }

    /// Refresh `updated_at`
    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }

    /// Whether the requester may read this project
    pub fn visible_to(&self, requester: Option<&str>) -> bool {
        if self.is_public {
            return true;
        }
        match (requester, self.owner.as_deref()) {
            (Some(user), Some(owner)) => user == owner,
            _ => false,
        }
    }
}

/// Check that no two entries share a path and no path is empty
pub fn validate_paths(files: &[ProjectFile]) -> Result<(), CanvasError> {
    let mut seen = BTreeSet::new();
    for file in files {
        if file.path.is_empty() {
            return Err(CanvasError::Validation(
                "file path must not be empty".to_string(),
            ));
        }
        if !seen.insert(file.path.as_str()) {
            return Err(CanvasError::Validation(format!(
                "duplicate file path: {}",
                file.path
            )));
        }
    }
    Ok(())
}

/// Fields an update may replace wholesale. Absent fields keep their stored
/// value; `project_id`, `owner` and `created_at` are immutable.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectChanges {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub files: Option<Vec<ProjectFile>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_public: Option<bool>,
}

impl ProjectChanges {
    /// Apply the provided fields to a stored project
    pub fn apply_to(&self, project: &mut Project) {
        if let Some(ref name) = self.name {
            project.name = name.clone();
        }
        if let Some(ref description) = self.description {
            project.description = description.clone();
        }
        if let Some(ref files) = self.files {
            project.files = files.clone();
        }
        if let Some(is_public) = self.is_public {
            project.is_public = is_public;
        }
    }
}

/// Summary of a project for list views
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectSummary {
    pub project_id: ProjectId,
    pub name: String,
    pub description: String,
    pub file_count: usize,
    pub is_public: bool,
    pub owner: Option<String>,
    pub updated_at: DateTime<Utc>,
}

impl From<&Project> for ProjectSummary {
    fn from(project: &Project) -> Self {
        Self {
            project_id: project.project_id.clone(),
            name: project.name.clone(),
            description: project.description.clone(),
            file_count: project.files.len(),
            is_public: project.is_public,
            owner: project.owner.clone(),
            updated_at: project.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn project_with(files: Vec<ProjectFile>) -> Project {
        Project::new(ProjectId::generate(), "Test").with_files(files)
    }

    #[test]
    fn test_file_name_from_path() {
        let file = ProjectFile::new("/src/App.js", "code");
        assert_eq!(file.name, "App.js");
        assert_eq!(file.kind, FileKind::File);
    }

    #[test]
    fn test_folder_entry() {
        let folder = ProjectFile::folder("/src");
        assert_eq!(folder.name, "src");
        assert_eq!(folder.kind, FileKind::Folder);
        assert!(folder.content.is_empty());
    }

    #[test]
    fn test_validate_accepts_unique_paths() {
        let project = project_with(vec![
            ProjectFile::new("/App.js", ""),
            ProjectFile::new("/index.js", ""),
        ]);
        assert!(project.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_duplicate_paths() {
        let project = project_with(vec![
            ProjectFile::new("/App.js", "a"),
            ProjectFile::new("/App.js", "b"),
        ]);
        assert!(matches!(
            project.validate(),
            Err(CanvasError::Validation(_))
        ));
    }

    #[test]
    fn test_validate_rejects_empty_name() {
        let mut project = project_with(vec![]);
        project.name = "  ".to_string();
        assert!(project.validate().is_err());
    }

    #[test]
    fn test_visibility() {
        let mut project = project_with(vec![]);
        project.owner = Some("alice".to_string());

        assert!(!project.visible_to(None));
        assert!(!project.visible_to(Some("bob")));
        assert!(project.visible_to(Some("alice")));

        project.is_public = true;
        assert!(project.visible_to(None));
        assert!(project.visible_to(Some("bob")));
    }

    #[test]
    fn test_unowned_private_is_orphaned_not_invalid() {
        let project = project_with(vec![]);
        assert!(project.owner.is_none());
        assert!(!project.is_public);
        assert!(project.validate().is_ok());
        assert!(!project.visible_to(Some("anyone")));
    }

    #[test]
    fn test_changes_apply_wholesale() {
        let mut project = project_with(vec![ProjectFile::new("/App.js", "old")]);
        let created = project.created_at;

        let changes = ProjectChanges {
            name: Some("Renamed".to_string()),
            files: Some(vec![ProjectFile::new("/main.js", "new")]),
            ..Default::default()
        };
        changes.apply_to(&mut project);

        assert_eq!(project.name, "Renamed");
        assert_eq!(project.files.len(), 1);
        assert_eq!(project.files[0].path, "/main.js");
        // description untouched, created_at immutable
        assert_eq!(project.description, "");
        assert_eq!(project.created_at, created);
    }

    #[test]
    fn test_wire_json_is_camel_case() {
        let project = project_with(vec![ProjectFile::new("/App.js", "x")]);
        let json = serde_json::to_value(&project).unwrap();
        assert!(json.get("projectId").is_some());
        assert!(json.get("isPublic").is_some());
        assert!(json.get("createdAt").is_some());
        assert_eq!(json["files"][0]["type"], "file");
    }

    #[test]
    fn test_summary_from_project() {
        let project = project_with(vec![
            ProjectFile::new("/App.js", ""),
            ProjectFile::new("/index.js", ""),
        ]);
        let summary = ProjectSummary::from(&project);
        assert_eq!(summary.file_count, 2);
        assert_eq!(summary.name, "Test");
    }
}
