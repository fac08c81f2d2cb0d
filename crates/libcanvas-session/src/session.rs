//! In-memory editing session
//!
//! An explicitly constructed working copy of one project: a keyed file
//! mapping plus the active-file pointer. Mutations here never persist by
//! themselves; persistence is layered on by the session service.

use std::collections::BTreeMap;

use libcanvas_core::template::{default_files, DEFAULT_ACTIVE_PATH};
use libcanvas_core::{CanvasError, Project, ProjectFile, ProjectId};

/// Working copy of one project.
///
/// Invariant: `active_file` always names a key present in the mapping, or
/// the fixed default path when the mapping is empty.
pub struct Session {
    /// Project metadata; its embedded file list is materialized only by
    /// [`Session::snapshot`]
    meta: Project,
    files: BTreeMap<String, ProjectFile>,
    active_file: String,
}

impl Session {
    /// Create a session from the fixed default template with a fresh
    /// project id
    pub fn new(name: impl Into<String>) -> Self {
        let mut files = BTreeMap::new();
        for file in default_files() {
            files.insert(file.path.clone(), file);
        }
        let meta = Project::new(ProjectId::generate(), name);
        Self {
            meta,
            files,
            active_file: DEFAULT_ACTIVE_PATH.to_string(),
        }
    }

    /// Restore a session from a stored project.
    ///
    /// The active pointer starts on the first file of the mapping, or the
    /// fixed default when the project has none.
    pub fn from_project(project: Project) -> Result<Self, CanvasError> {
        project.validate()?;

        let mut meta = project;
        let mut files = BTreeMap::new();
        for file in std::mem::take(&mut meta.files) {
            files.insert(file.path.clone(), file);
        }

        let active_file = first_path(&files);
        Ok(Self {
            meta,
            files,
            active_file,
        })
    }

    /// Materialize the current state as a project document
    pub fn snapshot(&self) -> Project {
        let mut project = self.meta.clone();
        project.files = self.files.values().cloned().collect();
        project
    }

    pub fn project_id(&self) -> &ProjectId {
        &self.meta.project_id
    }

    pub fn name(&self) -> &str {
        &self.meta.name
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.meta.name = name.into();
    }

    pub fn active_file(&self) -> &str {
        &self.active_file
    }

    pub fn file(&self, path: &str) -> Option<&ProjectFile> {
        self.files.get(path)
    }

    /// File entries in key order
    pub fn files(&self) -> impl Iterator<Item = &ProjectFile> {
        self.files.values()
    }

    pub fn file_count(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Point the editor at an existing file
    pub fn set_active(&mut self, path: &str) -> Result<(), CanvasError> {
        if !self.files.contains_key(path) {
            return Err(CanvasError::NotFound(format!("no such file: {}", path)));
        }
        self.active_file = path.to_string();
        Ok(())
    }

    /// Replace the content of an existing file
    pub fn update_file(&mut self, path: &str, content: impl Into<String>) -> Result<(), CanvasError> {
        match self.files.get_mut(path) {
            Some(file) => {
                file.content = content.into();
                Ok(())
            }
            None => Err(CanvasError::NotFound(format!("no such file: {}", path))),
        }
    }

    /// Insert a new file; it becomes the active file
    pub fn create_file(&mut self, path: &str, content: impl Into<String>) -> Result<(), CanvasError> {
        if path.is_empty() {
            return Err(CanvasError::Validation(
                "file path must not be empty".to_string(),
            ));
        }
        if self.files.contains_key(path) {
            return Err(CanvasError::Conflict(format!(
                "file already exists: {}",
                path
            )));
        }
        self.files
            .insert(path.to_string(), ProjectFile::new(path, content));
        self.active_file = path.to_string();
        Ok(())
    }

    /// Remove a file; a removed active file hands the pointer to a
    /// remaining file, or the fixed default when none remain
    pub fn delete_file(&mut self, path: &str) -> Result<(), CanvasError> {
        if self.files.remove(path).is_none() {
            return Err(CanvasError::NotFound(format!("no such file: {}", path)));
        }
        if self.active_file == path {
            self.active_file = first_path(&self.files);
        }
        Ok(())
    }

    /// Re-key a file preserving its content; the active pointer follows
    pub fn rename_file(&mut self, old_path: &str, new_path: &str) -> Result<(), CanvasError> {
        if new_path.is_empty() {
            return Err(CanvasError::Validation(
                "file path must not be empty".to_string(),
            ));
        }
        if self.files.contains_key(new_path) {
            return Err(CanvasError::Conflict(format!(
                "file already exists: {}",
                new_path
            )));
        }
        let mut file = self
            .files
            .remove(old_path)
            .ok_or_else(|| CanvasError::NotFound(format!("no such file: {}", old_path)))?;

        file.path = new_path.to_string();
        file.name = libcanvas_core::types::project::base_name(new_path);
        self.files.insert(new_path.to_string(), file);

        if self.active_file == old_path {
            self.active_file = new_path.to_string();
        }
        Ok(())
    }

    /// Refresh the metadata timestamp; called on save
    pub fn touch(&mut self) {
        self.meta.touch();
    }

    /// Whether the active pointer refers to a present file (or the default
    /// on an empty mapping)
    pub fn active_pointer_valid(&self) -> bool {
        if self.files.is_empty() {
            self.active_file == DEFAULT_ACTIVE_PATH
        } else {
            self.files.contains_key(&self.active_file)
        }
    }
}

/// First path in key order, or the fixed default for an empty mapping
fn first_path(files: &BTreeMap<String, ProjectFile>) -> String {
    files
        .keys()
        .next()
        .cloned()
        .unwrap_or_else(|| DEFAULT_ACTIVE_PATH.to_string())
}
