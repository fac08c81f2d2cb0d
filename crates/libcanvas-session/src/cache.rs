//! Local project cache
//!
//! The per-user on-disk analog of the browser's local storage: one `current`
//! entry holding the active project id, and one `project-<id>.json` entry
//! per project holding the full serialized document. Writes are best-effort
//! from the caller's point of view; corrupt or missing entries read as
//! absent.

use std::path::{Path, PathBuf};

use tracing::warn;

use libcanvas_core::{CanvasError, Project, ProjectId};

/// On-disk cache of projects, keyed by project id
pub struct LocalCache {
    root: PathBuf,
}

impl LocalCache {
    /// Open (and create) a cache rooted at the given directory
    pub fn open(root: impl Into<PathBuf>) -> Result<Self, CanvasError> {
        let root = root.into();
        std::fs::create_dir_all(&root)?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn project_path(&self, project_id: &ProjectId) -> PathBuf {
        self.root.join(format!("project-{}.json", project_id))
    }

    fn current_path(&self) -> PathBuf {
        self.root.join("current")
    }

    /// Write a project under its project-scoped key
    pub fn write_project(&self, project: &Project) -> Result<(), CanvasError> {
        let path = self.project_path(&project.project_id);
        let json = serde_json::to_vec_pretty(project)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    /// Read a cached project; missing or corrupt entries come back as None
    pub fn read_project(&self, project_id: &ProjectId) -> Result<Option<Project>, CanvasError> {
        let path = self.project_path(project_id);
        if !path.exists() {
            return Ok(None);
        }
        let bytes = std::fs::read(&path)?;
        match serde_json::from_slice(&bytes) {
            Ok(project) => Ok(Some(project)),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "discarding corrupt cache entry");
                Ok(None)
            }
        }
    }

    /// Remove a cached project; removing an absent entry is not an error
    pub fn remove_project(&self, project_id: &ProjectId) -> Result<(), CanvasError> {
        let path = self.project_path(project_id);
        if path.exists() {
            std::fs::remove_file(path)?;
        }
        if self.current()?.as_ref() == Some(project_id) {
            self.clear_current()?;
        }
        Ok(())
    }

    /// Mark a project as the current one
    pub fn set_current(&self, project_id: &ProjectId) -> Result<(), CanvasError> {
        std::fs::write(self.current_path(), project_id.as_str())?;
        Ok(())
    }

    /// Read the current project id, if any
    pub fn current(&self) -> Result<Option<ProjectId>, CanvasError> {
        let path = self.current_path();
        if !path.exists() {
            return Ok(None);
        }
        let raw = std::fs::read_to_string(&path)?;
        match ProjectId::parse(raw.trim()) {
            Ok(id) => Ok(Some(id)),
            Err(e) => {
                warn!(error = %e, "discarding corrupt current-project entry");
                Ok(None)
            }
        }
    }

    /// Forget the current project marker
    pub fn clear_current(&self) -> Result<(), CanvasError> {
        let path = self.current_path();
        if path.exists() {
            std::fs::remove_file(path)?;
        }
        Ok(())
    }

    /// Ids of every cached project, sorted for deterministic output
    pub fn list(&self) -> Result<Vec<ProjectId>, CanvasError> {
        let mut ids = Vec::new();
        for entry in std::fs::read_dir(&self.root)? {
            let entry = entry?;
            let file_name = entry.file_name();
            let name = file_name.to_string_lossy();
            if let Some(id) = name
                .strip_prefix("project-")
                .and_then(|rest| rest.strip_suffix(".json"))
            {
                match ProjectId::parse(id) {
                    Ok(id) => ids.push(id),
                    Err(_) => continue, // Skip foreign files
                }
            }
        }
        ids.sort();
        Ok(ids)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use libcanvas_core::ProjectFile;
    use tempfile::tempdir;

    fn sample(id: &str) -> Project {
        Project::new(ProjectId::parse(id).unwrap(), "Cached")
            .with_files(vec![ProjectFile::new("/App.js", "code")])
    }

    #[test]
    fn test_write_read_roundtrip() {
        let dir = tempdir().unwrap();
        let cache = LocalCache::open(dir.path()).unwrap();

        let project = sample("p1");
        cache.write_project(&project).unwrap();

        let loaded = cache.read_project(&project.project_id).unwrap().unwrap();
        assert_eq!(loaded, project);
    }

    #[test]
    fn test_read_missing_is_none() {
        let dir = tempdir().unwrap();
        let cache = LocalCache::open(dir.path()).unwrap();
        let loaded = cache
            .read_project(&ProjectId::parse("missing").unwrap())
            .unwrap();
        assert!(loaded.is_none());
    }

    #[test]
    fn test_read_corrupt_is_none() {
        let dir = tempdir().unwrap();
        let cache = LocalCache::open(dir.path()).unwrap();

        std::fs::write(dir.path().join("project-bad.json"), b"{not json").unwrap();
        let loaded = cache
            .read_project(&ProjectId::parse("bad").unwrap())
            .unwrap();
        assert!(loaded.is_none());
    }

    #[test]
    fn test_current_pointer_roundtrip() {
        let dir = tempdir().unwrap();
        let cache = LocalCache::open(dir.path()).unwrap();

        assert!(cache.current().unwrap().is_none());

        let id = ProjectId::parse("p1").unwrap();
        cache.set_current(&id).unwrap();
        assert_eq!(cache.current().unwrap(), Some(id));

        cache.clear_current().unwrap();
        assert!(cache.current().unwrap().is_none());
    }

    #[test]
    fn test_remove_clears_current_when_it_pointed_there() {
        let dir = tempdir().unwrap();
        let cache = LocalCache::open(dir.path()).unwrap();

        let project = sample("p1");
        cache.write_project(&project).unwrap();
        cache.set_current(&project.project_id).unwrap();

        cache.remove_project(&project.project_id).unwrap();
        assert!(cache.read_project(&project.project_id).unwrap().is_none());
        assert!(cache.current().unwrap().is_none());
    }

    #[test]
    fn test_list_finds_cached_projects_only() {
        let dir = tempdir().unwrap();
        let cache = LocalCache::open(dir.path()).unwrap();

        cache.write_project(&sample("beta")).unwrap();
        cache.write_project(&sample("alpha")).unwrap();
        std::fs::write(dir.path().join("unrelated.txt"), b"ignore me").unwrap();

        let ids = cache.list().unwrap();
        let names: Vec<&str> = ids.iter().map(|id| id.as_str()).collect();
        assert_eq!(names, vec!["alpha", "beta"]);
    }
}
