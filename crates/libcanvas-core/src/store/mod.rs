//! Project document store
//!
//! Sled-backed persistence for projects. A single tree maps project id to
//! the serialized document; whole-document writes are the unit of atomicity,
//! which is the only consistency guarantee the service offers.

use std::fs::File;
use std::path::Path;
use std::time::{Duration, Instant};

use chrono::Utc;
use fs2::FileExt;

use crate::error::CanvasError;
use crate::types::ids::ProjectId;
use crate::types::project::{Project, ProjectChanges};

/// A ProjectStore with filesystem-level exclusive lock.
///
/// The lock is held for the lifetime of this struct and automatically
/// released when dropped. This prevents multiple processes from opening
/// the same sled database concurrently.
pub struct LockedStore {
    /// Lock file handle - flock released on drop
    _lock_file: File,
    /// The underlying store
    store: ProjectStore,
}

impl std::fmt::Debug for LockedStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LockedStore")
            .field("store", &"ProjectStore { ... }")
            .finish()
    }
}

impl LockedStore {
    /// Get a reference to the inner ProjectStore
    pub fn inner(&self) -> &ProjectStore {
        &self.store
    }
}

impl std::ops::Deref for LockedStore {
    type Target = ProjectStore;

    fn deref(&self) -> &Self::Target {
        &self.store
    }
}

impl std::ops::DerefMut for LockedStore {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.store
    }
}

/// Main storage interface backed by sled
pub struct ProjectStore {
    db: sled::Db,
    projects: sled::Tree,
}

impl ProjectStore {
    /// Open or create a store at the given path
    pub fn open(path: &Path) -> Result<Self, CanvasError> {
        let db = sled::open(path)?;
        let projects = db.open_tree("projects")?;
        Ok(Self { db, projects })
    }

    /// Open store with exclusive filesystem lock (non-blocking).
    ///
    /// Lock file is created at `<path>.lock`. Returns
    /// `CanvasError::StoreUnavailable` if another process holds the lock.
    pub fn open_locked(path: &Path) -> Result<LockedStore, CanvasError> {
        let lock_path = path.with_extension("lock");
        if let Some(parent) = lock_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let lock_file = File::create(&lock_path)?;

        lock_file.try_lock_exclusive().map_err(|e| {
            CanvasError::StoreUnavailable(format!("store locked by another process: {}", e))
        })?;

        let store = Self::open(path)?;

        Ok(LockedStore {
            _lock_file: lock_file,
            store,
        })
    }

    /// Open store with exclusive filesystem lock (blocking with timeout).
    ///
    /// Retries with exponential backoff until the lock is acquired or the
    /// timeout expires.
    pub fn open_locked_blocking(
        path: &Path,
        timeout: Duration,
    ) -> Result<LockedStore, CanvasError> {
        let lock_path = path.with_extension("lock");
        if let Some(parent) = lock_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let lock_file = File::create(&lock_path)?;

        let start = Instant::now();
        let mut delay = Duration::from_millis(10);

        loop {
            match lock_file.try_lock_exclusive() {
                Ok(()) => break,
                Err(_) if start.elapsed() < timeout => {
                    std::thread::sleep(delay);
                    delay = (delay * 2).min(Duration::from_millis(200));
                }
                Err(e) => {
                    return Err(CanvasError::StoreUnavailable(format!(
                        "timeout waiting for store lock: {}",
                        e
                    )))
                }
            }
        }

        let store = Self::open(path)?;
        Ok(LockedStore {
            _lock_file: lock_file,
            store,
        })
    }

    /// Persist a new project.
    ///
    /// Rejects with a conflict if the id is already taken, leaving the
    /// existing document untouched. Timestamps are server-assigned here
    /// regardless of what the candidate carries.
    pub fn create(&self, candidate: &Project) -> Result<Project, CanvasError> {
        candidate.validate()?;

        let key = project_key(&candidate.project_id);
        if self.projects.contains_key(&key)? {
            return Err(CanvasError::duplicate_project(
                candidate.project_id.as_str(),
            ));
        }

        let now = Utc::now();
        let mut stored = candidate.clone();
        stored.created_at = now;
        stored.updated_at = now;

        self.projects.insert(&key, serde_json::to_vec(&stored)?)?;
        Ok(stored)
    }

    /// Fetch a project by id
    pub fn get(&self, project_id: &ProjectId) -> Result<Option<Project>, CanvasError> {
        let key = project_key(project_id);
        match self.projects.get(&key)? {
            Some(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            None => Ok(None),
        }
    }

    /// Replace the mutable fields of an existing project wholesale and
    /// refresh `updated_at`
    pub fn update(
        &self,
        project_id: &ProjectId,
        changes: &ProjectChanges,
    ) -> Result<Project, CanvasError> {
        let mut project = self
            .get(project_id)?
            .ok_or_else(|| CanvasError::project_not_found(project_id.as_str()))?;

        changes.apply_to(&mut project);
        project.validate()?;
        project.touch();

        let key = project_key(project_id);
        self.projects.insert(&key, serde_json::to_vec(&project)?)?;
        Ok(project)
    }

    /// Remove a project, returning the removed document
    pub fn delete(&self, project_id: &ProjectId) -> Result<Project, CanvasError> {
        let key = project_key(project_id);
        match self.projects.remove(&key)? {
            Some(bytes) => Ok(serde_json::from_slice(&bytes)?),
            None => Err(CanvasError::project_not_found(project_id.as_str())),
        }
    }

    /// List projects visible to the requester, most recently updated first.
    ///
    /// Without a requester only public projects are returned; with one, that
    /// requester's own projects are included as well. Unbounded by design.
    pub fn list(&self, requester: Option<&str>) -> Result<Vec<Project>, CanvasError> {
        let mut visible = Vec::new();

        for result in self.projects.iter() {
            let (_, value) = result?;
            let project: Project = serde_json::from_slice(&value)?;
            if project.visible_to(requester) {
                visible.push(project);
            }
        }

        visible.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        Ok(visible)
    }

    /// Number of stored projects (all visibilities)
    pub fn count(&self) -> usize {
        self.projects.len()
    }

    /// Flush dirty buffers to disk
    pub fn flush(&self) -> Result<(), CanvasError> {
        self.db.flush()?;
        Ok(())
    }
}

fn project_key(project_id: &ProjectId) -> Vec<u8> {
    project_id.as_str().as_bytes().to_vec()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::project::ProjectFile;
    use tempfile::tempdir;

    fn sample(id: &str, name: &str) -> Project {
        Project::new(ProjectId::parse(id).unwrap(), name)
            .with_files(vec![ProjectFile::new("/App.js", "export default 1;")])
    }

    #[test]
    fn test_create_and_get_roundtrip() {
        let dir = tempdir().unwrap();
        let store = ProjectStore::open(dir.path()).unwrap();

        let stored = store.create(&sample("p1", "First")).unwrap();
        let fetched = store.get(&stored.project_id).unwrap().unwrap();

        assert_eq!(fetched, stored);
        assert_eq!(fetched.files.len(), 1);
    }

    #[test]
    fn test_create_duplicate_is_conflict_and_keeps_original() {
        let dir = tempdir().unwrap();
        let store = ProjectStore::open(dir.path()).unwrap();

        store.create(&sample("p1", "Original")).unwrap();
        let result = store.create(&sample("p1", "Imposter"));

        assert!(matches!(result, Err(CanvasError::Conflict(_))));
        let kept = store
            .get(&ProjectId::parse("p1").unwrap())
            .unwrap()
            .unwrap();
        assert_eq!(kept.name, "Original");
        assert_eq!(store.count(), 1);
    }

    #[test]
    fn test_create_assigns_server_timestamps() {
        let dir = tempdir().unwrap();
        let store = ProjectStore::open(dir.path()).unwrap();

        let mut candidate = sample("p1", "First");
        candidate.created_at = chrono::DateTime::UNIX_EPOCH;
        candidate.updated_at = chrono::DateTime::UNIX_EPOCH;

        let stored = store.create(&candidate).unwrap();
        assert!(stored.created_at > chrono::DateTime::UNIX_EPOCH);
        assert_eq!(stored.created_at, stored.updated_at);
    }

    #[test]
    fn test_update_replaces_fields_and_refreshes_timestamp() {
        let dir = tempdir().unwrap();
        let store = ProjectStore::open(dir.path()).unwrap();

        let stored = store.create(&sample("p1", "First")).unwrap();
        std::thread::sleep(Duration::from_millis(5));

        let changes = ProjectChanges {
            name: Some("Second".to_string()),
            files: Some(vec![ProjectFile::new("/main.js", "x")]),
            is_public: Some(true),
            ..Default::default()
        };
        let updated = store.update(&stored.project_id, &changes).unwrap();

        assert_eq!(updated.name, "Second");
        assert_eq!(updated.files[0].path, "/main.js");
        assert!(updated.is_public);
        assert!(updated.updated_at > stored.updated_at);
        assert_eq!(updated.created_at, stored.created_at);
    }

    #[test]
    fn test_update_unknown_is_not_found() {
        let dir = tempdir().unwrap();
        let store = ProjectStore::open(dir.path()).unwrap();

        let result = store.update(
            &ProjectId::parse("missing").unwrap(),
            &ProjectChanges::default(),
        );
        assert!(matches!(result, Err(CanvasError::NotFound(_))));
    }

    #[test]
    fn test_update_rejects_duplicate_paths() {
        let dir = tempdir().unwrap();
        let store = ProjectStore::open(dir.path()).unwrap();

        let stored = store.create(&sample("p1", "First")).unwrap();
        let changes = ProjectChanges {
            files: Some(vec![
                ProjectFile::new("/a.js", "1"),
                ProjectFile::new("/a.js", "2"),
            ]),
            ..Default::default()
        };

        let result = store.update(&stored.project_id, &changes);
        assert!(matches!(result, Err(CanvasError::Validation(_))));
        // stored document unchanged
        let kept = store.get(&stored.project_id).unwrap().unwrap();
        assert_eq!(kept.files[0].path, "/App.js");
    }

    #[test]
    fn test_delete_removes_document() {
        let dir = tempdir().unwrap();
        let store = ProjectStore::open(dir.path()).unwrap();

        let stored = store.create(&sample("p1", "First")).unwrap();
        let removed = store.delete(&stored.project_id).unwrap();

        assert_eq!(removed.project_id, stored.project_id);
        assert!(store.get(&stored.project_id).unwrap().is_none());
        assert_eq!(store.count(), 0);
    }

    #[test]
    fn test_delete_unknown_is_not_found_and_collection_unchanged() {
        let dir = tempdir().unwrap();
        let store = ProjectStore::open(dir.path()).unwrap();

        store.create(&sample("p1", "First")).unwrap();
        let result = store.delete(&ProjectId::parse("missing").unwrap());

        assert!(matches!(result, Err(CanvasError::NotFound(_))));
        assert_eq!(store.count(), 1);
    }

    #[test]
    fn test_list_visibility_rules() {
        let dir = tempdir().unwrap();
        let store = ProjectStore::open(dir.path()).unwrap();

        store
            .create(&sample("pub", "Public").with_public(true))
            .unwrap();
        store
            .create(&sample("alice-priv", "Alice").with_owner(Some("alice".into())))
            .unwrap();
        store
            .create(&sample("bob-priv", "Bob").with_owner(Some("bob".into())))
            .unwrap();
        store.create(&sample("orphan", "Orphan")).unwrap();

        // Anonymous: public only
        let anon = store.list(None).unwrap();
        assert_eq!(anon.len(), 1);
        assert_eq!(anon[0].project_id.as_str(), "pub");

        // Alice: public plus her own, never Bob's
        let alice = store.list(Some("alice")).unwrap();
        let ids: Vec<&str> = alice.iter().map(|p| p.project_id.as_str()).collect();
        assert_eq!(alice.len(), 2);
        assert!(ids.contains(&"pub"));
        assert!(ids.contains(&"alice-priv"));
        assert!(!ids.contains(&"bob-priv"));
        assert!(!ids.contains(&"orphan"));
    }

    #[test]
    fn test_list_orders_most_recently_updated_first() {
        let dir = tempdir().unwrap();
        let store = ProjectStore::open(dir.path()).unwrap();

        store
            .create(&sample("old", "Old").with_public(true))
            .unwrap();
        std::thread::sleep(Duration::from_millis(5));
        store
            .create(&sample("new", "New").with_public(true))
            .unwrap();
        std::thread::sleep(Duration::from_millis(5));

        // Touching "old" moves it back to the front
        store
            .update(
                &ProjectId::parse("old").unwrap(),
                &ProjectChanges {
                    description: Some("touched".to_string()),
                    ..Default::default()
                },
            )
            .unwrap();

        let listed = store.list(None).unwrap();
        let ids: Vec<&str> = listed.iter().map(|p| p.project_id.as_str()).collect();
        assert_eq!(ids, vec!["old", "new"]);
    }

    #[test]
    fn test_open_locked_excludes_second_opener() {
        let dir = tempdir().unwrap();
        let sled_path = dir.path().join("store");

        let _first = ProjectStore::open_locked(&sled_path).unwrap();
        let second = ProjectStore::open_locked(&sled_path);
        assert!(matches!(second, Err(CanvasError::StoreUnavailable(_))));
    }

    #[test]
    fn test_persistence_across_reopen() {
        let dir = tempdir().unwrap();

        {
            let store = ProjectStore::open(dir.path()).unwrap();
            store.create(&sample("p1", "Durable")).unwrap();
            store.flush().unwrap();
        }

        let store = ProjectStore::open(dir.path()).unwrap();
        let fetched = store
            .get(&ProjectId::parse("p1").unwrap())
            .unwrap()
            .unwrap();
        assert_eq!(fetched.name, "Durable");
    }
}
