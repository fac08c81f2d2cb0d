//! Session service
//!
//! Owns the session plus its two persistence paths (the local cache and the
//! optional remote store) and routes every file-mapping mutation through the
//! debounced autosaver. This is the explicitly constructed state object that
//! replaces the ambient context of the original frontend: built on open,
//! torn down (with a final flush) on close.

use tokio::sync::mpsc;
use tracing::{debug, warn};

use libcanvas_api::{ApiClient, ApiError, CreateProjectRequest};
use libcanvas_core::{
    CanvasError, Project, ProjectChanges, ProjectId, RemotePersist, SessionConfig,
};

use crate::autosave::{Autosaver, SaveTick};
use crate::cache::LocalCache;
use crate::session::Session;

/// One open project with its persistence plumbing
pub struct SessionService {
    session: Session,
    cache: LocalCache,
    config: SessionConfig,
    autosaver: Autosaver,
    ticks: mpsc::UnboundedReceiver<SaveTick>,
    client: Option<ApiClient>,
    save_count: u64,
}

impl SessionService {
    /// Start a fresh session from the default template. The new project is
    /// written to the cache and marked current immediately.
    pub fn create(config: SessionConfig, name: impl Into<String>) -> Result<Self, CanvasError> {
        let cache = LocalCache::open(config.resolve_cache_dir()?)?;
        let session = Session::new(name);
        let service = Self::assemble(config, cache, session);

        let snapshot = service.session.snapshot();
        service.write_cache_best_effort(&snapshot);
        if let Err(e) = service.cache.set_current(service.session.project_id()) {
            warn!(error = %e, "failed to mark new project current");
        }
        Ok(service)
    }

    /// Restore a session from the local cache only. Ok(None) when there is
    /// no cached copy; callers fall back to [`SessionService::create`].
    pub fn load(config: SessionConfig, project_id: &ProjectId) -> Result<Option<Self>, CanvasError> {
        let cache = LocalCache::open(config.resolve_cache_dir()?)?;
        let Some(project) = cache.read_project(project_id)? else {
            return Ok(None);
        };
        let session = Session::from_project(project)?;
        let service = Self::assemble(config, cache, session);
        if let Err(e) = service.cache.set_current(project_id) {
            warn!(error = %e, "failed to mark loaded project current");
        }
        Ok(Some(service))
    }

    /// Open a session for a project obtained out of band (share links,
    /// remote fetches); cached and marked current like a fresh creation
    pub fn import(config: SessionConfig, project: Project) -> Result<Self, CanvasError> {
        let cache = LocalCache::open(config.resolve_cache_dir()?)?;
        let session = Session::from_project(project)?;
        let service = Self::assemble(config, cache, session);

        let snapshot = service.session.snapshot();
        service.write_cache_best_effort(&snapshot);
        if let Err(e) = service.cache.set_current(service.session.project_id()) {
            warn!(error = %e, "failed to mark imported project current");
        }
        Ok(service)
    }

    /// Restore whatever project the cache marks current
    pub fn open_current(config: SessionConfig) -> Result<Option<Self>, CanvasError> {
        let cache = LocalCache::open(config.resolve_cache_dir()?)?;
        match cache.current()? {
            Some(project_id) => Self::load(config, &project_id),
            None => Ok(None),
        }
    }

    /// Fetch a project from the remote store, overwrite the cached copy
    /// (last writer wins) and open it
    pub async fn pull(config: SessionConfig, project_id: &ProjectId) -> Result<Self, CanvasError> {
        let api_url = config
            .api_url
            .clone()
            .ok_or_else(|| CanvasError::InvalidArgs("no API URL configured".to_string()))?;
        let client = ApiClient::new(&api_url)
            .map_err(|e| CanvasError::InvalidArgs(format!("bad API URL: {}", e)))?;

        let project = client.get(project_id).await.map_err(api_to_canvas)?;

        let cache = LocalCache::open(config.resolve_cache_dir()?)?;
        cache.write_project(&project)?;
        cache.set_current(project_id)?;

        let session = Session::from_project(project)?;
        Ok(Self::assemble(config, cache, session))
    }

    fn assemble(config: SessionConfig, cache: LocalCache, session: Session) -> Self {
        let (autosaver, ticks) = Autosaver::new(config.debounce());
        let client = config.api_url.as_deref().and_then(|url| {
            match ApiClient::new(url) {
                Ok(client) => Some(client),
                Err(e) => {
                    warn!(url, error = %e, "ignoring unusable API URL");
                    None
                }
            }
        });
        Self {
            session,
            cache,
            config,
            autosaver,
            ticks,
            client,
            save_count: 0,
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn cache(&self) -> &LocalCache {
        &self.cache
    }

    /// Number of completed saves this session
    pub fn save_count(&self) -> u64 {
        self.save_count
    }

    /// Whether a debounced save is pending
    pub fn autosave_armed(&self) -> bool {
        self.autosaver.is_armed()
    }

    /// Replace a file's content
    pub fn update_file(
        &mut self,
        path: &str,
        content: impl Into<String>,
    ) -> Result<(), CanvasError> {
        self.session.update_file(path, content)?;
        self.mutated();
        Ok(())
    }

    /// Add a file; it becomes the active file
    pub fn create_file(
        &mut self,
        path: &str,
        content: impl Into<String>,
    ) -> Result<(), CanvasError> {
        self.session.create_file(path, content)?;
        self.mutated();
        Ok(())
    }

    /// Remove a file
    pub fn delete_file(&mut self, path: &str) -> Result<(), CanvasError> {
        self.session.delete_file(path)?;
        self.mutated();
        Ok(())
    }

    /// Re-key a file
    pub fn rename_file(&mut self, old_path: &str, new_path: &str) -> Result<(), CanvasError> {
        self.session.rename_file(old_path, new_path)?;
        self.mutated();
        Ok(())
    }

    /// Move the active pointer. Not a file-mapping change, so the autosave
    /// timer is left alone.
    pub fn set_active(&mut self, path: &str) -> Result<(), CanvasError> {
        self.session.set_active(path)
    }

    /// Rename the project. Picked up by the next save.
    pub fn set_name(&mut self, name: impl Into<String>) {
        self.session.set_name(name);
    }

    fn mutated(&mut self) {
        if self.config.autosave {
            self.autosaver.touch();
        }
    }

    /// Serialize to the cache under the project-scoped key and refresh the
    /// in-memory timestamp. Cache failures are diagnostics, not errors.
    pub fn save(&mut self) {
        self.session.touch();
        let snapshot = self.session.snapshot();
        self.write_cache_best_effort(&snapshot);
        self.save_count += 1;
        debug!(project = %snapshot.project_id, saves = self.save_count, "session saved");
    }

    fn write_cache_best_effort(&self, project: &Project) {
        if let Err(e) = self.cache.write_project(project) {
            warn!(error = %e, "local cache write failed; changes remain in memory only");
        }
    }

    /// Wait for the next autosave tick and perform the save. Returns false
    /// once the timer channel is closed.
    pub async fn run_autosave_once(&mut self) -> bool {
        match self.ticks.recv().await {
            Some(SaveTick) => {
                self.autosave_save().await;
                true
            }
            None => false,
        }
    }

    async fn autosave_save(&mut self) {
        self.save();
        if self.config.remote == RemotePersist::Autosave {
            if let Err(e) = self.push().await {
                warn!(error = %e, "remote autosave failed");
            }
        }
    }

    /// Explicit push to the remote store: wholesale update, falling back to
    /// create when the server does not know the project yet
    pub async fn push(&mut self) -> Result<Project, CanvasError> {
        let client = self
            .client
            .as_ref()
            .ok_or_else(|| CanvasError::InvalidArgs("no API URL configured".to_string()))?;

        let snapshot = self.session.snapshot();
        let changes = ProjectChanges {
            name: Some(snapshot.name.clone()),
            description: Some(snapshot.description.clone()),
            files: Some(snapshot.files.clone()),
            is_public: Some(snapshot.is_public),
        };

        match client.update(&snapshot.project_id, &changes).await {
            Ok(updated) => Ok(updated),
            Err(ApiError::NotFound(_)) => client
                .create(&CreateProjectRequest::from_project(&snapshot))
                .await
                .map_err(api_to_canvas),
            Err(e) => Err(api_to_canvas(e)),
        }
    }

    /// Tear the session down: any pending debounced save is flushed into one
    /// final save before the timer is dropped
    pub async fn close(mut self) {
        self.autosaver.flush();
        let mut pending = false;
        while self.ticks.try_recv().is_ok() {
            pending = true;
        }
        if pending {
            self.autosave_save().await;
        }
    }
}

/// Fold client-side API errors back into the core taxonomy
pub fn api_to_canvas(error: ApiError) -> CanvasError {
    match error {
        ApiError::NotFound(m) => CanvasError::NotFound(m),
        ApiError::Conflict(m) => CanvasError::Conflict(m),
        ApiError::StoreUnavailable(m) => CanvasError::StoreUnavailable(m),
        other => CanvasError::Internal(other.to_string()),
    }
}
