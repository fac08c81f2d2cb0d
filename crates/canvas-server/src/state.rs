//! Shared server state

use std::sync::Arc;

use libcanvas_core::LockedStore;

/// State shared by every request handler.
///
/// `store` is None when the startup open failed in non-strict mode; the
/// service then runs degraded: reads are attempted and fail, mutating verbs
/// are rejected with 503 before reaching a handler body.
#[derive(Clone)]
pub struct AppState {
    pub store: Option<Arc<LockedStore>>,
}

impl AppState {
    pub fn new(store: Option<LockedStore>) -> Self {
        Self {
            store: store.map(Arc::new),
        }
    }

    pub fn store_connected(&self) -> bool {
        self.store.is_some()
    }
}
