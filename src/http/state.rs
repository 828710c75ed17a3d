use crate::session::SessionStore;

/// Shared application state for HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// Store for saved sessions
    pub store: SessionStore,
}

impl AppState {
    pub fn new(store: SessionStore) -> Self {
        Self { store }
    }
}
