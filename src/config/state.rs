// Application state module
// Shared, read-only state handed to every connection

use std::sync::Arc;

use super::types::Config;
use crate::store::BookStore;

/// Application state
pub struct AppState {
    pub config: Config,
    /// Process-wide store handle; the backend handles its own pooling
    pub store: Arc<dyn BookStore>,
}

impl AppState {
    pub fn new(config: Config, store: Arc<dyn BookStore>) -> Self {
        Self { config, store }
    }
}
