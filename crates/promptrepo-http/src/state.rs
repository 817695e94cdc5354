//! Shared state for the HTTP server.
//!
//! Wraps the `PromptStore` so every handler works on the same document.

use promptrepo_core::PromptStore;
use std::sync::Arc;

/// Shared state available to all HTTP handlers.
#[derive(Clone)]
pub struct SharedState {
    /// The store holding the document.
    pub store: Arc<PromptStore>,
}

impl SharedState {
    /// Create a new shared state around an opened store.
    pub fn new(store: Arc<PromptStore>) -> Self {
        Self { store }
    }
}
