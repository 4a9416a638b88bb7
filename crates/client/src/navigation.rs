//! Full-page navigation seam.

use std::sync::{Arc, Mutex, PoisonError};

/// Performs a full-page redirect: the current view is abandoned.
pub trait Navigator: Send + Sync {
    fn redirect(&self, path: &str);
}

/// Navigator that only records where it was sent.
///
/// Used by headless front ends (the CLI) and tests.
#[derive(Debug, Clone, Default)]
pub struct MemoryNavigator {
    history: Arc<Mutex<Vec<String>>>,
}

impl MemoryNavigator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn redirects(&self) -> Vec<String> {
        self.history
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl Navigator for MemoryNavigator {
    fn redirect(&self, path: &str) {
        tracing::debug!(path, "redirect");
        self.history
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(path.to_string());
    }
}
