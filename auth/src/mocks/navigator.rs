//! Navigator that records commands instead of performing them.

use crate::providers::{Navigation, Navigator};
use std::sync::{Arc, Mutex, PoisonError};

/// Records every navigation command in order.
#[derive(Debug, Clone, Default)]
pub struct RecordingNavigator {
    navigations: Arc<Mutex<Vec<Navigation>>>,
}

impl RecordingNavigator {
    /// Create an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Every command received so far.
    #[must_use]
    pub fn navigations(&self) -> Vec<Navigation> {
        self.navigations
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Number of commands received so far.
    #[must_use]
    pub fn count(&self) -> usize {
        self.navigations
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

impl Navigator for RecordingNavigator {
    fn navigate(&self, to: Navigation) {
        self.navigations
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(to);
    }
}
