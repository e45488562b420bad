//! Shared, swappable configuration.

use std::sync::Arc;

use parking_lot::RwLock;
use tracing::info;

use crate::config::{Config, ConfigUpdate};

/// Cloneable handle to the live configuration.
///
/// Readers take an immutable snapshot; writers build a new [`Config`] and swap
/// it in, so a reader never observes half of a multi-field update.
#[derive(Debug, Clone)]
pub struct ConfigStore {
    current: Arc<RwLock<Arc<Config>>>,
}

impl ConfigStore {
    /// Creates a store holding `config`.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            current: Arc::new(RwLock::new(Arc::new(config))),
        }
    }

    /// The configuration as of now.
    #[must_use]
    pub fn snapshot(&self) -> Arc<Config> {
        Arc::clone(&*self.current.read())
    }

    /// Applies `update` and returns the resulting snapshot.
    ///
    /// Concurrent updates are serialized; the last one wins field by field.
    pub fn update(&self, update: &ConfigUpdate) -> Arc<Config> {
        let mut guard = self.current.write();
        let next = Arc::new(guard.apply(update));
        *guard = Arc::clone(&next);
        drop(guard);

        info!(
            mode = %next.mode,
            style = %next.teaching_style,
            course = %next.course_name,
            "Configuration updated"
        );
        next
    }
}

impl Default for ConfigStore {
    fn default() -> Self {
        Self::new(Config::default())
    }
}
