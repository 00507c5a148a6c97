//! Live settings shared between the presentation side and the capture loop.
//!
//! Writers swap in a whole new `Arc<Settings>`; the capture loop takes one
//! snapshot per iteration and carries it through the frame, so a cycle never
//! sees a viewport from one update and a language from another.

use crate::capture::Viewport;
use crate::defaults;
use crate::language::Language;
use std::sync::{Arc, PoisonError, RwLock};

/// Everything the presentation layer may change while the pipeline runs.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub viewport: Viewport,
    pub source_language: Language,
    pub target_language: Language,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            viewport: Viewport::default(),
            source_language: defaults::SOURCE_LANGUAGE,
            target_language: defaults::TARGET_LANGUAGE,
        }
    }
}

/// Cloneable handle to the latest [`Settings`].
#[derive(Debug, Clone, Default)]
pub struct LiveSettings {
    current: Arc<RwLock<Arc<Settings>>>,
}

impl LiveSettings {
    pub fn new(settings: Settings) -> Self {
        Self {
            current: Arc::new(RwLock::new(Arc::new(settings))),
        }
    }

    /// Returns the settings as of now. Later updates do not affect the snapshot.
    pub fn snapshot(&self) -> Arc<Settings> {
        let guard = self.current.read().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(&guard)
    }

    /// Applies `change` to a copy of the current settings and publishes the copy.
    pub fn update(&self, change: impl FnOnce(&mut Settings)) {
        let mut guard = self.current.write().unwrap_or_else(PoisonError::into_inner);
        let mut next = Settings::clone(&guard);
        change(&mut next);
        *guard = Arc::new(next);
    }

    pub fn set_viewport(&self, viewport: Viewport) {
        self.update(|s| s.viewport = viewport);
    }

    pub fn set_languages(&self, source: Language, target: Language) {
        self.update(|s| {
            s.source_language = source;
            s.target_language = target;
        });
    }
}
