use crate::error::{OcrTransError, Result};
use crate::language::Language;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

/// Trait for text translation services.
///
/// This trait allows swapping implementations (Google vs mock vs closure).
/// Calls are synchronous and may block on the network.
pub trait Translator: Send + Sync {
    /// Translate one line of text.
    fn translate(&self, text: &str, from: Language, to: Language) -> Result<String>;

    /// Name for logging/debugging.
    fn name(&self) -> &str {
        "translator"
    }
}

/// Any `Fn(text, from, to)` is a translator.
impl<F> Translator for F
where
    F: Fn(&str, Language, Language) -> Result<String> + Send + Sync,
{
    fn translate(&self, text: &str, from: Language, to: Language) -> Result<String> {
        self(text, from, to)
    }

    fn name(&self) -> &str {
        "closure"
    }
}

/// Mock translator for testing.
///
/// Answers from a fixed map; unmapped input is echoed back in brackets.
#[derive(Debug, Clone, Default)]
pub struct MockTranslator {
    responses: HashMap<String, String>,
    failing: Vec<String>,
    fail_all: bool,
    calls: Arc<AtomicUsize>,
    requests: Arc<Mutex<Vec<(String, Language, Language)>>>,
}

impl MockTranslator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Configure the translation returned for `text`.
    pub fn with_response(mut self, text: &str, translated: &str) -> Self {
        self.responses
            .insert(text.to_string(), translated.to_string());
        self
    }

    /// Configure calls with exactly `text` to fail.
    pub fn with_failure_on(mut self, text: &str) -> Self {
        self.failing.push(text.to_string());
        self
    }

    /// Configure every call to fail.
    pub fn with_failure(mut self) -> Self {
        self.fail_all = true;
        self
    }

    /// Shared counter of `translate` calls.
    pub fn call_counter(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.calls)
    }

    /// Every request seen so far, in call order.
    pub fn requests(&self) -> Vec<(String, Language, Language)> {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl Translator for MockTranslator {
    fn translate(&self, text: &str, from: Language, to: Language) -> Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push((text.to_string(), from, to));

        if self.fail_all || self.failing.iter().any(|f| f == text) {
            return Err(OcrTransError::Translation {
                message: "mock translation failure".to_string(),
            });
        }
        Ok(self
            .responses
            .get(text)
            .cloned()
            .unwrap_or_else(|| format!("[{}] {}", to, text)))
    }

    fn name(&self) -> &str {
        "mock"
    }
}
