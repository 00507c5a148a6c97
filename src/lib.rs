//! ocrtrans - Live screen-region OCR with line-by-line translation
//!
//! Captures a rectangle of the screen, reconstructs the recognized text as a
//! block/paragraph/line/word tree, and translates it line by line.

#![warn(clippy::unwrap_used)]
#![warn(clippy::expect_used)]
#![warn(clippy::let_underscore_must_use)]

pub mod capture;
#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod defaults;
pub mod error;
pub mod language;
pub mod ocr;
pub mod output;
pub mod pipeline;
pub mod settings;
pub mod translate;

// Composition root - needs every real backend
#[cfg(all(
    feature = "screen",
    feature = "tesseract",
    feature = "google",
    feature = "cli"
))]
pub mod app;

// Core seams (screen → recognize → translate → sink)
pub use capture::{Frame, ScreenAccess, Viewport};
pub use ocr::{Document, DocumentBuilder, PageCursor, RecognitionEngine};
pub use pipeline::sink::{CollectorSink, ResultSink, StdoutSink};
pub use translate::{TranslationStage, Translator};

// Pipeline
pub use pipeline::orchestrator::{Pipeline, PipelineConfig, PipelineHandle};
pub use pipeline::types::CombinedResult;

// Error handling
pub use error::{OcrTransError, Result};
pub use pipeline::error::{ErrorReporter, StageError};

// Config
pub use config::Config;
pub use language::Language;
pub use settings::{LiveSettings, Settings};

/// Build version string with optional git commit hash.
///
/// Returns `"0.1.0+abc1234"` when git hash is available, `"0.1.0"` otherwise.
pub fn version_string() -> String {
    let version = env!("CARGO_PKG_VERSION");
    match option_env!("GIT_HASH") {
        Some(hash) if !hash.is_empty() => format!("{}+{}", version, hash),
        _ => version.to_string(),
    }
}
