//! Error types for ocrtrans.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum OcrTransError {
    // Configuration errors
    #[error("Configuration file not found at {path}")]
    ConfigFileNotFound { path: String },

    #[error("Failed to parse configuration: {message}")]
    ConfigParse { message: String },

    #[error("Invalid configuration value for {key}: {message}")]
    ConfigInvalidValue { key: String, message: String },

    // Screen capture errors
    #[error("Screen capture failed: {message}")]
    Capture { message: String },

    #[error("Invalid viewport {width}x{height}: width and height must be non-zero")]
    InvalidViewport { width: u32, height: u32 },

    // Recognition errors
    #[error("Failed to initialize recognition engine for {language}: {message}")]
    EngineInit { language: String, message: String },

    #[error("Recognition failed: {message}")]
    Recognition { message: String },

    // Translation errors
    #[error("Translation failed: {message}")]
    Translation { message: String },

    #[error("Unsupported language: {code}")]
    UnsupportedLanguage { code: String },

    // General I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    // Generic error for cases not covered above
    #[error("{0}")]
    Other(String),
}

// Type alias for convenience
pub type Result<T> = std::result::Result<T, OcrTransError>;
