use crate::capture::Viewport;
use crate::defaults;
use crate::error::{OcrTransError, Result};
use crate::language::Language;
use crate::pipeline::PipelineConfig;
use crate::settings::Settings;
use crate::translate::FailurePolicy;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Root configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct Config {
    pub capture: CaptureConfig,
    pub ocr: OcrConfig,
    pub translation: TranslationConfig,
}

/// Capture rectangle and loop cadence
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CaptureConfig {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
    pub interval_ms: u64,
}

/// Recognition configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct OcrConfig {
    /// Language the screen text is written in
    pub language: Language,
    /// Directory holding tesseract `*.traineddata` files
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tessdata: Option<PathBuf>,
    /// Tesseract page segmentation mode
    pub psm: i32,
}

/// Translation configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct TranslationConfig {
    pub target: Language,
    pub on_error: FailurePolicy,
    pub marker: String,
    pub cache_size: usize,
    pub timeout_secs: u64,
    pub endpoint: String,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            x: defaults::VIEWPORT_X,
            y: defaults::VIEWPORT_Y,
            width: defaults::VIEWPORT_WIDTH,
            height: defaults::VIEWPORT_HEIGHT,
            interval_ms: defaults::CAPTURE_INTERVAL_MS,
        }
    }
}

impl Default for OcrConfig {
    fn default() -> Self {
        Self {
            language: defaults::SOURCE_LANGUAGE,
            tessdata: None,
            psm: defaults::TESSERACT_PSM,
        }
    }
}

impl Default for TranslationConfig {
    fn default() -> Self {
        Self {
            target: defaults::TARGET_LANGUAGE,
            on_error: FailurePolicy::default(),
            marker: defaults::ERROR_MARKER.to_string(),
            cache_size: defaults::CACHE_CAPACITY,
            timeout_secs: defaults::TRANSLATION_TIMEOUT_SECS,
            endpoint: defaults::GOOGLE_ENDPOINT.to_string(),
        }
    }
}

impl Config {
    /// Load configuration from a TOML file
    ///
    /// Returns `ConfigFileNotFound` for a missing file and `ConfigParse` for
    /// invalid TOML. Missing fields will use default values.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let contents = match fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(OcrTransError::ConfigFileNotFound {
                    path: path.display().to_string(),
                }
                .into());
            }
            Err(e) => return Err(OcrTransError::Io(e).into()),
        };
        let config: Config = toml::from_str(&contents).map_err(|e| OcrTransError::ConfigParse {
            message: e.to_string(),
        })?;
        Ok(config)
    }

    /// Load configuration from a file or return defaults if file doesn't exist
    ///
    /// Only returns defaults if the file is missing.
    /// Returns errors for invalid TOML.
    pub fn load_or_default(path: &Path) -> anyhow::Result<Self> {
        match Self::load(path) {
            Ok(config) => Ok(config),
            Err(e)
                if matches!(
                    e.downcast_ref::<OcrTransError>(),
                    Some(OcrTransError::ConfigFileNotFound { .. })
                ) =>
            {
                log::debug!("No config at {}, using defaults", path.display());
                Ok(Self::default())
            }
            Err(e) => Err(e.context(format!("Failed to load config from {}", path.display()))),
        }
    }

    /// Apply environment variable overrides
    ///
    /// Supported environment variables:
    /// - OCRTRANS_SOURCE_LANG → ocr.language
    /// - OCRTRANS_TARGET_LANG → translation.target
    /// - OCRTRANS_TESSDATA → ocr.tessdata
    pub fn with_env_overrides(mut self) -> Self {
        if let Some(language) = env_language("OCRTRANS_SOURCE_LANG") {
            self.ocr.language = language;
        }

        if let Some(language) = env_language("OCRTRANS_TARGET_LANG") {
            self.translation.target = language;
        }

        if let Ok(dir) = std::env::var("OCRTRANS_TESSDATA")
            && !dir.is_empty()
        {
            self.ocr.tessdata = Some(PathBuf::from(dir));
        }

        self
    }

    /// Checks value ranges serde cannot express.
    pub fn validate(&self) -> Result<()> {
        if self.capture.width == 0 || self.capture.height == 0 {
            return Err(invalid(
                "capture.width",
                format!(
                    "viewport {}x{} has no area",
                    self.capture.width, self.capture.height
                ),
            ));
        }
        if self.capture.interval_ms > defaults::MAX_CAPTURE_INTERVAL_MS {
            return Err(invalid(
                "capture.interval_ms",
                format!(
                    "{} exceeds the maximum of {}",
                    self.capture.interval_ms,
                    defaults::MAX_CAPTURE_INTERVAL_MS
                ),
            ));
        }
        if !(0..=13).contains(&self.ocr.psm) {
            return Err(invalid(
                "ocr.psm",
                format!("{} is not a tesseract page segmentation mode (0-13)", self.ocr.psm),
            ));
        }
        if self.translation.marker.trim().is_empty() {
            return Err(invalid("translation.marker", "must not be empty".to_string()));
        }
        if self.translation.cache_size > defaults::MAX_CACHE_CAPACITY {
            return Err(invalid(
                "translation.cache_size",
                format!(
                    "{} exceeds the maximum of {}",
                    self.translation.cache_size,
                    defaults::MAX_CACHE_CAPACITY
                ),
            ));
        }
        if self.translation.timeout_secs == 0 {
            return Err(invalid("translation.timeout_secs", "must be at least 1".to_string()));
        }
        if !self.translation.endpoint.starts_with("http://")
            && !self.translation.endpoint.starts_with("https://")
        {
            return Err(invalid(
                "translation.endpoint",
                format!("'{}' is not an http(s) URL", self.translation.endpoint),
            ));
        }
        Ok(())
    }

    /// Serialize for `config show` / `config init`.
    pub fn to_toml(&self) -> anyhow::Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    pub fn viewport(&self) -> Viewport {
        Viewport::new(
            self.capture.x,
            self.capture.y,
            self.capture.width,
            self.capture.height,
        )
    }

    /// Initial live settings.
    pub fn settings(&self) -> Settings {
        Settings {
            viewport: self.viewport(),
            source_language: self.ocr.language,
            target_language: self.translation.target,
        }
    }

    pub fn pipeline_config(&self) -> PipelineConfig {
        PipelineConfig {
            capture_interval: Duration::from_millis(self.capture.interval_ms),
            failure_policy: self.translation.on_error,
            error_marker: self.translation.marker.clone(),
            cache_capacity: self.translation.cache_size,
            ..PipelineConfig::default()
        }
    }

    #[cfg(feature = "tesseract")]
    pub fn tesseract_config(&self) -> crate::ocr::TesseractConfig {
        crate::ocr::TesseractConfig {
            tessdata: self.ocr.tessdata.clone(),
            psm: self.ocr.psm,
        }
    }

    #[cfg(feature = "google")]
    pub fn google_config(&self) -> crate::translate::GoogleConfig {
        crate::translate::GoogleConfig {
            endpoint: self.translation.endpoint.clone(),
            timeout: Duration::from_secs(self.translation.timeout_secs),
        }
    }

    /// Get the default configuration file path
    ///
    /// Returns ~/.config/ocrtrans/config.toml on Linux
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("ocrtrans")
            .join("config.toml")
    }
}

fn invalid(key: &str, message: String) -> OcrTransError {
    OcrTransError::ConfigInvalidValue {
        key: key.to_string(),
        message,
    }
}

/// Reads a language from the environment. Empty values are ignored; values
/// that do not name a language are ignored with a warning.
fn env_language(key: &str) -> Option<Language> {
    let value = std::env::var(key).ok().filter(|v| !v.is_empty())?;
    match value.parse() {
        Ok(language) => Some(language),
        Err(e) => {
            log::warn!("Ignoring {}: {}", key, e);
            None
        }
    }
}
