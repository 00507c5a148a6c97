//! Default configuration constants for ocrtrans.
//!
//! Shared between the TOML config, the pipeline config and the CLI so the
//! three never disagree.

use crate::language::Language;

/// Language recognized on screen when nothing is configured.
pub const SOURCE_LANGUAGE: Language = Language::English;

/// Language the recognized text is translated into.
pub const TARGET_LANGUAGE: Language = Language::Korean;

/// Delay between capture iterations in milliseconds.
///
/// The loop is best-effort rather than timer driven. Recognition and
/// translation dominate a cycle, so the delay only keeps an idle loop
/// from spinning.
pub const CAPTURE_INTERVAL_MS: u64 = 1;

/// Upper bound accepted for `capture.interval_ms`.
pub const MAX_CAPTURE_INTERVAL_MS: u64 = 60_000;

/// Default capture rectangle.
pub const VIEWPORT_X: i32 = 0;
pub const VIEWPORT_Y: i32 = 0;
pub const VIEWPORT_WIDTH: u32 = 800;
pub const VIEWPORT_HEIGHT: u32 = 200;

/// How long `stop()` waits for the capture thread before detaching it.
///
/// A cycle can be stuck inside a network call, so the wait is bounded.
pub const JOIN_TIMEOUT_MS: u64 = 2_000;

/// Text substituted for a line whose translation failed.
pub const ERROR_MARKER: &str = "[translation failed]";

/// Number of distinct line translations kept in memory.
///
/// Static screen content is re-recognized every frame; the cache keeps
/// those lines from hitting the network again.
pub const CACHE_CAPACITY: usize = 512;

/// Largest accepted `translation.cache_size`.
pub const MAX_CACHE_CAPACITY: usize = 100_000;

/// HTTP timeout for a single translation request in seconds.
pub const TRANSLATION_TIMEOUT_SECS: u64 = 10;

/// Public Google Translate endpoint used by the default translator.
pub const GOOGLE_ENDPOINT: &str = "https://translate.googleapis.com/translate_a/single";

/// Tesseract page segmentation mode (3 = fully automatic, no OSD).
pub const TESSERACT_PSM: i32 = 3;
