//! Data types published by the frame pipeline.

use crate::capture::Frame;
use crate::language::Language;
use crate::ocr::Document;
use std::time::Duration;

/// Time spent in each stage for one frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameTiming {
    pub recognition: Duration,
    pub translation: Duration,
}

impl FrameTiming {
    pub fn total(&self) -> Duration {
        self.recognition + self.translation
    }
}

/// Everything produced for one captured frame.
///
/// Sinks may clear `dispose_frame` to keep the raw frame after delivery, or
/// set `break_loop` to stop capturing. Both flags are written back to the
/// capture loop once every sink has seen the result.
#[derive(Debug, Clone)]
pub struct CombinedResult {
    pub original: Document,
    pub translated: Document,
    pub frame: Frame,
    /// Language the frame was recognized in.
    pub source_language: Language,
    pub target_language: Language,
    pub timing: FrameTiming,
    pub dispose_frame: bool,
    pub break_loop: bool,
}

impl CombinedResult {
    pub fn sequence(&self) -> u64 {
        self.frame.sequence
    }

    /// Original and translated text, line by line.
    pub fn line_pairs(&self) -> Vec<(String, String)> {
        self.original
            .lines()
            .zip(self.translated.lines())
            .map(|(original, translated)| (original.text(), translated.text()))
            .collect()
    }
}
