//! Line-by-line translation of a recognized [`Document`].
//!
//! The translated tree mirrors the original: same blocks, same paragraphs,
//! same number of lines per paragraph. Every translated line holds exactly
//! one word and carries no geometry.

use crate::defaults;
use crate::error::{OcrTransError, Result};
use crate::language::Language;
use crate::ocr::document::{Block, Document, Line, Paragraph, Word};
use crate::pipeline::error::{ErrorReporter, LogReporter, StageError};
use crate::translate::cache::TranslationCache;
use crate::translate::translator::Translator;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

const STAGE: &str = "translate";

/// What to do when the translator fails on a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum FailurePolicy {
    /// Replace the line with the error marker and keep going.
    #[default]
    #[serde(rename = "degrade", alias = "degrade-line")]
    DegradeLine,
    /// Abort the whole frame on the first failure.
    #[serde(rename = "drop-frame", alias = "fail-frame")]
    FailFrame,
}

impl fmt::Display for FailurePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailurePolicy::DegradeLine => write!(f, "degrade"),
            FailurePolicy::FailFrame => write!(f, "drop-frame"),
        }
    }
}

impl FromStr for FailurePolicy {
    type Err = OcrTransError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "degrade" | "degrade-line" => Ok(FailurePolicy::DegradeLine),
            "drop-frame" | "fail-frame" => Ok(FailurePolicy::FailFrame),
            other => Err(OcrTransError::ConfigInvalidValue {
                key: "translation.on_error".to_string(),
                message: format!("unknown policy '{}' (expected degrade or drop-frame)", other),
            }),
        }
    }
}

/// Counters describing translation activity since the stage was created.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TranslationStats {
    /// Lines answered by the translator (cache hits excluded).
    pub lines_translated: u64,
    pub cache_hits: u64,
    pub failed_lines: u64,
}

pub struct TranslationStage {
    translator: Box<dyn Translator>,
    policy: FailurePolicy,
    marker: String,
    cache: TranslationCache,
    stats: TranslationStats,
    reporter: Arc<dyn ErrorReporter>,
}

impl TranslationStage {
    pub fn new(translator: Box<dyn Translator>) -> Self {
        Self {
            translator,
            policy: FailurePolicy::default(),
            marker: defaults::ERROR_MARKER.to_string(),
            cache: TranslationCache::new(defaults::CACHE_CAPACITY),
            stats: TranslationStats::default(),
            reporter: Arc::new(LogReporter),
        }
    }

    pub fn with_policy(mut self, policy: FailurePolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_marker(mut self, marker: impl Into<String>) -> Self {
        self.marker = marker.into();
        self
    }

    /// Sets the cache capacity; 0 disables caching.
    pub fn with_cache_capacity(mut self, capacity: usize) -> Self {
        self.cache = TranslationCache::new(capacity);
        self
    }

    pub fn with_error_reporter(mut self, reporter: Arc<dyn ErrorReporter>) -> Self {
        self.reporter = reporter;
        self
    }

    pub fn policy(&self) -> FailurePolicy {
        self.policy
    }

    pub fn stats(&self) -> TranslationStats {
        self.stats
    }

    pub fn translator_name(&self) -> &str {
        self.translator.name()
    }

    /// Translates every line of `document`.
    ///
    /// Under [`FailurePolicy::FailFrame`] the first failing line aborts the
    /// call with its error.
    pub fn translate(
        &mut self,
        document: &Document,
        from: Language,
        to: Language,
    ) -> Result<Document> {
        let mut translated = Document::new(document.mean_confidence);
        for block in &document.blocks {
            let mut out_block = Block::default();
            for paragraph in &block.paragraphs {
                let mut out_paragraph = Paragraph::default();
                for line in &paragraph.lines {
                    let text = self.translate_line(&line.text(), from, to)?;
                    out_paragraph.lines.push(Line {
                        words: vec![Word::new(text)],
                        bounds: None,
                    });
                }
                out_block.paragraphs.push(out_paragraph);
            }
            translated.blocks.push(out_block);
        }
        Ok(translated)
    }

    fn translate_line(&mut self, text: &str, from: Language, to: Language) -> Result<String> {
        let text = text.trim();
        if text.is_empty() {
            return Ok(String::new());
        }
        if let Some(hit) = self.cache.get(text, from, to) {
            self.stats.cache_hits += 1;
            return Ok(hit);
        }

        match self.translator.translate(text, from, to) {
            Ok(translated) => {
                self.stats.lines_translated += 1;
                self.cache.store(text, from, to, &translated);
                Ok(translated)
            }
            Err(e) => {
                self.stats.failed_lines += 1;
                match self.policy {
                    FailurePolicy::DegradeLine => {
                        self.reporter.report(
                            STAGE,
                            &StageError::Recoverable(format!(
                                "line '{}' via {}: {}",
                                text,
                                self.translator.name(),
                                e
                            )),
                        );
                        Ok(self.marker.clone())
                    }
                    FailurePolicy::FailFrame => Err(e),
                }
            }
        }
    }

    /// Drops cached translations and releases the translator.
    pub fn shutdown(mut self) {
        self.cache.clear();
        log::debug!(
            "Translation stage '{}' released ({} lines, {} cache hits, {} failures)",
            self.translator.name(),
            self.stats.lines_translated,
            self.stats.cache_hits,
            self.stats.failed_lines
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ocr::document::BoundingBox;
    use crate::pipeline::error::tests::CollectingReporter;
    use crate::translate::translator::MockTranslator;
    use std::sync::atomic::Ordering;

    fn line(words: &[&str]) -> Line {
        Line {
            words: words
                .iter()
                .map(|w| Word {
                    text: w.to_string(),
                    bounds: Some(BoundingBox::new(1, 1, 5, 5)),
                })
                .collect(),
            bounds: Some(BoundingBox::new(0, 0, 50, 10)),
        }
    }

    fn document(paragraphs: Vec<Vec<Line>>) -> Document {
        Document {
            blocks: vec![Block {
                paragraphs: paragraphs
                    .into_iter()
                    .map(|lines| Paragraph {
                        lines,
                        bounds: None,
                    })
                    .collect(),
                bounds: Some(BoundingBox::new(0, 0, 100, 100)),
            }],
            mean_confidence: 75.0,
        }
    }

    fn stage(translator: MockTranslator) -> TranslationStage {
        TranslationStage::new(Box::new(translator))
    }

    #[test]
    fn hello_world_translates_to_single_word_line() {
        let mut stage = stage(MockTranslator::new().with_response("Hello world", "안녕 세상"));
        let doc = document(vec![vec![line(&["Hello", "world"])]]);

        let out = stage
            .translate(&doc, Language::English, Language::Korean)
            .unwrap();

        assert_eq!(out.blocks.len(), 1);
        assert_eq!(out.blocks[0].paragraphs.len(), 1);
        assert_eq!(out.blocks[0].paragraphs[0].lines.len(), 1);
        assert_eq!(out.blocks[0].paragraphs[0].lines[0].words.len(), 1);
        assert_eq!(out.text(), "안녕 세상");
    }

    #[test]
    fn structure_preserved_and_geometry_dropped() {
        let mut stage = stage(MockTranslator::new());
        let doc = document(vec![
            vec![line(&["a", "b"]), line(&["c"])],
            vec![line(&["d", "e", "f"])],
        ]);

        let out = stage
            .translate(&doc, Language::English, Language::Korean)
            .unwrap();

        assert_eq!(out.blocks[0].paragraphs.len(), 2);
        assert_eq!(out.blocks[0].paragraphs[0].lines.len(), 2);
        assert_eq!(out.blocks[0].paragraphs[1].lines.len(), 1);
        assert_eq!(out.blocks[0].bounds, None);
        for l in out.lines() {
            assert_eq!(l.words.len(), 1);
            assert_eq!(l.bounds, None);
            assert_eq!(l.words[0].bounds, None);
        }
        assert_eq!(out.text(), "[ko] a b\n[ko] c\n[ko] d e f");
        assert_eq!(out.mean_confidence, 75.0);
    }

    #[test]
    fn failing_line_degrades_and_siblings_survive() {
        let reporter = Arc::new(CollectingReporter::default());
        let mut stage = stage(
            MockTranslator::new()
                .with_response("first", "하나")
                .with_failure_on("second")
                .with_response("third", "셋"),
        )
        .with_error_reporter(reporter.clone());
        let doc = document(vec![vec![line(&["first"]), line(&["second"]), line(&["third"])]]);

        let out = stage
            .translate(&doc, Language::English, Language::Korean)
            .unwrap();

        assert_eq!(out.text(), "하나\n[translation failed]\n셋");
        assert_eq!(stage.stats().failed_lines, 1);
        assert_eq!(stage.stats().lines_translated, 2);
        assert_eq!(reporter.stages(), vec!["translate".to_string()]);
    }

    #[test]
    fn custom_marker_is_used() {
        let mut stage = stage(MockTranslator::new().with_failure()).with_marker("???");
        let doc = document(vec![vec![line(&["x"])]]);
        let out = stage
            .translate(&doc, Language::English, Language::Korean)
            .unwrap();
        assert_eq!(out.text(), "???");
    }

    #[test]
    fn fail_frame_policy_aborts() {
        let mut stage = stage(MockTranslator::new().with_failure_on("second"))
            .with_policy(FailurePolicy::FailFrame);
        let doc = document(vec![vec![line(&["first"]), line(&["second"])]]);

        let result = stage.translate(&doc, Language::English, Language::Korean);

        assert!(matches!(result, Err(OcrTransError::Translation { .. })));
    }

    #[test]
    fn repeated_lines_hit_cache_and_failures_are_not_cached() {
        let translator = MockTranslator::new().with_failure_on("bad");
        let calls = translator.call_counter();
        let mut stage = stage(translator);
        let doc = document(vec![vec![line(&["same"]), line(&["bad"])]]);

        stage
            .translate(&doc, Language::English, Language::Korean)
            .unwrap();
        stage
            .translate(&doc, Language::English, Language::Korean)
            .unwrap();

        // "same" once, "bad" twice
        assert_eq!(calls.load(Ordering::SeqCst), 3);
        assert_eq!(stage.stats().cache_hits, 1);
        assert_eq!(stage.stats().failed_lines, 2);
    }

    #[test]
    fn zero_cache_capacity_always_calls_translator() {
        let translator = MockTranslator::new();
        let calls = translator.call_counter();
        let mut stage = stage(translator).with_cache_capacity(0);
        let doc = document(vec![vec![line(&["same"])]]);

        for _ in 0..3 {
            stage
                .translate(&doc, Language::English, Language::Korean)
                .unwrap();
        }

        assert_eq!(calls.load(Ordering::SeqCst), 3);
        assert_eq!(stage.stats().cache_hits, 0);
    }

    #[test]
    fn blank_lines_are_not_sent() {
        let translator = MockTranslator::new();
        let calls = translator.call_counter();
        let mut stage = stage(translator);
        let doc = document(vec![vec![line(&["", " "]), line(&["real"])]]);

        let out = stage
            .translate(&doc, Language::English, Language::Korean)
            .unwrap();

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(out.blocks[0].paragraphs[0].lines.len(), 2);
        assert_eq!(out.blocks[0].paragraphs[0].lines[0].text(), "");
    }

    #[test]
    fn languages_are_passed_through() {
        let translator = MockTranslator::new();
        let recorder = translator.clone();
        let mut stage = stage(translator);
        let doc = document(vec![vec![line(&["konnichiwa"])]]);

        stage
            .translate(&doc, Language::Japanese, Language::English)
            .unwrap();

        assert_eq!(
            recorder.requests(),
            vec![("konnichiwa".to_string(), Language::Japanese, Language::English)]
        );
    }

    #[test]
    fn empty_document_translates_to_empty() {
        let mut stage = stage(MockTranslator::new());
        let out = stage
            .translate(&Document::new(0.0), Language::English, Language::Korean)
            .unwrap();
        assert!(out.is_empty());
    }

    #[test]
    fn policy_parses_config_names() {
        assert_eq!(
            "degrade".parse::<FailurePolicy>().unwrap(),
            FailurePolicy::DegradeLine
        );
        assert_eq!(
            "Drop-Frame".parse::<FailurePolicy>().unwrap(),
            FailurePolicy::FailFrame
        );
        assert!("explode".parse::<FailurePolicy>().is_err());
        assert_eq!(FailurePolicy::FailFrame.to_string(), "drop-frame");
    }
}
