//! Frame → [`Document`] conversion.
//!
//! The engine exposes a flat word cursor; the tree is rebuilt by keeping one
//! open accumulator per level and closing it exactly when the cursor reports
//! a boundary at that level.

use crate::capture::Frame;
use crate::error::Result;
use crate::language::Language;
use crate::ocr::cursor::{Level, PageCursor};
use crate::ocr::document::{Block, Document, Line, Paragraph, Word};
use crate::ocr::engine::RecognitionEngine;
use image::{GrayImage, Pixel, RgbaImage};
use std::mem;

/// Counters describing preprocessing activity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BuilderStats {
    /// Grayscale conversion buffers allocated.
    pub buffer_allocations: u64,
    pub runs: u64,
}

/// Runs a recognition engine over frames and rebuilds the text hierarchy.
pub struct DocumentBuilder {
    engine: Box<dyn RecognitionEngine>,
    language: Language,
    gray: Option<GrayImage>,
    stats: BuilderStats,
}

impl DocumentBuilder {
    /// Initializes `engine` for `language`.
    ///
    /// Fails if the engine cannot be initialized; there is nothing to
    /// recognize with in that case.
    pub fn new(mut engine: Box<dyn RecognitionEngine>, language: Language) -> Result<Self> {
        engine.initialize(language)?;
        log::info!(
            "Recognition engine '{}' ready for {}",
            engine.name(),
            language.name()
        );
        Ok(Self {
            engine,
            language,
            gray: None,
            stats: BuilderStats::default(),
        })
    }

    pub fn language(&self) -> Language {
        self.language
    }

    /// Reinitializes the engine for another language.
    ///
    /// Takes `&mut self`, so it can never overlap a `run`. On failure the
    /// previous language stays active.
    pub fn set_language(&mut self, language: Language) -> Result<()> {
        if language == self.language {
            return Ok(());
        }
        self.engine.initialize(language)?;
        log::info!(
            "Recognition language changed {} -> {}",
            self.language.name(),
            language.name()
        );
        self.language = language;
        Ok(())
    }

    pub fn stats(&self) -> BuilderStats {
        self.stats
    }

    pub fn engine_name(&self) -> &str {
        self.engine.name()
    }

    /// Recognizes one frame.
    pub fn run(&mut self, frame: &Frame) -> Result<Document> {
        if to_gray(&frame.image, &mut self.gray) {
            self.stats.buffer_allocations += 1;
        }
        self.stats.runs += 1;

        let Some(gray) = self.gray.as_ref() else {
            return Ok(Document::default());
        };
        let mut cursor = self.engine.recognize(gray)?;
        Ok(build_document(cursor.as_mut()))
    }

    /// Releases the engine.
    pub fn shutdown(mut self) {
        self.engine.release();
        log::debug!("Recognition engine '{}' released", self.engine.name());
    }
}

/// Converts `src` to 8-bit luma, reusing `dst` when the size matches.
///
/// Returns true if `dst` had to be (re)allocated.
fn to_gray(src: &RgbaImage, dst: &mut Option<GrayImage>) -> bool {
    let reallocated = !dst
        .as_ref()
        .is_some_and(|g| g.dimensions() == src.dimensions());
    if reallocated {
        *dst = None;
        *dst = Some(GrayImage::new(src.width(), src.height()));
    }
    if let Some(gray) = dst.as_mut() {
        for (out, pixel) in gray.pixels_mut().zip(src.pixels()) {
            *out = pixel.to_luma();
        }
    }
    reallocated
}

/// Rebuilds the Block > Paragraph > Line > Word tree from a flat cursor.
///
/// Each level's boundary test runs right after its child level closed, so
/// every accumulator closes once per boundary. Accumulators still open when
/// the cursor runs out are closed as well, so no leaf is ever dropped and
/// no composite is ever emitted empty.
pub fn build_document(cursor: &mut dyn PageCursor) -> Document {
    let mut document = Document::new(cursor.mean_confidence());
    if !cursor.begin() {
        return document;
    }

    let mut block = Block::default();
    let mut paragraph = Paragraph::default();
    let mut line = Line::default();

    loop {
        line.words.push(Word {
            text: cursor.word_text(),
            bounds: cursor.bounding_box(Level::Word),
        });

        if cursor.is_final_of(Level::Line, Level::Word) {
            line.bounds = cursor.bounding_box(Level::Line);
            paragraph.lines.push(mem::take(&mut line));

            if cursor.is_final_of(Level::Paragraph, Level::Line) {
                paragraph.bounds = cursor.bounding_box(Level::Paragraph);
                block.paragraphs.push(mem::take(&mut paragraph));

                if cursor.is_final_of(Level::Block, Level::Paragraph) {
                    block.bounds = cursor.bounding_box(Level::Block);
                    document.blocks.push(mem::take(&mut block));
                }
            }
        }

        if !cursor.advance(Level::Word) {
            break;
        }
    }

    // Cursor exhausted without reporting the outer boundaries.
    if !line.words.is_empty() {
        paragraph.lines.push(line);
    }
    if !paragraph.lines.is_empty() {
        block.paragraphs.push(paragraph);
    }
    if !block.paragraphs.is_empty() {
        document.blocks.push(block);
    }

    document
}
