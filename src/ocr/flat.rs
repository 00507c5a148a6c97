//! Engine-neutral flat word table with a [`PageCursor`] over it.
//!
//! Engines that report words as rows tagged with block/paragraph/line ids
//! (tesseract TSV, test scripts) load them into a [`FlatPage`]. Rows must be
//! in reading order with each element's words contiguous.

use crate::ocr::cursor::{Level, PageCursor};
use crate::ocr::document::BoundingBox;
use std::collections::HashMap;

/// Position of a word's enclosing line in the hierarchy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct LinePath {
    pub block: u32,
    pub paragraph: u32,
    pub line: u32,
}

impl LinePath {
    pub fn new(block: u32, paragraph: u32, line: u32) -> Self {
        Self {
            block,
            paragraph,
            line,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FlatWord {
    pub path: LinePath,
    pub text: String,
    pub bounds: Option<BoundingBox>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct FlatPage {
    words: Vec<FlatWord>,
    block_bounds: HashMap<u32, BoundingBox>,
    paragraph_bounds: HashMap<(u32, u32), BoundingBox>,
    line_bounds: HashMap<LinePath, BoundingBox>,
    mean_confidence: f32,
}

impl FlatPage {
    pub fn new(mean_confidence: f32) -> Self {
        Self {
            mean_confidence,
            ..Self::default()
        }
    }

    /// Builds a page from nested blocks > paragraphs > lines, splitting each
    /// line string on whitespace.
    pub fn from_blocks(blocks: Vec<Vec<Vec<&str>>>) -> Self {
        let mut page = FlatPage::new(100.0);
        for (b, paragraphs) in blocks.into_iter().enumerate() {
            for (p, lines) in paragraphs.into_iter().enumerate() {
                for (l, line) in lines.into_iter().enumerate() {
                    let path = LinePath::new(b as u32, p as u32, l as u32);
                    for word in line.split_whitespace() {
                        page.push_word(path, word, None);
                    }
                }
            }
        }
        page
    }

    pub fn with_mean_confidence(mut self, mean_confidence: f32) -> Self {
        self.mean_confidence = mean_confidence;
        self
    }

    pub fn push_word(&mut self, path: LinePath, text: &str, bounds: Option<BoundingBox>) {
        self.words.push(FlatWord {
            path,
            text: text.to_string(),
            bounds,
        });
    }

    /// Records the box of the element at `level` containing `path`.
    /// Word boxes are given per word in `push_word`, so `Level::Word` is ignored.
    pub fn set_bounds(&mut self, level: Level, path: LinePath, bounds: BoundingBox) {
        match level {
            Level::Block => {
                self.block_bounds.insert(path.block, bounds);
            }
            Level::Paragraph => {
                self.paragraph_bounds
                    .insert((path.block, path.paragraph), bounds);
            }
            Level::Line => {
                self.line_bounds.insert(path, bounds);
            }
            Level::Word => {}
        }
    }

    pub fn words(&self) -> &[FlatWord] {
        &self.words
    }

    pub fn mean_confidence(&self) -> f32 {
        self.mean_confidence
    }

    pub fn into_cursor(self) -> FlatCursor {
        FlatCursor {
            page: self,
            index: None,
        }
    }
}

/// Cursor over an owned [`FlatPage`].
#[derive(Debug, Clone)]
pub struct FlatCursor {
    page: FlatPage,
    index: Option<usize>,
}

type ElementKey = (u32, u32, u32, usize);

impl FlatCursor {
    /// Identity of the element at `level` that contains word `idx`.
    fn key(&self, idx: usize, level: Level) -> ElementKey {
        let path = self.page.words[idx].path;
        match level {
            Level::Block => (path.block, 0, 0, 0),
            Level::Paragraph => (path.block, path.paragraph, 0, 0),
            Level::Line => (path.block, path.paragraph, path.line, 0),
            Level::Word => (path.block, path.paragraph, path.line, idx),
        }
    }

    /// First word after `idx` that belongs to a different element at `level`.
    fn next_element_start(&self, idx: usize, level: Level) -> Option<usize> {
        let current = self.key(idx, level);
        (idx + 1..self.page.words.len()).find(|&j| self.key(j, level) != current)
    }
}

impl PageCursor for FlatCursor {
    fn begin(&mut self) -> bool {
        self.index = if self.page.words.is_empty() {
            None
        } else {
            Some(0)
        };
        self.index.is_some()
    }

    fn word_text(&self) -> String {
        self.index
            .map(|i| self.page.words[i].text.clone())
            .unwrap_or_default()
    }

    fn bounding_box(&self, level: Level) -> Option<BoundingBox> {
        let word = &self.page.words[self.index?];
        let path = word.path;
        match level {
            Level::Block => self.page.block_bounds.get(&path.block).copied(),
            Level::Paragraph => self
                .page
                .paragraph_bounds
                .get(&(path.block, path.paragraph))
                .copied(),
            Level::Line => self.page.line_bounds.get(&path).copied(),
            Level::Word => word.bounds,
        }
    }

    fn is_final_of(&self, parent: Level, child: Level) -> bool {
        let Some(idx) = self.index else {
            return false;
        };
        match self.next_element_start(idx, child) {
            None => true,
            Some(next) => self.key(next, parent) != self.key(idx, parent),
        }
    }

    fn advance(&mut self, level: Level) -> bool {
        self.index = self
            .index
            .and_then(|idx| self.next_element_start(idx, level));
        self.index.is_some()
    }

    fn mean_confidence(&self) -> f32 {
        self.page.mean_confidence
    }
}
