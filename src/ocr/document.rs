//! Recognized text as a Block > Paragraph > Line > Word tree.
//!
//! Trees are built once per frame and not modified afterwards. Bounding
//! boxes are in pixels relative to the captured viewport and are `None`
//! whenever the engine could not localize a node.

use serde::{Deserialize, Serialize};

/// Axis-aligned box in viewport pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct BoundingBox {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl BoundingBox {
    pub fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Word {
    pub text: String,
    pub bounds: Option<BoundingBox>,
}

impl Word {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            bounds: None,
        }
    }

    pub fn text(&self) -> String {
        self.text.clone()
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Line {
    pub words: Vec<Word>,
    pub bounds: Option<BoundingBox>,
}

impl Line {
    /// Words joined by single spaces, trailing whitespace trimmed.
    pub fn text(&self) -> String {
        let mut out = String::new();
        for word in &self.words {
            out.push_str(&word.text);
            out.push(' ');
        }
        out.trim_end().to_string()
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Paragraph {
    pub lines: Vec<Line>,
    pub bounds: Option<BoundingBox>,
}

impl Paragraph {
    pub fn text(&self) -> String {
        join_lines(self.lines.iter().map(Line::text))
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Block {
    pub paragraphs: Vec<Paragraph>,
    pub bounds: Option<BoundingBox>,
}

impl Block {
    pub fn text(&self) -> String {
        join_lines(self.paragraphs.iter().map(Paragraph::text))
    }

    pub fn lines(&self) -> impl Iterator<Item = &Line> {
        self.paragraphs.iter().flat_map(|p| p.lines.iter())
    }
}

/// Result of recognizing one frame.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Document {
    pub blocks: Vec<Block>,
    /// Engine-reported mean confidence, 0-100.
    pub mean_confidence: f32,
}

impl Document {
    pub fn new(mean_confidence: f32) -> Self {
        Self {
            blocks: Vec::new(),
            mean_confidence,
        }
    }

    pub fn text(&self) -> String {
        join_lines(self.blocks.iter().map(Block::text))
    }

    pub fn lines(&self) -> impl Iterator<Item = &Line> {
        self.blocks.iter().flat_map(Block::lines)
    }

    pub fn line_count(&self) -> usize {
        self.lines().count()
    }

    pub fn word_count(&self) -> usize {
        self.lines().map(|line| line.words.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }
}

/// Newline-joins child texts and trims trailing newlines.
fn join_lines(parts: impl Iterator<Item = String>) -> String {
    let mut out = String::new();
    for part in parts {
        out.push_str(&part);
        out.push('\n');
    }
    out.trim_end_matches('\n').to_string()
}
