//! Tesseract-backed recognition engine.
//!
//! Drives the `tesseract` CLI through rusty-tesseract and adapts its TSV word
//! table into a [`FlatPage`].
//!
//! # Feature Gate
//!
//! This module requires the `tesseract` feature and a `tesseract` binary on
//! `PATH` with the needed language packs installed.

use crate::defaults;
use crate::error::{OcrTransError, Result};
use crate::language::Language;
use crate::ocr::cursor::{Level, PageCursor};
use crate::ocr::document::BoundingBox;
use crate::ocr::engine::RecognitionEngine;
use crate::ocr::flat::{FlatPage, LinePath};
use image::{GrayImage, ImageFormat};
use rusty_tesseract::{Args, Image};
use std::collections::HashMap;
use std::path::PathBuf;
use std::process::Command;

/// Tesseract TSV `level` column values.
const LEVEL_BLOCK: i32 = 2;
const LEVEL_PARAGRAPH: i32 = 3;
const LEVEL_LINE: i32 = 4;
const LEVEL_WORD: i32 = 5;

/// Configuration for [`TesseractEngine`].
#[derive(Debug, Clone)]
pub struct TesseractConfig {
    /// Directory holding `*.traineddata`. `None` uses tesseract's default.
    pub tessdata: Option<PathBuf>,
    /// Page segmentation mode.
    pub psm: i32,
}

impl Default for TesseractConfig {
    fn default() -> Self {
        Self {
            tessdata: None,
            psm: defaults::TESSERACT_PSM,
        }
    }
}

#[derive(Debug)]
pub struct TesseractEngine {
    config: TesseractConfig,
    language: Option<Language>,
}

impl TesseractEngine {
    pub fn new(config: TesseractConfig) -> Self {
        Self {
            config,
            language: None,
        }
    }

    /// Language packs reported by `tesseract --list-langs`.
    pub fn installed_languages(&self) -> Result<Vec<String>> {
        let mut command = Command::new("tesseract");
        if let Some(dir) = &self.config.tessdata {
            command.arg("--tessdata-dir").arg(dir);
        }
        let output = command
            .arg("--list-langs")
            .output()
            .map_err(|e| OcrTransError::EngineInit {
                language: String::new(),
                message: format!("failed to run tesseract: {}", e),
            })?;
        if !output.status.success() {
            return Err(OcrTransError::EngineInit {
                language: String::new(),
                message: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }
        Ok(parse_list_langs(&String::from_utf8_lossy(&output.stdout)))
    }

    fn args(&self, language: Language) -> Args {
        Args {
            lang: language.tesseract_code().to_string(),
            config_variables: HashMap::new(),
            dpi: None,
            psm: Some(self.config.psm),
            oem: None,
        }
    }
}

impl RecognitionEngine for TesseractEngine {
    fn name(&self) -> &str {
        "tesseract"
    }

    fn initialize(&mut self, language: Language) -> Result<()> {
        let code = language.tesseract_code();
        let installed = self.installed_languages().map_err(|e| match e {
            OcrTransError::EngineInit { message, .. } => OcrTransError::EngineInit {
                language: code.to_string(),
                message,
            },
            other => other,
        })?;
        if !installed.iter().any(|l| l == code) {
            return Err(OcrTransError::EngineInit {
                language: code.to_string(),
                message: format!(
                    "language pack not installed (available: {})",
                    installed.join(", ")
                ),
            });
        }
        self.language = Some(language);
        Ok(())
    }

    fn recognize(&mut self, image: &GrayImage) -> Result<Box<dyn PageCursor + '_>> {
        let language = self.language.ok_or_else(|| OcrTransError::Recognition {
            message: "engine not initialized".to_string(),
        })?;

        // rusty-tesseract links its own `image` version, so hand over a file.
        let file = tempfile::Builder::new()
            .prefix("ocrtrans-")
            .suffix(".png")
            .tempfile()?;
        image
            .save_with_format(file.path(), ImageFormat::Png)
            .map_err(|e| OcrTransError::Recognition {
                message: format!("failed to write frame: {}", e),
            })?;

        let input = Image::from_path(file.path().to_path_buf()).map_err(|e| {
            OcrTransError::Recognition {
                message: e.to_string(),
            }
        })?;
        let output = rusty_tesseract::image_to_data(&input, &self.args(language)).map_err(|e| {
            OcrTransError::Recognition {
                message: e.to_string(),
            }
        })?;

        let rows: Vec<TsvRow> = output.data.iter().map(TsvRow::from).collect();
        Ok(Box::new(page_from_rows(&rows).into_cursor()))
    }

    fn release(&mut self) {
        self.language = None;
    }
}

/// One row of tesseract's TSV output.
#[derive(Debug, Clone, PartialEq)]
struct TsvRow {
    level: i32,
    block: i32,
    paragraph: i32,
    line: i32,
    left: i32,
    top: i32,
    width: i32,
    height: i32,
    conf: f32,
    text: String,
}

impl From<&rusty_tesseract::Data> for TsvRow {
    fn from(data: &rusty_tesseract::Data) -> Self {
        Self {
            level: data.level,
            block: data.block_num,
            paragraph: data.par_num,
            line: data.line_num,
            left: data.left,
            top: data.top,
            width: data.width,
            height: data.height,
            conf: data.conf,
            text: data.text.clone(),
        }
    }
}

impl TsvRow {
    fn path(&self) -> Option<LinePath> {
        Some(LinePath::new(
            u32::try_from(self.block).ok()?,
            u32::try_from(self.paragraph).ok()?,
            u32::try_from(self.line).ok()?,
        ))
    }

    fn bounds(&self) -> Option<BoundingBox> {
        if self.width <= 0 || self.height <= 0 {
            return None;
        }
        Some(BoundingBox::new(
            self.left.max(0) as u32,
            self.top.max(0) as u32,
            self.width as u32,
            self.height as u32,
        ))
    }
}

/// Mean confidence is taken over word rows; tesseract marks rows without a
/// score with a negative value.
fn page_from_rows(rows: &[TsvRow]) -> FlatPage {
    let mut page = FlatPage::new(0.0);
    let mut confidence_sum = 0.0f32;
    let mut confidence_count = 0u32;

    for row in rows {
        let Some(path) = row.path() else {
            continue;
        };
        match row.level {
            LEVEL_WORD => {
                let text = row.text.trim();
                if text.is_empty() {
                    continue;
                }
                if row.conf >= 0.0 {
                    confidence_sum += row.conf;
                    confidence_count += 1;
                }
                page.push_word(path, text, row.bounds());
            }
            LEVEL_LINE | LEVEL_PARAGRAPH | LEVEL_BLOCK => {
                let level = match row.level {
                    LEVEL_LINE => Level::Line,
                    LEVEL_PARAGRAPH => Level::Paragraph,
                    _ => Level::Block,
                };
                if let Some(bounds) = row.bounds() {
                    page.set_bounds(level, path, bounds);
                }
            }
            _ => {}
        }
    }

    let mean = if confidence_count == 0 {
        0.0
    } else {
        confidence_sum / confidence_count as f32
    };
    page.with_mean_confidence(mean)
}

/// Parses `tesseract --list-langs` output, skipping the header line.
fn parse_list_langs(output: &str) -> Vec<String> {
    output
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with("List of available languages"))
        .map(str::to_string)
        .collect()
}
