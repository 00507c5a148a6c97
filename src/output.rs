//! Rendering of pipeline results for terminal output.

use crate::capture::Viewport;
use crate::error::{OcrTransError, Result};
use crate::language::Language;
use crate::ocr::Document;
use crate::pipeline::types::CombinedResult;
use serde::Serialize;

const DIM: &str = "\x1b[2m";
const GREEN: &str = "\x1b[32m";
const YELLOW: &str = "\x1b[33m";
const RED: &str = "\x1b[31m";
const BOLD: &str = "\x1b[1m";
const RESET: &str = "\x1b[0m";

/// Return the ANSI color code for a recognition confidence (0-100).
fn confidence_color(confidence: f32) -> &'static str {
    if confidence >= 85.0 {
        GREEN
    } else if confidence >= 60.0 {
        ""
    } else if confidence >= 40.0 {
        YELLOW
    } else {
        RED
    }
}

fn paint(out: &mut String, color: bool, code: &str, text: &str) {
    if color && !code.is_empty() {
        out.push_str(&format!("{code}{text}{RESET}"));
    } else {
        out.push_str(text);
    }
}

/// Human-readable rendering: a header line, then each original line followed
/// by its translation.
pub fn render_text(result: &CombinedResult, color: bool) -> String {
    let mut out = String::new();
    let confidence = result.original.mean_confidence;
    let header = format!(
        "#{} {}x{}@{},{} {}->{} ",
        result.sequence(),
        result.frame.viewport.width,
        result.frame.viewport.height,
        result.frame.viewport.x,
        result.frame.viewport.y,
        result.source_language,
        result.target_language,
    );
    paint(&mut out, color, DIM, &header);
    paint(
        &mut out,
        color,
        confidence_color(confidence),
        &format!("conf {:.0}%", confidence),
    );
    paint(
        &mut out,
        color,
        DIM,
        &format!(
            " ocr {}ms tr {}ms",
            result.timing.recognition.as_millis(),
            result.timing.translation.as_millis()
        ),
    );
    out.push('\n');

    let pairs = result.line_pairs();
    if pairs.is_empty() {
        paint(&mut out, color, DIM, "  (no text)");
        out.push('\n');
    }
    for (original, translated) in pairs {
        if original.is_empty() {
            continue;
        }
        out.push_str("  ");
        out.push_str(&original);
        out.push('\n');
        out.push_str("  ");
        paint(&mut out, color, BOLD, &translated);
        out.push('\n');
    }
    out
}

#[derive(Serialize)]
struct LinePair {
    original: String,
    translated: String,
}

#[derive(Serialize)]
struct ResultRecord<'a> {
    sequence: u64,
    viewport: Viewport,
    source_language: Language,
    target_language: Language,
    mean_confidence: f32,
    recognition_ms: u64,
    translation_ms: u64,
    total_ms: u64,
    lines: Vec<LinePair>,
    original: &'a Document,
    translated: &'a Document,
}

/// One JSON object per result, on a single line.
pub fn render_json(result: &CombinedResult) -> Result<String> {
    let record = ResultRecord {
        sequence: result.sequence(),
        viewport: result.frame.viewport,
        source_language: result.source_language,
        target_language: result.target_language,
        mean_confidence: result.original.mean_confidence,
        recognition_ms: result.timing.recognition.as_millis() as u64,
        translation_ms: result.timing.translation.as_millis() as u64,
        total_ms: result.timing.total().as_millis() as u64,
        lines: result
            .line_pairs()
            .into_iter()
            .map(|(original, translated)| LinePair {
                original,
                translated,
            })
            .collect(),
        original: &result.original,
        translated: &result.translated,
    };
    serde_json::to_string(&record)
        .map_err(|e| OcrTransError::Other(format!("JSON encoding failed: {e}")))
}
