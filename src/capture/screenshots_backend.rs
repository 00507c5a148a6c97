//! Screen access via the `screenshots` crate.
//!
//! Works on X11, Windows and macOS. The display is resolved from the
//! viewport's top-left corner on every copy, so dragging the viewport onto
//! another display just works.

use crate::capture::screen::ScreenAccess;
use crate::capture::types::Viewport;
use crate::error::{OcrTransError, Result};
use image::RgbaImage;
use screenshots::Screen;

const BYTES_PER_PIXEL: usize = 4;

#[derive(Debug, Default)]
pub struct ScreenshotsScreen;

impl ScreenshotsScreen {
    pub fn new() -> Self {
        Self
    }
}

impl ScreenAccess for ScreenshotsScreen {
    fn copy_rect(&mut self, viewport: Viewport, buffer: &mut RgbaImage) -> Result<()> {
        let screen = Screen::from_point(viewport.x, viewport.y).map_err(|e| {
            OcrTransError::Capture {
                message: format!("no display at ({}, {}): {}", viewport.x, viewport.y, e),
            }
        })?;

        // capture_area takes display-local coordinates
        let captured = screen
            .capture_area(
                viewport.x - screen.display_info.x,
                viewport.y - screen.display_info.y,
                viewport.width,
                viewport.height,
            )
            .map_err(|e| OcrTransError::Capture {
                message: e.to_string(),
            })?;

        // The crate may link a different `image` version, so go through raw bytes.
        copy_rows(
            captured.as_raw(),
            captured.width() as usize,
            captured.height() as usize,
            buffer,
        );
        Ok(())
    }

    fn name(&self) -> &'static str {
        "screenshots"
    }
}

/// Copy the overlapping region of a packed RGBA source into `buffer`.
///
/// The display clips areas that hang off its edge. Whatever the source does
/// not cover is cleared, so no pixels from an earlier frame survive.
fn copy_rows(src: &[u8], src_width: usize, src_height: usize, buffer: &mut RgbaImage) {
    let dst_row_bytes = buffer.width() as usize * BYTES_PER_PIXEL;
    if dst_row_bytes == 0 {
        return;
    }
    let copy_bytes = src_width.min(buffer.width() as usize) * BYTES_PER_PIXEL;
    let dst: &mut [u8] = buffer;

    for (row, dst_row) in dst.chunks_exact_mut(dst_row_bytes).enumerate() {
        let src_start = row * src_width * BYTES_PER_PIXEL;
        let copied = if row < src_height && src_start + copy_bytes <= src.len() {
            dst_row[..copy_bytes].copy_from_slice(&src[src_start..src_start + copy_bytes]);
            copy_bytes
        } else {
            0
        };
        dst_row[copied..].fill(0);
    }
}
