use crate::capture::types::Viewport;
use crate::error::{OcrTransError, Result};
use image::{Rgba, RgbaImage};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Trait for copying screen pixels.
///
/// This trait allows swapping implementations (real display vs mock).
pub trait ScreenAccess: Send {
    /// Copy the `viewport` rectangle of the display into `buffer`.
    ///
    /// `buffer` is always exactly `viewport.width` x `viewport.height`.
    fn copy_rect(&mut self, viewport: Viewport, buffer: &mut RgbaImage) -> Result<()>;

    /// Name for logging/debugging.
    fn name(&self) -> &'static str {
        "screen"
    }
}

/// Mock screen for testing.
///
/// Paints each copy with a solid color derived from the copy count, so
/// consecutive frames are distinguishable.
#[derive(Debug, Clone)]
pub struct MockScreen {
    copies: Arc<AtomicUsize>,
    fail_on: Vec<usize>,
    fail_always: bool,
}

impl MockScreen {
    pub fn new() -> Self {
        Self {
            copies: Arc::new(AtomicUsize::new(0)),
            fail_on: Vec::new(),
            fail_always: false,
        }
    }

    /// Fail the given (zero-based) copy attempts.
    pub fn with_failures_on(mut self, attempts: &[usize]) -> Self {
        self.fail_on = attempts.to_vec();
        self
    }

    /// Fail every copy attempt.
    pub fn with_failure(mut self) -> Self {
        self.fail_always = true;
        self
    }

    /// Shared counter of copy attempts, readable after the mock moved into a thread.
    pub fn copy_counter(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.copies)
    }
}

impl Default for MockScreen {
    fn default() -> Self {
        Self::new()
    }
}

impl ScreenAccess for MockScreen {
    fn copy_rect(&mut self, viewport: Viewport, buffer: &mut RgbaImage) -> Result<()> {
        let attempt = self.copies.fetch_add(1, Ordering::SeqCst);
        if self.fail_always || self.fail_on.contains(&attempt) {
            return Err(OcrTransError::Capture {
                message: format!("mock copy failure at {}x{}", viewport.width, viewport.height),
            });
        }

        let shade = (attempt % 256) as u8;
        for pixel in buffer.pixels_mut() {
            *pixel = Rgba([shade, shade, shade, 255]);
        }
        Ok(())
    }

    fn name(&self) -> &'static str {
        "mock"
    }
}
