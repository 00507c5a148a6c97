//! Data types produced by the capture loop.

use crate::defaults;
use crate::settings::Settings;
use image::RgbaImage;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Instant;

/// Screen rectangle being captured, in display coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Viewport {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    pub fn new(x: i32, y: i32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// A viewport with no area cannot be captured.
    pub fn is_degenerate(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// True when a buffer of this size can hold the viewport without reallocation.
    pub fn fits(&self, image: &RgbaImage) -> bool {
        image.width() == self.width && image.height() == self.height
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(
            defaults::VIEWPORT_X,
            defaults::VIEWPORT_Y,
            defaults::VIEWPORT_WIDTH,
            defaults::VIEWPORT_HEIGHT,
        )
    }
}

/// One captured screen rectangle.
///
/// Pixel data is shared, so cloning a frame never copies the image.
/// Coordinates inside `image` are relative to `viewport`.
#[derive(Debug, Clone)]
pub struct Frame {
    pub image: Arc<RgbaImage>,
    pub viewport: Viewport,
    /// Monotonic per-source frame counter.
    pub sequence: u64,
    pub captured_at: Instant,
}

impl Frame {
    pub fn new(image: RgbaImage, viewport: Viewport, sequence: u64) -> Self {
        Self::from_shared(Arc::new(image), viewport, sequence)
    }

    /// Wraps pixels the capture source may write into again once every
    /// clone of this frame is gone.
    pub fn from_shared(image: Arc<RgbaImage>, viewport: Viewport, sequence: u64) -> Self {
        Self {
            image,
            viewport,
            sequence,
            captured_at: Instant::now(),
        }
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }
}

/// Notification raised by the capture loop for every captured frame.
///
/// The handler may clear `dispose_frame` to keep the frame after the
/// notification returns, or set `break_loop` to stop capturing. Both are read
/// back by the loop once the handler returns.
#[derive(Debug)]
pub struct FrameEvent {
    pub frame: Frame,
    /// Settings snapshot taken at the top of this iteration.
    pub settings: Arc<Settings>,
    pub dispose_frame: bool,
    pub break_loop: bool,
}

impl FrameEvent {
    pub fn new(frame: Frame, settings: Arc<Settings>) -> Self {
        Self {
            frame,
            settings,
            dispose_frame: true,
            break_loop: false,
        }
    }
}

/// Receives frame notifications on the capture thread.
pub trait FrameHandler: Send + 'static {
    fn on_frame(&mut self, event: &mut FrameEvent);
}

impl<F> FrameHandler for F
where
    F: FnMut(&mut FrameEvent) + Send + 'static,
{
    fn on_frame(&mut self, event: &mut FrameEvent) {
        self(event)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn degenerate_viewports() {
        assert!(Viewport::new(0, 0, 0, 10).is_degenerate());
        assert!(Viewport::new(0, 0, 10, 0).is_degenerate());
        assert!(!Viewport::new(-50, 0, 1, 1).is_degenerate());
    }

    #[test]
    fn fits_compares_dimensions_only() {
        let image = RgbaImage::new(40, 30);
        assert!(Viewport::new(100, 200, 40, 30).fits(&image));
        assert!(!Viewport::new(0, 0, 41, 30).fits(&image));
    }

    #[test]
    fn frame_clone_shares_pixels() {
        let frame = Frame::new(RgbaImage::new(4, 4), Viewport::new(0, 0, 4, 4), 7);
        let copy = frame.clone();
        assert!(Arc::ptr_eq(&frame.image, &copy.image));
        assert_eq!(copy.sequence, 7);
        assert_eq!((copy.width(), copy.height()), (4, 4));
    }

    #[test]
    fn event_defaults_dispose_and_continue() {
        let frame = Frame::new(RgbaImage::new(1, 1), Viewport::new(0, 0, 1, 1), 0);
        let event = FrameEvent::new(frame, Arc::new(Settings::default()));
        assert!(event.dispose_frame);
        assert!(!event.break_loop);
    }

    #[test]
    fn closures_are_frame_handlers() {
        use std::sync::atomic::{AtomicU64, Ordering};

        let seen = Arc::new(AtomicU64::new(0));
        let seen_in_handler = Arc::clone(&seen);
        let mut handler: Box<dyn FrameHandler> = Box::new(move |event: &mut FrameEvent| {
            seen_in_handler.store(event.frame.sequence, Ordering::SeqCst);
            event.break_loop = true;
        });

        let frame = Frame::new(RgbaImage::new(1, 1), Viewport::new(0, 0, 1, 1), 3);
        let mut event = FrameEvent::new(frame, Arc::new(Settings::default()));
        handler.on_frame(&mut event);

        assert!(event.break_loop);
        assert_eq!(seen.load(Ordering::SeqCst), 3);
    }
}
