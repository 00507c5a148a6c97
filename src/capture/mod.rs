//! Screen capture: the background loop and the screen-access seam.

pub mod screen;
#[cfg(feature = "screen")]
pub mod screenshots_backend;
pub mod source;
pub mod types;

pub use screen::{MockScreen, ScreenAccess};
#[cfg(feature = "screen")]
pub use screenshots_backend::ScreenshotsScreen;
pub use source::{CaptureSource, CaptureStats};
pub use types::{Frame, FrameEvent, FrameHandler, Viewport};
