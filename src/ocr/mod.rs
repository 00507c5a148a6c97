//! Text recognition: engines, the flat cursor protocol and tree reconstruction.

pub mod builder;
pub mod cursor;
pub mod document;
pub mod engine;
pub mod flat;
#[cfg(feature = "tesseract")]
pub mod tesseract;

pub use builder::{BuilderStats, DocumentBuilder, build_document};
pub use cursor::{Level, PageCursor};
pub use document::{Block, BoundingBox, Document, Line, Paragraph, Word};
pub use engine::{MockEngine, RecognitionEngine};
pub use flat::{FlatCursor, FlatPage, LinePath};
#[cfg(feature = "tesseract")]
pub use tesseract::{TesseractConfig, TesseractEngine};
