//! Translation: the oracle seam, the line cache and the per-document stage.

pub mod cache;
#[cfg(feature = "google")]
pub mod google;
pub mod stage;
pub mod translator;

pub use cache::TranslationCache;
#[cfg(feature = "google")]
pub use google::{GoogleConfig, GoogleTranslator};
pub use stage::{FailurePolicy, TranslationStage, TranslationStats};
pub use translator::{MockTranslator, Translator};
