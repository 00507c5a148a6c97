use crate::error::{OcrTransError, Result};
use crate::language::Language;
use crate::ocr::cursor::PageCursor;
use crate::ocr::flat::FlatPage;
use image::GrayImage;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Trait for text recognition engines.
///
/// This trait allows swapping implementations (tesseract vs mock).
pub trait RecognitionEngine: Send {
    /// Name for logging/debugging.
    fn name(&self) -> &str;

    /// (Re)initialize for `language`.
    ///
    /// On error the engine must still be usable with its previous language.
    fn initialize(&mut self, language: Language) -> Result<()>;

    /// Recognize `image` and return a cursor over the result.
    fn recognize(&mut self, image: &GrayImage) -> Result<Box<dyn PageCursor + '_>>;

    /// Release native resources. Called once during teardown.
    fn release(&mut self) {}
}

/// Mock engine for testing.
///
/// Returns the same scripted page for every image.
#[derive(Debug, Clone)]
pub struct MockEngine {
    page: FlatPage,
    language: Option<Language>,
    unsupported: Vec<Language>,
    fail_recognize: bool,
    runs: Arc<AtomicUsize>,
    initializations: Arc<AtomicUsize>,
}

impl MockEngine {
    pub fn new(page: FlatPage) -> Self {
        Self {
            page,
            language: None,
            unsupported: Vec::new(),
            fail_recognize: false,
            runs: Arc::new(AtomicUsize::new(0)),
            initializations: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Engine whose page has one line per entry, each in its own paragraph.
    pub fn with_lines(lines: &[&str]) -> Self {
        Self::new(FlatPage::from_blocks(vec![lines.iter().map(|l| vec![*l]).collect()]))
    }

    /// Configure `initialize` to fail for `language`.
    pub fn without_language(mut self, language: Language) -> Self {
        self.unsupported.push(language);
        self
    }

    /// Configure `recognize` to fail.
    pub fn with_recognition_failure(mut self) -> Self {
        self.fail_recognize = true;
        self
    }

    pub fn language(&self) -> Option<Language> {
        self.language
    }

    /// Shared counter of `recognize` calls.
    pub fn run_counter(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.runs)
    }

    /// Shared counter of successful `initialize` calls.
    pub fn init_counter(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.initializations)
    }
}

impl RecognitionEngine for MockEngine {
    fn name(&self) -> &str {
        "mock"
    }

    fn initialize(&mut self, language: Language) -> Result<()> {
        if self.unsupported.contains(&language) {
            return Err(OcrTransError::EngineInit {
                language: language.tesseract_code().to_string(),
                message: "mock language not installed".to_string(),
            });
        }
        self.language = Some(language);
        self.initializations.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn recognize(&mut self, _image: &GrayImage) -> Result<Box<dyn PageCursor + '_>> {
        self.runs.fetch_add(1, Ordering::SeqCst);
        if self.fail_recognize {
            return Err(OcrTransError::Recognition {
                message: "mock recognition failure".to_string(),
            });
        }
        Ok(Box::new(self.page.clone().into_cursor()))
    }
}
