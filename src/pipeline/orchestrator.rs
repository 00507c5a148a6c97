//! Frame pipeline: capture → recognize → translate → sinks, on one thread.

use crate::capture::{
    CaptureSource, CaptureStats, Frame, FrameEvent, FrameHandler, ScreenAccess, Viewport,
};
use crate::defaults;
use crate::error::Result;
use crate::language::Language;
use crate::ocr::{DocumentBuilder, RecognitionEngine};
use crate::pipeline::error::{ErrorReporter, LogReporter, StageError};
use crate::pipeline::sink::ResultSink;
use crate::pipeline::types::{CombinedResult, FrameTiming};
use crate::settings::LiveSettings;
use crate::translate::{FailurePolicy, TranslationStage, Translator};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

/// Configuration for the pipeline.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Delay between capture iterations
    pub capture_interval: Duration,
    /// How long `stop()` waits for the capture thread
    pub join_timeout: Duration,
    pub failure_policy: FailurePolicy,
    /// Text shown in place of a line whose translation failed
    pub error_marker: String,
    /// Translation cache entries (0 = disabled)
    pub cache_capacity: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            capture_interval: Duration::from_millis(defaults::CAPTURE_INTERVAL_MS),
            join_timeout: Duration::from_millis(defaults::JOIN_TIMEOUT_MS),
            failure_policy: FailurePolicy::default(),
            error_marker: defaults::ERROR_MARKER.to_string(),
            cache_capacity: defaults::CACHE_CAPACITY,
        }
    }
}

/// Counters describing pipeline activity since it was built.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PipelineStats {
    pub capture: CaptureStats,
    /// Results delivered to the sinks.
    pub frames_published: u64,
    /// Captured frames lost to a recognition or translation fault.
    pub frames_dropped: u64,
}

#[derive(Debug, Default)]
struct PipelineCounters {
    frames_published: AtomicU64,
    frames_dropped: AtomicU64,
}

/// Runs recognition and translation for every captured frame.
struct FrameProcessor {
    builder: DocumentBuilder,
    stage: TranslationStage,
    sinks: Vec<Box<dyn ResultSink>>,
    reporter: Arc<dyn ErrorReporter>,
    /// Language whose reinitialization failed; not retried until the setting changes.
    failed_language: Option<Language>,
    counters: Arc<PipelineCounters>,
}

impl FrameProcessor {
    /// Brings the engine in line with the requested source language.
    fn apply_language(&mut self, requested: Language) {
        if requested == self.builder.language() {
            self.failed_language = None;
            return;
        }
        if self.failed_language == Some(requested) {
            return;
        }
        match self.builder.set_language(requested) {
            Ok(()) => self.failed_language = None,
            Err(e) => {
                self.reporter.report(
                    "ocr",
                    &StageError::Fatal(format!(
                        "cannot switch to {}, keeping {}: {}",
                        requested.name(),
                        self.builder.language().name(),
                        e
                    )),
                );
                self.failed_language = Some(requested);
            }
        }
    }

    fn drop_frame(&self, stage: &str, sequence: u64, error: &dyn std::fmt::Display) {
        self.counters.frames_dropped.fetch_add(1, Ordering::Relaxed);
        self.reporter.report(
            stage,
            &StageError::Recoverable(format!("frame #{} dropped: {}", sequence, error)),
        );
    }

    /// Tears down the engine, then the translation stage, then the sinks.
    fn shutdown(self) -> Option<String> {
        let FrameProcessor {
            builder,
            stage,
            mut sinks,
            ..
        } = self;
        builder.shutdown();
        stage.shutdown();

        let outputs: Vec<String> = sinks.iter_mut().filter_map(|sink| sink.finish()).collect();
        if outputs.is_empty() {
            None
        } else {
            Some(outputs.join("\n"))
        }
    }
}

impl FrameHandler for FrameProcessor {
    fn on_frame(&mut self, event: &mut FrameEvent) {
        let settings = Arc::clone(&event.settings);
        let sequence = event.frame.sequence;
        self.apply_language(settings.source_language);

        for sink in &mut self.sinks {
            sink.on_frame(&event.frame);
        }

        let started = Instant::now();
        let original = match self.builder.run(&event.frame) {
            Ok(document) => document,
            Err(e) => return self.drop_frame("ocr", sequence, &e),
        };
        let recognized = Instant::now();

        let source_language = self.builder.language();
        let translated =
            match self
                .stage
                .translate(&original, source_language, settings.target_language)
            {
                Ok(document) => document,
                Err(e) => return self.drop_frame("translate", sequence, &e),
            };

        let timing = FrameTiming {
            recognition: recognized.duration_since(started),
            translation: recognized.elapsed(),
        };
        log::debug!(
            "Frame #{}: {} lines, conf {:.0}%, ocr {:?}, translate {:?}",
            sequence,
            original.line_count(),
            original.mean_confidence,
            timing.recognition,
            timing.translation
        );

        let mut result = CombinedResult {
            original,
            translated,
            frame: event.frame.clone(),
            source_language,
            target_language: settings.target_language,
            timing,
            dispose_frame: event.dispose_frame,
            break_loop: event.break_loop,
        };
        for sink in &mut self.sinks {
            if let Err(e) = sink.handle(&mut result) {
                self.reporter
                    .report(sink.name(), &StageError::Recoverable(e.to_string()));
            }
        }
        self.counters.frames_published.fetch_add(1, Ordering::Relaxed);

        event.dispose_frame = result.dispose_frame;
        event.break_loop = result.break_loop;
    }
}

/// Handle to a built pipeline.
pub struct PipelineHandle {
    capture: CaptureSource<FrameProcessor>,
    counters: Arc<PipelineCounters>,
}

impl PipelineHandle {
    /// Starts (or restarts) the capture loop.
    pub fn start(&mut self) -> Result<()> {
        self.capture.start()
    }

    /// Stops the capture loop. Safe to call repeatedly.
    pub fn stop(&mut self) {
        self.capture.stop();
    }

    pub fn is_running(&self) -> bool {
        self.capture.is_running()
    }

    pub fn settings(&self) -> &LiveSettings {
        self.capture.settings()
    }

    /// Takes effect on the next captured frame.
    pub fn set_viewport(&self, viewport: Viewport) {
        self.capture.set_viewport(viewport);
    }

    /// Takes effect on the next captured frame.
    pub fn set_languages(&self, source: Language, target: Language) {
        self.capture.settings().set_languages(source, target);
    }

    /// Takes the last frame a sink asked to keep.
    pub fn take_retained_frame(&self) -> Option<Frame> {
        self.capture.take_retained_frame()
    }

    pub fn stats(&self) -> PipelineStats {
        PipelineStats {
            capture: self.capture.stats(),
            frames_published: self.counters.frames_published.load(Ordering::Relaxed),
            frames_dropped: self.counters.frames_dropped.load(Ordering::Relaxed),
        }
    }

    /// Stops the loop and releases everything: the screen and capture
    /// buffers, then the recognition engine, then the translation stage,
    /// then the sinks. Returns the sinks' accumulated output.
    ///
    /// If the capture thread is still inside a frame after the join timeout,
    /// returns `None` and the same teardown runs on that thread when the
    /// frame completes.
    pub fn shutdown(self) -> Option<String> {
        let released = self.capture.release(|processor| {
            let output = processor.shutdown();
            log::info!("Pipeline shut down");
            output
        });
        match released {
            Some(output) => output,
            None => {
                log::warn!(
                    "Capture thread still busy at shutdown; teardown runs when its frame completes"
                );
                None
            }
        }
    }
}

/// Frame pipeline: ScreenAccess → DocumentBuilder → TranslationStage → ResultSinks.
pub struct Pipeline {
    config: PipelineConfig,
    error_reporter: Arc<dyn ErrorReporter>,
    sinks: Vec<Box<dyn ResultSink>>,
}

impl Pipeline {
    /// Creates a new pipeline with default error reporter.
    pub fn new(config: PipelineConfig) -> Self {
        Self {
            config,
            error_reporter: Arc::new(LogReporter),
            sinks: Vec::new(),
        }
    }

    /// Sets a custom error reporter.
    pub fn with_error_reporter(mut self, reporter: Arc<dyn ErrorReporter>) -> Self {
        self.error_reporter = reporter;
        self
    }

    /// Adds a result sink. Sinks see each result in the order they were added.
    pub fn with_sink(mut self, sink: Box<dyn ResultSink>) -> Self {
        self.sinks.push(sink);
        self
    }

    /// Initializes the engine for the current source language and wires the
    /// stages. The capture loop is not started.
    ///
    /// # Errors
    /// Returns `OcrTransError::EngineInit` if the engine cannot be initialized.
    pub fn build(
        self,
        screen: Box<dyn ScreenAccess>,
        engine: Box<dyn RecognitionEngine>,
        translator: Box<dyn Translator>,
        settings: LiveSettings,
    ) -> Result<PipelineHandle> {
        let initial = settings.snapshot();
        let builder = DocumentBuilder::new(engine, initial.source_language)?;
        let stage = TranslationStage::new(translator)
            .with_policy(self.config.failure_policy)
            .with_marker(self.config.error_marker.clone())
            .with_cache_capacity(self.config.cache_capacity)
            .with_error_reporter(Arc::clone(&self.error_reporter));
        log::info!(
            "Pipeline ready: engine {}, translator {}, on error {}, {} sink(s)",
            builder.engine_name(),
            stage.translator_name(),
            stage.policy(),
            self.sinks.len()
        );

        let counters = Arc::new(PipelineCounters::default());
        let processor = FrameProcessor {
            builder,
            stage,
            sinks: self.sinks,
            reporter: Arc::clone(&self.error_reporter),
            failed_language: None,
            counters: Arc::clone(&counters),
        };

        let capture = CaptureSource::new(screen, processor, settings)
            .with_interval(self.config.capture_interval)
            .with_join_timeout(self.config.join_timeout)
            .with_error_reporter(self.error_reporter);

        Ok(PipelineHandle { capture, counters })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capture::MockScreen;
    use crate::error::OcrTransError;
    use crate::ocr::{FlatPage, MockEngine, PageCursor};
    use crate::pipeline::error::tests::CollectingReporter;
    use crate::pipeline::sink::{CollectorSink, FrameLimitSink};
    use crate::settings::Settings;
    use crate::translate::MockTranslator;
    use image::{GrayImage, RgbaImage};
    use std::sync::Mutex;
    use std::sync::atomic::AtomicBool;
    use std::thread;

    fn settings() -> LiveSettings {
        LiveSettings::new(Settings {
            viewport: Viewport::new(0, 0, 16, 8),
            ..Settings::default()
        })
    }

    fn fast_config() -> PipelineConfig {
        PipelineConfig {
            capture_interval: Duration::from_millis(1),
            ..PipelineConfig::default()
        }
    }

    fn wait_until(mut condition: impl FnMut() -> bool) {
        let deadline = Instant::now() + Duration::from_secs(5);
        while !condition() {
            assert!(Instant::now() < deadline, "condition not met within 5s");
            thread::sleep(Duration::from_millis(2));
        }
    }

    /// Runs until `limit` results were published, then shuts down.
    fn run_frames(
        pipeline: Pipeline,
        engine: MockEngine,
        translator: MockTranslator,
        limit: u64,
    ) -> (CollectorSink, PipelineStats) {
        let collector = CollectorSink::new();
        let mut handle = pipeline
            .with_sink(Box::new(collector.clone()))
            .with_sink(Box::new(FrameLimitSink::new(limit)))
            .build(
                Box::new(MockScreen::new()),
                Box::new(engine),
                Box::new(translator),
                settings(),
            )
            .unwrap();
        handle.start().unwrap();
        wait_until(|| !handle.is_running());
        let stats = handle.stats();
        handle.shutdown();
        (collector, stats)
    }

    #[test]
    fn hello_world_end_to_end() {
        let (collector, stats) = run_frames(
            Pipeline::new(fast_config()),
            MockEngine::with_lines(&["Hello world"]),
            MockTranslator::new().with_response("Hello world", "안녕 세상"),
            1,
        );

        let results = collector.results();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].original.text(), "Hello world");
        assert_eq!(results[0].translated.text(), "안녕 세상");
        assert_eq!(results[0].source_language, Language::English);
        assert_eq!(results[0].target_language, Language::Korean);
        assert_eq!(stats.frames_published, 1);
    }

    #[test]
    fn failing_line_is_degraded_not_dropped() {
        let reporter = Arc::new(CollectingReporter::default());
        let (collector, stats) = run_frames(
            Pipeline::new(fast_config()).with_error_reporter(reporter.clone()),
            MockEngine::with_lines(&["good", "bad"]),
            MockTranslator::new()
                .with_response("good", "좋아")
                .with_failure_on("bad"),
            1,
        );

        let results = collector.results();
        assert_eq!(results[0].translated.text(), "좋아\n[translation failed]");
        assert_eq!(stats.frames_dropped, 0);
        assert!(reporter.stages().contains(&"translate".to_string()));
    }

    #[test]
    fn fail_frame_policy_drops_frames() {
        let reporter = Arc::new(CollectingReporter::default());
        let collector = CollectorSink::new();
        let mut handle = Pipeline::new(PipelineConfig {
            failure_policy: FailurePolicy::FailFrame,
            ..fast_config()
        })
        .with_error_reporter(reporter.clone())
        .with_sink(Box::new(collector.clone()))
        .build(
            Box::new(MockScreen::new()),
            Box::new(MockEngine::with_lines(&["bad"])),
            Box::new(MockTranslator::new().with_failure()),
            settings(),
        )
        .unwrap();

        handle.start().unwrap();
        wait_until(|| handle.stats().frames_dropped >= 2);
        handle.stop();

        assert!(collector.is_empty());
        assert!(handle.stats().frames_dropped >= 2);
        assert!(reporter.stages().iter().all(|s| s == "translate"));
        handle.shutdown();
    }

    #[test]
    fn recognition_failure_skips_frame_and_loop_continues() {
        let reporter = Arc::new(CollectingReporter::default());
        let mut handle = Pipeline::new(fast_config())
            .with_error_reporter(reporter.clone())
            .build(
                Box::new(MockScreen::new()),
                Box::new(MockEngine::with_lines(&["x"]).with_recognition_failure()),
                Box::new(MockTranslator::new()),
                settings(),
            )
            .unwrap();

        handle.start().unwrap();
        wait_until(|| handle.stats().frames_dropped >= 3);

        assert!(handle.is_running());
        assert!(reporter.stages().contains(&"ocr".to_string()));
        handle.shutdown();
    }

    #[test]
    fn engine_init_failure_aborts_build() {
        let result = Pipeline::new(fast_config()).build(
            Box::new(MockScreen::new()),
            Box::new(MockEngine::with_lines(&["x"]).without_language(Language::English)),
            Box::new(MockTranslator::new()),
            settings(),
        );
        assert!(matches!(result, Err(OcrTransError::EngineInit { .. })));
    }

    #[test]
    fn language_change_applies_to_next_frame() {
        let translator = MockTranslator::new();
        let recorder = translator.clone();
        let engine = MockEngine::with_lines(&["text"]);
        let inits = engine.init_counter();
        let collector = CollectorSink::new();

        let mut handle = Pipeline::new(fast_config())
            .with_sink(Box::new(collector.clone()))
            .build(
                Box::new(MockScreen::new()),
                Box::new(engine),
                Box::new(translator),
                settings(),
            )
            .unwrap();
        handle.start().unwrap();
        wait_until(|| !collector.is_empty());

        handle.set_languages(Language::Japanese, Language::English);
        wait_until(|| {
            collector
                .results()
                .last()
                .is_some_and(|r| r.source_language == Language::Japanese)
        });
        handle.stop();

        assert_eq!(inits.load(Ordering::SeqCst), 2);
        let last = collector.results().pop().unwrap();
        assert_eq!(last.target_language, Language::English);
        assert!(
            recorder
                .requests()
                .iter()
                .any(|(_, from, to)| *from == Language::Japanese && *to == Language::English)
        );
        handle.shutdown();
    }

    #[test]
    fn failed_language_change_keeps_previous_and_is_not_retried() {
        let reporter = Arc::new(CollectingReporter::default());
        let collector = CollectorSink::new();
        let mut handle = Pipeline::new(fast_config())
            .with_error_reporter(reporter.clone())
            .with_sink(Box::new(collector.clone()))
            .build(
                Box::new(MockScreen::new()),
                Box::new(MockEngine::with_lines(&["x"]).without_language(Language::Korean)),
                Box::new(MockTranslator::new()),
                settings(),
            )
            .unwrap();

        handle.set_languages(Language::Korean, Language::English);
        handle.start().unwrap();
        wait_until(|| collector.len() >= 3);
        handle.stop();

        let results = collector.results();
        assert!(results.iter().all(|r| r.source_language == Language::English));
        let fatal_reports = reporter
            .reports
            .lock()
            .unwrap()
            .iter()
            .filter(|(_, e)| matches!(e, StageError::Fatal(_)))
            .count();
        assert_eq!(fatal_reports, 1);
        handle.shutdown();
    }

    /// Sink that keeps every frame and requests a stop on the first one.
    struct RetainSink;

    impl ResultSink for RetainSink {
        fn handle(&mut self, result: &mut CombinedResult) -> Result<()> {
            result.dispose_frame = false;
            result.break_loop = true;
            Ok(())
        }
    }

    #[test]
    fn sink_flags_are_applied_to_capture_loop() {
        let mut handle = Pipeline::new(fast_config())
            .with_sink(Box::new(RetainSink))
            .build(
                Box::new(MockScreen::new()),
                Box::new(MockEngine::with_lines(&["x"])),
                Box::new(MockTranslator::new()),
                settings(),
            )
            .unwrap();

        handle.start().unwrap();
        wait_until(|| !handle.is_running());

        let frame = handle.take_retained_frame().unwrap();
        assert_eq!(frame.sequence, 0);
        assert_eq!((frame.width(), frame.height()), (16, 8));
        assert_eq!(handle.stats().frames_published, 1);
        handle.shutdown();
    }

    /// Sink that fails every frame.
    struct BrokenSink;

    impl ResultSink for BrokenSink {
        fn handle(&mut self, _result: &mut CombinedResult) -> Result<()> {
            Err(OcrTransError::Other("disk full".to_string()))
        }

        fn name(&self) -> &'static str {
            "broken"
        }
    }

    #[test]
    fn failing_sink_does_not_starve_others() {
        let reporter = Arc::new(CollectingReporter::default());
        let (collector, _) = run_frames(
            Pipeline::new(fast_config())
                .with_error_reporter(reporter.clone())
                .with_sink(Box::new(BrokenSink)),
            MockEngine::with_lines(&["x"]),
            MockTranslator::new(),
            2,
        );

        assert_eq!(collector.len(), 2);
        assert!(reporter.stages().contains(&"broken".to_string()));
    }

    #[test]
    fn on_frame_fires_before_results() {
        struct FrameCounter(Arc<AtomicU64>);
        impl ResultSink for FrameCounter {
            fn on_frame(&mut self, _frame: &Frame) {
                self.0.fetch_add(1, Ordering::SeqCst);
            }
            fn handle(&mut self, _result: &mut CombinedResult) -> Result<()> {
                Ok(())
            }
        }

        let frames = Arc::new(AtomicU64::new(0));
        run_frames(
            Pipeline::new(fast_config()).with_sink(Box::new(FrameCounter(Arc::clone(&frames)))),
            MockEngine::with_lines(&["x"]),
            MockTranslator::new(),
            3,
        );
        assert_eq!(frames.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn stop_twice_and_before_start_is_safe() {
        let mut handle = Pipeline::new(fast_config())
            .build(
                Box::new(MockScreen::new()),
                Box::new(MockEngine::with_lines(&["x"])),
                Box::new(MockTranslator::new()),
                settings(),
            )
            .unwrap();
        handle.stop();
        handle.start().unwrap();
        handle.stop();
        handle.stop();
        assert!(!handle.is_running());
        handle.shutdown();
    }

    // Teardown ordering

    type Log = Arc<Mutex<Vec<&'static str>>>;

    struct LoggingScreen {
        inner: MockScreen,
        log: Log,
    }

    impl ScreenAccess for LoggingScreen {
        fn copy_rect(&mut self, viewport: Viewport, buffer: &mut RgbaImage) -> Result<()> {
            self.inner.copy_rect(viewport, buffer)
        }
    }

    impl Drop for LoggingScreen {
        fn drop(&mut self) {
            self.log.lock().unwrap().push("capture");
        }
    }

    struct LoggingEngine {
        inner: MockEngine,
        log: Log,
    }

    impl RecognitionEngine for LoggingEngine {
        fn name(&self) -> &str {
            "logging"
        }
        fn initialize(&mut self, language: Language) -> Result<()> {
            self.inner.initialize(language)
        }
        fn recognize(&mut self, image: &GrayImage) -> Result<Box<dyn PageCursor + '_>> {
            self.inner.recognize(image)
        }
        fn release(&mut self) {
            self.log.lock().unwrap().push("engine");
        }
    }

    struct LoggingTranslator {
        log: Log,
    }

    impl Translator for LoggingTranslator {
        fn translate(&self, text: &str, _from: Language, _to: Language) -> Result<String> {
            Ok(text.to_string())
        }
    }

    impl Drop for LoggingTranslator {
        fn drop(&mut self) {
            self.log.lock().unwrap().push("translator");
        }
    }

    struct LoggingSink {
        log: Log,
    }

    impl ResultSink for LoggingSink {
        fn handle(&mut self, _result: &mut CombinedResult) -> Result<()> {
            Ok(())
        }
        fn finish(&mut self) -> Option<String> {
            self.log.lock().unwrap().push("sink");
            Some("done".to_string())
        }
    }

    #[test]
    fn shutdown_releases_capture_then_engine_then_translator() {
        let log: Log = Arc::new(Mutex::new(Vec::new()));
        let mut handle = Pipeline::new(fast_config())
            .with_sink(Box::new(LoggingSink { log: log.clone() }))
            .with_sink(Box::new(FrameLimitSink::new(1)))
            .build(
                Box::new(LoggingScreen {
                    inner: MockScreen::new(),
                    log: log.clone(),
                }),
                Box::new(LoggingEngine {
                    inner: MockEngine::new(FlatPage::from_blocks(vec![vec![vec!["x"]]])),
                    log: log.clone(),
                }),
                Box::new(LoggingTranslator { log: log.clone() }),
                settings(),
            )
            .unwrap();

        handle.start().unwrap();
        wait_until(|| !handle.is_running());
        let output = handle.shutdown();

        assert_eq!(output, Some("done".to_string()));
        assert_eq!(
            *log.lock().unwrap(),
            vec!["capture", "engine", "translator", "sink"]
        );
    }

    /// Translator that stalls on every line, so a frame outlasts the join timeout.
    struct StallingTranslator {
        log: Log,
        entered: Arc<AtomicBool>,
        delay: Duration,
    }

    impl Translator for StallingTranslator {
        fn translate(&self, text: &str, _from: Language, _to: Language) -> Result<String> {
            self.entered.store(true, Ordering::SeqCst);
            thread::sleep(self.delay);
            Ok(text.to_string())
        }
    }

    impl Drop for StallingTranslator {
        fn drop(&mut self) {
            self.log.lock().unwrap().push("translator");
        }
    }

    #[test]
    fn shutdown_during_slow_frame_still_tears_down_in_order() {
        let log: Log = Arc::new(Mutex::new(Vec::new()));
        let entered = Arc::new(AtomicBool::new(false));
        let mut handle = Pipeline::new(PipelineConfig {
            join_timeout: Duration::from_millis(20),
            ..fast_config()
        })
        .with_sink(Box::new(LoggingSink { log: log.clone() }))
        .build(
            Box::new(LoggingScreen {
                inner: MockScreen::new(),
                log: log.clone(),
            }),
            Box::new(LoggingEngine {
                inner: MockEngine::new(FlatPage::from_blocks(vec![vec![vec![
                    "one", "two", "three", "four",
                ]]])),
                log: log.clone(),
            }),
            Box::new(StallingTranslator {
                log: log.clone(),
                entered: Arc::clone(&entered),
                delay: Duration::from_millis(100),
            }),
            settings(),
        )
        .unwrap();

        handle.start().unwrap();
        wait_until(|| entered.load(Ordering::SeqCst));

        assert_eq!(handle.shutdown(), None);
        assert!(log.lock().unwrap().is_empty());

        wait_until(|| log.lock().unwrap().contains(&"sink"));
        assert_eq!(
            *log.lock().unwrap(),
            vec!["capture", "engine", "translator", "sink"]
        );
    }
}
