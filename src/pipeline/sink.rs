use crate::capture::Frame;
use crate::error::{OcrTransError, Result};
use crate::output::{render_json, render_text};
use crate::pipeline::types::CombinedResult;
use crossbeam_channel::{Receiver, Sender, TrySendError, bounded};
use std::io::{self, IsTerminal, Write};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

/// Pluggable result handler for the pipeline.
///
/// Called synchronously on the capture thread. Sinks that hand results to
/// another thread must not block.
pub trait ResultSink: Send + 'static {
    /// Called with the raw frame before recognition starts.
    fn on_frame(&mut self, _frame: &Frame) {}

    /// Handle one completed result. May set `dispose_frame` or `break_loop`.
    fn handle(&mut self, result: &mut CombinedResult) -> Result<()>;

    /// Called on pipeline shutdown. Return accumulated text if applicable.
    fn finish(&mut self) -> Option<String> {
        None
    }

    /// Name for logging/debugging.
    fn name(&self) -> &'static str {
        "sink"
    }
}

/// Collects every result for library use and tests.
///
/// Clones share the same storage, so one clone can be handed to the
/// pipeline and another kept for reading.
#[derive(Clone, Default)]
pub struct CollectorSink {
    collected: Arc<Mutex<Vec<CombinedResult>>>,
}

impl CollectorSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn results(&self) -> Vec<CombinedResult> {
        self.collected
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn len(&self) -> usize {
        self.collected
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl ResultSink for CollectorSink {
    fn handle(&mut self, result: &mut CombinedResult) -> Result<()> {
        self.collected
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(result.clone());
        Ok(())
    }

    /// Translated text of every collected frame, one frame per paragraph.
    fn finish(&mut self) -> Option<String> {
        let collected = self
            .collected
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        if collected.is_empty() {
            None
        } else {
            Some(
                collected
                    .iter()
                    .map(|r| r.translated.text())
                    .collect::<Vec<_>>()
                    .join("\n\n"),
            )
        }
    }

    fn name(&self) -> &'static str {
        "collector"
    }
}

/// Publishes results into a bounded channel for a consumer on another thread.
///
/// When the channel is full the newest result is dropped, so a slow consumer
/// never stalls the capture loop.
pub struct ChannelSink {
    tx: Sender<CombinedResult>,
    dropped: Arc<AtomicU64>,
}

impl ChannelSink {
    /// Creates a sink and the receiving end of its channel.
    pub fn bounded(capacity: usize) -> (Self, Receiver<CombinedResult>) {
        let (tx, rx) = bounded(capacity);
        (
            Self {
                tx,
                dropped: Arc::new(AtomicU64::new(0)),
            },
            rx,
        )
    }

    /// Shared counter of results dropped because the channel was full.
    pub fn dropped_counter(&self) -> Arc<AtomicU64> {
        Arc::clone(&self.dropped)
    }
}

impl ResultSink for ChannelSink {
    fn handle(&mut self, result: &mut CombinedResult) -> Result<()> {
        match self.tx.try_send(result.clone()) {
            Ok(()) => Ok(()),
            Err(TrySendError::Full(dropped)) => {
                self.dropped.fetch_add(1, Ordering::Relaxed);
                log::debug!("Result channel full, dropping frame #{}", dropped.sequence());
                Ok(())
            }
            Err(TrySendError::Disconnected(_)) => Err(OcrTransError::Other(
                "result receiver dropped".to_string(),
            )),
        }
    }

    fn name(&self) -> &'static str {
        "channel"
    }
}

/// Stops the capture loop after a fixed number of results.
pub struct FrameLimitSink {
    limit: u64,
    seen: u64,
}

impl FrameLimitSink {
    pub fn new(limit: u64) -> Self {
        Self { limit, seen: 0 }
    }
}

impl ResultSink for FrameLimitSink {
    fn handle(&mut self, result: &mut CombinedResult) -> Result<()> {
        self.seen += 1;
        if self.seen >= self.limit {
            log::info!("Frame limit of {} reached", self.limit);
            result.break_loop = true;
        }
        Ok(())
    }

    fn name(&self) -> &'static str {
        "frame-limit"
    }
}

/// Output format for [`StdoutSink`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    /// One JSON object per line.
    Json,
}

/// Writes each result to stdout.
pub struct StdoutSink {
    format: OutputFormat,
    color: bool,
}

impl StdoutSink {
    pub fn new(format: OutputFormat) -> Self {
        Self {
            format,
            color: io::stdout().is_terminal(),
        }
    }

    pub fn with_color(mut self, color: bool) -> Self {
        self.color = color;
        self
    }
}

impl ResultSink for StdoutSink {
    fn handle(&mut self, result: &mut CombinedResult) -> Result<()> {
        let rendered = match self.format {
            OutputFormat::Text => render_text(result, self.color),
            OutputFormat::Json => render_json(result)? + "\n",
        };
        let mut stdout = io::stdout().lock();
        stdout.write_all(rendered.as_bytes())?;
        stdout.flush()?;
        Ok(())
    }

    fn name(&self) -> &'static str {
        "stdout"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capture::Viewport;
    use crate::language::Language;
    use crate::ocr::{Block, Document, Line, Paragraph, Word};
    use crate::pipeline::types::FrameTiming;
    use image::RgbaImage;

    fn result(sequence: u64, translated: &str) -> CombinedResult {
        let doc = Document {
            blocks: vec![Block {
                paragraphs: vec![Paragraph {
                    lines: vec![Line {
                        words: vec![Word::new(translated)],
                        bounds: None,
                    }],
                    bounds: None,
                }],
                bounds: None,
            }],
            mean_confidence: 80.0,
        };
        CombinedResult {
            original: doc.clone(),
            translated: doc,
            frame: Frame::new(RgbaImage::new(1, 1), Viewport::new(0, 0, 1, 1), sequence),
            source_language: Language::English,
            target_language: Language::Korean,
            timing: FrameTiming::default(),
            dispose_frame: true,
            break_loop: false,
        }
    }

    #[test]
    fn result_sink_is_object_safe() {
        let _sink: Box<dyn ResultSink> = Box::new(CollectorSink::new());
    }

    #[test]
    fn collector_clones_share_storage() {
        let reader = CollectorSink::new();
        let mut writer = reader.clone();

        writer.handle(&mut result(0, "하나")).unwrap();
        writer.handle(&mut result(1, "둘")).unwrap();

        assert_eq!(reader.len(), 2);
        assert_eq!(reader.results()[1].sequence(), 1);
        assert_eq!(writer.finish(), Some("하나\n\n둘".to_string()));
    }

    #[test]
    fn collector_empty_finish_returns_none() {
        let mut sink = CollectorSink::new();
        assert!(sink.is_empty());
        assert_eq!(sink.finish(), None);
    }

    #[test]
    fn channel_sink_delivers_and_drops_newest_when_full() {
        let (mut sink, rx) = ChannelSink::bounded(1);
        let dropped = sink.dropped_counter();

        sink.handle(&mut result(0, "a")).unwrap();
        sink.handle(&mut result(1, "b")).unwrap();

        assert_eq!(dropped.load(Ordering::Relaxed), 1);
        assert_eq!(rx.try_recv().unwrap().sequence(), 0);
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn channel_sink_errors_when_receiver_gone() {
        let (mut sink, rx) = ChannelSink::bounded(1);
        drop(rx);
        assert!(sink.handle(&mut result(0, "a")).is_err());
    }

    #[test]
    fn frame_limit_sets_break_on_nth_result() {
        let mut sink = FrameLimitSink::new(2);

        let mut first = result(0, "a");
        sink.handle(&mut first).unwrap();
        assert!(!first.break_loop);

        let mut second = result(1, "b");
        sink.handle(&mut second).unwrap();
        assert!(second.break_loop);
    }

    #[test]
    fn stdout_sink_writes_both_formats() {
        let mut text = StdoutSink::new(OutputFormat::Text).with_color(false);
        let mut json = StdoutSink::new(OutputFormat::Json);
        assert!(text.handle(&mut result(0, "a")).is_ok());
        assert!(json.handle(&mut result(0, "a")).is_ok());
        assert_eq!(json.name(), "stdout");
    }
}
