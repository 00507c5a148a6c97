//! Background capture loop.
//!
//! One dedicated thread copies the viewport into a reusable buffer, wraps it
//! in a [`Frame`] and hands it to the [`FrameHandler`] synchronously. The next
//! capture starts only after the handler returns.
//!
//! Frames share the buffer with the worker. Once every clone of a frame is
//! dropped the next capture writes into the same pixels; a frame that is
//! still alive forces a fresh buffer instead.

use crate::capture::screen::ScreenAccess;
use crate::capture::types::{Frame, FrameEvent, FrameHandler, Viewport};
use crate::error::{OcrTransError, Result};
use crate::pipeline::error::{ErrorReporter, LogReporter, StageError};
use crate::settings::LiveSettings;
use image::RgbaImage;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

const STAGE: &str = "capture";

/// Counters describing capture activity since the source was created.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CaptureStats {
    /// Pixel buffers allocated (first capture plus one per viewport resize).
    pub buffer_allocations: u64,
    /// Fresh buffers taken because an earlier frame was still held.
    pub buffer_copies: u64,
    pub frames_captured: u64,
    /// Iterations skipped because of a capture fault.
    pub frames_skipped: u64,
}

#[derive(Debug, Default)]
struct StatCounters {
    buffer_allocations: AtomicU64,
    buffer_copies: AtomicU64,
    frames_captured: AtomicU64,
    frames_skipped: AtomicU64,
}

impl StatCounters {
    fn snapshot(&self) -> CaptureStats {
        CaptureStats {
            buffer_allocations: self.buffer_allocations.load(Ordering::Relaxed),
            buffer_copies: self.buffer_copies.load(Ordering::Relaxed),
            frames_captured: self.frames_captured.load(Ordering::Relaxed),
            frames_skipped: self.frames_skipped.load(Ordering::Relaxed),
        }
    }
}

/// State owned by whichever loop thread is currently running.
///
/// Kept behind a mutex so a restarted loop waits for a detached predecessor
/// to let go before touching the screen or the buffer.
struct CaptureWorker<H> {
    screen: Box<dyn ScreenAccess>,
    buffer: Option<Arc<RgbaImage>>,
    handler: H,
    sequence: u64,
    stats: Arc<StatCounters>,
}

/// Runs on whichever thread lets go of the worker last.
type Finisher<H> = Box<dyn FnOnce(H) + Send>;

impl<H> CaptureWorker<H> {
    /// Drops the screen, then the buffer, and hands back the handler.
    fn into_handler(self) -> H {
        let CaptureWorker {
            screen,
            buffer,
            handler,
            ..
        } = self;
        drop(screen);
        drop(buffer);
        handler
    }
}

impl<H: FrameHandler> CaptureWorker<H> {
    /// Copies `viewport` into the reusable buffer and converts it to a frame.
    ///
    /// The buffer is reallocated when the viewport size changed, or copied
    /// aside when a previous frame still holds it; a failed copy leaves the
    /// previous buffer in place.
    fn capture_once(&mut self, viewport: Viewport) -> Result<Frame> {
        if viewport.is_degenerate() {
            return Err(OcrTransError::InvalidViewport {
                width: viewport.width,
                height: viewport.height,
            });
        }

        if !self.buffer.as_ref().is_some_and(|b| viewport.fits(b)) {
            // Release before allocating so two full-size buffers never coexist.
            self.buffer = None;
            self.buffer = Some(Arc::new(RgbaImage::new(viewport.width, viewport.height)));
            self.stats.buffer_allocations.fetch_add(1, Ordering::Relaxed);
        }

        let Some(shared) = self.buffer.as_mut() else {
            return Err(OcrTransError::Capture {
                message: "capture buffer missing".to_string(),
            });
        };
        if Arc::get_mut(shared).is_none() {
            // An earlier frame is still alive; its pixels stay untouched.
            *shared = Arc::new(RgbaImage::new(viewport.width, viewport.height));
            self.stats.buffer_copies.fetch_add(1, Ordering::Relaxed);
        }
        let Some(buffer) = Arc::get_mut(shared) else {
            return Err(OcrTransError::Capture {
                message: "capture buffer still shared".to_string(),
            });
        };
        self.screen.copy_rect(viewport, buffer)?;

        let frame = Frame::from_shared(Arc::clone(shared), viewport, self.sequence);
        self.sequence += 1;
        self.stats.frames_captured.fetch_add(1, Ordering::Relaxed);
        Ok(frame)
    }
}

/// Everything a loop thread needs besides the worker.
struct LoopContext {
    running: Arc<AtomicBool>,
    settings: LiveSettings,
    interval: Duration,
    retained: Arc<Mutex<Option<Frame>>>,
    reporter: Arc<dyn ErrorReporter>,
}

/// Handle to one spawned loop thread.
struct LoopHandle {
    running: Arc<AtomicBool>,
    thread: JoinHandle<()>,
}

/// Repeatedly captures the configured viewport on a background thread.
pub struct CaptureSource<H: FrameHandler> {
    worker: Arc<Mutex<CaptureWorker<H>>>,
    settings: LiveSettings,
    interval: Duration,
    join_timeout: Duration,
    stats: Arc<StatCounters>,
    retained: Arc<Mutex<Option<Frame>>>,
    reporter: Arc<dyn ErrorReporter>,
    /// Set by `release()` when a detached loop thread still held the worker.
    teardown: Arc<Mutex<Option<Finisher<H>>>>,
    current: Option<LoopHandle>,
}

impl<H: FrameHandler> CaptureSource<H> {
    /// Creates a stopped capture source.
    pub fn new(screen: Box<dyn ScreenAccess>, handler: H, settings: LiveSettings) -> Self {
        let stats = Arc::new(StatCounters::default());
        Self {
            worker: Arc::new(Mutex::new(CaptureWorker {
                screen,
                buffer: None,
                handler,
                sequence: 0,
                stats: Arc::clone(&stats),
            })),
            settings,
            interval: Duration::from_millis(crate::defaults::CAPTURE_INTERVAL_MS),
            join_timeout: Duration::from_millis(crate::defaults::JOIN_TIMEOUT_MS),
            stats,
            retained: Arc::new(Mutex::new(None)),
            reporter: Arc::new(LogReporter),
            teardown: Arc::new(Mutex::new(None)),
            current: None,
        }
    }

    /// Sets the delay between iterations.
    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    /// Sets how long `stop()` waits for the loop thread.
    pub fn with_join_timeout(mut self, timeout: Duration) -> Self {
        self.join_timeout = timeout;
        self
    }

    /// Sets a custom error reporter.
    pub fn with_error_reporter(mut self, reporter: Arc<dyn ErrorReporter>) -> Self {
        self.reporter = reporter;
        self
    }

    /// Stops any running loop, then launches a new one.
    pub fn start(&mut self) -> Result<()> {
        self.stop();

        let running = Arc::new(AtomicBool::new(true));
        let worker = Arc::clone(&self.worker);
        let teardown = Arc::clone(&self.teardown);
        let ctx = LoopContext {
            running: Arc::clone(&running),
            settings: self.settings.clone(),
            interval: self.interval,
            retained: Arc::clone(&self.retained),
            reporter: Arc::clone(&self.reporter),
        };

        let thread = thread::Builder::new()
            .name("screen-capture".to_string())
            .spawn(move || {
                {
                    let mut worker = worker.lock().unwrap_or_else(PoisonError::into_inner);
                    run_loop(&mut worker, &ctx);
                }
                finish_detached(worker, &teardown);
            })?;

        log::info!("Capture loop started");
        self.current = Some(LoopHandle { running, thread });
        Ok(())
    }

    /// Signals the loop to exit and waits up to the join timeout.
    ///
    /// Safe to call repeatedly and before `start()`. A loop that outlives the
    /// timeout is detached; it exits at the top of its next iteration.
    pub fn stop(&mut self) {
        let Some(handle) = self.current.take() else {
            return;
        };
        handle.running.store(false, Ordering::SeqCst);

        // Never join ourselves; the flag is enough for the loop to unwind.
        if handle.thread.thread().id() == thread::current().id() {
            return;
        }

        let deadline = Instant::now() + self.join_timeout;
        let poll_interval = Duration::from_millis(5);
        while !handle.thread.is_finished() {
            if Instant::now() >= deadline {
                log::warn!(
                    "Capture loop did not stop within {:?}, detaching",
                    self.join_timeout
                );
                return;
            }
            thread::sleep(poll_interval);
        }

        if let Err(panic_info) = handle.thread.join() {
            let msg = panic_info
                .downcast_ref::<&str>()
                .copied()
                .or_else(|| panic_info.downcast_ref::<String>().map(|s| s.as_str()))
                .unwrap_or("unknown panic");
            self.reporter.report(
                STAGE,
                &StageError::Fatal(format!("capture thread panicked: {msg}")),
            );
        }
        log::info!("Capture loop stopped");
    }

    /// True while a loop thread is alive and has not been asked to stop.
    pub fn is_running(&self) -> bool {
        self.current.as_ref().is_some_and(|handle| {
            handle.running.load(Ordering::SeqCst) && !handle.thread.is_finished()
        })
    }

    pub fn set_viewport(&self, viewport: Viewport) {
        self.settings.set_viewport(viewport);
    }

    pub fn viewport(&self) -> Viewport {
        self.settings.snapshot().viewport
    }

    pub fn settings(&self) -> &LiveSettings {
        &self.settings
    }

    pub fn stats(&self) -> CaptureStats {
        self.stats.snapshot()
    }

    /// Takes the last frame whose handler asked to keep it.
    pub fn take_retained_frame(&self) -> Option<Frame> {
        self.retained
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
    }

    /// Stops the loop, releases the screen and the capture buffer, and
    /// passes the handler to `finish`.
    ///
    /// If a detached loop thread still holds the worker, returns `None` and
    /// `finish` runs on that thread once its last iteration completes.
    pub fn release<R>(mut self, finish: impl FnOnce(H) -> R + Send + 'static) -> Option<R> {
        self.stop();
        let worker = Arc::clone(&self.worker);
        let teardown = Arc::clone(&self.teardown);
        drop(self);

        // Loop threads check for a finisher under the same lock, so exactly
        // one side sees the last reference.
        let mut slot = teardown.lock().unwrap_or_else(PoisonError::into_inner);
        match Arc::try_unwrap(worker) {
            Ok(worker) => {
                drop(slot);
                let worker = worker.into_inner().unwrap_or_else(PoisonError::into_inner);
                Some(finish(worker.into_handler()))
            }
            Err(worker) => {
                *slot = Some(Box::new(move |handler| {
                    finish(handler);
                }));
                drop(worker);
                None
            }
        }
    }

    /// Stops the loop, releases the screen and the capture buffer, and
    /// returns the handler.
    ///
    /// Returns `None` if a detached loop thread still holds the worker; the
    /// handler is dropped on that thread when it exits.
    pub fn into_handler(self) -> Option<H> {
        self.release(|handler| handler)
    }
}

impl<H: FrameHandler> Drop for CaptureSource<H> {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Final step of a loop thread: the last holder of the worker runs any
/// teardown `release()` left behind.
fn finish_detached<H>(
    worker: Arc<Mutex<CaptureWorker<H>>>,
    teardown: &Mutex<Option<Finisher<H>>>,
) {
    let mut slot = teardown.lock().unwrap_or_else(PoisonError::into_inner);
    match Arc::try_unwrap(worker) {
        Ok(worker) => {
            let finish = slot.take();
            drop(slot);
            let handler = worker
                .into_inner()
                .unwrap_or_else(PoisonError::into_inner)
                .into_handler();
            if let Some(finish) = finish {
                log::debug!("Running deferred capture teardown");
                finish(handler);
            }
        }
        Err(worker) => drop(worker),
    }
}

/// Loop body. Runs until the flag clears or a handler sets `break_loop`.
fn run_loop<H: FrameHandler>(worker: &mut CaptureWorker<H>, ctx: &LoopContext) {
    while ctx.running.load(Ordering::SeqCst) {
        let settings = ctx.settings.snapshot();

        match worker.capture_once(settings.viewport) {
            Ok(frame) => {
                let mut event = FrameEvent::new(frame, settings);
                worker.handler.on_frame(&mut event);

                if !event.dispose_frame {
                    *ctx.retained.lock().unwrap_or_else(PoisonError::into_inner) =
                        Some(event.frame);
                }
                if event.break_loop {
                    log::debug!("Frame handler requested loop termination");
                    ctx.running.store(false, Ordering::SeqCst);
                    break;
                }
            }
            Err(e) => {
                worker.stats.frames_skipped.fetch_add(1, Ordering::Relaxed);
                ctx.reporter
                    .report(STAGE, &StageError::Recoverable(e.to_string()));
            }
        }

        thread::sleep(ctx.interval);
    }
}
