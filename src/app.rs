//! Live translation entry point.
//!
//! Wires the real collaborators together:
//! screen → tesseract → translation service → stdout

use crate::capture::ScreenshotsScreen;
use crate::cli::RunArgs;
use crate::config::Config;
use crate::error::{OcrTransError, Result};
use crate::language::Language;
use crate::ocr::TesseractEngine;
use crate::pipeline::{FrameLimitSink, OutputFormat, Pipeline, PipelineHandle, StdoutSink};
use crate::settings::LiveSettings;
use crate::translate::GoogleTranslator;
use std::io::{self, IsTerminal};
use std::time::Duration;

/// How often the main task checks whether the capture loop ended by itself.
const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Run the capture loop until ctrl-c or until the frame limit is reached.
///
/// The stages block, so only the wait for ctrl-c runs on a tokio runtime.
/// Building and tearing down the pipeline happen outside it.
///
/// # Arguments
/// * `config` - Loaded configuration, overridden by `args`
/// * `args` - Command-line run options
/// * `quiet` - Suppress status messages on stderr
pub fn run_capture(mut config: Config, args: &RunArgs, quiet: bool) -> Result<()> {
    args.apply(&mut config);
    config.validate()?;
    export_tessdata(&config);

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    let mut handle = build_pipeline(&config, args)?;
    handle.start()?;

    if !quiet {
        let viewport = config.viewport();
        eprintln!(
            "Translating {}x{}@{},{} from {} to {}. Press Ctrl+C to stop.",
            viewport.width,
            viewport.height,
            viewport.x,
            viewport.y,
            config.ocr.language.name(),
            config.translation.target.name()
        );
    }

    let interrupted = runtime.block_on(wait_for_exit(&handle))?;
    if interrupted && !quiet {
        eprintln!("\nShutting down...");
    }

    handle.stop();
    let stats = handle.stats();
    handle.shutdown();

    if !quiet {
        eprintln!(
            "{} frame(s) translated, {} dropped, {} capture(s) skipped",
            stats.frames_published, stats.frames_dropped, stats.capture.frames_skipped
        );
    }
    Ok(())
}

fn build_pipeline(config: &Config, args: &RunArgs) -> Result<PipelineHandle> {
    let screen = Box::new(ScreenshotsScreen::new());
    let engine = Box::new(TesseractEngine::new(config.tesseract_config()));
    let translator = Box::new(GoogleTranslator::new(config.google_config())?);

    let format = if args.json {
        OutputFormat::Json
    } else {
        OutputFormat::Text
    };
    let color = !args.no_color && io::stdout().is_terminal();

    let mut pipeline = Pipeline::new(config.pipeline_config())
        .with_sink(Box::new(StdoutSink::new(format).with_color(color)));
    if let Some(limit) = args.frames {
        pipeline = pipeline.with_sink(Box::new(FrameLimitSink::new(limit)));
    }

    pipeline.build(
        screen,
        engine,
        translator,
        LiveSettings::new(config.settings()),
    )
}

/// Returns `true` when interrupted, `false` when the loop stopped on its own.
async fn wait_for_exit(handle: &PipelineHandle) -> Result<bool> {
    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    loop {
        tokio::select! {
            signal = &mut ctrl_c => {
                signal.map_err(|e| {
                    OcrTransError::Other(format!("Failed to wait for Ctrl+C: {}", e))
                })?;
                return Ok(true);
            }
            _ = tokio::time::sleep(POLL_INTERVAL) => {
                if !handle.is_running() {
                    return Ok(false);
                }
            }
        }
    }
}

/// Point the tesseract child processes at the configured language data.
///
/// rusty-tesseract has no tessdata argument, so the directory travels through
/// the environment the `tesseract` binary reads.
fn export_tessdata(config: &Config) {
    if let Some(dir) = &config.ocr.tessdata {
        log::debug!("Using tessdata directory {}", dir.display());
        // SAFETY: called before the runtime and the capture thread exist, so
        // no other thread reads the environment concurrently.
        unsafe { std::env::set_var("TESSDATA_PREFIX", dir) };
    }
}

/// Print every supported language and whether its tesseract data is installed.
pub fn list_languages(config: &Config) -> Result<()> {
    let engine = TesseractEngine::new(config.tesseract_config());
    let installed = match engine.installed_languages() {
        Ok(langs) => Some(langs),
        Err(e) => {
            log::warn!("Could not query installed language packs: {}", e);
            None
        }
    };

    println!("Supported languages:");
    for lang in Language::ALL {
        let status = match &installed {
            Some(langs) if langs.iter().any(|l| l == lang.tesseract_code()) => "installed",
            Some(_) => "missing",
            None => "unknown",
        };
        println!(
            "  {:<3} {:<8} {:<10} {}",
            lang.iso_code(),
            lang.tesseract_code(),
            lang.name(),
            status
        );
    }
    Ok(())
}
