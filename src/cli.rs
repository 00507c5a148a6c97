//! Command-line interface for ocrtrans
//!
//! Provides argument parsing using clap derive macros.

use crate::config::Config;
use crate::language::Language;
use clap::{Args, Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;
use std::time::Duration;

/// Live screen-region OCR with line-by-line translation
#[derive(Parser, Debug)]
#[command(
    name = "ocrtrans",
    version,
    about = "Live screen-region OCR with line-by-line translation",
    args_conflicts_with_subcommands = true
)]
pub struct Cli {
    /// Subcommand to execute (default: run)
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Path to configuration file
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Suppress output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Verbose output (-v: debug, -vv: trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    #[command(flatten)]
    pub run: RunArgs,
}

impl Cli {
    /// The subcommand to execute, with a bare invocation meaning `run`.
    pub fn into_command(self) -> Commands {
        self.command.unwrap_or(Commands::Run(self.run))
    }
}

/// Options for the capture loop. Unset options fall back to the config file.
#[derive(Args, Debug, Clone, Default, PartialEq)]
pub struct RunArgs {
    /// Language of the captured text (e.g., en, ja, deu)
    #[arg(long, value_name = "LANG")]
    pub from: Option<Language>,

    /// Language to translate into
    #[arg(long, value_name = "LANG")]
    pub to: Option<Language>,

    /// Left edge of the capture region in screen pixels
    #[arg(long, value_name = "PX", allow_hyphen_values = true)]
    pub x: Option<i32>,

    /// Top edge of the capture region in screen pixels
    #[arg(long, value_name = "PX", allow_hyphen_values = true)]
    pub y: Option<i32>,

    /// Width of the capture region
    #[arg(long, value_name = "PX")]
    pub width: Option<u32>,

    /// Height of the capture region
    #[arg(long, value_name = "PX")]
    pub height: Option<u32>,

    /// Pause between frames. Examples: 250ms, 1s, 2s500ms (bare number = ms)
    #[arg(long, value_name = "DURATION", value_parser = parse_interval)]
    pub interval: Option<Duration>,

    /// Stop after this many translated frames
    #[arg(long, value_name = "N")]
    pub frames: Option<u64>,

    /// Print one JSON object per frame instead of text
    #[arg(long)]
    pub json: bool,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,
}

impl RunArgs {
    /// Overlay the command-line options onto a loaded config.
    pub fn apply(&self, config: &mut Config) {
        if let Some(lang) = self.from {
            config.ocr.language = lang;
        }
        if let Some(lang) = self.to {
            config.translation.target = lang;
        }
        if let Some(x) = self.x {
            config.capture.x = x;
        }
        if let Some(y) = self.y {
            config.capture.y = y;
        }
        if let Some(width) = self.width {
            config.capture.width = width;
        }
        if let Some(height) = self.height {
            config.capture.height = height;
        }
        if let Some(interval) = self.interval {
            config.capture.interval_ms = interval.as_millis() as u64;
        }
    }
}

/// Parse a frame interval.
///
/// Accepts `humantime` durations (`250ms`, `1s`, `1s500ms`) and bare numbers
/// as milliseconds.
fn parse_interval(s: &str) -> Result<Duration, String> {
    let s = s.trim();
    if let Ok(ms) = s.parse::<u64>() {
        return Ok(Duration::from_millis(ms));
    }
    humantime::parse_duration(s).map_err(|e| e.to_string())
}

/// Available commands
#[derive(Subcommand, Debug, PartialEq)]
pub enum Commands {
    /// Capture, recognize and translate until ctrl-c (default)
    Run(RunArgs),

    /// List supported languages and whether their OCR data is installed
    Languages,

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        shell: Shell,
    },
}

/// Configuration management actions
#[derive(Subcommand, Debug, PartialEq)]
pub enum ConfigAction {
    /// Print the effective configuration as TOML
    Show,
    /// Print the configuration file path
    Path,
    /// Write a default configuration file
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}
