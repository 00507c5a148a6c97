//! Frame pipeline for live screen translation.
//!
//! A single capture thread runs capture, recognition and translation
//! serially for each frame, then hands the combined result to the sinks.

pub mod error;
pub mod orchestrator;
pub mod sink;
pub mod types;

pub use error::{ErrorReporter, LogReporter, StageError};
pub use orchestrator::{Pipeline, PipelineConfig, PipelineHandle, PipelineStats};
pub use sink::{ChannelSink, CollectorSink, FrameLimitSink, OutputFormat, ResultSink, StdoutSink};
pub use types::{CombinedResult, FrameTiming};
