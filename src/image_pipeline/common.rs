//! Common utilities module
//!
//! This module contains shared utilities used across the image pipeline.

pub mod error;
pub mod progress;
pub mod timing;

pub use error::{PipelineError, Result};
pub use progress::{LogProgress, NoProgress, ProgressSink, Stage};
pub use timing::{PipelineTimings, StepTiming, Timer};
