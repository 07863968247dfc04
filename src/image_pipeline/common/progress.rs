//! Progress reporting for the per-pixel stages
//!
//! Reporting is a side channel: the stages call into a [`ProgressSink`] with
//! the completed fraction of rows and never look at the result.

use std::fmt;
use std::sync::atomic::{AtomicU32, Ordering};

use tracing::info;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    Filter,
    Demosaic,
}

impl Stage {
    fn slot(self) -> usize {
        match self {
            Stage::Filter => 0,
            Stage::Demosaic => 1,
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::Filter => f.write_str("Filtering"),
            Stage::Demosaic => f.write_str("Demosaicing"),
        }
    }
}

/// Receives fractional progress in `0.0..=1.0`. May be called from several
/// worker threads at once, and not necessarily in increasing order.
pub trait ProgressSink: Send + Sync {
    fn report(&self, stage: Stage, fraction: f64);
}

impl<F> ProgressSink for F
where
    F: Fn(Stage, f64) + Send + Sync,
{
    fn report(&self, stage: Stage, fraction: f64) {
        self(stage, fraction)
    }
}

/// Discards all progress.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoProgress;

impl ProgressSink for NoProgress {
    fn report(&self, _stage: Stage, _fraction: f64) {}
}

/// Logs progress through `tracing` each time a stage crosses another
/// `step_percent` boundary. A report of `0.0` rearms the stage.
#[derive(Debug)]
pub struct LogProgress {
    step_percent: u32,
    last: [AtomicU32; 2],
}

impl LogProgress {
    pub fn new(step_percent: u32) -> Self {
        Self {
            step_percent: step_percent.clamp(1, 100),
            last: [AtomicU32::new(0), AtomicU32::new(0)],
        }
    }
}

impl Default for LogProgress {
    fn default() -> Self {
        Self::new(10)
    }
}

impl ProgressSink for LogProgress {
    fn report(&self, stage: Stage, fraction: f64) {
        let slot = &self.last[stage.slot()];
        if fraction <= 0.0 {
            slot.store(0, Ordering::Relaxed);
            return;
        }
        let percent = (fraction.min(1.0) * 100.0) as u32;
        let bucket = percent / self.step_percent;
        if bucket > slot.fetch_max(bucket, Ordering::Relaxed) {
            info!("{}: {:5.2}%", stage, fraction.min(1.0) * 100.0);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[test]
    fn test_closure_sink_receives_reports() {
        let seen = Mutex::new(Vec::new());
        let sink = |stage: Stage, fraction: f64| seen.lock().unwrap().push((stage, fraction));
        sink.report(Stage::Filter, 0.5);
        sink.report(Stage::Demosaic, 1.0);
        assert_eq!(
            *seen.lock().unwrap(),
            vec![(Stage::Filter, 0.5), (Stage::Demosaic, 1.0)]
        );
    }

    #[test]
    fn test_log_progress_tracks_highest_bucket() {
        let sink = LogProgress::new(25);
        sink.report(Stage::Filter, 0.3);
        sink.report(Stage::Filter, 0.1);
        assert_eq!(sink.last[0].load(Ordering::Relaxed), 1);
        sink.report(Stage::Filter, 1.0);
        assert_eq!(sink.last[0].load(Ordering::Relaxed), 4);
        assert_eq!(sink.last[1].load(Ordering::Relaxed), 0);

        sink.report(Stage::Filter, 0.0);
        assert_eq!(sink.last[0].load(Ordering::Relaxed), 0);
    }
}
