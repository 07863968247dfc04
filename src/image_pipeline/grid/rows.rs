//! Row-wise output filling, sequential or on the rayon pool

use std::sync::atomic::{AtomicUsize, Ordering};

use rayon::prelude::*;

use crate::image_pipeline::common::progress::{ProgressSink, Stage};

/// Fills `output` one storage row at a time.
///
/// `fill_row` receives the storage row index and the row slice; it must only
/// read shared input, which makes the parallel and sequential walks produce
/// the same buffer.
pub fn fill_rows<T, F>(
    output: &mut [T],
    width: usize,
    parallel: bool,
    stage: Stage,
    progress: &dyn ProgressSink,
    fill_row: F,
) where
    T: Send,
    F: Fn(usize, &mut [T]) + Sync,
{
    let rows = output.len() / width;
    let done = AtomicUsize::new(0);
    progress.report(stage, 0.0);

    let step = |row: usize, slice: &mut [T]| {
        fill_row(row, slice);
        let finished = done.fetch_add(1, Ordering::Relaxed) + 1;
        progress.report(stage, finished as f64 / rows as f64);
    };

    if parallel {
        output
            .par_chunks_mut(width)
            .enumerate()
            .for_each(|(row, slice)| step(row, slice));
    } else {
        output
            .chunks_mut(width)
            .enumerate()
            .for_each(|(row, slice)| step(row, slice));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::image_pipeline::common::progress::NoProgress;
    use std::sync::Mutex;

    #[test]
    fn test_parallel_matches_sequential() {
        let fill = |row: usize, slice: &mut [usize]| {
            for (x, v) in slice.iter_mut().enumerate() {
                *v = row * 100 + x;
            }
        };
        let mut seq = vec![0usize; 7 * 9];
        let mut par = vec![0usize; 7 * 9];
        fill_rows(&mut seq, 7, false, Stage::Filter, &NoProgress, fill);
        fill_rows(&mut par, 7, true, Stage::Filter, &NoProgress, fill);
        assert_eq!(seq, par);
        assert_eq!(seq[7 * 8 + 6], 806);
    }

    #[test]
    fn test_progress_ends_at_one() {
        let reports = Mutex::new(Vec::new());
        let sink = |_: Stage, f: f64| reports.lock().unwrap().push(f);
        let mut out = vec![0u8; 4 * 3];
        fill_rows(&mut out, 4, false, Stage::Demosaic, &sink, |_, _| {});

        let reports = reports.into_inner().unwrap();
        assert_eq!(reports.first(), Some(&0.0));
        assert_eq!(reports.last(), Some(&1.0));
        assert_eq!(reports.len(), 4);
    }
}
