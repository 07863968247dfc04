use tracing::{debug, info};

use crate::image_pipeline::cfa::ColorFilterPattern;
use crate::image_pipeline::common::error::{PipelineError, Result};
use crate::image_pipeline::common::progress::{NoProgress, ProgressSink, Stage};
use crate::image_pipeline::grid::{ColorGrid, MonoGrid, Rgb, coordinates, fill_rows};

/// Samples a full-color grid through the RGGB filter, keeping one channel
/// per pixel.
#[derive(Debug, Clone)]
pub struct MosaicFilter {
    pattern: ColorFilterPattern,
    parallel: bool,
}

impl Default for MosaicFilter {
    fn default() -> Self {
        Self::new()
    }
}

impl MosaicFilter {
    pub fn new() -> Self {
        Self {
            pattern: ColorFilterPattern::RGGB,
            parallel: true,
        }
    }

    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn pattern(&self) -> ColorFilterPattern {
        self.pattern
    }

    /// The value kept at `(x, y)`, copied verbatim from the selected channel.
    pub fn select(&self, x: usize, y: usize, sample: Rgb) -> u8 {
        sample.channel(self.pattern.channel(x, y))
    }

    pub fn apply(&self, source: &ColorGrid) -> Result<MonoGrid> {
        self.apply_with_progress(source, &NoProgress)
    }

    pub fn apply_with_progress(
        &self,
        source: &ColorGrid,
        progress: &dyn ProgressSink,
    ) -> Result<MonoGrid> {
        let (width, height) = (source.width(), source.height());
        info!("Filtering {}x{} image through {} pattern", width, height, self.pattern);

        let input = source.samples();
        let mut output = vec![0u8; source.len()];
        fill_rows(
            &mut output,
            width,
            self.parallel,
            Stage::Filter,
            progress,
            |row, dst| {
                let y = height - 1 - row;
                let src = &input[row * width..(row + 1) * width];
                for (x, (value, &sample)) in dst.iter_mut().zip(src).enumerate() {
                    *value = self.select(x, y, sample);
                }
            },
        );

        MonoGrid::from_samples(width, height, output)
    }

    /// Filters samples supplied one at a time in walk order (top row first,
    /// left to right). The sample count must match `width * height` exactly.
    pub fn filter_stream<I>(&self, width: usize, height: usize, samples: I) -> Result<MonoGrid>
    where
        I: IntoIterator<Item = Rgb>,
    {
        if width == 0 || height == 0 {
            return Err(PipelineError::InvalidDimensions(width, height));
        }
        let expected = width * height;
        let mut samples = samples.into_iter();
        let mut output = Vec::with_capacity(expected);

        for index in 0..expected {
            let Some(sample) = samples.next() else {
                return Err(PipelineError::DimensionMismatch {
                    expected,
                    found: index,
                });
            };
            let (x, y) = coordinates(width, height, index);
            output.push(self.select(x, y, sample));
        }

        let extra = samples.count();
        if extra > 0 {
            return Err(PipelineError::DimensionMismatch {
                expected,
                found: expected + extra,
            });
        }

        debug!("Filtered {} streamed samples", expected);
        MonoGrid::from_samples(width, height, output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::image_pipeline::cfa::Channel;

    fn gradient(width: usize, height: usize) -> ColorGrid {
        let samples = (0..width * height)
            .map(|i| Rgb::new((i % 251) as u8, ((i * 7) % 253) as u8, ((i * 13) % 255) as u8))
            .collect();
        ColorGrid::from_samples(width, height, samples).unwrap()
    }

    #[test]
    fn test_filter_is_pure_projection() {
        let source = gradient(6, 4);
        let mosaic = MosaicFilter::new().apply(&source).unwrap();
        let pattern = ColorFilterPattern::RGGB;

        for y in 0..4 {
            for x in 0..6 {
                let expected = source.get(x, y).unwrap().channel(pattern.channel(x, y));
                assert_eq!(mosaic.get(x, y), Some(expected), "({x}, {y})");
            }
        }
    }

    #[test]
    fn test_channel_selection_by_parity() {
        let source = ColorGrid::filled(2, 2, Rgb::new(10, 20, 30)).unwrap();
        let mosaic = MosaicFilter::new().apply(&source).unwrap();

        assert_eq!(mosaic.get(1, 1), Some(10));
        assert_eq!(mosaic.get(0, 1), Some(20));
        assert_eq!(mosaic.get(1, 0), Some(20));
        assert_eq!(mosaic.get(0, 0), Some(30));
        // Walk order: top row (y = 1) first
        assert_eq!(mosaic.samples(), &[20u8, 10, 30, 20]);
    }

    #[test]
    fn test_sequential_matches_parallel() {
        let source = gradient(9, 7);
        let par = MosaicFilter::new().apply(&source).unwrap();
        let seq = MosaicFilter::new().with_parallel(false).apply(&source).unwrap();
        assert_eq!(par, seq);
    }

    #[test]
    fn test_stream_matches_grid() {
        let source = gradient(4, 6);
        let filter = MosaicFilter::new();
        let streamed = filter
            .filter_stream(4, 6, source.samples().iter().copied())
            .unwrap();
        assert_eq!(streamed, filter.apply(&source).unwrap());
    }

    #[test]
    fn test_stream_too_short() {
        let err = MosaicFilter::new()
            .filter_stream(4, 4, vec![Rgb::BLACK; 10])
            .unwrap_err();
        assert!(matches!(
            err,
            PipelineError::DimensionMismatch { expected: 16, found: 10 }
        ));
    }

    #[test]
    fn test_stream_too_long() {
        let err = MosaicFilter::new()
            .filter_stream(2, 2, vec![Rgb::BLACK; 7])
            .unwrap_err();
        assert!(matches!(
            err,
            PipelineError::DimensionMismatch { expected: 4, found: 7 }
        ));
    }

    #[test]
    fn test_select_uses_pattern_channel() {
        let filter = MosaicFilter::new();
        let px = Rgb::new(1, 2, 3);
        assert_eq!(filter.pattern().channel(3, 5), Channel::Red);
        assert_eq!(filter.select(3, 5, px), 1);
        assert_eq!(filter.select(4, 5, px), 2);
        assert_eq!(filter.select(4, 6, px), 3);
    }
}
