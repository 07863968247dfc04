use tracing::info;

use crate::image_pipeline::cfa::{CfaSite, ColorFilterPattern};
use crate::image_pipeline::common::error::Result;
use crate::image_pipeline::common::progress::{NoProgress, ProgressSink, Stage};
use crate::image_pipeline::debayer::types::NeighborAverages;
use crate::image_pipeline::grid::{ColorGrid, MonoGrid, Rgb, fill_rows};

/// Reconstructs color by averaging same-channel neighbors.
///
/// Border pixels are left black: at least one of the six neighbor offsets
/// falls outside the grid there.
#[derive(Debug, Clone)]
pub struct NeighborDebayer {
    pattern: ColorFilterPattern,
    parallel: bool,
}

impl Default for NeighborDebayer {
    fn default() -> Self {
        Self::new()
    }
}

/// Assembles an output pixel from the held sample and the neighbor averages.
///
/// Under the 2x2 tiling, the vertical and horizontal neighbors of a green
/// site carry red and blue, and the diagonal neighbors of a red or blue
/// site carry the opposite of the two.
pub fn reconstruct_pixel(site: CfaSite, held: u8, averages: NeighborAverages) -> Rgb {
    let NeighborAverages {
        updown,
        leftright,
        diagonal,
    } = averages;
    match site {
        CfaSite::GreenBlueRow => Rgb::new(updown, held, leftright),
        CfaSite::GreenRedRow => Rgb::new(leftright, held, updown),
        CfaSite::Red => Rgb::new(held, leftright, diagonal),
        CfaSite::Blue => Rgb::new(diagonal, leftright, held),
    }
}

impl NeighborDebayer {
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

    /// Reconstructed value at `(x, y)`.
    pub fn pixel_at(&self, mosaic: &MonoGrid, x: usize, y: usize) -> Rgb {
        match mosaic.neighbors(x, y) {
            Some(neighbors) => {
                let held = mosaic.samples()[mosaic.index_of(x, y)];
                reconstruct_pixel(self.pattern.site(x, y), held, neighbors.into())
            }
            None => Rgb::BLACK,
        }
    }

    pub fn process(&self, mosaic: &MonoGrid) -> Result<ColorGrid> {
        self.process_with_progress(mosaic, &NoProgress)
    }

    pub fn process_with_progress(
        &self,
        mosaic: &MonoGrid,
        progress: &dyn ProgressSink,
    ) -> Result<ColorGrid> {
        let (width, height) = (mosaic.width(), mosaic.height());
        info!("Starting neighbor-average demosaic for image {}x{}", width, height);

        let mut output = vec![Rgb::BLACK; mosaic.len()];
        fill_rows(
            &mut output,
            width,
            self.parallel,
            Stage::Demosaic,
            progress,
            |row, dst| {
                let y = height - 1 - row;
                for (x, px) in dst.iter_mut().enumerate() {
                    *px = self.pixel_at(mosaic, x, y);
                }
            },
        );

        ColorGrid::from_samples(width, height, output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::image_pipeline::filter::MosaicFilter;

    fn mosaic_from_rows(width: usize, rows: &[&[u8]]) -> MonoGrid {
        let samples = rows.iter().flat_map(|r| r.iter().copied()).collect();
        MonoGrid::from_samples(width, rows.len(), samples).unwrap()
    }

    #[test]
    fn test_border_is_black() {
        let mosaic = MonoGrid::filled(6, 5, 200).unwrap();
        let out = NeighborDebayer::new().process(&mosaic).unwrap();
        for y in 0..5 {
            for x in 0..6 {
                if mosaic.is_border(x, y) {
                    assert_eq!(out.get(x, y), Some(Rgb::BLACK), "({x}, {y})");
                } else {
                    assert_ne!(out.get(x, y), Some(Rgb::BLACK), "({x}, {y})");
                }
            }
        }
    }

    #[test]
    fn test_channel_assignment_table() {
        let averages = NeighborAverages {
            updown: 1,
            leftright: 2,
            diagonal: 3,
        };
        assert_eq!(reconstruct_pixel(CfaSite::GreenBlueRow, 9, averages), Rgb::new(1, 9, 2));
        assert_eq!(reconstruct_pixel(CfaSite::GreenRedRow, 9, averages), Rgb::new(2, 9, 1));
        assert_eq!(reconstruct_pixel(CfaSite::Red, 9, averages), Rgb::new(9, 2, 3));
        assert_eq!(reconstruct_pixel(CfaSite::Blue, 9, averages), Rgb::new(3, 2, 9));
    }

    #[test]
    fn test_interior_pixels_of_4x4() {
        // Storage rows, top (y = 3) first
        let mosaic = mosaic_from_rows(
            4,
            &[
                &[0, 1, 2, 3],
                &[4, 5, 6, 7],
                &[8, 9, 10, 11],
                &[12, 13, 14, 15],
            ],
        );
        let out = NeighborDebayer::new().process(&mosaic).unwrap();

        // (1, 2) green on a blue row, held 5: up/down 1,9 ; left/right 4,6
        assert_eq!(out.get(1, 2), Some(Rgb::new(5, 5, 5)));
        // (2, 2) blue, held 6: diag 1,11 ; left/right 5,7
        assert_eq!(out.get(2, 2), Some(Rgb::new(6, 6, 6)));
        // (1, 1) red, held 9: left/right 8,10 ; diag 4,14
        assert_eq!(out.get(1, 1), Some(Rgb::new(9, 9, 9)));
        // (2, 1) green on a red row, held 10: left/right 9,11 ; up/down 6,14
        assert_eq!(out.get(2, 1), Some(Rgb::new(10, 10, 10)));

        let mosaic = mosaic_from_rows(
            4,
            &[
                &[0, 0, 0, 0],
                &[0, 7, 0, 0],
                &[0, 0, 3, 0],
                &[0, 0, 0, 0],
            ],
        );
        let out = NeighborDebayer::new().process(&mosaic).unwrap();
        // Red at (1, 1) sees the 3 to its right and nothing diagonal
        assert_eq!(out.get(1, 1), Some(Rgb::new(0, 1, 0)));
        // Green at (1, 2) keeps its own 7, all its neighbors are zero
        assert_eq!(out.get(1, 2), Some(Rgb::new(0, 7, 0)));
        // Blue at (2, 2) has the 7 to its left
        assert_eq!(out.get(2, 2), Some(Rgb::new(0, 3, 0)));
    }

    #[test]
    fn test_averages_truncate() {
        let mosaic = mosaic_from_rows(3, &[&[0, 3, 0], &[3, 50, 4], &[0, 4, 0]]);
        // (1, 1) is red: left/right 3,4 -> 3 ; diag 0,0 -> 0
        let out = NeighborDebayer::new().process(&mosaic).unwrap();
        assert_eq!(out.get(1, 1), Some(Rgb::new(50, 3, 0)));
    }

    #[test]
    fn test_uniform_channels_reconstruct_exactly() {
        let source = ColorGrid::filled(8, 8, Rgb::new(10, 20, 30)).unwrap();
        let mosaic = MosaicFilter::new().apply(&source).unwrap();
        let out = NeighborDebayer::new().process(&mosaic).unwrap();

        for y in 1..7 {
            for x in 1..7 {
                assert_eq!(out.get(x, y), Some(Rgb::new(10, 20, 30)), "({x}, {y})");
            }
        }
    }

    #[test]
    fn test_sequential_matches_parallel() {
        let samples = (0..11 * 9).map(|i| (i * 37 % 256) as u8).collect();
        let mosaic = MonoGrid::from_samples(11, 9, samples).unwrap();
        let par = NeighborDebayer::new().process(&mosaic).unwrap();
        let seq = NeighborDebayer::new()
            .with_parallel(false)
            .process(&mosaic)
            .unwrap();
        assert_eq!(par, seq);
    }

    #[test]
    fn test_tiny_grid_is_all_border() {
        let mosaic = MonoGrid::filled(2, 2, 255).unwrap();
        let out = NeighborDebayer::new().process(&mosaic).unwrap();
        assert!(out.samples().iter().all(|&px| px == Rgb::BLACK));
    }
}
