//! Pixel grid types shared by the mosaic filter and the reconstructor

use crate::image_pipeline::cfa::Channel;
use crate::image_pipeline::common::error::{PipelineError, Result};

/// One full-color sample, 8 bits per channel.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const BLACK: Rgb = Rgb::new(0, 0, 0);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub const fn gray(value: u8) -> Self {
        Self::new(value, value, value)
    }

    /// Intensity of a single channel.
    pub fn channel(&self, channel: Channel) -> u8 {
        match channel {
            Channel::Red => self.r,
            Channel::Green => self.g,
            Channel::Blue => self.b,
        }
    }

    pub fn to_array(self) -> [u8; 3] {
        [self.r, self.g, self.b]
    }
}

impl From<[u8; 3]> for Rgb {
    fn from([r, g, b]: [u8; 3]) -> Self {
        Self::new(r, g, b)
    }
}

/// Rectangular, row-major grid of samples.
///
/// Storage row 0 holds image row `y = height - 1`: the walk order of both
/// pipeline stages starts at the top row and moves down, so samples supplied
/// in walk order land at consecutive indices.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelGrid<T> {
    width: usize,
    height: usize,
    data: Vec<T>,
}

/// Single-channel grid (the mosaic artifact).
pub type MonoGrid = PixelGrid<u8>;

/// Three-channel grid (source and reconstructed images).
pub type ColorGrid = PixelGrid<Rgb>;

/// Samples surrounding an interior pixel, resolved through [`NeighborOffsets`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Neighbors<T> {
    pub up: T,
    pub down: T,
    pub left: T,
    pub right: T,
    pub upper_left: T,
    pub lower_right: T,
}

/// Linear-index offsets of the six reconstruction neighbors for a grid width.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NeighborOffsets {
    pub up: isize,
    pub down: isize,
    pub left: isize,
    pub right: isize,
    pub upper_left: isize,
    pub lower_right: isize,
}

impl NeighborOffsets {
    pub fn for_width(width: usize) -> Self {
        let nx = width as isize;
        Self {
            up: -nx,
            down: nx,
            left: -1,
            right: 1,
            upper_left: -nx - 1,
            lower_right: nx + 1,
        }
    }
}

/// Linear index of image coordinate `(x, y)` with `y = 0` as the bottom row.
pub fn linear_index(width: usize, height: usize, x: usize, y: usize) -> usize {
    x + width * (height - 1 - y)
}

/// Inverse of [`linear_index`].
pub fn coordinates(width: usize, height: usize, index: usize) -> (usize, usize) {
    (index % width, height - 1 - index / width)
}

fn check_dimensions(width: usize, height: usize) -> Result<usize> {
    if width == 0 || height == 0 {
        return Err(PipelineError::InvalidDimensions(width, height));
    }
    width
        .checked_mul(height)
        .ok_or(PipelineError::InvalidDimensions(width, height))
}

impl<T: Copy> PixelGrid<T> {
    pub fn filled(width: usize, height: usize, value: T) -> Result<Self> {
        let len = check_dimensions(width, height)?;
        Ok(Self {
            width,
            height,
            data: vec![value; len],
        })
    }

    /// Wraps samples supplied in walk order (top row first, left to right).
    pub fn from_samples(width: usize, height: usize, data: Vec<T>) -> Result<Self> {
        let expected = check_dimensions(width, height)?;
        if data.len() != expected {
            return Err(PipelineError::DimensionMismatch {
                expected,
                found: data.len(),
            });
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Samples in walk order.
    pub fn samples(&self) -> &[T] {
        &self.data
    }

    pub fn into_samples(self) -> Vec<T> {
        self.data
    }

    pub fn index_of(&self, x: usize, y: usize) -> usize {
        linear_index(self.width, self.height, x, y)
    }

    pub fn coords_of(&self, index: usize) -> (usize, usize) {
        coordinates(self.width, self.height, index)
    }

    pub fn get(&self, x: usize, y: usize) -> Option<T> {
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(self.data[self.index_of(x, y)])
    }

    /// Pixels on the outermost ring have at least one neighbor out of bounds.
    pub fn is_border(&self, x: usize, y: usize) -> bool {
        x == 0 || y == 0 || x == self.width - 1 || y == self.height - 1
    }

    /// Neighbor samples of `(x, y)`, or `None` for border pixels.
    pub fn neighbors(&self, x: usize, y: usize) -> Option<Neighbors<T>> {
        if x >= self.width || y >= self.height || self.is_border(x, y) {
            return None;
        }
        let offsets = NeighborOffsets::for_width(self.width);
        let p = self.index_of(x, y) as isize;
        let at = |offset: isize| self.data[(p + offset) as usize];
        Some(Neighbors {
            up: at(offsets.up),
            down: at(offsets.down),
            left: at(offsets.left),
            right: at(offsets.right),
            upper_left: at(offsets.upper_left),
            lower_right: at(offsets.lower_right),
        })
    }
}

impl ColorGrid {
    /// Flattens to `[R, G, B, R, G, B, ...]` in walk order.
    pub fn to_interleaved(&self) -> Vec<u8> {
        self.data.iter().flat_map(|px| px.to_array()).collect()
    }

    pub fn from_interleaved(width: usize, height: usize, bytes: &[u8]) -> Result<Self> {
        if bytes.len() % 3 != 0 {
            return Err(PipelineError::DimensionMismatch {
                expected: width.saturating_mul(height),
                found: bytes.len() / 3,
            });
        }
        let data = bytes
            .chunks_exact(3)
            .map(|c| Rgb::new(c[0], c[1], c[2]))
            .collect();
        Self::from_samples(width, height, data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_origin_is_bottom_left() {
        // 3 wide, 2 tall: storage row 0 is y = 1
        assert_eq!(linear_index(3, 2, 0, 1), 0);
        assert_eq!(linear_index(3, 2, 2, 1), 2);
        assert_eq!(linear_index(3, 2, 0, 0), 3);
        assert_eq!(linear_index(3, 2, 2, 0), 5);
    }

    #[test]
    fn test_coordinates_invert_linear_index() {
        let (w, h) = (5, 4);
        for index in 0..w * h {
            let (x, y) = coordinates(w, h, index);
            assert_eq!(linear_index(w, h, x, y), index);
        }
    }

    #[test]
    fn test_from_samples_rejects_wrong_count() {
        let err = MonoGrid::from_samples(4, 4, vec![0; 15]).unwrap_err();
        assert!(matches!(
            err,
            PipelineError::DimensionMismatch { expected: 16, found: 15 }
        ));
    }

    #[test]
    fn test_zero_dimension_rejected() {
        assert!(matches!(
            MonoGrid::filled(0, 4, 0),
            Err(PipelineError::InvalidDimensions(0, 4))
        ));
    }

    #[test]
    fn test_border_has_no_neighbors() {
        let grid = MonoGrid::filled(4, 4, 1).unwrap();
        for y in 0..4 {
            for x in 0..4 {
                let interior = x > 0 && x < 3 && y > 0 && y < 3;
                assert_eq!(grid.neighbors(x, y).is_some(), interior, "({x}, {y})");
                assert_eq!(grid.is_border(x, y), !interior);
            }
        }
    }

    #[test]
    fn test_neighbor_positions() {
        // Each sample holds its own linear index
        let grid = MonoGrid::from_samples(4, 4, (0..16).collect()).unwrap();
        let p = grid.index_of(1, 2) as u8;
        let n = grid.neighbors(1, 2).unwrap();

        assert_eq!(n.up, p - 4);
        assert_eq!(n.down, p + 4);
        assert_eq!(n.left, p - 1);
        assert_eq!(n.right, p + 1);
        assert_eq!(n.upper_left, p - 5);
        assert_eq!(n.lower_right, p + 5);

        // "up" is the row above in image coordinates
        assert_eq!(Some(n.up), grid.get(1, 3));
        assert_eq!(Some(n.upper_left), grid.get(0, 3));
        assert_eq!(Some(n.lower_right), grid.get(2, 1));
    }

    #[test]
    fn test_interleaved_layout() {
        let grid = ColorGrid::from_samples(2, 1, vec![Rgb::new(1, 2, 3), Rgb::new(4, 5, 6)]).unwrap();
        let bytes = grid.to_interleaved();
        assert_eq!(bytes, vec![1, 2, 3, 4, 5, 6]);
        assert_eq!(ColorGrid::from_interleaved(2, 1, &bytes).unwrap(), grid);
    }
}
