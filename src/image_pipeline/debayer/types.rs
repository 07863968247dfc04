//! Types for debayering operations

use crate::image_pipeline::grid::Neighbors;

/// Truncating mean of two samples.
pub fn average(a: u8, b: u8) -> u8 {
    ((a as u16 + b as u16) / 2) as u8
}

/// Pairwise averages of the six neighbors of an interior pixel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NeighborAverages {
    /// Mean of the samples above and below
    pub updown: u8,
    /// Mean of the samples to the left and right
    pub leftright: u8,
    /// Mean of the upper-left and lower-right samples
    pub diagonal: u8,
}

impl From<Neighbors<u8>> for NeighborAverages {
    fn from(n: Neighbors<u8>) -> Self {
        Self {
            updown: average(n.up, n.down),
            leftright: average(n.left, n.right),
            diagonal: average(n.upper_left, n.lower_right),
        }
    }
}
