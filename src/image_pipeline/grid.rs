//! Pixel grid module
//!
//! Row-major grids with bottom-left image coordinates and the neighbor
//! offsets used during reconstruction.

pub mod rows;
pub mod types;

pub use rows::fill_rows;
pub use types::{
    ColorGrid, MonoGrid, NeighborOffsets, Neighbors, PixelGrid, Rgb, coordinates, linear_index,
};
