//! Debayering module for reconstructing RGB images from Bayer mosaics

pub mod neighbor_debayer;
pub mod types;

pub use neighbor_debayer::{NeighborDebayer, reconstruct_pixel};
pub use types::{NeighborAverages, average};
