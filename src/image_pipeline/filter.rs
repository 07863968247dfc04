//! Mosaic filter module
//!
//! Projects a full-color image onto a single-channel Bayer mosaic.

mod bayer_filter;

pub use bayer_filter::MosaicFilter;
