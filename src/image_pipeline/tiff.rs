//! TIFF writing module
//!
//! Optional TIFF export of the mosaic and reconstructed artifacts.

mod standard_tiff_writer;
pub mod types;

pub use standard_tiff_writer::StandardTiffWriter;
pub use types::TiffCompression;
