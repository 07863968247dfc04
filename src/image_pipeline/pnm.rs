//! Portable pixel map module
//!
//! Reads and writes the grids exchanged between pipeline stages as
//! P2/P3 text maps or P5/P6 binary maps.

mod pnm_reader;
mod pnm_writer;
mod reader;
mod tokens;
mod writer;
pub mod types;

pub use pnm_reader::PnmReader;
pub use pnm_writer::PnmWriter;
pub use reader::PixelMapReader;
pub use tokens::Tokens;
pub use types::{MAX_SAMPLE_VALUE, PnmEncoding, PnmFormat, PnmHeader};
pub use writer::PixelMapWriter;
