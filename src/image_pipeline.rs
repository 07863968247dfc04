//! Image processing pipeline module
//!
//! Simulates an RGGB sensor: a full-color image is sampled into a Bayer
//! mosaic, then reconstructed by nearest-neighbor averaging. Reading and
//! writing the artifacts lives in `pnm` and `tiff`, orchestration in
//! `conversions`.

pub mod cfa;
pub mod common;
pub mod conversions;
pub mod debayer;
pub mod filter;
pub mod grid;
pub mod pnm;
pub mod tiff;

pub use common::{
    LogProgress,
    NoProgress,
    PipelineError,
    PipelineTimings,
    ProgressSink,
    Result,
    Stage,
};

pub use cfa::{
    CfaSite,
    Channel,
    ColorFilterPattern,
};

pub use grid::{
    ColorGrid,
    MonoGrid,
    PixelGrid,
    Rgb,
};

pub use filter::MosaicFilter;

pub use debayer::NeighborDebayer;

pub use pnm::{
    PixelMapReader,
    PixelMapWriter,
    PnmEncoding,
    PnmFormat,
    PnmHeader,
    PnmReader,
    PnmWriter,
};

pub use self::tiff::{
    StandardTiffWriter,
    TiffCompression,
};

pub use conversions::{
    ArtifactWriter,
    BayerPipeline,
    OutputEncoding,
    PipelineConfig,
    PipelineConfigBuilder,
};
