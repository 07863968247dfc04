//! Pipeline conversions module
//!
//! Orchestrates decode, mosaic filter, demosaic and encode for one run.

mod artifact_writer;
mod bayer_pipeline;
mod output;
pub mod types;


pub use artifact_writer::ArtifactWriter;
pub use bayer_pipeline::BayerPipeline;
pub use output::PendingOutput;
pub use types::{
    DEFAULT_MOSAIC_OUTPUT_PATH, DEFAULT_RECONSTRUCTED_OUTPUT_PATH, DEFAULT_SOURCE_PATH,
    OutputEncoding, PipelineConfig, PipelineConfigBuilder,
};
