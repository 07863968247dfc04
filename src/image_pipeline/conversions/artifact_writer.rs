use std::io::Write;

use crate::image_pipeline::common::error::Result;
use crate::image_pipeline::conversions::types::PipelineConfig;
use crate::image_pipeline::grid::{ColorGrid, MonoGrid};
use crate::image_pipeline::pnm::{PixelMapWriter, PnmWriter};
use crate::image_pipeline::tiff::StandardTiffWriter;

/// Writer picked at runtime from the configured output encoding.
#[derive(Debug, Clone, Copy)]
pub enum ArtifactWriter {
    Pnm(PnmWriter),
    Tiff(StandardTiffWriter),
}

impl ArtifactWriter {
    pub fn from_config(config: &PipelineConfig) -> Self {
        match config.encoding.pnm() {
            Some(encoding) => ArtifactWriter::Pnm(PnmWriter::new(encoding)),
            None => ArtifactWriter::Tiff(StandardTiffWriter::new(config.compression)),
        }
    }
}

impl PixelMapWriter for ArtifactWriter {
    fn write_mono(&self, image: &MonoGrid, output: &mut dyn Write) -> Result<()> {
        match self {
            ArtifactWriter::Pnm(w) => w.write_mono(image, output),
            ArtifactWriter::Tiff(w) => w.write_mono(image, output),
        }
    }

    fn write_color(&self, image: &ColorGrid, output: &mut dyn Write) -> Result<()> {
        match self {
            ArtifactWriter::Pnm(w) => w.write_color(image, output),
            ArtifactWriter::Tiff(w) => w.write_color(image, output),
        }
    }
}
