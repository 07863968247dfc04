use std::io::{Cursor, Write};

use ::tiff::TiffResult;
use ::tiff::encoder::colortype::{Gray8, RGB8};
use ::tiff::encoder::compression::DeflateLevel;
use ::tiff::encoder::{Compression, TiffEncoder};
use tracing::debug;

use crate::image_pipeline::common::error::{PipelineError, Result};
use crate::image_pipeline::grid::{ColorGrid, MonoGrid};
use crate::image_pipeline::pnm::PixelMapWriter;
use crate::image_pipeline::tiff::types::TiffCompression;

fn tiff_dimensions(width: usize, height: usize) -> Result<(u32, u32)> {
    match (u32::try_from(width), u32::try_from(height)) {
        (Ok(w), Ok(h)) => Ok((w, h)),
        _ => Err(PipelineError::EncodeError(format!(
            "{width}x{height} exceeds the TIFF size limit"
        ))),
    }
}

/// Writes the mosaic as 8-bit grayscale and reconstructions as 8-bit RGB.
#[derive(Debug, Clone, Copy, Default)]
pub struct StandardTiffWriter {
    pub compression: TiffCompression,
}

impl StandardTiffWriter {
    pub fn new(compression: TiffCompression) -> Self {
        Self { compression }
    }

    fn compression(&self) -> Compression {
        match self.compression {
            TiffCompression::None => Compression::Uncompressed,
            TiffCompression::Lzw => Compression::Lzw,
            TiffCompression::DeflateFast => Compression::Deflate(DeflateLevel::Fast),
            TiffCompression::DeflateBalanced => Compression::Deflate(DeflateLevel::Balanced),
            TiffCompression::DeflateBest => Compression::Deflate(DeflateLevel::Best),
        }
    }

    /// Runs `write_image` against an in-memory encoder (TIFF needs `Seek`)
    /// and copies the finished file to `output`.
    fn encode<F>(&self, width: usize, height: usize, output: &mut dyn Write, write_image: F) -> Result<()>
    where
        F: FnOnce(TiffEncoder<Cursor<&mut Vec<u8>>>, u32, u32) -> TiffResult<()>,
    {
        let (tiff_width, tiff_height) = tiff_dimensions(width, height)?;
        debug!("Encoding TIFF image: {}x{}", width, height);

        let mut buffer: Vec<u8> = Vec::new();
        let encoder = TiffEncoder::new(Cursor::new(&mut buffer))
            .map_err(|e| PipelineError::EncodeError(e.to_string()))?
            .with_compression(self.compression());
        write_image(encoder, tiff_width, tiff_height)
            .map_err(|e| PipelineError::EncodeError(e.to_string()))?;

        output.write_all(&buffer)?;

        debug!("TIFF encoding complete, {} bytes", buffer.len());
        Ok(())
    }
}

impl PixelMapWriter for StandardTiffWriter {
    fn write_mono(&self, image: &MonoGrid, output: &mut dyn Write) -> Result<()> {
        self.encode(image.width(), image.height(), output, |mut encoder, w, h| {
            encoder.write_image::<Gray8>(w, h, image.samples())
        })
    }

    fn write_color(&self, image: &ColorGrid, output: &mut dyn Write) -> Result<()> {
        let data = image.to_interleaved();
        self.encode(image.width(), image.height(), output, |mut encoder, w, h| {
            encoder.write_image::<RGB8>(w, h, &data)
        })
    }
}
