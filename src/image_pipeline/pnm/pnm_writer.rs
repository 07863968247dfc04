use std::io::{BufWriter, Write};

use tracing::debug;

use crate::image_pipeline::common::error::Result;
use crate::image_pipeline::grid::{ColorGrid, MonoGrid};
use crate::image_pipeline::pnm::types::{MAX_SAMPLE_VALUE, PnmEncoding, PnmFormat};
use crate::image_pipeline::pnm::writer::PixelMapWriter;

/// Writes grids as portable maps: single-channel grids as P2/P5,
/// three-channel grids as P3/P6.
#[derive(Debug, Clone, Copy, Default)]
pub struct PnmWriter {
    pub encoding: PnmEncoding,
}

impl PnmWriter {
    pub fn new(encoding: PnmEncoding) -> Self {
        Self { encoding }
    }

    fn write_header(
        output: &mut impl Write,
        format: PnmFormat,
        width: usize,
        height: usize,
    ) -> Result<()> {
        write!(output, "{}\n{} {}\n{}\n", format, width, height, MAX_SAMPLE_VALUE)?;
        Ok(())
    }
}

impl PixelMapWriter for PnmWriter {
    fn write_mono(&self, image: &MonoGrid, output: &mut dyn Write) -> Result<()> {
        let format = PnmFormat::gray(self.encoding);
        debug!("Encoding {} image: {}x{}", format, image.width(), image.height());

        let mut out = BufWriter::new(output);
        Self::write_header(&mut out, format, image.width(), image.height())?;
        match self.encoding {
            PnmEncoding::Ascii => {
                for value in image.samples() {
                    writeln!(out, "{value}")?;
                }
            }
            PnmEncoding::Binary => out.write_all(image.samples())?,
        }
        out.flush()?;
        Ok(())
    }

    fn write_color(&self, image: &ColorGrid, output: &mut dyn Write) -> Result<()> {
        let format = PnmFormat::color(self.encoding);
        debug!("Encoding {} image: {}x{}", format, image.width(), image.height());

        let mut out = BufWriter::new(output);
        Self::write_header(&mut out, format, image.width(), image.height())?;
        match self.encoding {
            PnmEncoding::Ascii => {
                for px in image.samples() {
                    writeln!(out, "{} {} {}", px.r, px.g, px.b)?;
                }
            }
            PnmEncoding::Binary => out.write_all(&image.to_interleaved())?,
        }
        out.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::image_pipeline::grid::Rgb;
    use crate::image_pipeline::pnm::{PixelMapReader, PnmReader};

    #[test]
    fn test_ascii_mono_layout() {
        let grid = MonoGrid::from_samples(2, 2, vec![1, 22, 133, 255]).unwrap();
        let mut out = Vec::<u8>::new();
        PnmWriter::default().write_mono(&grid, &mut out).unwrap();
        assert_eq!(out, b"P2\n2 2\n255\n1\n22\n133\n255\n");
    }

    #[test]
    fn test_ascii_color_layout() {
        let grid = ColorGrid::from_samples(1, 2, vec![Rgb::new(0, 0, 0), Rgb::new(9, 80, 255)])
            .unwrap();
        let mut out = Vec::<u8>::new();
        PnmWriter::new(PnmEncoding::Ascii)
            .write_color(&grid, &mut out)
            .unwrap();
        assert_eq!(out, b"P3\n1 2\n255\n0 0 0\n9 80 255\n");
    }

    #[test]
    fn test_binary_layout() {
        let grid = ColorGrid::from_samples(2, 1, vec![Rgb::new(1, 2, 3), Rgb::new(4, 5, 6)])
            .unwrap();
        let mut out = Vec::<u8>::new();
        PnmWriter::new(PnmEncoding::Binary)
            .write_color(&grid, &mut out)
            .unwrap();
        assert_eq!(out, b"P6\n2 1\n255\n\x01\x02\x03\x04\x05\x06");
    }

    #[test]
    fn test_binary_and_ascii_decode_to_same_grid() {
        let grid = MonoGrid::from_samples(3, 2, vec![0, 10, 32, 35, 200, 255]).unwrap();
        for encoding in [PnmEncoding::Ascii, PnmEncoding::Binary] {
            let mut out = Vec::<u8>::new();
            PnmWriter::new(encoding).write_mono(&grid, &mut out).unwrap();
            assert_eq!(PnmReader.read_mono(&out).unwrap(), grid, "{encoding:?}");
        }
    }
}
