//! Portable pixel map types

use std::fmt;

use crate::image_pipeline::common::error::{PipelineError, Result};

/// Largest sample value the pipeline handles (8 bits per channel).
pub const MAX_SAMPLE_VALUE: u16 = 255;

/// Portable map variants, tagged by their magic number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PnmFormat {
    /// `P2`: one integer per pixel, text
    GrayAscii,
    /// `P3`: one integer triple per pixel, text
    ColorAscii,
    /// `P5`: one byte per pixel
    GrayBinary,
    /// `P6`: three bytes per pixel
    ColorBinary,
}

impl PnmFormat {
    pub fn from_magic(magic: &str) -> Result<Self> {
        match magic {
            "P2" => Ok(PnmFormat::GrayAscii),
            "P3" => Ok(PnmFormat::ColorAscii),
            "P5" => Ok(PnmFormat::GrayBinary),
            "P6" => Ok(PnmFormat::ColorBinary),
            other => Err(PipelineError::UnsupportedFormat(format!(
                "magic '{other}', expected P2, P3, P5 or P6"
            ))),
        }
    }

    pub fn magic(self) -> &'static str {
        match self {
            PnmFormat::GrayAscii => "P2",
            PnmFormat::ColorAscii => "P3",
            PnmFormat::GrayBinary => "P5",
            PnmFormat::ColorBinary => "P6",
        }
    }

    /// Samples per pixel record.
    pub fn channels(self) -> usize {
        match self {
            PnmFormat::GrayAscii | PnmFormat::GrayBinary => 1,
            PnmFormat::ColorAscii | PnmFormat::ColorBinary => 3,
        }
    }

    pub fn is_binary(self) -> bool {
        matches!(self, PnmFormat::GrayBinary | PnmFormat::ColorBinary)
    }

    pub fn gray(encoding: PnmEncoding) -> Self {
        match encoding {
            PnmEncoding::Ascii => PnmFormat::GrayAscii,
            PnmEncoding::Binary => PnmFormat::GrayBinary,
        }
    }

    pub fn color(encoding: PnmEncoding) -> Self {
        match encoding {
            PnmEncoding::Ascii => PnmFormat::ColorAscii,
            PnmEncoding::Binary => PnmFormat::ColorBinary,
        }
    }
}

impl fmt::Display for PnmFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.magic())
    }
}

/// Sample encoding of a portable map body.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PnmEncoding {
    /// Decimal integers, one pixel record per line
    #[default]
    Ascii,
    /// Raw bytes
    Binary,
}

/// Decoded portable map header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PnmHeader {
    pub format: PnmFormat,
    pub width: usize,
    pub height: usize,
    pub max_value: u16,
}

impl PnmHeader {
    /// `None` when `width * height` does not fit in `usize`.
    pub fn pixel_count(&self) -> Option<usize> {
        self.width.checked_mul(self.height)
    }

    pub fn sample_count(&self) -> Option<usize> {
        self.pixel_count()?.checked_mul(self.format.channels())
    }
}
