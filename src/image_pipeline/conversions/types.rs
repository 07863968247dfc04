//! Pipeline configuration types

use std::path::PathBuf;

use crate::image_pipeline::pnm::PnmEncoding;
use crate::image_pipeline::tiff::TiffCompression;

pub const DEFAULT_SOURCE_PATH: &str = "./in.ppm";
pub const DEFAULT_MOSAIC_OUTPUT_PATH: &str = "./bayer.ppm";
pub const DEFAULT_RECONSTRUCTED_OUTPUT_PATH: &str = "./demosaic.ppm";

/// Container format of both output artifacts
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputEncoding {
    /// P2 mosaic, P3 reconstruction
    #[default]
    Ascii,
    /// P5 mosaic, P6 reconstruction
    Binary,
    /// Gray8 mosaic, RGB8 reconstruction
    Tiff,
}

impl OutputEncoding {
    pub fn pnm(self) -> Option<PnmEncoding> {
        match self {
            OutputEncoding::Ascii => Some(PnmEncoding::Ascii),
            OutputEncoding::Binary => Some(PnmEncoding::Binary),
            OutputEncoding::Tiff => None,
        }
    }
}

/// Configuration for a filter + demosaic run
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Expected image width; checked against the source header when set
    pub width: Option<usize>,
    /// Expected image height; checked against the source header when set
    pub height: Option<usize>,
    pub source_path: PathBuf,
    pub mosaic_output_path: PathBuf,
    pub reconstructed_output_path: PathBuf,
    pub encoding: OutputEncoding,
    /// Only used with [`OutputEncoding::Tiff`]
    pub compression: TiffCompression,
    /// Spread per-row work over the rayon pool
    pub parallel: bool,
    /// Reject odd widths or heights instead of warning
    pub require_even_dimensions: bool,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            width: None,
            height: None,
            source_path: PathBuf::from(DEFAULT_SOURCE_PATH),
            mosaic_output_path: PathBuf::from(DEFAULT_MOSAIC_OUTPUT_PATH),
            reconstructed_output_path: PathBuf::from(DEFAULT_RECONSTRUCTED_OUTPUT_PATH),
            encoding: OutputEncoding::Ascii,
            compression: TiffCompression::None,
            parallel: true,
            require_even_dimensions: false,
        }
    }
}

impl PipelineConfig {
    pub fn builder() -> PipelineConfigBuilder {
        PipelineConfigBuilder::default()
    }
}

/// Builder for PipelineConfig
#[derive(Default)]
pub struct PipelineConfigBuilder {
    width: Option<usize>,
    height: Option<usize>,
    source_path: Option<PathBuf>,
    mosaic_output_path: Option<PathBuf>,
    reconstructed_output_path: Option<PathBuf>,
    encoding: Option<OutputEncoding>,
    compression: Option<TiffCompression>,
    parallel: Option<bool>,
    require_even_dimensions: Option<bool>,
}

impl PipelineConfigBuilder {
    pub fn dimensions(mut self, width: usize, height: usize) -> Self {
        self.width = Some(width);
        self.height = Some(height);
        self
    }

    pub fn width(mut self, width: Option<usize>) -> Self {
        self.width = width;
        self
    }

    pub fn height(mut self, height: Option<usize>) -> Self {
        self.height = height;
        self
    }

    pub fn source_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.source_path = Some(path.into());
        self
    }

    pub fn mosaic_output_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.mosaic_output_path = Some(path.into());
        self
    }

    pub fn reconstructed_output_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.reconstructed_output_path = Some(path.into());
        self
    }

    pub fn encoding(mut self, encoding: OutputEncoding) -> Self {
        self.encoding = Some(encoding);
        self
    }

    pub fn compression(mut self, compression: TiffCompression) -> Self {
        self.compression = Some(compression);
        self
    }

    pub fn parallel(mut self, enable: bool) -> Self {
        self.parallel = Some(enable);
        self
    }

    pub fn require_even_dimensions(mut self, require: bool) -> Self {
        self.require_even_dimensions = Some(require);
        self
    }

    pub fn build(self) -> PipelineConfig {
        let default = PipelineConfig::default();
        PipelineConfig {
            width: self.width.or(default.width),
            height: self.height.or(default.height),
            source_path: self.source_path.unwrap_or(default.source_path),
            mosaic_output_path: self.mosaic_output_path.unwrap_or(default.mosaic_output_path),
            reconstructed_output_path: self
                .reconstructed_output_path
                .unwrap_or(default.reconstructed_output_path),
            encoding: self.encoding.unwrap_or(default.encoding),
            compression: self.compression.unwrap_or(default.compression),
            parallel: self.parallel.unwrap_or(default.parallel),
            require_even_dimensions: self
                .require_even_dimensions
                .unwrap_or(default.require_even_dimensions),
        }
    }
}
