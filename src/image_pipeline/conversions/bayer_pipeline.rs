use std::io::Write;
use std::path::Path;

use tracing::{info, instrument, warn};

use crate::image_pipeline::{
    common::error::{PipelineError, Result},
    common::progress::{NoProgress, ProgressSink},
    common::timing::PipelineTimings,
    conversions::artifact_writer::ArtifactWriter,
    conversions::output::PendingOutput,
    conversions::types::PipelineConfig,
    debayer::NeighborDebayer,
    filter::MosaicFilter,
    grid::{ColorGrid, MonoGrid},
    pnm::{PixelMapReader, PixelMapWriter, PnmHeader, PnmReader},
};

/// Source image -> mosaic artifact -> reconstructed artifact.
pub struct BayerPipeline<R: PixelMapReader, W: PixelMapWriter> {
    reader: R,
    writer: W,
    config: PipelineConfig,
    progress: Box<dyn ProgressSink>,
}

impl BayerPipeline<PnmReader, ArtifactWriter> {
    pub fn new(config: PipelineConfig) -> Self {
        Self {
            reader: PnmReader,
            writer: ArtifactWriter::from_config(&config),
            config,
            progress: Box::new(NoProgress),
        }
    }
}

impl<R: PixelMapReader, W: PixelMapWriter> BayerPipeline<R, W> {
    pub fn with_custom(reader: R, writer: W, config: PipelineConfig) -> Self {
        Self {
            reader,
            writer,
            config,
            progress: Box::new(NoProgress),
        }
    }

    pub fn with_progress(mut self, progress: impl ProgressSink + 'static) -> Self {
        self.progress = Box::new(progress);
        self
    }

    fn filter_stage(&self) -> MosaicFilter {
        MosaicFilter::new().with_parallel(self.config.parallel)
    }

    fn debayer_stage(&self) -> NeighborDebayer {
        NeighborDebayer::new().with_parallel(self.config.parallel)
    }

    /// Checks a decoded header against the configured size before any pixel
    /// is processed.
    pub fn validate_dimensions(&self, header: &PnmHeader) -> Result<()> {
        let (width, height) = (header.width, header.height);
        if width == 0 || height == 0 {
            return Err(PipelineError::InvalidDimensions(width, height));
        }

        let configured_width = self.config.width.unwrap_or(width);
        let configured_height = self.config.height.unwrap_or(height);
        if (configured_width, configured_height) != (width, height) {
            return Err(PipelineError::HeaderMismatch {
                configured_width,
                configured_height,
                header_width: width,
                header_height: height,
            });
        }

        if width % 2 == 1 || height % 2 == 1 {
            if self.config.require_even_dimensions {
                return Err(PipelineError::InvalidDimensions(width, height));
            }
            warn!(
                "Image dimensions {}x{} are not even; the 2x2 pattern is cut off at the edge",
                width, height
            );
        }

        Ok(())
    }

    fn decode_source(&self, source: &[u8], timings: &mut PipelineTimings) -> Result<ColorGrid> {
        let header = timings.measure("decode_header", || self.reader.read_header(source))?;
        timings.measure("validate_dimensions", || self.validate_dimensions(&header))?;
        timings.measure("decode_source", || self.reader.read_color(source))
    }

    /// Runs the mosaic filter over an encoded source image.
    pub fn filter(&self, source: &[u8]) -> Result<MonoGrid> {
        let image = self.decode_source(source, &mut PipelineTimings::new())?;
        self.filter_stage()
            .apply_with_progress(&image, self.progress.as_ref())
    }

    pub fn reconstruct(&self, mosaic: &MonoGrid) -> Result<ColorGrid> {
        self.debayer_stage()
            .process_with_progress(mosaic, self.progress.as_ref())
    }

    /// Decodes a mosaic artifact, reconstructs it and encodes the result.
    #[instrument(skip_all, fields(input_size = mosaic_data.len()))]
    pub fn reconstruct_artifact(
        &self,
        mosaic_data: &[u8],
        output: &mut dyn Write,
    ) -> Result<ColorGrid> {
        let header = self.reader.read_header(mosaic_data)?;
        self.validate_dimensions(&header)?;
        let mosaic = self.reader.read_mono(mosaic_data)?;
        let image = self.reconstruct(&mosaic)?;
        self.writer.write_color(&image, output)?;
        Ok(image)
    }

    pub fn run(
        &self,
        source: &[u8],
        mosaic_output: &mut dyn Write,
        reconstructed_output: &mut dyn Write,
    ) -> Result<()> {
        self.run_with_timings(source, mosaic_output, reconstructed_output)
            .map(|_| ())
    }

    #[instrument(skip_all, fields(input_size = source.len()))]
    pub fn run_with_timings(
        &self,
        source: &[u8],
        mosaic_output: &mut dyn Write,
        reconstructed_output: &mut dyn Write,
    ) -> Result<PipelineTimings> {
        let mut timings = PipelineTimings::new();
        info!("Starting Bayer filter + demosaic run");

        let image = self.decode_source(source, &mut timings)?;

        let mosaic = timings.measure("filter", || {
            self.filter_stage()
                .apply_with_progress(&image, self.progress.as_ref())
        })?;
        drop(image);

        timings.measure("encode_mosaic", || {
            self.writer.write_mono(&mosaic, mosaic_output)
        })?;

        let reconstructed = timings.measure("demosaic", || self.reconstruct(&mosaic))?;

        timings.measure("encode_reconstruction", || {
            self.writer.write_color(&reconstructed, reconstructed_output)
        })?;

        info!(
            width = reconstructed.width(),
            height = reconstructed.height(),
            "Run complete in {:.3}ms",
            timings.total_duration().as_secs_f64() * 1000.0
        );
        Ok(timings)
    }

    /// Runs against the configured paths. Both outputs appear only if the
    /// whole run succeeds.
    #[instrument(skip(self))]
    pub fn run_files(&self) -> Result<PipelineTimings> {
        let source_path: &Path = &self.config.source_path;
        let mosaic_path: &Path = &self.config.mosaic_output_path;
        let reconstructed_path: &Path = &self.config.reconstructed_output_path;

        info!(
            input = %source_path.display(),
            mosaic = %mosaic_path.display(),
            reconstructed = %reconstructed_path.display(),
            "Processing file"
        );

        let mut timings = PipelineTimings::new();
        let source = timings.measure("read_input_file", || {
            std::fs::read(source_path).map_err(|e| {
                PipelineError::InputReadError(format!("{}: {}", source_path.display(), e))
            })
        })?;

        let mut mosaic_output = PendingOutput::create(mosaic_path)?;
        let mut reconstructed_output = PendingOutput::create(reconstructed_path)?;

        let run_timings = self.run_with_timings(
            &source,
            mosaic_output.writer()?,
            reconstructed_output.writer()?,
        )?;
        for step in run_timings.steps() {
            timings.add_step(step.name.clone(), step.duration);
        }

        timings.measure("commit_outputs", || {
            PendingOutput::commit_all([mosaic_output, reconstructed_output])
        })?;

        Ok(timings)
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }
}
