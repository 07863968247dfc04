use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::{Parser, ValueEnum};
use bayer_demosaic_rs::image_pipeline::{
    BayerPipeline, LogProgress, OutputEncoding, PipelineConfig, TiffCompression,
    conversions::{DEFAULT_MOSAIC_OUTPUT_PATH, DEFAULT_RECONSTRUCTED_OUTPUT_PATH, DEFAULT_SOURCE_PATH},
};
use bayer_demosaic_rs::logger::LogSettings;

use tracing::{error, info};

/// Sample a color image through an RGGB Bayer filter, then demosaic it back.
#[derive(Parser, Debug)]
#[command(name = "bayer_demosaic")]
#[command(version, about, long_about = None)]
struct Args {
    /// Source image (P3 or P6 portable pixmap)
    #[arg(value_name = "SOURCE", default_value = DEFAULT_SOURCE_PATH)]
    source: PathBuf,

    /// Expected image width; must match the source header
    #[arg(long)]
    width: Option<usize>,

    /// Expected image height; must match the source header
    #[arg(long)]
    height: Option<usize>,

    /// Where to write the single-channel mosaic
    #[arg(long, value_name = "PATH", default_value = DEFAULT_MOSAIC_OUTPUT_PATH)]
    mosaic_output: PathBuf,

    /// Where to write the reconstructed color image
    #[arg(long, value_name = "PATH", default_value = DEFAULT_RECONSTRUCTED_OUTPUT_PATH)]
    reconstructed_output: PathBuf,

    /// Encoding of both output artifacts
    #[arg(long, value_enum, default_value = "ascii")]
    encoding: EncodingArg,

    /// TIFF compression (only with --encoding tiff)
    #[arg(long, value_enum, default_value = "none")]
    compression: CompressionArg,

    /// Process rows on a single thread
    #[arg(long, default_value_t = false)]
    sequential: bool,

    /// Reject images whose width or height is odd
    #[arg(long, default_value_t = false)]
    require_even: bool,

    /// Log per-stage timings and stage span durations
    #[arg(long, default_value_t = false)]
    timings: bool,

    /// Log verbosity when RUST_LOG is not set
    #[arg(long, default_value = "info")]
    log_level: String,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum EncodingArg {
    /// P2/P3 text maps
    Ascii,
    /// P5/P6 binary maps
    Binary,
    /// 8-bit TIFF
    Tiff,
}

impl From<EncodingArg> for OutputEncoding {
    fn from(arg: EncodingArg) -> Self {
        match arg {
            EncodingArg::Ascii => OutputEncoding::Ascii,
            EncodingArg::Binary => OutputEncoding::Binary,
            EncodingArg::Tiff => OutputEncoding::Tiff,
        }
    }
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum CompressionArg {
    None,
    Lzw,
    Deflate,
    DeflateBest,
}

impl From<CompressionArg> for TiffCompression {
    fn from(arg: CompressionArg) -> Self {
        match arg {
            CompressionArg::None => TiffCompression::None,
            CompressionArg::Lzw => TiffCompression::Lzw,
            CompressionArg::Deflate => TiffCompression::DeflateBalanced,
            CompressionArg::DeflateBest => TiffCompression::DeflateBest,
        }
    }
}

fn run(args: Args) -> anyhow::Result<()> {
    let config = PipelineConfig::builder()
        .width(args.width)
        .height(args.height)
        .source_path(&args.source)
        .mosaic_output_path(&args.mosaic_output)
        .reconstructed_output_path(&args.reconstructed_output)
        .encoding(args.encoding.into())
        .compression(args.compression.into())
        .parallel(!args.sequential)
        .require_even_dimensions(args.require_even)
        .build();

    let pipeline = BayerPipeline::new(config).with_progress(LogProgress::default());
    info!("Encoding: {:?}", pipeline.config().encoding);
    info!(
        "Row processing: {}",
        if pipeline.config().parallel {
            "parallel"
        } else {
            "sequential"
        }
    );

    let timings = pipeline
        .run_files()
        .with_context(|| format!("processing {}", args.source.display()))?;

    if args.timings {
        timings.log_summary();
    }
    Ok(())
}

fn main() -> ExitCode {
    let args = Args::parse();
    let logging = LogSettings::new(args.log_level.as_str()).with_stage_spans(args.timings);
    if let Err(e) = logging.try_init() {
        eprintln!("bayer_demosaic: {e}");
        return ExitCode::FAILURE;
    }

    info!("Starting bayer_demosaic...");

    match run(args) {
        Ok(()) => {
            info!("Run successful!");
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("Run failed: {:#}", e);
            ExitCode::FAILURE
        }
    }
}
