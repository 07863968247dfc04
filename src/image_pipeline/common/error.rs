use thiserror::Error;

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("Failed to read input file: {0}")]
    InputReadError(String),

    #[error("Failed to write output file: {0}")]
    OutputWriteError(String),

    #[error("Pixel count mismatch: expected {expected} records, found {found}")]
    DimensionMismatch { expected: usize, found: usize },

    #[error("Malformed pixel record {index} at (x={x}, y={y}): {reason}")]
    MalformedRecord {
        index: usize,
        x: usize,
        y: usize,
        reason: String,
    },

    #[error("Malformed header: {0}")]
    MalformedHeader(String),

    #[error("Configured size {configured_width}x{configured_height} does not match header size {header_width}x{header_height}")]
    HeaderMismatch {
        configured_width: usize,
        configured_height: usize,
        header_width: usize,
        header_height: usize,
    },

    #[error("Invalid image dimensions: width={0}, height={1}")]
    InvalidDimensions(usize, usize),

    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    #[error("Failed to encode TIFF image: {0}")]
    EncodeError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, PipelineError>;
