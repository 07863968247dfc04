//! Portable map decoder for the P2/P3 text and P5/P6 binary variants.

use tracing::debug;

use crate::image_pipeline::common::error::{PipelineError, Result};
use crate::image_pipeline::grid::{ColorGrid, MonoGrid, Rgb, coordinates};
use crate::image_pipeline::pnm::reader::PixelMapReader;
use crate::image_pipeline::pnm::tokens::Tokens;
use crate::image_pipeline::pnm::types::{MAX_SAMPLE_VALUE, PnmFormat, PnmHeader};

pub struct PnmReader;

/// Header plus the byte offset where the raster begins.
struct Parsed<'a> {
    header: PnmHeader,
    pixel_count: usize,
    sample_count: usize,
    body: &'a [u8],
}

fn header_field<'a>(tokens: &mut Tokens<'a>, name: &str) -> Result<&'a str> {
    let token = tokens
        .next()
        .ok_or_else(|| PipelineError::MalformedHeader(format!("missing {name}")))?;
    std::str::from_utf8(token)
        .map_err(|_| PipelineError::MalformedHeader(format!("{name} is not ASCII")))
}

fn header_number(tokens: &mut Tokens<'_>, name: &str) -> Result<usize> {
    let field = header_field(tokens, name)?;
    field
        .parse()
        .map_err(|_| PipelineError::MalformedHeader(format!("{name} '{field}' is not a number")))
}

fn parse(data: &[u8]) -> Result<Parsed<'_>> {
    let mut tokens = Tokens::new(data);
    let format = PnmFormat::from_magic(header_field(&mut tokens, "magic number")?)?;
    let width = header_number(&mut tokens, "width")?;
    let height = header_number(&mut tokens, "height")?;
    let max_value = header_number(&mut tokens, "max value")?;

    if width == 0 || height == 0 {
        return Err(PipelineError::InvalidDimensions(width, height));
    }
    if max_value == 0 || max_value > MAX_SAMPLE_VALUE as usize {
        return Err(PipelineError::UnsupportedFormat(format!(
            "max value {max_value}, only 1..={MAX_SAMPLE_VALUE} supported"
        )));
    }

    let header = PnmHeader {
        format,
        width,
        height,
        max_value: max_value as u16,
    };
    let (pixel_count, sample_count) = header
        .pixel_count()
        .zip(header.sample_count())
        .ok_or(PipelineError::InvalidDimensions(width, height))?;

    // Binary rasters start after exactly one whitespace byte
    let mut body = tokens.remaining();
    if format.is_binary() {
        body = body.get(1..).unwrap_or_default();
    }

    Ok(Parsed {
        header,
        pixel_count,
        sample_count,
        body,
    })
}

fn malformed(header: &PnmHeader, index: usize, reason: String) -> PipelineError {
    let (x, y) = coordinates(header.width, header.height, index);
    PipelineError::MalformedRecord {
        index,
        x,
        y,
        reason,
    }
}

/// Decodes every sample of the raster, checking count and range.
fn read_samples(parsed: &Parsed<'_>) -> Result<Vec<u8>> {
    let header = &parsed.header;
    let channels = header.format.channels();
    let expected = parsed.pixel_count;
    let sample_count = parsed.sample_count;

    let samples: Vec<u8> = if header.format.is_binary() {
        if parsed.body.len() != sample_count {
            return Err(PipelineError::DimensionMismatch {
                expected,
                found: parsed.body.len().div_ceil(channels),
            });
        }
        parsed.body.to_vec()
    } else {
        // Every text sample takes at least one byte, so the body bounds the
        // count no matter what the header claims.
        let mut samples = Vec::with_capacity(sample_count.min(parsed.body.len()));
        let mut tokens = Tokens::new(parsed.body);
        let mut i = 0;
        while let Some(token) = tokens.next() {
            if i >= sample_count {
                let extra = 1 + tokens.count();
                return Err(PipelineError::DimensionMismatch {
                    expected,
                    found: (sample_count + extra).div_ceil(channels),
                });
            }
            let text = String::from_utf8_lossy(token);
            let value: u16 = text.parse().map_err(|_| {
                malformed(header, i / channels, format!("'{text}' is not an integer sample"))
            })?;
            if value > MAX_SAMPLE_VALUE {
                return Err(malformed(
                    header,
                    i / channels,
                    format!("sample {value} exceeds {MAX_SAMPLE_VALUE}"),
                ));
            }
            samples.push(value as u8);
            i += 1;
        }
        if samples.len() != sample_count {
            return Err(PipelineError::DimensionMismatch {
                expected,
                found: samples.len() / channels,
            });
        }
        samples
    };

    if let Some(i) = samples.iter().position(|&s| s as u16 > header.max_value) {
        return Err(malformed(
            header,
            i / channels,
            format!("sample {} exceeds max value {}", samples[i], header.max_value),
        ));
    }

    debug!(
        "Decoded {} {} records ({}x{})",
        expected, header.format, header.width, header.height
    );
    Ok(samples)
}

impl PixelMapReader for PnmReader {
    fn read_header(&self, data: &[u8]) -> Result<PnmHeader> {
        parse(data).map(|parsed| parsed.header)
    }

    fn read_color(&self, data: &[u8]) -> Result<ColorGrid> {
        let parsed = parse(data)?;
        let header = parsed.header;
        if header.format.channels() != 3 {
            return Err(PipelineError::UnsupportedFormat(format!(
                "expected a three-channel map (P3/P6), found {}",
                header.format
            )));
        }
        let samples = read_samples(&parsed)?;
        let pixels = samples
            .chunks_exact(3)
            .map(|c| Rgb::new(c[0], c[1], c[2]))
            .collect();
        ColorGrid::from_samples(header.width, header.height, pixels)
    }

    fn read_mono(&self, data: &[u8]) -> Result<MonoGrid> {
        let parsed = parse(data)?;
        let header = parsed.header;
        if header.format.channels() != 1 {
            return Err(PipelineError::UnsupportedFormat(format!(
                "expected a single-channel map (P2/P5), found {}",
                header.format
            )));
        }
        let samples = read_samples(&parsed)?;
        MonoGrid::from_samples(header.width, header.height, samples)
    }
}
