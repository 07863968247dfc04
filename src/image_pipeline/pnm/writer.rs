use std::io::Write;

use crate::image_pipeline::common::error::Result;
use crate::image_pipeline::grid::{ColorGrid, MonoGrid};

pub trait PixelMapWriter {
    fn write_mono(&self, image: &MonoGrid, output: &mut dyn Write) -> Result<()>;
    fn write_color(&self, image: &ColorGrid, output: &mut dyn Write) -> Result<()>;
}
