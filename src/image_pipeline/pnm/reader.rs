use crate::image_pipeline::common::error::Result;
use crate::image_pipeline::grid::{ColorGrid, MonoGrid};
use crate::image_pipeline::pnm::types::PnmHeader;

pub trait PixelMapReader {
    fn read_header(&self, data: &[u8]) -> Result<PnmHeader>;
    fn read_color(&self, data: &[u8]) -> Result<ColorGrid>;
    fn read_mono(&self, data: &[u8]) -> Result<MonoGrid>;
}
