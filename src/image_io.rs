//! Image file decoding and preview encoding.
//!
//! The renderer works on raw 8-bit single-channel buffers; this module is
//! the bridge to image files on disk.

use std::path::Path;

/// An 8-bit single-channel image, row-major.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LumaImage {
    pub pixels: Vec<u8>,
    pub width: usize,
    pub height: usize,
}

/// Decode any supported image file and convert it to 8-bit luma.
pub fn load_grayscale(path: &Path) -> Result<LumaImage, image::ImageError> {
    let luma = image::open(path)?.into_luma8();
    let (width, height) = luma.dimensions();
    log::debug!("Loaded {} ({}x{})", path.display(), width, height);
    Ok(LumaImage {
        pixels: luma.into_raw(),
        width: width as usize,
        height: height as usize,
    })
}

/// Save a rendered pixel buffer; the format follows the file extension.
pub fn save_preview(path: &Path, image: &LumaImage) -> Result<(), image::ImageError> {
    image::save_buffer(
        path,
        &image.pixels,
        image.width as u32,
        image.height as u32,
        image::ExtendedColorType::L8,
    )
}
