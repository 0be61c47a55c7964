use std::io::Cursor;
use std::path::Path;

use image::imageops::FilterType;
use image::{ImageFormat, RgbaImage};

use crate::alpha_bleed;
use crate::error::{Error, Result};

fn processing(path: &Path, reason: impl ToString) -> Error {
    Error::Processing {
        path: path.to_path_buf(),
        reason: reason.to_string(),
    }
}

/// Decodes an icon as RGBA, keeping its transparency.
pub fn load_rgba(path: &Path) -> Result<RgbaImage> {
    let img = image::open(path).map_err(|e| processing(path, e))?;
    Ok(img.to_rgba8())
}

/// Resamples to a `size`×`size` square with Lanczos3.
pub fn resize_square(img: &RgbaImage, size: u32) -> RgbaImage {
    if img.dimensions() == (size, size) {
        return img.clone();
    }
    image::imageops::resize(img, size, size, FilterType::Lanczos3)
}

/// Loads an icon, optionally applies alpha bleed, and resizes it to `size`.
pub fn render_icon(path: &Path, size: u32, bleed: bool) -> Result<RgbaImage> {
    let mut img = load_rgba(path)?;
    if bleed {
        alpha_bleed::bleed_transparent_edges(&mut img);
    }
    Ok(resize_square(&img, size))
}

/// Encodes as PNG and writes the bytes to `path`.
pub fn save_png(img: &RgbaImage, path: &Path) -> Result<()> {
    let mut buf = Vec::new();
    img.write_to(&mut Cursor::new(&mut buf), ImageFormat::Png)
        .map_err(|e| processing(path, e))?;
    std::fs::write(path, buf).map_err(|e| processing(path, e))
}

/// Pixel width of an icon, read from its header only.
pub fn probe_width(path: &Path) -> Result<u32> {
    image::image_dimensions(path)
        .map(|(width, _)| width)
        .map_err(|e| processing(path, e))
}
