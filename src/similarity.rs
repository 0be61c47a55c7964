//! Structural similarity (SSIM) between two icons.
//!
//! Uses a 7×7 uniform window over 8-bit luminance with the usual
//! `K1 = 0.01`, `K2 = 0.03` constants and sample covariance. The score is
//! the mean over every window that fits entirely inside the image.

use image::{GrayImage, Luma, RgbaImage};

use crate::icon::resize_square;

pub const WINDOW: u32 = 7;

const DATA_RANGE: f64 = 255.0;
const K1: f64 = 0.01;
const K2: f64 = 0.03;

/// Mean SSIM of two equally sized grayscale images, in `[-1, 1]`.
pub fn ssim(a: &GrayImage, b: &GrayImage) -> Result<f64, String> {
    if a.dimensions() != b.dimensions() {
        return Err(format!(
            "images differ in size: {:?} vs {:?}",
            a.dimensions(),
            b.dimensions()
        ));
    }
    let (w, h) = a.dimensions();
    if w < WINDOW || h < WINDOW {
        return Err(format!(
            "images must be at least {WINDOW}x{WINDOW}, got {w}x{h}"
        ));
    }

    let n = f64::from(WINDOW * WINDOW);
    let cov_norm = n / (n - 1.0);
    let c1 = (K1 * DATA_RANGE).powi(2);
    let c2 = (K2 * DATA_RANGE).powi(2);

    let mut total = 0.0;
    let mut windows = 0u32;

    for top in 0..=(h - WINDOW) {
        for left in 0..=(w - WINDOW) {
            let (mut sx, mut sy, mut sxx, mut syy, mut sxy) = (0.0, 0.0, 0.0, 0.0, 0.0);
            for y in top..top + WINDOW {
                for x in left..left + WINDOW {
                    let px = f64::from(a.get_pixel(x, y)[0]);
                    let py = f64::from(b.get_pixel(x, y)[0]);
                    sx += px;
                    sy += py;
                    sxx += px * px;
                    syy += py * py;
                    sxy += px * py;
                }
            }

            let ux = sx / n;
            let uy = sy / n;
            let vx = cov_norm * (sxx / n - ux * ux);
            let vy = cov_norm * (syy / n - uy * uy);
            let vxy = cov_norm * (sxy / n - ux * uy);

            let numerator = (2.0 * ux * uy + c1) * (2.0 * vxy + c2);
            let denominator = (ux * ux + uy * uy + c1) * (vx + vy + c2);
            total += numerator / denominator;
            windows += 1;
        }
    }

    Ok(total / f64::from(windows))
}

/// Luminance with the ITU-R 601 weights (0.299, 0.587, 0.114) in 16-bit
/// fixed point, rounded to nearest. Alpha is ignored.
pub fn luma_601(img: &RgbaImage) -> GrayImage {
    GrayImage::from_fn(img.width(), img.height(), |x, y| {
        let [r, g, b, _] = img.get_pixel(x, y).0;
        let luma = (u32::from(r) * 19595 + u32::from(g) * 38470 + u32::from(b) * 7471 + 0x8000) >> 16;
        Luma([luma as u8])
    })
}

/// Similarity of two icons as a percentage, after bringing both to
/// `size`×`size` and dropping colour and alpha.
pub fn icon_similarity(a: &RgbaImage, b: &RgbaImage, size: u32) -> Result<f64, String> {
    let a = luma_601(&resize_square(a, size));
    let b = luma_601(&resize_square(b, size));
    ssim(&a, &b).map(|score| score * 100.0)
}
