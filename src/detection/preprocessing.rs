use image::{DynamicImage, GrayImage, ImageReader, Luma};
use std::path::Path;

use crate::error::{ExtractError, Result};

/// Foreground value in a binary mask
pub const FOREGROUND: u8 = 255;
/// Background value in a binary mask
pub const BACKGROUND: u8 = 0;

/// Read and decode an image file
pub fn load_image(path: &Path) -> Result<DynamicImage> {
    let load_error = |source| ExtractError::Load {
        path: path.to_path_buf(),
        source,
    };
    ImageReader::open(path)
        .map_err(|e| load_error(image::ImageError::IoError(e)))?
        .with_guessed_format()
        .map_err(|e| load_error(image::ImageError::IoError(e)))?
        .decode()
        .map_err(load_error)
}

/// BT.601 luma weights in 14-bit fixed point (0.299, 0.587, 0.114)
const LUMA_R: u32 = 4899;
const LUMA_G: u32 = 9617;
const LUMA_B: u32 = 1868;
const LUMA_SHIFT: u32 = 14;

/// Convert image to grayscale with BT.601 weights, rounded to nearest.
///
/// `DynamicImage::to_luma8` uses Rec. 709 weights, which puts light tinted
/// pixels a few levels darker and moves them across the threshold.
pub fn to_grayscale(img: &DynamicImage) -> GrayImage {
    let rgb = img.to_rgb8();
    GrayImage::from_fn(rgb.width(), rgb.height(), |x, y| {
        let [r, g, b] = rgb.get_pixel(x, y).0;
        let weighted = u32::from(r) * LUMA_R + u32::from(g) * LUMA_G + u32::from(b) * LUMA_B;
        Luma([((weighted + (1 << (LUMA_SHIFT - 1))) >> LUMA_SHIFT) as u8])
    })
}

/// Inverse binary threshold: pixels darker than `level` become foreground,
/// everything else background. Dark pieces on a near-white sheet end up as
/// foreground blobs.
pub fn binarize_inverse(gray: &GrayImage, level: u8) -> GrayImage {
    GrayImage::from_fn(gray.width(), gray.height(), |x, y| {
        if gray.get_pixel(x, y)[0] < level {
            Luma([FOREGROUND])
        } else {
            Luma([BACKGROUND])
        }
    })
}
