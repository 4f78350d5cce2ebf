//! Convenience helpers for loading frames via the `image` crate.
//!
//! Available when the `image-io` feature is enabled.

use crate::image::OwnedImage;
use crate::util::{DetectError, DetectResult};
use std::path::Path;

/// Creates an owned grayscale image from a dynamic image.
pub fn owned_from_dynamic_image(img: &image::DynamicImage) -> DetectResult<OwnedImage> {
    let gray = img.to_luma8();
    let width = gray.width() as usize;
    let height = gray.height() as usize;
    OwnedImage::new(gray.into_raw(), width, height)
}

/// Loads an image from disk and converts it to a grayscale owned image.
pub fn load_gray_image<P: AsRef<Path>>(path: P) -> DetectResult<OwnedImage> {
    let img = image::open(path).map_err(|err| DetectError::ImageIo {
        reason: err.to_string(),
    })?;
    owned_from_dynamic_image(&img)
}
