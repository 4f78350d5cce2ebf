//! Adaptive mean thresholding and bitwise OR on binary images.

use image::{GrayImage, Luma};
use imageproc::integral_image::integral_image;

/// Coerces a configured block size to the odd window actually used.
///
/// The window is `block_size + block_size % 2 + 1`, never below 3.
pub fn adaptive_window(block_size: usize) -> usize {
    (block_size + block_size % 2 + 1).max(3)
}

/// Local mean thresholding: `255` where `src > mean - constant`, else `0`.
///
/// The mean is taken over a `window x window` box clamped to the image,
/// computed with a summed-area table.
pub fn adaptive_threshold_mean(src: &GrayImage, window: usize, constant: f32) -> GrayImage {
    let width = src.width() as usize;
    let height = src.height() as usize;
    let radius = window / 2;
    // One zero row and column of padding: entry (x, y) sums src[..x, ..y].
    let integral = integral_image::<_, u64>(src);
    let at = |x: usize, y: usize| integral.get_pixel(x as u32, y as u32).0[0];

    let mut out = GrayImage::new(src.width(), src.height());
    for y in 0..height {
        let y0 = y.saturating_sub(radius);
        let y1 = (y + radius + 1).min(height);
        for x in 0..width {
            let x0 = x.saturating_sub(radius);
            let x1 = (x + radius + 1).min(width);
            let sum = at(x1, y1) + at(x0, y0) - at(x1, y0) - at(x0, y1);
            let count = ((y1 - y0) * (x1 - x0)) as f32;
            let mean = sum as f32 / count;
            if f32::from(src.get_pixel(x as u32, y as u32).0[0]) > mean - constant {
                out.put_pixel(x as u32, y as u32, Luma([255u8]));
            }
        }
    }
    out
}

/// ORs `other` into `img`; sizes must agree, extra pixels are ignored.
pub fn or_in_place(img: &mut GrayImage, other: &GrayImage) {
    for (dst, src) in img.pixels_mut().zip(other.pixels()) {
        dst.0[0] |= src.0[0];
    }
}
