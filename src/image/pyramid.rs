//! Two-pass pyramid smoothing for grayscale `u8` images.
//!
//! Downsampling uses a 2x2 box filter with integer rounding:
//! `dst = ((a + b + c + d) + 2) / 4`. Odd trailing rows and columns are
//! folded in by clamping. Upsampling back to the source size uses bilinear
//! interpolation at pixel centers, so a down/up round trip acts as a cheap
//! low-pass filter that removes single-pixel noise before binarization.

use crate::image::{ImageView, OwnedImage};
use crate::util::{DetectError, DetectResult};

/// Halves the resolution with a 2x2 box filter.
///
/// The output size is `ceil(width / 2) x ceil(height / 2)`.
pub fn pyr_down(src: ImageView<'_, u8>) -> DetectResult<OwnedImage> {
    let width = src.width();
    let height = src.height();
    let dst_width = width.div_ceil(2);
    let dst_height = height.div_ceil(2);
    let mut dst = vec![0u8; dst_width * dst_height];

    for y in 0..dst_height {
        let y0 = 2 * y;
        let y1 = (2 * y + 1).min(height - 1);
        let row0 = src.row(y0).ok_or(DetectError::InvalidDimensions { width, height })?;
        let row1 = src.row(y1).ok_or(DetectError::InvalidDimensions { width, height })?;
        for x in 0..dst_width {
            let x0 = 2 * x;
            let x1 = (2 * x + 1).min(width - 1);
            let sum = u16::from(row0[x0])
                + u16::from(row0[x1])
                + u16::from(row1[x0])
                + u16::from(row1[x1]);
            dst[y * dst_width + x] = ((sum + 2) / 4) as u8;
        }
    }

    OwnedImage::new(dst, dst_width, dst_height)
}

/// Upsamples `src` to exactly `width x height` with bilinear interpolation.
pub fn pyr_up_to(src: ImageView<'_, u8>, width: usize, height: usize) -> DetectResult<OwnedImage> {
    if width == 0 || height == 0 {
        return Err(DetectError::InvalidDimensions { width, height });
    }
    let src_w = src.width();
    let src_h = src.height();
    let sx = src_w as f32 / width as f32;
    let sy = src_h as f32 / height as f32;
    let max_x = (src_w - 1) as f32;
    let max_y = (src_h - 1) as f32;
    let mut dst = vec![0u8; width * height];

    for y in 0..height {
        let fy = ((y as f32 + 0.5) * sy - 0.5).clamp(0.0, max_y);
        let y0 = fy.floor() as usize;
        let y1 = (y0 + 1).min(src_h - 1);
        let wy = fy - y0 as f32;
        let row0 = src.row(y0).ok_or(DetectError::InvalidDimensions {
            width: src_w,
            height: src_h,
        })?;
        let row1 = src.row(y1).ok_or(DetectError::InvalidDimensions {
            width: src_w,
            height: src_h,
        })?;
        for x in 0..width {
            let fx = ((x as f32 + 0.5) * sx - 0.5).clamp(0.0, max_x);
            let x0 = fx.floor() as usize;
            let x1 = (x0 + 1).min(src_w - 1);
            let wx = fx - x0 as f32;
            let top = f32::from(row0[x0]) * (1.0 - wx) + f32::from(row0[x1]) * wx;
            let bottom = f32::from(row1[x0]) * (1.0 - wx) + f32::from(row1[x1]) * wx;
            let value = top * (1.0 - wy) + bottom * wy;
            dst[y * width + x] = value.round().clamp(0.0, 255.0) as u8;
        }
    }

    OwnedImage::new(dst, width, height)
}

/// Smooths a frame by a pyramid down/up round trip at the original size.
pub fn pyramid_smooth(src: ImageView<'_, u8>) -> DetectResult<OwnedImage> {
    let down = pyr_down(src)?;
    pyr_up_to(down.view(), src.width(), src.height())
}

#[cfg(test)]
mod tests {
    use super::{pyr_down, pyramid_smooth};
    use crate::image::ImageView;

    #[test]
    fn pyr_down_handles_odd_sizes() {
        let data: Vec<u8> = (0u8..15).collect();
        let view = ImageView::from_slice(&data, 5, 3).unwrap();
        let down = pyr_down(view).unwrap();
        assert_eq!((down.width(), down.height()), (3, 2));
        // Top-left block: 0, 1, 5, 6.
        assert_eq!(down.data()[0], 3);
    }

    #[test]
    fn smoothing_keeps_size_and_flat_regions() {
        let data = vec![77u8; 7 * 9];
        let view = ImageView::from_slice(&data, 7, 9).unwrap();
        let smooth = pyramid_smooth(view).unwrap();
        assert_eq!((smooth.width(), smooth.height()), (7, 9));
        assert!(smooth.data().iter().all(|&v| v == 77));
    }

    #[test]
    fn smoothing_attenuates_isolated_pixel() {
        let mut data = vec![0u8; 8 * 8];
        data[3 * 8 + 3] = 255;
        let view = ImageView::from_slice(&data, 8, 8).unwrap();
        let smooth = pyramid_smooth(view).unwrap();
        assert!(smooth.data()[3 * 8 + 3] < 255);
    }
}
