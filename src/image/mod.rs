//! Image views, owned buffers, and pyramid smoothing.
//!
//! `ImageView` is a borrowed 2D view into a 1D buffer with an explicit stride.
//! The stride counts elements between the starts of consecutive rows, so a
//! stride larger than the width represents padded rows. Frames enter the
//! detector as views; the preprocessing stages convert them into owned
//! `image::GrayImage` buffers for the `imageproc` primitives.

use crate::util::{DetectError, DetectResult};
use image::GrayImage;

#[cfg(feature = "image-io")]
pub mod io;
pub mod pyramid;

/// Borrowed 2D image view with an explicit stride.
#[derive(Copy, Clone)]
pub struct ImageView<'a, T> {
    data: &'a [T],
    width: usize,
    height: usize,
    stride: usize,
}

impl<'a, T> ImageView<'a, T> {
    /// Creates a contiguous view with `stride == width`.
    pub fn from_slice(data: &'a [T], width: usize, height: usize) -> DetectResult<Self> {
        Self::new(data, width, height, width)
    }

    /// Creates a view with an explicit stride.
    pub fn new(data: &'a [T], width: usize, height: usize, stride: usize) -> DetectResult<Self> {
        let needed = required_len(width, height, stride)?;
        if data.len() < needed {
            return Err(DetectError::BufferTooSmall {
                needed,
                got: data.len(),
            });
        }
        Ok(Self {
            data,
            width,
            height,
            stride,
        })
    }

    /// Returns the image width in pixels.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Returns the image height in pixels.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Returns the stride in elements between row starts.
    pub fn stride(&self) -> usize {
        self.stride
    }

    /// Returns the element at `(x, y)` if it is within bounds.
    pub fn get(&self, x: usize, y: usize) -> Option<&'a T> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let idx = y.checked_mul(self.stride)?.checked_add(x)?;
        self.data.get(idx)
    }

    /// Returns a contiguous slice for row `y` with length `width`.
    pub fn row(&self, y: usize) -> Option<&'a [T]> {
        if y >= self.height {
            return None;
        }
        let start = y.checked_mul(self.stride)?;
        let end = start.checked_add(self.width)?;
        self.data.get(start..end)
    }
}

impl<'a> ImageView<'a, u8> {
    /// Borrows a grayscale `image` buffer as a contiguous view.
    pub fn from_gray_image(img: &'a GrayImage) -> DetectResult<Self> {
        Self::from_slice(img.as_raw(), img.width() as usize, img.height() as usize)
    }
}

fn required_len(width: usize, height: usize, stride: usize) -> DetectResult<usize> {
    if width == 0 || height == 0 {
        return Err(DetectError::InvalidDimensions { width, height });
    }
    if stride < width {
        return Err(DetectError::InvalidStride { width, stride });
    }
    let needed = (height - 1)
        .checked_mul(stride)
        .and_then(|v| v.checked_add(width))
        .ok_or(DetectError::InvalidDimensions { width, height })?;
    Ok(needed)
}

/// Owned contiguous grayscale image buffer.
#[derive(Clone, Debug)]
pub struct OwnedImage {
    data: Vec<u8>,
    width: usize,
    height: usize,
}

impl OwnedImage {
    /// Wraps a row-major buffer of exactly `width * height` bytes.
    pub fn new(data: Vec<u8>, width: usize, height: usize) -> DetectResult<Self> {
        if width == 0 || height == 0 {
            return Err(DetectError::InvalidDimensions { width, height });
        }
        let needed = width
            .checked_mul(height)
            .ok_or(DetectError::InvalidDimensions { width, height })?;
        if data.len() < needed {
            return Err(DetectError::BufferTooSmall {
                needed,
                got: data.len(),
            });
        }
        if data.len() > needed {
            return Err(DetectError::InvalidDimensions { width, height });
        }
        Ok(Self {
            data,
            width,
            height,
        })
    }

    /// Copies a (possibly strided) view into a contiguous buffer.
    pub fn from_view(view: ImageView<'_, u8>) -> DetectResult<Self> {
        let width = view.width();
        let height = view.height();
        let mut data = Vec::with_capacity(width * height);
        for y in 0..height {
            let row = view.row(y).ok_or(DetectError::BufferTooSmall {
                needed: (y + 1) * view.stride(),
                got: view.data.len(),
            })?;
            data.extend_from_slice(row);
        }
        Self::new(data, width, height)
    }

    /// Returns a borrowed view of the image.
    pub fn view(&self) -> ImageView<'_, u8> {
        ImageView {
            data: &self.data,
            width: self.width,
            height: self.height,
            stride: self.width,
        }
    }

    /// Returns the image width in pixels.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Returns the image height in pixels.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Returns the row-major pixel buffer.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Converts into an `image::GrayImage` without copying.
    pub fn into_gray_image(self) -> DetectResult<GrayImage> {
        let (width, height) = (self.width, self.height);
        let w = u32::try_from(width).map_err(|_| DetectError::InvalidDimensions { width, height })?;
        let h =
            u32::try_from(height).map_err(|_| DetectError::InvalidDimensions { width, height })?;
        GrayImage::from_raw(w, h, self.data).ok_or(DetectError::BufferTooSmall {
            needed: width * height,
            got: 0,
        })
    }
}
