//! Frame preprocessing: smoothing, edge mask, binarization, contour tracing.
//!
//! Stages run in a fixed order:
//!
//! 1. optional histogram equalization;
//! 2. pyramid down/up smoothing;
//! 3. optional Canny edge mask on the smoothed frame;
//! 4. adaptive mean thresholding of the smoothed (or raw) frame, inverted;
//! 5. optional OR of the raw edge mask into the binarized frame;
//! 6. dilation of the edge mask for the edge-support test;
//! 7. border tracing into a flat sibling list.

use crate::contour::ContourSet;
use crate::image::pyramid::pyramid_smooth;
use crate::image::{ImageView, OwnedImage};
use crate::trace::{trace_event, trace_span};
use crate::util::DetectResult;
use image::GrayImage;
use imageproc::distance_transform::Norm;

pub mod threshold;

pub use threshold::{adaptive_threshold_mean, adaptive_window};

/// Radius of the edge-mask dilation used by the edge-support test.
pub const EDGE_DILATION_RADIUS: u8 = 3;

/// Settings for the preprocessing stages.
#[derive(Clone, Debug)]
pub struct PreprocessConfig {
    /// Histogram-equalize the frame first.
    pub equalize_hist: bool,
    /// Compute the Canny edge mask.
    pub noise_filter: bool,
    /// Low and high Canny threshold.
    pub canny_threshold: f32,
    /// Binarize the smoothed frame instead of the raw one.
    pub blur: bool,
    /// Adaptive threshold block size before odd coercion.
    pub adaptive_threshold_block_size: usize,
    /// Offset subtracted from the local mean.
    pub adaptive_threshold_constant: f32,
    /// OR the edge mask into the binarized frame.
    pub add_canny: bool,
}

impl Default for PreprocessConfig {
    fn default() -> Self {
        Self {
            equalize_hist: false,
            noise_filter: false,
            canny_threshold: 50.0,
            blur: true,
            adaptive_threshold_block_size: 4,
            adaptive_threshold_constant: 1.2,
            add_canny: true,
        }
    }
}

/// Output of [`preprocess`].
#[derive(Clone, Debug)]
pub struct Preprocessed {
    /// Binary frame the contours were traced from.
    pub binarized: GrayImage,
    /// Dilated edge mask, present when `noise_filter` is set.
    pub edge_mask: Option<GrayImage>,
    /// Traced borders as one sibling list.
    pub contours: ContourSet,
}

/// Runs every preprocessing stage on a grayscale frame.
pub fn preprocess(frame: ImageView<'_, u8>, cfg: &PreprocessConfig) -> DetectResult<Preprocessed> {
    let _span = trace_span!("preprocess", width = frame.width(), height = frame.height()).entered();

    let mut gray = OwnedImage::from_view(frame)?.into_gray_image()?;
    if cfg.equalize_hist {
        gray = imageproc::contrast::equalize_histogram(&gray);
    }

    let smoothed = pyramid_smooth(ImageView::from_gray_image(&gray)?)?.into_gray_image()?;
    let canny = cfg
        .noise_filter
        .then(|| imageproc::edges::canny(&smoothed, cfg.canny_threshold, cfg.canny_threshold));

    let source = if cfg.blur { &smoothed } else { &gray };
    let window = adaptive_window(cfg.adaptive_threshold_block_size);
    let mut binarized = adaptive_threshold_mean(source, window, cfg.adaptive_threshold_constant);
    image::imageops::invert(&mut binarized);
    if cfg.add_canny {
        if let Some(edges) = canny.as_ref() {
            threshold::or_in_place(&mut binarized, edges);
        }
    }

    let edge_mask =
        canny.map(|edges| imageproc::morphology::dilate(&edges, Norm::LInf, EDGE_DILATION_RADIUS));

    let contours = ContourSet::from_traced(imageproc::contours::find_contours::<i32>(&binarized));
    trace_event!("traced_contours", count = contours.len());

    Ok(Preprocessed {
        binarized,
        edge_mask,
        contours,
    })
}
