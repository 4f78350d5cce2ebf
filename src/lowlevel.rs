//! Low-level building blocks for custom detection pipelines.
//!
//! These items expose the individual stages behind [`crate::Detector`] for
//! callers that trace contours themselves, want to inspect intermediate
//! images, or plug in their own matcher. Most users should prefer the
//! top-level `Detector` API.

pub use crate::candidate::overlap::{resolve_overlaps, DUPLICATE_AREA_RATIO, INFLATE_MARGIN};
pub use crate::contour::{filter_contours, max_contour_area, ContourFilterParams};
pub use crate::image::pyramid::{pyr_down, pyr_up_to, pyramid_smooth};
pub use crate::kernel::{autocorrelation, inter_correlation, max_abs_deviation};
pub use crate::preprocess::threshold::{adaptive_threshold_mean, adaptive_window};
pub use crate::preprocess::{preprocess, Preprocessed, EDGE_DILATION_RADIUS};
pub use crate::util::math::Complex;
