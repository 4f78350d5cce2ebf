//! ContourMatch finds shape-like regions in a frame and matches them against a
//! library of recorded contour templates.
//!
//! A pass binarizes the frame, traces contours, filters them by size, form
//! factor, and edge support, then fans the survivors out on the rayon pool.
//! Each worker builds a fixed-length descriptor and asks a [`MatchEngine`] for
//! the best library entry. A final overlap pass keeps one detection per
//! physical object.

pub mod bank;
mod candidate;
pub mod contour;
pub mod detector;
pub mod image;
pub mod kernel;
pub mod lowlevel;
pub mod preprocess;
pub mod search;
pub mod template;
mod trace;
pub mod util;

pub use bank::TemplateLibrary;
pub use contour::{Contour, ContourSet, Point, Rect};
pub use detector::{CancelToken, Detections, Detector, DetectorConfig, FrameDetections};
#[cfg(feature = "image-io")]
pub use crate::image::io;
pub use crate::image::{ImageView, OwnedImage};
pub use preprocess::PreprocessConfig;
pub use search::{CorrelationMatcher, FoundTemplate, MatchConfig, MatchEngine};
pub use template::Template;
pub use util::{DetectError, DetectResult};

pub use candidate::overlap::resolve_overlaps;
