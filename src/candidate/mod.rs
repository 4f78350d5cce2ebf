//! Detection post-processing.
//!
//! Collapses duplicate and nested detections into one per object.

pub(crate) mod overlap;
