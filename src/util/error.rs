//! Error types for contourmatch.

use thiserror::Error;

/// Result alias for contourmatch operations.
pub type DetectResult<T> = std::result::Result<T, DetectError>;

/// Errors that can occur when running a detection pass.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DetectError {
    /// Image dimensions are zero or overflow the addressable range.
    #[error("invalid dimensions {width}x{height}")]
    InvalidDimensions { width: usize, height: usize },
    /// Stride is smaller than the row width.
    #[error("invalid stride {stride} for width {width}")]
    InvalidStride { width: usize, stride: usize },
    /// Backing buffer is shorter than the view requires.
    #[error("buffer too small: needed {needed}, got {got}")]
    BufferTooSmall { needed: usize, got: usize },
    /// The input data or parameters are invalid.
    #[error("invalid input: {0}")]
    InvalidInput(&'static str),
    /// A descriptor does not have the length the library was built with.
    #[error("descriptor length mismatch: expected {expected}, got {got}")]
    DescriptorLengthMismatch { expected: usize, got: usize },
    /// A shared container was poisoned by a panicking worker.
    #[error("lock poisoned: {what}")]
    LockPoisoned { what: &'static str },
    /// The pass was cancelled before all contours were processed.
    #[error("detection pass cancelled")]
    Cancelled,
    /// Image decoding or file access failed.
    #[error("image io error: {reason}")]
    ImageIo { reason: String },
}
