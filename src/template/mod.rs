//! Contour descriptors ("templates").
//!
//! A [`Template`] encodes a closed contour as a fixed number of complex edge
//! vectors sampled evenly along its perimeter, plus precomputed energy and
//! autocorrelation statistics used by the matcher. The same type serves both
//! as a library entry and as a per-frame sample.

use crate::contour::{Contour, Rect};
use crate::kernel::autocorrelation;
use crate::util::math::Complex;
use crate::util::{DetectError, DetectResult};

mod encode;

/// Fixed-length shape descriptor built from a contour.
#[derive(Clone, Debug)]
pub struct Template {
    name: String,
    contour_index: usize,
    source_area: f64,
    source_rect: Rect,
    vectors: Vec<Complex>,
    norm: f64,
    acf: Vec<f64>,
}

impl Template {
    /// Builds a descriptor of `template_size` vectors from a contour.
    ///
    /// `contour_index` tags the descriptor with its source; it is used for
    /// deterministic ordering and carries no other meaning.
    pub fn from_contour(
        contour: &Contour,
        contour_index: usize,
        template_size: usize,
    ) -> DetectResult<Self> {
        if template_size < 2 {
            return Err(DetectError::InvalidInput("template_size must be >= 2"));
        }
        let vectors = encode::edge_vectors(contour.points(), template_size);
        let energy: f64 = vectors.iter().map(|v| v.norm_sqr()).sum();
        let acf = autocorrelation(&vectors, energy);
        Ok(Self {
            name: String::new(),
            contour_index,
            source_area: contour.area(),
            source_rect: contour.bounding_rect(),
            vectors,
            norm: energy.sqrt(),
            acf,
        })
    }

    /// Attaches a human-readable name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Returns the name (empty for unnamed samples).
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Index of the source contour within its pass.
    pub fn contour_index(&self) -> usize {
        self.contour_index
    }

    /// Enclosed area of the source contour.
    pub fn source_area(&self) -> f64 {
        self.source_area
    }

    /// Bounding rectangle of the source contour.
    pub fn bounding_rect(&self) -> Rect {
        self.source_rect
    }

    /// Descriptor length.
    pub fn len(&self) -> usize {
        self.vectors.len()
    }

    /// True when the descriptor holds no vectors.
    pub fn is_empty(&self) -> bool {
        self.vectors.is_empty()
    }

    /// Edge vectors in perimeter order.
    pub fn vectors(&self) -> &[Complex] {
        &self.vectors
    }

    /// Euclidean norm of the edge vectors.
    pub fn norm(&self) -> f64 {
        self.norm
    }

    /// Normalized autocorrelation magnitudes.
    pub fn acf(&self) -> &[f64] {
        &self.acf
    }
}
