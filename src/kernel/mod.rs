//! Correlation kernels over complex contour descriptors.
//!
//! Both kernels work on the cyclic edge-vector encoding produced by
//! [`crate::template::Template`]. Cyclic shifts make them independent of the
//! contour's start point; taking magnitudes makes them independent of
//! rotation.

use crate::util::math::{cyclic_dot, Complex};

/// Normalized autocorrelation magnitudes for shifts `0..len / 2`.
///
/// Entry `s` is `|sum_k v[k] * conj(v[k + s])| / energy`. Entry 0 is 1 for
/// any non-zero descriptor. A zero-energy descriptor yields all zeros.
pub fn autocorrelation(vectors: &[Complex], energy: f64) -> Vec<f64> {
    let half = vectors.len() / 2;
    if energy <= f64::EPSILON {
        return vec![0.0; half];
    }
    (0..half)
        .map(|shift| cyclic_dot(vectors, vectors, shift).norm() / energy)
        .collect()
}

/// Best cyclic inter-correlation between two equal-length descriptors.
///
/// Returns the winning (unnormalized) coefficient, its shift, and its
/// magnitude. Returns `None` on empty or mismatched inputs.
pub fn inter_correlation(a: &[Complex], b: &[Complex]) -> Option<(Complex, usize, f64)> {
    if a.is_empty() || a.len() != b.len() {
        return None;
    }
    let mut best = (Complex::ZERO, 0usize, f64::NEG_INFINITY);
    for shift in 0..b.len() {
        let coeff = cyclic_dot(a, b, shift);
        let magnitude = coeff.norm();
        if magnitude > best.2 {
            best = (coeff, shift, magnitude);
        }
    }
    Some(best)
}

/// Largest absolute element-wise difference between two ACF descriptors.
pub fn max_abs_deviation(a: &[f64], b: &[f64]) -> f64 {
    a.iter()
        .zip(b.iter())
        .map(|(x, y)| (x - y).abs())
        .fold(0.0, f64::max)
}
