//! Arc-length resampling of closed contours into edge vectors.

use crate::contour::Point;
use crate::util::math::Complex;

/// Resamples a closed polygon to `count` points spaced evenly along its
/// perimeter and returns the cyclic edge vectors between them.
///
/// Sampling starts at the first point and follows the tracing direction. An
/// empty or zero-perimeter polygon yields `count` zero vectors.
pub(crate) fn edge_vectors(points: &[Point], count: usize) -> Vec<Complex> {
    let samples = resample_closed(points, count);
    if samples.is_empty() {
        return vec![Complex::ZERO; count];
    }
    (0..count)
        .map(|j| samples[(j + 1) % count] - samples[j])
        .collect()
}

fn resample_closed(points: &[Point], count: usize) -> Vec<Complex> {
    let m = points.len();
    if m == 0 || count == 0 {
        return Vec::new();
    }
    let corners: Vec<Complex> = points
        .iter()
        .map(|p| Complex::new(f64::from(p.x), f64::from(p.y)))
        .collect();
    let lengths: Vec<f64> = (0..m)
        .map(|i| (corners[(i + 1) % m] - corners[i]).norm())
        .collect();
    let perimeter: f64 = lengths.iter().sum();
    if perimeter <= f64::EPSILON {
        return Vec::new();
    }

    let step = perimeter / count as f64;
    let mut out = Vec::with_capacity(count);
    let mut seg = 0usize;
    let mut seg_start = 0.0f64;
    for j in 0..count {
        let target = j as f64 * step;
        while seg + 1 < m && seg_start + lengths[seg] <= target {
            seg_start += lengths[seg];
            seg += 1;
        }
        let len = lengths[seg];
        let t = if len > f64::EPSILON {
            ((target - seg_start) / len).clamp(0.0, 1.0)
        } else {
            0.0
        };
        let a = corners[seg];
        let b = corners[(seg + 1) % m];
        out.push(a + (b - a).scale(t));
    }
    out
}
