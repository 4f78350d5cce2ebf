//! Candidate selection over a traced contour set.
//!
//! Two independent tests decide whether a contour is worth matching:
//!
//! - the size/shape test rejects short, tiny, near-full-frame, or sparse
//!   boundaries;
//! - the edge-support test rejects boundaries that no edge-detected pixel
//!   corroborates at either of two sampled points.

use crate::contour::{Contour, ContourSet, Point};
use crate::trace::{trace_event, trace_span};
use image::GrayImage;

/// Thresholds and toggles for contour filtering.
#[derive(Clone, Copy, Debug)]
pub struct ContourFilterParams {
    /// Enables the size/shape test.
    pub filter_by_size: bool,
    /// Minimum boundary point count.
    pub min_contour_length: usize,
    /// Minimum enclosed area.
    pub min_contour_area: f64,
    /// Area-per-point ratio at or below which a contour is rejected.
    pub min_form_factor: f64,
    /// Enables the edge-support test (needs an edge mask).
    pub edge_support: bool,
}

impl Default for ContourFilterParams {
    fn default() -> Self {
        Self {
            filter_by_size: true,
            min_contour_length: 15,
            min_contour_area: 10.0,
            min_form_factor: 0.5,
            edge_support: false,
        }
    }
}

/// Area ceiling for a frame: `floor(width * height / 5)`.
pub fn max_contour_area(frame_width: usize, frame_height: usize) -> usize {
    frame_width.saturating_mul(frame_height) / 5
}

impl ContourFilterParams {
    /// Size/shape test. Returns `true` when the contour is rejected.
    pub fn rejects_by_size(&self, contour: &Contour, max_area: usize) -> bool {
        if !self.filter_by_size {
            return false;
        }
        let count = contour.point_count();
        if count == 0 {
            return true;
        }
        let area = contour.area();
        count < self.min_contour_length
            || area < self.min_contour_area
            || area > max_area as f64
            || area / count as f64 <= self.min_form_factor
    }

    /// Edge-support test. Returns `true` when the contour is rejected.
    pub fn rejects_by_edge_support(&self, contour: &Contour, edge_mask: Option<&GrayImage>) -> bool {
        if !self.edge_support {
            return false;
        }
        let Some(mask) = edge_mask else {
            return false;
        };
        let points = contour.points();
        let count = points.len();
        if count == 0 {
            return true;
        }
        let p1 = points[0];
        let p2 = points[(count / 2) % count];
        intensity(mask, p1) <= f64::EPSILON && intensity(mask, p2) <= f64::EPSILON
    }

    /// Applies both enabled tests.
    pub fn accepts(&self, contour: &Contour, edge_mask: Option<&GrayImage>, max_area: usize) -> bool {
        !self.rejects_by_size(contour, max_area) && !self.rejects_by_edge_support(contour, edge_mask)
    }
}

/// Single-pixel read; out-of-bounds points read as zero.
fn intensity(mask: &GrayImage, p: Point) -> f64 {
    if p.x < 0 || p.y < 0 {
        return 0.0;
    }
    mask.get_pixel_checked(p.x as u32, p.y as u32)
        .map_or(0.0, |px| f64::from(px.0[0]))
}

/// Walks the sibling list and keeps the contours that pass every enabled
/// test, preserving sibling order.
pub fn filter_contours(
    set: &ContourSet,
    params: &ContourFilterParams,
    edge_mask: Option<&GrayImage>,
    frame_width: usize,
    frame_height: usize,
) -> Vec<Contour> {
    let _span = trace_span!("filter_contours", total = set.len()).entered();
    let max_area = max_contour_area(frame_width, frame_height);

    let mut kept = Vec::new();
    for contour in set.siblings() {
        if !params.accepts(contour, edge_mask, max_area) {
            continue;
        }
        kept.push(contour.clone());
    }

    trace_event!("filtered_contours", kept = kept.len(), max_area = max_area);
    kept
}

#[cfg(test)]
mod tests {
    use super::{max_contour_area, ContourFilterParams};
    use crate::contour::{Contour, Point};
    use image::{GrayImage, Luma};

    #[test]
    fn max_area_floors() {
        assert_eq!(max_contour_area(100, 100), 2000);
        assert_eq!(max_contour_area(7, 3), 4);
    }

    #[test]
    fn edge_support_reads_out_of_bounds_as_zero() {
        let mask = GrayImage::from_pixel(4, 4, Luma([255u8]));
        let params = ContourFilterParams {
            filter_by_size: false,
            edge_support: true,
            ..ContourFilterParams::default()
        };
        let outside = Contour::from_points(vec![Point::new(-1, 0), Point::new(9, 9)]);
        assert!(params.rejects_by_edge_support(&outside, Some(&mask)));
        let inside = Contour::from_points(vec![Point::new(1, 1), Point::new(9, 9)]);
        assert!(!params.rejects_by_edge_support(&inside, Some(&mask)));
    }
}
