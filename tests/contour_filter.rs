use contourmatch::lowlevel::{filter_contours, max_contour_area, ContourFilterParams};
use contourmatch::{Contour, ContourSet, Point};
use image::{GrayImage, Luma};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Rectangle polygon with corners at `(x, y)` and `(x + w, y + h)`, with a
/// point every `sx` columns on horizontal edges and every `sy` rows on
/// vertical ones. Point count is `2 * (w / sx + h / sy)`, area is `w * h`.
fn rect_outline(x: i32, y: i32, w: i32, h: i32, sx: i32, sy: i32) -> Vec<Point> {
    let mut pts = Vec::new();
    let mut cx = x;
    while cx < x + w {
        pts.push(Point::new(cx, y));
        cx += sx;
    }
    let mut cy = y;
    while cy < y + h {
        pts.push(Point::new(x + w, cy));
        cy += sy;
    }
    let mut cx = x + w;
    while cx > x {
        pts.push(Point::new(cx, y + h));
        cx -= sx;
    }
    let mut cy = y + h;
    while cy > y {
        pts.push(Point::new(x, cy));
        cy -= sy;
    }
    pts
}

fn size_params() -> ContourFilterParams {
    ContourFilterParams {
        filter_by_size: true,
        min_contour_length: 15,
        min_contour_area: 10.0,
        min_form_factor: 0.5,
        edge_support: false,
    }
}

fn kept_count(contours: Vec<Contour>, params: &ContourFilterParams, w: usize, h: usize) -> usize {
    let set = ContourSet::from_contours(contours);
    filter_contours(&set, params, None, w, h).len()
}

#[test]
fn max_area_is_fifth_of_frame() {
    assert_eq!(max_contour_area(100, 100), 2000);
    assert_eq!(max_contour_area(101, 33), 101 * 33 / 5);
}

#[test]
fn compact_contour_in_small_frame_is_kept() {
    let contour = Contour::from_points(rect_outline(10, 10, 10, 5, 2, 1));
    assert_eq!(contour.point_count(), 20);
    assert_eq!(contour.area(), 50.0);
    assert_eq!(kept_count(vec![contour], &size_params(), 100, 100), 1);
}

#[test]
fn each_size_condition_rejects() {
    let params = size_params();

    // 8 points: too short.
    let short = Contour::from_points(rect_outline(0, 0, 4, 4, 2, 2));
    assert_eq!(short.point_count(), 8);
    assert_eq!(kept_count(vec![short], &params, 100, 100), 0);

    // 18 points, area 8: too small.
    let tiny = Contour::from_points(rect_outline(0, 0, 8, 1, 1, 1));
    assert_eq!(tiny.area(), 8.0);
    assert_eq!(kept_count(vec![tiny], &params, 100, 100), 0);

    // Area 2050 on a 100x100 frame exceeds 2000.
    let huge = Contour::from_points(rect_outline(0, 0, 50, 41, 1, 1));
    assert_eq!(kept_count(vec![huge], &params, 100, 100), 0);

    // Area exactly at the ceiling stays.
    let edge = Contour::from_points(rect_outline(0, 0, 50, 40, 1, 1));
    assert_eq!(edge.area(), 2000.0);
    assert_eq!(kept_count(vec![edge], &params, 100, 100), 1);

    // 82 points, area 40: form factor 0.488 <= 0.5.
    let thin = Contour::from_points(rect_outline(0, 0, 40, 1, 1, 1));
    assert_eq!(thin.point_count(), 82);
    assert!(thin.area() / thin.point_count() as f64 <= 0.5);
    assert_eq!(kept_count(vec![thin], &params, 100, 100), 0);
}

#[test]
fn disabled_size_test_keeps_everything() {
    let params = ContourFilterParams {
        filter_by_size: false,
        ..size_params()
    };
    let contours = vec![
        Contour::from_points(rect_outline(0, 0, 4, 4, 2, 2)),
        Contour::from_points(rect_outline(0, 0, 90, 90, 1, 1)),
        Contour::from_points(Vec::new()),
    ];
    assert_eq!(kept_count(contours, &params, 100, 100), 3);
}

#[test]
fn size_test_matches_definition_on_random_contours() {
    let mut rng = StdRng::seed_from_u64(7);
    let params = size_params();
    let (fw, fh) = (120usize, 90usize);
    let max_area = max_contour_area(fw, fh) as f64;

    for _ in 0..500 {
        let w = rng.random_range(1..80);
        let h = rng.random_range(1..60);
        let sx = rng.random_range(1..=4);
        let sy = rng.random_range(1..=4);
        let contour = Contour::from_points(rect_outline(0, 0, w, h, sx, sy));
        let n = contour.point_count();
        let area = contour.area();
        let expected_reject = n < params.min_contour_length
            || area < params.min_contour_area
            || area > max_area
            || area / n as f64 <= params.min_form_factor;
        let kept = kept_count(vec![contour], &params, fw, fh);
        assert_eq!(kept == 0, expected_reject, "w={w} h={h} sx={sx} sy={sy}");
    }
}

#[test]
fn edge_support_needs_one_sampled_point() {
    // 20 points; index 0 is (0, 0) and index 10 is (10, 5).
    let pts = rect_outline(0, 0, 10, 5, 2, 1);
    assert_eq!(pts[0], Point::new(0, 0));
    assert_eq!(pts[10], Point::new(10, 5));
    let set = ContourSet::from_contours(vec![Contour::from_points(pts)]);
    let params = ContourFilterParams {
        filter_by_size: false,
        edge_support: true,
        ..size_params()
    };

    let blank = GrayImage::new(16, 16);
    assert!(filter_contours(&set, &params, Some(&blank), 16, 16).is_empty());

    let mut first = GrayImage::new(16, 16);
    first.put_pixel(0, 0, Luma([255u8]));
    assert_eq!(filter_contours(&set, &params, Some(&first), 16, 16).len(), 1);

    let mut half = GrayImage::new(16, 16);
    half.put_pixel(10, 5, Luma([1u8]));
    assert_eq!(filter_contours(&set, &params, Some(&half), 16, 16).len(), 1);

    // Support elsewhere on the boundary does not count.
    let mut other = GrayImage::new(16, 16);
    other.put_pixel(4, 0, Luma([255u8]));
    assert!(filter_contours(&set, &params, Some(&other), 16, 16).is_empty());

    // No mask, or test disabled: kept.
    assert_eq!(filter_contours(&set, &params, None, 16, 16).len(), 1);
    let off = ContourFilterParams {
        edge_support: false,
        ..params
    };
    assert_eq!(filter_contours(&set, &off, Some(&blank), 16, 16).len(), 1);
}

#[test]
fn filter_preserves_sibling_order() {
    let contours: Vec<Contour> = (0..6)
        .map(|i| {
            // Odd entries are too short to survive.
            let step = if i % 2 == 0 { 1 } else { 5 };
            Contour::from_points(rect_outline(i * 20, 0, 10, 10, step, step))
        })
        .collect();
    let set = ContourSet::from_contours(contours);
    let kept = filter_contours(&set, &size_params(), None, 200, 200);
    let xs: Vec<i32> = kept.iter().map(|c| c.bounding_rect().x).collect();
    assert_eq!(xs, vec![0, 40, 80]);
}
