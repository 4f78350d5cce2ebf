use contourmatch::{
    Contour, CorrelationMatcher, DetectError, ImageView, MatchConfig, MatchEngine, OwnedImage,
    Point, Rect, Template, TemplateLibrary,
};

/// Rectangle polygon with corners at `(x, y)` and `(x + w, y + h)`, with a
/// point every `sx` columns on horizontal edges and every `sy` rows on
/// vertical ones.
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

#[test]
fn image_view_rejects_invalid_dimensions() {
    let data = [0u8; 4];

    let err = ImageView::from_slice(&data, 0, 1).err().unwrap();
    assert_eq!(
        err,
        DetectError::InvalidDimensions {
            width: 0,
            height: 1,
        }
    );
}

#[test]
fn image_view_rejects_invalid_stride_and_small_buffer() {
    let data = [0u8; 8];
    let err = ImageView::new(&data, 4, 1, 3).err().unwrap();
    assert_eq!(
        err,
        DetectError::InvalidStride {
            width: 4,
            stride: 3,
        }
    );

    let err = ImageView::new(&data[..3], 2, 2, 2).err().unwrap();
    assert_eq!(err, DetectError::BufferTooSmall { needed: 4, got: 3 });
}

#[test]
fn owned_image_copies_strided_rows() {
    let data: Vec<u8> = (0u8..12).collect();
    let view = ImageView::new(&data, 3, 3, 4).unwrap();
    let owned = OwnedImage::from_view(view).unwrap();
    assert_eq!(owned.data(), &[0, 1, 2, 4, 5, 6, 8, 9, 10]);
    let gray = owned.into_gray_image().unwrap();
    assert_eq!(gray.dimensions(), (3, 3));
    assert_eq!(gray.get_pixel(2, 1).0[0], 6);
}

#[test]
fn rect_inflate_and_contains() {
    let r = Rect::new(10, 10, 20, 20);
    let inflated = r.inflate(4, 4);
    assert_eq!(inflated, Rect::new(6, 6, 28, 28));
    assert!(r.contains(&r));
    assert!(inflated.contains(&Rect::new(6, 6, 28, 28)));
    assert!(!r.contains(&Rect::new(9, 10, 5, 5)));
    assert!(inflated.contains(&Rect::new(7, 10, 5, 5)));
    assert_eq!(r.area(), 400);
}

#[test]
fn contour_derives_area_and_bounds() {
    let c = Contour::from_points(rect_outline(0, 0, 10, 5, 2, 1));
    assert_eq!(c.point_count(), 20);
    assert_eq!(c.area(), 50.0);
    assert_eq!(c.bounding_rect(), Rect::new(0, 0, 11, 6));
}

#[test]
fn library_rejects_mismatched_descriptor_length() {
    let contour = Contour::from_points(rect_outline(0, 0, 20, 20, 1, 1));
    let mut library = TemplateLibrary::new(30).unwrap();
    let sample = Template::from_contour(&contour, 0, 16).unwrap();
    let err = library.push(sample).err().unwrap();
    assert_eq!(
        err,
        DetectError::DescriptorLengthMismatch {
            expected: 30,
            got: 16,
        }
    );
    assert!(library.is_empty());

    let idx = library.add_contour("square", &contour).unwrap();
    assert_eq!(idx, 0);
    assert_eq!(library.get(0).unwrap().name(), "square");
    assert!(TemplateLibrary::new(1).is_err());
}

#[test]
fn descriptor_is_deterministic_and_translation_invariant() {
    let a = Contour::from_points(rect_outline(0, 0, 24, 12, 1, 1));
    let b = Contour::from_points(rect_outline(300, 150, 24, 12, 1, 1));
    let ta = Template::from_contour(&a, 0, 30).unwrap();
    let ta2 = Template::from_contour(&a, 0, 30).unwrap();
    let tb = Template::from_contour(&b, 1, 30).unwrap();

    assert_eq!(ta.vectors(), ta2.vectors());
    assert_eq!(ta.len(), 30);
    assert!(!ta.is_empty());
    for (va, vb) in ta.vectors().iter().zip(tb.vectors()) {
        assert!((va.re - vb.re).abs() < 1e-9);
        assert!((va.im - vb.im).abs() < 1e-9);
    }
    assert!((ta.acf()[0] - 1.0).abs() < 1e-12);
}

/// Unit-step outline through axis-aligned corners, closed back to the first.
fn outline(corners: &[(i32, i32)]) -> Vec<Point> {
    let mut pts = Vec::new();
    for (i, &(x0, y0)) in corners.iter().enumerate() {
        let (x1, y1) = corners[(i + 1) % corners.len()];
        let (dx, dy) = ((x1 - x0).signum(), (y1 - y0).signum());
        let (mut x, mut y) = (x0, y0);
        while (x, y) != (x1, y1) {
            pts.push(Point::new(x, y));
            x += dx;
            y += dy;
        }
    }
    pts
}

/// L-shaped outline with perimeter 100 and no rotational symmetry.
fn l_shape() -> Vec<Point> {
    outline(&[(0, 0), (20, 0), (20, 10), (10, 10), (10, 30), (0, 30)])
}

#[test]
fn matcher_recovers_start_point_shift() {
    // Perimeter 100 sampled at 50 points: moving the start by two unit steps
    // is exactly one descriptor slot.
    let pts = l_shape();
    assert_eq!(pts.len(), 100);
    let mut shifted = pts.clone();
    shifted.rotate_left(2);

    let mut library = TemplateLibrary::new(50).unwrap();
    library
        .add_contour("ell", &Contour::from_points(pts))
        .unwrap();
    let sample = Template::from_contour(&Contour::from_points(shifted), 0, 50).unwrap();

    let found = CorrelationMatcher::new()
        .find_template(&library, &sample)
        .expect("shifted outline should match");
    assert_eq!(found.template_index, 0);
    assert!(found.rate > 0.999, "rate {}", found.rate);
    assert!(found.angle_deg.abs() < 1e-6, "angle {}", found.angle_deg);
}

#[test]
fn matcher_reports_rotation_and_scale() {
    let pts = l_shape();
    let rotated: Vec<Point> = pts
        .iter()
        .map(|p| Point::new(-2 * p.y, 2 * p.x))
        .collect();

    let mut library = TemplateLibrary::new(50).unwrap();
    library
        .add_contour("ell", &Contour::from_points(pts))
        .unwrap();
    let sample = Template::from_contour(&Contour::from_points(rotated), 0, 50).unwrap();

    let found = CorrelationMatcher::new()
        .find_template(&library, &sample)
        .expect("rotated outline should match");
    assert!(found.rate > 0.999, "rate {}", found.rate);
    assert!((found.angle_deg - 90.0).abs() < 1e-6, "angle {}", found.angle_deg);
    assert!((found.scale - 2.0).abs() < 1e-9);
}

#[test]
fn matcher_rejects_dissimilar_shapes() {
    let mut library = TemplateLibrary::new(40).unwrap();
    library
        .add_contour(
            "square",
            &Contour::from_points(rect_outline(0, 0, 20, 20, 1, 1)),
        )
        .unwrap();
    let bar = Template::from_contour(
        &Contour::from_points(rect_outline(0, 0, 40, 5, 1, 1)),
        0,
        40,
    )
    .unwrap();

    let matcher = CorrelationMatcher::new();
    assert!(matcher.find_template(&library, &bar).is_none());

    let permissive = CorrelationMatcher::new().with_config(MatchConfig {
        min_rate: 0.0,
        use_acf_prefilter: false,
        ..MatchConfig::default()
    });
    let found = permissive.find_template(&library, &bar).unwrap();
    assert!(found.rate < 0.85, "rate {}", found.rate);
}

#[test]
fn matcher_skips_degenerate_samples() {
    let mut library = TemplateLibrary::new(30).unwrap();
    library
        .add_contour(
            "square",
            &Contour::from_points(rect_outline(0, 0, 20, 20, 1, 1)),
        )
        .unwrap();
    let dot = Template::from_contour(&Contour::from_points(vec![Point::new(5, 5)]), 0, 30).unwrap();
    assert_eq!(dot.norm(), 0.0);
    assert!(CorrelationMatcher::new()
        .find_template(&library, &dot)
        .is_none());
}
