#![cfg(feature = "rayon")]

use contourmatch::{Detections, Detector, DetectorConfig, ImageView, TemplateLibrary};
use std::sync::RwLock;

fn make_frame(width: usize, height: usize) -> Vec<u8> {
    let mut data = vec![15u8; width * height];
    let shapes = [
        (20, 20, 50, 30),
        (100, 30, 24, 24),
        (160, 20, 60, 12),
        (30, 110, 36, 70),
        (120, 120, 80, 50),
        (140, 135, 20, 20),
    ];
    for (i, &(x0, y0, w, h)) in shapes.iter().enumerate() {
        let value = if i == 5 { 15 } else { 200 + 10 * (i as u8 % 3) };
        for y in y0..y0 + h {
            for x in x0..x0 + w {
                data[y * width + x] = value;
            }
        }
    }
    data
}

fn summary(d: &Detections) -> (Vec<usize>, Vec<(usize, usize, u64)>) {
    let samples = d.samples.iter().map(|s| s.contour_index()).collect();
    let found = d
        .found
        .iter()
        .map(|f| (f.sample.contour_index(), f.template_index, f.rate.to_bits()))
        .collect();
    (samples, found)
}

#[test]
fn parallel_matches_sequential() {
    let (width, height) = (240, 200);
    let frame = make_frame(width, height);
    let view = ImageView::from_slice(&frame, width, height).unwrap();

    let bootstrap = Detector::new(DetectorConfig {
        only_find_contours: true,
        parallel: false,
        ..DetectorConfig::default()
    })
    .unwrap();
    let empty = RwLock::new(TemplateLibrary::new(30).unwrap());
    let library = bootstrap.process_frame(view, &empty).unwrap().detections.samples;
    assert!(!library.is_empty());
    let known = RwLock::new(library);

    let sequential = Detector::new(DetectorConfig {
        parallel: false,
        ..DetectorConfig::default()
    })
    .unwrap()
    .process_frame(view, &known)
    .unwrap();
    let parallel = Detector::new(DetectorConfig {
        parallel: true,
        ..DetectorConfig::default()
    })
    .unwrap()
    .process_frame(view, &known)
    .unwrap();

    assert_eq!(sequential.binarized, parallel.binarized);
    assert_eq!(
        sequential.detections.contours,
        parallel.detections.contours
    );
    assert_eq!(
        summary(&sequential.detections),
        summary(&parallel.detections)
    );
    for (a, b) in sequential
        .detections
        .samples
        .iter()
        .zip(parallel.detections.samples.iter())
    {
        assert_eq!(a.vectors(), b.vectors());
    }
    assert!(!parallel.detections.found.is_empty());
}

#[test]
fn contours_only_mode_is_order_stable() {
    let (width, height) = (240, 200);
    let frame = make_frame(width, height);
    let view = ImageView::from_slice(&frame, width, height).unwrap();
    let empty = RwLock::new(TemplateLibrary::new(24).unwrap());

    let run = |parallel: bool| {
        Detector::new(DetectorConfig {
            only_find_contours: true,
            template_size: 24,
            parallel,
            ..DetectorConfig::default()
        })
        .unwrap()
        .process_frame(view, &empty)
        .unwrap()
        .detections
    };
    let seq = run(false);
    let par = run(true);
    assert_eq!(summary(&seq), summary(&par));
    let indices: Vec<usize> = par.samples.iter().map(|s| s.contour_index()).collect();
    let expected: Vec<usize> = (0..par.contours.len()).collect();
    assert_eq!(indices, expected);
}
