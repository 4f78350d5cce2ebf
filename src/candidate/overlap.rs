//! Overlap resolution for detections.

use crate::search::FoundTemplate;
use crate::trace::{trace_event, trace_span};
use std::cmp::Ordering;

/// Margin added on every side of the larger rectangle before containment.
pub const INFLATE_MARGIN: i32 = 4;

/// Area ratio above which two nested detections count as duplicates.
pub const DUPLICATE_AREA_RATIO: f64 = 0.9;

fn found_cmp_desc(a: &FoundTemplate, b: &FoundTemplate) -> Ordering {
    b.sample
        .bounding_rect()
        .area()
        .cmp(&a.sample.bounding_rect().area())
        .then_with(|| a.sample.contour_index().cmp(&b.sample.contour_index()))
}

/// Removes detections nested inside, or coinciding with, a larger one.
///
/// Detections are sorted by descending bounding-rectangle area (ties by
/// source contour index). For each detection `i` not yet removed when its
/// turn comes, every later `j` whose rectangle fits inside `i`'s rectangle
/// inflated by [`INFLATE_MARGIN`] is compared by area ratio:
///
/// - above [`DUPLICATE_AREA_RATIO`] the lower-rate one of the pair goes
///   (`i` on a tie);
/// - otherwise `j` goes regardless of rate.
///
/// `i` keeps evicting nested detections after losing a duplicate contest,
/// and a `j` already removed by an earlier `i` still takes part in the
/// comparison. The survivors stay in sorted order. A zero-area `i` treats
/// every contained `j` as a duplicate.
pub fn resolve_overlaps(found: &mut Vec<FoundTemplate>) {
    let _span = trace_span!("resolve_overlaps", count = found.len()).entered();

    found.sort_by(found_cmp_desc);
    let n = found.len();
    let mut removed = vec![false; n];

    for i in 0..n {
        if removed[i] {
            continue;
        }
        let big_rect = found[i].sample.bounding_rect();
        let big_area = big_rect.area();
        let inflated = big_rect.inflate(INFLATE_MARGIN, INFLATE_MARGIN);
        for j in (i + 1)..n {
            let small_rect = found[j].sample.bounding_rect();
            if !inflated.contains(&small_rect) {
                continue;
            }
            let ratio = if big_area > 0 {
                small_rect.area() as f64 / big_area as f64
            } else {
                1.0
            };
            if ratio > DUPLICATE_AREA_RATIO {
                if found[i].rate > found[j].rate {
                    removed[j] = true;
                } else {
                    removed[i] = true;
                }
            } else {
                removed[j] = true;
            }
        }
    }

    let mut idx = 0usize;
    found.retain(|_| {
        let keep = !removed[idx];
        idx += 1;
        keep
    });

    trace_event!("resolved_detections", kept = found.len(), removed = n - found.len());
}
