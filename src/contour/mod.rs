//! Contour geometry and the sibling-linked contour set.
//!
//! A `ContourSet` owns every border traced from one binarized frame. Contours
//! at the same hierarchy level form a singly-linked sibling list through their
//! `next` index; the filter consumes that list through [`ContourSet::siblings`].

pub mod filter;

pub use filter::{filter_contours, max_contour_area, ContourFilterParams};

/// Integer 2D point in pixel coordinates.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Point {
    /// Column.
    pub x: i32,
    /// Row.
    pub y: i32,
}

impl Point {
    /// Creates a point.
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// Axis-aligned integer rectangle.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Rect {
    /// Creates a rectangle from its top-left corner and size.
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Bounding rectangle of a point set; `width = max_x - min_x + 1`.
    ///
    /// Returns an empty rectangle at the origin for an empty slice.
    pub fn bounding(points: &[Point]) -> Self {
        let Some(first) = points.first() else {
            return Self::default();
        };
        let (mut min_x, mut min_y, mut max_x, mut max_y) = (first.x, first.y, first.x, first.y);
        for p in &points[1..] {
            min_x = min_x.min(p.x);
            min_y = min_y.min(p.y);
            max_x = max_x.max(p.x);
            max_y = max_y.max(p.y);
        }
        Self::new(min_x, min_y, max_x - min_x + 1, max_y - min_y + 1)
    }

    /// Area in square pixels.
    pub fn area(&self) -> i64 {
        i64::from(self.width) * i64::from(self.height)
    }

    /// Returns a copy grown by `dx` on the left and right and `dy` on the
    /// top and bottom.
    pub fn inflate(&self, dx: i32, dy: i32) -> Self {
        Self::new(
            self.x - dx,
            self.y - dy,
            self.width + 2 * dx,
            self.height + 2 * dy,
        )
    }

    /// True when `other` lies entirely within `self`; shared edges count.
    pub fn contains(&self, other: &Rect) -> bool {
        self.x <= other.x
            && other.x + other.width <= self.x + self.width
            && self.y <= other.y
            && other.y + other.height <= self.y + self.height
    }
}

/// Closed boundary of a connected region.
#[derive(Clone, Debug, PartialEq)]
pub struct Contour {
    points: Vec<Point>,
    area: f64,
    bounding_rect: Rect,
    next: Option<usize>,
}

impl Contour {
    /// Builds a contour and derives its polygon area and bounding rectangle.
    pub fn from_points(points: Vec<Point>) -> Self {
        let area = polygon_area(&points);
        let bounding_rect = Rect::bounding(&points);
        Self {
            points,
            area,
            bounding_rect,
            next: None,
        }
    }

    /// Boundary points in tracing order.
    pub fn points(&self) -> &[Point] {
        &self.points
    }

    /// Number of boundary points.
    pub fn point_count(&self) -> usize {
        self.points.len()
    }

    /// Enclosed area of the closed polygon.
    pub fn area(&self) -> f64 {
        self.area
    }

    /// Axis-aligned bounding rectangle.
    pub fn bounding_rect(&self) -> Rect {
        self.bounding_rect
    }

    /// Index of the next sibling within the owning set.
    pub fn next_sibling(&self) -> Option<usize> {
        self.next
    }
}

/// Absolute shoelace area of a closed polygon.
fn polygon_area(points: &[Point]) -> f64 {
    if points.len() < 3 {
        return 0.0;
    }
    let mut twice = 0i64;
    let n = points.len();
    for i in 0..n {
        let a = points[i];
        let b = points[(i + 1) % n];
        twice += i64::from(a.x) * i64::from(b.y) - i64::from(b.x) * i64::from(a.y);
    }
    twice.unsigned_abs() as f64 / 2.0
}

/// Contours traced from one frame, linked as a sibling list.
#[derive(Clone, Debug, Default)]
pub struct ContourSet {
    contours: Vec<Contour>,
    head: Option<usize>,
}

impl ContourSet {
    /// Links `contours` into a single sibling list in the given order.
    pub fn from_contours(mut contours: Vec<Contour>) -> Self {
        let len = contours.len();
        for (idx, contour) in contours.iter_mut().enumerate() {
            contour.next = (idx + 1 < len).then_some(idx + 1);
        }
        let head = (len > 0).then_some(0);
        Self { contours, head }
    }

    /// Converts traced borders into a flat sibling list.
    ///
    /// All borders, outer and hole alike, become siblings at one level.
    pub fn from_traced(traced: Vec<imageproc::contours::Contour<i32>>) -> Self {
        let contours = traced
            .into_iter()
            .map(|c| {
                let points = c.points.into_iter().map(|p| Point::new(p.x, p.y)).collect();
                Contour::from_points(points)
            })
            .collect();
        Self::from_contours(contours)
    }

    /// Total number of contours owned by the set.
    pub fn len(&self) -> usize {
        self.contours.len()
    }

    /// True when the set holds no contours.
    pub fn is_empty(&self) -> bool {
        self.contours.is_empty()
    }

    /// Returns the contour at `index`.
    pub fn get(&self, index: usize) -> Option<&Contour> {
        self.contours.get(index)
    }

    /// Lazily walks the sibling list starting at the head.
    pub fn siblings(&self) -> Siblings<'_> {
        Siblings {
            set: self,
            cursor: self.head,
        }
    }
}

/// Forward-only iterator over a sibling list.
pub struct Siblings<'a> {
    set: &'a ContourSet,
    cursor: Option<usize>,
}

impl<'a> Iterator for Siblings<'a> {
    type Item = &'a Contour;

    fn next(&mut self) -> Option<Self::Item> {
        let contour = self.set.contours.get(self.cursor?)?;
        self.cursor = contour.next;
        Some(contour)
    }
}
