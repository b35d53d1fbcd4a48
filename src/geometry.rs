//! 2D geometry primitives used by the routers

use std::ops::{Add, Sub};

/// A 2D point in some coordinate frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const ZERO: Point = Point { x: 0.0, y: 0.0 };

    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Translate this point by an explicit offset
    pub fn translated(&self, dx: f64, dy: f64) -> Point {
        Point::new(self.x + dx, self.y + dy)
    }

    /// Euclidean distance to another point
    pub fn distance(&self, other: Point) -> f64 {
        let dx = other.x - self.x;
        let dy = other.y - self.y;
        (dx * dx + dy * dy).sqrt()
    }

    /// Point at parameter `t` on the segment from `self` to `other`
    pub fn lerp(&self, other: Point, t: f64) -> Point {
        Point::new(self.x + (other.x - self.x) * t, self.y + (other.y - self.y) * t)
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl Add<Vector> for Point {
    type Output = Point;

    fn add(self, v: Vector) -> Point {
        Point::new(self.x + v.dx, self.y + v.dy)
    }
}

impl Sub<Point> for Point {
    type Output = Vector;

    fn sub(self, other: Point) -> Vector {
        Vector::new(self.x - other.x, self.y - other.y)
    }
}

/// A 2D direction or displacement
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vector {
    pub dx: f64,
    pub dy: f64,
}

impl Vector {
    pub const ZERO: Vector = Vector { dx: 0.0, dy: 0.0 };

    pub fn new(dx: f64, dy: f64) -> Self {
        Self { dx, dy }
    }

    /// Vector pointing from `a` to `b`
    pub fn between(a: Point, b: Point) -> Self {
        b - a
    }

    /// True when both components are within `tolerance` of zero
    pub fn is_null(&self, tolerance: f64) -> bool {
        self.dx.abs() <= tolerance && self.dy.abs() <= tolerance
    }

    /// True when the vertical component is negligible relative to the
    /// horizontal one
    pub fn is_horizontal(&self, tolerance: f64) -> bool {
        self.dy.abs() < tolerance && self.dx.abs() > self.dy.abs()
    }

    /// True when the horizontal component is negligible relative to the
    /// vertical one
    pub fn is_vertical(&self, tolerance: f64) -> bool {
        self.dx.abs() < tolerance && self.dy.abs() > self.dx.abs()
    }
}

impl Add for Vector {
    type Output = Vector;

    fn add(self, other: Vector) -> Vector {
        Vector::new(self.dx + other.dx, self.dy + other.dy)
    }
}

impl Sub for Vector {
    type Output = Vector;

    fn sub(self, other: Vector) -> Vector {
        Vector::new(self.dx - other.dx, self.dy - other.dy)
    }
}

/// An axis-aligned rectangle
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Right edge x-coordinate
    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    /// Bottom edge y-coordinate
    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    /// Center point of the rectangle
    pub fn center(&self) -> Point {
        Point::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// Check if this rectangle contains a point (edges inclusive)
    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.x
            && point.x <= self.right()
            && point.y >= self.y
            && point.y <= self.bottom()
    }

    /// Intersection of the x-ranges of two rectangles, if non-empty
    pub fn x_overlap(&self, other: &Rect) -> Option<(f64, f64)> {
        let lo = self.x.max(other.x);
        let hi = self.right().min(other.right());
        (lo <= hi).then_some((lo, hi))
    }

    /// Intersection of the y-ranges of two rectangles, if non-empty
    pub fn y_overlap(&self, other: &Rect) -> Option<(f64, f64)> {
        let lo = self.y.max(other.y);
        let hi = self.bottom().min(other.bottom());
        (lo <= hi).then_some((lo, hi))
    }

    /// The four outline segments: top, right, bottom, left
    pub fn outline_segments(&self) -> [(Point, Point); 4] {
        let tl = Point::new(self.x, self.y);
        let tr = Point::new(self.right(), self.y);
        let br = Point::new(self.right(), self.bottom());
        let bl = Point::new(self.x, self.bottom());
        [(tl, tr), (tr, br), (br, bl), (bl, tl)]
    }

    /// Nearest point on the rectangle outline to `target`, minimizing over the
    /// four edge segments
    pub fn nearest_outline_point(&self, target: Point) -> Point {
        let mut best = Point::new(self.x, self.y);
        let mut best_dist = f64::INFINITY;
        for (a, b) in self.outline_segments() {
            let candidate = nearest_point_on_segment(a, b, target);
            let dist = candidate.distance(target);
            if dist < best_dist {
                best_dist = dist;
                best = candidate;
            }
        }
        best
    }

    /// Classify which side of this rectangle a point falls toward, splitting
    /// the rectangle into four triangles along its diagonals.
    ///
    /// Only defined for axis-aligned rectangles; callers with polygonal or
    /// transformed geometry classify against the bounding rectangle.
    pub fn side_of(&self, point: Point) -> Side {
        let center = self.center();
        // Normalize by the half-extents so the diagonals become u = ±v
        let u = if self.width > 0.0 {
            (point.x - center.x) / (self.width / 2.0)
        } else {
            point.x - center.x
        };
        let v = if self.height > 0.0 {
            (point.y - center.y) / (self.height / 2.0)
        } else {
            point.y - center.y
        };
        if v.abs() > u.abs() {
            if v < 0.0 {
                Side::Top
            } else {
                Side::Bottom
            }
        } else if u < 0.0 {
            Side::Left
        } else {
            Side::Right
        }
    }
}

/// Side of a rectangle, as selected by its diagonal decomposition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Top,
    Right,
    Bottom,
    Left,
}

impl Side {
    /// Whether attachment on this side implies a vertical entry segment
    pub fn is_vertical_entry(&self) -> bool {
        matches!(self, Side::Top | Side::Bottom)
    }
}

/// Nearest point to `target` on the segment from `a` to `b`
pub fn nearest_point_on_segment(a: Point, b: Point, target: Point) -> Point {
    let ab = b - a;
    let len_sq = ab.dx * ab.dx + ab.dy * ab.dy;
    if len_sq == 0.0 {
        return a;
    }
    let at = target - a;
    let t = ((at.dx * ab.dx + at.dy * ab.dy) / len_sq).clamp(0.0, 1.0);
    a.lerp(b, t)
}

/// An anchorage outline the routers can query for bounds and containment
#[derive(Debug, Clone, PartialEq)]
pub enum Geometry {
    Rect(Rect),
    Polygon(Vec<Point>),
}

impl Geometry {
    /// Axis-aligned bounding rectangle
    pub fn bounds(&self) -> Rect {
        match self {
            Geometry::Rect(r) => *r,
            Geometry::Polygon(points) => {
                let mut min_x = f64::INFINITY;
                let mut min_y = f64::INFINITY;
                let mut max_x = f64::NEG_INFINITY;
                let mut max_y = f64::NEG_INFINITY;
                for p in points {
                    min_x = min_x.min(p.x);
                    min_y = min_y.min(p.y);
                    max_x = max_x.max(p.x);
                    max_y = max_y.max(p.y);
                }
                if points.is_empty() {
                    Rect::new(0.0, 0.0, 0.0, 0.0)
                } else {
                    Rect::new(min_x, min_y, max_x - min_x, max_y - min_y)
                }
            }
        }
    }

    /// Check if the outline contains a point (even-odd rule for polygons)
    pub fn contains(&self, point: Point) -> bool {
        match self {
            Geometry::Rect(r) => r.contains(point),
            Geometry::Polygon(vertices) => polygon_contains(vertices, point),
        }
    }
}

/// Even-odd ray cast along +x
fn polygon_contains(vertices: &[Point], point: Point) -> bool {
    if vertices.len() < 3 {
        return false;
    }
    let mut inside = false;
    let mut j = vertices.len() - 1;
    for i in 0..vertices.len() {
        let a = vertices[i];
        let b = vertices[j];
        if (a.y > point.y) != (b.y > point.y) {
            let x_cross = a.x + (point.y - a.y) / (b.y - a.y) * (b.x - a.x);
            if point.x < x_cross {
                inside = !inside;
            }
        }
        j = i;
    }
    inside
}
