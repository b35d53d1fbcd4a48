//! Explicit coordinate frames
//!
//! The routers never consult an ambient scene graph. Every anchorage node and
//! every connection carries a `CoordinateFrame` describing how its local
//! coordinates map into the shared scene space, and all cross-frame
//! comparisons go through explicit conversions.

use crate::geometry::{Point, Rect, Vector};

/// A translate-and-scale mapping from a local coordinate space into scene
/// space.
///
/// Rotation is deliberately unsupported: the routers' side classification and
/// overlap tests assume axis-aligned bounds, and a translate/scale frame keeps
/// that true by construction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CoordinateFrame {
    pub translation: Vector,
    pub scale: f64,
}

impl CoordinateFrame {
    /// The identity frame: local space equals scene space
    pub fn identity() -> Self {
        Self {
            translation: Vector::ZERO,
            scale: 1.0,
        }
    }

    /// Frame translated by `(dx, dy)` with unit scale
    pub fn translated(dx: f64, dy: f64) -> Self {
        Self {
            translation: Vector::new(dx, dy),
            scale: 1.0,
        }
    }

    /// Set the scale factor, keeping the translation
    pub fn with_scale(mut self, scale: f64) -> Self {
        self.scale = scale;
        self
    }

    /// Map a local point into scene space
    pub fn to_scene(&self, p: Point) -> Point {
        Point::new(
            p.x * self.scale + self.translation.dx,
            p.y * self.scale + self.translation.dy,
        )
    }

    /// Map a scene point into this frame's local space
    pub fn to_local(&self, p: Point) -> Point {
        Point::new(
            (p.x - self.translation.dx) / self.scale,
            (p.y - self.translation.dy) / self.scale,
        )
    }

    /// Map a local rectangle into scene space.
    ///
    /// Stays a rectangle because the frame has no rotation component.
    pub fn rect_to_scene(&self, r: Rect) -> Rect {
        let origin = self.to_scene(Point::new(r.x, r.y));
        Rect::new(origin.x, origin.y, r.width * self.scale, r.height * self.scale)
    }
}

impl Default for CoordinateFrame {
    fn default() -> Self {
        Self::identity()
    }
}

/// Re-express a point given in `from` local coordinates in `to` local
/// coordinates, via scene space.
pub fn convert(from: &CoordinateFrame, to: &CoordinateFrame, p: Point) -> Point {
    to.to_local(from.to_scene(p))
}
