//! Straight-line routing policy
//!
//! Never inserts waypoints. Its only job is the reference-point computation
//! for dynamic anchors: each one aims at a blend of its nearest usable
//! neighbors on either side.

use crate::error::RouteError;
use crate::geometry::Point;
use crate::router::{RouteContext, Router};

/// Router that connects the anchor sequence with straight segments.
#[derive(Debug, Clone, Copy, Default)]
pub struct StraightRouter;

impl StraightRouter {
    pub fn new() -> Self {
        Self
    }

    /// Walk from `index` in `step` direction for a usable neighbor position.
    ///
    /// A neighbor whose resolved point sits inside its own anchorage is not
    /// usable directly; its anchorage center is remembered as a fallback and
    /// the walk continues.
    fn neighbor_reference(
        &self,
        ctx: &RouteContext<'_>,
        points: &[Point],
        index: usize,
        step: isize,
    ) -> Option<Point> {
        let count = points.len() as isize;
        let mut substitute = None;
        let mut j = index as isize + step;
        while j >= 0 && j < count {
            let ju = j as usize;
            let point = points[ju];
            let anchor = ctx.connection().anchor(ju)?;
            if anchor.anchorage().is_none() {
                return Some(point);
            }
            match ctx.anchorage_geometry(ju) {
                Some(geometry) if geometry.contains(point) => {
                    if substitute.is_none() {
                        substitute = Some(geometry.bounds().center());
                    }
                    j += step;
                }
                _ => return Some(point),
            }
        }
        substitute
    }
}

impl Router for StraightRouter {
    fn anchored_reference_point(
        &self,
        ctx: &RouteContext<'_>,
        points: &[Point],
        index: usize,
    ) -> Result<Point, RouteError> {
        if index >= points.len() {
            return Err(RouteError::index_out_of_range(index, points.len()));
        }
        let before = self.neighbor_reference(ctx, points, index, -1);
        let after = self.neighbor_reference(ctx, points, index, 1);
        Ok(match (before, after) {
            (Some(a), Some(b)) => a.lerp(b, 0.5),
            (Some(p), None) | (None, Some(p)) => p,
            (None, None) => Point::ZERO,
        })
    }
}
