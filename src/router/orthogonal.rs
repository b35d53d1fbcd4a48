//! Orthogonal routing policy
//!
//! Forces every segment of the routed connection to be axis-aligned by
//! inserting bend points, and picks reference points between anchorage bounds
//! so that connected endpoints attach on facing edges.

use crate::anchor::Orientation;
use crate::error::RouteError;
use crate::geometry::{Point, Rect, Side, Vector};
use crate::router::manipulator::ControlPointManipulator;
use crate::router::{OrientationUpdate, ParameterUpdate, RouteContext, Router};

/// Router that produces strictly axis-aligned connections.
#[derive(Debug, Clone, Default)]
pub struct OrthogonalRouter {
    adjust_overlaps: bool,
}

impl OrthogonalRouter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable the overlap detour for already-orthogonal segments.
    ///
    /// When a segment that is axis-aligned still runs across its anchorage
    /// outline, the router inserts a two-point perpendicular detour of
    /// `bend_offset` units around it. Disabled by default, matching the
    /// behavior this policy was derived from; see DESIGN.md.
    pub fn with_overlap_adjustment(mut self, enabled: bool) -> Self {
        self.adjust_overlaps = enabled;
        self
    }

    /// Scan from `index` in `step` direction until a point lies outside the
    /// current anchor's geometry. Falls back to the first candidate when
    /// every point is inside.
    fn reference_index(
        &self,
        ctx: &RouteContext<'_>,
        points: &[Point],
        index: usize,
        step: isize,
    ) -> Option<usize> {
        let geometry = ctx.anchorage_geometry(index);
        let count = points.len() as isize;
        let first_candidate = index as isize + step;
        if first_candidate < 0 || first_candidate >= count {
            return None;
        }
        let mut j = first_candidate;
        while j >= 0 && j < count {
            let inside = geometry
                .as_ref()
                .map(|g| g.contains(points[j as usize]))
                .unwrap_or(false);
            if !inside {
                return Some(j as usize);
            }
            j += step;
        }
        Some(first_candidate as usize)
    }

    /// Alignment-based reference point between two anchorage bounding rects
    fn aligned_reference(&self, current: Rect, reference: Rect) -> Point {
        if let Some((lo, hi)) = current.x_overlap(&reference) {
            // Vertically stacked: attach at the overlap midpoint on the
            // reference rect's edge facing the current one
            let x = (lo + hi) / 2.0;
            let y = if reference.center().y > current.center().y {
                reference.y
            } else {
                reference.bottom()
            };
            Point::new(x, y)
        } else if let Some((lo, hi)) = current.y_overlap(&reference) {
            let y = (lo + hi) / 2.0;
            let x = if reference.center().x > current.center().x {
                reference.x
            } else {
                reference.right()
            };
            Point::new(x, y)
        } else {
            // Diagonal placement: nearest point on the reference outline to
            // the current center
            reference.nearest_outline_point(current.center())
        }
    }

    /// Insert bends so a diagonal segment becomes axis-aligned
    fn route_non_orthogonal_segment(
        &self,
        ctx: &RouteContext<'_>,
        points: &[Point],
        cpm: &mut ControlPointManipulator,
        in_direction: Option<Vector>,
        out_direction: Vector,
    ) -> Result<Vector, RouteError> {
        let d = out_direction;
        let config = ctx.config();
        let connection = ctx.connection();
        let last = points.len() - 1;
        let start_index = cpm.cursor_index() - 1;
        let end_index = cpm.cursor_index();
        let touches_start = start_index == 0 && connection.is_start_connected();
        let touches_end = end_index == last && connection.is_end_connected();

        if touches_start && touches_end && points.len() == 2 {
            // Single-segment connection attached at both ends: split the
            // direction in half so the bend is symmetric
            let vertical_first = self
                .entry_side(ctx, 0, points[0])
                .map(|side| side.is_vertical_entry())
                .unwrap_or(d.dy.abs() >= d.dx.abs());
            if vertical_first {
                cpm.add_routing_point(Vector::new(0.0, d.dy / 2.0));
                return Ok(cpm.add_routing_point(Vector::new(d.dx, 0.0)));
            }
            cpm.add_routing_point(Vector::new(d.dx / 2.0, 0.0));
            return Ok(cpm.add_routing_point(Vector::new(0.0, d.dy)));
        }

        if touches_start {
            // Leave the anchorage the way its side faces: top/bottom sides
            // force a vertical first leg
            let vertical_first = self
                .entry_side(ctx, 0, points[start_index])
                .map(|side| side.is_vertical_entry())
                .unwrap_or(d.dy.abs() >= d.dx.abs());
            return Ok(if vertical_first {
                cpm.add_routing_point(Vector::new(0.0, d.dy))
            } else {
                cpm.add_routing_point(Vector::new(d.dx, 0.0))
            });
        }

        if touches_end {
            // Approach the anchorage the way its side faces: a vertical-entry
            // side means the final leg is vertical, so bend horizontally first
            let vertical_entry = self
                .entry_side(ctx, last, points[end_index])
                .map(|side| side.is_vertical_entry())
                .unwrap_or(d.dy.abs() >= d.dx.abs());
            return Ok(if vertical_entry {
                cpm.add_routing_point(Vector::new(d.dx, 0.0))
            } else {
                cpm.add_routing_point(Vector::new(0.0, d.dy))
            });
        }

        // Interior segment: prolong the previous direction where the signs
        // agree, otherwise turn; with no history, move horizontally first
        let horizontal_first = match in_direction {
            None => true,
            Some(prev) => {
                if prev.is_horizontal(config.axis_tolerance) {
                    prev.dx * d.dx >= 0.0
                } else if prev.is_vertical(config.axis_tolerance) {
                    !(prev.dy * d.dy >= 0.0)
                } else {
                    true
                }
            }
        };
        Ok(if horizontal_first {
            cpm.add_routing_point(Vector::new(d.dx, 0.0))
        } else {
            cpm.add_routing_point(Vector::new(0.0, d.dy))
        })
    }

    /// Detour an already-orthogonal segment that overlaps its anchorage
    /// outline: two inserted points offset perpendicular to the segment.
    fn route_orthogonal_segment(
        &self,
        ctx: &RouteContext<'_>,
        points: &[Point],
        cpm: &mut ControlPointManipulator,
        out_direction: Vector,
    ) -> Result<Vector, RouteError> {
        let config = ctx.config();
        let connection = ctx.connection();
        let last = points.len() - 1;
        let start_index = cpm.cursor_index() - 1;
        let end_index = cpm.cursor_index();
        let p = points[start_index];
        let q = points[end_index];

        // Find the connected endpoint whose anchorage the segment overlaps
        let overlap = if start_index == 0 && connection.is_start_connected() {
            ctx.anchorage_geometry(0)
                .filter(|g| g.contains(q))
                .map(|g| (g, p))
        } else if end_index == last && connection.is_end_connected() {
            ctx.anchorage_geometry(last)
                .filter(|g| g.contains(p))
                .map(|g| (g, q))
        } else {
            None
        };
        let Some((geometry, attach)) = overlap else {
            return Ok(out_direction);
        };

        let bounds = geometry.bounds();
        let side = bounds.side_of(attach);
        let offset = config.bend_offset;
        let index = cpm.cursor_index();
        if out_direction.is_horizontal(config.axis_tolerance) {
            // Detour above or below, away from the anchorage
            let dy = match side {
                Side::Top => -offset,
                Side::Bottom => offset,
                _ => {
                    if attach.y <= bounds.center().y {
                        -offset
                    } else {
                        offset
                    }
                }
            };
            cpm.add_routing_point_at(index, p, 0.0, dy);
            cpm.add_routing_point_at(index, q, 0.0, dy);
            Ok(Vector::new(0.0, -dy))
        } else {
            let dx = match side {
                Side::Left => -offset,
                Side::Right => offset,
                _ => {
                    if attach.x <= bounds.center().x {
                        -offset
                    } else {
                        offset
                    }
                }
            };
            cpm.add_routing_point_at(index, p, dx, 0.0);
            cpm.add_routing_point_at(index, q, dx, 0.0);
            Ok(Vector::new(-dx, 0.0))
        }
    }

    /// Side of the anchorage bounds the anchor point at `index` sits toward
    fn entry_side(&self, ctx: &RouteContext<'_>, index: usize, point: Point) -> Option<Side> {
        ctx.anchorage_geometry(index)
            .map(|g| g.bounds().side_of(point))
    }
}

impl Router for OrthogonalRouter {
    fn anchored_reference_point(
        &self,
        ctx: &RouteContext<'_>,
        points: &[Point],
        index: usize,
    ) -> Result<Point, RouteError> {
        let count = points.len();
        if index >= count {
            return Err(RouteError::index_out_of_range(index, count));
        }
        // Scan toward the far end of the connection
        let step: isize = if index == count - 1 { -1 } else { 1 };
        let Some(reference_index) = self.reference_index(ctx, points, index, step) else {
            return Ok(points[index]);
        };

        let current_geometry = ctx.anchorage_geometry(index);
        let reference_geometry = ctx.anchorage_geometry(reference_index);
        match (current_geometry, reference_geometry) {
            (Some(current), Some(reference)) => {
                // A bare point in the opposite direction wins over any
                // computed projection
                if let Some(opposite) = self.reference_index(ctx, points, index, -step) {
                    let unconnected = ctx
                        .connection()
                        .anchor(opposite)
                        .map(|a| a.anchorage().is_none())
                        .unwrap_or(false);
                    if unconnected {
                        return Ok(points[opposite]);
                    }
                }
                // Next preference: an explicit endpoint hint
                if index == 0 {
                    if let Some(hint) = ctx.connection().start_point_hint() {
                        return Ok(hint);
                    }
                } else if index == count - 1 {
                    if let Some(hint) = ctx.connection().end_point_hint() {
                        return Ok(hint);
                    }
                }

                let current_bounds = current.bounds();
                let reference_bounds = reference.bounds();
                if !current_bounds.center().is_finite() || !reference_bounds.center().is_finite() {
                    let id = ctx
                        .connection()
                        .anchor(index)
                        .and_then(|a| a.anchorage())
                        .map(|n| n.as_str().to_owned())
                        .unwrap_or_default();
                    return Err(RouteError::degenerate_geometry(id));
                }
                Ok(self.aligned_reference(current_bounds, reference_bounds))
            }
            _ => Ok(points[reference_index]),
        }
    }

    fn compute_parameters(
        &self,
        ctx: &RouteContext<'_>,
        points: &[Point],
        index: usize,
    ) -> Result<ParameterUpdate, RouteError> {
        let reference_point = self.anchored_reference_point(ctx, points, index)?;
        let count = points.len();
        let orientation = if count >= 2 && (index == 0 || index == count - 1) {
            let neighbor = if index == 0 {
                points[1]
            } else {
                points[count - 2]
            };
            let entry = Vector::between(neighbor, reference_point);
            let threshold = ctx.config().orientation_threshold;
            if entry.dx.abs() < threshold && entry.dx.abs() < entry.dy.abs() {
                OrientationUpdate::Set(Some(Orientation::Vertical))
            } else if entry.dy.abs() < threshold && entry.dy.abs() < entry.dx.abs() {
                OrientationUpdate::Set(Some(Orientation::Horizontal))
            } else {
                OrientationUpdate::Set(None)
            }
        } else {
            OrientationUpdate::Keep
        };
        Ok(ParameterUpdate {
            reference_point,
            orientation,
        })
    }

    fn route_segment(
        &self,
        ctx: &RouteContext<'_>,
        points: &[Point],
        cpm: &mut ControlPointManipulator,
        in_direction: Option<Vector>,
        out_direction: Vector,
    ) -> Result<Vector, RouteError> {
        let config = ctx.config();
        if out_direction.is_null(config.null_tolerance) {
            // Coincident consecutive points: no degenerate insertions, the
            // incoming direction carries through
            return Ok(in_direction.unwrap_or(out_direction));
        }
        if out_direction.is_horizontal(config.axis_tolerance)
            || out_direction.is_vertical(config.axis_tolerance)
        {
            if self.adjust_overlaps {
                return self.route_orthogonal_segment(ctx, points, cpm, out_direction);
            }
            return Ok(out_direction);
        }
        self.route_non_orthogonal_segment(ctx, points, cpm, in_direction, out_direction)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::anchor::{Anchor, NodeId};
    use crate::config::RouteConfig;
    use crate::connection::{AnchorageStore, Connection};
    use crate::geometry::Geometry;

    fn ctx_fixture() -> (Connection, AnchorageStore, RouteConfig) {
        let mut store = AnchorageStore::new();
        store.insert(NodeId::new("a"), Geometry::Rect(Rect::new(0.0, 0.0, 20.0, 20.0)));
        store.insert(NodeId::new("b"), Geometry::Rect(Rect::new(10.0, 100.0, 30.0, 20.0)));
        let conn = Connection::new(Anchor::dynamic(NodeId::new("a")), Anchor::dynamic(NodeId::new("b")));
        (conn, store, RouteConfig::default())
    }

    #[test]
    fn test_reference_point_horizontal_overlap() {
        let (conn, store, config) = ctx_fixture();
        let ctx = RouteContext::new(&conn, &store, &config);
        let router = OrthogonalRouter::new();
        // Snapshot positions: anywhere outside the respective geometries
        let points = [Point::new(10.0, 20.0), Point::new(25.0, 100.0)];

        // x-ranges [0,20] and [10,40] overlap in [10,20]; reference points sit
        // at the overlap midpoint on the facing edges
        let start_ref = router.anchored_reference_point(&ctx, &points, 0).unwrap();
        assert_eq!(start_ref, Point::new(15.0, 100.0));
        let end_ref = router.anchored_reference_point(&ctx, &points, 1).unwrap();
        assert_eq!(end_ref, Point::new(15.0, 20.0));
    }

    #[test]
    fn test_reference_point_diagonal_fallback() {
        let mut store = AnchorageStore::new();
        store.insert(NodeId::new("a"), Geometry::Rect(Rect::new(0.0, 0.0, 20.0, 20.0)));
        store.insert(NodeId::new("b"), Geometry::Rect(Rect::new(100.0, 100.0, 20.0, 20.0)));
        let conn =
            Connection::new(Anchor::dynamic(NodeId::new("a")), Anchor::dynamic(NodeId::new("b")));
        let config = RouteConfig::default();
        let ctx = RouteContext::new(&conn, &store, &config);
        let points = [Point::new(20.0, 20.0), Point::new(100.0, 100.0)];

        // No axis overlap: nearest point on b's outline to a's center (10,10)
        // is b's top-left corner
        let start_ref = OrthogonalRouter::new()
            .anchored_reference_point(&ctx, &points, 0)
            .unwrap();
        assert_eq!(start_ref, Point::new(100.0, 100.0));
    }

    #[test]
    fn test_reference_point_prefers_bare_opposite_point() {
        let mut store = AnchorageStore::new();
        store.insert(NodeId::new("a"), Geometry::Rect(Rect::new(0.0, 0.0, 20.0, 20.0)));
        store.insert(NodeId::new("b"), Geometry::Rect(Rect::new(0.0, 100.0, 20.0, 20.0)));
        let mut conn =
            Connection::new(Anchor::dynamic(NodeId::new("b")), Anchor::dynamic(NodeId::new("a")));
        // A user-authored bend before the end anchor
        conn.set_control_anchors(vec![Anchor::fixed(60.0, 10.0)]);
        let config = RouteConfig::default();
        let ctx = RouteContext::new(&conn, &store, &config);
        let points = [
            Point::new(10.0, 100.0),
            Point::new(60.0, 10.0),
            Point::new(20.0, 10.0),
        ];

        // For the end anchor (index 2) the opposite-direction scan runs off
        // the far end, so this connection keeps the alignment path; for the
        // bend-adjacent endpoint the bare control point wins
        let end_ref = OrthogonalRouter::new()
            .anchored_reference_point(&ctx, &points, 2)
            .unwrap();
        assert_eq!(end_ref, Point::new(60.0, 10.0));
    }

    #[test]
    fn test_interior_dynamic_anchor_prefers_bare_opposite_point() {
        let mut store = AnchorageStore::new();
        store.insert(NodeId::new("m"), Geometry::Rect(Rect::new(40.0, 40.0, 20.0, 20.0)));
        store.insert(NodeId::new("b"), Geometry::Rect(Rect::new(100.0, 40.0, 20.0, 20.0)));
        let mut conn = Connection::new(Anchor::fixed(0.0, 50.0), Anchor::dynamic(NodeId::new("b")));
        conn.set_control_anchors(vec![Anchor::dynamic(NodeId::new("m"))]);
        let config = RouteConfig::default();
        let ctx = RouteContext::new(&conn, &store, &config);
        let points = [
            Point::new(0.0, 50.0),
            Point::new(50.0, 50.0),
            Point::new(100.0, 50.0),
        ];

        // The forward scan lands on the connected anchor at index 2, but the
        // bare point behind the middle anchor takes precedence
        let mid_ref = OrthogonalRouter::new()
            .anchored_reference_point(&ctx, &points, 1)
            .unwrap();
        assert_eq!(mid_ref, Point::new(0.0, 50.0));
    }

    #[test]
    fn test_reference_point_prefers_endpoint_hint() {
        let (conn, store, config) = ctx_fixture();
        let conn = conn.with_start_hint(Point::new(17.0, 20.0));
        let ctx = RouteContext::new(&conn, &store, &config);
        let points = [Point::new(10.0, 20.0), Point::new(25.0, 100.0)];

        let start_ref = OrthogonalRouter::new()
            .anchored_reference_point(&ctx, &points, 0)
            .unwrap();
        assert_eq!(start_ref, Point::new(17.0, 20.0));
    }

    #[test]
    fn test_reference_point_unconnected_neighbor_is_raw() {
        let mut store = AnchorageStore::new();
        store.insert(NodeId::new("a"), Geometry::Rect(Rect::new(0.0, 0.0, 20.0, 20.0)));
        let conn = Connection::new(Anchor::dynamic(NodeId::new("a")), Anchor::fixed(100.0, 80.0));
        let config = RouteConfig::default();
        let ctx = RouteContext::new(&conn, &store, &config);
        let points = [Point::new(20.0, 10.0), Point::new(100.0, 80.0)];

        let start_ref = OrthogonalRouter::new()
            .anchored_reference_point(&ctx, &points, 0)
            .unwrap();
        assert_eq!(start_ref, Point::new(100.0, 80.0));
    }

    #[test]
    fn test_reference_point_index_out_of_range() {
        let (conn, store, config) = ctx_fixture();
        let ctx = RouteContext::new(&conn, &store, &config);
        let points = [Point::new(0.0, 0.0), Point::new(1.0, 1.0)];
        let err = OrthogonalRouter::new()
            .anchored_reference_point(&ctx, &points, 5)
            .unwrap_err();
        assert!(matches!(err, RouteError::IndexOutOfRange { index: 5, count: 2 }));
    }

    #[test]
    fn test_route_inserts_bend_for_diagonal() {
        let mut conn = Connection::new(Anchor::fixed(0.0, 0.0), Anchor::fixed(100.0, 50.0));
        let store = AnchorageStore::new();
        let config = RouteConfig::default();
        OrthogonalRouter::new().route(&mut conn, &store, &config).unwrap();

        let points = conn.points(&store).unwrap();
        assert_eq!(
            points,
            vec![
                Point::new(0.0, 0.0),
                Point::new(100.0, 0.0),
                Point::new(100.0, 50.0)
            ]
        );
        assert!(conn.anchor(1).unwrap().was_inserted());
    }

    #[test]
    fn test_route_prolongs_previous_direction() {
        let mut conn = Connection::new(Anchor::fixed(0.0, 0.0), Anchor::fixed(120.0, 80.0));
        conn.add_control_point(Point::new(50.0, 50.0));
        let store = AnchorageStore::new();
        let config = RouteConfig::default();
        OrthogonalRouter::new().route(&mut conn, &store, &config).unwrap();

        let points = conn.points(&store).unwrap();
        // First segment bends horizontally first; the second leaves the bend
        // vertically, prolonging the incoming vertical leg
        assert_eq!(
            points,
            vec![
                Point::new(0.0, 0.0),
                Point::new(50.0, 0.0),
                Point::new(50.0, 50.0),
                Point::new(50.0, 80.0),
                Point::new(120.0, 80.0)
            ]
        );
    }

    #[test]
    fn test_coincident_points_insert_nothing() {
        let mut conn = Connection::new(Anchor::fixed(10.0, 10.0), Anchor::fixed(10.0, 10.0));
        let store = AnchorageStore::new();
        let config = RouteConfig::default();
        OrthogonalRouter::new().route(&mut conn, &store, &config).unwrap();
        assert_eq!(conn.anchor_count(), 2);
    }

    /// Start anchor resolves to the anchorage center, end point sits inside
    /// the same anchorage: the single segment is horizontal and runs across
    /// the outline.
    fn overlapping_fixture() -> (Connection, AnchorageStore) {
        let mut store = AnchorageStore::new();
        store.insert(NodeId::new("a"), Geometry::Rect(Rect::new(0.0, 0.0, 40.0, 20.0)));
        let conn = Connection::new(
            Anchor::dynamic(NodeId::new("a")),
            Anchor::fixed(10.0, 10.0),
        );
        (conn, store)
    }

    #[test]
    fn test_overlap_detour_disabled_by_default() {
        let (mut conn, store) = overlapping_fixture();
        let config = RouteConfig::default();
        OrthogonalRouter::new().route(&mut conn, &store, &config).unwrap();
        // The default policy leaves the already-orthogonal segment untouched
        assert_eq!(conn.anchor_count(), 2);
    }

    #[test]
    fn test_overlap_detour_enabled_inserts_two_points() {
        let (mut conn, store) = overlapping_fixture();
        let config = RouteConfig::default();
        OrthogonalRouter::new()
            .with_overlap_adjustment(true)
            .route(&mut conn, &store, &config)
            .unwrap();

        assert_eq!(conn.anchor_count(), 4);
        assert!(conn.anchor(1).unwrap().was_inserted());
        assert!(conn.anchor(2).unwrap().was_inserted());
        let points = conn.points(&store).unwrap();
        // Detour legs are perpendicular to the segment and bend_offset out
        assert_eq!(points[1].y, points[2].y);
        assert_eq!((points[1].y - points[0].y).abs(), config.bend_offset);
    }
}
