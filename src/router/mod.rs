//! Connection routers
//!
//! A router recomputes a connection's interior waypoints and the reference
//! points of its dynamic anchors. Every pass follows the same three-phase
//! skeleton provided by [`Router::route`]; concrete policies supply the
//! reference-point computation and the per-segment insertion hook.

pub mod manipulator;
pub mod orthogonal;
pub mod straight;

pub use manipulator::ControlPointManipulator;
pub use orthogonal::OrthogonalRouter;
pub use straight::StraightRouter;

use crate::anchor::{Anchor, Orientation};
use crate::config::RouteConfig;
use crate::connection::{AnchorageStore, Connection};
use crate::error::RouteError;
use crate::geometry::{Geometry, Point, Vector};

/// Read-only view of the connection being routed, for policy hooks
pub struct RouteContext<'a> {
    connection: &'a Connection,
    store: &'a AnchorageStore,
    config: &'a RouteConfig,
}

impl<'a> RouteContext<'a> {
    pub fn new(
        connection: &'a Connection,
        store: &'a AnchorageStore,
        config: &'a RouteConfig,
    ) -> Self {
        Self {
            connection,
            store,
            config,
        }
    }

    pub fn connection(&self) -> &Connection {
        self.connection
    }

    pub fn store(&self) -> &AnchorageStore {
        self.store
    }

    pub fn config(&self) -> &RouteConfig {
        self.config
    }

    /// The anchorage geometry behind the anchor at `index`, re-expressed in
    /// the connection's local frame. `None` when the anchor is unconnected.
    pub fn anchorage_geometry(&self, index: usize) -> Option<Geometry> {
        let anchor = self.connection.anchor(index)?;
        let id = anchor.anchorage()?;
        self.store.geometry_in(id, self.connection.frame())
    }
}

/// How a parameter update treats the orientation hint
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrientationUpdate {
    /// Leave the stored hint untouched
    Keep,
    /// Overwrite the stored hint (possibly clearing it)
    Set(Option<Orientation>),
}

/// Result of recomputing one dynamic anchor's computation parameters
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParameterUpdate {
    /// New reference point, in the connection's local frame
    pub reference_point: Point,
    pub orientation: OrientationUpdate,
}

/// A routing policy together with the shared routing-pass skeleton.
///
/// `route` is the entry point; it must not be re-entered for the same
/// connection while a pass is in progress. The `&mut Connection` receiver
/// makes that the caller's single-writer obligation.
pub trait Router {
    /// Compute the reference point for the dynamic anchor at `index`.
    ///
    /// Must be pure with respect to the passed-in `points` snapshot: reading
    /// the live connection positions here would make the result depend on the
    /// update order of earlier anchors.
    fn anchored_reference_point(
        &self,
        ctx: &RouteContext<'_>,
        points: &[Point],
        index: usize,
    ) -> Result<Point, RouteError>;

    /// Recompute the full computation-parameter update for the dynamic anchor
    /// at `index`. The default sets only the reference point.
    fn compute_parameters(
        &self,
        ctx: &RouteContext<'_>,
        points: &[Point],
        index: usize,
    ) -> Result<ParameterUpdate, RouteError> {
        Ok(ParameterUpdate {
            reference_point: self.anchored_reference_point(ctx, points, index)?,
            orientation: OrientationUpdate::Keep,
        })
    }

    /// Per-segment insertion hook.
    ///
    /// Called for every consecutive point pair with the direction carried
    /// from the previous segment (`in_direction`, `None` on the first) and
    /// this segment's direction (`out_direction`). Returns the direction to
    /// carry forward. The default inserts nothing and passes the direction
    /// through.
    fn route_segment(
        &self,
        ctx: &RouteContext<'_>,
        points: &[Point],
        cpm: &mut ControlPointManipulator,
        in_direction: Option<Vector>,
        out_direction: Vector,
    ) -> Result<Vector, RouteError> {
        let _ = (ctx, points, cpm, in_direction);
        Ok(out_direction)
    }

    /// True iff `anchor` was inserted by a routing pass.
    ///
    /// Hosts use this to filter router-synthesized waypoints from
    /// user-authored ones, e.g. when serializing a diagram.
    fn was_inserted(&self, anchor: &Anchor) -> bool {
        anchor.was_inserted()
    }

    /// Run one full routing pass over `connection`.
    ///
    /// In strict order: remove every anchor a previous pass inserted, then
    /// recompute the dynamic anchors' reference points from an immutable
    /// snapshot of the resolved positions, then walk the segments letting the
    /// policy record insertions, and commit them in one write. Idempotent:
    /// with no model change in between, a second pass reproduces the same
    /// anchor list.
    fn route(
        &self,
        connection: &mut Connection,
        store: &AnchorageStore,
        config: &RouteConfig,
    ) -> Result<(), RouteError> {
        // Phase 1: strip volatile anchors so prior insertions never accumulate
        let kept: Vec<Anchor> = connection
            .control_anchors()
            .into_iter()
            .filter(|anchor| !self.was_inserted(anchor))
            .collect();
        connection.set_control_anchors(kept);

        // Phase 2: recompute reference points against a single snapshot taken
        // before any parameter changes
        let points = connection.points(store)?;
        let mut updates = Vec::new();
        {
            let ctx = RouteContext::new(connection, store, config);
            for index in 0..points.len() {
                if ctx.connection().anchor(index).and_then(Anchor::params).is_some() {
                    updates.push((index, self.compute_parameters(&ctx, &points, index)?));
                }
            }
        }
        apply_parameter_updates(connection, store, config, &updates)?;

        // Phase 3: walk the segments on a fresh snapshot and insert
        let points = connection.points(store)?;
        let mut cpm = ControlPointManipulator::new(connection);
        {
            let ctx = RouteContext::new(connection, store, config);
            let mut in_direction: Option<Vector> = None;
            for i in 0..points.len().saturating_sub(1) {
                let out_direction = Vector::between(points[i], points[i + 1]);
                cpm.set_routing_data(i + 1, points[i], out_direction);
                in_direction =
                    Some(self.route_segment(&ctx, &points, &mut cpm, in_direction, out_direction)?);
            }
        }
        cpm.apply_changes(connection)
    }
}

/// Install recomputed parameters, comparing old and new reference points in
/// scene space so a stale cached value does not cause drift.
fn apply_parameter_updates(
    connection: &mut Connection,
    store: &AnchorageStore,
    config: &RouteConfig,
    updates: &[(usize, ParameterUpdate)],
) -> Result<(), RouteError> {
    let conn_frame = *connection.frame();
    for &(index, update) in updates {
        let Some(anchor) = connection.anchor_mut(index) else {
            continue;
        };
        let Anchor::Dynamic { anchorage, params } = anchor else {
            continue;
        };
        let node_frame = store
            .frame(anchorage)
            .ok_or_else(|| RouteError::unknown_anchorage(anchorage.as_str()))?;
        let new_scene = conn_frame.to_scene(update.reference_point);
        let current_scene = node_frame.to_scene(params.reference_point);
        if new_scene.distance(current_scene) > config.reference_epsilon {
            // Stored in the anchorage's local frame so it follows the node
            params.reference_point = node_frame.to_local(new_scene);
        }
        if let OrientationUpdate::Set(orientation) = update.orientation {
            params.preferred_orientation = orientation;
        }
    }
    Ok(())
}
