//! Connections and the anchorage store they resolve against

use std::collections::HashMap;

use crate::anchor::{Anchor, DynamicParams, NodeId, Orientation};
use crate::error::RouteError;
use crate::frame::{convert, CoordinateFrame};
use crate::geometry::{Geometry, Point, Rect, Vector};

/// An anchorage node: geometry in the node's local frame, plus the frame
/// mapping it into scene space
#[derive(Debug, Clone)]
pub struct AnchorageNode {
    pub geometry: Geometry,
    pub frame: CoordinateFrame,
}

/// The host-side registry of anchorage nodes.
///
/// Owns the dynamic-anchor position solver: a reference point is projected
/// onto the anchorage's bounding outline, honoring the preferred-orientation
/// hint when one is set.
#[derive(Debug, Clone, Default)]
pub struct AnchorageStore {
    nodes: HashMap<NodeId, AnchorageNode>,
}

impl AnchorageStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a node with the identity frame
    pub fn insert(&mut self, id: NodeId, geometry: Geometry) {
        self.insert_with_frame(id, geometry, CoordinateFrame::identity());
    }

    /// Register a node with an explicit frame
    pub fn insert_with_frame(&mut self, id: NodeId, geometry: Geometry, frame: CoordinateFrame) {
        self.nodes.insert(id, AnchorageNode { geometry, frame });
    }

    /// Replace a node's frame, e.g. when the node moves
    pub fn set_frame(&mut self, id: &NodeId, frame: CoordinateFrame) -> Result<(), RouteError> {
        let node = self
            .nodes
            .get_mut(id)
            .ok_or_else(|| RouteError::unknown_anchorage(id.as_str()))?;
        node.frame = frame;
        Ok(())
    }

    pub fn node(&self, id: &NodeId) -> Option<&AnchorageNode> {
        self.nodes.get(id)
    }

    /// The node's frame, if the node is known
    pub fn frame(&self, id: &NodeId) -> Option<CoordinateFrame> {
        self.nodes.get(id).map(|n| n.frame)
    }

    /// The node's geometry re-expressed in `target` local coordinates
    pub fn geometry_in(&self, id: &NodeId, target: &CoordinateFrame) -> Option<Geometry> {
        let node = self.nodes.get(id)?;
        Some(match &node.geometry {
            Geometry::Rect(r) => {
                let scene = node.frame.rect_to_scene(*r);
                let origin = target.to_local(Point::new(scene.x, scene.y));
                Geometry::Rect(Rect::new(
                    origin.x,
                    origin.y,
                    scene.width / target.scale,
                    scene.height / target.scale,
                ))
            }
            Geometry::Polygon(points) => Geometry::Polygon(
                points
                    .iter()
                    .map(|p| convert(&node.frame, target, *p))
                    .collect(),
            ),
        })
    }

    /// Resolve a dynamic anchor's position in `conn_frame` local coordinates.
    ///
    /// The reference point is carried in the anchorage's local frame; with an
    /// orientation hint the attachment goes to the near horizontal or vertical
    /// edge of the bounds, otherwise the line from the bounds center toward
    /// the reference point is intersected with the outline. A reference point
    /// inside the bounds resolves to the center (the transient state the
    /// routers substitute for).
    pub fn resolve(
        &self,
        conn_frame: &CoordinateFrame,
        anchorage: &NodeId,
        params: &DynamicParams,
    ) -> Result<Point, RouteError> {
        let node = self
            .nodes
            .get(anchorage)
            .ok_or_else(|| RouteError::unknown_anchorage(anchorage.as_str()))?;
        let geometry = self
            .geometry_in(anchorage, conn_frame)
            .expect("node was just looked up");
        let bounds = geometry.bounds();
        let center = bounds.center();
        if !center.is_finite() {
            return Err(RouteError::degenerate_geometry(anchorage.as_str()));
        }

        let reference = convert(&node.frame, conn_frame, params.reference_point);

        match params.preferred_orientation {
            Some(Orientation::Vertical) => {
                let x = reference.x.clamp(bounds.x, bounds.right());
                let y = if reference.y < center.y {
                    bounds.y
                } else {
                    bounds.bottom()
                };
                Ok(Point::new(x, y))
            }
            Some(Orientation::Horizontal) => {
                let y = reference.y.clamp(bounds.y, bounds.bottom());
                let x = if reference.x < center.x {
                    bounds.x
                } else {
                    bounds.right()
                };
                Ok(Point::new(x, y))
            }
            None => {
                if bounds.contains(reference) {
                    return Ok(center);
                }
                Ok(project_from_center(bounds, center, reference))
            }
        }
    }
}

/// Intersect the ray from `center` toward `reference` with the bounds outline
fn project_from_center(bounds: Rect, center: Point, reference: Point) -> Point {
    let d = Vector::between(center, reference);
    let half_w = bounds.width / 2.0;
    let half_h = bounds.height / 2.0;
    let mut t = f64::INFINITY;
    if d.dx.abs() > 0.0 {
        t = t.min(half_w / d.dx.abs());
    }
    if d.dy.abs() > 0.0 {
        t = t.min(half_h / d.dy.abs());
    }
    if !t.is_finite() {
        return center;
    }
    Point::new(center.x + d.dx * t, center.y + d.dy * t)
}

/// An ordered sequence of anchors defining an edge's shape.
///
/// The sequence always starts and ends with an anchor whose identity routing
/// never changes; only the interior may be replaced, and only as a whole.
#[derive(Debug, Clone)]
pub struct Connection {
    anchors: Vec<Anchor>,
    frame: CoordinateFrame,
    start_hint: Option<Point>,
    end_hint: Option<Point>,
}

impl Connection {
    /// Create a connection from its two endpoint anchors
    pub fn new(start: Anchor, end: Anchor) -> Self {
        Self {
            anchors: vec![start, end],
            frame: CoordinateFrame::identity(),
            start_hint: None,
            end_hint: None,
        }
    }

    /// Set the connection's own coordinate frame
    pub fn with_frame(mut self, frame: CoordinateFrame) -> Self {
        self.frame = frame;
        self
    }

    /// Set an explicit start-point hint, in connection-local coordinates
    pub fn with_start_hint(mut self, hint: Point) -> Self {
        self.start_hint = Some(hint);
        self
    }

    /// Set an explicit end-point hint, in connection-local coordinates
    pub fn with_end_hint(mut self, hint: Point) -> Self {
        self.end_hint = Some(hint);
        self
    }

    pub fn frame(&self) -> &CoordinateFrame {
        &self.frame
    }

    pub fn start_point_hint(&self) -> Option<Point> {
        self.start_hint
    }

    pub fn end_point_hint(&self) -> Option<Point> {
        self.end_hint
    }

    /// All anchors, endpoints included
    pub fn anchors(&self) -> &[Anchor] {
        &self.anchors
    }

    pub fn anchor(&self, index: usize) -> Option<&Anchor> {
        self.anchors.get(index)
    }

    pub(crate) fn anchor_mut(&mut self, index: usize) -> Option<&mut Anchor> {
        self.anchors.get_mut(index)
    }

    pub fn anchor_count(&self) -> usize {
        self.anchors.len()
    }

    /// The interior anchors, between the endpoints
    pub fn control_anchors(&self) -> Vec<Anchor> {
        self.anchors[1..self.anchors.len() - 1].to_vec()
    }

    /// Replace the interior anchors in a single write.
    ///
    /// The endpoints are untouched; observers of the connection never see a
    /// partially rewritten interior.
    pub fn set_control_anchors(&mut self, controls: Vec<Anchor>) {
        let start = self.anchors.first().cloned().expect("connection has endpoints");
        let end = self.anchors.last().cloned().expect("connection has endpoints");
        let mut anchors = Vec::with_capacity(controls.len() + 2);
        anchors.push(start);
        anchors.extend(controls);
        anchors.push(end);
        self.anchors = anchors;
    }

    /// Append a user-authored control point before the end anchor
    pub fn add_control_point(&mut self, point: Point) {
        let end = self.anchors.len() - 1;
        self.anchors.insert(end, Anchor::Static { position: point });
    }

    /// True when the start anchor is bound to an anchorage
    pub fn is_start_connected(&self) -> bool {
        self.anchors.first().map(|a| a.anchorage().is_some()).unwrap_or(false)
    }

    /// True when the end anchor is bound to an anchorage
    pub fn is_end_connected(&self) -> bool {
        self.anchors.last().map(|a| a.anchorage().is_some()).unwrap_or(false)
    }

    /// Resolve every anchor to a position in the connection's local frame
    pub fn points(&self, store: &AnchorageStore) -> Result<Vec<Point>, RouteError> {
        self.anchors
            .iter()
            .map(|anchor| match anchor {
                Anchor::Static { position } | Anchor::VolatileStatic { position } => Ok(*position),
                Anchor::Dynamic { anchorage, params } => {
                    store.resolve(&self.frame, anchorage, params)
                }
            })
            .collect()
    }
}
