//! Invariants every routing pass must uphold, checked over full passes
//! rather than individual hooks.

use pretty_assertions::assert_eq;

use wayline::{
    Anchor, AnchorageStore, Connection, Geometry, NodeId, Orientation, OrthogonalRouter, Point,
    Rect, RouteConfig, Router, StraightRouter, Vector,
};

/// Two nodes stacked vertically with overlapping x-ranges, connected
/// dynamically at both ends.
fn stacked_nodes() -> (Connection, AnchorageStore) {
    let mut store = AnchorageStore::new();
    store.insert(NodeId::new("a"), Geometry::Rect(Rect::new(0.0, 0.0, 20.0, 20.0)));
    store.insert(NodeId::new("b"), Geometry::Rect(Rect::new(10.0, 100.0, 30.0, 20.0)));
    let conn = Connection::new(
        Anchor::dynamic(NodeId::new("a")),
        Anchor::dynamic(NodeId::new("b")),
    );
    (conn, store)
}

fn assert_axis_aligned(points: &[Point], tolerance: f64) {
    for pair in points.windows(2) {
        let d = Vector::between(pair[0], pair[1]);
        assert!(
            d.dx.abs() < tolerance || d.dy.abs() < tolerance,
            "segment {:?} -> {:?} is not axis aligned",
            pair[0],
            pair[1]
        );
    }
}

#[test]
fn test_static_route_is_idempotent_immediately() {
    let mut conn = Connection::new(Anchor::fixed(0.0, 0.0), Anchor::fixed(100.0, 50.0));
    let store = AnchorageStore::new();
    let config = RouteConfig::default();
    let router = OrthogonalRouter::new();

    router.route(&mut conn, &store, &config).unwrap();
    let first = conn.points(&store).unwrap();
    router.route(&mut conn, &store, &config).unwrap();
    let second = conn.points(&store).unwrap();

    assert_eq!(first, second);
    assert_eq!(conn.anchor_count(), 3);
}

#[test]
fn test_dynamic_route_converges_and_stays_fixed() {
    let (mut conn, store) = stacked_nodes();
    let config = RouteConfig::default();
    let router = OrthogonalRouter::new();

    // The first pass may still move attachment parameters; after that the
    // pass must reproduce itself exactly
    router.route(&mut conn, &store, &config).unwrap();
    router.route(&mut conn, &store, &config).unwrap();
    let second = conn.points(&store).unwrap();
    router.route(&mut conn, &store, &config).unwrap();
    let third = conn.points(&store).unwrap();

    assert_eq!(second, third);
}

#[test]
fn test_repeated_routing_does_not_accumulate_anchors() {
    let (mut conn, store) = stacked_nodes();
    let config = RouteConfig::default();
    let router = OrthogonalRouter::new();

    let mut counts = Vec::new();
    for _ in 0..5 {
        router.route(&mut conn, &store, &config).unwrap();
        counts.push(conn.anchor_count());
    }
    // Volatile anchors are stripped before each pass, so the count settles
    // instead of growing
    assert_eq!(counts, vec![4, 4, 4, 4, 4]);
}

#[test]
fn test_every_pass_yields_axis_aligned_segments() {
    let (mut conn, store) = stacked_nodes();
    let config = RouteConfig::default();
    let router = OrthogonalRouter::new();

    for _ in 0..3 {
        router.route(&mut conn, &store, &config).unwrap();
        let points = conn.points(&store).unwrap();
        assert_axis_aligned(&points, config.axis_tolerance);
    }
}

#[test]
fn test_inserted_anchors_are_volatile_and_user_bends_survive() {
    let mut conn = Connection::new(Anchor::fixed(0.0, 0.0), Anchor::fixed(100.0, 50.0));
    conn.add_control_point(Point::new(50.0, 0.0));
    let store = AnchorageStore::new();
    let config = RouteConfig::default();
    OrthogonalRouter::new().route(&mut conn, &store, &config).unwrap();

    let anchors = conn.anchors();
    assert_eq!(anchors.len(), 4);
    assert_eq!(anchors[1], Anchor::fixed(50.0, 0.0));
    assert!(anchors[2].was_inserted());

    let points = conn.points(&store).unwrap();
    assert_eq!(
        points,
        vec![
            Point::new(0.0, 0.0),
            Point::new(50.0, 0.0),
            Point::new(100.0, 0.0),
            Point::new(100.0, 50.0)
        ]
    );
}

#[test]
fn test_straight_router_never_inserts() {
    let (mut conn, store) = stacked_nodes();
    let config = RouteConfig::default();
    let router = StraightRouter::new();

    for _ in 0..3 {
        router.route(&mut conn, &store, &config).unwrap();
        assert_eq!(conn.anchor_count(), 2);
    }
}

#[test]
fn test_route_preserves_endpoint_identity() {
    let (mut conn, store) = stacked_nodes();
    let config = RouteConfig::default();
    OrthogonalRouter::new().route(&mut conn, &store, &config).unwrap();

    // Routing rewrites the interior only; the endpoints stay bound to their
    // anchorages
    assert_eq!(conn.anchor(0).unwrap().anchorage(), Some(&NodeId::new("a")));
    assert_eq!(
        conn.anchor(conn.anchor_count() - 1).unwrap().anchorage(),
        Some(&NodeId::new("b"))
    );
}

#[test]
fn test_orientation_hints_settle_on_connected_endpoints() {
    let (mut conn, store) = stacked_nodes();
    let config = RouteConfig::default();
    let router = OrthogonalRouter::new();
    router.route(&mut conn, &store, &config).unwrap();
    router.route(&mut conn, &store, &config).unwrap();

    let start = conn.anchor(0).unwrap().params().unwrap();
    let end = conn.anchor(conn.anchor_count() - 1).unwrap().params().unwrap();
    assert_eq!(start.preferred_orientation, Some(Orientation::Horizontal));
    assert_eq!(end.preferred_orientation, Some(Orientation::Horizontal));
}

#[test]
fn test_reference_points_follow_a_moved_node() {
    use wayline::CoordinateFrame;

    let (mut conn, mut store) = stacked_nodes();
    let config = RouteConfig::default();
    let router = OrthogonalRouter::new();
    router.route(&mut conn, &store, &config).unwrap();

    // Move node b and reroute: the pass must still succeed and keep the
    // route orthogonal at the new location
    store
        .set_frame(&NodeId::new("b"), CoordinateFrame::translated(200.0, 0.0))
        .unwrap();
    router.route(&mut conn, &store, &config).unwrap();
    router.route(&mut conn, &store, &config).unwrap();
    let points = conn.points(&store).unwrap();
    assert_axis_aligned(&points, config.axis_tolerance);
    // The end anchor now resolves on the moved outline
    let end = points[points.len() - 1];
    assert!(end.x >= 210.0, "end point {:?} did not follow the node", end);
}
