//! Wayline - connection routing and anchoring for node diagrams
//!
//! This library computes the waypoints of connections drawn between diagram
//! nodes. A connection is an ordered sequence of anchors; routers rewrite the
//! interior of that sequence each pass, inserting bend points where their
//! policy demands and recomputing where the dynamic end anchors attach to
//! their nodes.
//!
//! # Example
//!
//! ```rust
//! use wayline::{Anchor, AnchorageStore, Connection, Geometry, NodeId, OrthogonalRouter,
//!     Point, Rect, RouteConfig, Router};
//!
//! let mut store = AnchorageStore::new();
//! store.insert(NodeId::new("a"), Geometry::Rect(Rect::new(0.0, 0.0, 20.0, 20.0)));
//!
//! let mut conn = Connection::new(Anchor::dynamic(NodeId::new("a")), Anchor::fixed(100.0, 50.0));
//! OrthogonalRouter::new().route(&mut conn, &store, &RouteConfig::default()).unwrap();
//!
//! let points = conn.points(&store).unwrap();
//! assert!(points.len() >= 2);
//! ```

pub mod anchor;
pub mod config;
pub mod connection;
pub mod error;
pub mod frame;
pub mod geometry;
pub mod router;
pub mod scene;

pub use anchor::{Anchor, DynamicParams, NodeId, Orientation};
pub use config::{ConfigError, RouteConfig};
pub use connection::{AnchorageNode, AnchorageStore, Connection};
pub use error::RouteError;
pub use frame::CoordinateFrame;
pub use geometry::{Geometry, Point, Rect, Side, Vector};
pub use router::{
    ControlPointManipulator, OrientationUpdate, OrthogonalRouter, ParameterUpdate, RouteContext,
    Router, StraightRouter,
};
pub use scene::{RouterKind, Scene, SceneError};
