//! Scene descriptions loaded from TOML
//!
//! A scene is a set of anchorage nodes plus the connections drawn between
//! them. This is the file format the CLI consumes; library users can also
//! build [`AnchorageStore`]s and [`Connection`]s directly.

use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

use crate::anchor::{Anchor, NodeId};
use crate::config::RouteConfig;
use crate::connection::{AnchorageStore, Connection};
use crate::error::RouteError;
use crate::frame::CoordinateFrame;
use crate::geometry::{Geometry, Point, Rect};
use crate::router::{OrthogonalRouter, Router, StraightRouter};

/// Errors that can occur when loading or validating a scene
#[derive(Error, Debug)]
pub enum SceneError {
    #[error("failed to read scene file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse scene TOML: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("connection references unknown node `{id}`")]
    UnknownNode { id: String },
    #[error("node `{id}` must declare exactly one of `rect` or `polygon`")]
    InvalidNode { id: String },
}

/// Which routing policy a connection uses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RouterKind {
    #[default]
    Orthogonal,
    Straight,
}

/// A connection together with its chosen routing policy
#[derive(Debug)]
pub struct SceneConnection {
    pub router: RouterKind,
    pub connection: Connection,
}

/// A loaded scene: anchorage nodes and the connections between them
#[derive(Debug)]
pub struct Scene {
    pub store: AnchorageStore,
    pub connections: Vec<SceneConnection>,
}

/// TOML structure for deserializing scenes
#[derive(Deserialize)]
struct TomlScene {
    #[serde(default)]
    node: Vec<TomlNode>,
    #[serde(default)]
    connection: Vec<TomlConnection>,
}

#[derive(Deserialize)]
struct TomlNode {
    id: String,
    rect: Option<[f64; 4]>,
    polygon: Option<Vec<[f64; 2]>>,
    frame: Option<TomlFrame>,
}

#[derive(Deserialize)]
struct TomlFrame {
    #[serde(default)]
    translation: [f64; 2],
    #[serde(default = "default_scale")]
    scale: f64,
}

fn default_scale() -> f64 {
    1.0
}

/// A connection endpoint: either a node id or a bare point
#[derive(Deserialize)]
#[serde(untagged)]
enum TomlEndpoint {
    Node(String),
    Point([f64; 2]),
}

#[derive(Deserialize)]
struct TomlConnection {
    from: TomlEndpoint,
    to: TomlEndpoint,
    #[serde(default)]
    router: RouterKind,
    start_hint: Option<[f64; 2]>,
    end_hint: Option<[f64; 2]>,
    #[serde(default)]
    control_points: Vec<[f64; 2]>,
}

impl Scene {
    /// Load a scene from a TOML file
    pub fn from_file(path: &Path) -> Result<Self, SceneError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Load a scene from a TOML string
    pub fn from_toml(content: &str) -> Result<Self, SceneError> {
        let parsed: TomlScene = toml::from_str(content)?;

        let mut store = AnchorageStore::new();
        for node in parsed.node {
            let geometry = match (node.rect, node.polygon) {
                (Some([x, y, w, h]), None) => Geometry::Rect(Rect::new(x, y, w, h)),
                (None, Some(vertices)) => Geometry::Polygon(
                    vertices.iter().map(|&[x, y]| Point::new(x, y)).collect(),
                ),
                _ => return Err(SceneError::InvalidNode { id: node.id }),
            };
            let frame = match node.frame {
                Some(f) => CoordinateFrame::translated(f.translation[0], f.translation[1])
                    .with_scale(f.scale),
                None => CoordinateFrame::identity(),
            };
            store.insert_with_frame(NodeId::new(node.id), geometry, frame);
        }

        let mut connections = Vec::with_capacity(parsed.connection.len());
        for toml_conn in parsed.connection {
            let start = resolve_endpoint(&store, toml_conn.from)?;
            let end = resolve_endpoint(&store, toml_conn.to)?;
            let mut connection = Connection::new(start, end);
            if let Some([x, y]) = toml_conn.start_hint {
                connection = connection.with_start_hint(Point::new(x, y));
            }
            if let Some([x, y]) = toml_conn.end_hint {
                connection = connection.with_end_hint(Point::new(x, y));
            }
            for [x, y] in toml_conn.control_points {
                connection.add_control_point(Point::new(x, y));
            }
            connections.push(SceneConnection {
                router: toml_conn.router,
                connection,
            });
        }

        Ok(Scene { store, connections })
    }

    /// Run each connection's routing policy once
    pub fn route_all(&mut self, config: &RouteConfig) -> Result<(), RouteError> {
        for scene_conn in &mut self.connections {
            match scene_conn.router {
                RouterKind::Orthogonal => {
                    OrthogonalRouter::new().route(&mut scene_conn.connection, &self.store, config)?
                }
                RouterKind::Straight => {
                    StraightRouter::new().route(&mut scene_conn.connection, &self.store, config)?
                }
            }
        }
        Ok(())
    }

    /// Resolved waypoints of every connection, in scene order
    pub fn waypoints(&self) -> Result<Vec<Vec<Point>>, RouteError> {
        self.connections
            .iter()
            .map(|c| c.connection.points(&self.store))
            .collect()
    }
}

fn resolve_endpoint(store: &AnchorageStore, endpoint: TomlEndpoint) -> Result<Anchor, SceneError> {
    match endpoint {
        TomlEndpoint::Node(id) => {
            let node_id = NodeId::new(id);
            if store.node(&node_id).is_none() {
                return Err(SceneError::UnknownNode {
                    id: node_id.as_str().to_owned(),
                });
            }
            Ok(Anchor::dynamic(node_id))
        }
        TomlEndpoint::Point([x, y]) => Ok(Anchor::fixed(x, y)),
    }
}
