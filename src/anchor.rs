//! Anchors: the attachment points a connection is built from
//!
//! An anchor either carries a fixed position or is bound to an anchorage node
//! and resolves against that node's geometry. Anchors a router inserts are
//! tagged `VolatileStatic` so the next pass can tell them apart from
//! user-authored ones and remove them before recomputing.

use crate::geometry::Point;

/// Identifier of an anchorage node
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub String);

impl NodeId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Preferred entry orientation for a dynamic anchor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    Horizontal,
    Vertical,
}

/// Computation parameters of a dynamic anchor.
///
/// The reference point is stored in the anchorage node's local frame, so it
/// stays correct as the node's frame moves without any recomputation; the
/// resolved position is re-derived on demand from the current frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DynamicParams {
    /// Reference point in the anchorage's local coordinates
    pub reference_point: Point,
    /// Orientation hint for the anchorage-side solver, if any
    pub preferred_orientation: Option<Orientation>,
}

impl Default for DynamicParams {
    fn default() -> Self {
        Self {
            reference_point: Point::ZERO,
            preferred_orientation: None,
        }
    }
}

/// An attachment point in a connection's anchor sequence
#[derive(Debug, Clone, PartialEq)]
pub enum Anchor {
    /// User-authored fixed position, in the connection's local frame
    Static { position: Point },
    /// Router-inserted fixed position; removed and recreated each pass
    VolatileStatic { position: Point },
    /// Bound to an anchorage node; resolves against its geometry
    Dynamic {
        anchorage: NodeId,
        params: DynamicParams,
    },
}

impl Anchor {
    /// Fixed anchor at a position in the connection's local frame
    pub fn fixed(x: f64, y: f64) -> Self {
        Anchor::Static {
            position: Point::new(x, y),
        }
    }

    /// Dynamic anchor bound to `anchorage` with default parameters
    pub fn dynamic(anchorage: NodeId) -> Self {
        Anchor::Dynamic {
            anchorage,
            params: DynamicParams::default(),
        }
    }

    /// True iff this anchor was inserted by a router
    pub fn was_inserted(&self) -> bool {
        matches!(self, Anchor::VolatileStatic { .. })
    }

    /// The anchorage node this anchor is bound to, if any
    pub fn anchorage(&self) -> Option<&NodeId> {
        match self {
            Anchor::Dynamic { anchorage, .. } => Some(anchorage),
            _ => None,
        }
    }

    /// The dynamic computation parameters, if this anchor has them
    pub fn params(&self) -> Option<&DynamicParams> {
        match self {
            Anchor::Dynamic { params, .. } => Some(params),
            _ => None,
        }
    }

    pub(crate) fn params_mut(&mut self) -> Option<&mut DynamicParams> {
        match self {
            Anchor::Dynamic { params, .. } => Some(params),
            _ => None,
        }
    }
}
