//! Error types for routing passes

use thiserror::Error;

/// Errors that can occur while routing a connection
#[derive(Debug, Error)]
pub enum RouteError {
    /// A `ControlPointManipulator` was applied more than once
    #[error("control point manipulator already applied; each instance commits exactly once")]
    ManipulatorExhausted,

    /// Malformed delta sequence passed to a batch insertion
    #[error("invalid routing deltas: expected a non-empty even-length sequence of coordinates, got {len}")]
    InvalidDeltas { len: usize },

    /// Anchor index outside the connection's anchor list
    #[error("anchor index {index} out of range for connection with {count} anchors")]
    IndexOutOfRange { index: usize, count: usize },

    /// Insertion index that does not address an interior position
    #[error("insertion index {index} does not address an interior position")]
    InvalidInsertionIndex { index: usize },

    /// A dynamic anchor references an anchorage the store does not know
    #[error("unknown anchorage '{id}'")]
    UnknownAnchorage { id: String },

    /// An anchorage whose geometry center cannot be determined
    #[error("anchorage '{id}' has a degenerate geometry (non-finite center)")]
    DegenerateGeometry { id: String },
}

impl RouteError {
    /// Create an invalid-deltas error from the offending slice length
    pub fn invalid_deltas(len: usize) -> Self {
        Self::InvalidDeltas { len }
    }

    /// Create an out-of-range index error
    pub fn index_out_of_range(index: usize, count: usize) -> Self {
        Self::IndexOutOfRange { index, count }
    }

    /// Create an unknown-anchorage error
    pub fn unknown_anchorage(id: impl Into<String>) -> Self {
        Self::UnknownAnchorage { id: id.into() }
    }

    /// Create a degenerate-geometry error
    pub fn degenerate_geometry(id: impl Into<String>) -> Self {
        Self::DegenerateGeometry { id: id.into() }
    }
}
