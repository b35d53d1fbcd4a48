//! Transactional recording of router point insertions

use std::collections::BTreeMap;

use crate::anchor::Anchor;
use crate::connection::Connection;
use crate::error::RouteError;
use crate::geometry::{Point, Vector};

/// Records the points a routing pass wants to insert into a connection's
/// interior and commits them in one atomic write.
///
/// One instance per routing pass: the interior anchors are snapshotted at
/// construction, insertions are batched against that snapshot, and
/// [`apply_changes`](Self::apply_changes) consumes the batch. Applying twice
/// is a usage error and fails loudly.
#[derive(Debug)]
pub struct ControlPointManipulator {
    /// Snapshot of the interior anchors taken before the pass
    control_anchors: Vec<Anchor>,
    /// Pending insertions: full-sequence anchor index -> points, in call order
    pending: BTreeMap<usize, Vec<Point>>,
    cursor: Cursor,
    applied: bool,
}

#[derive(Debug, Clone, Copy)]
struct Cursor {
    index: usize,
    point: Point,
    direction: Vector,
}

impl ControlPointManipulator {
    /// Snapshot `connection`'s interior and start an empty batch
    pub fn new(connection: &Connection) -> Self {
        Self {
            control_anchors: connection.control_anchors(),
            pending: BTreeMap::new(),
            cursor: Cursor {
                index: 0,
                point: Point::ZERO,
                direction: Vector::ZERO,
            },
            applied: false,
        }
    }

    /// Prime the cursor for the segment currently being routed.
    ///
    /// `index` is the position in the full anchor sequence where insertions
    /// for this segment go (the segment's end anchor); `point` is the
    /// segment's start position and `direction` its full direction vector.
    pub fn set_routing_data(&mut self, index: usize, point: Point, direction: Vector) {
        self.cursor = Cursor {
            index,
            point,
            direction,
        };
    }

    /// The anchor index the cursor is primed for
    pub fn cursor_index(&self) -> usize {
        self.cursor.index
    }

    /// The residual direction from the last inserted point to the segment end
    pub fn cursor_direction(&self) -> Vector {
        self.cursor.direction
    }

    /// Record a single insertion at `index` with position `point + (dx, dy)`.
    ///
    /// Multiple insertions at the same index accumulate in call order.
    /// Returns the applied delta for chaining.
    pub fn add_routing_point_at(
        &mut self,
        index: usize,
        point: Point,
        dx: f64,
        dy: f64,
    ) -> Vector {
        let position = point.translated(dx, dy);
        self.pending.entry(index).or_default().push(position);
        Vector::new(dx, dy)
    }

    /// Record an insertion at the primed cursor, one leg at a time.
    ///
    /// `delta` is relative to the previous inserted point; the cursor point
    /// advances by it and the tracked direction is decremented, so the
    /// returned vector is the residual leg from the new point to the segment
    /// end.
    pub fn add_routing_point(&mut self, delta: Vector) -> Vector {
        let applied = self.add_routing_point_at(self.cursor.index, self.cursor.point, delta.dx, delta.dy);
        self.cursor.point = self.cursor.point + applied;
        self.cursor.direction = self.cursor.direction - applied;
        self.cursor.direction
    }

    /// Record a batch of insertions at `index`, starting from `point`.
    ///
    /// `deltas` is a flat `(dx, dy)` sequence relative to `point`; it must be
    /// non-empty and of even length.
    pub fn add_routing_points(
        &mut self,
        index: usize,
        point: Point,
        deltas: &[f64],
    ) -> Result<(), RouteError> {
        if deltas.is_empty() || deltas.len() % 2 != 0 {
            return Err(RouteError::invalid_deltas(deltas.len()));
        }
        for pair in deltas.chunks_exact(2) {
            self.add_routing_point_at(index, point, pair[0], pair[1]);
        }
        Ok(())
    }

    /// Number of points currently pending insertion
    pub fn pending_count(&self) -> usize {
        self.pending.values().map(Vec::len).sum()
    }

    /// Materialize every pending point as a volatile anchor and replace the
    /// connection's interior in one atomic write.
    ///
    /// Fails with [`RouteError::ManipulatorExhausted`] on a second call.
    pub fn apply_changes(&mut self, connection: &mut Connection) -> Result<(), RouteError> {
        if self.applied {
            return Err(RouteError::ManipulatorExhausted);
        }
        self.applied = true;

        let mut anchors = std::mem::take(&mut self.control_anchors);
        let mut inserted = 0usize;
        for (&index, points) in &self.pending {
            if index == 0 {
                return Err(RouteError::InvalidInsertionIndex { index });
            }
            for point in points {
                // Insertion indices address the full anchor sequence; the
                // interior list starts one past the start anchor.
                anchors.insert(index - 1 + inserted, Anchor::VolatileStatic { position: *point });
                inserted += 1;
            }
        }
        connection.set_control_anchors(anchors);
        Ok(())
    }
}
