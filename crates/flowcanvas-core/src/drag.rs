//! Pointer drags in world space: moving nodes and drawing new connections.

use crate::config::CanvasConfig;
use crate::connection::{ConnectionStyle, connection_path};
use crate::graph::{HandleId, Node, NodeId};
use kurbo::{BezPath, Point, Vec2};

/// State of a node being dragged.
///
/// The node position is always derived from the anchor captured at drag
/// start, so repeated moves never accumulate rounding drift.
#[derive(Debug, Clone, PartialEq)]
pub struct NodeDrag {
    pub node_id: NodeId,
    /// Pointer position (world) at drag start.
    pub start_point: Point,
    /// Node position at drag start.
    pub start_position: Point,
    /// Latest pointer position (world).
    pub current_point: Point,
}

impl NodeDrag {
    pub fn new(node: &Node, start_point: Point) -> Self {
        Self {
            node_id: node.id,
            start_point,
            start_position: node.position,
            current_point: start_point,
        }
    }

    /// Get the drag delta.
    pub fn delta(&self) -> Vec2 {
        self.current_point - self.start_point
    }

    /// Record a pointer move and return the node's new position.
    pub fn update(&mut self, world_point: Point) -> Point {
        self.current_point = world_point;
        self.position()
    }

    /// Current node position.
    pub fn position(&self) -> Point {
        self.start_position + self.delta()
    }
}

/// A connection being dragged out of an output handle.
#[derive(Debug, Clone, PartialEq)]
pub struct ConnectionDraft {
    pub from_node: NodeId,
    pub from_handle: Option<HandleId>,
    /// Output handle anchor (world).
    pub origin: Point,
    /// Pointer position (world).
    pub cursor: Point,
}

impl ConnectionDraft {
    pub fn new(node: &Node, handle: Option<&str>, config: &CanvasConfig) -> Self {
        let origin = node.output_anchor(handle, config.collapsed_header_height);
        Self {
            from_node: node.id,
            from_handle: handle.map(str::to_owned),
            origin,
            cursor: origin,
        }
    }

    pub fn update(&mut self, world_point: Point) {
        self.cursor = world_point;
    }

    /// Preview path from the handle to the pointer.
    pub fn path(&self, style: ConnectionStyle, config: &CanvasConfig) -> BezPath {
        connection_path(self.origin, self.cursor, style, config.curve_handle_length)
    }

    /// Whether the draft may connect to `target`. Self-loops are refused.
    pub fn can_connect_to(&self, target: &Node) -> bool {
        target.id != self.from_node
    }
}
