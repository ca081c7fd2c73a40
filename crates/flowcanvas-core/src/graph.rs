//! Graph data consumed by the engine: nodes, connections and groups.
//!
//! The host owns these collections. The engine only reads them and never
//! mutates the canonical graph.

use kurbo::{Point, Rect};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

/// Unique identifier for nodes.
pub type NodeId = Uuid;
/// Unique identifier for connections.
pub type ConnectionId = Uuid;
/// Unique identifier for groups.
pub type GroupId = Uuid;
/// Named attachment point on a node.
pub type HandleId = String;

/// A pipeline node placed on the canvas.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub id: NodeId,
    /// Node type label, e.g. `"script"` or `"image"`.
    pub kind: String,
    /// Top-left corner in world coordinates.
    pub position: Point,
    pub width: f64,
    /// Expanded height. Ignored while collapsed.
    pub height: f64,
    #[serde(default)]
    pub is_collapsed: bool,
    /// Input handle ids, top to bottom.
    #[serde(default)]
    pub inputs: Vec<HandleId>,
    /// Output handle ids, top to bottom.
    #[serde(default)]
    pub outputs: Vec<HandleId>,
}

impl Node {
    /// Create a new expanded node with no named handles.
    pub fn new(kind: impl Into<String>, position: Point, width: f64, height: f64) -> Self {
        Self {
            id: Uuid::new_v4(),
            kind: kind.into(),
            position,
            width,
            height,
            is_collapsed: false,
            inputs: Vec::new(),
            outputs: Vec::new(),
        }
    }

    pub fn with_inputs<I, S>(mut self, inputs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<HandleId>,
    {
        self.inputs = inputs.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_outputs<I, S>(mut self, outputs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<HandleId>,
    {
        self.outputs = outputs.into_iter().map(Into::into).collect();
        self
    }

    pub fn collapsed(mut self, is_collapsed: bool) -> Self {
        self.is_collapsed = is_collapsed;
        self
    }

    /// Height actually occupied on the canvas.
    pub fn effective_height(&self, header_height: f64) -> f64 {
        if self.is_collapsed {
            header_height
        } else {
            self.height
        }
    }

    /// World-space bounding box, honoring the collapsed state.
    ///
    /// The far edges are `position + size` as stored. A negative size is
    /// not normalized, so such a box never overlaps anything.
    pub fn bounds(&self, header_height: f64) -> Rect {
        let Point { x, y } = self.position;
        Rect::new(
            x,
            y,
            x + self.width,
            y + self.effective_height(header_height),
        )
    }

    /// Whether a world point lies inside the node.
    pub fn contains(&self, point: Point, header_height: f64) -> bool {
        self.bounds(header_height).contains(point)
    }

    /// Anchor of an output handle on the right edge.
    pub fn output_anchor(&self, handle: Option<&str>, header_height: f64) -> Point {
        let y = self.handle_y(&self.outputs, handle, header_height);
        Point::new(self.position.x + self.width, y)
    }

    /// Anchor of an input handle on the left edge.
    pub fn input_anchor(&self, handle: Option<&str>, header_height: f64) -> Point {
        let y = self.handle_y(&self.inputs, handle, header_height);
        Point::new(self.position.x, y)
    }

    /// Handles are spread evenly over the node height. A collapsed node
    /// stacks all of them at the header's vertical center. Unknown or absent
    /// handle ids resolve to the first slot.
    fn handle_y(&self, handles: &[HandleId], handle: Option<&str>, header_height: f64) -> f64 {
        if self.is_collapsed {
            return self.position.y + header_height / 2.0;
        }
        let index = handle
            .and_then(|id| handles.iter().position(|h| h == id))
            .unwrap_or(0);
        let slots = handles.len().max(1) as f64;
        self.position.y + self.height * (index as f64 + 1.0) / (slots + 1.0)
    }
}

/// A directed edge between two node handles.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Connection {
    pub id: ConnectionId,
    pub from_node: NodeId,
    pub to_node: NodeId,
    #[serde(default)]
    pub from_handle: Option<HandleId>,
    #[serde(default)]
    pub to_handle: Option<HandleId>,
}

impl Connection {
    /// Create a connection between the default handles of two nodes.
    pub fn new(from_node: NodeId, to_node: NodeId) -> Self {
        Self {
            id: Uuid::new_v4(),
            from_node,
            to_node,
            from_handle: None,
            to_handle: None,
        }
    }

    /// Create a connection between named handles.
    pub fn between_handles(
        from_node: NodeId,
        from_handle: impl Into<HandleId>,
        to_node: NodeId,
        to_handle: impl Into<HandleId>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            from_node,
            to_node,
            from_handle: Some(from_handle.into()),
            to_handle: Some(to_handle.into()),
        }
    }

    /// Whether the connection touches the given node on either side.
    pub fn touches(&self, node: NodeId) -> bool {
        self.from_node == node || self.to_node == node
    }

    /// World-space start and end points.
    ///
    /// Returns `None` when either node is missing from `index`.
    pub fn endpoints(&self, index: &NodeIndex<'_>, header_height: f64) -> Option<(Point, Point)> {
        let from = index.get(&self.from_node)?;
        let to = index.get(&self.to_node)?;
        Some((
            from.output_anchor(self.from_handle.as_deref(), header_height),
            to.input_anchor(self.to_handle.as_deref(), header_height),
        ))
    }
}

/// A labelled frame grouping nodes visually.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Group {
    pub id: GroupId,
    pub label: String,
    /// Top-left corner in world coordinates.
    pub position: Point,
    pub width: f64,
    pub height: f64,
}

impl Group {
    pub fn new(label: impl Into<String>, position: Point, width: f64, height: f64) -> Self {
        Self {
            id: Uuid::new_v4(),
            label: label.into(),
            position,
            width,
            height,
        }
    }

    /// World-space box, not normalized (see [`Node::bounds`]).
    pub fn bounds(&self) -> Rect {
        let Point { x, y } = self.position;
        Rect::new(x, y, x + self.width, y + self.height)
    }
}

/// Lookup from node id to node.
pub type NodeIndex<'a> = HashMap<NodeId, &'a Node>;

/// Build a [`NodeIndex`] over a node slice.
pub fn index_nodes(nodes: &[Node]) -> NodeIndex<'_> {
    nodes.iter().map(|n| (n.id, n)).collect()
}

/// Topmost node under a world point. Later nodes draw on top.
pub fn node_at(nodes: &[Node], point: Point, header_height: f64) -> Option<&Node> {
    nodes.iter().rev().find(|n| n.contains(point, header_height))
}

/// Union of all node bounds, or `None` for an empty graph.
pub fn graph_bounds(nodes: &[Node], header_height: f64) -> Option<Rect> {
    nodes
        .iter()
        .map(|n| n.bounds(header_height).abs())
        .reduce(|acc, r| acc.union(r))
}
