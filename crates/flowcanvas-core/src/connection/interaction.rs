//! Tool-dependent hover and click handling for connections.

use super::style::Highlight;
use crate::graph::{Connection, ConnectionId, NodeId};
use crate::tools::ToolKind;
use kurbo::Point;
use serde::{Deserialize, Serialize};

/// Edit requested by a connection click. The host applies it to the
/// canonical graph.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ConnectionIntent {
    Delete(ConnectionId),
    /// Insert a reroute point at `at` (world coordinates).
    Split { connection: ConnectionId, at: Point },
}

/// Host-side receiver for connection edits.
pub trait ConnectionCommands {
    fn delete_connection(&mut self, id: ConnectionId);
    fn split_connection(&mut self, id: ConnectionId, at: Point);
}

impl ConnectionIntent {
    /// Deliver this intent to `commands`.
    pub fn apply<C: ConnectionCommands + ?Sized>(self, commands: &mut C) {
        match self {
            ConnectionIntent::Delete(id) => commands.delete_connection(id),
            ConnectionIntent::Split { connection, at } => commands.split_connection(connection, at),
        }
    }

    pub fn connection(&self) -> ConnectionId {
        match self {
            ConnectionIntent::Delete(id) => *id,
            ConnectionIntent::Split { connection, .. } => *connection,
        }
    }
}

/// What the pointer is currently over.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HoverState {
    pub connection: Option<ConnectionId>,
    pub node: Option<NodeId>,
}

impl HoverState {
    /// Highlight for `connection` under `tool`.
    ///
    /// The cutter also marks every connection attached to a hovered node,
    /// since deleting that node's edges is the likely next click.
    pub fn highlight(&self, connection: &Connection, tool: ToolKind) -> Highlight {
        let over_edge = self.connection == Some(connection.id);
        match tool {
            ToolKind::Normal => Highlight::None,
            ToolKind::Cutter => {
                let over_end = self.node.is_some_and(|n| connection.touches(n));
                if over_edge || over_end {
                    Highlight::Delete
                } else {
                    Highlight::None
                }
            }
            ToolKind::Reroute if over_edge => Highlight::Create,
            ToolKind::Reroute => Highlight::None,
        }
    }
}

/// Intent for clicking `connection` at `world_point` with `tool`.
pub fn click_intent(
    tool: ToolKind,
    connection: ConnectionId,
    world_point: Point,
) -> Option<ConnectionIntent> {
    match tool {
        ToolKind::Normal => None,
        ToolKind::Cutter => Some(ConnectionIntent::Delete(connection)),
        ToolKind::Reroute => Some(ConnectionIntent::Split {
            connection,
            at: world_point,
        }),
    }
}
