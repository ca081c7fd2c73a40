//! FlowCanvas Core Library
//!
//! Viewport and interaction engine for the FlowCanvas pipeline editor:
//! pan/zoom transforms, the mouse/touch gesture state machine, viewport
//! virtualization of the node graph, and connection geometry.

pub mod canvas;
pub mod config;
pub mod connection;
pub mod drag;
pub mod gesture;
pub mod graph;
pub mod input;
pub mod tools;
pub mod transform;
pub mod virtualization;

pub use canvas::{CanvasController, CanvasGraph, EventResponse};
pub use config::{CanvasConfig, ConfigError, ConfigResult};
pub use connection::{
    ConnectionCommands, ConnectionIntent, ConnectionLayers, ConnectionStyle, HandleType,
    HandleTypeResolver, Highlight, LayerStyle,
};
pub use drag::{ConnectionDraft, NodeDrag};
pub use gesture::GestureState;
pub use graph::{Connection, ConnectionId, Group, GroupId, HandleId, Node, NodeId};
pub use input::{InputEvent, MouseButton, PointerEvent, TouchEvent, TouchPhase};
pub use tools::ToolKind;
pub use transform::ViewTransform;
pub use virtualization::{Virtualizer, VisibleSet};
