//! Canvas tools affecting how connections react to the pointer.

use serde::{Deserialize, Serialize};

/// Available tools.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum ToolKind {
    /// Select, drag and pan.
    #[default]
    Normal,
    /// Click a connection to delete it.
    Cutter,
    /// Click a connection to split it with a reroute point.
    Reroute,
}

impl ToolKind {
    /// Whether clicking a connection does something with this tool.
    pub fn edits_connections(self) -> bool {
        !matches!(self, ToolKind::Normal)
    }

    /// Shortcut label shown in the toolbar.
    pub fn shortcut(self) -> &'static str {
        match self {
            ToolKind::Normal => "V",
            ToolKind::Cutter => "X",
            ToolKind::Reroute => "R",
        }
    }

    /// Tool for a toolbar shortcut key, case-insensitive.
    pub fn from_shortcut(key: &str) -> Option<Self> {
        match key.to_ascii_uppercase().as_str() {
            "V" => Some(ToolKind::Normal),
            "X" => Some(ToolKind::Cutter),
            "R" => Some(ToolKind::Reroute),
            _ => None,
        }
    }
}
