//! Connection colors and paint layers.

use super::path::flow_dash_offset;
use crate::config::CanvasConfig;
use crate::graph::{ConnectionId, Node};
use kurbo::{BezPath, Stroke};
use peniko::Color;
use serde::{Deserialize, Serialize};

/// Data type carried by a handle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HandleType {
    Text,
    Image,
    #[default]
    Other,
}

impl HandleType {
    /// Parse the type label node logic reports, e.g. `"text"`.
    pub fn from_label(label: &str) -> Self {
        match label {
            "text" => HandleType::Text,
            "image" => HandleType::Image,
            _ => HandleType::Other,
        }
    }
}

/// Resolves the data type of a node's output handle.
///
/// Implemented by node-type logic outside the engine. Closures with the
/// matching signature implement it directly.
pub trait HandleTypeResolver {
    fn output_handle_type(&self, node: &Node, handle: Option<&str>) -> HandleType;
}

impl<F> HandleTypeResolver for F
where
    F: Fn(&Node, Option<&str>) -> HandleType,
{
    fn output_handle_type(&self, node: &Node, handle: Option<&str>) -> HandleType {
        self(node, handle)
    }
}

/// Tool-driven emphasis on a connection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Highlight {
    #[default]
    None,
    /// Cutter hover: clicking deletes.
    Delete,
    /// Reroute hover: clicking inserts a reroute point.
    Create,
}

/// Colors used for connection strokes.
#[derive(Debug, Clone, Copy)]
pub struct ConnectionPalette {
    pub text: Color,
    pub image: Color,
    pub other: Color,
    pub delete: Color,
    pub create: Color,
}

impl Default for ConnectionPalette {
    fn default() -> Self {
        Self {
            text: Color::from_rgba8(59, 130, 246, 255),  // Blue
            image: Color::from_rgba8(168, 85, 247, 255), // Purple
            other: Color::from_rgba8(148, 163, 184, 255),
            delete: Color::from_rgba8(239, 68, 68, 255),
            create: Color::from_rgba8(34, 197, 94, 255),
        }
    }
}

impl ConnectionPalette {
    /// Stroke color for a connection whose source handle carries `data`.
    pub fn stroke_color(&self, data: HandleType, highlight: Highlight) -> Color {
        match highlight {
            Highlight::Delete => self.delete,
            Highlight::Create => self.create,
            Highlight::None => match data {
                HandleType::Text => self.text,
                HandleType::Image => self.image,
                HandleType::Other => self.other,
            },
        }
    }
}

/// Stroke width of the visible connection line (world units).
pub const STROKE_WIDTH: f64 = 2.0;
/// Stroke width while highlighted (world units).
pub const HIGHLIGHT_STROKE_WIDTH: f64 = 3.0;

/// Per-frame inputs shared by every connection's layers.
#[derive(Debug, Clone, Copy)]
pub struct LayerStyle<'a> {
    pub config: &'a CanvasConfig,
    pub palette: &'a ConnectionPalette,
    /// Current view scale.
    pub scale: f64,
    /// Seconds since the canvas started animating.
    pub elapsed_secs: f64,
}

/// The three coincident layers drawn for one connection.
///
/// Only the hit region takes pointer input. The stroke and flow overlay
/// are decorative.
#[derive(Debug, Clone)]
pub struct ConnectionLayers {
    pub id: ConnectionId,
    /// Shared geometry of all three layers, in world coordinates.
    pub path: BezPath,
    /// Invisible hit region width in world units.
    pub hit_width: f64,
    pub stroke: Stroke,
    pub stroke_color: Color,
    /// Dashed overlay animating from source to target.
    pub flow: Stroke,
    pub data_type: HandleType,
    pub highlight: Highlight,
}

impl ConnectionLayers {
    /// Build the layers for a routed path.
    ///
    /// `style.scale` converts the screen-space hit width to world units so
    /// the hit region stays the same size on screen at every zoom level.
    pub fn new(
        id: ConnectionId,
        path: BezPath,
        data_type: HandleType,
        highlight: Highlight,
        style: &LayerStyle<'_>,
    ) -> Self {
        let config = style.config;
        let width = match highlight {
            Highlight::None => STROKE_WIDTH,
            _ => HIGHLIGHT_STROKE_WIDTH,
        };
        let offset = flow_dash_offset(style.elapsed_secs, config.flow_speed, config.flow_dash);
        Self {
            id,
            path,
            hit_width: config.hit_region_width / style.scale,
            stroke: Stroke::new(width),
            stroke_color: style.palette.stroke_color(data_type, highlight),
            flow: Stroke::new(width).with_dashes(-offset, config.flow_dash),
            data_type,
            highlight,
        }
    }
}
