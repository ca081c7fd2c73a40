//! Connection geometry and interaction.
//!
//! This module turns connections into drawable paths, finds the connection
//! under the pointer and classifies clicks against the active tool:
//! - Path routing (curved or orthogonal)
//! - Hit testing against a zoom-independent hit region
//! - Color by source handle type, tool highlight, flow overlay
//!
//! The graph stays read-only. Edits leave as [`ConnectionIntent`]s.

mod interaction;
mod path;
mod style;

pub use interaction::{ConnectionCommands, ConnectionIntent, HoverState, click_intent};
pub use path::{ConnectionStyle, connection_path, distance_to_path, flow_dash_offset, hits_path};
pub use style::{
    ConnectionLayers, ConnectionPalette, HIGHLIGHT_STROKE_WIDTH, HandleType, HandleTypeResolver,
    Highlight, LayerStyle, STROKE_WIDTH,
};

use crate::config::CanvasConfig;
use crate::graph::{Connection, NodeIndex};
use crate::tools::ToolKind;
use kurbo::{BezPath, Point};

/// A connection with its world-space path resolved.
#[derive(Debug, Clone)]
pub struct RoutedConnection<'a> {
    pub connection: &'a Connection,
    pub path: BezPath,
}

/// Resolve paths for `connections`. Connections referencing a node missing
/// from `index` are skipped.
pub fn route_connections<'a>(
    connections: &[&'a Connection],
    index: &NodeIndex<'_>,
    style: ConnectionStyle,
    config: &CanvasConfig,
) -> Vec<RoutedConnection<'a>> {
    connections
        .iter()
        .filter_map(|&connection| {
            let Some((start, end)) = connection.endpoints(index, config.collapsed_header_height)
            else {
                log::warn!("Connection {} references a missing node", connection.id);
                return None;
            };
            Some(RoutedConnection {
                connection,
                path: connection_path(start, end, style, config.curve_handle_length),
            })
        })
        .collect()
}

/// Topmost connection whose hit region contains `world_point`.
///
/// `hit_width` is in world units. Later connections draw on top.
pub fn connection_at<'r, 'a>(
    routed: &'r [RoutedConnection<'a>],
    world_point: Point,
    hit_width: f64,
) -> Option<&'r RoutedConnection<'a>> {
    routed
        .iter()
        .rev()
        .find(|r| hits_path(&r.path, world_point, hit_width))
}

/// Builds paint layers for routed connections.
pub struct ConnectionPainter<'p> {
    pub config: &'p CanvasConfig,
    pub palette: &'p ConnectionPalette,
    pub resolver: &'p dyn HandleTypeResolver,
    pub tool: ToolKind,
    pub hover: HoverState,
    /// Current view scale.
    pub scale: f64,
    /// Seconds since the canvas started animating.
    pub elapsed_secs: f64,
}

impl ConnectionPainter<'_> {
    fn layer_style(&self) -> LayerStyle<'_> {
        LayerStyle {
            config: self.config,
            palette: self.palette,
            scale: self.scale,
            elapsed_secs: self.elapsed_secs,
        }
    }

    /// Layers for one connection.
    ///
    /// The color comes from the source node's output handle type, never the
    /// target's.
    pub fn paint(&self, routed: &RoutedConnection<'_>, index: &NodeIndex<'_>) -> ConnectionLayers {
        let connection = routed.connection;
        let data_type = index
            .get(&connection.from_node)
            .map(|node| {
                self.resolver
                    .output_handle_type(node, connection.from_handle.as_deref())
            })
            .unwrap_or_default();
        ConnectionLayers::new(
            connection.id,
            routed.path.clone(),
            data_type,
            self.hover.highlight(connection, self.tool),
            &self.layer_style(),
        )
    }

    /// Layers for every routed connection, in draw order.
    pub fn paint_all(
        &self,
        routed: &[RoutedConnection<'_>],
        index: &NodeIndex<'_>,
    ) -> Vec<ConnectionLayers> {
        routed.iter().map(|r| self.paint(r, index)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{Node, index_nodes};
    use uuid::Uuid;

    fn graph() -> (Vec<Node>, Vec<Connection>) {
        let script = Node::new("script", Point::new(0.0, 0.0), 100.0, 100.0).with_outputs(["text"]);
        let image = Node::new("image", Point::new(300.0, 0.0), 100.0, 100.0)
            .with_inputs(["prompt"])
            .with_outputs(["image"]);
        let video =
            Node::new("video", Point::new(600.0, 0.0), 100.0, 100.0).with_inputs(["frames"]);
        let connections = vec![
            Connection::between_handles(script.id, "text", image.id, "prompt"),
            Connection::between_handles(image.id, "image", video.id, "frames"),
        ];
        (vec![script, image, video], connections)
    }

    #[test]
    fn test_route_skips_dangling() {
        let config = CanvasConfig::default();
        let (nodes, mut connections) = graph();
        connections.push(Connection::new(nodes[0].id, Uuid::new_v4()));
        let index = index_nodes(&nodes);
        let refs: Vec<&Connection> = connections.iter().collect();
        let routed = route_connections(&refs, &index, ConnectionStyle::Curved, &config);
        assert_eq!(routed.len(), 2);
    }

    #[test]
    fn test_connection_at() {
        let config = CanvasConfig::default();
        let (nodes, connections) = graph();
        let index = index_nodes(&nodes);
        let refs: Vec<&Connection> = connections.iter().collect();
        let routed = route_connections(&refs, &index, ConnectionStyle::Orthogonal, &config);

        // Both edges run horizontally at y = 50.
        let hit = connection_at(&routed, Point::new(200.0, 55.0), 20.0).unwrap();
        assert_eq!(hit.connection.id, connections[0].id);
        let hit = connection_at(&routed, Point::new(500.0, 45.0), 20.0).unwrap();
        assert_eq!(hit.connection.id, connections[1].id);
        assert!(connection_at(&routed, Point::new(200.0, 70.0), 20.0).is_none());
    }

    #[test]
    fn test_color_from_source_handle() {
        let config = CanvasConfig::default();
        let palette = ConnectionPalette::default();
        let (nodes, connections) = graph();
        let index = index_nodes(&nodes);
        let refs: Vec<&Connection> = connections.iter().collect();
        let routed = route_connections(&refs, &index, ConnectionStyle::Curved, &config);

        let resolver = |node: &Node, handle: Option<&str>| match (node.kind.as_str(), handle) {
            ("script", _) => HandleType::Text,
            ("image", Some("image")) => HandleType::Image,
            _ => HandleType::Other,
        };
        let painter = ConnectionPainter {
            config: &config,
            palette: &palette,
            resolver: &resolver,
            tool: ToolKind::Normal,
            hover: HoverState::default(),
            scale: 1.0,
            elapsed_secs: 0.0,
        };
        let layers = painter.paint_all(&routed, &index);
        assert_eq!(layers[0].data_type, HandleType::Text);
        assert_eq!(layers[1].data_type, HandleType::Image);
        assert_eq!(layers[0].highlight, Highlight::None);
    }

    #[test]
    fn test_cutter_hover_on_node_highlights_edges() {
        let config = CanvasConfig::default();
        let palette = ConnectionPalette::default();
        let (nodes, connections) = graph();
        let index = index_nodes(&nodes);
        let refs: Vec<&Connection> = connections.iter().collect();
        let routed = route_connections(&refs, &index, ConnectionStyle::Curved, &config);
        let resolver = |_: &Node, _: Option<&str>| HandleType::Other;

        let painter = ConnectionPainter {
            config: &config,
            palette: &palette,
            resolver: &resolver,
            tool: ToolKind::Cutter,
            hover: HoverState {
                connection: None,
                node: Some(nodes[2].id),
            },
            scale: 1.0,
            elapsed_secs: 0.0,
        };
        let layers = painter.paint_all(&routed, &index);
        assert_eq!(layers[0].highlight, Highlight::None);
        assert_eq!(layers[1].highlight, Highlight::Delete);
    }
}
