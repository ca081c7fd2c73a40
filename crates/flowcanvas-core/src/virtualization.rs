//! Viewport virtualization: pick the nodes, connections and groups worth
//! rendering for the current transform.

use crate::config::CanvasConfig;
use crate::graph::{Connection, Group, Node, NodeId};
use crate::transform::ViewTransform;
use kurbo::{Rect, Size};
use std::collections::HashSet;

/// Render subset of the graph.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VisibleSet<'a> {
    pub nodes: Vec<&'a Node>,
    pub connections: Vec<&'a Connection>,
}

impl VisibleSet<'_> {
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty() && self.connections.is_empty()
    }

    pub fn contains_node(&self, id: NodeId) -> bool {
        self.nodes.iter().any(|n| n.id == id)
    }
}

/// World-space rectangle covered by the viewport plus a screen-space buffer.
///
/// Returns `None` for an empty, negative or non-finite container, which
/// means nothing is visible.
pub fn visible_world_rect(transform: &ViewTransform, container: Size, buffer: f64) -> Option<Rect> {
    let usable = container.width.is_finite()
        && container.height.is_finite()
        && container.width > 0.0
        && container.height > 0.0;
    if !usable {
        return None;
    }
    let min = transform.to_world((-buffer, -buffer).into());
    let max = transform.to_world((container.width + buffer, container.height + buffer).into());
    Some(Rect::new(min.x, min.y, max.x, max.y))
}

/// Strict overlap: boxes that only share an edge do not intersect.
fn overlaps(a: Rect, b: Rect) -> bool {
    a.x0 < b.x1 && a.x1 > b.x0 && a.y0 < b.y1 && a.y1 > b.y0
}

/// Nodes whose effective box overlaps `world`.
pub fn visible_nodes<'a>(nodes: &'a [Node], world: Rect, header_height: f64) -> Vec<&'a Node> {
    nodes
        .iter()
        .filter(|n| overlaps(n.bounds(header_height), world))
        .collect()
}

/// Connections with at least one visible endpoint node.
pub fn visible_connections<'a>(
    connections: &'a [Connection],
    visible: &HashSet<NodeId>,
) -> Vec<&'a Connection> {
    connections
        .iter()
        .filter(|c| visible.contains(&c.from_node) || visible.contains(&c.to_node))
        .collect()
}

/// Caches the container size and filters the graph against it.
///
/// Filtering is a pure function of the inputs, so it is safe to call on
/// every frame.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Virtualizer {
    container: Size,
}

impl Virtualizer {
    pub fn new(container: Size) -> Self {
        Self { container }
    }

    /// Update the cached container size after a resize.
    pub fn resize(&mut self, container: Size) {
        if container != self.container {
            log::debug!("Viewport resized to {:?}", container);
        }
        self.container = container;
    }

    pub fn container(&self) -> Size {
        self.container
    }

    /// Visible world rectangle for `transform`.
    pub fn world_rect(&self, transform: &ViewTransform, config: &CanvasConfig) -> Option<Rect> {
        visible_world_rect(transform, self.container, config.virtualization_buffer)
    }

    /// Nodes and connections to render.
    pub fn visible<'a>(
        &self,
        nodes: &'a [Node],
        connections: &'a [Connection],
        transform: &ViewTransform,
        config: &CanvasConfig,
    ) -> VisibleSet<'a> {
        let Some(world) = self.world_rect(transform, config) else {
            log::debug!("Degenerate container {:?}, nothing visible", self.container);
            return VisibleSet::default();
        };

        let nodes = visible_nodes(nodes, world, config.collapsed_header_height);
        let ids: HashSet<NodeId> = nodes.iter().map(|n| n.id).collect();
        let connections = visible_connections(connections, &ids);
        log::trace!(
            "Virtualized to {} nodes, {} connections",
            nodes.len(),
            connections.len()
        );
        VisibleSet { nodes, connections }
    }

    /// Groups to render.
    pub fn visible_groups<'a>(
        &self,
        groups: &'a [Group],
        transform: &ViewTransform,
        config: &CanvasConfig,
    ) -> Vec<&'a Group> {
        match self.world_rect(transform, config) {
            Some(world) => groups.iter().filter(|g| overlaps(g.bounds(), world)).collect(),
            None => Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kurbo::{Point, Vec2};

    fn setup() -> (CanvasConfig, Virtualizer, ViewTransform) {
        (
            CanvasConfig::default(),
            Virtualizer::new(Size::new(800.0, 600.0)),
            ViewTransform::default(),
        )
    }

    #[test]
    fn test_world_rect_identity() {
        let (config, v, t) = setup();
        assert_eq!(
            v.world_rect(&t, &config),
            Some(Rect::new(-1000.0, -1000.0, 1800.0, 1600.0))
        );
    }

    #[test]
    fn test_buffer_grows_when_zoomed_out() {
        let (config, v, _) = setup();
        let t = ViewTransform::new(0.5, Vec2::ZERO, &config);
        assert_eq!(
            v.world_rect(&t, &config),
            Some(Rect::new(-2000.0, -2000.0, 3600.0, 3200.0))
        );
    }

    #[test]
    fn test_empty_inputs() {
        let (config, v, t) = setup();
        assert!(v.visible(&[], &[], &t, &config).is_empty());
    }

    #[test]
    fn test_zero_container_yields_nothing() {
        let config = CanvasConfig::default();
        let v = Virtualizer::new(Size::ZERO);
        let nodes = vec![Node::new("a", Point::ZERO, 100.0, 100.0)];
        assert!(v.visible(&nodes, &[], &ViewTransform::default(), &config).is_empty());

        let v = Virtualizer::new(Size::new(-5.0, 600.0));
        assert!(v.visible(&nodes, &[], &ViewTransform::default(), &config).is_empty());
    }

    #[test]
    fn test_edge_touching_boundaries() {
        let (config, v, t) = setup();
        // World rect is [-1000, 1800] x [-1000, 1600].
        let touching_left = Node::new("a", Point::new(-1100.0, 0.0), 100.0, 100.0);
        let overlapping_left = Node::new("b", Point::new(-1099.5, 0.0), 100.0, 100.0);
        let touching_right = Node::new("c", Point::new(1800.0, 0.0), 100.0, 100.0);
        let inside_right = Node::new("d", Point::new(1799.0, 0.0), 100.0, 100.0);
        let touching_bottom = Node::new("e", Point::new(0.0, 1600.0), 100.0, 100.0);
        let far_away = Node::new("f", Point::new(5000.0, 5000.0), 100.0, 100.0);
        let nodes = vec![
            touching_left.clone(),
            overlapping_left.clone(),
            touching_right.clone(),
            inside_right.clone(),
            touching_bottom.clone(),
            far_away.clone(),
        ];

        let visible = v.visible(&nodes, &[], &t, &config);
        assert!(!visible.contains_node(touching_left.id));
        assert!(visible.contains_node(overlapping_left.id));
        assert!(!visible.contains_node(touching_right.id));
        assert!(visible.contains_node(inside_right.id));
        assert!(!visible.contains_node(touching_bottom.id));
        assert!(!visible.contains_node(far_away.id));
    }

    #[test]
    fn test_connection_visible_if_either_end_visible() {
        let (config, v, t) = setup();
        let a = Node::new("a", Point::new(0.0, 0.0), 100.0, 100.0);
        let b = Node::new("b", Point::new(9000.0, 0.0), 100.0, 100.0);
        let c = Node::new("c", Point::new(-9000.0, 0.0), 100.0, 100.0);
        let ab = Connection::new(a.id, b.id);
        let ba = Connection::new(b.id, a.id);
        let bc = Connection::new(b.id, c.id);
        let nodes = vec![a, b, c];
        let connections = vec![ab.clone(), ba.clone(), bc.clone()];

        let visible = v.visible(&nodes, &connections, &t, &config);
        let ids: Vec<_> = visible.connections.iter().map(|c| c.id).collect();
        assert_eq!(ids, vec![ab.id, ba.id]);
    }

    #[test]
    fn test_collapsed_height_effect() {
        let (config, v, t) = setup();
        // Expanded, this node reaches into the visible rect from above.
        // Collapsed, its 40-unit header stays outside.
        let tall_collapsed =
            Node::new("a", Point::new(0.0, -1500.0), 100.0, 1000.0).collapsed(true);
        let tall_expanded = Node::new("b", Point::new(0.0, -1500.0), 100.0, 1000.0);
        // A stale negative stored height would put the box outside; the
        // collapsed header just inside the bottom edge is what counts.
        let header_inside = Node::new("c", Point::new(0.0, 1570.0), 100.0, -3000.0).collapsed(true);
        let stale_expanded = Node::new("d", Point::new(0.0, 1570.0), 100.0, -3000.0);
        let nodes = vec![
            tall_collapsed.clone(),
            tall_expanded.clone(),
            header_inside.clone(),
            stale_expanded.clone(),
        ];

        let visible = v.visible(&nodes, &[], &t, &config);
        assert!(!visible.contains_node(tall_collapsed.id));
        assert!(visible.contains_node(tall_expanded.id));
        assert!(visible.contains_node(header_inside.id));
        assert!(!visible.contains_node(stale_expanded.id));
    }

    #[test]
    fn test_collapsed_header_counts_near_bottom_edge() {
        let (config, v, t) = setup();
        // World rect bottom is y = 1600. Both nodes start 10 units above it.
        let collapsed = Node::new("a", Point::new(0.0, 1590.0), 100.0, 5000.0).collapsed(true);
        let expanded = Node::new("b", Point::new(0.0, 1590.0), 100.0, 5000.0);
        let below = Node::new("c", Point::new(0.0, 1600.0), 100.0, 5000.0).collapsed(true);
        let nodes = vec![collapsed.clone(), expanded.clone(), below.clone()];

        let visible = v.visible(&nodes, &[], &t, &config);
        assert!(visible.contains_node(collapsed.id));
        assert!(visible.contains_node(expanded.id));
        assert!(!visible.contains_node(below.id));
    }

    #[test]
    fn test_negative_size_group_excluded() {
        let (config, v, t) = setup();
        // Stored top-left is inside, but top + height lands above minY.
        let stale = Group::new("Stale", Point::new(0.0, 500.0), 400.0, -2000.0);
        let normal = Group::new("Scenes", Point::new(0.0, 500.0), 400.0, 300.0);
        let groups = vec![stale, normal.clone()];
        let visible = v.visible_groups(&groups, &t, &config);
        assert_eq!(visible.len(), 1);
        assert_eq!(visible[0].id, normal.id);
    }

    #[test]
    fn test_groups_follow_same_rule() {
        let (config, v, t) = setup();
        let near = Group::new("Scenes", Point::new(100.0, 100.0), 400.0, 300.0);
        let far = Group::new("Audio", Point::new(10_000.0, 0.0), 400.0, 300.0);
        let groups = vec![near.clone(), far];
        let visible = v.visible_groups(&groups, &t, &config);
        assert_eq!(visible.len(), 1);
        assert_eq!(visible[0].id, near.id);
    }

    #[test]
    fn test_resize_updates_rect() {
        let (config, mut v, t) = setup();
        v.resize(Size::new(100.0, 100.0));
        assert_eq!(
            v.world_rect(&t, &config),
            Some(Rect::new(-1000.0, -1000.0, 1100.0, 1100.0))
        );
    }
}
