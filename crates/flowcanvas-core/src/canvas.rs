//! Canvas controller tying transform, gestures, virtualization and
//! connection interaction together.

use crate::config::CanvasConfig;
use crate::connection::{
    ConnectionCommands, ConnectionIntent, ConnectionLayers, ConnectionPainter, ConnectionPalette,
    ConnectionStyle, HandleTypeResolver, HoverState, RoutedConnection, click_intent, connection_at,
    route_connections,
};
use crate::drag::NodeDrag;
use crate::gesture::{GestureState, GestureUpdate};
use crate::graph::{Connection, Group, Node, NodeId, graph_bounds, index_nodes, node_at};
use crate::input::{InputEvent, MouseButton, PointerEvent, TouchEvent};
use crate::tools::ToolKind;
use crate::transform::ViewTransform;
use crate::virtualization::{VisibleSet, Virtualizer};
use kurbo::{Point, Size};

/// Read-only view of the host's graph for one update.
#[derive(Debug, Clone, Copy)]
pub struct CanvasGraph<'a> {
    pub nodes: &'a [Node],
    pub connections: &'a [Connection],
}

impl<'a> CanvasGraph<'a> {
    pub fn new(nodes: &'a [Node], connections: &'a [Connection]) -> Self {
        Self { nodes, connections }
    }
}

/// Outcome of one input event.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EventResponse {
    /// The view transform changed; re-render with [`CanvasController::transform`].
    pub transform_changed: bool,
    /// The host must suppress the platform's default scroll/zoom handling.
    pub prevent_default: bool,
    /// The event was handled by a connection and must not reach the canvas.
    pub consumed: bool,
    /// Connection edits for the host to apply.
    pub intents: Vec<ConnectionIntent>,
    /// A dragged node's new world position.
    pub node_moved: Option<(NodeId, Point)>,
}

impl EventResponse {
    /// Apply the collected intents to the host's graph.
    pub fn dispatch<C: ConnectionCommands + ?Sized>(&self, commands: &mut C) {
        for intent in &self.intents {
            intent.apply(commands);
        }
    }
}

/// Single owner of the view state for a canvas.
///
/// All handlers run synchronously and in dispatch order; there is no
/// buffering between an event and the transform it produces.
#[derive(Debug, Clone)]
pub struct CanvasController {
    config: CanvasConfig,
    transform: ViewTransform,
    gesture: GestureState,
    virtualizer: Virtualizer,
    tool: ToolKind,
    hover: HoverState,
    node_drag: Option<NodeDrag>,
    /// Routing style for connections.
    pub style: ConnectionStyle,
    pub palette: ConnectionPalette,
}

impl Default for CanvasController {
    fn default() -> Self {
        Self::new(CanvasConfig::default())
    }
}

impl CanvasController {
    pub fn new(config: CanvasConfig) -> Self {
        Self {
            config,
            transform: ViewTransform::default(),
            gesture: GestureState::Idle,
            virtualizer: Virtualizer::default(),
            tool: ToolKind::default(),
            hover: HoverState::default(),
            node_drag: None,
            style: ConnectionStyle::default(),
            palette: ConnectionPalette::default(),
        }
    }

    pub fn config(&self) -> &CanvasConfig {
        &self.config
    }

    pub fn transform(&self) -> ViewTransform {
        self.transform
    }

    /// Replace the transform (e.g. restored from a saved project). The scale
    /// is clamped like every other write.
    pub fn set_transform(&mut self, transform: ViewTransform) {
        self.transform = ViewTransform::new(transform.scale(), transform.translate(), &self.config);
    }

    pub fn gesture(&self) -> GestureState {
        self.gesture
    }

    pub fn tool(&self) -> ToolKind {
        self.tool
    }

    pub fn set_tool(&mut self, tool: ToolKind) {
        if tool != self.tool {
            log::debug!("Tool changed to {:?}", tool);
        }
        self.tool = tool;
        self.hover = HoverState::default();
    }

    pub fn hover(&self) -> HoverState {
        self.hover
    }

    pub fn container(&self) -> Size {
        self.virtualizer.container()
    }

    /// Update the cached container size after a resize.
    pub fn resize(&mut self, container: Size) {
        self.virtualizer.resize(container);
    }

    /// Convert a screen point to world coordinates.
    pub fn to_world(&self, screen: Point) -> Point {
        self.transform.to_world(screen)
    }

    /// Zoom to `scale` around a screen pivot.
    pub fn set_zoom(&mut self, scale: f64, pivot: Point) -> bool {
        self.transform.set_zoom(scale, pivot, &self.config)
    }

    pub fn zoom_in(&mut self) -> bool {
        self.transform.zoom_in(self.container(), &self.config)
    }

    pub fn zoom_out(&mut self) -> bool {
        self.transform.zoom_out(self.container(), &self.config)
    }

    pub fn reset_view(&mut self) {
        self.transform.reset();
    }

    /// Frame every node in the container.
    pub fn fit_to_content(&mut self, nodes: &[Node]) {
        match graph_bounds(nodes, self.config.collapsed_header_height) {
            Some(bounds) => self.transform.fit_to_bounds(
                bounds,
                self.container(),
                self.config.fit_padding,
                &self.config,
            ),
            None => self.transform.reset(),
        }
    }

    /// Nodes and connections to render this frame.
    pub fn visible<'a>(&self, graph: CanvasGraph<'a>) -> VisibleSet<'a> {
        self.virtualizer
            .visible(graph.nodes, graph.connections, &self.transform, &self.config)
    }

    pub fn visible_groups<'a>(&self, groups: &'a [Group]) -> Vec<&'a Group> {
        self.virtualizer
            .visible_groups(groups, &self.transform, &self.config)
    }

    /// Paint layers for every visible connection.
    pub fn connection_layers(
        &self,
        graph: CanvasGraph<'_>,
        resolver: &dyn HandleTypeResolver,
        elapsed_secs: f64,
    ) -> Vec<ConnectionLayers> {
        let visible = self.visible(graph);
        let index = index_nodes(graph.nodes);
        let routed = route_connections(&visible.connections, &index, self.style, &self.config);
        let painter = ConnectionPainter {
            config: &self.config,
            palette: &self.palette,
            resolver,
            tool: self.tool,
            hover: self.hover,
            scale: self.transform.scale(),
            elapsed_secs,
        };
        painter.paint_all(&routed, &index)
    }

    /// Feed one input event.
    pub fn handle(&mut self, event: &InputEvent, graph: CanvasGraph<'_>) -> EventResponse {
        match event {
            InputEvent::Pointer(pointer) => self.handle_pointer(pointer, graph),
            InputEvent::Touch(touch) => self.handle_touch(touch),
        }
    }

    fn routed_visible<'a>(&self, graph: CanvasGraph<'a>) -> Vec<RoutedConnection<'a>> {
        let visible = self.visible(graph);
        let index = index_nodes(graph.nodes);
        route_connections(&visible.connections, &index, self.style, &self.config)
    }

    fn hit_width(&self) -> f64 {
        self.config.hit_region_width / self.transform.scale()
    }

    fn update_hover(&mut self, world: Point, graph: CanvasGraph<'_>) {
        let routed = self.routed_visible(graph);
        self.hover = HoverState {
            connection: connection_at(&routed, world, self.hit_width()).map(|r| r.connection.id),
            node: node_at(graph.nodes, world, self.config.collapsed_header_height).map(|n| n.id),
        };
    }

    fn apply_gesture(&mut self, update: GestureUpdate, response: &mut EventResponse) {
        self.gesture = update.state;
        if let Some(transform) = update.transform {
            if transform != self.transform {
                log::trace!(
                    "Transform scale {:.3} translate {:?}",
                    transform.scale(),
                    transform.translate()
                );
                self.transform = transform;
                response.transform_changed = true;
            }
        }
    }

    fn handle_pointer(&mut self, event: &PointerEvent, graph: CanvasGraph<'_>) -> EventResponse {
        let mut response = EventResponse::default();
        let world = self.to_world(event.position());

        match event {
            PointerEvent::Down { button, .. } => {
                let routed = self.routed_visible(graph);
                if let Some(hit) = connection_at(&routed, world, self.hit_width()) {
                    // Connection clicks never start a pan or clear selection.
                    response.consumed = true;
                    response.prevent_default = true;
                    if let Some(intent) = click_intent(self.tool, hit.connection.id, world) {
                        log::debug!("Connection intent {:?}", intent);
                        response.intents.push(intent);
                    }
                    return response;
                }

                if *button == MouseButton::Left && self.tool == ToolKind::Normal {
                    let header = self.config.collapsed_header_height;
                    if let Some(node) = node_at(graph.nodes, world, header) {
                        log::debug!("Node drag start {}", node.id);
                        self.node_drag = Some(NodeDrag::new(node, world));
                        response.prevent_default = true;
                        return response;
                    }
                }

                let update = self.gesture.on_pointer(event, &self.transform, &self.config);
                self.apply_gesture(update, &mut response);
                response.prevent_default = true;
            }
            PointerEvent::Move { .. } => {
                if let Some(drag) = self.node_drag.as_mut() {
                    let position = drag.update(world);
                    response.node_moved = Some((drag.node_id, position));
                    response.prevent_default = true;
                    return response;
                }
                if self.gesture.is_active() {
                    let update = self.gesture.on_pointer(event, &self.transform, &self.config);
                    self.apply_gesture(update, &mut response);
                    response.prevent_default = true;
                } else {
                    self.update_hover(world, graph);
                }
            }
            PointerEvent::Up { .. } => {
                if let Some(drag) = self.node_drag.take() {
                    log::debug!("Node drag end {}", drag.node_id);
                }
                let update = self.gesture.on_pointer(event, &self.transform, &self.config);
                self.apply_gesture(update, &mut response);
            }
            PointerEvent::Scroll { .. } => {
                let update = self.gesture.on_pointer(event, &self.transform, &self.config);
                self.apply_gesture(update, &mut response);
                response.prevent_default = true;
            }
        }
        response
    }

    fn handle_touch(&mut self, event: &TouchEvent) -> EventResponse {
        let mut response = EventResponse::default();
        // Touch takes over from any mouse-driven node drag.
        self.node_drag = None;
        let was_active = self.gesture.is_active();
        let update = self.gesture.on_touch(event, &self.transform, &self.config);
        self.apply_gesture(update, &mut response);
        response.prevent_default = was_active || self.gesture.is_active();
        response
    }
}
