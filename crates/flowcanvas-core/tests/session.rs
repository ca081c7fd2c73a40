//! Drives a full mouse, wheel and touch session through the controller.

use flowcanvas_core::{
    CanvasController, CanvasGraph, Connection, ConnectionCommands, ConnectionId, GestureState,
    InputEvent, MouseButton, Node, PointerEvent, ToolKind, TouchEvent, TouchPhase,
};
use kurbo::{Point, Size, Vec2};

#[derive(Default)]
struct Graph {
    nodes: Vec<Node>,
    connections: Vec<Connection>,
}

impl ConnectionCommands for Graph {
    fn delete_connection(&mut self, id: ConnectionId) {
        self.connections.retain(|c| c.id != id);
    }

    fn split_connection(&mut self, id: ConnectionId, at: Point) {
        let Some(pos) = self.connections.iter().position(|c| c.id == id) else {
            return;
        };
        let old = self.connections.remove(pos);
        let reroute = Node::new("reroute", at, 20.0, 20.0);
        self.connections.push(Connection::new(old.from_node, reroute.id));
        self.connections.push(Connection::new(reroute.id, old.to_node));
        self.nodes.push(reroute);
    }
}

fn pipeline() -> Graph {
    let script = Node::new("script", Point::new(0.0, 0.0), 100.0, 100.0).with_outputs(["text"]);
    let speech = Node::new("speech", Point::new(300.0, 0.0), 100.0, 100.0).with_inputs(["text"]);
    let far = Node::new("image", Point::new(50_000.0, 0.0), 100.0, 100.0).with_inputs(["prompt"]);
    let connections = vec![
        Connection::between_handles(script.id, "text", speech.id, "text"),
        Connection::between_handles(script.id, "text", far.id, "prompt"),
    ];
    Graph {
        nodes: vec![script, speech, far],
        connections,
    }
}

fn pointer(event: PointerEvent) -> InputEvent {
    event.into()
}

fn assert_point_eq(a: Point, b: Point) {
    assert!((a.x - b.x).abs() < 1e-9, "{:?} != {:?}", a, b);
    assert!((a.y - b.y).abs() < 1e-9, "{:?} != {:?}", a, b);
}

#[test]
fn test_full_session() {
    let _ = env_logger::builder().is_test(true).try_init();

    let mut graph = pipeline();
    let mut canvas = CanvasController::default();
    canvas.resize(Size::new(1024.0, 768.0));

    // Far node is culled but its edge from a visible node survives.
    {
        let g = CanvasGraph::new(&graph.nodes, &graph.connections);
        let visible = canvas.visible(g);
        assert_eq!(visible.nodes.len(), 2);
        assert_eq!(visible.connections.len(), 2);
    }

    // Wheel zoom in at (500, 500).
    {
        let g = CanvasGraph::new(&graph.nodes, &graph.connections);
        let before = canvas.to_world(Point::new(500.0, 500.0));
        let r = canvas.handle(
            &pointer(PointerEvent::Scroll {
                position: Point::new(500.0, 500.0),
                delta: Vec2::new(0.0, -120.0),
            }),
            g,
        );
        assert!(r.transform_changed && r.prevent_default);
        assert!((canvas.transform().scale() - 1.1).abs() < 1e-12);
        assert_point_eq(canvas.to_world(Point::new(500.0, 500.0)), before);
    }

    // Two-finger pinch from distance 100 to 400 hits the ceiling.
    {
        let g = CanvasGraph::new(&graph.nodes, &graph.connections);
        let a = Point::new(600.0, 600.0);
        let b = Point::new(700.0, 600.0);
        let anchor = canvas.to_world(a.midpoint(b));
        canvas.handle(&TouchEvent::new(TouchPhase::Start, vec![a]).into(), g);
        canvas.handle(&TouchEvent::new(TouchPhase::Start, vec![a, b]).into(), g);
        assert!(matches!(canvas.gesture(), GestureState::Pinching { .. }));

        let a2 = Point::new(450.0, 600.0);
        let b2 = Point::new(850.0, 600.0);
        let r = canvas.handle(&TouchEvent::new(TouchPhase::Move, vec![a2, b2]).into(), g);
        assert!(r.transform_changed && r.prevent_default);
        assert_eq!(canvas.transform().scale(), 2.0);
        assert_point_eq(canvas.to_world(a2.midpoint(b2)), anchor);

        // Lift one finger: fresh pan anchored at the remaining finger.
        canvas.handle(&TouchEvent::new(TouchPhase::End, vec![b2]).into(), g);
        let translate = canvas.transform().translate();
        canvas.handle(
            &TouchEvent::new(TouchPhase::Move, vec![b2 + Vec2::new(10.0, 0.0)]).into(),
            g,
        );
        assert!((canvas.transform().translate().x - (translate.x + 10.0)).abs() < 1e-9);
        canvas.handle(&TouchEvent::new(TouchPhase::End, vec![]).into(), g);
        assert_eq!(canvas.gesture(), GestureState::Idle);
    }

    // Reset and split an edge with the reroute tool. Both edges leave the
    // script node along y = 50; the one drawn last (to the far node) is on
    // top and takes the click.
    canvas.reset_view();
    canvas.set_tool(ToolKind::Reroute);
    let r = {
        let g = CanvasGraph::new(&graph.nodes, &graph.connections);
        canvas.handle(
            &pointer(PointerEvent::Down {
                position: Point::new(200.0, 50.0),
                button: MouseButton::Left,
            }),
            g,
        )
    };
    assert!(r.consumed);
    assert_eq!(r.intents.len(), 1);
    assert_eq!(r.intents[0].connection(), graph.connections[1].id);
    r.dispatch(&mut graph);
    assert_eq!(graph.nodes.len(), 4);
    assert_eq!(graph.connections.len(), 3);

    // Cut the new edge into the reroute node. Its curve runs from (100, 50)
    // to (200, 60) and passes through (150, 55) at t = 0.5.
    canvas.set_tool(ToolKind::Cutter);
    let reroute_id = graph.nodes[3].id;
    let r = {
        let g = CanvasGraph::new(&graph.nodes, &graph.connections);
        canvas.handle(
            &pointer(PointerEvent::Down {
                position: Point::new(150.0, 55.0),
                button: MouseButton::Left,
            }),
            g,
        )
    };
    assert!(r.consumed);
    let cut = r.intents[0].connection();
    let cut_edge = graph.connections.iter().find(|c| c.id == cut).unwrap();
    assert_eq!(cut_edge.to_node, reroute_id);
    r.dispatch(&mut graph);
    assert_eq!(graph.connections.len(), 2);
    assert_eq!(canvas.gesture(), GestureState::Idle);
}
