//! Level 1: Basic Initialization Tests
//!
//! Tests an empty graph, default viewport and the demo graph fixture.

mod common;

use common::demo_system;
use slint_node_system::{
    NodeConfig, NodeSystem, Port, PortDataType, PortDirection, Position, Size, Viewport,
    PORT_HIT_RADIUS,
};

#[test]
fn test_empty_system() {
    let system = NodeSystem::new();
    assert_eq!(system.node_count(), 0);
    assert_eq!(system.connection_count(), 0);
    assert!(system.nodes().is_empty());
    assert!(system.connections().is_empty());
}

#[test]
fn test_default_viewport_is_identity() {
    let system = NodeSystem::default();
    assert_eq!(*system.viewport(), Viewport::default());
    assert_eq!(system.viewport().scale(), 1.0);
    assert_eq!(system.viewport().offset, Position::new(0.0, 0.0));

    let p = Position::new(42.0, -7.5);
    assert_eq!(system.world_to_screen(p), p);
    assert_eq!(system.screen_to_world(p), p);
}

#[test]
fn test_default_port_hit_radius() {
    let system = NodeSystem::new();
    assert_eq!(system.port_hit_radius(), PORT_HIT_RADIUS);
}

#[test]
fn test_demo_graph_contents() {
    let system = demo_system();

    assert_eq!(system.node_count(), 4);
    assert_eq!(system.connection_count(), 5);

    let ids: Vec<&str> = system.nodes().iter().map(|node| node.id()).collect();
    assert_eq!(ids, vec!["node1", "node2", "node3", "node4"]);

    let conn_ids: Vec<&str> = system.connections().iter().map(|conn| conn.id.as_str()).collect();
    assert_eq!(conn_ids, vec!["conn1", "conn2", "conn3", "conn4", "conn5"]);
}

#[test]
fn test_node_defaults() {
    let mut system = NodeSystem::new();
    let node = system.add_node(NodeConfig::new("n", "Label")).unwrap();

    assert_eq!(node.position(), Position::new(0.0, 0.0));
    assert_eq!(node.size(), Size::new(200.0, 100.0));
    assert_eq!(node.label(), "Label");
    assert!(node.inputs().is_empty());
    assert!(node.outputs().is_empty());
    assert!(node.data().is_empty());
}

#[test]
fn test_port_anchor_layout() {
    let system = demo_system();
    let node4 = system.get_node("node4").unwrap();

    // Inputs on the left edge, outputs on the right, 40 down then every 20
    assert_eq!(
        node4.port_position(PortDirection::Input, "in1").unwrap(),
        Position::new(400.0, 340.0)
    );
    assert_eq!(
        node4.port_position(PortDirection::Input, "in2").unwrap(),
        Position::new(400.0, 360.0)
    );
    assert_eq!(
        node4.port_position(PortDirection::Output, "out2").unwrap(),
        Position::new(600.0, 360.0)
    );
}

#[test]
fn test_port_lookup_distinguishes_direction() {
    let system = demo_system();
    let node2 = system.get_node("node2").unwrap();

    // node2 has input in1 and output out1, but no output in1
    assert!(node2.port_position(PortDirection::Input, "in1").is_ok());
    let err = node2.port_position(PortDirection::Output, "in1").unwrap_err();
    assert!(err.is_not_found());
    assert_eq!(err.to_string(), "output port in1 not found on node node2");
}

#[test]
fn test_custom_size_and_data() {
    let mut system = NodeSystem::new();
    let node = system
        .add_node(
            NodeConfig::new("big", "Big")
                .with_size(Size::new(320.0, 180.0))
                .with_input(Port::input("in", PortDataType::Object, "Payload"))
                .with_data("threshold", serde_json::json!(0.5)),
        )
        .unwrap();

    assert_eq!(node.size(), Size::new(320.0, 180.0));
    assert_eq!(node.data()["threshold"], serde_json::json!(0.5));
    assert_eq!(node.inputs()[0].data_type, PortDataType::Object);
}
