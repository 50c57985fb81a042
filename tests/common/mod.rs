//! Common test utilities for integration tests.

#![allow(dead_code)]

use slint_node_system::{
    EventKind, NodeConfig, NodeSystem, NodeSystemEvent, Port, PortDataType, PortRef, Position,
};
use std::cell::RefCell;
use std::rc::Rc;

/// Build the demo graph used across the integration tests.
///
/// ```text
///            +-> node2 --> node3
///   node1 ---+
///            +-> node4 (twice, into in1 and in2)
/// ```
pub fn demo_system() -> NodeSystem {
    let mut system = NodeSystem::new();

    system
        .add_node(
            NodeConfig::new("node1", "Source")
                .at(Position::new(100.0, 100.0))
                .with_output(Port::output("out1", PortDataType::Number, "Number"))
                .with_output(Port::output("out2", PortDataType::String, "Text")),
        )
        .unwrap();
    system
        .add_node(
            NodeConfig::new("node2", "Process")
                .at(Position::new(400.0, 100.0))
                .with_input(Port::input("in1", PortDataType::Number, "Number"))
                .with_input(Port::input("in2", PortDataType::String, "Text"))
                .with_output(Port::output("out1", PortDataType::Any, "Result")),
        )
        .unwrap();
    system
        .add_node(
            NodeConfig::new("node3", "Output")
                .at(Position::new(700.0, 100.0))
                .with_input(Port::input("in1", PortDataType::Any, "Value")),
        )
        .unwrap();
    system
        .add_node(
            NodeConfig::new("node4", "Math")
                .at(Position::new(400.0, 300.0))
                .with_input(Port::input("in1", PortDataType::Number, "A"))
                .with_input(Port::input("in2", PortDataType::Number, "B"))
                .with_output(Port::output("out1", PortDataType::Number, "Sum"))
                .with_output(Port::output("out2", PortDataType::Number, "Product")),
        )
        .unwrap();

    for (id, from, to) in [
        ("conn1", ("node1", "out1"), ("node2", "in1")),
        ("conn2", ("node1", "out2"), ("node2", "in2")),
        ("conn3", ("node2", "out1"), ("node3", "in1")),
        ("conn4", ("node1", "out1"), ("node4", "in1")),
        ("conn5", ("node1", "out1"), ("node4", "in2")),
    ] {
        let (from, to) = (PortRef::output(from.0, from.1), PortRef::input(to.0, to.1));
        system.create_connection(&from, &to, Some(id)).unwrap();
    }

    system
}

/// Two unconnected nodes: `A` with output `o1` at the origin, `B` with
/// input `i1` at (300, 0).
pub fn pair_system() -> NodeSystem {
    let mut system = NodeSystem::new();
    system
        .add_node(
            NodeConfig::new("A", "A").with_output(Port::output("o1", PortDataType::Number, "out")),
        )
        .unwrap();
    system
        .add_node(
            NodeConfig::new("B", "B")
                .at(Position::new(300.0, 0.0))
                .with_input(Port::input("i1", PortDataType::Number, "in"))
                .with_output(Port::output("o1", PortDataType::Number, "out")),
        )
        .unwrap();
    system
}

/// Records every event of the kinds it is attached to.
#[derive(Default, Clone)]
pub struct EventRecorder {
    pub events: Rc<RefCell<Vec<NodeSystemEvent>>>,
}

impl EventRecorder {
    /// Subscribe to every event kind.
    pub fn attach(system: &NodeSystem) -> Self {
        let recorder = Self::default();
        for kind in [
            EventKind::ConnectionDragStart,
            EventKind::ConnectionDragMove,
            EventKind::ConnectionDragEnd,
            EventKind::ConnectionCreated,
            EventKind::ConnectionCreateFailed,
        ] {
            let sink = recorder.events.clone();
            system.on(kind, move |event| sink.borrow_mut().push(event.clone()));
        }
        recorder
    }

    pub fn kinds(&self) -> Vec<EventKind> {
        self.events.borrow().iter().map(NodeSystemEvent::kind).collect()
    }

    pub fn count(&self, kind: EventKind) -> usize {
        self.events.borrow().iter().filter(|event| event.kind() == kind).count()
    }

    pub fn clear(&self) {
        self.events.borrow_mut().clear();
    }
}
