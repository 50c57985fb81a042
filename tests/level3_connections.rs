//! Level 3: Connection Tests
//!
//! Tests connection creation, cycle rejection, adjacency queries, events and
//! validation.

mod common;

use common::{demo_system, pair_system, EventRecorder};
use proptest::prelude::*;
use slint_node_system::{
    connection_id, validate_connection, BasicConnectionValidator, CompositeValidator, Connection,
    ConnectionManager, DataTypeValidator, Endpoint, EventKind, GraphError, NodeConfig, NodeSystem,
    NodeSystemEvent, PortRef, ValidationError, ValidationResult,
};

// ============================================================================
// Creation
// ============================================================================

#[test]
fn test_create_connection_fires_created_once() {
    let mut system = pair_system();
    let recorder = EventRecorder::attach(&system);

    let connection = system
        .create_connection(&PortRef::output("A", "o1"), &PortRef::input("B", "i1"), None)
        .unwrap();

    assert_eq!(connection.id, "A-o1-B-i1");
    assert_eq!(
        connection.id,
        connection_id(&PortRef::output("A", "o1"), &PortRef::input("B", "i1"))
    );
    assert_eq!(recorder.kinds(), vec![EventKind::ConnectionCreated]);
    assert_eq!(
        recorder.events.borrow()[0],
        NodeSystemEvent::ConnectionCreated(slint_node_system::ConnectionCreated {
            connection: connection.clone()
        })
    );
}

#[test]
fn test_explicit_id_is_used() {
    let mut system = pair_system();
    let connection = system
        .create_connection(&PortRef::output("A", "o1"), &PortRef::input("B", "i1"), Some("wire"))
        .unwrap();
    assert_eq!(connection.id, "wire");
    assert!(system.get_connection("wire").is_ok());
}

#[test]
fn test_cycle_is_rejected() {
    let mut system = pair_system();
    system
        .create_connection(&PortRef::output("A", "o1"), &PortRef::input("B", "i1"), None)
        .unwrap();

    let back = Connection::new("back", Endpoint::new("B", "o1"), Endpoint::new("A", "anything"));
    let err = system.add_connection(back).unwrap_err();
    assert_eq!(
        err,
        GraphError::CycleDetected {
            from: "B".into(),
            to: "A".into()
        }
    );
    assert_eq!(system.connection_count(), 1);
}

#[test]
fn test_failed_create_emits_reason() {
    let mut system = pair_system();
    system
        .create_connection(&PortRef::output("A", "o1"), &PortRef::input("B", "i1"), None)
        .unwrap();
    let recorder = EventRecorder::attach(&system);

    let err = system
        .create_connection(&PortRef::output("A", "o1"), &PortRef::input("B", "i1"), None)
        .unwrap_err();
    assert!(err.is_conflict());

    match &recorder.events.borrow()[..] {
        [NodeSystemEvent::ConnectionCreateFailed(failed)] => {
            assert_eq!(failed.from_port, PortRef::output("A", "o1"));
            assert_eq!(failed.to_port, PortRef::input("B", "i1"));
            assert_eq!(failed.reason, err.to_string());
        }
        other => panic!("unexpected events {:?}", other),
    };
}

#[test]
fn test_add_connection_requires_nodes() {
    let mut system = pair_system();
    let dangling = Connection::new("d", Endpoint::new("A", "o1"), Endpoint::new("Z", "i1"));
    assert_eq!(
        system.add_connection(dangling).unwrap_err(),
        GraphError::NodeNotFound("Z".into())
    );
    assert_eq!(system.connection_count(), 0);
}

#[test]
fn test_remove_connection_is_idempotent() {
    let mut system = demo_system();
    assert!(system.remove_connection("conn3"));
    assert!(!system.remove_connection("conn3"));
    assert!(system.get_connection("conn3").unwrap_err().is_not_found());
    assert_eq!(system.connection_count(), 4);
}

// ============================================================================
// Queries
// ============================================================================

#[test]
fn test_connection_exists_is_directional() {
    let system = demo_system();
    let from = PortRef::output("node1", "out1");
    let to = PortRef::input("node2", "in1");
    assert!(system.connection_exists(&from, &to));
    assert!(!system.connection_exists(
        &PortRef::output("node2", "in1"),
        &PortRef::input("node1", "out1")
    ));
}

#[test]
fn test_adjacency_queries() {
    let system = demo_system();
    let connections = system.connections();

    let from_node1: Vec<&str> = connections
        .outputs_of("node1", None)
        .into_iter()
        .map(|conn| conn.id.as_str())
        .collect();
    assert_eq!(from_node1, vec!["conn1", "conn2", "conn4", "conn5"]);

    assert_eq!(connections.outputs_of("node1", Some("out1")).len(), 3);
    assert_eq!(connections.inputs_of("node4", None).len(), 2);
    assert_eq!(connections.inputs_of("node4", Some("in2"))[0].id, "conn5");
    assert!(connections.inputs_of("node1", None).is_empty());
}

#[test]
fn test_transitive_cycle_detection() {
    let system = demo_system();
    // node1 -> node2 -> node3, so node3 -> node1 closes a cycle
    assert!(system.connections().would_create_cycle("node3", "node1"));
    assert!(!system.connections().would_create_cycle("node3", "node4"));
}

// ============================================================================
// Validation
// ============================================================================

#[test]
fn test_standard_validator_rules() {
    let system = demo_system();
    let validator = CompositeValidator::standard();

    let check = |from: PortRef, to: PortRef| validate_connection(&from, &to, &system, &validator);

    assert_eq!(
        check(PortRef::output("node2", "out1"), PortRef::input("node2", "in1")),
        ValidationResult::Invalid(ValidationError::SameNode)
    );
    assert_eq!(
        check(PortRef::input("node2", "in1"), PortRef::input("node3", "in1")),
        ValidationResult::Invalid(ValidationError::SourceNotOutput)
    );
    assert_eq!(
        check(PortRef::output("node1", "out1"), PortRef::output("node2", "out1")),
        ValidationResult::Invalid(ValidationError::TargetNotInput)
    );
    assert_eq!(
        check(PortRef::output("node1", "out1"), PortRef::input("node2", "in1")),
        ValidationResult::Invalid(ValidationError::DuplicateConnection)
    );
    assert!(check(PortRef::output("node4", "out1"), PortRef::input("node3", "in1")).is_valid());
}

#[test]
fn test_missing_port_is_reported() {
    let system = demo_system();
    let result = validate_connection(
        &PortRef::output("node1", "out9"),
        &PortRef::input("node3", "in1"),
        &system,
        &BasicConnectionValidator,
    );
    assert_eq!(
        result,
        ValidationResult::Invalid(ValidationError::PortNotFound(PortRef::output("node1", "out9")))
    );
}

#[test]
fn test_data_type_validator() {
    let system = demo_system();
    let validator = CompositeValidator::standard().add(DataTypeValidator);

    // number -> string
    let mismatch = validate_connection(
        &PortRef::output("node4", "out1"),
        &PortRef::input("node2", "in2"),
        &system,
        &validator,
    );
    assert_eq!(
        mismatch.into_result().unwrap_err().to_string(),
        "Type mismatch: cannot connect number to string"
    );

    // number -> any
    assert!(validate_connection(
        &PortRef::output("node4", "out1"),
        &PortRef::input("node3", "in1"),
        &system,
        &validator,
    )
    .is_valid());
}

// ============================================================================
// Properties
// ============================================================================

/// Is the node-level graph acyclic? Kahn's algorithm over node ids 0..n.
fn is_acyclic(manager: &ConnectionManager, n: usize) -> bool {
    let mut in_degree = vec![0usize; n];
    let edges: Vec<(usize, usize)> = manager
        .iter()
        .map(|conn| (conn.from.node_id.parse().unwrap(), conn.to.node_id.parse().unwrap()))
        .collect();
    for &(_, to) in &edges {
        in_degree[to] += 1;
    }

    let mut ready: Vec<usize> = (0..n).filter(|&i| in_degree[i] == 0).collect();
    let mut visited = 0;
    while let Some(node) = ready.pop() {
        visited += 1;
        for &(from, to) in &edges {
            if from == node {
                in_degree[to] -= 1;
                if in_degree[to] == 0 {
                    ready.push(to);
                }
            }
        }
    }
    visited == n
}

proptest! {
    #[test]
    fn committed_connections_stay_acyclic(
        edges in proptest::collection::vec((0usize..8, 0usize..8), 0..40),
    ) {
        let mut system = NodeSystem::new();
        for i in 0..8 {
            system.add_node(NodeConfig::new(i.to_string(), "n")).unwrap();
        }

        for (index, (from, to)) in edges.into_iter().enumerate() {
            let before = system.connection_count();
            let candidate = Connection::new(
                format!("e{}", index),
                Endpoint::new(from.to_string(), "out"),
                Endpoint::new(to.to_string(), "in"),
            );
            let closes_cycle = system
                .connections()
                .would_create_cycle(&from.to_string(), &to.to_string());

            match system.add_connection(candidate) {
                Ok(()) => prop_assert!(!closes_cycle),
                Err(err) => {
                    let is_cycle = matches!(err, GraphError::CycleDetected { .. });
                    prop_assert!(is_cycle);
                    prop_assert_eq!(system.connection_count(), before);
                }
            }
            prop_assert!(is_acyclic(system.connections(), 8));
        }
    }
}
