//! Nodes and their ports.
//!
//! A [`Node`] owns its geometry and two ordered port lists. Port anchors are
//! derived from the node rectangle by [`Node::port_position`]; routing,
//! hit-testing and rendering all go through that one function.

use std::collections::HashMap;
use std::fmt;

use serde_json::Value;

use crate::connection::Endpoint;
use crate::error::{GraphError, Result};
use crate::geometry::{Position, Rect, Size};

/// Default node extents when the config leaves the size out.
pub const DEFAULT_NODE_SIZE: Size = Size::new(200.0, 100.0);
/// Vertical offset of the first port anchor from the node's top edge.
pub const PORT_START_Y: f32 = 40.0;
/// Vertical distance between consecutive port anchors.
pub const PORT_SPACING: f32 = 20.0;

/// Which side of a connection a port sits on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PortDirection {
    Input,
    Output,
}

impl PortDirection {
    pub fn opposite(self) -> Self {
        match self {
            Self::Input => Self::Output,
            Self::Output => Self::Input,
        }
    }
}

impl fmt::Display for PortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Input => write!(f, "input"),
            Self::Output => write!(f, "output"),
        }
    }
}

/// Data type tag carried by a port.
///
/// The graph never enforces it; see `DataTypeValidator` for an opt-in check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PortDataType {
    #[default]
    Any,
    Number,
    String,
    Boolean,
    Object,
    Array,
}

impl PortDataType {
    /// `Any` is compatible with everything, other tags only with themselves.
    pub fn is_compatible_with(self, other: PortDataType) -> bool {
        self == Self::Any || other == Self::Any || self == other
    }
}

impl fmt::Display for PortDataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Any => "any",
            Self::Number => "number",
            Self::String => "string",
            Self::Boolean => "boolean",
            Self::Object => "object",
            Self::Array => "array",
        };
        f.write_str(name)
    }
}

/// A named attachment point on a node.
#[derive(Debug, Clone, PartialEq)]
pub struct Port {
    pub id: String,
    pub direction: PortDirection,
    pub data_type: PortDataType,
    pub label: String,
}

impl Port {
    pub fn new(
        id: impl Into<String>,
        direction: PortDirection,
        data_type: PortDataType,
        label: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            direction,
            data_type,
            label: label.into(),
        }
    }

    pub fn input(id: impl Into<String>, data_type: PortDataType, label: impl Into<String>) -> Self {
        Self::new(id, PortDirection::Input, data_type, label)
    }

    pub fn output(
        id: impl Into<String>,
        data_type: PortDataType,
        label: impl Into<String>,
    ) -> Self {
        Self::new(id, PortDirection::Output, data_type, label)
    }
}

/// Everything needed to construct a [`Node`].
///
/// # Example
///
/// ```
/// use slint_node_system::{NodeConfig, Port, PortDataType, Position};
///
/// let config = NodeConfig::new("sum", "Sum")
///     .at(Position::new(400.0, 300.0))
///     .with_input(Port::input("a", PortDataType::Number, "A"))
///     .with_input(Port::input("b", PortDataType::Number, "B"))
///     .with_output(Port::output("out", PortDataType::Number, "A + B"));
/// assert_eq!(config.inputs.len(), 2);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct NodeConfig {
    pub id: String,
    pub position: Position,
    pub size: Option<Size>,
    pub label: String,
    pub inputs: Vec<Port>,
    pub outputs: Vec<Port>,
    pub data: HashMap<String, Value>,
}

impl NodeConfig {
    pub fn new(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            position: Position::default(),
            size: None,
            label: label.into(),
            inputs: Vec::new(),
            outputs: Vec::new(),
            data: HashMap::new(),
        }
    }

    pub fn at(mut self, position: Position) -> Self {
        self.position = position;
        self
    }

    pub fn with_size(mut self, size: Size) -> Self {
        self.size = Some(size);
        self
    }

    /// Append a port to the input list. The port's own direction is
    /// overwritten so it always matches the list it lives in.
    pub fn with_input(mut self, mut port: Port) -> Self {
        port.direction = PortDirection::Input;
        self.inputs.push(port);
        self
    }

    /// Append a port to the output list, forcing its direction to output.
    pub fn with_output(mut self, mut port: Port) -> Self {
        port.direction = PortDirection::Output;
        self.outputs.push(port);
        self
    }

    pub fn with_data(mut self, key: impl Into<String>, value: Value) -> Self {
        self.data.insert(key.into(), value);
        self
    }
}

/// A positioned, ported graph node.
///
/// The id and the port lists are fixed at construction; position, size,
/// label and payload data are mutable.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    id: String,
    position: Position,
    size: Size,
    label: String,
    inputs: Vec<Port>,
    outputs: Vec<Port>,
    data: HashMap<String, Value>,
}

impl Node {
    /// Build a node from its config.
    ///
    /// Fails with [`GraphError::DuplicatePort`] if two ports in the same
    /// direction list share an id.
    pub fn new(config: NodeConfig) -> Result<Self> {
        ensure_unique_ports(&config.id, PortDirection::Input, &config.inputs)?;
        ensure_unique_ports(&config.id, PortDirection::Output, &config.outputs)?;

        Ok(Self {
            id: config.id,
            position: config.position,
            size: config.size.unwrap_or(DEFAULT_NODE_SIZE),
            label: config.label,
            inputs: config.inputs,
            outputs: config.outputs,
            data: config.data,
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn position(&self) -> Position {
        self.position
    }

    pub fn size(&self) -> Size {
        self.size
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn inputs(&self) -> &[Port] {
        &self.inputs
    }

    pub fn outputs(&self) -> &[Port] {
        &self.outputs
    }

    pub fn ports(&self, direction: PortDirection) -> &[Port] {
        match direction {
            PortDirection::Input => &self.inputs,
            PortDirection::Output => &self.outputs,
        }
    }

    pub fn port(&self, direction: PortDirection, port_id: &str) -> Option<&Port> {
        self.ports(direction).iter().find(|port| port.id == port_id)
    }

    pub fn data(&self) -> &HashMap<String, Value> {
        &self.data
    }

    pub fn data_mut(&mut self) -> &mut HashMap<String, Value> {
        &mut self.data
    }

    pub fn bounds(&self) -> Rect {
        Rect::from_position_size(self.position, self.size)
    }

    pub fn set_position(&mut self, position: Position) {
        self.position = position;
    }

    /// Replace the size. Negative extents are accepted as-is and make
    /// [`contains_point`](Self::contains_point) match nothing on that axis.
    pub fn set_size(&mut self, size: Size) {
        self.size = size;
    }

    pub fn set_label(&mut self, label: impl Into<String>) {
        self.label = label.into();
    }

    pub fn translate(&mut self, dx: f32, dy: f32) {
        self.position = self.position.offset(dx, dy);
    }

    /// World-space anchor of a port.
    ///
    /// Inputs sit on the left edge, outputs on the right edge, the n-th port
    /// at `top + PORT_START_Y + n * PORT_SPACING`.
    pub fn port_position(&self, direction: PortDirection, port_id: &str) -> Result<Position> {
        let index = self
            .ports(direction)
            .iter()
            .position(|port| port.id == port_id)
            .ok_or_else(|| GraphError::PortNotFound {
                node_id: self.id.clone(),
                port_id: port_id.to_string(),
                direction,
            })?;
        Ok(self.port_anchor(direction, index))
    }

    /// Anchors of every port in one direction, in list order.
    pub fn port_anchors(
        &self,
        direction: PortDirection,
    ) -> impl Iterator<Item = (&Port, Position)> + '_ {
        self.ports(direction)
            .iter()
            .enumerate()
            .map(move |(index, port)| (port, self.port_anchor(direction, index)))
    }

    fn port_anchor(&self, direction: PortDirection, index: usize) -> Position {
        let x = match direction {
            PortDirection::Input => self.position.x,
            PortDirection::Output => self.position.x + self.size.width,
        };
        Position::new(x, self.position.y + PORT_START_Y + index as f32 * PORT_SPACING)
    }

    /// Inclusive bounding-box test in world space.
    pub fn contains_point(&self, point: Position) -> bool {
        self.bounds().contains(point)
    }
}

/// Transient reference to one port, produced by hit-testing and consumed by
/// connection creation. Never stored in the graph.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PortRef {
    pub node_id: String,
    pub port_id: String,
    pub direction: PortDirection,
}

impl PortRef {
    pub fn new(
        node_id: impl Into<String>,
        port_id: impl Into<String>,
        direction: PortDirection,
    ) -> Self {
        Self {
            node_id: node_id.into(),
            port_id: port_id.into(),
            direction,
        }
    }

    pub fn input(node_id: impl Into<String>, port_id: impl Into<String>) -> Self {
        Self::new(node_id, port_id, PortDirection::Input)
    }

    pub fn output(node_id: impl Into<String>, port_id: impl Into<String>) -> Self {
        Self::new(node_id, port_id, PortDirection::Output)
    }

    pub fn endpoint(&self) -> Endpoint {
        Endpoint::new(self.node_id.clone(), self.port_id.clone())
    }
}

fn ensure_unique_ports(node_id: &str, direction: PortDirection, ports: &[Port]) -> Result<()> {
    for (i, port) in ports.iter().enumerate() {
        if ports[..i].iter().any(|other| other.id == port.id) {
            return Err(GraphError::DuplicatePort {
                node_id: node_id.to_string(),
                port_id: port.id.clone(),
                direction,
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn processing_node() -> Node {
        Node::new(
            NodeConfig::new("node2", "Process")
                .at(Position::new(400.0, 100.0))
                .with_input(Port::input("in1", PortDataType::Number, "Input"))
                .with_input(Port::input("in2", PortDataType::String, "Text"))
                .with_output(Port::output("out1", PortDataType::Any, "Result")),
        )
        .unwrap()
    }

    #[test]
    fn test_default_size() {
        let node = Node::new(NodeConfig::new("n", "N")).unwrap();
        assert_eq!(node.size(), DEFAULT_NODE_SIZE);
        assert_eq!(node.position(), Position::default());
        assert!(node.data().is_empty());
    }

    #[test]
    fn test_input_port_positions() {
        let node = processing_node();
        assert_eq!(
            node.port_position(PortDirection::Input, "in1").unwrap(),
            Position::new(400.0, 140.0)
        );
        assert_eq!(
            node.port_position(PortDirection::Input, "in2").unwrap(),
            Position::new(400.0, 160.0)
        );
    }

    #[test]
    fn test_output_port_position_uses_right_edge() {
        let node = processing_node();
        assert_eq!(
            node.port_position(PortDirection::Output, "out1").unwrap(),
            Position::new(600.0, 140.0)
        );
    }

    #[test]
    fn test_port_lookup_is_direction_specific() {
        let node = processing_node();
        let err = node.port_position(PortDirection::Output, "in1").unwrap_err();
        assert_eq!(
            err,
            GraphError::PortNotFound {
                node_id: "node2".into(),
                port_id: "in1".into(),
                direction: PortDirection::Output,
            }
        );
        assert!(node.port_position(PortDirection::Input, "missing").is_err());
    }

    #[test]
    fn test_port_positions_follow_node_geometry() {
        let mut node = processing_node();
        node.set_position(Position::new(0.0, 0.0));
        node.set_size(Size::new(120.0, 80.0));
        assert_eq!(
            node.port_position(PortDirection::Output, "out1").unwrap(),
            Position::new(120.0, 40.0)
        );
    }

    #[test]
    fn test_port_anchors_match_port_position() {
        let node = processing_node();
        for direction in [PortDirection::Input, PortDirection::Output] {
            for (port, anchor) in node.port_anchors(direction) {
                assert_eq!(node.port_position(direction, &port.id).unwrap(), anchor);
            }
        }
    }

    #[test]
    fn test_contains_point_inclusive() {
        let node = Node::new(NodeConfig::new("a", "A").with_size(Size::new(200.0, 100.0))).unwrap();
        assert!(node.contains_point(Position::new(0.0, 0.0)));
        assert!(node.contains_point(Position::new(200.0, 100.0)));
        assert!(node.contains_point(Position::new(150.0, 50.0)));
        assert!(!node.contains_point(Position::new(201.0, 50.0)));
        assert!(!node.contains_point(Position::new(50.0, -1.0)));
    }

    #[test]
    fn test_negative_size_is_accepted() {
        let mut node = Node::new(NodeConfig::new("a", "A")).unwrap();
        node.set_size(Size::new(-10.0, 50.0));
        assert_eq!(node.size().width, -10.0);
        assert!(!node.contains_point(Position::new(-5.0, 10.0)));
    }

    #[test]
    fn test_duplicate_port_ids_rejected() {
        let err = Node::new(
            NodeConfig::new("a", "A")
                .with_output(Port::output("o", PortDataType::Any, "O"))
                .with_output(Port::output("o", PortDataType::Any, "O again")),
        )
        .unwrap_err();
        assert!(err.is_conflict());
    }

    #[test]
    fn test_same_port_id_allowed_across_directions() {
        let node = Node::new(
            NodeConfig::new("a", "A")
                .with_input(Port::input("x", PortDataType::Any, "in"))
                .with_output(Port::output("x", PortDataType::Any, "out")),
        )
        .unwrap();
        assert!(node.port(PortDirection::Input, "x").is_some());
        assert!(node.port(PortDirection::Output, "x").is_some());
    }

    #[test]
    fn test_config_forces_port_direction() {
        let node = Node::new(
            NodeConfig::new("a", "A").with_input(Port::output("p", PortDataType::Any, "P")),
        )
        .unwrap();
        assert_eq!(node.inputs()[0].direction, PortDirection::Input);
        assert!(node.outputs().is_empty());
    }

    #[test]
    fn test_mutable_fields() {
        let mut node = processing_node();
        node.set_label("Renamed");
        node.translate(10.0, -10.0);
        node.data_mut().insert("gain".into(), json!(0.5));

        assert_eq!(node.label(), "Renamed");
        assert_eq!(node.position(), Position::new(410.0, 90.0));
        assert_eq!(node.data()["gain"], json!(0.5));
    }

    #[test]
    fn test_config_data() {
        let node = Node::new(NodeConfig::new("a", "A").with_data("value", json!(42))).unwrap();
        assert_eq!(node.data().get("value"), Some(&json!(42)));
    }

    #[test]
    fn test_data_type_compatibility() {
        assert!(PortDataType::Any.is_compatible_with(PortDataType::Number));
        assert!(PortDataType::String.is_compatible_with(PortDataType::Any));
        assert!(PortDataType::Number.is_compatible_with(PortDataType::Number));
        assert!(!PortDataType::Number.is_compatible_with(PortDataType::String));
    }

    #[test]
    fn test_port_ref_endpoint() {
        let port = PortRef::output("A", "o1");
        assert_eq!(port.direction, PortDirection::Output);
        assert_eq!(port.endpoint(), Endpoint::new("A", "o1"));
    }

    #[test]
    fn test_direction_display_and_opposite() {
        assert_eq!(PortDirection::Input.to_string(), "input");
        assert_eq!(PortDirection::Output.opposite(), PortDirection::Input);
    }
}
