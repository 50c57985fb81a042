//! The graph facade.
//!
//! [`NodeSystem`] owns the nodes, the [`ConnectionManager`], the viewport and
//! the event bus of one graph. Every operation runs to completion
//! synchronously; the whole aggregate is single-threaded.

use log::{debug, warn};

use crate::connection::{Connection, ConnectionManager};
use crate::error::{GraphError, Result};
use crate::events::{
    ConnectionCreateFailed, ConnectionCreated, EventBus, EventKind, ListenerId, NodeSystemEvent,
};
use crate::geometry::{Position, Viewport};
use crate::hit_test::{
    find_connection_at, find_node_at, find_port_at, CONNECTION_HIT_SAMPLES,
    CONNECTION_HOVER_DISTANCE, PORT_HIT_RADIUS,
};
use crate::node::{Node, NodeConfig, PortRef};

/// Id given to a connection created without an explicit id.
///
/// Joins the four endpoint fields with `-`, so the same endpoints always
/// produce the same id.
pub fn connection_id(from: &PortRef, to: &PortRef) -> String {
    format!("{}-{}-{}-{}", from.node_id, from.port_id, to.node_id, to.port_id)
}

/// Graph model plus interaction primitives.
///
/// # Example
///
/// ```
/// use slint_node_system::{NodeConfig, NodeSystem, Port, PortDataType, PortRef, Position};
///
/// let mut system = NodeSystem::new();
/// system
///     .add_node(
///         NodeConfig::new("A", "Source")
///             .with_output(Port::output("o1", PortDataType::Number, "out")),
///     )
///     .unwrap();
/// system
///     .add_node(
///         NodeConfig::new("B", "Sink")
///             .at(Position::new(300.0, 0.0))
///             .with_input(Port::input("i1", PortDataType::Number, "in")),
///     )
///     .unwrap();
///
/// let connection = system
///     .create_connection(&PortRef::output("A", "o1"), &PortRef::input("B", "i1"), None)
///     .unwrap();
/// assert_eq!(connection.id, "A-o1-B-i1");
/// ```
#[derive(Debug)]
pub struct NodeSystem {
    nodes: Vec<Node>,
    connections: ConnectionManager,
    viewport: Viewport,
    port_hit_radius: f32,
    events: EventBus,
}

impl Default for NodeSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl NodeSystem {
    pub fn new() -> Self {
        Self {
            nodes: Vec::new(),
            connections: ConnectionManager::new(),
            viewport: Viewport::default(),
            port_hit_radius: PORT_HIT_RADIUS,
            events: EventBus::new(),
        }
    }

    // === Events ===

    /// The graph's event bus. Clone it to keep a handle in listeners.
    pub fn events(&self) -> &EventBus {
        &self.events
    }

    pub fn on<F>(&self, kind: EventKind, listener: F) -> ListenerId
    where
        F: Fn(&NodeSystemEvent) + 'static,
    {
        self.events.on(kind, listener)
    }

    pub fn off(&self, id: ListenerId) -> bool {
        self.events.off(id)
    }

    /// Emit an event to its listeners. Used by interaction drivers for the
    /// drag lifecycle events.
    pub fn emit(&self, event: impl Into<NodeSystemEvent>) {
        self.events.emit(&event.into());
    }

    // === Nodes ===

    /// Register a new node.
    ///
    /// Fails with [`GraphError::DuplicateNode`] if the id is taken, leaving
    /// the graph unchanged.
    pub fn add_node(&mut self, config: NodeConfig) -> Result<&Node> {
        if self.has_node(&config.id) {
            return Err(GraphError::DuplicateNode(config.id));
        }
        let node = Node::new(config)?;
        debug!("added node {}", node.id());
        self.nodes.push(node);
        Ok(&self.nodes[self.nodes.len() - 1])
    }

    /// Remove a node and, first, every connection touching it.
    pub fn remove_node(&mut self, id: &str) -> Result<Node> {
        let index = self.node_index(id)?;
        let removed = self.connections.remove_touching(id);
        debug!("removed node {} and {} connection(s)", id, removed.len());
        Ok(self.nodes.remove(index))
    }

    pub fn get_node(&self, id: &str) -> Result<&Node> {
        let index = self.node_index(id)?;
        Ok(&self.nodes[index])
    }

    pub fn get_node_mut(&mut self, id: &str) -> Result<&mut Node> {
        let index = self.node_index(id)?;
        Ok(&mut self.nodes[index])
    }

    pub fn has_node(&self, id: &str) -> bool {
        self.nodes.iter().any(|node| node.id() == id)
    }

    /// All nodes in insertion order (drawing order, bottom to top).
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn move_node(&mut self, id: &str, position: Position) -> Result<()> {
        self.get_node_mut(id)?.set_position(position);
        Ok(())
    }

    fn node_index(&self, id: &str) -> Result<usize> {
        self.nodes
            .iter()
            .position(|node| node.id() == id)
            .ok_or_else(|| GraphError::NodeNotFound(id.to_string()))
    }

    // === Connections ===

    /// Commit a connection between two existing nodes.
    ///
    /// Fails with [`GraphError::NodeNotFound`] if either endpoint node is
    /// missing, otherwise with whatever [`ConnectionManager::add`] reports
    /// (duplicate id or cycle). Port ids and directions are not re-checked
    /// here; that is the job of a `ConnectionValidator`.
    pub fn add_connection(&mut self, connection: Connection) -> Result<()> {
        for node_id in [&connection.from.node_id, &connection.to.node_id] {
            if !self.has_node(node_id) {
                return Err(GraphError::NodeNotFound(node_id.clone()));
            }
        }
        let id = connection.id.clone();
        self.connections.add(connection)?;
        debug!("added connection {}", id);
        Ok(())
    }

    /// Build, commit and announce a connection between two ports.
    ///
    /// Without an explicit id, [`connection_id`] is used. On success a
    /// `ConnectionCreated` event fires; on failure a
    /// `ConnectionCreateFailed` event carrying the error text fires and the
    /// error is returned.
    pub fn create_connection(
        &mut self,
        from: &PortRef,
        to: &PortRef,
        id: Option<&str>,
    ) -> Result<Connection> {
        let id = id.map_or_else(|| connection_id(from, to), str::to_string);
        let connection = Connection::new(id, from.endpoint(), to.endpoint());

        match self.add_connection(connection.clone()) {
            Ok(()) => {
                self.emit(ConnectionCreated {
                    connection: connection.clone(),
                });
                Ok(connection)
            }
            Err(err) => {
                warn!("connection {} rejected: {}", connection.id, err);
                self.emit(ConnectionCreateFailed {
                    from_port: from.clone(),
                    to_port: to.clone(),
                    reason: err.to_string(),
                });
                Err(err)
            }
        }
    }

    /// Is there a connection from exactly `from` to exactly `to`?
    /// The reverse direction is not considered.
    pub fn connection_exists(&self, from: &PortRef, to: &PortRef) -> bool {
        self.connections.iter().any(|conn| {
            conn.from.node_id == from.node_id
                && conn.from.port_id == from.port_id
                && conn.to.node_id == to.node_id
                && conn.to.port_id == to.port_id
        })
    }

    pub fn remove_connection(&mut self, id: &str) -> bool {
        let removed = self.connections.remove(id);
        if removed {
            debug!("removed connection {}", id);
        }
        removed
    }

    pub fn get_connection(&self, id: &str) -> Result<&Connection> {
        self.connections.get(id)
    }

    /// Read access to the committed connections.
    pub fn connections(&self) -> &ConnectionManager {
        &self.connections
    }

    pub fn connection_count(&self) -> usize {
        self.connections.len()
    }

    // === Viewport ===

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn viewport_mut(&mut self) -> &mut Viewport {
        &mut self.viewport
    }

    pub fn set_viewport_scale(&mut self, scale: f32) -> Result<()> {
        self.viewport.set_scale(scale)
    }

    pub fn world_to_screen(&self, p: Position) -> Position {
        self.viewport.world_to_screen(p)
    }

    pub fn screen_to_world(&self, p: Position) -> Position {
        self.viewport.screen_to_world(p)
    }

    // === Hit testing (world-space input) ===

    /// Topmost node containing `point`, or `None`.
    pub fn find_node_at_position(&self, point: Position) -> Option<&Node> {
        find_node_at(&self.nodes, point)
    }

    pub fn has_node_at_position(&self, point: Position) -> bool {
        self.find_node_at_position(point).is_some()
    }

    /// Port under `point`, or `None`.
    ///
    /// The hit radius is [`port_hit_radius`](Self::port_hit_radius) screen
    /// pixels, converted to world units through the current scale.
    pub fn find_port_at_position(&self, point: Position) -> Option<PortRef> {
        let radius = self.viewport.screen_to_world_len(self.port_hit_radius);
        find_port_at(&self.nodes, point, radius)
    }

    pub fn has_port_at_position(&self, point: Position) -> bool {
        self.find_port_at_position(point).is_some()
    }

    /// Connection whose curve passes within a few screen pixels of `point`.
    pub fn find_connection_at_position(&self, point: Position) -> Option<&Connection> {
        let max_distance = self.viewport.screen_to_world_len(CONNECTION_HOVER_DISTANCE);
        find_connection_at(
            &self.nodes,
            self.connections.iter(),
            point,
            max_distance,
            CONNECTION_HIT_SAMPLES,
        )
    }

    /// Port hit radius in screen pixels.
    pub fn port_hit_radius(&self) -> f32 {
        self.port_hit_radius
    }

    pub fn set_port_hit_radius(&mut self, radius: f32) {
        self.port_hit_radius = radius.max(0.0);
    }

    /// Remove all nodes and connections. Listeners and viewport are kept.
    pub fn clear(&mut self) {
        self.connections.clear();
        self.nodes.clear();
    }
}
