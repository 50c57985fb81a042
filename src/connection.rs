//! Directed connections and the manager that keeps them acyclic.

use std::collections::HashSet;

use crate::error::{GraphError, Result};

/// One end of a connection: a port on a node.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Endpoint {
    pub node_id: String,
    pub port_id: String,
}

impl Endpoint {
    pub fn new(node_id: impl Into<String>, port_id: impl Into<String>) -> Self {
        Self {
            node_id: node_id.into(),
            port_id: port_id.into(),
        }
    }
}

/// A directed edge from an output port to an input port.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Connection {
    pub id: String,
    pub from: Endpoint,
    pub to: Endpoint,
}

impl Connection {
    pub fn new(id: impl Into<String>, from: Endpoint, to: Endpoint) -> Self {
        Self {
            id: id.into(),
            from,
            to,
        }
    }

    /// True if either end sits on `node_id`.
    pub fn touches(&self, node_id: &str) -> bool {
        self.from.node_id == node_id || self.to.node_id == node_id
    }
}

/// Owns the committed connection set.
///
/// Connections are kept in insertion order. Every accepted edge keeps the
/// node-level graph acyclic; ports are irrelevant to the cycle check.
#[derive(Debug, Clone, Default)]
pub struct ConnectionManager {
    connections: Vec<Connection>,
}

impl ConnectionManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Commit a connection.
    ///
    /// Fails with [`GraphError::DuplicateConnection`] on an id collision and
    /// with [`GraphError::CycleDetected`] if the edge would close a cycle.
    /// On failure the set is left unchanged.
    pub fn add(&mut self, connection: Connection) -> Result<()> {
        if self.has(&connection.id) {
            return Err(GraphError::DuplicateConnection(connection.id));
        }
        if self.would_create_cycle(&connection.from.node_id, &connection.to.node_id) {
            return Err(GraphError::CycleDetected {
                from: connection.from.node_id,
                to: connection.to.node_id,
            });
        }
        self.connections.push(connection);
        Ok(())
    }

    /// Remove a connection by id. Returns `true` if one was removed.
    pub fn remove(&mut self, id: &str) -> bool {
        let len_before = self.connections.len();
        self.connections.retain(|conn| conn.id != id);
        self.connections.len() != len_before
    }

    /// Remove every connection touching `node_id`, returning them in order.
    pub fn remove_touching(&mut self, node_id: &str) -> Vec<Connection> {
        let (removed, kept): (Vec<Connection>, Vec<Connection>) =
            std::mem::take(&mut self.connections)
                .into_iter()
                .partition(|conn| conn.touches(node_id));
        self.connections = kept;
        removed
    }

    pub fn get(&self, id: &str) -> Result<&Connection> {
        self.connections
            .iter()
            .find(|conn| conn.id == id)
            .ok_or_else(|| GraphError::ConnectionNotFound(id.to_string()))
    }

    pub fn has(&self, id: &str) -> bool {
        self.connections.iter().any(|conn| conn.id == id)
    }

    pub fn all(&self) -> &[Connection] {
        &self.connections
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Connection> {
        self.connections.iter()
    }

    pub fn len(&self) -> usize {
        self.connections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.connections.is_empty()
    }

    /// Connections ending at `node_id` (and `port_id`, if given).
    pub fn inputs_of(&self, node_id: &str, port_id: Option<&str>) -> Vec<&Connection> {
        self.connections
            .iter()
            .filter(|conn| {
                conn.to.node_id == node_id && port_id.map_or(true, |port| conn.to.port_id == port)
            })
            .collect()
    }

    /// Connections starting at `node_id` (and `port_id`, if given).
    pub fn outputs_of(&self, node_id: &str, port_id: Option<&str>) -> Vec<&Connection> {
        self.connections
            .iter()
            .filter(|conn| {
                conn.from.node_id == node_id
                    && port_id.map_or(true, |port| conn.from.port_id == port)
            })
            .collect()
    }

    /// Would an edge `from -> to` close a directed cycle?
    ///
    /// Walks outgoing edges depth-first starting at `to`; reaching `from`
    /// means a path `to ~> from` already exists. A self-loop counts as a
    /// cycle.
    pub fn would_create_cycle(&self, from: &str, to: &str) -> bool {
        let mut visited: HashSet<&str> = HashSet::new();
        let mut stack = vec![to];

        while let Some(current) = stack.pop() {
            if current == from {
                return true;
            }
            if !visited.insert(current) {
                continue;
            }
            stack.extend(
                self.connections
                    .iter()
                    .filter(|conn| conn.from.node_id == current)
                    .map(|conn| conn.to.node_id.as_str()),
            );
        }

        false
    }

    pub fn clear(&mut self) {
        self.connections.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn conn(id: &str, from: &str, to: &str) -> Connection {
        Connection::new(id, Endpoint::new(from, "out"), Endpoint::new(to, "in"))
    }

    fn chain() -> ConnectionManager {
        let mut manager = ConnectionManager::new();
        manager.add(conn("ab", "A", "B")).unwrap();
        manager.add(conn("bc", "B", "C")).unwrap();
        manager
    }

    #[test]
    fn test_new_manager_is_empty() {
        let manager = ConnectionManager::new();
        assert!(manager.is_empty());
        assert_eq!(manager.len(), 0);
    }

    #[test]
    fn test_add_and_get() {
        let manager = chain();
        assert_eq!(manager.len(), 2);
        assert_eq!(manager.get("ab").unwrap().to.node_id, "B");
        assert!(manager.has("bc"));
    }

    #[test]
    fn test_get_missing_is_not_found() {
        let manager = chain();
        assert_eq!(
            manager.get("zz").unwrap_err(),
            GraphError::ConnectionNotFound("zz".into())
        );
        assert!(!manager.has("zz"));
    }

    #[test]
    fn test_duplicate_id_rejected() {
        let mut manager = chain();
        let err = manager.add(conn("ab", "X", "Y")).unwrap_err();
        assert_eq!(err, GraphError::DuplicateConnection("ab".into()));
        assert_eq!(manager.len(), 2);
    }

    #[test]
    fn test_direct_cycle_rejected() {
        let mut manager = chain();
        let err = manager.add(conn("ba", "B", "A")).unwrap_err();
        assert!(matches!(err, GraphError::CycleDetected { .. }));
        assert_eq!(manager.len(), 2);
    }

    #[test]
    fn test_transitive_cycle_rejected() {
        let mut manager = chain();
        assert!(manager.would_create_cycle("C", "A"));
        assert!(manager.add(conn("ca", "C", "A")).is_err());
    }

    #[test]
    fn test_self_loop_rejected() {
        let mut manager = ConnectionManager::new();
        assert!(manager.add(conn("aa", "A", "A")).is_err());
        assert!(manager.is_empty());
    }

    #[test]
    fn test_cycle_check_ignores_ports() {
        let mut manager = ConnectionManager::new();
        manager
            .add(Connection::new("1", Endpoint::new("A", "o1"), Endpoint::new("B", "i1")))
            .unwrap();
        let reverse = Connection::new("2", Endpoint::new("B", "o9"), Endpoint::new("A", "i9"));
        assert!(manager.add(reverse).is_err());
    }

    #[test]
    fn test_diamond_is_not_a_cycle() {
        let mut manager = ConnectionManager::new();
        manager.add(conn("ab", "A", "B")).unwrap();
        manager.add(conn("ac", "A", "C")).unwrap();
        manager.add(conn("bd", "B", "D")).unwrap();
        manager.add(conn("cd", "C", "D")).unwrap();
        assert_eq!(manager.len(), 4);
        assert!(manager.would_create_cycle("D", "A"));
        assert!(!manager.would_create_cycle("A", "D"));
    }

    #[test]
    fn test_parallel_edges_allowed() {
        let mut manager = ConnectionManager::new();
        manager.add(conn("1", "A", "B")).unwrap();
        manager.add(conn("2", "A", "B")).unwrap();
        assert_eq!(manager.len(), 2);
    }

    #[test]
    fn test_remove() {
        let mut manager = chain();
        assert!(manager.remove("ab"));
        assert!(!manager.remove("ab"));
        assert_eq!(manager.len(), 1);
        // With A -> B gone, B -> A is legal.
        assert!(manager.add(conn("ba", "B", "A")).is_ok());
    }

    #[test]
    fn test_remove_touching() {
        let mut manager = chain();
        manager.add(conn("ad", "A", "D")).unwrap();

        let removed = manager.remove_touching("B");
        let ids: Vec<_> = removed.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["ab", "bc"]);
        assert_eq!(manager.len(), 1);
        assert!(manager.iter().all(|c| !c.touches("B")));
    }

    #[test]
    fn test_inputs_and_outputs_of() {
        let mut manager = ConnectionManager::new();
        manager
            .add(Connection::new("1", Endpoint::new("A", "o1"), Endpoint::new("B", "i1")))
            .unwrap();
        manager
            .add(Connection::new("2", Endpoint::new("A", "o2"), Endpoint::new("B", "i2")))
            .unwrap();
        manager
            .add(Connection::new("3", Endpoint::new("A", "o1"), Endpoint::new("C", "i1")))
            .unwrap();

        let outputs: Vec<_> = manager.outputs_of("A", None).iter().map(|c| c.id.clone()).collect();
        assert_eq!(outputs, vec!["1", "2", "3"]);

        let o1: Vec<_> = manager.outputs_of("A", Some("o1")).iter().map(|c| c.id.clone()).collect();
        assert_eq!(o1, vec!["1", "3"]);

        assert_eq!(manager.inputs_of("B", None).len(), 2);
        assert_eq!(manager.inputs_of("B", Some("i2")).len(), 1);
        assert!(manager.inputs_of("A", None).is_empty());
    }

    #[test]
    fn test_clear() {
        let mut manager = chain();
        manager.clear();
        assert!(manager.is_empty());
    }
}
