//! Event notifications for connection dragging and connection creation.
//!
//! [`EventBus`] is a synchronous, single-threaded observer. It is a cheap
//! cloneable handle: clones share the same listener table, so a listener can
//! hold a clone and (un)subscribe from inside its own callback.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use crate::connection::Connection;
use crate::geometry::Position;
use crate::node::PortRef;

/// The fixed set of events a graph emits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    ConnectionDragStart,
    ConnectionDragMove,
    ConnectionDragEnd,
    ConnectionCreated,
    ConnectionCreateFailed,
}

/// A connection drag began on an output port.
#[derive(Debug, Clone, PartialEq)]
pub struct ConnectionDragStart {
    pub from_port: PortRef,
    /// World space.
    pub start_position: Position,
}

/// The pointer moved during a connection drag.
#[derive(Debug, Clone, PartialEq)]
pub struct ConnectionDragMove {
    pub from_port: PortRef,
    /// World space.
    pub current_position: Position,
}

/// A connection drag finished, whether or not a connection was made.
#[derive(Debug, Clone, PartialEq)]
pub struct ConnectionDragEnd {
    pub from_port: PortRef,
    /// The port under the pointer on release, if any.
    pub to_port: Option<PortRef>,
    /// World space.
    pub end_position: Position,
    pub success: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ConnectionCreated {
    pub connection: Connection,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ConnectionCreateFailed {
    pub from_port: PortRef,
    pub to_port: PortRef,
    pub reason: String,
}

/// Events emitted by a node system, one variant per [`EventKind`].
#[derive(Debug, Clone, PartialEq)]
pub enum NodeSystemEvent {
    ConnectionDragStart(ConnectionDragStart),
    ConnectionDragMove(ConnectionDragMove),
    ConnectionDragEnd(ConnectionDragEnd),
    ConnectionCreated(ConnectionCreated),
    ConnectionCreateFailed(ConnectionCreateFailed),
}

impl NodeSystemEvent {
    pub fn kind(&self) -> EventKind {
        match self {
            Self::ConnectionDragStart(_) => EventKind::ConnectionDragStart,
            Self::ConnectionDragMove(_) => EventKind::ConnectionDragMove,
            Self::ConnectionDragEnd(_) => EventKind::ConnectionDragEnd,
            Self::ConnectionCreated(_) => EventKind::ConnectionCreated,
            Self::ConnectionCreateFailed(_) => EventKind::ConnectionCreateFailed,
        }
    }
}

impl From<ConnectionDragStart> for NodeSystemEvent {
    fn from(event: ConnectionDragStart) -> Self {
        Self::ConnectionDragStart(event)
    }
}

impl From<ConnectionDragMove> for NodeSystemEvent {
    fn from(event: ConnectionDragMove) -> Self {
        Self::ConnectionDragMove(event)
    }
}

impl From<ConnectionDragEnd> for NodeSystemEvent {
    fn from(event: ConnectionDragEnd) -> Self {
        Self::ConnectionDragEnd(event)
    }
}

impl From<ConnectionCreated> for NodeSystemEvent {
    fn from(event: ConnectionCreated) -> Self {
        Self::ConnectionCreated(event)
    }
}

impl From<ConnectionCreateFailed> for NodeSystemEvent {
    fn from(event: ConnectionCreateFailed) -> Self {
        Self::ConnectionCreateFailed(event)
    }
}

/// Handle returned by [`EventBus::on`], used to unsubscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

type Listener = Rc<dyn Fn(&NodeSystemEvent)>;

struct Subscription {
    id: ListenerId,
    kind: EventKind,
    listener: Listener,
}

/// Per-graph listener registry.
#[derive(Clone, Default)]
pub struct EventBus {
    subscriptions: Rc<RefCell<Vec<Subscription>>>,
    next_id: Rc<Cell<u64>>,
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBus")
            .field("listeners", &self.subscriptions.borrow().len())
            .finish()
    }
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribe to one kind of event. Listeners of the same kind are called
    /// in subscription order.
    pub fn on<F>(&self, kind: EventKind, listener: F) -> ListenerId
    where
        F: Fn(&NodeSystemEvent) + 'static,
    {
        let id = ListenerId(self.next_id.get());
        self.next_id.set(id.0 + 1);
        self.subscriptions.borrow_mut().push(Subscription {
            id,
            kind,
            listener: Rc::new(listener),
        });
        id
    }

    /// Remove a listener. Returns `true` if it was subscribed.
    pub fn off(&self, id: ListenerId) -> bool {
        let mut subscriptions = self.subscriptions.borrow_mut();
        let len_before = subscriptions.len();
        subscriptions.retain(|sub| sub.id != id);
        subscriptions.len() != len_before
    }

    /// Call every listener subscribed to the event's kind.
    ///
    /// The listener list is snapshotted first: listeners added or removed
    /// during dispatch take effect from the next `emit`.
    pub fn emit(&self, event: &NodeSystemEvent) {
        let kind = event.kind();
        let snapshot: Vec<Listener> = self
            .subscriptions
            .borrow()
            .iter()
            .filter(|sub| sub.kind == kind)
            .map(|sub| sub.listener.clone())
            .collect();

        for listener in snapshot {
            listener(event);
        }
    }

    pub fn listener_count(&self, kind: EventKind) -> usize {
        self.subscriptions
            .borrow()
            .iter()
            .filter(|sub| sub.kind == kind)
            .count()
    }

    pub fn clear(&self) {
        self.subscriptions.borrow_mut().clear();
    }
}
