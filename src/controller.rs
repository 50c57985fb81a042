//! Pointer-driven editing on top of a [`NodeSystem`].
//!
//! The [`EditorController`] turns raw pointer and wheel input into graph
//! operations: panning, node dragging, connection dragging and zooming. It
//! also exposes the renderer's output in the shapes Slint callbacks want.
//!
//! # Example
//!
//! ```ignore
//! use slint_node_system::{EditorController, NodeSystem, Position};
//!
//! slint::include_modules!();
//!
//! fn main() {
//!     let window = MainWindow::new().unwrap();
//!     let ctrl = EditorController::new(NodeSystem::new());
//!     let w = window.as_weak();
//!
//!     window.on_compute_link_path(ctrl.link_path_callback());
//!
//!     window.on_pointer_down({
//!         let ctrl = ctrl.clone();
//!         move |x, y, button| ctrl.pointer_down(Position::new(x, y), button.into())
//!     });
//!
//!     window.on_pointer_moved({
//!         let ctrl = ctrl.clone();
//!         let w = w.clone();
//!         move |x, y| {
//!             if ctrl.pointer_move(Position::new(x, y)) {
//!                 if let Some(w) = w.upgrade() {
//!                     w.invoke_request_redraw();
//!                 }
//!             }
//!         }
//!     });
//!
//!     window.on_pointer_up({
//!         let ctrl = ctrl.clone();
//!         move |x, y| {
//!             ctrl.pointer_up(Position::new(x, y));
//!         }
//!     });
//!
//!     window.run().unwrap();
//! }
//! ```

use std::cell::{Ref, RefCell, RefMut};
use std::rc::Rc;

use log::debug;
use slint::SharedString;

use crate::connection::Connection;
use crate::events::{
    ConnectionCreateFailed, ConnectionCreated, ConnectionDragEnd, ConnectionDragMove,
    ConnectionDragStart,
};
use crate::geometry::{Position, Size, MAX_SCALE, MIN_SCALE};
use crate::grid::generate_grid_commands;
use crate::node::{PortDirection, PortRef};
use crate::path::generate_bezier_path;
use crate::render::{ConnectionPreview, DrawingSurface, Renderer};
use crate::system::{connection_id, NodeSystem};
use crate::validation::{CompositeValidator, ConnectionValidator, ValidationResult};

/// Zoom factor applied per wheel step away from the user.
pub const ZOOM_OUT_FACTOR: f32 = 0.9;
/// Zoom factor applied per wheel step toward the user.
pub const ZOOM_IN_FACTOR: f32 = 1.1;

/// Pointer buttons the controller distinguishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerButton {
    Primary,
    Middle,
    Secondary,
    Other,
}

impl From<slint::platform::PointerEventButton> for PointerButton {
    fn from(button: slint::platform::PointerEventButton) -> Self {
        use slint::platform::PointerEventButton;
        match button {
            PointerEventButton::Left => Self::Primary,
            PointerEventButton::Middle => Self::Middle,
            PointerEventButton::Right => Self::Secondary,
            _ => Self::Other,
        }
    }
}

/// What the pointer is currently doing.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum InteractionState {
    #[default]
    Idle,
    /// Positions in screen space.
    Panning { pointer_start: Position, offset_start: Position },
    /// `pointer_start` in world space.
    DraggingNode {
        node_id: String,
        pointer_start: Position,
        node_start: Position,
    },
    /// `current` in world space.
    DraggingConnection { from_port: PortRef, current: Position },
}

/// Shared editor handle.
///
/// Clone this controller to share it across callbacks. All clones drive the
/// same graph, renderer and interaction state.
///
/// Every event the controller emits is dispatched with no graph borrow
/// held, so listeners may read the graph through [`system`](Self::system).
#[derive(Clone)]
pub struct EditorController {
    system: Rc<RefCell<NodeSystem>>,
    renderer: Rc<RefCell<Renderer>>,
    validator: Rc<RefCell<Box<dyn ConnectionValidator>>>,
    state: Rc<RefCell<InteractionState>>,
}

impl std::fmt::Debug for EditorController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EditorController")
            .field("state", &*self.state.borrow())
            .finish_non_exhaustive()
    }
}

impl EditorController {
    /// Controller with the default renderer and the standard validator
    /// (port existence, direction, no self-loops, no duplicates).
    pub fn new(system: NodeSystem) -> Self {
        Self::with_renderer(system, Renderer::default())
    }

    pub fn with_renderer(system: NodeSystem, renderer: Renderer) -> Self {
        Self {
            system: Rc::new(RefCell::new(system)),
            renderer: Rc::new(RefCell::new(renderer)),
            validator: Rc::new(RefCell::new(Box::new(CompositeValidator::standard()))),
            state: Rc::new(RefCell::new(InteractionState::Idle)),
        }
    }

    pub fn system(&self) -> Ref<'_, NodeSystem> {
        self.system.borrow()
    }

    pub fn system_mut(&self) -> RefMut<'_, NodeSystem> {
        self.system.borrow_mut()
    }

    pub fn renderer(&self) -> Ref<'_, Renderer> {
        self.renderer.borrow()
    }

    pub fn renderer_mut(&self) -> RefMut<'_, Renderer> {
        self.renderer.borrow_mut()
    }

    /// Replace the validator consulted when a connection drag is released.
    pub fn set_validator(&self, validator: impl ConnectionValidator + 'static) {
        *self.validator.borrow_mut() = Box::new(validator);
    }

    pub fn state(&self) -> InteractionState {
        self.state.borrow().clone()
    }

    /// The in-progress connection drag, if any.
    pub fn preview(&self) -> Option<ConnectionPreview> {
        match &*self.state.borrow() {
            InteractionState::DraggingConnection { from_port, current } => Some(ConnectionPreview {
                from_port: from_port.clone(),
                current: *current,
            }),
            _ => None,
        }
    }

    // === Pointer input (screen space) ===

    /// Start panning, a node drag or a connection drag.
    pub fn pointer_down(&self, screen: Position, button: PointerButton) {
        let next = {
            let system = self.system.borrow();
            match button {
                PointerButton::Middle => Some(InteractionState::Panning {
                    pointer_start: screen,
                    offset_start: system.viewport().offset,
                }),
                PointerButton::Primary => {
                    let world = system.screen_to_world(screen);
                    if let Some(port) = system.find_port_at_position(world) {
                        // Connections are only dragged out of outputs
                        (port.direction == PortDirection::Output).then(|| {
                            InteractionState::DraggingConnection {
                                from_port: port,
                                current: world,
                            }
                        })
                    } else {
                        system.find_node_at_position(world).map(|node| {
                            InteractionState::DraggingNode {
                                node_id: node.id().to_string(),
                                pointer_start: world,
                                node_start: node.position(),
                            }
                        })
                    }
                }
                PointerButton::Secondary | PointerButton::Other => None,
            }
        };

        let Some(next) = next else {
            return;
        };

        if let InteractionState::DraggingConnection { from_port, current } = &next {
            debug!("connection drag from {}.{}", from_port.node_id, from_port.port_id);
            let events = self.system.borrow().events().clone();
            events.emit(
                &ConnectionDragStart {
                    from_port: from_port.clone(),
                    start_position: *current,
                }
                .into(),
            );
        }
        *self.state.borrow_mut() = next;
    }

    /// Advance the current interaction. Returns `true` if anything changed
    /// and the view needs a redraw.
    pub fn pointer_move(&self, screen: Position) -> bool {
        let mut drag_move = None;
        let changed = match &mut *self.state.borrow_mut() {
            InteractionState::Idle => false,
            InteractionState::Panning {
                pointer_start,
                offset_start,
            } => {
                self.system.borrow_mut().viewport_mut().offset = Position::new(
                    offset_start.x + screen.x - pointer_start.x,
                    offset_start.y + screen.y - pointer_start.y,
                );
                true
            }
            InteractionState::DraggingNode {
                node_id,
                pointer_start,
                node_start,
            } => {
                let mut system = self.system.borrow_mut();
                let world = system.screen_to_world(screen);
                let target =
                    node_start.offset(world.x - pointer_start.x, world.y - pointer_start.y);
                // The node may have been removed mid-drag
                system.move_node(node_id, target).is_ok()
            }
            InteractionState::DraggingConnection { from_port, current } => {
                *current = self.system.borrow().screen_to_world(screen);
                drag_move = Some(ConnectionDragMove {
                    from_port: from_port.clone(),
                    current_position: *current,
                });
                true
            }
        };

        if let Some(event) = drag_move {
            let events = self.system.borrow().events().clone();
            events.emit(&event.into());
        }
        changed
    }

    /// Finish the current interaction and return to idle.
    ///
    /// Releasing a connection drag over an input port validates the pair,
    /// then creates the connection or reports why it was refused. A
    /// `ConnectionDragEnd` event always closes the drag. Returns the new
    /// connection, if one was made.
    pub fn pointer_up(&self, screen: Position) -> Option<Connection> {
        let finished = std::mem::take(&mut *self.state.borrow_mut());
        let InteractionState::DraggingConnection { from_port, .. } = finished else {
            return None;
        };

        let (world, target, events) = {
            let system = self.system.borrow();
            let world = system.screen_to_world(screen);
            let target = system
                .find_port_at_position(world)
                .filter(|port| port.direction == PortDirection::Input);
            (world, target, system.events().clone())
        };

        let Some(to_port) = target else {
            events.emit(
                &ConnectionDragEnd {
                    from_port,
                    to_port: None,
                    end_position: world,
                    success: false,
                }
                .into(),
            );
            return None;
        };

        let verdict = self
            .validator
            .borrow()
            .validate(&from_port, &to_port, &self.system.borrow());
        let outcome = match verdict {
            ValidationResult::Valid => {
                let connection = Connection::new(
                    connection_id(&from_port, &to_port),
                    from_port.endpoint(),
                    to_port.endpoint(),
                );
                let added = self.system.borrow_mut().add_connection(connection.clone());
                added.map(|()| connection).map_err(|err| err.to_string())
            }
            ValidationResult::Invalid(err) => Err(err.to_string()),
        };

        // Graph borrow released: listeners may read the controller
        let created = match outcome {
            Ok(connection) => {
                events.emit(
                    &ConnectionCreated {
                        connection: connection.clone(),
                    }
                    .into(),
                );
                Some(connection)
            }
            Err(reason) => {
                debug!("connection refused: {}", reason);
                events.emit(
                    &ConnectionCreateFailed {
                        from_port: from_port.clone(),
                        to_port: to_port.clone(),
                        reason,
                    }
                    .into(),
                );
                None
            }
        };

        events.emit(
            &ConnectionDragEnd {
                from_port,
                to_port: Some(to_port),
                end_position: world,
                success: created.is_some(),
            }
            .into(),
        );
        created
    }

    /// Pointer left the canvas: drop any interaction without events.
    pub fn pointer_leave(&self) {
        *self.state.borrow_mut() = InteractionState::Idle;
    }

    /// Zoom one wheel step around the pointer. Positive `delta_y` zooms out.
    /// Returns the new scale.
    pub fn wheel(&self, screen: Position, delta_y: f32) -> f32 {
        let factor = if delta_y > 0.0 { ZOOM_OUT_FACTOR } else { ZOOM_IN_FACTOR };
        self.system
            .borrow_mut()
            .viewport_mut()
            .zoom_at(screen, factor, MIN_SCALE, MAX_SCALE)
    }

    // === Drawing ===

    /// Draw a full frame including the drag preview.
    pub fn render(&self, surface: &mut dyn DrawingSurface) {
        let preview = self.preview();
        self.renderer
            .borrow()
            .render(&self.system.borrow(), surface, preview.as_ref());
    }

    /// Screen-space SVG path of one connection, shaped by the active edge
    /// renderer. Empty if it cannot be routed.
    pub fn link_path(&self, connection_id: &str) -> SharedString {
        let system = self.system.borrow();
        match system.get_connection(connection_id) {
            Ok(connection) => self.renderer.borrow().link_path(&system, connection).into(),
            Err(_) => SharedString::default(),
        }
    }

    /// Screen-space curve from the dragged output port to the pointer, empty
    /// when no connection drag is active.
    pub fn preview_path(&self) -> SharedString {
        let Some(preview) = self.preview() else {
            return SharedString::default();
        };
        let system = self.system.borrow();
        let start = system
            .get_node(&preview.from_port.node_id)
            .and_then(|node| node.port_position(PortDirection::Output, &preview.from_port.port_id));
        match start {
            Ok(start) => generate_bezier_path(
                system.world_to_screen(start),
                system.world_to_screen(preview.current),
            )
            .into(),
            Err(_) => SharedString::default(),
        }
    }

    /// Returns a callback for a Slint `compute-link-path(id)` callback.
    pub fn link_path_callback(&self) -> impl Fn(SharedString) -> SharedString {
        let ctrl = self.clone();
        move |id| ctrl.link_path(&id)
    }

    /// Grid path commands for a canvas of `size` pixels.
    pub fn grid_commands(&self, size: Size) -> SharedString {
        let spacing = self.renderer.borrow().config().grid_size;
        generate_grid_commands(self.system.borrow().viewport(), size, spacing).into()
    }
}
