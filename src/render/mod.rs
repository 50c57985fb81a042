//! Frame drawing on top of the graph model.
//!
//! A [`Renderer`] walks the graph once per frame and hands each node and
//! connection to swappable strategies:
//!
//! - [`NodeRenderer`] draws one node.
//! - [`EdgeRouter`] turns a connection into screen-space route points.
//! - [`EdgeRenderer`] draws a routed connection.
//!
//! Strategies only read the graph. They draw through a [`DrawingSurface`]
//! in screen pixels and get the viewport and config from a
//! [`RenderContext`].

mod config;
mod strategies;
mod surface;

pub use config::{parse_hex_color, to_hex_color, ConfigError, RenderConfig};
pub use strategies::{
    BezierEdgeRouter, DefaultEdgeRenderer, DefaultNodeRenderer, GradientEdgeRenderer,
    OrthogonalEdgeRouter, RoundedNodeRenderer,
};
pub use surface::{
    DrawItem, DrawingSurface, LineCap, LineJoin, Paint, Path, PathSegment, Stroke, SvgLayer,
    SvgPathSurface, TextAlign, TextBaseline, TextItem, TextStyle,
};

use log::warn;

use crate::connection::Connection;
use crate::geometry::{Position, Rect, Viewport};
use crate::grid::grid_path;
use crate::hit_test::nodes_in_rect;
use crate::node::{Node, PortDirection, PortRef};
use crate::path::CubicBezier;
use crate::system::NodeSystem;

/// Read-only per-frame state handed to every strategy.
#[derive(Debug, Clone, Copy)]
pub struct RenderContext<'a> {
    pub viewport: Viewport,
    pub config: &'a RenderConfig,
}

impl<'a> RenderContext<'a> {
    pub fn new(viewport: Viewport, config: &'a RenderConfig) -> Self {
        Self { viewport, config }
    }

    pub fn scale(&self) -> f32 {
        self.viewport.scale()
    }

    pub fn world_to_screen(&self, p: Position) -> Position {
        self.viewport.world_to_screen(p)
    }

    pub fn screen_to_world(&self, p: Position) -> Position {
        self.viewport.screen_to_world(p)
    }

    /// Scale a world-space length to pixels.
    pub fn to_screen_len(&self, len: f32) -> f32 {
        self.viewport.world_to_screen_len(len)
    }

    pub fn world_rect_to_screen(&self, rect: Rect) -> Rect {
        self.viewport.world_rect_to_screen(rect)
    }
}

/// Draws one node. Must not change graph state.
pub trait NodeRenderer {
    fn render(&self, node: &Node, surface: &mut dyn DrawingSurface, context: &RenderContext<'_>);
}

/// Computes the screen-space route of a connection.
///
/// Routes with fewer than two points mean "nothing to draw".
pub trait EdgeRouter {
    fn calculate_route(
        &self,
        connection: &Connection,
        from: &Node,
        to: &Node,
        context: &RenderContext<'_>,
    ) -> Vec<Position>;
}

/// Draws a connection along the route its router produced.
pub trait EdgeRenderer {
    fn render(
        &self,
        connection: &Connection,
        route: &[Position],
        surface: &mut dyn DrawingSurface,
        context: &RenderContext<'_>,
    );

    /// Shape of the connection line along `route`, without decorations.
    fn edge_path(&self, route: &[Position]) -> Path {
        Path::from_route(route)
    }
}

/// In-progress connection drag: from an output port to the pointer.
#[derive(Debug, Clone, PartialEq)]
pub struct ConnectionPreview {
    pub from_port: PortRef,
    /// Pointer position in world space.
    pub current: Position,
}

/// Per-frame orchestrator with swappable strategies.
///
/// # Example
///
/// ```
/// use slint_node_system::render::{
///     OrthogonalEdgeRouter, Renderer, RoundedNodeRenderer, SvgPathSurface,
/// };
/// use slint_node_system::{NodeSystem, Size};
///
/// let mut renderer = Renderer::default();
/// renderer.set_node_renderer(RoundedNodeRenderer::default());
/// renderer.set_edge_router(OrthogonalEdgeRouter);
///
/// let system = NodeSystem::new();
/// let mut surface = SvgPathSurface::new(Size::new(640.0, 480.0));
/// renderer.render(&system, &mut surface, None);
/// assert!(surface.background().is_some());
/// ```
pub struct Renderer {
    config: RenderConfig,
    node_renderer: Box<dyn NodeRenderer>,
    edge_router: Box<dyn EdgeRouter>,
    edge_renderer: Box<dyn EdgeRenderer>,
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new(RenderConfig::default())
    }
}

impl std::fmt::Debug for Renderer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Renderer").field("config", &self.config).finish_non_exhaustive()
    }
}

impl Renderer {
    /// Renderer with the default strategies.
    pub fn new(config: RenderConfig) -> Self {
        Self {
            config,
            node_renderer: Box::new(DefaultNodeRenderer),
            edge_router: Box::new(BezierEdgeRouter),
            edge_renderer: Box::new(DefaultEdgeRenderer),
        }
    }

    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    pub fn set_config(&mut self, config: RenderConfig) {
        self.config = config;
    }

    /// Merge a partial JSON object over the current config.
    pub fn update_config(&mut self, json: &str) -> Result<(), ConfigError> {
        self.config = self.config.merged_from_json(json)?;
        Ok(())
    }

    pub fn set_node_renderer(&mut self, renderer: impl NodeRenderer + 'static) {
        self.node_renderer = Box::new(renderer);
    }

    pub fn set_edge_router(&mut self, router: impl EdgeRouter + 'static) {
        self.edge_router = Box::new(router);
    }

    pub fn set_edge_renderer(&mut self, renderer: impl EdgeRenderer + 'static) {
        self.edge_renderer = Box::new(renderer);
    }

    pub fn context<'a>(&'a self, system: &NodeSystem) -> RenderContext<'a> {
        RenderContext::new(*system.viewport(), &self.config)
    }

    /// Screen-space route of one connection with the current router.
    ///
    /// Empty if an endpoint node is missing.
    pub fn route(&self, system: &NodeSystem, connection: &Connection) -> Vec<Position> {
        let (Ok(from), Ok(to)) = (
            system.get_node(&connection.from.node_id),
            system.get_node(&connection.to.node_id),
        ) else {
            warn!("connection {} references a missing node", connection.id);
            return Vec::new();
        };
        self.edge_router
            .calculate_route(connection, from, to, &self.context(system))
    }

    /// SVG path data of one connection as the current edge renderer shapes
    /// it. Empty if the connection cannot be routed.
    pub fn link_path(&self, system: &NodeSystem, connection: &Connection) -> String {
        let route = self.route(system, connection);
        if route.len() < 2 {
            return String::new();
        }
        self.edge_renderer.edge_path(&route).to_svg()
    }

    /// Draw one frame: background, grid, connections, visible nodes in
    /// insertion order, then the drag preview if any.
    pub fn render(
        &self,
        system: &NodeSystem,
        surface: &mut dyn DrawingSurface,
        preview: Option<&ConnectionPreview>,
    ) {
        let context = self.context(system);

        surface.clear(self.config.background_color);
        self.draw_grid(surface, &context);

        for connection in system.connections().iter() {
            let route = self.route(system, connection);
            if route.len() < 2 {
                continue;
            }
            self.edge_renderer.render(connection, &route, surface, &context);
        }

        let visible = context.viewport.visible_world_rect(surface.size());
        for node in nodes_in_rect(system.nodes(), &visible) {
            self.node_renderer.render(node, surface, &context);
        }

        if let Some(preview) = preview {
            self.draw_preview(system, preview, surface, &context);
        }
    }

    fn draw_grid(&self, surface: &mut dyn DrawingSurface, context: &RenderContext<'_>) {
        let path = grid_path(&context.viewport, surface.size(), self.config.grid_size);
        if !path.is_empty() {
            surface.stroke_path(&path, &Stroke::new(self.config.grid_color, 1.0));
        }
    }

    fn draw_preview(
        &self,
        system: &NodeSystem,
        preview: &ConnectionPreview,
        surface: &mut dyn DrawingSurface,
        context: &RenderContext<'_>,
    ) {
        let start = system
            .get_node(&preview.from_port.node_id)
            .and_then(|node| node.port_position(PortDirection::Output, &preview.from_port.port_id));
        let start = match start {
            Ok(start) => start,
            Err(err) => {
                warn!("cannot draw connection preview: {}", err);
                return;
            }
        };

        let curve = CubicBezier::from_endpoints(
            context.world_to_screen(start),
            context.world_to_screen(preview.current),
        );
        surface.stroke_path(
            &Path::from_route(&curve.points()),
            &Stroke::new(
                self.config.selection_color,
                context.to_screen_len(self.config.connection_width),
            ),
        );
    }
}
