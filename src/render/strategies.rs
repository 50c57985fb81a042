//! Stock node and edge strategies.

use log::warn;
use slint::Color;

use super::surface::{DrawingSurface, Paint, Path, Stroke, TextAlign, TextStyle};
use super::{EdgeRenderer, EdgeRouter, NodeRenderer, RenderContext};
use crate::connection::Connection;
use crate::geometry::{Position, Rect};
use crate::hit_test::connection_anchors;
use crate::node::{Node, PortDirection};
use crate::path::CubicBezier;

/// Screen-space anchors of both ends of a connection, or `None` (logged)
/// when a port is missing.
fn screen_anchors(
    connection: &Connection,
    from: &Node,
    to: &Node,
    context: &RenderContext<'_>,
) -> Option<(Position, Position)> {
    match connection_anchors(connection, from, to) {
        Ok((start, end)) => Some((context.world_to_screen(start), context.world_to_screen(end))),
        Err(err) => {
            warn!("cannot route connection {}: {}", connection.id, err);
            None
        }
    }
}

// ============================================================================
// Node renderers
// ============================================================================

/// Flat box with a header strip, colors from the [`RenderConfig`](super::RenderConfig).
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultNodeRenderer;

impl NodeRenderer for DefaultNodeRenderer {
    fn render(&self, node: &Node, surface: &mut dyn DrawingSurface, context: &RenderContext<'_>) {
        let config = context.config;
        let body = context.world_rect_to_screen(node.bounds());

        surface.fill_rect(body, &Paint::Solid(config.node_background_color));
        surface.stroke_rect(body, &Stroke::new(config.node_border_color, config.node_border_width));

        let header_height = context.to_screen_len(config.header_height);
        surface.fill_rect(
            Rect::new(body.x, body.y, body.width, header_height),
            &Paint::Solid(config.node_header_color),
        );
        surface.fill_text(
            node.label(),
            Position::new(body.x + 10.0, body.y + header_height / 2.0),
            &TextStyle::new(config.font.clone(), config.text_color),
        );

        let radius = context.to_screen_len(config.port_radius);
        let label_font = format!("{}px sans-serif", context.to_screen_len(config.port_label_size));
        for direction in [PortDirection::Input, PortDirection::Output] {
            let (color, align, label_dx) = match direction {
                PortDirection::Input => (config.input_port_color, TextAlign::Left, radius + 5.0),
                PortDirection::Output => {
                    (config.output_port_color, TextAlign::Right, -(radius + 5.0))
                }
            };
            let label_style = TextStyle::new(label_font.clone(), config.text_color).aligned(align);

            for (port, anchor) in node.port_anchors(direction) {
                let center = context.world_to_screen(anchor);
                surface.fill_path(&Path::circle(center, radius), &Paint::Solid(color));
                surface.fill_text(&port.label, center.offset(label_dx, 0.0), &label_style);
            }
        }
    }
}

/// Dark rounded card with a colored header and outlined ports.
#[derive(Debug, Clone, Copy)]
pub struct RoundedNodeRenderer {
    /// Corner radius in world units.
    pub corner_radius: f32,
}

impl Default for RoundedNodeRenderer {
    fn default() -> Self {
        Self { corner_radius: 10.0 }
    }
}

impl RoundedNodeRenderer {
    const HEADER_HEIGHT: f32 = 35.0;
    const PORT_RADIUS: f32 = 8.0;
}

impl NodeRenderer for RoundedNodeRenderer {
    fn render(&self, node: &Node, surface: &mut dyn DrawingSurface, context: &RenderContext<'_>) {
        let body = context.world_rect_to_screen(node.bounds());
        let radius = context.to_screen_len(self.corner_radius);
        let scale = context.scale();
        let label_color = Color::from_rgb_u8(0xec, 0xf0, 0xf1);

        let outline = Path::rounded_rect(body, radius);
        surface.fill_path(&outline, &Paint::Solid(Color::from_rgb_u8(0x2c, 0x3e, 0x50)));
        surface.stroke_path(&outline, &Stroke::new(Color::from_rgb_u8(0x34, 0x49, 0x5e), 2.0));

        let header_height = Self::HEADER_HEIGHT * scale;
        surface.fill_path(
            &Path::rounded_rect(Rect::new(body.x, body.y, body.width, header_height), radius),
            &Paint::Solid(Color::from_rgb_u8(0x34, 0x98, 0xdb)),
        );
        surface.fill_text(
            node.label(),
            Position::new(body.x + 15.0, body.y + header_height / 2.0),
            &TextStyle::new(
                format!("bold {}px sans-serif", 14.0 * scale),
                Color::from_rgb_u8(255, 255, 255),
            ),
        );

        let port_radius = Self::PORT_RADIUS * scale;
        let label_font = format!("{}px sans-serif", 11.0 * scale);
        for direction in [PortDirection::Input, PortDirection::Output] {
            let (fill, ring, align, label_dx) = match direction {
                PortDirection::Input => (
                    Color::from_rgb_u8(0x27, 0xae, 0x60),
                    Color::from_rgb_u8(0x2e, 0xcc, 0x71),
                    TextAlign::Left,
                    port_radius + 8.0,
                ),
                PortDirection::Output => (
                    Color::from_rgb_u8(0xe6, 0x7e, 0x22),
                    Color::from_rgb_u8(0xf3, 0x9c, 0x12),
                    TextAlign::Right,
                    -(port_radius + 8.0),
                ),
            };
            let label_style = TextStyle::new(label_font.clone(), label_color).aligned(align);

            for (port, anchor) in node.port_anchors(direction) {
                let center = context.world_to_screen(anchor);
                let circle = Path::circle(center, port_radius);
                surface.fill_path(&circle, &Paint::Solid(fill));
                surface.stroke_path(&circle, &Stroke::new(ring, 2.0));
                surface.fill_text(&port.label, center.offset(label_dx, 0.0), &label_style);
            }
        }
    }
}

// ============================================================================
// Edge routers
// ============================================================================

/// Four-point cubic route: start, two horizontal control points, end.
#[derive(Debug, Clone, Copy, Default)]
pub struct BezierEdgeRouter;

impl EdgeRouter for BezierEdgeRouter {
    fn calculate_route(
        &self,
        connection: &Connection,
        from: &Node,
        to: &Node,
        context: &RenderContext<'_>,
    ) -> Vec<Position> {
        screen_anchors(connection, from, to, context)
            .map(|(start, end)| CubicBezier::from_endpoints(start, end).points().to_vec())
            .unwrap_or_default()
    }
}

/// Right-angle route: horizontal, vertical at the midpoint, horizontal.
#[derive(Debug, Clone, Copy, Default)]
pub struct OrthogonalEdgeRouter;

impl EdgeRouter for OrthogonalEdgeRouter {
    fn calculate_route(
        &self,
        connection: &Connection,
        from: &Node,
        to: &Node,
        context: &RenderContext<'_>,
    ) -> Vec<Position> {
        let Some((start, end)) = screen_anchors(connection, from, to, context) else {
            return Vec::new();
        };
        let mid_x = (start.x + end.x) / 2.0;
        vec![start, Position::new(mid_x, start.y), Position::new(mid_x, end.y), end]
    }
}

// ============================================================================
// Edge renderers
// ============================================================================

/// Plain stroke in the configured connection color. Four-point routes are
/// drawn as one cubic curve, other routes as polylines.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultEdgeRenderer;

impl EdgeRenderer for DefaultEdgeRenderer {
    fn render(
        &self,
        _connection: &Connection,
        route: &[Position],
        surface: &mut dyn DrawingSurface,
        context: &RenderContext<'_>,
    ) {
        if route.len() < 2 {
            return;
        }
        let config = context.config;
        surface.stroke_path(
            &self.edge_path(route),
            &Stroke::new(config.connection_color, context.to_screen_len(config.connection_width)),
        );
    }
}

/// Polyline through the route with a two-color gradient and an arrow head
/// at the end.
#[derive(Debug, Clone, Copy)]
pub struct GradientEdgeRenderer {
    pub start_color: Color,
    pub end_color: Color,
    /// Line width in world units.
    pub width: f32,
}

impl Default for GradientEdgeRenderer {
    fn default() -> Self {
        Self {
            start_color: Color::from_rgb_u8(0x34, 0x98, 0xdb),
            end_color: Color::from_rgb_u8(0x9b, 0x59, 0xb6),
            width: 3.0,
        }
    }
}

impl GradientEdgeRenderer {
    /// Arrow head length in pixels.
    const ARROW_LENGTH: f32 = 10.0;
    const ARROW_ANGLE: f32 = std::f32::consts::PI / 6.0;

    fn arrow_head(from: Position, to: Position) -> Path {
        let angle = (to.y - from.y).atan2(to.x - from.x);
        let wing = |a: f32| {
            Position::new(
                to.x - Self::ARROW_LENGTH * a.cos(),
                to.y - Self::ARROW_LENGTH * a.sin(),
            )
        };
        Path::new()
            .move_to(to)
            .line_to(wing(angle - Self::ARROW_ANGLE))
            .move_to(to)
            .line_to(wing(angle + Self::ARROW_ANGLE))
    }
}

impl EdgeRenderer for GradientEdgeRenderer {
    fn render(
        &self,
        _connection: &Connection,
        route: &[Position],
        surface: &mut dyn DrawingSurface,
        context: &RenderContext<'_>,
    ) {
        if route.len() < 2 {
            return;
        }
        let first = route[0];
        let last = route[route.len() - 1];
        let before_last = route[route.len() - 2];

        let paint = Paint::LinearGradient {
            start: first,
            end: last,
            stops: vec![(0.0, self.start_color), (1.0, self.end_color)],
        };
        let stroke = Stroke::new(paint, context.to_screen_len(self.width)).rounded();
        surface.stroke_path(&self.edge_path(route), &stroke);
        surface.stroke_path(&Self::arrow_head(before_last, last), &stroke);
    }

    fn edge_path(&self, route: &[Position]) -> Path {
        Path::polyline(route)
    }
}
