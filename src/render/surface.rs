//! Immediate-mode drawing primitives.
//!
//! Renderers draw through the [`DrawingSurface`] trait in screen pixels.
//! [`SvgPathSurface`] records each primitive as an SVG path command string,
//! the format Slint's `Path { commands: ... }` element draws directly.

use std::f32::consts::{PI, TAU};
use std::fmt::Write as _;

use slint::Color;

use crate::geometry::{Position, Rect, Size};

/// One segment of a [`Path`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PathSegment {
    MoveTo(Position),
    LineTo(Position),
    QuadTo {
        control: Position,
        to: Position,
    },
    CubicTo {
        control1: Position,
        control2: Position,
        to: Position,
    },
    /// Circular arc, angles in radians, clockwise on screen for increasing
    /// angles. Connected to the current point by a straight line.
    Arc {
        center: Position,
        radius: f32,
        start_angle: f32,
        end_angle: f32,
    },
    Close,
}

/// A sequence of path segments, built with chained calls.
///
/// ```
/// use slint_node_system::render::Path;
/// use slint_node_system::Position;
///
/// let path = Path::new()
///     .move_to(Position::new(0.0, 0.0))
///     .line_to(Position::new(10.0, 0.0))
///     .close();
/// assert_eq!(path.to_svg(), "M 0 0 L 10 0 Z");
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Path {
    segments: Vec<PathSegment>,
}

impl Path {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn move_to(mut self, to: Position) -> Self {
        self.segments.push(PathSegment::MoveTo(to));
        self
    }

    pub fn line_to(mut self, to: Position) -> Self {
        self.segments.push(PathSegment::LineTo(to));
        self
    }

    pub fn quad_to(mut self, control: Position, to: Position) -> Self {
        self.segments.push(PathSegment::QuadTo { control, to });
        self
    }

    pub fn cubic_to(mut self, control1: Position, control2: Position, to: Position) -> Self {
        self.segments.push(PathSegment::CubicTo { control1, control2, to });
        self
    }

    pub fn arc(mut self, center: Position, radius: f32, start_angle: f32, end_angle: f32) -> Self {
        self.segments.push(PathSegment::Arc {
            center,
            radius,
            start_angle,
            end_angle,
        });
        self
    }

    pub fn close(mut self) -> Self {
        self.segments.push(PathSegment::Close);
        self
    }

    pub fn segments(&self) -> &[PathSegment] {
        &self.segments
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Append all segments of `other`.
    pub fn extend(mut self, other: Path) -> Self {
        self.segments.extend(other.segments);
        self
    }

    pub fn rect(rect: Rect) -> Self {
        Self::new()
            .move_to(rect.origin())
            .line_to(Position::new(rect.right(), rect.y))
            .line_to(Position::new(rect.right(), rect.bottom()))
            .line_to(Position::new(rect.x, rect.bottom()))
            .close()
    }

    /// Rectangle with quadratic corners of the given radius.
    pub fn rounded_rect(rect: Rect, radius: f32) -> Self {
        let Rect { x, y, width, height } = rect;
        let r = radius.min(width / 2.0).min(height / 2.0).max(0.0);
        Self::new()
            .move_to(Position::new(x + r, y))
            .line_to(Position::new(x + width - r, y))
            .quad_to(Position::new(x + width, y), Position::new(x + width, y + r))
            .line_to(Position::new(x + width, y + height - r))
            .quad_to(Position::new(x + width, y + height), Position::new(x + width - r, y + height))
            .line_to(Position::new(x + r, y + height))
            .quad_to(Position::new(x, y + height), Position::new(x, y + height - r))
            .line_to(Position::new(x, y + r))
            .quad_to(Position::new(x, y), Position::new(x + r, y))
            .close()
    }

    pub fn circle(center: Position, radius: f32) -> Self {
        Self::new().arc(center, radius, 0.0, TAU).close()
    }

    /// Straight segments through every point. Fewer than two points give an
    /// empty path.
    pub fn polyline(points: &[Position]) -> Self {
        match points {
            [first, rest @ ..] if !rest.is_empty() => rest
                .iter()
                .fold(Self::new().move_to(*first), |path, p| path.line_to(*p)),
            _ => Self::new(),
        }
    }

    /// Path for an edge route: four points are one cubic curve, anything
    /// else a polyline.
    pub fn from_route(route: &[Position]) -> Self {
        match route {
            [p0, p1, p2, p3] => Self::new().move_to(*p0).cubic_to(*p1, *p2, *p3),
            _ => Self::polyline(route),
        }
    }

    /// SVG path data (`M`, `L`, `Q`, `C`, `A`, `Z` commands).
    pub fn to_svg(&self) -> String {
        let mut out = String::new();
        let mut has_current = false;

        for segment in &self.segments {
            match *segment {
                PathSegment::MoveTo(p) => {
                    push_command(&mut out, format_args!("M {} {}", p.x, p.y));
                    has_current = true;
                }
                PathSegment::LineTo(p) => {
                    let cmd = if has_current { "L" } else { "M" };
                    push_command(&mut out, format_args!("{} {} {}", cmd, p.x, p.y));
                    has_current = true;
                }
                PathSegment::QuadTo { control, to } => {
                    push_command(
                        &mut out,
                        format_args!("Q {} {} {} {}", control.x, control.y, to.x, to.y),
                    );
                    has_current = true;
                }
                PathSegment::CubicTo { control1, control2, to } => {
                    push_command(
                        &mut out,
                        format_args!(
                            "C {} {} {} {} {} {}",
                            control1.x, control1.y, control2.x, control2.y, to.x, to.y
                        ),
                    );
                    has_current = true;
                }
                PathSegment::Arc {
                    center,
                    radius,
                    start_angle,
                    end_angle,
                } => {
                    write_arc(&mut out, has_current, center, radius, start_angle, end_angle);
                    has_current = true;
                }
                PathSegment::Close => push_command(&mut out, format_args!("Z")),
            }
        }
        out
    }
}

fn push_command(out: &mut String, args: std::fmt::Arguments<'_>) {
    if !out.is_empty() {
        out.push(' ');
    }
    let _ = out.write_fmt(args);
}

fn point_on_circle(center: Position, radius: f32, angle: f32) -> Position {
    Position::new(center.x + radius * angle.cos(), center.y + radius * angle.sin())
}

fn write_arc(
    out: &mut String,
    has_current: bool,
    center: Position,
    radius: f32,
    start: f32,
    end: f32,
) {
    let start_point = point_on_circle(center, radius, start);
    let cmd = if has_current { "L" } else { "M" };
    push_command(out, format_args!("{} {} {}", cmd, start_point.x, start_point.y));

    let sweep = end - start;
    if sweep.abs() < f32::EPSILON {
        return;
    }
    let sweep_flag = u8::from(sweep > 0.0);

    // SVG cannot draw a full circle with one arc command
    if sweep.abs() >= TAU - 1e-4 {
        let half = start + PI * sweep.signum();
        let mid = point_on_circle(center, radius, half);
        push_command(
            out,
            format_args!("A {} {} 0 0 {} {} {}", radius, radius, sweep_flag, mid.x, mid.y),
        );
        push_command(
            out,
            format_args!(
                "A {} {} 0 0 {} {} {}",
                radius, radius, sweep_flag, start_point.x, start_point.y
            ),
        );
        return;
    }

    let end_point = point_on_circle(center, radius, end);
    let large_arc = u8::from(sweep.abs() > PI);
    push_command(
        out,
        format_args!(
            "A {} {} 0 {} {} {} {}",
            radius, radius, large_arc, sweep_flag, end_point.x, end_point.y
        ),
    );
}

/// Fill or stroke color source.
#[derive(Debug, Clone, PartialEq)]
pub enum Paint {
    Solid(Color),
    /// Linear gradient between two screen points, stops at offsets `0..=1`.
    LinearGradient {
        start: Position,
        end: Position,
        stops: Vec<(f32, Color)>,
    },
}

impl From<Color> for Paint {
    fn from(color: Color) -> Self {
        Paint::Solid(color)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LineCap {
    #[default]
    Butt,
    Round,
    Square,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LineJoin {
    #[default]
    Miter,
    Round,
    Bevel,
}

/// Outline style.
#[derive(Debug, Clone, PartialEq)]
pub struct Stroke {
    pub paint: Paint,
    /// Width in pixels.
    pub width: f32,
    pub line_cap: LineCap,
    pub line_join: LineJoin,
}

impl Stroke {
    pub fn new(paint: impl Into<Paint>, width: f32) -> Self {
        Self {
            paint: paint.into(),
            width,
            line_cap: LineCap::default(),
            line_join: LineJoin::default(),
        }
    }

    pub fn rounded(mut self) -> Self {
        self.line_cap = LineCap::Round;
        self.line_join = LineJoin::Round;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextAlign {
    #[default]
    Left,
    Center,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextBaseline {
    Top,
    #[default]
    Middle,
    Alphabetic,
    Bottom,
}

/// Font and placement of a text run.
#[derive(Debug, Clone, PartialEq)]
pub struct TextStyle {
    /// CSS-like font shorthand, e.g. `"12px sans-serif"`.
    pub font: String,
    pub color: Color,
    pub align: TextAlign,
    pub baseline: TextBaseline,
}

impl TextStyle {
    pub fn new(font: impl Into<String>, color: Color) -> Self {
        Self {
            font: font.into(),
            color,
            align: TextAlign::default(),
            baseline: TextBaseline::default(),
        }
    }

    pub fn aligned(mut self, align: TextAlign) -> Self {
        self.align = align;
        self
    }

    pub fn with_baseline(mut self, baseline: TextBaseline) -> Self {
        self.baseline = baseline;
        self
    }
}

/// A 2D immediate-mode drawing target in screen pixels.
pub trait DrawingSurface {
    fn size(&self) -> Size;

    /// Fill the whole surface, discarding what was drawn before.
    fn clear(&mut self, color: Color);

    fn fill_path(&mut self, path: &Path, paint: &Paint);

    fn stroke_path(&mut self, path: &Path, stroke: &Stroke);

    fn fill_text(&mut self, text: &str, at: Position, style: &TextStyle);

    fn fill_rect(&mut self, rect: Rect, paint: &Paint) {
        self.fill_path(&Path::rect(rect), paint);
    }

    fn stroke_rect(&mut self, rect: Rect, stroke: &Stroke) {
        self.stroke_path(&Path::rect(rect), stroke);
    }
}

/// A recorded path layer: SVG commands plus how to paint them.
#[derive(Debug, Clone, PartialEq)]
pub struct SvgLayer {
    pub commands: String,
    pub fill: Option<Paint>,
    pub stroke: Option<Stroke>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TextItem {
    pub text: String,
    pub position: Position,
    pub style: TextStyle,
}

#[derive(Debug, Clone, PartialEq)]
pub enum DrawItem {
    Path(SvgLayer),
    Text(TextItem),
}

/// Surface that records every primitive in draw order.
#[derive(Debug, Clone, Default)]
pub struct SvgPathSurface {
    size: Size,
    background: Option<Color>,
    items: Vec<DrawItem>,
}

impl SvgPathSurface {
    pub fn new(size: Size) -> Self {
        Self {
            size,
            ..Self::default()
        }
    }

    pub fn set_size(&mut self, size: Size) {
        self.size = size;
    }

    /// Color of the last `clear`, if any.
    pub fn background(&self) -> Option<Color> {
        self.background
    }

    pub fn items(&self) -> &[DrawItem] {
        &self.items
    }

    pub fn layers(&self) -> impl Iterator<Item = &SvgLayer> {
        self.items.iter().filter_map(|item| match item {
            DrawItem::Path(layer) => Some(layer),
            DrawItem::Text(_) => None,
        })
    }

    pub fn texts(&self) -> impl Iterator<Item = &TextItem> {
        self.items.iter().filter_map(|item| match item {
            DrawItem::Text(text) => Some(text),
            DrawItem::Path(_) => None,
        })
    }

    pub fn into_items(self) -> Vec<DrawItem> {
        self.items
    }
}

impl DrawingSurface for SvgPathSurface {
    fn size(&self) -> Size {
        self.size
    }

    fn clear(&mut self, color: Color) {
        self.items.clear();
        self.background = Some(color);
    }

    fn fill_path(&mut self, path: &Path, paint: &Paint) {
        if path.is_empty() {
            return;
        }
        self.items.push(DrawItem::Path(SvgLayer {
            commands: path.to_svg(),
            fill: Some(paint.clone()),
            stroke: None,
        }));
    }

    fn stroke_path(&mut self, path: &Path, stroke: &Stroke) {
        if path.is_empty() {
            return;
        }
        self.items.push(DrawItem::Path(SvgLayer {
            commands: path.to_svg(),
            fill: None,
            stroke: Some(stroke.clone()),
        }));
    }

    fn fill_text(&mut self, text: &str, at: Position, style: &TextStyle) {
        self.items.push(DrawItem::Text(TextItem {
            text: text.to_string(),
            position: at,
            style: style.clone(),
        }));
    }
}
