//! World/screen geometry and the viewport transform.
//!
//! Everything the graph stores lives in **world space**. The drawing surface
//! works in **screen space** (pixels). The only bridge between the two is
//! [`Viewport`], which applies `screen = world * scale + offset`.

use crate::error::{GraphError, Result};

/// Smallest zoom factor reachable through [`Viewport::zoom_at`].
pub const MIN_SCALE: f32 = 0.1;
/// Largest zoom factor reachable through [`Viewport::zoom_at`].
pub const MAX_SCALE: f32 = 5.0;

/// A 2D point, either in world or in screen space depending on context.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Position {
    pub x: f32,
    pub y: f32,
}

impl Position {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Componentwise offset.
    pub fn offset(self, dx: f32, dy: f32) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }

    pub fn distance_sq(self, other: Position) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        dx * dx + dy * dy
    }

    pub fn distance(self, other: Position) -> f32 {
        self.distance_sq(other).sqrt()
    }
}

impl From<(f32, f32)> for Position {
    fn from((x, y): (f32, f32)) -> Self {
        Self::new(x, y)
    }
}

/// Node extents. Negative values are stored as given.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Size {
    pub width: f32,
    pub height: f32,
}

impl Size {
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

/// Axis-aligned rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self { x, y, width, height }
    }

    pub fn from_position_size(position: Position, size: Size) -> Self {
        Self::new(position.x, position.y, size.width, size.height)
    }

    pub fn origin(&self) -> Position {
        Position::new(self.x, self.y)
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    /// Inclusive containment test: points on the border are inside.
    pub fn contains(&self, point: Position) -> bool {
        point.x >= self.x
            && point.x <= self.right()
            && point.y >= self.y
            && point.y <= self.bottom()
    }

    /// True when the two rectangles overlap (touching edges count).
    pub fn intersects(&self, other: &Rect) -> bool {
        self.x <= other.right()
            && self.right() >= other.x
            && self.y <= other.bottom()
            && self.bottom() >= other.y
    }
}

/// Pan/zoom state mapping world coordinates onto the drawing surface.
///
/// `scale` is always strictly positive: the only way to change it is through
/// [`set_scale`](Self::set_scale) or [`zoom_at`](Self::zoom_at), both of which
/// refuse or clamp invalid values.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    /// Screen-space translation in pixels.
    pub offset: Position,
    scale: f32,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            offset: Position::default(),
            scale: 1.0,
        }
    }
}

impl Viewport {
    pub fn new(offset: Position, scale: f32) -> Result<Self> {
        let mut viewport = Self {
            offset,
            ..Self::default()
        };
        viewport.set_scale(scale)?;
        Ok(viewport)
    }

    pub fn scale(&self) -> f32 {
        self.scale
    }

    /// Replace the zoom factor.
    ///
    /// Fails with [`GraphError::InvalidScale`] for zero, negative, NaN or
    /// infinite values and leaves the viewport untouched.
    pub fn set_scale(&mut self, scale: f32) -> Result<()> {
        if !scale.is_finite() || scale <= 0.0 {
            return Err(GraphError::InvalidScale(scale));
        }
        self.scale = scale;
        Ok(())
    }

    pub fn world_to_screen(&self, p: Position) -> Position {
        Position::new(p.x * self.scale + self.offset.x, p.y * self.scale + self.offset.y)
    }

    pub fn screen_to_world(&self, p: Position) -> Position {
        Position::new((p.x - self.offset.x) / self.scale, (p.y - self.offset.y) / self.scale)
    }

    /// Convert a world-space length (width, radius, ...) to pixels.
    pub fn world_to_screen_len(&self, len: f32) -> f32 {
        len * self.scale
    }

    /// Convert a pixel length to world units.
    pub fn screen_to_world_len(&self, len: f32) -> f32 {
        len / self.scale
    }

    pub fn world_rect_to_screen(&self, rect: Rect) -> Rect {
        let origin = self.world_to_screen(rect.origin());
        Rect::new(
            origin.x,
            origin.y,
            self.world_to_screen_len(rect.width),
            self.world_to_screen_len(rect.height),
        )
    }

    /// The part of the world visible on a surface of the given pixel size.
    pub fn visible_world_rect(&self, surface: Size) -> Rect {
        let origin = self.screen_to_world(Position::default());
        Rect::new(
            origin.x,
            origin.y,
            self.screen_to_world_len(surface.width),
            self.screen_to_world_len(surface.height),
        )
    }

    /// Translate the view by a screen-space delta.
    pub fn pan_by(&mut self, dx: f32, dy: f32) {
        self.offset = self.offset.offset(dx, dy);
    }

    /// Multiply the scale by `factor`, clamped into `[min, max]`, keeping the
    /// world point under `anchor` (screen space) fixed on screen.
    ///
    /// Returns the resulting scale. Non-positive or non-finite factors leave
    /// the viewport unchanged, as do limits that are not finite, not positive
    /// or out of order.
    pub fn zoom_at(&mut self, anchor: Position, factor: f32, min: f32, max: f32) -> f32 {
        if !factor.is_finite() || factor <= 0.0 {
            return self.scale;
        }
        if !(min.is_finite() && max.is_finite() && min > 0.0 && min <= max) {
            return self.scale;
        }
        let world_anchor = self.screen_to_world(anchor);
        self.scale = (self.scale * factor).clamp(min, max);
        let moved = self.world_to_screen(world_anchor);
        self.pan_by(anchor.x - moved.x, anchor.y - moved.y);
        self.scale
    }
}
