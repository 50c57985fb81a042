use crate::geometry::{Position, Size, Viewport};
use crate::render::Path;

/// Grid lines closer together than this many pixels are not drawn.
pub const MIN_GRID_SPACING: f32 = 4.0;

/// Screen-space segments of an infinite background grid.
///
/// Lines are `spacing` world units apart and follow the viewport's pan and
/// zoom. Vertical lines come first, then horizontal ones. Nothing is
/// generated when the on-screen spacing drops below [`MIN_GRID_SPACING`].
///
/// # Arguments
/// * `viewport` - Current pan/zoom
/// * `size` - Surface size in pixels
/// * `spacing` - Grid spacing in world units
pub fn grid_lines(viewport: &Viewport, size: Size, spacing: f32) -> Vec<(Position, Position)> {
    let effective_spacing = viewport.world_to_screen_len(spacing);

    // Skip if spacing is too small to be visible
    if effective_spacing.is_nan() || effective_spacing < MIN_GRID_SPACING {
        return Vec::new();
    }

    // Offset modulo spacing gives the infinite grid effect
    let offset_x = viewport.offset.x.rem_euclid(effective_spacing);
    let offset_y = viewport.offset.y.rem_euclid(effective_spacing);

    let mut lines = Vec::new();

    let mut x = offset_x;
    while x < size.width + effective_spacing {
        lines.push((Position::new(x, 0.0), Position::new(x, size.height)));
        x += effective_spacing;
    }

    let mut y = offset_y;
    while y < size.height + effective_spacing {
        lines.push((Position::new(0.0, y), Position::new(size.width, y)));
        y += effective_spacing;
    }

    lines
}

/// The grid as one path of `M .. L ..` pairs.
pub fn grid_path(viewport: &Viewport, size: Size, spacing: f32) -> Path {
    grid_lines(viewport, size, spacing)
        .into_iter()
        .fold(Path::new(), |path, (from, to)| path.move_to(from).line_to(to))
}

/// Generate SVG path commands for grid lines
///
/// Suitable for a Slint `Path { commands: ... }` element stretched over the
/// canvas.
///
/// # Returns
/// SVG path commands string (e.g., "M 24 0 L 24 600 M 48 0 L 48 600...")
pub fn generate_grid_commands(viewport: &Viewport, size: Size, spacing: f32) -> String {
    grid_path(viewport, size, spacing).to_svg()
}
