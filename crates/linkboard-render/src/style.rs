//! Presentation constants for the canvas.
//!
//! Node extents live here, in the presentation layer; the core never knows
//! them and always goes through the geometry provider.

use kurbo::Size;
use linkboard_core::ShapeKind;
use peniko::Color;

/// Stroke width for node outlines and connection segments.
pub const STROKE_WIDTH: f64 = 2.0;

/// Dash pattern for the in-progress connection preview.
pub const PREVIEW_DASH: [f64; 2] = [5.0, 5.0];

/// Opacity of the preview segment.
pub const PREVIEW_OPACITY: f64 = 0.5;

/// Distance of the arrowhead wings behind (and beside) the target point.
pub const ARROWHEAD_SIZE: f64 = 6.0;

/// Radius of the rendered anchor dots.
pub const ANCHOR_RADIUS: f64 = 5.0;

/// Hit radius around an anchor point.
pub const ANCHOR_HIT_RADIUS: f64 = 8.0;

/// Fraction of the node frame covered by the inner label handle region.
pub const HANDLE_FRACTION: f64 = 0.6;

/// Corner radius for rectangle node outlines.
pub const NODE_CORNER_RADIUS: f64 = 4.0;

/// Rendered size of a node, by kind.
pub fn node_size(kind: ShapeKind) -> Size {
    match kind {
        ShapeKind::Rectangle => Size::new(120.0, 60.0),
        ShapeKind::Circle => Size::new(80.0, 80.0),
        ShapeKind::Diamond => Size::new(80.0, 80.0),
    }
}

/// Node outline color.
pub fn node_stroke_color() -> Color {
    Color::from_rgba8(51, 51, 51, 255)
}

/// Node fill color.
pub fn node_fill_color() -> Color {
    Color::from_rgba8(255, 255, 255, 255)
}

/// Connection segment and arrowhead color.
pub fn edge_color() -> Color {
    Color::from_rgba8(79, 70, 229, 255)
}

/// Anchor dot color.
pub fn anchor_color() -> Color {
    Color::from_rgba8(79, 70, 229, 255)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_node_sizes() {
        assert!(node_size(ShapeKind::Rectangle).width > node_size(ShapeKind::Circle).width);
        let circle = node_size(ShapeKind::Circle);
        assert!((circle.width - circle.height).abs() < f64::EPSILON);
    }
}
