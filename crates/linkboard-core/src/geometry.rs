//! Geometry provider abstraction and anchor computation.

use crate::model::Anchor;
use kurbo::{Point, Rect};

/// Query service for rendered node extents.
///
/// The shell backs this with the live layout; tests use fixed rectangles.
/// Boxes are reported in the same coordinate space as the canvas surface's
/// own bounding box, which is queryable through [`canvas_origin`].
///
/// [`canvas_origin`]: GeometryProvider::canvas_origin
pub trait GeometryProvider {
    /// Bounding box of the node as currently rendered, or `None` if the
    /// node has no rendered extent.
    fn bounding_box_of(&self, node_id: &str) -> Option<Rect>;

    /// Origin of the canvas surface itself.
    fn canvas_origin(&self) -> Point;
}

/// Convert a viewport position to canvas-local coordinates.
pub fn to_canvas(geometry: &dyn GeometryProvider, viewport: Point) -> Point {
    let origin = geometry.canvas_origin();
    Point::new(viewport.x - origin.x, viewport.y - origin.y)
}

/// Canvas-local position of a node anchor.
///
/// Anchors sit at the midpoints of the rendered bounding box edges. The box
/// is re-queried on every call; node positions and the canvas origin may
/// both change between queries, so nothing here is cached. A node without a
/// rendered extent degrades to the origin point rather than failing.
pub fn anchor_position(geometry: &dyn GeometryProvider, node_id: &str, anchor: Anchor) -> Point {
    let Some(rect) = geometry.bounding_box_of(node_id) else {
        return Point::ZERO;
    };
    let origin = geometry.canvas_origin();
    let x = rect.x0 - origin.x;
    let y = rect.y0 - origin.y;

    match anchor {
        Anchor::Top => Point::new(x + rect.width() / 2.0, y),
        Anchor::Right => Point::new(x + rect.width(), y + rect.height() / 2.0),
        Anchor::Bottom => Point::new(x + rect.width() / 2.0, y + rect.height()),
        Anchor::Left => Point::new(x, y + rect.height() / 2.0),
    }
}
