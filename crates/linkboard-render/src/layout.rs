//! Canvas layout as the geometry provider.

use crate::style;
use kurbo::{Point, Rect};
use linkboard_core::{Diagram, GeometryProvider};
use std::collections::HashMap;

/// Geometry provider backed by a measurement of the rendered layout.
///
/// In an immediate-mode shell the rendered extent of a node is exactly its
/// model position plus the style size for its kind, offset by the canvas
/// surface origin. [`capture`] takes that measurement; the shell captures
/// freshly for every event batch and again before painting, so moved nodes
/// and a moved canvas never serve stale boxes.
///
/// [`capture`]: LayoutGeometry::capture
pub struct LayoutGeometry {
    origin: Point,
    boxes: HashMap<String, Rect>,
}

impl LayoutGeometry {
    /// Measure the rendered extent of every node in the diagram, with the
    /// canvas surface at `origin`.
    pub fn capture(diagram: &Diagram, origin: Point) -> Self {
        let boxes = diagram
            .nodes()
            .iter()
            .map(|node| {
                let size = style::node_size(node.kind);
                let rect = Rect::new(
                    origin.x + node.position.x,
                    origin.y + node.position.y,
                    origin.x + node.position.x + size.width,
                    origin.y + node.position.y + size.height,
                );
                (node.id.clone(), rect)
            })
            .collect();
        Self { origin, boxes }
    }
}

impl GeometryProvider for LayoutGeometry {
    fn bounding_box_of(&self, node_id: &str) -> Option<Rect> {
        self.boxes.get(node_id).copied()
    }

    fn canvas_origin(&self) -> Point {
        self.origin
    }
}
