//! Scene building and pointer hit testing.

use crate::style;
use kurbo::{BezPath, Circle, Point, Rect, RoundedRect, Shape as KurboShape};
use linkboard_core::{
    Anchor, Diagram, GeometryProvider, Gesture, PointerTarget, ShapeKind, anchor_position,
    to_canvas,
};

/// Outline and label placement for one node, in canvas-local coordinates.
pub struct NodeVisual {
    pub id: String,
    pub kind: ShapeKind,
    /// Outline path.
    pub outline: BezPath,
    /// Bounding frame.
    pub frame: Rect,
    /// Label text shown in the handle region.
    pub label: String,
    /// Anchor dot positions, in [`Anchor::ALL`] order.
    pub anchors: [Point; 4],
}

/// A settled connection: straight segment plus arrowhead wings.
pub struct EdgeVisual {
    pub id: String,
    pub start: Point,
    pub end: Point,
    /// Arrowhead wing tips; each wing is drawn to `end`.
    pub wings: [Point; 2],
}

/// The in-progress connection preview. Rendered dashed at reduced opacity
/// with no arrowhead; never part of the connection collection.
pub struct PreviewVisual {
    pub start: Point,
    pub end: Point,
}

/// Everything the painter needs for one frame.
pub struct Scene {
    pub nodes: Vec<NodeVisual>,
    pub edges: Vec<EdgeVisual>,
    pub preview: Option<PreviewVisual>,
}

/// Build the frame's scene from the diagram and transient gesture state.
///
/// Connections whose source or target node is no longer in the diagram are
/// skipped entirely. Anchor coordinates go through the geometry provider,
/// so a node the provider cannot resolve degrades to a segment endpoint at
/// the origin rather than a failure.
pub fn build_scene(diagram: &Diagram, gesture: &Gesture, geometry: &dyn GeometryProvider) -> Scene {
    let nodes = diagram.nodes().iter().map(node_visual).collect();

    let mut edges = Vec::with_capacity(diagram.connections().len());
    for conn in diagram.connections() {
        if diagram.node(&conn.source_id).is_none() || diagram.node(&conn.target_id).is_none() {
            log::debug!("skipping connection {} with a missing endpoint", conn.id);
            continue;
        }
        let start = anchor_position(geometry, &conn.source_id, conn.source_anchor);
        let end = anchor_position(geometry, &conn.target_id, conn.target_anchor);
        edges.push(EdgeVisual {
            id: conn.id.clone(),
            start,
            end,
            wings: arrowhead_wings(start, end),
        });
    }

    let preview = match gesture {
        Gesture::DrawConnection { start, end, .. } => Some(PreviewVisual {
            start: *start,
            end: *end,
        }),
        _ => None,
    };

    Scene {
        nodes,
        edges,
        preview,
    }
}

fn node_visual(node: &linkboard_core::Node) -> NodeVisual {
    let size = style::node_size(node.kind);
    let frame = Rect::new(
        node.position.x,
        node.position.y,
        node.position.x + size.width,
        node.position.y + size.height,
    );
    NodeVisual {
        id: node.id.clone(),
        kind: node.kind,
        outline: node_outline(node.kind, frame),
        frame,
        label: node.kind.as_str().to_string(),
        anchors: frame_anchors(frame),
    }
}

/// Outline path for a node kind within its frame. The diamond is a square
/// rotated onto its corner; the circle fills the frame.
pub fn node_outline(kind: ShapeKind, frame: Rect) -> BezPath {
    match kind {
        ShapeKind::Rectangle => {
            RoundedRect::from_rect(frame, style::NODE_CORNER_RADIUS).to_path(0.1)
        }
        ShapeKind::Circle => Circle::new(frame.center(), frame.width() / 2.0).to_path(0.1),
        ShapeKind::Diamond => {
            let center = frame.center();
            let mut path = BezPath::new();
            path.move_to((center.x, frame.y0));
            path.line_to((frame.x1, center.y));
            path.line_to((center.x, frame.y1));
            path.line_to((frame.x0, center.y));
            path.close_path();
            path
        }
    }
}

/// Anchor positions on a frame, in [`Anchor::ALL`] order.
fn frame_anchors(frame: Rect) -> [Point; 4] {
    let center = frame.center();
    [
        Point::new(center.x, frame.y0),
        Point::new(frame.x1, center.y),
        Point::new(center.x, frame.y1),
        Point::new(frame.x0, center.y),
    ]
}

/// Arrowhead wing tips at the target end, oriented along the segment.
///
/// The head is an open V: both wings sit `ARROWHEAD_SIZE` behind the tip,
/// offset perpendicular by the same amount, rotated by the segment angle
/// `atan2(dy, dx)` so the head points from source to target regardless of
/// relative node positions.
pub fn arrowhead_wings(start: Point, end: Point) -> [Point; 2] {
    let angle = (end.y - start.y).atan2(end.x - start.x);
    let (sin, cos) = angle.sin_cos();
    let s = style::ARROWHEAD_SIZE;
    let rotate = |lx: f64, ly: f64| {
        Point::new(
            end.x + lx * cos - ly * sin,
            end.y + lx * sin + ly * cos,
        )
    };
    [rotate(-s, -s), rotate(-s, s)]
}

/// Resolve a viewport position to the interactive element role under it.
///
/// Topmost node first (reverse insertion order). Anchor hit circles take
/// priority over the inner handle region, which takes priority over the
/// node body; the drag gesture never sees the carved-out regions.
pub fn hit_test(
    diagram: &Diagram,
    geometry: &dyn GeometryProvider,
    viewport: Point,
) -> PointerTarget {
    let p = to_canvas(geometry, viewport);
    let origin = geometry.canvas_origin();

    for node in diagram.nodes().iter().rev() {
        let Some(bbox) = geometry.bounding_box_of(&node.id) else {
            continue;
        };
        let frame = Rect::new(
            bbox.x0 - origin.x,
            bbox.y0 - origin.y,
            bbox.x1 - origin.x,
            bbox.y1 - origin.y,
        );
        for anchor in Anchor::ALL {
            let a = anchor_position(geometry, &node.id, anchor);
            if p.distance(a) <= style::ANCHOR_HIT_RADIUS {
                return PointerTarget::AnchorPoint {
                    node_id: node.id.clone(),
                    anchor,
                };
            }
        }
        if handle_region(frame).contains(p) {
            return PointerTarget::NodeHandle(node.id.clone());
        }
        if frame.contains(p) {
            return PointerTarget::NodeBody(node.id.clone());
        }
    }
    PointerTarget::Canvas
}

/// Inner label handle region of a node frame.
fn handle_region(frame: Rect) -> Rect {
    let inset_x = frame.width() * (1.0 - style::HANDLE_FRACTION) / 2.0;
    let inset_y = frame.height() * (1.0 - style::HANDLE_FRACTION) / 2.0;
    Rect::new(
        frame.x0 + inset_x,
        frame.y0 + inset_y,
        frame.x1 - inset_x,
        frame.y1 - inset_y,
    )
}
