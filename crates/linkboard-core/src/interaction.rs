//! Gesture state machine driving diagram mutations.
//!
//! All transitions happen synchronously inside the handler for a single
//! pointer event; the host event loop serializes events, so at most one
//! gesture is ever active. The single [`Gesture`] union makes a
//! simultaneously-active drag and draw unrepresentable.

use crate::geometry::{GeometryProvider, to_canvas};
use crate::model::{Anchor, Connection, Diagram, Node, NodeIdGenerator, connection_id};
use crate::palette::{ShapeDescriptor, decode_payload};
use kurbo::{Point, Vec2};

/// Interactive element roles the renderer attaches to pointer events.
///
/// The renderer is responsible for resolving each event to the element role
/// under the pointer; the core only interprets roles.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PointerTarget {
    /// Bare canvas surface.
    Canvas,
    /// A node's draggable body.
    NodeBody(String),
    /// The inner label handle region of a node.
    NodeHandle(String),
    /// A connection anchor on a node's boundary.
    AnchorPoint { node_id: String, anchor: Anchor },
}

/// The at-most-one transient gesture.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Gesture {
    /// No gesture in progress.
    #[default]
    Idle,
    /// A node body is being dragged. `offset` is the pointer-to-node offset
    /// captured at drag start, so the node never snaps to the pointer.
    DragNode { node_id: String, offset: Vec2 },
    /// A connection is being drawn from an anchor. `start` is fixed for the
    /// gesture's duration; `end` tracks the live pointer for the preview.
    DrawConnection {
        source_id: String,
        source_anchor: Anchor,
        start: Point,
        end: Point,
    },
}

impl Gesture {
    /// Check that no gesture is in progress.
    pub fn is_idle(&self) -> bool {
        matches!(self, Gesture::Idle)
    }
}

/// Owns the diagram and applies gesture transitions to it.
///
/// The editor is the only component that mutates the [`Diagram`]; the
/// renderer reads it. Every edge case is a policy branch, never a failure:
/// rejected gestures simply leave the diagram untouched.
#[derive(Debug, Default)]
pub struct Editor {
    diagram: Diagram,
    gesture: Gesture,
    ids: NodeIdGenerator,
}

impl Editor {
    /// Create an editor over an empty diagram.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an editor over an existing diagram.
    pub fn with_diagram(diagram: Diagram) -> Self {
        Self {
            diagram,
            gesture: Gesture::Idle,
            ids: NodeIdGenerator::new(),
        }
    }

    /// Read access to the diagram.
    pub fn diagram(&self) -> &Diagram {
        &self.diagram
    }

    /// The current gesture state.
    pub fn gesture(&self) -> &Gesture {
        &self.gesture
    }

    /// Check if a node drag is being tracked.
    pub fn is_dragging(&self) -> bool {
        matches!(self.gesture, Gesture::DragNode { .. })
    }

    /// Check if a connection is being drawn.
    pub fn is_drawing(&self) -> bool {
        matches!(self.gesture, Gesture::DrawConnection { .. })
    }

    /// Endpoints of the in-progress connection preview, if any.
    pub fn preview_segment(&self) -> Option<(Point, Point)> {
        match &self.gesture {
            Gesture::DrawConnection { start, end, .. } => Some((*start, *end)),
            _ => None,
        }
    }

    /// Pointer press on a canvas element.
    ///
    /// An anchor press begins connection drawing; a node body press begins a
    /// drag. The anchor and inner handle regions are carved out of the
    /// draggable body, so pressing them never initiates node movement.
    pub fn pointer_pressed(
        &mut self,
        target: &PointerTarget,
        viewport: Point,
        geometry: &dyn GeometryProvider,
    ) {
        if !self.gesture.is_idle() {
            return;
        }
        match target {
            PointerTarget::AnchorPoint { node_id, anchor } => {
                let p = to_canvas(geometry, viewport);
                log::debug!("drawing connection from {} {:?}", node_id, anchor);
                self.gesture = Gesture::DrawConnection {
                    source_id: node_id.clone(),
                    source_anchor: *anchor,
                    start: p,
                    end: p,
                };
            }
            PointerTarget::NodeBody(node_id) => {
                let Some(node) = self.diagram.node(node_id) else {
                    return;
                };
                let p = to_canvas(geometry, viewport);
                let offset = Vec2::new(p.x - node.position.x, p.y - node.position.y);
                self.gesture = Gesture::DragNode {
                    node_id: node_id.clone(),
                    offset,
                };
            }
            PointerTarget::NodeHandle(_) | PointerTarget::Canvas => {}
        }
    }

    /// Pointer move anywhere over the canvas.
    pub fn pointer_moved(&mut self, viewport: Point, geometry: &dyn GeometryProvider) {
        let p = to_canvas(geometry, viewport);
        match &mut self.gesture {
            Gesture::Idle => {}
            Gesture::DragNode { node_id, offset } => {
                let id = node_id.clone();
                let position = Point::new(p.x - offset.x, p.y - offset.y);
                self.diagram.set_node_position(&id, position);
            }
            Gesture::DrawConnection { end, .. } => *end = p,
        }
    }

    /// Pointer release on a canvas element.
    ///
    /// Completes connection drawing when released over an anchor of a
    /// different node; a release over the source node's own anchors is
    /// rejected, and any other release cancels the draw. A tracked drag
    /// finalizes with no further side effect. All paths return to idle.
    pub fn pointer_released(&mut self, target: &PointerTarget) {
        match std::mem::take(&mut self.gesture) {
            Gesture::Idle => {}
            Gesture::DragNode { .. } => {}
            Gesture::DrawConnection {
                source_id,
                source_anchor,
                ..
            } => {
                let PointerTarget::AnchorPoint { node_id, anchor } = target else {
                    return;
                };
                if *node_id == source_id {
                    log::debug!("self-connection on {source_id} rejected");
                    return;
                }
                self.diagram.add_connection(Connection {
                    id: connection_id(),
                    source_id,
                    target_id: node_id.clone(),
                    source_anchor,
                    target_anchor: *anchor,
                });
            }
        }
    }

    /// Palette payload released over the canvas, still in wire form.
    ///
    /// The palette is a trusted collaborator; a malformed payload is logged
    /// and discarded rather than recovered.
    pub fn drop_payload(
        &mut self,
        payload: &str,
        viewport: Point,
        geometry: &dyn GeometryProvider,
    ) {
        match decode_payload(payload) {
            Ok(shape) => self.drop_shape(&shape, viewport, geometry),
            Err(err) => log::warn!("discarding palette payload: {err}"),
        }
    }

    /// A decoded palette shape released over the canvas.
    ///
    /// Creates exactly one node per valid drop, at the pointer position in
    /// canvas-local space. While a node drag is tracked the drop finalizes
    /// the drag instead; the two gestures are mutually exclusive and drag
    /// takes precedence.
    pub fn drop_shape(
        &mut self,
        shape: &ShapeDescriptor,
        viewport: Point,
        geometry: &dyn GeometryProvider,
    ) {
        match self.gesture {
            Gesture::Idle => {
                let position = to_canvas(geometry, viewport);
                let id = self.ids.next_id(shape.id);
                self.diagram.add_node(Node {
                    id,
                    kind: shape.id,
                    position,
                });
            }
            Gesture::DragNode { .. } => self.gesture = Gesture::Idle,
            Gesture::DrawConnection { .. } => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ShapeKind;
    use crate::palette::ShapeDescriptor;
    use kurbo::Rect;
    use std::collections::HashMap;

    /// Fixed-rectangle geometry: canvas at (10, 10), node boxes derived
    /// from the diagram on demand by the test.
    struct FixedGeometry {
        origin: Point,
        boxes: HashMap<String, Rect>,
    }

    impl FixedGeometry {
        fn new() -> Self {
            Self {
                origin: Point::new(10.0, 10.0),
                boxes: HashMap::new(),
            }
        }
    }

    impl GeometryProvider for FixedGeometry {
        fn bounding_box_of(&self, node_id: &str) -> Option<Rect> {
            self.boxes.get(node_id).copied()
        }

        fn canvas_origin(&self) -> Point {
            self.origin
        }
    }

    fn body(editor: &Editor, index: usize) -> PointerTarget {
        PointerTarget::NodeBody(editor.diagram().nodes()[index].id.clone())
    }

    fn anchor_of(editor: &Editor, index: usize, anchor: Anchor) -> PointerTarget {
        PointerTarget::AnchorPoint {
            node_id: editor.diagram().nodes()[index].id.clone(),
            anchor,
        }
    }

    fn drop_at(editor: &mut Editor, kind: ShapeKind, x: f64, y: f64) {
        let geometry = FixedGeometry::new();
        editor.drop_shape(&ShapeDescriptor::new(kind), Point::new(x, y), &geometry);
    }

    #[test]
    fn test_drop_places_node_in_canvas_space() {
        let mut editor = Editor::new();
        drop_at(&mut editor, ShapeKind::Rectangle, 100.0, 100.0);

        let node = &editor.diagram().nodes()[0];
        assert_eq!(node.kind, ShapeKind::Rectangle);
        assert!((node.position.x - 90.0).abs() < f64::EPSILON);
        assert!((node.position.y - 90.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_dropped_node_ids_distinct() {
        let mut editor = Editor::new();
        for _ in 0..20 {
            drop_at(&mut editor, ShapeKind::Circle, 50.0, 50.0);
        }

        let mut seen = std::collections::HashSet::new();
        for node in editor.diagram().nodes() {
            assert!(seen.insert(node.id.clone()));
        }
        assert_eq!(seen.len(), 20);
    }

    #[test]
    fn test_drop_while_dragging_creates_nothing() {
        let mut editor = Editor::new();
        let geometry = FixedGeometry::new();
        drop_at(&mut editor, ShapeKind::Rectangle, 100.0, 100.0);

        editor.pointer_pressed(&body(&editor, 0), Point::new(110.0, 110.0), &geometry);
        assert!(editor.is_dragging());

        editor.drop_shape(
            &ShapeDescriptor::new(ShapeKind::Circle),
            Point::new(200.0, 200.0),
            &geometry,
        );
        assert_eq!(editor.diagram().nodes().len(), 1);
        assert!(editor.gesture().is_idle());
    }

    #[test]
    fn test_drag_translates_by_pointer_delta() {
        let mut editor = Editor::new();
        let geometry = FixedGeometry::new();
        drop_at(&mut editor, ShapeKind::Rectangle, 100.0, 100.0); // node at (90, 90)

        // Grab the body off-center and move the pointer by (25, -10).
        editor.pointer_pressed(&body(&editor, 0), Point::new(130.0, 120.0), &geometry);
        editor.pointer_moved(Point::new(155.0, 110.0), &geometry);

        let node = &editor.diagram().nodes()[0];
        assert!((node.position.x - 115.0).abs() < f64::EPSILON);
        assert!((node.position.y - 80.0).abs() < f64::EPSILON);

        editor.pointer_released(&PointerTarget::Canvas);
        assert!(editor.gesture().is_idle());
        assert!((editor.diagram().nodes()[0].position.x - 115.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_handle_and_anchor_do_not_start_drag() {
        let mut editor = Editor::new();
        let geometry = FixedGeometry::new();
        drop_at(&mut editor, ShapeKind::Diamond, 100.0, 100.0);
        let id = editor.diagram().nodes()[0].id.clone();

        editor.pointer_pressed(
            &PointerTarget::NodeHandle(id),
            Point::new(120.0, 120.0),
            &geometry,
        );
        assert!(editor.gesture().is_idle());

        editor.pointer_pressed(&anchor_of(&editor, 0, Anchor::Top), Point::new(120.0, 100.0), &geometry);
        assert!(editor.is_drawing());
        assert!(!editor.is_dragging());
    }

    #[test]
    fn test_draw_tracks_end_only() {
        let mut editor = Editor::new();
        let geometry = FixedGeometry::new();
        drop_at(&mut editor, ShapeKind::Rectangle, 100.0, 100.0);

        editor.pointer_pressed(&anchor_of(&editor, 0, Anchor::Right), Point::new(150.0, 120.0), &geometry);
        let (start, end) = editor.preview_segment().unwrap();
        assert_eq!(start, end);
        assert!((start.x - 140.0).abs() < f64::EPSILON);

        editor.pointer_moved(Point::new(300.0, 200.0), &geometry);
        let (start, end) = editor.preview_segment().unwrap();
        assert!((start.x - 140.0).abs() < f64::EPSILON);
        assert!((end.x - 290.0).abs() < f64::EPSILON);
        assert!((end.y - 190.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_connection_completion() {
        let mut editor = Editor::new();
        let geometry = FixedGeometry::new();
        drop_at(&mut editor, ShapeKind::Rectangle, 100.0, 100.0);
        drop_at(&mut editor, ShapeKind::Circle, 300.0, 100.0);

        editor.pointer_pressed(&anchor_of(&editor, 0, Anchor::Right), Point::new(150.0, 120.0), &geometry);
        editor.pointer_moved(Point::new(280.0, 120.0), &geometry);
        editor.pointer_released(&anchor_of(&editor, 1, Anchor::Left));

        let connections = editor.diagram().connections();
        assert_eq!(connections.len(), 1);
        let conn = &connections[0];
        assert_eq!(conn.source_id, editor.diagram().nodes()[0].id);
        assert_eq!(conn.target_id, editor.diagram().nodes()[1].id);
        assert_eq!(conn.source_anchor, Anchor::Right);
        assert_eq!(conn.target_anchor, Anchor::Left);
        assert!(editor.gesture().is_idle());
    }

    #[test]
    fn test_self_connection_rejected() {
        let mut editor = Editor::new();
        let geometry = FixedGeometry::new();
        drop_at(&mut editor, ShapeKind::Rectangle, 100.0, 100.0);

        editor.pointer_pressed(&anchor_of(&editor, 0, Anchor::Top), Point::new(120.0, 100.0), &geometry);
        editor.pointer_released(&anchor_of(&editor, 0, Anchor::Bottom));

        assert!(editor.diagram().connections().is_empty());
        assert!(editor.gesture().is_idle());
    }

    #[test]
    fn test_cancellation_returns_to_fresh_idle() {
        let mut editor = Editor::new();
        let geometry = FixedGeometry::new();
        drop_at(&mut editor, ShapeKind::Rectangle, 100.0, 100.0);
        drop_at(&mut editor, ShapeKind::Circle, 300.0, 100.0);

        editor.pointer_pressed(&anchor_of(&editor, 0, Anchor::Right), Point::new(150.0, 120.0), &geometry);
        editor.pointer_released(&PointerTarget::Canvas);
        assert!(editor.diagram().connections().is_empty());
        assert!(editor.gesture().is_idle());

        // A subsequent gesture behaves as if from a fresh editor.
        editor.pointer_pressed(&anchor_of(&editor, 0, Anchor::Right), Point::new(150.0, 120.0), &geometry);
        editor.pointer_released(&anchor_of(&editor, 1, Anchor::Left));
        assert_eq!(editor.diagram().connections().len(), 1);
    }

    #[test]
    fn test_press_ignored_while_gesture_active() {
        let mut editor = Editor::new();
        let geometry = FixedGeometry::new();
        drop_at(&mut editor, ShapeKind::Rectangle, 100.0, 100.0);
        drop_at(&mut editor, ShapeKind::Circle, 300.0, 100.0);

        editor.pointer_pressed(&body(&editor, 0), Point::new(110.0, 110.0), &geometry);
        let before = editor.gesture().clone();
        editor.pointer_pressed(&anchor_of(&editor, 1, Anchor::Top), Point::new(320.0, 100.0), &geometry);
        assert_eq!(*editor.gesture(), before);
    }

    #[test]
    fn test_unknown_node_body_ignored() {
        let mut editor = Editor::new();
        let geometry = FixedGeometry::new();
        editor.pointer_pressed(
            &PointerTarget::NodeBody("ghost".to_string()),
            Point::new(50.0, 50.0),
            &geometry,
        );
        assert!(editor.gesture().is_idle());
    }

    #[test]
    fn test_malformed_payload_discarded() {
        let mut editor = Editor::new();
        let geometry = FixedGeometry::new();
        editor.drop_payload("{broken", Point::new(50.0, 50.0), &geometry);
        assert!(editor.diagram().is_empty());
    }

    #[test]
    fn test_payload_drop_end_to_end() {
        let mut editor = Editor::new();
        let geometry = FixedGeometry::new();
        editor.drop_payload(
            r#"{"id":"circle","name":"Circle"}"#,
            Point::new(300.0, 100.0),
            &geometry,
        );

        let node = &editor.diagram().nodes()[0];
        assert_eq!(node.kind, ShapeKind::Circle);
        assert!((node.position.x - 290.0).abs() < f64::EPSILON);
        assert!((node.position.y - 90.0).abs() < f64::EPSILON);
    }
}
