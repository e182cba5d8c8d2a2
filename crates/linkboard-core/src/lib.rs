//! Linkboard Core Library
//!
//! Platform-agnostic diagram model, geometry abstraction, and the gesture
//! state machine for the Linkboard canvas.

pub mod geometry;
pub mod interaction;
pub mod model;
pub mod palette;

pub use geometry::{GeometryProvider, anchor_position, to_canvas};
pub use interaction::{Editor, Gesture, PointerTarget};
pub use model::{Anchor, Connection, Diagram, Node, NodeIdGenerator, ShapeKind, connection_id};
pub use palette::{SHAPE_PAYLOAD_MIME, ShapeDescriptor, default_shapes};
