//! Renderer contract for Linkboard.
//!
//! Backend-agnostic: turns the diagram and transient gesture state into
//! drawing primitives any painter can consume, and resolves pointer
//! positions back to the interactive element roles the core understands.

pub mod layout;
pub mod scene;
pub mod style;

pub use layout::LayoutGeometry;
pub use scene::{
    EdgeVisual, NodeVisual, PreviewVisual, Scene, arrowhead_wings, build_scene, hit_test,
    node_outline,
};
