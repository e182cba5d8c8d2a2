//! Palette shape descriptors and the drag payload channel.

use crate::model::ShapeKind;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Drag-data channel key under which the palette publishes its payload.
pub const SHAPE_PAYLOAD_MIME: &str = "application/json";

/// A draggable shape template offered by the palette.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShapeDescriptor {
    /// Shape kind, doubling as the payload id.
    pub id: ShapeKind,
    /// Display name shown in the palette.
    pub name: String,
}

impl ShapeDescriptor {
    /// Descriptor for a kind, with its standard display name.
    pub fn new(kind: ShapeKind) -> Self {
        Self {
            id: kind,
            name: kind.display_name().to_string(),
        }
    }
}

/// Failure to decode a palette drag payload.
#[derive(Debug, Error)]
pub enum PayloadError {
    #[error("invalid shape payload: {0}")]
    Invalid(#[from] serde_json::Error),
}

/// The static palette content. Extend here to offer new shape kinds.
pub fn default_shapes() -> Vec<ShapeDescriptor> {
    [ShapeKind::Rectangle, ShapeKind::Circle, ShapeKind::Diamond]
        .into_iter()
        .map(ShapeDescriptor::new)
        .collect()
}

/// Serialize a descriptor for the drag-data channel.
pub fn encode_payload(shape: &ShapeDescriptor) -> Result<String, serde_json::Error> {
    serde_json::to_string(shape)
}

/// Deserialize a descriptor received over the drag-data channel.
pub fn decode_payload(payload: &str) -> Result<ShapeDescriptor, PayloadError> {
    Ok(serde_json::from_str(payload)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_shapes() {
        let shapes = default_shapes();
        assert_eq!(shapes.len(), 3);
        assert_eq!(shapes[0].id, ShapeKind::Rectangle);
        assert_eq!(shapes[0].name, "Rectangle");
    }

    #[test]
    fn test_payload_roundtrip() {
        let shape = ShapeDescriptor::new(ShapeKind::Diamond);
        let json = encode_payload(&shape).unwrap();
        assert!(json.contains("\"diamond\""));

        let back = decode_payload(&json).unwrap();
        assert_eq!(back, shape);
    }

    #[test]
    fn test_malformed_payload() {
        assert!(decode_payload("not json").is_err());
        assert!(decode_payload(r#"{"id":"hexagon","name":"Hexagon"}"#).is_err());
    }
}
