//! Handle definitions for element manipulation.

use crate::geometry::ResizeHandle;
use kurbo::Point;
use serde::{Deserialize, Serialize};

/// A manipulation handle on the selected element.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Handle {
    /// The kind of handle (determines behavior).
    pub kind: HandleKind,
    /// Position in canvas coordinates.
    pub position: Point,
    /// Visual shape of the handle.
    pub shape: HandleShape,
}

/// What dragging a handle does.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HandleKind {
    /// Resize from an edge or corner; for lines, move an endpoint.
    Resize(ResizeHandle),
    /// Rotation handle, above the top edge.
    Rotate,
}

impl HandleKind {
    /// Parse a host handle name: a compass name (`"nw"`) or `"rotate"`.
    pub fn from_name(name: &str) -> Option<Self> {
        if name == "rotate" {
            return Some(HandleKind::Rotate);
        }
        ResizeHandle::from_name(name).map(HandleKind::Resize)
    }
}

/// Visual shape of a handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum HandleShape {
    /// Square handle (box resize).
    #[default]
    Square,
    /// Circular handle (line endpoints, rotation).
    Circle,
}

impl Handle {
    /// Create a new handle.
    pub fn new(kind: HandleKind, position: Point) -> Self {
        Self {
            kind,
            position,
            shape: HandleShape::default(),
        }
    }

    /// Set the handle shape.
    pub fn with_shape(mut self, shape: HandleShape) -> Self {
        self.shape = shape;
        self
    }

    /// Whether `point` lies within `tolerance` of this handle.
    pub fn hit_test(&self, point: Point, tolerance: f64) -> bool {
        (point - self.position).hypot2() <= tolerance * tolerance
    }
}
