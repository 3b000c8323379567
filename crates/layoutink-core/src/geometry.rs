//! Pure geometry for element manipulation.
//!
//! Everything here is a function of its arguments: drag, resize, line endpoint
//! and rotation math used by the interaction controller. Angles are degrees,
//! positive clockwise in canvas space (y grows downward).

use kurbo::{Point, Rect, Size, Vec2};
use serde::{Deserialize, Serialize};

/// Minimum width/height of an element after any resize.
pub const MIN_SIZE: f64 = 20.0;

/// Rendered thickness (box height) of line elements.
pub const LINE_THICKNESS: f64 = 4.0;

/// Resize handle positions, named by compass direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResizeHandle {
    N,
    S,
    E,
    W,
    Nw,
    Ne,
    Sw,
    Se,
}

impl ResizeHandle {
    /// All eight handles, corners first.
    pub const ALL: [ResizeHandle; 8] = [
        ResizeHandle::Nw,
        ResizeHandle::Ne,
        ResizeHandle::Sw,
        ResizeHandle::Se,
        ResizeHandle::N,
        ResizeHandle::S,
        ResizeHandle::E,
        ResizeHandle::W,
    ];

    /// Handles offered on line elements (their two endpoints).
    pub const LINE: [ResizeHandle; 2] = [ResizeHandle::W, ResizeHandle::E];

    /// Whether this handle moves the left edge.
    pub fn drags_west(self) -> bool {
        matches!(self, ResizeHandle::W | ResizeHandle::Nw | ResizeHandle::Sw)
    }

    /// Whether this handle moves the right edge.
    pub fn drags_east(self) -> bool {
        matches!(self, ResizeHandle::E | ResizeHandle::Ne | ResizeHandle::Se)
    }

    /// Whether this handle moves the top edge.
    pub fn drags_north(self) -> bool {
        matches!(self, ResizeHandle::N | ResizeHandle::Nw | ResizeHandle::Ne)
    }

    /// Whether this handle moves the bottom edge.
    pub fn drags_south(self) -> bool {
        matches!(self, ResizeHandle::S | ResizeHandle::Sw | ResizeHandle::Se)
    }

    /// Short name as used in host markup (`"nw"`, `"e"`, ...).
    pub fn as_str(self) -> &'static str {
        match self {
            ResizeHandle::N => "n",
            ResizeHandle::S => "s",
            ResizeHandle::E => "e",
            ResizeHandle::W => "w",
            ResizeHandle::Nw => "nw",
            ResizeHandle::Ne => "ne",
            ResizeHandle::Sw => "sw",
            ResizeHandle::Se => "se",
        }
    }

    /// Parse a short handle name.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|h| h.as_str() == name)
    }

    /// Position of this handle on an unrotated box.
    pub fn anchor_on(self, bounds: Rect) -> Point {
        let x = if self.drags_west() {
            bounds.x0
        } else if self.drags_east() {
            bounds.x1
        } else {
            bounds.center().x
        };
        let y = if self.drags_north() {
            bounds.y0
        } else if self.drags_south() {
            bounds.y1
        } else {
            bounds.center().y
        };
        Point::new(x, y)
    }
}

/// Clamp a top-left position so a box of `size` stays inside `bounds`.
///
/// A box larger than the bounds on some axis is pinned to 0 on that axis.
pub fn clamp_position(pos: Point, size: Size, bounds: Size) -> Point {
    let max_x = (bounds.width - size.width).max(0.0);
    let max_y = (bounds.height - size.height).max(0.0);
    Point::new(pos.x.clamp(0.0, max_x), pos.y.clamp(0.0, max_y))
}

/// Raw (unclamped) position after dragging by `delta`.
pub fn apply_drag(start: Point, delta: Vec2) -> Point {
    start + delta
}

/// Resize `start` by dragging `handle` by `delta`.
///
/// Each axis is floored at `min_size`. Handles on the west/north edges shift
/// the origin so the opposite edge stays where it was, including when the
/// floor is reached.
pub fn apply_resize(handle: ResizeHandle, start: Rect, delta: Vec2, min_size: f64) -> Rect {
    let mut x0 = start.x0;
    let mut y0 = start.y0;
    let mut width = start.width();
    let mut height = start.height();

    if handle.drags_east() {
        width = (start.width() + delta.x).max(min_size);
    }
    if handle.drags_west() {
        width = (start.width() - delta.x).max(min_size);
        x0 = start.x1 - width;
    }
    if handle.drags_south() {
        height = (start.height() + delta.y).max(min_size);
    }
    if handle.drags_north() {
        height = (start.height() - delta.y).max(min_size);
        y0 = start.y1 - height;
    }

    Rect::new(x0, y0, x0 + width, y0 + height)
}

/// A line as a segment pivoting about a fixed anchor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineSegment {
    /// Fixed endpoint.
    pub anchor: Point,
    /// Segment length (the element's width).
    pub length: f64,
    /// Direction from the anchor, in degrees.
    pub angle_degrees: f64,
}

impl LineSegment {
    /// Rebuild the segment of a line element from its box and rotation.
    ///
    /// Lines rotate about the middle of their left edge, which is therefore
    /// the segment's start point.
    pub fn from_box(origin: Point, length: f64, thickness: f64, rotation: f64) -> Self {
        Self {
            anchor: Point::new(origin.x, origin.y + thickness / 2.0),
            length,
            angle_degrees: rotation,
        }
    }

    /// The free endpoint.
    pub fn end(&self) -> Point {
        let radians = self.angle_degrees.to_radians();
        self.anchor + Vec2::new(radians.cos(), radians.sin()) * self.length
    }

    /// The same segment anchored at its other end.
    pub fn reversed(&self) -> Self {
        let angle = self.angle_degrees + 180.0;
        Self {
            anchor: self.end(),
            length: self.length,
            angle_degrees: if angle > 180.0 { angle - 360.0 } else { angle },
        }
    }

    /// Top-left of the unrotated box whose left-center is the anchor.
    pub fn box_origin(&self, thickness: f64) -> Point {
        Point::new(self.anchor.x, self.anchor.y - thickness / 2.0)
    }
}

/// Move a line endpoint to `pointer` while `anchor` stays fixed.
pub fn apply_line_resize(anchor: Point, pointer: Point, min_length: f64) -> LineSegment {
    let v = pointer - anchor;
    LineSegment {
        anchor,
        length: v.hypot().max(min_length),
        angle_degrees: v.atan2().to_degrees(),
    }
}

/// Angle of the vector `from -> to`, in degrees.
pub fn angle_degrees(from: Point, to: Point) -> f64 {
    (to - from).atan2().to_degrees()
}

/// Wrap an angle difference into (-180, 180].
fn normalize_delta(delta: f64) -> f64 {
    let d = delta % 360.0;
    if d > 180.0 {
        d - 360.0
    } else if d <= -180.0 {
        d + 360.0
    } else {
        d
    }
}

/// Add the pointer's angular movement since the previous move to `accumulated`.
///
/// The result is not wrapped: rotation accumulates across gestures.
pub fn apply_rotation(pointer_angle: f64, previous_angle: f64, accumulated: f64) -> f64 {
    accumulated + normalize_delta(pointer_angle - previous_angle)
}

/// Rotate `point` about `pivot` by `degrees`.
pub fn rotate_about(point: Point, pivot: Point, degrees: f64) -> Point {
    let (sin, cos) = degrees.to_radians().sin_cos();
    let v = point - pivot;
    pivot + Vec2::new(v.x * cos - v.y * sin, v.x * sin + v.y * cos)
}
