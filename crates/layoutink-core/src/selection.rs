//! Handle placement and pointer hit testing.

use crate::document::ElementStore;
use crate::elements::{Element, ElementId};
use crate::geometry::ResizeHandle;
use crate::input::PointerTarget;
use crate::widget::{Handle, HandleKind, HandleShape};
use kurbo::Point;

/// Get the manipulation handles for an element.
///
/// Boxes get the eight resize handles, plus the rotation handle when their
/// kind rotates. Lines get one circular handle per endpoint: `w` on the start
/// point, `e` on the end point.
pub fn get_handles(element: &Element, rotate_offset: f64) -> Vec<Handle> {
    if let Some(segment) = element.line_segment() {
        return vec![
            Handle::new(HandleKind::Resize(ResizeHandle::W), segment.anchor).with_shape(HandleShape::Circle),
            Handle::new(HandleKind::Resize(ResizeHandle::E), segment.end()).with_shape(HandleShape::Circle),
        ];
    }

    let bounds = element.bounds();
    let mut handles: Vec<Handle> = ResizeHandle::ALL
        .into_iter()
        .map(|h| Handle::new(HandleKind::Resize(h), element.to_canvas(h.anchor_on(bounds))))
        .collect();

    if element.capabilities().rotation {
        let above = Point::new(bounds.center().x, bounds.y0 - rotate_offset);
        handles.push(Handle::new(HandleKind::Rotate, element.to_canvas(above)).with_shape(HandleShape::Circle));
    }
    handles
}

/// Find which handle (if any) is hit at the given point.
pub fn hit_test_handles(element: &Element, point: Point, tolerance: f64, rotate_offset: f64) -> Option<HandleKind> {
    get_handles(element, rotate_offset)
        .into_iter()
        .find(|h| h.hit_test(point, tolerance))
        .map(|h| h.kind)
}

/// Resolve what a pointer at `point` is over.
///
/// The selected element's handles win over any element body; bodies are then
/// tested topmost-first in each element's rotated frame.
pub fn hit_test(
    store: &ElementStore,
    selected: Option<ElementId>,
    point: Point,
    tolerance: f64,
    rotate_offset: f64,
) -> PointerTarget {
    if let Some(element) = selected.and_then(|id| store.get(id)) {
        if let Some(kind) = hit_test_handles(element, point, tolerance, rotate_offset) {
            return PointerTarget::Handle(element.id(), kind);
        }
    }
    match store.element_at(point, 0.0) {
        Some(id) => PointerTarget::Element(id),
        None => PointerTarget::Canvas,
    }
}
