//! Interaction controller: the pointer gesture state machine.
//!
//! One gesture at a time. A pointer-down starts a drag, resize or rotation on
//! an element, every pointer-move recomputes that element's geometry from the
//! snapshot taken at gesture start, and pointer-up returns to idle.

use crate::config::EditorConfig;
use crate::document::ElementStore;
use crate::elements::{Element, ElementId};
use crate::geometry::{
    ResizeHandle, angle_degrees, apply_drag, apply_line_resize, apply_resize, apply_rotation, clamp_position,
};
use kurbo::{Point, Rect};

/// The active gesture.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum GestureState {
    #[default]
    Idle,
    Dragging {
        id: ElementId,
        start_pointer: Point,
        start_position: Point,
    },
    Resizing {
        id: ElementId,
        handle: ResizeHandle,
        start_pointer: Point,
        start_bounds: Rect,
        /// Fixed endpoint of a line, `None` for boxes.
        anchor: Option<Point>,
    },
    Rotating {
        id: ElementId,
        /// Pointer angle about the element center at the previous move.
        last_angle: f64,
    },
}

impl GestureState {
    /// Element the gesture acts on.
    pub fn element(&self) -> Option<ElementId> {
        match *self {
            GestureState::Idle => None,
            GestureState::Dragging { id, .. }
            | GestureState::Resizing { id, .. }
            | GestureState::Rotating { id, .. } => Some(id),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            GestureState::Idle => "idle",
            GestureState::Dragging { .. } => "dragging",
            GestureState::Resizing { .. } => "resizing",
            GestureState::Rotating { .. } => "rotating",
        }
    }
}

/// Drives drag, resize and rotate gestures.
#[derive(Debug, Clone, Default)]
pub struct InteractionController {
    state: GestureState,
    /// Whether any move of the current gesture changed the element.
    mutated: bool,
}

impl InteractionController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &GestureState {
        &self.state
    }

    pub fn is_idle(&self) -> bool {
        self.state == GestureState::Idle
    }

    /// Element the active gesture acts on.
    pub fn active_element(&self) -> Option<ElementId> {
        self.state.element()
    }

    fn start(&mut self, state: GestureState) {
        log::debug!("Gesture {} -> {}", self.state.name(), state.name());
        self.state = state;
        self.mutated = false;
    }

    /// Start dragging `element`.
    pub fn begin_drag(&mut self, element: &Element, pointer: Point) {
        self.start(GestureState::Dragging {
            id: element.id(),
            start_pointer: pointer,
            start_position: element.position,
        });
    }

    /// Start resizing `element` from `handle`.
    ///
    /// Lines accept only the `w`/`e` endpoint handles; the other endpoint is
    /// captured as the anchor. Returns false if the handle does not apply.
    pub fn begin_resize(&mut self, element: &Element, handle: ResizeHandle, pointer: Point) -> bool {
        let anchor = match element.line_segment() {
            Some(segment) => match handle {
                ResizeHandle::E => Some(segment.anchor),
                ResizeHandle::W => Some(segment.end()),
                _ => {
                    log::debug!("Ignoring {} handle on {}", handle.as_str(), element.label());
                    return false;
                }
            },
            None if element.capabilities().free_resize => None,
            None => return false,
        };
        self.start(GestureState::Resizing {
            id: element.id(),
            handle,
            start_pointer: pointer,
            start_bounds: element.bounds(),
            anchor,
        });
        true
    }

    /// Start rotating `element`. Returns false if its kind does not rotate.
    pub fn begin_rotate(&mut self, element: &Element, pointer: Point) -> bool {
        if !element.capabilities().rotation {
            log::debug!("Ignoring rotation on {}", element.label());
            return false;
        }
        self.start(GestureState::Rotating {
            id: element.id(),
            last_angle: angle_degrees(element.center(), pointer),
        });
        true
    }

    /// Apply a pointer move to the active element.
    ///
    /// Returns the id of the element that changed, or `None` when idle. If the
    /// element has vanished from the store the gesture is cancelled.
    pub fn pointer_move(&mut self, store: &mut ElementStore, pointer: Point, config: &EditorConfig) -> Option<ElementId> {
        let id = self.state.element()?;
        let Some(element) = store.get_mut(id) else {
            self.cancel();
            return None;
        };

        match &mut self.state {
            GestureState::Idle => return None,
            GestureState::Dragging {
                start_pointer,
                start_position,
                ..
            } => {
                let raw = apply_drag(*start_position, pointer - *start_pointer);
                element.position = clamp_position(raw, element.size(), config.canvas_size);
            }
            GestureState::Resizing {
                handle,
                start_pointer,
                start_bounds,
                anchor,
                ..
            } => match anchor {
                Some(anchor) => {
                    let segment = apply_line_resize(*anchor, pointer, config.min_size);
                    let segment = if *handle == ResizeHandle::W {
                        segment.reversed()
                    } else {
                        segment
                    };
                    element.set_line_segment(segment);
                }
                None => {
                    let rect = apply_resize(*handle, *start_bounds, pointer - *start_pointer, config.min_size);
                    element.position = rect.origin();
                    element.width = rect.width();
                    element.height = rect.height();
                }
            },
            GestureState::Rotating { last_angle, .. } => {
                let angle = angle_degrees(element.center(), pointer);
                element.rotation = apply_rotation(angle, *last_angle, element.rotation);
                *last_angle = angle;
            }
        }

        self.mutated = true;
        Some(id)
    }

    /// End the gesture. Returns the element id if the gesture changed it.
    pub fn pointer_up(&mut self) -> Option<ElementId> {
        let id = self.state.element();
        let mutated = std::mem::take(&mut self.mutated);
        self.start(GestureState::Idle);
        id.filter(|_| mutated)
    }

    /// Abandon the gesture without a final commit.
    pub fn cancel(&mut self) {
        if !self.is_idle() {
            self.start(GestureState::Idle);
        }
    }
}
