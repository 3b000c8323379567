//! Selection manager: the single selection pointer and the text-edit sub-mode.

use super::handles::Handle;
use super::state::{EditingKind, WidgetState};
use crate::elements::{Element, ElementId};
use crate::selection::get_handles;

/// Tracks the selected element and the element in edit mode.
///
/// Holds ids only; the element store owns the elements. The editing element
/// is always the selected one.
#[derive(Debug, Clone, Default)]
pub struct SelectionManager {
    selected: Option<ElementId>,
    editing: Option<ElementId>,
}

impl SelectionManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// The selected element id, if any.
    pub fn selected(&self) -> Option<ElementId> {
        self.selected
    }

    /// The element in edit mode, if any.
    pub fn editing(&self) -> Option<ElementId> {
        self.editing
    }

    pub fn is_selected(&self, id: ElementId) -> bool {
        self.selected == Some(id)
    }

    pub fn is_editing(&self) -> bool {
        self.editing.is_some()
    }

    pub fn is_editing_element(&self, id: ElementId) -> bool {
        self.editing == Some(id)
    }

    /// The state of an element.
    pub fn state(&self, id: ElementId) -> WidgetState {
        if self.is_editing_element(id) {
            WidgetState::Editing(EditingKind::Text)
        } else if self.is_selected(id) {
            WidgetState::Selected
        } else {
            WidgetState::Normal
        }
    }

    /// Select an element (or nothing). Leaves edit mode if the selection moves.
    /// Returns true if the selection changed.
    pub fn select(&mut self, id: Option<ElementId>) -> bool {
        if self.selected == id {
            return false;
        }
        if self.editing.is_some() && self.editing != id {
            self.editing = None;
        }
        self.selected = id;
        true
    }

    /// Clear the selection. Returns true if something was selected.
    pub fn clear(&mut self) -> bool {
        self.select(None)
    }

    /// Enter edit mode on a text element, selecting it.
    /// Returns true if edit mode was entered; elements without text content
    /// are refused.
    pub fn enter_editing(&mut self, element: &Element) -> bool {
        if !element.capabilities().text_content {
            return false;
        }
        let id = element.id();
        self.select(Some(id));
        if self.editing == Some(id) {
            return false;
        }
        self.editing = Some(id);
        true
    }

    /// Leave edit mode. Returns true if an element was being edited.
    pub fn exit_editing(&mut self) -> bool {
        self.editing.take().is_some()
    }

    /// Forget a removed element. Returns true if it was selected.
    pub fn remove(&mut self, id: ElementId) -> bool {
        if self.editing == Some(id) {
            self.editing = None;
        }
        if self.selected == Some(id) {
            self.selected = None;
            return true;
        }
        false
    }

    /// Handles of `element` if it is selected, none otherwise.
    pub fn get_handles(&self, element: &Element, rotate_offset: f64) -> Vec<Handle> {
        if !self.is_selected(element.id()) {
            return vec![];
        }
        get_handles(element, rotate_offset)
    }
}
