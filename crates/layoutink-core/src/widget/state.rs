//! Widget state definitions.

use serde::Serialize;

/// The UI state of an element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum WidgetState {
    /// Not selected.
    #[default]
    Normal,
    /// Selected: shows handles, can be moved and resized.
    Selected,
    /// Selected and in content-edit mode.
    Editing(EditingKind),
}

impl WidgetState {
    /// Selected, either plainly or while editing.
    pub fn is_selected(&self) -> bool {
        matches!(self, Self::Selected | Self::Editing(_))
    }
}

/// Kind of editing mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EditingKind {
    /// Editing the text payload; caret and key input belong to the host.
    Text,
}
