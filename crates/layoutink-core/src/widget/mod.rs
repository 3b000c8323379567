//! Selection and editing state for elements.
//!
//! Elements remain pure data. The widget layer tracks which element is
//! selected, which one is in text-edit mode, and which handles the selected
//! element exposes.

mod handles;
mod manager;
mod state;

pub use handles::{Handle, HandleKind, HandleShape};
pub use manager::SelectionManager;
pub use state::{EditingKind, WidgetState};
