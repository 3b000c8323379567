//! LayoutInk Application
//!
//! The application shell around `layoutink-core`: loading a saved layout for
//! export, the keyboard shortcut table, and the browser bindings.

mod layout;
mod shortcuts;

pub use layout::{CliError, ExportFormat, export_layout, load_layout};
pub use shortcuts::{Shortcut, ShortcutRegistry};

#[cfg(target_arch = "wasm32")]
mod web;

#[cfg(target_arch = "wasm32")]
pub use web::WebEditor;
