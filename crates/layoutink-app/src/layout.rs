//! Loading a saved layout and rendering it in an export format.

use layoutink_core::storage::StorageError;
use layoutink_core::{BlobStore, Editor, EditorConfig, Element, export};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Output format of `layoutink export`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExportFormat {
    #[default]
    Json,
    Html,
}

impl FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "json" => Ok(ExportFormat::Json),
            "html" => Ok(ExportFormat::Html),
            other => Err(format!("unknown export format `{other}` (expected json or html)")),
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ExportFormat::Json => "json",
            ExportFormat::Html => "html",
        })
    }
}

/// Read the layout saved under `config.storage_key`.
///
/// Unlike the interactive editor, an unreadable layout is an error here.
pub fn load_layout<S: BlobStore>(blobs: S, config: &EditorConfig) -> Result<Vec<Element>, CliError> {
    let mut editor = Editor::new(config.clone(), blobs);
    editor.restore()?;
    Ok(editor.elements().to_vec())
}

/// Render `elements` in `format`.
pub fn export_layout(elements: &[Element], format: ExportFormat, config: &EditorConfig) -> Result<String, CliError> {
    Ok(match format {
        ExportFormat::Json => export::to_json(elements)?,
        ExportFormat::Html => export::to_html(elements, config.canvas_size),
    })
}
