//! LayoutInk Core Library
//!
//! Platform-agnostic element model, geometry, interaction state machine, and
//! persistence for the LayoutInk layout editor. Rendering belongs to the host;
//! the host feeds pointer/keyboard intents into an [`Editor`] and re-renders from
//! the snapshots and [`EditorEvent`]s it returns.

pub mod config;
pub mod document;
pub mod editor;
pub mod elements;
pub mod export;
pub mod geometry;
pub mod input;
pub mod interaction;
pub mod selection;
pub mod storage;
pub mod widget;

pub use config::{EditorConfig, WritePolicy};
pub use document::ElementStore;
pub use editor::{Editor, EditorEvent, LayerEntry, PropertyField, PropertySnapshot, ReorderDirection};
pub use elements::{Capabilities, Element, ElementId, ElementKind, ElementStyle};
pub use geometry::{LINE_THICKNESS, MIN_SIZE, ResizeHandle};
pub use input::{Key, Modifiers, PointerTarget};
pub use interaction::{GestureState, InteractionController};
pub use storage::{BlobStore, MemoryBlobStore, PersistenceBridge, StorageError, StorageResult};
pub use widget::{EditingKind, Handle, HandleKind, HandleShape, SelectionManager, WidgetState};
