//! WebAssembly entry point and the editor bindings the page script drives.
//!
//! The page owns the DOM. It forwards pointer, key and panel input here and
//! re-renders from the returned event lists and JSON snapshots.

use kurbo::{Point, Size};
use layoutink_core::storage::LocalStorageBlobStore;
use layoutink_core::{
    Editor, EditorConfig, EditorEvent, ElementId, ElementKind, HandleKind, Key, Modifiers, PointerTarget,
    PropertyField, ReorderDirection, export,
};
use wasm_bindgen::prelude::*;

#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();

    if let Err(e) = console_log::init_with_level(log::Level::Info) {
        web_sys::console::warn_1(&format!("Logger already initialized: {}", e).into());
    }

    log::info!("Starting LayoutInk (WASM)");
}

fn to_js<T: serde::Serialize>(value: &T) -> Result<String, JsValue> {
    serde_json::to_string(value).map_err(|e| JsValue::from_str(&e.to_string()))
}

fn events_json(events: Vec<EditorEvent>) -> Result<String, JsValue> {
    to_js(&events)
}

fn element_id(id: u32) -> ElementId {
    ElementId(u64::from(id))
}

/// Browser editor persisted to `localStorage`.
#[wasm_bindgen]
pub struct WebEditor {
    editor: Editor<LocalStorageBlobStore>,
}

#[wasm_bindgen]
impl WebEditor {
    /// Open the editor over a canvas of the given client size and restore
    /// the saved layout. `config` is an optional JSON [`EditorConfig`].
    #[wasm_bindgen(constructor)]
    pub fn new(width: f64, height: f64, config: Option<String>) -> Result<WebEditor, JsValue> {
        let mut config = match config {
            Some(json) => EditorConfig::from_json(&json).map_err(|e| JsValue::from_str(&e.to_string()))?,
            None => EditorConfig::default(),
        };
        config.canvas_size = Size::new(width, height);

        let blobs = LocalStorageBlobStore::new().map_err(|e| JsValue::from_str(&e.to_string()))?;
        let mut editor = Editor::new(config, blobs);
        match editor.restore() {
            Ok(count) => log::info!("Restored {} elements", count),
            Err(e) => log::warn!("Starting with an empty canvas: {}", e),
        }
        Ok(WebEditor { editor })
    }

    /// Pointer down at a canvas point; the target is found by hit testing.
    #[wasm_bindgen(js_name = pointerDown)]
    pub fn pointer_down(&mut self, x: f64, y: f64) -> Result<String, JsValue> {
        let point = Point::new(x, y);
        let target = self.editor.hit_test(point);
        events_json(self.editor.pointer_down(target, point))
    }

    /// Pointer down on a target the page already resolved from the DOM.
    /// `handle` is a handle name such as `"se"` or `"rotate"`.
    #[wasm_bindgen(js_name = pointerDownOn)]
    pub fn pointer_down_on(&mut self, id: Option<u32>, handle: Option<String>, x: f64, y: f64) -> Result<String, JsValue> {
        let target = match (id, handle) {
            (None, _) => PointerTarget::Canvas,
            (Some(id), None) => PointerTarget::Element(element_id(id)),
            (Some(id), Some(name)) => {
                let kind = HandleKind::from_name(&name)
                    .ok_or_else(|| JsValue::from_str(&format!("unknown handle `{}`", name)))?;
                PointerTarget::Handle(element_id(id), kind)
            }
        };
        events_json(self.editor.pointer_down(target, Point::new(x, y)))
    }

    #[wasm_bindgen(js_name = pointerMove)]
    pub fn pointer_move(&mut self, x: f64, y: f64) -> Result<String, JsValue> {
        events_json(self.editor.pointer_move(Point::new(x, y)))
    }

    #[wasm_bindgen(js_name = pointerUp)]
    pub fn pointer_up(&mut self) -> Result<String, JsValue> {
        events_json(self.editor.pointer_up())
    }

    /// `key` is a DOM `KeyboardEvent.key`. Unbound keys produce no events.
    #[wasm_bindgen(js_name = keyDown)]
    pub fn key_down(&mut self, key: &str, shift: bool, ctrl: bool, alt: bool, meta: bool) -> Result<String, JsValue> {
        let Some(key) = Key::from_name(key) else {
            return events_json(Vec::new());
        };
        let modifiers = Modifiers { shift, ctrl, alt, meta };
        events_json(self.editor.key_down(key, modifiers))
    }

    #[wasm_bindgen(js_name = toolSelected)]
    pub fn tool_selected(&mut self, kind: &str) -> Result<String, JsValue> {
        let kind = ElementKind::from_name(kind).ok_or_else(|| JsValue::from_str(&format!("unknown tool `{}`", kind)))?;
        events_json(self.editor.tool_selected(kind))
    }

    #[wasm_bindgen(js_name = propertyChanged)]
    pub fn property_changed(&mut self, field: &str, value: &str) -> Result<String, JsValue> {
        let field =
            PropertyField::from_name(field).ok_or_else(|| JsValue::from_str(&format!("unknown property `{}`", field)))?;
        events_json(self.editor.property_changed(field, value))
    }

    /// `direction` is `"up"` or `"down"`.
    #[wasm_bindgen(js_name = layerReorder)]
    pub fn layer_reorder(&mut self, id: u32, direction: &str) -> Result<String, JsValue> {
        let direction = match direction {
            "up" => ReorderDirection::Up,
            "down" => ReorderDirection::Down,
            other => return Err(JsValue::from_str(&format!("unknown direction `{}`", other))),
        };
        events_json(self.editor.layer_reorder_requested(element_id(id), direction))
    }

    pub fn select(&mut self, id: Option<u32>) -> Result<String, JsValue> {
        events_json(self.editor.select(id.map(element_id)))
    }

    #[wasm_bindgen(js_name = editText)]
    pub fn edit_text(&mut self, id: u32) -> Result<String, JsValue> {
        events_json(self.editor.edit_text(element_id(id)))
    }

    #[wasm_bindgen(js_name = endTextEdit)]
    pub fn end_text_edit(&mut self) -> Result<String, JsValue> {
        events_json(self.editor.end_text_edit())
    }

    #[wasm_bindgen(js_name = deleteSelected)]
    pub fn delete_selected(&mut self) -> Result<String, JsValue> {
        events_json(self.editor.delete_selected())
    }

    /// Write deferred changes, e.g. from `beforeunload`.
    pub fn flush(&mut self) -> bool {
        self.editor.flush()
    }

    // --- Snapshots ---

    /// Elements as persisted records, bottom-most first.
    pub fn elements(&self) -> Result<String, JsValue> {
        let records: Vec<_> = self
            .editor
            .elements()
            .iter()
            .map(layoutink_core::storage::ElementRecord::from_element)
            .collect();
        to_js(&records)
    }

    /// `{"selected": id|null, "editing": id|null}`.
    pub fn selection(&self) -> Result<String, JsValue> {
        to_js(&serde_json::json!({
            "selected": self.editor.selected(),
            "editing": self.editor.editing(),
        }))
    }

    pub fn handles(&self) -> Result<String, JsValue> {
        to_js(&self.editor.handles())
    }

    pub fn layers(&self) -> Result<String, JsValue> {
        to_js(&self.editor.layers())
    }

    #[wasm_bindgen(js_name = propertyPanel)]
    pub fn property_panel(&self) -> Result<String, JsValue> {
        to_js(&self.editor.property_panel())
    }

    #[wasm_bindgen(js_name = exportJson)]
    pub fn export_json(&self) -> Result<String, JsValue> {
        export::to_json(self.editor.elements()).map_err(|e| JsValue::from_str(&e.to_string()))
    }

    #[wasm_bindgen(js_name = exportHtml)]
    pub fn export_html(&self) -> String {
        export::to_html(self.editor.elements(), self.editor.config().canvas_size)
    }
}
