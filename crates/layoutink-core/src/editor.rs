//! Editor facade.
//!
//! One [`Editor`] per open layout. It owns the element store, the selection
//! manager, the gesture controller and the persistence bridge, and turns host
//! intents into operations on them. Every intent returns the list of
//! [`EditorEvent`]s the host should re-render from.

use crate::config::EditorConfig;
use crate::document::ElementStore;
use crate::elements::{Capabilities, CssColor, CssLength, DEFAULT_FONT_SIZE, Element, ElementId, ElementKind, StyleParseError};
use crate::geometry::clamp_position;
use crate::input::{Key, Modifiers, PointerTarget};
use crate::interaction::{GestureState, InteractionController};
use crate::selection;
use crate::storage::{BlobStore, PersistenceBridge, StorageResult};
use crate::widget::{Handle, HandleKind, SelectionManager, WidgetState};
use kurbo::{Point, Vec2};
use serde::{Deserialize, Serialize};

/// What changed, for the host to re-render.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum EditorEvent {
    ElementCreated { id: ElementId },
    ElementUpdated { id: ElementId },
    ElementRemoved { id: ElementId },
    SelectionChanged { selected: Option<ElementId> },
    EditingChanged { editing: Option<ElementId> },
    OrderChanged { id: ElementId },
}

/// Direction of a layer reorder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReorderDirection {
    /// Toward the top of the z-order.
    Up,
    Down,
}

/// Property-panel field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PropertyField {
    Left,
    Top,
    Width,
    Height,
    Rotation,
    BackgroundColor,
    TextColor,
    FontSize,
    Padding,
    Text,
}

impl PropertyField {
    pub const ALL: [PropertyField; 10] = [
        PropertyField::Left,
        PropertyField::Top,
        PropertyField::Width,
        PropertyField::Height,
        PropertyField::Rotation,
        PropertyField::BackgroundColor,
        PropertyField::TextColor,
        PropertyField::FontSize,
        PropertyField::Padding,
        PropertyField::Text,
    ];

    /// Parse a host field name (`"left"`, `"backgroundColor"`, ...).
    pub fn from_name(name: &str) -> Option<Self> {
        Some(match name {
            "left" | "x" => PropertyField::Left,
            "top" | "y" => PropertyField::Top,
            "width" => PropertyField::Width,
            "height" => PropertyField::Height,
            "rotation" => PropertyField::Rotation,
            "backgroundColor" | "background" | "fill" => PropertyField::BackgroundColor,
            "textColor" | "color" => PropertyField::TextColor,
            "fontSize" => PropertyField::FontSize,
            "padding" => PropertyField::Padding,
            "text" => PropertyField::Text,
            _ => return None,
        })
    }

    /// Whether an element with `caps` has this field.
    pub fn supported_by(self, caps: Capabilities) -> bool {
        match self {
            PropertyField::Left | PropertyField::Top | PropertyField::Width => true,
            PropertyField::Height => caps.free_resize,
            PropertyField::Rotation => caps.rotation,
            PropertyField::BackgroundColor => caps.fill,
            PropertyField::TextColor => caps.text_color,
            PropertyField::FontSize | PropertyField::Padding | PropertyField::Text => caps.text_content,
        }
    }
}

/// One row of the layer list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LayerEntry {
    pub id: ElementId,
    pub label: String,
    pub selected: bool,
    pub state: WidgetState,
}

/// What the property panel shows for the selected element.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertySnapshot {
    pub id: ElementId,
    pub label: String,
    pub kind: ElementKind,
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
    pub rotation: f64,
    pub background_color: Option<String>,
    pub text_color: Option<String>,
    pub font_size: Option<f64>,
    pub padding: Option<f64>,
    pub text: Option<String>,
    /// Fields the element accepts edits for.
    pub fields: Vec<PropertyField>,
}

impl PropertySnapshot {
    fn from_element(element: &Element) -> Self {
        let caps = element.capabilities();
        Self {
            id: element.id(),
            label: element.label(),
            kind: element.kind(),
            left: element.position.x,
            top: element.position.y,
            width: element.width,
            height: element.height,
            rotation: element.rotation,
            background_color: element.style.fill.map(|c| c.to_string()),
            text_color: element.style.text_color.map(|c| c.to_string()),
            font_size: element.style.font_size,
            padding: element.style.padding,
            text: element.content.clone(),
            fields: PropertyField::ALL
                .into_iter()
                .filter(|f| f.supported_by(caps))
                .collect(),
        }
    }
}

fn parse_number(value: &str) -> Result<f64, StyleParseError> {
    let trimmed = value.trim();
    let trimmed = trimmed.strip_suffix("deg").unwrap_or(trimmed);
    CssLength::parse(trimmed)?
        .px()
        .ok_or_else(|| StyleParseError::Length(value.to_string()))
}

/// Apply one property-panel edit. The caller has checked the field applies.
fn apply_property(
    element: &mut Element,
    field: PropertyField,
    value: &str,
    config: &EditorConfig,
) -> Result<(), StyleParseError> {
    match field {
        PropertyField::Left => element.position.x = parse_number(value)?,
        PropertyField::Top => element.position.y = parse_number(value)?,
        PropertyField::Width => element.width = parse_number(value)?.max(config.min_size),
        PropertyField::Height => element.height = parse_number(value)?.max(config.min_size),
        PropertyField::Rotation => element.rotation = parse_number(value)?,
        PropertyField::BackgroundColor => element.style.fill = Some(CssColor::parse(value)?),
        PropertyField::TextColor => element.style.text_color = Some(CssColor::parse(value)?),
        PropertyField::FontSize => element.style.font_size = Some(parse_number(value)?.max(config.font_size_min)),
        PropertyField::Padding => element.style.padding = Some(parse_number(value)?.max(0.0)),
        PropertyField::Text => element.content = Some(value.to_string()),
    }
    element.position = clamp_position(element.position, element.size(), config.canvas_size);
    Ok(())
}

/// The layout editor.
pub struct Editor<S: BlobStore> {
    config: EditorConfig,
    store: ElementStore,
    selection: SelectionManager,
    interaction: InteractionController,
    persistence: PersistenceBridge<S>,
}

impl<S: BlobStore> Editor<S> {
    /// Create an editor with an empty canvas over `blobs`.
    ///
    /// Call [`Editor::restore`] to load the saved layout.
    pub fn new(config: EditorConfig, blobs: S) -> Self {
        let persistence = PersistenceBridge::new(blobs, config.storage_key.clone(), config.write_policy);
        Self {
            config,
            store: ElementStore::new(),
            selection: SelectionManager::new(),
            interaction: InteractionController::new(),
            persistence,
        }
    }

    /// Replace the canvas with the saved layout.
    ///
    /// A gesture in progress is ended and its pending write flushed first.
    /// On a corrupt blob the canvas is left empty and the error returned.
    pub fn restore(&mut self) -> StorageResult<usize> {
        self.cancel_gesture();
        self.selection.clear();
        match self.persistence.load(self.config.line_thickness) {
            Ok(elements) => {
                let count = elements.len();
                self.store.replace_all(elements);
                Ok(count)
            }
            Err(e) => {
                self.store.replace_all(Vec::new());
                Err(e)
            }
        }
    }

    // --- Snapshots ---

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    /// Elements in z-order, bottom-most first.
    pub fn elements(&self) -> &[Element] {
        self.store.as_slice()
    }

    pub fn element(&self, id: ElementId) -> Option<&Element> {
        self.store.get(id)
    }

    pub fn store(&self) -> &ElementStore {
        &self.store
    }

    pub fn selected(&self) -> Option<ElementId> {
        self.selection.selected()
    }

    pub fn editing(&self) -> Option<ElementId> {
        self.selection.editing()
    }

    pub fn gesture(&self) -> &GestureState {
        self.interaction.state()
    }

    pub fn persistence(&self) -> &PersistenceBridge<S> {
        &self.persistence
    }

    /// Handles of the selected element.
    pub fn handles(&self) -> Vec<Handle> {
        self.selection
            .selected()
            .and_then(|id| self.store.get(id))
            .map(|el| self.selection.get_handles(el, self.config.rotate_handle_offset))
            .unwrap_or_default()
    }

    /// Layer list, topmost first.
    pub fn layers(&self) -> Vec<LayerEntry> {
        self.store
            .layers()
            .map(|el| {
                let state = self.selection.state(el.id());
                LayerEntry {
                    id: el.id(),
                    label: el.label(),
                    selected: state.is_selected(),
                    state,
                }
            })
            .collect()
    }

    /// Property panel view of the selected element.
    pub fn property_panel(&self) -> Option<PropertySnapshot> {
        self.selection
            .selected()
            .and_then(|id| self.store.get(id))
            .map(PropertySnapshot::from_element)
    }

    /// What a pointer at `point` would land on.
    pub fn hit_test(&self, point: Point) -> PointerTarget {
        selection::hit_test(
            &self.store,
            self.selection.selected(),
            point,
            self.config.handle_tolerance,
            self.config.rotate_handle_offset,
        )
    }

    // --- Internal helpers ---

    fn commit(&mut self) {
        self.persistence.save(self.store.as_slice());
    }

    /// Drop any active gesture, writing what it already changed.
    fn cancel_gesture(&mut self) {
        if !self.interaction.is_idle() {
            self.interaction.cancel();
            self.persistence.flush(self.store.as_slice());
        }
    }

    fn push_editing_change(&self, was: Option<ElementId>, events: &mut Vec<EditorEvent>) {
        let now = self.selection.editing();
        if was != now {
            events.push(EditorEvent::EditingChanged { editing: now });
        }
    }

    fn set_selection(&mut self, id: Option<ElementId>, events: &mut Vec<EditorEvent>) {
        let id = id.filter(|id| self.store.get(*id).is_some());
        let was_editing = self.selection.editing();
        if self.selection.select(id) {
            self.cancel_gesture();
            events.push(EditorEvent::SelectionChanged { selected: id });
        }
        self.push_editing_change(was_editing, events);
    }

    // --- Intents ---

    /// Select an element, or nothing. A missing id selects nothing.
    pub fn select(&mut self, id: Option<ElementId>) -> Vec<EditorEvent> {
        let mut events = Vec::new();
        self.set_selection(id, &mut events);
        events
    }

    /// Create an element of `kind` on top of the z-order and select it.
    pub fn tool_selected(&mut self, kind: ElementKind) -> Vec<EditorEvent> {
        let mut events = Vec::new();
        self.cancel_gesture();
        let id = self.store.create(kind, &self.config).id();
        events.push(EditorEvent::ElementCreated { id });
        self.set_selection(Some(id), &mut events);
        self.commit();
        events
    }

    /// Enter content-edit mode on a text element.
    pub fn edit_text(&mut self, id: ElementId) -> Vec<EditorEvent> {
        let mut events = Vec::new();
        let Some(element) = self.store.get(id) else {
            log::debug!("Ignoring edit of missing element {}", id);
            return events;
        };
        if !element.capabilities().text_content {
            log::debug!("Ignoring edit of {}", element.label());
            return events;
        }
        self.set_selection(Some(id), &mut events);
        let was_editing = self.selection.editing();
        if let Some(element) = self.store.get(id) {
            self.selection.enter_editing(element);
        }
        self.push_editing_change(was_editing, &mut events);
        events
    }

    /// Leave content-edit mode.
    pub fn end_text_edit(&mut self) -> Vec<EditorEvent> {
        let mut events = Vec::new();
        let was_editing = self.selection.editing();
        self.selection.exit_editing();
        self.push_editing_change(was_editing, &mut events);
        events
    }

    pub fn pointer_down(&mut self, target: PointerTarget, position: Point) -> Vec<EditorEvent> {
        let mut events = Vec::new();
        if !self.interaction.is_idle() {
            events.extend(self.pointer_up());
        }

        match target {
            PointerTarget::Canvas => self.set_selection(None, &mut events),
            PointerTarget::Element(id) => {
                if self.selection.is_editing_element(id) {
                    return events;
                }
                if self.store.get(id).is_none() {
                    log::debug!("Pointer down on missing element {}", id);
                    return events;
                }
                if !self.selection.is_selected(id) {
                    // The press that selects an element does not drag it.
                    self.set_selection(Some(id), &mut events);
                    return events;
                }
                if let Some(element) = self.store.get(id) {
                    self.interaction.begin_drag(element, position);
                }
            }
            PointerTarget::Handle(id, kind) => {
                if !self.selection.is_selected(id) {
                    log::debug!("Ignoring handle of unselected element {}", id);
                    return events;
                }
                let Some(element) = self.store.get(id) else {
                    return events;
                };
                match kind {
                    HandleKind::Resize(handle) => {
                        self.interaction.begin_resize(element, handle, position);
                    }
                    HandleKind::Rotate => {
                        self.interaction.begin_rotate(element, position);
                    }
                }
            }
        }
        events
    }

    pub fn pointer_move(&mut self, position: Point) -> Vec<EditorEvent> {
        match self.interaction.pointer_move(&mut self.store, position, &self.config) {
            Some(id) => {
                self.persistence.gesture_step(self.store.as_slice());
                vec![EditorEvent::ElementUpdated { id }]
            }
            None => Vec::new(),
        }
    }

    pub fn pointer_up(&mut self) -> Vec<EditorEvent> {
        if self.interaction.pointer_up().is_some() {
            self.commit();
        }
        Vec::new()
    }

    pub fn key_down(&mut self, key: Key, modifiers: Modifiers) -> Vec<EditorEvent> {
        let mut events = Vec::new();
        match key {
            Key::Plus | Key::Minus if modifiers.command() => {
                let step = self.config.font_size_step;
                self.change_font_size(if key == Key::Plus { step } else { -step }, &mut events);
            }
            Key::Escape => {
                if self.selection.is_editing() {
                    events = self.end_text_edit();
                } else {
                    self.set_selection(None, &mut events);
                }
            }
            _ if self.selection.is_editing() => {
                log::debug!("Key {:?} left to the text editor", key);
            }
            Key::Delete | Key::Backspace => events = self.delete_selected(),
            _ => {
                if let Some((dx, dy)) = key.arrow_direction() {
                    let step = if modifiers.shift {
                        self.config.nudge_step_large
                    } else {
                        self.config.nudge_step
                    };
                    self.nudge(Vec2::new(dx, dy) * step, &mut events);
                }
            }
        }
        events
    }

    fn nudge(&mut self, delta: Vec2, events: &mut Vec<EditorEvent>) {
        let Some(id) = self.selection.selected() else {
            return;
        };
        let canvas = self.config.canvas_size;
        let Some(element) = self.store.get_mut(id) else {
            return;
        };
        element.position = clamp_position(element.position + delta, element.size(), canvas);
        events.push(EditorEvent::ElementUpdated { id });
        self.commit();
    }

    fn change_font_size(&mut self, delta: f64, events: &mut Vec<EditorEvent>) {
        let Some(id) = self.selection.selected() else {
            return;
        };
        let min = self.config.font_size_min;
        let Some(element) = self.store.get_mut(id) else {
            return;
        };
        if !element.capabilities().text_content {
            return;
        }
        let current = element.style.font_size.unwrap_or(DEFAULT_FONT_SIZE);
        element.style.font_size = Some((current + delta).max(min));
        events.push(EditorEvent::ElementUpdated { id });
        self.commit();
    }

    pub fn property_changed(&mut self, field: PropertyField, value: &str) -> Vec<EditorEvent> {
        let Some(id) = self.selection.selected() else {
            log::debug!("Property {:?} changed with nothing selected", field);
            return Vec::new();
        };
        let Some(element) = self.store.get_mut(id) else {
            return Vec::new();
        };
        if !field.supported_by(element.capabilities()) {
            log::debug!("{} has no {:?} property", element.label(), field);
            return Vec::new();
        }
        if let Err(e) = apply_property(element, field, value, &self.config) {
            log::warn!("Rejected {:?} value {:?}: {}", field, value, e);
            return Vec::new();
        }
        self.commit();
        vec![EditorEvent::ElementUpdated { id }]
    }

    pub fn layer_reorder_requested(&mut self, id: ElementId, direction: ReorderDirection) -> Vec<EditorEvent> {
        let moved = match direction {
            ReorderDirection::Up => self.store.move_up(id),
            ReorderDirection::Down => self.store.move_down(id),
        };
        if !moved {
            log::debug!("Reorder of {} {:?} is a no-op", id, direction);
            return Vec::new();
        }
        self.commit();
        vec![EditorEvent::OrderChanged { id }]
    }

    pub fn delete_selected(&mut self) -> Vec<EditorEvent> {
        match self.selection.selected() {
            Some(id) => self.remove(id),
            None => Vec::new(),
        }
    }

    /// Delete an element. Clears selection and edit mode if it was selected.
    pub fn remove(&mut self, id: ElementId) -> Vec<EditorEvent> {
        let mut events = Vec::new();
        if self.interaction.active_element() == Some(id) {
            self.interaction.cancel();
        }
        if self.store.remove(id).is_none() {
            return events;
        }
        events.push(EditorEvent::ElementRemoved { id });
        let was_editing = self.selection.editing();
        if self.selection.remove(id) {
            events.push(EditorEvent::SelectionChanged { selected: None });
        }
        self.push_editing_change(was_editing, &mut events);
        self.commit();
        events
    }

    /// Write any deferred changes.
    pub fn flush(&mut self) -> bool {
        self.persistence.flush(self.store.as_slice())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::WritePolicy;
    use crate::geometry::{MIN_SIZE, ResizeHandle};
    use crate::storage::{MemoryBlobStore, StorageError};
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    type TestEditor = Editor<Arc<MemoryBlobStore>>;

    fn editor() -> (TestEditor, Arc<MemoryBlobStore>) {
        let blobs = Arc::new(MemoryBlobStore::new());
        (Editor::new(EditorConfig::default(), Arc::clone(&blobs)), blobs)
    }

    fn create(ed: &mut TestEditor, kind: ElementKind) -> ElementId {
        ed.tool_selected(kind);
        ed.selected().unwrap()
    }

    fn position(ed: &TestEditor, id: ElementId) -> Point {
        ed.element(id).unwrap().position
    }

    fn point_on_circle(center: Point, degrees: f64) -> Point {
        let r = degrees.to_radians();
        center + Vec2::new(r.cos(), r.sin()) * 60.0
    }

    #[derive(Default)]
    struct CountingStore {
        inner: MemoryBlobStore,
        writes: AtomicUsize,
    }

    impl BlobStore for CountingStore {
        fn get(&self, key: &str) -> StorageResult<Option<String>> {
            self.inner.get(key)
        }

        fn set(&self, key: &str, value: &str) -> StorageResult<()> {
            self.writes.fetch_add(1, Ordering::SeqCst);
            self.inner.set(key, value)
        }

        fn remove(&self, key: &str) -> StorageResult<()> {
            self.inner.remove(key)
        }
    }

    #[test]
    fn test_create_selects_and_persists() {
        let (mut ed, blobs) = editor();
        let events = ed.tool_selected(ElementKind::Rectangle);
        let id = ElementId(1);
        assert_eq!(
            events,
            vec![
                EditorEvent::ElementCreated { id },
                EditorEvent::SelectionChanged { selected: Some(id) },
            ]
        );
        assert_eq!(position(&ed, id), Point::new(60.0, 60.0));
        assert_eq!(ed.handles().len(), 9);
        assert!(blobs.get("layoutink.elements").unwrap().unwrap().contains("rectangle-1"));
    }

    #[test]
    fn test_drag_clamps_to_canvas() {
        let (mut ed, _) = editor();
        let id = create(&mut ed, ElementKind::Rectangle);
        ed.pointer_down(PointerTarget::Element(id), Point::new(100.0, 100.0));
        let events = ed.pointer_move(Point::new(1100.0, 1100.0));
        assert_eq!(events, vec![EditorEvent::ElementUpdated { id }]);
        ed.pointer_up();
        assert_eq!(position(&ed, id), Point::new(680.0, 520.0));
        assert_eq!(*ed.gesture(), GestureState::Idle);
    }

    #[test]
    fn test_moves_stay_inside_canvas() {
        let (mut ed, _) = editor();
        let id = create(&mut ed, ElementKind::Text);
        let moves = [
            (Key::ArrowLeft, Modifiers::SHIFT, 12),
            (Key::ArrowDown, Modifiers::SHIFT, 80),
            (Key::ArrowRight, Modifiers::NONE, 900),
            (Key::ArrowUp, Modifiers::SHIFT, 3),
        ];
        for (key, modifiers, times) in moves {
            for _ in 0..times {
                ed.key_down(key, modifiers);
                let el = ed.element(id).unwrap();
                assert!(el.position.x >= 0.0 && el.position.x <= 800.0 - el.width);
                assert!(el.position.y >= 0.0 && el.position.y <= 600.0 - el.height);
            }
        }
        assert_eq!(position(&ed, id), Point::new(680.0, 490.0));

        ed.pointer_down(PointerTarget::Element(id), Point::new(700.0, 500.0));
        ed.pointer_move(Point::new(-300.0, -300.0));
        ed.pointer_up();
        assert_eq!(position(&ed, id), Point::ZERO);
    }

    #[test]
    fn test_resize_from_nw_through_handle() {
        let (mut ed, _) = editor();
        let id = create(&mut ed, ElementKind::Rectangle);
        let nw = Point::new(60.0, 60.0);
        let target = ed.hit_test(nw);
        assert_eq!(target, PointerTarget::Handle(id, HandleKind::Resize(ResizeHandle::Nw)));
        ed.pointer_down(target, nw);
        ed.pointer_move(Point::new(400.0, 400.0));
        ed.pointer_up();
        let bounds = ed.element(id).unwrap().bounds();
        assert_eq!(bounds.width(), MIN_SIZE);
        assert_eq!(bounds.height(), MIN_SIZE);
        assert_eq!((bounds.x1, bounds.y1), (180.0, 140.0));
    }

    #[test]
    fn test_line_endpoint_floor() {
        let (mut ed, _) = editor();
        let id = create(&mut ed, ElementKind::Line);
        assert_eq!(ed.handles().len(), 2);
        let segment = ed.element(id).unwrap().line_segment().unwrap();
        ed.pointer_down(PointerTarget::Handle(id, HandleKind::Resize(ResizeHandle::E)), segment.end());
        ed.pointer_move(segment.anchor + Vec2::new(3.0, 0.0));
        ed.pointer_up();
        assert_eq!(ed.element(id).unwrap().width, MIN_SIZE);
    }

    #[test]
    fn test_line_ignores_rotate_handle() {
        let (mut ed, _) = editor();
        let id = create(&mut ed, ElementKind::Line);
        ed.pointer_down(PointerTarget::Handle(id, HandleKind::Rotate), Point::new(0.0, 0.0));
        assert!(ed.pointer_move(Point::new(300.0, 300.0)).is_empty());
        assert_eq!(ed.element(id).unwrap().rotation, 0.0);
    }

    #[test]
    fn test_rotation_accumulates_across_gestures() {
        let (mut ed, _) = editor();
        let id = create(&mut ed, ElementKind::Rectangle);
        let center = ed.element(id).unwrap().center();
        let rotate = PointerTarget::Handle(id, HandleKind::Rotate);

        ed.pointer_down(rotate, point_on_circle(center, -90.0));
        ed.pointer_move(point_on_circle(center, -60.0));
        ed.pointer_up();
        ed.pointer_down(rotate, point_on_circle(center, 0.0));
        ed.pointer_move(point_on_circle(center, 20.0));
        ed.pointer_move(point_on_circle(center, 45.0));
        ed.pointer_up();

        assert!((ed.element(id).unwrap().rotation - 75.0).abs() < 1e-9);
    }

    #[test]
    fn test_pointer_down_on_unselected_element_only_selects() {
        let (mut ed, _) = editor();
        let first = create(&mut ed, ElementKind::Rectangle);
        let second = create(&mut ed, ElementKind::Circle);
        assert_eq!(ed.selected(), Some(second));

        let events = ed.pointer_down(PointerTarget::Element(first), Point::new(65.0, 65.0));
        assert_eq!(events, vec![EditorEvent::SelectionChanged { selected: Some(first) }]);
        assert_eq!(*ed.gesture(), GestureState::Idle);
        assert!(ed.pointer_move(Point::new(165.0, 65.0)).is_empty());
        ed.pointer_up();
        assert_eq!(position(&ed, first), Point::new(60.0, 60.0));

        // The next press on the now selected element drags it.
        ed.pointer_down(PointerTarget::Element(first), Point::new(65.0, 65.0));
        ed.pointer_move(Point::new(75.0, 85.0));
        ed.pointer_up();
        assert_eq!(position(&ed, first), Point::new(70.0, 80.0));
        assert_eq!(position(&ed, second), Point::new(70.0, 70.0));
    }

    #[test]
    fn test_canvas_click_clears_selection() {
        let (mut ed, _) = editor();
        create(&mut ed, ElementKind::Rectangle);
        let events = ed.pointer_down(PointerTarget::Canvas, Point::new(5.0, 5.0));
        assert_eq!(events, vec![EditorEvent::SelectionChanged { selected: None }]);
        assert!(ed.handles().is_empty());
        assert_eq!(ed.property_panel(), None);
    }

    #[test]
    fn test_delete_selected_and_unselected() {
        let (mut ed, _) = editor();
        let first = create(&mut ed, ElementKind::Rectangle);
        let second = create(&mut ed, ElementKind::Rectangle);

        let events = ed.remove(first);
        assert_eq!(events, vec![EditorEvent::ElementRemoved { id: first }]);
        assert_eq!(ed.selected(), Some(second));

        let events = ed.key_down(Key::Delete, Modifiers::NONE);
        assert_eq!(
            events,
            vec![
                EditorEvent::ElementRemoved { id: second },
                EditorEvent::SelectionChanged { selected: None },
            ]
        );
        assert!(ed.elements().is_empty());
        assert!(ed.delete_selected().is_empty());
    }

    #[test]
    fn test_reorder_round_trip_and_layers() {
        let (mut ed, _) = editor();
        for kind in [ElementKind::Rectangle, ElementKind::Circle, ElementKind::Text] {
            create(&mut ed, kind);
        }
        let labels = |ed: &TestEditor| ed.layers().into_iter().map(|l| l.label).collect::<Vec<_>>();
        assert_eq!(labels(&ed), vec!["text-3", "circle-2", "rectangle-1"]);
        assert!(ed.layers()[0].selected);

        let events = ed.layer_reorder_requested(ElementId(2), ReorderDirection::Up);
        assert_eq!(events, vec![EditorEvent::OrderChanged { id: ElementId(2) }]);
        assert_eq!(labels(&ed), vec!["circle-2", "text-3", "rectangle-1"]);
        assert_eq!(ed.selected(), Some(ElementId(3)));

        ed.layer_reorder_requested(ElementId(2), ReorderDirection::Down);
        assert_eq!(labels(&ed), vec!["text-3", "circle-2", "rectangle-1"]);
        assert!(ed.layer_reorder_requested(ElementId(1), ReorderDirection::Down).is_empty());
    }

    #[test]
    fn test_save_load_round_trip() {
        let (mut ed, blobs) = editor();
        for kind in ElementKind::ALL {
            create(&mut ed, kind);
        }
        ed.select(Some(ElementId(1)));
        ed.property_changed(PropertyField::BackgroundColor, "#ff0000");
        ed.property_changed(PropertyField::Rotation, "400");
        ed.edit_text(ElementId(4));
        ed.property_changed(PropertyField::Text, "Hello & bye");
        ed.key_down(Key::Plus, Modifiers::CTRL);

        let mut reopened = Editor::new(EditorConfig::default(), Arc::clone(&blobs));
        assert_eq!(reopened.restore().unwrap(), 4);
        assert_eq!(reopened.elements(), ed.elements());
        assert_eq!(reopened.selected(), None);
    }

    #[test]
    fn test_fractional_geometry_survives_reload() {
        let (mut ed, blobs) = editor();
        for i in 0..40 {
            let t = i as f64 * 0.731 + 0.137;

            let line = create(&mut ed, ElementKind::Line);
            let end = ed.element(line).unwrap().line_segment().unwrap().end();
            ed.pointer_down(PointerTarget::Handle(line, HandleKind::Resize(ResizeHandle::W)), end);
            ed.pointer_move(Point::new(30.14 + t, 217.3 - t / 3.0));
            ed.pointer_up();

            let rect = create(&mut ed, ElementKind::Rectangle);
            let center = ed.element(rect).unwrap().center();
            ed.pointer_down(PointerTarget::Handle(rect, HandleKind::Rotate), point_on_circle(center, -90.0));
            ed.pointer_move(point_on_circle(center, -90.0 + 13.7 * t));
            ed.pointer_up();
        }
        assert!(ed.elements().iter().any(|el| el.rotation.fract() != 0.0));

        let mut reopened = Editor::new(EditorConfig::default(), Arc::clone(&blobs));
        reopened.restore().unwrap();
        assert_eq!(reopened.elements(), ed.elements());
    }

    #[test]
    fn test_restore_flushes_gesture_in_progress() {
        let blobs = Arc::new(MemoryBlobStore::new());
        let config = EditorConfig {
            write_policy: WritePolicy::Coalesce,
            ..EditorConfig::default()
        };
        let mut ed = Editor::new(config, Arc::clone(&blobs));
        let id = create(&mut ed, ElementKind::Rectangle);
        ed.pointer_down(PointerTarget::Element(id), Point::new(65.0, 65.0));
        ed.pointer_move(Point::new(95.0, 75.0));
        assert!(ed.persistence().is_dirty());

        assert_eq!(ed.restore().unwrap(), 1);
        assert_eq!(*ed.gesture(), GestureState::Idle);
        assert!(!ed.persistence().is_dirty());
        assert_eq!(position(&ed, id), Point::new(90.0, 70.0));
    }

    #[test]
    fn test_layers_report_widget_state() {
        let (mut ed, _) = editor();
        let rect = create(&mut ed, ElementKind::Rectangle);
        let text = create(&mut ed, ElementKind::Text);
        ed.edit_text(text);
        let layers = ed.layers();
        assert_eq!(layers[0].state, WidgetState::Editing(crate::widget::EditingKind::Text));
        assert!(layers[0].selected);
        assert_eq!((layers[1].id, layers[1].state), (rect, WidgetState::Normal));
    }

    #[test]
    fn test_ids_not_reused_after_reload() {
        let (mut ed, blobs) = editor();
        for _ in 0..3 {
            create(&mut ed, ElementKind::Rectangle);
        }
        ed.remove(ElementId(1));

        let mut reopened = Editor::new(EditorConfig::default(), Arc::clone(&blobs));
        reopened.restore().unwrap();
        let id = create(&mut reopened, ElementKind::Circle);
        assert_eq!(id, ElementId(4));
        let ids: Vec<ElementId> = reopened.elements().iter().map(Element::id).collect();
        assert_eq!(ids, vec![ElementId(2), ElementId(3), ElementId(4)]);
    }

    #[test]
    fn test_text_edit_mode_suppresses_nudge_and_delete() {
        let (mut ed, _) = editor();
        let id = create(&mut ed, ElementKind::Text);
        let events = ed.edit_text(id);
        assert_eq!(events, vec![EditorEvent::EditingChanged { editing: Some(id) }]);

        ed.key_down(Key::ArrowRight, Modifiers::NONE);
        ed.key_down(Key::Backspace, Modifiers::NONE);
        assert_eq!(position(&ed, id), Point::new(60.0, 60.0));
        assert!(ed.element(id).is_some());

        // Font size shortcuts still apply while editing.
        ed.key_down(Key::Plus, Modifiers::CTRL);
        assert_eq!(ed.element(id).unwrap().style.font_size, Some(20.0));

        // Pointer-down on the editing element starts no gesture.
        ed.pointer_down(PointerTarget::Element(id), Point::new(70.0, 70.0));
        assert!(ed.pointer_move(Point::new(200.0, 200.0)).is_empty());

        let events = ed.key_down(Key::Escape, Modifiers::NONE);
        assert_eq!(events, vec![EditorEvent::EditingChanged { editing: None }]);
        assert_eq!(ed.selected(), Some(id));
        let events = ed.key_down(Key::Escape, Modifiers::NONE);
        assert_eq!(events, vec![EditorEvent::SelectionChanged { selected: None }]);
    }

    #[test]
    fn test_edit_text_refuses_other_kinds() {
        let (mut ed, _) = editor();
        let id = create(&mut ed, ElementKind::Rectangle);
        assert!(ed.edit_text(id).is_empty());
        assert_eq!(ed.editing(), None);
    }

    #[test]
    fn test_pointer_down_elsewhere_ends_edit_mode() {
        let (mut ed, _) = editor();
        let text = create(&mut ed, ElementKind::Text);
        let rect = create(&mut ed, ElementKind::Rectangle);
        ed.edit_text(text);
        let events = ed.pointer_down(PointerTarget::Element(rect), Point::new(100.0, 100.0));
        assert_eq!(
            events,
            vec![
                EditorEvent::SelectionChanged { selected: Some(rect) },
                EditorEvent::EditingChanged { editing: None },
            ]
        );
    }

    #[test]
    fn test_font_size_floor() {
        let (mut ed, _) = editor();
        let id = create(&mut ed, ElementKind::Text);
        for _ in 0..20 {
            ed.key_down(Key::Minus, Modifiers::CTRL);
        }
        assert_eq!(ed.element(id).unwrap().style.font_size, Some(8.0));
        assert!(ed.key_down(Key::Minus, Modifiers::NONE).is_empty());
    }

    #[test]
    fn test_property_edits() {
        let (mut ed, _) = editor();
        let line = create(&mut ed, ElementKind::Line);
        assert!(ed.property_changed(PropertyField::BackgroundColor, "red").is_empty());
        assert!(ed.property_changed(PropertyField::Height, "50").is_empty());
        assert_eq!(ed.property_changed(PropertyField::Width, "5").len(), 1);
        assert_eq!(ed.element(line).unwrap().width, MIN_SIZE);

        let rect = create(&mut ed, ElementKind::Rectangle);
        assert!(ed.property_changed(PropertyField::FontSize, "30").is_empty());
        assert!(ed.property_changed(PropertyField::Left, "wide").is_empty());
        ed.property_changed(PropertyField::Left, "790px");
        assert_eq!(position(&ed, rect).x, 680.0);
        ed.property_changed(PropertyField::TextColor, "rgb(0, 128, 0)");

        let panel = ed.property_panel().unwrap();
        assert_eq!(panel.text_color.as_deref(), Some("#008000"));
        assert!(!panel.fields.contains(&PropertyField::Text));
        assert!(panel.fields.contains(&PropertyField::Rotation));
    }

    #[test]
    fn test_corrupt_blob_leaves_usable_editor() {
        let (mut ed, blobs) = editor();
        blobs.set("layoutink.elements", "{definitely not a layout").unwrap();
        assert!(matches!(ed.restore(), Err(StorageError::Serialization(_))));
        assert!(ed.elements().is_empty());
        assert_eq!(create(&mut ed, ElementKind::Rectangle), ElementId(1));
    }

    #[test]
    fn test_write_policies() {
        let gesture = |policy: WritePolicy| {
            let blobs = Arc::new(CountingStore::default());
            let config = EditorConfig {
                write_policy: policy,
                ..EditorConfig::default()
            };
            let mut ed = Editor::new(config, Arc::clone(&blobs));
            let id = create_counting(&mut ed);
            ed.pointer_down(PointerTarget::Element(id), Point::new(100.0, 100.0));
            for step in 1..=3 {
                ed.pointer_move(Point::new(100.0 + step as f64, 100.0));
            }
            ed.pointer_up();
            blobs.writes.load(Ordering::SeqCst)
        };
        assert_eq!(gesture(WritePolicy::Immediate), 5);
        assert_eq!(gesture(WritePolicy::Coalesce), 2);
    }

    fn create_counting(ed: &mut Editor<Arc<CountingStore>>) -> ElementId {
        ed.tool_selected(ElementKind::Rectangle);
        ed.selected().unwrap()
    }

    #[test]
    fn test_selection_change_cancels_and_flushes_gesture() {
        let blobs = Arc::new(MemoryBlobStore::new());
        let config = EditorConfig {
            write_policy: WritePolicy::Coalesce,
            ..EditorConfig::default()
        };
        let mut ed = Editor::new(config, Arc::clone(&blobs));
        let first = create(&mut ed, ElementKind::Rectangle);
        let second = create(&mut ed, ElementKind::Rectangle);
        ed.select(Some(first));
        ed.pointer_down(PointerTarget::Element(first), Point::new(65.0, 65.0));
        ed.pointer_move(Point::new(95.0, 65.0));
        ed.select(Some(second));
        assert_eq!(*ed.gesture(), GestureState::Idle);
        assert!(!ed.persistence().is_dirty());

        let mut reopened = Editor::new(EditorConfig::default(), blobs);
        reopened.restore().unwrap();
        assert_eq!(position(&reopened, first), Point::new(90.0, 60.0));
    }

    #[test]
    fn test_select_missing_id_selects_nothing() {
        let (mut ed, _) = editor();
        create(&mut ed, ElementKind::Rectangle);
        let events = ed.select(Some(ElementId(99)));
        assert_eq!(events, vec![EditorEvent::SelectionChanged { selected: None }]);
    }

    #[test]
    fn test_events_serialize_for_host() {
        let json = serde_json::to_string(&EditorEvent::SelectionChanged { selected: Some(ElementId(3)) }).unwrap();
        assert_eq!(json, r#"{"type":"selectionChanged","selected":3}"#);
    }
}
