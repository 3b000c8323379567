//! Element store: the ordered element list and its id counter.

use crate::config::EditorConfig;
use crate::elements::{Element, ElementId, ElementKind};
use crate::geometry::clamp_position;
use kurbo::Point;

/// Elements in z-order (index 0 is bottom-most).
#[derive(Debug, Clone, Default)]
pub struct ElementStore {
    elements: Vec<Element>,
    /// Highest id handed out so far.
    last_id: u64,
}

impl ElementStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an element of `kind` with default geometry and append it on top.
    pub fn create(&mut self, kind: ElementKind, config: &EditorConfig) -> &Element {
        self.last_id += 1;
        let id = ElementId(self.last_id);
        let mut element = Element::new(
            id,
            kind,
            config.cascade_position(self.last_id),
            config.default_size,
            config.line_thickness,
        );
        element.position = clamp_position(element.position, element.size(), config.canvas_size);
        log::debug!("Created {}", element.label());
        self.push(element)
    }

    fn push(&mut self, element: Element) -> &Element {
        self.elements.push(element);
        let last = self.elements.len() - 1;
        &self.elements[last]
    }

    /// Remove an element, returning it.
    pub fn remove(&mut self, id: ElementId) -> Option<Element> {
        let index = self.index_of(id)?;
        Some(self.elements.remove(index))
    }

    pub fn get(&self, id: ElementId) -> Option<&Element> {
        self.elements.iter().find(|e| e.id() == id)
    }

    pub fn get_mut(&mut self, id: ElementId) -> Option<&mut Element> {
        self.elements.iter_mut().find(|e| e.id() == id)
    }

    /// Z-order index of an element.
    pub fn index_of(&self, id: ElementId) -> Option<usize> {
        self.elements.iter().position(|e| e.id() == id)
    }

    /// Elements bottom-most first.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &Element> {
        self.elements.iter()
    }

    pub fn as_slice(&self) -> &[Element] {
        &self.elements
    }

    /// Swap an element with the one above it.
    /// Returns true if the element was moved, false if already on top.
    pub fn move_up(&mut self, id: ElementId) -> bool {
        match self.index_of(id) {
            Some(pos) if pos + 1 < self.elements.len() => {
                self.elements.swap(pos, pos + 1);
                true
            }
            _ => false,
        }
    }

    /// Swap an element with the one below it.
    /// Returns true if the element was moved, false if already at the bottom.
    pub fn move_down(&mut self, id: ElementId) -> bool {
        match self.index_of(id) {
            Some(pos) if pos > 0 => {
                self.elements.swap(pos, pos - 1);
                true
            }
            _ => false,
        }
    }

    /// Elements topmost-first, as a layer list shows them.
    pub fn layers(&self) -> impl Iterator<Item = &Element> {
        self.elements.iter().rev()
    }

    /// Topmost element under `point`.
    pub fn element_at(&self, point: Point, tolerance: f64) -> Option<ElementId> {
        self.layers()
            .find(|e| e.contains(point, tolerance))
            .map(Element::id)
    }

    /// Replace every element, re-establishing the id counter so no id handed
    /// out before is reused.
    pub fn replace_all(&mut self, elements: Vec<Element>) {
        let highest = elements.iter().map(|e| e.id().0).max().unwrap_or(0);
        self.last_id = self.last_id.max(highest).max(elements.len() as u64);
        self.elements = elements;
    }

    /// Highest id handed out so far.
    pub fn last_id(&self) -> u64 {
        self.last_id
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kurbo::Size;

    fn ids(store: &ElementStore) -> Vec<u64> {
        store.iter().map(|e| e.id().0).collect()
    }

    #[test]
    fn test_create_cascades() {
        let config = EditorConfig::default();
        let mut store = ElementStore::new();
        let first = store.create(ElementKind::Rectangle, &config).position;
        let second = store.create(ElementKind::Circle, &config).position;
        assert_eq!(first, Point::new(60.0, 60.0));
        assert_eq!(second, Point::new(70.0, 70.0));
        assert_eq!(ids(&store), vec![1, 2]);
    }

    #[test]
    fn test_create_clamps_to_canvas() {
        let config = EditorConfig {
            canvas_size: Size::new(200.0, 150.0),
            ..EditorConfig::default()
        };
        let mut store = ElementStore::new();
        for _ in 0..10 {
            store.create(ElementKind::Rectangle, &config);
        }
        let last = store.layers().next().unwrap();
        assert_eq!(last.position, Point::new(80.0, 70.0));
    }

    #[test]
    fn test_remove_never_reuses_ids() {
        let config = EditorConfig::default();
        let mut store = ElementStore::new();
        store.create(ElementKind::Rectangle, &config);
        store.create(ElementKind::Text, &config);
        assert!(store.remove(ElementId(2)).is_some());
        assert!(store.remove(ElementId(2)).is_none());
        let id = store.create(ElementKind::Line, &config).id();
        assert_eq!(id, ElementId(3));
    }

    #[test]
    fn test_move_up_then_down_restores_order() {
        let config = EditorConfig::default();
        let mut store = ElementStore::new();
        for kind in ElementKind::ALL {
            store.create(kind, &config);
        }
        let before = ids(&store);
        assert!(store.move_up(ElementId(2)));
        assert_eq!(ids(&store), vec![1, 3, 2, 4]);
        assert!(store.move_down(ElementId(2)));
        assert_eq!(ids(&store), before);
    }

    #[test]
    fn test_move_at_boundary_is_noop() {
        let config = EditorConfig::default();
        let mut store = ElementStore::new();
        store.create(ElementKind::Rectangle, &config);
        store.create(ElementKind::Rectangle, &config);
        assert!(!store.move_up(ElementId(2)));
        assert!(!store.move_down(ElementId(1)));
        assert!(!store.move_up(ElementId(42)));
        assert_eq!(ids(&store), vec![1, 2]);
    }

    #[test]
    fn test_element_at_prefers_topmost() {
        let config = EditorConfig::default();
        let mut store = ElementStore::new();
        store.create(ElementKind::Rectangle, &config);
        store.create(ElementKind::Rectangle, &config);
        // Both boxes cover (100, 100); the second one is on top.
        assert_eq!(store.element_at(Point::new(100.0, 100.0), 0.0), Some(ElementId(2)));
        assert_eq!(store.element_at(Point::new(65.0, 65.0), 0.0), Some(ElementId(1)));
        assert_eq!(store.element_at(Point::new(700.0, 500.0), 0.0), None);
    }

    #[test]
    fn test_replace_all_keeps_counter_ahead() {
        let config = EditorConfig::default();
        let mut source = ElementStore::new();
        for _ in 0..5 {
            source.create(ElementKind::Rectangle, &config);
        }
        source.remove(ElementId(1));
        source.remove(ElementId(2));
        let survivors: Vec<Element> = source.iter().cloned().collect();

        let mut store = ElementStore::new();
        store.replace_all(survivors);
        assert_eq!(store.last_id(), 5);
        assert_eq!(store.create(ElementKind::Circle, &config).id(), ElementId(6));
    }
}
