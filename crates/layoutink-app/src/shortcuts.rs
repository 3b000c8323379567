//! Keyboard shortcuts the editor answers to, for help output.

use layoutink_core::{Key, Modifiers};

/// One documented key binding.
#[derive(Debug, Clone)]
pub struct Shortcut {
    pub key: Key,
    /// Label shown for the key, e.g. `"←"`.
    pub label: &'static str,
    pub command: bool,
    pub shift: bool,
    pub description: &'static str,
}

impl Shortcut {
    pub const fn new(key: Key, label: &'static str, command: bool, shift: bool, description: &'static str) -> Self {
        Self {
            key,
            label,
            command,
            shift,
            description,
        }
    }

    /// Display form, e.g. "Ctrl+Shift+Up".
    pub fn format(&self) -> String {
        let mut parts = Vec::new();
        if self.command {
            parts.push("Ctrl");
        }
        if self.shift {
            parts.push("Shift");
        }
        parts.push(self.label);
        parts.join("+")
    }

    /// Whether a key press with `modifiers` triggers this binding.
    pub fn matches(&self, key: Key, modifiers: Modifiers) -> bool {
        self.key == key && self.command == modifiers.command() && self.shift == modifiers.shift
    }
}

/// Registry of all keyboard shortcuts.
pub struct ShortcutRegistry;

impl ShortcutRegistry {
    pub fn all() -> Vec<Shortcut> {
        vec![
            Shortcut::new(Key::ArrowUp, "Up", false, false, "Nudge selection 1px"),
            Shortcut::new(Key::ArrowDown, "Down", false, false, "Nudge selection 1px"),
            Shortcut::new(Key::ArrowLeft, "Left", false, false, "Nudge selection 1px"),
            Shortcut::new(Key::ArrowRight, "Right", false, false, "Nudge selection 1px"),
            Shortcut::new(Key::ArrowUp, "Up", false, true, "Nudge selection 10px"),
            Shortcut::new(Key::ArrowDown, "Down", false, true, "Nudge selection 10px"),
            Shortcut::new(Key::ArrowLeft, "Left", false, true, "Nudge selection 10px"),
            Shortcut::new(Key::ArrowRight, "Right", false, true, "Nudge selection 10px"),
            Shortcut::new(Key::Delete, "Delete", false, false, "Delete selected element"),
            Shortcut::new(Key::Backspace, "Backspace", false, false, "Delete selected element"),
            Shortcut::new(Key::Escape, "Escape", false, false, "Finish text edit, or deselect"),
            Shortcut::new(Key::Plus, "+", true, false, "Increase font size"),
            Shortcut::new(Key::Minus, "-", true, false, "Decrease font size"),
        ]
    }

    /// Binding triggered by a key press, if any.
    pub fn find(key: Key, modifiers: Modifiers) -> Option<Shortcut> {
        Self::all().into_iter().find(|s| s.matches(key, modifiers))
    }

    pub fn print_all() {
        println!("\n=== Keyboard Shortcuts ===");
        for shortcut in Self::all() {
            println!("  {:20} {}", shortcut.format(), shortcut.description);
        }
        println!();
    }
}
