//! Editor configuration.

use crate::geometry::{LINE_THICKNESS, MIN_SIZE};
use kurbo::{Point, Size};
use serde::{Deserialize, Serialize};

/// Default key the element list is persisted under.
pub const DEFAULT_STORAGE_KEY: &str = "layoutink.elements";

/// When the persistence bridge writes during a gesture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WritePolicy {
    /// Write after every pointer move of a gesture.
    #[default]
    Immediate,
    /// Write once, when the gesture ends.
    Coalesce,
}

/// Tunables for one editor instance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Size of the canvas client rectangle.
    pub canvas_size: Size,
    pub min_size: f64,
    pub line_thickness: f64,
    pub nudge_step: f64,
    /// Nudge step with Shift held.
    pub nudge_step_large: f64,
    /// Top-left of the first created element.
    pub default_position: Point,
    pub default_size: Size,
    /// Offset added per previously created element.
    pub cascade_offset: f64,
    pub font_size_step: f64,
    pub font_size_min: f64,
    /// Hit radius around handle positions.
    pub handle_tolerance: f64,
    /// Distance of the rotation handle above the top edge.
    pub rotate_handle_offset: f64,
    pub storage_key: String,
    pub write_policy: WritePolicy,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            canvas_size: Size::new(800.0, 600.0),
            min_size: MIN_SIZE,
            line_thickness: LINE_THICKNESS,
            nudge_step: 1.0,
            nudge_step_large: 10.0,
            default_position: Point::new(60.0, 60.0),
            default_size: Size::new(120.0, 80.0),
            cascade_offset: 10.0,
            font_size_step: 2.0,
            font_size_min: 8.0,
            handle_tolerance: 8.0,
            rotate_handle_offset: 24.0,
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
            write_policy: WritePolicy::default(),
        }
    }
}

impl EditorConfig {
    /// Parse a JSON config; missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Top-left of the `n`th created element (1-based), before clamping.
    pub fn cascade_position(&self, n: u64) -> Point {
        let step = self.cascade_offset * n.saturating_sub(1) as f64;
        Point::new(self.default_position.x + step, self.default_position.y + step)
    }
}
