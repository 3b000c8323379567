//! Element definitions for the layout canvas.

pub mod style;

pub use style::{Border, BorderStyle, CssColor, CssLength, ElementStyle, StyleParseError};

use crate::geometry::{LineSegment, rotate_about};
use kurbo::{Point, Rect, Size};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Stroke color given to new boxes and lines.
pub const DEFAULT_INK: CssColor = CssColor::rgb(0x33, 0x33, 0x33);

/// Content of a freshly created text element.
pub const DEFAULT_TEXT: &str = "Edit text";

/// Font size of a freshly created text element, in pixels.
pub const DEFAULT_FONT_SIZE: f64 = 18.0;

/// Unique, never reused, element identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ElementId(pub u64);

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The kind of an element, fixed for its lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ElementKind {
    Rectangle,
    Circle,
    Line,
    Text,
}

/// Which operations an element kind accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Capabilities {
    /// Offers the rotation handle.
    pub rotation: bool,
    /// Has an editable background fill.
    pub fill: bool,
    /// Has an editable text color.
    pub text_color: bool,
    /// Carries editable text content and a content-edit mode.
    pub text_content: bool,
    /// Offers the eight box resize handles (otherwise only endpoint handles).
    pub free_resize: bool,
}

const BOX_CAPABILITIES: Capabilities = Capabilities {
    rotation: true,
    fill: true,
    text_color: true,
    text_content: false,
    free_resize: true,
};

const LINE_CAPABILITIES: Capabilities = Capabilities {
    rotation: false,
    fill: false,
    text_color: false,
    text_content: false,
    free_resize: false,
};

const TEXT_CAPABILITIES: Capabilities = Capabilities {
    rotation: true,
    fill: true,
    text_color: true,
    text_content: true,
    free_resize: true,
};

impl ElementKind {
    pub const ALL: [ElementKind; 4] = [
        ElementKind::Rectangle,
        ElementKind::Circle,
        ElementKind::Line,
        ElementKind::Text,
    ];

    pub fn capabilities(self) -> Capabilities {
        match self {
            ElementKind::Rectangle | ElementKind::Circle => BOX_CAPABILITIES,
            ElementKind::Line => LINE_CAPABILITIES,
            ElementKind::Text => TEXT_CAPABILITIES,
        }
    }

    pub fn supports_rotation(self) -> bool {
        self.capabilities().rotation
    }

    pub fn supports_fill(self) -> bool {
        self.capabilities().fill
    }

    pub fn supports_text_content(self) -> bool {
        self.capabilities().text_content
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ElementKind::Rectangle => "rectangle",
            ElementKind::Circle => "circle",
            ElementKind::Line => "line",
            ElementKind::Text => "text",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.as_str() == name)
    }

    /// Style every new element of this kind starts with.
    pub fn default_style(self, line_thickness: f64) -> ElementStyle {
        let outline = Border::new(2.0, BorderStyle::Solid, DEFAULT_INK);
        match self {
            ElementKind::Rectangle => ElementStyle {
                fill: Some(CssColor::TRANSPARENT),
                stroke: Some(outline),
                ..ElementStyle::default()
            },
            ElementKind::Circle => ElementStyle {
                fill: Some(CssColor::TRANSPARENT),
                stroke: Some(outline),
                border_radius: Some(CssLength::Percent(50.0)),
                ..ElementStyle::default()
            },
            ElementKind::Line => ElementStyle {
                stroke: Some(Border::new(line_thickness, BorderStyle::Solid, DEFAULT_INK)),
                ..ElementStyle::default()
            },
            ElementKind::Text => ElementStyle {
                fill: Some(CssColor::TRANSPARENT),
                stroke: Some(Border::new(1.0, BorderStyle::Dashed, CssColor::rgb(0x66, 0x66, 0x66))),
                text_color: Some(CssColor::rgb(0x11, 0x11, 0x11)),
                font_size: Some(DEFAULT_FONT_SIZE),
                padding: Some(4.0),
                border_radius: None,
            },
        }
    }
}

impl fmt::Display for ElementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A placed rectangle, circle, line, or text box.
#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    pub(crate) id: ElementId,
    kind: ElementKind,
    /// Top-left corner, canvas-relative.
    pub position: Point,
    /// Width; for lines, the segment length.
    pub width: f64,
    /// Height; for lines, the fixed thickness.
    pub height: f64,
    /// Rotation in degrees, unbounded.
    pub rotation: f64,
    pub style: ElementStyle,
    /// Text payload, only for text elements.
    pub content: Option<String>,
}

impl Element {
    /// Create an element of `kind` with its default style and content.
    pub fn new(id: ElementId, kind: ElementKind, position: Point, size: Size, line_thickness: f64) -> Self {
        let content = kind.supports_text_content().then(|| DEFAULT_TEXT.to_string());
        Self::reconstruct(
            id,
            kind,
            position,
            size,
            0.0,
            kind.default_style(line_thickness),
            content,
            line_thickness,
        )
    }

    /// Rebuild an element with explicit fields (for storage).
    ///
    /// Goes through the same kind normalization as [`Element::new`], so a
    /// loaded element has exactly the affordances a created one has.
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn reconstruct(
        id: ElementId,
        kind: ElementKind,
        position: Point,
        size: Size,
        rotation: f64,
        style: ElementStyle,
        content: Option<String>,
        line_thickness: f64,
    ) -> Self {
        let mut element = Self {
            id,
            kind,
            position,
            width: size.width,
            height: size.height,
            rotation,
            style,
            content,
        };
        element.normalize_for_kind(line_thickness);
        element
    }

    fn normalize_for_kind(&mut self, line_thickness: f64) {
        let caps = self.kind.capabilities();
        if !caps.fill {
            self.style.fill = None;
        }
        if caps.text_content {
            if self.content.is_none() {
                self.content = Some(String::new());
            }
        } else {
            self.content = None;
        }
        if self.kind == ElementKind::Line {
            self.height = line_thickness;
            let ink = self.style.stroke.map_or(DEFAULT_INK, |b| b.color);
            self.style.stroke = Some(Border::new(line_thickness, BorderStyle::Solid, ink));
            self.style.border_radius = None;
        }
    }

    pub fn id(&self) -> ElementId {
        self.id
    }

    pub fn kind(&self) -> ElementKind {
        self.kind
    }

    pub fn capabilities(&self) -> Capabilities {
        self.kind.capabilities()
    }

    /// Label shown in the layer list and used as the persisted id.
    pub fn label(&self) -> String {
        format!("{}-{}", self.kind, self.id)
    }

    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    /// Unrotated bounding box.
    pub fn bounds(&self) -> Rect {
        Rect::from_origin_size(self.position, self.size())
    }

    pub fn center(&self) -> Point {
        self.bounds().center()
    }

    /// Point the element's rotation is applied about: the center for boxes,
    /// the middle of the left edge for lines.
    pub fn rotation_origin(&self) -> Point {
        if self.kind == ElementKind::Line {
            Point::new(self.position.x, self.position.y + self.height / 2.0)
        } else {
            self.center()
        }
    }

    /// Map a canvas point into the element's unrotated frame.
    pub fn to_local(&self, point: Point) -> Point {
        rotate_about(point, self.rotation_origin(), -self.rotation)
    }

    /// Map a point of the unrotated frame onto the canvas.
    pub fn to_canvas(&self, point: Point) -> Point {
        rotate_about(point, self.rotation_origin(), self.rotation)
    }

    /// Hit test in the element's rotated frame.
    pub fn contains(&self, point: Point, tolerance: f64) -> bool {
        self.bounds()
            .inflate(tolerance, tolerance)
            .contains(self.to_local(point))
    }

    /// The segment of a line element.
    pub fn line_segment(&self) -> Option<LineSegment> {
        (self.kind == ElementKind::Line)
            .then(|| LineSegment::from_box(self.position, self.width, self.height, self.rotation))
    }

    /// Replace a line element's geometry with `segment`.
    pub fn set_line_segment(&mut self, segment: LineSegment) {
        if self.kind != ElementKind::Line {
            return;
        }
        self.position = segment.box_origin(self.height);
        self.width = segment.length;
        self.rotation = segment.angle_degrees;
    }
}
