//! CSS-flavoured style values: colors, lengths, and border descriptors.

use peniko::Color;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Failure to parse a style value coming from the host or a persisted record.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum StyleParseError {
    #[error("invalid color: {0}")]
    Color(String),
    #[error("invalid length: {0}")]
    Length(String),
    #[error("invalid border: {0}")]
    Border(String),
}

/// An sRGB color with 8-bit channels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CssColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl CssColor {
    pub const TRANSPARENT: CssColor = CssColor::new(0, 0, 0, 0);

    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::new(r, g, b, 255)
    }

    /// Parse any CSS color: hex, `rgb()`/`rgba()`, `hsl()`, named colors and
    /// `transparent`.
    pub fn parse(s: &str) -> Result<Self, StyleParseError> {
        let trimmed = s.trim();
        if trimmed.eq_ignore_ascii_case("transparent") {
            return Ok(Self::TRANSPARENT);
        }
        let color: Color = peniko::color::parse_color(trimmed)
            .map_err(|_| StyleParseError::Color(s.to_string()))?
            .to_alpha_color::<peniko::color::Srgb>();
        Ok(color.into())
    }
}

impl From<Color> for CssColor {
    fn from(color: Color) -> Self {
        let rgba = color.to_rgba8();
        Self {
            r: rgba.r,
            g: rgba.g,
            b: rgba.b,
            a: rgba.a,
        }
    }
}

impl From<CssColor> for Color {
    fn from(color: CssColor) -> Self {
        Color::from_rgba8(color.r, color.g, color.b, color.a)
    }
}

impl fmt::Display for CssColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.a {
            0 => f.write_str("transparent"),
            255 => write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b),
            a => write!(
                f,
                "rgba({}, {}, {}, {})",
                self.r,
                self.g,
                self.b,
                (f64::from(a) / 255.0 * 1000.0).round() / 1000.0
            ),
        }
    }
}

impl FromStr for CssColor {
    type Err = StyleParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// A CSS length in pixels or percent.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CssLength {
    Px(f64),
    Percent(f64),
}

impl CssLength {
    /// Parse `"18px"`, `"50%"` or a bare number (pixels).
    pub fn parse(s: &str) -> Result<Self, StyleParseError> {
        let trimmed = s.trim();
        let err = || StyleParseError::Length(s.to_string());
        if let Some(pct) = trimmed.strip_suffix('%') {
            return pct.trim().parse::<f64>().map(CssLength::Percent).map_err(|_| err());
        }
        let number = trimmed.strip_suffix("px").unwrap_or(trimmed).trim();
        let value = number.parse::<f64>().map_err(|_| err())?;
        if value.is_finite() {
            Ok(CssLength::Px(value))
        } else {
            Err(err())
        }
    }

    /// Pixel value, if this is a pixel length.
    pub fn px(&self) -> Option<f64> {
        match self {
            CssLength::Px(v) => Some(*v),
            CssLength::Percent(_) => None,
        }
    }
}

impl fmt::Display for CssLength {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CssLength::Px(v) => write!(f, "{v}px"),
            CssLength::Percent(v) => write!(f, "{v}%"),
        }
    }
}

/// Line style of a border.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BorderStyle {
    #[default]
    Solid,
    Dashed,
    Dotted,
}

impl BorderStyle {
    pub fn as_str(self) -> &'static str {
        match self {
            BorderStyle::Solid => "solid",
            BorderStyle::Dashed => "dashed",
            BorderStyle::Dotted => "dotted",
        }
    }

    fn from_keyword(s: &str) -> Option<Self> {
        match s {
            "solid" => Some(BorderStyle::Solid),
            "dashed" => Some(BorderStyle::Dashed),
            "dotted" => Some(BorderStyle::Dotted),
            _ => None,
        }
    }
}

/// A border (or, for lines, the segment's ink): width, style and color.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Border {
    pub width: f64,
    pub style: BorderStyle,
    pub color: CssColor,
}

impl Border {
    pub fn new(width: f64, style: BorderStyle, color: CssColor) -> Self {
        Self { width, style, color }
    }

    /// Parse a CSS border shorthand such as `"2px solid #333"` or
    /// `"1px dashed rgb(102, 102, 102)"`. `"none"` yields `None`.
    pub fn parse(s: &str) -> Result<Option<Self>, StyleParseError> {
        let mut rest = s.trim();
        if rest.is_empty() || rest.eq_ignore_ascii_case("none") {
            return Ok(None);
        }

        let mut width = None;
        let mut style = None;
        while let Some(token) = rest.split_whitespace().next() {
            let lower = token.to_ascii_lowercase();
            if lower == "none" {
                return Ok(None);
            }
            if width.is_none() {
                if let Ok(CssLength::Px(w)) = CssLength::parse(&lower) {
                    width = Some(w);
                    rest = rest[token.len()..].trim_start();
                    continue;
                }
            }
            if style.is_none() {
                if let Some(st) = BorderStyle::from_keyword(&lower) {
                    style = Some(st);
                    rest = rest[token.len()..].trim_start();
                    continue;
                }
            }
            break;
        }

        let color = if rest.is_empty() {
            CssColor::rgb(0, 0, 0)
        } else {
            CssColor::parse(rest).map_err(|_| StyleParseError::Border(s.to_string()))?
        };

        Ok(Some(Border {
            width: width.unwrap_or(1.0),
            style: style.unwrap_or_default(),
            color,
        }))
    }
}

impl fmt::Display for Border {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}px {} {}", self.width, self.style.as_str(), self.color)
    }
}

/// Visual properties of an element. Which fields are meaningful depends on the
/// element's kind.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ElementStyle {
    /// Background fill. Lines have none.
    pub fill: Option<CssColor>,
    /// Border of boxes; for lines, the color and thickness of the segment.
    pub stroke: Option<Border>,
    /// Foreground (text) color.
    pub text_color: Option<CssColor>,
    /// Font size in pixels.
    pub font_size: Option<f64>,
    /// Inner padding in pixels.
    pub padding: Option<f64>,
    pub border_radius: Option<CssLength>,
}
