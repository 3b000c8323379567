//! Persisted element records.
//!
//! The stored value is a JSON array of flat records whose style fields are
//! CSS strings, the same shape a browser host reads from inline styles.

use super::{StorageError, StorageResult};
use crate::elements::{Border, BorderStyle, CssColor, CssLength, Element, ElementId, ElementKind, ElementStyle, StyleParseError};
use kurbo::{Point, Size};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::HashSet;
use thiserror::Error;

/// A record that cannot be turned back into an element.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RecordError {
    #[error("invalid element id: {0}")]
    InvalidId(String),
    #[error("unknown element kind: {0}")]
    UnknownKind(String),
    #[error(transparent)]
    Style(#[from] StyleParseError),
}

/// One element as persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ElementRecord {
    /// Label form of the id, e.g. `"rectangle-3"`.
    pub id: String,
    #[serde(default)]
    pub kind: Option<String>,
    #[serde(deserialize_with = "lenient_number")]
    pub left: f64,
    #[serde(deserialize_with = "lenient_number")]
    pub top: f64,
    #[serde(deserialize_with = "lenient_number")]
    pub width: f64,
    #[serde(deserialize_with = "lenient_number")]
    pub height: f64,
    #[serde(default)]
    pub background_color: Option<String>,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub rotation: f64,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub border: Option<String>,
    #[serde(default)]
    pub border_radius: Option<String>,
    #[serde(default)]
    pub font_size: Option<String>,
    #[serde(default)]
    pub padding: Option<String>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum NumberOrCss {
    Number(f64),
    Css(String),
}

/// Accept `60`, `"60"`, `"60px"` or `"30deg"`.
fn lenient_number<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    match NumberOrCss::deserialize(deserializer)? {
        NumberOrCss::Number(n) => Ok(n),
        NumberOrCss::Css(s) => parse_px(&s).map_err(serde::de::Error::custom),
    }
}

fn parse_px(s: &str) -> Result<f64, StyleParseError> {
    let trimmed = s.trim();
    let trimmed = trimmed.strip_suffix("deg").unwrap_or(trimmed);
    CssLength::parse(trimmed)?
        .px()
        .ok_or_else(|| StyleParseError::Length(s.to_string()))
}

fn parse_color(value: Option<&str>) -> Result<Option<CssColor>, StyleParseError> {
    value.map(CssColor::parse).transpose()
}

fn px_string(value: f64) -> String {
    CssLength::Px(value).to_string()
}

impl ElementRecord {
    /// Flatten an element into its persisted form.
    pub fn from_element(element: &Element) -> Self {
        let style = &element.style;
        let is_line = element.kind() == ElementKind::Line;
        let background = if is_line {
            style.stroke.map(|b| b.color)
        } else {
            style.fill
        };
        let border = if is_line {
            Some("none".to_string())
        } else {
            style.stroke.map(|b| b.to_string())
        };

        Self {
            id: element.label(),
            kind: Some(element.kind().as_str().to_string()),
            left: element.position.x,
            top: element.position.y,
            width: element.width,
            height: element.height,
            background_color: background.map(|c| c.to_string()),
            color: style.text_color.map(|c| c.to_string()),
            rotation: element.rotation,
            text: element.content.clone(),
            border,
            border_radius: style.border_radius.map(|r| r.to_string()),
            font_size: style.font_size.map(px_string),
            padding: style.padding.map(px_string),
        }
    }

    /// Kind named by the record, falling back to the id's label prefix.
    fn kind(&self) -> Result<ElementKind, RecordError> {
        let name = match &self.kind {
            Some(kind) => kind.as_str(),
            None => self.id.rsplit_once('-').map_or("", |(prefix, _)| prefix),
        };
        ElementKind::from_name(name).ok_or_else(|| RecordError::UnknownKind(name.to_string()))
    }

    /// Numeric part of the id: `"text-4"` and `"4"` both give 4.
    fn element_id(&self) -> Result<ElementId, RecordError> {
        let digits = self.id.rsplit_once('-').map_or(self.id.as_str(), |(_, n)| n);
        digits
            .trim()
            .parse::<u64>()
            .map(ElementId)
            .map_err(|_| RecordError::InvalidId(self.id.clone()))
    }

    /// Rebuild the element through the same kind setup creation uses.
    pub fn to_element(&self, line_thickness: f64) -> Result<Element, RecordError> {
        let kind = self.kind()?;
        let id = self.element_id()?;
        let background = parse_color(self.background_color.as_deref())?;

        let mut style = ElementStyle {
            fill: background,
            stroke: match self.border.as_deref() {
                Some(border) => Border::parse(border)?,
                None => None,
            },
            text_color: parse_color(self.color.as_deref())?,
            font_size: self.font_size.as_deref().map(parse_px).transpose()?,
            padding: self.padding.as_deref().map(parse_px).transpose()?,
            border_radius: self.border_radius.as_deref().map(CssLength::parse).transpose()?,
        };
        if kind == ElementKind::Line {
            let ink = background.unwrap_or(crate::elements::DEFAULT_INK);
            style.stroke = Some(Border::new(line_thickness, BorderStyle::Solid, ink));
        }

        Ok(Element::reconstruct(
            id,
            kind,
            Point::new(self.left, self.top),
            Size::new(self.width, self.height),
            self.rotation,
            style,
            self.text.clone(),
            line_thickness,
        ))
    }
}

/// Serialize elements, bottom-most first.
pub fn records_to_json(elements: &[Element], pretty: bool) -> Result<String, serde_json::Error> {
    let records: Vec<ElementRecord> = elements.iter().map(ElementRecord::from_element).collect();
    if pretty {
        serde_json::to_string_pretty(&records)
    } else {
        serde_json::to_string(&records)
    }
}

/// Parse a persisted array back into elements.
///
/// A record repeating an earlier id is dropped.
pub fn records_from_json(json: &str, line_thickness: f64) -> StorageResult<Vec<Element>> {
    let records: Vec<ElementRecord> =
        serde_json::from_str(json).map_err(|e| StorageError::Serialization(e.to_string()))?;

    let mut seen = HashSet::new();
    let mut elements = Vec::with_capacity(records.len());
    for record in &records {
        let element = record
            .to_element(line_thickness)
            .map_err(|e| StorageError::Serialization(format!("{}: {}", record.id, e)))?;
        if !seen.insert(element.id()) {
            log::warn!("Dropping duplicate element id {}", record.id);
            continue;
        }
        elements.push(element);
    }
    Ok(elements)
}
