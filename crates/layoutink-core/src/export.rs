//! One-way export projections of a layout: the JSON record array and a
//! standalone HTML page.

use crate::elements::{Element, ElementKind};
use crate::storage::{ElementRecord, records_to_json};
use kurbo::Size;

/// Pretty-printed JSON array of element records, bottom-most first.
pub fn to_json(elements: &[Element]) -> Result<String, serde_json::Error> {
    records_to_json(elements, true)
}

fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

fn element_style(element: &Element, record: &ElementRecord) -> String {
    let mut style = format!(
        "position:absolute;left:{}px;top:{}px;width:{}px;height:{}px;box-sizing:border-box;",
        record.left, record.top, record.width, record.height
    );
    let mut push = |name: &str, value: &Option<String>| {
        if let Some(value) = value {
            style.push_str(&format!("{}:{};", name, value));
        }
    };
    push("background-color", &record.background_color);
    push("color", &record.color);
    push("border", &record.border);
    push("border-radius", &record.border_radius);
    push("font-size", &record.font_size);
    push("padding", &record.padding);

    if record.rotation != 0.0 {
        style.push_str(&format!("transform:rotate({}deg);", record.rotation));
    }
    if element.kind() == ElementKind::Line {
        style.push_str("transform-origin:0 50%;");
    }
    style
}

/// Standalone HTML document: a relative canvas container with one absolutely
/// positioned box per element, in z-order.
pub fn to_html(elements: &[Element], canvas: Size) -> String {
    let mut out = String::new();
    out.push_str("<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n<title>LayoutInk export</title>\n</head>\n<body>\n");
    out.push_str(&format!(
        "<div class=\"canvas\" style=\"position:relative;width:{}px;height:{}px;overflow:hidden;\">\n",
        canvas.width, canvas.height
    ));
    for element in elements {
        let record = ElementRecord::from_element(element);
        let text = element.content.as_deref().map(escape_html).unwrap_or_default();
        out.push_str(&format!(
            "  <div id=\"{}\" class=\"canvas-element {}\" style=\"{}\">{}</div>\n",
            escape_html(&record.id),
            element.kind(),
            escape_html(&element_style(element, &record)),
            text
        ));
    }
    out.push_str("</div>\n</body>\n</html>\n");
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::elements::ElementId;
    use crate::geometry::LINE_THICKNESS;
    use kurbo::Point;

    fn make(id: u64, kind: ElementKind) -> Element {
        Element::new(ElementId(id), kind, Point::new(60.0, 60.0), Size::new(120.0, 80.0), LINE_THICKNESS)
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(escape_html("<b>\"Tom & Jerry's\"</b>"), "&lt;b&gt;&quot;Tom &amp; Jerry&#39;s&quot;&lt;/b&gt;");
    }

    #[test]
    fn test_html_contains_each_element_in_order() {
        let mut text = make(2, ElementKind::Text);
        text.content = Some("<script>".to_string());
        let html = to_html(&[make(1, ElementKind::Rectangle), text], Size::new(800.0, 600.0));

        let rect_at = html.find("id=\"rectangle-1\"").unwrap();
        let text_at = html.find("id=\"text-2\"").unwrap();
        assert!(rect_at < text_at);
        assert!(html.contains("&lt;script&gt;</div>"));
        assert!(!html.contains("<script>"));
        assert!(html.contains("width:800px;height:600px"));
    }

    #[test]
    fn test_html_line_pivot_and_rotation() {
        let mut line = make(3, ElementKind::Line);
        line.rotation = 45.0;
        let html = to_html(&[line], Size::new(800.0, 600.0));
        assert!(html.contains("transform:rotate(45deg);transform-origin:0 50%;"));
        assert!(html.contains("background-color:#333333;"));
    }

    #[test]
    fn test_json_is_pretty_record_array() {
        let json = to_json(&[make(1, ElementKind::Circle)]).unwrap();
        assert!(json.starts_with("[\n"));
        assert!(json.contains("\"borderRadius\": \"50%\""));
    }
}
