use serde::{Deserialize, Serialize};

use super::{Point, Rect, Size};
use crate::directive::Directives;
use crate::metrics::ContentMetrics;

/// A leaf of the slide tree: typed content plus directives and geometry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Element {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(flatten)]
    pub content: Content,
    #[serde(default, skip_serializing_if = "Directives::is_empty")]
    pub directives: Directives,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<Point>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<Size>,
    /// Measurement detail from the most recent layout pass. Splitting reads
    /// line and row boundaries from here; layout replaces it wholesale.
    #[serde(skip)]
    pub metrics: Option<ContentMetrics>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Content {
    Text(TextContent),
    Image(ImageContent),
    List(ListContent),
    Table(TableContent),
    Code(CodeContent),
}

/// Coarse element classification, used in logs and reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementType {
    Title,
    Subtitle,
    Body,
    Quote,
    Footer,
    Image,
    List,
    Table,
    Code,
}

impl Element {
    pub fn new(content: Content) -> Self {
        Self {
            id: None,
            content,
            directives: Directives::default(),
            position: None,
            size: None,
            metrics: None,
        }
    }

    pub fn text(role: TextRole, text: impl Into<String>) -> Self {
        Self::new(Content::Text(TextContent {
            role,
            text: text.into(),
            formatting: Vec::new(),
            heading_level: 0,
        }))
    }

    pub fn heading(level: u8, text: impl Into<String>) -> Self {
        Self::new(Content::Text(TextContent {
            role: TextRole::Body,
            text: text.into(),
            formatting: Vec::new(),
            heading_level: level,
        }))
    }

    pub fn with_directives(mut self, directives: Directives) -> Self {
        self.directives = directives;
        self
    }

    pub fn element_type(&self) -> ElementType {
        match &self.content {
            Content::Text(t) => match t.role {
                TextRole::Title => ElementType::Title,
                TextRole::Subtitle => ElementType::Subtitle,
                TextRole::Body => ElementType::Body,
                TextRole::Quote => ElementType::Quote,
                TextRole::Footer => ElementType::Footer,
            },
            Content::Image(_) => ElementType::Image,
            Content::List(_) => ElementType::List,
            Content::Table(_) => ElementType::Table,
            Content::Code(_) => ElementType::Code,
        }
    }

    pub fn as_text(&self) -> Option<&TextContent> {
        match &self.content {
            Content::Text(t) => Some(t),
            _ => None,
        }
    }

    pub fn text_role(&self) -> Option<TextRole> {
        self.as_text().map(|t| t.role)
    }

    /// Title, subtitle, and footer are positioned in their own zones.
    pub fn is_meta(&self) -> bool {
        matches!(
            self.text_role(),
            Some(TextRole::Title | TextRole::Subtitle | TextRole::Footer)
        )
    }

    pub fn is_heading(&self) -> bool {
        matches!(self.as_text(), Some(t) if t.role == TextRole::Body && t.heading_level > 0)
    }

    pub fn is_fill(&self) -> bool {
        self.directives.fill()
    }

    pub fn rect(&self) -> Option<Rect> {
        Rect::from_parts(self.position, self.size)
    }

    pub fn bottom(&self) -> f64 {
        self.rect().map(|r| r.bottom()).unwrap_or(0.0)
    }

    pub fn clear_geometry(&mut self) {
        self.position = None;
        self.size = None;
        self.metrics = None;
    }
}

// ─── Text ───────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextRole {
    Title,
    Subtitle,
    #[default]
    Body,
    Quote,
    Footer,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextContent {
    #[serde(default)]
    pub role: TextRole,
    pub text: String,
    /// Character-indexed spans, half-open.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub formatting: Vec<TextFormat>,
    /// 1-6 for body headings, 0 for plain prose.
    #[serde(default, skip_serializing_if = "is_zero")]
    pub heading_level: u8,
}

fn is_zero(v: &u8) -> bool {
    *v == 0
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextFormat {
    pub start: usize,
    pub end: usize,
    pub format: FormatKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FormatKind {
    Bold,
    Italic,
    Underline,
    Strikethrough,
    Code,
    Link,
    Color,
    Background,
}

// ─── Image ──────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageContent {
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aspect_ratio: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alt: Option<String>,
}

// ─── List ───────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListContent {
    #[serde(default)]
    pub ordered: bool,
    #[serde(default)]
    pub items: Vec<ListItem>,
    /// Heading immediately above this list, recorded during layout.
    #[serde(skip)]
    pub preceding_heading: Option<Heading>,
    /// Marker to place above this list when it opens a continuation slide.
    #[serde(skip)]
    pub continuation_heading: Option<Heading>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListItem {
    pub text: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub formatting: Vec<TextFormat>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<ListItem>,
}

impl ListItem {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            formatting: Vec::new(),
            children: Vec::new(),
        }
    }

    /// This item plus all of its descendants.
    pub fn count(&self) -> usize {
        1 + self.children.iter().map(ListItem::count).sum::<usize>()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Heading {
    pub text: String,
    pub level: u8,
}

// ─── Table ──────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableContent {
    #[serde(default)]
    pub headers: Vec<String>,
    #[serde(default)]
    pub rows: Vec<Vec<String>>,
    /// Per-row directives, index-aligned with `rows`. May be shorter.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub row_directives: Vec<Directives>,
}

impl TableContent {
    pub fn column_count(&self) -> usize {
        self.rows
            .iter()
            .map(Vec::len)
            .chain(std::iter::once(self.headers.len()))
            .max()
            .unwrap_or(0)
    }
}

// ─── Code ───────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CodeContent {
    pub code: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_element_json_shape() {
        let json = r#"{
            "type": "list",
            "ordered": true,
            "items": [{ "text": "one", "children": [{ "text": "one.a" }] }, { "text": "two" }],
            "directives": { "fontsize": 12 }
        }"#;
        let el: Element = serde_json::from_str(json).unwrap();
        assert_eq!(el.element_type(), ElementType::List);
        match &el.content {
            Content::List(list) => {
                assert!(list.ordered);
                assert_eq!(list.items.iter().map(ListItem::count).sum::<usize>(), 3);
            }
            other => panic!("expected list, got {:?}", other),
        }
        assert_eq!(el.directives.fontsize(), Some(12.0));
    }

    #[test]
    fn test_heading_detection() {
        assert!(Element::heading(2, "Agenda").is_heading());
        assert!(!Element::text(TextRole::Body, "Agenda").is_heading());
        assert!(!Element::text(TextRole::Title, "Agenda").is_heading());
    }

    #[test]
    fn test_table_column_count_uses_widest_row() {
        let table = TableContent {
            headers: vec!["a".into(), "b".into()],
            rows: vec![vec!["1".into(), "2".into(), "3".into()]],
            row_directives: vec![],
        };
        assert_eq!(table.column_count(), 3);
    }
}
