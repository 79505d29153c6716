//! # Deck Model
//!
//! The input and output representation of slides. A slide body is either
//! a flat list of elements (zone-based layout) or a tree of sections whose
//! leaves are elements (section-based layout). Title, subtitle, and footer
//! always live in the flat `elements` inventory as meta-elements.
//!
//! Geometry fields are `None` on input. Layout fills them in; finalization
//! moves every leaf into `renderable_elements` and empties the tree.

mod element;

pub use element::*;

use serde::{Deserialize, Serialize};

use crate::config::EngineConfig;
use crate::directive::Directives;

/// A deck: the top-level JSON document the CLI and `paginate_deck` consume.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Deck {
    #[serde(default)]
    pub slides: Vec<Slide>,
    #[serde(default)]
    pub config: EngineConfig,
    /// Custom fonts to register before measuring anything.
    #[serde(default)]
    pub fonts: Vec<FontEntry>,
}

/// A custom font: family/weight/italic plus base64 (or data URI) bytes.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FontEntry {
    pub family: String,
    #[serde(default = "default_weight")]
    pub weight: u32,
    #[serde(default)]
    pub italic: bool,
    pub src: String,
}

fn default_weight() -> u32 {
    400
}

/// Lifecycle of a slide as it moves through the engine.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SlideState {
    #[default]
    Unpositioned,
    Positioned,
    Finalized,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Slide {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Meta-elements, plus the body for zone-based slides.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub elements: Vec<Element>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub root_section: Option<Section>,
    /// Authoritative output once the slide is finalized.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub renderable_elements: Vec<Element>,
    #[serde(default)]
    pub is_continuation: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub continuation_of: Option<String>,
    #[serde(default)]
    pub state: SlideState,
    /// Set when pagination gave up on fitting this slide's content.
    #[serde(default, skip_serializing_if = "is_false")]
    pub degraded: bool,
}

fn is_false(v: &bool) -> bool {
    !*v
}

impl Slide {
    /// The first meta-element with the given role.
    pub fn meta(&self, role: TextRole) -> Option<&Element> {
        self.elements
            .iter()
            .find(|e| e.text_role() == Some(role))
    }

    pub fn title_text(&self) -> Option<&str> {
        self.meta(TextRole::Title)
            .and_then(|e| e.as_text())
            .map(|t| t.text.as_str())
    }

    /// Non-meta elements of the flat inventory, in order.
    pub fn body_elements(&self) -> impl Iterator<Item = &Element> {
        self.elements.iter().filter(|e| !e.is_meta())
    }
}

/// Index path from the body root to a node: child indices of the root
/// section for section-based slides, or an index into `elements` for
/// zone-based slides.
pub type NodePath = Vec<usize>;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SectionKind {
    #[default]
    Section,
    Row,
    Column,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Section {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub kind: SectionKind,
    #[serde(default, skip_serializing_if = "Directives::is_empty")]
    pub directives: Directives,
    #[serde(default)]
    pub children: Vec<Node>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<Point>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<Size>,
}

impl Section {
    pub fn new(kind: SectionKind, children: Vec<Node>) -> Self {
        Self {
            id: None,
            kind,
            directives: Directives::default(),
            children,
            position: None,
            size: None,
        }
    }

    pub fn with_directives(mut self, directives: Directives) -> Self {
        self.directives = directives;
        self
    }

    pub fn is_row(&self) -> bool {
        self.kind == SectionKind::Row
    }

    /// An explicit height makes the section an authored hard clip.
    pub fn has_fixed_height(&self) -> bool {
        self.directives.height().is_some()
    }

    /// Whether a direct child element is marked to fill this section.
    pub fn holds_fill(&self) -> bool {
        self.children.iter().any(|c| match c {
            Node::Element(e) => e.is_fill(),
            Node::Section(_) => false,
        })
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
        for child in &mut self.children {
            child.clear_geometry();
        }
    }

    pub fn leaf_count(&self) -> usize {
        self.children
            .iter()
            .map(|c| match c {
                Node::Element(_) => 1,
                Node::Section(s) => s.leaf_count(),
            })
            .sum()
    }

    /// First leaf element in pre-order, with its path relative to `self`.
    pub fn first_leaf(&self) -> Option<(NodePath, &Element)> {
        for (i, child) in self.children.iter().enumerate() {
            match child {
                Node::Element(e) => return Some((vec![i], e)),
                Node::Section(s) => {
                    if let Some((mut path, e)) = s.first_leaf() {
                        path.insert(0, i);
                        return Some((path, e));
                    }
                }
            }
        }
        None
    }

    /// Resolve a path relative to this section.
    pub fn node_at(&self, path: &[usize]) -> Option<&Node> {
        let (first, rest) = path.split_first()?;
        let child = self.children.get(*first)?;
        if rest.is_empty() {
            return Some(child);
        }
        match child {
            Node::Section(s) => s.node_at(rest),
            Node::Element(_) => None,
        }
    }

    /// A copy with the same identity and directives but no children.
    pub fn shell(&self) -> Section {
        Section {
            id: self.id.clone(),
            kind: self.kind,
            directives: self.directives.clone(),
            children: Vec::new(),
            position: None,
            size: None,
        }
    }
}

/// A section child: either a nested section or a content element.
///
/// Sections are recognized by their `kind` field, elements by `type`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Node {
    Section(Section),
    Element(Element),
}

impl Node {
    pub fn clear_geometry(&mut self) {
        match self {
            Node::Section(s) => s.clear_geometry(),
            Node::Element(e) => e.clear_geometry(),
        }
    }

    pub fn rect(&self) -> Option<Rect> {
        match self {
            Node::Section(s) => s.rect(),
            Node::Element(e) => e.rect(),
        }
    }

    pub fn size(&self) -> Size {
        match self {
            Node::Section(s) => s.size,
            Node::Element(e) => e.size,
        }
        .unwrap_or_default()
    }

    pub fn directives(&self) -> &Directives {
        match self {
            Node::Section(s) => &s.directives,
            Node::Element(e) => &e.directives,
        }
    }

    pub fn as_element(&self) -> Option<&Element> {
        match self {
            Node::Element(e) => Some(e),
            Node::Section(_) => None,
        }
    }

    pub fn leaf_count(&self) -> usize {
        match self {
            Node::Element(_) => 1,
            Node::Section(s) => s.leaf_count(),
        }
    }
}

// ─── Geometry ───────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Edges {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

impl Edges {
    pub fn uniform(v: f64) -> Self {
        Self {
            top: v,
            right: v,
            bottom: v,
            left: v,
        }
    }

    pub fn horizontal(&self) -> f64 {
        self.left + self.right
    }

    pub fn vertical(&self) -> f64 {
        self.top + self.bottom
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn from_parts(position: Option<Point>, size: Option<Size>) -> Option<Rect> {
        let (p, s) = (position?, size?);
        Some(Rect {
            x: p.x,
            y: p.y,
            width: s.width,
            height: s.height,
        })
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_node_disambiguates_sections_and_elements() {
        let json = r#"{
            "kind": "row",
            "children": [
                { "type": "text", "text": "left" },
                { "kind": "column", "children": [{ "type": "image", "url": "https://x.test/a.png" }] }
            ]
        }"#;
        let section: Section = serde_json::from_str(json).unwrap();
        assert!(section.is_row());
        assert!(matches!(section.children[0], Node::Element(_)));
        assert!(matches!(section.children[1], Node::Section(_)));
        assert_eq!(section.leaf_count(), 2);
    }

    #[test]
    fn test_first_leaf_path() {
        let json = r#"{
            "kind": "section",
            "children": [
                { "kind": "row", "children": [] },
                { "kind": "column", "children": [{ "type": "text", "text": "deep" }] }
            ]
        }"#;
        let section: Section = serde_json::from_str(json).unwrap();
        let (path, leaf) = section.first_leaf().unwrap();
        assert_eq!(path, vec![1, 0]);
        assert_eq!(leaf.as_text().unwrap().text, "deep");
        assert!(section.node_at(&path).is_some());
    }

    #[test]
    fn test_slide_meta_lookup() {
        let json = r#"{
            "elements": [
                { "type": "text", "role": "title", "text": "Quarterly" },
                { "type": "text", "text": "Body copy" },
                { "type": "text", "role": "footer", "text": "Confidential" }
            ]
        }"#;
        let slide: Slide = serde_json::from_str(json).unwrap();
        assert_eq!(slide.title_text(), Some("Quarterly"));
        assert_eq!(slide.body_elements().count(), 1);
        assert_eq!(slide.state, SlideState::Unpositioned);
    }
}
