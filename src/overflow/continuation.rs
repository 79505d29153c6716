//! Continuation slides: the derived title, the carried-over footer, and a
//! body made of everything that overflowed the previous slide.

use super::Body;
use crate::model::{Content, Element, Node, Section, Slide, SlideState, TextRole};

const CONTINUED: &str = "(continued";

/// Title for slides that have none.
pub const DEFAULT_BASE_TITLE: &str = "Content";

/// `text` with any trailing "(continued)" or "(continued N)" removed.
pub fn strip_continued(text: &str) -> &str {
    let trimmed = text.trim_end();
    let Some(open) = trimmed.rfind(CONTINUED) else {
        return trimmed;
    };
    let Some(inner) = trimmed[open + CONTINUED.len()..].strip_suffix(')') else {
        return trimmed;
    };
    let inner = inner.trim();
    if inner.is_empty() || inner.chars().all(|c| c.is_ascii_digit()) {
        trimmed[..open].trim_end()
    } else {
        trimmed
    }
}

/// "`text` (continued)", without stacking suffixes.
pub fn continued_label(text: &str) -> String {
    format!("{} (continued)", strip_continued(text))
}

/// Title of the `n`-th continuation (1-based) of a slide titled `base`.
pub fn continuation_title(base: Option<&str>, n: usize) -> String {
    let base = base
        .map(strip_continued)
        .filter(|b| !b.is_empty())
        .unwrap_or(DEFAULT_BASE_TITLE);
    match n {
        0 | 1 => format!("{} (continued)", base),
        n => format!("{} (continued {})", base, n),
    }
}

/// Build the `n`-th continuation of `original` around an overflowed body.
pub(crate) fn build(original: &Slide, body: Body, n: usize) -> Slide {
    let title_text = continuation_title(original.title_text(), n);
    let mut title = original
        .meta(TextRole::Title)
        .cloned()
        .unwrap_or_else(|| Element::text(TextRole::Title, ""));
    if let Content::Text(t) = &mut title.content {
        t.text = title_text;
        t.formatting.clear();
    }

    let mut elements = vec![title];
    elements.extend(original.meta(TextRole::Footer).cloned());

    let root_section = match body {
        Body::Tree(mut root) => {
            prepare_tree(&mut root);
            Some(root)
        }
        Body::Flat(flat) => {
            elements.extend(with_continuation_headings(flat));
            None
        }
    };
    for el in &mut elements {
        el.clear_geometry();
    }

    let id = original.continuation_of.as_ref().or(original.id.as_ref());
    Slide {
        id: id.map(|id| format!("{}-cont-{}", id, n)),
        elements,
        root_section,
        renderable_elements: Vec::new(),
        is_continuation: true,
        continuation_of: id.cloned(),
        state: SlideState::Unpositioned,
        degraded: false,
    }
}

/// Continuation sections are content-sized: fixed heights are dropped
/// along with all geometry, and split lists get their heading marker.
fn prepare_tree(section: &mut Section) {
    section.directives.remove("height");
    section.position = None;
    section.size = None;
    let children = std::mem::take(&mut section.children);
    for child in children {
        match child {
            Node::Section(mut s) => {
                prepare_tree(&mut s);
                section.children.push(Node::Section(s));
            }
            Node::Element(mut e) => {
                e.clear_geometry();
                if let Some(marker) = take_heading(&mut e) {
                    section.children.push(Node::Element(marker));
                }
                section.children.push(Node::Element(e));
            }
        }
    }
}

fn with_continuation_headings(elements: Vec<Element>) -> Vec<Element> {
    let mut out = Vec::with_capacity(elements.len() + 1);
    for mut el in elements {
        el.clear_geometry();
        if let Some(marker) = take_heading(&mut el) {
            out.push(marker);
        }
        out.push(el);
    }
    out
}

fn take_heading(el: &mut Element) -> Option<Element> {
    match &mut el.content {
        Content::List(list) => list
            .continuation_heading
            .take()
            .map(|h| Element::heading(h.level, h.text)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::directive::Directives;
    use crate::model::{Heading, ListContent, ListItem, Point, SectionKind, Size};

    #[test]
    fn test_strip_continued() {
        assert_eq!(strip_continued("Results (continued)"), "Results");
        assert_eq!(strip_continued("Results (continued 3)"), "Results");
        assert_eq!(strip_continued("Results"), "Results");
        assert_eq!(strip_continued("Results (continued work)"), "Results (continued work)");
    }

    #[test]
    fn test_continuation_titles() {
        assert_eq!(continuation_title(Some("Q3 Results"), 1), "Q3 Results (continued)");
        assert_eq!(continuation_title(Some("Q3 Results (continued)"), 2), "Q3 Results (continued 2)");
        assert_eq!(continuation_title(None, 1), "Content (continued)");
        assert_eq!(continued_label("Risks (continued)"), "Risks (continued)");
    }

    fn split_list() -> Element {
        Element::new(Content::List(ListContent {
            items: vec![ListItem::new("later item")],
            continuation_heading: Some(Heading {
                text: "Risks (continued)".into(),
                level: 2,
            }),
            ..Default::default()
        }))
    }

    #[test]
    fn test_build_flat_continuation() {
        let original = Slide {
            id: Some("s1".into()),
            elements: vec![
                Element::text(TextRole::Title, "Risks"),
                Element::text(TextRole::Subtitle, "Q3"),
                Element::text(TextRole::Footer, "Confidential"),
            ],
            ..Default::default()
        };
        let cont = build(&original, Body::Flat(vec![split_list()]), 1);
        assert!(cont.is_continuation);
        assert_eq!(cont.id.as_deref(), Some("s1-cont-1"));
        assert_eq!(cont.continuation_of.as_deref(), Some("s1"));
        assert_eq!(cont.title_text(), Some("Risks (continued)"));
        assert!(cont.meta(TextRole::Subtitle).is_none());
        assert!(cont.meta(TextRole::Footer).is_some());

        let body: Vec<&Element> = cont.body_elements().collect();
        assert_eq!(body.len(), 2);
        assert!(body[0].is_heading());
        assert_eq!(body[0].as_text().unwrap().text, "Risks (continued)");
        match &body[1].content {
            Content::List(l) => assert!(l.continuation_heading.is_none()),
            other => panic!("expected list, got {:?}", other),
        }
    }

    #[test]
    fn test_tree_continuation_drops_fixed_heights() {
        let mut inner = Section::new(SectionKind::Column, vec![Node::Element(split_list())])
            .with_directives(Directives::new().with("height", 100.0).with("width", "1/2"));
        inner.position = Some(Point { x: 50.0, y: 60.0 });
        inner.size = Some(Size { width: 310.0, height: 100.0 });
        let original = Slide {
            id: Some("s2".into()),
            ..Default::default()
        };
        let cont = build(
            &original,
            Body::Tree(Section::new(SectionKind::Section, vec![Node::Section(inner)])),
            2,
        );
        assert_eq!(cont.title_text(), Some("Content (continued 2)"));
        let root = cont.root_section.unwrap();
        let Node::Section(col) = &root.children[0] else {
            panic!("expected column");
        };
        assert!(col.directives.height().is_none());
        assert!(col.directives.width().is_some());
        assert!(col.rect().is_none());
        assert_eq!(col.children.len(), 2);
        assert!(col.children[0].as_element().unwrap().is_heading());
    }
}
