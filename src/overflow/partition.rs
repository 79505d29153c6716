//! Dividing a positioned body at the boundary into the part that stays on
//! the current slide and the part that continues on the next.
//!
//! Stacks are cut once: after the first child that spills, every later
//! sibling moves on whole. Rows are cut per child, so each column keeps
//! what fits and continues with the rest. Column structure is preserved
//! on both sides with empty shells, and fill containers beside an
//! overflowing column are duplicated whole.

use super::detector::OVERFLOW_TOLERANCE;
use super::split::{is_atomic, min_unit_height, split_element, Halves};
use crate::model::{Element, Node, Section};

pub(crate) struct Partitioner {
    boundary: f64,
    /// Place at least one unit of the first element that does not fit.
    force_progress: bool,
    forced: bool,
    /// Set when an atomic element was placed whole past the boundary.
    pub(crate) degraded: bool,
}

impl Partitioner {
    pub(crate) fn new(boundary: f64, force_progress: bool) -> Self {
        Self {
            boundary,
            force_progress,
            forced: false,
            degraded: false,
        }
    }

    /// Partition a flat element list. Meta-elements always stay.
    pub(crate) fn elements(&mut self, elements: &[Element]) -> (Vec<Element>, Vec<Element>) {
        let mut fitted = Vec::new();
        let mut overflow = Vec::new();
        let mut spilled = false;
        for el in elements {
            if el.is_meta() {
                fitted.push(el.clone());
            } else if spilled {
                overflow.push(el.clone());
            } else {
                let (f, o) = self.element(el);
                fitted.extend(f);
                if let Some(o) = o {
                    overflow.push(o);
                    spilled = true;
                }
            }
        }
        (fitted, overflow)
    }

    pub(crate) fn section(&mut self, section: &Section) -> (Option<Section>, Option<Section>) {
        if section.bottom() <= self.boundary + OVERFLOW_TOLERANCE {
            return (Some(section.clone()), None);
        }
        if section.is_row() {
            return self.row(section);
        }

        let mut fitted = section.shell();
        let mut overflow = section.shell();
        let mut spilled = false;
        for child in &section.children {
            if is_fill(child) {
                fitted.children.push(child.clone());
                overflow.children.push(child.clone());
            } else if spilled {
                overflow.children.push(child.clone());
            } else {
                let (f, o) = self.node(child);
                fitted.children.extend(f);
                if let Some(o) = o {
                    overflow.children.push(o);
                    spilled = true;
                }
            }
        }
        let fitted = (!fitted.children.is_empty()).then_some(fitted);
        (fitted, spilled.then_some(overflow))
    }

    fn row(&mut self, row: &Section) -> (Option<Section>, Option<Section>) {
        let parts: Vec<(Option<Node>, Option<Node>)> = row
            .children
            .iter()
            .map(|c| {
                if is_fill(c) {
                    (Some(c.clone()), None)
                } else {
                    self.node(c)
                }
            })
            .collect();
        if parts.iter().all(|(_, o)| o.is_none()) {
            return (Some(row.clone()), None);
        }

        // Nothing of substance stays: the row moves on whole rather than
        // leaving an empty row behind.
        let kept = parts.iter().any(|(f, _)| match f {
            Some(Node::Element(e)) => !e.is_fill(),
            Some(Node::Section(s)) => content_leaves(s) > 0,
            None => false,
        });
        if !kept {
            return (None, Some(row.clone()));
        }

        let mut fitted = row.shell();
        let mut overflow = row.shell();
        for (child, (f, o)) in row.children.iter().zip(parts) {
            match (f, child) {
                (Some(n), _) => fitted.children.push(n),
                (None, Node::Section(s)) => fitted.children.push(Node::Section(s.shell())),
                (None, Node::Element(_)) => {}
            }
            match (o, child) {
                (Some(n), _) => overflow.children.push(n),
                (None, Node::Section(s)) if s.holds_fill() => overflow.children.push(child.clone()),
                (None, Node::Section(s)) => overflow.children.push(Node::Section(s.shell())),
                (None, Node::Element(e)) if e.is_fill() => overflow.children.push(child.clone()),
                (None, Node::Element(_)) => {}
            }
        }
        (Some(fitted), Some(overflow))
    }

    fn node(&mut self, node: &Node) -> (Option<Node>, Option<Node>) {
        match node {
            Node::Element(e) => {
                let (f, o) = self.element(e);
                (f.map(Node::Element), o.map(Node::Element))
            }
            Node::Section(s) => {
                let (f, o) = self.section(s);
                (f.map(Node::Section), o.map(Node::Section))
            }
        }
    }

    fn element(&mut self, el: &Element) -> Halves {
        let Some(rect) = el.rect() else {
            return (Some(el.clone()), None);
        };
        if rect.bottom() <= self.boundary + OVERFLOW_TOLERANCE {
            return (Some(el.clone()), None);
        }
        let budget = self.boundary - rect.y;
        if self.force_progress && !self.forced {
            self.forced = true;
            return self.force(el, budget);
        }
        if budget <= OVERFLOW_TOLERANCE {
            return (None, Some(el.clone()));
        }
        split_element(el, budget)
    }

    /// Place something of `el` no matter what: one unit of splittable
    /// content, or the whole element if it is atomic.
    fn force(&mut self, el: &Element, budget: f64) -> Halves {
        let halves = min_unit_height(el).map(|unit| split_element(el, budget.max(unit)));
        match halves {
            Some((Some(fitted), overflow)) => {
                log::debug!("forced a {:?} fragment onto a slide with no room", el.element_type());
                (Some(fitted), overflow)
            }
            _ => {
                log::warn!(
                    "{:?} element ({}) cannot be reduced further; placing it whole",
                    el.element_type(),
                    if is_atomic(el) { "atomic" } else { "single unit" }
                );
                self.degraded = true;
                (Some(el.clone()), None)
            }
        }
    }
}

fn is_fill(node: &Node) -> bool {
    matches!(node, Node::Element(e) if e.is_fill())
}

/// Leaves that carry content, not counting fill elements, which are
/// duplicated rather than consumed.
pub(crate) fn content_leaves(section: &Section) -> usize {
    section
        .children
        .iter()
        .map(|c| match c {
            Node::Element(e) if e.is_fill() => 0,
            Node::Element(_) => 1,
            Node::Section(s) => content_leaves(s),
        })
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EngineConfig;
    use crate::directive::Directives;
    use crate::font::FontContext;
    use crate::layout::{body_zone, PositionCalculator};
    use crate::metrics::{AspectRatioCache, Measurer};
    use crate::model::{Content, ImageContent, ListContent, ListItem, SectionKind, Slide, TextRole};

    fn positioned(slide: &Slide) -> (Slide, f64) {
        let fonts = FontContext::new();
        let cache = AspectRatioCache::new();
        let config = EngineConfig::default();
        let out = PositionCalculator::new(Measurer::new(&fonts, &cache, &config))
            .layout(slide)
            .unwrap();
        let boundary = body_zone(&out, &config).bottom();
        (out, boundary)
    }

    fn list(n: usize) -> Element {
        Element::new(Content::List(ListContent {
            items: (0..n).map(|i| ListItem::new(format!("Item {}", i))).collect(),
            ..Default::default()
        }))
    }

    fn items(el: &Element) -> usize {
        match &el.content {
            Content::List(l) => l.items.len(),
            _ => 0,
        }
    }

    fn column(width: &str, children: Vec<Node>) -> Node {
        Node::Section(Section::new(SectionKind::Column, children).with_directives(Directives::new().with("width", width)))
    }

    #[test]
    fn test_flat_partition_splits_then_spills() {
        let slide = Slide {
            elements: vec![
                Element::text(TextRole::Title, "Title"),
                list(30),
                Element::text(TextRole::Body, "after"),
            ],
            ..Default::default()
        };
        let (slide, boundary) = positioned(&slide);
        let (fitted, overflow) = Partitioner::new(boundary, false).elements(&slide.elements);
        assert_eq!(fitted.len(), 2);
        assert!(fitted[0].is_meta());
        assert_eq!(overflow.len(), 2);
        assert_eq!(items(&fitted[1]) + items(&overflow[0]), 30);
        assert_eq!(overflow[1].as_text().unwrap().text, "after");
    }

    #[test]
    fn test_row_keeps_columns_and_duplicates_fill_sibling() {
        let fill = Element::new(Content::Image(ImageContent {
            url: "https://example.com/side.png".into(),
            aspect_ratio: Some(0.75),
            alt: None,
        }))
        .with_directives(Directives::new().with("fill", true));
        let row = Section::new(
            SectionKind::Row,
            vec![column("2/3", vec![Node::Element(list(30))]), column("1/3", vec![Node::Element(fill)])],
        );
        let slide = Slide {
            root_section: Some(Section::new(SectionKind::Section, vec![Node::Section(row)])),
            ..Default::default()
        };
        let (slide, boundary) = positioned(&slide);
        let root = slide.root_section.as_ref().unwrap();
        let (fitted, overflow) = Partitioner::new(boundary, false).section(root);
        let (fitted, overflow) = (fitted.unwrap(), overflow.unwrap());

        let Node::Section(over_row) = &overflow.children[0] else {
            panic!("expected row");
        };
        assert_eq!(over_row.children.len(), 2);
        let Node::Section(side) = &over_row.children[1] else {
            panic!("expected column");
        };
        assert!(side.holds_fill());
        assert_eq!(content_leaves(&fitted), 1);
        assert_eq!(content_leaves(&overflow), 1);
        assert_eq!(fitted.leaf_count() + overflow.leaf_count(), 4);
    }

    #[test]
    fn test_row_below_boundary_moves_whole() {
        let row = Section::new(
            SectionKind::Row,
            vec![
                Node::Element(Element::text(TextRole::Body, "left cell")),
                Node::Element(Element::text(TextRole::Body, "right cell")),
            ],
        );
        let slide = Slide {
            root_section: Some(Section::new(
                SectionKind::Section,
                vec![Node::Element(Element::text(TextRole::Body, "top")), Node::Section(row)],
            )),
            ..Default::default()
        };
        let (slide, _) = positioned(&slide);
        let root = slide.root_section.as_ref().unwrap();
        let Node::Section(placed_row) = &root.children[1] else {
            panic!("expected row");
        };
        // Boundary between the first element and the row.
        let boundary = placed_row.rect().unwrap().y - 1.0;
        let (fitted, overflow) = Partitioner::new(boundary, false).section(root);
        let fitted = fitted.unwrap();
        assert_eq!(fitted.children.len(), 1);
        assert!(fitted.children[0].as_element().is_some());
        let overflow = overflow.unwrap();
        let Node::Section(moved) = &overflow.children[0] else {
            panic!("expected row");
        };
        assert!(moved.is_row());
        assert_eq!(moved.children.len(), 2);
    }

    #[test]
    fn test_list_under_its_floor_moves_on() {
        let slide = Slide {
            elements: vec![list(3)],
            ..Default::default()
        };
        let (slide, _) = positioned(&slide);
        let top = slide.elements[0].rect().unwrap().y;
        // Room for one item and the padding, but not the list's minimum.
        let (fitted, overflow) = Partitioner::new(top + 29.0, false).elements(&slide.elements);
        assert!(fitted.is_empty());
        assert_eq!(items(&overflow[0]), 3);
    }

    #[test]
    fn test_force_progress_places_one_unit() {
        let slide = Slide {
            elements: vec![list(40)],
            ..Default::default()
        };
        let (mut slide, _) = positioned(&slide);
        // Pretend the boundary sits just below the list's top edge.
        let top = slide.elements[0].rect().unwrap().y;
        let (fitted, _) = Partitioner::new(top + 5.0, false).elements(&slide.elements);
        assert!(fitted.is_empty());

        let mut p = Partitioner::new(top + 5.0, true);
        let (fitted, overflow) = p.elements(&slide.elements);
        assert_eq!(items(&fitted[0]), 1);
        assert_eq!(items(&overflow[0]), 39);
        assert!(!p.degraded);

        slide.elements[0] = Element::new(Content::Code(crate::model::CodeContent {
            code: "x\n".repeat(50),
            language: None,
        }));
        let (slide, _) = positioned(&slide);
        let mut p = Partitioner::new(top + 5.0, true);
        let (fitted, overflow) = p.elements(&slide.elements);
        assert_eq!(fitted.len(), 1);
        assert!(overflow.is_empty());
        assert!(p.degraded);
    }
}
