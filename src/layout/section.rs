//! Section-based layout: a recursive measure pass that sizes every node
//! bottom-up, then a place pass that assigns absolute positions top-down.
//!
//! Rows divide their content width among children via [`flex::row_widths`].
//! Sections and columns stack children vertically. A `height` directive is
//! a hard override: content is measured inside it and left to overflow
//! rather than stretching the box.

use super::{flex, is_related, link_related, measure_width, stack_gap, PositionCalculator};
use crate::metrics::ContentMetrics;
use crate::model::{Element, Node, Point, Rect, Section, Size};

pub(crate) struct SectionLayout<'c, 'a> {
    calc: &'c PositionCalculator<'a>,
}

impl<'c, 'a> SectionLayout<'c, 'a> {
    pub(crate) fn new(calc: &'c PositionCalculator<'a>) -> Self {
        Self { calc }
    }

    /// Size and position `root` and everything below it inside `body`.
    pub(crate) fn layout(&self, root: &mut Section, body: Rect) {
        propagate_directives(root);
        let width = root
            .directives
            .width()
            .map(|d| d.resolve(body.width).min(body.width))
            .unwrap_or(body.width);
        self.measure_section(root, width, body.height, body.height);
        let x = body.x + root.directives.align().unwrap_or_default().offset(body.width, width);
        self.place_section(root, x, body.y);
    }

    // ── Measure ─────────────────────────────────────────────────

    /// Measure `section` at `width`, returning its outer height.
    ///
    /// `available` resolves relative height directives; `remaining` is the
    /// vertical space left where the section starts, which a section
    /// holding a fill element grows into.
    fn measure_section(&self, section: &mut Section, width: f64, available: f64, remaining: f64) -> f64 {
        let inset = inset(section);
        let fixed = section.directives.height().map(|d| d.resolve(available));
        let content_width = (width - inset * 2.0).max(0.0);
        let inner = (fixed.unwrap_or(remaining) - inset * 2.0).max(0.0);

        let content_height = if section.is_row() {
            self.measure_row(section, content_width, inner)
        } else {
            self.measure_stack(section, content_width, inner)
        };

        let height = match fixed {
            Some(h) => h,
            None if section.holds_fill() => (content_height + inset * 2.0).max(remaining),
            None => content_height + inset * 2.0,
        };
        section.size = Some(Size { width, height });

        let box_height = (height - inset * 2.0).max(0.0);
        let slots = if section.is_row() {
            self.slot_widths(section, content_width)
        } else {
            vec![content_width; section.children.len()]
        };
        for (child, slot) in section.children.iter_mut().zip(slots) {
            if let Node::Element(el) = child {
                if el.is_fill() {
                    size_fill(el, slot, box_height);
                }
            }
        }
        height
    }

    fn measure_row(&self, section: &mut Section, content_width: f64, inner: f64) -> f64 {
        let widths = self.slot_widths(section, content_width);
        let mut tallest: f64 = 0.0;
        for (child, slot) in section.children.iter_mut().zip(widths) {
            let height = match child {
                Node::Element(el) if el.is_fill() => 0.0,
                Node::Element(el) => self.measure_in_slot(el, slot, inner),
                Node::Section(s) => self.measure_section(s, slot, inner, inner),
            };
            tallest = tallest.max(height);
        }
        tallest
    }

    fn measure_stack(&self, section: &mut Section, content_width: f64, inner: f64) -> f64 {
        let gap = section
            .directives
            .gap()
            .unwrap_or(self.calc.config.spacing.vertical);
        let mut consumed = 0.0;
        let mut prev: Option<usize> = None;

        for i in 0..section.children.len() {
            let (before, rest) = section.children.split_at_mut(i);
            let child = &mut rest[0];
            if matches!(child, Node::Element(el) if el.is_fill()) {
                continue;
            }
            let prev_el = prev.and_then(|p| before[p].as_element());
            let related = match child {
                Node::Element(el) => link_related(prev_el, el),
                Node::Section(_) => false,
            };
            if prev.is_some() {
                consumed += stack_gap(self.calc.config, gap, related);
            }

            let width = child_width(child, content_width);
            consumed += match child {
                Node::Element(el) => self.measure_element(el, width, inner),
                Node::Section(s) => {
                    let remaining = (inner - consumed).max(0.0);
                    self.measure_section(s, width, inner, remaining)
                }
            };
            prev = Some(i);
        }
        consumed
    }

    fn measure_element(&self, el: &mut Element, width: f64, available_height: f64) -> f64 {
        let m = self.calc.measurer.measure(el, measure_width(el, width), available_height);
        el.size = Some(m.size);
        el.metrics = Some(m.metrics);
        m.size.height
    }

    /// A row child's width directive already chose its slot, so it is
    /// measured at the slot width as-is.
    fn measure_in_slot(&self, el: &mut Element, slot: f64, available_height: f64) -> f64 {
        let requested = el.directives.remove("width");
        let height = self.measure_element(el, slot, available_height);
        if let Some(value) = requested {
            el.directives.insert("width", value);
        }
        height
    }

    fn slot_widths(&self, row: &Section, content_width: f64) -> Vec<f64> {
        let requests: Vec<Option<f64>> = row
            .children
            .iter()
            .map(|c| c.directives().width().map(|d| d.resolve(content_width)))
            .collect();
        flex::row_widths(&requests, content_width, self.row_gap(row))
    }

    fn row_gap(&self, row: &Section) -> f64 {
        row.directives
            .gap()
            .unwrap_or(self.calc.config.spacing.horizontal)
    }

    // ── Place ───────────────────────────────────────────────────

    fn place_section(&self, section: &mut Section, x: f64, y: f64) {
        section.position = Some(Point { x, y });
        let size = section.size.unwrap_or_default();
        let inset = inset(section);
        let origin = Point {
            x: x + inset,
            y: y + inset,
        };
        let content = Size {
            width: (size.width - inset * 2.0).max(0.0),
            height: (size.height - inset * 2.0).max(0.0),
        };
        if section.is_row() {
            self.place_row(section, origin, content);
        } else {
            self.place_stack(section, origin, content);
        }
    }

    fn place_row(&self, section: &mut Section, origin: Point, content: Size) {
        let widths = self.slot_widths(section, content.width);
        let gap = self.row_gap(section);
        let valign = section.directives.valign().unwrap_or_default();
        let mut cursor = origin.x;

        for (child, slot) in section.children.iter_mut().zip(widths) {
            match child {
                Node::Element(el) if el.is_fill() => {
                    el.position = Some(Point { x: cursor, y: origin.y });
                }
                Node::Element(el) => {
                    let s = el.size.unwrap_or_default();
                    let dx = el.directives.align().unwrap_or_default().offset(slot, s.width);
                    let dy = valign.offset(content.height, s.height);
                    el.position = Some(Point {
                        x: cursor + dx,
                        y: origin.y + dy,
                    });
                }
                Node::Section(s) => {
                    let dy = valign.offset(content.height, s.size.unwrap_or_default().height);
                    self.place_section(s, cursor, origin.y + dy);
                }
            }
            cursor += slot + gap;
        }
    }

    fn place_stack(&self, section: &mut Section, origin: Point, content: Size) {
        let gap = section
            .directives
            .gap()
            .unwrap_or(self.calc.config.spacing.vertical);

        // Offsets are recomputed from the measured sizes so the valign shift
        // can be applied before anything is placed.
        let mut offsets = vec![0.0; section.children.len()];
        let mut cursor = 0.0;
        let mut prev: Option<usize> = None;
        for (i, child) in section.children.iter().enumerate() {
            if matches!(child, Node::Element(el) if el.is_fill()) {
                continue;
            }
            if let Some(p) = prev {
                let related = match child {
                    Node::Element(el) => is_related(section.children[p].as_element(), el),
                    Node::Section(_) => false,
                };
                cursor += stack_gap(self.calc.config, gap, related);
            }
            offsets[i] = cursor;
            cursor += child.size().height;
            prev = Some(i);
        }
        let shift = section
            .directives
            .valign()
            .unwrap_or_default()
            .offset(content.height, cursor);

        for (child, offset) in section.children.iter_mut().zip(offsets) {
            let y = origin.y + shift + offset;
            match child {
                Node::Element(el) if el.is_fill() => {
                    el.position = Some(origin);
                }
                Node::Element(el) => {
                    let w = el.size.unwrap_or_default().width;
                    let dx = el.directives.align().unwrap_or_default().offset(content.width, w);
                    el.position = Some(Point { x: origin.x + dx, y });
                }
                Node::Section(s) => {
                    let w = s.size.unwrap_or_default().width;
                    let dx = s.directives.align().unwrap_or_default().offset(content.width, w);
                    self.place_section(s, origin.x + dx, y);
                }
            }
        }
    }
}

/// Padding plus border width, applied on every side.
fn inset(section: &Section) -> f64 {
    section.directives.padding().unwrap_or(0.0) + section.directives.border_width()
}

fn child_width(child: &Node, content_width: f64) -> f64 {
    match child {
        Node::Section(s) => s
            .directives
            .width()
            .map(|d| d.resolve(content_width).min(content_width))
            .unwrap_or(content_width),
        Node::Element(_) => content_width,
    }
}

fn size_fill(el: &mut Element, width: f64, height: f64) {
    el.size = Some(Size { width, height });
    el.metrics = Some(ContentMetrics::Atomic);
}

/// Push inheritable directives from each section down to its children.
fn propagate_directives(section: &mut Section) {
    let parent = section.directives.clone();
    for child in &mut section.children {
        match child {
            Node::Element(e) => e.directives.inherit_from(&parent),
            Node::Section(s) => {
                s.directives.inherit_from(&parent);
                propagate_directives(s);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EngineConfig;
    use crate::directive::Directives;
    use crate::font::FontContext;
    use crate::metrics::{AspectRatioCache, Measurer};
    use crate::model::{Content, ImageContent, ListContent, ListItem, SectionKind, Slide, TextRole};

    fn layout(slide: &Slide, config: &EngineConfig) -> Slide {
        let fonts = FontContext::new();
        let cache = AspectRatioCache::new();
        PositionCalculator::new(Measurer::new(&fonts, &cache, config))
            .layout(slide)
            .unwrap()
    }

    fn list(n: usize) -> Element {
        Element::new(Content::List(ListContent {
            items: (0..n).map(|i| ListItem::new(format!("Point number {}", i))).collect(),
            ..Default::default()
        }))
    }

    fn image(ratio: f64) -> Element {
        Element::new(Content::Image(ImageContent {
            url: "https://example.com/photo.png".into(),
            aspect_ratio: Some(ratio),
            alt: None,
        }))
    }

    fn column(width: &str, children: Vec<Node>) -> Node {
        Node::Section(
            Section::new(SectionKind::Column, children).with_directives(Directives::new().with("width", width)),
        )
    }

    fn root(children: Vec<Node>) -> Section {
        Section::new(SectionKind::Section, children)
    }

    fn wide_config() -> EngineConfig {
        let mut config = EngineConfig::default();
        config.canvas.width = 820.0;
        config
    }

    #[test]
    fn test_fixed_height_is_hard_clip() {
        let config = EngineConfig::default();
        let clipped = Section::new(SectionKind::Section, vec![Node::Element(list(8))])
            .with_directives(Directives::new().with("height", 100.0));
        let slide = Slide {
            root_section: Some(root(vec![Node::Section(clipped)])),
            ..Default::default()
        };
        let out = layout(&slide, &config);
        let tree = out.root_section.as_ref().unwrap();
        let Some(Node::Section(s)) = tree.children.first() else {
            panic!("expected section");
        };
        assert_eq!(s.size.unwrap().height, 100.0);
        let inner = s.children[0].as_element().unwrap();
        assert!(inner.size.unwrap().height > 100.0);
        assert!(inner.bottom() > s.bottom());
    }

    #[test]
    fn test_equal_thirds() {
        let config = wide_config();
        let row = Section::new(
            SectionKind::Row,
            vec![
                column("1/3", vec![Node::Element(Element::text(TextRole::Body, "a"))]),
                column("1/3", vec![Node::Element(Element::text(TextRole::Body, "b"))]),
                column("1/3", vec![Node::Element(Element::text(TextRole::Body, "c"))]),
            ],
        );
        let slide = Slide {
            root_section: Some(root(vec![Node::Section(row)])),
            ..Default::default()
        };
        let out = layout(&slide, &config);
        let Some(Node::Section(row)) = out.root_section.as_ref().unwrap().children.first() else {
            panic!("expected row");
        };
        let mut x = 50.0;
        for child in &row.children {
            let r = child.rect().unwrap();
            assert!((r.width - 240.0).abs() < 1.0);
            assert!((r.x - x).abs() < 1.0);
            x += r.width;
        }
    }

    #[test]
    fn test_row_height_is_tallest_child() {
        let config = EngineConfig::default();
        let row = Section::new(
            SectionKind::Row,
            vec![
                column("1/2", vec![Node::Element(list(6))]),
                column("1/2", vec![Node::Element(Element::text(TextRole::Body, "short"))]),
            ],
        );
        let slide = Slide {
            root_section: Some(root(vec![Node::Section(row)])),
            ..Default::default()
        };
        let out = layout(&slide, &config);
        let Some(Node::Section(row)) = out.root_section.as_ref().unwrap().children.first() else {
            panic!("expected row");
        };
        let tallest = row.children.iter().map(|c| c.size().height).fold(0.0, f64::max);
        assert_eq!(row.size.unwrap().height, tallest);
    }

    #[test]
    fn test_fill_image_takes_column_box() {
        let config = EngineConfig::default();
        let mut fill = image(1.0);
        fill.directives = Directives::new().with("fill", true);
        let row = Section::new(
            SectionKind::Row,
            vec![
                column("2/3", vec![Node::Element(list(3))]),
                column("1/3", vec![Node::Element(fill)]),
            ],
        );
        let slide = Slide {
            root_section: Some(root(vec![Node::Section(row)])),
            ..Default::default()
        };
        let out = layout(&slide, &config);
        let tree = out.root_section.as_ref().unwrap();
        let Some(Node::Section(row)) = tree.children.first() else {
            panic!("expected row");
        };
        let Node::Section(side) = &row.children[1] else {
            panic!("expected column");
        };
        let img = side.children[0].as_element().unwrap().rect().unwrap();
        let col = side.rect().unwrap();
        assert_eq!(img, col);
        assert!((col.height - 305.0).abs() < 1e-9);
    }

    #[test]
    fn test_padding_and_alignment_inherit() {
        let config = EngineConfig::default();
        let mut el = image(2.0);
        el.directives = Directives::new().with("width", 100.0);
        let boxed = Section::new(SectionKind::Column, vec![Node::Element(el)])
            .with_directives(Directives::new().with("padding", 12.0).with("align", "center"));
        let slide = Slide {
            root_section: Some(root(vec![Node::Section(boxed)])),
            ..Default::default()
        };
        let out = layout(&slide, &config);
        let Some(Node::Section(boxed)) = out.root_section.as_ref().unwrap().children.first() else {
            panic!("expected column");
        };
        let r = boxed.children[0].rect().unwrap();
        assert_eq!(r.width, 100.0);
        assert_eq!(r.y, 50.0 + 12.0);
        let content_width = 620.0 - 24.0;
        assert!((r.x - (50.0 + 12.0 + (content_width - 100.0) / 2.0)).abs() < 1e-9);
        assert_eq!(boxed.size.unwrap().height, 50.0 + 24.0);
    }

    #[test]
    fn test_layout_is_idempotent() {
        let config = EngineConfig::default();
        let slide = Slide {
            root_section: Some(root(vec![
                Node::Element(Element::heading(2, "Agenda")),
                Node::Element(list(4)),
            ])),
            ..Default::default()
        };
        let once = layout(&slide, &config);
        let twice = layout(&once, &config);
        assert_eq!(once, twice);
    }
}
