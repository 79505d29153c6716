//! # Position Calculator
//!
//! Turns an Unpositioned slide into a Positioned one: every element gets a
//! measured size and an absolute position. Two modes, chosen by the slide:
//!
//! - **Zone-based** ([`zone`]): a flat list of body elements stacked top
//!   to bottom at full body width.
//! - **Section-based** ([`section`]): a recursive tree of sections, rows
//!   and columns dividing the body proportionally.
//!
//! Both modes share header/footer placement. Layout never fails on content:
//! it fails only when the slide's structure is unusable. Content taller
//! than the body is positioned anyway; the overflow manager deals with it.

pub mod flex;
pub mod section;
pub mod zone;

use std::collections::HashMap;

use crate::config::EngineConfig;
use crate::error::DeckError;
use crate::image_loader;
use crate::metrics::Measurer;
use crate::model::{Content, Element, Heading, Node, Section, Slide, SlideState, TextRole};

pub use zone::body_zone;

pub struct PositionCalculator<'a> {
    pub(crate) measurer: Measurer<'a>,
    pub(crate) config: &'a EngineConfig,
}

impl<'a> PositionCalculator<'a> {
    pub fn new(measurer: Measurer<'a>) -> Self {
        let config = measurer.config;
        Self { measurer, config }
    }

    /// Position every node of `slide`, returning a new Positioned slide.
    ///
    /// Existing geometry on the input is discarded, so laying out an
    /// already Positioned slide re-measures from scratch.
    pub fn layout(&self, slide: &Slide) -> Result<Slide, DeckError> {
        self.config.canvas.validate()?;
        validate_structure(slide)?;

        let mut out = slide.clone();
        for el in &mut out.elements {
            el.clear_geometry();
        }
        if let Some(root) = out.root_section.as_mut() {
            root.clear_geometry();
        }
        self.repair_content(&mut out);

        zone::place_header(self, &mut out.elements);
        zone::place_footer(self, &mut out.elements);
        let body = zone::body_zone(&out, self.config);

        match out.root_section.as_mut() {
            Some(root) => section::SectionLayout::new(self).layout(root, body),
            None => zone::layout_body(self, &mut out.elements, body),
        }

        out.state = SlideState::Positioned;
        log::debug!(
            "positioned slide {:?}: body {:.1}x{:.1} at y={:.1}",
            out.id,
            body.width,
            body.height,
            body.y
        );
        Ok(out)
    }

    /// Swap unusable image sources for placeholders and report directive
    /// problems. Nothing here can fail.
    fn repair_content(&self, slide: &mut Slide) {
        let area = self.config.canvas.content_area();
        let ratio = self.config.default_aspect_ratio;
        let mut repair = |el: &mut Element| {
            for problem in el.directives.problems() {
                log::warn!("{:?} element: {}", el.element_type(), problem);
            }
            if let Content::Image(img) = &mut el.content {
                if !image_loader::is_valid_image_url(&img.url) {
                    log::warn!("invalid image url {:?}, substituting placeholder", img.url);
                    let (w, h) = (area.width, area.width / ratio);
                    img.url = image_loader::placeholder_url(w, h, "Image not found");
                    img.aspect_ratio.get_or_insert(w / h);
                }
            }
        };
        for el in &mut slide.elements {
            repair(el);
        }
        if let Some(root) = slide.root_section.as_mut() {
            visit_elements_mut(root, &mut repair);
        }
    }
}

fn visit_elements_mut(section: &mut Section, f: &mut impl FnMut(&mut Element)) {
    for problem in section.directives.problems() {
        log::warn!("{:?} section: {}", section.kind, problem);
    }
    for child in &mut section.children {
        match child {
            Node::Element(e) => f(e),
            Node::Section(s) => visit_elements_mut(s, f),
        }
    }
}

fn validate_structure(slide: &Slide) -> Result<(), DeckError> {
    if slide.state == SlideState::Finalized {
        return Err(DeckError::structural(format!(
            "slide {:?} is already finalized",
            slide.id
        )));
    }

    let mut meta_counts: HashMap<TextRole, usize> = HashMap::new();
    for el in slide.elements.iter().filter(|e| e.is_meta()) {
        if let Some(role) = el.text_role() {
            *meta_counts.entry(role).or_default() += 1;
        }
    }
    for role in [TextRole::Title, TextRole::Subtitle, TextRole::Footer] {
        if meta_counts.get(&role).copied().unwrap_or(0) > 1 {
            return Err(DeckError::structural(format!(
                "slide {:?} has more than one {:?} element",
                slide.id, role
            )));
        }
    }

    if let Some(root) = &slide.root_section {
        if slide.body_elements().next().is_some() {
            return Err(DeckError::structural(format!(
                "slide {:?} has both a section tree and flat body elements",
                slide.id
            )));
        }
        validate_section(root)?;
    }
    Ok(())
}

fn validate_section(section: &Section) -> Result<(), DeckError> {
    if section.is_row() && section.children.is_empty() {
        return Err(DeckError::structural(format!(
            "row section {:?} has no children",
            section.id
        )));
    }
    for child in &section.children {
        match child {
            Node::Section(s) => validate_section(s)?,
            Node::Element(e) if e.is_meta() => {
                return Err(DeckError::structural(format!(
                    "{:?} element inside a section; meta-elements belong in the slide's element list",
                    e.element_type()
                )));
            }
            Node::Element(_) => {}
        }
    }
    Ok(())
}

/// Width an element is measured at inside a slot of `outer` points.
/// Images resolve their own width directive against the slot, since it
/// interacts with their height constraint.
pub(crate) fn measure_width(el: &Element, outer: f64) -> f64 {
    if matches!(el.content, Content::Image(_)) {
        return outer;
    }
    el.directives
        .width()
        .map(|d| d.resolve(outer).min(outer))
        .unwrap_or(outer)
}

/// A heading immediately followed by a list or table is spaced tighter.
pub(crate) fn is_related(prev: Option<&Element>, next: &Element) -> bool {
    prev.is_some_and(Element::is_heading)
        && matches!(next.content, Content::List(_) | Content::Table(_))
}

/// Record on a list the heading it belongs to, so a split can repeat it.
pub(crate) fn link_related(prev: Option<&Element>, next: &mut Element) -> bool {
    let related = is_related(prev, next);
    if let Content::List(list) = &mut next.content {
        list.preceding_heading = prev
            .filter(|_| related)
            .and_then(Element::as_text)
            .map(|t| Heading {
                text: t.text.clone(),
                level: t.heading_level,
            });
    }
    related
}

/// Vertical gap before an element, given whether it is related to the
/// element above it.
pub(crate) fn stack_gap(config: &EngineConfig, gap: f64, related: bool) -> f64 {
    if related {
        gap * config.spacing.related_reduction
    } else {
        gap
    }
}
