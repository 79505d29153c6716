//! # Overflow Detection
//!
//! Finds the first element, in pre-order, whose bottom edge crosses the
//! body boundary of a positioned slide.
//!
//! A section with a `height` directive is opaque. If its box fits, its
//! interior is never inspected; content clipped inside it is the author's
//! choice. If the box itself crosses the boundary, the first leaf inside
//! it is reported. Sections without a height are transparent.

use crate::model::{Element, Node, NodePath, Rect, Section, Slide};

/// Slack for floating-point error when comparing bottoms to the boundary.
pub const OVERFLOW_TOLERANCE: f64 = 0.01;

#[derive(Debug, Clone, PartialEq)]
pub struct OverflowReport<'a> {
    pub element: &'a Element,
    /// Child indices from the root section, or the index into the slide's
    /// `elements` for zone-based slides.
    pub path: NodePath,
    pub bottom: f64,
    /// How far the element runs past the boundary, or past the clip of the
    /// opaque section that contains it.
    pub overflow: f64,
}

#[derive(Debug, Clone, Copy)]
pub struct OverflowDetector {
    pub tolerance: f64,
}

impl Default for OverflowDetector {
    fn default() -> Self {
        Self {
            tolerance: OVERFLOW_TOLERANCE,
        }
    }
}

impl OverflowDetector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn find_first_overflow<'a>(&self, slide: &'a Slide, body: Rect) -> Option<OverflowReport<'a>> {
        let boundary = body.bottom();
        match &slide.root_section {
            Some(root) => self.check_section(root, Vec::new(), boundary),
            None => slide
                .elements
                .iter()
                .enumerate()
                .filter(|(_, e)| !e.is_meta())
                .find(|(_, e)| self.crosses(e.bottom(), boundary))
                .map(|(i, e)| OverflowReport {
                    element: e,
                    path: vec![i],
                    bottom: e.bottom(),
                    overflow: e.bottom() - boundary,
                }),
        }
    }

    fn check_section<'a>(&self, section: &'a Section, path: NodePath, boundary: f64) -> Option<OverflowReport<'a>> {
        if section.has_fixed_height() {
            if !self.crosses(section.bottom(), boundary) {
                return None;
            }
            let (rel, leaf) = section.first_leaf()?;
            let clip_overflow = leaf.bottom() - section.bottom();
            let overflow = if clip_overflow > self.tolerance {
                clip_overflow
            } else {
                (leaf.bottom() - boundary).max(0.0)
            };
            let mut full = path;
            full.extend(rel);
            return Some(OverflowReport {
                element: leaf,
                path: full,
                bottom: leaf.bottom(),
                overflow,
            });
        }

        for (i, child) in section.children.iter().enumerate() {
            let mut child_path = path.clone();
            child_path.push(i);
            let found = match child {
                Node::Element(e) if self.crosses(e.bottom(), boundary) => Some(OverflowReport {
                    element: e,
                    path: child_path,
                    bottom: e.bottom(),
                    overflow: e.bottom() - boundary,
                }),
                Node::Element(_) => None,
                Node::Section(s) => self.check_section(s, child_path, boundary),
            };
            if found.is_some() {
                return found;
            }
        }
        None
    }

    fn crosses(&self, bottom: f64, boundary: f64) -> bool {
        bottom > boundary + self.tolerance
    }
}
