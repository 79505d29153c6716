//! # Overflow Manager
//!
//! Turns one positioned slide into one or more finalized slides. Each
//! round finds the first overflowing element, divides the body at the
//! boundary, re-lays out the part that stays, and builds a continuation
//! slide from the rest:
//!
//! ```text
//! Positioned ──(no overflow)──────────────────────────→ Finalized
//!     │
//!     └─(overflow)→ split / promote → fill rules → continuation
//!                                                      │
//!     ┌──────────────────── re-layout ─────────────────┘
//!     ↓
//! Positioned ...
//! ```
//!
//! Every round places at least one unit of content, and a hard iteration
//! cap bounds the loop, so pagination always terminates and never drops
//! content. Slides where content could not be made to fit are flagged
//! `degraded` instead of failing.

pub mod continuation;
pub mod detector;
pub mod fill;
pub(crate) mod partition;
pub mod split;

pub use detector::{OverflowDetector, OverflowReport};
pub use fill::FillPlan;
pub use split::{Atomic, Splittable};

use crate::config::EngineConfig;
use crate::error::DeckError;
use crate::layout::{body_zone, PositionCalculator};
use crate::model::{Element, Node, Rect, Section, Slide, SlideState};
use partition::{content_leaves, Partitioner};

/// Body content carried from one slide to the next.
#[derive(Debug, Clone)]
pub(crate) enum Body {
    Tree(Section),
    /// Body elements of a zone-based slide. On the fitted side this also
    /// holds the slide's meta-elements.
    Flat(Vec<Element>),
}

impl Body {
    fn content_leaves(&self) -> usize {
        match self {
            Body::Tree(root) => content_leaves(root),
            Body::Flat(elements) => elements.iter().filter(|e| !e.is_meta() && !e.is_fill()).count(),
        }
    }
}

/// Outcome of one round: what stays, and what continues.
struct Resolution {
    fitted: Slide,
    rest: Option<Body>,
    degraded: bool,
}

pub struct OverflowManager<'a> {
    calc: PositionCalculator<'a>,
    detector: OverflowDetector,
}

impl<'a> OverflowManager<'a> {
    pub fn new(calc: PositionCalculator<'a>) -> Self {
        Self {
            calc,
            detector: OverflowDetector::new(),
        }
    }

    /// Lay out `slide` and paginate it into Finalized slides.
    pub fn paginate(&self, slide: &Slide) -> Result<Vec<Slide>, DeckError> {
        let config = self.calc.config;
        let mut output = Vec::new();
        let mut current = self.calc.layout(slide)?;
        let mut iterations = 0;

        loop {
            let body = body_zone(&current, config);
            let path = match self.detector.find_first_overflow(&current, body) {
                None => {
                    output.push(finalize(current, config));
                    break;
                }
                Some(report) => {
                    log::debug!(
                        "slide {:?}: {:?} at {:?} overflows by {:.1}pt",
                        current.id,
                        report.element.element_type(),
                        report.path,
                        report.overflow
                    );
                    report.path
                }
            };

            if iterations >= config.max_iterations {
                log::warn!(
                    "slide {:?}: gave up after {} rounds, emitting an overflowing slide",
                    slide.id,
                    iterations
                );
                current.degraded = true;
                output.push(finalize(current, config));
                break;
            }
            iterations += 1;

            let Some(resolution) = self.resolve(&current, &path, body.bottom()) else {
                log::warn!("slide {:?}: nothing can be placed; emitting as is", current.id);
                current.degraded = true;
                output.push(finalize(current, config));
                break;
            };

            let mut fitted = self.calc.layout(&resolution.fitted)?;
            fitted.degraded |= resolution.degraded;
            if self
                .detector
                .find_first_overflow(&fitted, body_zone(&fitted, config))
                .is_some()
            {
                log::warn!("slide {:?}: content still overflows after splitting", fitted.id);
                fitted.degraded = true;
            }
            output.push(finalize(fitted, config));

            let Some(rest) = resolution.rest else {
                break;
            };
            let next = continuation::build(slide, rest, output.len());
            current = self.calc.layout(&next)?;
        }

        log::info!(
            "slide {:?}: {} output slide(s), {} degraded",
            slide.id,
            output.len(),
            output.iter().filter(|s| s.degraded).count()
        );
        Ok(output)
    }

    fn resolve(&self, current: &Slide, path: &[usize], boundary: f64) -> Option<Resolution> {
        if let Some(root) = &current.root_section {
            if let FillPlan::AtomicMove(unit) = fill::classify(root, path) {
                log::debug!("moving fill unit at {:?} whole", unit);
                return Some(move_unit(current, root, &unit));
            }
        }

        for force_progress in [false, true] {
            let mut partitioner = Partitioner::new(boundary, force_progress);
            let (fitted, rest) = match &current.root_section {
                Some(root) => {
                    let (f, o) = partitioner.section(root);
                    (Body::Tree(f.unwrap_or_else(|| root.shell())), o.map(Body::Tree))
                }
                None => {
                    let (f, o) = partitioner.elements(&current.elements);
                    (Body::Flat(f), Some(Body::Flat(o)))
                }
            };
            if fitted.content_leaves() > 0 {
                return Some(Resolution {
                    fitted: with_body(current, fitted),
                    rest: rest.filter(|r| r.content_leaves() > 0),
                    degraded: partitioner.degraded,
                });
            }
            log::debug!("no content fits above {:.1}pt", boundary);
        }
        None
    }
}

/// Cut the tree before the fill unit at `unit`. When nothing precedes the
/// unit, it stays on this slide alone even though it overflows.
fn move_unit(current: &Slide, root: &Section, unit: &[usize]) -> Resolution {
    let (before, from) = fill::cut_at(root, unit);
    if content_leaves(&before) > 0 {
        return Resolution {
            fitted: with_body(current, Body::Tree(before)),
            rest: Some(Body::Tree(from)),
            degraded: false,
        };
    }

    let mut after = unit.to_vec();
    if let Some(last) = after.last_mut() {
        *last += 1;
    }
    let (before, from) = fill::cut_at(root, &after);
    log::warn!("fill unit at {:?} is taller than the body", unit);
    Resolution {
        fitted: with_body(current, Body::Tree(before)),
        rest: (content_leaves(&from) > 0).then_some(Body::Tree(from)),
        degraded: true,
    }
}

fn with_body(current: &Slide, body: Body) -> Slide {
    let mut slide = current.clone();
    match body {
        Body::Tree(root) => slide.root_section = Some(root),
        Body::Flat(elements) => slide.elements = elements,
    }
    slide
}

/// Flatten a positioned slide into its renderable list: meta-elements
/// first, then body leaves in pre-order. Boxes are clipped to the nearest
/// fixed-height ancestor and to the canvas.
pub fn finalize(mut slide: Slide, config: &EngineConfig) -> Slide {
    let canvas = Rect {
        x: 0.0,
        y: 0.0,
        width: config.canvas.width,
        height: config.canvas.height,
    };
    let elements = std::mem::take(&mut slide.elements);
    let (meta, flat): (Vec<Element>, Vec<Element>) = elements.into_iter().partition(Element::is_meta);

    let mut out: Vec<Element> = meta.into_iter().map(|e| clip(e, None, canvas)).collect();
    match slide.root_section.take() {
        Some(root) => collect_renderable(root, None, canvas, &mut out),
        None => out.extend(flat.into_iter().map(|e| clip(e, None, canvas))),
    }

    slide.renderable_elements = out;
    slide.state = SlideState::Finalized;
    slide
}

fn collect_renderable(section: Section, clip_bottom: Option<f64>, canvas: Rect, out: &mut Vec<Element>) {
    let clip_bottom = if section.has_fixed_height() {
        let own = section.bottom();
        Some(clip_bottom.map_or(own, |b| b.min(own)))
    } else {
        clip_bottom
    };
    for child in section.children {
        match child {
            Node::Element(e) => out.push(clip(e, clip_bottom, canvas)),
            Node::Section(s) => collect_renderable(s, clip_bottom, canvas, out),
        }
    }
}

fn clip(mut el: Element, clip_bottom: Option<f64>, canvas: Rect) -> Element {
    let (Some(mut pos), Some(mut size)) = (el.position, el.size) else {
        return el;
    };
    let limit = clip_bottom.map_or(canvas.bottom(), |b| b.min(canvas.bottom()));
    pos.x = pos.x.clamp(canvas.x, canvas.right());
    pos.y = pos.y.clamp(canvas.y, canvas.bottom());
    size.width = size.width.min(canvas.right() - pos.x).max(0.0);
    size.height = size.height.min(limit - pos.y).max(0.0);
    el.position = Some(pos);
    el.size = Some(size);
    el.metrics = None;
    el
}
