//! # Element Splitting
//!
//! Text, lists and tables can be divided at a height boundary; images and
//! code cannot. Splitting is pure: it reads the line, item, or row heights
//! recorded by the last layout pass and returns two new halves, leaving
//! the input untouched.
//!
//! Every split conserves content. Concatenating the fitted and overflowing
//! halves reproduces the original text, items, or rows. The only additions
//! are the repeated table header and a "(continued)" heading marker.

use super::continuation::continued_label;
use crate::metrics::{stacked_height, ContentMetrics, ListMetrics, TableMetrics, TextMetrics};
use crate::model::{
    CodeContent, Content, Element, Heading, ImageContent, ListContent, TableContent, TextContent, TextFormat,
};

/// Numeric slack when comparing accumulated heights against a budget.
const EPSILON: f64 = 1e-6;

/// Content that can be divided at a height boundary.
///
/// `split` returns `(fitted, overflowing)`: `(None, Some(copy))` when not
/// even one unit fits, `(Some(copy), None)` when everything does.
pub trait Splittable: Sized {
    type Metrics;

    fn split(&self, metrics: &Self::Metrics, available_height: f64) -> (Option<Self>, Option<Self>);

    /// Smallest height at which `split` places at least one unit.
    fn min_unit_height(&self, metrics: &Self::Metrics) -> f64;
}

/// Content that is only ever moved whole. It has no `split`; the only
/// division it supports puts all of it on the next slide.
pub trait Atomic: Clone {
    fn promote(&self) -> (Option<Self>, Option<Self>) {
        (None, Some(self.clone()))
    }
}

impl Atomic for ImageContent {}
impl Atomic for CodeContent {}

/// What to do with a run of stacked units when space runs out.
#[derive(Debug, Clone, PartialEq)]
pub enum BreakDecision {
    /// Everything fits.
    Place,
    /// Not even the first unit fits.
    MoveToNext,
    /// The first `units_on_current` units fit; the rest move on.
    Split { units_on_current: usize },
}

/// Given the remaining height and the heights of stacked units separated
/// by `spacing`, decide how many units stay.
pub fn decide_break(remaining_height: f64, unit_heights: &[f64], spacing: f64) -> BreakDecision {
    if stacked_height(unit_heights, spacing) <= remaining_height + EPSILON {
        return BreakDecision::Place;
    }

    let mut running = 0.0;
    let mut fit_count = 0;
    for &h in unit_heights {
        let next = if fit_count == 0 { h } else { spacing + h };
        if running + next > remaining_height + EPSILON {
            break;
        }
        running += next;
        fit_count += 1;
    }

    if fit_count == 0 {
        BreakDecision::MoveToNext
    } else {
        BreakDecision::Split {
            units_on_current: fit_count,
        }
    }
}

// ── Text ────────────────────────────────────────────────────────

impl Splittable for TextContent {
    type Metrics = TextMetrics;

    fn split(&self, metrics: &TextMetrics, available_height: f64) -> (Option<Self>, Option<Self>) {
        let lines = &metrics.breakdown;
        let mut count = lines.fit_count(available_height - metrics.padding);
        if count == 0 {
            // Give up the frame padding before giving up a line that fits.
            count = lines.fit_count(available_height);
        }
        if count == 0 {
            return (None, Some(self.clone()));
        }
        if count >= lines.lines.len() {
            return (Some(self.clone()), None);
        }

        let cut = lines.cut_index(count);
        let byte_cut = char_to_byte(&self.text, cut);
        let (head, tail) = self.text.split_at(byte_cut);
        if tail.trim().is_empty() {
            return (Some(self.clone()), None);
        }

        let (head_spans, tail_spans) = split_spans(&self.formatting, cut);
        let fitted = TextContent {
            text: head.to_string(),
            formatting: head_spans,
            ..self.clone()
        };
        let overflow = TextContent {
            text: tail.to_string(),
            formatting: tail_spans,
            ..self.clone()
        };
        (Some(fitted), Some(overflow))
    }

    fn min_unit_height(&self, metrics: &TextMetrics) -> f64 {
        metrics.height_for(1)
    }
}

fn char_to_byte(text: &str, char_index: usize) -> usize {
    text.char_indices()
        .nth(char_index)
        .map(|(b, _)| b)
        .unwrap_or(text.len())
}

/// Clip spans at char `cut`, rebasing the overflow side to start at zero.
/// A span crossing the cut appears on both sides.
fn split_spans(spans: &[TextFormat], cut: usize) -> (Vec<TextFormat>, Vec<TextFormat>) {
    let mut head = Vec::new();
    let mut tail = Vec::new();
    for span in spans {
        if span.start < cut || (span.start == span.end && span.start == cut) {
            head.push(TextFormat {
                end: span.end.min(cut),
                ..span.clone()
            });
        }
        if span.end > cut {
            tail.push(TextFormat {
                start: span.start.max(cut) - cut,
                end: span.end - cut,
                ..span.clone()
            });
        }
    }
    (head, tail)
}

// ── List ────────────────────────────────────────────────────────

impl Splittable for ListContent {
    type Metrics = ListMetrics;

    fn split(&self, metrics: &ListMetrics, available_height: f64) -> (Option<Self>, Option<Self>) {
        let heights = &metrics.item_heights[..metrics.item_heights.len().min(self.items.len())];
        let mut count = match decide_break(available_height - metrics.padding, heights, metrics.item_spacing) {
            BreakDecision::Place => heights.len(),
            BreakDecision::MoveToNext => 0,
            BreakDecision::Split { units_on_current } => units_on_current,
        };
        // A short prefix is still floored at the list's minimum height.
        while count > 0 && metrics.height_for(count) > available_height + EPSILON {
            count -= 1;
        }
        if count == 0 {
            return (None, Some(self.clone()));
        }
        if count == self.items.len() {
            return (Some(self.clone()), None);
        }

        let fitted = ListContent {
            items: self.items[..count].to_vec(),
            continuation_heading: None,
            ..self.clone()
        };
        let continuation_heading = self.preceding_heading.as_ref().map(|h| Heading {
            text: continued_label(&h.text),
            level: h.level,
        });
        let overflow = ListContent {
            ordered: self.ordered,
            items: self.items[count..].to_vec(),
            preceding_heading: None,
            continuation_heading,
        };
        (Some(fitted), Some(overflow))
    }

    fn min_unit_height(&self, metrics: &ListMetrics) -> f64 {
        metrics.height_for(1)
    }
}

// ── Table ───────────────────────────────────────────────────────

impl Splittable for TableContent {
    type Metrics = TableMetrics;

    fn split(&self, metrics: &TableMetrics, available_height: f64) -> (Option<Self>, Option<Self>) {
        let budget = available_height - metrics.padding - metrics.header_height;
        let heights = &metrics.row_heights[..metrics.row_heights.len().min(self.rows.len())];
        match decide_break(budget, heights, 0.0) {
            BreakDecision::Place if heights.len() == self.rows.len() => (Some(self.clone()), None),
            // A header with no rows under it is not a useful fragment.
            BreakDecision::Place | BreakDecision::MoveToNext => (None, Some(self.clone())),
            BreakDecision::Split { units_on_current } => {
                let at = units_on_current;
                let directive_cut = at.min(self.row_directives.len());
                let fitted = TableContent {
                    headers: self.headers.clone(),
                    rows: self.rows[..at].to_vec(),
                    row_directives: self.row_directives[..directive_cut].to_vec(),
                };
                let overflow = TableContent {
                    headers: self.headers.clone(),
                    rows: self.rows[at..].to_vec(),
                    row_directives: self.row_directives[directive_cut..].to_vec(),
                };
                (Some(fitted), Some(overflow))
            }
        }
    }

    fn min_unit_height(&self, metrics: &TableMetrics) -> f64 {
        metrics.height_for(1)
    }
}

// ── Element dispatch ────────────────────────────────────────────

/// Fitted and overflowing halves of an element.
pub type Halves = (Option<Element>, Option<Element>);

/// Images, code, and fill elements are only ever moved whole.
pub fn is_atomic(el: &Element) -> bool {
    el.is_fill() || matches!(el.content, Content::Image(_) | Content::Code(_))
}

/// Split a measured element at `available_height`.
///
/// Atomic content and fill elements come back whole on the overflow side,
/// as does splittable content with no recorded measurement.
pub fn split_element(el: &Element, available_height: f64) -> Halves {
    if el.is_fill() {
        return (None, Some(el.clone()));
    }
    let halves = match (&el.content, el.metrics.as_ref()) {
        (Content::Image(i), _) => rebuild(el, i.promote(), Content::Image),
        (Content::Code(c), _) => rebuild(el, c.promote(), Content::Code),
        (Content::Text(t), Some(ContentMetrics::Text(m))) => rebuild(el, t.split(m, available_height), Content::Text),
        (Content::List(l), Some(ContentMetrics::List(m))) => rebuild(el, l.split(m, available_height), Content::List),
        (Content::Table(t), Some(ContentMetrics::Table(m))) => {
            rebuild(el, t.split(m, available_height), Content::Table)
        }
        _ => return (None, Some(el.clone())),
    };
    log::debug!(
        "split {:?} at {:.1}pt: fitted={} overflow={}",
        el.element_type(),
        available_height,
        halves.0.is_some(),
        halves.1.is_some()
    );
    halves
}

/// Height below which a splittable element cannot place any unit.
pub fn min_unit_height(el: &Element) -> Option<f64> {
    if is_atomic(el) {
        return None;
    }
    match (&el.content, el.metrics.as_ref()?) {
        (Content::Text(t), ContentMetrics::Text(m)) => Some(t.min_unit_height(m)),
        (Content::List(l), ContentMetrics::List(m)) => Some(l.min_unit_height(m)),
        (Content::Table(t), ContentMetrics::Table(m)) => Some(t.min_unit_height(m)),
        _ => None,
    }
}

fn rebuild<T>(el: &Element, (fitted, overflow): (Option<T>, Option<T>), wrap: fn(T) -> Content) -> Halves {
    let make = |content: T| {
        let mut half = el.clone();
        half.content = wrap(content);
        half.clear_geometry();
        half
    };
    (fitted.map(make), overflow.map(make))
}
