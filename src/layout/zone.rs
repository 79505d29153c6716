//! Zone placement: header (title, subtitle) at the top, footer at the
//! bottom, and for flat slides the body elements stacked in between.

use super::{link_related, measure_width, stack_gap, PositionCalculator};
use crate::config::EngineConfig;
use crate::model::{Element, Point, Rect, Slide, TextRole};

/// Place title and subtitle at the top of the content area.
pub(crate) fn place_header(calc: &PositionCalculator, elements: &mut [Element]) {
    let area = calc.config.canvas.content_area();
    let mut cursor = area.y;
    for role in [TextRole::Title, TextRole::Subtitle] {
        let Some(el) = elements.iter_mut().find(|e| e.text_role() == Some(role)) else {
            continue;
        };
        if role == TextRole::Subtitle && cursor > area.y {
            cursor += calc.config.spacing.subtitle_gap;
        }
        place_full_width(calc, el, area, cursor);
        cursor += el.size.map(|s| s.height).unwrap_or(0.0);
    }
}

/// Place the footer flush with the bottom margin.
pub(crate) fn place_footer(calc: &PositionCalculator, elements: &mut [Element]) {
    let area = calc.config.canvas.content_area();
    if let Some(el) = elements
        .iter_mut()
        .find(|e| e.text_role() == Some(TextRole::Footer))
    {
        place_full_width(calc, el, area, 0.0);
        let height = el.size.map(|s| s.height).unwrap_or(0.0);
        if let Some(p) = el.position.as_mut() {
            p.y = area.bottom() - height;
        }
    }
}

fn place_full_width(calc: &PositionCalculator, el: &mut Element, area: Rect, y: f64) {
    let m = calc.measurer.measure(el, measure_width(el, area.width), area.height);
    let x = area.x + el.directives.align().unwrap_or_default().offset(area.width, m.size.width);
    el.position = Some(Point { x, y });
    el.size = Some(m.size);
    el.metrics = Some(m.metrics);
}

/// The body zone of a slide whose meta-elements are already positioned:
/// the content area minus the header and footer bands.
pub fn body_zone(slide: &Slide, config: &EngineConfig) -> Rect {
    let area = config.canvas.content_area();
    let header_bottom = [TextRole::Title, TextRole::Subtitle]
        .iter()
        .filter_map(|role| slide.meta(*role).and_then(Element::rect))
        .map(|r| r.bottom())
        .fold(None, |acc: Option<f64>, b| Some(acc.map_or(b, |a| a.max(b))));
    let top = match header_bottom {
        Some(b) => b + config.spacing.header_to_body,
        None => area.y,
    };
    let bottom = match slide.meta(TextRole::Footer).and_then(Element::rect) {
        Some(r) => r.y - config.spacing.footer_to_body,
        None => area.bottom(),
    };
    Rect {
        x: area.x,
        y: top,
        width: area.width,
        height: (bottom - top).max(0.0),
    }
}

/// Stack flat body elements top to bottom inside `body`.
pub(crate) fn layout_body(calc: &PositionCalculator, elements: &mut [Element], body: Rect) {
    let gap = calc.config.spacing.vertical;
    let mut cursor = body.y;
    let mut prev: Option<usize> = None;

    for i in 0..elements.len() {
        if elements[i].is_meta() {
            continue;
        }
        let (before, rest) = elements.split_at_mut(i);
        let el = &mut rest[0];
        let related = link_related(prev.map(|p| &before[p]), el);
        if prev.is_some() {
            cursor += stack_gap(calc.config, gap, related);
        }

        let m = calc.measurer.measure(el, measure_width(el, body.width), body.height);
        let x = body.x + el.directives.align().unwrap_or_default().offset(body.width, m.size.width);
        el.position = Some(Point { x, y: cursor });
        el.size = Some(m.size);
        el.metrics = Some(m.metrics);

        cursor += m.size.height;
        prev = Some(i);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::directive::Directives;
    use crate::font::FontContext;
    use crate::metrics::{AspectRatioCache, Measurer};
    use crate::model::{Content, ListContent, ListItem};

    fn layout(slide: &Slide, config: &EngineConfig) -> Slide {
        let fonts = FontContext::new();
        let cache = AspectRatioCache::new();
        PositionCalculator::new(Measurer::new(&fonts, &cache, config))
            .layout(slide)
            .unwrap()
    }

    fn list(n: usize) -> Element {
        Element::new(Content::List(ListContent {
            items: (0..n).map(|i| ListItem::new(format!("item {}", i))).collect(),
            ..Default::default()
        }))
    }

    #[test]
    fn test_header_and_footer_bound_the_body() {
        let config = EngineConfig::default();
        let slide = Slide {
            elements: vec![
                Element::text(TextRole::Title, "Title"),
                Element::text(TextRole::Subtitle, "Subtitle"),
                Element::text(TextRole::Footer, "Footer"),
            ],
            ..Default::default()
        };
        let out = layout(&slide, &config);
        let title = out.meta(TextRole::Title).and_then(Element::rect).unwrap();
        let subtitle = out.meta(TextRole::Subtitle).and_then(Element::rect).unwrap();
        let footer = out.meta(TextRole::Footer).and_then(Element::rect).unwrap();

        assert_eq!(title.y, 50.0);
        assert!((subtitle.y - (title.bottom() + 4.0)).abs() < 1e-9);
        assert!((footer.bottom() - 355.0).abs() < 1e-9);

        let body = body_zone(&out, &config);
        assert!((body.y - (subtitle.bottom() + 10.0)).abs() < 1e-9);
        assert!((body.bottom() - (footer.y - 10.0)).abs() < 1e-9);
    }

    #[test]
    fn test_body_elements_stack_with_related_spacing() {
        let config = EngineConfig::default();
        let slide = Slide {
            elements: vec![
                Element::text(crate::model::TextRole::Body, "Intro paragraph"),
                Element::heading(2, "Checklist"),
                list(2),
            ],
            ..Default::default()
        };
        let out = layout(&slide, &config);
        let r: Vec<Rect> = out.elements.iter().map(|e| e.rect().unwrap()).collect();
        assert_eq!(r[0].y, 50.0);
        assert!((r[1].y - (r[0].bottom() + 10.0)).abs() < 1e-9);
        assert!((r[2].y - (r[1].bottom() + 7.0)).abs() < 1e-9);
    }

    #[test]
    fn test_alignment_directive_positions_narrow_elements() {
        let config = EngineConfig::default();
        let mut el = Element::text(TextRole::Body, "Right");
        el.directives = Directives::new().with("width", "1/2").with("align", "right");
        let slide = Slide {
            elements: vec![el],
            ..Default::default()
        };
        let out = layout(&slide, &config);
        let r = out.elements[0].rect().unwrap();
        assert_eq!(r.width, 310.0);
        assert_eq!(r.x, 50.0 + 310.0);
    }
}
