//! # Content Metrics
//!
//! `measure(element, available_width, available_height)` for every element
//! type. Measurement is pure: the same element and box always produce the
//! same [`Measurement`]. Besides the size, each measurement carries the
//! detail a later split needs (line ranges, item heights, row heights), so
//! splitting never has to re-measure and can never see stale numbers.

pub mod code;
pub mod image;
pub mod list;
pub mod table;
pub mod text;

pub use image::AspectRatioCache;
pub use text::Typography;

use crate::config::EngineConfig;
use crate::font::FontContext;
use crate::model::{Content, Element, Size};
use crate::text::LineBreakdown;

/// Narrowest box anything is measured in. Zero or negative widths are
/// clamped up to this instead of failing.
pub const MIN_MEASURE_WIDTH: f64 = 10.0;

#[derive(Debug, Clone, PartialEq)]
pub struct Measurement {
    pub size: Size,
    pub metrics: ContentMetrics,
}

/// Per-type measurement detail recorded on an element by layout.
#[derive(Debug, Clone, PartialEq)]
pub enum ContentMetrics {
    Text(TextMetrics),
    List(ListMetrics),
    Table(TableMetrics),
    /// Atomic content (images, code) and fill elements.
    Atomic,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TextMetrics {
    pub breakdown: LineBreakdown,
    /// Vertical frame padding, top + bottom.
    pub padding: f64,
    pub min_height: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ListMetrics {
    /// Height of each top-level item including its nested children.
    pub item_heights: Vec<f64>,
    pub item_spacing: f64,
    pub padding: f64,
    pub min_height: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TableMetrics {
    /// Zero when the table has no header row.
    pub header_height: f64,
    pub row_heights: Vec<f64>,
    pub padding: f64,
    pub min_height: f64,
}

/// Everything measurement needs, borrowed from the engine context.
pub struct Measurer<'a> {
    pub fonts: &'a FontContext,
    pub images: &'a AspectRatioCache,
    pub config: &'a EngineConfig,
}

impl<'a> Measurer<'a> {
    pub fn new(fonts: &'a FontContext, images: &'a AspectRatioCache, config: &'a EngineConfig) -> Self {
        Self {
            fonts,
            images,
            config,
        }
    }

    pub fn measure(
        &self,
        element: &Element,
        available_width: f64,
        available_height: f64,
    ) -> Measurement {
        let width = sanitize_width(available_width);
        let height = if available_height.is_finite() {
            available_height.max(0.0)
        } else {
            f64::INFINITY
        };
        let family = self.config.font_family.as_str();

        match &element.content {
            Content::Text(t) => {
                let (size, m) = text::measure_text(self.fonts, family, t, &element.directives, width);
                Measurement {
                    size,
                    metrics: ContentMetrics::Text(m),
                }
            }
            Content::Image(img) => Measurement {
                size: image::measure_image(img, &element.directives, width, height, self.images, self.config),
                metrics: ContentMetrics::Atomic,
            },
            Content::List(l) => {
                let (size, m) = list::measure_list(self.fonts, family, l, &element.directives, width);
                Measurement {
                    size,
                    metrics: ContentMetrics::List(m),
                }
            }
            Content::Table(t) => {
                let (size, m) = table::measure_table(self.fonts, family, t, &element.directives, width);
                Measurement {
                    size,
                    metrics: ContentMetrics::Table(m),
                }
            }
            Content::Code(c) => Measurement {
                size: code::measure_code(self.fonts, c, &element.directives, width),
                metrics: ContentMetrics::Atomic,
            },
        }
    }
}

fn sanitize_width(width: f64) -> f64 {
    if !width.is_finite() || width < MIN_MEASURE_WIDTH {
        log::debug!("clamping measure width {} to {}", width, MIN_MEASURE_WIDTH);
        return MIN_MEASURE_WIDTH;
    }
    width
}

/// Sum of `heights` with `spacing` between consecutive entries.
pub(crate) fn stacked_height(heights: &[f64], spacing: f64) -> f64 {
    let sum: f64 = heights.iter().sum();
    sum + spacing * heights.len().saturating_sub(1) as f64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::TextRole;

    #[test]
    fn test_zero_width_is_floored_not_fatal() {
        let fonts = FontContext::new();
        let cache = AspectRatioCache::new();
        let config = EngineConfig::default();
        let m = Measurer::new(&fonts, &cache, &config);
        let el = Element::text(TextRole::Body, "narrow");
        let out = m.measure(&el, 0.0, 400.0);
        assert_eq!(out.size.width, MIN_MEASURE_WIDTH);
        assert!(out.size.height.is_finite() && out.size.height > 0.0);
    }

    #[test]
    fn test_measure_is_deterministic() {
        let fonts = FontContext::new();
        let cache = AspectRatioCache::new();
        let config = EngineConfig::default();
        let m = Measurer::new(&fonts, &cache, &config);
        let el = Element::text(TextRole::Body, "The same words, measured twice, agree.");
        assert_eq!(m.measure(&el, 120.0, 300.0), m.measure(&el, 120.0, 300.0));
    }

    #[test]
    fn test_stacked_height() {
        assert_eq!(stacked_height(&[10.0, 20.0, 30.0], 5.0), 70.0);
        assert_eq!(stacked_height(&[], 5.0), 0.0);
    }
}
