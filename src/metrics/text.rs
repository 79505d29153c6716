//! Text element measurement: role-based typography plus line wrapping.

use super::TextMetrics;
use crate::directive::Directives;
use crate::font::FontContext;
use crate::model::{Size, TextContent, TextRole};
use crate::text::{TextLayout, TextStyle};

/// Inset from each side of a text frame to its first glyph.
pub const TEXT_HORIZONTAL_INSET: f64 = 4.0;

const HEADING_SIZES: [f64; 6] = [24.0, 20.0, 18.0, 16.0, 14.0, 12.0];

/// Type settings for one role.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Typography {
    pub font_size: f64,
    pub weight: u32,
    pub line_height: f64,
    /// Top + bottom frame padding.
    pub padding: f64,
    pub min_height: f64,
}

impl Typography {
    pub fn for_role(role: TextRole) -> Self {
        let (font_size, weight, line_height, padding, min_height) = match role {
            TextRole::Title => (24.0, 700, 1.2, 10.0, 30.0),
            TextRole::Subtitle => (18.0, 400, 1.2, 8.0, 24.0),
            TextRole::Body => (14.0, 400, 1.3, 6.0, 18.0),
            TextRole::Quote => (14.0, 400, 1.4, 16.0, 26.0),
            TextRole::Footer => (10.0, 400, 1.2, 4.0, 16.0),
        };
        Self {
            font_size,
            weight,
            line_height,
            padding,
            min_height,
        }
    }

    /// Typography for a text element, after heading level and directives.
    pub fn for_content(content: &TextContent, directives: &Directives) -> Self {
        let mut t = Self::for_role(content.role);
        if content.role == TextRole::Body && content.heading_level > 0 {
            let idx = (content.heading_level.min(6) - 1) as usize;
            t.font_size = HEADING_SIZES[idx];
            t.weight = 700;
            t.line_height = 1.2;
        }
        if let Some(size) = directives.fontsize() {
            t.font_size = size;
        }
        if let Some(p) = directives.padding() {
            t.padding = p * 2.0;
        }
        t
    }

    pub fn style<'a>(&self, family: &'a str) -> TextStyle<'a> {
        TextStyle {
            family,
            font_size: self.font_size,
            weight: self.weight,
            italic: false,
            line_height: self.line_height,
        }
    }
}

pub fn measure_text(
    fonts: &FontContext,
    family: &str,
    content: &TextContent,
    directives: &Directives,
    available_width: f64,
) -> (Size, TextMetrics) {
    let typo = Typography::for_content(content, directives);
    let italic = content.role == TextRole::Quote;
    let style = TextStyle {
        italic,
        ..typo.style(family)
    };
    let inset = directives
        .padding()
        .unwrap_or(TEXT_HORIZONTAL_INSET);
    let wrap_width = (available_width - inset * 2.0).max(1.0);

    let breakdown = TextLayout::new().break_into_lines(
        fonts,
        &content.text,
        &content.formatting,
        &style,
        wrap_width,
    );
    let height = (breakdown.total_height() + typo.padding).max(typo.min_height);

    (
        Size {
            width: available_width,
            height,
        },
        TextMetrics {
            breakdown,
            padding: typo.padding,
            min_height: typo.min_height,
        },
    )
}

impl TextMetrics {
    /// Height of a text frame holding the first `lines` lines.
    pub fn height_for(&self, lines: usize) -> f64 {
        (self.breakdown.prefix_height(lines) + self.padding).max(self.min_height)
    }
}
