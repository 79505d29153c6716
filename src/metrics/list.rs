//! List measurement. Items are body-style text; nested items are indented
//! and every level reserves room for its bullet or number.

use super::{stacked_height, ListMetrics, Typography};
use crate::directive::Directives;
use crate::font::FontContext;
use crate::model::{ListContent, ListItem, Size, TextRole};
use crate::text::TextLayout;

pub const LIST_INDENT: f64 = 20.0;
pub const BULLET_WIDTH: f64 = 16.0;
pub const ITEM_SPACING: f64 = 4.0;
/// Top + bottom.
pub const LIST_PADDING: f64 = 10.0;
pub const MIN_EMPTY_LIST_HEIGHT: f64 = 20.0;
pub const MIN_LIST_HEIGHT: f64 = 30.0;

pub fn measure_list(
    fonts: &FontContext,
    family: &str,
    list: &ListContent,
    directives: &Directives,
    available_width: f64,
) -> (Size, ListMetrics) {
    let mut typo = Typography::for_role(TextRole::Body);
    if let Some(size) = directives.fontsize() {
        typo.font_size = size;
    }
    let measurer = ItemMeasurer {
        fonts,
        typo,
        family,
    };

    let item_heights: Vec<f64> = list
        .items
        .iter()
        .map(|item| measurer.item_height(item, available_width))
        .collect();

    let min_height = if list.items.is_empty() {
        MIN_EMPTY_LIST_HEIGHT
    } else {
        MIN_LIST_HEIGHT
    };
    let height = (stacked_height(&item_heights, ITEM_SPACING) + LIST_PADDING).max(min_height);

    (
        Size {
            width: available_width,
            height,
        },
        ListMetrics {
            item_heights,
            item_spacing: ITEM_SPACING,
            padding: LIST_PADDING,
            min_height,
        },
    )
}

impl ListMetrics {
    /// Height of a list holding the first `items` items.
    pub fn height_for(&self, items: usize) -> f64 {
        let shown = &self.item_heights[..items.min(self.item_heights.len())];
        (stacked_height(shown, self.item_spacing) + self.padding).max(self.min_height)
    }
}

struct ItemMeasurer<'a> {
    fonts: &'a FontContext,
    typo: Typography,
    family: &'a str,
}

impl ItemMeasurer<'_> {
    /// An item's own text plus its nested children, stacked.
    fn item_height(&self, item: &ListItem, width: f64) -> f64 {
        let text_width = (width - BULLET_WIDTH).max(1.0);
        let lines = TextLayout::new().break_into_lines(
            self.fonts,
            &item.text,
            &item.formatting,
            &self.typo.style(self.family),
            text_width,
        );
        let own = lines.total_height().max(self.typo.font_size * self.typo.line_height);

        let child_width = width - LIST_INDENT;
        let children: f64 = item
            .children
            .iter()
            .map(|c| ITEM_SPACING + self.item_height(c, child_width))
            .sum();
        own + children
    }
}
