//! Table measurement: equal-width columns, each row as tall as its
//! tallest cell.

use super::{TableMetrics, Typography};
use crate::directive::Directives;
use crate::font::FontContext;
use crate::model::{Size, TableContent, TextRole};
use crate::text::{TextLayout, TextStyle};

pub const CELL_FONT_SIZE: f64 = 12.0;
/// Top + bottom padding inside each cell.
pub const CELL_PADDING: f64 = 8.0;
/// Left/right inset inside each cell.
pub const CELL_INSET: f64 = 4.0;
pub const MIN_ROW_HEIGHT: f64 = 24.0;
/// Top + bottom padding around the whole table.
pub const TABLE_PADDING: f64 = 10.0;
pub const MIN_EMPTY_TABLE_HEIGHT: f64 = 30.0;
pub const MIN_TABLE_HEIGHT: f64 = 40.0;

pub fn measure_table(
    fonts: &FontContext,
    family: &str,
    table: &TableContent,
    directives: &Directives,
    available_width: f64,
) -> (Size, TableMetrics) {
    let columns = table.column_count();
    if columns == 0 {
        let size = Size {
            width: available_width,
            height: MIN_EMPTY_TABLE_HEIGHT,
        };
        let metrics = TableMetrics {
            header_height: 0.0,
            row_heights: vec![0.0; table.rows.len()],
            padding: TABLE_PADDING,
            min_height: MIN_EMPTY_TABLE_HEIGHT,
        };
        return (size, metrics);
    }

    let column_width = available_width / columns as f64;
    let font_size = directives.fontsize().unwrap_or(CELL_FONT_SIZE);
    let body = Typography::for_role(TextRole::Body);
    let rows = RowMeasurer {
        fonts,
        family,
        column_width,
        font_size,
        line_height: body.line_height,
    };

    let header_height = if table.headers.is_empty() {
        0.0
    } else {
        rows.row_height(&table.headers, 700)
    };
    let row_heights: Vec<f64> = table.rows.iter().map(|r| rows.row_height(r, 400)).collect();

    let height = (header_height + row_heights.iter().sum::<f64>() + TABLE_PADDING).max(MIN_TABLE_HEIGHT);
    (
        Size {
            width: available_width,
            height,
        },
        TableMetrics {
            header_height,
            row_heights,
            padding: TABLE_PADDING,
            min_height: MIN_TABLE_HEIGHT,
        },
    )
}

struct RowMeasurer<'a> {
    fonts: &'a FontContext,
    family: &'a str,
    column_width: f64,
    font_size: f64,
    line_height: f64,
}

impl RowMeasurer<'_> {
    fn row_height(&self, cells: &[String], weight: u32) -> f64 {
        let style = TextStyle {
            family: self.family,
            font_size: self.font_size,
            weight,
            italic: false,
            line_height: self.line_height,
        };
        let wrap = (self.column_width - CELL_INSET * 2.0).max(1.0);
        cells
            .iter()
            .map(|cell| {
                TextLayout::new()
                    .break_into_lines(self.fonts, cell, &[], &style, wrap)
                    .total_height()
                    + CELL_PADDING
            })
            .fold(MIN_ROW_HEIGHT, f64::max)
    }
}

impl TableMetrics {
    /// Height of a table holding the header plus the first `rows` rows.
    pub fn height_for(&self, rows: usize) -> f64 {
        let body: f64 = self.row_heights.iter().take(rows).sum();
        (self.header_height + body + self.padding).max(self.min_height)
    }
}
