//! Code block measurement. Monospace, hard-wrapped at the box edge.

use crate::directive::Directives;
use crate::font::FontContext;
use crate::model::{CodeContent, Size};

pub const CODE_FONT_SIZE: f64 = 11.0;
pub const CODE_LINE_HEIGHT: f64 = 1.35;
/// Top + bottom.
pub const CODE_PADDING: f64 = 16.0;
/// Left/right inset.
pub const CODE_INSET: f64 = 8.0;
pub const LANGUAGE_LABEL_HEIGHT: f64 = 14.0;
pub const MIN_CODE_HEIGHT: f64 = 30.0;

pub fn measure_code(
    fonts: &FontContext,
    code: &CodeContent,
    directives: &Directives,
    available_width: f64,
) -> Size {
    let font_size = directives.fontsize().unwrap_or(CODE_FONT_SIZE);
    let advance = fonts.char_width('M', "Courier", 400, false, font_size);
    let wrap_width = (available_width - CODE_INSET * 2.0).max(advance);
    let per_line = ((wrap_width / advance).floor() as usize).max(1);

    let visual_lines: usize = code
        .code
        .split('\n')
        .map(|line| {
            let cols = line.trim_end_matches('\r').chars().count();
            cols.div_ceil(per_line).max(1)
        })
        .sum();

    let label = match code.language.as_deref().map(str::trim) {
        None | Some("") | Some("text") | Some("plain") => 0.0,
        Some(_) => LANGUAGE_LABEL_HEIGHT,
    };
    let height = visual_lines as f64 * font_size * CODE_LINE_HEIGHT + CODE_PADDING + label;

    Size {
        width: available_width,
        height: height.max(MIN_CODE_HEIGHT),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn code(src: &str, language: Option<&str>) -> CodeContent {
        CodeContent {
            code: src.to_string(),
            language: language.map(str::to_string),
        }
    }

    #[test]
    fn test_line_count_drives_height() {
        let fonts = FontContext::new();
        let size = measure_code(&fonts, &code("a\nb\nc", None), &Directives::new(), 400.0);
        let expected = 3.0 * 11.0 * 1.35 + CODE_PADDING;
        assert!((size.height - expected).abs() < 1e-9);
    }

    #[test]
    fn test_long_lines_hard_wrap() {
        let fonts = FontContext::new();
        // 6.6pt per char at 11pt; 100pt box - 16pt inset = 84pt → 12 chars per line.
        let size = measure_code(&fonts, &code(&"x".repeat(30), Some("text")), &Directives::new(), 100.0);
        let expected = 3.0 * 11.0 * 1.35 + CODE_PADDING;
        assert!((size.height - expected).abs() < 1e-9);
    }

    #[test]
    fn test_language_label_adds_band() {
        let fonts = FontContext::new();
        let plain = measure_code(&fonts, &code("fn main() {}\n\n", None), &Directives::new(), 400.0);
        let rust = measure_code(&fonts, &code("fn main() {}\n\n", Some("rust")), &Directives::new(), 400.0);
        assert!((rust.height - plain.height - LANGUAGE_LABEL_HEIGHT).abs() < 1e-9);
    }
}
