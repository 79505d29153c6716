//! # Text Layout
//!
//! Line breaking for wrapped text. Break opportunities come from UAX#14
//! (unicode-linebreak); lines are filled greedily.
//!
//! The output is a [`LineBreakdown`]: contiguous character ranges, one per
//! line, that together cover every character of the input exactly once.
//! Trailing spaces and the newline that ends a paragraph belong to the line
//! they end. Splitting text across slides only ever cuts at these ranges.

use serde::Serialize;
use unicode_linebreak::{linebreaks, BreakOpportunity};

use crate::font::FontContext;
use crate::model::{FormatKind, TextFormat};

/// Font parameters for one run of text.
#[derive(Debug, Clone, Copy)]
pub struct TextStyle<'a> {
    pub family: &'a str,
    pub font_size: f64,
    pub weight: u32,
    pub italic: bool,
    /// Line height as a multiple of the font size.
    pub line_height: f64,
}

impl TextStyle<'_> {
    pub fn line_box(&self) -> f64 {
        self.font_size * self.line_height
    }
}

/// One wrapped line: chars `start..end` of the source text.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LineMetric {
    pub start: usize,
    pub end: usize,
    /// Advance width without trailing whitespace.
    pub width: f64,
    pub height: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct LineBreakdown {
    pub lines: Vec<LineMetric>,
}

impl LineBreakdown {
    pub fn total_height(&self) -> f64 {
        self.lines.iter().map(|l| l.height).sum()
    }

    /// Number of leading lines whose cumulative height fits in `budget`.
    pub fn fit_count(&self, budget: f64) -> usize {
        let mut used = 0.0;
        let mut count = 0;
        for line in &self.lines {
            if used + line.height > budget + 1e-6 {
                break;
            }
            used += line.height;
            count += 1;
        }
        count
    }

    /// Height of the first `count` lines.
    pub fn prefix_height(&self, count: usize) -> f64 {
        self.lines.iter().take(count).map(|l| l.height).sum()
    }

    /// Character index just past line `count - 1`.
    pub fn cut_index(&self, count: usize) -> usize {
        match count {
            0 => 0,
            n => self.lines[n.min(self.lines.len()) - 1].end,
        }
    }
}

/// Pre-compute UAX#14 line break opportunities, indexed by char position.
///
/// `result[i]` is the opportunity to break *before* char `i`.
fn compute_break_opportunities(text: &str) -> Vec<Option<BreakOpportunity>> {
    let char_count = text.chars().count();
    let mut result = vec![None; char_count];

    // linebreaks() yields byte offsets of the next segment's start.
    let byte_to_char: Vec<usize> = {
        let mut map = vec![0usize; text.len() + 1];
        let mut char_idx = 0;
        for (byte_idx, _) in text.char_indices() {
            map[byte_idx] = char_idx;
            char_idx += 1;
        }
        map[text.len()] = char_idx;
        map
    };

    for (byte_offset, opp) in linebreaks(text) {
        let char_idx = byte_to_char[byte_offset];
        if char_idx < char_count {
            result[char_idx] = Some(opp);
        }
        // byte_offset == text.len() is the implicit break at the end
    }

    result
}

pub struct TextLayout;

impl Default for TextLayout {
    fn default() -> Self {
        Self::new()
    }
}

impl TextLayout {
    pub fn new() -> Self {
        Self
    }

    /// Break `text` into lines no wider than `max_width`.
    ///
    /// `runs` are formatting spans: bold spans measure with the bold face,
    /// code spans with Courier. Empty text yields a single empty line so
    /// that measured height never collapses to zero.
    pub fn break_into_lines(
        &self,
        font_context: &FontContext,
        text: &str,
        runs: &[TextFormat],
        style: &TextStyle,
        max_width: f64,
    ) -> LineBreakdown {
        let chars: Vec<char> = text.chars().collect();
        let line_height = style.line_box();
        if chars.is_empty() {
            return LineBreakdown {
                lines: vec![LineMetric {
                    start: 0,
                    end: 0,
                    width: 0.0,
                    height: line_height,
                }],
            };
        }

        let widths = self.measure_chars(font_context, &chars, runs, style);
        let opportunities = compute_break_opportunities(text);

        let mut lines = Vec::new();
        let mut start = 0usize;
        let mut width = 0.0;
        let mut last_break: Option<usize> = None;
        let make_line = |start: usize, end: usize| LineMetric {
            start,
            end,
            width: visible_width(&chars[start..end], &widths[start..end]),
            height: line_height,
        };

        for i in 0..chars.len() {
            if i > start {
                match opportunities[i] {
                    Some(BreakOpportunity::Mandatory) => {
                        lines.push(make_line(start, i));
                        start = i;
                        width = 0.0;
                        last_break = None;
                    }
                    Some(BreakOpportunity::Allowed) => last_break = Some(i),
                    None => {}
                }
            }

            let ch = chars[i];
            if ch.is_whitespace() {
                // Spaces hang past the margin; newlines are zero width.
                width += widths[i];
                continue;
            }

            let w = widths[i];
            while width + w > max_width && i > start {
                match last_break.filter(|&b| b > start) {
                    Some(b) => {
                        lines.push(make_line(start, b));
                        width = visible_width(&chars[b..i], &widths[b..i]);
                        start = b;
                    }
                    None => {
                        // No opportunity on this line: break inside the word.
                        lines.push(make_line(start, i));
                        width = 0.0;
                        start = i;
                    }
                }
                last_break = None;
            }
            width += w;
        }

        lines.push(make_line(start, chars.len()));
        LineBreakdown { lines }
    }

    fn measure_chars(
        &self,
        font_context: &FontContext,
        chars: &[char],
        runs: &[TextFormat],
        style: &TextStyle,
    ) -> Vec<f64> {
        chars
            .iter()
            .enumerate()
            .map(|(i, &ch)| {
                let covering = |kind: FormatKind| {
                    runs.iter()
                        .any(|r| r.format == kind && r.start <= i && i < r.end)
                };
                let weight = if covering(FormatKind::Bold) {
                    700
                } else {
                    style.weight
                };
                let italic = style.italic || covering(FormatKind::Italic);
                let family = if covering(FormatKind::Code) {
                    "Courier"
                } else {
                    style.family
                };
                font_context.char_width(ch, family, weight, italic, style.font_size)
            })
            .collect()
    }
}

/// Width of a line without its trailing whitespace.
fn visible_width(chars: &[char], widths: &[f64]) -> f64 {
    let visible = chars
        .iter()
        .rposition(|c| !c.is_whitespace())
        .map(|p| p + 1)
        .unwrap_or(0);
    widths[..visible].iter().sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx() -> FontContext {
        FontContext::new()
    }

    fn style() -> TextStyle<'static> {
        TextStyle {
            family: "Helvetica",
            font_size: 12.0,
            weight: 400,
            italic: false,
            line_height: 1.2,
        }
    }

    fn assert_covers(text: &str, breakdown: &LineBreakdown) {
        let n = text.chars().count();
        assert_eq!(breakdown.lines.first().map(|l| l.start), Some(0));
        assert_eq!(breakdown.lines.last().map(|l| l.end), Some(n));
        for pair in breakdown.lines.windows(2) {
            assert_eq!(pair[0].end, pair[1].start, "lines must be contiguous");
        }
    }

    #[test]
    fn test_single_line() {
        let tl = TextLayout::new();
        let text = "Hello World";
        let b = tl.break_into_lines(&ctx(), text, &[], &style(), 200.0);
        assert_eq!(b.lines.len(), 1);
        assert_covers(text, &b);
        assert!((b.total_height() - 14.4).abs() < 1e-9);
    }

    #[test]
    fn test_line_break_at_space() {
        let tl = TextLayout::new();
        let text = "Hello World";
        let b = tl.break_into_lines(&ctx(), text, &[], &style(), 40.0);
        assert_eq!(b.lines.len(), 2);
        // The space stays on the first line.
        assert_eq!(b.lines[0].end, 6);
        assert_covers(text, &b);
        assert!(b.lines[0].width <= 40.0);
    }

    #[test]
    fn test_explicit_newline() {
        let tl = TextLayout::new();
        let text = "Line one\nLine two\n\nLine four";
        let b = tl.break_into_lines(&ctx(), text, &[], &style(), 500.0);
        assert_eq!(b.lines.len(), 4);
        assert_eq!(b.lines[0].end, 9);
        assert_eq!(b.lines[2].start, 18);
        assert_eq!(b.lines[2].end, 19);
        assert_covers(text, &b);
    }

    #[test]
    fn test_empty_string() {
        let tl = TextLayout::new();
        let b = tl.break_into_lines(&ctx(), "", &[], &style(), 100.0);
        assert_eq!(b.lines.len(), 1);
        assert_eq!((b.lines[0].start, b.lines[0].end), (0, 0));
    }

    #[test]
    fn test_long_word_forced_break() {
        let tl = TextLayout::new();
        let text = "Supercalifragilisticexpialidocious";
        let b = tl.break_into_lines(&ctx(), text, &[], &style(), 50.0);
        assert!(b.lines.len() > 1);
        assert_covers(text, &b);
        for line in &b.lines {
            assert!(line.width <= 50.0 + 1e-9);
        }
    }

    #[test]
    fn test_bold_run_wraps_sooner() {
        let tl = TextLayout::new();
        let text = "Make the bold words count here";
        let n = text.chars().count();
        let plain = tl.break_into_lines(&ctx(), text, &[], &style(), 120.0);
        let bold = [TextFormat {
            start: 0,
            end: n,
            format: FormatKind::Bold,
            value: None,
        }];
        let heavy = tl.break_into_lines(&ctx(), text, &bold, &style(), 120.0);
        assert!(heavy.lines.len() >= plain.lines.len());
        assert!(heavy.lines[0].width > 0.0);
    }

    #[test]
    fn test_multibyte_text_indices_are_chars() {
        let tl = TextLayout::new();
        let text = "café crème brûlée à la carte";
        let b = tl.break_into_lines(&ctx(), text, &[], &style(), 60.0);
        assert_covers(text, &b);
    }

    #[test]
    fn test_fit_count_and_cut() {
        let tl = TextLayout::new();
        let text = "one two three four five six seven eight";
        let b = tl.break_into_lines(&ctx(), text, &[], &style(), 40.0);
        assert!(b.lines.len() >= 3);
        assert_eq!(b.fit_count(14.4 * 2.0), 2);
        assert_eq!(b.fit_count(10.0), 0);
        assert_eq!(b.cut_index(2), b.lines[2].start);
        assert_eq!(b.cut_index(0), 0);
    }
}
