//! # Directives
//!
//! Authored `key=value` hints attached to sections and elements. Values
//! arrive as loosely typed JSON (strings, numbers, booleans); the accessors
//! here parse them into typed values on demand. A value that does not parse
//! is treated as absent, never as an error: layout falls back to defaults.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Keys layout and rendering understand. Others pass through untouched.
pub const KNOWN_KEYS: &[&str] = &[
    "width",
    "height",
    "align",
    "valign",
    "background",
    "color",
    "fontsize",
    "padding",
    "gap",
    "fill",
    "border",
];

/// Keys an element picks up from its enclosing section when it has none.
const INHERITED_KEYS: &[&str] = &["align", "fontsize", "color"];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DirectiveValue {
    Bool(bool),
    Number(f64),
    Text(String),
}

impl From<&str> for DirectiveValue {
    fn from(s: &str) -> Self {
        DirectiveValue::Text(s.to_string())
    }
}

impl From<f64> for DirectiveValue {
    fn from(v: f64) -> Self {
        DirectiveValue::Number(v)
    }
}

impl From<bool> for DirectiveValue {
    fn from(v: bool) -> Self {
        DirectiveValue::Bool(v)
    }
}

/// An ordered directive map. Ordered so output is byte-stable.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Directives(BTreeMap<String, DirectiveValue>);

impl Directives {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert, mostly for tests and synthesized elements.
    pub fn with(mut self, key: &str, value: impl Into<DirectiveValue>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert(&mut self, key: &str, value: impl Into<DirectiveValue>) {
        self.0.insert(key.to_string(), value.into());
    }

    pub fn remove(&mut self, key: &str) -> Option<DirectiveValue> {
        self.0.remove(key)
    }

    pub fn get(&self, key: &str) -> Option<&DirectiveValue> {
        self.0.get(key)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn width(&self) -> Option<Dimension> {
        self.get("width").and_then(Dimension::parse)
    }

    pub fn height(&self) -> Option<Dimension> {
        self.get("height").and_then(Dimension::parse)
    }

    pub fn align(&self) -> Option<Alignment> {
        self.text("align").and_then(Alignment::parse)
    }

    pub fn valign(&self) -> Option<VerticalAlignment> {
        self.text("valign").and_then(VerticalAlignment::parse)
    }

    pub fn fontsize(&self) -> Option<f64> {
        self.number("fontsize").filter(|v| *v > 0.0)
    }

    pub fn padding(&self) -> Option<f64> {
        self.number("padding").filter(|v| *v >= 0.0)
    }

    pub fn gap(&self) -> Option<f64> {
        self.number("gap").filter(|v| *v >= 0.0)
    }

    pub fn fill(&self) -> bool {
        match self.get("fill") {
            Some(DirectiveValue::Bool(b)) => *b,
            Some(DirectiveValue::Text(s)) => {
                matches!(s.trim().to_ascii_lowercase().as_str(), "true" | "yes" | "1")
            }
            Some(DirectiveValue::Number(n)) => *n != 0.0,
            None => false,
        }
    }

    pub fn color(&self) -> Option<Color> {
        self.text("color").and_then(Color::parse)
    }

    pub fn background(&self) -> Option<Color> {
        self.text("background").and_then(Color::parse)
    }

    pub fn border(&self) -> Option<Border> {
        self.text("border").and_then(Border::parse)
    }

    /// Border width in points, 0 when there is no usable border.
    pub fn border_width(&self) -> f64 {
        self.border().map(|b| b.width).unwrap_or(0.0)
    }

    /// Fill in inheritable keys from a parent without overriding own values.
    pub fn inherit_from(&mut self, parent: &Directives) {
        for key in INHERITED_KEYS {
            if self.0.contains_key(*key) {
                continue;
            }
            if let Some(value) = parent.get(key) {
                self.0.insert((*key).to_string(), value.clone());
            }
        }
    }

    /// Human-readable problems: unknown keys and known keys whose values
    /// don't parse. Layout logs these and carries on.
    pub fn problems(&self) -> Vec<String> {
        let mut out = Vec::new();
        for (key, value) in &self.0 {
            let ok = match key.as_str() {
                "width" | "height" => Dimension::parse(value).is_some(),
                "align" => self.align().is_some(),
                "valign" => self.valign().is_some(),
                "color" => self.color().is_some(),
                "background" => self.background().is_some(),
                "border" => self.border().is_some(),
                "fontsize" => self.fontsize().is_some(),
                "padding" => self.padding().is_some(),
                "gap" => self.gap().is_some(),
                "fill" => true,
                _ => {
                    out.push(format!("unknown directive '{}'", key));
                    continue;
                }
            };
            if !ok {
                out.push(format!("invalid value {:?} for directive '{}'", value, key));
            }
        }
        out
    }

    fn text(&self, key: &str) -> Option<&str> {
        match self.get(key) {
            Some(DirectiveValue::Text(s)) => Some(s.as_str()),
            _ => None,
        }
    }

    fn number(&self, key: &str) -> Option<f64> {
        let v = match self.get(key)? {
            DirectiveValue::Number(n) => *n,
            DirectiveValue::Text(s) => s.trim().trim_end_matches("pt").trim().parse().ok()?,
            DirectiveValue::Bool(_) => return None,
        };
        v.is_finite().then_some(v)
    }
}

/// A width or height request.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Dimension {
    /// Share of the parent dimension, in (0, 1].
    Fraction(f64),
    /// Percentage of the parent dimension.
    Percent(f64),
    /// Fixed size in points.
    Points(f64),
}

impl Dimension {
    /// Parse `"n/d"`, `"n%"`, `"300"`, `"300pt"`, or a bare number. Bare
    /// numbers up to 1 are fractions; larger ones are points.
    pub fn parse(value: &DirectiveValue) -> Option<Dimension> {
        let dim = match value {
            DirectiveValue::Number(n) => Self::from_number(*n),
            DirectiveValue::Text(s) => Self::parse_str(s.trim()),
            DirectiveValue::Bool(_) => None,
        }?;
        let inner = match dim {
            Dimension::Fraction(v) | Dimension::Percent(v) | Dimension::Points(v) => v,
        };
        (inner.is_finite() && inner > 0.0).then_some(dim)
    }

    fn from_number(n: f64) -> Option<Dimension> {
        if n <= 1.0 {
            Some(Dimension::Fraction(n))
        } else {
            Some(Dimension::Points(n))
        }
    }

    fn parse_str(s: &str) -> Option<Dimension> {
        if let Some((num, den)) = s.split_once('/') {
            let num: f64 = num.trim().parse().ok()?;
            let den: f64 = den.trim().parse().ok()?;
            if den == 0.0 {
                return None;
            }
            return Some(Dimension::Fraction(num / den));
        }
        if let Some(p) = s.strip_suffix('%') {
            return Some(Dimension::Percent(p.trim().parse().ok()?));
        }
        let n: f64 = s.trim_end_matches("pt").trim().parse().ok()?;
        Self::from_number(n)
    }

    /// Resolve against the parent's corresponding dimension.
    pub fn resolve(&self, parent: f64) -> f64 {
        match self {
            Dimension::Fraction(f) => parent * f,
            Dimension::Percent(p) => parent * p / 100.0,
            Dimension::Points(v) => *v,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Alignment {
    #[default]
    Left,
    Center,
    Right,
}

impl Alignment {
    pub fn parse(s: &str) -> Option<Alignment> {
        match s.trim().to_ascii_lowercase().as_str() {
            "left" | "start" => Some(Alignment::Left),
            "center" | "centre" => Some(Alignment::Center),
            "right" | "end" => Some(Alignment::Right),
            _ => None,
        }
    }

    /// Offset of a child of `inner` width inside `outer`.
    pub fn offset(&self, outer: f64, inner: f64) -> f64 {
        let free = (outer - inner).max(0.0);
        match self {
            Alignment::Left => 0.0,
            Alignment::Center => free / 2.0,
            Alignment::Right => free,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum VerticalAlignment {
    #[default]
    Top,
    Middle,
    Bottom,
}

impl VerticalAlignment {
    pub fn parse(s: &str) -> Option<VerticalAlignment> {
        match s.trim().to_ascii_lowercase().as_str() {
            "top" => Some(VerticalAlignment::Top),
            "middle" | "center" => Some(VerticalAlignment::Middle),
            "bottom" => Some(VerticalAlignment::Bottom),
            _ => None,
        }
    }

    pub fn offset(&self, outer: f64, inner: f64) -> f64 {
        let free = (outer - inner).max(0.0);
        match self {
            VerticalAlignment::Top => 0.0,
            VerticalAlignment::Middle => free / 2.0,
            VerticalAlignment::Bottom => free,
        }
    }
}

const NAMED_COLORS: &[&str] = &[
    "black", "white", "red", "green", "blue", "yellow", "orange", "purple", "pink", "gray",
    "grey", "silver", "navy", "teal", "maroon", "olive", "lime", "aqua", "fuchsia",
    "transparent",
];

const THEME_COLORS: &[&str] = &[
    "TEXT1",
    "TEXT2",
    "BACKGROUND1",
    "BACKGROUND2",
    "ACCENT1",
    "ACCENT2",
    "ACCENT3",
    "ACCENT4",
    "ACCENT5",
    "ACCENT6",
    "HYPERLINK",
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Color {
    /// Normalized to `#RRGGBB`.
    Hex(String),
    Named(String),
    Theme(String),
}

impl Color {
    pub fn parse(s: &str) -> Option<Color> {
        let s = s.trim();
        if let Some(hex) = s.strip_prefix('#') {
            if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
                return None;
            }
            let full = match hex.len() {
                3 => hex.chars().flat_map(|c| [c, c]).collect::<String>(),
                6 => hex.to_string(),
                _ => return None,
            };
            return Some(Color::Hex(format!("#{}", full.to_ascii_uppercase())));
        }
        let upper = s.to_ascii_uppercase();
        if THEME_COLORS.contains(&upper.as_str()) {
            return Some(Color::Theme(upper));
        }
        let lower = s.to_ascii_lowercase();
        if NAMED_COLORS.contains(&lower.as_str()) {
            return Some(Color::Named(lower));
        }
        None
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum BorderStyle {
    #[default]
    Solid,
    Dashed,
    Dotted,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Border {
    pub width: f64,
    pub style: BorderStyle,
    pub color: Option<Color>,
}

impl Border {
    /// Parse `"1pt solid #FF0000"`; parts may come in any order. A bare
    /// style or color implies a 1pt border.
    pub fn parse(s: &str) -> Option<Border> {
        let mut border = Border {
            width: 1.0,
            style: BorderStyle::Solid,
            color: None,
        };
        let mut recognized = false;
        for part in s.split_whitespace() {
            let lower = part.to_ascii_lowercase();
            if let Ok(w) = lower.trim_end_matches("pt").trim_end_matches("px").parse::<f64>() {
                if !w.is_finite() || w < 0.0 {
                    return None;
                }
                border.width = w;
            } else if lower == "solid" {
                border.style = BorderStyle::Solid;
            } else if lower == "dashed" {
                border.style = BorderStyle::Dashed;
            } else if lower == "dotted" {
                border.style = BorderStyle::Dotted;
            } else if lower == "none" {
                border.width = 0.0;
            } else if let Some(color) = Color::parse(part) {
                border.color = Some(color);
            } else {
                return None;
            }
            recognized = true;
        }
        recognized.then_some(border)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dimension_grammar() {
        let d = |v: DirectiveValue| Dimension::parse(&v);
        assert_eq!(d("1/3".into()), Some(Dimension::Fraction(1.0 / 3.0)));
        assert_eq!(d("50%".into()), Some(Dimension::Percent(50.0)));
        assert_eq!(d("300".into()), Some(Dimension::Points(300.0)));
        assert_eq!(d("120pt".into()), Some(Dimension::Points(120.0)));
        assert_eq!(d(0.5.into()), Some(Dimension::Fraction(0.5)));
        assert_eq!(d(200.0.into()), Some(Dimension::Points(200.0)));
    }

    #[test]
    fn test_dimension_rejects_degenerate_values() {
        let d = |v: DirectiveValue| Dimension::parse(&v);
        assert_eq!(d("1/0".into()), None);
        assert_eq!(d("0".into()), None);
        assert_eq!(d("-20%".into()), None);
        assert_eq!(d(f64::NAN.into()), None);
        assert_eq!(d(true.into()), None);
        assert_eq!(d("wide".into()), None);
    }

    #[test]
    fn test_dimension_resolve() {
        assert!((Dimension::Fraction(1.0 / 3.0).resolve(720.0) - 240.0).abs() < 1e-9);
        assert_eq!(Dimension::Percent(25.0).resolve(400.0), 100.0);
        assert_eq!(Dimension::Points(90.0).resolve(400.0), 90.0);
    }

    #[test]
    fn test_color_grammar() {
        assert_eq!(Color::parse("#abc"), Some(Color::Hex("#AABBCC".into())));
        assert_eq!(Color::parse("#1a2B3c"), Some(Color::Hex("#1A2B3C".into())));
        assert_eq!(Color::parse("accent2"), Some(Color::Theme("ACCENT2".into())));
        assert_eq!(Color::parse("Navy"), Some(Color::Named("navy".into())));
        assert_eq!(Color::parse("#12"), None);
        assert_eq!(Color::parse("chartreuse-ish"), None);
    }

    #[test]
    fn test_border_grammar() {
        let b = Border::parse("2pt dashed #FF0000").unwrap();
        assert_eq!(b.width, 2.0);
        assert_eq!(b.style, BorderStyle::Dashed);
        assert_eq!(b.color, Some(Color::Hex("#FF0000".into())));

        let b = Border::parse("solid").unwrap();
        assert_eq!(b.width, 1.0);
        assert!(Border::parse("3pt squiggly").is_none());
    }

    #[test]
    fn test_fill_accepts_loose_booleans() {
        assert!(Directives::new().with("fill", true).fill());
        assert!(Directives::new().with("fill", "yes").fill());
        assert!(!Directives::new().with("fill", "no").fill());
        assert!(!Directives::new().fill());
    }

    #[test]
    fn test_inherit_does_not_override() {
        let parent = Directives::new()
            .with("align", "center")
            .with("fontsize", 18.0)
            .with("height", "100");
        let mut child = Directives::new().with("align", "right");
        child.inherit_from(&parent);
        assert_eq!(child.align(), Some(Alignment::Right));
        assert_eq!(child.fontsize(), Some(18.0));
        assert!(child.height().is_none());
    }

    #[test]
    fn test_problems_report_unknown_and_invalid() {
        let d = Directives::new()
            .with("width", "1/0")
            .with("align", "center")
            .with("sparkle", true);
        let problems = d.problems();
        assert_eq!(problems.len(), 2);
        assert!(problems.iter().any(|p| p.contains("sparkle")));
        assert!(problems.iter().any(|p| p.contains("width")));
    }

    #[test]
    fn test_directives_json_roundtrip_is_ordered() {
        let d: Directives =
            serde_json::from_str(r#"{"width": "1/2", "align": "center", "fill": true}"#).unwrap();
        let out = serde_json::to_string(&d).unwrap();
        assert_eq!(out, r#"{"align":"center","fill":true,"width":"1/2"}"#);
    }
}
