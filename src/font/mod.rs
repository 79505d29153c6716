//! # Fonts
//!
//! Advance widths for every face measurement can ask for. Helvetica and
//! Courier are built in; decks may register TrueType/OpenType faces, whose
//! widths are read once with ttf-parser. Nothing is embedded or shaped:
//! layout only needs to know how wide a run of characters is.

pub mod metrics;

pub use metrics::StandardFontMetrics;

use std::collections::HashMap;

use crate::error::DeckError;

/// Faces are stored per family, weight bucket and style.
#[derive(Debug, Clone, Hash, PartialEq, Eq)]
struct FaceKey {
    family: String,
    bold: bool,
    italic: bool,
}

impl FaceKey {
    fn new(family: &str, weight: u32, italic: bool) -> Self {
        Self {
            family: family.trim().to_ascii_lowercase(),
            bold: weight >= 600,
            italic,
        }
    }
}

#[derive(Debug, Clone)]
enum Face {
    Builtin(&'static StandardFontMetrics),
    Custom(CustomFace),
}

impl Face {
    fn char_width(&self, ch: char, font_size: f64) -> f64 {
        match self {
            Face::Builtin(m) => m.char_width(ch, font_size),
            Face::Custom(f) => f.char_width(ch, font_size),
        }
    }
}

/// Horizontal advances of a registered font, in font units.
#[derive(Debug, Clone)]
pub struct CustomFace {
    units_per_em: u16,
    advances: HashMap<char, u16>,
    /// Advance for characters the font has no glyph for.
    missing: u16,
}

impl CustomFace {
    /// Read advances for every Unicode codepoint the font maps.
    pub fn parse(data: &[u8]) -> Option<Self> {
        let face = ttf_parser::Face::parse(data, 0).ok()?;
        let units_per_em = face.units_per_em();
        let cmap = face.tables().cmap?;

        let mut advances = HashMap::new();
        for subtable in cmap.subtables.into_iter().filter(|s| s.is_unicode()) {
            subtable.codepoints(|code| {
                let Some(ch) = char::from_u32(code) else {
                    return;
                };
                if let Some(glyph) = subtable.glyph_index(code) {
                    advances
                        .entry(ch)
                        .or_insert_with(|| face.glyph_hor_advance(glyph).unwrap_or(0));
                }
            });
        }
        if advances.is_empty() {
            return None;
        }

        let missing = advances
            .get(&' ')
            .copied()
            .filter(|w| *w > 0)
            .unwrap_or(units_per_em / 2);
        Some(Self {
            units_per_em,
            advances,
            missing,
        })
    }

    pub fn char_width(&self, ch: char, font_size: f64) -> f64 {
        if ch.is_control() {
            return 0.0;
        }
        let units = self.advances.get(&ch).copied().unwrap_or(self.missing);
        f64::from(units) / f64::from(self.units_per_em) * font_size
    }

    pub fn glyph_count(&self) -> usize {
        self.advances.len()
    }
}

/// Built-in faces plus whatever the deck registered.
///
/// Read-only once the deck's fonts are registered, so one context can be
/// shared across threads paginating different slides.
pub struct FontContext {
    faces: HashMap<FaceKey, Face>,
}

impl Default for FontContext {
    fn default() -> Self {
        Self::new()
    }
}

const SANS: &str = "helvetica";

static FALLBACK: Face = Face::Builtin(&metrics::HELVETICA_METRICS);

impl FontContext {
    pub fn new() -> Self {
        let mut faces = HashMap::new();
        for italic in [false, true] {
            for (family, weight, table) in [
                (SANS, 400, &metrics::HELVETICA_METRICS),
                (SANS, 700, &metrics::HELVETICA_BOLD_METRICS),
                ("courier", 400, &metrics::COURIER_METRICS),
                ("courier", 700, &metrics::COURIER_METRICS),
            ] {
                faces.insert(FaceKey::new(family, weight, italic), Face::Builtin(table));
            }
        }
        Self { faces }
    }

    /// The face used for a request: the exact family, then the same family
    /// upright, then Helvetica at the requested weight.
    fn face(&self, family: &str, weight: u32, italic: bool) -> &Face {
        let candidates = [
            FaceKey::new(family, weight, italic),
            FaceKey::new(family, weight, false),
            FaceKey::new(SANS, weight, italic),
        ];
        candidates
            .iter()
            .find_map(|key| self.faces.get(key))
            .unwrap_or(&FALLBACK)
    }

    /// Advance width of one character, in points.
    pub fn char_width(&self, ch: char, family: &str, weight: u32, italic: bool, font_size: f64) -> f64 {
        self.face(family, weight, italic).char_width(ch, font_size)
    }

    /// Width of a run of characters, in points.
    pub fn measure_string(&self, text: &str, family: &str, weight: u32, italic: bool, font_size: f64) -> f64 {
        let face = self.face(family, weight, italic);
        text.chars().map(|ch| face.char_width(ch, font_size)).sum()
    }

    /// Whether a custom face was registered for exactly this request.
    pub fn has_custom(&self, family: &str, weight: u32, italic: bool) -> bool {
        matches!(
            self.faces.get(&FaceKey::new(family, weight, italic)),
            Some(Face::Custom(_))
        )
    }

    /// Register a font from raw TrueType/OpenType bytes.
    pub fn register(&mut self, family: &str, weight: u32, italic: bool, data: &[u8]) -> Result<(), DeckError> {
        let face = CustomFace::parse(data).ok_or_else(|| {
            DeckError::Font(format!(
                "'{}' ({} {}) is not a usable TrueType/OpenType font",
                family,
                weight,
                if italic { "italic" } else { "normal" }
            ))
        })?;
        log::debug!("font '{}' {}: {} glyphs", family, weight, face.glyph_count());
        self.faces.insert(FaceKey::new(family, weight, italic), Face::Custom(face));
        Ok(())
    }

    /// Register a font given as base64 or as a base64 `data:` URI.
    pub fn register_base64(&mut self, family: &str, weight: u32, italic: bool, src: &str) -> Result<(), DeckError> {
        use base64::Engine;
        let payload = match src.split_once(',') {
            Some((scheme, data)) if scheme.starts_with("data:") => data,
            _ => src,
        };
        let bytes = base64::engine::general_purpose::STANDARD
            .decode(payload.trim())
            .map_err(|e| DeckError::Font(format!("'{}': base64 decode error: {}", family, e)))?;
        self.register(family, weight, italic, &bytes)
    }
}
