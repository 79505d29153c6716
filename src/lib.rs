//! # Deckflow
//!
//! A slide-native layout engine.
//!
//! Documents that flow onto pages can grow forever and be sliced later.
//! Slides can't: every slide is a fixed canvas, and content that doesn't
//! fit has to become a *new* slide that still reads as part of the same
//! story. Deckflow measures content with real font metrics, places it
//! into the canvas, and when it overflows, splits it at a clean boundary
//! and carries the rest onto continuation slides.
//!
//! ## Architecture
//!
//! ```text
//! Input (Deck JSON)
//!       ↓
//!   [model]     Slides, sections, elements, directives
//!       ↓
//!   [metrics]   Size every element (text, image, list, table, code)
//!       ↓
//!   [layout]    Zone-based or section-based positioning
//!       ↓
//!   [overflow]  Detect, split, continue, finalize
//!       ↓
//! Output (finalized slides with renderable elements)
//! ```

pub mod config;
pub mod directive;
pub mod error;
pub mod font;
pub mod image_loader;
pub mod layout;
pub mod metrics;
pub mod model;
pub mod overflow;
pub mod text;

use serde::Serialize;

pub use config::EngineConfig;
pub use error::DeckError;
use font::FontContext;
use layout::PositionCalculator;
use metrics::{AspectRatioCache, Measurer};
use model::{Deck, Slide};
use overflow::OverflowManager;

/// Everything measurement reads: configuration, fonts, and image aspect
/// ratios. Immutable once built, so one context can serve many threads.
pub struct EngineContext {
    pub config: EngineConfig,
    pub fonts: FontContext,
    pub images: AspectRatioCache,
}

impl EngineContext {
    pub fn new(config: EngineConfig) -> Self {
        Self {
            config,
            fonts: FontContext::new(),
            images: AspectRatioCache::new(),
        }
    }

    /// Build a context from a deck's config, registering its custom fonts.
    pub fn from_deck(deck: &Deck) -> Result<Self, DeckError> {
        let mut ctx = Self::new(deck.config.clone());
        for font in &deck.fonts {
            ctx.fonts
                .register_base64(&font.family, font.weight, font.italic, &font.src)?;
            log::debug!("registered font {} {} italic={}", font.family, font.weight, font.italic);
        }
        Ok(ctx)
    }
}

impl Default for EngineContext {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

/// Lay out and paginate one slide into one or more Finalized slides.
pub fn paginate(slide: &Slide, ctx: &EngineContext) -> Result<Vec<Slide>, DeckError> {
    let measurer = Measurer::new(&ctx.fonts, &ctx.images, &ctx.config);
    OverflowManager::new(PositionCalculator::new(measurer)).paginate(slide)
}

/// Paginate every slide of a deck, in order.
pub fn paginate_deck(deck: &Deck) -> Result<Vec<Slide>, DeckError> {
    let ctx = EngineContext::from_deck(deck)?;
    let mut out = Vec::with_capacity(deck.slides.len());
    for slide in &deck.slides {
        out.extend(paginate(slide, &ctx)?);
    }
    Ok(out)
}

#[derive(Serialize)]
struct PaginatedDeck<'a> {
    slides: &'a [Slide],
}

/// Paginate a deck given as JSON, returning `{ "slides": [...] }` JSON.
pub fn paginate_json(json: &str) -> Result<String, DeckError> {
    let deck: Deck = serde_json::from_str(json)?;
    let slides = paginate_deck(&deck)?;
    Ok(serde_json::to_string(&PaginatedDeck { slides: &slides })?)
}
