//! Image measurement: aspect-ratio-preserving scaling under a width and a
//! height bound.

use std::collections::HashMap;
use std::sync::RwLock;

use crate::config::EngineConfig;
use crate::directive::Directives;
use crate::image_loader;
use crate::model::{ImageContent, Size};

/// Read-through cache of aspect ratios keyed by image URL.
///
/// Read-mostly and thread-safe: one cache can back every slide of a deck,
/// including slides paginated concurrently. Entries are only ever added,
/// and a given URL always maps to the same ratio, so concurrent fills are
/// harmless.
#[derive(Debug, Default)]
pub struct AspectRatioCache {
    ratios: RwLock<HashMap<String, f64>>,
}

impl AspectRatioCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, url: &str) -> Option<f64> {
        match self.ratios.read() {
            Ok(map) => map.get(url).copied(),
            Err(poisoned) => poisoned.into_inner().get(url).copied(),
        }
    }

    pub fn insert(&self, url: &str, ratio: f64) {
        if !(ratio.is_finite() && ratio > 0.0) {
            return;
        }
        let mut map = match self.ratios.write() {
            Ok(map) => map,
            Err(poisoned) => poisoned.into_inner(),
        };
        map.insert(url.to_string(), ratio);
    }

    /// Cached ratio, or the image's intrinsic ratio (cached on success).
    pub fn resolve(&self, url: &str) -> Option<f64> {
        if let Some(ratio) = self.get(url) {
            return Some(ratio);
        }
        let ratio = image_loader::intrinsic_aspect_ratio(url)?;
        self.insert(url, ratio);
        Some(ratio)
    }

    pub fn len(&self) -> usize {
        match self.ratios.read() {
            Ok(map) => map.len(),
            Err(poisoned) => poisoned.into_inner().len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Width over height: explicit, then cache/intrinsic, then the default.
pub fn resolve_aspect_ratio(
    image: &ImageContent,
    cache: &AspectRatioCache,
    config: &EngineConfig,
) -> f64 {
    image
        .aspect_ratio
        .filter(|r| r.is_finite() && *r > 0.0)
        .or_else(|| cache.resolve(&image.url))
        .unwrap_or(config.default_aspect_ratio)
}

pub fn measure_image(
    image: &ImageContent,
    directives: &Directives,
    available_width: f64,
    available_height: f64,
    cache: &AspectRatioCache,
    config: &EngineConfig,
) -> Size {
    let ratio = resolve_aspect_ratio(image, cache, config);

    let max_width = directives
        .width()
        .map(|d| d.resolve(available_width))
        .unwrap_or(available_width)
        .min(available_width);
    let max_height = directives
        .height()
        .map(|d| d.resolve(available_height))
        .unwrap_or(available_height);

    let (mut width, mut height) = if !max_height.is_finite() || max_height <= 0.0 {
        // Height unconstrained: width leads.
        (max_width, max_width / ratio)
    } else {
        let width_led = max_width / ratio;
        if width_led <= max_height {
            (max_width, width_led)
        } else {
            (max_height * ratio, max_height)
        }
    };

    if height < config.min_image_height {
        height = config.min_image_height;
        width = height * ratio;
        if width > available_width {
            log::debug!(
                "image {} inflated to {:.1}pt, clamped to {:.1}pt",
                image.url,
                width,
                available_width
            );
            width = available_width;
        }
    }

    Size { width, height }
}
