//! # Engine Configuration
//!
//! Canvas geometry, spacing constants, and pagination limits. Every field
//! has a default so a deck can carry a partial `"config"` object, or none.

use serde::{Deserialize, Serialize};

use crate::error::DeckError;
use crate::model::{Edges, Rect};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EngineConfig {
    pub canvas: CanvasConfig,
    pub spacing: SpacingConfig,
    /// Hard cap on detect/split rounds for one input slide.
    pub max_iterations: usize,
    pub default_aspect_ratio: f64,
    pub min_image_height: f64,
    /// Family used for prose. Code is always set in Courier.
    pub font_family: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            canvas: CanvasConfig::default(),
            spacing: SpacingConfig::default(),
            max_iterations: 32,
            default_aspect_ratio: 16.0 / 9.0,
            min_image_height: 30.0,
            font_family: "Helvetica".to_string(),
        }
    }
}

/// The fixed output rectangle and its margins, in points.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CanvasConfig {
    pub width: f64,
    pub height: f64,
    pub margin: Edges,
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self {
            width: 720.0,
            height: 405.0,
            margin: Edges::uniform(50.0),
        }
    }
}

impl CanvasConfig {
    pub fn content_width(&self) -> f64 {
        self.width - self.margin.horizontal()
    }

    /// The area inside the margins, before header and footer are carved out.
    pub fn content_area(&self) -> Rect {
        Rect {
            x: self.margin.left,
            y: self.margin.top,
            width: self.content_width(),
            height: self.height - self.margin.vertical(),
        }
    }

    pub(crate) fn validate(&self) -> Result<(), DeckError> {
        let area = self.content_area();
        let finite = [self.width, self.height, area.width, area.height]
            .iter()
            .all(|v| v.is_finite());
        if !finite || area.width <= 0.0 || area.height <= 0.0 {
            return Err(DeckError::structural(format!(
                "canvas {}x{} with margins {:?} leaves no body area",
                self.width, self.height, self.margin
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SpacingConfig {
    /// Gap between stacked siblings when no `gap` directive is set.
    pub vertical: f64,
    /// Gap between row children when no `gap` directive is set.
    pub horizontal: f64,
    /// Multiplier applied to the vertical gap between related elements.
    pub related_reduction: f64,
    pub header_to_body: f64,
    pub footer_to_body: f64,
    pub subtitle_gap: f64,
}

impl Default for SpacingConfig {
    fn default() -> Self {
        Self {
            vertical: 10.0,
            horizontal: 0.0,
            related_reduction: 0.7,
            header_to_body: 10.0,
            footer_to_body: 10.0,
            subtitle_gap: 4.0,
        }
    }
}
