//! Request and output types for the front-end.
//!
//! The browser sends a JSON request, and gets back the placements plus
//! diagnostics as JSON ready to render.

use serde::{Deserialize, Serialize};

use crate::error::LayoutError;
use crate::layout::{
    Diagnostic, LayoutConfig, LayoutOutcome, Placement, PlacementStrategy, Sentiment, TextMetrics, WordDatum, layout,
};

/// `{"words": [...], "config": {...}}`; a missing config means all defaults.
#[derive(Debug, Clone, Deserialize)]
pub struct LayoutRequest {
    pub words: Vec<WordDatum>,
    #[serde(default)]
    pub config: LayoutConfig,
}

/// A placed word ready for the front-end to draw
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlacementOutput {
    pub text: String,
    pub value: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sentiment: Option<Sentiment>,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub font_size_px: f64,
    /// CSS color string
    pub color: String,
    pub rotation_deg: f64,
    /// Index into the request's `words`
    pub source_index: usize,
    /// "spiral" or "grid_fallback"
    pub strategy: PlacementStrategy,
}

impl From<&Placement<'_>> for PlacementOutput {
    fn from(p: &Placement<'_>) -> Self {
        Self {
            text: p.word.text.clone(),
            value: p.word.value,
            sentiment: p.word.sentiment,
            x: p.x,
            y: p.y,
            width: p.width,
            height: p.height,
            font_size_px: p.font_size_px,
            color: p.color.clone(),
            rotation_deg: p.rotation_deg,
            source_index: p.source_index,
            strategy: p.strategy,
        }
    }
}

/// The combined output sent to the front-end
#[derive(Debug, Clone, Serialize)]
pub struct LayoutOutput {
    pub placements: Vec<PlacementOutput>,
    /// Words that were not placed, and why
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub diagnostics: Vec<Diagnostic>,
}

impl From<&LayoutOutcome<'_>> for LayoutOutput {
    fn from(outcome: &LayoutOutcome<'_>) -> Self {
        Self {
            placements: outcome.placements.iter().map(PlacementOutput::from).collect(),
            diagnostics: outcome.diagnostics.clone(),
        }
    }
}

/// Decode a request, validate its config, lay it out and encode the result.
pub fn layout_json<M: TextMetrics + ?Sized>(request: &str, metrics: &M) -> Result<String, LayoutError> {
    let request: LayoutRequest = serde_json::from_str(request).map_err(LayoutError::Request)?;
    request.config.validate()?;

    let outcome = layout(&request.words, &request.config, metrics);
    serde_json::to_string(&LayoutOutput::from(&outcome)).map_err(LayoutError::Encode)
}
