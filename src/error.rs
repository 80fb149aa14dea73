//! Error types.
//!
//! Layout itself never fails. These only surface at the JSON boundary, where a
//! request can be malformed or carry a config that makes no sense.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("fontShrinkFactor must be in (0, 1], got {0}")]
    ShrinkFactor(f64),

    #[error("fontShrinkEvery must be at least 1")]
    ShrinkInterval,

    #[error("gridStepPx must be positive, got {0}")]
    GridStep(f64),

    #[error("{field} must be a non-negative number, got {value}")]
    Spacing { field: &'static str, value: f64 },

    #[error("{field} must be a positive number, got {value}")]
    FontSize { field: &'static str, value: f64 },

    #[error("minFontPx ({min}) is larger than maxFontPx ({max})")]
    FontBounds { min: f64, max: f64 },
}

#[derive(Debug, Error)]
pub enum LayoutError {
    #[error("invalid layout request: {0}")]
    Request(#[source] serde_json::Error),

    #[error("invalid layout config: {0}")]
    Config(#[from] ConfigError),

    #[error("could not encode layout: {0}")]
    Encode(#[source] serde_json::Error),
}
