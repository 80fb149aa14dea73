//! Deterministic word cloud layout.
//!
//! Given weighted words, a container and a text metrics oracle, [`layout`]
//! computes non-overlapping placements (position, size, color). Heavier
//! words are placed first, near the center, by an expanding spiral search.
//! Words the spiral cannot fit go through a coarse grid scan, and words that
//! fit nowhere are dropped and reported in the outcome's diagnostics.
//!
//! ```
//! use wordcloud_core::{layout, HeuristicMetrics, LayoutConfig, WordDatum};
//!
//! let words = vec![WordDatum::new("algebra", 12.0), WordDatum::new("essays", 4.0)];
//! let outcome = layout(&words, &LayoutConfig::default(), &HeuristicMetrics);
//! assert_eq!(outcome.placements.len(), 2);
//! assert_eq!(outcome.placements[0].word.text, "algebra");
//! ```

pub mod error;
pub mod layout;
pub mod output;
#[cfg(target_arch = "wasm32")]
mod wasm;

pub use error::{ConfigError, LayoutError};
pub use layout::{
    ColorScheme, Diagnostic, DropReason, HeuristicMetrics, LayoutConfig, LayoutOutcome, Measurement, Placement,
    PlacementStrategy, Rect, Sentiment, TextMetrics, WordDatum, layout,
};
pub use output::{LayoutOutput, LayoutRequest, PlacementOutput, layout_json};
