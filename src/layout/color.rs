//! Word colors.
//!
//! Stateless: a color depends only on the word's sentiment, its rank in
//! placement order and the configured scheme.

use serde::{Deserialize, Serialize};

use super::Sentiment;

pub const NEGATIVE_COLOR: &str = "#ef4444";
pub const POSITIVE_COLOR: &str = "#10b981";
pub const NEUTRAL_COLOR: &str = "#3b82f6";

/// Golden angle in degrees; consecutive ranks land far apart on the hue wheel.
const GOLDEN_ANGLE_DEG: f64 = 137.508;

pub const PALETTE: [&str; 10] = [
    "#5470c6", "#91cc75", "#fac858", "#ee6666", "#73c0de",
    "#3ba272", "#fc8452", "#9a60b4", "#ea7ccc", "#2f4554",
];

#[derive(Debug, Copy, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorScheme {
    /// Red/green/blue by sentiment.
    Semantic,
    /// Golden-angle hue rotation.
    Gradient,
    /// Cyclic fixed palette.
    #[default]
    Default,
}

pub fn assign_color(sentiment: Option<Sentiment>, index: usize, scheme: ColorScheme) -> String {
    match scheme {
        ColorScheme::Semantic => match sentiment {
            Some(Sentiment::Negative) => NEGATIVE_COLOR,
            Some(Sentiment::Positive) => POSITIVE_COLOR,
            Some(Sentiment::Neutral) | None => NEUTRAL_COLOR,
        }
        .to_string(),
        ColorScheme::Gradient => {
            let hue = (index as f64 * GOLDEN_ANGLE_DEG).rem_euclid(360.0);
            format!("hsl({hue:.1}, 70%, 50%)")
        }
        ColorScheme::Default => PALETTE[index % PALETTE.len()].to_string(),
    }
}
