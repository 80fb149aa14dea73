// Word selection and font sizing.
//
// Ranks words by value (stable, so ties keep input order), caps the list to
// what the container can plausibly hold, and maps each value onto a target
// font size. Sizing uses sqrt(ratio) so one dominant value doesn't dwarf
// the rest of the cloud.

use serde::{Deserialize, Serialize};

use super::{Diagnostic, DropReason, LayoutConfig};

/// Canvas area budgeted per word when capping the list.
const AREA_PER_WORD_PX: u64 = 2000;
/// The heaviest few words get a small size boost.
const BOOSTED_WORDS: usize = 3;
const IMPORTANCE_BOOST: f64 = 1.05;

const BASE_MIN_FONT_PX: f64 = 12.0;
const BASE_MAX_FONT_PX: f64 = 32.0;
const MIN_FONT_WIDTH_RATIO: f64 = 0.02;
const MAX_FONT_WIDTH_RATIO: f64 = 0.05;
/// Word count at which density shrinking would reach zero (before the floor).
const DENSITY_WORD_SCALE: f64 = 120.0;
const DENSITY_FLOOR: f64 = 0.8;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sentiment {
    Positive,
    Negative,
    Neutral,
}

/// One weighted input item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WordDatum {
    pub text: String,
    pub value: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sentiment: Option<Sentiment>,
}

impl WordDatum {
    pub fn new(text: impl Into<String>, value: f64) -> Self {
        Self { text: text.into(), value, sentiment: None }
    }

    pub fn with_sentiment(mut self, sentiment: Sentiment) -> Self {
        self.sentiment = Some(sentiment);
        self
    }
}

/// A word that survived selection, with its starting font size.
#[derive(Debug, Clone, PartialEq)]
pub struct SizedWord<'w> {
    pub word: &'w WordDatum,
    pub source_index: usize,
    /// Sanitised value: negative or non-finite inputs become 0.
    pub value: f64,
    pub target_font_px: f64,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Selection<'w> {
    /// Descending value order.
    pub words: Vec<SizedWord<'w>>,
    /// Words excluded before placement (blank text, over capacity).
    pub rejected: Vec<Diagnostic>,
}

fn sanitize_value(value: f64) -> f64 {
    if value.is_finite() { value.max(0.0) } else { 0.0 }
}

/// How many words the container admits: the configured cap, further limited by area.
fn capacity(cfg: &LayoutConfig) -> usize {
    let by_area = usize::try_from(cfg.area() / AREA_PER_WORD_PX).unwrap_or(usize::MAX);
    cfg.max_words.min(by_area)
}

fn clamp_font(size: f64, cfg: &LayoutConfig) -> f64 {
    let size = cfg.min_font_px.map_or(size, |min| size.max(min));
    cfg.max_font_px.map_or(size, |max| size.min(max))
}

/// Filter, rank, cap and size the input words.
pub fn select_and_size<'w>(words: &'w [WordDatum], cfg: &LayoutConfig) -> Selection<'w> {
    if words.is_empty() || cfg.area() == 0 {
        return Selection::default();
    }

    let mut rejected = Vec::new();
    let mut ranked: Vec<(usize, &'w WordDatum, f64)> = Vec::with_capacity(words.len());
    for (idx, word) in words.iter().enumerate() {
        if word.text.trim().is_empty() {
            rejected.push(Diagnostic::new(word, idx, DropReason::Ignored));
        } else {
            ranked.push((idx, word, sanitize_value(word.value)));
        }
    }

    // sort_by is stable: equal values keep input order.
    ranked.sort_by(|a, b| b.2.total_cmp(&a.2));

    let cap = capacity(cfg);
    if ranked.len() > cap {
        rejected.extend(
            ranked
                .drain(cap..)
                .map(|(idx, word, _)| Diagnostic::new(word, idx, DropReason::OverCapacity)),
        );
    }
    if ranked.is_empty() {
        return Selection { words: Vec::new(), rejected };
    }

    let (min_value, max_value) = ranked
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), (_, _, v)| (lo.min(*v), hi.max(*v)));

    let count = ranked.len() as f64;
    let density = (1.0 - count / DENSITY_WORD_SCALE).max(DENSITY_FLOOR);
    let min_size = (cfg.width() * MIN_FONT_WIDTH_RATIO).max(BASE_MIN_FONT_PX) * density;
    let max_size = (cfg.width() * MAX_FONT_WIDTH_RATIO).min(BASE_MAX_FONT_PX) * density;

    let sized = ranked
        .into_iter()
        .enumerate()
        .map(|(rank, (source_index, word, value))| {
            let ratio = if max_value > min_value {
                (value - min_value) / (max_value - min_value)
            } else {
                1.0
            };
            let importance = if rank < BOOSTED_WORDS { IMPORTANCE_BOOST } else { 1.0 };
            let size = (min_size + ratio.sqrt() * (max_size - min_size)) * importance;
            SizedWord { word, source_index, value, target_font_px: clamp_font(size, cfg) }
        })
        .collect();

    Selection { words: sized, rejected }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    fn make(items: &[(&str, f64)]) -> Vec<WordDatum> {
        items.iter().map(|(t, v)| WordDatum::new(*t, *v)).collect()
    }

    #[test]
    fn test_empty_and_zero_area() {
        let cfg = LayoutConfig::default();
        assert_eq!(select_and_size(&[], &cfg), Selection::default());

        let words = make(&[("a", 1.0)]);
        let flat = LayoutConfig::with_container(500, 0);
        assert_eq!(select_and_size(&words, &flat), Selection::default());
    }

    #[test]
    fn test_sorted_descending_with_stable_ties() {
        let words = make(&[("b", 2.0), ("x", 5.0), ("c", 2.0), ("y", 5.0)]);
        let sel = select_and_size(&words, &LayoutConfig::default());
        let order: Vec<&str> = sel.words.iter().map(|w| w.word.text.as_str()).collect();
        assert_eq!(order, vec!["x", "y", "b", "c"]);
        assert_eq!(sel.words[0].source_index, 1);
    }

    #[test]
    fn test_cap_uses_container_area() {
        // 120 * 100 / 2000 = 6
        let words: Vec<WordDatum> = (0..10).map(|i| WordDatum::new(format!("w{i}"), f64::from(i))).collect();
        let sel = select_and_size(&words, &LayoutConfig::with_container(120, 100));

        assert_eq!(sel.words.len(), 6);
        assert_eq!(sel.rejected.len(), 4);
        assert!(sel.rejected.iter().all(|d| d.reason == DropReason::OverCapacity));
        // the lightest words are the ones cut
        let cut: Vec<usize> = sel.rejected.iter().map(|d| d.source_index).collect();
        assert_eq!(cut, vec![3, 2, 1, 0]);
    }

    #[test]
    fn test_cap_uses_max_words() {
        let words: Vec<WordDatum> = (0..10).map(|i| WordDatum::new(format!("w{i}"), 1.0)).collect();
        let cfg = LayoutConfig { max_words: 3, ..LayoutConfig::default() };
        assert_eq!(select_and_size(&words, &cfg).words.len(), 3);
    }

    #[test]
    fn test_equal_values_use_max_size_and_boost_top_three() {
        let words = make(&[("a", 1.0), ("b", 1.0), ("c", 1.0), ("d", 1.0)]);
        let sel = select_and_size(&words, &LayoutConfig::default());

        // width 800: min(32, 40) scaled by density for 4 words
        let max_size = 32.0 * (1.0 - 4.0 / 120.0);
        assert!(approx(sel.words[0].target_font_px, max_size * 1.05));
        assert!(approx(sel.words[2].target_font_px, max_size * 1.05));
        assert!(approx(sel.words[3].target_font_px, max_size));
    }

    #[test]
    fn test_sqrt_scaling_compresses_range() {
        let words = make(&[("top", 100.0), ("mid", 25.0), ("low", 0.0)]);
        let sel = select_and_size(&words, &LayoutConfig::default());

        let density = 1.0 - 3.0 / 120.0;
        let (min_size, max_size) = (16.0 * density, 32.0 * density);
        // ratio 0.25 -> sqrt 0.5, halfway between min and max
        assert!(approx(sel.words[1].target_font_px, (min_size + 0.5 * (max_size - min_size)) * 1.05));
        assert!(approx(sel.words[2].target_font_px, min_size * 1.05));
        assert!(approx(sel.words[0].target_font_px, max_size * 1.05));
    }

    #[test]
    fn test_density_factor_has_floor() {
        let words: Vec<WordDatum> = (0..50).map(|i| WordDatum::new(format!("w{i}"), 1.0)).collect();
        let sel = select_and_size(&words, &LayoutConfig::with_container(1000, 1000));
        // 1 - 50/120 < 0.8, so the floor applies
        assert!(approx(sel.words[49].target_font_px, 32.0 * 0.8));
    }

    #[test]
    fn test_negative_and_nan_values_count_as_zero() {
        let words = make(&[("neg", -5.0), ("nan", f64::NAN), ("pos", 2.0)]);
        let sel = select_and_size(&words, &LayoutConfig::default());
        assert_eq!(sel.words[0].word.text, "pos");
        assert_eq!(sel.words[1].value, 0.0);
        assert_eq!(sel.words[2].value, 0.0);
        // ties keep input order
        assert_eq!(sel.words[1].word.text, "neg");
    }

    #[test]
    fn test_blank_text_is_ignored() {
        let words = make(&[("  ", 9.0), ("kept", 1.0)]);
        let sel = select_and_size(&words, &LayoutConfig::default());
        assert_eq!(sel.words.len(), 1);
        assert_eq!(
            sel.rejected,
            vec![Diagnostic { text: "  ".to_string(), source_index: 0, reason: DropReason::Ignored }]
        );
    }

    #[test]
    fn test_font_bounds_clamp_sizes() {
        let words = make(&[("big", 100.0), ("small", 1.0)]);
        let cfg = LayoutConfig { min_font_px: Some(20.0), max_font_px: Some(24.0), ..LayoutConfig::default() };
        let sel = select_and_size(&words, &cfg);
        assert!(approx(sel.words[0].target_font_px, 24.0));
        assert!(approx(sel.words[1].target_font_px, 20.0));
    }
}
