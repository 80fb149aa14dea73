//! Text measurement.
//!
//! The engine never rasterises glyphs. Sizes come from a caller-supplied
//! [`TextMetrics`] oracle, typically backed by the platform's font stack.
//! When the oracle has no answer (or a nonsensical one) a character-count
//! heuristic stands in, so layout degrades instead of failing.
//!
//! Every layout call wraps its oracle in a [`MeasureCache`]. The spiral
//! re-measures at each font shrink step and the grid fallback measures once
//! more, so repeated `(text, font)` pairs are common across a run.

use std::hash::{Hash, Hasher};
use std::num::NonZeroUsize;

use lru::LruCache;
use rustc_hash::FxHasher;
use serde::Serialize;

/// Average glyph advance as a fraction of the font size.
pub(crate) const CHAR_WIDTH_EM: f64 = 0.6;
/// Line box height as a fraction of the font size.
pub(crate) const LINE_HEIGHT_EM: f64 = 1.3;

const CACHE_CAPACITY: usize = 1024;

/// Rendered size of a string at one font size, in pixels.
#[derive(Debug, Copy, Clone, PartialEq, Serialize)]
pub struct Measurement {
    pub width: f64,
    pub height: f64,
}

impl Measurement {
    /// Estimate used when no real metrics are available.
    pub fn heuristic(text: &str, font_px: f64) -> Self {
        Self {
            width: text.chars().count() as f64 * font_px * CHAR_WIDTH_EM,
            height: font_px * LINE_HEIGHT_EM,
        }
    }

    fn is_usable(&self) -> bool {
        self.width.is_finite() && self.height.is_finite() && self.width >= 0.0 && self.height >= 0.0
    }
}

/// Reports how large `text` renders at `font_px`.
///
/// Returning `None` means "unavailable"; the engine then falls back to
/// [`Measurement::heuristic`]. Implementations must be deterministic for
/// layouts to be reproducible.
pub trait TextMetrics {
    fn measure(&self, text: &str, font_px: f64) -> Option<Measurement>;
}

impl<F> TextMetrics for F
where
    F: Fn(&str, f64) -> Option<Measurement>,
{
    fn measure(&self, text: &str, font_px: f64) -> Option<Measurement> {
        self(text, font_px)
    }
}

/// Oracle that always answers with the heuristic estimate.
#[derive(Debug, Default, Copy, Clone)]
pub struct HeuristicMetrics;

impl TextMetrics for HeuristicMetrics {
    fn measure(&self, text: &str, font_px: f64) -> Option<Measurement> {
        Some(Measurement::heuristic(text, font_px))
    }
}

/// LRU memoisation in front of a [`TextMetrics`] oracle, scoped to one layout call.
///
/// Keys are 64-bit FxHashes of `(text, font bits)` rather than owned strings.
pub struct MeasureCache<'m, M: TextMetrics + ?Sized> {
    metrics: &'m M,
    cache: LruCache<u64, Measurement>,
    hits: u64,
    misses: u64,
}

impl<'m, M: TextMetrics + ?Sized> MeasureCache<'m, M> {
    pub fn new(metrics: &'m M) -> Self {
        let capacity = NonZeroUsize::new(CACHE_CAPACITY).unwrap_or(NonZeroUsize::MIN);
        Self { metrics, cache: LruCache::new(capacity), hits: 0, misses: 0 }
    }

    /// Measure through the cache, substituting the heuristic for missing or invalid answers.
    pub fn measure(&mut self, text: &str, font_px: f64) -> Measurement {
        let key = hash_key(text, font_px);
        if let Some(&m) = self.cache.get(&key) {
            self.hits += 1;
            return m;
        }

        self.misses += 1;
        let m = self
            .metrics
            .measure(text, font_px)
            .filter(Measurement::is_usable)
            .unwrap_or_else(|| Measurement::heuristic(text, font_px));
        self.cache.put(key, m);
        m
    }

    pub fn hits(&self) -> u64 { self.hits }
    pub fn misses(&self) -> u64 { self.misses }
}

// Only the 64-bit hash is stored, so two (text, size) pairs that collide share
// an entry. Rare enough at this width to leave unchecked.
fn hash_key(text: &str, font_px: f64) -> u64 {
    let mut hasher = FxHasher::default();
    text.hash(&mut hasher);
    font_px.to_bits().hash(&mut hasher);
    hasher.finish()
}
