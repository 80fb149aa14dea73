// Deterministic word cloud layouter.
//
// Goals:
// - Deterministic: no randomness, no time budgets
// - Priority order: heavier words claim space near the center first
// - No overlap (padded bounding boxes never touch)
// - Graceful degradation: words that fit nowhere are dropped and reported
//
// Submodules:
// - words: selection, ranking and font sizing
// - metrics: text measurement oracle + per-call memoisation
// - spatial_grid: bucketed collision detection
// - spiral_placement: expanding spiral search with font decay
// - fallback_grid: row-major raster scan at minimum font size
// - color: (sentiment, rank, scheme) -> color
//
// Output:
// - LayoutOutcome with placements in placement order + diagnostics for dropped words.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::ConfigError;

mod color;
mod fallback_grid;
mod metrics;
mod spatial_grid;
mod spiral_placement;
mod words;

pub use color::{ColorScheme, PALETTE, assign_color};
pub use metrics::{HeuristicMetrics, MeasureCache, Measurement, TextMetrics};
#[cfg(target_arch = "wasm32")]
pub(crate) use metrics::LINE_HEIGHT_EM;
pub use words::{Selection, Sentiment, SizedWord, WordDatum, select_and_size};

use fallback_grid::place_on_grid;
use spatial_grid::SpatialGrid;
use spiral_placement::place_on_spiral;

/// Spatial buckets are this fraction of the container's longer side.
const BUCKETS_PER_SIDE: f64 = 8.0;
const MIN_BUCKET_PX: f64 = 32.0;

/// Axis-aligned rectangle in canvas pixels, origin top-left.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
}

impl Rect {
    pub fn right(&self) -> f64 { self.x + self.w }
    pub fn bottom(&self) -> f64 { self.y + self.h }

    /// Separating-axis test with both rectangles inflated by `padding`.
    /// Touching at exactly `padding` distance still counts as a collision.
    pub fn collides(&self, other: &Rect, padding: f64) -> bool {
        !(self.right() + padding < other.x
            || other.right() + padding < self.x
            || self.bottom() + padding < other.y
            || other.bottom() + padding < self.y)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LayoutConfig {
    /// Upper bound on rendered words. The container area may lower it further.
    pub max_words: usize,
    pub container_width: u32,
    pub container_height: u32,
    pub color_scheme: ColorScheme,
    /// Optional clamp applied to computed font sizes.
    pub min_font_px: Option<f64>,
    pub max_font_px: Option<f64>,
    /// Breathing room between spiral-placed words.
    pub collision_padding_px: f64,
    /// Distance every placement keeps from the container edge.
    pub boundary_margin_px: f64,
    /// Spiral steps tried per word before the grid fallback.
    pub max_spiral_attempts: u32,
    /// Failed attempts between font shrink steps.
    pub font_shrink_every: u32,
    pub font_shrink_factor: f64,
    /// Cell pitch of the fallback raster scan.
    pub grid_step_px: f64,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            max_words: 50,
            container_width: 800,
            container_height: 400,
            color_scheme: ColorScheme::Default,
            min_font_px: None,
            max_font_px: None,
            collision_padding_px: 8.0,
            boundary_margin_px: 15.0,
            max_spiral_attempts: 800,
            font_shrink_every: 100,
            font_shrink_factor: 0.85,
            grid_step_px: 20.0,
        }
    }
}

impl LayoutConfig {
    pub fn with_container(width: u32, height: u32) -> Self {
        Self { container_width: width, container_height: height, ..Self::default() }
    }

    pub fn width(&self) -> f64 { f64::from(self.container_width) }
    pub fn height(&self) -> f64 { f64::from(self.container_height) }

    pub fn area(&self) -> u64 {
        u64::from(self.container_width) * u64::from(self.container_height)
    }

    /// Reject tunables that cannot describe a meaningful layout.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let f = self.font_shrink_factor;
        if !(f.is_finite() && f > 0.0 && f <= 1.0) {
            return Err(ConfigError::ShrinkFactor(f));
        }
        if self.font_shrink_every == 0 {
            return Err(ConfigError::ShrinkInterval);
        }
        if !(self.grid_step_px.is_finite() && self.grid_step_px > 0.0) {
            return Err(ConfigError::GridStep(self.grid_step_px));
        }
        for (field, value) in [
            ("collisionPaddingPx", self.collision_padding_px),
            ("boundaryMarginPx", self.boundary_margin_px),
        ] {
            if !(value.is_finite() && value >= 0.0) {
                return Err(ConfigError::Spacing { field, value });
            }
        }
        for (field, value) in [("minFontPx", self.min_font_px), ("maxFontPx", self.max_font_px)] {
            if let Some(value) = value {
                if !(value.is_finite() && value > 0.0) {
                    return Err(ConfigError::FontSize { field, value });
                }
            }
        }
        if let (Some(min), Some(max)) = (self.min_font_px, self.max_font_px) {
            if min > max {
                return Err(ConfigError::FontBounds { min, max });
            }
        }
        Ok(())
    }

    /// Copy with every nonsensical tunable replaced by its default, so layout never fails.
    pub fn sanitized(&self) -> Self {
        let d = Self::default();
        let non_negative = |v: f64, fallback: f64| if v.is_finite() && v >= 0.0 { v } else { fallback };
        let font = |v: Option<f64>| v.filter(|px| px.is_finite() && *px > 0.0);

        let (mut min_font_px, mut max_font_px) = (font(self.min_font_px), font(self.max_font_px));
        if let (Some(min), Some(max)) = (min_font_px, max_font_px) {
            if min > max {
                (min_font_px, max_font_px) = (Some(max), Some(min));
            }
        }

        let f = self.font_shrink_factor;
        Self {
            min_font_px,
            max_font_px,
            collision_padding_px: non_negative(self.collision_padding_px, d.collision_padding_px),
            boundary_margin_px: non_negative(self.boundary_margin_px, d.boundary_margin_px),
            font_shrink_every: if self.font_shrink_every == 0 { d.font_shrink_every } else { self.font_shrink_every },
            font_shrink_factor: if f.is_finite() && f > 0.0 && f <= 1.0 { f } else { d.font_shrink_factor },
            grid_step_px: if self.grid_step_px.is_finite() && self.grid_step_px > 0.0 {
                self.grid_step_px
            } else {
                d.grid_step_px
            },
            ..self.clone()
        }
    }
}

/// How a word found its spot.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PlacementStrategy {
    Spiral,
    GridFallback,
}

/// A placed word, ready for the renderer.
#[derive(Debug, Clone, PartialEq)]
pub struct Placement<'w> {
    pub x: f64,
    pub y: f64,
    /// Measured at the final font size.
    pub width: f64,
    pub height: f64,
    pub font_size_px: f64,
    pub color: String,
    /// Always 0; rotated words are not supported.
    pub rotation_deg: f64,
    pub word: &'w WordDatum,
    /// Position of `word` in the caller's input slice.
    pub source_index: usize,
    pub strategy: PlacementStrategy,
    /// Spiral steps consumed before this word was placed.
    pub attempts: u32,
}

impl Placement<'_> {
    pub fn rect(&self) -> Rect {
        Rect { x: self.x, y: self.y, w: self.width, h: self.height }
    }
}

/// Why a word is absent from the placements.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DropReason {
    /// Neither the spiral nor the grid scan found free space.
    Unplaceable,
    /// Cut by `max_words` or by the container area.
    OverCapacity,
    /// Blank text.
    Ignored,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Diagnostic {
    pub text: String,
    pub source_index: usize,
    pub reason: DropReason,
}

impl Diagnostic {
    pub fn new(word: &WordDatum, source_index: usize, reason: DropReason) -> Self {
        Self { text: word.text.clone(), source_index, reason }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct LayoutOutcome<'w> {
    /// In placement order, which is descending value order minus dropped words.
    pub placements: Vec<Placement<'w>>,
    pub diagnostics: Vec<Diagnostic>,
}

impl LayoutOutcome<'_> {
    pub fn dropped(&self, reason: DropReason) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics.iter().filter(move |d| d.reason == reason)
    }
}

/// Everything placed so far. Threaded by value through the per-word steps.
struct PlacementAccumulator<'w> {
    grid: SpatialGrid,
    placements: Vec<Placement<'w>>,
    diagnostics: Vec<Diagnostic>,
}

impl<'w> PlacementAccumulator<'w> {
    fn new(cfg: &LayoutConfig, diagnostics: Vec<Diagnostic>) -> Self {
        let bucket = (cfg.width().max(cfg.height()) / BUCKETS_PER_SIDE).max(MIN_BUCKET_PX);
        Self {
            grid: SpatialGrid::new(bucket).with_extent(cfg.width(), cfg.height()),
            placements: Vec::new(),
            diagnostics,
        }
    }

    fn place<M: TextMetrics + ?Sized>(
        mut self,
        rank: usize,
        word: &SizedWord<'w>,
        cfg: &LayoutConfig,
        measure: &mut MeasureCache<'_, M>,
    ) -> Self {
        let found = match place_on_spiral(word, &self.grid, cfg, measure) {
            Ok(hit) => Some((hit.rect, hit.font_px, PlacementStrategy::Spiral, hit.attempts)),
            Err(miss) => {
                debug!(text = %word.word.text, attempts = miss.attempts, "spiral exhausted, scanning grid");
                place_on_grid(word, miss.font_px, &self.grid, cfg, measure)
                    .map(|hit| (hit.rect, hit.font_px, PlacementStrategy::GridFallback, miss.attempts))
            }
        };

        match found {
            Some((rect, font_size_px, strategy, attempts)) => {
                self.grid.insert(rect);
                self.placements.push(Placement {
                    x: rect.x,
                    y: rect.y,
                    width: rect.w,
                    height: rect.h,
                    font_size_px,
                    color: assign_color(word.word.sentiment, rank, cfg.color_scheme),
                    rotation_deg: 0.0,
                    word: word.word,
                    source_index: word.source_index,
                    strategy,
                    attempts,
                });
            }
            None => {
                warn!(text = %word.word.text, reason = "unplaceable", "dropping word: no free space on canvas");
                self.diagnostics.push(Diagnostic::new(word.word, word.source_index, DropReason::Unplaceable));
            }
        }
        self
    }

    fn finish(self) -> LayoutOutcome<'w> {
        LayoutOutcome { placements: self.placements, diagnostics: self.diagnostics }
    }
}

/// Lay out `words` inside the configured container.
///
/// Pure apart from log events: the same words, config and oracle always produce the same
/// outcome. Never fails; words that cannot be placed show up in `diagnostics`.
pub fn layout<'w, M>(words: &'w [WordDatum], config: &LayoutConfig, metrics: &M) -> LayoutOutcome<'w>
where
    M: TextMetrics + ?Sized,
{
    let cfg = config.sanitized();
    debug!(
        words = words.len(),
        width = cfg.container_width,
        height = cfg.container_height,
        "starting word cloud layout"
    );

    let Selection { words: sized, rejected } = select_and_size(words, &cfg);
    let mut measure = MeasureCache::new(metrics);

    let outcome = sized
        .iter()
        .enumerate()
        .fold(PlacementAccumulator::new(&cfg, rejected), |acc, (rank, word)| {
            acc.place(rank, word, &cfg, &mut measure)
        })
        .finish();

    debug!(
        placed = outcome.placements.len(),
        dropped = outcome.diagnostics.len(),
        cache_hits = measure.hits(),
        cache_misses = measure.misses(),
        "finished word cloud layout"
    );
    outcome
}
