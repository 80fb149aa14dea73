//! Last-resort raster scan.
//!
//! Runs only after the spiral has spent its budget. The word is measured at
//! a small fixed size and tried on a coarse grid, column by column (x outer,
//! y inner), with tighter padding than the spiral uses. The first free cell
//! wins; no free cell means the word is dropped.
//!
//! A word that is larger than the usable area even at this size has only one
//! candidate per overflowing axis: pinned to the margin.

use super::metrics::{MeasureCache, TextMetrics};
use super::spatial_grid::SpatialGrid;
use super::{LayoutConfig, Rect, SizedWord};

/// Padding for fallback placements: fitting matters more than spacing here.
pub(crate) const FALLBACK_PADDING_PX: f64 = 6.0;
const FALLBACK_MIN_FONT_PX: f64 = 8.0;
const FALLBACK_FONT_WIDTH_RATIO: f64 = 0.015;

#[derive(Debug, Clone, PartialEq)]
pub struct GridHit {
    pub rect: Rect,
    pub font_px: f64,
}

/// Font size used by the fallback scan for this container.
pub fn fallback_font_px(cfg: &LayoutConfig) -> f64 {
    (cfg.width() * FALLBACK_FONT_WIDTH_RATIO).max(FALLBACK_MIN_FONT_PX)
}

/// Offsets `start, start + step, ...` up to and including `end`.
fn steps(start: f64, end: f64, step: f64) -> impl Iterator<Item = f64> {
    (0u32..)
        .map(move |i| start + f64::from(i) * step)
        .take_while(move |v| *v <= end)
}

/// Scan for a free cell. `font_ceiling_px` is the size the word already shrank to
/// on the spiral; the fallback never measures it larger than that.
pub fn place_on_grid<M: TextMetrics + ?Sized>(
    word: &SizedWord<'_>,
    font_ceiling_px: f64,
    placed: &SpatialGrid,
    cfg: &LayoutConfig,
    measure: &mut MeasureCache<'_, M>,
) -> Option<GridHit> {
    let font_px = fallback_font_px(cfg).min(font_ceiling_px);
    let size = measure.measure(&word.word.text, font_px);
    let margin = cfg.boundary_margin_px;
    let step = cfg.grid_step_px.max(1.0);

    let x_end = (cfg.width() - size.width - margin).max(margin);
    let y_end = (cfg.height() - size.height - margin).max(margin);

    steps(margin, x_end, step)
        .flat_map(|x| steps(margin, y_end, step).map(move |y| Rect { x, y, w: size.width, h: size.height }))
        .find(|rect| !placed.collides_any(rect, FALLBACK_PADDING_PX))
        .map(|rect| GridHit { rect, font_px })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::{HeuristicMetrics, Measurement, WordDatum};

    fn sized(word: &WordDatum) -> SizedWord<'_> {
        SizedWord { word, source_index: 0, value: word.value, target_font_px: 30.0 }
    }

    fn fixed(_: &str, _: f64) -> Option<Measurement> {
        Some(Measurement { width: 30.0, height: 10.0 })
    }

    #[test]
    fn test_fallback_font_has_floor() {
        assert_eq!(fallback_font_px(&LayoutConfig::with_container(200, 200)), 8.0);
        assert!((fallback_font_px(&LayoutConfig::with_container(1000, 200)) - 15.0).abs() < 1e-9);
    }

    #[test]
    fn test_first_free_cell_is_top_left() {
        let cfg = LayoutConfig::default();
        let word = WordDatum::new("late", 1.0);
        let mut measure = MeasureCache::new(&fixed);

        let hit = place_on_grid(&sized(&word), 30.0, &SpatialGrid::new(64.0), &cfg, &mut measure).expect("empty");
        assert_eq!((hit.rect.x, hit.rect.y), (15.0, 15.0));
        assert!((hit.font_px - 12.0).abs() < 1e-9);
    }

    #[test]
    fn test_scans_down_the_column_before_moving_right() {
        let cfg = LayoutConfig::default();
        let mut grid = SpatialGrid::new(64.0);
        // Covers y in [15, 55] at x = 15; the 6px padding also rules out the y = 55 cell.
        grid.insert(Rect { x: 15.0, y: 15.0, w: 30.0, h: 40.0 });
        let word = WordDatum::new("w", 1.0);
        let mut measure = MeasureCache::new(&fixed);

        let hit = place_on_grid(&sized(&word), 30.0, &grid, &cfg, &mut measure).expect("room below");
        assert_eq!((hit.rect.x, hit.rect.y), (15.0, 75.0));
    }

    #[test]
    fn test_uses_reduced_padding() {
        let cfg = LayoutConfig::default();
        let mut grid = SpatialGrid::new(64.0);
        // Leaves exactly a 7px gap above the (15, 35) cell: fine at 6px padding, not at 8px.
        grid.insert(Rect { x: 15.0, y: 0.0, w: 30.0, h: 28.0 });
        let word = WordDatum::new("w", 1.0);
        let mut measure = MeasureCache::new(&fixed);

        let hit = place_on_grid(&sized(&word), 30.0, &grid, &cfg, &mut measure).expect("room");
        assert_eq!((hit.rect.x, hit.rect.y), (15.0, 35.0));
    }

    #[test]
    fn test_never_grows_past_spiral_font() {
        let cfg = LayoutConfig::with_container(1000, 400);
        let word = WordDatum::new("fees", 1.0);
        let mut measure = MeasureCache::new(&HeuristicMetrics);

        let hit = place_on_grid(&sized(&word), 9.5, &SpatialGrid::new(64.0), &cfg, &mut measure).expect("empty");
        assert_eq!(hit.font_px, 9.5);
    }

    #[test]
    fn test_full_canvas_drops_word() {
        let cfg = LayoutConfig::default();
        let mut grid = SpatialGrid::new(64.0);
        grid.insert(Rect { x: 0.0, y: 0.0, w: 800.0, h: 400.0 });
        let word = WordDatum::new("none", 1.0);
        let mut measure = MeasureCache::new(&HeuristicMetrics);

        assert!(place_on_grid(&sized(&word), 30.0, &grid, &cfg, &mut measure).is_none());
    }

    #[test]
    fn test_word_wider_than_canvas_is_pinned_to_margin() {
        let cfg = LayoutConfig::with_container(60, 60);
        let word = WordDatum::new("w", 1.0);
        let wide = |_: &str, _: f64| Some(Measurement { width: 100.0, height: 10.0 });
        let mut measure = MeasureCache::new(&wide);

        let hit = place_on_grid(&sized(&word), 30.0, &SpatialGrid::new(64.0), &cfg, &mut measure).expect("pinned");
        assert_eq!((hit.rect.x, hit.rect.y), (15.0, 15.0));
    }

    #[test]
    fn test_pinned_word_still_respects_collisions() {
        let cfg = LayoutConfig::with_container(60, 60);
        let mut grid = SpatialGrid::new(64.0);
        grid.insert(Rect { x: 15.0, y: 15.0, w: 100.0, h: 30.0 });
        let word = WordDatum::new("w", 1.0);
        let wide = |_: &str, _: f64| Some(Measurement { width: 100.0, height: 10.0 });
        let mut measure = MeasureCache::new(&wide);

        assert!(place_on_grid(&sized(&word), 30.0, &grid, &cfg, &mut measure).is_none());
    }
}
