// Spiral search for free space.
//
// Candidates walk outward from the canvas center along a spiral whose radius
// grows slowly with the angle, so the area near the center is covered densely
// before the search reaches the edges. Every candidate is clamped inside the
// margins rather than rejected. A word larger than the usable area at its
// current size counts as a miss. After every `font_shrink_every` misses the
// word shrinks, which makes the remaining gaps easier to fit.
//
// Properties:
// - Deterministic (no jitter)
// - Font size never grows within one word
// - Bounded by `max_spiral_attempts` collision queries

use tracing::trace;

use super::metrics::{MeasureCache, TextMetrics};
use super::spatial_grid::SpatialGrid;
use super::{LayoutConfig, Rect, SizedWord};

/// Radians advanced per attempt. Small enough not to skip narrow gaps.
const ANGLE_STEP_RAD: f64 = 0.05;
/// Radius gained per radian.
const RADIUS_PER_RAD: f64 = 1.5;
/// The spiral stops growing this far inside the shorter half-extent.
const RADIUS_INSET_PX: f64 = 30.0;
/// Words at or below this size stop shrinking.
const SHRINK_FLOOR_PX: f64 = 10.0;

#[derive(Debug, Clone, PartialEq)]
pub struct SpiralHit {
    pub rect: Rect,
    pub font_px: f64,
    pub attempts: u32,
}

/// Budget exhausted. Carries the font size the word had shrunk to.
#[derive(Debug, Clone, PartialEq)]
pub struct SpiralMiss {
    pub font_px: f64,
    pub attempts: u32,
}

/// Clamp into `[lo, hi]`, pinning to `lo` when the interval is empty.
fn clamp_axis(value: f64, lo: f64, hi: f64) -> f64 {
    if hi < lo { lo } else { value.clamp(lo, hi) }
}

/// Search for a spot for `word` that collides with nothing in `placed`.
pub fn place_on_spiral<M: TextMetrics + ?Sized>(
    word: &SizedWord<'_>,
    placed: &SpatialGrid,
    cfg: &LayoutConfig,
    measure: &mut MeasureCache<'_, M>,
) -> Result<SpiralHit, SpiralMiss> {
    let (width, height) = (cfg.width(), cfg.height());
    let (cx, cy) = (width / 2.0, height / 2.0);
    let margin = cfg.boundary_margin_px;
    let max_radius = (width.min(height) / 2.0 - RADIUS_INSET_PX).max(0.0);
    let shrink_every = cfg.font_shrink_every.max(1);
    let (usable_w, usable_h) = (width - 2.0 * margin, height - 2.0 * margin);

    let text = word.word.text.as_str();
    let mut font_px = word.target_font_px;
    let mut size = measure.measure(text, font_px);
    let mut attempts = 0u32;

    while attempts < cfg.max_spiral_attempts {
        let angle = f64::from(attempts) * ANGLE_STEP_RAD;
        let radius = (angle * RADIUS_PER_RAD).min(max_radius);

        let fits = size.width <= usable_w && size.height <= usable_h;
        if fits {
            let x = clamp_axis(cx + radius * angle.cos() - size.width / 2.0, margin, width - size.width - margin);
            let y = clamp_axis(cy + radius * angle.sin() - size.height / 2.0, margin, height - size.height - margin);
            let rect = Rect { x, y, w: size.width, h: size.height };

            if !placed.collides_any(&rect, cfg.collision_padding_px) {
                return Ok(SpiralHit { rect, font_px, attempts });
            }
        }

        attempts += 1;
        if attempts % shrink_every == 0 && font_px > SHRINK_FLOOR_PX {
            font_px *= cfg.font_shrink_factor;
            size = measure.measure(text, font_px);
            trace!(text, attempts, font_px, "shrinking word on spiral");
        }
    }

    Err(SpiralMiss { font_px, attempts })
}
