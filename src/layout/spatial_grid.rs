// Spatial hash grid for collision detection.
//
// Instead of testing a candidate against every placed word, this divides the
// canvas into square buckets and only tests rectangles sharing a bucket with
// the padded candidate. The answer is identical to the exhaustive check.
//
// With an extent set, cell indices are clamped to it, so a rect reaching far
// outside the canvas touches only the edge buckets. Clamping is monotone, so
// two boxes whose cell ranges meet still meet after clamping.

use rustc_hash::FxHashMap;

use super::Rect;

/// Placed rectangles bucketed by the cells they cover.
#[derive(Debug, Clone)]
pub struct SpatialGrid {
    /// Size of each cell in the grid.
    cell_size: f64,
    /// Map from cell coordinates to indices into `rects`.
    cells: FxHashMap<(i64, i64), Vec<usize>>,
    rects: Vec<Rect>,
    /// Last cell on each axis, when bounded.
    max_cell: Option<(i64, i64)>,
}

impl SpatialGrid {
    /// Cell size should be roughly the size of a typical word.
    pub fn new(cell_size: f64) -> Self {
        Self {
            cell_size: if cell_size.is_finite() { cell_size.max(1.0) } else { 1.0 },
            cells: FxHashMap::default(),
            rects: Vec::new(),
            max_cell: None,
        }
    }

    /// Bound the bucket walk to a `width` x `height` canvas anchored at the origin.
    pub fn with_extent(mut self, width: f64, height: f64) -> Self {
        self.max_cell = Some((self.cell_of(width.max(0.0)), self.cell_of(height.max(0.0))));
        self
    }

    fn cell_of(&self, v: f64) -> i64 {
        (v / self.cell_size).floor() as i64
    }

    /// Cells touched by the closed box [x0, x1] x [y0, y1].
    fn cell_range(&self, x0: f64, y0: f64, x1: f64, y1: f64) -> impl Iterator<Item = (i64, i64)> + use<> {
        let (mut min_x, mut max_x) = (self.cell_of(x0), self.cell_of(x1));
        let (mut min_y, mut max_y) = (self.cell_of(y0), self.cell_of(y1));
        if let Some((last_x, last_y)) = self.max_cell {
            (min_x, max_x) = (min_x.clamp(0, last_x), max_x.clamp(0, last_x));
            (min_y, max_y) = (min_y.clamp(0, last_y), max_y.clamp(0, last_y));
        }
        (min_x..=max_x).flat_map(move |cx| (min_y..=max_y).map(move |cy| (cx, cy)))
    }

    pub fn insert(&mut self, rect: Rect) {
        let idx = self.rects.len();
        self.rects.push(rect);
        for cell in self.cell_range(rect.x, rect.y, rect.right(), rect.bottom()) {
            self.cells.entry(cell).or_default().push(idx);
        }
    }

    /// Whether `rect` collides with any stored rectangle under `padding` (see [`Rect::collides`]).
    pub fn collides_any(&self, rect: &Rect, padding: f64) -> bool {
        // Anything within `padding` of the rect overlaps this inflated box, so shares a cell.
        self.cell_range(rect.x - padding, rect.y - padding, rect.right() + padding, rect.bottom() + padding)
            .filter_map(|cell| self.cells.get(&cell))
            .flatten()
            .any(|&idx| self.rects[idx].collides(rect, padding))
    }
}
