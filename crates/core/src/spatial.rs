//! Uniform grid for radius queries over the point set.
//!
//! Rebuilt from scratch each step. Each point index lands in exactly one cell;
//! positions outside the domain are clamped into the border cells, and queries
//! clamp their cell range the same way, so nothing is ever missed.

use glam::Vec2;

/// Smallest cell edge the grid will use.
pub const MIN_CELL_SIZE: f32 = 1.0;

/// Bucket grid over `[0, width) x [0, height)`.
#[derive(Debug, Clone)]
pub struct SpatialIndex {
    /// Row-major cells holding point indices.
    cells: Vec<Vec<usize>>,
    cell_size: f32,
    cols: usize,
    rows: usize,
    width: f32,
    height: f32,
}

impl SpatialIndex {
    /// Creates an empty grid.
    pub fn new(width: f32, height: f32, cell_size: f32) -> Self {
        let mut index = Self {
            cells: Vec::new(),
            cell_size: MIN_CELL_SIZE,
            cols: 1,
            rows: 1,
            width,
            height,
        };
        index.resize(width, height, cell_size);
        index
    }

    /// Cell edge length.
    pub fn cell_size(&self) -> f32 {
        self.cell_size
    }

    /// Relays the grid out for a new domain or cell size, dropping all entries.
    ///
    /// Cell vectors that survive keep their capacity.
    pub fn resize(&mut self, width: f32, height: f32, cell_size: f32) {
        let cell_size = if cell_size.is_finite() {
            cell_size.max(MIN_CELL_SIZE)
        } else {
            MIN_CELL_SIZE
        };
        self.width = width.max(0.0);
        self.height = height.max(0.0);
        self.cell_size = cell_size;
        self.cols = ((self.width / cell_size).ceil() as usize).max(1);
        self.rows = ((self.height / cell_size).ceil() as usize).max(1);
        self.cells.resize_with(self.cols * self.rows, Vec::new);
        self.clear();
    }

    /// Empties every cell, keeping allocations.
    pub fn clear(&mut self) {
        self.cells.iter_mut().for_each(Vec::clear);
    }

    /// Clears and re-inserts every position by index.
    ///
    /// The grid is only relaid out when the requested cell size moves by more
    /// than a pixel or the domain changed.
    pub fn rebuild<I>(&mut self, positions: I, width: f32, height: f32, cell_size: f32)
    where
        I: IntoIterator<Item = Vec2>,
    {
        if (self.cell_size - cell_size).abs() > 1.0 || self.width != width || self.height != height
        {
            self.resize(width, height, cell_size);
        } else {
            self.clear();
        }
        for (i, p) in positions.into_iter().enumerate() {
            self.insert(i, p);
        }
    }

    /// Adds one point index at `position`.
    pub fn insert(&mut self, index: usize, position: Vec2) {
        let cell = self.row_of(position.y) * self.cols + self.col_of(position.x);
        self.cells[cell].push(index);
    }

    /// Number of indices currently stored.
    pub fn len(&self) -> usize {
        self.cells.iter().map(Vec::len).sum()
    }

    /// True when no index is stored.
    pub fn is_empty(&self) -> bool {
        self.cells.iter().all(Vec::is_empty)
    }

    /// Column for an x coordinate. Floors, then clamps into the grid.
    #[inline]
    fn col_of(&self, x: f32) -> usize {
        ((x / self.cell_size).floor() as i64).clamp(0, self.cols as i64 - 1) as usize
    }

    #[inline]
    fn row_of(&self, y: f32) -> usize {
        ((y / self.cell_size).floor() as i64).clamp(0, self.rows as i64 - 1) as usize
    }

    /// Indices in every cell the disc of `radius` around `center` touches.
    ///
    /// Conservative: callers re-check the exact distance. A negative or NaN
    /// radius yields nothing; zero touches the single cell under `center`.
    /// Calling again restarts the walk.
    pub fn query_radius(&self, center: Vec2, radius: f32) -> impl Iterator<Item = usize> + '_ {
        let (cols, rows) = if radius >= 0.0 {
            (
                self.col_of(center.x - radius)..=self.col_of(center.x + radius),
                self.row_of(center.y - radius)..=self.row_of(center.y + radius),
            )
        } else {
            // Empty inclusive ranges.
            (1..=0, 1..=0)
        };

        rows.flat_map(move |row| {
            cols.clone()
                .flat_map(move |col| self.cells[row * self.cols + col].iter().copied())
        })
    }
}
