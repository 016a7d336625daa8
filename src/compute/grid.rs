//! Toroidal lattice and the synchronous Conway update rule.

use crate::schema::{Genome, Pattern, PatternError};

/// Moore neighbourhood offsets.
const NEIGHBOR_OFFSETS: [(isize, isize); 8] = [
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, -1),
    (0, 1),
    (1, -1),
    (1, 0),
    (1, 1),
];

/// Grid construction and placement errors.
#[derive(Debug, thiserror::Error)]
pub enum GridError {
    #[error("grid dimensions must be at least 1x1, got {rows}x{cols}")]
    InvalidDimensions { rows: usize, cols: usize },
    #[error("pattern side {side} does not fit a {rows}x{cols} grid")]
    PatternTooLarge {
        side: usize,
        rows: usize,
        cols: usize,
    },
    #[error(transparent)]
    Pattern(#[from] PatternError),
}

/// A toroidal boolean lattice.
///
/// Cells are stored row-major; neighbour lookups wrap modulo the grid
/// dimensions. `step()` reads every neighbour sum from the pre-step snapshot
/// and writes the successor state into an owned scratch buffer, then swaps
/// the buffers - cells never observe a half-updated generation.
pub struct Grid {
    cells: Vec<bool>,
    next: Vec<bool>,
    rows: usize,
    cols: usize,
}

impl Grid {
    /// All-dead grid of the given dimensions.
    pub fn new(rows: usize, cols: usize) -> Result<Self, GridError> {
        if rows < 1 || cols < 1 {
            return Err(GridError::InvalidDimensions { rows, cols });
        }
        Ok(Self {
            cells: vec![false; rows * cols],
            next: vec![false; rows * cols],
            rows,
            cols,
        })
    }

    /// Grid seeded from a named pattern.
    pub fn from_pattern(rows: usize, cols: usize, pattern: &Pattern) -> Result<Self, GridError> {
        let mut grid = Self::new(rows, cols)?;
        grid.cells = pattern.generate(rows, cols)?;
        Ok(grid)
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    #[inline]
    fn idx(&self, r: usize, c: usize) -> usize {
        r * self.cols + c
    }

    /// Cell state at (r, c). Indices must be in bounds.
    pub fn is_alive(&self, r: usize, c: usize) -> bool {
        self.cells[self.idx(r, c)]
    }

    /// Set cell state at (r, c). Indices must be in bounds.
    pub fn set(&mut self, r: usize, c: usize, alive: bool) {
        let i = self.idx(r, c);
        self.cells[i] = alive;
    }

    /// Overlay a square pattern centred in the grid.
    ///
    /// The whole `side x side` block is written, live and dead genes alike;
    /// cells outside the block keep their prior state.
    pub fn embed_centered(&mut self, pattern: &Genome) -> Result<(), GridError> {
        let side = pattern.side();
        if side > self.rows.min(self.cols) {
            return Err(GridError::PatternTooLarge {
                side,
                rows: self.rows,
                cols: self.cols,
            });
        }

        let top = (self.rows - side) / 2;
        let left = (self.cols - side) / 2;
        for r in 0..side {
            for c in 0..side {
                let i = self.idx(top + r, left + c);
                self.cells[i] = pattern.bit(r * side + c);
            }
        }
        Ok(())
    }

    /// Live cells among the 8 toroidal Moore neighbours of (r, c).
    fn live_neighbors(&self, r: usize, c: usize) -> usize {
        let rows = self.rows as isize;
        let cols = self.cols as isize;
        NEIGHBOR_OFFSETS
            .iter()
            .filter(|(dr, dc)| {
                let nr = (r as isize + dr).rem_euclid(rows) as usize;
                let nc = (c as isize + dc).rem_euclid(cols) as usize;
                self.cells[nr * self.cols + nc]
            })
            .count()
    }

    /// Advance the lattice by one synchronous generation.
    ///
    /// Birth on exactly 3 neighbours, survival on 2 or 3, death otherwise.
    pub fn step(&mut self) {
        for r in 0..self.rows {
            for c in 0..self.cols {
                let n = self.live_neighbors(r, c);
                let alive = self.cells[r * self.cols + c];
                self.next[r * self.cols + c] = n == 3 || (alive && n == 2);
            }
        }
        std::mem::swap(&mut self.cells, &mut self.next);
    }

    /// Number of live cells.
    pub fn count_active(&self) -> usize {
        self.cells.iter().filter(|&&alive| alive).count()
    }

    /// Mass-weighted mean (row, col) over live cells.
    ///
    /// An all-dead grid reports the geometric centre instead of failing.
    pub fn center_of_mass(&self) -> (f64, f64) {
        let mut mass = 0.0f64;
        let mut row_sum = 0.0f64;
        let mut col_sum = 0.0f64;

        for r in 0..self.rows {
            for c in 0..self.cols {
                if self.cells[r * self.cols + c] {
                    mass += 1.0;
                    row_sum += r as f64;
                    col_sum += c as f64;
                }
            }
        }

        if mass > 0.0 {
            (row_sum / mass, col_sum / mass)
        } else {
            (self.rows as f64 / 2.0, self.cols as f64 / 2.0)
        }
    }

    /// Coordinates of all live cells, row-major order.
    pub fn live_cells(&self) -> Vec<(usize, usize)> {
        let mut live = Vec::new();
        for r in 0..self.rows {
            for c in 0..self.cols {
                if self.cells[r * self.cols + c] {
                    live.push((r, c));
                }
            }
        }
        live
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    /// Independent per-cell reimplementation of one update, used to
    /// cross-check the engine's neighbour sums and wrap arithmetic.
    fn brute_force_step(grid: &Grid) -> Vec<(usize, usize)> {
        let rows = grid.rows();
        let cols = grid.cols();
        let mut live = Vec::new();
        for r in 0..rows {
            for c in 0..cols {
                let mut count = 0;
                for dr in [rows - 1, 0, 1] {
                    for dc in [cols - 1, 0, 1] {
                        if dr == 0 && dc == 0 {
                            continue;
                        }
                        if grid.is_alive((r + dr) % rows, (c + dc) % cols) {
                            count += 1;
                        }
                    }
                }
                let next = if grid.is_alive(r, c) {
                    count == 2 || count == 3
                } else {
                    count == 3
                };
                if next {
                    live.push((r, c));
                }
            }
        }
        live
    }

    #[test]
    fn test_rejects_empty_dimensions() {
        assert!(matches!(
            Grid::new(0, 5),
            Err(GridError::InvalidDimensions { .. })
        ));
        assert!(matches!(
            Grid::new(5, 0),
            Err(GridError::InvalidDimensions { .. })
        ));
    }

    #[test]
    fn test_dead_grid_is_fixed_point() {
        for (rows, cols) in [(3, 3), (4, 7), (10, 10)] {
            let mut grid = Grid::new(rows, cols).unwrap();
            grid.step();
            assert_eq!(grid.count_active(), 0, "{rows}x{cols}");
        }
    }

    #[test]
    fn test_lone_cell_dies_in_one_step() {
        let mut grid = Grid::new(5, 5).unwrap();
        grid.set(2, 2, true);
        grid.step();
        assert_eq!(grid.count_active(), 0);
    }

    #[test]
    fn test_blinker_period_two() {
        let mut grid = Grid::from_pattern(10, 10, &Pattern::Blinker).unwrap();
        let initial = grid.live_cells();
        assert_eq!(initial, vec![(1, 2), (2, 2), (3, 2)]);

        grid.step();
        assert_eq!(grid.count_active(), 3);
        assert_eq!(grid.live_cells(), vec![(2, 1), (2, 2), (2, 3)]);

        grid.step();
        assert_eq!(grid.count_active(), 3);
        assert_eq!(grid.live_cells(), initial);
    }

    #[test]
    fn test_block_is_still_life() {
        let mut grid = Grid::new(6, 6).unwrap();
        for (r, c) in [(2, 2), (2, 3), (3, 2), (3, 3)] {
            grid.set(r, c, true);
        }
        let before = grid.live_cells();
        grid.step();
        assert_eq!(grid.live_cells(), before);
    }

    #[test]
    fn test_toroidal_wrap_at_corner() {
        // Three cells straddling the corner form a wrapped L; the cell
        // diagonally opposite across the seam sees all three.
        let mut grid = Grid::new(6, 6).unwrap();
        grid.set(0, 0, true);
        grid.set(0, 5, true);
        grid.set(5, 0, true);
        grid.step();
        assert!(grid.is_alive(5, 5));
    }

    #[test]
    fn test_embed_centered_placement() {
        let mut grid = Grid::new(9, 9).unwrap();
        let mut genome = Genome::dead(3);
        genome.set(0, true); // pattern cell (0, 0)
        grid.embed_centered(&genome).unwrap();
        assert_eq!(grid.live_cells(), vec![(3, 3)]);
    }

    #[test]
    fn test_embed_overwrites_block_only() {
        let mut grid = Grid::new(9, 9).unwrap();
        grid.set(0, 0, true); // outside the block
        grid.set(4, 4, true); // inside the block
        grid.embed_centered(&Genome::dead(3)).unwrap();
        assert_eq!(grid.live_cells(), vec![(0, 0)]);
    }

    #[test]
    fn test_embed_too_large() {
        let mut grid = Grid::new(4, 10).unwrap();
        assert!(matches!(
            grid.embed_centered(&Genome::dead(5)),
            Err(GridError::PatternTooLarge { side: 5, .. })
        ));
    }

    #[test]
    fn test_center_of_mass_empty_grid() {
        let grid = Grid::new(7, 10).unwrap();
        assert_eq!(grid.center_of_mass(), (3.5, 5.0));
    }

    #[test]
    fn test_center_of_mass_single_cell() {
        let mut grid = Grid::new(9, 9).unwrap();
        grid.set(2, 6, true);
        assert_eq!(grid.center_of_mass(), (2.0, 6.0));
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        #[test]
        fn step_matches_brute_force(
            rows in 3usize..12,
            cols in 3usize..12,
            seed in any::<u64>(),
        ) {
            let pattern = Pattern::Random { density: 0.5, seed };
            let mut grid = Grid::from_pattern(rows, cols, &pattern).unwrap();
            let expected = brute_force_step(&grid);
            grid.step();
            prop_assert_eq!(grid.live_cells(), expected);
        }
    }
}
