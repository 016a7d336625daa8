//! Named seed patterns for initializing a lattice.

use rand::prelude::*;
use serde::{Deserialize, Serialize};

/// Predefined starting configurations.
///
/// Fixed patterns use absolute cell coordinates near the lattice origin, so
/// they need a grid large enough to contain them. `Random` fills every cell
/// independently from a seeded generator, making seeded runs reproducible.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Pattern {
    /// Vertical period-2 oscillator at column 2, rows 1-3.
    Blinker,
    /// Diagonal glider around cell (3, 3).
    Glider,
    /// Lightweight spaceship around cell (5, 5).
    Spaceship,
    /// Independent Bernoulli fill of the whole lattice.
    Random { density: f64, seed: u64 },
    /// Explicit live cells as (row, col) pairs.
    Cells { cells: Vec<(usize, usize)> },
}

/// Pattern placement errors.
#[derive(Debug, thiserror::Error)]
pub enum PatternError {
    #[error("pattern cell ({row}, {col}) lies outside a {rows}x{cols} grid")]
    OutOfBounds {
        row: usize,
        col: usize,
        rows: usize,
        cols: usize,
    },
    #[error("fill density must be within [0, 1], got {value}")]
    DensityOutOfRange { value: f64 },
}

impl Pattern {
    /// Generate a row-major cell vector for a `rows x cols` lattice.
    pub fn generate(&self, rows: usize, cols: usize) -> Result<Vec<bool>, PatternError> {
        let mut cells = vec![false; rows * cols];

        match self {
            Pattern::Random { density, seed } => {
                if !(0.0..=1.0).contains(density) {
                    return Err(PatternError::DensityOutOfRange { value: *density });
                }
                let mut rng = StdRng::seed_from_u64(*seed);
                for cell in &mut cells {
                    *cell = rng.gen_bool(*density);
                }
            }
            _ => {
                for (r, c) in self.live_cells() {
                    if r >= rows || c >= cols {
                        return Err(PatternError::OutOfBounds {
                            row: r,
                            col: c,
                            rows,
                            cols,
                        });
                    }
                    cells[r * cols + c] = true;
                }
            }
        }

        Ok(cells)
    }

    /// Live cells of a fixed pattern. Empty for `Random`.
    fn live_cells(&self) -> Vec<(usize, usize)> {
        match self {
            Pattern::Blinker => vec![(1, 2), (2, 2), (3, 2)],
            Pattern::Glider => vec![(3, 2), (2, 4), (3, 4), (4, 3), (4, 4)],
            Pattern::Spaceship => vec![
                (5, 5),
                (5, 4),
                (5, 3),
                (5, 2),
                (4, 1),
                (2, 1),
                (2, 4),
                (3, 5),
                (4, 5),
            ],
            Pattern::Random { .. } => Vec::new(),
            Pattern::Cells { cells } => cells.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blinker_cells() {
        let cells = Pattern::Blinker.generate(10, 10).unwrap();
        let live: Vec<usize> = cells
            .iter()
            .enumerate()
            .filter_map(|(i, &b)| b.then_some(i))
            .collect();
        assert_eq!(live, vec![12, 22, 32]);
    }

    #[test]
    fn test_pattern_out_of_bounds() {
        assert!(matches!(
            Pattern::Spaceship.generate(4, 4),
            Err(PatternError::OutOfBounds { .. })
        ));
    }

    #[test]
    fn test_random_density_extremes() {
        let empty = Pattern::Random {
            density: 0.0,
            seed: 7,
        }
        .generate(6, 6)
        .unwrap();
        assert!(empty.iter().all(|&b| !b));

        let full = Pattern::Random {
            density: 1.0,
            seed: 7,
        }
        .generate(6, 6)
        .unwrap();
        assert!(full.iter().all(|&b| b));
    }

    #[test]
    fn test_random_density_checked() {
        assert!(matches!(
            Pattern::Random {
                density: 1.5,
                seed: 0
            }
            .generate(4, 4),
            Err(PatternError::DensityOutOfRange { .. })
        ));
    }

    #[test]
    fn test_random_reproducible() {
        let p = Pattern::Random {
            density: 0.5,
            seed: 99,
        };
        assert_eq!(p.generate(8, 8).unwrap(), p.generate(8, 8).unwrap());
    }
}
