//! Driving a lattice through bounded or plateau-seeking runs.

use std::collections::VecDeque;

use super::Grid;

/// Step cap for equilibrium searches.
pub const DEFAULT_MAX_STEPS: u64 = 2000;

/// Outcome of a plateau search.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Equilibrium {
    /// The active count held constant for a full window; `onset` is the step
    /// index at which the plateau began.
    Reached { onset: u64 },
    /// The step cap was exhausted without a plateau.
    NotReached { steps: u64 },
}

impl Equilibrium {
    /// Plateau onset, if one was found.
    pub fn onset(&self) -> Option<u64> {
        match self {
            Equilibrium::Reached { onset } => Some(*onset),
            Equilibrium::NotReached { .. } => None,
        }
    }
}

/// Apply exactly `steps` update steps. No-op at 0.
pub fn run_steps(grid: &mut Grid, steps: u64) {
    for _ in 0..steps {
        grid.step();
    }
}

/// Step until the active-cell count plateaus or `max_steps` is reached.
///
/// The last `window` counts (recorded after each step) are kept; once they
/// are all equal the plateau is declared to have begun `window` steps ago.
/// A window of at least `min(rows, cols)` gives travelling structures time
/// to traverse the torus and interact before stability is claimed; see
/// [`default_window`].
pub fn run_until_stable(grid: &mut Grid, window: usize, max_steps: u64) -> Equilibrium {
    let window = window.max(1);
    let mut history: VecDeque<usize> = VecDeque::with_capacity(window);

    for t in 1..=max_steps {
        grid.step();
        if history.len() == window {
            history.pop_front();
        }
        history.push_back(grid.count_active());

        if history.len() == window {
            let first = history[0];
            if history.iter().all(|&count| count == first) {
                return Equilibrium::Reached {
                    onset: t - window as u64,
                };
            }
        }
    }

    Equilibrium::NotReached { steps: max_steps }
}

/// Plateau window sized so travelling structures can cross the lattice.
pub fn default_window(grid: &Grid) -> usize {
    grid.rows().min(grid.cols())
}
