//! Static spatial environment: dimensions and blocked cells.

use std::collections::HashSet;

/// A static 2D grid. Blocked and out-of-bounds are treated identically by the solver: a cell
/// is traversable iff `in_bounds(x, y) && !is_blocked(x, y)`.
#[derive(Debug, Clone)]
pub struct Grid {
    pub width: usize,
    pub height: usize,
    blocked: HashSet<(usize, usize)>,
}

impl Grid {
    pub fn new(width: usize, height: usize, blocked: impl IntoIterator<Item = (usize, usize)>) -> Self {
        Grid {
            width,
            height,
            blocked: blocked.into_iter().collect(),
        }
    }

    /// An empty grid with no blocked cells.
    pub fn open(width: usize, height: usize) -> Self {
        Grid::new(width, height, std::iter::empty())
    }

    /// Parses a rectangular block of text into a grid: `.` is passable, anything else is
    /// blocked. Every row must have the same length, or this is a harness input error.
    pub fn from_ascii(text: &str) -> Result<Self, GridParseError> {
        let rows: Vec<&str> = text.lines().filter(|l| !l.is_empty()).collect();
        let height = rows.len();
        if height == 0 {
            return Err(GridParseError::Empty);
        }
        let width = rows[0].chars().count();
        let mut blocked = HashSet::new();
        for (y, row) in rows.iter().enumerate() {
            let chars: Vec<char> = row.chars().collect();
            if chars.len() != width {
                return Err(GridParseError::RaggedRow { row: y, expected: width, found: chars.len() });
            }
            for (x, ch) in chars.into_iter().enumerate() {
                if ch != '.' {
                    blocked.insert((x, y));
                }
            }
        }
        Ok(Grid::new(width, height, blocked))
    }

    pub fn in_bounds(&self, x: usize, y: usize) -> bool {
        x < self.width && y < self.height
    }

    pub fn is_blocked(&self, x: usize, y: usize) -> bool {
        self.blocked.contains(&(x, y))
    }

    pub fn is_traversable(&self, x: usize, y: usize) -> bool {
        self.in_bounds(x, y) && !self.is_blocked(x, y)
    }

    /// A `width x height` grid with each cell independently blocked with probability
    /// `density`, seeded for reproducibility. Used by the CLI when no `--map-path` is given.
    pub fn random(width: usize, height: usize, density: f64, seed: u64) -> Self {
        use rand::rngs::StdRng;
        use rand::{Rng, SeedableRng};

        let mut rng = StdRng::seed_from_u64(seed);
        let blocked = (0..height)
            .flat_map(|y| (0..width).map(move |x| (x, y)))
            .filter(|_| rng.gen_bool(density))
            .collect::<Vec<_>>();
        Grid::new(width, height, blocked)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GridParseError {
    Empty,
    RaggedRow { row: usize, expected: usize, found: usize },
}

impl std::fmt::Display for GridParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GridParseError::Empty => write!(f, "grid text is empty"),
            GridParseError::RaggedRow { row, expected, found } => write!(
                f,
                "row {row} has {found} columns, expected {expected} to match row 0"
            ),
        }
    }
}

impl std::error::Error for GridParseError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bounds_and_blocked() {
        let grid = Grid::new(3, 3, [(1, 1)]);
        assert!(grid.in_bounds(2, 2));
        assert!(!grid.in_bounds(3, 0));
        assert!(grid.is_blocked(1, 1));
        assert!(!grid.is_traversable(1, 1));
        assert!(grid.is_traversable(0, 0));
    }

    #[test]
    fn from_ascii_marks_non_dot_as_blocked() {
        let grid = Grid::from_ascii(".#.\n...\n.#.").unwrap();
        assert_eq!(grid.width, 3);
        assert_eq!(grid.height, 3);
        assert!(grid.is_blocked(1, 0));
        assert!(grid.is_blocked(1, 2));
        assert!(!grid.is_blocked(0, 0));
    }

    #[test]
    fn from_ascii_rejects_ragged_rows() {
        let err = Grid::from_ascii(".. .\n...").unwrap_err();
        assert!(matches!(err, GridParseError::RaggedRow { .. }));
    }

    #[test]
    fn random_is_reproducible_for_a_fixed_seed() {
        let a = Grid::random(10, 10, 0.3, 99);
        let b = Grid::random(10, 10, 0.3, 99);
        for y in 0..10 {
            for x in 0..10 {
                assert_eq!(a.is_blocked(x, y), b.is_blocked(x, y));
            }
        }
    }

    #[test]
    fn random_with_zero_density_is_fully_open() {
        let grid = Grid::random(5, 5, 0.0, 1);
        for y in 0..5 {
            for x in 0..5 {
                assert!(grid.is_traversable(x, y));
            }
        }
    }
}
