//! Poses and facings for the space-time search state space.

use std::fmt;

use serde::Serialize;

/// Cardinal facing. Ordinal values match the wire contract: `E=0, S=1, W=2, N=3`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum Facing {
    East = 0,
    South = 1,
    West = 2,
    North = 3,
}

impl Facing {
    pub const ALL: [Facing; 4] = [Facing::East, Facing::South, Facing::West, Facing::North];

    /// `(dx, dy)` for one forward step in this facing. Note y grows downward.
    pub fn delta(self) -> (i64, i64) {
        match self {
            Facing::East => (1, 0),
            Facing::South => (0, 1),
            Facing::West => (-1, 0),
            Facing::North => (0, -1),
        }
    }

    pub fn rotate_left(self) -> Facing {
        Facing::from_index((self as i64 - 1).rem_euclid(4) as u8)
    }

    pub fn rotate_right(self) -> Facing {
        Facing::from_index((self as i64 + 1).rem_euclid(4) as u8)
    }

    fn from_index(idx: u8) -> Facing {
        match idx {
            0 => Facing::East,
            1 => Facing::South,
            2 => Facing::West,
            3 => Facing::North,
            _ => unreachable!("facing index is always taken mod 4"),
        }
    }
}

impl fmt::Display for Facing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let c = match self {
            Facing::East => 'E',
            Facing::South => 'S',
            Facing::West => 'W',
            Facing::North => 'N',
        };
        write!(f, "{c}")
    }
}

/// `(x, y, facing)`. Time is implicit: a `Pose` at index `k` of a [`Path`](crate::Path) is the
/// agent's pose at `t = k`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct Pose {
    pub x: usize,
    pub y: usize,
    pub facing: Facing,
}

impl Pose {
    pub fn new(x: usize, y: usize, facing: Facing) -> Self {
        Pose { x, y, facing }
    }

    pub fn xy(self) -> (usize, usize) {
        (self.x, self.y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rotation_is_mod_four() {
        assert_eq!(Facing::East.rotate_left(), Facing::North);
        assert_eq!(Facing::North.rotate_left(), Facing::West);
        assert_eq!(Facing::East.rotate_right(), Facing::South);
        assert_eq!(Facing::North.rotate_right(), Facing::East);
    }

    #[test]
    fn deltas_match_wire_contract() {
        assert_eq!(Facing::East.delta(), (1, 0));
        assert_eq!(Facing::South.delta(), (0, 1));
        assert_eq!(Facing::West.delta(), (-1, 0));
        assert_eq!(Facing::North.delta(), (0, -1));
    }
}
