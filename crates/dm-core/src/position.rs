use std::fmt;

use serde::{Deserialize, Serialize};

use crate::direction::Direction;

/// An immutable `(x, y, z)` cell coordinate. `z` selects the level.
///
/// Levels are stacked downwards: going down a level increments `z`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
pub struct Position {
    /// Column, growing eastwards.
    pub x: i32,
    /// Row, growing southwards.
    pub y: i32,
    /// Level number.
    pub z: i32,
}

impl Position {
    /// Create a position.
    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    /// The neighbouring cell on the same level in the given direction.
    pub fn towards(self, direction: Direction) -> Self {
        let (dx, dy) = direction.offset();
        Self::new(self.x + dx, self.y + dy, self.z)
    }

    /// The cell directly below, one level down.
    pub fn below(self) -> Self {
        Self::new(self.x, self.y, self.z + 1)
    }

    /// The cell directly above, one level up.
    pub fn above(self) -> Self {
        Self::new(self.x, self.y, self.z - 1)
    }

    /// The four neighbours on the same level, in clockwise order from north.
    pub fn neighbours(self) -> [Self; 4] {
        Direction::ALL.map(|d| self.towards(d))
    }

    /// Manhattan distance on the same level, `None` across levels.
    pub fn distance(self, other: Self) -> Option<u32> {
        if self.z != other.z {
            return None;
        }
        Some(self.x.abs_diff(other.x) + self.y.abs_diff(other.y))
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.x, self.y, self.z)
    }
}
