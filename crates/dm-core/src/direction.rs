use std::fmt;

use serde::{Deserialize, Serialize};

/// One of the four compass directions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    /// Towards decreasing `y`.
    North,
    /// Towards increasing `x`.
    East,
    /// Towards increasing `y`.
    South,
    /// Towards decreasing `x`.
    West,
}

/// The axis a direction lies on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Orientation {
    /// The north/south axis.
    NorthSouth,
    /// The west/east axis.
    WestEast,
}

impl Direction {
    /// All four directions in clockwise order, starting north.
    pub const ALL: [Direction; 4] = [Self::North, Self::East, Self::South, Self::West];

    /// `(dx, dy)` of one step in this direction.
    pub fn offset(self) -> (i32, i32) {
        match self {
            Self::North => (0, -1),
            Self::East => (1, 0),
            Self::South => (0, 1),
            Self::West => (-1, 0),
        }
    }

    /// The next direction turning clockwise.
    pub fn clockwise(self) -> Self {
        match self {
            Self::North => Self::East,
            Self::East => Self::South,
            Self::South => Self::West,
            Self::West => Self::North,
        }
    }

    /// The next direction turning anticlockwise.
    pub fn anticlockwise(self) -> Self {
        match self {
            Self::North => Self::West,
            Self::West => Self::South,
            Self::South => Self::East,
            Self::East => Self::North,
        }
    }

    /// The opposite direction.
    pub fn opposite(self) -> Self {
        match self {
            Self::North => Self::South,
            Self::South => Self::North,
            Self::East => Self::West,
            Self::West => Self::East,
        }
    }

    /// The axis this direction lies on.
    pub fn orientation(self) -> Orientation {
        match self {
            Self::North | Self::South => Orientation::NorthSouth,
            Self::East | Self::West => Orientation::WestEast,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::North => "north",
            Self::East => "east",
            Self::South => "south",
            Self::West => "west",
        };
        write!(f, "{name}")
    }
}

impl Orientation {
    /// The other axis.
    pub fn perpendicular(self) -> Self {
        match self {
            Self::NorthSouth => Self::WestEast,
            Self::WestEast => Self::NorthSouth,
        }
    }

    /// The two directions along this axis.
    pub fn directions(self) -> [Direction; 2] {
        match self {
            Self::NorthSouth => [Direction::North, Direction::South],
            Self::WestEast => [Direction::West, Direction::East],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn any_direction() -> impl Strategy<Value = Direction> {
        prop::sample::select(Direction::ALL.to_vec())
    }

    proptest! {
        #[test]
        fn four_clockwise_turns_are_identity(d in any_direction()) {
            prop_assert_eq!(d.clockwise().clockwise().clockwise().clockwise(), d);
        }

        #[test]
        fn clockwise_undoes_anticlockwise(d in any_direction()) {
            prop_assert_eq!(d.anticlockwise().clockwise(), d);
        }

        #[test]
        fn opposite_is_two_turns(d in any_direction()) {
            prop_assert_eq!(d.opposite(), d.clockwise().clockwise());
            prop_assert_eq!(d.opposite().orientation(), d.orientation());
        }
    }

    #[test]
    fn orientation_axes() {
        assert_eq!(Direction::North.orientation(), Orientation::NorthSouth);
        assert_eq!(Direction::West.orientation(), Orientation::WestEast);
        assert_eq!(Orientation::NorthSouth.perpendicular(), Orientation::WestEast);
        assert_eq!(
            Orientation::WestEast.directions(),
            [Direction::West, Direction::East]
        );
    }
}
