use serde::{Deserialize, Serialize};

use crate::direction::Direction;

/// One of the four quadrants of a cell.
///
/// Two sub-cells are neighbours when they share a side; diagonally opposite
/// sub-cells are not.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubCell {
    /// North-east quadrant.
    NorthEast,
    /// North-west quadrant.
    NorthWest,
    /// South-east quadrant.
    SouthEast,
    /// South-west quadrant.
    SouthWest,
}

impl SubCell {
    /// All four sub-cells, in slot order.
    pub const ALL: [SubCell; 4] = [
        Self::NorthEast,
        Self::NorthWest,
        Self::SouthEast,
        Self::SouthWest,
    ];

    /// Slot index used by fixed-size per-cell arrays.
    pub fn index(self) -> usize {
        match self {
            Self::NorthEast => 0,
            Self::NorthWest => 1,
            Self::SouthEast => 2,
            Self::SouthWest => 3,
        }
    }

    /// Whether this sub-cell lies on the northern half.
    pub fn is_northern(self) -> bool {
        matches!(self, Self::NorthEast | Self::NorthWest)
    }

    /// Whether this sub-cell lies on the eastern half.
    pub fn is_eastern(self) -> bool {
        matches!(self, Self::NorthEast | Self::SouthEast)
    }

    /// Whether the two sub-cells share a side.
    pub fn is_neighbour_of(self, other: SubCell) -> bool {
        self != other && self != other.diagonal()
    }

    /// The diagonally opposite sub-cell.
    pub fn diagonal(self) -> Self {
        match self {
            Self::NorthEast => Self::SouthWest,
            Self::SouthWest => Self::NorthEast,
            Self::NorthWest => Self::SouthEast,
            Self::SouthEast => Self::NorthWest,
        }
    }

    /// The two sub-cells forming the half of a cell facing `direction`.
    pub fn visible_from(direction: Direction) -> [SubCell; 2] {
        match direction {
            Direction::North => [Self::NorthEast, Self::NorthWest],
            Direction::South => [Self::SouthEast, Self::SouthWest],
            Direction::West => [Self::NorthWest, Self::SouthWest],
            Direction::East => [Self::NorthEast, Self::SouthEast],
        }
    }

    /// The direction whose half is exactly `{a, b}`, if the pair forms a half.
    pub fn pair_direction(a: SubCell, b: SubCell) -> Option<Direction> {
        Direction::ALL.into_iter().find(|d| {
            let [x, y] = Self::visible_from(*d);
            (x == a && y == b) || (x == b && y == a)
        })
    }

    /// The sub-cell an alcove-like wall facing `direction` exposes its items on.
    pub fn facing(direction: Direction) -> Self {
        match direction {
            Direction::North => Self::NorthEast,
            Direction::South => Self::NorthWest,
            Direction::East => Self::SouthEast,
            Direction::West => Self::SouthWest,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn any_subcell() -> impl Strategy<Value = SubCell> {
        prop::sample::select(SubCell::ALL.to_vec())
    }

    proptest! {
        #[test]
        fn neighbourhood_is_symmetric(a in any_subcell(), b in any_subcell()) {
            prop_assert_eq!(a.is_neighbour_of(b), b.is_neighbour_of(a));
        }

        #[test]
        fn each_subcell_has_two_neighbours(a in any_subcell()) {
            let count = SubCell::ALL.iter().filter(|b| a.is_neighbour_of(**b)).count();
            prop_assert_eq!(count, 2);
        }
    }

    #[test]
    fn diagonals_are_not_neighbours() {
        assert!(!SubCell::NorthEast.is_neighbour_of(SubCell::SouthWest));
        assert!(!SubCell::NorthWest.is_neighbour_of(SubCell::SouthEast));
        assert!(SubCell::NorthEast.is_neighbour_of(SubCell::NorthWest));
        assert!(SubCell::NorthEast.is_neighbour_of(SubCell::SouthEast));
    }

    #[test]
    fn halves_are_neighbour_pairs() {
        for direction in Direction::ALL {
            let [a, b] = SubCell::visible_from(direction);
            assert!(a.is_neighbour_of(b));
            assert_eq!(SubCell::pair_direction(b, a), Some(direction));
        }
        assert_eq!(
            SubCell::pair_direction(SubCell::NorthEast, SubCell::SouthWest),
            None
        );
    }

    #[test]
    fn slot_indices_are_distinct() {
        let mut seen = [false; 4];
        for s in SubCell::ALL {
            seen[s.index()] = true;
        }
        assert!(seen.iter().all(|b| *b));
    }
}
