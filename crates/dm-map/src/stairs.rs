use dm_core::{Direction, Position};

/// A staircase. `direction` points from the stairs into the wall behind
/// them: the party takes the stairs when it faces that way.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Stairs {
    direction: Direction,
    up: bool,
    destination: Position,
}

impl Stairs {
    /// Stairs going up or down to the paired stairs at `destination`.
    pub fn new(direction: Direction, up: bool, destination: Position) -> Self {
        Self {
            direction,
            up,
            destination,
        }
    }

    /// Which way the stairs climb into the wall.
    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Whether the stairs lead one level up.
    pub fn is_up(&self) -> bool {
        self.up
    }

    /// The paired stairs.
    pub fn destination(&self) -> Position {
        self.destination
    }
}
