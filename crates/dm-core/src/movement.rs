use rand::Rng;
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};

use crate::direction::Direction;
use crate::party::PartyLocation;
use crate::position::Position;

/// A party move, relative to the direction the party is looking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Move {
    /// Step towards the look direction.
    Forward,
    /// Step away from the look direction without turning.
    Backward,
    /// Sidestep to the left.
    Left,
    /// Sidestep to the right.
    Right,
    /// Rotate a quarter turn anticlockwise in place.
    TurnLeft,
    /// Rotate a quarter turn clockwise in place.
    TurnRight,
}

impl Move {
    /// Whether the move only rotates the party.
    pub fn is_turn(self) -> bool {
        matches!(self, Self::TurnLeft | Self::TurnRight)
    }

    /// The compass direction of the step, or `None` for a turn.
    pub fn step_direction(self, look: Direction) -> Option<Direction> {
        match self {
            Self::Forward => Some(look),
            Self::Backward => Some(look.opposite()),
            Self::Left => Some(look.anticlockwise()),
            Self::Right => Some(look.clockwise()),
            Self::TurnLeft | Self::TurnRight => None,
        }
    }

    /// The look direction after the move.
    pub fn look_after(self, look: Direction) -> Direction {
        match self {
            Self::TurnLeft => look.anticlockwise(),
            Self::TurnRight => look.clockwise(),
            _ => look,
        }
    }

    /// The side of the party that hits first when the step is blocked.
    pub fn leading_side(self) -> Option<Side> {
        match self {
            Self::Forward => Some(Side::Front),
            Self::Backward => Some(Side::Rear),
            Self::Left => Some(Side::Left),
            Self::Right => Some(Side::Right),
            Self::TurnLeft | Self::TurnRight => None,
        }
    }
}

/// A side of the party formation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    /// The two front places.
    Front,
    /// The two rear places.
    Rear,
    /// The two left places.
    Left,
    /// The two right places.
    Right,
}

impl Side {
    /// The party places on this side.
    pub fn locations(self) -> [PartyLocation; 2] {
        match self {
            Self::Front => [PartyLocation::FrontLeft, PartyLocation::FrontRight],
            Self::Rear => [PartyLocation::RearLeft, PartyLocation::RearRight],
            Self::Left => [PartyLocation::FrontLeft, PartyLocation::RearLeft],
            Self::Right => [PartyLocation::FrontRight, PartyLocation::RearRight],
        }
    }
}

/// How a teleporter rewrites the look direction of what it relocates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DirectionTransform {
    /// Keep the direction.
    #[default]
    Identity,
    /// Turn a quarter clockwise.
    Clockwise,
    /// Turn a quarter anticlockwise.
    Anticlockwise,
    /// Turn around.
    Opposite,
    /// Pick any of the four directions.
    Random,
    /// Always face north.
    North,
    /// Always face east.
    East,
    /// Always face south.
    South,
    /// Always face west.
    West,
}

impl DirectionTransform {
    /// Apply the transform. Only [`DirectionTransform::Random`] draws from `rng`.
    pub fn apply(self, direction: Direction, rng: &mut StdRng) -> Direction {
        match self {
            Self::Identity => direction,
            Self::Clockwise => direction.clockwise(),
            Self::Anticlockwise => direction.anticlockwise(),
            Self::Opposite => direction.opposite(),
            Self::Random => Direction::ALL[rng.random_range(0..Direction::ALL.len())],
            Self::North => Direction::North,
            Self::East => Direction::East,
            Self::South => Direction::South,
            Self::West => Direction::West,
        }
    }
}

/// Where a step out of a cell actually lands, and which way the party then faces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Teleport {
    /// Landing position.
    pub position: Position,
    /// Look direction after landing.
    pub direction: Direction,
}

impl Teleport {
    /// Create a teleport descriptor.
    pub fn new(position: Position, direction: Direction) -> Self {
        Self {
            position,
            direction,
        }
    }
}

/// How quickly the party walks: the delay in ticks of a queued move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Speed {
    /// Two ticks per move.
    Fast,
    /// Four ticks per move.
    #[default]
    Normal,
    /// Eight ticks per move.
    Slow,
}

impl Speed {
    /// Delay in ticks before a queued move resolves.
    pub fn ticks(self) -> u32 {
        match self {
            Self::Fast => 2,
            Self::Normal => 4,
            Self::Slow => 8,
        }
    }
}
