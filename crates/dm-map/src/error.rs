use dm_core::{CoreError, CreatureId, Position, Size, SubCell};
use dm_simulation::SimError;

/// Alias for `Result<T, MapError>`.
pub type MapResult<T> = Result<T, MapError>;

/// Contract violations: operations that a correctly authored dungeon and a
/// caller respecting the documented preconditions never trigger.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum MapError {
    /// No level with this number.
    #[error("no level {0}")]
    NoSuchLevel(i32),

    /// Level numbers start at 1.
    #[error("invalid level number {0}")]
    InvalidLevelNumber(i32),

    /// A level with this number already exists.
    #[error("level {0} already exists")]
    DuplicateLevel(i32),

    /// A level needs at least one cell.
    #[error("invalid level size {width}x{height}")]
    InvalidLevelSize {
        /// Requested width.
        width: u32,
        /// Requested height.
        height: u32,
    },

    /// The position lies outside its level.
    #[error("position {0} is outside the level")]
    OutOfBounds(Position),

    /// Experience multipliers must be positive.
    #[error("experience multiplier must be positive")]
    InvalidMultiplier,

    /// The dungeon has no party yet.
    #[error("the dungeon has no party")]
    NoParty,

    /// The dungeon already has a party.
    #[error("the dungeon already has a party")]
    PartyExists,

    /// The party is expected on this cell but is not there.
    #[error("the party is not at {0}")]
    PartyNotHere(Position),

    /// The party is already on this cell.
    #[error("the party is already at {0}")]
    PartyAlreadyHere(Position),

    /// The cell cannot be entered by this occupant.
    #[error("{0} cannot be entered")]
    NotTraversable(Position),

    /// A sub-cell is already taken.
    #[error("sub-cell {subcell:?} at {at} is already occupied")]
    SubCellOccupied {
        /// The cell.
        at: Position,
        /// The sub-cell.
        subcell: SubCell,
    },

    /// The creature does not fit in the room left on the cell.
    #[error("no room at {at}: {needed} needed, {free} free")]
    NoRoom {
        /// The cell.
        at: Position,
        /// Room the creature needs.
        needed: u8,
        /// Room left.
        free: u8,
    },

    /// The placement does not match the creature's footprint.
    #[error("a creature of size {size:?} cannot be placed that way")]
    WrongFootprint {
        /// The creature's footprint.
        size: Size,
    },

    /// The creature is not on this cell.
    #[error("creature {creature} is not at {at}")]
    CreatureNotHere {
        /// The cell.
        at: Position,
        /// The creature.
        creature: CreatureId,
    },

    /// No projectile on this sub-cell.
    #[error("no projectile on {subcell:?} at {at}")]
    NoProjectile {
        /// The cell.
        at: Position,
        /// The sub-cell.
        subcell: SubCell,
    },

    /// A cell holds at most one flux cage.
    #[error("{0} already holds a flux cage")]
    FluxCageExists(Position),

    /// Destroying a door that is already broken.
    #[error("the door at {0} is already broken")]
    DoorAlreadyBroken(Position),

    /// The operation needs a different kind of element.
    #[error("{at} is not a {expected}")]
    WrongElement {
        /// The cell.
        at: Position,
        /// What the operation expected.
        expected: &'static str,
    },

    /// The element does not react to triggers.
    #[error("{0} cannot be triggered")]
    NotTriggerable(Position),

    /// The element cannot carry this actuator.
    #[error("{0} cannot carry an actuator")]
    NoActuatorSupport(Position),

    /// Only torches fit in torch holders.
    #[error("only torches fit the holder at {0}")]
    NotATorch(Position),

    /// A chain of reactions did not settle.
    #[error("reaction cascade exceeded depth {0}")]
    CascadeOverflow(usize),

    /// An error from the scheduling primitives.
    #[error(transparent)]
    Sim(#[from] SimError),

    /// An error from the core model.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// The dungeon data is malformed.
    #[error(transparent)]
    Validation(#[from] ValidationError),
}

/// Structural problems found by a validation pass over a level or dungeon.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ValidationError {
    /// A border cell is not solid.
    #[error("border cell {0} is not concrete")]
    BorderNotConcrete(Position),

    /// An element needs solid cells on both sides.
    #[error("{element} at {at} is not flanked by concrete cells")]
    NotFlanked {
        /// The cell.
        at: Position,
        /// Element caption.
        element: &'static str,
    },

    /// The cell beyond a staircase must be solid.
    #[error("stairs at {0} must lead into a concrete cell")]
    StairsOpenBehind(Position),

    /// Stairs lead to something that is not a staircase.
    #[error("stairs at {at} lead to {destination}, which is not a staircase")]
    StairsDestination {
        /// The stairs.
        at: Position,
        /// Their destination.
        destination: Position,
    },

    /// Paired stairs must go one level up and one level down.
    #[error("stairs at {0} do not pair with stairs one level away in the other sense")]
    StairsMismatch(Position),

    /// Wall locks open only with keys.
    #[error("the lock at {0} requires an item that is not a key")]
    LockWithoutKey(Position),

    /// The party stands inside a wall.
    #[error("the party stands inside the wall at {0}")]
    PartyInWall(Position),

    /// A teleporter leads outside the dungeon or into a cell the party cannot enter.
    #[error("teleporter at {at} leads to unusable cell {destination}")]
    TeleporterDestination {
        /// The teleporter.
        at: Position,
        /// Its destination.
        destination: Position,
    },

    /// An actuator aims at a cell that does not react to triggers.
    #[error("actuator on {mounted_at} targets {target}, which cannot be triggered")]
    ActuatorTarget {
        /// Where the actuator is mounted.
        mounted_at: Position,
        /// The bad target.
        target: Position,
    },
}
