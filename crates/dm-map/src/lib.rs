//! The dungeon map: cells, what stands on them, and how the party moves.
//!
//! A [`Dungeon`] owns its [`Level`]s, the party and a tick clock. Each cell is
//! an [`Element`]: a tagged variant (floor, wall, door, pit, teleporter, ...)
//! plus the creatures, items, projectiles and hazards on it. Interactive
//! elements are small state machines; their follow-up effects (falls,
//! teleports, actuator firings, sounds) are resolved by the dungeon in the
//! order they were raised.

/// Wall niches, altars and torch holders.
pub mod alcove;
/// Creature occupancy of a single cell.
pub mod creatures;
/// Doors and their animation.
pub mod door;
/// The multi-level container and movement resolution.
pub mod dungeon;
mod effect;
/// Element variants and per-cell occupancy.
pub mod element;
/// Error types for the map crate.
pub mod error;
/// Creature generators.
pub mod generator;
/// Poison clouds and flux cages.
pub mod hazard;
/// Per-sub-cell item stacks.
pub mod items;
/// Projectile launchers.
pub mod launcher;
/// One floor of the dungeon.
pub mod level;
/// Keyholes and item slots.
pub mod locks;
/// Pits.
pub mod pit;
/// Staircases.
pub mod stairs;
/// Floor switches, wall switches and levers.
pub mod switches;
/// Teleporters.
pub mod teleporter;
/// Retractable walls.
pub mod walls;

/// Re-exports of alcove types.
pub use alcove::{Alcove, Altar, TorchWall};
/// Re-exports of creature occupancy types.
pub use creatures::{CreatureManager, Placement};
/// Re-exports of door types.
pub use door::{Door, DoorMotion, DoorState, DoorStyle};
/// Re-exports of dungeon types.
pub use dungeon::{ActuatorId, Dungeon, Listener, Task, TaskId};
/// Re-exports of element types.
pub use element::{ActuatorSlot, Element, ElementKind, Occupant};
/// Re-exports of [`error::MapError`], [`error::MapResult`] and [`error::ValidationError`].
pub use error::{MapError, MapResult, ValidationError};
/// Re-exports of generator types.
pub use generator::{Generator, GeneratorState};
/// Re-exports of hazard types.
pub use hazard::{HazardCloud, HazardId, HazardKind};
/// Re-export of [`items::ItemStacks`].
pub use items::ItemStacks;
/// Re-export of [`launcher::ProjectileLauncher`].
pub use launcher::ProjectileLauncher;
/// Re-export of [`level::Level`].
pub use level::Level;
/// Re-exports of lock types.
pub use locks::{WallLock, WallSlot};
/// Re-export of [`pit::Pit`].
pub use pit::Pit;
/// Re-export of [`stairs::Stairs`].
pub use stairs::Stairs;
/// Re-exports of switch types.
pub use switches::{FloorSwitch, Lever, TriggerType, WallSwitch};
/// Re-export of [`teleporter::Teleporter`].
pub use teleporter::Teleporter;
/// Re-export of [`walls::RetractableWall`].
pub use walls::RetractableWall;
