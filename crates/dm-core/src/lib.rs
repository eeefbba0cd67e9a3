//! Core types for the dungeon engine.
//!
//! Grid geometry (positions, compass directions, sub-cells, moves) and the
//! narrow model of the collaborators living on the grid: the party and its
//! champions, creatures, items and projectiles. The simulation crates only
//! ask these types capability questions (footprint, height, materiality,
//! health); the game-balance catalogs behind them live elsewhere.

/// Creature types, footprints and individual creatures.
pub mod creature;
/// Compass directions and axis orientations.
pub mod direction;
/// Error types used throughout the crate.
pub mod error;
/// Items and item types.
pub mod item;
/// Party moves, direction transforms and teleport descriptors.
pub mod movement;
/// The travelling party and its champions.
pub mod party;
/// Grid positions.
pub mod position;
/// Projectiles in flight.
pub mod projectile;
/// The four quadrants of a cell.
pub mod subcell;

/// Re-export creature types.
pub use creature::{Creature, CreatureId, CreatureType, Height, Materiality, Size};
/// Re-export direction types.
pub use direction::{Direction, Orientation};
/// Re-export error types.
pub use error::{CoreError, CoreResult};
/// Re-export item types.
pub use item::{Item, ItemCategory, ItemId, ItemType};
/// Re-export movement types.
pub use movement::{DirectionTransform, Move, Side, Speed, Teleport};
/// Re-export party types.
pub use party::{Champion, Party, PartyLocation};
/// Re-export the position type.
pub use position::Position;
/// Re-export projectile types.
pub use projectile::{Projectile, ProjectileId};
/// Re-export the sub-cell type.
pub use subcell::SubCell;
