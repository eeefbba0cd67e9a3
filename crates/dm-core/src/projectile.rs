use std::fmt;

use serde::{Deserialize, Serialize};

use crate::direction::Direction;

/// Identifier of one projectile, unique within a dungeon.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ProjectileId(pub u32);

impl fmt::Display for ProjectileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "projectile#{}", self.0)
    }
}

/// A projectile in flight. Its flight is driven elsewhere; cells only host it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Projectile {
    /// Identifier.
    pub id: ProjectileId,
    /// Flight direction.
    pub direction: Direction,
}

impl Projectile {
    /// Create a projectile.
    pub fn new(id: ProjectileId, direction: Direction) -> Self {
        Self { id, direction }
    }
}
