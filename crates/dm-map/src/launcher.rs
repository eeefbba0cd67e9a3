use dm_core::Direction;
use dm_simulation::TriggerAction;

use crate::effect::{Effect, Reactions};

/// A wall that shoots a pair of projectiles onto the cell in front of it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProjectileLauncher {
    direction: Direction,
}

impl ProjectileLauncher {
    /// A launcher shooting towards `direction`.
    pub fn new(direction: Direction) -> Self {
        Self { direction }
    }

    /// Which way the projectiles fly.
    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Every action shoots.
    pub(crate) fn trigger(&self, _action: TriggerAction, fx: &mut Reactions) {
        fx.push(Effect::Launch(self.direction));
    }
}
