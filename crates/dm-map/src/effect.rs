//! Reactions produced by element state machines and resolved by the dungeon.

use dm_core::{CreatureId, CreatureType, Direction, Position, SubCell};
use dm_simulation::Sound;

use crate::element::ActuatorSlot;

/// Something that can be relocated off a cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Mover {
    Party,
    Creature(CreatureId),
    Projectile(SubCell),
    Items(SubCell),
}

/// A follow-up an element asks the dungeon to carry out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Effect {
    /// Deliver clock ticks to the element.
    Listen,
    /// Start the actuator hanging from a slot.
    Fire(ActuatorSlot),
    Sound(Sound),
    /// Visible state changed.
    Changed,
    /// Drop something one level down.
    Fall(Mover),
    /// Send something to the teleporter's destination.
    Teleport(Mover),
    /// Take the party up or down the stairs.
    TakeStairs,
    Spawn {
        creature_type: CreatureType,
        count: u32,
        multiplier: u32,
    },
    HurtParty {
        min: u32,
        max: u32,
    },
    HazardExpired,
    /// Shoot two projectiles onto the neighbouring cell.
    Launch(Direction),
}

/// Effects raised by one cell during one operation, in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Reactions {
    at: Position,
    effects: Vec<Effect>,
}

impl Reactions {
    pub(crate) fn new(at: Position) -> Self {
        Self {
            at,
            effects: Vec::new(),
        }
    }

    pub(crate) fn at(&self) -> Position {
        self.at
    }

    pub(crate) fn push(&mut self, effect: Effect) {
        self.effects.push(effect);
    }

    pub(crate) fn sound(&mut self, sound: Sound) {
        self.effects.push(Effect::Sound(sound));
    }

    pub(crate) fn changed(&mut self) {
        self.effects.push(Effect::Changed);
    }

    pub(crate) fn effects(&self) -> &[Effect] {
        &self.effects
    }

    pub(crate) fn into_effects(self) -> Vec<Effect> {
        self.effects
    }
}
