use dm_core::{Direction, ItemType};
use dm_simulation::Sound;

use crate::effect::{Effect, Reactions};
use crate::element::ActuatorSlot;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Usage {
    used: u32,
    max: u32,
}

impl Usage {
    fn new(max: u32) -> Self {
        Self { used: 0, max: max.max(1) }
    }

    fn exhausted(self) -> bool {
        self.used >= self.max
    }

    /// Count one use, playing the lock sound and firing the actuator.
    fn consume(&mut self, fx: &mut Reactions) -> bool {
        if self.exhausted() {
            return false;
        }
        self.used += 1;
        fx.sound(Sound::Lock);
        fx.changed();
        fx.push(Effect::Fire(ActuatorSlot::Main));
        true
    }
}

/// A keyhole that opens with one key type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WallLock {
    direction: Direction,
    key: ItemType,
    usage: Usage,
}

impl WallLock {
    /// A single-use lock for `key`.
    pub fn new(direction: Direction, key: ItemType) -> Self {
        Self {
            direction,
            key,
            usage: Usage::new(1),
        }
    }

    /// Allow `uses` unlocks (at least one).
    pub fn with_uses(mut self, uses: u32) -> Self {
        self.usage = Usage::new(uses);
        self
    }

    /// Which way the lock faces.
    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// The key type that fits.
    pub fn key(&self) -> ItemType {
        self.key
    }

    /// Whether the lock has used up all its unlocks.
    pub fn is_unlocked(&self) -> bool {
        self.usage.exhausted()
    }

    /// Returns whether the key fit and the lock reacted.
    pub(crate) fn unlock(&mut self, item: ItemType, fx: &mut Reactions) -> bool {
        if !item.is_key() || item != self.key {
            tracing::debug!(at = %fx.at(), item = item.name, "wrong key");
            return false;
        }
        self.usage.consume(fx)
    }
}

/// A slot that accepts one item type, a limited number of times.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WallSlot {
    direction: Direction,
    item_type: ItemType,
    usage: Usage,
}

impl WallSlot {
    /// A single-use slot for `item_type`.
    pub fn new(direction: Direction, item_type: ItemType) -> Self {
        Self {
            direction,
            item_type,
            usage: Usage::new(1),
        }
    }

    /// Allow `uses` insertions (at least one).
    pub fn with_uses(mut self, uses: u32) -> Self {
        self.usage = Usage::new(uses);
        self
    }

    /// Which way the slot faces.
    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// The accepted item type.
    pub fn item_type(&self) -> ItemType {
        self.item_type
    }

    /// Insertions so far.
    pub fn uses(&self) -> u32 {
        self.usage.used
    }

    /// Whether the slot is used up.
    pub fn is_used(&self) -> bool {
        self.usage.exhausted()
    }

    /// Returns whether the item fit and the slot reacted.
    pub(crate) fn unlock(&mut self, item: ItemType, fx: &mut Reactions) -> bool {
        if item != self.item_type {
            return false;
        }
        self.usage.consume(fx)
    }
}
