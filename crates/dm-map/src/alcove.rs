use dm_core::{Direction, Item, ItemCategory, ItemType, SubCell};

use crate::effect::{Effect, Reactions};
use crate::element::ActuatorSlot;
use crate::error::{MapError, MapResult};

/// A niche in a wall holding items. With an item type set, only items of
/// that type fire the actuator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Alcove {
    direction: Direction,
    item_type: Option<ItemType>,
}

impl Alcove {
    /// An alcove facing `direction` that reacts to any item.
    pub fn new(direction: Direction) -> Self {
        Self {
            direction,
            item_type: None,
        }
    }

    /// React only to items of `item_type`.
    pub fn for_type(direction: Direction, item_type: ItemType) -> Self {
        Self {
            direction,
            item_type: Some(item_type),
        }
    }

    /// Which way the alcove faces.
    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// The sub-cell the items lie on.
    pub fn subcell(&self) -> SubCell {
        SubCell::facing(self.direction)
    }

    /// The item type the alcove reacts to, if restricted.
    pub fn item_type(&self) -> Option<ItemType> {
        self.item_type
    }

    pub(crate) fn reacts_to(&self, item: ItemType) -> bool {
        self.item_type.is_none_or(|t| t == item)
    }
}

/// An altar: an alcove reacting to any item, where bones lie.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Altar {
    direction: Direction,
}

impl Altar {
    /// An altar facing `direction`.
    pub fn new(direction: Direction) -> Self {
        Self { direction }
    }

    /// Which way the altar faces.
    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// The sub-cell the items lie on.
    pub fn subcell(&self) -> SubCell {
        SubCell::facing(self.direction)
    }
}

/// A torch holder. Taking or putting a torch fires the actuator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TorchWall {
    direction: Direction,
    torch: Option<Item>,
}

impl TorchWall {
    /// An empty holder facing `direction`.
    pub fn new(direction: Direction) -> Self {
        Self {
            direction,
            torch: None,
        }
    }

    /// Start with a torch in the holder.
    pub fn with_torch(mut self, torch: Item) -> Self {
        self.torch = Some(torch);
        self
    }

    /// Which way the holder faces.
    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// The torch in the holder.
    pub fn torch(&self) -> Option<&Item> {
        self.torch.as_ref()
    }

    pub(crate) fn take_torch(&mut self, fx: &mut Reactions) -> Option<Item> {
        let torch = self.torch.take()?;
        fx.changed();
        fx.push(Effect::Fire(ActuatorSlot::Main));
        Some(torch)
    }

    /// Put a torch in, returning the one it replaces.
    pub(crate) fn put_torch(&mut self, torch: Item, fx: &mut Reactions) -> MapResult<Option<Item>> {
        if torch.item_type.category != ItemCategory::Torch {
            return Err(MapError::NotATorch(fx.at()));
        }
        let previous = self.torch.replace(torch);
        fx.changed();
        fx.push(Effect::Fire(ActuatorSlot::Main));
        Ok(previous)
    }
}
