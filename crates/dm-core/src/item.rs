use std::fmt;

use serde::{Deserialize, Serialize};

/// Broad item families the map elements care about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemCategory {
    /// Opens wall locks.
    Key,
    /// Fits in torch holders.
    Torch,
    /// Remains of a champion; altars react to them.
    Bones,
    /// Anything else.
    Misc,
}

/// An item type. Two items match a lock or slot when their types are equal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ItemType {
    /// Display name.
    pub name: &'static str,
    /// Family.
    pub category: ItemCategory,
}

impl ItemType {
    /// Create an item type.
    pub const fn new(name: &'static str, category: ItemCategory) -> Self {
        Self { name, category }
    }

    /// Whether items of this type are keys.
    pub fn is_key(&self) -> bool {
        self.category == ItemCategory::Key
    }
}

/// Identifier of one item, unique within a dungeon.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ItemId(pub u32);

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "item#{}", self.0)
    }
}

/// A single item lying somewhere in the dungeon.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Item {
    /// Identifier.
    pub id: ItemId,
    /// Type.
    pub item_type: ItemType,
}

impl Item {
    /// Create an item.
    pub fn new(id: ItemId, item_type: ItemType) -> Self {
        Self { id, item_type }
    }
}
