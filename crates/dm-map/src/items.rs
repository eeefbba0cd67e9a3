use dm_core::{Item, ItemId, ItemType, SubCell};

/// Per-sub-cell item stacks. Each stack is last-in, first-out.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ItemStacks {
    stacks: [Vec<Item>; 4],
}

impl ItemStacks {
    /// Four empty stacks.
    pub fn new() -> Self {
        Self::default()
    }

    /// The stack on a sub-cell, bottom first.
    pub fn items(&self, subcell: SubCell) -> &[Item] {
        &self.stacks[subcell.index()]
    }

    /// The item that would be picked next from a sub-cell.
    pub fn top(&self, subcell: SubCell) -> Option<&Item> {
        self.stacks[subcell.index()].last()
    }

    /// Whether every stack is empty.
    pub fn is_empty(&self) -> bool {
        self.stacks.iter().all(Vec::is_empty)
    }

    /// Total number of items on the cell.
    pub fn count(&self) -> usize {
        self.stacks.iter().map(Vec::len).sum()
    }

    /// Every item with the sub-cell it lies on.
    pub fn iter(&self) -> impl Iterator<Item = (SubCell, &Item)> {
        SubCell::ALL
            .into_iter()
            .flat_map(move |s| self.stacks[s.index()].iter().map(move |i| (s, i)))
    }

    /// Whether an item of `item_type` lies anywhere on the cell.
    pub fn contains_type(&self, item_type: ItemType) -> bool {
        self.iter().any(|(_, i)| i.item_type == item_type)
    }

    /// Where an item lies.
    pub fn find(&self, id: ItemId) -> Option<SubCell> {
        self.iter().find(|(_, i)| i.id == id).map(|(s, _)| s)
    }

    pub(crate) fn push(&mut self, subcell: SubCell, item: Item) {
        self.stacks[subcell.index()].push(item);
    }

    pub(crate) fn pop(&mut self, subcell: SubCell) -> Option<Item> {
        self.stacks[subcell.index()].pop()
    }

    pub(crate) fn take(&mut self, subcell: SubCell) -> Vec<Item> {
        std::mem::take(&mut self.stacks[subcell.index()])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dm_core::ItemCategory;

    const APPLE: ItemType = ItemType::new("apple", ItemCategory::Misc);

    #[test]
    fn stacks_are_lifo_per_subcell() {
        let mut stacks = ItemStacks::new();
        stacks.push(SubCell::NorthEast, Item::new(ItemId(1), APPLE));
        stacks.push(SubCell::NorthEast, Item::new(ItemId(2), APPLE));
        stacks.push(SubCell::SouthWest, Item::new(ItemId(3), APPLE));
        assert_eq!(stacks.count(), 3);
        assert_eq!(stacks.top(SubCell::NorthEast).map(|i| i.id), Some(ItemId(2)));
        assert_eq!(stacks.pop(SubCell::NorthEast).map(|i| i.id), Some(ItemId(2)));
        assert_eq!(stacks.pop(SubCell::NorthEast).map(|i| i.id), Some(ItemId(1)));
        assert_eq!(stacks.pop(SubCell::NorthEast), None);
        assert_eq!(stacks.find(ItemId(3)), Some(SubCell::SouthWest));
    }

    #[test]
    fn take_empties_a_stack() {
        let mut stacks = ItemStacks::new();
        stacks.push(SubCell::NorthWest, Item::new(ItemId(1), APPLE));
        stacks.push(SubCell::NorthWest, Item::new(ItemId(2), APPLE));
        let taken = stacks.take(SubCell::NorthWest);
        assert_eq!(taken.len(), 2);
        assert!(stacks.is_empty());
        assert!(!stacks.contains_type(APPLE));
    }
}
