use dm_core::{
    Creature, CreatureId, CreatureType, Direction, Item, ItemId, ItemType, Position, Projectile,
    ProjectileId, SubCell,
};
use tracing::{debug, info};

use super::{Dungeon, Listener, bump, cell};
use crate::creatures::Placement;
use crate::effect::Reactions;
use crate::error::{MapError, MapResult};
use crate::hazard::{HazardCloud, HazardId, HazardKind};

impl Dungeon {
    /// Strike the door at `at`. Reports whether it broke; a door that is
    /// already broken is an error.
    pub fn destroy_door(&mut self, at: Position) -> MapResult<bool> {
        let mut fx = Reactions::new(at);
        let broken = self.element_mut(at)?.destroy_door(&mut fx)?;
        self.resolve(vec![fx])?;
        Ok(broken)
    }

    /// Present an item to the lock or slot at `at`. Reports whether it
    /// was accepted.
    pub fn unlock(&mut self, at: Position, item: &Item) -> MapResult<bool> {
        let mut fx = Reactions::new(at);
        let accepted = self.element_mut(at)?.unlock(item.item_type, &mut fx)?;
        debug!(%at, item = item.item_type.name, accepted, "unlock attempt");
        self.resolve(vec![fx])?;
        Ok(accepted)
    }

    /// Flip the wall switch or lever at `at` by hand.
    pub fn operate(&mut self, at: Position) -> MapResult<()> {
        let mut fx = Reactions::new(at);
        self.element_mut(at)?.operate(&mut fx)?;
        self.resolve(vec![fx])
    }

    /// A fresh item with a dungeon-unique id.
    pub fn new_item(&mut self, item_type: ItemType) -> Item {
        Item::new(ItemId(bump(&mut self.ids.item)), item_type)
    }

    /// Put an item on top of a sub-cell's stack.
    pub fn drop_item(&mut self, at: Position, subcell: SubCell, item: Item) -> MapResult<()> {
        let mut fx = Reactions::new(at);
        self.element_mut(at)?.item_dropped(subcell, item, &mut fx);
        self.resolve(vec![fx])
    }

    /// Take the top item of a sub-cell's stack.
    pub fn pick_item(&mut self, at: Position, subcell: SubCell) -> MapResult<Option<Item>> {
        let mut fx = Reactions::new(at);
        let item = self.element_mut(at)?.pick_item(subcell, &mut fx);
        self.resolve(vec![fx])?;
        Ok(item)
    }

    /// Take the torch out of the holder at `at`.
    pub fn take_torch(&mut self, at: Position) -> MapResult<Option<Item>> {
        let mut fx = Reactions::new(at);
        let torch = self.element_mut(at)?.take_torch(&mut fx)?;
        self.resolve(vec![fx])?;
        Ok(torch)
    }

    /// Put a torch into the holder at `at`, getting back the one it held.
    pub fn put_torch(&mut self, at: Position, torch: Item) -> MapResult<Option<Item>> {
        let mut fx = Reactions::new(at);
        let previous = self.element_mut(at)?.put_torch(torch, &mut fx)?;
        self.resolve(vec![fx])?;
        Ok(previous)
    }

    /// A fresh creature with a dungeon-unique id.
    pub fn new_creature(&mut self, creature_type: CreatureType, multiplier: u32) -> Creature {
        Creature::new(
            CreatureId(bump(&mut self.ids.creature)),
            creature_type,
            multiplier,
        )
    }

    /// Put a creature wherever it fits on the cell.
    pub fn add_creature(&mut self, at: Position, creature: Creature) -> MapResult<Placement> {
        let host = cell(&self.levels, at)?;
        if !host.is_traversable_by_creature(&creature) {
            return Err(MapError::NotTraversable(at));
        }
        let placement = host.choose_placement(&creature, &mut self.rng, at)?;
        self.place_creature(at, creature, placement)?;
        Ok(placement)
    }

    /// Put a creature on the given sub-cells of a cell.
    pub fn place_creature(
        &mut self,
        at: Position,
        creature: Creature,
        placement: Placement,
    ) -> MapResult<()> {
        let host = self.element(at)?;
        if !host.is_traversable_by_creature(&creature) {
            return Err(MapError::NotTraversable(at));
        }
        let id = creature.id();
        let mut fx = Reactions::new(at);
        self.element_mut(at)?
            .creature_stepped_on(creature, placement, &mut fx)?;
        debug!(%at, creature = id.0, ?placement, "creature placed");
        self.resolve(vec![fx])
    }

    /// Take a creature off a cell.
    pub fn remove_creature(&mut self, at: Position, id: CreatureId) -> MapResult<Creature> {
        let mut fx = Reactions::new(at);
        let (creature, _) = self.element_mut(at)?.creature_stepped_off(id, &mut fx)?;
        self.resolve(vec![fx])?;
        Ok(creature)
    }

    /// A fresh projectile with a dungeon-unique id.
    pub fn new_projectile(&mut self, direction: Direction) -> Projectile {
        Projectile::new(ProjectileId(bump(&mut self.ids.projectile)), direction)
    }

    /// A projectile flies onto a sub-cell.
    pub fn projectile_arrived(
        &mut self,
        at: Position,
        subcell: SubCell,
        projectile: Projectile,
    ) -> MapResult<()> {
        let mut fx = Reactions::new(at);
        self.element_mut(at)?
            .projectile_arrived(subcell, projectile, &mut fx)?;
        self.resolve(vec![fx])
    }

    /// A projectile leaves a sub-cell.
    pub fn projectile_left(&mut self, at: Position, subcell: SubCell) -> MapResult<Projectile> {
        self.element_mut(at)?.projectile_left(subcell, at)
    }

    /// Release a poison cloud on a cell.
    pub fn create_poison_cloud(&mut self, at: Position) -> MapResult<HazardId> {
        self.add_hazard(at, HazardKind::PoisonCloud)
    }

    /// Raise a flux cage on a cell. A cell holds at most one.
    pub fn create_flux_cage(&mut self, at: Position) -> MapResult<HazardId> {
        self.add_hazard(at, HazardKind::FluxCage)
    }

    fn add_hazard(&mut self, at: Position, kind: HazardKind) -> MapResult<HazardId> {
        let id = self.next_hazard_id();
        self.element_mut(at)?
            .add_hazard(HazardCloud::new(id, kind), at)?;
        self.clock.register(Listener::Hazard(at, id));
        info!(%at, ?kind, %id, "hazard created");
        Ok(id)
    }
}
