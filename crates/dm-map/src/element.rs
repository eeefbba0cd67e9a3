use std::collections::BTreeMap;

use dm_core::{Creature, CreatureId, Direction, Item, ItemType, Position, Projectile, SubCell};
use dm_simulation::{Actuator, TriggerAction};
use rand::rngs::StdRng;

use crate::alcove::{Alcove, Altar, TorchWall};
use crate::creatures::{CreatureManager, Placement};
use crate::door::Door;
use crate::effect::{Effect, Mover, Reactions};
use crate::error::{MapError, MapResult, ValidationError};
use crate::generator::Generator;
use crate::hazard::{HazardCloud, HazardId, HazardKind, Pulse};
use crate::items::ItemStacks;
use crate::launcher::ProjectileLauncher;
use crate::level::Level;
use crate::locks::{WallLock, WallSlot};
use crate::pit::Pit;
use crate::stairs::Stairs;
use crate::switches::{FloorSwitch, Lever, TriggerType, WallSwitch};
use crate::teleporter::Teleporter;
use crate::walls::RetractableWall;

/// Where an actuator hangs on an element: the element's own actuator, or one
/// of a floor switch's per-trigger actuators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ActuatorSlot {
    /// Fired by switches, levers, locks, slots, alcoves, altars and torch holders.
    Main,
    /// Fired by a floor switch on one kind of occupancy change.
    On(TriggerType),
}

/// What kind of cell an element is, with its kind-specific state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ElementKind {
    /// Plain floor.
    Floor,
    /// Floor with a decoration.
    DecoratedFloor,
    /// Plain wall.
    Wall,
    /// Wall with a decoration.
    DecoratedWall,
    /// Wall with an inscription.
    TextWall(String),
    /// Looks like a wall, walks like a floor.
    FakeWall,
    /// Looks like a floor, blocks like a wall.
    InvisibleWall,
    /// Wall that slides away when triggered.
    RetractableWall(RetractableWall),
    /// Free-standing pillar.
    Pillar,
    /// Door.
    Door(Door),
    /// Pit.
    Pit(Pit),
    /// Teleporter.
    Teleporter(Teleporter),
    /// Staircase.
    Stairs(Stairs),
    /// Creature generator.
    Generator(Generator),
    /// Pressure pad.
    FloorSwitch(FloorSwitch),
    /// Button in a wall.
    WallSwitch(WallSwitch),
    /// Lever in a wall.
    Lever(Lever),
    /// Keyhole in a wall.
    WallLock(WallLock),
    /// Item slot in a wall.
    WallSlot(WallSlot),
    /// Niche in a wall.
    Alcove(Alcove),
    /// Altar.
    Altar(Altar),
    /// Torch holder.
    TorchWall(TorchWall),
    /// Fountain.
    Fountain,
    /// Wall that shoots projectiles when triggered.
    ProjectileLauncher(ProjectileLauncher),
}

impl ElementKind {
    /// Short name used in events and errors.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Floor => "floor",
            Self::DecoratedFloor => "decorated floor",
            Self::Wall => "wall",
            Self::DecoratedWall => "decorated wall",
            Self::TextWall(_) => "text wall",
            Self::FakeWall => "fake wall",
            Self::InvisibleWall => "invisible wall",
            Self::RetractableWall(_) => "retractable wall",
            Self::Pillar => "pillar",
            Self::Door(_) => "door",
            Self::Pit(_) => "pit",
            Self::Teleporter(_) => "teleporter",
            Self::Stairs(_) => "stairs",
            Self::Generator(_) => "generator",
            Self::FloorSwitch(_) => "floor switch",
            Self::WallSwitch(_) => "wall switch",
            Self::Lever(_) => "lever",
            Self::WallLock(_) => "wall lock",
            Self::WallSlot(_) => "wall slot",
            Self::Alcove(_) => "alcove",
            Self::Altar(_) => "altar",
            Self::TorchWall(_) => "torch wall",
            Self::Fountain => "fountain",
            Self::ProjectileLauncher(_) => "projectile launcher",
        }
    }

    /// One- or two-letter map caption.
    pub fn caption(&self) -> &'static str {
        match self {
            Self::Floor => "..",
            Self::DecoratedFloor => "DF",
            Self::Wall => "W",
            Self::DecoratedWall => "DW",
            Self::TextWall(_) => "TW",
            Self::FakeWall => "FW",
            Self::InvisibleWall => "IW",
            Self::RetractableWall(_) => "RW",
            Self::Pillar => "P",
            Self::Door(_) => "D",
            Self::Pit(_) => "O",
            Self::Teleporter(_) => "TP",
            Self::Stairs(s) if s.is_up() => "SU",
            Self::Stairs(_) => "SD",
            Self::Generator(_) => "GN",
            Self::FloorSwitch(_) => "FS",
            Self::WallSwitch(_) => "WS",
            Self::Lever(_) => "LV",
            Self::WallLock(_) => "LK",
            Self::WallSlot(_) => "SL",
            Self::Alcove(_) => "A",
            Self::Altar(_) => "AL",
            Self::TorchWall(_) => "T",
            Self::Fountain => "F",
            Self::ProjectileLauncher(_) => "L",
        }
    }

    /// Whether the cell is solid: usable on level borders and beside doors
    /// and stairs.
    pub fn is_concrete(&self) -> bool {
        matches!(
            self,
            Self::Wall
                | Self::DecoratedWall
                | Self::TextWall(_)
                | Self::Fountain
                | Self::WallSwitch(_)
                | Self::Lever(_)
                | Self::WallLock(_)
                | Self::WallSlot(_)
                | Self::Alcove(_)
                | Self::Altar(_)
                | Self::TorchWall(_)
                | Self::ProjectileLauncher(_)
        )
    }

    /// Whether actuators can hang from `slot`.
    pub fn supports(&self, slot: ActuatorSlot) -> bool {
        match slot {
            ActuatorSlot::Main => matches!(
                self,
                Self::WallSwitch(_)
                    | Self::Lever(_)
                    | Self::WallLock(_)
                    | Self::WallSlot(_)
                    | Self::Alcove(_)
                    | Self::Altar(_)
                    | Self::TorchWall(_)
            ),
            ActuatorSlot::On(_) => matches!(self, Self::FloorSwitch(_)),
        }
    }

    /// Whether actuators can target this kind.
    pub fn is_triggerable(&self) -> bool {
        matches!(
            self,
            Self::Door(_)
                | Self::Pit(_)
                | Self::Teleporter(_)
                | Self::RetractableWall(_)
                | Self::Lever(_)
                | Self::WallSwitch(_)
                | Self::Generator(_)
                | Self::ProjectileLauncher(_)
        )
    }
}

/// Who wants to enter a cell.
#[derive(Debug, Clone, Copy)]
pub enum Occupant<'a> {
    /// The party.
    Party,
    /// A specific creature.
    Creature(&'a Creature),
    /// A projectile.
    Projectile,
}

/// One cell of a level: its kind and everything standing on it.
#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    kind: ElementKind,
    position: Option<Position>,
    party: bool,
    creatures: CreatureManager,
    items: ItemStacks,
    projectiles: [Option<Projectile>; 4],
    hazards: Vec<HazardCloud>,
    actuators: BTreeMap<ActuatorSlot, Actuator<Position>>,
}

impl From<ElementKind> for Element {
    fn from(kind: ElementKind) -> Self {
        Self::new(kind)
    }
}

macro_rules! element_from {
    ($($variant:ident),*) => {
        $(
            impl From<$variant> for Element {
                fn from(value: $variant) -> Self {
                    Self::new(ElementKind::$variant(value))
                }
            }
        )*
    };
}

element_from!(
    RetractableWall,
    Door,
    Pit,
    Teleporter,
    Stairs,
    Generator,
    FloorSwitch,
    WallSwitch,
    Lever,
    WallLock,
    WallSlot,
    Alcove,
    Altar,
    ProjectileLauncher,
    TorchWall
);

impl Element {
    /// A detached, empty element.
    pub fn new(kind: ElementKind) -> Self {
        Self {
            kind,
            position: None,
            party: false,
            creatures: CreatureManager::new(),
            items: ItemStacks::new(),
            projectiles: [None; 4],
            hazards: Vec::new(),
            actuators: BTreeMap::new(),
        }
    }

    /// Plain floor.
    pub fn floor() -> Self {
        Self::new(ElementKind::Floor)
    }

    /// Plain wall.
    pub fn wall() -> Self {
        Self::new(ElementKind::Wall)
    }

    /// Kind and kind-specific state.
    pub fn kind(&self) -> &ElementKind {
        &self.kind
    }

    /// Position, or `None` while detached.
    pub fn position(&self) -> Option<Position> {
        self.position
    }

    pub(crate) fn attach(&mut self, position: Position) {
        self.position = Some(position);
    }

    pub(crate) fn detach(&mut self) {
        self.position = None;
    }

    /// Short name.
    pub fn name(&self) -> &'static str {
        self.kind.name()
    }

    /// Map caption.
    pub fn caption(&self) -> &'static str {
        self.kind.caption()
    }

    /// Whether the cell is solid.
    pub fn is_concrete(&self) -> bool {
        self.kind.is_concrete()
    }

    /// Whether the element wants clock ticks from the moment it is placed.
    pub fn is_periodic(&self) -> bool {
        match &self.kind {
            ElementKind::Teleporter(t) => !t.is_silent(),
            ElementKind::Generator(_) => true,
            _ => false,
        }
    }

    /// Whether the party stands here.
    pub fn has_party(&self) -> bool {
        self.party
    }

    /// Creatures standing here.
    pub fn creatures(&self) -> &CreatureManager {
        &self.creatures
    }

    /// Items lying here.
    pub fn items(&self) -> &ItemStacks {
        &self.items
    }

    /// The projectile on a sub-cell.
    pub fn projectile(&self, subcell: SubCell) -> Option<&Projectile> {
        self.projectiles[subcell.index()].as_ref()
    }

    /// Every projectile with its sub-cell.
    pub fn projectiles(&self) -> impl Iterator<Item = (SubCell, &Projectile)> {
        SubCell::ALL
            .into_iter()
            .filter_map(|s| self.projectiles[s.index()].as_ref().map(|p| (s, p)))
    }

    /// Poison clouds and flux cages here.
    pub fn hazards(&self) -> &[HazardCloud] {
        &self.hazards
    }

    /// Whether a flux cage stands here.
    pub fn has_flux_cage(&self) -> bool {
        self.hazards.iter().any(|h| h.kind() == HazardKind::FluxCage)
    }

    /// Whether the party or a creature stands here.
    pub fn is_occupied(&self) -> bool {
        self.party || !self.creatures.is_empty()
    }

    /// The actuator hanging from a slot.
    pub fn actuator(&self, slot: ActuatorSlot) -> Option<&Actuator<Position>> {
        self.actuators.get(&slot)
    }

    pub(crate) fn actuator_mut(&mut self, slot: ActuatorSlot) -> Option<&mut Actuator<Position>> {
        self.actuators.get_mut(&slot)
    }

    pub(crate) fn actuators(&self) -> impl Iterator<Item = (&ActuatorSlot, &Actuator<Position>)> {
        self.actuators.iter()
    }

    /// The door, if this is one.
    pub fn as_door(&self) -> Option<&Door> {
        match &self.kind {
            ElementKind::Door(d) => Some(d),
            _ => None,
        }
    }

    /// The pit, if this is one.
    pub fn as_pit(&self) -> Option<&Pit> {
        match &self.kind {
            ElementKind::Pit(p) => Some(p),
            _ => None,
        }
    }

    /// The teleporter, if this is one.
    pub fn as_teleporter(&self) -> Option<&Teleporter> {
        match &self.kind {
            ElementKind::Teleporter(t) => Some(t),
            _ => None,
        }
    }

    /// The stairs, if this is a staircase.
    pub fn as_stairs(&self) -> Option<&Stairs> {
        match &self.kind {
            ElementKind::Stairs(s) => Some(s),
            _ => None,
        }
    }

    /// The generator, if this is one.
    pub fn as_generator(&self) -> Option<&Generator> {
        match &self.kind {
            ElementKind::Generator(g) => Some(g),
            _ => None,
        }
    }

    /// Whether `occupant` may enter now.
    pub fn is_traversable(&self, occupant: Occupant<'_>) -> bool {
        match occupant {
            Occupant::Party => self.is_traversable_by_party(),
            Occupant::Creature(c) => self.is_traversable_by_creature(c),
            Occupant::Projectile => self.is_traversable_by_projectile(),
        }
    }

    /// Whether the party may enter now.
    pub fn is_traversable_by_party(&self) -> bool {
        match &self.kind {
            ElementKind::Door(d) => d.is_traversable_by_party(),
            ElementKind::RetractableWall(w) => w.is_open(),
            ElementKind::Stairs(_) => true,
            kind => is_open_floor(kind),
        }
    }

    /// Whether a projectile may fly in now.
    pub fn is_traversable_by_projectile(&self) -> bool {
        match &self.kind {
            ElementKind::Door(d) => d.is_traversable_by_projectile(),
            ElementKind::RetractableWall(w) => w.is_open(),
            ElementKind::Stairs(_) => false,
            kind => is_open_floor(kind),
        }
    }

    /// Whether `creature` may walk in now.
    pub fn is_traversable_by_creature(&self, creature: &Creature) -> bool {
        if self.has_flux_cage() {
            return false;
        }
        match &self.kind {
            ElementKind::Door(d) => d.is_traversable_by_creature(creature),
            ElementKind::RetractableWall(w) => w.is_open() || creature.is_immaterial(),
            ElementKind::Stairs(_) => creature.can_take_stairs(),
            kind => is_open_floor(kind) || creature.is_immaterial(),
        }
    }

    pub(crate) fn party_stepped_on(&mut self, fx: &mut Reactions) -> MapResult<()> {
        if self.party {
            return Err(MapError::PartyAlreadyHere(fx.at()));
        }
        self.party = true;
        match &self.kind {
            ElementKind::Pit(p) if p.swallows() => fx.push(Effect::Fall(Mover::Party)),
            ElementKind::Teleporter(t) if t.is_enabled() => {
                fx.push(Effect::Teleport(Mover::Party));
            }
            ElementKind::Stairs(_) => fx.push(Effect::TakeStairs),
            ElementKind::FloorSwitch(_) => self.fire(ActuatorSlot::On(TriggerType::PartySteppedOn), fx),
            _ => {}
        }
        fx.changed();
        Ok(())
    }

    pub(crate) fn party_stepped_off(&mut self, fx: &mut Reactions) -> MapResult<()> {
        if !self.party {
            return Err(MapError::PartyNotHere(fx.at()));
        }
        self.party = false;
        if matches!(self.kind, ElementKind::FloorSwitch(_)) {
            self.fire(ActuatorSlot::On(TriggerType::PartySteppedOff), fx);
        }
        fx.changed();
        Ok(())
    }

    pub(crate) fn party_turned(&mut self, fx: &mut Reactions) -> MapResult<()> {
        if !self.party {
            return Err(MapError::PartyNotHere(fx.at()));
        }
        if matches!(self.kind, ElementKind::Stairs(_)) {
            fx.push(Effect::TakeStairs);
        }
        Ok(())
    }

    pub(crate) fn creature_stepped_on(
        &mut self,
        creature: Creature,
        placement: Placement,
        fx: &mut Reactions,
    ) -> MapResult<()> {
        let id = creature.id();
        let levitates = creature.levitates();
        self.creatures.step_on(fx.at(), creature, placement)?;
        match &self.kind {
            ElementKind::Pit(p) if p.swallows() && !levitates => {
                fx.push(Effect::Fall(Mover::Creature(id)));
            }
            ElementKind::Teleporter(t) if t.is_enabled() => {
                fx.push(Effect::Teleport(Mover::Creature(id)));
            }
            ElementKind::FloorSwitch(_) => {
                self.fire(ActuatorSlot::On(TriggerType::CreatureSteppedOn), fx);
            }
            _ => {}
        }
        fx.changed();
        Ok(())
    }

    pub(crate) fn creature_stepped_off(
        &mut self,
        id: CreatureId,
        fx: &mut Reactions,
    ) -> MapResult<(Creature, Placement)> {
        let left = self.creatures.step_off(fx.at(), id)?;
        if matches!(self.kind, ElementKind::FloorSwitch(_)) {
            self.fire(ActuatorSlot::On(TriggerType::CreatureSteppedOff), fx);
        }
        fx.changed();
        Ok(left)
    }

    pub(crate) fn choose_placement(
        &self,
        creature: &Creature,
        rng: &mut StdRng,
        at: Position,
    ) -> MapResult<Placement> {
        self.creatures.choose_placement(at, creature, rng)
    }

    pub(crate) fn creatures_mut(&mut self) -> impl Iterator<Item = &mut Creature> {
        self.creatures.creatures_mut()
    }

    pub(crate) fn item_dropped(&mut self, subcell: SubCell, item: Item, fx: &mut Reactions) {
        let item_type = item.item_type;
        self.items.push(subcell, item);
        match &self.kind {
            ElementKind::Pit(p) if p.swallows() => fx.push(Effect::Fall(Mover::Items(subcell))),
            ElementKind::FloorSwitch(_) if self.items.count() == 1 => {
                self.fire(ActuatorSlot::On(TriggerType::ItemDropped), fx);
            }
            ElementKind::Alcove(a) if a.reacts_to(item_type) => {
                if self.count_reacting(a) == 1 {
                    self.fire(ActuatorSlot::Main, fx);
                }
            }
            ElementKind::Altar(_) if self.items.count() == 1 => self.fire(ActuatorSlot::Main, fx),
            _ => {}
        }
        fx.changed();
    }

    pub(crate) fn pick_item(&mut self, subcell: SubCell, fx: &mut Reactions) -> Option<Item> {
        let item = self.items.pop(subcell)?;
        match &self.kind {
            ElementKind::FloorSwitch(_) if self.items.is_empty() => {
                self.fire(ActuatorSlot::On(TriggerType::ItemPickedUp), fx);
            }
            ElementKind::Alcove(a) if a.reacts_to(item.item_type) => {
                if self.count_reacting(a) == 0 {
                    self.fire(ActuatorSlot::Main, fx);
                }
            }
            ElementKind::Altar(_) if self.items.is_empty() => self.fire(ActuatorSlot::Main, fx),
            _ => {}
        }
        fx.changed();
        Some(item)
    }

    fn count_reacting(&self, alcove: &Alcove) -> usize {
        self.items
            .iter()
            .filter(|(_, i)| alcove.reacts_to(i.item_type))
            .count()
    }

    pub(crate) fn take_items(&mut self, subcell: SubCell) -> Vec<Item> {
        self.items.take(subcell)
    }

    /// Whether a projectile may be placed here. Doors hold projectiles even
    /// when closed.
    pub fn lets_projectiles_in(&self) -> bool {
        self.is_traversable_by_projectile() || self.as_door().is_some()
    }

    pub(crate) fn projectile_arrived(
        &mut self,
        subcell: SubCell,
        projectile: Projectile,
        fx: &mut Reactions,
    ) -> MapResult<()> {
        if !self.lets_projectiles_in() {
            return Err(MapError::NotTraversable(fx.at()));
        }
        let slot = &mut self.projectiles[subcell.index()];
        if slot.is_some() {
            return Err(MapError::SubCellOccupied {
                at: fx.at(),
                subcell,
            });
        }
        *slot = Some(projectile);
        if let ElementKind::Teleporter(t) = &self.kind {
            if t.is_enabled() {
                fx.push(Effect::Teleport(Mover::Projectile(subcell)));
            }
        }
        Ok(())
    }

    pub(crate) fn projectile_left(&mut self, subcell: SubCell, at: Position) -> MapResult<Projectile> {
        self.projectiles[subcell.index()]
            .take()
            .ok_or(MapError::NoProjectile { at, subcell })
    }

    pub(crate) fn turn_projectile(&mut self, subcell: SubCell, direction: Direction) {
        if let Some(projectile) = &mut self.projectiles[subcell.index()] {
            projectile.direction = direction;
        }
    }

    pub(crate) fn add_hazard(&mut self, cloud: HazardCloud, at: Position) -> MapResult<()> {
        if cloud.kind() == HazardKind::FluxCage && self.has_flux_cage() {
            return Err(MapError::FluxCageExists(at));
        }
        self.hazards.push(cloud);
        Ok(())
    }

    /// One tick for one hazard. Returns whether it lives on.
    pub(crate) fn tick_hazard(&mut self, id: HazardId, fx: &mut Reactions) -> bool {
        let Some(index) = self.hazards.iter().position(|h| h.id() == id) else {
            return false;
        };
        let pulse = self.hazards[index].tick();
        if pulse == Pulse::Quiet {
            return true;
        }
        if self.hazards[index].kind() == HazardKind::PoisonCloud && self.party {
            fx.push(Effect::HurtParty { min: 5, max: 20 });
        }
        if pulse == Pulse::Expired {
            self.hazards.remove(index);
            fx.push(Effect::HazardExpired);
            fx.changed();
            return false;
        }
        true
    }

    pub(crate) fn trigger(&mut self, action: TriggerAction, fx: &mut Reactions) -> MapResult<()> {
        match &mut self.kind {
            ElementKind::Door(d) => d.trigger(action, fx),
            ElementKind::Pit(p) => {
                if p.trigger(action, fx) && p.swallows() {
                    self.drop_everything(fx);
                }
            }
            ElementKind::Teleporter(t) => {
                if t.trigger(action, fx) {
                    self.teleport_everything(fx);
                }
            }
            ElementKind::RetractableWall(w) => w.trigger(action, fx),
            ElementKind::Lever(l) => l.trigger(action, fx),
            ElementKind::WallSwitch(s) => s.trigger(action, fx),
            ElementKind::Generator(g) => g.trigger(action, fx),
            ElementKind::ProjectileLauncher(l) => l.trigger(action, fx),
            _ => return Err(MapError::NotTriggerable(fx.at())),
        }
        Ok(())
    }

    /// Everything but levitating creatures falls, in the order party,
    /// creatures, items.
    fn drop_everything(&self, fx: &mut Reactions) {
        if self.party {
            fx.push(Effect::Fall(Mover::Party));
        }
        for creature in self.creatures.creatures() {
            if !creature.levitates() {
                fx.push(Effect::Fall(Mover::Creature(creature.id())));
            }
        }
        for subcell in SubCell::ALL {
            if !self.items.items(subcell).is_empty() {
                fx.push(Effect::Fall(Mover::Items(subcell)));
            }
        }
    }

    fn teleport_everything(&self, fx: &mut Reactions) {
        if self.party {
            fx.push(Effect::Teleport(Mover::Party));
        }
        for (subcell, _) in self.projectiles() {
            fx.push(Effect::Teleport(Mover::Projectile(subcell)));
        }
        for creature in self.creatures.creatures() {
            fx.push(Effect::Teleport(Mover::Creature(creature.id())));
        }
    }

    /// One clock tick. Returns whether the element keeps listening.
    pub(crate) fn clock_ticked(&mut self, rng: &mut StdRng, fx: &mut Reactions) -> bool {
        let occupied = self.is_occupied();
        let tallest = self.creatures.tallest_height();
        match &mut self.kind {
            ElementKind::Door(d) => d.animate(self.party, tallest, fx),
            ElementKind::Teleporter(t) => t.animate(),
            ElementKind::Generator(g) => g.tick(occupied, rng, fx),
            _ => false,
        }
    }

    /// Flip a wall switch or lever by hand.
    pub(crate) fn operate(&mut self, fx: &mut Reactions) -> MapResult<()> {
        match &mut self.kind {
            ElementKind::WallSwitch(s) => s.toggle(fx),
            ElementKind::Lever(l) => l.toggle(fx),
            _ => {
                return Err(MapError::WrongElement {
                    at: fx.at(),
                    expected: "wall switch or lever",
                });
            }
        }
        Ok(())
    }

    pub(crate) fn destroy_door(&mut self, fx: &mut Reactions) -> MapResult<bool> {
        match &mut self.kind {
            ElementKind::Door(d) => d.destroy(fx),
            _ => Err(MapError::WrongElement {
                at: fx.at(),
                expected: "door",
            }),
        }
    }

    pub(crate) fn unlock(&mut self, item: ItemType, fx: &mut Reactions) -> MapResult<bool> {
        match &mut self.kind {
            ElementKind::WallLock(l) => Ok(l.unlock(item, fx)),
            ElementKind::WallSlot(s) => Ok(s.unlock(item, fx)),
            _ => Err(MapError::WrongElement {
                at: fx.at(),
                expected: "wall lock or slot",
            }),
        }
    }

    pub(crate) fn take_torch(&mut self, fx: &mut Reactions) -> MapResult<Option<Item>> {
        match &mut self.kind {
            ElementKind::TorchWall(t) => Ok(t.take_torch(fx)),
            _ => Err(MapError::WrongElement {
                at: fx.at(),
                expected: "torch holder",
            }),
        }
    }

    pub(crate) fn put_torch(&mut self, torch: Item, fx: &mut Reactions) -> MapResult<Option<Item>> {
        match &mut self.kind {
            ElementKind::TorchWall(t) => t.put_torch(torch, fx),
            _ => Err(MapError::WrongElement {
                at: fx.at(),
                expected: "torch holder",
            }),
        }
    }

    /// Hang an actuator from a slot, merging with one already there.
    pub(crate) fn add_actuator(
        &mut self,
        slot: ActuatorSlot,
        actuator: Actuator<Position>,
        at: Position,
    ) -> MapResult<()> {
        if !self.kind.supports(slot) {
            return Err(MapError::NoActuatorSupport(at));
        }
        let existing = self.actuators.remove(&slot);
        self.actuators
            .insert(slot, Actuator::combine(existing, actuator));
        Ok(())
    }

    /// Remove the actuator hanging from a slot.
    pub(crate) fn clear_actuator(&mut self, slot: ActuatorSlot) -> Option<Actuator<Position>> {
        self.actuators.remove(&slot)
    }

    fn fire(&self, slot: ActuatorSlot, fx: &mut Reactions) {
        if self.actuators.contains_key(&slot) {
            fx.push(Effect::Fire(slot));
        }
    }

    /// Structural checks that only need the element's own level.
    pub(crate) fn validate(&self, at: Position, level: &Level) -> Result<(), ValidationError> {
        if self.party && !self.is_traversable_by_party() {
            return Err(ValidationError::PartyInWall(at));
        }
        let concrete = |p: Position| level.element_at(p).is_some_and(Element::is_concrete);
        match &self.kind {
            ElementKind::Door(d) => {
                if !d
                    .orientation()
                    .perpendicular()
                    .directions()
                    .into_iter()
                    .all(|dir| concrete(at.towards(dir)))
                {
                    return Err(ValidationError::NotFlanked {
                        at,
                        element: self.name(),
                    });
                }
            }
            ElementKind::Stairs(s) => {
                let flanks = s.direction().orientation().perpendicular().directions();
                if !flanks.into_iter().all(|dir| concrete(at.towards(dir))) {
                    return Err(ValidationError::NotFlanked {
                        at,
                        element: self.name(),
                    });
                }
                if !concrete(at.towards(s.direction())) {
                    return Err(ValidationError::StairsOpenBehind(at));
                }
            }
            ElementKind::WallLock(l) if !l.key().is_key() => {
                return Err(ValidationError::LockWithoutKey(at));
            }
            _ => {}
        }
        Ok(())
    }
}

fn is_open_floor(kind: &ElementKind) -> bool {
    matches!(
        kind,
        ElementKind::Floor
            | ElementKind::DecoratedFloor
            | ElementKind::FakeWall
            | ElementKind::Pit(_)
            | ElementKind::Teleporter(_)
            | ElementKind::Generator(_)
            | ElementKind::FloorSwitch(_)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::door::{DoorState, DoorStyle};
    use dm_core::{Height, ItemCategory, ItemId, Materiality, Orientation, Size};

    const AT: Position = Position::new(2, 2, 1);
    const ROCK: ItemType = ItemType::new("rock", ItemCategory::Misc);

    fn creature(id: u32, materiality: Materiality) -> Creature {
        Creature::new(
            CreatureId(id),
            dm_core::CreatureType {
                name: "ghost",
                size: Size::One,
                height: Height::Medium,
                materiality,
                levitates: false,
                can_take_stairs: false,
                base_health: 5,
            },
            1,
        )
    }

    fn fx() -> Reactions {
        Reactions::new(AT)
    }

    #[test]
    fn walls_block_all_but_immaterial_creatures() {
        let wall = Element::wall();
        assert!(!wall.is_traversable(Occupant::Party));
        assert!(!wall.is_traversable(Occupant::Projectile));
        assert!(!wall.is_traversable_by_creature(&creature(1, Materiality::Material)));
        assert!(wall.is_traversable_by_creature(&creature(2, Materiality::Immaterial)));
        assert!(Element::new(ElementKind::FakeWall).is_traversable_by_party());
        assert!(!Element::new(ElementKind::InvisibleWall).is_traversable_by_party());
    }

    #[test]
    fn door_traversal_follows_state() {
        let closed = Element::from(Door::new(DoorStyle::Wooden, Orientation::NorthSouth));
        assert!(!closed.is_traversable_by_party());
        let open = Element::from(
            Door::new(DoorStyle::Wooden, Orientation::NorthSouth).with_state(DoorState::Open),
        );
        assert!(open.is_traversable_by_party());
        assert!(open.is_traversable_by_projectile());
    }

    #[test]
    fn stairs_traversal() {
        let stairs = Element::from(Stairs::new(Direction::North, true, Position::new(1, 1, 0)));
        assert!(stairs.is_traversable_by_party());
        assert!(!stairs.is_traversable_by_projectile());
        assert!(!stairs.is_traversable_by_creature(&creature(1, Materiality::Material)));
        assert_eq!(stairs.caption(), "SU");
    }

    #[test]
    fn party_occupancy_is_exclusive() {
        let mut floor = Element::floor();
        floor.party_stepped_on(&mut fx()).unwrap();
        assert!(floor.has_party());
        assert_eq!(
            floor.party_stepped_on(&mut fx()),
            Err(MapError::PartyAlreadyHere(AT))
        );
        floor.party_stepped_off(&mut fx()).unwrap();
        assert_eq!(floor.party_stepped_off(&mut fx()), Err(MapError::PartyNotHere(AT)));
    }

    #[test]
    fn open_pit_swallows_arrivals() {
        let mut pit = Element::from(Pit::new());
        let mut f = fx();
        pit.party_stepped_on(&mut f).unwrap();
        assert_eq!(f.effects()[0], Effect::Fall(Mover::Party));

        let mut f = fx();
        pit.item_dropped(SubCell::SouthEast, Item::new(ItemId(1), ROCK), &mut f);
        assert_eq!(f.effects()[0], Effect::Fall(Mover::Items(SubCell::SouthEast)));

        let mut fake = Element::from(Pit::fake());
        let mut f = fx();
        fake.party_stepped_on(&mut f).unwrap();
        assert_eq!(f.effects(), &[Effect::Changed]);
    }

    #[test]
    fn opening_a_pit_drops_its_occupants() {
        let mut pit = Element::from(Pit::new().with_open(false));
        pit.party_stepped_on(&mut fx()).unwrap();
        pit.creature_stepped_on(
            creature(1, Materiality::Material),
            Placement::SubCell(SubCell::NorthWest),
            &mut fx(),
        )
        .unwrap();
        let mut f = fx();
        pit.trigger(TriggerAction::Enable, &mut f).unwrap();
        assert!(f.effects().contains(&Effect::Fall(Mover::Party)));
        assert!(f.effects().contains(&Effect::Fall(Mover::Creature(CreatureId(1)))));
    }

    #[test]
    fn floor_switch_fires_only_when_wired() {
        let mut switch = Element::from(FloorSwitch::new());
        let mut f = fx();
        switch.party_stepped_on(&mut f).unwrap();
        assert_eq!(f.effects(), &[Effect::Changed]);
        switch.party_stepped_off(&mut fx()).unwrap();

        let slot = ActuatorSlot::On(TriggerType::PartySteppedOn);
        let actuator = Actuator::simple(1, TriggerAction::Toggle, vec![AT]).unwrap();
        switch.add_actuator(slot, actuator, AT).unwrap();
        let mut f = fx();
        switch.party_stepped_on(&mut f).unwrap();
        assert_eq!(f.effects()[0], Effect::Fire(slot));
    }

    #[test]
    fn floor_switch_item_triggers_on_first_and_last() {
        let mut switch = Element::from(FloorSwitch::new());
        for trigger in [TriggerType::ItemDropped, TriggerType::ItemPickedUp] {
            let actuator = Actuator::simple(1, TriggerAction::Toggle, vec![AT]).unwrap();
            switch
                .add_actuator(ActuatorSlot::On(trigger), actuator, AT)
                .unwrap();
        }
        let mut f = fx();
        switch.item_dropped(SubCell::NorthEast, Item::new(ItemId(1), ROCK), &mut f);
        switch.item_dropped(SubCell::NorthEast, Item::new(ItemId(2), ROCK), &mut f);
        switch.pick_item(SubCell::NorthEast, &mut f);
        switch.pick_item(SubCell::NorthEast, &mut f);
        let fired: Vec<_> = f
            .effects()
            .iter()
            .filter_map(|e| match e {
                Effect::Fire(slot) => Some(*slot),
                _ => None,
            })
            .collect();
        assert_eq!(
            fired,
            vec![
                ActuatorSlot::On(TriggerType::ItemDropped),
                ActuatorSlot::On(TriggerType::ItemPickedUp)
            ]
        );
    }

    #[test]
    fn actuators_need_a_supporting_element() {
        let mut floor = Element::floor();
        let actuator = Actuator::simple(1, TriggerAction::Toggle, vec![AT]).unwrap();
        assert_eq!(
            floor.add_actuator(ActuatorSlot::Main, actuator, AT),
            Err(MapError::NoActuatorSupport(AT))
        );
        assert_eq!(
            floor.trigger(TriggerAction::Toggle, &mut fx()),
            Err(MapError::NotTriggerable(AT))
        );
    }

    #[test]
    fn flux_cage_blocks_creatures_and_is_unique() {
        let mut floor = Element::floor();
        floor
            .add_hazard(HazardCloud::new(HazardId(1), HazardKind::FluxCage), AT)
            .unwrap();
        assert!(!floor.is_traversable_by_creature(&creature(1, Materiality::Material)));
        assert!(floor.is_traversable_by_party());
        assert_eq!(
            floor.add_hazard(HazardCloud::new(HazardId(2), HazardKind::FluxCage), AT),
            Err(MapError::FluxCageExists(AT))
        );
        floor
            .add_hazard(HazardCloud::new(HazardId(3), HazardKind::PoisonCloud), AT)
            .unwrap();
        assert_eq!(floor.hazards().len(), 2);
    }

    #[test]
    fn projectiles_share_no_subcell() {
        let mut floor = Element::floor();
        let p = Projectile::new(dm_core::ProjectileId(1), Direction::East);
        floor
            .projectile_arrived(SubCell::NorthEast, p, &mut fx())
            .unwrap();
        assert_eq!(
            floor.projectile_arrived(SubCell::NorthEast, p, &mut fx()),
            Err(MapError::SubCellOccupied {
                at: AT,
                subcell: SubCell::NorthEast
            })
        );
        assert_eq!(floor.projectile_left(SubCell::NorthEast, AT), Ok(p));
        assert_eq!(
            floor.projectile_left(SubCell::NorthEast, AT),
            Err(MapError::NoProjectile {
                at: AT,
                subcell: SubCell::NorthEast
            })
        );
    }

    #[test]
    fn projectiles_stay_out_of_walls_but_not_doors() {
        let p = Projectile::new(dm_core::ProjectileId(1), Direction::East);
        let mut wall = Element::wall();
        assert_eq!(
            wall.projectile_arrived(SubCell::NorthEast, p, &mut fx()),
            Err(MapError::NotTraversable(AT))
        );
        assert!(wall.projectile(SubCell::NorthEast).is_none());

        let mut door = Element::from(Door::new(DoorStyle::Wooden, Orientation::NorthSouth));
        door.projectile_arrived(SubCell::NorthEast, p, &mut fx())
            .unwrap();
        assert_eq!(door.projectile(SubCell::NorthEast), Some(&p));
    }

    #[test]
    fn launcher_is_a_triggerable_wall() {
        let mut launcher = Element::from(ProjectileLauncher::new(Direction::West));
        assert_eq!(launcher.kind().caption(), "L");
        assert!(launcher.kind().is_concrete());
        assert!(launcher.kind().is_triggerable());
        assert!(!launcher.is_traversable_by_party());
        assert!(!launcher.is_traversable_by_projectile());
        assert!(!launcher.is_traversable_by_creature(&creature(1, Materiality::Material)));
        assert!(launcher.is_traversable_by_creature(&creature(2, Materiality::Immaterial)));

        let mut fx = fx();
        launcher.trigger(TriggerAction::Toggle, &mut fx).unwrap();
        assert_eq!(fx.effects(), &[Effect::Launch(Direction::West)]);
    }
}
