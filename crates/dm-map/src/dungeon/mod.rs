//! The dungeon: every level, the party, and the clock that drives them.
//!
//! The dungeon is the single owner of all mutable state. Clock listeners are
//! plain [`Listener`] keys; on each tick the dungeon maps every key back to
//! the element, actuator, hazard or task it names and ticks it. Whatever an
//! element does in response is returned as effects and resolved here, in
//! order, until nothing is left or the cascade grows too deep.

mod interact;
mod movement;
mod resolve;

use std::collections::{BTreeMap, VecDeque};
use std::fmt;

use dm_core::{Move, Party, Position};
use dm_simulation::{
    Actuator, Clock, DeferredCommand, EventLog, Firing, SimConfig, SimEvent, SimEventKind,
    TriggerAction,
};
use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::{debug, info, warn};

use crate::effect::Reactions;
use crate::element::{ActuatorSlot, Element, ElementKind};
use crate::error::{MapError, MapResult, ValidationError};
use crate::hazard::HazardId;
use crate::level::Level;
use crate::switches::TriggerType;

/// Identifier of an actuator started on its own, outside any element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ActuatorId(pub u32);

/// Identifier of a scheduled task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TaskId(pub u32);

/// A one-shot action run against the dungeon once its delay elapses.
pub type Task = Box<dyn FnOnce(&mut Dungeon) -> MapResult<()>>;

/// What a clock registration refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Listener {
    /// The queue of deferred party moves.
    PartyMoves,
    /// An animated or periodic element.
    Element(Position),
    /// An actuator hanging from an element.
    Actuator(Position, ActuatorSlot),
    /// An actuator started on its own.
    Standalone(ActuatorId),
    /// A scheduled task.
    Task(TaskId),
    /// A poison cloud or flux cage.
    Hazard(Position, HazardId),
}

#[derive(Debug, Default)]
struct Counters {
    creature: u32,
    item: u32,
    projectile: u32,
    hazard: u32,
    task: u32,
    actuator: u32,
}

fn bump(counter: &mut u32) -> u32 {
    *counter += 1;
    *counter
}

/// Every level of the dungeon, the party, and the clock.
pub struct Dungeon {
    levels: BTreeMap<i32, Level>,
    party: Option<Party>,
    clock: Clock<Listener>,
    moves: VecDeque<DeferredCommand<Move>>,
    tasks: BTreeMap<TaskId, DeferredCommand<Task>>,
    actuators: BTreeMap<ActuatorId, Actuator<Position>>,
    rng: StdRng,
    events: EventLog,
    config: SimConfig,
    ids: Counters,
}

impl fmt::Debug for Dungeon {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Dungeon")
            .field("tick", &self.clock.tick())
            .field("levels", &self.levels.len())
            .field("party", &self.party.as_ref().map(Party::position))
            .field("queued_moves", &self.moves.len())
            .field("events", &self.events.len())
            .finish()
    }
}

impl Default for Dungeon {
    fn default() -> Self {
        Self::new(SimConfig::default())
    }
}

fn cell(levels: &BTreeMap<i32, Level>, at: Position) -> MapResult<&Element> {
    levels
        .get(&at.z)
        .ok_or(MapError::NoSuchLevel(at.z))?
        .element(at.x, at.y)
}

fn cell_mut(levels: &mut BTreeMap<i32, Level>, at: Position) -> MapResult<&mut Element> {
    levels
        .get_mut(&at.z)
        .ok_or(MapError::NoSuchLevel(at.z))?
        .element_mut(at.x, at.y)
}

impl Dungeon {
    /// An empty dungeon at tick 0.
    pub fn new(config: SimConfig) -> Self {
        Self {
            levels: BTreeMap::new(),
            party: None,
            clock: Clock::new(),
            moves: VecDeque::new(),
            tasks: BTreeMap::new(),
            actuators: BTreeMap::new(),
            rng: StdRng::seed_from_u64(config.seed),
            events: EventLog::new(config.max_events),
            config,
            ids: Counters::default(),
        }
    }

    /// The configuration the dungeon was built with.
    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    /// Create an empty walled level and add it.
    pub fn create_level(&mut self, number: i32, width: u32, height: u32) -> MapResult<&Level> {
        self.add_level(Level::new(number, width, height)?)
    }

    /// Add a level built elsewhere. Its periodic elements start listening.
    pub fn add_level(&mut self, level: Level) -> MapResult<&Level> {
        let number = level.number();
        if self.levels.contains_key(&number) {
            return Err(MapError::DuplicateLevel(number));
        }
        for at in level.periodic_positions() {
            self.clock.register(Listener::Element(at));
        }
        debug!(number, "level added");
        Ok(self.levels.entry(number).or_insert(level))
    }

    /// The level with this number.
    pub fn level(&self, number: i32) -> MapResult<&Level> {
        self.levels.get(&number).ok_or(MapError::NoSuchLevel(number))
    }

    /// Every level, by number.
    pub fn levels(&self) -> impl Iterator<Item = &Level> {
        self.levels.values()
    }

    /// Set the health multiplier of creatures spawned on a level.
    pub fn set_experience_multiplier(&mut self, number: i32, multiplier: u32) -> MapResult<()> {
        self.levels
            .get_mut(&number)
            .ok_or(MapError::NoSuchLevel(number))?
            .set_experience_multiplier(multiplier)
    }

    /// The element at a position.
    pub fn element(&self, at: Position) -> MapResult<&Element> {
        cell(&self.levels, at)
    }

    pub(crate) fn element_mut(&mut self, at: Position) -> MapResult<&mut Element> {
        cell_mut(&mut self.levels, at)
    }

    /// Replace the element at a position, returning the previous one.
    ///
    /// The previous element stops listening to the clock; the new one starts
    /// if it is periodic. The cell the party stands on cannot be replaced.
    pub fn set_element(&mut self, at: Position, element: impl Into<Element>) -> MapResult<Element> {
        let element = element.into();
        let current = self.element(at)?;
        if current.has_party() {
            return Err(MapError::PartyAlreadyHere(at));
        }
        let slots: Vec<ActuatorSlot> = current.actuators().map(|(slot, _)| *slot).collect();
        let hazards: Vec<HazardId> = current.hazards().iter().map(|h| h.id()).collect();
        self.clock.unregister(Listener::Element(at));
        for slot in slots {
            self.clock.unregister(Listener::Actuator(at, slot));
        }
        for id in hazards {
            self.clock.unregister(Listener::Hazard(at, id));
        }
        if element.is_periodic() {
            self.clock.register(Listener::Element(at));
        }
        self.levels
            .get_mut(&at.z)
            .ok_or(MapError::NoSuchLevel(at.z))?
            .set_element(at.x, at.y, element)
    }

    /// Place the party on the dungeon. There is at most one.
    pub fn set_party(&mut self, party: Party) -> MapResult<()> {
        if self.party.is_some() {
            return Err(MapError::PartyExists);
        }
        let at = party.position();
        if !self.element(at)?.is_traversable_by_party() {
            return Err(MapError::NotTraversable(at));
        }
        self.party = Some(party);
        let mut fx = Reactions::new(at);
        self.element_mut(at)?.party_stepped_on(&mut fx)?;
        info!(%at, "party placed");
        self.resolve(vec![fx])
    }

    /// The party, if placed.
    pub fn party(&self) -> Option<&Party> {
        self.party.as_ref()
    }

    /// Mutable access to the party, for equipment and health changes.
    /// Position and look direction are owned by the dungeon.
    pub fn party_mut(&mut self) -> Option<&mut Party> {
        self.party.as_mut()
    }

    /// Moves waiting in the queue, oldest first.
    pub fn queued_moves(&self) -> impl Iterator<Item = Move> + '_ {
        self.moves.iter().map(|c| *c.command())
    }

    /// Advance time by one tick.
    pub fn tick(&mut self) -> MapResult<()> {
        for listener in self.clock.advance() {
            if !self.deliver(listener)? {
                self.clock.retire(listener);
            }
        }
        Ok(())
    }

    /// Advance time by `n` ticks.
    pub fn tick_n(&mut self, n: u64) -> MapResult<()> {
        if n == 0 {
            return Err(dm_simulation::SimError::ZeroTicks.into());
        }
        for _ in 0..n {
            self.tick()?;
        }
        Ok(())
    }

    /// Ticks elapsed so far.
    pub fn current_tick(&self) -> u64 {
        self.clock.tick()
    }

    /// The clock and its listeners.
    pub fn clock(&self) -> &Clock<Listener> {
        &self.clock
    }

    /// Everything that happened so far.
    pub fn events(&self) -> &EventLog {
        &self.events
    }

    /// Forget recorded events.
    pub fn clear_events(&mut self) {
        self.events.clear();
    }

    pub(crate) fn emit(&mut self, kind: SimEventKind, description: impl Into<String>) {
        self.events
            .push(SimEvent::new(self.clock.tick(), kind, description));
    }

    /// Deliver one tick to one listener. Returns whether it keeps listening.
    fn deliver(&mut self, listener: Listener) -> MapResult<bool> {
        match listener {
            Listener::PartyMoves => self.tick_moves(),
            Listener::Element(at) => {
                let mut fx = Reactions::new(at);
                let Ok(element) = cell_mut(&mut self.levels, at) else {
                    return Ok(false);
                };
                let keep = element.clock_ticked(&mut self.rng, &mut fx);
                self.resolve(vec![fx])?;
                Ok(keep)
            }
            Listener::Actuator(at, slot) => {
                let mut fired = Vec::new();
                let keep = match cell_mut(&mut self.levels, at)
                    .ok()
                    .and_then(|e| e.actuator_mut(slot))
                {
                    Some(actuator) => actuator.tick(&mut fired),
                    None => false,
                };
                self.apply_firings(fired)?;
                Ok(keep)
            }
            Listener::Standalone(id) => {
                let mut fired = Vec::new();
                let keep = match self.actuators.get_mut(&id) {
                    Some(actuator) => actuator.tick(&mut fired),
                    None => false,
                };
                if !keep {
                    self.actuators.remove(&id);
                }
                self.apply_firings(fired)?;
                Ok(keep)
            }
            Listener::Task(id) => {
                let due = match self.tasks.get_mut(&id) {
                    Some(task) => task.tick(),
                    None => return Ok(false),
                };
                if !due {
                    return Ok(true);
                }
                if let Some(task) = self.tasks.remove(&id) {
                    debug!(task = task.name(), "running task");
                    (task.into_command())(self)?;
                }
                Ok(false)
            }
            Listener::Hazard(at, id) => {
                let mut fx = Reactions::new(at);
                let Ok(element) = cell_mut(&mut self.levels, at) else {
                    return Ok(false);
                };
                let keep = element.tick_hazard(id, &mut fx);
                self.resolve(vec![fx])?;
                Ok(keep)
            }
        }
    }

    fn tick_moves(&mut self) -> MapResult<bool> {
        let due = match self.moves.front_mut() {
            Some(command) => command.tick(),
            None => return Ok(false),
        };
        if due {
            if let Some(command) = self.moves.pop_front() {
                let step = command.into_command();
                if self.party.is_some() {
                    self.resolve_move(step)?;
                } else {
                    warn!(?step, "queued move dropped, no party");
                }
            }
        }
        Ok(!self.moves.is_empty())
    }

    fn apply_firings(&mut self, fired: Vec<Firing<Position>>) -> MapResult<()> {
        for Firing { target, action } in fired {
            self.emit(
                SimEventKind::ActuatorFired { target, action },
                format!("actuator fired {action:?} at {target}"),
            );
            self.trigger(target, action)?;
        }
        Ok(())
    }

    /// Deliver a trigger to the element at `target`.
    pub fn trigger(&mut self, target: Position, action: TriggerAction) -> MapResult<()> {
        let mut fx = Reactions::new(target);
        self.element_mut(target)?.trigger(action, &mut fx)?;
        debug!(%target, ?action, "triggered");
        self.resolve(vec![fx])
    }

    /// Run `task` once `delay` ticks have elapsed.
    pub fn schedule(
        &mut self,
        name: &'static str,
        delay: u32,
        task: impl FnOnce(&mut Dungeon) -> MapResult<()> + 'static,
    ) -> MapResult<TaskId> {
        let id = TaskId(bump(&mut self.ids.task));
        let command: Task = Box::new(task);
        self.tasks
            .insert(id, DeferredCommand::new(name, delay, command)?);
        self.clock.register(Listener::Task(id));
        Ok(id)
    }

    /// Hang an actuator from a switch, lever, lock, slot, alcove, altar or
    /// torch holder. It is merged with any actuator already there.
    pub fn add_actuator(&mut self, at: Position, actuator: Actuator<Position>) -> MapResult<()> {
        self.element_mut(at)?
            .add_actuator(ActuatorSlot::Main, actuator, at)
    }

    /// Hang an actuator from one trigger type of a floor switch.
    pub fn add_trigger_actuator(
        &mut self,
        at: Position,
        trigger: TriggerType,
        actuator: Actuator<Position>,
    ) -> MapResult<()> {
        self.element_mut(at)?
            .add_actuator(ActuatorSlot::On(trigger), actuator, at)
    }

    /// Remove the actuator hanging from an element slot.
    pub fn remove_actuator(
        &mut self,
        at: Position,
        slot: ActuatorSlot,
    ) -> MapResult<Option<Actuator<Position>>> {
        self.clock.unregister(Listener::Actuator(at, slot));
        Ok(self.element_mut(at)?.clear_actuator(slot))
    }

    /// Start an actuator that belongs to no element. It is dropped once done.
    pub fn start_actuator(&mut self, actuator: Actuator<Position>) -> ActuatorId {
        let id = ActuatorId(bump(&mut self.ids.actuator));
        self.actuators.insert(id, actuator);
        self.clock.register(Listener::Standalone(id));
        id
    }

    /// Check every level and the links between them.
    pub fn validate(&self) -> MapResult<()> {
        for level in self.levels.values() {
            level.validate()?;
        }
        for element in self.levels.values().flat_map(Level::elements) {
            let Some(at) = element.position() else {
                continue;
            };
            match element.kind() {
                ElementKind::Stairs(stairs) => self.validate_stairs(at, stairs)?,
                ElementKind::Teleporter(tp) => {
                    if let Some(destination) = tp.destination() {
                        let reachable = self
                            .element(destination)
                            .is_ok_and(Element::is_traversable_by_party);
                        if !reachable {
                            return Err(ValidationError::TeleporterDestination {
                                at,
                                destination,
                            }
                            .into());
                        }
                    }
                }
                _ => {}
            }
            for (_, actuator) in element.actuators() {
                for target in actuator.targets() {
                    let triggerable = self
                        .element(target)
                        .is_ok_and(|e| e.kind().is_triggerable());
                    if !triggerable {
                        return Err(ValidationError::ActuatorTarget {
                            mounted_at: at,
                            target,
                        }
                        .into());
                    }
                }
            }
        }
        Ok(())
    }

    fn validate_stairs(&self, at: Position, stairs: &crate::stairs::Stairs) -> MapResult<()> {
        let destination = stairs.destination();
        let Ok(other) = self.element(destination) else {
            return Err(ValidationError::StairsDestination { at, destination }.into());
        };
        let Some(other) = other.as_stairs() else {
            return Err(ValidationError::StairsDestination { at, destination }.into());
        };
        let expected_z = if stairs.is_up() { at.z - 1 } else { at.z + 1 };
        if other.is_up() == stairs.is_up() || destination.z != expected_z {
            return Err(ValidationError::StairsMismatch(at).into());
        }
        Ok(())
    }

    pub(crate) fn next_hazard_id(&mut self) -> HazardId {
        HazardId(bump(&mut self.ids.hazard))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dm_core::{Champion, Direction};
    use dm_simulation::Sound;

    use crate::door::{Door, DoorState, DoorStyle};
    use crate::switches::Lever;

    fn dungeon() -> Dungeon {
        let mut dungeon = Dungeon::default();
        dungeon.create_level(1, 5, 5).unwrap();
        dungeon
    }

    fn party_at(x: i32, y: i32, look: Direction) -> Party {
        let mut party = Party::new();
        party.add_champion(Champion::new("Iaido", 60)).unwrap();
        party.set_position(Position::new(x, y, 1));
        party.set_look_direction(look);
        party
    }

    #[test]
    fn duplicate_level_rejected() {
        let mut dungeon = dungeon();
        assert_eq!(
            dungeon.create_level(1, 4, 4).map(|_| ()),
            Err(MapError::DuplicateLevel(1))
        );
        assert_eq!(dungeon.level(2).map(|_| ()), Err(MapError::NoSuchLevel(2)));
    }

    #[test]
    fn only_one_party() {
        let mut dungeon = dungeon();
        dungeon.set_party(party_at(1, 1, Direction::East)).unwrap();
        assert_eq!(
            dungeon.set_party(party_at(2, 2, Direction::East)),
            Err(MapError::PartyExists)
        );
        assert!(dungeon.element(Position::new(1, 1, 1)).unwrap().has_party());
    }

    #[test]
    fn party_cannot_start_in_a_wall() {
        let mut dungeon = dungeon();
        assert_eq!(
            dungeon.set_party(party_at(0, 0, Direction::East)),
            Err(MapError::NotTraversable(Position::new(0, 0, 1)))
        );
    }

    #[test]
    fn zero_ticks_is_an_error() {
        let mut dungeon = dungeon();
        assert_eq!(
            dungeon.tick_n(0),
            Err(MapError::Sim(dm_simulation::SimError::ZeroTicks))
        );
        dungeon.tick_n(3).unwrap();
        assert_eq!(dungeon.current_tick(), 3);
    }

    #[test]
    fn scheduled_task_runs_once_after_delay() {
        let mut dungeon = dungeon();
        let door = Position::new(2, 2, 1);
        dungeon
            .set_element(door, Door::new(DoorStyle::Grate, dm_core::Orientation::NorthSouth))
            .unwrap();
        dungeon
            .schedule("open door", 3, move |d| d.trigger(door, TriggerAction::Enable))
            .unwrap();
        dungeon.tick_n(2).unwrap();
        let state = |d: &Dungeon| d.element(door).unwrap().as_door().unwrap().motion();
        assert_eq!(state(&dungeon), crate::door::DoorMotion::Idle);
        dungeon.tick().unwrap();
        assert_eq!(state(&dungeon), crate::door::DoorMotion::Opening);
        dungeon.tick_n(40).unwrap();
        assert_eq!(
            dungeon.element(door).unwrap().as_door().unwrap().state(),
            DoorState::Open
        );
        assert!(!dungeon.clock().listeners().contains(&Listener::Task(TaskId(1))));
    }

    #[test]
    fn lever_fires_its_actuator_after_delay() {
        let mut dungeon = dungeon();
        let lever = Position::new(4, 2, 1);
        let door = Position::new(2, 2, 1);
        dungeon.set_element(lever, Lever::new(Direction::West)).unwrap();
        dungeon
            .set_element(door, Door::new(DoorStyle::Iron, dm_core::Orientation::NorthSouth))
            .unwrap();
        dungeon
            .add_actuator(
                lever,
                Actuator::simple(2, TriggerAction::Toggle, vec![door]).unwrap(),
            )
            .unwrap();
        dungeon.operate(lever).unwrap();
        assert_eq!(dungeon.events().sounds(), vec![Sound::Switch]);
        dungeon.tick().unwrap();
        assert!(
            !dungeon
                .events()
                .events()
                .iter()
                .any(|e| matches!(e.kind, SimEventKind::ActuatorFired { .. }))
        );
        dungeon.tick().unwrap();
        let fired: Vec<_> = dungeon
            .events()
            .events()
            .iter()
            .filter(|e| matches!(e.kind, SimEventKind::ActuatorFired { .. }))
            .collect();
        assert_eq!(fired.len(), 1);
        assert_eq!(fired[0].tick, 2);
        assert_eq!(
            dungeon.element(door).unwrap().as_door().unwrap().motion(),
            crate::door::DoorMotion::Opening
        );
    }

    #[test]
    fn actuator_on_untriggerable_target_fails_validation() {
        let mut dungeon = dungeon();
        let lever = Position::new(4, 2, 1);
        dungeon.set_element(lever, Lever::new(Direction::West)).unwrap();
        dungeon
            .add_actuator(
                lever,
                Actuator::simple(1, TriggerAction::Toggle, vec![Position::new(2, 2, 1)]).unwrap(),
            )
            .unwrap();
        assert_eq!(
            dungeon.validate(),
            Err(MapError::Validation(ValidationError::ActuatorTarget {
                mounted_at: lever,
                target: Position::new(2, 2, 1)
            }))
        );
    }

    #[test]
    fn triggering_plain_floor_is_an_error() {
        let mut dungeon = dungeon();
        let at = Position::new(2, 2, 1);
        assert_eq!(
            dungeon.trigger(at, TriggerAction::Toggle),
            Err(MapError::NotTriggerable(at))
        );
    }

    #[test]
    fn cannot_replace_the_party_cell() {
        let mut dungeon = dungeon();
        dungeon.set_party(party_at(2, 2, Direction::North)).unwrap();
        assert_eq!(
            dungeon.set_element(Position::new(2, 2, 1), Element::wall()).map(|_| ()),
            Err(MapError::PartyAlreadyHere(Position::new(2, 2, 1)))
        );
    }
}
