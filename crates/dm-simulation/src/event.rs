use dm_core::{CreatureId, Direction, ItemId, Position, ProjectileId, Side};
use serde::Serialize;

use crate::actuator::TriggerAction;

/// Sound cues requested from the audio layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Sound {
    /// The party walked into something solid.
    Bong,
    /// A teleporter relocated the party.
    Teleport,
    /// A door was smashed.
    DoorBroken,
    /// A blow bounced off an unbreakable door.
    Clonk,
    /// A blow hit a door that was not shut.
    Swing,
    /// A switch or lever moved.
    Switch,
    /// A key or item went into a lock or slot.
    Lock,
    /// The party took a step.
    Step,
}

/// What kind of simulation event occurred.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SimEventKind {
    // Elements
    /// An element's visible state changed.
    ElementChanged {
        /// Where the element sits.
        at: Position,
        /// Short caption of the element.
        element: &'static str,
    },
    /// A sound should be played.
    SoundPlayed {
        /// Which sound.
        sound: Sound,
        /// Where it originates.
        at: Position,
    },
    /// An actuator delivered a trigger.
    ActuatorFired {
        /// The triggered element.
        target: Position,
        /// The delivered action.
        action: TriggerAction,
    },
    /// A poison cloud or flux cage vanished.
    HazardExpired {
        /// Where it was.
        at: Position,
    },

    // Party
    /// The party stepped to a neighbouring cell.
    PartyMoved {
        /// Departure cell.
        from: Position,
        /// Arrival cell.
        to: Position,
    },
    /// The party turned in place.
    PartyTurned {
        /// Where it stands.
        at: Position,
        /// New look direction.
        direction: Direction,
    },
    /// The party was relocated by a teleporter or stairs.
    PartyTeleported {
        /// Departure cell.
        from: Position,
        /// Arrival cell.
        to: Position,
    },
    /// The party fell through a pit.
    PartyFell {
        /// The pit.
        from: Position,
        /// The landing cell.
        to: Position,
    },
    /// The party walked into something it cannot enter.
    PartyBumped {
        /// Where the party stands.
        at: Position,
        /// The side of the formation that hit first.
        side: Side,
    },
    /// A champion lost health.
    ChampionHurt {
        /// Champion name.
        champion: String,
        /// Health lost.
        amount: u32,
        /// Where it happened.
        at: Position,
    },

    // Creatures, items, projectiles
    /// A generator produced a creature.
    CreatureSpawned {
        /// The new creature.
        creature: CreatureId,
        /// Where it appeared.
        at: Position,
    },
    /// A creature fell or was teleported.
    CreatureMoved {
        /// The creature.
        creature: CreatureId,
        /// Departure cell.
        from: Position,
        /// Arrival cell.
        to: Position,
    },
    /// An item fell through a pit.
    ItemMoved {
        /// The item.
        item: ItemId,
        /// Departure cell.
        from: Position,
        /// Arrival cell.
        to: Position,
    },
    /// A projectile was teleported.
    ProjectileMoved {
        /// The projectile.
        projectile: ProjectileId,
        /// Departure cell.
        from: Position,
        /// Arrival cell.
        to: Position,
    },
    /// A launcher shot a projectile onto a cell.
    ProjectileLaunched {
        /// The projectile.
        projectile: ProjectileId,
        /// The cell it appeared on.
        at: Position,
    },
}

impl SimEventKind {
    /// Check whether the event happened at, or moved something through, a position.
    pub fn touches(&self, position: Position) -> bool {
        match self {
            Self::ElementChanged { at, .. }
            | Self::SoundPlayed { at, .. }
            | Self::HazardExpired { at }
            | Self::PartyTurned { at, .. }
            | Self::PartyBumped { at, .. }
            | Self::ChampionHurt { at, .. }
            | Self::CreatureSpawned { at, .. }
            | Self::ProjectileLaunched { at, .. } => *at == position,
            Self::ActuatorFired { target, .. } => *target == position,
            Self::PartyMoved { from, to }
            | Self::PartyTeleported { from, to }
            | Self::PartyFell { from, to }
            | Self::CreatureMoved { from, to, .. }
            | Self::ItemMoved { from, to, .. }
            | Self::ProjectileMoved { from, to, .. } => *from == position || *to == position,
        }
    }
}

/// A record of something that happened during simulation.
#[derive(Debug, Clone, Serialize)]
pub struct SimEvent {
    /// The clock tick when this event occurred.
    pub tick: u64,
    /// The specific kind of event that occurred.
    pub kind: SimEventKind,
    /// A human-readable description of the event.
    pub description: String,
}

impl SimEvent {
    /// Create a new simulation event with the given tick, kind, and description.
    pub fn new(tick: u64, kind: SimEventKind, description: impl Into<String>) -> Self {
        Self {
            tick,
            kind,
            description: description.into(),
        }
    }
}

/// Accumulates events during a simulation run.
#[derive(Debug, Default)]
pub struct EventLog {
    events: Vec<SimEvent>,
    max_events: usize,
}

impl EventLog {
    /// Create a new event log with the given maximum capacity (0 = unlimited).
    pub fn new(max_events: usize) -> Self {
        Self {
            events: Vec::new(),
            max_events,
        }
    }

    /// Append an event, dropping the oldest events if the log exceeds its capacity.
    pub fn push(&mut self, event: SimEvent) {
        self.events.push(event);
        if self.max_events > 0 && self.events.len() > self.max_events {
            let drain_count = self.events.len() - self.max_events;
            self.events.drain(..drain_count);
        }
    }

    /// Return a slice of all recorded events.
    pub fn events(&self) -> &[SimEvent] {
        &self.events
    }

    /// Return all events that occurred at the given tick.
    pub fn events_at_tick(&self, tick: u64) -> Vec<&SimEvent> {
        self.events.iter().filter(|e| e.tick == tick).collect()
    }

    /// Return all events touching the given position.
    pub fn events_at(&self, position: Position) -> Vec<&SimEvent> {
        self.events
            .iter()
            .filter(|e| e.kind.touches(position))
            .collect()
    }

    /// Return all sounds requested so far, in order.
    pub fn sounds(&self) -> Vec<Sound> {
        self.events
            .iter()
            .filter_map(|e| match e.kind {
                SimEventKind::SoundPlayed { sound, .. } => Some(sound),
                _ => None,
            })
            .collect()
    }

    /// Return the number of recorded events.
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Return `true` if no events have been recorded.
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Remove all recorded events.
    pub fn clear(&mut self) {
        self.events.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sound(tick: u64, at: Position) -> SimEvent {
        SimEvent::new(
            tick,
            SimEventKind::SoundPlayed {
                sound: Sound::Bong,
                at,
            },
            "bong",
        )
    }

    #[test]
    fn event_log_push_and_query() {
        let mut log = EventLog::new(0);
        let p = Position::new(1, 2, 1);
        log.push(sound(1, p));
        assert_eq!(log.len(), 1);
        assert_eq!(log.events_at_tick(1).len(), 1);
        assert_eq!(log.events_at(p).len(), 1);
        assert_eq!(log.sounds(), vec![Sound::Bong]);
    }

    #[test]
    fn event_log_max_events_trims() {
        let mut log = EventLog::new(2);
        for i in 0..5 {
            log.push(sound(i, Position::default()));
        }
        assert_eq!(log.len(), 2);
        // Oldest events were dropped, newest remain
        assert_eq!(log.events()[0].tick, 3);
        assert_eq!(log.events()[1].tick, 4);
    }

    #[test]
    fn event_kind_touches_position() {
        let a = Position::new(1, 1, 1);
        let b = Position::new(1, 1, 2);
        let c = Position::new(5, 5, 1);

        let kind = SimEventKind::PartyFell { from: a, to: b };
        assert!(kind.touches(a));
        assert!(kind.touches(b));
        assert!(!kind.touches(c));

        let kind = SimEventKind::ActuatorFired {
            target: c,
            action: TriggerAction::Toggle,
        };
        assert!(kind.touches(c));
        assert!(!kind.touches(a));
    }

    #[test]
    fn event_log_clear() {
        let mut log = EventLog::new(0);
        log.push(sound(1, Position::default()));
        assert!(!log.is_empty());
        log.clear();
        assert!(log.is_empty());
    }

    #[test]
    fn events_serialize_with_type_tag() {
        let event = SimEvent::new(
            3,
            SimEventKind::PartyTurned {
                at: Position::new(1, 2, 1),
                direction: Direction::East,
            },
            "turned",
        );
        let json = serde_json::to_string(&event).unwrap();
        assert!(json.contains("\"type\":\"party_turned\""));
        assert!(json.contains("\"direction\":\"east\""));
    }
}
