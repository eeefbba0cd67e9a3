use std::fmt;

use dm_simulation::{ONE_SECOND, Temporizer, temporizer};

/// Seconds a cloud or cage lasts.
pub const HAZARD_LIFETIME: u32 = 10;

/// Transient effects that occupy a cell for a while.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HazardKind {
    /// Hurts the party standing in it every second.
    PoisonCloud,
    /// Keeps creatures out. At most one per cell.
    FluxCage,
}

/// Identifier of a hazard, unique within a dungeon.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct HazardId(pub u32);

impl fmt::Display for HazardId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "hazard#{}", self.0)
    }
}

/// What one tick did to a hazard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pulse {
    /// Nothing this tick.
    Quiet,
    /// A second elapsed and the hazard lives on.
    Second,
    /// The last second elapsed.
    Expired,
}

/// A poison cloud or flux cage on a cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HazardCloud {
    id: HazardId,
    kind: HazardKind,
    seconds_left: u32,
    temporizer: Temporizer,
}

impl HazardCloud {
    pub(crate) fn new(id: HazardId, kind: HazardKind) -> Self {
        Self {
            id,
            kind,
            seconds_left: HAZARD_LIFETIME,
            temporizer: Temporizer::new("hazard", temporizer::period(ONE_SECOND)),
        }
    }

    /// Identifier.
    pub fn id(&self) -> HazardId {
        self.id
    }

    /// Cloud or cage.
    pub fn kind(&self) -> HazardKind {
        self.kind
    }

    /// Whole seconds left.
    pub fn seconds_left(&self) -> u32 {
        self.seconds_left
    }

    pub(crate) fn tick(&mut self) -> Pulse {
        if !self.temporizer.trigger() {
            return Pulse::Quiet;
        }
        self.seconds_left = self.seconds_left.saturating_sub(1);
        if self.seconds_left == 0 {
            Pulse::Expired
        } else {
            Pulse::Second
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hazard_lives_ten_seconds() {
        let mut cloud = HazardCloud::new(HazardId(1), HazardKind::PoisonCloud);
        let mut seconds = 0;
        let mut ticks = 0;
        loop {
            ticks += 1;
            match cloud.tick() {
                Pulse::Quiet => {}
                Pulse::Second => seconds += 1,
                Pulse::Expired => break,
            }
        }
        assert_eq!(seconds, 9);
        assert_eq!(ticks, HAZARD_LIFETIME * ONE_SECOND);
        assert_eq!(cloud.seconds_left(), 0);
    }
}
