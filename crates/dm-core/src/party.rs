use serde::{Deserialize, Serialize};

use crate::direction::Direction;
use crate::error::{CoreError, CoreResult};
use crate::movement::{Side, Speed};
use crate::position::Position;

/// A place in the 2×2 party formation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PartyLocation {
    /// Front row, left.
    FrontLeft,
    /// Front row, right.
    FrontRight,
    /// Rear row, left.
    RearLeft,
    /// Rear row, right.
    RearRight,
}

impl PartyLocation {
    /// All places, in the order new champions fill them.
    pub const ALL: [PartyLocation; 4] = [
        Self::FrontLeft,
        Self::FrontRight,
        Self::RearLeft,
        Self::RearRight,
    ];
}

/// A party member, seen only through the handful of queries the dungeon needs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Champion {
    name: String,
    location: PartyLocation,
    health: u32,
    max_health: u32,
    foot_protection: bool,
    feet_wounded: bool,
}

impl Champion {
    /// A healthy champion with the given maximum health.
    pub fn new(name: impl Into<String>, max_health: u32) -> Self {
        Self {
            name: name.into(),
            location: PartyLocation::FrontLeft,
            health: max_health,
            max_health,
            foot_protection: false,
            feet_wounded: false,
        }
    }

    /// Equip or remove foot protection.
    pub fn with_foot_protection(mut self, protected: bool) -> Self {
        self.foot_protection = protected;
        self
    }

    /// Set the current health, which must not exceed the maximum.
    pub fn with_health(mut self, health: u32) -> CoreResult<Self> {
        if health > self.max_health {
            return Err(CoreError::InvalidHealth {
                health,
                max: self.max_health,
            });
        }
        self.health = health;
        Ok(self)
    }

    /// Apply damage. Returns the health actually lost.
    pub fn hit(&mut self, amount: u32) -> u32 {
        let lost = amount.min(self.health);
        self.health -= lost;
        lost
    }

    /// Wound the champion's feet.
    pub fn wound_feet(&mut self) {
        self.feet_wounded = true;
    }

    /// Champion name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Place in the formation.
    pub fn location(&self) -> PartyLocation {
        self.location
    }

    /// Current health.
    pub fn health(&self) -> u32 {
        self.health
    }

    /// Maximum health.
    pub fn max_health(&self) -> u32 {
        self.max_health
    }

    /// Whether the champion wears something on its feet.
    pub fn has_foot_protection(&self) -> bool {
        self.foot_protection
    }

    /// Whether the champion's feet are wounded.
    pub fn feet_wounded(&self) -> bool {
        self.feet_wounded
    }

    /// A champion is alive while it has health left.
    pub fn is_alive(&self) -> bool {
        self.health > 0
    }
}

/// The travelling party: up to four champions moving as one occupant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Party {
    champions: Vec<Champion>,
    position: Position,
    look_direction: Direction,
    speed: Speed,
}

impl Default for Party {
    fn default() -> Self {
        Self::new()
    }
}

impl Party {
    /// An empty party looking north.
    pub fn new() -> Self {
        Self {
            champions: Vec::new(),
            position: Position::default(),
            look_direction: Direction::North,
            speed: Speed::default(),
        }
    }

    /// Set the walking speed.
    pub fn with_speed(mut self, speed: Speed) -> Self {
        self.speed = speed;
        self
    }

    /// Add a champion at the first free place.
    pub fn add_champion(&mut self, champion: Champion) -> CoreResult<PartyLocation> {
        let location = PartyLocation::ALL
            .into_iter()
            .find(|l| self.champion_at(*l).is_none())
            .ok_or(CoreError::PartyFull)?;
        self.add_champion_at(champion, location)?;
        Ok(location)
    }

    /// Add a champion at a given place.
    pub fn add_champion_at(
        &mut self,
        mut champion: Champion,
        location: PartyLocation,
    ) -> CoreResult<()> {
        if self.champions.len() >= PartyLocation::ALL.len() {
            return Err(CoreError::PartyFull);
        }
        if self.champion_at(location).is_some() {
            return Err(CoreError::LocationTaken(location));
        }
        if self.champions.iter().any(|c| c.name == champion.name) {
            return Err(CoreError::DuplicateChampion(champion.name));
        }
        champion.location = location;
        self.champions.push(champion);
        Ok(())
    }

    /// All champions.
    pub fn champions(&self) -> &[Champion] {
        &self.champions
    }

    /// The champion at a given place.
    pub fn champion_at(&self, location: PartyLocation) -> Option<&Champion> {
        self.champions.iter().find(|c| c.location == location)
    }

    /// Mutable access to the living champions.
    pub fn living_champions_mut(&mut self) -> impl Iterator<Item = &mut Champion> {
        self.champions.iter_mut().filter(|c| c.is_alive())
    }

    /// Mutable access to the living champions standing on a side of the formation.
    pub fn living_champions_on(&mut self, side: Side) -> impl Iterator<Item = &mut Champion> {
        let locations = side.locations();
        self.champions
            .iter_mut()
            .filter(move |c| c.is_alive() && locations.contains(&c.location))
    }

    /// Whether any champion is still alive.
    pub fn is_alive(&self) -> bool {
        self.champions.iter().any(Champion::is_alive)
    }

    /// Where the party stands.
    pub fn position(&self) -> Position {
        self.position
    }

    /// Move the party. Only the dungeon should call this.
    pub fn set_position(&mut self, position: Position) {
        self.position = position;
    }

    /// The direction the party faces.
    pub fn look_direction(&self) -> Direction {
        self.look_direction
    }

    /// Rotate the party.
    pub fn set_look_direction(&mut self, direction: Direction) {
        self.look_direction = direction;
    }

    /// Walking speed.
    pub fn speed(&self) -> Speed {
        self.speed
    }
}
