use std::fmt;

use serde::{Deserialize, Serialize};

/// How many sub-cells a creature covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Size {
    /// One sub-cell; up to four share a cell.
    One,
    /// Two adjacent sub-cells.
    Two,
    /// The whole cell.
    Four,
}

impl Size {
    /// Room units taken in a cell.
    pub fn footprint(self) -> u8 {
        match self {
            Self::One => 1,
            Self::Two => 2,
            Self::Four => 4,
        }
    }
}

/// How tall a creature stands. Doors rebound on creatures of matching height.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Height {
    /// Unknown or irrelevant.
    Undefined,
    /// Small creatures.
    Small,
    /// Medium creatures.
    Medium,
    /// Giant creatures.
    Giant,
}

/// Whether a creature has a body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Materiality {
    /// Solid; blocked by walls and closed doors.
    Material,
    /// Ghost-like; passes through most walls.
    Immaterial,
}

/// A creature type, as far as the grid cares about it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatureType {
    /// Display name.
    pub name: &'static str,
    /// Footprint in sub-cells.
    pub size: Size,
    /// Height class.
    pub height: Height,
    /// Material or immaterial.
    pub materiality: Materiality,
    /// Flying creatures never fall into pits.
    pub levitates: bool,
    /// Whether the creature can use stairs.
    pub can_take_stairs: bool,
    /// Health at a multiplier of 1.
    pub base_health: u32,
}

/// Identifier of one creature, unique within a dungeon.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CreatureId(pub u32);

impl fmt::Display for CreatureId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A live creature.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Creature {
    id: CreatureId,
    creature_type: CreatureType,
    health: u32,
}

impl Creature {
    /// Create a creature whose health is the type's base health scaled by `multiplier`.
    pub fn new(id: CreatureId, creature_type: CreatureType, multiplier: u32) -> Self {
        Self {
            id,
            creature_type,
            health: creature_type.base_health.saturating_mul(multiplier),
        }
    }

    /// Identifier.
    pub fn id(&self) -> CreatureId {
        self.id
    }

    /// Type data.
    pub fn creature_type(&self) -> &CreatureType {
        &self.creature_type
    }

    /// Footprint size.
    pub fn size(&self) -> Size {
        self.creature_type.size
    }

    /// Height class.
    pub fn height(&self) -> Height {
        self.creature_type.height
    }

    /// Whether the creature is immaterial.
    pub fn is_immaterial(&self) -> bool {
        self.creature_type.materiality == Materiality::Immaterial
    }

    /// Whether the creature flies over pits.
    pub fn levitates(&self) -> bool {
        self.creature_type.levitates
    }

    /// Whether the creature may use stairs.
    pub fn can_take_stairs(&self) -> bool {
        self.creature_type.can_take_stairs
    }

    /// Current health.
    pub fn health(&self) -> u32 {
        self.health
    }

    /// Apply damage. Returns the health actually lost.
    pub fn hit(&mut self, amount: u32) -> u32 {
        let lost = amount.min(self.health);
        self.health -= lost;
        lost
    }

    /// A creature is alive while it has health left.
    pub fn is_alive(&self) -> bool {
        self.health > 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MUMMY: CreatureType = CreatureType {
        name: "Mummy",
        size: Size::One,
        height: Height::Medium,
        materiality: Materiality::Material,
        levitates: false,
        can_take_stairs: true,
        base_health: 33,
    };

    #[test]
    fn health_scales_with_multiplier() {
        let c = Creature::new(CreatureId(1), MUMMY, 3);
        assert_eq!(c.health(), 99);
        assert!(c.is_alive());
    }

    #[test]
    fn footprints() {
        assert_eq!(Size::One.footprint(), 1);
        assert_eq!(Size::Two.footprint(), 2);
        assert_eq!(Size::Four.footprint(), 4);
    }

    #[test]
    fn heights_are_ordered() {
        assert!(Height::Giant > Height::Medium);
        assert!(Height::Medium > Height::Small);
        assert!(Height::Small > Height::Undefined);
    }

    #[test]
    fn hit_kills() {
        let mut c = Creature::new(CreatureId(2), MUMMY, 1);
        assert_eq!(c.hit(50), 33);
        assert!(!c.is_alive());
    }

    #[test]
    fn creatures_serialize_with_their_type() {
        let c = Creature::new(CreatureId(3), MUMMY, 2);
        let json = serde_json::to_value(&c).unwrap();
        assert_eq!(json["creature_type"]["name"], "Mummy");
        assert_eq!(json["health"], 66);
    }
}
