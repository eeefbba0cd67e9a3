//! The demonstration dungeon shipped with the CLI.
//!
//! Two 7×7 levels. Level 1 holds a lever-driven iron door, an open pit above
//! level 2, a teleporter and a staircase down; level 2 holds the matching
//! staircase up and a creature generator.

use dm_core::{
    Champion, CreatureType, Direction, DirectionTransform, Height, Materiality, Orientation,
    Party, Position, Size, Speed,
};
use dm_map::{
    Door, DoorStyle, Dungeon, Element, Generator, Lever, MapResult, Pit, Stairs, Teleporter,
};
use dm_simulation::{Actuator, SimConfig, TriggerAction};

/// Default party route: walk north through the door, east, then back onto the pit.
pub const ROUTE: &str = "FFFFFRRBB";

const CHAMPIONS: [&str; 4] = ["Halk", "Syra", "Wuuf", "Leyla"];

const LEVER: Position = Position::new(2, 2, 1);
const DOOR: Position = Position::new(3, 2, 1);
const PIT: Position = Position::new(5, 3, 1);
const TELEPORTER: Position = Position::new(5, 4, 1);
const STAIRS_DOWN: Position = Position::new(1, 1, 1);
const STAIRS_UP: Position = Position::new(1, 1, 2);
const GENERATOR: Position = Position::new(4, 4, 2);
const START: Position = Position::new(3, 5, 1);

const SCREAMER: CreatureType = CreatureType {
    name: "screamer",
    size: Size::One,
    height: Height::Medium,
    materiality: Materiality::Material,
    levitates: false,
    can_take_stairs: false,
    base_health: 40,
};

/// Build the demo dungeon. The lever is pulled one tick after the clock starts.
pub fn build(seed: u64) -> MapResult<Dungeon> {
    let mut dungeon = Dungeon::new(SimConfig::default().with_seed(seed));
    dungeon.create_level(1, 7, 7)?;
    dungeon.create_level(2, 7, 7)?;

    for wall in [
        Position::new(2, 1, 1),
        Position::new(4, 2, 1),
        Position::new(2, 1, 2),
    ] {
        dungeon.set_element(wall, Element::wall())?;
    }

    dungeon.set_element(DOOR, Door::new(DoorStyle::Iron, Orientation::NorthSouth))?;
    dungeon.set_element(LEVER, Lever::new(Direction::South))?;
    dungeon.add_actuator(LEVER, Actuator::simple(1, TriggerAction::Toggle, vec![DOOR])?)?;

    dungeon.set_element(PIT, Pit::new())?;
    dungeon.set_element(
        TELEPORTER,
        Teleporter::new(Position::new(1, 3, 1), DirectionTransform::Clockwise),
    )?;
    dungeon.set_element(STAIRS_DOWN, Stairs::new(Direction::North, false, STAIRS_UP))?;
    dungeon.set_element(STAIRS_UP, Stairs::new(Direction::North, true, STAIRS_DOWN))?;
    dungeon.set_element(GENERATOR, Generator::new(SCREAMER, 0))?;
    dungeon.set_experience_multiplier(2, 2)?;

    let mut party = Party::new().with_speed(Speed::Normal);
    for name in CHAMPIONS {
        party.add_champion(Champion::new(name, 120))?;
    }
    party.set_position(START);
    party.set_look_direction(Direction::North);
    dungeon.set_party(party)?;

    dungeon.schedule("pull lever", 1, |d| d.operate(LEVER))?;
    Ok(dungeon)
}
