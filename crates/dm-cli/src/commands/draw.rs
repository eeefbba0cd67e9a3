use colored::Colorize;

use dm_map::Level;
use dm_simulation::SimConfig;

pub fn run(level: Option<i32>) -> Result<(), String> {
    let dungeon = super::load_demo(SimConfig::default().seed)?;

    let levels: Vec<&Level> = match level {
        Some(number) => vec![dungeon.level(number).map_err(|e| e.to_string())?],
        None => dungeon.levels().collect(),
    };

    for level in levels {
        println!(
            "  {} {}",
            format!("Level {}", level.number()).bold(),
            format!("({}x{})", level.width(), level.height()).dimmed()
        );
        println!();
        for line in level.draw().lines() {
            println!("  {line}");
        }
        println!();
    }

    if let Some(party) = dungeon.party() {
        println!(
            "  Party starts at {} facing {}",
            party.position(),
            party.look_direction()
        );
    }

    Ok(())
}
