use dm_simulation::SimConfig;

pub fn run() -> Result<(), String> {
    let dungeon = super::load_demo(SimConfig::default().seed)?;
    dungeon.validate().map_err(|e| format!("validation failed: {e}"))?;

    let cells: u32 = dungeon.levels().map(|l| l.width() * l.height()).sum();
    println!("  All checks passed for the demo dungeon.");
    println!("  {} levels, {cells} cells", dungeon.levels().count());

    Ok(())
}
