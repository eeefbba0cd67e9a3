pub mod draw;
pub mod simulate;
pub mod validate;

use dm_map::Dungeon;

use crate::demo;

/// Build the demonstration dungeon, turning build errors into messages.
fn load_demo(seed: u64) -> Result<Dungeon, String> {
    demo::build(seed).map_err(|e| format!("failed to build the demo dungeon: {e}"))
}
