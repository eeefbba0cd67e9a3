use colored::Colorize;
use comfy_table::{ContentArrangement, Table};

use dm_core::Move;
use dm_map::Dungeon;
use dm_simulation::{SimEvent, SimEventKind};
use tracing::{debug, info};

pub fn run(ticks: u64, seed: u64, route: &str, verbose: bool, json: bool) -> Result<(), String> {
    let moves = parse_route(route)?;
    let mut dungeon = super::load_demo(seed)?;

    for step in &moves {
        dungeon
            .move_party(*step, false)
            .map_err(|e| format!("cannot queue {step:?}: {e}"))?;
    }
    debug!(moves = moves.len(), "route queued");
    dungeon
        .tick_n(ticks)
        .map_err(|e| format!("simulation error: {e}"))?;
    info!(ticks, events = dungeon.events().len(), "simulation finished");

    if json {
        let out = serde_json::to_string_pretty(dungeon.events().events())
            .map_err(|e| format!("JSON serialization failed: {e}"))?;
        println!("{out}");
        return Ok(());
    }

    // Header
    println!(
        "  {} {}",
        "Simulation".bold(),
        format!("({ticks} ticks, seed={seed}, route={route})").dimmed()
    );
    println!(
        "  {} events logged, {} moves still queued",
        dungeon.events().len(),
        dungeon.queued_moves().count()
    );
    if let Some(party) = dungeon.party() {
        println!(
            "  Party at {} facing {}",
            party.position(),
            party.look_direction()
        );
    }
    println!();

    if verbose {
        println!("  {}", "Event Log".bold().underline());
        println!();
        for event in dungeon.events().events() {
            let tick_label = format!("[tick {:>3}]", event.tick).dimmed();
            let desc = colorize_event(&event.kind, &event.description);
            println!("  {tick_label} {desc}");
        }
        if dungeon.events().is_empty() {
            println!("  {}", "(no events)".dimmed());
        }
        println!();
    } else {
        print_notable(&dungeon);
    }

    print_party(&dungeon);
    Ok(())
}

/// Parse a route like `FF<R`: `F B L R` step, `<` and `>` turn.
fn parse_route(route: &str) -> Result<Vec<Move>, String> {
    route
        .chars()
        .filter(|c| !c.is_whitespace())
        .map(|c| match c.to_ascii_uppercase() {
            'F' => Ok(Move::Forward),
            'B' => Ok(Move::Backward),
            'L' => Ok(Move::Left),
            'R' => Ok(Move::Right),
            '<' => Ok(Move::TurnLeft),
            '>' => Ok(Move::TurnRight),
            other => Err(format!("unknown move '{other}' in route")),
        })
        .collect()
}

fn print_notable(dungeon: &Dungeon) {
    let notable: Vec<&SimEvent> = dungeon
        .events()
        .events()
        .iter()
        .filter(|e| notable_label(&e.kind).is_some())
        .collect();
    if notable.is_empty() {
        return;
    }

    println!("  {}", "Notable Events".bold().underline());
    for event in notable {
        if let Some(label) = notable_label(&event.kind) {
            let tick_label = format!("[tick {:>3}]", event.tick).dimmed();
            println!("  {tick_label} {label} {}", event.description);
        }
    }
    println!();
}

fn notable_label(kind: &SimEventKind) -> Option<colored::ColoredString> {
    match kind {
        SimEventKind::PartyFell { .. } => Some("    FELL".red().bold()),
        SimEventKind::PartyTeleported { .. } => Some("TELEPORT".blue().bold()),
        SimEventKind::PartyBumped { .. } => Some("    BUMP".yellow().bold()),
        SimEventKind::CreatureSpawned { .. } => Some("   SPAWN".magenta().bold()),
        SimEventKind::ActuatorFired { .. } => Some("ACTUATOR".cyan().bold()),
        _ => None,
    }
}

fn print_party(dungeon: &Dungeon) {
    println!("  {}", "Party Status".bold().underline());
    println!();

    let Some(party) = dungeon.party() else {
        println!("  {}", "(no party)".dimmed());
        return;
    };

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Champion", "Place", "Health", "Feet"]);

    for champion in party.champions() {
        let health = format!("{}/{}", champion.health(), champion.max_health());
        let health = if champion.is_alive() {
            health
        } else {
            format!("{health} (dead)")
        };
        let feet = if champion.feet_wounded() {
            "wounded"
        } else {
            "ok"
        };
        table.add_row(vec![
            champion.name().to_string(),
            format!("{:?}", champion.location()),
            health,
            feet.to_string(),
        ]);
    }

    println!("{table}");
    println!();
}

fn colorize_event(kind: &SimEventKind, description: &str) -> colored::ColoredString {
    match kind {
        SimEventKind::PartyFell { .. } | SimEventKind::ChampionHurt { .. } => {
            description.red()
        }
        SimEventKind::PartyBumped { .. } => description.yellow(),
        SimEventKind::PartyMoved { .. }
        | SimEventKind::PartyTurned { .. }
        | SimEventKind::PartyTeleported { .. } => description.blue(),
        SimEventKind::CreatureSpawned { .. } | SimEventKind::CreatureMoved { .. } => {
            description.magenta()
        }
        SimEventKind::ActuatorFired { .. } | SimEventKind::ElementChanged { .. } => {
            description.cyan()
        }
        SimEventKind::HazardExpired { .. } => description.green(),
        SimEventKind::SoundPlayed { .. } => description.dimmed(),
        SimEventKind::ItemMoved { .. }
        | SimEventKind::ProjectileMoved { .. }
        | SimEventKind::ProjectileLaunched { .. } => description.normal(),
    }
}
