//! Integration tests for the `dm` command-line interface.

#![allow(deprecated)] // Command::cargo_bin – macro replacement not yet stable

use assert_cmd::Command;
use predicates::prelude::*;

fn dm() -> Command {
    Command::cargo_bin("dm").unwrap()
}

// ---------------------------------------------------------------------------
// simulate
// ---------------------------------------------------------------------------

#[test]
fn simulate_prints_summary_and_party() {
    dm().args(["simulate", "--ticks", "60"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("Simulation")
                .and(predicate::str::contains("60 ticks"))
                .and(predicate::str::contains("Party Status"))
                .and(predicate::str::contains("Halk"))
                .and(predicate::str::contains("Leyla")),
        );
}

#[test]
fn simulate_verbose_lists_every_tick() {
    dm().args(["simulate", "--ticks", "20", "--verbose"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Event Log").and(predicate::str::contains("[tick")));
}

#[test]
fn simulate_json_is_an_event_array() {
    let output = dm()
        .args(["simulate", "--ticks", "40", "--json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let events: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let events = events.as_array().unwrap();
    assert!(!events.is_empty());
    assert!(
        events
            .iter()
            .any(|e| e["kind"]["type"] == "actuator_fired"),
        "the lever should fire its actuator"
    );
}

#[test]
fn simulate_is_deterministic_for_a_seed() {
    let run = || {
        dm().args(["simulate", "--ticks", "400", "--seed", "7", "--json"])
            .output()
            .unwrap()
            .stdout
    };
    assert_eq!(run(), run());
}

#[test]
fn simulate_with_empty_route_keeps_the_party_home() {
    dm().args(["simulate", "--ticks", "10", "--route", ""])
        .assert()
        .success()
        .stdout(predicate::str::contains("Party at (3, 5, 1)"));
}

#[test]
fn simulate_rejects_unknown_moves() {
    dm().args(["simulate", "--route", "FFX"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown move 'X'"));
}

#[test]
fn simulate_rejects_zero_ticks() {
    dm().args(["simulate", "--ticks", "0"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("tick count must be positive"));
}

// ---------------------------------------------------------------------------
// draw
// ---------------------------------------------------------------------------

#[test]
fn draw_renders_both_levels() {
    dm().arg("draw")
        .assert()
        .success()
        .stdout(
            predicate::str::contains("Level 1")
                .and(predicate::str::contains("Level 2"))
                .and(predicate::str::contains("SD"))
                .and(predicate::str::contains("SU"))
                .and(predicate::str::contains("GN")),
        );
}

#[test]
fn draw_single_level() {
    dm().args(["draw", "--level", "1"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("LV")
                .and(predicate::str::contains("TP"))
                .and(predicate::str::contains("Level 2").not()),
        );
}

#[test]
fn draw_unknown_level_fails() {
    dm().args(["draw", "--level", "9"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("no level 9"));
}

// ---------------------------------------------------------------------------
// validate
// ---------------------------------------------------------------------------

#[test]
fn validate_passes_for_the_demo() {
    dm().arg("validate")
        .assert()
        .success()
        .stdout(predicate::str::contains("All checks passed").and(predicate::str::contains("2 levels")));
}

// ---------------------------------------------------------------------------
// misc
// ---------------------------------------------------------------------------

#[test]
fn help_lists_subcommands() {
    dm().arg("--help")
        .assert()
        .success()
        .stdout(
            predicate::str::contains("simulate")
                .and(predicate::str::contains("draw"))
                .and(predicate::str::contains("validate")),
        );
}

#[test]
fn no_subcommand_fails() {
    dm().assert().failure();
}
