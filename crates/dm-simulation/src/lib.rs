//! Tick scheduling primitives for the dungeon engine.
//!
//! Time advances in whole ticks driven by a [`Clock`]. Everything that reacts
//! to time (door animations, generators, delayed triggers, queued party
//! moves) is a listener key registered on the clock; the owner of the clock
//! resolves each key to the state it names and ticks it. This keeps a single
//! owner for all mutable state while preserving registration-order delivery.

/// Actuators: delayed, composable trigger effects.
pub mod actuator;
/// The discrete clock and its listener registry.
pub mod clock;
/// Configuration types for simulation runs.
pub mod config;
/// One-shot commands that run after a delay.
pub mod deferred;
/// Error types for the simulation crate.
pub mod error;
/// Simulation event types and the event log.
pub mod event;
/// Reusable period counters.
pub mod temporizer;

/// Re-exports of actuator types.
pub use actuator::{Actuator, Firing, TriggerAction};
/// Re-exports of [`clock::Clock`] and the tick constants.
pub use clock::{Clock, ONE_MINUTE, ONE_SECOND};
/// Re-export of [`config::SimConfig`].
pub use config::SimConfig;
/// Re-export of [`deferred::DeferredCommand`].
pub use deferred::DeferredCommand;
/// Re-exports of [`error::SimError`] and [`error::SimResult`].
pub use error::{SimError, SimResult};
/// Re-exports of [`event::EventLog`], [`event::SimEvent`], [`event::SimEventKind`] and [`event::Sound`].
pub use event::{EventLog, SimEvent, SimEventKind, Sound};
/// Re-export of [`temporizer::Temporizer`].
pub use temporizer::Temporizer;
