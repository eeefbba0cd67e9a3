use std::fmt::Debug;

use crate::error::{SimError, SimResult};

/// Ticks per in-game second.
pub const ONE_SECOND: u32 = 6;
/// Ticks per in-game minute.
pub const ONE_MINUTE: u32 = ONE_SECOND * 60;

/// The discrete time source and its registry of listeners.
///
/// Listeners are plain keys (`L`); whoever owns the clock maps each key back
/// to the state it names. Registrations and unregistrations are buffered and
/// take effect at the start of the next tick, so the set being delivered
/// never changes under the owner's feet. Each registered key is delivered
/// once per tick, in registration order.
#[derive(Debug, Clone)]
pub struct Clock<L> {
    tick: u64,
    listeners: Vec<L>,
    added: Vec<L>,
    removed: Vec<L>,
}

impl<L> Default for Clock<L> {
    fn default() -> Self {
        Self {
            tick: 0,
            listeners: Vec::new(),
            added: Vec::new(),
            removed: Vec::new(),
        }
    }
}

impl<L: Copy + Eq + Debug> Clock<L> {
    /// Create a clock at tick 0 with no listeners.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a listener from the next tick on. Registering twice is a no-op.
    pub fn register(&mut self, listener: L) {
        self.removed.retain(|l| *l != listener);
        if !self.added.contains(&listener) {
            self.added.push(listener);
        }
    }

    /// Stop delivering to a listener from the next tick on.
    pub fn unregister(&mut self, listener: L) {
        self.added.retain(|l| *l != listener);
        if self.listeners.contains(&listener) && !self.removed.contains(&listener) {
            self.removed.push(listener);
        }
    }

    /// Whether the listener will be delivered on the next tick.
    pub fn is_registered(&self, listener: L) -> bool {
        self.added.contains(&listener)
            || (self.listeners.contains(&listener) && !self.removed.contains(&listener))
    }

    /// Advance by one tick: apply buffered registrations, then return the
    /// listeners due this tick in registration order.
    ///
    /// The owner delivers the tick to each returned key and calls
    /// [`Clock::retire`] for every key whose callback answered "stop".
    pub fn advance(&mut self) -> Vec<L> {
        for listener in self.added.drain(..) {
            if !self.listeners.contains(&listener) {
                self.listeners.push(listener);
            }
        }
        let removed = std::mem::take(&mut self.removed);
        self.listeners.retain(|l| !removed.contains(l));
        self.tick += 1;
        self.listeners.clone()
    }

    /// Drop a listener that answered "stop" during the current tick.
    ///
    /// A registration issued during the same tick still brings it back on the
    /// next one.
    pub fn retire(&mut self, listener: L) {
        self.listeners.retain(|l| *l != listener);
    }

    /// Advance by one tick and deliver it to each listener through `deliver`,
    /// which answers whether the listener wants further ticks.
    pub fn tick_with(&mut self, mut deliver: impl FnMut(L) -> bool) {
        for listener in self.advance() {
            if !deliver(listener) {
                tracing::trace!(?listener, "listener retired");
                self.retire(listener);
            }
        }
    }

    /// Advance by `n` ticks, as `n` calls to [`Clock::tick_with`].
    pub fn tick_n_with(&mut self, n: u64, mut deliver: impl FnMut(L) -> bool) -> SimResult<()> {
        if n == 0 {
            return Err(SimError::ZeroTicks);
        }
        for _ in 0..n {
            self.tick_with(&mut deliver);
        }
        Ok(())
    }

    /// Current tick number; 0 before the first tick.
    pub fn tick(&self) -> u64 {
        self.tick
    }

    /// Listeners currently delivered, ignoring buffered changes.
    pub fn listeners(&self) -> &[L] {
        &self.listeners
    }

    /// Number of listeners currently delivered.
    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    /// Whether no listener is delivered and none is pending.
    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty() && self.added.is_empty()
    }

    /// Forget every listener and restart at tick 0. Meant for test isolation.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
