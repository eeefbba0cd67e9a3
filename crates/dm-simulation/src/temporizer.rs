use std::num::NonZeroU32;

use crate::error::{SimError, SimResult};

/// A reusable countdown that fires once every `period` calls to [`Temporizer::trigger`].
///
/// A temporizer is not a clock listener: its owner calls `trigger` from its
/// own tick handler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Temporizer {
    name: &'static str,
    period: NonZeroU32,
    remaining: u32,
}

impl Temporizer {
    /// Create a temporizer with a period known to be non-zero.
    pub const fn new(name: &'static str, period: NonZeroU32) -> Self {
        Self {
            name,
            period,
            remaining: period.get(),
        }
    }

    /// Create a temporizer from a raw tick count, rejecting zero.
    pub fn try_new(name: &'static str, period: u32) -> SimResult<Self> {
        NonZeroU32::new(period)
            .map(|p| Self::new(name, p))
            .ok_or(SimError::ZeroPeriod { name })
    }

    /// Count one tick. Returns `true` on every `period`-th call and starts over.
    pub fn trigger(&mut self) -> bool {
        self.remaining -= 1;
        if self.remaining == 0 {
            self.remaining = self.period.get();
            true
        } else {
            false
        }
    }

    /// Restart the countdown from a full period.
    pub fn reset(&mut self) {
        self.remaining = self.period.get();
    }

    /// Diagnostic name.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Period in ticks.
    pub fn period(&self) -> u32 {
        self.period.get()
    }

    /// Calls left before the next firing.
    pub fn remaining(&self) -> u32 {
        self.remaining
    }
}

/// Turn a tick constant into a period, treating zero as one tick.
pub const fn period(ticks: u32) -> NonZeroU32 {
    match NonZeroU32::new(ticks) {
        Some(p) => p,
        None => NonZeroU32::MIN,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn fires_every_period() {
        let mut t = Temporizer::try_new("test", 3).unwrap();
        let fired: Vec<bool> = (0..7).map(|_| t.trigger()).collect();
        assert_eq!(fired, vec![false, false, true, false, false, true, false]);
    }

    #[test]
    fn period_one_fires_every_call() {
        let mut t = Temporizer::new("fast", period(1));
        assert!(t.trigger());
        assert!(t.trigger());
    }

    #[test]
    fn zero_period_rejected() {
        assert_eq!(
            Temporizer::try_new("broken", 0),
            Err(SimError::ZeroPeriod { name: "broken" })
        );
        assert_eq!(period(0).get(), 1);
    }

    #[test]
    fn reset_restarts_countdown() {
        let mut t = Temporizer::try_new("test", 4).unwrap();
        t.trigger();
        t.trigger();
        assert_eq!(t.remaining(), 2);
        t.reset();
        assert_eq!(t.remaining(), 4);
        assert_eq!(t.period(), 4);
        assert_eq!(t.name(), "test");
    }

    proptest! {
        #[test]
        fn fires_exactly_calls_over_period(p in 1u32..50, calls in 0u32..500) {
            let mut t = Temporizer::try_new("prop", p).unwrap();
            let fired = (0..calls).filter(|_| t.trigger()).count() as u32;
            prop_assert_eq!(fired, calls / p);
        }
    }
}
