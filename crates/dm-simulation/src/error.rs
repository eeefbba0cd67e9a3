/// Alias for `Result<T, SimError>`.
pub type SimResult<T> = Result<T, SimError>;

/// Errors raised by the scheduling primitives.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum SimError {
    /// A temporizer, deferred command or actuator was given a zero delay.
    #[error("{name}: period must be at least one tick")]
    ZeroPeriod {
        /// Diagnostic name of the offending timer.
        name: &'static str,
    },

    /// An actuator was built without any target.
    #[error("actuator has no target")]
    NoTargets,

    /// `tick_n` was asked to advance by zero ticks.
    #[error("tick count must be positive")]
    ZeroTicks,
}
