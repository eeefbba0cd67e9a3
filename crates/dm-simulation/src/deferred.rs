use crate::error::SimResult;
use crate::temporizer::Temporizer;

/// A one-shot command that becomes due after a fixed number of ticks.
///
/// The command payload `C` says what to run; the owner ticks the command
/// once per clock tick and runs the payload when [`DeferredCommand::tick`]
/// reports it due, then stops listening.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeferredCommand<C> {
    temporizer: Temporizer,
    command: C,
}

impl<C> DeferredCommand<C> {
    /// Schedule `command` to become due after `delay` ticks.
    pub fn new(name: &'static str, delay: u32, command: C) -> SimResult<Self> {
        Ok(Self {
            temporizer: Temporizer::try_new(name, delay)?,
            command,
        })
    }

    /// Count one tick. Returns `true` once the command is due.
    pub fn tick(&mut self) -> bool {
        self.temporizer.trigger()
    }

    /// Ticks left before the command is due.
    pub fn remaining(&self) -> u32 {
        self.temporizer.remaining()
    }

    /// Diagnostic name.
    pub fn name(&self) -> &'static str {
        self.temporizer.name()
    }

    /// The pending command.
    pub fn command(&self) -> &C {
        &self.command
    }

    /// Consume the deferred command, yielding its payload.
    pub fn into_command(self) -> C {
        self.command
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SimError;

    #[test]
    fn due_after_delay() {
        let mut cmd = DeferredCommand::new("boost expiry", 3, "expire").unwrap();
        assert!(!cmd.tick());
        assert!(!cmd.tick());
        assert_eq!(cmd.remaining(), 1);
        assert!(cmd.tick());
        assert_eq!(cmd.into_command(), "expire");
    }

    #[test]
    fn zero_delay_rejected() {
        assert_eq!(
            DeferredCommand::new("now", 0, ()).unwrap_err(),
            SimError::ZeroPeriod { name: "now" }
        );
    }

    #[test]
    fn exposes_payload_and_name() {
        let cmd = DeferredCommand::new("move", 4, 42u8).unwrap();
        assert_eq!(*cmd.command(), 42);
        assert_eq!(cmd.name(), "move");
    }
}
