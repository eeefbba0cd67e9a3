use dm_simulation::TriggerAction;

use crate::effect::Reactions;

/// A hole in the floor. Real open pits drop what enters them one level down;
/// illusions look like pits but never drop anything.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pit {
    open: bool,
    illusion: bool,
}

impl Default for Pit {
    fn default() -> Self {
        Self::new()
    }
}

impl Pit {
    /// An open, real pit.
    pub fn new() -> Self {
        Self {
            open: true,
            illusion: false,
        }
    }

    /// An open illusion.
    pub fn fake() -> Self {
        Self {
            open: true,
            illusion: true,
        }
    }

    /// Start open or closed.
    pub fn with_open(mut self, open: bool) -> Self {
        self.open = open;
        self
    }

    /// Whether the pit is open.
    pub fn is_open(&self) -> bool {
        self.open
    }

    /// Whether the pit is an illusion.
    pub fn is_illusion(&self) -> bool {
        self.illusion
    }

    /// Whether what enters the pit falls.
    pub fn swallows(&self) -> bool {
        self.open && !self.illusion
    }

    /// Returns whether the pit was closed before.
    pub(crate) fn open(&mut self, fx: &mut Reactions) -> bool {
        if self.open {
            return false;
        }
        self.open = true;
        fx.changed();
        true
    }

    /// Returns whether the pit was open before.
    pub(crate) fn close(&mut self, fx: &mut Reactions) -> bool {
        if !self.open {
            return false;
        }
        self.open = false;
        fx.changed();
        true
    }

    /// Returns whether the pit just opened.
    pub(crate) fn trigger(&mut self, action: TriggerAction, fx: &mut Reactions) -> bool {
        match action {
            TriggerAction::Enable => self.open(fx),
            TriggerAction::Disable => {
                self.close(fx);
                false
            }
            TriggerAction::Toggle if self.open => {
                self.close(fx);
                false
            }
            TriggerAction::Toggle => self.open(fx),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::effect::Effect;
    use dm_core::Position;

    #[test]
    fn open_close_report_transitions() {
        let mut fx = Reactions::new(Position::new(1, 1, 1));
        let mut pit = Pit::new().with_open(false);
        assert!(!pit.swallows());
        assert!(pit.open(&mut fx));
        assert!(!pit.open(&mut fx));
        assert!(pit.swallows());
        assert!(pit.close(&mut fx));
        assert_eq!(fx.effects(), &[Effect::Changed, Effect::Changed]);
    }

    #[test]
    fn trigger_maps_actions() {
        let mut fx = Reactions::new(Position::new(1, 1, 1));
        let mut pit = Pit::new();
        assert!(!pit.trigger(TriggerAction::Toggle, &mut fx));
        assert!(!pit.is_open());
        assert!(pit.trigger(TriggerAction::Toggle, &mut fx));
        assert!(pit.is_open());
        assert!(!pit.trigger(TriggerAction::Disable, &mut fx));
        assert!(!pit.is_open());
        assert!(pit.trigger(TriggerAction::Enable, &mut fx));
    }

    #[test]
    fn illusions_never_swallow() {
        let pit = Pit::fake();
        assert!(pit.is_open());
        assert!(!pit.swallows());
        assert!(!pit.with_open(false).swallows());
    }
}
