use dm_simulation::TriggerAction;

use crate::effect::Reactions;

/// A wall that slides away when triggered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RetractableWall {
    open: bool,
}

impl RetractableWall {
    /// A closed wall.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the wall is retracted.
    pub fn is_open(&self) -> bool {
        self.open
    }

    pub(crate) fn trigger(&mut self, action: TriggerAction, fx: &mut Reactions) {
        let open = match action {
            TriggerAction::Enable => true,
            TriggerAction::Disable => false,
            TriggerAction::Toggle => !self.open,
        };
        if open != self.open {
            self.open = open;
            fx.changed();
        }
    }
}
