use dm_core::{DirectionTransform, Position};
use dm_simulation::{ONE_SECOND, Temporizer, TriggerAction, temporizer};

use crate::effect::Reactions;

/// Sends whatever enters it to a destination, turning it through a
/// direction transform. Without a destination it only turns its visitors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Teleporter {
    destination: Option<Position>,
    transform: DirectionTransform,
    silent: bool,
    enabled: bool,
    mirrored: bool,
    temporizer: Temporizer,
}

impl Teleporter {
    /// An enabled, visible teleporter to `destination`.
    pub fn new(destination: Position, transform: DirectionTransform) -> Self {
        Self::build(Some(destination), transform)
    }

    /// An enabled spinner: turns visitors in place.
    pub fn spinner(transform: DirectionTransform) -> Self {
        Self::build(None, transform)
    }

    fn build(destination: Option<Position>, transform: DirectionTransform) -> Self {
        Self {
            destination,
            transform,
            silent: false,
            enabled: true,
            mirrored: false,
            temporizer: Temporizer::new("teleporter", temporizer::period(ONE_SECOND)),
        }
    }

    /// A silent teleporter is invisible and relocates the party without a sound.
    pub fn with_silent(mut self, silent: bool) -> Self {
        self.silent = silent;
        self
    }

    /// Start enabled or disabled.
    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    /// Destination, if any.
    pub fn destination(&self) -> Option<Position> {
        self.destination
    }

    /// How visitors are turned.
    pub fn transform(&self) -> DirectionTransform {
        self.transform
    }

    /// Whether the teleporter is silent.
    pub fn is_silent(&self) -> bool {
        self.silent
    }

    /// Whether the teleporter is active.
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Cosmetic flag flipped every second.
    pub fn is_mirrored(&self) -> bool {
        self.mirrored
    }

    /// Returns whether the teleporter was disabled before.
    pub(crate) fn enable(&mut self, fx: &mut Reactions) -> bool {
        if self.enabled {
            return false;
        }
        self.enabled = true;
        fx.changed();
        true
    }

    pub(crate) fn disable(&mut self, fx: &mut Reactions) {
        if self.enabled {
            self.enabled = false;
            fx.changed();
        }
    }

    /// Returns whether the teleporter just became enabled.
    pub(crate) fn trigger(&mut self, action: TriggerAction, fx: &mut Reactions) -> bool {
        match action {
            TriggerAction::Enable => self.enable(fx),
            TriggerAction::Toggle if !self.enabled => self.enable(fx),
            TriggerAction::Disable | TriggerAction::Toggle => {
                self.disable(fx);
                false
            }
        }
    }

    /// One clock tick; a visible teleporter listens forever.
    pub(crate) fn animate(&mut self) -> bool {
        if self.silent {
            return false;
        }
        if self.temporizer.trigger() {
            self.mirrored = !self.mirrored;
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mirrored_flips_every_second() {
        let mut tp = Teleporter::new(Position::new(1, 1, 1), DirectionTransform::Identity);
        for _ in 0..ONE_SECOND {
            assert!(tp.animate());
        }
        assert!(tp.is_mirrored());
        for _ in 0..ONE_SECOND {
            tp.animate();
        }
        assert!(!tp.is_mirrored());
    }

    #[test]
    fn silent_teleporter_stops_listening() {
        let mut tp = Teleporter::spinner(DirectionTransform::Opposite).with_silent(true);
        assert!(!tp.animate());
        assert_eq!(tp.destination(), None);
    }

    #[test]
    fn toggle_flips_enabled() {
        let mut fx = Reactions::new(Position::new(1, 1, 1));
        let mut tp = Teleporter::new(Position::new(1, 1, 1), DirectionTransform::Identity);
        assert!(!tp.trigger(TriggerAction::Toggle, &mut fx));
        assert!(!tp.is_enabled());
        assert!(tp.trigger(TriggerAction::Toggle, &mut fx));
        assert!(tp.is_enabled());
        assert!(!tp.trigger(TriggerAction::Enable, &mut fx));
    }
}
