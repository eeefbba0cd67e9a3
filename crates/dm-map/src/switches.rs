use dm_core::Direction;
use dm_simulation::{Sound, TriggerAction};

use crate::effect::{Effect, Reactions};
use crate::element::ActuatorSlot;

/// Occupancy changes a floor switch can react to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TriggerType {
    /// The party arrived.
    PartySteppedOn,
    /// The party left.
    PartySteppedOff,
    /// The first item was dropped.
    ItemDropped,
    /// The last item was picked up.
    ItemPickedUp,
    /// A creature arrived.
    CreatureSteppedOn,
    /// A creature left.
    CreatureSteppedOff,
}

/// A button or two-way switch set in a wall.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WallSwitch {
    direction: Direction,
    pressed: bool,
    push_button: bool,
}

impl WallSwitch {
    /// A released push button facing `direction`.
    pub fn new(direction: Direction) -> Self {
        Self {
            direction,
            pressed: false,
            push_button: true,
        }
    }

    /// A two-way switch, which has no pressed state and fires on every use.
    pub fn two_way(direction: Direction) -> Self {
        Self {
            push_button: false,
            ..Self::new(direction)
        }
    }

    /// Which way the switch faces.
    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Whether this is a push button.
    pub fn is_push_button(&self) -> bool {
        self.push_button
    }

    /// Whether the button is held down.
    pub fn is_pressed(&self) -> bool {
        self.push_button && self.pressed
    }

    pub(crate) fn press(&mut self, fx: &mut Reactions) {
        if !self.is_pressed() {
            self.toggle(fx);
        }
    }

    pub(crate) fn release(&mut self, fx: &mut Reactions) {
        if !self.push_button || self.pressed {
            self.toggle(fx);
        }
    }

    pub(crate) fn toggle(&mut self, fx: &mut Reactions) {
        if self.push_button {
            self.pressed = !self.pressed;
        }
        fx.sound(Sound::Switch);
        fx.changed();
        fx.push(Effect::Fire(ActuatorSlot::Main));
    }

    pub(crate) fn trigger(&mut self, action: TriggerAction, fx: &mut Reactions) {
        match action {
            TriggerAction::Enable => self.press(fx),
            TriggerAction::Disable => self.release(fx),
            TriggerAction::Toggle => self.toggle(fx),
        }
    }
}

/// A lever set in a wall. Starts up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Lever {
    direction: Direction,
    up: bool,
}

impl Lever {
    /// A lever facing `direction`, up.
    pub fn new(direction: Direction) -> Self {
        Self {
            direction,
            up: true,
        }
    }

    /// Start down instead.
    pub fn down(mut self) -> Self {
        self.up = false;
        self
    }

    /// Which way the lever faces.
    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Whether the lever is up.
    pub fn is_up(&self) -> bool {
        self.up
    }

    pub(crate) fn toggle(&mut self, fx: &mut Reactions) {
        self.up = !self.up;
        fx.sound(Sound::Switch);
        fx.changed();
        fx.push(Effect::Fire(ActuatorSlot::Main));
    }

    /// Returns whether the lever moved.
    pub(crate) fn push_up(&mut self, fx: &mut Reactions) -> bool {
        if self.up {
            return false;
        }
        self.toggle(fx);
        true
    }

    /// Returns whether the lever moved.
    pub(crate) fn push_down(&mut self, fx: &mut Reactions) -> bool {
        if !self.up {
            return false;
        }
        self.toggle(fx);
        true
    }

    pub(crate) fn trigger(&mut self, action: TriggerAction, fx: &mut Reactions) {
        match action {
            TriggerAction::Enable => {
                self.push_down(fx);
            }
            TriggerAction::Disable => {
                self.push_up(fx);
            }
            TriggerAction::Toggle => self.toggle(fx),
        }
    }
}

/// A pressure pad with one actuator slot per [`TriggerType`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FloorSwitch {
    pad_visible: bool,
}

impl Default for FloorSwitch {
    fn default() -> Self {
        Self::new()
    }
}

impl FloorSwitch {
    /// A visible pressure pad.
    pub fn new() -> Self {
        Self { pad_visible: true }
    }

    /// A pad drawn as plain floor.
    pub fn hidden() -> Self {
        Self { pad_visible: false }
    }

    /// Whether the pad is drawn.
    pub fn is_pad_visible(&self) -> bool {
        self.pad_visible
    }
}
