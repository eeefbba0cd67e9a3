use dm_core::{Creature, Height, Materiality, Orientation};
use dm_simulation::{Sound, Temporizer, TriggerAction, temporizer};

use crate::effect::{Effect, Reactions};
use crate::error::{MapError, MapResult};

/// Ticks between two animation steps.
pub const DOOR_STEP_TICKS: u32 = 4;

/// Door styles. The style fixes how hard the door is to break and what it
/// lets through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DoorStyle {
    /// Breakable, low resistance.
    Wooden,
    /// Breakable; items and sight pass through the bars.
    Grate,
    /// Breakable, high resistance.
    Iron,
    /// Unbreakable and animated; sight passes through.
    Ra,
}

impl DoorStyle {
    /// Resistance to blows; 255 means unbreakable.
    pub fn resistance(self) -> u8 {
        match self {
            Self::Wooden => 0x2A,
            Self::Grate => 0x6E,
            Self::Iron => 0xE6,
            Self::Ra => 0xFF,
        }
    }

    /// Whether blows can break the door.
    pub fn is_breakable(self) -> bool {
        self.resistance() != 0xFF
    }

    /// Whether thrown items pass through a closed door.
    pub fn lets_items_through(self) -> bool {
        self == Self::Grate
    }

    /// Whether creatures see through a closed door.
    pub fn is_see_through(self) -> bool {
        matches!(self, Self::Grate | Self::Ra)
    }

    /// Whether the door picture flips periodically.
    pub fn is_animated(self) -> bool {
        self == Self::Ra
    }
}

/// How far a door is open.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DoorState {
    /// Fully open.
    Open,
    /// Three quarters open.
    ThreeFourthOpen,
    /// Half open.
    HalfOpen,
    /// One quarter open.
    OneFourthOpen,
    /// Shut.
    Closed,
    /// Smashed; always passable and never moves again.
    Broken,
}

impl DoorState {
    fn opened(self) -> Self {
        match self {
            Self::Closed => Self::OneFourthOpen,
            Self::OneFourthOpen => Self::HalfOpen,
            Self::HalfOpen => Self::ThreeFourthOpen,
            Self::ThreeFourthOpen | Self::Open => Self::Open,
            Self::Broken => Self::Broken,
        }
    }

    fn closed(self) -> Self {
        match self {
            Self::Open => Self::ThreeFourthOpen,
            Self::ThreeFourthOpen => Self::HalfOpen,
            Self::HalfOpen => Self::OneFourthOpen,
            Self::OneFourthOpen | Self::Closed => Self::Closed,
            Self::Broken => Self::Broken,
        }
    }

    /// Whether the party and projectiles pass.
    pub fn is_passable(self) -> bool {
        matches!(self, Self::Open | Self::ThreeFourthOpen | Self::Broken)
    }
}

/// Where a door is heading.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DoorMotion {
    /// At rest.
    Idle,
    /// Opening one step per period.
    Opening,
    /// Closing one step per period.
    Closing,
    /// Bounced off something while closing; goes one step up, then closes again.
    OpeningAfterRebound,
}

/// A door: a state machine animated one step every [`DOOR_STEP_TICKS`] ticks.
///
/// | motion | step | result |
/// |---|---|---|
/// | Opening | one step up | Idle once Open |
/// | Closing | one step down | Idle once Closed; OpeningAfterRebound when something is in the way |
/// | OpeningAfterRebound | one step up | Closing |
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Door {
    style: DoorStyle,
    orientation: Orientation,
    state: DoorState,
    motion: DoorMotion,
    temporizer: Temporizer,
}

impl Door {
    /// A closed, idle door.
    pub fn new(style: DoorStyle, orientation: Orientation) -> Self {
        Self {
            style,
            orientation,
            state: DoorState::Closed,
            motion: DoorMotion::Idle,
            temporizer: Temporizer::new("door", temporizer::period(DOOR_STEP_TICKS)),
        }
    }

    /// Start in another resting state.
    pub fn with_state(mut self, state: DoorState) -> Self {
        self.state = state;
        self
    }

    /// Style.
    pub fn style(&self) -> DoorStyle {
        self.style
    }

    /// The axis the party walks along through the door.
    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    /// Current opening.
    pub fn state(&self) -> DoorState {
        self.state
    }

    /// Current motion.
    pub fn motion(&self) -> DoorMotion {
        self.motion
    }

    /// Whether blows can break the door.
    pub fn is_breakable(&self) -> bool {
        self.style.is_breakable()
    }

    /// Whether the door has been smashed.
    pub fn is_broken(&self) -> bool {
        self.state == DoorState::Broken
    }

    /// Whether the party can walk in.
    pub fn is_traversable_by_party(&self) -> bool {
        self.state.is_passable()
    }

    /// Whether a projectile can fly in.
    pub fn is_traversable_by_projectile(&self) -> bool {
        self.state.is_passable()
    }

    /// Whether a creature can walk in. Smaller creatures slip under a
    /// partly open door; immaterial ones pass anything but a Ra door.
    pub fn is_traversable_by_creature(&self, creature: &Creature) -> bool {
        let small = creature.height() == Height::Small;
        let medium = creature.height() == Height::Medium;
        match self.state {
            DoorState::Open | DoorState::Broken => return true,
            DoorState::ThreeFourthOpen if small || medium => return true,
            DoorState::HalfOpen if small => return true,
            _ => {}
        }
        creature.creature_type().materiality == Materiality::Immaterial
            && self.style != DoorStyle::Ra
    }

    pub(crate) fn open(&mut self, fx: &mut Reactions) {
        if self.is_broken() {
            return;
        }
        if self.motion != DoorMotion::Opening {
            self.motion = DoorMotion::Opening;
            fx.changed();
            fx.push(Effect::Listen);
        }
    }

    pub(crate) fn close(&mut self, fx: &mut Reactions) {
        if self.is_broken() {
            return;
        }
        if self.motion != DoorMotion::Closing {
            self.motion = DoorMotion::Closing;
            fx.changed();
            fx.push(Effect::Listen);
        }
    }

    /// Reverse the current motion; an idle door heads for the opposite of
    /// where it rests.
    pub(crate) fn toggle(&mut self, fx: &mut Reactions) {
        match self.motion {
            DoorMotion::Opening => self.close(fx),
            DoorMotion::Closing | DoorMotion::OpeningAfterRebound => self.open(fx),
            DoorMotion::Idle if self.state == DoorState::Open => self.close(fx),
            DoorMotion::Idle => self.open(fx),
        }
    }

    pub(crate) fn trigger(&mut self, action: TriggerAction, fx: &mut Reactions) {
        match action {
            TriggerAction::Enable => self.open(fx),
            TriggerAction::Disable => self.close(fx),
            TriggerAction::Toggle => self.toggle(fx),
        }
    }

    /// Hit the door. Only a closed idle breakable door breaks.
    pub(crate) fn destroy(&mut self, fx: &mut Reactions) -> MapResult<bool> {
        if self.is_broken() {
            return Err(MapError::DoorAlreadyBroken(fx.at()));
        }
        if self.state != DoorState::Closed || self.motion != DoorMotion::Idle {
            fx.sound(Sound::Swing);
            return Ok(false);
        }
        if !self.is_breakable() {
            fx.sound(Sound::Clonk);
            return Ok(false);
        }
        self.state = DoorState::Broken;
        tracing::info!(at = %fx.at(), "door broken");
        fx.sound(Sound::DoorBroken);
        fx.changed();
        Ok(true)
    }

    /// One clock tick. Returns whether the door keeps moving.
    pub(crate) fn animate(
        &mut self,
        party_present: bool,
        tallest: Option<Height>,
        fx: &mut Reactions,
    ) -> bool {
        if !self.temporizer.trigger() {
            return self.motion != DoorMotion::Idle;
        }
        if self.is_broken() {
            self.motion = DoorMotion::Idle;
            return false;
        }
        let before = self.state;
        let keep = match self.motion {
            DoorMotion::Idle => false,
            DoorMotion::Opening => {
                self.state = self.state.opened();
                if self.state == DoorState::Open {
                    self.motion = DoorMotion::Idle;
                }
                self.motion != DoorMotion::Idle
            }
            DoorMotion::Closing => {
                self.state = self.state.closed();
                if self.blocked(party_present, tallest) {
                    fx.sound(Sound::Bong);
                    self.motion = DoorMotion::OpeningAfterRebound;
                } else if self.state == DoorState::Closed {
                    self.motion = DoorMotion::Idle;
                }
                self.motion != DoorMotion::Idle
            }
            DoorMotion::OpeningAfterRebound => {
                self.state = self.state.opened();
                self.motion = DoorMotion::Closing;
                true
            }
        };
        if self.state != before {
            tracing::debug!(at = %fx.at(), from = ?before, to = ?self.state, "door step");
            fx.changed();
        }
        keep
    }

    fn blocked(&self, party_present: bool, tallest: Option<Height>) -> bool {
        if party_present {
            return true;
        }
        matches!(
            (self.state, tallest),
            (DoorState::ThreeFourthOpen, Some(Height::Giant))
                | (DoorState::HalfOpen, Some(Height::Medium))
                | (DoorState::OneFourthOpen, Some(Height::Small))
        )
    }
}
