use dm_core::{CreatureType, Size};
use dm_simulation::{ONE_MINUTE, Temporizer, TriggerAction, temporizer};
use rand::Rng;
use rand::rngs::StdRng;

use crate::effect::{Effect, Reactions};

/// Whether a generator is waiting for its period or retrying a spawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GeneratorState {
    /// Waiting for the next period.
    Waiting,
    /// The last attempt found the cell occupied; try again every tick.
    Retrying,
}

/// Spawns a group of creatures once a minute when its cell is empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Generator {
    creature_type: CreatureType,
    multiplier: u32,
    state: GeneratorState,
    enabled: bool,
    temporizer: Temporizer,
}

impl Generator {
    /// A generator of `creature_type`. A `multiplier` of 0 uses the level's
    /// experience multiplier.
    pub fn new(creature_type: CreatureType, multiplier: u32) -> Self {
        Self {
            creature_type,
            multiplier,
            state: GeneratorState::Waiting,
            enabled: true,
            temporizer: Temporizer::new("generator", temporizer::period(ONE_MINUTE)),
        }
    }

    /// Creature type spawned.
    pub fn creature_type(&self) -> &CreatureType {
        &self.creature_type
    }

    /// Health multiplier; 0 means the level's.
    pub fn multiplier(&self) -> u32 {
        self.multiplier
    }

    /// Waiting or retrying.
    pub fn state(&self) -> GeneratorState {
        self.state
    }

    /// Whether spawning is allowed.
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub(crate) fn trigger(&mut self, action: TriggerAction, fx: &mut Reactions) {
        let enabled = match action {
            TriggerAction::Enable => true,
            TriggerAction::Disable => false,
            TriggerAction::Toggle => !self.enabled,
        };
        if enabled != self.enabled {
            self.enabled = enabled;
            if !enabled {
                self.state = GeneratorState::Waiting;
            }
            fx.changed();
        }
    }

    /// One clock tick. Generators never stop listening.
    pub(crate) fn tick(&mut self, occupied: bool, rng: &mut StdRng, fx: &mut Reactions) -> bool {
        let period_elapsed = self.temporizer.trigger();
        if !self.enabled {
            return true;
        }
        if self.state == GeneratorState::Waiting && !period_elapsed {
            return true;
        }
        if occupied {
            if self.state == GeneratorState::Waiting {
                tracing::debug!(at = %fx.at(), "generator blocked, retrying every tick");
            }
            self.state = GeneratorState::Retrying;
            return true;
        }
        self.state = GeneratorState::Waiting;
        let count = match self.creature_type.size {
            Size::One => rng.random_range(2..=4),
            Size::Two => rng.random_range(1..=2),
            Size::Four => 1,
        };
        fx.push(Effect::Spawn {
            creature_type: self.creature_type,
            count,
            multiplier: self.multiplier,
        });
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dm_core::{Height, Materiality, Position};
    use rand::SeedableRng;

    fn worm(size: Size) -> CreatureType {
        CreatureType {
            name: "worm",
            size,
            height: Height::Small,
            materiality: Materiality::Material,
            levitates: false,
            can_take_stairs: false,
            base_health: 20,
        }
    }

    fn spawned(fx: &Reactions) -> Option<u32> {
        fx.effects().iter().find_map(|e| match e {
            Effect::Spawn { count, .. } => Some(*count),
            _ => None,
        })
    }

    #[test]
    fn spawns_once_per_minute() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut g = Generator::new(worm(Size::One), 1);
        let mut fx = Reactions::new(Position::new(3, 2, 1));
        for _ in 0..ONE_MINUTE - 1 {
            assert!(g.tick(false, &mut rng, &mut fx));
        }
        assert!(fx.effects().is_empty());
        g.tick(false, &mut rng, &mut fx);
        let count = spawned(&fx).unwrap();
        assert!((2..=4).contains(&count));
    }

    #[test]
    fn spawn_count_depends_on_size() {
        let mut rng = StdRng::seed_from_u64(8);
        for (size, range) in [(Size::Two, 1..=2), (Size::Four, 1..=1)] {
            let mut g = Generator::new(worm(size), 1);
            let mut fx = Reactions::new(Position::new(3, 2, 1));
            for _ in 0..ONE_MINUTE {
                g.tick(false, &mut rng, &mut fx);
            }
            assert!(range.contains(&spawned(&fx).unwrap()));
        }
    }

    #[test]
    fn occupied_cell_retries_every_tick() {
        let mut rng = StdRng::seed_from_u64(9);
        let mut g = Generator::new(worm(Size::One), 0);
        let mut fx = Reactions::new(Position::new(3, 2, 1));
        for _ in 0..ONE_MINUTE {
            g.tick(true, &mut rng, &mut fx);
        }
        assert_eq!(g.state(), GeneratorState::Retrying);
        g.tick(true, &mut rng, &mut fx);
        assert!(fx.effects().is_empty());
        g.tick(false, &mut rng, &mut fx);
        assert!(spawned(&fx).is_some());
        assert_eq!(g.state(), GeneratorState::Waiting);
    }

    #[test]
    fn disabled_generator_never_spawns() {
        let mut rng = StdRng::seed_from_u64(10);
        let mut g = Generator::new(worm(Size::One), 1);
        let mut fx = Reactions::new(Position::new(3, 2, 1));
        g.trigger(TriggerAction::Disable, &mut fx);
        for _ in 0..ONE_MINUTE * 2 {
            g.tick(false, &mut rng, &mut fx);
        }
        assert_eq!(spawned(&fx), None);
        g.trigger(TriggerAction::Toggle, &mut fx);
        assert!(g.is_enabled());
    }
}
