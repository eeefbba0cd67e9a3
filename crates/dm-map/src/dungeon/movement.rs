use dm_core::{Champion, Direction, Move, Position, Side, Teleport};
use dm_simulation::{DeferredCommand, SimEventKind, Sound};
use rand::Rng;
use tracing::{debug, info};

use super::{Dungeon, Listener};
use crate::effect::Reactions;
use crate::error::{MapError, MapResult};

/// Whether the party may enter a cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum Access {
    Open,
    Blocked,
    Occupied,
}

impl Dungeon {
    /// Move the party.
    ///
    /// An immediate move resolves now and reports whether the party moved.
    /// Otherwise the move joins the queue and runs after the party's speed
    /// in ticks, once every earlier queued move has run; queuing reports
    /// `true`.
    pub fn move_party(&mut self, step: Move, immediate: bool) -> MapResult<bool> {
        let delay = self.party.as_ref().ok_or(MapError::NoParty)?.speed().ticks();
        if immediate {
            return self.resolve_move(step);
        }
        self.moves
            .push_back(DeferredCommand::new("party move", delay, step)?);
        self.clock.register(Listener::PartyMoves);
        debug!(?step, queued = self.moves.len(), "move queued");
        Ok(true)
    }

    /// Relocate the party, bypassing stairs redirection. Reports whether it
    /// moved: a blocked or occupied destination leaves it in place.
    pub fn teleport_party(
        &mut self,
        to: Position,
        direction: Direction,
        silent: bool,
    ) -> MapResult<bool> {
        let from = self.party.as_ref().ok_or(MapError::NoParty)?.position();
        if from == to {
            return Err(MapError::PartyAlreadyHere(to));
        }
        let mut out = Vec::new();
        let moved = self.relocate_party(to, direction, silent, &mut out)?;
        self.resolve(out)?;
        Ok(moved)
    }

    pub(super) fn resolve_move(&mut self, step: Move) -> MapResult<bool> {
        let party = self.party.as_ref().ok_or(MapError::NoParty)?;
        let from = party.position();
        let look = party.look_direction();

        let Some(direction) = step.step_direction(look) else {
            let turned = step.look_after(look);
            if let Some(party) = self.party.as_mut() {
                party.set_look_direction(turned);
            }
            self.emit(
                SimEventKind::PartyTurned {
                    at: from,
                    direction: turned,
                },
                format!("party turned {turned:?} at {from}"),
            );
            let mut fx = Reactions::new(from);
            self.element_mut(from)?.party_turned(&mut fx)?;
            self.resolve(vec![fx])?;
            return Ok(true);
        };

        let exit = self.exit_of(from, direction, look)?;
        match self.party_access(exit.position)? {
            Access::Blocked => {
                self.bump(from, step);
                Ok(false)
            }
            Access::Occupied => {
                debug!(to = %exit.position, "destination occupied");
                Ok(false)
            }
            Access::Open => {
                let mut out = Vec::new();
                self.step_party(from, exit.position, exit.direction, &mut out)?;
                let kind = if exit.position.z == from.z {
                    SimEventKind::PartyMoved {
                        from,
                        to: exit.position,
                    }
                } else {
                    SimEventKind::PartyTeleported {
                        from,
                        to: exit.position,
                    }
                };
                self.emit(kind, format!("party moved from {from} to {}", exit.position));
                self.emit(
                    SimEventKind::SoundPlayed {
                        sound: Sound::Step,
                        at: exit.position,
                    },
                    "step",
                );
                self.resolve(out)?;
                Ok(true)
            }
        }
    }

    /// Where a step out of `from` lands. Stepping from stairs towards their
    /// wall leads to the paired stairs, facing away from them.
    pub(super) fn exit_of(
        &self,
        from: Position,
        direction: Direction,
        look: Direction,
    ) -> MapResult<Teleport> {
        if let Some(stairs) = self.element(from)?.as_stairs() {
            if stairs.direction() == direction {
                return Ok(self.stairs_exit(stairs.destination(), look));
            }
        }
        Ok(Teleport::new(from.towards(direction), look))
    }

    pub(super) fn stairs_exit(&self, destination: Position, look: Direction) -> Teleport {
        let facing = self
            .element(destination)
            .ok()
            .and_then(|e| e.as_stairs())
            .map_or(look, |s| s.direction().opposite());
        Teleport::new(destination, facing)
    }

    pub(super) fn party_access(&self, to: Position) -> MapResult<Access> {
        let element = self.element(to)?;
        Ok(if !element.is_traversable_by_party() {
            Access::Blocked
        } else if element.is_occupied() {
            Access::Occupied
        } else {
            Access::Open
        })
    }

    /// Detach the party from `from` and attach it to `to`.
    pub(super) fn step_party(
        &mut self,
        from: Position,
        to: Position,
        look: Direction,
        out: &mut Vec<Reactions>,
    ) -> MapResult<()> {
        let mut off = Reactions::new(from);
        self.element_mut(from)?.party_stepped_off(&mut off)?;
        out.push(off);
        let party = self.party.as_mut().ok_or(MapError::NoParty)?;
        party.set_position(to);
        party.set_look_direction(look);
        let mut on = Reactions::new(to);
        self.element_mut(to)?.party_stepped_on(&mut on)?;
        out.push(on);
        Ok(())
    }

    /// Teleport the party if the destination lets it in.
    pub(super) fn relocate_party(
        &mut self,
        to: Position,
        look: Direction,
        silent: bool,
        out: &mut Vec<Reactions>,
    ) -> MapResult<bool> {
        let from = self.party.as_ref().ok_or(MapError::NoParty)?.position();
        if self.party_access(to)? != Access::Open {
            debug!(%to, "teleport destination unavailable");
            return Ok(false);
        }
        self.step_party(from, to, look, out)?;
        info!(%from, %to, "party teleported");
        self.emit(
            SimEventKind::PartyTeleported { from, to },
            format!("party teleported from {from} to {to}"),
        );
        if !silent {
            self.emit(
                SimEventKind::SoundPlayed {
                    sound: Sound::Teleport,
                    at: to,
                },
                "teleport",
            );
        }
        Ok(true)
    }

    /// The party walked into something: bong, and the leading side gets hurt.
    fn bump(&mut self, at: Position, step: Move) {
        let Some(side) = step.leading_side() else {
            return;
        };
        self.emit(
            SimEventKind::SoundPlayed {
                sound: Sound::Bong,
                at,
            },
            "bong",
        );
        self.emit(
            SimEventKind::PartyBumped { at, side },
            format!("party bumped its {side:?} side at {at}"),
        );
        let (min, max) = if side == Side::Front { (10, 30) } else { (5, 15) };
        self.hurt_party(Some(side), min, max, at);
    }

    /// Hit every living champion, or those on one side, for a random amount.
    pub(super) fn hurt_party(&mut self, side: Option<Side>, min: u32, max: u32, at: Position) {
        let tick = self.clock.tick();
        let Some(party) = self.party.as_mut() else {
            return;
        };
        let champions: Vec<&mut Champion> = match side {
            Some(side) => party.living_champions_on(side).collect(),
            None => party.living_champions_mut().collect(),
        };
        for champion in champions {
            let amount = champion.hit(self.rng.random_range(min..=max));
            self.events.push(dm_simulation::SimEvent::new(
                tick,
                SimEventKind::ChampionHurt {
                    champion: champion.name().to_string(),
                    amount,
                    at,
                },
                format!("{} lost {amount} health", champion.name()),
            ));
        }
    }

    /// Fall damage for everyone, and a chance of wounded feet for survivors.
    pub(super) fn fall_damage(&mut self, at: Position) {
        let tick = self.clock.tick();
        let Some(party) = self.party.as_mut() else {
            return;
        };
        for champion in party.living_champions_mut() {
            let protected = champion.has_foot_protection();
            let roll = if protected {
                self.rng.random_range(7..=21)
            } else {
                self.rng.random_range(10..=30)
            };
            let amount = champion.hit(roll);
            if champion.is_alive() && self.rng.random_bool(if protected { 0.25 } else { 0.5 }) {
                champion.wound_feet();
            }
            self.events.push(dm_simulation::SimEvent::new(
                tick,
                SimEventKind::ChampionHurt {
                    champion: champion.name().to_string(),
                    amount,
                    at,
                },
                format!("{} lost {amount} health in the fall", champion.name()),
            ));
        }
    }
}
