use std::collections::VecDeque;

use dm_core::{Creature, CreatureId, CreatureType, Direction, Position, SubCell};
use dm_simulation::SimEventKind;
use tracing::{debug, info, trace, warn};

use super::movement::Access;
use super::{Dungeon, Listener, bump, cell};
use crate::effect::{Effect, Mover, Reactions};
use crate::error::{MapError, MapResult};

impl Dungeon {
    /// Carry out effects in the order they were raised, together with
    /// everything they cause in turn.
    pub(crate) fn resolve(&mut self, raised: Vec<Reactions>) -> MapResult<()> {
        let mut queue = VecDeque::new();
        enqueue(&mut queue, 0, raised);
        while let Some((depth, at, effect)) = queue.pop_front() {
            if depth > self.config.max_cascade_depth {
                warn!(%at, depth, "cascade too deep");
                return Err(MapError::CascadeOverflow(depth));
            }
            trace!(%at, depth, ?effect, "resolving");
            let mut follow = Vec::new();
            self.apply(at, effect, &mut follow)?;
            enqueue(&mut queue, depth + 1, follow);
        }
        Ok(())
    }

    fn apply(&mut self, at: Position, effect: Effect, out: &mut Vec<Reactions>) -> MapResult<()> {
        match effect {
            Effect::Listen => self.clock.register(Listener::Element(at)),
            Effect::Fire(slot) => {
                debug!(%at, ?slot, "actuator started");
                self.clock.register(Listener::Actuator(at, slot));
            }
            Effect::Sound(sound) => self.emit(
                SimEventKind::SoundPlayed { sound, at },
                format!("{sound:?} at {at}"),
            ),
            Effect::Changed => {
                let element = self.element(at)?.name();
                self.emit(
                    SimEventKind::ElementChanged { at, element },
                    format!("{element} changed at {at}"),
                );
            }
            Effect::Fall(mover) => self.fall(at, mover, out)?,
            Effect::Teleport(mover) => self.teleport(at, mover, out)?,
            Effect::TakeStairs => self.take_stairs(at, out)?,
            Effect::Spawn {
                creature_type,
                count,
                multiplier,
            } => self.spawn(at, creature_type, count, multiplier, out)?,
            Effect::HurtParty { min, max } => self.hurt_party(None, min, max, at),
            Effect::HazardExpired => self.emit(
                SimEventKind::HazardExpired { at },
                format!("hazard expired at {at}"),
            ),
            Effect::Launch(direction) => self.launch(at, direction, out)?,
        }
        Ok(())
    }

    /// Shoot two projectiles from a launcher onto the cell it faces, on the
    /// two sub-cells nearest the launcher. Sub-cells that cannot take one are
    /// skipped.
    fn launch(
        &mut self,
        at: Position,
        direction: Direction,
        out: &mut Vec<Reactions>,
    ) -> MapResult<()> {
        let start = at.towards(direction);
        let mut fx = Reactions::new(start);
        for subcell in SubCell::visible_from(direction.opposite()) {
            let free = self
                .element(start)
                .is_ok_and(|e| e.lets_projectiles_in() && e.projectile(subcell).is_none());
            if !free {
                debug!(%start, ?subcell, "launch blocked, projectile skipped");
                continue;
            }
            let projectile = self.new_projectile(direction);
            self.element_mut(start)?
                .projectile_arrived(subcell, projectile, &mut fx)?;
            self.emit(
                SimEventKind::ProjectileLaunched {
                    projectile: projectile.id,
                    at: start,
                },
                format!("projectile launched {direction:?} onto {start}"),
            );
        }
        out.push(fx);
        Ok(())
    }

    fn party_is_at(&self, at: Position) -> bool {
        self.party.as_ref().is_some_and(|p| p.position() == at)
    }

    /// Drop something one level down. Nothing happens when there is no cell
    /// below or it cannot take the faller.
    fn fall(&mut self, at: Position, mover: Mover, out: &mut Vec<Reactions>) -> MapResult<()> {
        let below = at.below();
        if self.element(below).is_err() {
            debug!(%at, "nothing below, fall skipped");
            return Ok(());
        }
        match mover {
            Mover::Party => {
                if !self.party_is_at(at) {
                    return Ok(());
                }
                let look = self.party.as_ref().map(|p| p.look_direction());
                let Some(look) = look else {
                    return Ok(());
                };
                if self.party_access(below)? != Access::Open {
                    debug!(%below, "landing blocked, fall skipped");
                    return Ok(());
                }
                self.step_party(at, below, look, out)?;
                info!(from = %at, to = %below, "party fell");
                self.emit(
                    SimEventKind::PartyFell {
                        from: at,
                        to: below,
                    },
                    format!("party fell from {at} to {below}"),
                );
                self.fall_damage(below);
            }
            Mover::Creature(id) => self.move_creature(at, id, below, out)?,
            Mover::Items(subcell) => {
                let mut fx = Reactions::new(at);
                let items = self.element_mut(at)?.take_items(subcell);
                if items.is_empty() {
                    return Ok(());
                }
                fx.changed();
                out.push(fx);
                let mut landed = Reactions::new(below);
                for item in items {
                    self.element_mut(below)?
                        .item_dropped(subcell, item, &mut landed);
                    self.emit(
                        SimEventKind::ItemMoved {
                            item: item.id,
                            from: at,
                            to: below,
                        },
                        format!("{} fell from {at} to {below}", item.item_type.name),
                    );
                }
                out.push(landed);
            }
            Mover::Projectile(_) => {}
        }
        Ok(())
    }

    /// Send something standing on a teleporter to its destination.
    fn teleport(&mut self, at: Position, mover: Mover, out: &mut Vec<Reactions>) -> MapResult<()> {
        let Some(teleporter) = self.element(at)?.as_teleporter() else {
            return Ok(());
        };
        let destination = teleporter.destination().unwrap_or(at);
        let transform = teleporter.transform();
        let silent = teleporter.is_silent();
        match mover {
            Mover::Party => {
                let Some(look) = self
                    .party
                    .as_ref()
                    .filter(|p| p.position() == at)
                    .map(|p| p.look_direction())
                else {
                    return Ok(());
                };
                let turned = transform.apply(look, &mut self.rng);
                if destination == at {
                    if let Some(party) = self.party.as_mut() {
                        party.set_look_direction(turned);
                    }
                    self.emit(
                        SimEventKind::PartyTurned {
                            at,
                            direction: turned,
                        },
                        format!("party spun to {turned:?} at {at}"),
                    );
                } else {
                    self.relocate_party(destination, turned, silent, out)?;
                }
            }
            Mover::Creature(id) if destination != at => {
                self.move_creature(at, id, destination, out)?;
            }
            Mover::Creature(_) => {}
            Mover::Projectile(subcell) => {
                let Some(projectile) = self.element(at)?.projectile(subcell).copied() else {
                    return Ok(());
                };
                let turned = transform.apply(projectile.direction, &mut self.rng);
                if destination == at {
                    self.element_mut(at)?.turn_projectile(subcell, turned);
                    return Ok(());
                }
                let target = self.element(destination)?;
                if !target.is_traversable_by_projectile() || target.projectile(subcell).is_some() {
                    debug!(%destination, "projectile destination unavailable");
                    return Ok(());
                }
                let mut moved = self.element_mut(at)?.projectile_left(subcell, at)?;
                moved.direction = turned;
                let mut fx = Reactions::new(destination);
                self.element_mut(destination)?
                    .projectile_arrived(subcell, moved, &mut fx)?;
                out.push(fx);
                self.emit(
                    SimEventKind::ProjectileMoved {
                        projectile: moved.id,
                        from: at,
                        to: destination,
                    },
                    format!("projectile teleported from {at} to {destination}"),
                );
            }
            Mover::Items(_) => {}
        }
        Ok(())
    }

    fn take_stairs(&mut self, at: Position, out: &mut Vec<Reactions>) -> MapResult<()> {
        let Some(stairs) = self.element(at)?.as_stairs() else {
            return Ok(());
        };
        let (direction, destination) = (stairs.direction(), stairs.destination());
        let facing = self
            .party
            .as_ref()
            .filter(|p| p.position() == at)
            .is_some_and(|p| p.look_direction() == direction);
        if !facing {
            return Ok(());
        }
        let exit = self.stairs_exit(destination, direction);
        self.relocate_party(exit.position, exit.direction, true, out)?;
        Ok(())
    }

    /// Move a creature, keeping its placement when the target has room for
    /// it there. A creature that fits nowhere stays put.
    fn move_creature(
        &mut self,
        from: Position,
        id: CreatureId,
        to: Position,
        out: &mut Vec<Reactions>,
    ) -> MapResult<()> {
        let source = self.element(from)?;
        let (Some(creature), Some(kept)) = (
            source.creatures().get(id).cloned(),
            source.creatures().placement_of(id),
        ) else {
            return Ok(());
        };
        let target = cell(&self.levels, to)?;
        if !target.is_traversable_by_creature(&creature) {
            return Ok(());
        }
        let placement = if target.creatures().fits(&creature, kept) {
            kept
        } else {
            match target.choose_placement(&creature, &mut self.rng, to) {
                Ok(placement) => placement,
                Err(_) => {
                    debug!(%from, %to, creature = id.0, "no room, creature stays");
                    return Ok(());
                }
            }
        };
        let mut off = Reactions::new(from);
        let (creature, _) = self.element_mut(from)?.creature_stepped_off(id, &mut off)?;
        out.push(off);
        let mut on = Reactions::new(to);
        self.element_mut(to)?
            .creature_stepped_on(creature, placement, &mut on)?;
        out.push(on);
        self.emit(
            SimEventKind::CreatureMoved {
                creature: id,
                from,
                to,
            },
            format!("creature {} moved from {from} to {to}", id.0),
        );
        Ok(())
    }

    fn spawn(
        &mut self,
        at: Position,
        creature_type: CreatureType,
        count: u32,
        multiplier: u32,
        out: &mut Vec<Reactions>,
    ) -> MapResult<()> {
        let multiplier = if multiplier == 0 {
            self.level(at.z)?.experience_multiplier()
        } else {
            multiplier
        };
        let mut fx = Reactions::new(at);
        for _ in 0..count {
            let creature = Creature::new(
                CreatureId(bump(&mut self.ids.creature)),
                creature_type,
                multiplier,
            );
            let host = cell(&self.levels, at)?;
            let placement = match host.choose_placement(&creature, &mut self.rng, at) {
                Ok(placement) => placement,
                Err(_) => break,
            };
            let id = creature.id();
            self.element_mut(at)?
                .creature_stepped_on(creature, placement, &mut fx)?;
            info!(%at, creature = id.0, kind = creature_type.name, "creature spawned");
            self.emit(
                SimEventKind::CreatureSpawned { creature: id, at },
                format!("{} spawned at {at}", creature_type.name),
            );
        }
        out.push(fx);
        Ok(())
    }
}

fn enqueue(
    queue: &mut VecDeque<(usize, Position, Effect)>,
    depth: usize,
    raised: Vec<Reactions>,
) {
    for reactions in raised {
        let at = reactions.at();
        queue.extend(reactions.into_effects().into_iter().map(|e| (depth, at, e)));
    }
}
