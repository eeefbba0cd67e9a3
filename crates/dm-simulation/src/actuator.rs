use serde::{Deserialize, Serialize};

use crate::error::{SimError, SimResult};
use crate::temporizer::Temporizer;

/// What a trigger asks its target to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TriggerAction {
    /// Switch on: open a door or pit, enable a teleporter.
    Enable,
    /// Switch off.
    Disable,
    /// Flip the current state.
    Toggle,
}

/// One trigger delivered to one target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Firing<T> {
    /// The element to trigger.
    pub target: T,
    /// The action to apply.
    pub action: TriggerAction,
}

/// A delayed, composable trigger effect aimed at targets of type `T`.
///
/// An actuator is started by registering it on the clock; the owner then
/// calls [`Actuator::tick`] once per tick until it answers "done". Actuators
/// reset themselves when they complete, so the same actuator can be started
/// again later.
#[derive(Debug, Clone, PartialEq)]
pub struct Actuator<T> {
    node: Node<T>,
}

#[derive(Debug, Clone, PartialEq)]
enum Node<T> {
    Simple {
        temporizer: Temporizer,
        action: TriggerAction,
        targets: Vec<T>,
    },
    Combined {
        children: Vec<Node<T>>,
        finished: Vec<bool>,
    },
    Sequence {
        steps: Vec<Node<T>>,
        cursor: usize,
    },
    Looping {
        body: Box<Node<T>>,
        max: Option<u32>,
        completed: u32,
    },
}

impl<T: Clone> Actuator<T> {
    /// Fire `action` on every target once `delay` ticks have elapsed.
    pub fn simple(delay: u32, action: TriggerAction, targets: Vec<T>) -> SimResult<Self> {
        if targets.is_empty() {
            return Err(SimError::NoTargets);
        }
        Ok(Self {
            node: Node::Simple {
                temporizer: Temporizer::try_new("actuator", delay)?,
                action,
                targets,
            },
        })
    }

    /// Run several actuators side by side; done once all of them are.
    pub fn combined(actuators: Vec<Actuator<T>>) -> Self {
        let children: Vec<_> = actuators.into_iter().map(|a| a.node).collect();
        let finished = vec![false; children.len()];
        Self {
            node: Node::Combined { children, finished },
        }
    }

    /// Run actuators one after another, each starting when the previous completes.
    pub fn sequence(actuators: Vec<Actuator<T>>) -> Self {
        Self {
            node: Node::Sequence {
                steps: actuators.into_iter().map(|a| a.node).collect(),
                cursor: 0,
            },
        }
    }

    /// Repeat `body` `max` times, or forever when `max` is `None`.
    pub fn looping(body: Actuator<T>, max: Option<u32>) -> Self {
        Self {
            node: Node::Looping {
                body: Box::new(body.node),
                max,
                completed: 0,
            },
        }
    }

    /// Merge a second actuator into an existing one so both fire together.
    pub fn combine(existing: Option<Actuator<T>>, added: Actuator<T>) -> Self {
        match existing {
            None => added,
            Some(Actuator {
                node: Node::Combined {
                    mut children,
                    mut finished,
                },
            }) => {
                children.push(added.node);
                finished.push(false);
                Self {
                    node: Node::Combined { children, finished },
                }
            }
            Some(other) => Self::combined(vec![other, added]),
        }
    }

    /// Count one tick, pushing every trigger that fires onto `fired`.
    ///
    /// Returns `true` while the actuator wants further ticks.
    pub fn tick(&mut self, fired: &mut Vec<Firing<T>>) -> bool {
        !self.node.tick(fired)
    }

    /// Every target this actuator can reach.
    pub fn targets(&self) -> Vec<T> {
        let mut out = Vec::new();
        self.node.collect_targets(&mut out);
        out
    }
}

impl<T: Clone> Node<T> {
    /// Returns `true` when this node completed on this tick.
    fn tick(&mut self, fired: &mut Vec<Firing<T>>) -> bool {
        match self {
            Self::Simple {
                temporizer,
                action,
                targets,
            } => {
                if !temporizer.trigger() {
                    return false;
                }
                fired.extend(targets.iter().map(|t| Firing {
                    target: t.clone(),
                    action: *action,
                }));
                true
            }
            Self::Combined { children, finished } => {
                for (child, done) in children.iter_mut().zip(finished.iter_mut()) {
                    if !*done && child.tick(fired) {
                        *done = true;
                    }
                }
                if finished.iter().all(|d| *d) {
                    finished.iter_mut().for_each(|d| *d = false);
                    true
                } else {
                    false
                }
            }
            Self::Sequence { steps, cursor } => {
                if let Some(step) = steps.get_mut(*cursor) {
                    if step.tick(fired) {
                        *cursor += 1;
                    }
                }
                if *cursor >= steps.len() {
                    *cursor = 0;
                    true
                } else {
                    false
                }
            }
            Self::Looping {
                body,
                max,
                completed,
            } => {
                if !body.tick(fired) {
                    return false;
                }
                *completed += 1;
                if max.is_some_and(|m| *completed >= m) {
                    *completed = 0;
                    true
                } else {
                    false
                }
            }
        }
    }

    fn collect_targets(&self, out: &mut Vec<T>) {
        match self {
            Self::Simple { targets, .. } => out.extend(targets.iter().cloned()),
            Self::Combined { children, .. } | Self::Sequence { steps: children, .. } => {
                children.iter().for_each(|c| c.collect_targets(out));
            }
            Self::Looping { body, .. } => body.collect_targets(out),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(actuator: &mut Actuator<&'static str>, ticks: u32) -> (Vec<(u32, &'static str)>, bool) {
        let mut log = Vec::new();
        let mut keep = true;
        for t in 1..=ticks {
            let mut fired = Vec::new();
            keep = actuator.tick(&mut fired);
            log.extend(fired.into_iter().map(|f| (t, f.target)));
            if !keep {
                break;
            }
        }
        (log, keep)
    }

    #[test]
    fn simple_fires_all_targets_after_delay() {
        let mut a = Actuator::simple(3, TriggerAction::Toggle, vec!["door", "pit"]).unwrap();
        let (log, keep) = run(&mut a, 10);
        assert_eq!(log, vec![(3, "door"), (3, "pit")]);
        assert!(!keep);
    }

    #[test]
    fn simple_requires_target_and_delay() {
        assert_eq!(
            Actuator::<u8>::simple(1, TriggerAction::Enable, vec![]).unwrap_err(),
            SimError::NoTargets
        );
        assert!(Actuator::simple(0, TriggerAction::Enable, vec![1]).is_err());
    }

    #[test]
    fn actuator_is_reusable_after_completion() {
        let mut a = Actuator::simple(2, TriggerAction::Enable, vec!["door"]).unwrap();
        assert_eq!(run(&mut a, 5).0, vec![(2, "door")]);
        assert_eq!(run(&mut a, 5).0, vec![(2, "door")]);
    }

    #[test]
    fn combined_fires_children_side_by_side() {
        let mut a = Actuator::combined(vec![
            Actuator::simple(1, TriggerAction::Enable, vec!["a"]).unwrap(),
            Actuator::simple(3, TriggerAction::Enable, vec!["b"]).unwrap(),
        ]);
        let (log, keep) = run(&mut a, 10);
        assert_eq!(log, vec![(1, "a"), (3, "b")]);
        assert!(!keep);
    }

    #[test]
    fn sequence_runs_children_one_after_another() {
        let mut a = Actuator::sequence(vec![
            Actuator::simple(2, TriggerAction::Enable, vec!["a"]).unwrap(),
            Actuator::simple(2, TriggerAction::Disable, vec!["b"]).unwrap(),
        ]);
        let (log, keep) = run(&mut a, 10);
        assert_eq!(log, vec![(2, "a"), (4, "b")]);
        assert!(!keep);
    }

    #[test]
    fn looping_repeats_bounded() {
        let body = Actuator::simple(2, TriggerAction::Toggle, vec!["x"]).unwrap();
        let mut a = Actuator::looping(body, Some(3));
        let (log, keep) = run(&mut a, 20);
        assert_eq!(log, vec![(2, "x"), (4, "x"), (6, "x")]);
        assert!(!keep);
    }

    #[test]
    fn looping_unbounded_never_completes() {
        let body = Actuator::simple(1, TriggerAction::Toggle, vec!["x"]).unwrap();
        let mut a = Actuator::looping(body, None);
        let (log, keep) = run(&mut a, 50);
        assert_eq!(log.len(), 50);
        assert!(keep);
    }

    #[test]
    fn combine_merges_into_fan_out() {
        let first = Actuator::simple(1, TriggerAction::Enable, vec!["a"]).unwrap();
        let second = Actuator::simple(1, TriggerAction::Enable, vec!["b"]).unwrap();
        let third = Actuator::simple(2, TriggerAction::Enable, vec!["c"]).unwrap();

        let only = Actuator::combine(None, first.clone());
        assert_eq!(only, first);

        let merged = Actuator::combine(Some(first), second);
        let mut merged = Actuator::combine(Some(merged), third);
        assert_eq!(merged.targets(), vec!["a", "b", "c"]);
        let (log, _) = run(&mut merged, 5);
        assert_eq!(log, vec![(1, "a"), (1, "b"), (2, "c")]);
    }

    #[test]
    fn empty_composites_complete_immediately() {
        let mut a = Actuator::<u8>::sequence(vec![]);
        assert!(!a.tick(&mut Vec::new()));
        let mut b = Actuator::<u8>::combined(vec![]);
        assert!(!b.tick(&mut Vec::new()));
    }
}
