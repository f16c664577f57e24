use std::collections::BTreeSet;
use tracing::debug;

use crate::error::EngineError;
use crate::game::{AtBat, Base, Runner, BATTERS_BOX};

/// Bases with a live runner on them, carried from play to play.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Occupancy {
    bases: BTreeSet<Base>,
}

impl Occupancy {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn bases(&self) -> impl Iterator<Item = Base> + '_ {
        self.bases.iter().copied()
    }

    /// Applies movements that happen together: every runner leaves his
    /// start base, then every runner still live takes his end base.
    fn apply(&mut self, play: u32, movements: &[&Runner]) -> Result<(), EngineError> {
        self.leave_starts(play, movements)?;
        for runner in movements {
            if matches!(runner.end, None | Some(BATTERS_BOX)) {
                return Err(EngineError::Consistency {
                    play,
                    detail: format!("{} has no end base", runner),
                });
            }
            if runner.is_active() {
                let end = runner.end.unwrap_or(runner.start);
                if !self.bases.insert(end) {
                    return Err(EngineError::Consistency {
                        play,
                        detail: format!("{} ends on occupied base {}", runner, end),
                    });
                }
            }
        }
        Ok(())
    }

    fn leave_starts(&mut self, play: u32, movements: &[&Runner]) -> Result<(), EngineError> {
        for runner in movements {
            if runner.start != BATTERS_BOX && !self.bases.remove(&runner.start) {
                return Err(EngineError::Consistency {
                    play,
                    detail: format!("{} starts from empty base {}", runner, runner.start),
                });
            }
        }
        Ok(())
    }

    /// Steals, pickoffs and the like, in sequence-number order.
    pub fn apply_mid_play(&mut self, at_bat: &AtBat) -> Result<(), EngineError> {
        let event_nums: BTreeSet<u32> = at_bat.mid_pa_runners.iter().map(|r| r.event_num).collect();
        for event_num in event_nums {
            let group: Vec<&Runner> = at_bat
                .mid_pa_runners
                .iter()
                .filter(|r| r.event_num == event_num)
                .collect();
            self.apply(at_bat.event_num, &group)?;
        }
        Ok(())
    }

    pub fn apply_terminal(&mut self, at_bat: &AtBat) -> Result<(), EngineError> {
        let group: Vec<&Runner> = at_bat.runners.iter().collect();
        if at_bat.outs >= 3 {
            return self.apply_inning_ending(at_bat.event_num, &group);
        }
        self.apply(at_bat.event_num, &group)
    }

    /// The third out clears the bases, so where stranded runners and the
    /// batter were left does not matter. Starts must still be occupied.
    fn apply_inning_ending(&mut self, play: u32, movements: &[&Runner]) -> Result<(), EngineError> {
        self.leave_starts(play, movements)?;
        let unresolved = movements
            .iter()
            .find(|r| matches!(r.end, None | Some(BATTERS_BOX)));
        if let Some(runner) = unresolved {
            return Err(EngineError::Consistency {
                play,
                detail: format!("{} has no end base", runner),
            });
        }
        self.bases.clear();
        Ok(())
    }
}

/// The feed only reports movement. Every occupied base without a terminal
/// record gets a placeholder runner that starts and ends there, so each
/// play carries the full base state.
pub fn hold_runners(occupancy: &Occupancy, at_bat: &mut AtBat) -> usize {
    let starting: BTreeSet<Base> = at_bat.runners.iter().map(|r| r.start).collect();
    let held: Vec<Base> = occupancy.bases().filter(|b| !starting.contains(b)).collect();
    for &base in &held {
        at_bat.runners.push(Runner::held(base, at_bat.event_num));
    }
    if !held.is_empty() {
        debug!("Play {}: holding runners on {:?}", at_bat.event_num, held);
    }
    held.len()
}
