//! Baserunner reconstruction.
//!
//! Each half-inning is walked play by play in order, carrying the outs
//! count and base occupancy forward. Every play goes through pinch-runner
//! reconciliation, classification, mid-play resolution, terminal
//! resolution and hold synthesis. The scoring-path pass runs once the
//! half-inning is fully resolved. Any error aborts the whole game.

pub mod bases;
pub mod highlighter;
pub mod hold;
pub mod mid_play;
pub mod pinch_runners;
pub mod terminal;

pub use hold::Occupancy;
pub use terminal::PlayPosition;

use tracing::debug;

use crate::error::EngineError;
use crate::game::{Game, HalfInning, Roster};
use crate::names::{FuzzyNameMatcher, NameMatcher};
use crate::scoring;

/// What one run of the enhancer changed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EnhanceSummary {
    pub plays: usize,
    pub swaps_removed: usize,
    pub holds_added: usize,
    pub scoring_marks: usize,
}

pub struct GameEnhancer<M: NameMatcher = FuzzyNameMatcher> {
    matcher: M,
}

impl Default for GameEnhancer<FuzzyNameMatcher> {
    fn default() -> Self {
        Self::new(FuzzyNameMatcher::default())
    }
}

impl<M: NameMatcher> GameEnhancer<M> {
    pub fn new(matcher: M) -> Self {
        GameEnhancer { matcher }
    }

    /// Resolves every plate appearance of `game` in place.
    pub fn execute(&self, game: &mut Game, roster: &Roster) -> Result<EnhanceSummary, EngineError> {
        let last_play = game.last_play();
        let mut summary = EnhanceSummary::default();

        for (i, inning) in game.innings.iter_mut().enumerate() {
            debug!("{}", inning);
            for (h, half) in inning.halves.iter_mut().enumerate() {
                let last_in_half = match last_play {
                    Some((li, lh, la)) if li == i && lh == h => Some(la),
                    _ => None,
                };
                self.enhance_half(half, last_in_half, roster, &mut summary)?;
            }
        }
        Ok(summary)
    }

    /// `last_play` is the index of the game's final plate appearance when
    /// it falls in this half-inning.
    fn enhance_half(
        &self,
        half: &mut HalfInning,
        last_play: Option<usize>,
        roster: &Roster,
        summary: &mut EnhanceSummary,
    ) -> Result<(), EngineError> {
        let mut outs = 0u8;
        let mut occupancy = Occupancy::new();

        for a in 0..half.at_bats.len() {
            let (prior, rest) = half.at_bats.split_at_mut(a);
            let at_bat = &mut rest[0];

            summary.swaps_removed +=
                pinch_runners::fix_pinch_runners(at_bat, prior, roster, &self.matcher)?;
            let cleared = at_bat.clear_batters_box_ends();
            if cleared > 0 {
                debug!("Play {}: {} end base(s) of 0 treated as unset", at_bat.event_num, cleared);
            }
            at_bat.scoring = Some(scoring::classify_at_bat(at_bat)?);

            mid_play::resolve_mid_play_runners(at_bat, roster)?;
            occupancy.apply_mid_play(at_bat)?;

            if at_bat.outs < outs {
                return Err(EngineError::Reconciliation {
                    play: at_bat.event_num,
                    accounted: i32::from(at_bat.outs),
                    expected: i32::from(outs),
                });
            }
            let position = PlayPosition {
                previous_outs: outs,
                last_play_of_game: last_play == Some(a),
            };
            terminal::resolve_terminal_runners(at_bat, position, roster)?;

            summary.holds_added += hold::hold_runners(&occupancy, at_bat);
            occupancy.apply_terminal(at_bat)?;
            outs = at_bat.outs;
            summary.plays += 1;

            debug!("{}", at_bat);
            for runner in at_bat.all_runners() {
                debug!("  {}", runner);
            }
        }

        summary.scoring_marks += highlighter::highlight_scoring_paths(half);
        Ok(())
    }
}
