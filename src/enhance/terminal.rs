//! End-of-play runner resolution.
//!
//! A terminal movement with no end base means the runner was either put out
//! or left stranded. Before the third out only an out is possible, and the
//! outs counter says how many there were. On the third out the counter says
//! nothing about individual runners, so the description decides and
//! everyone it does not name is stranded.

use tracing::{debug, warn};

use super::bases::find_out_base;
use super::mid_play::mid_play_outs;
use crate::error::EngineError;
use crate::game::{AtBat, Base, ResultCategory, Roster, Runner};
use crate::scoring::is_runner_play;

/// Where the play stands in the game, as far as outs accounting cares.
#[derive(Debug, Clone, Copy)]
pub struct PlayPosition {
    /// Cumulative outs after the previous play of the half-inning
    pub previous_outs: u8,
    pub last_play_of_game: bool,
}

pub fn resolve_terminal_runners(
    at_bat: &mut AtBat,
    position: PlayPosition,
    roster: &Roster,
) -> Result<(), EngineError> {
    if at_bat.outs >= 3 {
        resolve_inning_ending(at_bat, roster)
    } else {
        resolve_mid_inning(at_bat, position, roster)
    }
}

/// The play completes the batter's plate appearance (as opposed to a steal
/// or pickoff recorded while he is still hitting).
fn is_batter_play(at_bat: &AtBat) -> bool {
    !is_runner_play(&at_bat.event) && !at_bat.is_batter_still_up()
}

/// A batter play with no movement record for the batter retired him.
fn batter_out(at_bat: &AtBat) -> bool {
    is_batter_play(at_bat) && at_bat.batter_runner().is_none()
}

/// Tries the out phrases for every runner with no end base. Returns the
/// indexes of runners the description does not mention.
fn mark_described_outs(at_bat: &mut AtBat, roster: &Roster) -> Result<Vec<usize>, EngineError> {
    let mut unmatched = Vec::new();
    for i in 0..at_bat.runners.len() {
        let runner = &at_bat.runners[i];
        if runner.end.is_some() {
            continue;
        }
        let Some(id) = runner.id.player() else {
            continue;
        };
        let last_name = roster.last_name(id)?;
        match find_out_base(last_name, &at_bat.des) {
            Some(base) => {
                debug!("Terminal: {} out at {}", last_name, base);
                let runner = &mut at_bat.runners[i];
                runner.end = Some(base);
                runner.out = true;
            }
            None => unmatched.push(i),
        }
    }
    Ok(unmatched)
}

fn resolve_mid_inning(
    at_bat: &mut AtBat,
    position: PlayPosition,
    roster: &Roster,
) -> Result<(), EngineError> {
    let unmatched = mark_described_outs(at_bat, roster)?;

    let expected = i32::from(at_bat.outs) - i32::from(position.previous_outs);
    let terminal_outs = at_bat.runners.iter().filter(|r| r.out).count();
    let accounted =
        (mid_play_outs(at_bat) + terminal_outs + usize::from(batter_out(at_bat))) as i32;

    // Game ends on a walk-off with men still on base: nobody else is out
    // and the open runners simply stay where they were.
    let left_on_base = !unmatched.is_empty()
        || at_bat
            .runners
            .iter()
            .any(|r| !r.out && r.start != 0 && r.end == Some(r.start));
    let walk_off = position.last_play_of_game && left_on_base && accounted <= expected;
    if walk_off {
        if !unmatched.is_empty() {
            warn!(
                "Play {} ends the game with {} runner(s) left on base",
                at_bat.event_num,
                unmatched.len()
            );
        }
        for i in unmatched {
            let runner = &mut at_bat.runners[i];
            runner.end = Some(runner.start);
        }
        return Ok(());
    }

    if let Some(&i) = unmatched.first() {
        let runner = &at_bat.runners[i];
        let name = match runner.id.player() {
            Some(id) => roster.last_name(id)?.to_string(),
            None => runner.id.to_string(),
        };
        return Err(EngineError::BaseNotFound {
            runner: name,
            text: at_bat.full_description(),
        });
    }

    if accounted != expected {
        return Err(EngineError::Reconciliation {
            play: at_bat.event_num,
            accounted,
            expected,
        });
    }
    Ok(())
}

/// Base the batter is credited with on a clean hit.
fn hit_base(event: &str) -> Option<Base> {
    match event {
        "single" => Some(1),
        "double" => Some(2),
        "triple" => Some(3),
        _ => None,
    }
}

fn resolve_inning_ending(at_bat: &mut AtBat, roster: &Roster) -> Result<(), EngineError> {
    for i in mark_described_outs(at_bat, roster)? {
        let runner = &mut at_bat.runners[i];
        runner.end = Some(runner.start);
        debug!("Terminal: runner {} stranded at {}", runner.id, runner.start);
    }

    if !is_batter_play(at_bat) || at_bat.batter_runner().is_some() {
        return Ok(());
    }

    // The feed drops the batter's record when he is retired trying for an
    // extra base, and sometimes when he is simply stranded.
    let hit = hit_base(&at_bat.event);
    let reached = matches!(
        at_bat.scoring.as_ref().map(|s| s.result),
        Some(ResultCategory::OnBase | ResultCategory::Error | ResultCategory::FieldersChoice)
    );
    if hit.is_none() && !reached {
        return Ok(());
    }

    let last_name = roster.last_name(at_bat.batter)?;
    let runner = Runner::new(at_bat.batter, 0, None, at_bat.event_num);
    let runner = match (find_out_base(last_name, &at_bat.des), hit) {
        (Some(out_base), Some(_)) => runner.out_at(out_base),
        (Some(_), None) => return Ok(()),
        (None, Some(base)) => Runner {
            end: Some(base),
            ..runner
        },
        (None, None) => Runner {
            end: Some(1),
            ..runner
        },
    };
    debug!("Terminal: added batter movement {}", runner);
    at_bat.runners.push(runner);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{Player, Scoring};

    fn roster() -> Roster {
        Roster::new(vec![
            Player::new(1, "Ozzie", "Albies"),
            Player::new(2, "Freddie", "Freeman"),
            Player::new(3, "Nick", "Markakis"),
            Player::new(4, "Dansby", "Swanson"),
        ])
    }

    fn mid_inning(previous_outs: u8) -> PlayPosition {
        PlayPosition {
            previous_outs,
            last_play_of_game: false,
        }
    }

    fn classified(mut ab: AtBat, code: &str, result: ResultCategory) -> AtBat {
        ab.scoring = Some(Scoring::new(code, result));
        ab
    }

    #[test]
    fn test_runner_out_resolved_from_description() {
        // Albies on 1st, Markakis singles, Albies thrown out at 3rd
        let mut ab = AtBat::new(
            10,
            50,
            3,
            "Nick Markakis singles on a line drive to right fielder Nick Williams. Ozzie Albies out at 3rd, right fielder Nick Williams to third baseman Maikel Franco.",
            "single",
            99,
            2,
        );
        ab.add_runner(Runner::new(1, 1, None, 50)).unwrap();
        ab.add_runner(Runner::new(3, 0, Some(1), 50)).unwrap();
        resolve_terminal_runners(&mut ab, mid_inning(1), &roster()).unwrap();
        assert_eq!(ab.runners[0].end, Some(3));
        assert!(ab.runners[0].out);
    }

    #[test]
    fn test_outs_mismatch_is_reconciliation_error() {
        // One named out against an outs delta of two, batter record present
        let mut ab = AtBat::new(
            10,
            50,
            3,
            "Nick Markakis singles on a line drive to right fielder Nick Williams. Ozzie Albies out at 3rd.",
            "single",
            99,
            2,
        );
        ab.add_runner(Runner::new(1, 1, None, 50)).unwrap();
        ab.add_runner(Runner::new(3, 0, Some(1), 50)).unwrap();
        let err = resolve_terminal_runners(&mut ab, mid_inning(0), &roster()).unwrap_err();
        assert_eq!(
            err,
            EngineError::Reconciliation {
                play: 50,
                accounted: 1,
                expected: 2
            }
        );
    }

    #[test]
    fn test_unmentioned_runner_mid_inning_is_base_not_found() {
        let mut ab = AtBat::new(10, 50, 3, "Nick Markakis walks.", "walk", 99, 1);
        ab.add_runner(Runner::new(1, 1, None, 50)).unwrap();
        ab.add_runner(Runner::new(3, 0, Some(1), 50)).unwrap();
        let err = resolve_terminal_runners(&mut ab, mid_inning(1), &roster()).unwrap_err();
        assert!(matches!(err, EngineError::BaseNotFound { .. }));
    }

    #[test]
    fn test_walk_off_leaves_runner_on_base() {
        let mut ab = AtBat::new(
            70,
            600,
            3,
            "Nick Markakis singles on a ground ball to left fielder Rhys Hoskins. Freddie Freeman scores.",
            "single",
            99,
            1,
        );
        ab.add_runner(Runner::new(2, 2, Some(4), 600)).unwrap();
        ab.add_runner(Runner::new(1, 1, None, 600)).unwrap();
        ab.add_runner(Runner::new(3, 0, Some(1), 600)).unwrap();
        let position = PlayPosition {
            previous_outs: 1,
            last_play_of_game: true,
        };
        resolve_terminal_runners(&mut ab, position, &roster()).unwrap();
        assert_eq!(ab.runners[1].end, Some(1));
        assert!(!ab.runners[1].out);

        let resolved = ab.clone();
        resolve_terminal_runners(&mut ab, position, &roster()).unwrap();
        assert_eq!(ab, resolved);
    }

    #[test]
    fn test_batter_out_counts_toward_outs() {
        let mut ab = AtBat::new(
            11,
            60,
            4,
            "Dansby Swanson grounds out, shortstop J. P. Crawford to first baseman Carlos Santana. Ozzie Albies to 3rd.",
            "field_out",
            99,
            1,
        );
        ab.add_runner(Runner::new(1, 2, Some(3), 60)).unwrap();
        resolve_terminal_runners(&mut ab, mid_inning(0), &roster()).unwrap();
        assert_eq!(ab.runners.len(), 1);
    }

    #[test]
    fn test_runner_event_does_not_retire_batter() {
        let mut ab = AtBat::new(
            12,
            61,
            4,
            "Ozzie Albies caught stealing 2nd base, catcher Jorge Alfaro to shortstop J. P. Crawford.",
            "caught_stealing_2b",
            99,
            2,
        );
        ab.add_runner(Runner::new(1, 1, None, 61)).unwrap();
        resolve_terminal_runners(&mut ab, mid_inning(1), &roster()).unwrap();
        assert_eq!(ab.runners[0].end, Some(2));
        assert!(ab.runners[0].out);
    }

    #[test]
    fn test_third_out_strands_runners() {
        let mut ab = classified(
            AtBat::new(
                13,
                70,
                3,
                "Nick Markakis flies out to center fielder Odubel Herrera.",
                "field_out",
                99,
                3,
            ),
            "F8",
            ResultCategory::Out,
        );
        ab.add_runner(Runner::new(1, 2, None, 70)).unwrap();
        ab.add_runner(Runner::new(2, 1, None, 70)).unwrap();
        resolve_terminal_runners(&mut ab, mid_inning(2), &roster()).unwrap();
        assert_eq!(ab.runners[0].end, Some(2));
        assert_eq!(ab.runners[1].end, Some(1));
        assert!(ab.runners.iter().all(|r| !r.out));
        assert_eq!(ab.runners.len(), 2);
    }

    #[test]
    fn test_batter_thrown_out_stretching_gets_a_record() {
        let mut ab = classified(
            AtBat::new(
                14,
                80,
                3,
                "Nick Markakis singles on a line drive to left fielder Rhys Hoskins. Nick Markakis out at 2nd, left fielder Rhys Hoskins to second baseman Cesar Hernandez.",
                "single",
                99,
                3,
            ),
            "L7",
            ResultCategory::OnBase,
        );
        resolve_terminal_runners(&mut ab, mid_inning(2), &roster()).unwrap();
        let batter = ab.batter_runner().unwrap();
        assert_eq!((batter.start, batter.end, batter.out), (0, Some(2), true));
    }

    #[test]
    fn test_stranded_hitter_gets_canonical_base() {
        // Freeman doubles, Albies thrown out at home for the third out
        let mut ab = classified(
            AtBat::new(
                15,
                90,
                2,
                "Freddie Freeman doubles (5) on a fly ball to left fielder Rhys Hoskins. Ozzie Albies out at home, left fielder Rhys Hoskins to catcher Jorge Alfaro.",
                "double",
                99,
                3,
            ),
            "F7",
            ResultCategory::OnBase,
        );
        ab.add_runner(Runner::new(1, 1, None, 90)).unwrap();
        resolve_terminal_runners(&mut ab, mid_inning(2), &roster()).unwrap();
        assert_eq!(ab.runners[0].end, Some(4));
        assert!(ab.runners[0].out);
        let batter = ab.batter_runner().unwrap();
        assert_eq!((batter.end, batter.out), (Some(2), false));
    }

    #[test]
    fn test_fielders_choice_batter_goes_to_first() {
        let mut ab = classified(
            AtBat::new(
                16,
                95,
                4,
                "Dansby Swanson grounds into a force out, shortstop J. P. Crawford to second baseman Cesar Hernandez. Ozzie Albies out at 2nd.",
                "force_out",
                99,
                3,
            ),
            "G6",
            ResultCategory::FieldersChoice,
        );
        ab.add_runner(Runner::new(1, 1, None, 95)).unwrap();
        resolve_terminal_runners(&mut ab, mid_inning(2), &roster()).unwrap();
        let batter = ab.batter_runner().unwrap();
        assert_eq!((batter.start, batter.end), (0, Some(1)));
    }
}
