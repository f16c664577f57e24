//! When a pinch runner comes in, the feed sometimes records the swap as a
//! pair of movements as well as an action: the replaced runner leaving his
//! base for nowhere and the pinch runner arriving there from the batter's
//! box. Those records describe no baseball and would read as an out and a
//! phantom hitter, so they are removed.

use once_cell::sync::Lazy;
use regex_lite::Regex;
use tracing::debug;

use crate::error::EngineError;
use crate::game::{Action, AtBat, Base, Roster, Runner, BATTERS_BOX};
use crate::names::NameMatcher;

static PINCH_RUNNER_SWAP: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"Pinch-runner (.+?) replaces (.+?)\.?$").expect("swap pattern must compile")
});

pub fn is_pinch_runner(action: &Action) -> bool {
    matches!(action.event.as_str(), "Offensive Sub" | "offensive_substitution")
        && action.des.contains("Offensive Substitution: Pinch-runner")
}

/// (pinch runner, replaced runner) as written in the action text.
pub fn swap_names(action: &Action) -> Option<(String, String)> {
    let caps = PINCH_RUNNER_SWAP.captures(action.des.trim())?;
    Some((
        caps.get(1)?.as_str().trim().to_string(),
        caps.get(2)?.as_str().trim().to_string(),
    ))
}

/// Base the replaced runner occupied when he came out. A move earlier in
/// this plate appearance wins; otherwise his latest movement in the
/// half-inning so far.
pub fn swap_base(at_bat: &AtBat, prior: &[AtBat], replaced_id: u32) -> Result<Base, EngineError> {
    let mid_play = at_bat
        .mid_pa_runners
        .iter()
        .filter(|r| r.is_player(replaced_id))
        .filter_map(|r| r.end)
        .max();
    if let Some(base) = mid_play {
        return Ok(base);
    }

    for earlier in prior.iter().rev() {
        let latest = earlier
            .all_runners()
            .filter(|r| r.is_player(replaced_id))
            .max_by_key(|r| (r.event_num, r.end));
        if let Some(runner) = latest {
            return runner.end.ok_or_else(|| EngineError::BaseNotFound {
                runner: replaced_id.to_string(),
                text: format!("unresolved movement {} before pinch runner", runner),
            });
        }
    }
    Err(EngineError::BaseNotFound {
        runner: replaced_id.to_string(),
        text: format!("no movement before pinch runner at play {}", at_bat.event_num),
    })
}

/// Deletes the swap pair from `runners` if both halves are present.
pub fn remove_swap(runners: &mut Vec<Runner>, pinch_id: u32, replaced_id: u32, base: Base) -> bool {
    let pinch = runners
        .iter()
        .position(|r| r.is_player(pinch_id) && r.start == BATTERS_BOX && r.end == Some(base));
    let replaced = runners.iter().position(|r| {
        r.is_player(replaced_id)
            && r.start == base
            && matches!(r.end, None | Some(BATTERS_BOX))
    });
    match (pinch, replaced) {
        (Some(p), Some(o)) => {
            runners.remove(p.max(o));
            runners.remove(p.min(o));
            true
        }
        _ => false,
    }
}

/// Removes swap records for every pinch-runner action attached to `at_bat`.
/// `prior` is the half-inning's earlier, already resolved plate appearances.
/// Returns how many swaps were removed.
pub fn fix_pinch_runners(
    at_bat: &mut AtBat,
    prior: &[AtBat],
    roster: &Roster,
    matcher: &dyn NameMatcher,
) -> Result<usize, EngineError> {
    let swaps: Vec<(String, String)> = at_bat
        .actions
        .iter()
        .filter(|a| is_pinch_runner(a))
        .map(|a| {
            swap_names(a).ok_or_else(|| EngineError::PlayerLookup {
                query: a.des.clone(),
            })
        })
        .collect::<Result<_, _>>()?;

    let mut removed = 0;
    for (pinch_name, replaced_name) in swaps {
        let pinch_id = matcher.resolve(roster, &pinch_name)?;
        let replaced_id = matcher.resolve(roster, &replaced_name)?;
        let base = swap_base(at_bat, prior, replaced_id)?;
        debug!(
            "{} replaces {} at base {}",
            pinch_name, replaced_name, base
        );

        let mut found = remove_swap(&mut at_bat.runners, pinch_id, replaced_id, base);
        found |= remove_swap(&mut at_bat.mid_pa_runners, pinch_id, replaced_id, base);
        if found {
            debug!("Removed pinch-runner swap records on play {}", at_bat.event_num);
            removed += 1;
        } else {
            debug!("No pinch-runner swap records on play {}", at_bat.event_num);
        }
    }
    Ok(removed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{HalfInning, Player};
    use crate::names::FuzzyNameMatcher;

    const BOURJOS: u32 = 488721;
    const SUZUKI: u32 = 435559;
    const FREEMAN: u32 = 518692;
    const TUCKER: u32 = 605512;

    // gid_2018_03_29_phimlb_atlmlb_1, bottom 8
    fn half_inning() -> HalfInning {
        let mut half = HalfInning::new();
        half.add_action(Action::new(
            583,
            "Passed Ball",
            "With Preston Tucker batting, passed ball by Andrew Knapp, Freddie Freeman scores. Kurt Suzuki to 3rd. Throwing error by catcher Andrew Knapp.",
            Some(FREEMAN),
        ));
        half.add_action(Action::new(
            585,
            "Offensive Sub",
            "Offensive Substitution: Pinch-runner Peter Bourjos replaces Kurt Suzuki.",
            Some(BOURJOS),
        ));

        let mut ab = AtBat::new(
            68,
            593,
            TUCKER,
            "Preston Tucker singles on a line drive to center fielder Odubel Herrera. Peter Bourjos scores.",
            "Single",
            591693,
            1,
        );
        ab.add_runner(Runner::new(SUZUKI, 1, Some(3), 583)).unwrap();
        ab.add_runner(Runner::new(FREEMAN, 2, Some(4), 583)).unwrap();
        ab.add_runner(Runner::new(SUZUKI, 3, None, 593)).unwrap();
        ab.add_runner(Runner::new(BOURJOS, 0, Some(3), 593)).unwrap();
        ab.add_runner(Runner::new(BOURJOS, 3, Some(4), 593)).unwrap();
        ab.add_runner(Runner::new(TUCKER, 0, Some(1), 593)).unwrap();
        half.add_at_bat(ab);
        half
    }

    fn roster() -> Roster {
        Roster::new(vec![
            Player::new(BOURJOS, "Peter", "Bourjos"),
            Player::new(SUZUKI, "Kurt", "Suzuki"),
        ])
    }

    #[test]
    fn test_pinch_runner_swap_removed() {
        let mut half = half_inning();
        let ab = &mut half.at_bats[0];
        assert_eq!(ab.mid_pa_runners.len(), 2);
        assert_eq!(ab.runners.len(), 4);

        let removed =
            fix_pinch_runners(ab, &[], &roster(), &FuzzyNameMatcher::default()).unwrap();
        assert_eq!(removed, 1);
        assert_eq!(ab.mid_pa_runners.len(), 2);
        assert_eq!(ab.runners.len(), 2);
        assert_eq!(ab.runners[0], Runner::new(BOURJOS, 3, Some(4), 593));
        assert_eq!(ab.runners[1], Runner::new(TUCKER, 0, Some(1), 593));
    }

    #[test]
    fn test_get_swap_names() {
        let half = half_inning();
        let action = &half.at_bats[0].actions[1];
        assert!(is_pinch_runner(action));
        assert!(!is_pinch_runner(&half.at_bats[0].actions[0]));
        assert_eq!(
            swap_names(action),
            Some(("Peter Bourjos".to_string(), "Kurt Suzuki".to_string()))
        );
    }

    #[test]
    fn test_swap_base_found_mid_play() {
        let half = half_inning();
        assert_eq!(swap_base(&half.at_bats[0], &[], SUZUKI).unwrap(), 3);
    }

    #[test]
    fn test_swap_base_from_earlier_play() {
        let mut earlier = AtBat::new(67, 580, SUZUKI, "Kurt Suzuki doubles.", "double", 1, 1);
        earlier.add_runner(Runner::new(SUZUKI, 0, Some(2), 580)).unwrap();
        let current = AtBat::new(68, 590, TUCKER, "Preston Tucker walks.", "walk", 1, 1);
        assert_eq!(swap_base(&current, &[earlier], SUZUKI).unwrap(), 2);
    }

    #[test]
    fn test_swap_base_missing_is_error() {
        let current = AtBat::new(68, 590, TUCKER, "Preston Tucker walks.", "walk", 1, 1);
        let err = swap_base(&current, &[], SUZUKI).unwrap_err();
        assert!(matches!(err, EngineError::BaseNotFound { .. }));
    }

    #[test]
    fn test_no_records_no_change() {
        let mut runners = vec![Runner::new(TUCKER, 0, Some(1), 593)];
        assert!(!remove_swap(&mut runners, BOURJOS, SUZUKI, 3));
        assert_eq!(runners.len(), 1);
    }

    #[test]
    fn test_unknown_pinch_runner_is_lookup_error() {
        let mut half = half_inning();
        let only_suzuki = Roster::new(vec![Player::new(SUZUKI, "Kurt", "Suzuki")]);
        let err = fix_pinch_runners(
            &mut half.at_bats[0],
            &[],
            &only_suzuki,
            &FuzzyNameMatcher::default(),
        )
        .unwrap_err();
        assert_eq!(
            err,
            EngineError::PlayerLookup {
                query: "Peter Bourjos".into()
            }
        );
    }
}
