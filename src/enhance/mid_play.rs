use tracing::debug;

use super::bases::find_base_where_out_was_made;
use crate::error::EngineError;
use crate::game::{AtBat, Roster};

/// Fills in the end base of mid-play movements the feed left open. Those are
/// runners thrown out between pitches (caught stealing, picked off); the
/// action recorded at the same sequence number says where.
pub fn resolve_mid_play_runners(at_bat: &mut AtBat, roster: &Roster) -> Result<(), EngineError> {
    for i in 0..at_bat.mid_pa_runners.len() {
        let runner = &at_bat.mid_pa_runners[i];
        if runner.end.is_some() {
            continue;
        }
        let Some(id) = runner.id.player() else {
            continue;
        };
        let last_name = roster.last_name(id)?;
        let text = at_bat
            .action(runner.event_num)
            .map(|a| a.des.as_str())
            .ok_or_else(|| EngineError::BaseNotFound {
                runner: last_name.to_string(),
                text: format!("<no action at event {}>", runner.event_num),
            })?;
        let base = find_base_where_out_was_made(last_name, text)?;
        debug!("Mid-play: {} out at {}", last_name, base);

        let runner = &mut at_bat.mid_pa_runners[i];
        runner.end = Some(base);
        runner.out = true;
    }
    Ok(())
}

/// Outs already recorded before the terminal event.
pub fn mid_play_outs(at_bat: &AtBat) -> usize {
    at_bat.mid_pa_runners.iter().filter(|r| r.out).count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{Action, Player, Runner};

    fn roster() -> Roster {
        Roster::new(vec![
            Player::new(605141, "Mookie", "Betts"),
            Player::new(434670, "Hanley", "Ramirez"),
        ])
    }

    fn walk_with_runner_out() -> AtBat {
        let mut ab = AtBat::new(55, 423, 434670, "Hanley Ramirez walks.", "walk", 643493, 1);
        ab.add_runner(Runner::new(605141, 1, None, 418)).unwrap();
        ab.add_runner(Runner::new(434670, 0, Some(1), 423)).unwrap();
        ab.add_action(Action::new(
            418,
            "Runner Out",
            "Mookie Betts out at 1st, catcher Wilson Ramos to first baseman C. J. Cron.",
            Some(605141),
        ));
        ab
    }

    #[test]
    fn test_fix_mid_pa_runners() {
        let mut ab = walk_with_runner_out();
        resolve_mid_play_runners(&mut ab, &roster()).unwrap();
        let runner_out = &ab.mid_pa_runners[0];
        assert_eq!(runner_out.end, Some(1));
        assert!(runner_out.out);
        assert_eq!(mid_play_outs(&ab), 1);
        // terminal movements untouched
        assert_eq!(ab.runners[0].end, Some(1));
        assert!(!ab.runners[0].out);
    }

    #[test]
    fn test_missing_action_is_base_not_found() {
        let mut ab = walk_with_runner_out();
        ab.actions.clear();
        let err = resolve_mid_play_runners(&mut ab, &roster()).unwrap_err();
        assert!(matches!(err, EngineError::BaseNotFound { .. }));
    }

    #[test]
    fn test_unhelpful_action_text_is_base_not_found() {
        let mut ab = walk_with_runner_out();
        ab.actions[0].des = "Mookie Betts steals (3) 2nd base.".into();
        let err = resolve_mid_play_runners(&mut ab, &roster()).unwrap_err();
        assert_eq!(err.kind(), "base_not_found");
    }

    #[test]
    fn test_resolved_runners_are_left_alone() {
        let mut ab = walk_with_runner_out();
        ab.mid_pa_runners[0].end = Some(2);
        resolve_mid_play_runners(&mut ab, &roster()).unwrap();
        assert_eq!(ab.mid_pa_runners[0].end, Some(2));
        assert!(!ab.mid_pa_runners[0].out);
    }
}
