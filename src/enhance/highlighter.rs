use std::collections::BTreeSet;

use crate::game::{Base, HalfInning, Runner, BATTERS_BOX, HOME};

/// Marks every movement on a path that ends in a run, walking the
/// half-inning from the last play back to the first. Only `to_score`
/// changes. Returns how many movements were marked.
pub fn highlight_scoring_paths(half: &mut HalfInning) -> usize {
    let mut scored_from: BTreeSet<Base> = BTreeSet::new();
    let mut marked = 0;

    for at_bat in half.at_bats.iter_mut().rev() {
        let mut leads_to_run = BTreeSet::new();

        for runner in at_bat.runners.iter_mut() {
            if runner.out {
                continue;
            }
            let scores = matches!(runner.end, Some(end) if end == HOME || scored_from.contains(&end));
            if scores {
                mark(runner, &mut leads_to_run);
                marked += 1;
            }
        }

        let mut mid_play: Vec<&mut Runner> = at_bat.mid_pa_runners.iter_mut().collect();
        mid_play.sort_by(|a, b| b.event_num.cmp(&a.event_num));
        for runner in mid_play {
            if runner.out {
                continue;
            }
            let Some(end) = runner.end else {
                continue;
            };
            if leads_to_run.remove(&end) || end == HOME {
                mark(runner, &mut leads_to_run);
                marked += 1;
            }
        }

        scored_from = leads_to_run;
    }
    marked
}

fn mark(runner: &mut Runner, leads_to_run: &mut BTreeSet<Base>) {
    runner.to_score = true;
    if runner.start != BATTERS_BOX {
        leads_to_run.insert(runner.start);
    }
}
