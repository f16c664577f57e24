use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::EngineError;

/// Base number: 0 is the batter's box, 1–3 the bases, 4 home plate.
pub type Base = u8;

pub const BATTERS_BOX: Base = 0;
pub const HOME: Base = 4;

/// Who a runner movement belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunnerId {
    /// Placeholder for a runner who held his base and was never reported
    Held,
    Player(u32),
}

impl RunnerId {
    pub fn player(&self) -> Option<u32> {
        match self {
            RunnerId::Player(id) => Some(*id),
            RunnerId::Held => None,
        }
    }
}

impl fmt::Display for RunnerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RunnerId::Player(id) => write!(f, "{}", id),
            RunnerId::Held => write!(f, "held"),
        }
    }
}

/// One runner's movement during a plate appearance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Runner {
    pub id: RunnerId,
    pub start: Base,
    /// `None` until the feed or the enhancer decides where the runner ended up
    pub end: Option<Base>,
    /// Sequence number of the event this movement belongs to
    pub event_num: u32,
    #[serde(default)]
    pub out: bool,
    /// Display-only: the movement is part of a path that produces a run
    #[serde(default)]
    pub to_score: bool,
}

impl Runner {
    pub fn new(id: u32, start: Base, end: Option<Base>, event_num: u32) -> Self {
        Runner {
            id: RunnerId::Player(id),
            start,
            end,
            event_num,
            out: false,
            to_score: false,
        }
    }

    pub fn held(base: Base, event_num: u32) -> Self {
        Runner {
            id: RunnerId::Held,
            start: base,
            end: Some(base),
            event_num,
            out: false,
            to_score: false,
        }
    }

    pub fn out_at(mut self, base: Base) -> Self {
        self.end = Some(base);
        self.out = true;
        self
    }

    /// Still on base after this movement.
    pub fn is_active(&self) -> bool {
        !self.out && matches!(self.end, Some(b) if b != HOME)
    }

    pub fn is_player(&self, id: u32) -> bool {
        self.id == RunnerId::Player(id)
    }
}

impl fmt::Display for Runner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let end = self.end.map_or_else(|| "?".to_string(), |b| b.to_string());
        write!(f, "{} {} -> {}", self.id, self.start, end)?;
        if self.out {
            write!(f, " out!")
        } else if self.to_score && self.end == Some(HOME) {
            write!(f, " scores!")
        } else if self.to_score {
            write!(f, " will score")
        } else {
            Ok(())
        }
    }
}

/// A game event that is not itself a plate appearance (substitution,
/// wild pitch, pickoff, ...)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Action {
    pub event_num: u32,
    /// Category tag, e.g. "Offensive Sub", "Passed Ball"
    pub event: String,
    pub des: String,
    pub player: Option<u32>,
}

impl Action {
    pub fn new(event_num: u32, event: &str, des: &str, player: Option<u32>) -> Self {
        Action {
            event_num,
            event: event.to_string(),
            des: des.to_string(),
            player,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ResultCategory {
    Out,
    OnBase,
    #[serde(rename = "fc")]
    FieldersChoice,
    Error,
    Blank,
}

/// Scorecard notation for a play, e.g. `G6` / out
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scoring {
    pub code: String,
    pub result: ResultCategory,
}

impl Scoring {
    pub fn new(code: impl Into<String>, result: ResultCategory) -> Self {
        Scoring {
            code: code.into(),
            result,
        }
    }
}

/// A plate appearance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AtBat {
    pub pa_num: u32,
    pub event_num: u32,
    pub batter: u32,
    pub pitcher: u32,
    pub des: String,
    /// Raw event type tag from the feed, e.g. "field_out"
    pub event: String,
    /// Cumulative outs in the half-inning after this play
    pub outs: u8,
    #[serde(default)]
    pub home_score: u32,
    #[serde(default)]
    pub away_score: u32,
    #[serde(default)]
    pub scoring: Option<Scoring>,
    #[serde(default)]
    pub mid_pa_runners: Vec<Runner>,
    #[serde(default)]
    pub runners: Vec<Runner>,
    #[serde(default)]
    pub actions: Vec<Action>,
}

impl AtBat {
    pub fn new(
        pa_num: u32,
        event_num: u32,
        batter: u32,
        des: &str,
        event: &str,
        pitcher: u32,
        outs: u8,
    ) -> Self {
        AtBat {
            pa_num,
            event_num,
            batter,
            pitcher,
            des: des.to_string(),
            event: event.to_string(),
            outs,
            home_score: 0,
            away_score: 0,
            scoring: None,
            mid_pa_runners: Vec::new(),
            runners: Vec::new(),
            actions: Vec::new(),
        }
    }

    /// Routes a movement by its sequence number: earlier events are
    /// mid-play, the at-bat's own event is terminal.
    pub fn add_runner(&mut self, runner: Runner) -> Result<(), EngineError> {
        if runner.event_num < self.event_num {
            self.mid_pa_runners.push(runner);
        } else if runner.event_num == self.event_num {
            self.runners.push(runner);
        } else {
            return Err(EngineError::Consistency {
                play: self.event_num,
                detail: format!(
                    "runner {} belongs to later event {}",
                    runner.id, runner.event_num
                ),
            });
        }
        Ok(())
    }

    pub fn add_action(&mut self, action: Action) {
        self.actions.push(action);
    }

    pub fn action(&self, event_num: u32) -> Option<&Action> {
        self.actions.iter().find(|a| a.event_num == event_num)
    }

    /// Attached action texts followed by the play text.
    pub fn full_description(&self) -> String {
        let mut descriptions: Vec<&str> = self.actions.iter().map(|a| a.des.as_str()).collect();
        if !descriptions.contains(&self.des.as_str()) {
            descriptions.push(&self.des);
        }
        descriptions.join("\n")
    }

    pub fn batter_runner(&self) -> Option<&Runner> {
        self.runners.iter().find(|r| r.is_player(self.batter))
    }

    /// "With Smith batting, ..." marks a runner event recorded while the
    /// plate appearance is still going on.
    pub fn is_batter_still_up(&self) -> bool {
        self.des
            .strip_prefix("With ")
            .is_some_and(|rest| rest.contains(" batting,"))
    }

    pub fn all_runners(&self) -> impl Iterator<Item = &Runner> {
        self.mid_pa_runners.iter().chain(self.runners.iter())
    }

    /// Some feeds write an unknown end base as 0. Rewrites those as unset
    /// so the resolvers pick them up; returns how many were changed.
    pub fn clear_batters_box_ends(&mut self) -> usize {
        let mut cleared = 0;
        for runner in self.mid_pa_runners.iter_mut().chain(self.runners.iter_mut()) {
            if runner.end == Some(BATTERS_BOX) {
                runner.end = None;
                cleared += 1;
            }
        }
        cleared
    }
}

impl fmt::Display for AtBat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let code = self.scoring.as_ref().map_or("?", |s| s.code.as_str());
        write!(
            f,
            "{} {} {} {} {}",
            self.pa_num, self.batter, self.pitcher, self.outs, code
        )?;
        match self.scoring.as_ref().map(|s| s.result) {
            Some(ResultCategory::OnBase) => write!(f, " {}", self.event),
            Some(ResultCategory::Error) => write!(f, " (error)"),
            _ => Ok(()),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HalfInning {
    pub at_bats: Vec<AtBat>,
    /// Actions seen since the last plate appearance
    #[serde(default)]
    pub pending_actions: Vec<Action>,
}

impl HalfInning {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_action(&mut self, action: Action) {
        self.pending_actions.push(action);
    }

    /// Attaches every buffered action to `at_bat` and starts a fresh buffer.
    pub fn add_at_bat(&mut self, mut at_bat: AtBat) {
        for action in self.pending_actions.drain(..) {
            at_bat.add_action(action);
        }
        self.at_bats.push(at_bat);
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Inning {
    pub num: u32,
    /// Top, then bottom when it was played
    pub halves: Vec<HalfInning>,
}

impl Inning {
    pub fn new(num: u32) -> Self {
        Inning {
            num,
            halves: Vec::new(),
        }
    }

    pub fn add_half(&mut self, half: HalfInning) {
        debug_assert!(self.halves.len() < 2, "an inning has at most two halves");
        self.halves.push(half);
    }
}

impl fmt::Display for Inning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Inning {}", self.num)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Game {
    pub innings: Vec<Inning>,
}

impl Game {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_inning(&mut self, inning: Inning) {
        self.innings.push(inning);
    }

    /// (inning index, half index, at-bat index) of the final plate appearance.
    pub fn last_play(&self) -> Option<(usize, usize, usize)> {
        self.innings.iter().enumerate().rev().find_map(|(i, inning)| {
            inning
                .halves
                .iter()
                .enumerate()
                .rev()
                .find_map(|(h, half)| half.at_bats.len().checked_sub(1).map(|a| (i, h, a)))
        })
    }

    pub fn at_bats(&self) -> impl Iterator<Item = &AtBat> {
        self.innings
            .iter()
            .flat_map(|i| i.halves.iter())
            .flat_map(|h| h.at_bats.iter())
    }
}
