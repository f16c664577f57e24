//! Declarative classification table: event tag → ordered outcomes.
//!
//! The first rule whose tag matches owns the play; within it, the first
//! outcome whose pattern matches decides the code. There is no fall-through
//! to later rules.

use once_cell::sync::Lazy;
use regex_lite::Regex;

use super::notation::{expand_code, expand_pattern};
use crate::game::ResultCategory::{self, Blank, Error, FieldersChoice, OnBase, Out};

#[derive(Debug, Clone, Copy)]
pub enum TagMatch {
    Exact(&'static str),
    OneOf(&'static [&'static str]),
    Prefix(&'static str),
}

impl TagMatch {
    fn matches(&self, event: &str) -> bool {
        match self {
            TagMatch::Exact(tag) => event == *tag,
            TagMatch::OneOf(tags) => tags.iter().any(|t| *t == event),
            TagMatch::Prefix(prefix) => event.starts_with(*prefix),
        }
    }
}

/// Whether a play concludes the batter's plate appearance or only moves
/// runners while he is still at the plate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayKind {
    Batter,
    Runner,
}

#[derive(Debug)]
enum Pattern {
    Always,
    Contains(&'static [&'static str]),
    Regex(Regex),
    /// Third out recorded, or no movement record for the batter
    BatterRetired,
    /// Ends the cascade with no match when the description contains any
    Stop(&'static [&'static str]),
}

#[derive(Debug)]
struct Outcome {
    pattern: Pattern,
    code: &'static str,
    result: ResultCategory,
}

/// What a rule needs to know about the play.
#[derive(Debug, Clone, Copy)]
pub struct PlayContext<'a> {
    pub event: &'a str,
    pub des: &'a str,
    pub batter_retired: bool,
}

#[derive(Debug)]
pub struct PlayRule {
    tag: TagMatch,
    kind: PlayKind,
    outcomes: Vec<Outcome>,
}

impl PlayRule {
    fn new(tag: TagMatch) -> Self {
        PlayRule {
            tag,
            kind: PlayKind::Batter,
            outcomes: Vec::new(),
        }
    }

    fn exact(tag: &'static str) -> Self {
        Self::new(TagMatch::Exact(tag))
    }

    fn prefix(prefix: &'static str) -> Self {
        Self::new(TagMatch::Prefix(prefix))
    }

    fn runner_play(mut self) -> Self {
        self.kind = PlayKind::Runner;
        self
    }

    fn push(mut self, pattern: Pattern, code: &'static str, result: ResultCategory) -> Self {
        self.outcomes.push(Outcome {
            pattern,
            code,
            result,
        });
        self
    }

    fn always(self, code: &'static str, result: ResultCategory) -> Self {
        self.push(Pattern::Always, code, result)
    }

    fn contains(
        self,
        needles: &'static [&'static str],
        code: &'static str,
        result: ResultCategory,
    ) -> Self {
        self.push(Pattern::Contains(needles), code, result)
    }

    fn regex(self, pattern: &str, code: &'static str, result: ResultCategory) -> Self {
        let re = Regex::new(&expand_pattern(pattern)).expect("play rule pattern must compile");
        self.push(Pattern::Regex(re), code, result)
    }

    fn when_batter_retired(self, code: &'static str, result: ResultCategory) -> Self {
        self.push(Pattern::BatterRetired, code, result)
    }

    /// Later outcomes are not tried for descriptions containing `needles`.
    fn stop_if_contains(self, needles: &'static [&'static str]) -> Self {
        self.push(Pattern::Stop(needles), "", Blank)
    }

    pub fn kind(&self) -> PlayKind {
        self.kind
    }

    /// First outcome that matches, as (code, result).
    pub fn apply(&self, ctx: &PlayContext<'_>) -> Option<(String, ResultCategory)> {
        let contains_any = |needles: &[&str]| needles.iter().any(|n| ctx.des.contains(*n));
        for o in &self.outcomes {
            let code = match &o.pattern {
                Pattern::Always => expand_code(o.code, None),
                Pattern::Contains(needles) if contains_any(*needles) => expand_code(o.code, None),
                Pattern::Regex(re) => re
                    .captures(ctx.des)
                    .and_then(|caps| expand_code(o.code, Some(&caps))),
                Pattern::BatterRetired if ctx.batter_retired => expand_code(o.code, None),
                Pattern::Stop(needles) if contains_any(*needles) => return None,
                _ => None,
            };
            if let Some(code) = code {
                return Some((code, o.result));
            }
        }
        None
    }
}

const HIT_TO_FIELDER: &str = "{HIT} to {POS}";
const SINGLES_ON_A: &str = r"singles on a (\w+\s)?(\w+ \w+)\.";
const DOUBLES: &str = r"doubles\.";
const REACHES_ON_FC: &str = r"reaches on a fielder's choice(?:\sout)?, (?:fielded by\s)?{POS}";

fn base_hit(tag: &'static str, fallback: &'static str) -> PlayRule {
    PlayRule::exact(tag)
        .regex(HIT_TO_FIELDER, "{hit:1}{pos:2}", OnBase)
        // runner hit by the batted ball
        .regex(SINGLES_ON_A, "S", OnBase)
        .regex(DOUBLES, "D", OnBase)
        .always(fallback, OnBase)
}

fn build_rules() -> Vec<PlayRule> {
    vec![
        PlayRule::prefix("strikeout")
            .contains(
                &[
                    "swinging",
                    "on a foul tip",
                    "on a foul bunt",
                    "on a missed bunt",
                    "ejected",
                ],
                "K",
                Out,
            )
            .contains(&["called out on"], "Kl", Out),
        PlayRule::exact("walk").always("W", OnBase),
        PlayRule::exact("intent_walk").always("IW", OnBase),
        PlayRule::exact("catcher_interf").contains(
            &["reaches on catcher interference"],
            "CI",
            Error,
        ),
        PlayRule::exact("batter_interference").always("BI", Out),
        PlayRule::exact("grounded_into_double_play").regex("double play, {POS}", "G{pos:1}", Out),
        PlayRule::exact("force_out").regex(
            r"{AIR} into a force out, (?:fielded by\s)?{POS}",
            "{air:1}{pos:2}",
            FieldersChoice,
        ),
        PlayRule::exact("sac_fly")
            .regex("sacrifice fly(?:,| to) {POS}", "F{pos:1}", Out)
            .regex(
                r"sacrifice fly.\s+Fielding error by (\w+ fielder)",
                "E{pos:1}",
                Error,
            ),
        PlayRule::new(TagMatch::OneOf(&["sac_fly_double_play", "sac_bunt_double_play"])).regex(
            "{AIR} into a sacrifice double play(?: in foul territory)?, {POS}",
            "{air:1}{pos:2}",
            Out,
        ),
        PlayRule::exact("sac_bunt")
            .regex(r"sacrifice bunt(?:,|\sto) {POS}", "B{pos:1}", Out)
            .contains(&["hits a sacrifice bunt"], "SAC", Out),
        PlayRule::exact("field_out")
            .regex(
                r"{OUT}(?:,\s|\s\w+,\s|\s\w+\sto\s|\sto\s|\son\s){POS}",
                "{out:1}{pos:2}",
                Out,
            )
            .regex("{OUT}", "{out:1}", Out),
        PlayRule::new(TagMatch::OneOf(&["double_play", "triple_play"]))
            .regex(
                r"{AIR} into a(?:n unassisted|\sfielder's choice)? (?:double|triple) play(?:\sin foul territory)?, {POS}",
                "{air:1}{pos:2}",
                Out,
            )
            // single on the play, runners doubled up
            .contains(&["Double play"], "DP", Out),
        PlayRule::prefix("pickoff_caught_stealing")
            .runner_play()
            .always("POCS", FieldersChoice),
        PlayRule::prefix("pickoff_error")
            .runner_play()
            .always("PO", Error),
        PlayRule::prefix("pickoff")
            .runner_play()
            .always("PO", FieldersChoice),
        PlayRule::prefix("caught_stealing")
            .runner_play()
            .always("CS", FieldersChoice),
        PlayRule::exact("runner_double_play")
            .runner_play()
            .always("DP", Out),
        PlayRule::exact("double")
            .regex("ground-rule .*{HIT}", "{hit:1}", OnBase)
            .stop_if_contains(&["ground-rule"])
            .regex(HIT_TO_FIELDER, "{hit:1}{pos:2}", OnBase)
            .regex(SINGLES_ON_A, "S", OnBase)
            .regex(DOUBLES, "D", OnBase)
            .always("D", OnBase),
        base_hit("single", "S"),
        base_hit("triple", "T"),
        PlayRule::exact("home_run").always("HR", OnBase),
        PlayRule::exact("hit_by_pitch").always("HB", OnBase),
        PlayRule::exact("field_error").regex("{ERR} error by {POS}", "E{pos:1}", Error),
        PlayRule::exact("fielders_choice_out")
            .regex(r"(?:fielded by\s)?{POS}", "FC{pos:1}", FieldersChoice)
            .regex(REACHES_ON_FC, "FC{pos:1}", FieldersChoice),
        PlayRule::prefix("fielders_choice")
            .regex(REACHES_ON_FC, "FC{pos:1}", FieldersChoice)
            .always("FC", FieldersChoice),
        PlayRule::exact("fan_interference")
            .when_batter_retired("FI", Out)
            .always("FI", OnBase),
        PlayRule::exact("wild_pitch").runner_play().always("WP", OnBase),
        PlayRule::exact("passed_ball").runner_play().always("PB", OnBase),
        PlayRule::prefix("stolen_base").runner_play().always("", Out),
        PlayRule::exact("other_out").always("", Out),
        PlayRule::exact("other_advance").runner_play().always("", OnBase),
        PlayRule::exact("defensive_switch")
            .runner_play()
            .always("DS", OnBase),
        PlayRule::exact("balk").runner_play().always("BK", OnBase),
        PlayRule::new(TagMatch::OneOf(&[
            "game_advisory",
            "pitching_substitution",
            "offensive_substitution",
            "runner_placed",
        ]))
        .runner_play()
        .always("", Blank),
    ]
}

static PLAY_RULES: Lazy<Vec<PlayRule>> = Lazy::new(build_rules);

/// The rule that owns `event`, if the tag is known.
pub fn rule_for(event: &str) -> Option<&'static PlayRule> {
    PLAY_RULES.iter().find(|r| r.tag.matches(event))
}
