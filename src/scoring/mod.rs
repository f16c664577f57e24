//! Play classification: raw event tag + description → scorecard notation.

pub mod notation;
pub mod rules;

pub use rules::{PlayContext, PlayKind};

use once_cell::sync::Lazy;
use regex_lite::Regex;
use tracing::debug;

use crate::error::EngineError;
use crate::game::{AtBat, Scoring};

static RUNS_OF_WHITESPACE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s\s+").expect("whitespace pattern must compile"));
static SPACE_BEFORE_COMMA: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s,(\w)").expect("comma pattern must compile"));

/// Collapses whitespace runs and rewrites " ,word" as ", word".
/// Applying it twice changes nothing.
pub fn normalize_description(des: &str) -> String {
    let collapsed = RUNS_OF_WHITESPACE.replace_all(des.trim(), " ");
    SPACE_BEFORE_COMMA
        .replace_all(&collapsed, ", ${1}")
        .into_owned()
}

/// Classifies one play. Unknown tags and known tags with no matching
/// pattern are both errors; nothing is defaulted.
pub fn classify(ctx: &PlayContext<'_>) -> Result<Scoring, EngineError> {
    let rule = rules::rule_for(ctx.event).ok_or_else(|| EngineError::Classification {
        event: ctx.event.to_string(),
        reason: "new event type".to_string(),
    })?;
    let (code, result) = rule
        .apply(ctx)
        .ok_or_else(|| EngineError::Classification {
            event: ctx.event.to_string(),
            reason: format!("no pattern matched '{}'", ctx.des),
        })?;
    Ok(Scoring::new(code, result))
}

/// Normalizes the at-bat's description in place, then classifies it.
pub fn classify_at_bat(at_bat: &mut AtBat) -> Result<Scoring, EngineError> {
    at_bat.des = normalize_description(&at_bat.des);
    let ctx = PlayContext {
        event: &at_bat.event,
        des: &at_bat.des,
        batter_retired: at_bat.outs == 3 || at_bat.batter_runner().is_none(),
    };
    let scoring = classify(&ctx)?;
    debug!(
        "Play {} classified {} ({:?})",
        at_bat.event_num, scoring.code, scoring.result
    );
    Ok(scoring)
}

/// True when the tag only moves runners and leaves the batter at the plate.
/// Unknown tags count as batter plays; `classify` rejects them anyway.
pub fn is_runner_play(event: &str) -> bool {
    rules::rule_for(event).is_some_and(|r| r.kind() == PlayKind::Runner)
}
