//! Resolving names written in play descriptions to player ids.

use tracing::debug;

use crate::error::EngineError;
use crate::game::Roster;

pub const DEFAULT_SIMILARITY_THRESHOLD: f64 = 0.8;

/// Looks up a full name ("Peter Bourjos") against a game's roster.
pub trait NameMatcher {
    fn lookup(&self, roster: &Roster, full_name: &str) -> Option<u32>;

    fn resolve(&self, roster: &Roster, full_name: &str) -> Result<u32, EngineError> {
        self.lookup(roster, full_name)
            .ok_or_else(|| EngineError::PlayerLookup {
                query: full_name.to_string(),
            })
    }
}

/// Exact full-name match first, then the most similar name at or above
/// `threshold` (normalized Levenshtein).
#[derive(Debug, Clone, Copy)]
pub struct FuzzyNameMatcher {
    threshold: f64,
}

impl Default for FuzzyNameMatcher {
    fn default() -> Self {
        Self::new(DEFAULT_SIMILARITY_THRESHOLD)
    }
}

impl FuzzyNameMatcher {
    pub fn new(threshold: f64) -> Self {
        debug_assert!(
            threshold > 0.0 && threshold <= 1.0,
            "threshold out of range"
        );
        FuzzyNameMatcher { threshold }
    }

    pub fn similarity(a: &str, b: &str) -> f64 {
        strsim::normalized_levenshtein(a, b)
    }
}

impl NameMatcher for FuzzyNameMatcher {
    fn lookup(&self, roster: &Roster, full_name: &str) -> Option<u32> {
        if let Some(p) = roster.iter().find(|p| p.full_name() == full_name) {
            return Some(p.id);
        }

        let mut best: Option<(u32, f64)> = None;
        for player in roster.iter() {
            let score = Self::similarity(&player.full_name(), full_name);
            if score >= self.threshold && best.map_or(true, |(_, s)| score > s) {
                best = Some((player.id, score));
            }
        }
        if let Some((id, score)) = best {
            debug!(
                "Fuzzy matched '{}' to player {} (similarity {:.2})",
                full_name, id, score
            );
        }
        best.map(|(id, _)| id)
    }
}
