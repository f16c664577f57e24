//! Baserunner reconstruction for baseball play-by-play.
//!
//! Takes a parsed game whose runner movements are often missing their end
//! base and resolves every movement, classifies every play in scorecard
//! notation and marks the movements that lead to runs.

pub mod enhance;
pub mod error;
pub mod game;
pub mod names;
pub mod scoring;

pub use enhance::{EnhanceSummary, GameEnhancer};
pub use error::EngineError;
pub use game::{Game, GameId, GameRecord, Roster};
pub use names::{FuzzyNameMatcher, NameMatcher};
