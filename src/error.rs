use thiserror::Error;

/// Fatal problems found while reconstructing a game.
///
/// None of these are recoverable: the caller is expected to drop the whole
/// game rather than render a partially resolved one.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    #[error("Cannot classify event '{event}': {reason}")]
    Classification { event: String, reason: String },

    #[error("Cannot find base where {runner} was put out in: {text}")]
    BaseNotFound { runner: String, text: String },

    #[error("Outs mismatch on play {play}: accounted for {accounted}, expected {expected}")]
    Reconciliation {
        play: u32,
        accounted: i32,
        expected: i32,
    },

    #[error("Base occupancy violated on play {play}: {detail}")]
    Consistency { play: u32, detail: String },

    #[error("Player not found: {query}")]
    PlayerLookup { query: String },
}

impl EngineError {
    /// Short label used as a structured logging field.
    pub fn kind(&self) -> &'static str {
        match self {
            EngineError::Classification { .. } => "classification",
            EngineError::BaseNotFound { .. } => "base_not_found",
            EngineError::Reconciliation { .. } => "reconciliation",
            EngineError::Consistency { .. } => "consistency",
            EngineError::PlayerLookup { .. } => "player_lookup",
        }
    }
}
