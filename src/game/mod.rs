pub mod models;
pub mod players;
pub mod record;

pub use models::{
    Action, AtBat, Base, Game, HalfInning, Inning, ResultCategory, Runner, RunnerId, Scoring,
    BATTERS_BOX, HOME,
};
pub use players::{Player, Roster};
pub use record::{GameId, GameRecord};
