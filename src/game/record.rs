use anyhow::{Context, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::models::Game;
use super::players::{Player, Roster};

/// Gameday identifier, e.g. `gid_2018_03_29_phimlb_atlmlb_1`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameId {
    pub date: NaiveDate,
    /// Three-letter club code plus league suffix, e.g. "phimlb"
    pub away: String,
    pub home: String,
    /// 1 for a single game, 2 for the second game of a doubleheader
    pub game_number: u8,
}

impl GameId {
    pub fn parse(gid: &str) -> Result<Self> {
        let parts: Vec<&str> = gid.split('_').collect();
        let [prefix, year, month, day, away, home, number] = parts.as_slice() else {
            anyhow::bail!("Not a valid game id: {}", gid);
        };
        if *prefix != "gid" || !is_club_code(away) || !is_club_code(home) {
            anyhow::bail!("Not a valid game id: {}", gid);
        }
        if year.len() != 4 || month.len() != 2 || day.len() != 2 || number.len() != 1 {
            anyhow::bail!("Not a valid game id: {}", gid);
        }

        let date = NaiveDate::from_ymd_opt(
            year.parse().with_context(|| format!("Bad year in {}", gid))?,
            month.parse().with_context(|| format!("Bad month in {}", gid))?,
            day.parse().with_context(|| format!("Bad day in {}", gid))?,
        )
        .with_context(|| format!("Bad date in {}", gid))?;

        Ok(GameId {
            date,
            away: away.to_string(),
            home: home.to_string(),
            game_number: number
                .parse()
                .with_context(|| format!("Bad game number in {}", gid))?,
        })
    }
}

fn is_club_code(code: &str) -> bool {
    code.len() == 6 && code.chars().all(|c| c.is_ascii_lowercase())
}

impl fmt::Display for GameId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "gid_{}_{}_{}_{}",
            self.date.format("%Y_%m_%d"),
            self.away,
            self.home,
            self.game_number
        )
    }
}

/// On-disk envelope: a parsed game plus the players needed to read its text
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameRecord {
    pub game_id: String,
    pub players: Vec<Player>,
    pub game: Game,
}

impl GameRecord {
    pub fn id(&self) -> Result<GameId> {
        GameId::parse(&self.game_id)
    }

    pub fn roster(&self) -> Roster {
        Roster::new(self.players.iter().cloned())
    }
}
