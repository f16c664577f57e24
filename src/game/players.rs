use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::error::EngineError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    pub id: u32,
    pub first: String,
    pub last: String,
}

impl Player {
    pub fn new(id: u32, first: &str, last: &str) -> Self {
        Player {
            id,
            first: normalize_first_name(first),
            last: last.to_string(),
        }
    }

    /// Name as it is written in play descriptions.
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first, self.last)
    }
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let initials: Vec<String> = self
            .first
            .chars()
            .filter(|c| c.is_uppercase())
            .map(|c| format!("{}.", c))
            .collect();
        write!(f, "{} {}", initials.join(" "), self.last)
    }
}

/// "A.J." is written "A. J." in descriptions.
fn normalize_first_name(first: &str) -> String {
    let chars: Vec<char> = first.chars().collect();
    let run_together = chars.len() >= 4
        && chars[0].is_ascii_uppercase()
        && chars[1] == '.'
        && chars[2].is_ascii_uppercase()
        && chars[3] == '.';
    if run_together {
        let rest: String = chars[2..].iter().collect();
        format!("{}{} {}", chars[0], chars[1], rest)
    } else {
        first.to_string()
    }
}

/// Read-only id → player lookup for one game.
#[derive(Debug, Clone, Default)]
pub struct Roster {
    players: BTreeMap<u32, Player>,
}

impl Roster {
    pub fn new(players: impl IntoIterator<Item = Player>) -> Self {
        Roster {
            players: players.into_iter().map(|p| (p.id, p)).collect(),
        }
    }

    pub fn get(&self, id: u32) -> Option<&Player> {
        self.players.get(&id)
    }

    pub fn last_name(&self, id: u32) -> Result<&str, EngineError> {
        self.get(id)
            .map(|p| p.last.as_str())
            .ok_or_else(|| EngineError::PlayerLookup {
                query: format!("id {}", id),
            })
    }

    pub fn iter(&self) -> impl Iterator<Item = &Player> {
        self.players.values()
    }

    pub fn len(&self) -> usize {
        self.players.len()
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }
}
