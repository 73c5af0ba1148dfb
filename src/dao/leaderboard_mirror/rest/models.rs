use serde::{Deserialize, Serialize};

use crate::dao::models::{Difficulty, LeaderboardEntry};

/// Columns selected when fetching a tier.
pub const SELECT_COLUMNS: &str = "name,score,achieved_at";

/// Row shape of the leaderboard table.
#[derive(Debug, Deserialize)]
pub struct LeaderboardRow {
    pub name: String,
    pub score: i64,
    pub achieved_at: String,
}

impl From<LeaderboardRow> for LeaderboardEntry {
    fn from(row: LeaderboardRow) -> Self {
        Self {
            name: row.name,
            score: row.score,
            achieved_at: row.achieved_at,
        }
    }
}

/// Body posted when inserting an entry.
#[derive(Debug, Serialize)]
pub struct NewLeaderboardRow<'a> {
    pub name: &'a str,
    pub score: i64,
    pub achieved_at: &'a str,
    pub difficulty: Difficulty,
}

impl<'a> NewLeaderboardRow<'a> {
    pub fn new(entry: &'a LeaderboardEntry, difficulty: Difficulty) -> Self {
        Self {
            name: &entry.name,
            score: entry.score,
            achieved_at: &entry.achieved_at,
            difficulty,
        }
    }
}
