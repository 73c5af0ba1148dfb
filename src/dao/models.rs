use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Difficulty tier; rounds and leaderboards are partitioned by it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    /// Entry-level questions.
    #[default]
    Easy,
    /// Intermediate questions.
    Medium,
    /// Hardest questions.
    Hard,
}

impl Difficulty {
    /// Every tier, in display order.
    pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard];

    /// Wire name used by the question provider, the remote mirror and local storage.
    pub fn as_str(self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a string is not one of `easy`, `medium` or `hard`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown difficulty `{0}`")]
pub struct UnknownDifficulty(pub String);

impl FromStr for Difficulty {
    type Err = UnknownDifficulty;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "easy" => Ok(Difficulty::Easy),
            "medium" => Ok(Difficulty::Medium),
            "hard" => Ok(Difficulty::Hard),
            other => Err(UnknownDifficulty(other.to_string())),
        }
    }
}

/// A finished round recorded on a leaderboard. Immutable once created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaderboardEntry {
    /// Player display name.
    pub name: String,
    /// Final score of the round.
    pub score: i64,
    /// RFC 3339 timestamp of when the round finished.
    pub achieved_at: String,
}

/// One ranked bucket per tier, as persisted under the leaderboard key.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaderboardMap {
    /// Easy tier bucket.
    pub easy: Vec<LeaderboardEntry>,
    /// Medium tier bucket.
    pub medium: Vec<LeaderboardEntry>,
    /// Hard tier bucket.
    pub hard: Vec<LeaderboardEntry>,
}

impl LeaderboardMap {
    /// Entries of a tier, best first.
    pub fn bucket(&self, tier: Difficulty) -> &[LeaderboardEntry] {
        match tier {
            Difficulty::Easy => &self.easy,
            Difficulty::Medium => &self.medium,
            Difficulty::Hard => &self.hard,
        }
    }

    pub(crate) fn bucket_mut(&mut self, tier: Difficulty) -> &mut Vec<LeaderboardEntry> {
        match tier {
            Difficulty::Easy => &mut self.easy,
            Difficulty::Medium => &mut self.medium,
            Difficulty::Hard => &mut self.hard,
        }
    }
}

/// Category and difficulty filters, persisted together as one record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Preferences {
    /// Provider category id, or `any`.
    pub category: String,
    /// Selected tier.
    pub difficulty: Difficulty,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            category: ANY_CATEGORY.into(),
            difficulty: Difficulty::Easy,
        }
    }
}

/// Category filter value meaning "do not filter by category".
pub const ANY_CATEGORY: &str = "any";
