use std::sync::Arc;

use serde_json::Value;
use tracing::warn;

use crate::dao::{
    leaderboard_mirror::LEADERBOARD_SIZE,
    models::{Difficulty, LeaderboardEntry, LeaderboardMap},
    storage::{KeyValueStore, store_json},
};

/// Storage key holding the serialized [`LeaderboardMap`].
pub const LEADERBOARD_KEY: &str = "quizApp.leaderboards";

/// Local, authoritative-for-the-session copy of the three tier leaderboards.
///
/// Every bucket stays sorted by descending score (earlier entries first on ties)
/// and never holds more than [`LEADERBOARD_SIZE`] entries.
pub struct LeaderboardLedger {
    map: LeaderboardMap,
    storage: Arc<dyn KeyValueStore>,
}

impl LeaderboardLedger {
    /// Restore the persisted map; anything missing or malformed loads as empty.
    pub fn load(storage: Arc<dyn KeyValueStore>) -> Self {
        let map = match storage.get(LEADERBOARD_KEY) {
            Ok(Some(raw)) => parse_map(&raw),
            Ok(None) => LeaderboardMap::default(),
            Err(err) => {
                warn!(error = %err, "failed to read stored leaderboards; starting empty");
                LeaderboardMap::default()
            }
        };

        Self { map, storage }
    }

    /// All three buckets.
    pub fn map(&self) -> &LeaderboardMap {
        &self.map
    }

    /// Entries of one tier, best first.
    pub fn bucket(&self, tier: Difficulty) -> &[LeaderboardEntry] {
        self.map.bucket(tier)
    }

    /// Insert an entry into its tier, re-rank, truncate and persist.
    pub fn apply_local_entry(&mut self, entry: LeaderboardEntry, tier: Difficulty) {
        let bucket = self.map.bucket_mut(tier);
        bucket.push(entry);
        rank(bucket);
        self.persist();
    }

    /// Replace every bucket, typically with the mirror's canonical view.
    pub fn replace_all(&mut self, mut map: LeaderboardMap) {
        for tier in Difficulty::ALL {
            rank(map.bucket_mut(tier));
        }
        self.map = map;
        self.persist();
    }

    fn persist(&self) {
        if let Err(err) = store_json(self.storage.as_ref(), LEADERBOARD_KEY, &self.map) {
            warn!(error = %err, "failed to persist leaderboards");
        }
    }
}

/// Stable sort by descending score, then keep the top entries.
fn rank(bucket: &mut Vec<LeaderboardEntry>) {
    bucket.sort_by(|a, b| b.score.cmp(&a.score));
    bucket.truncate(LEADERBOARD_SIZE);
}

fn parse_map(raw: &str) -> LeaderboardMap {
    let value = match serde_json::from_str::<Value>(raw) {
        Ok(value) => value,
        Err(err) => {
            warn!(error = %err, "stored leaderboards are not valid JSON; starting empty");
            return LeaderboardMap::default();
        }
    };

    let mut map = LeaderboardMap::default();
    for tier in Difficulty::ALL {
        let Some(bucket) = value.get(tier.as_str()).filter(|bucket| bucket.is_array()) else {
            continue;
        };
        match serde_json::from_value::<Vec<LeaderboardEntry>>(bucket.clone()) {
            Ok(mut entries) => {
                rank(&mut entries);
                *map.bucket_mut(tier) = entries;
            }
            Err(err) => warn!(%tier, error = %err, "dropping malformed leaderboard bucket"),
        }
    }
    map
}
