use std::sync::Arc;

use tracing::warn;

use crate::dao::storage::KeyValueStore;

/// Storage key holding the player's display name.
pub const PLAYER_NAME_KEY: &str = "quizApp.userName";

/// Display name and running score of the current player.
///
/// An empty name means there is no active player. The score never drops below zero.
pub struct PlayerLedger {
    name: String,
    score: i64,
    storage: Arc<dyn KeyValueStore>,
}

impl PlayerLedger {
    /// Restore the stored name, if any, with a zero score.
    pub fn load(storage: Arc<dyn KeyValueStore>) -> Self {
        let name = match storage.get(PLAYER_NAME_KEY) {
            Ok(name) => name.unwrap_or_default(),
            Err(err) => {
                warn!(error = %err, "failed to read stored player name; starting anonymous");
                String::new()
            }
        };

        Self {
            name,
            score: 0,
            storage,
        }
    }

    /// Current name; empty when no player is active.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Current score.
    pub fn score(&self) -> i64 {
        self.score
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
        self.persist_name();
    }

    pub fn clear_name(&mut self) {
        self.name.clear();
        self.persist_name();
    }

    pub fn reset_score(&mut self) {
        self.score = 0;
    }

    /// Apply a signed delta, flooring the result at zero.
    pub fn add_score(&mut self, delta: i64) {
        self.score = self.score.saturating_add(delta).max(0);
    }

    fn persist_name(&self) {
        let result = if self.name.is_empty() {
            self.storage.remove(PLAYER_NAME_KEY)
        } else {
            self.storage.set(PLAYER_NAME_KEY, &self.name)
        };
        if let Err(err) = result {
            warn!(error = %err, "failed to persist player name");
        }
    }
}
