use std::sync::Arc;

use serde_json::Value;
use tracing::warn;

use crate::dao::{
    models::{ANY_CATEGORY, Difficulty, Preferences},
    storage::{KeyValueStore, store_json},
};

/// Storage key holding the filter record.
pub const PREFERENCES_KEY: &str = "quizApp.preferences";

/// Category and difficulty filters used for the next question request.
pub struct PreferenceStore {
    current: Preferences,
    storage: Arc<dyn KeyValueStore>,
}

impl PreferenceStore {
    /// Restore the stored filters, defaulting to any category on easy.
    pub fn load(storage: Arc<dyn KeyValueStore>) -> Self {
        let current = match storage.get(PREFERENCES_KEY) {
            Ok(Some(raw)) => parse_preferences(&raw),
            Ok(None) => Preferences::default(),
            Err(err) => {
                warn!(error = %err, "failed to read stored preferences; using defaults");
                Preferences::default()
            }
        };

        Self { current, storage }
    }

    /// Current filters.
    pub fn get(&self) -> &Preferences {
        &self.current
    }

    pub fn category(&self) -> &str {
        &self.current.category
    }

    pub fn difficulty(&self) -> Difficulty {
        self.current.difficulty
    }

    pub fn set_category(&mut self, category: impl Into<String>) {
        self.current.category = category.into();
        self.persist();
    }

    pub fn set_difficulty(&mut self, difficulty: Difficulty) {
        self.current.difficulty = difficulty;
        self.persist();
    }

    fn persist(&self) {
        if let Err(err) = store_json(self.storage.as_ref(), PREFERENCES_KEY, &self.current) {
            warn!(error = %err, "failed to persist preferences");
        }
    }
}

/// Lenient parse: each field falls back to its default on its own.
fn parse_preferences(raw: &str) -> Preferences {
    let value = match serde_json::from_str::<Value>(raw) {
        Ok(value) => value,
        Err(err) => {
            warn!(error = %err, "stored preferences are not valid JSON; using defaults");
            return Preferences::default();
        }
    };

    let category = value
        .get("category")
        .and_then(Value::as_str)
        .unwrap_or(ANY_CATEGORY)
        .to_string();
    let difficulty = value
        .get("difficulty")
        .and_then(Value::as_str)
        .and_then(|tier| tier.parse().ok())
        .unwrap_or_default();

    Preferences {
        category,
        difficulty,
    }
}
