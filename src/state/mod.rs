//! Session state: the round, the player, the leaderboards and the stored filters.

pub mod leaderboard;
pub mod player;
pub mod preferences;
pub mod question;
pub mod round;

use std::{sync::Arc, time::Duration};

use tokio::sync::RwLock;
#[cfg(all(feature = "opentdb", feature = "rest-mirror"))]
use tracing::{info, warn};

use crate::{
    config::QuizConfig,
    dao::{
        leaderboard_mirror::LeaderboardMirror,
        question_source::QuestionProvider,
        storage::{FileStore, KeyValueStore, MemoryStore},
    },
};
#[cfg(feature = "opentdb")]
use crate::error::SetupError;

use self::{
    leaderboard::LeaderboardLedger, player::PlayerLedger, preferences::PreferenceStore,
    round::RoundState,
};

pub type SharedState = Arc<QuizState>;

/// One quiz session: the round, the player, the leaderboards and their backends.
///
/// Locks are always taken in the order round, player, leaderboard. Preferences are only
/// read before a load and never held together with the others.
pub struct QuizState {
    round: RwLock<RoundState>,
    player: RwLock<PlayerLedger>,
    leaderboard: RwLock<LeaderboardLedger>,
    preferences: RwLock<PreferenceStore>,
    provider: Arc<dyn QuestionProvider>,
    mirror: Option<Arc<dyn LeaderboardMirror>>,
    auto_advance_delay: Duration,
}

impl QuizState {
    /// Assemble a session from explicit backends, restoring ledgers from `storage`.
    pub fn new(
        config: &QuizConfig,
        provider: Arc<dyn QuestionProvider>,
        mirror: Option<Arc<dyn LeaderboardMirror>>,
        storage: Arc<dyn KeyValueStore>,
    ) -> SharedState {
        Arc::new(Self {
            round: RwLock::new(RoundState::new()),
            player: RwLock::new(PlayerLedger::load(storage.clone())),
            leaderboard: RwLock::new(LeaderboardLedger::load(storage.clone())),
            preferences: RwLock::new(PreferenceStore::load(storage)),
            provider,
            mirror,
            auto_advance_delay: config.auto_advance_delay(),
        })
    }

    /// Wire the default backends: OpenTDB questions, the REST mirror when configured
    /// through the environment, and file or in-memory storage.
    #[cfg(feature = "opentdb")]
    pub fn from_config(config: &QuizConfig) -> Result<SharedState, SetupError> {
        use crate::dao::question_source::opentdb::OpenTdbProvider;

        let provider =
            OpenTdbProvider::new(config.question_api_url(), config.request_timeout())
                .map_err(|err| SetupError::Provider(err.into()))?;

        Ok(Self::new(
            config,
            Arc::new(provider),
            default_mirror(config),
            default_storage(config),
        ))
    }

    /// The round being played.
    pub fn round(&self) -> &RwLock<RoundState> {
        &self.round
    }

    /// Name and score of the player.
    pub fn player(&self) -> &RwLock<PlayerLedger> {
        &self.player
    }

    /// Local leaderboards.
    pub fn leaderboard(&self) -> &RwLock<LeaderboardLedger> {
        &self.leaderboard
    }

    /// Filters used for the next load.
    pub fn preferences(&self) -> &RwLock<PreferenceStore> {
        &self.preferences
    }

    /// Source of question sets.
    pub fn provider(&self) -> Arc<dyn QuestionProvider> {
        self.provider.clone()
    }

    /// Remote leaderboard mirror, if one is configured.
    pub fn mirror(&self) -> Option<Arc<dyn LeaderboardMirror>> {
        self.mirror.clone()
    }

    /// Delay before an answered question advances on its own.
    pub fn auto_advance_delay(&self) -> Duration {
        self.auto_advance_delay
    }
}

#[cfg(all(feature = "opentdb", feature = "rest-mirror"))]
fn default_mirror(config: &QuizConfig) -> Option<Arc<dyn LeaderboardMirror>> {
    use crate::dao::leaderboard_mirror::rest::{RestLeaderboardMirror, RestMirrorConfig};

    let Some(mirror_config) = RestMirrorConfig::from_env() else {
        info!("remote leaderboard not configured; keeping scores local");
        return None;
    };

    match RestLeaderboardMirror::new(mirror_config, config.request_timeout()) {
        Ok(mirror) => {
            info!("remote leaderboard enabled");
            Some(Arc::new(mirror))
        }
        Err(err) => {
            warn!(error = %err, "failed to build remote leaderboard client; keeping scores local");
            None
        }
    }
}

#[cfg(all(feature = "opentdb", not(feature = "rest-mirror")))]
fn default_mirror(_config: &QuizConfig) -> Option<Arc<dyn LeaderboardMirror>> {
    None
}

/// File storage under the configured directory, otherwise process memory.
pub fn default_storage(config: &QuizConfig) -> Arc<dyn KeyValueStore> {
    match config.storage_dir() {
        Some(dir) => Arc::new(FileStore::new(dir.clone())),
        None => Arc::new(MemoryStore::new()),
    }
}
