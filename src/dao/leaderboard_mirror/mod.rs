#[cfg(feature = "rest-mirror")]
pub mod rest;

use futures::future::BoxFuture;

use crate::{
    dao::models::{Difficulty, LeaderboardEntry},
    error::RemoteResult,
};

/// Number of entries kept per tier, locally and when fetching from the mirror.
pub const LEADERBOARD_SIZE: usize = 10;

/// Optional, eventually consistent copy of the leaderboard held by a remote service.
pub trait LeaderboardMirror: Send + Sync {
    /// Top [`LEADERBOARD_SIZE`] entries of a tier, best score first.
    fn fetch_top(&self, tier: Difficulty) -> BoxFuture<'static, RemoteResult<Vec<LeaderboardEntry>>>;
    /// Record one entry under a tier.
    fn insert(
        &self,
        entry: LeaderboardEntry,
        tier: Difficulty,
    ) -> BoxFuture<'static, RemoteResult<()>>;
}
