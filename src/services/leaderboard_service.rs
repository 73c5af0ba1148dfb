use futures::future::try_join3;
use tracing::{info, warn};

use crate::{
    dao::{
        leaderboard_mirror::LeaderboardMirror,
        models::{Difficulty, LeaderboardEntry, LeaderboardMap},
    },
    error::RemoteResult,
    state::SharedState,
};

/// Record an entry in the local ledger. Never fails; persistence errors are logged.
pub async fn apply_local_entry(state: &SharedState, entry: LeaderboardEntry, tier: Difficulty) {
    state.leaderboard().write().await.apply_local_entry(entry, tier);
}

/// Copy of the local buckets.
pub async fn leaderboards(state: &SharedState) -> LeaderboardMap {
    state.leaderboard().read().await.map().clone()
}

/// Replace the local ledger with the mirror's top entries of every tier.
///
/// No-op without a mirror. A failure on any tier leaves the local ledger untouched.
pub async fn sync_from_remote(state: &SharedState) -> RemoteResult<()> {
    let Some(mirror) = state.mirror() else {
        return Ok(());
    };

    let map = fetch_all(mirror.as_ref()).await?;
    state.leaderboard().write().await.replace_all(map);
    info!("local leaderboards replaced with the remote view");
    Ok(())
}

/// Insert an entry remotely, then pull the merged view. Failures are logged only.
pub async fn push_entry_to_remote(state: SharedState, entry: LeaderboardEntry, tier: Difficulty) {
    let Some(mirror) = state.mirror() else {
        return;
    };

    if let Err(err) = mirror.insert(entry, tier).await {
        warn!(%tier, error = %err, "failed to push leaderboard entry; keeping it local only");
        return;
    }

    if let Err(err) = sync_from_remote(&state).await {
        warn!(error = %err, "failed to refresh leaderboards after push");
    }
}

/// Best-effort sync run once when a session starts.
pub async fn initialize(state: &SharedState) {
    if let Err(err) = sync_from_remote(state).await {
        warn!(error = %err, "initial leaderboard sync failed; using local leaderboards");
    }
}

async fn fetch_all(mirror: &dyn LeaderboardMirror) -> RemoteResult<LeaderboardMap> {
    let (easy, medium, hard) = try_join3(
        mirror.fetch_top(Difficulty::Easy),
        mirror.fetch_top(Difficulty::Medium),
        mirror.fetch_top(Difficulty::Hard),
    )
    .await?;
    Ok(LeaderboardMap { easy, medium, hard })
}
