//! Operations on a shared session.

/// Leaderboard recording and remote reconciliation.
pub mod leaderboard_service;
/// Round lifecycle, answers, power-ups and auto-advance.
pub mod round_service;

#[cfg(test)]
pub(crate) mod testing;
