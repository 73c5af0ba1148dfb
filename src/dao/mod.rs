//! Backends: question provider, leaderboard mirror and local storage.

/// Remote leaderboard mirror abstraction and its REST backend.
pub mod leaderboard_mirror;
/// Persisted and exchanged record types.
pub mod models;
/// Question provider abstraction and its OpenTDB backend.
pub mod question_source;
/// Key-value persistence used by the session ledgers.
pub mod storage;
