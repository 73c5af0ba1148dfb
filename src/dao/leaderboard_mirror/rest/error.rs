//! Error types shared by the REST leaderboard mirror.

use reqwest::StatusCode;
use thiserror::Error;

use crate::{dao::models::Difficulty, error::RemoteLeaderboardError};

/// Convenient result alias returning [`RestMirrorError`] failures.
pub type RestMirrorResult<T> = Result<T, RestMirrorError>;

/// Failures that can occur while interacting with the leaderboard table.
#[derive(Debug, Error)]
pub enum RestMirrorError {
    /// Building the HTTP client failed (invalid TLS setup, etc).
    #[error("failed to build leaderboard client")]
    ClientBuilder {
        #[source]
        source: reqwest::Error,
    },
    /// A request could not be sent.
    #[error("failed to send leaderboard request for {tier}")]
    RequestSend {
        tier: Difficulty,
        #[source]
        source: reqwest::Error,
    },
    /// The table endpoint returned an unexpected status code.
    #[error("unexpected leaderboard response status {status} for {tier}")]
    RequestStatus { tier: Difficulty, status: StatusCode },
    /// Response payload could not be decoded into rows.
    #[error("failed to decode leaderboard rows for {tier}")]
    DecodeResponse {
        tier: Difficulty,
        #[source]
        source: reqwest::Error,
    },
}

impl From<RestMirrorError> for RemoteLeaderboardError {
    fn from(err: RestMirrorError) -> Self {
        match err {
            RestMirrorError::RequestStatus { tier, status } if status.is_client_error() => {
                RemoteLeaderboardError::Rejected {
                    tier,
                    message: format!("status {status}"),
                }
            }
            other => RemoteLeaderboardError::unavailable("leaderboard request failed".into(), other),
        }
    }
}
