//! Error kinds surfaced by question loading and remote leaderboard calls.

use std::error::Error as StdError;

use thiserror::Error;

use crate::dao::models::Difficulty;

/// Result alias for question provider calls.
pub type ProviderResult<T> = Result<T, ProviderError>;

/// Result alias for remote leaderboard calls.
pub type RemoteResult<T> = Result<T, RemoteLeaderboardError>;

/// Failures while loading a question set.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// Network, HTTP or decoding failure.
    #[error("question provider unavailable: {message}")]
    Unavailable {
        message: String,
        #[source]
        source: Box<dyn StdError + Send + Sync>,
    },
    /// The provider answered but refused the request.
    #[error("question provider rejected the request (code {code}): {message}")]
    Rejected { code: u8, message: String },
    /// The provider returned an empty or absent question list.
    #[error("no questions returned for the selected filters")]
    NoQuestions,
    /// A returned question cannot be played (blank or missing answers).
    #[error("question {index} of the returned set is malformed")]
    Malformed { index: usize },
}

impl ProviderError {
    /// Construct an unavailable error from any transport failure.
    pub fn unavailable(message: String, source: impl StdError + Send + Sync + 'static) -> Self {
        ProviderError::Unavailable {
            message,
            source: Box::new(source),
        }
    }

    /// Text shown to the player while the round sits in the error status.
    pub fn user_message(&self) -> String {
        match self {
            ProviderError::Unavailable { .. } => {
                "Unable to load questions. Please try again.".into()
            }
            ProviderError::Rejected { message, .. } => message.clone(),
            ProviderError::NoQuestions => "No questions found for these filters.".into(),
            ProviderError::Malformed { .. } => {
                "The question set could not be used. Please try again.".into()
            }
        }
    }
}

/// Failures while talking to the remote leaderboard mirror.
#[derive(Debug, Error)]
pub enum RemoteLeaderboardError {
    /// Network, HTTP or decoding failure.
    #[error("remote leaderboard unavailable: {message}")]
    Unavailable {
        message: String,
        #[source]
        source: Box<dyn StdError + Send + Sync>,
    },
    /// The mirror refused the operation for a tier.
    #[error("remote leaderboard rejected {tier} request: {message}")]
    Rejected { tier: Difficulty, message: String },
}

impl RemoteLeaderboardError {
    /// Construct an unavailable error from any transport failure.
    pub fn unavailable(message: String, source: impl StdError + Send + Sync + 'static) -> Self {
        RemoteLeaderboardError::Unavailable {
            message,
            source: Box::new(source),
        }
    }
}

/// Errors returned by the service layer for caller mistakes.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// Invalid input provided by the caller.
    #[error("invalid input: {0}")]
    InvalidInput(String),
}

/// Failures while wiring a session from configuration.
#[derive(Debug, Error)]
pub enum SetupError {
    /// The question provider client could not be built.
    #[error("failed to set up the question provider")]
    Provider(#[source] ProviderError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_messages_are_readable() {
        assert_eq!(
            ProviderError::NoQuestions.user_message(),
            "No questions found for these filters."
        );
        let rejected = ProviderError::Rejected {
            code: 5,
            message: "Too many requests, wait a few seconds.".into(),
        };
        assert_eq!(
            rejected.user_message(),
            "Too many requests, wait a few seconds."
        );
        let io = std::io::Error::other("connection reset");
        assert_eq!(
            ProviderError::unavailable("GET failed".into(), io).user_message(),
            "Unable to load questions. Please try again."
        );
    }
}
