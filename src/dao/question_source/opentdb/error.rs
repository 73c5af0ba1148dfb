//! Error types raised by the OpenTDB question provider.

use reqwest::StatusCode;
use thiserror::Error;

use crate::error::ProviderError;

/// Convenient result alias returning [`OpenTdbError`] failures.
pub type OpenTdbResult<T> = Result<T, OpenTdbError>;

/// Failures that can occur while fetching questions from OpenTDB.
#[derive(Debug, Error)]
pub enum OpenTdbError {
    /// Building the HTTP client failed (invalid TLS setup, etc).
    #[error("failed to build OpenTDB client")]
    ClientBuilder {
        #[source]
        source: reqwest::Error,
    },
    /// The request could not be sent or timed out.
    #[error("failed to send OpenTDB request to `{url}`")]
    RequestSend {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    /// OpenTDB answered with a non-success HTTP status.
    #[error("unexpected OpenTDB response status {status}")]
    RequestStatus { status: StatusCode },
    /// The response body could not be read.
    #[error("failed to read OpenTDB response body")]
    ReadBody {
        #[source]
        source: reqwest::Error,
    },
    /// The response body is not the expected JSON envelope.
    #[error("failed to decode OpenTDB response")]
    DecodeBody {
        #[source]
        source: serde_json::Error,
    },
    /// OpenTDB reported a non-zero `response_code`.
    #[error("OpenTDB returned response code {code}")]
    ResponseCode { code: u8 },
    /// The envelope carried no questions.
    #[error("OpenTDB returned no questions")]
    EmptyResults,
}

/// Readable description of an OpenTDB `response_code`.
pub(super) fn describe_response_code(code: u8) -> &'static str {
    match code {
        1 => "No questions found for these filters.",
        2 => "The question request was invalid.",
        3 => "The session token was not found.",
        4 => "All questions for this session have been used.",
        5 => "Too many requests, wait a few seconds and try again.",
        _ => "Unable to load questions. Please try again.",
    }
}

impl From<OpenTdbError> for ProviderError {
    fn from(err: OpenTdbError) -> Self {
        match err {
            OpenTdbError::EmptyResults | OpenTdbError::ResponseCode { code: 1 } => {
                ProviderError::NoQuestions
            }
            OpenTdbError::ResponseCode { code } => ProviderError::Rejected {
                code,
                message: describe_response_code(code).into(),
            },
            other => ProviderError::unavailable("OpenTDB request failed".into(), other),
        }
    }
}
