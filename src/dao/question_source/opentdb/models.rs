use serde::Deserialize;

use crate::dao::question_source::RawQuestion;

use super::error::{OpenTdbError, OpenTdbResult};

/// Envelope returned by `api.php`.
#[derive(Debug, Deserialize)]
pub struct ApiResponse {
    pub response_code: u8,
    #[serde(default)]
    pub results: Option<Vec<RawQuestion>>,
}

impl ApiResponse {
    /// Unwrap the question list, turning provider-level failures into errors.
    pub fn into_questions(self) -> OpenTdbResult<Vec<RawQuestion>> {
        if self.response_code != 0 {
            return Err(OpenTdbError::ResponseCode {
                code: self.response_code,
            });
        }

        match self.results {
            Some(results) if !results.is_empty() => Ok(results),
            _ => Err(OpenTdbError::EmptyResults),
        }
    }
}

/// Parse a raw response body into the question list.
pub fn parse_body(body: &str) -> OpenTdbResult<Vec<RawQuestion>> {
    serde_json::from_str::<ApiResponse>(body)
        .map_err(|source| OpenTdbError::DecodeBody { source })?
        .into_questions()
}
