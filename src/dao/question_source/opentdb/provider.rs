use std::{sync::Arc, time::Duration};

use futures::future::BoxFuture;
use reqwest::Client;
use tracing::debug;

use crate::{
    dao::question_source::{QuestionProvider, QuestionRequest, RawQuestion},
    error::ProviderResult,
};

use super::{
    error::{OpenTdbError, OpenTdbResult},
    models::parse_body,
};

const QUESTION_TYPE: &str = "multiple";

/// Fetches question sets from the Open Trivia Database HTTP API.
#[derive(Clone)]
pub struct OpenTdbProvider {
    client: Client,
    endpoint: Arc<str>,
}

impl OpenTdbProvider {
    /// Build a provider targeting `endpoint` (the full `api.php` URL).
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> OpenTdbResult<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|source| OpenTdbError::ClientBuilder { source })?;

        Ok(Self {
            client,
            endpoint: Arc::from(endpoint.into()),
        })
    }

    async fn fetch(&self, request: QuestionRequest) -> OpenTdbResult<Vec<RawQuestion>> {
        let query = query_pairs(&request);
        debug!(endpoint = %self.endpoint, ?query, "requesting questions");

        let response = self
            .client
            .get(self.endpoint.as_ref())
            .query(&query)
            .send()
            .await
            .map_err(|source| OpenTdbError::RequestSend {
                url: self.endpoint.to_string(),
                source,
            })?;

        if !response.status().is_success() {
            return Err(OpenTdbError::RequestStatus {
                status: response.status(),
            });
        }

        let body = response
            .text()
            .await
            .map_err(|source| OpenTdbError::ReadBody { source })?;

        parse_body(&body)
    }
}

/// Query string for a request; `category` is only sent when filtering.
fn query_pairs(request: &QuestionRequest) -> Vec<(&'static str, String)> {
    let mut query = vec![
        ("amount", request.amount.to_string()),
        ("type", QUESTION_TYPE.to_string()),
    ];
    if let Some(category) = &request.category {
        query.push(("category", category.clone()));
    }
    query.push(("difficulty", request.difficulty.as_str().to_string()));
    query
}

impl QuestionProvider for OpenTdbProvider {
    fn fetch_questions(
        &self,
        request: QuestionRequest,
    ) -> BoxFuture<'static, ProviderResult<Vec<RawQuestion>>> {
        let provider = self.clone();
        Box::pin(async move { provider.fetch(request).await.map_err(Into::into) })
    }
}
