use std::{sync::Arc, time::Duration};

use futures::future::BoxFuture;
use reqwest::{Client, Method};

use crate::{
    dao::{
        leaderboard_mirror::{LEADERBOARD_SIZE, LeaderboardMirror},
        models::{Difficulty, LeaderboardEntry},
    },
    error::RemoteResult,
};

use super::{
    config::RestMirrorConfig,
    error::{RestMirrorError, RestMirrorResult},
    models::{LeaderboardRow, NewLeaderboardRow, SELECT_COLUMNS},
};

/// Leaderboard mirror backed by a PostgREST-style table endpoint.
#[derive(Clone)]
pub struct RestLeaderboardMirror {
    client: Client,
    table_url: Arc<str>,
    api_key: Arc<str>,
}

impl RestLeaderboardMirror {
    /// Build a mirror client for the configured table.
    pub fn new(config: RestMirrorConfig, timeout: Duration) -> RestMirrorResult<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|source| RestMirrorError::ClientBuilder { source })?;

        Ok(Self {
            client,
            table_url: Arc::from(table_url(&config)),
            api_key: Arc::from(config.api_key),
        })
    }

    fn request(&self, method: Method) -> reqwest::RequestBuilder {
        self.client
            .request(method, self.table_url.as_ref())
            .header("apikey", self.api_key.as_ref())
            .bearer_auth(self.api_key.as_ref())
    }

    async fn fetch(&self, tier: Difficulty) -> RestMirrorResult<Vec<LeaderboardEntry>> {
        let response = self
            .request(Method::GET)
            .query(&top_query(tier))
            .send()
            .await
            .map_err(|source| RestMirrorError::RequestSend { tier, source })?;

        if !response.status().is_success() {
            return Err(RestMirrorError::RequestStatus {
                tier,
                status: response.status(),
            });
        }

        let rows = response
            .json::<Vec<LeaderboardRow>>()
            .await
            .map_err(|source| RestMirrorError::DecodeResponse { tier, source })?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn push(&self, entry: LeaderboardEntry, tier: Difficulty) -> RestMirrorResult<()> {
        let response = self
            .request(Method::POST)
            .header("Prefer", "return=minimal")
            .json(&NewLeaderboardRow::new(&entry, tier))
            .send()
            .await
            .map_err(|source| RestMirrorError::RequestSend { tier, source })?;

        if response.status().is_success() {
            Ok(())
        } else {
            Err(RestMirrorError::RequestStatus {
                tier,
                status: response.status(),
            })
        }
    }
}

fn table_url(config: &RestMirrorConfig) -> String {
    format!(
        "{}/rest/v1/{}",
        config.base_url.trim_end_matches('/'),
        config.table
    )
}

fn top_query(tier: Difficulty) -> [(&'static str, String); 4] {
    [
        ("select", SELECT_COLUMNS.to_string()),
        ("difficulty", format!("eq.{}", tier.as_str())),
        ("order", "score.desc".to_string()),
        ("limit", LEADERBOARD_SIZE.to_string()),
    ]
}

impl LeaderboardMirror for RestLeaderboardMirror {
    fn fetch_top(&self, tier: Difficulty) -> BoxFuture<'static, RemoteResult<Vec<LeaderboardEntry>>> {
        let mirror = self.clone();
        Box::pin(async move { mirror.fetch(tier).await.map_err(Into::into) })
    }

    fn insert(
        &self,
        entry: LeaderboardEntry,
        tier: Difficulty,
    ) -> BoxFuture<'static, RemoteResult<()>> {
        let mirror = self.clone();
        Box::pin(async move { mirror.push(entry, tier).await.map_err(Into::into) })
    }
}
