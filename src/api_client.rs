use std::env;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue};
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::client::StatsApi;
use crate::error::{EnvVarError, Error, JsonError};
use crate::types::*;

pub const API_URL_VAR: &str = "MATCHBOARD_API_URL";

pub struct StatsApiClient {
    client: reqwest::Client,
    base_url: String,
}

impl StatsApiClient {
    // requires MATCHBOARD_API_URL env var
    // can use dotenv
    pub fn new() -> Result<Self, Error> {
        let base_url = env::var(API_URL_VAR).map_err(|e| EnvVarError::new(API_URL_VAR, e))?;
        Ok(Self::with_base_url(base_url))
    }

    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        let mut headers = HeaderMap::new();
        headers.insert("accept", HeaderValue::from_static("application/json"));

        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }

        Self {
            client: reqwest::Client::builder()
                .default_headers(headers)
                .build()
                .unwrap(),
            base_url,
        }
    }

    /// GET a path under the backend and parse the body as JSON. The body is
    /// parsed whatever the status code; a non-JSON error page surfaces as a
    /// parse failure, not a status error.
    async fn get<T: DeserializeOwned>(&self, path_and_query: &str) -> Result<T, Error> {
        let url = format!("{}{}", self.base_url, path_and_query);
        debug!("GET {url}");
        let body = self.client.get(&url).send().await?.text().await?;
        serde_json::from_str(&body).map_err(|e| Error::from(JsonError::new(&url, e)))
    }
}

#[async_trait]
impl StatsApi for StatsApiClient {
    async fn seasons(&self) -> Result<Vec<Season>, Error> {
        self.get("/api/seasons").await
    }

    async fn leagues(&self) -> Result<Vec<League>, Error> {
        self.get("/api/leagues").await
    }

    async fn top_teams(&self, season: &str) -> Result<TopTeams, Error> {
        self.get(&format!("/api/top-teams?season={season}")).await
    }

    async fn top_players(&self, season: &str) -> Result<Vec<PlayerStats>, Error> {
        self.get(&format!("/api/top-players?season={season}")).await
    }

    async fn league_matches(
        &self,
        league_id: u32,
        season: &str,
        page: u32,
        limit: u32,
    ) -> Result<LeagueMatches, Error> {
        self.get(&format!(
            "/api/matches?league_id={league_id}&season={season}&page={page}&limit={limit}"
        ))
        .await
    }
}
