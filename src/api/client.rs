//! HockeyWeerelt catalog client.

use super::Catalog;
use super::pages::collect_pages;
use super::types::{Club, Envelope, Page, Team, TeamInfo};
use crate::config::ApiConfig;
use crate::error::Result;
use async_trait::async_trait;
use reqwest::RequestBuilder;
use reqwest::header::ACCEPT;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::debug;

/// Builder for creating a catalog client.
pub struct CatalogClientBuilder {
    config: ApiConfig,
}

impl CatalogClientBuilder {
    /// Create a new builder with default config.
    pub fn new() -> Self {
        Self {
            config: ApiConfig::default(),
        }
    }

    /// Set the API configuration.
    pub fn config(mut self, config: ApiConfig) -> Self {
        self.config = config;
        self
    }

    /// Build the catalog client.
    pub fn build(self) -> Result<CatalogClient> {
        CatalogClient::new(&self.config)
    }
}

impl Default for CatalogClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Stateless client for the public catalog.
///
/// Cloning is cheap and clones share one connection pool, so a single
/// client can serve the wizard and every sensor at once.
#[derive(Debug, Clone)]
pub struct CatalogClient {
    base_url: String,
    http: reqwest::Client,
}

impl CatalogClient {
    /// Create a new client with its own HTTP session.
    pub fn new(config: &ApiConfig) -> Result<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.timeout() {
            builder = builder.timeout(timeout);
        }

        Ok(Self::with_http(config, builder.build()?))
    }

    /// Create a client on top of an existing HTTP session.
    pub fn with_http(config: &ApiConfig, http: reqwest::Client) -> Self {
        Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            http,
        }
    }

    /// Base URL requests are sent to.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// GET request for `path`.
    fn request(&self, path: &str, query: &[(&str, &str)]) -> RequestBuilder {
        self.http
            .get(self.url(path))
            .query(query)
            .header(ACCEPT, "application/json")
    }

    fn next_matches_request(&self, team_id: &str, competition_id: Option<&str>) -> RequestBuilder {
        let mut query = vec![("show_all", "0")];
        if let Some(competition_id) = competition_id {
            query.push(("competition_id", competition_id));
        }
        self.request(&upcoming_matches_path(team_id), &query)
    }

    fn match_page_request(&self, team_id: &str, competition_id: &str, page: u32) -> RequestBuilder {
        let page = page.to_string();
        self.request(
            &upcoming_matches_path(team_id),
            &[
                ("competition_id", competition_id),
                ("show_all", "1"),
                ("page", page.as_str()),
            ],
        )
    }

    async fn fetch<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T> {
        let body: Value = request
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        Ok(serde_json::from_value(body)?)
    }

    async fn fetch_match_page(
        &self,
        team_id: &str,
        competition_id: &str,
        page: u32,
    ) -> Result<Page<Value>> {
        debug!("Fetching match page {} of team {}", page, team_id);
        self.fetch(self.match_page_request(team_id, competition_id, page))
            .await
    }
}

fn upcoming_matches_path(team_id: &str) -> String {
    format!("/mc/teams/{team_id}/matches/upcoming")
}

#[async_trait]
impl Catalog for CatalogClient {
    async fn list_clubs(&self) -> Result<Vec<Club>> {
        let clubs: Envelope<Vec<Club>> = self.fetch(self.request("/mc/clubs", &[])).await?;
        Ok(clubs.data)
    }

    async fn club_info(&self, club_id: &str) -> Result<Value> {
        let request = self.request(&format!("/mc/clubs/{club_id}"), &[]);
        let info: Envelope<Value> = self.fetch(request).await?;
        Ok(info.data)
    }

    async fn club_teams(&self, club_id: &str) -> Result<Vec<Team>> {
        let request = self.request(&format!("/mc/clubs/{club_id}/teams"), &[]);
        let teams: Envelope<Vec<Team>> = self.fetch(request).await?;
        Ok(teams.data)
    }

    async fn team_info(&self, team_id: &str) -> Result<TeamInfo> {
        let request = self.request(&format!("/mc/teams/{team_id}"), &[]);
        let info: Envelope<TeamInfo> = self.fetch(request).await?;
        Ok(info.data)
    }

    async fn next_matches(
        &self,
        team_id: &str,
        competition_id: Option<&str>,
    ) -> Result<Vec<Value>> {
        debug!("Fetching upcoming matches of team {}", team_id);
        let request = self.next_matches_request(team_id, competition_id);
        let matches: Envelope<Vec<Value>> = self.fetch(request).await?;
        Ok(matches.data)
    }

    async fn all_matches(&self, team_id: &str, competition_id: &str) -> Result<Vec<Value>> {
        collect_pages(|page| self.fetch_match_page(team_id, competition_id, page)).await
    }
}
