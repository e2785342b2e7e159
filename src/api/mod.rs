//! HockeyWeerelt catalog integration.
//!
//! This module provides the catalog contract used by the wizard and the
//! sensors, the HTTP client implementing it, and conversion of the raw
//! payloads into wizard choices.

mod client;
mod converter;
mod pages;
pub mod types;

#[cfg(test)]
pub(crate) mod fake;

pub use client::{CatalogClient, CatalogClientBuilder};
pub use converter::DataConverter;
pub use pages::collect_pages;
pub use types::{Club, Competition, Team, TeamInfo};

use crate::error::Result;
use async_trait::async_trait;
use serde_json::Value;

/// Read-only lookups against the club catalog.
///
/// Implementations must be usable from many tasks at once; one instance is
/// shared by every sensor.
#[async_trait]
pub trait Catalog: Send + Sync {
    /// All clubs.
    async fn list_clubs(&self) -> Result<Vec<Club>>;

    /// Raw details of one club.
    async fn club_info(&self, club_id: &str) -> Result<Value>;

    /// Teams of one club.
    async fn club_teams(&self, club_id: &str) -> Result<Vec<Team>>;

    /// Details of one team, including its competitions.
    async fn team_info(&self, team_id: &str) -> Result<TeamInfo>;

    /// Upcoming matches of a team, optionally within one competition.
    /// The first element is the next match.
    async fn next_matches(&self, team_id: &str, competition_id: Option<&str>)
    -> Result<Vec<Value>>;

    /// Every upcoming match of a team within a competition, across all pages.
    async fn all_matches(&self, team_id: &str, competition_id: &str) -> Result<Vec<Value>>;
}
