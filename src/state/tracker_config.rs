//! The persisted configuration document and the entries that hold it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Title of every entry created by the setup wizard.
pub const ENTRY_TITLE: &str = "Hockey Team Tracker";

/// One tracked team, optionally narrowed to a single competition.
///
/// Serialized as `{"team": .., "name": .., "competition": ..}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackedTeamEntry {
    /// Catalog id of the team.
    #[serde(rename = "team")]
    pub team_id: String,
    /// Display name of the sensor tracking this team.
    #[serde(rename = "name")]
    pub sensor_name: String,
    /// Catalog id of the competition, if only that competition is tracked.
    #[serde(
        rename = "competition",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub competition_id: Option<String>,
}

impl TrackedTeamEntry {
    /// Create an entry tracking all competitions of a team.
    pub fn new(team_id: impl Into<String>, sensor_name: impl Into<String>) -> Self {
        Self {
            team_id: team_id.into(),
            sensor_name: sensor_name.into(),
            competition_id: None,
        }
    }

    /// Narrow the entry to one competition.
    pub fn with_competition(mut self, competition_id: impl Into<String>) -> Self {
        self.competition_id = Some(competition_id.into());
        self
    }

    /// Unique id of the sensor built from this entry: team id, followed by
    /// the competition id when there is one.
    pub fn unique_id(&self) -> String {
        match &self.competition_id {
            Some(competition) => format!("{}{}", self.team_id, competition),
            None => self.team_id.clone(),
        }
    }
}

/// Configuration produced by the setup wizard.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackerConfig {
    /// Tracked teams, in the order they were added.
    pub teams: Vec<TrackedTeamEntry>,
}

impl TrackerConfig {
    /// Append a team and return its index.
    pub fn push_team(&mut self, entry: TrackedTeamEntry) -> usize {
        self.teams.push(entry);
        self.teams.len() - 1
    }

    pub fn is_empty(&self) -> bool {
        self.teams.is_empty()
    }
}

/// A persisted wizard result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfigEntry {
    /// Unique entry id.
    pub entry_id: Uuid,
    /// Entry title.
    pub title: String,
    /// Configuration as created by the wizard.
    pub data: TrackerConfig,
    /// Later changes; when present they replace `data` for sensor setup.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<TrackerConfig>,
    /// Creation time.
    pub created_at: DateTime<Utc>,
}

impl ConfigEntry {
    /// Create a new entry with a fresh id.
    pub fn new(title: impl Into<String>, data: TrackerConfig) -> Self {
        Self {
            entry_id: Uuid::new_v4(),
            title: title.into(),
            data,
            options: None,
            created_at: Utc::now(),
        }
    }

    /// The configuration sensors should be built from.
    pub fn effective_config(&self) -> &TrackerConfig {
        self.options.as_ref().unwrap_or(&self.data)
    }
}
