//! Runtime state of one tracking sensor.

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::{Value, json};

/// State literal published after a successful update.
pub const STATE_OK: &str = "OK";

/// Published state of a tracking sensor.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SensorState {
    /// Team id, followed by the competition id when there is one.
    pub unique_id: String,
    /// Display name.
    pub name: String,
    /// `"OK"` once a match was fetched, unset before that.
    pub state: Option<String>,
    /// The next match as returned by the catalog.
    pub attributes: Value,
    /// Whether the last update succeeded.
    pub available: bool,
    /// Time of the last successful update.
    pub last_updated: Option<DateTime<Utc>>,
}

impl SensorState {
    /// Initial state: no match yet, attributes only carry the team id.
    pub fn new(unique_id: impl Into<String>, name: impl Into<String>, team_id: &str) -> Self {
        Self {
            unique_id: unique_id.into(),
            name: name.into(),
            state: None,
            attributes: json!({ "team": team_id }),
            available: true,
            last_updated: None,
        }
    }

    /// Adopt a freshly fetched match.
    pub fn record_match(&mut self, next_match: Value) {
        self.attributes = next_match;
        self.state = Some(STATE_OK.to_string());
        self.available = true;
        self.last_updated = Some(Utc::now());
    }

    /// Flag the sensor unavailable, keeping the last known match.
    pub fn mark_unavailable(&mut self) {
        self.available = false;
    }
}
