//! Tracking sensor: publishes the next upcoming match of one team.

use crate::api::Catalog;
use crate::error::{Error, Result};
use crate::state::{SensorState, TrackedTeamEntry};
use serde_json::Value;
use std::sync::Arc;

/// Polls the catalog for one team, optionally within one competition.
pub struct TrackingSensor {
    catalog: Arc<dyn Catalog>,
    team_id: String,
    competition_id: Option<String>,
    state: SensorState,
}

impl TrackingSensor {
    /// Create a sensor for a tracked team.
    pub fn new(catalog: Arc<dyn Catalog>, entry: &TrackedTeamEntry) -> Self {
        Self {
            catalog,
            team_id: entry.team_id.clone(),
            competition_id: entry.competition_id.clone(),
            state: SensorState::new(entry.unique_id(), &entry.sensor_name, &entry.team_id),
        }
    }

    pub fn unique_id(&self) -> &str {
        &self.state.unique_id
    }

    pub fn name(&self) -> &str {
        &self.state.name
    }

    /// Current published state.
    pub fn state(&self) -> &SensorState {
        &self.state
    }

    /// Fetch the next match without touching the published state.
    pub async fn fetch_next_match(&self) -> Result<Value> {
        self.catalog
            .next_matches(&self.team_id, self.competition_id.as_deref())
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| {
                Error::unexpected_payload(format!("no upcoming match for team {}", self.team_id))
            })
    }

    /// Apply the outcome of a fetch.
    ///
    /// A failure only flags the sensor unavailable; the last known match
    /// and state are kept. The error is handed back for the caller to report.
    pub fn apply(&mut self, fetched: Result<Value>) -> Result<()> {
        match fetched {
            Ok(next_match) => {
                self.state.record_match(next_match);
                Ok(())
            }
            Err(e) => {
                self.state.mark_unavailable();
                Err(e)
            }
        }
    }

    /// Run one update cycle.
    pub async fn update(&mut self) -> Result<()> {
        let fetched = self.fetch_next_match().await;
        self.apply(fetched)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::fake::FakeCatalog;
    use crate::state::STATE_OK;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn sensor(catalog: &Arc<FakeCatalog>, entry: &TrackedTeamEntry) -> TrackingSensor {
        TrackingSensor::new(catalog.clone(), entry)
    }

    #[test]
    fn test_initial_state() {
        let catalog = Arc::new(FakeCatalog::new());
        let sensor = sensor(&catalog, &TrackedTeamEntry::new("t1", "Clubs A H1"));

        let state = sensor.state();
        assert_eq!(state.unique_id, "t1");
        assert_eq!(state.name, "Clubs A H1");
        assert_eq!(state.state, None);
        assert_eq!(state.attributes, json!({"team": "t1"}));
        assert!(state.available);
    }

    #[tokio::test]
    async fn test_success_adopts_first_match() {
        let catalog = Arc::new(FakeCatalog::new());
        catalog.set_matches(
            "t1k9",
            vec![json!({"id": "m1", "home": "A"}), json!({"id": "m2"})],
        );
        let mut sensor = sensor(
            &catalog,
            &TrackedTeamEntry::new("t1", "Clubs A H1").with_competition("k9"),
        );
        assert_eq!(sensor.unique_id(), "t1k9");

        sensor.update().await.unwrap();

        let state = sensor.state();
        assert_eq!(state.state.as_deref(), Some(STATE_OK));
        assert_eq!(state.attributes, json!({"id": "m1", "home": "A"}));
        assert!(state.available);
        assert!(state.last_updated.is_some());
    }

    #[tokio::test]
    async fn test_failure_keeps_previous_state() {
        let catalog = Arc::new(FakeCatalog::new());
        catalog.set_matches("t1", vec![json!({"id": "m1"})]);
        let mut sensor = sensor(&catalog, &TrackedTeamEntry::new("t1", "Clubs A H1"));
        sensor.update().await.unwrap();
        let before = sensor.state().clone();

        catalog.set_failing("t1", true);
        let err = sensor.update().await.unwrap_err();
        assert!(err.is_upstream());

        let after = sensor.state();
        assert!(!after.available);
        assert_eq!(after.state, before.state);
        assert_eq!(after.attributes, before.attributes);
        assert_eq!(after.last_updated, before.last_updated);

        catalog.set_failing("t1", false);
        sensor.update().await.unwrap();
        assert!(sensor.state().available);
    }

    #[tokio::test]
    async fn test_empty_match_list_is_a_failure() {
        let catalog = Arc::new(FakeCatalog::new());
        let mut sensor = sensor(&catalog, &TrackedTeamEntry::new("t1", "Clubs A H1"));

        let err = sensor.update().await.unwrap_err();
        assert!(matches!(err, Error::UnexpectedPayload(_)));
        assert!(!sensor.state().available);
        assert_eq!(sensor.state().attributes, json!({"team": "t1"}));
        assert_eq!(sensor.state().state, None);
    }
}
