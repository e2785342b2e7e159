//! Periodic polling of all tracking sensors.
//!
//! The tracker owns every sensor, runs their update cycles concurrently on a
//! fixed interval and publishes each resulting state over a channel. A
//! failing sensor is logged here and otherwise left alone; it never stops
//! its siblings or the loop.

use crate::api::Catalog;
use crate::error::Result;
use crate::sensor::TrackingSensor;
use crate::state::{ConfigEntry, SensorState, TrackedTeamEntry};
use futures::future::join_all;
use std::collections::HashSet;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::{Instant, MissedTickBehavior};
use tracing::{debug, info, warn};

/// Outcome of one polling round.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickSummary {
    pub updated: usize,
    pub failed: usize,
}

/// Sensors for every team of a stored entry.
pub fn setup_entry(catalog: &Arc<dyn Catalog>, entry: &ConfigEntry) -> Vec<TrackingSensor> {
    setup_teams(catalog, &entry.effective_config().teams)
}

/// Sensors for a plain list of tracked teams.
pub fn setup_teams(catalog: &Arc<dyn Catalog>, teams: &[TrackedTeamEntry]) -> Vec<TrackingSensor> {
    teams
        .iter()
        .map(|team| TrackingSensor::new(catalog.clone(), team))
        .collect()
}

/// Fixed-interval scheduler for tracking sensors.
pub struct Tracker {
    sensors: Vec<TrackingSensor>,
    scan_interval: Duration,
    update_tx: mpsc::UnboundedSender<SensorState>,
}

impl Tracker {
    /// Create a tracker publishing state updates on `update_tx`.
    pub fn new(scan_interval: Duration, update_tx: mpsc::UnboundedSender<SensorState>) -> Self {
        Self {
            sensors: Vec::new(),
            scan_interval,
            update_tx,
        }
    }

    /// Add sensors. A sensor whose unique id is already tracked is skipped.
    pub fn add_sensors(&mut self, sensors: impl IntoIterator<Item = TrackingSensor>) {
        let mut known: HashSet<String> = self
            .sensors
            .iter()
            .map(|sensor| sensor.unique_id().to_string())
            .collect();

        for sensor in sensors {
            if known.insert(sensor.unique_id().to_string()) {
                debug!("Tracking sensor {} ({})", sensor.name(), sensor.unique_id());
                self.sensors.push(sensor);
            } else {
                warn!("Skipping duplicate sensor {}", sensor.unique_id());
            }
        }
    }

    pub fn sensors(&self) -> &[TrackingSensor] {
        &self.sensors
    }

    /// Update every sensor once, concurrently, and publish the results.
    pub async fn update_all(&mut self) -> TickSummary {
        let results = join_all(self.sensors.iter_mut().map(|sensor| async move {
            let result = sensor.update().await;
            (sensor, result)
        }))
        .await;

        let mut summary = TickSummary::default();
        for (sensor, result) in results {
            match result {
                Ok(()) => summary.updated += 1,
                Err(e) => {
                    summary.failed += 1;
                    warn!(
                        "Error retrieving data from HockeyWeerelt for sensor {}: {}",
                        sensor.name(),
                        e
                    );
                }
            }

            if self.update_tx.send(sensor.state().clone()).is_err() {
                debug!("No listener for state of {}", sensor.unique_id());
            }
        }

        summary
    }

    /// Poll until `shutdown` resolves.
    ///
    /// Sensors are updated once right away, then every scan interval.
    pub async fn run(&mut self, shutdown: impl Future<Output = ()>) -> Result<()> {
        info!(
            "Tracking {} sensor(s) every {}s",
            self.sensors.len(),
            self.scan_interval.as_secs()
        );
        tokio::pin!(shutdown);

        let summary = self.update_all().await;
        debug!("Initial update: {:?}", summary);

        let mut interval =
            tokio::time::interval_at(Instant::now() + self.scan_interval, self.scan_interval);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = interval.tick() => {
                    let summary = self.update_all().await;
                    debug!("Update round: {:?}", summary);
                }
                _ = &mut shutdown => {
                    info!("Tracker stopped");
                    break;
                }
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::fake::FakeCatalog;
    use crate::state::{ENTRY_TITLE, TrackerConfig};
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn tracked(catalog: &Arc<FakeCatalog>, teams: &[TrackedTeamEntry]) -> Tracker {
        let (tx, _rx) = mpsc::unbounded_channel();
        let catalog: Arc<dyn Catalog> = catalog.clone();
        let mut tracker = Tracker::new(Duration::from_secs(600), tx);
        tracker.add_sensors(setup_teams(&catalog, teams));
        tracker
    }

    #[tokio::test]
    async fn test_one_failure_does_not_affect_siblings() {
        let catalog = Arc::new(FakeCatalog::new());
        catalog.set_matches("t1", vec![json!({"id": "m1"})]);
        catalog.set_matches("t3", vec![json!({"id": "m3"})]);
        catalog.set_failing("t2", true);

        let (tx, mut rx) = mpsc::unbounded_channel();
        let shared: Arc<dyn Catalog> = catalog.clone();
        let mut tracker = Tracker::new(Duration::from_secs(600), tx);
        tracker.add_sensors(setup_teams(
            &shared,
            &[
                TrackedTeamEntry::new("t1", "one"),
                TrackedTeamEntry::new("t2", "two"),
                TrackedTeamEntry::new("t3", "three"),
            ],
        ));

        let summary = tracker.update_all().await;
        assert_eq!(summary, TickSummary { updated: 2, failed: 1 });

        let mut published = Vec::new();
        while let Ok(state) = rx.try_recv() {
            published.push((state.unique_id, state.available));
        }
        assert_eq!(
            published,
            vec![
                ("t1".to_string(), true),
                ("t2".to_string(), false),
                ("t3".to_string(), true),
            ]
        );
        assert_eq!(tracker.sensors()[2].state().attributes, json!({"id": "m3"}));
    }

    #[tokio::test]
    async fn test_duplicate_sensors_are_skipped() {
        let catalog = Arc::new(FakeCatalog::new());
        let tracker = tracked(
            &catalog,
            &[
                TrackedTeamEntry::new("t1", "one"),
                TrackedTeamEntry::new("t1", "again"),
                TrackedTeamEntry::new("t1", "cup").with_competition("k1"),
            ],
        );

        let ids: Vec<&str> = tracker.sensors().iter().map(|s| s.unique_id()).collect();
        assert_eq!(ids, vec!["t1", "t1k1"]);
    }

    #[test]
    fn test_setup_entry_prefers_options() {
        let catalog: Arc<dyn Catalog> = Arc::new(FakeCatalog::new());
        let mut entry = ConfigEntry::new(
            ENTRY_TITLE,
            TrackerConfig {
                teams: vec![TrackedTeamEntry::new("t1", "one")],
            },
        );
        entry.options = Some(TrackerConfig {
            teams: vec![
                TrackedTeamEntry::new("t2", "two"),
                TrackedTeamEntry::new("t3", "three"),
            ],
        });

        let sensors = setup_entry(&catalog, &entry);
        let ids: Vec<&str> = sensors.iter().map(|s| s.unique_id()).collect();
        assert_eq!(ids, vec!["t2", "t3"]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_run_polls_on_interval_until_shutdown() {
        let catalog = Arc::new(FakeCatalog::new());
        catalog.set_matches("t1", vec![json!({"id": "m1"})]);
        let mut tracker = tracked(&catalog, &[TrackedTeamEntry::new("t1", "one")]);

        // Initial round plus two interval rounds fit before shutdown.
        let shutdown = tokio::time::sleep(Duration::from_secs(1500));
        tracker.run(shutdown).await.unwrap();

        let rounds = catalog
            .calls()
            .iter()
            .filter(|call| call.as_str() == "next_matches:t1")
            .count();
        assert_eq!(rounds, 3);
    }
}
