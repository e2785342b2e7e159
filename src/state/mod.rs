//! Data model shared by the wizard, the sensors and the entry store.

mod sensor_state;
mod tracker_config;

pub use sensor_state::{STATE_OK, SensorState};
pub use tracker_config::{ConfigEntry, ENTRY_TITLE, TrackedTeamEntry, TrackerConfig};

/// A club picked in the wizard. Only lives as long as the wizard run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClubRef {
    pub name: String,
    pub id: String,
}

/// A team as presented in the wizard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TeamRef {
    /// `"<short_name> <type>"`, the selection key within one club.
    pub display_name: String,
    pub id: String,
}

/// A competition as presented in the wizard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompetitionRef {
    pub name: String,
    pub id: String,
}
