//! # Hockey Tracker
//!
//! Tracks the next upcoming match of selected teams in the HockeyWeerelt
//! publication API.
//!
//! ## Architecture
//!
//! - **Wizard**: multi-step setup choosing a club, its teams and optionally
//!   one competition per team
//! - **Sensor**: polls the next match of one team and publishes it
//! - **Tracker**: runs all sensors on a fixed interval
//! - **API**: catalog contract and its HTTP client
//! - **Form**: closed-choice forms the wizard renders and validates
//! - **State**: persisted configuration and runtime sensor state
//! - **Store**: file-backed config entries
//! - **Config**: settings management

pub mod api;
pub mod cli;
pub mod config;
pub mod error;
pub mod form;
pub mod sensor;
pub mod state;
pub mod store;
pub mod tracker;
pub mod wizard;

pub use api::{Catalog, CatalogClient};
pub use config::Settings;
pub use error::{Error, Result};
pub use sensor::TrackingSensor;
pub use state::{ConfigEntry, SensorState, TrackedTeamEntry, TrackerConfig};
pub use tracker::Tracker;
pub use wizard::{StepOutcome, Wizard};
