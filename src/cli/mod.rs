//! Command-line front-end.

mod prompt;

pub use prompt::Prompt;

use crate::api::{Catalog, CatalogClientBuilder};
use crate::config::Settings;
use crate::error::{Error, Result};
use crate::state::SensorState;
use crate::store::EntryStore;
use crate::tracker::{self, Tracker};
use crate::wizard::{StepOutcome, Wizard};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::io::BufReader;
use tokio::sync::mpsc;
use tracing::{info, warn};
use uuid::Uuid;

/// Follow the next match of your hockey teams.
#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
pub struct Cli {
    #[clap(long, short, global = true)]
    /// Settings file, default is platform dependent
    pub config: Option<PathBuf>,

    #[clap(subcommand)]
    command: Option<Command>,
}

impl Cli {
    /// The requested command; polling when none is given.
    pub fn command(&self) -> Command {
        self.command.clone().unwrap_or(Command::Run)
    }
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Choose a club and the teams to track
    Setup,
    /// Poll the tracked teams until Ctrl-C
    Run,
    /// List stored entries
    Entries,
    /// Remove an entry, or one sensor of it
    Remove {
        entry_id: Uuid,
        /// Unique id of the sensor to drop
        unique_id: Option<String>,
    },
    /// Show the details of a club
    Club { club_id: String },
    /// List every upcoming match of a team within a competition
    Matches {
        team_id: String,
        competition_id: String,
    },
}

/// Execute a command.
pub async fn run(command: Command, settings: Settings) -> Result<()> {
    match command {
        Command::Setup => setup(&settings).await,
        Command::Run => track(&settings).await,
        Command::Entries => list_entries(&settings),
        Command::Remove {
            entry_id,
            unique_id,
        } => remove(&settings, entry_id, unique_id.as_deref()),
        Command::Club { club_id } => {
            let info = catalog(&settings)?.club_info(&club_id).await?;
            println!("{}", serde_json::to_string_pretty(&info)?);
            Ok(())
        }
        Command::Matches {
            team_id,
            competition_id,
        } => {
            let matches = catalog(&settings)?
                .all_matches(&team_id, &competition_id)
                .await?;
            println!("{}", serde_json::to_string_pretty(&matches)?);
            Ok(())
        }
    }
}

fn catalog(settings: &Settings) -> Result<Arc<dyn Catalog>> {
    let client = CatalogClientBuilder::new()
        .config(settings.api.clone())
        .build()?;
    Ok(Arc::new(client))
}

fn open_store(settings: &Settings) -> Result<EntryStore> {
    EntryStore::open(settings.storage.entries_path()?)
}

async fn setup(settings: &Settings) -> Result<()> {
    let mut store = open_store(settings)?;
    let mut wizard = Wizard::new(catalog(settings)?);
    let mut prompt = Prompt::new(BufReader::new(tokio::io::stdin()), tokio::io::stdout());

    let mut outcome = wizard.start().await?;
    loop {
        match outcome {
            StepOutcome::Form(form) => {
                let answers = prompt.fill(&form).await?;
                outcome = wizard.submit(answers).await?;
            }
            StepOutcome::CreateEntry { title, data } => {
                let entry = store.create_entry(&title, data)?;
                prompt
                    .say(&format!(
                        "Saved entry {} tracking {} team(s).",
                        entry.entry_id,
                        entry.data.teams.len()
                    ))
                    .await?;
                return Ok(());
            }
        }
    }
}

async fn track(settings: &Settings) -> Result<()> {
    let store = open_store(settings)?;
    let catalog = catalog(settings)?;

    let (update_tx, mut update_rx) = mpsc::unbounded_channel::<SensorState>();
    let mut tracker = Tracker::new(settings.tracker.scan_interval(), update_tx);
    for entry in store.entries() {
        tracker.add_sensors(tracker::setup_entry(&catalog, entry));
    }
    tracker.add_sensors(tracker::setup_teams(&catalog, &settings.tracker.teams));

    if tracker.sensors().is_empty() {
        return Err(Error::config(
            "nothing to track; run `hockey-tracker setup` or list teams in the config file",
        ));
    }

    let reporter = tokio::spawn(async move {
        while let Some(state) = update_rx.recv().await {
            if state.available {
                info!(
                    sensor = %state.name,
                    state = state.state.as_deref().unwrap_or("unknown"),
                    next_match = %state.attributes,
                    "State updated"
                );
            } else {
                warn!(sensor = %state.name, "Sensor unavailable");
            }
        }
    });

    tracker
        .run(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                warn!("Could not listen for Ctrl-C: {}", e);
                std::future::pending::<()>().await;
            }
        })
        .await?;

    drop(tracker);
    if let Err(e) = reporter.await {
        warn!("State reporter ended abnormally: {}", e);
    }
    Ok(())
}

fn list_entries(settings: &Settings) -> Result<()> {
    let store = open_store(settings)?;
    if store.entries().is_empty() {
        println!("No entries in {}", store.path().display());
        return Ok(());
    }

    for entry in store.entries() {
        println!(
            "{}  {}  (created {})",
            entry.entry_id,
            entry.title,
            entry.created_at.format("%Y-%m-%d %H:%M")
        );
        for team in &entry.effective_config().teams {
            println!("    {:<16} {}", team.unique_id(), team.sensor_name);
        }
    }
    Ok(())
}

fn remove(settings: &Settings, entry_id: Uuid, unique_id: Option<&str>) -> Result<()> {
    let mut store = open_store(settings)?;
    match unique_id {
        Some(unique_id) => {
            store.remove_team(entry_id, unique_id)?;
            println!("Removed sensor {unique_id} from entry {entry_id}");
        }
        None => {
            store.remove_entry(entry_id)?;
            println!("Removed entry {entry_id}");
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn parse(args: &[&str]) -> std::result::Result<Cli, clap::Error> {
        Cli::try_parse_from(std::iter::once("hockey-tracker").chain(args.iter().copied()))
    }

    #[test]
    fn test_default_command_is_run() {
        let cli = parse(&[]).unwrap();
        assert_eq!(cli.command(), Command::Run);
        assert_eq!(cli.config, None);
    }

    #[test]
    fn test_config_flag_after_subcommand() {
        let cli = parse(&["setup", "--config", "/tmp/tracker.toml"]).unwrap();
        assert_eq!(cli.command(), Command::Setup);
        assert_eq!(cli.config, Some(PathBuf::from("/tmp/tracker.toml")));
    }

    #[test]
    fn test_remove_with_sensor() {
        let id = Uuid::new_v4();
        let cli = parse(&["-c", "tracker.toml", "remove", &id.to_string(), "t1k9"]).unwrap();
        assert_eq!(
            cli.command(),
            Command::Remove {
                entry_id: id,
                unique_id: Some("t1k9".to_string())
            }
        );
    }

    #[test]
    fn test_help_on_subcommand() {
        let err = parse(&["setup", "--help"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::DisplayHelp);
    }

    #[test]
    fn test_usage_errors() {
        assert!(parse(&["remove", "nope"]).is_err());
        assert!(parse(&["matches", "t1"]).is_err());
        assert!(parse(&["entries", "extra"]).is_err());
        assert!(parse(&["--verbose"]).is_err());
        assert!(parse(&["--config"]).is_err());
    }
}
