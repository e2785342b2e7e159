//! Persisted config entries.
//!
//! Entries live in a single JSON document. Every change is written back
//! immediately.

use crate::error::{Error, Result};
use crate::state::{ConfigEntry, TrackerConfig};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::info;
use uuid::Uuid;

const STORE_VERSION: u32 = 1;

#[derive(Debug, Default, Serialize, Deserialize)]
struct StoreFile {
    version: u32,
    entries: Vec<ConfigEntry>,
}

/// File-backed store of config entries.
#[derive(Debug)]
pub struct EntryStore {
    path: PathBuf,
    entries: Vec<ConfigEntry>,
}

impl EntryStore {
    /// Open the store at `path`; a missing file is an empty store.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let entries = if path.exists() {
            let content = std::fs::read_to_string(&path)?;
            let file: StoreFile = serde_json::from_str(&content)?;
            if file.version > STORE_VERSION {
                return Err(Error::config(format!(
                    "entry store {} has unsupported version {}",
                    path.display(),
                    file.version
                )));
            }
            file.entries
        } else {
            Vec::new()
        };

        Ok(Self { path, entries })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn entries(&self) -> &[ConfigEntry] {
        &self.entries
    }

    pub fn get(&self, entry_id: Uuid) -> Option<&ConfigEntry> {
        self.entries.iter().find(|entry| entry.entry_id == entry_id)
    }

    /// Persist a wizard result as a new entry.
    pub fn create_entry(&mut self, title: &str, data: TrackerConfig) -> Result<&ConfigEntry> {
        if data.is_empty() {
            return Err(Error::invalid_state("an entry needs at least one team"));
        }

        let entry = ConfigEntry::new(title, data);
        info!("Created entry {} with {} team(s)", entry.entry_id, entry.data.teams.len());
        self.entries.push(entry);
        self.save()?;

        let last = self.entries.len() - 1;
        Ok(&self.entries[last])
    }

    /// Replace the options of an entry.
    pub fn set_options(&mut self, entry_id: Uuid, options: TrackerConfig) -> Result<()> {
        let entry = self.get_mut(entry_id)?;
        entry.options = Some(options);
        self.save()
    }

    /// Stop tracking one team of an entry. Removing its last team removes
    /// the entry.
    pub fn remove_team(&mut self, entry_id: Uuid, unique_id: &str) -> Result<()> {
        let mut config = self
            .get(entry_id)
            .ok_or_else(|| Error::EntryNotFound(entry_id.to_string()))?
            .effective_config()
            .clone();

        let before = config.teams.len();
        config.teams.retain(|team| team.unique_id() != unique_id);
        if config.teams.len() == before {
            return Err(Error::EntryNotFound(format!("{entry_id}/{unique_id}")));
        }

        if config.is_empty() {
            self.remove_entry(entry_id)?;
            return Ok(());
        }

        self.set_options(entry_id, config)
    }

    /// Remove an entry and every sensor it configures.
    pub fn remove_entry(&mut self, entry_id: Uuid) -> Result<ConfigEntry> {
        let index = self
            .entries
            .iter()
            .position(|entry| entry.entry_id == entry_id)
            .ok_or_else(|| Error::EntryNotFound(entry_id.to_string()))?;

        let entry = self.entries.remove(index);
        info!("Removed entry {}", entry_id);
        self.save()?;
        Ok(entry)
    }

    fn get_mut(&mut self, entry_id: Uuid) -> Result<&mut ConfigEntry> {
        self.entries
            .iter_mut()
            .find(|entry| entry.entry_id == entry_id)
            .ok_or_else(|| Error::EntryNotFound(entry_id.to_string()))
    }

    fn save(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let file = StoreFile {
            version: STORE_VERSION,
            entries: self.entries.clone(),
        };
        let content = serde_json::to_string_pretty(&file)?;

        // Replace atomically.
        let tmp = self.path.with_extension("json.tmp");
        std::fs::write(&tmp, content)?;
        std::fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::{ENTRY_TITLE, TrackedTeamEntry};
    use pretty_assertions::assert_eq;

    fn config(teams: &[(&str, Option<&str>)]) -> TrackerConfig {
        TrackerConfig {
            teams: teams
                .iter()
                .map(|(team, competition)| {
                    let entry = TrackedTeamEntry::new(*team, format!("Clubs A {team}"));
                    match competition {
                        Some(competition) => entry.with_competition(*competition),
                        None => entry,
                    }
                })
                .collect(),
        }
    }

    #[test]
    fn test_entries_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("entries.json");

        let entry_id = {
            let mut store = EntryStore::open(&path).unwrap();
            assert!(store.entries().is_empty());
            store
                .create_entry(ENTRY_TITLE, config(&[("t1", None), ("t2", Some("k1"))]))
                .unwrap()
                .entry_id
        };

        let store = EntryStore::open(&path).unwrap();
        let entry = store.get(entry_id).unwrap();
        assert_eq!(entry.title, ENTRY_TITLE);
        assert_eq!(entry.data, config(&[("t1", None), ("t2", Some("k1"))]));
        assert_eq!(entry.options, None);
    }

    #[test]
    fn test_empty_config_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = EntryStore::open(dir.path().join("entries.json")).unwrap();

        let err = store
            .create_entry(ENTRY_TITLE, TrackerConfig::default())
            .unwrap_err();
        assert!(matches!(err, Error::InvalidState(_)));
    }

    #[test]
    fn test_remove_team_then_last_team_removes_entry() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = EntryStore::open(dir.path().join("entries.json")).unwrap();
        let entry_id = store
            .create_entry(ENTRY_TITLE, config(&[("t1", None), ("t2", Some("k1"))]))
            .unwrap()
            .entry_id;

        store.remove_team(entry_id, "t2k1").unwrap();
        let entry = store.get(entry_id).unwrap();
        assert_eq!(entry.effective_config(), &config(&[("t1", None)]));
        // The original wizard result is kept as-is.
        assert_eq!(entry.data.teams.len(), 2);

        assert!(matches!(
            store.remove_team(entry_id, "t9"),
            Err(Error::EntryNotFound(_))
        ));

        store.remove_team(entry_id, "t1").unwrap();
        assert!(store.get(entry_id).is_none());
    }

    #[test]
    fn test_remove_unknown_entry() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = EntryStore::open(dir.path().join("entries.json")).unwrap();

        assert!(matches!(
            store.remove_entry(Uuid::new_v4()),
            Err(Error::EntryNotFound(_))
        ));
    }
}
