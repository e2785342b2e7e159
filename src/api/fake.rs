//! In-memory catalog for tests.

use super::Catalog;
use super::types::{Club, Competition, Team, TeamInfo};
use crate::error::{Error, Result};
use async_trait::async_trait;
use serde_json::{Map, Value};
use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

#[derive(Default)]
pub struct FakeCatalog {
    clubs: Mutex<Vec<Club>>,
    teams: Mutex<HashMap<String, Vec<Team>>>,
    competitions: Mutex<HashMap<String, Vec<Competition>>>,
    matches: Mutex<HashMap<String, Vec<Value>>>,
    failing: Mutex<HashSet<String>>,
    calls: Mutex<Vec<String>>,
}

impl FakeCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_club(self, id: &str, name: &str) -> Self {
        self.clubs.lock().unwrap().push(Club {
            id: id.to_string(),
            name: name.to_string(),
        });
        self
    }

    pub fn with_team(self, club_id: &str, id: &str, short_name: &str, kind: &str) -> Self {
        self.teams
            .lock()
            .unwrap()
            .entry(club_id.to_string())
            .or_default()
            .push(Team {
                id: id.to_string(),
                short_name: short_name.to_string(),
                kind: kind.to_string(),
            });
        self
    }

    pub fn with_competition(self, team_id: &str, id: &str, name: &str) -> Self {
        self.competitions
            .lock()
            .unwrap()
            .entry(team_id.to_string())
            .or_default()
            .push(Competition {
                id: id.to_string(),
                name: name.to_string(),
            });
        self
    }

    /// Matches served for `team_id` (or `team_id` + competition id).
    pub fn set_matches(&self, key: &str, matches: Vec<Value>) {
        self.matches
            .lock()
            .unwrap()
            .insert(key.to_string(), matches);
    }

    /// Make every lookup touching `key` (a team or club id, or "clubs") fail.
    pub fn set_failing(&self, key: &str, failing: bool) {
        let mut set = self.failing.lock().unwrap();
        if failing {
            set.insert(key.to_string());
        } else {
            set.remove(key);
        }
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: String, key: &str) -> Result<()> {
        self.calls.lock().unwrap().push(call);
        if self.failing.lock().unwrap().contains(key) {
            return Err(Error::network(format!("{key} unreachable")));
        }
        Ok(())
    }
}

#[async_trait]
impl Catalog for FakeCatalog {
    async fn list_clubs(&self) -> Result<Vec<Club>> {
        self.record("list_clubs".to_string(), "clubs")?;
        Ok(self.clubs.lock().unwrap().clone())
    }

    async fn club_info(&self, club_id: &str) -> Result<Value> {
        self.record(format!("club_info:{club_id}"), club_id)?;
        Ok(Value::Object(Map::new()))
    }

    async fn club_teams(&self, club_id: &str) -> Result<Vec<Team>> {
        self.record(format!("club_teams:{club_id}"), club_id)?;
        Ok(self
            .teams
            .lock()
            .unwrap()
            .get(club_id)
            .cloned()
            .unwrap_or_default())
    }

    async fn team_info(&self, team_id: &str) -> Result<TeamInfo> {
        self.record(format!("team_info:{team_id}"), team_id)?;
        Ok(TeamInfo {
            competitions: self
                .competitions
                .lock()
                .unwrap()
                .get(team_id)
                .cloned()
                .unwrap_or_default(),
            details: Map::new(),
        })
    }

    async fn next_matches(
        &self,
        team_id: &str,
        competition_id: Option<&str>,
    ) -> Result<Vec<Value>> {
        self.record(format!("next_matches:{team_id}"), team_id)?;
        let key = format!("{}{}", team_id, competition_id.unwrap_or_default());
        Ok(self
            .matches
            .lock()
            .unwrap()
            .get(&key)
            .cloned()
            .unwrap_or_default())
    }

    async fn all_matches(&self, team_id: &str, competition_id: &str) -> Result<Vec<Value>> {
        self.next_matches(team_id, Some(competition_id)).await
    }
}
