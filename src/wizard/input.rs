//! Field keys, forms and typed submissions of the wizard steps.

use crate::error::Result;
use crate::form::{ChoiceSet, Field, Form, FormInput};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

pub const CLUB_NAME: &str = "club_name";
pub const TEAM_NAME: &str = "team_name";
pub const SENSOR_NAME: &str = "name";
pub const SELECT_COMPETITION: &str = "select_competition";
pub const ADD_ANOTHER: &str = "add_another";
pub const COMPETITION_NAME: &str = "competition_name";

pub const STEP_CLUB: &str = "user";
pub const STEP_TEAM: &str = "team";
pub const STEP_COMPETITION: &str = "competition";

#[derive(Debug, Deserialize)]
pub struct ClubInput {
    pub club_name: String,
}

#[derive(Debug, Deserialize)]
pub struct TeamInput {
    pub team_name: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub select_competition: bool,
    #[serde(default)]
    pub add_another: bool,
}

impl TeamInput {
    /// The user's sensor name, unless left blank.
    pub fn sensor_name(&self) -> Option<&str> {
        self.name
            .as_deref()
            .map(str::trim)
            .filter(|name| !name.is_empty())
    }
}

#[derive(Debug, Deserialize)]
pub struct CompetitionInput {
    #[serde(default)]
    pub competition_name: Option<String>,
}

impl CompetitionInput {
    pub fn selected(&self) -> Option<&str> {
        self.competition_name
            .as_deref()
            .filter(|name| !name.is_empty())
    }
}

/// Turn validated form input into a typed submission.
pub fn parse<T: DeserializeOwned>(input: FormInput) -> Result<T> {
    Ok(serde_json::from_value(Value::Object(input))?)
}

pub fn club_form(clubs: &ChoiceSet) -> Form {
    Form::new(STEP_CLUB, vec![Field::select(CLUB_NAME, clubs, true)])
}

pub fn team_form(teams: &ChoiceSet) -> Form {
    Form::new(
        STEP_TEAM,
        vec![
            Field::select(TEAM_NAME, teams, true),
            Field::text(SENSOR_NAME),
            Field::boolean(SELECT_COMPETITION),
            Field::boolean(ADD_ANOTHER),
        ],
    )
}

pub fn competition_form(competitions: &ChoiceSet) -> Form {
    Form::new(
        STEP_COMPETITION,
        vec![Field::select(COMPETITION_NAME, competitions, false)],
    )
}
