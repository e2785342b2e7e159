//! Setup wizard for choosing the teams to track.
//!
//! The wizard is a state machine with one state per catalog-dependent
//! choice:
//!
//! ```text
//! AwaitingClub -> AwaitingTeam -> [AwaitingCompetition] -> Done
//!                      ^                  |
//!                      +--- add another --+
//! ```
//!
//! Entering a state fetches its choices from the catalog and builds a
//! [`ChoiceSet`]; the submission for that state is resolved against the very
//! same set. Catalog failures end the step with an error and are not retried.

pub mod input;

use crate::api::{Catalog, DataConverter};
use crate::error::{Error, Result};
use crate::form::{BASE_ERROR, ChoiceSet, Form, FormInput, reason};
use crate::state::{ClubRef, ENTRY_TITLE, TrackedTeamEntry, TrackerConfig};
use input::{ClubInput, CompetitionInput, TeamInput};
use std::sync::Arc;
use tracing::{debug, info};

/// Steps of the wizard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WizardStep {
    Club,
    Team,
    Competition,
    Done,
}

/// What the front-end should do next.
#[derive(Debug, Clone, PartialEq)]
pub enum StepOutcome {
    /// Render this form and submit the user's answer.
    Form(Form),
    /// Setup is complete; persist this entry.
    CreateEntry { title: String, data: TrackerConfig },
}

#[derive(Debug)]
enum State {
    NotStarted,
    AwaitingClub { clubs: ChoiceSet },
    AwaitingTeam { teams: ChoiceSet },
    AwaitingCompetition { competitions: ChoiceSet, target: usize },
    Done,
}

/// Values needed across steps that are never persisted.
#[derive(Debug, Default)]
struct Scratch {
    club: Option<ClubRef>,
    add_another: bool,
}

/// One interactive setup run.
pub struct Wizard {
    catalog: Arc<dyn Catalog>,
    state: State,
    data: TrackerConfig,
    scratch: Scratch,
    form: Option<Form>,
}

impl Wizard {
    /// Create a wizard that looks choices up in `catalog`.
    pub fn new(catalog: Arc<dyn Catalog>) -> Self {
        Self {
            catalog,
            state: State::NotStarted,
            data: TrackerConfig::default(),
            scratch: Scratch::default(),
            form: None,
        }
    }

    /// Current step, or `None` before [`Wizard::start`].
    pub fn step(&self) -> Option<WizardStep> {
        match self.state {
            State::NotStarted => None,
            State::AwaitingClub { .. } => Some(WizardStep::Club),
            State::AwaitingTeam { .. } => Some(WizardStep::Team),
            State::AwaitingCompetition { .. } => Some(WizardStep::Competition),
            State::Done => Some(WizardStep::Done),
        }
    }

    /// Configuration collected so far.
    pub fn data(&self) -> &TrackerConfig {
        &self.data
    }

    /// Begin the run by presenting the club choice.
    pub async fn start(&mut self) -> Result<StepOutcome> {
        if !matches!(self.state, State::NotStarted) {
            return Err(Error::invalid_state("wizard already started"));
        }
        self.enter_club().await
    }

    /// Submit the user's answer to the form last rendered.
    ///
    /// Input that does not fit the form re-renders it with the offending
    /// field flagged, leaving the wizard where it was. Only the latest
    /// rejection is flagged; earlier ones are dropped.
    pub async fn submit(&mut self, user_input: FormInput) -> Result<StepOutcome> {
        // The step's form as first rendered, notices included.
        let form = self
            .form
            .clone()
            .ok_or_else(|| Error::invalid_state("no step awaiting input"))?;

        let user_input = match form.validate(user_input) {
            Ok(valid) => valid,
            Err(Error::Validation { field, reason }) => {
                debug!("Rejected input for step {}: {} {}", form.step_id, field, reason);
                return Ok(StepOutcome::Form(form.with_error(field, reason)));
            }
            Err(e) => return Err(e),
        };

        match self.state {
            State::AwaitingClub { .. } => self.submit_club(input::parse(user_input)?).await,
            State::AwaitingTeam { .. } => self.submit_team(input::parse(user_input)?).await,
            State::AwaitingCompetition { .. } => {
                self.submit_competition(input::parse(user_input)?).await
            }
            State::NotStarted | State::Done => {
                Err(Error::invalid_state("no step awaiting input"))
            }
        }
    }

    async fn enter_club(&mut self) -> Result<StepOutcome> {
        let clubs = non_empty(
            DataConverter::club_choices(self.catalog.list_clubs().await?),
            "no clubs found",
        )?;
        debug!("Presenting {} clubs", clubs.len());

        let form = input::club_form(&clubs);
        self.state = State::AwaitingClub { clubs };
        Ok(self.render(form))
    }

    async fn submit_club(&mut self, submission: ClubInput) -> Result<StepOutcome> {
        let State::AwaitingClub { clubs } = &self.state else {
            return Err(Error::invalid_state("not awaiting a club"));
        };
        let club = ClubRef {
            id: resolve(clubs, input::CLUB_NAME, &submission.club_name)?,
            name: submission.club_name,
        };

        info!("Selected club {} ({})", club.name, club.id);
        self.data.teams.clear();
        self.scratch.club = Some(club);
        self.enter_team().await
    }

    async fn enter_team(&mut self) -> Result<StepOutcome> {
        let club = self
            .scratch
            .club
            .as_ref()
            .ok_or_else(|| Error::invalid_state("no club selected"))?;

        let teams = non_empty(
            DataConverter::team_choices(self.catalog.club_teams(&club.id).await?),
            format!("club {} has no teams", club.name),
        )?;
        debug!("Presenting {} teams of club {}", teams.len(), club.id);

        let form = input::team_form(&teams);
        self.state = State::AwaitingTeam { teams };
        Ok(self.render(form))
    }

    async fn submit_team(&mut self, submission: TeamInput) -> Result<StepOutcome> {
        let State::AwaitingTeam { teams } = &self.state else {
            return Err(Error::invalid_state("not awaiting a team"));
        };
        let team_id = resolve(teams, input::TEAM_NAME, &submission.team_name)?;
        let club = self
            .scratch
            .club
            .as_ref()
            .ok_or_else(|| Error::invalid_state("no club selected"))?;

        let sensor_name = match submission.sensor_name() {
            Some(name) => name.to_string(),
            None => format!("{} {}", club.name, submission.team_name),
        };

        info!("Tracking team {} as '{}'", team_id, sensor_name);
        let target = self
            .data
            .push_team(TrackedTeamEntry::new(team_id, sensor_name));
        self.scratch.add_another = submission.add_another;

        if submission.select_competition {
            return self.enter_competition(target).await;
        }
        self.next_team_or_finish().await
    }

    async fn enter_competition(&mut self, target: usize) -> Result<StepOutcome> {
        let team_id = self
            .data
            .teams
            .get(target)
            .map(|entry| entry.team_id.clone())
            .ok_or_else(|| Error::invalid_state("no team to attach a competition to"))?;

        let info = self.catalog.team_info(&team_id).await?;
        let (competitions, notice) = match non_empty(
            DataConverter::competition_choices(info.competitions),
            format!("team {team_id} has no competitions"),
        ) {
            Ok(competitions) => (competitions, None),
            Err(Error::EmptyResult(msg)) => {
                debug!("{}", msg);
                (ChoiceSet::new(), Some(reason::EMPTY_LIST))
            }
            Err(e) => return Err(e),
        };
        debug!("Presenting {} competitions of team {}", competitions.len(), team_id);

        let mut form = input::competition_form(&competitions);
        if let Some(notice) = notice {
            form = form.with_error(BASE_ERROR, notice);
        }

        self.state = State::AwaitingCompetition {
            competitions,
            target,
        };
        Ok(self.render(form))
    }

    async fn submit_competition(&mut self, submission: CompetitionInput) -> Result<StepOutcome> {
        let State::AwaitingCompetition {
            competitions,
            target,
        } = &self.state
        else {
            return Err(Error::invalid_state("not awaiting a competition"));
        };

        if let Some(name) = submission.selected() {
            let competition_id = resolve(competitions, input::COMPETITION_NAME, name)?;
            let entry = self
                .data
                .teams
                .get_mut(*target)
                .ok_or_else(|| Error::invalid_state("tracked team vanished"))?;

            info!("Narrowing team {} to competition {}", entry.team_id, competition_id);
            entry.competition_id = Some(competition_id);
        }

        self.next_team_or_finish().await
    }

    async fn next_team_or_finish(&mut self) -> Result<StepOutcome> {
        if self.scratch.add_another {
            return self.enter_team().await;
        }
        self.finish()
    }

    fn finish(&mut self) -> Result<StepOutcome> {
        if self.data.is_empty() {
            return Err(Error::invalid_state("no team selected"));
        }

        info!("Setup complete with {} team(s)", self.data.teams.len());
        self.state = State::Done;
        self.form = None;
        Ok(StepOutcome::CreateEntry {
            title: ENTRY_TITLE.to_string(),
            data: self.data.clone(),
        })
    }

    /// Enter a step by rendering its form.
    fn render(&mut self, form: Form) -> StepOutcome {
        self.form = Some(form.clone());
        StepOutcome::Form(form)
    }
}

fn non_empty(choices: ChoiceSet, msg: impl Into<String>) -> Result<ChoiceSet> {
    if choices.is_empty() {
        return Err(Error::empty_result(msg));
    }
    Ok(choices)
}

fn resolve(choices: &ChoiceSet, field: &str, label: &str) -> Result<String> {
    choices
        .resolve(label)
        .map(str::to_string)
        .ok_or_else(|| Error::validation(field, reason::INVALID_CHOICE))
}
