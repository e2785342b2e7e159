//! Data conversion utilities for API responses.

use super::types::{Club, Competition, Team};
use crate::form::ChoiceSet;
use crate::state::{ClubRef, CompetitionRef, TeamRef};

/// Converts API responses to internal types.
pub struct DataConverter;

impl DataConverter {
    /// Convert a catalog club to a wizard club reference.
    pub fn convert_club(club: Club) -> ClubRef {
        ClubRef {
            name: club.name,
            id: club.id,
        }
    }

    /// Convert a catalog team, labelling it `"<short_name> <type>"`.
    pub fn convert_team(team: Team) -> TeamRef {
        TeamRef {
            display_name: Self::team_label(&team),
            id: team.id,
        }
    }

    /// Convert a catalog competition.
    pub fn convert_competition(competition: Competition) -> CompetitionRef {
        CompetitionRef {
            name: competition.name,
            id: competition.id,
        }
    }

    /// Label under which a team is offered for selection.
    pub fn team_label(team: &Team) -> String {
        format!("{} {}", team.short_name, team.kind)
    }

    /// Clubs keyed by name.
    pub fn club_choices(clubs: Vec<Club>) -> ChoiceSet {
        clubs
            .into_iter()
            .map(Self::convert_club)
            .map(|club| (club.name, club.id))
            .collect()
    }

    /// Teams keyed by their composite label.
    pub fn team_choices(teams: Vec<Team>) -> ChoiceSet {
        teams
            .into_iter()
            .map(Self::convert_team)
            .map(|team| (team.display_name, team.id))
            .collect()
    }

    /// Competitions keyed by name.
    pub fn competition_choices(competitions: Vec<Competition>) -> ChoiceSet {
        competitions
            .into_iter()
            .map(Self::convert_competition)
            .map(|competition| (competition.name, competition.id))
            .collect()
    }
}
