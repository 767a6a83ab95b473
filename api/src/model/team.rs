use chrono::{DateTime, Utc};
use derive_new::new;
use garde::Validate;
use kernel::model::{
    id::{EventId, TeamId, UserId},
    team::{
        event::{CreateTeam, CreatedTeam},
        Team,
    },
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateTeamRequest {
    #[garde(skip)]
    pub event_id: EventId,
    #[garde(length(min = 1))]
    pub team_name: String,
}

#[derive(new)]
pub struct CreateTeamRequestWithUserId(UserId, CreateTeamRequest);

impl From<CreateTeamRequestWithUserId> for CreateTeam {
    fn from(value: CreateTeamRequestWithUserId) -> Self {
        let CreateTeamRequestWithUserId(
            requested_user,
            CreateTeamRequest {
                event_id,
                team_name,
            },
        ) = value;
        Self {
            event_id,
            team_name,
            requested_user,
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatedTeamResponse {
    pub team_id: TeamId,
    pub team_code: String,
}

impl From<CreatedTeam> for CreatedTeamResponse {
    fn from(value: CreatedTeam) -> Self {
        let CreatedTeam { team_id, team_code } = value;
        Self { team_id, team_code }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamsResponse {
    pub items: Vec<TeamResponse>,
}

impl From<Vec<Team>> for TeamsResponse {
    fn from(value: Vec<Team>) -> Self {
        Self {
            items: value.into_iter().map(TeamResponse::from).collect(),
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamResponse {
    pub team_id: TeamId,
    pub event_id: EventId,
    pub team_name: String,
    pub leader_id: UserId,
    pub members: Vec<UserId>,
    pub team_code: String,
    pub created_at: DateTime<Utc>,
}

impl From<Team> for TeamResponse {
    fn from(value: Team) -> Self {
        let Team {
            team_id,
            event_id,
            team_name,
            leader_id,
            members,
            team_code,
            created_at,
        } = value;
        Self {
            team_id,
            event_id,
            team_name,
            leader_id,
            members,
            team_code,
            created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_team_name_fails_validation() {
        let req: CreateTeamRequest = serde_json::from_value(serde_json::json!({
            "eventId": uuid::Uuid::new_v4(),
            "teamName": ""
        }))
        .unwrap();
        assert!(req.validate(&()).is_err());
    }
}
