use chrono::{DateTime, Utc};
use kernel::model::{
    id::{EventId, TeamId, UserId},
    team::Team,
};

#[derive(Debug, sqlx::FromRow)]
pub struct TeamRow {
    pub team_id: TeamId,
    pub event_id: EventId,
    pub team_name: String,
    pub leader_id: UserId,
    pub members: Vec<UserId>,
    pub team_code: String,
    pub created_at: DateTime<Utc>,
}

impl From<TeamRow> for Team {
    fn from(value: TeamRow) -> Self {
        let TeamRow {
            team_id,
            event_id,
            team_name,
            leader_id,
            members,
            team_code,
            created_at,
        } = value;
        Team {
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
