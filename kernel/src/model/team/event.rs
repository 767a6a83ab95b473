use crate::model::id::{EventId, TeamId, UserId};
use derive_new::new;

#[derive(new, Debug)]
pub struct CreateTeam {
    pub event_id: EventId,
    pub team_name: String,
    pub requested_user: UserId,
}

#[derive(new, Debug)]
pub struct JoinTeam {
    pub team_code: String,
    pub requested_user: UserId,
}

#[derive(new, Debug)]
pub struct RemoveMember {
    pub team_id: TeamId,
    pub member_id: UserId,
    pub requested_user: UserId,
}

#[derive(new, Debug)]
pub struct DeleteTeam {
    pub team_id: TeamId,
    pub requested_user: UserId,
}

/// createTeam の結果。参加用のコードを呼び出し元へ返す。
#[derive(Debug)]
pub struct CreatedTeam {
    pub team_id: TeamId,
    pub team_code: String,
}
