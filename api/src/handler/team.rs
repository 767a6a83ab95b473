use crate::{
    extractor::AuthorizedUser,
    model::team::{
        CreateTeamRequest, CreateTeamRequestWithUserId, CreatedTeamResponse, TeamResponse,
        TeamsResponse,
    },
};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use garde::Validate;
use kernel::model::{
    id::{TeamId, UserId},
    team::event::{DeleteTeam, JoinTeam, RemoveMember},
};
use registry::AppRegistry;
use shared::error::AppResult;

pub async fn register_team(
    user: AuthorizedUser,
    State(registry): State<AppRegistry>,
    Json(req): Json<CreateTeamRequest>,
) -> AppResult<(StatusCode, Json<CreatedTeamResponse>)> {
    req.validate(&())?;

    let create_team = CreateTeamRequestWithUserId::new(user.id(), req).into();
    registry
        .team_repository()
        .create(create_team)
        .await
        .map(|created| (StatusCode::CREATED, Json(CreatedTeamResponse::from(created))))
}

pub async fn join_team(
    user: AuthorizedUser,
    Path(team_code): Path<String>,
    State(registry): State<AppRegistry>,
) -> AppResult<Json<TeamResponse>> {
    registry
        .team_repository()
        .join(JoinTeam::new(team_code, user.id()))
        .await
        .map(TeamResponse::from)
        .map(Json)
}

// 自分が所属しているチームの一覧
pub async fn show_my_teams(
    user: AuthorizedUser,
    State(registry): State<AppRegistry>,
) -> AppResult<Json<TeamsResponse>> {
    registry
        .team_repository()
        .find_by_member(user.id())
        .await
        .map(TeamsResponse::from)
        .map(Json)
}

pub async fn remove_team_member(
    user: AuthorizedUser,
    Path((team_id, member_id)): Path<(TeamId, UserId)>,
    State(registry): State<AppRegistry>,
) -> AppResult<StatusCode> {
    registry
        .team_repository()
        .remove_member(RemoveMember::new(team_id, member_id, user.id()))
        .await
        .map(|_| StatusCode::OK)
}

pub async fn delete_team(
    user: AuthorizedUser,
    Path(team_id): Path<TeamId>,
    State(registry): State<AppRegistry>,
) -> AppResult<StatusCode> {
    registry
        .team_repository()
        .delete(DeleteTeam::new(team_id, user.id()))
        .await
        .map(|_| StatusCode::OK)
}
