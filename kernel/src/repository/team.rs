use crate::model::{
    id::UserId,
    team::{
        event::{CreateTeam, CreatedTeam, DeleteTeam, JoinTeam, RemoveMember},
        Team,
    },
};
use async_trait::async_trait;
use shared::error::AppResult;

#[async_trait]
pub trait TeamRepository: Send + Sync {
    async fn create(&self, event: CreateTeam) -> AppResult<CreatedTeam>;
    async fn join(&self, event: JoinTeam) -> AppResult<Team>;
    // 自分が所属しているチームの一覧
    async fn find_by_member(&self, user_id: UserId) -> AppResult<Vec<Team>>;
    async fn remove_member(&self, event: RemoveMember) -> AppResult<()>;
    async fn delete(&self, event: DeleteTeam) -> AppResult<()>;
}
