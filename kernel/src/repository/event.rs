use crate::model::{
    event::{
        event::{CreateEvent, DeleteEvent, UpdateEvent},
        Event,
    },
    id::{EventId, UserId},
};
use async_trait::async_trait;
use shared::error::AppResult;

#[async_trait]
pub trait EventRepository: Send + Sync {
    async fn create(&self, event: CreateEvent, user_id: UserId) -> AppResult<EventId>;
    // すべてのイベントを新しい順に取得する
    async fn find_all(&self) -> AppResult<Vec<Event>>;
    async fn find_by_id(&self, event_id: EventId) -> AppResult<Option<Event>>;
    // 自分が主催しているイベントの一覧
    async fn find_hosted_by(&self, user_id: UserId) -> AppResult<Vec<Event>>;
    // 登録経由で参加しているイベントの一覧
    async fn find_participated_by(&self, user_id: UserId) -> AppResult<Vec<Event>>;
    async fn update(&self, event: UpdateEvent) -> AppResult<()>;
    // 削除は登録・チームへカスケードする
    async fn delete(&self, event: DeleteEvent) -> AppResult<()>;
}
