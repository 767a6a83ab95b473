use crate::model::{
    id::{EventId, UserId},
    registration::{
        event::{RegisterForEvent, UnregisterFromEvent},
        Registration, RegistrationReceipt,
    },
};
use async_trait::async_trait;
use shared::error::AppResult;

#[async_trait]
pub trait RegistrationRepository: Send + Sync {
    // 参加登録を行う。定員チェックとカウンタ加算は単一の条件付き更新で行われる。
    async fn register(&self, event: RegisterForEvent) -> AppResult<RegistrationReceipt>;
    // 参加登録を解除し、登録が占めていた人数分だけカウンタを戻す
    async fn unregister(&self, event: UnregisterFromEvent) -> AppResult<()>;
    // 主催者向けの参加者一覧（登録の新しい順）
    async fn find_by_event(
        &self,
        event_id: EventId,
        requested_user: UserId,
    ) -> AppResult<Vec<Registration>>;
}
