use crate::redis::RedisClient;
use async_trait::async_trait;
use derive_new::new;
use kernel::model::{auth::AccessToken, id::UserId};
use kernel::repository::auth::AuthRepository;
use shared::error::{AppError, AppResult};
use std::str::FromStr;
use std::sync::Arc;

#[derive(new)]
pub struct AuthRepositoryImpl {
    kv: Arc<RedisClient>,
}

#[async_trait]
impl AuthRepository for AuthRepositoryImpl {
    async fn fetch_user_id_from_token(
        &self,
        access_token: &AccessToken,
    ) -> AppResult<Option<UserId>> {
        let Some(value) = self.kv.get(&auth_key(access_token)).await? else {
            return Ok(None);
        };
        let user_id = UserId::from_str(&value)
            .map_err(|e| AppError::ConversionEntityError(format!("invalid user id: {e}")))?;
        Ok(Some(user_id))
    }
}

// アイデンティティ基盤がトークン発行時に同じキーで格納する
fn auth_key(token: &AccessToken) -> String {
    format!("auth:token:{}", token.0)
}
