pub mod auth;
pub mod event;
pub mod health;
pub mod registration;
pub mod team;
pub mod user;

use shared::error::{AppError, AppResult};
use sqlx::{Postgres, Transaction};

/// 複数の書き込みを伴う操作はトランザクション分離レベルを
/// SERIALIZABLE にして実行する
pub(crate) async fn set_transaction_serializable(
    tx: &mut Transaction<'_, Postgres>,
) -> AppResult<()> {
    sqlx::query("SET TRANSACTION ISOLATION LEVEL SERIALIZABLE")
        .execute(&mut **tx)
        .await
        .map_err(AppError::SpecificOperationError)?;
    Ok(())
}
