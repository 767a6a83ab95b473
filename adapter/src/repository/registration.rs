use crate::database::{
    is_unique_violation,
    model::{
        event::EventRow,
        registration::{RegistrationRow, REGISTRATION_TYPE_INDIVIDUAL, REGISTRATION_TYPE_TEAM},
    },
    ConnectionPool,
};
use crate::repository::{set_transaction_serializable, team::insert_team};
use async_trait::async_trait;
use derive_new::new;
use kernel::model::{
    event::Event,
    id::{EventId, RegistrationId, UserId},
    registration::{
        event::{RegisterForEvent, RegistrationPayload, UnregisterFromEvent},
        Registration, RegistrationReceipt,
    },
};
use kernel::repository::registration::RegistrationRepository;
use shared::error::{AppError, AppResult};
use sqlx::types::Json;
use sqlx::{Postgres, Transaction};

const UNIQUE_REGISTRATION: &str = "registrations_user_id_event_id_key";

#[derive(new)]
pub struct RegistrationRepositoryImpl {
    db: ConnectionPool,
}

#[async_trait]
impl RegistrationRepository for RegistrationRepositoryImpl {
    // 参加登録を行う。
    // 事前チェックをすべて通過した場合のみ書き込みに進み、
    // 書き込みは 1 つのトランザクションにまとめる。
    async fn register(&self, event: RegisterForEvent) -> AppResult<RegistrationReceipt> {
        let mut tx = self.db.begin().await?;
        set_transaction_serializable(&mut tx).await?;

        // ① イベントの存在確認
        let Some(target) = find_event(&mut tx, event.event_id).await? else {
            return Err(AppError::EntityNotFound("Event not found.".into()));
        };

        // ② 管理者は参加登録できない
        event.ensure_registrant_allowed()?;

        // ③ 二重登録の確認。ここを同時にすり抜けた場合は
        //    (user_id, event_id) の一意制約が INSERT を弾く
        let duplicated = sqlx::query_scalar::<_, bool>(
            r#"
                SELECT EXISTS (
                    SELECT 1 FROM registrations
                    WHERE user_id = $1 AND event_id = $2
                )
            "#,
        )
        .bind(event.user_id)
        .bind(event.event_id)
        .fetch_one(&mut *tx)
        .await
        .map_err(AppError::SpecificOperationError)?;

        if duplicated {
            return Err(AppError::ResourceConflict(
                "You have already registered for this event.".into(),
            ));
        }

        // ④ 入力内容・チーム人数・定員の事前検証
        let admission = event.admission(&target)?;

        // ⑤ 定員チェック付きでカウンタを加算する。
        //    check-then-increment を 1 文の条件付き UPDATE で行い、
        //    並行登録による定員超過を防ぐ
        if !increment_participants(&mut tx, event.event_id, admission.seats).await? {
            return Err(capacity_error(&event.payload));
        }

        // ⑥ 登録レコード（チーム登録の場合はチームレコードも）を作成する
        let registration_id = RegistrationId::new();
        let receipt = match event.payload {
            RegistrationPayload::Individual { participant } => {
                let res = sqlx::query(
                    r#"
                        INSERT INTO registrations
                        (registration_id, event_id, user_id, registration_type,
                         name, email, phone)
                        VALUES ($1, $2, $3, $4, $5, $6, $7)
                    "#,
                )
                .bind(registration_id)
                .bind(event.event_id)
                .bind(event.user_id)
                .bind(REGISTRATION_TYPE_INDIVIDUAL)
                .bind(&participant.name)
                .bind(&participant.email)
                .bind(&participant.phone)
                .execute(&mut *tx)
                .await;
                map_registration_insert(res)?;

                RegistrationReceipt {
                    registration_id,
                    team_id: None,
                    team_code: None,
                }
            }
            RegistrationPayload::Team {
                team_name,
                participants,
            } => {
                let created =
                    insert_team(&mut tx, event.event_id, &team_name, event.user_id).await?;
                let res = sqlx::query(
                    r#"
                        INSERT INTO registrations
                        (registration_id, event_id, user_id, registration_type,
                         team_id, team_name, participants)
                        VALUES ($1, $2, $3, $4, $5, $6, $7)
                    "#,
                )
                .bind(registration_id)
                .bind(event.event_id)
                .bind(event.user_id)
                .bind(REGISTRATION_TYPE_TEAM)
                .bind(created.team_id)
                .bind(&team_name)
                .bind(Json(&participants))
                .execute(&mut *tx)
                .await;
                map_registration_insert(res)?;

                RegistrationReceipt {
                    registration_id,
                    team_id: Some(created.team_id),
                    team_code: Some(created.team_code),
                }
            }
        };

        tx.commit().await.map_err(AppError::TransactionError)?;

        Ok(receipt)
    }

    // 参加登録を解除する。
    // 登録時に加算した人数と同じだけカウンタを戻す（個人 1、チームは人数分）。
    async fn unregister(&self, event: UnregisterFromEvent) -> AppResult<()> {
        let mut tx = self.db.begin().await?;
        set_transaction_serializable(&mut tx).await?;

        let row = sqlx::query_as::<_, RegistrationRow>(
            r#"
                SELECT
                registration_id, event_id, user_id, registration_type,
                name, email, phone, team_id, team_name, participants,
                registered_at
                FROM registrations
                WHERE user_id = $1 AND event_id = $2
            "#,
        )
        .bind(event.user_id)
        .bind(event.event_id)
        .fetch_optional(&mut *tx)
        .await
        .map_err(AppError::SpecificOperationError)?;

        let Some(row) = row else {
            return Err(AppError::EntityNotFound(
                "You are not registered for this event.".into(),
            ));
        };
        let registration = Registration::try_from(row)?;
        let seats = registration.seats();

        let res = sqlx::query(
            r#"
                DELETE FROM registrations WHERE registration_id = $1
            "#,
        )
        .bind(registration.registration_id)
        .execute(&mut *tx)
        .await
        .map_err(AppError::SpecificOperationError)?;

        if res.rows_affected() < 1 {
            return Err(AppError::NoRowsAffectedError(
                "No registration record has been deleted".into(),
            ));
        }

        // チーム登録の解除ではチームも解散する。
        // 登録レコードを先に消してから外部キー制約に従って削除する
        if let Some(team_id) = registration.team_id() {
            sqlx::query(
                r#"
                    DELETE FROM teams WHERE team_id = $1
                "#,
            )
            .bind(team_id)
            .execute(&mut *tx)
            .await
            .map_err(AppError::SpecificOperationError)?;
        }

        sqlx::query(
            r#"
                UPDATE events
                SET participants_count = GREATEST(participants_count - $2, 0),
                    updated_at = now()
                WHERE event_id = $1
            "#,
        )
        .bind(event.event_id)
        .bind(seats)
        .execute(&mut *tx)
        .await
        .map_err(AppError::SpecificOperationError)?;

        tx.commit().await.map_err(AppError::TransactionError)?;

        Ok(())
    }

    // 主催者向けの参加者一覧を登録の新しい順に返す
    async fn find_by_event(
        &self,
        event_id: EventId,
        requested_user: UserId,
    ) -> AppResult<Vec<Registration>> {
        let created_by = sqlx::query_scalar::<_, UserId>(
            r#"
                SELECT created_by FROM events WHERE event_id = $1
            "#,
        )
        .bind(event_id)
        .fetch_optional(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)?;

        let Some(created_by) = created_by else {
            return Err(AppError::EntityNotFound("Event not found.".into()));
        };
        if created_by != requested_user {
            return Err(AppError::ForbiddenOperation(
                "Only the host can view registrations for this event.".into(),
            ));
        }

        let rows = sqlx::query_as::<_, RegistrationRow>(
            r#"
                SELECT
                registration_id, event_id, user_id, registration_type,
                name, email, phone, team_id, team_name, participants,
                registered_at
                FROM registrations
                WHERE event_id = $1
                ORDER BY registered_at DESC
            "#,
        )
        .bind(event_id)
        .fetch_all(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)?;

        rows.into_iter().map(Registration::try_from).collect()
    }
}

async fn find_event(
    tx: &mut Transaction<'_, Postgres>,
    event_id: EventId,
) -> AppResult<Option<Event>> {
    let row = sqlx::query_as::<_, EventRow>(
        r#"
            SELECT
            e.event_id,
            e.title,
            e.description,
            e.event_date,
            e.location,
            e.category,
            e.created_by AS organizer_id,
            u.user_name AS organizer_name,
            e.is_team_event,
            e.max_team_size,
            e.max_participants,
            e.participants_count,
            e.created_at
            FROM events AS e
            INNER JOIN users AS u ON e.created_by = u.user_id
            WHERE e.event_id = $1
        "#,
    )
    .bind(event_id)
    .fetch_optional(&mut **tx)
    .await
    .map_err(AppError::SpecificOperationError)?;

    row.map(Event::try_from).transpose()
}

/// 空きがある場合に限りカウンタを加算する。
/// max_participants = 0（定員なし）の場合は常に加算される。
async fn increment_participants(
    tx: &mut Transaction<'_, Postgres>,
    event_id: EventId,
    seats: i32,
) -> AppResult<bool> {
    let res = sqlx::query(
        r#"
            UPDATE events
            SET participants_count = participants_count + $2,
                updated_at = now()
            WHERE event_id = $1
              AND (
                max_participants = 0
                OR participants_count + $2 <= max_participants
              )
        "#,
    )
    .bind(event_id)
    .bind(seats)
    .execute(&mut **tx)
    .await
    .map_err(AppError::SpecificOperationError)?;

    Ok(res.rows_affected() == 1)
}

fn capacity_error(payload: &RegistrationPayload) -> AppError {
    match payload {
        RegistrationPayload::Individual { .. } => {
            AppError::CapacityExceeded("Event is full.".into())
        }
        RegistrationPayload::Team { .. } => {
            AppError::CapacityExceeded("Not enough capacity left for this team.".into())
        }
    }
}

fn map_registration_insert(
    res: Result<sqlx::postgres::PgQueryResult, sqlx::Error>,
) -> AppResult<()> {
    match res {
        Ok(done) if done.rows_affected() == 1 => Ok(()),
        Ok(_) => Err(AppError::NoRowsAffectedError(
            "No registration record has been created".into(),
        )),
        // 事前チェックとすれ違いで入った同時登録は Conflict として返す
        Err(e) if is_unique_violation(&e, UNIQUE_REGISTRATION) => Err(AppError::ResourceConflict(
            "You have already registered for this event.".into(),
        )),
        Err(e) => Err(AppError::SpecificOperationError(e)),
    }
}
