use crate::database::{model::event::EventRow, ConnectionPool};
use crate::repository::set_transaction_serializable;
use async_trait::async_trait;
use derive_new::new;
use kernel::model::{
    event::{
        event::{CreateEvent, DeleteEvent, UpdateEvent},
        Event, DEFAULT_MAX_TEAM_SIZE,
    },
    id::{EventId, UserId},
};
use kernel::repository::event::EventRepository;
use shared::error::{AppError, AppResult};

#[derive(new)]
pub struct EventRepositoryImpl {
    db: ConnectionPool,
}

#[async_trait]
impl EventRepository for EventRepositoryImpl {
    async fn create(&self, event: CreateEvent, user_id: UserId) -> AppResult<EventId> {
        let event_id = EventId::new();
        let res = sqlx::query(
            r#"
                INSERT INTO events
                (event_id, title, description, event_date, location, category,
                 created_by, is_team_event, max_team_size, max_participants)
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            "#,
        )
        .bind(event_id)
        .bind(event.title)
        .bind(event.description)
        .bind(event.event_date)
        .bind(event.location)
        .bind(event.category.as_ref())
        .bind(user_id)
        .bind(event.is_team_event)
        .bind(event.max_team_size.unwrap_or(DEFAULT_MAX_TEAM_SIZE))
        .bind(event.max_participants)
        .execute(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)?;

        if res.rows_affected() < 1 {
            return Err(AppError::NoRowsAffectedError(
                "No event record has been created".into(),
            ));
        }

        Ok(event_id)
    }

    async fn find_all(&self) -> AppResult<Vec<Event>> {
        let rows = sqlx::query_as::<_, EventRow>(
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
                ORDER BY e.created_at DESC
            "#,
        )
        .fetch_all(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)?;

        rows.into_iter().map(Event::try_from).collect()
    }

    async fn find_by_id(&self, event_id: EventId) -> AppResult<Option<Event>> {
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
        .fetch_optional(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)?;

        row.map(Event::try_from).transpose()
    }

    async fn find_hosted_by(&self, user_id: UserId) -> AppResult<Vec<Event>> {
        let rows = sqlx::query_as::<_, EventRow>(
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
                WHERE e.created_by = $1
                ORDER BY e.created_at DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)?;

        rows.into_iter().map(Event::try_from).collect()
    }

    async fn find_participated_by(&self, user_id: UserId) -> AppResult<Vec<Event>> {
        // 登録レコード経由で参加しているイベントを、登録の新しい順に返す
        let rows = sqlx::query_as::<_, EventRow>(
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
                FROM registrations AS r
                INNER JOIN events AS e ON r.event_id = e.event_id
                INNER JOIN users AS u ON e.created_by = u.user_id
                WHERE r.user_id = $1
                ORDER BY r.registered_at DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)?;

        rows.into_iter().map(Event::try_from).collect()
    }

    async fn update(&self, event: UpdateEvent) -> AppResult<()> {
        let mut tx = self.db.begin().await?;
        set_transaction_serializable(&mut tx).await?;

        // 主催者であることを確認してから更新する
        let created_by = sqlx::query_scalar::<_, UserId>(
            r#"
                SELECT created_by FROM events WHERE event_id = $1
            "#,
        )
        .bind(event.event_id)
        .fetch_optional(&mut *tx)
        .await
        .map_err(AppError::SpecificOperationError)?;

        let Some(created_by) = created_by else {
            return Err(AppError::EntityNotFound("Event not found.".into()));
        };
        if created_by != event.requested_user {
            return Err(AppError::ForbiddenOperation(
                "Only the host can update this event.".into(),
            ));
        }

        // 指定のあったフィールドのみ上書きする。
        // 定員を現在の参加人数より小さくする更新は WHERE 句で弾かれる。
        let res = sqlx::query(
            r#"
                UPDATE events
                SET
                    title = COALESCE($2, title),
                    description = COALESCE($3, description),
                    event_date = COALESCE($4, event_date),
                    location = COALESCE($5, location),
                    category = COALESCE($6, category),
                    is_team_event = COALESCE($7, is_team_event),
                    max_team_size = COALESCE($8, max_team_size),
                    max_participants = COALESCE($9, max_participants),
                    updated_at = now()
                WHERE event_id = $1
                  AND (
                    COALESCE($9, max_participants) = 0
                    OR COALESCE($9, max_participants) >= participants_count
                  )
            "#,
        )
        .bind(event.event_id)
        .bind(event.title)
        .bind(event.description)
        .bind(event.event_date)
        .bind(event.location)
        .bind(event.category.map(|c| c.as_ref().to_string()))
        .bind(event.is_team_event)
        .bind(event.max_team_size)
        .bind(event.max_participants)
        .execute(&mut *tx)
        .await
        .map_err(AppError::SpecificOperationError)?;

        if res.rows_affected() < 1 {
            return Err(AppError::UnprocessableEntity(
                "maxParticipants cannot be lower than the current participant count.".into(),
            ));
        }

        tx.commit().await.map_err(AppError::TransactionError)?;

        Ok(())
    }

    async fn delete(&self, event: DeleteEvent) -> AppResult<()> {
        let mut tx = self.db.begin().await?;
        set_transaction_serializable(&mut tx).await?;

        let created_by = sqlx::query_scalar::<_, UserId>(
            r#"
                SELECT created_by FROM events WHERE event_id = $1
            "#,
        )
        .bind(event.event_id)
        .fetch_optional(&mut *tx)
        .await
        .map_err(AppError::SpecificOperationError)?;

        let Some(created_by) = created_by else {
            return Err(AppError::EntityNotFound("Event not found.".into()));
        };
        if created_by != event.requested_user {
            return Err(AppError::ForbiddenOperation(
                "Only the host can delete this event.".into(),
            ));
        }

        // registrations と teams は外部キーの ON DELETE CASCADE で一緒に消える
        let res = sqlx::query(
            r#"
                DELETE FROM events WHERE event_id = $1
            "#,
        )
        .bind(event.event_id)
        .execute(&mut *tx)
        .await
        .map_err(AppError::SpecificOperationError)?;

        if res.rows_affected() < 1 {
            return Err(AppError::NoRowsAffectedError(
                "No event record has been deleted".into(),
            ));
        }

        tx.commit().await.map_err(AppError::TransactionError)?;

        Ok(())
    }
}
