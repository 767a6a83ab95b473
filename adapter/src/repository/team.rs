use crate::database::{is_unique_violation, model::team::TeamRow, ConnectionPool};
use crate::repository::set_transaction_serializable;
use async_trait::async_trait;
use derive_new::new;
use kernel::model::{
    event::effective_team_size_limit,
    id::{EventId, TeamId, UserId},
    team::{
        event::{CreateTeam, CreatedTeam, DeleteTeam, JoinTeam, RemoveMember},
        Team,
    },
};
use kernel::repository::team::TeamRepository;
use rand::{distributions::Alphanumeric, Rng};
use shared::error::{AppError, AppResult};
use sqlx::{Postgres, Transaction};

const UNIQUE_TEAM_CODE: &str = "teams_team_code_key";
const UNIQUE_TEAM_LEADER: &str = "teams_event_id_leader_id_key";

/// 共有用チームコードの長さ
const TEAM_CODE_LEN: usize = 6;
const TEAM_CODE_ATTEMPTS: usize = 5;

#[derive(new)]
pub struct TeamRepositoryImpl {
    db: ConnectionPool,
}

#[async_trait]
impl TeamRepository for TeamRepositoryImpl {
    async fn create(&self, event: CreateTeam) -> AppResult<CreatedTeam> {
        let mut tx = self.db.begin().await?;
        set_transaction_serializable(&mut tx).await?;

        // イベントが存在し、チーム形式であることを確認する
        let is_team_event = sqlx::query_scalar::<_, bool>(
            r#"
                SELECT is_team_event FROM events WHERE event_id = $1
            "#,
        )
        .bind(event.event_id)
        .fetch_optional(&mut *tx)
        .await
        .map_err(AppError::SpecificOperationError)?;

        let Some(is_team_event) = is_team_event else {
            return Err(AppError::EntityNotFound("Event not found.".into()));
        };
        if !is_team_event {
            return Err(AppError::UnprocessableEntity(
                "This event does not allow team registration.".into(),
            ));
        }

        // 同じイベントで既にチームを作っていないか
        let already_leading = sqlx::query_scalar::<_, bool>(
            r#"
                SELECT EXISTS (
                    SELECT 1 FROM teams
                    WHERE event_id = $1 AND leader_id = $2
                )
            "#,
        )
        .bind(event.event_id)
        .bind(event.requested_user)
        .fetch_one(&mut *tx)
        .await
        .map_err(AppError::SpecificOperationError)?;

        if already_leading {
            return Err(AppError::ResourceConflict(
                "You already created a team for this event.".into(),
            ));
        }

        let created = insert_team(
            &mut tx,
            event.event_id,
            &event.team_name,
            event.requested_user,
        )
        .await?;

        tx.commit().await.map_err(AppError::TransactionError)?;

        Ok(created)
    }

    async fn join(&self, event: JoinTeam) -> AppResult<Team> {
        let mut tx = self.db.begin().await?;
        set_transaction_serializable(&mut tx).await?;

        // コードからチームを特定する
        let row = sqlx::query_as::<_, TeamRow>(
            r#"
                SELECT
                team_id, event_id, team_name, leader_id, members, team_code,
                created_at
                FROM teams
                WHERE team_code = $1
            "#,
        )
        .bind(&event.team_code)
        .fetch_optional(&mut *tx)
        .await
        .map_err(AppError::SpecificOperationError)?;

        let Some(row) = row else {
            return Err(AppError::EntityNotFound("Invalid team code.".into()));
        };
        let mut team = Team::from(row);

        let max_team_size = sqlx::query_scalar::<_, i32>(
            r#"
                SELECT max_team_size FROM events WHERE event_id = $1
            "#,
        )
        .bind(team.event_id)
        .fetch_optional(&mut *tx)
        .await
        .map_err(AppError::SpecificOperationError)?;

        let Some(max_team_size) = max_team_size else {
            return Err(AppError::EntityNotFound("Event not found.".into()));
        };

        // 同じイベントの別チームに所属していないか
        let in_another_team = sqlx::query_scalar::<_, bool>(
            r#"
                SELECT EXISTS (
                    SELECT 1 FROM teams
                    WHERE event_id = $1
                      AND members @> ARRAY[$2]
                      AND team_id <> $3
                )
            "#,
        )
        .bind(team.event_id)
        .bind(event.requested_user)
        .bind(team.team_id)
        .fetch_one(&mut *tx)
        .await
        .map_err(AppError::SpecificOperationError)?;

        if in_another_team {
            return Err(AppError::ResourceConflict(
                "You are already part of another team for this event.".into(),
            ));
        }

        // 既にこのチームのメンバーでないか、満員でないか
        team.ensure_joinable(
            event.requested_user,
            effective_team_size_limit(max_team_size),
        )?;

        sqlx::query(
            r#"
                UPDATE teams
                SET members = array_append(members, $2)
                WHERE team_id = $1
            "#,
        )
        .bind(team.team_id)
        .bind(event.requested_user)
        .execute(&mut *tx)
        .await
        .map_err(AppError::SpecificOperationError)?;

        tx.commit().await.map_err(AppError::TransactionError)?;

        team.members.push(event.requested_user);
        Ok(team)
    }

    async fn find_by_member(&self, user_id: UserId) -> AppResult<Vec<Team>> {
        let rows = sqlx::query_as::<_, TeamRow>(
            r#"
                SELECT
                team_id, event_id, team_name, leader_id, members, team_code,
                created_at
                FROM teams
                WHERE members @> ARRAY[$1]
                ORDER BY created_at DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)?;

        Ok(rows.into_iter().map(Team::from).collect())
    }

    async fn remove_member(&self, event: RemoveMember) -> AppResult<()> {
        let mut tx = self.db.begin().await?;
        set_transaction_serializable(&mut tx).await?;

        let Some(row) = find_team(&mut tx, event.team_id).await? else {
            return Err(AppError::EntityNotFound("Team not found.".into()));
        };
        let team = Team::from(row);

        // リーダー本人以外は外せない・リーダー自身もこの経路では外せない
        team.ensure_member_removable(event.member_id, event.requested_user)?;

        sqlx::query(
            r#"
                UPDATE teams
                SET members = array_remove(members, $2)
                WHERE team_id = $1
            "#,
        )
        .bind(event.team_id)
        .bind(event.member_id)
        .execute(&mut *tx)
        .await
        .map_err(AppError::SpecificOperationError)?;

        tx.commit().await.map_err(AppError::TransactionError)?;

        Ok(())
    }

    async fn delete(&self, event: DeleteTeam) -> AppResult<()> {
        let mut tx = self.db.begin().await?;
        set_transaction_serializable(&mut tx).await?;

        let Some(row) = find_team(&mut tx, event.team_id).await? else {
            return Err(AppError::EntityNotFound("Team not found.".into()));
        };
        let team = Team::from(row);

        team.ensure_deletable_by(event.requested_user)?;

        // 参加登録と紐づいたままのチームは削除できない。
        // 先に参加登録を解除してもらい、カウンタの不整合を防ぐ
        let has_registration = sqlx::query_scalar::<_, bool>(
            r#"
                SELECT EXISTS (
                    SELECT 1 FROM registrations WHERE team_id = $1
                )
            "#,
        )
        .bind(event.team_id)
        .fetch_one(&mut *tx)
        .await
        .map_err(AppError::SpecificOperationError)?;

        if has_registration {
            return Err(AppError::ResourceConflict(
                "This team has an active registration. Unregister from the event first.".into(),
            ));
        }

        let res = sqlx::query(
            r#"
                DELETE FROM teams WHERE team_id = $1
            "#,
        )
        .bind(event.team_id)
        .execute(&mut *tx)
        .await
        .map_err(AppError::SpecificOperationError)?;

        if res.rows_affected() < 1 {
            return Err(AppError::NoRowsAffectedError(
                "No team record has been deleted".into(),
            ));
        }

        tx.commit().await.map_err(AppError::TransactionError)?;

        Ok(())
    }
}

async fn find_team(
    tx: &mut Transaction<'_, Postgres>,
    team_id: TeamId,
) -> AppResult<Option<TeamRow>> {
    sqlx::query_as::<_, TeamRow>(
        r#"
            SELECT
            team_id, event_id, team_name, leader_id, members, team_code,
            created_at
            FROM teams
            WHERE team_id = $1
        "#,
    )
    .bind(team_id)
    .fetch_optional(&mut **tx)
    .await
    .map_err(AppError::SpecificOperationError)
}

fn new_team_code() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(TEAM_CODE_LEN)
        .map(char::from)
        .collect()
}

/// 未使用のチームコードを払い出す。衝突したら生成し直す。
async fn allocate_team_code(tx: &mut Transaction<'_, Postgres>) -> AppResult<String> {
    for _ in 0..TEAM_CODE_ATTEMPTS {
        let code = new_team_code();
        let exists = sqlx::query_scalar::<_, bool>(
            r#"
                SELECT EXISTS (SELECT 1 FROM teams WHERE team_code = $1)
            "#,
        )
        .bind(&code)
        .fetch_one(&mut **tx)
        .await
        .map_err(AppError::SpecificOperationError)?;

        if !exists {
            return Ok(code);
        }
    }
    Err(AppError::ResourceConflict(
        "Failed to allocate a unique team code. Please retry.".into(),
    ))
}

/// リーダーのみをメンバーに持つ新しいチームを作成する。
/// コードの残存衝突や同時作成は一意制約が弾く。
pub(crate) async fn insert_team(
    tx: &mut Transaction<'_, Postgres>,
    event_id: EventId,
    team_name: &str,
    leader_id: UserId,
) -> AppResult<CreatedTeam> {
    let team_code = allocate_team_code(tx).await?;
    let team_id = TeamId::new();
    let res = sqlx::query(
        r#"
            INSERT INTO teams
            (team_id, event_id, team_name, leader_id, members, team_code)
            VALUES ($1, $2, $3, $4, $5, $6)
        "#,
    )
    .bind(team_id)
    .bind(event_id)
    .bind(team_name)
    .bind(leader_id)
    .bind(vec![leader_id])
    .bind(&team_code)
    .execute(&mut **tx)
    .await;

    match res {
        Ok(done) if done.rows_affected() == 1 => Ok(CreatedTeam { team_id, team_code }),
        Ok(_) => Err(AppError::NoRowsAffectedError(
            "No team record has been created".into(),
        )),
        Err(e) if is_unique_violation(&e, UNIQUE_TEAM_LEADER) => Err(AppError::ResourceConflict(
            "You already created a team for this event.".into(),
        )),
        Err(e) if is_unique_violation(&e, UNIQUE_TEAM_CODE) => Err(AppError::ResourceConflict(
            "Failed to allocate a unique team code. Please retry.".into(),
        )),
        Err(e) => Err(AppError::SpecificOperationError(e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn team_codes_are_short_and_alphanumeric() {
        let code = new_team_code();
        assert_eq!(code.len(), TEAM_CODE_LEN);
        assert!(code.chars().all(|c| c.is_ascii_alphanumeric()));
    }

    #[test]
    fn team_codes_vary_between_draws() {
        let codes: std::collections::HashSet<_> = (0..32).map(|_| new_team_code()).collect();
        assert!(codes.len() > 1);
    }
}
