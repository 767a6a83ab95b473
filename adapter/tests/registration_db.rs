//! DATABASE_URL の指す Postgres に対して実行する統合テスト。
//! `cargo test -p adapter -- --ignored` で起動する。

use adapter::database::ConnectionPool;
use adapter::repository::{
    registration::RegistrationRepositoryImpl, team::TeamRepositoryImpl,
};
use kernel::model::{
    id::{EventId, UserId},
    registration::{
        event::{RegisterForEvent, RegistrationPayload, UnregisterFromEvent},
        ContactInfo,
    },
    role::Role,
    team::event::{CreateTeam, JoinTeam},
};
use kernel::repository::{registration::RegistrationRepository, team::TeamRepository};
use shared::error::AppError;
use sqlx::PgPool;

async fn connect() -> ConnectionPool {
    let url = std::env::var("DATABASE_URL").unwrap();
    ConnectionPool::new(PgPool::connect(&url).await.unwrap())
}

async fn seed_user(pool: &ConnectionPool) -> UserId {
    let user_id = UserId::new();
    sqlx::query(
        r#"
            INSERT INTO users (user_id, user_name, email, role)
            VALUES ($1, $2, $3, 'user')
        "#,
    )
    .bind(user_id)
    .bind("attendee")
    .bind(format!("{}@example.com", user_id.raw()))
    .execute(pool.inner_ref())
    .await
    .unwrap();
    user_id
}

async fn seed_event(
    pool: &ConnectionPool,
    host: UserId,
    is_team_event: bool,
    max_participants: i32,
) -> EventId {
    let event_id = EventId::new();
    sqlx::query(
        r#"
            INSERT INTO events
            (event_id, title, description, event_date, location, created_by,
             is_team_event, max_participants)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
        "#,
    )
    .bind(event_id)
    .bind("Hackathon")
    .bind("48h build")
    .bind(chrono::Utc::now())
    .bind("Lab 2")
    .bind(host)
    .bind(is_team_event)
    .bind(max_participants)
    .execute(pool.inner_ref())
    .await
    .unwrap();
    event_id
}

async fn participants_count(pool: &ConnectionPool, event_id: EventId) -> i32 {
    sqlx::query_scalar("SELECT participants_count FROM events WHERE event_id = $1")
        .bind(event_id)
        .fetch_one(pool.inner_ref())
        .await
        .unwrap()
}

fn individual(event_id: EventId, user_id: UserId) -> RegisterForEvent {
    RegisterForEvent::new(
        event_id,
        user_id,
        Role::User,
        RegistrationPayload::Individual {
            participant: ContactInfo {
                name: "Asha Rao".into(),
                email: "asha@example.com".into(),
                phone: "1234567890".into(),
            },
        },
    )
}

#[tokio::test]
#[ignore = "requires a running Postgres"]
async fn a_user_cannot_join_two_teams_for_the_same_event() {
    let pool = connect().await;
    let repo = TeamRepositoryImpl::new(pool.clone());

    let host = seed_user(&pool).await;
    let leader_a = seed_user(&pool).await;
    let leader_b = seed_user(&pool).await;
    let joiner = seed_user(&pool).await;
    let event_id = seed_event(&pool, host, true, 0).await;

    let team_a = repo
        .create(CreateTeam::new(event_id, "Alpha".into(), leader_a))
        .await
        .unwrap();
    let team_b = repo
        .create(CreateTeam::new(event_id, "Beta".into(), leader_b))
        .await
        .unwrap();

    repo.join(JoinTeam::new(team_a.team_code, joiner))
        .await
        .unwrap();

    // 同じイベントでは 1 チームにしか所属できない
    let result = repo.join(JoinTeam::new(team_b.team_code, joiner)).await;
    assert!(matches!(result, Err(AppError::ResourceConflict(_))));
}

#[tokio::test]
#[ignore = "requires a running Postgres"]
async fn unregistering_frees_the_seats_it_took() {
    let pool = connect().await;
    let repo = RegistrationRepositoryImpl::new(pool.clone());

    let host = seed_user(&pool).await;
    let first = seed_user(&pool).await;
    let second = seed_user(&pool).await;
    let event_id = seed_event(&pool, host, false, 1).await;

    repo.register(individual(event_id, first)).await.unwrap();
    assert_eq!(participants_count(&pool, event_id).await, 1);

    // 定員 1 なので 2 人目は入れない
    let full = repo.register(individual(event_id, second)).await;
    assert!(matches!(full, Err(AppError::CapacityExceeded(_))));

    // 解除でカウンタが戻り、空いた席に登録できる
    repo.unregister(UnregisterFromEvent::new(event_id, first))
        .await
        .unwrap();
    assert_eq!(participants_count(&pool, event_id).await, 0);
    repo.register(individual(event_id, second)).await.unwrap();
}
