use kernel::model::{
    event::{Event, EventCategory},
    id::{EventId, UserId},
    user::EventOrganizer,
};
use chrono::{DateTime, Utc};
use shared::error::AppError;
use std::str::FromStr;

/// events と users を JOIN した 1 行
#[derive(Debug, sqlx::FromRow)]
pub struct EventRow {
    pub event_id: EventId,
    pub title: String,
    pub description: String,
    pub event_date: DateTime<Utc>,
    pub location: String,
    pub category: String,
    pub organizer_id: UserId,
    pub organizer_name: String,
    pub is_team_event: bool,
    pub max_team_size: i32,
    pub max_participants: i32,
    pub participants_count: i32,
    pub created_at: DateTime<Utc>,
}

impl TryFrom<EventRow> for Event {
    type Error = AppError;

    fn try_from(value: EventRow) -> Result<Self, Self::Error> {
        let EventRow {
            event_id,
            title,
            description,
            event_date,
            location,
            category,
            organizer_id,
            organizer_name,
            is_team_event,
            max_team_size,
            max_participants,
            participants_count,
            created_at,
        } = value;
        let category = EventCategory::from_str(&category).map_err(|e| {
            AppError::ConversionEntityError(format!("unknown event category: {e}"))
        })?;
        Ok(Event {
            id: event_id,
            title,
            description,
            event_date,
            location,
            category,
            organizer: EventOrganizer {
                organizer_id,
                organizer_name,
            },
            is_team_event,
            max_team_size,
            max_participants,
            participants_count,
            created_at,
        })
    }
}
