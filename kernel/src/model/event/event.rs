use super::EventCategory;
use crate::model::id::{EventId, UserId};
use chrono::{DateTime, Utc};

pub struct CreateEvent {
    pub title: String,
    pub description: String,
    pub event_date: DateTime<Utc>,
    pub location: String,
    pub category: EventCategory,
    pub is_team_event: bool,
    pub max_team_size: Option<i32>,
    pub max_participants: i32,
}

#[derive(Debug)]
pub struct UpdateEvent {
    pub event_id: EventId,
    pub requested_user: UserId,
    pub title: Option<String>,
    pub description: Option<String>,
    pub event_date: Option<DateTime<Utc>>,
    pub location: Option<String>,
    pub category: Option<EventCategory>,
    pub is_team_event: Option<bool>,
    pub max_team_size: Option<i32>,
    pub max_participants: Option<i32>,
}

#[derive(Debug)]
pub struct DeleteEvent {
    pub event_id: EventId,
    pub requested_user: UserId,
}
