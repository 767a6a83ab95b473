use chrono::{DateTime, Utc};
use derive_new::new;
use garde::Validate;
use kernel::model::{
    event::{
        event::{CreateEvent, UpdateEvent},
        Event, EventCategory,
    },
    id::{EventId, UserId},
    user::EventOrganizer,
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateEventRequest {
    #[garde(length(min = 1))]
    pub title: String,
    #[garde(length(min = 1))]
    pub description: String,
    #[garde(skip)]
    pub event_date: DateTime<Utc>,
    #[garde(length(min = 1))]
    pub location: String,
    #[garde(skip)]
    #[serde(default)]
    pub category: EventCategory,
    #[garde(skip)]
    #[serde(default)]
    pub is_team_event: bool,
    #[garde(inner(range(min = 2)))]
    pub max_team_size: Option<i32>,
    // 0 は定員なし
    #[garde(range(min = 0))]
    #[serde(default)]
    pub max_participants: i32,
}

impl From<CreateEventRequest> for CreateEvent {
    fn from(value: CreateEventRequest) -> Self {
        let CreateEventRequest {
            title,
            description,
            event_date,
            location,
            category,
            is_team_event,
            max_team_size,
            max_participants,
        } = value;
        Self {
            title,
            description,
            event_date,
            location,
            category,
            is_team_event,
            max_team_size,
            max_participants,
        }
    }
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateEventRequest {
    #[garde(inner(length(min = 1)))]
    pub title: Option<String>,
    #[garde(inner(length(min = 1)))]
    pub description: Option<String>,
    #[garde(skip)]
    pub event_date: Option<DateTime<Utc>>,
    #[garde(inner(length(min = 1)))]
    pub location: Option<String>,
    #[garde(skip)]
    pub category: Option<EventCategory>,
    #[garde(skip)]
    pub is_team_event: Option<bool>,
    #[garde(inner(range(min = 2)))]
    pub max_team_size: Option<i32>,
    #[garde(inner(range(min = 0)))]
    pub max_participants: Option<i32>,
}

#[derive(new)]
pub struct UpdateEventRequestWithIds(EventId, UserId, UpdateEventRequest);

impl From<UpdateEventRequestWithIds> for UpdateEvent {
    fn from(value: UpdateEventRequestWithIds) -> Self {
        let UpdateEventRequestWithIds(
            event_id,
            requested_user,
            UpdateEventRequest {
                title,
                description,
                event_date,
                location,
                category,
                is_team_event,
                max_team_size,
                max_participants,
            },
        ) = value;
        Self {
            event_id,
            requested_user,
            title,
            description,
            event_date,
            location,
            category,
            is_team_event,
            max_team_size,
            max_participants,
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatedEventResponse {
    pub event_id: EventId,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EventsResponse {
    pub items: Vec<EventResponse>,
}

impl From<Vec<Event>> for EventsResponse {
    fn from(value: Vec<Event>) -> Self {
        Self {
            items: value.into_iter().map(EventResponse::from).collect(),
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EventResponse {
    pub event_id: EventId,
    pub title: String,
    pub description: String,
    pub event_date: DateTime<Utc>,
    pub location: String,
    pub category: EventCategory,
    pub organizer: EventOrganizerResponse,
    pub is_team_event: bool,
    pub max_team_size: i32,
    pub max_participants: i32,
    pub current_participants: i32,
    pub created_at: DateTime<Utc>,
}

impl From<Event> for EventResponse {
    fn from(value: Event) -> Self {
        let Event {
            id,
            title,
            description,
            event_date,
            location,
            category,
            organizer,
            is_team_event,
            max_team_size,
            max_participants,
            participants_count,
            created_at,
        } = value;
        Self {
            event_id: id,
            title,
            description,
            event_date,
            location,
            category,
            organizer: organizer.into(),
            is_team_event,
            max_team_size,
            max_participants,
            current_participants: participants_count,
            created_at,
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EventOrganizerResponse {
    pub organizer_id: UserId,
    pub organizer_name: String,
}

impl From<EventOrganizer> for EventOrganizerResponse {
    fn from(value: EventOrganizer) -> Self {
        let EventOrganizer {
            organizer_id,
            organizer_name,
        } = value;
        Self {
            organizer_id,
            organizer_name,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_event_request_rejects_a_team_size_of_one() {
        let req: CreateEventRequest = serde_json::from_value(serde_json::json!({
            "title": "Hackathon",
            "description": "48h build",
            "eventDate": "2026-10-01T09:00:00Z",
            "location": "Lab 2",
            "category": "technical",
            "isTeamEvent": true,
            "maxTeamSize": 1,
            "maxParticipants": 100
        }))
        .unwrap();
        assert!(req.validate(&()).is_err());
    }

    #[test]
    fn create_event_request_defaults_to_an_individual_event() {
        let req: CreateEventRequest = serde_json::from_value(serde_json::json!({
            "title": "Tech Talk",
            "description": "monthly meetup",
            "eventDate": "2026-10-01T09:00:00Z",
            "location": "Hall A"
        }))
        .unwrap();
        assert!(req.validate(&()).is_ok());
        assert!(!req.is_team_event);
        assert_eq!(req.category, EventCategory::Other);
        assert_eq!(req.max_participants, 0);
    }

    #[test]
    fn unknown_category_is_rejected_at_deserialization() {
        let result = serde_json::from_value::<CreateEventRequest>(serde_json::json!({
            "title": "Tech Talk",
            "description": "monthly meetup",
            "eventDate": "2026-10-01T09:00:00Z",
            "location": "Hall A",
            "category": "esports"
        }));
        assert!(result.is_err());
    }

    #[test]
    fn negative_capacity_is_rejected() {
        let req: CreateEventRequest = serde_json::from_value(serde_json::json!({
            "title": "Tech Talk",
            "description": "monthly meetup",
            "eventDate": "2026-10-01T09:00:00Z",
            "location": "Hall A",
            "maxParticipants": -1
        }))
        .unwrap();
        assert!(req.validate(&()).is_err());
    }
}
