use crate::{
    extractor::AuthorizedUser,
    model::event::{
        CreateEventRequest, CreatedEventResponse, EventResponse, EventsResponse,
        UpdateEventRequest, UpdateEventRequestWithIds,
    },
};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use garde::Validate;
use kernel::model::{
    event::event::{CreateEvent, DeleteEvent},
    id::EventId,
};
use registry::AppRegistry;
use shared::error::{AppError, AppResult};

pub async fn register_event(
    user: AuthorizedUser,
    State(registry): State<AppRegistry>,
    Json(req): Json<CreateEventRequest>,
) -> AppResult<(StatusCode, Json<CreatedEventResponse>)> {
    req.validate(&())?;

    registry
        .event_repository()
        .create(CreateEvent::from(req), user.id())
        .await
        .map(|event_id| (StatusCode::CREATED, Json(CreatedEventResponse { event_id })))
}

pub async fn show_event_list(
    _user: AuthorizedUser,
    State(registry): State<AppRegistry>,
) -> AppResult<Json<EventsResponse>> {
    registry
        .event_repository()
        .find_all()
        .await
        .map(EventsResponse::from)
        .map(Json)
}

pub async fn show_event(
    _user: AuthorizedUser,
    Path(event_id): Path<EventId>,
    State(registry): State<AppRegistry>,
) -> AppResult<Json<EventResponse>> {
    registry
        .event_repository()
        .find_by_id(event_id)
        .await
        .and_then(|event| match event {
            Some(event) => Ok(Json(EventResponse::from(event))),
            None => Err(AppError::EntityNotFound("Event not found.".into())),
        })
}

// 自分が主催しているイベントの一覧
pub async fn show_hosted_event_list(
    user: AuthorizedUser,
    State(registry): State<AppRegistry>,
) -> AppResult<Json<EventsResponse>> {
    registry
        .event_repository()
        .find_hosted_by(user.id())
        .await
        .map(EventsResponse::from)
        .map(Json)
}

// 登録経由で参加しているイベントの一覧
pub async fn show_participated_event_list(
    user: AuthorizedUser,
    State(registry): State<AppRegistry>,
) -> AppResult<Json<EventsResponse>> {
    registry
        .event_repository()
        .find_participated_by(user.id())
        .await
        .map(EventsResponse::from)
        .map(Json)
}

pub async fn update_event(
    user: AuthorizedUser,
    Path(event_id): Path<EventId>,
    State(registry): State<AppRegistry>,
    Json(req): Json<UpdateEventRequest>,
) -> AppResult<StatusCode> {
    req.validate(&())?;

    let update_event = UpdateEventRequestWithIds::new(event_id, user.id(), req).into();
    registry
        .event_repository()
        .update(update_event)
        .await
        .map(|_| StatusCode::OK)
}

pub async fn delete_event(
    user: AuthorizedUser,
    Path(event_id): Path<EventId>,
    State(registry): State<AppRegistry>,
) -> AppResult<StatusCode> {
    let delete_event = DeleteEvent {
        event_id,
        requested_user: user.id(),
    };
    registry
        .event_repository()
        .delete(delete_event)
        .await
        .map(|_| StatusCode::OK)
}
