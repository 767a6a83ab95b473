use crate::{
    extractor::AuthorizedUser,
    model::registration::{
        RegisterForEventRequest, RegisterForEventRequestWithIds, RegistrationReceiptResponse,
        RegistrationsResponse,
    },
};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use garde::Validate;
use kernel::model::{id::EventId, registration::event::UnregisterFromEvent};
use registry::AppRegistry;
use shared::error::AppResult;

pub async fn register_for_event(
    user: AuthorizedUser,
    Path(event_id): Path<EventId>,
    State(registry): State<AppRegistry>,
    Json(req): Json<RegisterForEventRequest>,
) -> AppResult<(StatusCode, Json<RegistrationReceiptResponse>)> {
    req.validate(&())?;

    let register_for_event =
        RegisterForEventRequestWithIds::new(event_id, user.id(), user.role(), req).into();
    registry
        .registration_repository()
        .register(register_for_event)
        .await
        .map(|receipt| {
            (
                StatusCode::CREATED,
                Json(RegistrationReceiptResponse::from(receipt)),
            )
        })
}

pub async fn unregister_from_event(
    user: AuthorizedUser,
    Path(event_id): Path<EventId>,
    State(registry): State<AppRegistry>,
) -> AppResult<StatusCode> {
    registry
        .registration_repository()
        .unregister(UnregisterFromEvent::new(event_id, user.id()))
        .await
        .map(|_| StatusCode::OK)
}

// 主催者向けの参加者一覧
pub async fn show_event_registrations(
    user: AuthorizedUser,
    Path(event_id): Path<EventId>,
    State(registry): State<AppRegistry>,
) -> AppResult<Json<RegistrationsResponse>> {
    registry
        .registration_repository()
        .find_by_event(event_id, user.id())
        .await
        .map(RegistrationsResponse::from)
        .map(Json)
}
