use axum::{
    routing::{delete, get, post, put},
    Router,
};
use registry::AppRegistry;

use crate::handler::event::{
    delete_event, register_event, show_event, show_event_list, show_hosted_event_list,
    show_participated_event_list, update_event,
};
use crate::handler::registration::{
    register_for_event, show_event_registrations, unregister_from_event,
};

pub fn build_event_routers() -> Router<AppRegistry> {
    let events_routers = Router::new()
        .route("/", post(register_event))
        .route("/", get(show_event_list))
        .route("/hosted", get(show_hosted_event_list))
        .route("/participated", get(show_participated_event_list))
        .route("/:event_id", get(show_event))
        .route("/:event_id", put(update_event))
        .route("/:event_id", delete(delete_event))
        .route("/:event_id/register", post(register_for_event))
        .route("/:event_id/register", delete(unregister_from_event))
        .route("/:event_id/registrations", get(show_event_registrations));

    Router::new().nest("/events", events_routers)
}
