use axum::{
    routing::{delete, get, post},
    Router,
};
use registry::AppRegistry;

use crate::handler::team::{
    delete_team, join_team, register_team, remove_team_member, show_my_teams,
};

pub fn build_team_routers() -> Router<AppRegistry> {
    let teams_routers = Router::new()
        .route("/", post(register_team))
        .route("/mine", get(show_my_teams))
        .route("/join/:team_code", post(join_team))
        .route("/:team_id", delete(delete_team))
        .route("/:team_id/members/:member_id", delete(remove_team_member));

    Router::new().nest("/teams", teams_routers)
}
