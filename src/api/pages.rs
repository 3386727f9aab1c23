use axum::{
    extract::{Path, Query, State},
    response::{Html, IntoResponse, Redirect, Response},
    routing::get,
    Router,
};
use tower_sessions::Session;

use crate::auth::{require_authenticated, Gate};
use crate::error::Result;
use crate::models::{IndexQuery, RoomPage};
use crate::render;
use crate::security::generate_room_id;
use crate::state::AppState;
use crate::video::TokenOptions;

/// Page routes
pub fn page_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(index))
        .route("/room/{room_id}", get(join_room))
}

/// Path of the room page for `room_id`.
pub fn room_path(room_id: &str) -> String {
    format!("/room/{}", urlencoding::encode(room_id))
}

/// GET / - Room chooser, with a fresh room id unless one is given
async fn index(Query(query): Query<IndexQuery>) -> Html<String> {
    let room_id = query
        .room_id
        .filter(|id| !id.trim().is_empty())
        .unwrap_or_else(generate_room_id);

    Html(render::index_page(&room_id))
}

/// GET /room/:room_id - Join a room as the signed-in user
async fn join_room(
    State(state): State<AppState>,
    session: Session,
    Path(room_id): Path<String>,
) -> Result<Response> {
    let username = match require_authenticated(&session, &room_id).await? {
        Gate::Pass(username) => username,
        Gate::RedirectToLogin(location) => return Ok(Redirect::to(&location).into_response()),
    };

    let session_id = state.rooms.get_or_create_session(&room_id).await?;
    let token = state
        .video
        .generate_token(&session_id, &TokenOptions::publisher(&username))?;

    tracing::info!(room_id = %room_id, username = %username, "Rendering room");

    let page = RoomPage {
        api_key: state.video.api_key().to_string(),
        session_id,
        token,
        room_id,
        username,
    };

    Ok(Html(render::room_page(&page)).into_response())
}
