use axum::{
    extract::{Query, State},
    response::Redirect,
    routing::get,
    Router,
};
use tower_sessions::Session;

use crate::api::pages::room_path;
use crate::auth::{gate, AuthorizationRequest, TokenRequest};
use crate::error::{AppError, Result};
use crate::models::{LoginQuery, RedirectQuery};
use crate::state::AppState;

/// Sign-in routes
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/login", get(login))
        .route("/redirect", get(complete_login))
        .route("/logout", get(logout))
}

/// GET /login - Start the authorization-code flow for a room
async fn login(
    State(state): State<AppState>,
    Query(query): Query<LoginQuery>,
) -> Result<Redirect> {
    let Some(room_id) = query.room_id.filter(|id| !id.trim().is_empty()) else {
        return Ok(Redirect::to("/"));
    };

    let url = state
        .identity
        .authorization_url(&AuthorizationRequest::new(room_id))
        .await?;

    Ok(Redirect::to(&url))
}

/// GET /redirect - Redeem the code and send the user back to their room
async fn complete_login(
    State(state): State<AppState>,
    session: Session,
    Query(query): Query<RedirectQuery>,
) -> Result<Redirect> {
    if let Some(error) = query.error {
        return Err(AppError::IdentityExchange(format!(
            "Authority returned {}: {}",
            error,
            query.error_description.unwrap_or_default()
        )));
    }

    let code = query
        .code
        .filter(|code| !code.is_empty())
        .ok_or_else(|| AppError::BadRequest("code is required".to_string()))?;
    let room_id = query
        .state
        .filter(|state| !state.is_empty())
        .ok_or_else(|| AppError::BadRequest("state is required".to_string()))?;

    let identity = state.identity.redeem_code(&TokenRequest::new(code)).await?;
    gate::sign_in(&session, &identity.username).await?;

    tracing::info!(
        room_id = %room_id,
        username = %identity.username,
        subject = %identity.subject,
        "User signed in"
    );

    Ok(Redirect::to(&room_path(&room_id)))
}

/// GET /logout - Destroy the browser session
async fn logout(session: Session) -> Result<Redirect> {
    gate::sign_out(&session).await?;
    tracing::info!("User logged out");
    Ok(Redirect::to("/"))
}
