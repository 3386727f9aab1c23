pub mod auth;
pub mod health;
pub mod pages;

use axum::Router;
use tower_http::services::ServeDir;
use tower_sessions::cookie::SameSite;
use tower_sessions::{MemoryStore, SessionManagerLayer};

use crate::security::session_key;
use crate::state::AppState;

/// Create the router with all routes, browser sessions and static assets
pub fn create_router(state: AppState) -> Router {
    // Lax so the cookie set on /redirect survives the hop back from the authority.
    let session_layer = SessionManagerLayer::new(MemoryStore::default())
        .with_secure(state.config.server_url.starts_with("https://"))
        .with_same_site(SameSite::Lax)
        .with_signed(session_key(&state.config.session_secret));

    Router::new()
        .merge(pages::page_routes())
        .merge(auth::auth_routes())
        .merge(health::health_routes())
        .fallback_service(ServeDir::new(&state.config.static_dir))
        .layer(session_layer)
        .with_state(state)
}
