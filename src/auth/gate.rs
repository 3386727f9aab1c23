use tower_sessions::Session;

use crate::error::Result;

/// Browser-session key holding the authenticated display name.
pub const USER_KEY: &str = "user";

/// Outcome of the sign-in check on a room request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Gate {
    /// Signed in as this user.
    Pass(String),
    /// Not signed in; send the browser to this location.
    RedirectToLogin(String),
}

/// Where an anonymous visitor of `room_id` is sent to sign in.
pub fn login_redirect_path(room_id: &str) -> String {
    format!("/?roomId={}", urlencoding::encode(room_id))
}

/// Let the request through only if the browser session is signed in.
pub async fn require_authenticated(session: &Session, room_id: &str) -> Result<Gate> {
    match session.get::<String>(USER_KEY).await? {
        Some(username) => Ok(Gate::Pass(username)),
        None => {
            tracing::debug!(room_id = %room_id, "Not logged in, redirecting to sign-in");
            Ok(Gate::RedirectToLogin(login_redirect_path(room_id)))
        }
    }
}

/// Mark the browser session as signed in. The session id is cycled first so
/// a pre-login cookie cannot be reused.
pub async fn sign_in(session: &Session, username: &str) -> Result<()> {
    session.cycle_id().await?;
    session.insert(USER_KEY, username).await?;
    Ok(())
}

/// Forget the signed-in user and delete the session.
pub async fn sign_out(session: &Session) -> Result<()> {
    session.flush().await?;
    Ok(())
}
