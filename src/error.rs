use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

/// Request-level failures. The `String` payloads carry internal detail for
/// the server log; the browser only ever sees the generic message.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Video session creation failed: {0}")]
    SessionCreation(String),

    #[error("Video token error: {0}")]
    Token(String),

    #[error("Authorization URL error: {0}")]
    AuthorizationUrl(String),

    #[error("Identity exchange failed: {0}")]
    IdentityExchange(String),

    #[error("Browser session error: {0}")]
    BrowserSession(String),

    #[error("Internal server error: {0}")]
    InternalError(String),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Text shown to the browser.
    pub fn public_message(&self) -> String {
        match self {
            AppError::BadRequest(msg) => msg.clone(),
            AppError::SessionCreation(_) => "There was an error creating the room.".to_string(),
            AppError::Token(_) => "Could not issue an access token.".to_string(),
            AppError::AuthorizationUrl(_) => "Sign-in is unavailable right now.".to_string(),
            AppError::IdentityExchange(_) => "Sign-in failed.".to_string(),
            AppError::BrowserSession(_) => "Session error.".to_string(),
            AppError::InternalError(_) => "Internal server error.".to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, "Request failed");
        } else {
            tracing::warn!(error = %self, "Request rejected");
        }

        (status, self.public_message()).into_response()
    }
}

impl From<tower_sessions::session::Error> for AppError {
    fn from(err: tower_sessions::session::Error) -> Self {
        AppError::BrowserSession(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
