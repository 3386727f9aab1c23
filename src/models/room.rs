use serde::Deserialize;

/// Query string of `GET /`
#[derive(Debug, Default, Deserialize)]
pub struct IndexQuery {
    #[serde(rename = "roomId")]
    pub room_id: Option<String>,
}

/// Query string of `GET /login`
#[derive(Debug, Default, Deserialize)]
pub struct LoginQuery {
    #[serde(rename = "roomId")]
    pub room_id: Option<String>,
}

/// Query string the identity authority sends back to `GET /redirect`
#[derive(Debug, Default, Deserialize)]
pub struct RedirectQuery {
    pub code: Option<String>,
    pub state: Option<String>,
    pub error: Option<String>,
    pub error_description: Option<String>,
}

/// Values rendered into the room page
#[derive(Debug, Clone)]
pub struct RoomPage {
    pub api_key: String,
    pub session_id: String,
    pub token: String,
    pub room_id: String,
    pub username: String,
}
