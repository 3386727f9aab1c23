pub mod opentok;

pub use opentok::OpenTokClient;

use async_trait::async_trait;

use crate::error::Result;

/// Longest lifetime the platform accepts for an access token.
pub const MAX_TOKEN_TTL_SECONDS: u64 = 30 * 24 * 60 * 60;

/// Longest connection data the platform accepts, in bytes.
pub const MAX_CONNECTION_DATA_LEN: usize = 1000;

/// How media flows in a provider session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaMode {
    /// Media goes through the platform's media router.
    Routed,
    /// Clients exchange media peer to peer when possible.
    Relayed,
}

/// Role granted by an access token
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Subscriber,
    Publisher,
    Moderator,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Subscriber => "subscriber",
            Role::Publisher => "publisher",
            Role::Moderator => "moderator",
        }
    }
}

/// Per-user options baked into an access token
#[derive(Debug, Clone)]
pub struct TokenOptions {
    pub role: Role,
    pub data: String,
    pub ttl_seconds: Option<u64>,
}

impl TokenOptions {
    /// Publisher token tagged with the user's display name.
    pub fn publisher(username: &str) -> Self {
        Self {
            role: Role::Publisher,
            data: format!("name={}", username),
            ttl_seconds: None,
        }
    }
}

/// External video-conferencing platform
#[async_trait]
pub trait VideoPlatform: Send + Sync {
    /// Project API key handed to the client SDK.
    fn api_key(&self) -> &str;

    /// Ask the platform for a new joinable session.
    async fn create_session(&self, mode: MediaMode) -> Result<String>;

    /// Mint an access token for `session_id`. Local, no network.
    fn generate_token(&self, session_id: &str, options: &TokenOptions) -> Result<String>;
}
