use serde::{Deserialize, Serialize};

/// Authenticated identity extracted from an ID token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub subject: String,
    pub username: String,
}

/// ID token claims the server reads
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IdTokenClaims {
    pub sub: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preferred_username: Option<String>,
    pub aud: String,
    pub exp: i64,
}

impl IdTokenClaims {
    /// Display name: `name`, falling back to `preferred_username`.
    pub fn display_name(&self) -> Option<&str> {
        self.name
            .as_deref()
            .or(self.preferred_username.as_deref())
            .map(str::trim)
            .filter(|name| !name.is_empty())
    }
}
