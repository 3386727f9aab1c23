pub mod authority;
pub mod gate;
pub mod oidc;

pub use authority::Authority;
pub use gate::{require_authenticated, Gate};
pub use oidc::OidcClient;

use async_trait::async_trait;

use crate::error::Result;
use crate::models::Identity;

/// Scopes requested on every sign-in.
pub const OIDC_SCOPES: [&str; 2] = ["openid", "profile"];

/// First leg of the authorization-code flow, built fresh for each login
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthorizationRequest {
    pub scopes: Vec<String>,
    /// Opaque value echoed back on the redirect; carries the room id.
    pub state: String,
}

impl AuthorizationRequest {
    pub fn new(state: impl Into<String>) -> Self {
        Self {
            scopes: OIDC_SCOPES.iter().map(|s| s.to_string()).collect(),
            state: state.into(),
        }
    }
}

/// Second leg: redeem the one-time code
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenRequest {
    pub scopes: Vec<String>,
    pub code: String,
}

impl TokenRequest {
    pub fn new(code: impl Into<String>) -> Self {
        Self {
            scopes: OIDC_SCOPES.iter().map(|s| s.to_string()).collect(),
            code: code.into(),
        }
    }
}

/// External identity authority speaking the authorization-code flow
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Consent URL the browser is redirected to.
    async fn authorization_url(&self, request: &AuthorizationRequest) -> Result<String>;

    /// Exchange a one-time code for the signed-in identity.
    async fn redeem_code(&self, request: &TokenRequest) -> Result<Identity>;
}
