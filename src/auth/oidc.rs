use std::time::Duration;

use async_trait::async_trait;
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use reqwest::Client;
use serde::Deserialize;
use tokio::sync::OnceCell;
use url::Url;

use crate::auth::{Authority, AuthorizationRequest, IdentityProvider, TokenRequest};
use crate::config::{Config, ConfigError};
use crate::error::{AppError, Result};
use crate::models::{IdTokenClaims, Identity};

/// Endpoints published in the authority's discovery document
#[derive(Debug, Clone, Deserialize)]
struct ProviderMetadata {
    authorization_endpoint: String,
    token_endpoint: String,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    id_token: Option<String>,
}

/// OpenID Connect confidential client for a single authority
pub struct OidcClient {
    client: Client,
    authority: Authority,
    client_id: String,
    client_secret: String,
    redirect_uri: String,
    metadata: OnceCell<ProviderMetadata>,
}

impl OidcClient {
    pub fn new(config: &Config) -> std::result::Result<Self, ConfigError> {
        let authority = Authority::parse(&config.auth_authority, &config.auth_known_authorities)?;

        let client = Client::builder()
            .timeout(Duration::from_secs(config.http_timeout_seconds))
            .build()
            .map_err(|e| ConfigError::HttpClient(e.to_string()))?;

        Ok(Self {
            client,
            authority,
            client_id: config.auth_client_id.clone(),
            client_secret: config.auth_client_secret.clone(),
            redirect_uri: config.auth_redirect_url.clone(),
            metadata: OnceCell::new(),
        })
    }

    /// Discovery document, fetched on first use. Failures are not cached.
    async fn metadata(&self) -> Result<&ProviderMetadata> {
        self.metadata.get_or_try_init(|| self.fetch_metadata()).await
    }

    async fn fetch_metadata(&self) -> Result<ProviderMetadata> {
        let url = self.authority.metadata_url();
        tracing::debug!(url = %url, "Fetching authority metadata");

        let res = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| AppError::AuthorizationUrl(format!("Discovery failed: {}", e)))?;

        if !res.status().is_success() {
            return Err(AppError::AuthorizationUrl(format!(
                "Discovery returned {}",
                res.status()
            )));
        }

        res.json::<ProviderMetadata>().await.map_err(|e| {
            AppError::AuthorizationUrl(format!("Invalid discovery document: {}", e))
        })
    }

    /// Read the claims of an ID token received straight from the token
    /// endpoint. The TLS exchange with that endpoint authenticates it, so
    /// only audience and expiry are checked here.
    fn read_id_token(&self, id_token: &str) -> Result<IdTokenClaims> {
        let mut validation = Validation::new(Algorithm::RS256);
        validation.insecure_disable_signature_validation();
        validation.set_audience(&[&self.client_id]);

        decode::<IdTokenClaims>(id_token, &DecodingKey::from_secret(&[]), &validation)
            .map(|data| data.claims)
            .map_err(|e| AppError::IdentityExchange(format!("Invalid ID token: {}", e)))
    }
}

#[async_trait]
impl IdentityProvider for OidcClient {
    async fn authorization_url(&self, request: &AuthorizationRequest) -> Result<String> {
        let metadata = self.metadata().await?;

        let mut url = Url::parse(&metadata.authorization_endpoint).map_err(|e| {
            AppError::AuthorizationUrl(format!("Invalid authorization endpoint: {}", e))
        })?;

        url.query_pairs_mut()
            .append_pair("client_id", &self.client_id)
            .append_pair("response_type", "code")
            .append_pair("redirect_uri", &self.redirect_uri)
            .append_pair("response_mode", "query")
            .append_pair("scope", &request.scopes.join(" "))
            .append_pair("state", &request.state);

        Ok(url.into())
    }

    async fn redeem_code(&self, request: &TokenRequest) -> Result<Identity> {
        let metadata = self
            .metadata()
            .await
            .map_err(|e| AppError::IdentityExchange(e.to_string()))?;

        let scope = request.scopes.join(" ");
        let form = [
            ("client_id", self.client_id.as_str()),
            ("client_secret", self.client_secret.as_str()),
            ("grant_type", "authorization_code"),
            ("code", request.code.as_str()),
            ("redirect_uri", self.redirect_uri.as_str()),
            ("scope", scope.as_str()),
        ];

        let res = self
            .client
            .post(&metadata.token_endpoint)
            .form(&form)
            .send()
            .await
            .map_err(|e| AppError::IdentityExchange(format!("Token request failed: {}", e)))?;

        if !res.status().is_success() {
            let status = res.status();
            let body = res.text().await.unwrap_or_default();
            return Err(AppError::IdentityExchange(format!(
                "Token endpoint returned {}: {}",
                status, body
            )));
        }

        let tokens: TokenResponse = res
            .json()
            .await
            .map_err(|e| AppError::IdentityExchange(format!("Invalid token response: {}", e)))?;

        let id_token = tokens
            .id_token
            .ok_or_else(|| AppError::IdentityExchange("No ID token returned".to_string()))?;

        let claims = self.read_id_token(&id_token)?;
        let username = claims
            .display_name()
            .ok_or_else(|| AppError::IdentityExchange("ID token has no display name".to_string()))?
            .to_string();

        Ok(Identity {
            subject: claims.sub,
            username,
        })
    }
}
