use std::time::Duration;

use async_trait::async_trait;
use base64::Engine;
use chrono::Utc;
use hmac::{Hmac, Mac};
use jsonwebtoken::{encode, EncodingKey, Header};
use reqwest::header::ACCEPT;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use sha1::Sha1;

use crate::config::{Config, ConfigError};
use crate::error::{AppError, Result};
use crate::security::generate_nonce;
use crate::video::{
    MediaMode, TokenOptions, VideoPlatform, MAX_CONNECTION_DATA_LEN, MAX_TOKEN_TTL_SECONDS,
};

type HmacSha1 = Hmac<Sha1>;

const TOKEN_SENTINEL: &str = "T1==";
const AUTH_HEADER: &str = "X-OPENTOK-AUTH";
const PROJECT_JWT_TTL_SECONDS: i64 = 180;

/// Claims of the short-lived project JWT sent with every REST call
#[derive(Debug, Serialize, Deserialize)]
struct ProjectClaims {
    iss: String,
    ist: String,
    iat: i64,
    exp: i64,
    jti: String,
}

#[derive(Debug, Deserialize)]
struct CreatedSession {
    session_id: String,
}

/// OpenTok REST client and token signer
#[derive(Clone)]
pub struct OpenTokClient {
    client: Client,
    api_key: String,
    api_secret: String,
    api_url: String,
    default_ttl_seconds: u64,
}

impl OpenTokClient {
    pub fn new(config: &Config) -> std::result::Result<Self, ConfigError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.http_timeout_seconds))
            .build()
            .map_err(|e| ConfigError::HttpClient(e.to_string()))?;

        Ok(Self {
            client,
            api_key: config.video_api_key.clone(),
            api_secret: config.video_api_secret.clone(),
            api_url: config.video_api_url.trim_end_matches('/').to_string(),
            default_ttl_seconds: config.video_token_ttl_seconds,
        })
    }

    fn project_jwt(&self) -> Result<String> {
        let now = Utc::now().timestamp();
        let claims = ProjectClaims {
            iss: self.api_key.clone(),
            ist: "project".to_string(),
            iat: now,
            exp: now + PROJECT_JWT_TTL_SECONDS,
            jti: uuid::Uuid::new_v4().to_string(),
        };

        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.api_secret.as_bytes()),
        )
        .map_err(|e| AppError::SessionCreation(format!("Failed to sign project JWT: {}", e)))
    }

    fn sign(&self, data: &str) -> Result<String> {
        let mut mac = HmacSha1::new_from_slice(self.api_secret.as_bytes())
            .map_err(|e| AppError::Token(e.to_string()))?;
        mac.update(data.as_bytes());
        Ok(hex::encode(mac.finalize().into_bytes()))
    }
}

#[async_trait]
impl VideoPlatform for OpenTokClient {
    fn api_key(&self) -> &str {
        &self.api_key
    }

    async fn create_session(&self, mode: MediaMode) -> Result<String> {
        let p2p = match mode {
            MediaMode::Routed => "disabled",
            MediaMode::Relayed => "enabled",
        };

        let res = self
            .client
            .post(format!("{}/session/create", self.api_url))
            .header(AUTH_HEADER, self.project_jwt()?)
            .header(ACCEPT, "application/json")
            .form(&[("archiveMode", "manual"), ("p2p.preference", p2p)])
            .send()
            .await
            .map_err(|e| AppError::SessionCreation(format!("Request failed: {}", e)))?;

        if !res.status().is_success() {
            let status = res.status();
            let body = res.text().await.unwrap_or_default();
            return Err(AppError::SessionCreation(format!(
                "Platform returned {}: {}",
                status, body
            )));
        }

        let sessions: Vec<CreatedSession> = res
            .json()
            .await
            .map_err(|e| AppError::SessionCreation(format!("Invalid response: {}", e)))?;

        let session_id = sessions
            .into_iter()
            .next()
            .map(|s| s.session_id)
            .filter(|id| !id.is_empty())
            .ok_or_else(|| AppError::SessionCreation("Response held no session".to_string()))?;

        tracing::debug!(session_id = %session_id, ?mode, "Provider session created");
        Ok(session_id)
    }

    fn generate_token(&self, session_id: &str, options: &TokenOptions) -> Result<String> {
        if session_id.is_empty() {
            return Err(AppError::Token("Session id is required".to_string()));
        }
        if options.data.len() > MAX_CONNECTION_DATA_LEN {
            return Err(AppError::Token(format!(
                "Connection data exceeds {} bytes",
                MAX_CONNECTION_DATA_LEN
            )));
        }

        let ttl = options
            .ttl_seconds
            .unwrap_or(self.default_ttl_seconds)
            .min(MAX_TOKEN_TTL_SECONDS);
        let create_time = Utc::now().timestamp();
        let expire_time = create_time + ttl as i64;

        let data = url::form_urlencoded::Serializer::new(String::new())
            .append_pair("session_id", session_id)
            .append_pair("create_time", &create_time.to_string())
            .append_pair("expire_time", &expire_time.to_string())
            .append_pair("role", options.role.as_str())
            .append_pair("connection_data", &options.data)
            .append_pair("nonce", &generate_nonce().to_string())
            .append_pair("initial_layout_class_list", "")
            .finish();

        let sig = self.sign(&data)?;
        let decoded = format!("partner_id={}&sig={}:{}", self.api_key, sig, data);

        Ok(format!(
            "{}{}",
            TOKEN_SENTINEL,
            base64::engine::general_purpose::STANDARD.encode(decoded)
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::test_config;
    use crate::video::Role;
    use jsonwebtoken::{decode, DecodingKey, Validation};
    use pretty_assertions::assert_eq;

    fn decode_token(token: &str) -> String {
        let encoded = token.strip_prefix(TOKEN_SENTINEL).expect("sentinel prefix");
        let bytes = base64::engine::general_purpose::STANDARD
            .decode(encoded)
            .expect("base64 body");
        String::from_utf8(bytes).expect("utf-8 body")
    }

    fn field<'a>(data: &'a str, name: &str) -> Option<String> {
        url::form_urlencoded::parse(data.as_bytes())
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.into_owned())
    }

    #[test]
    fn test_publisher_token_carries_role_and_name() {
        let client = OpenTokClient::new(&test_config()).unwrap();
        let token = client
            .generate_token("1_MX40NjAwMDAwMX4", &TokenOptions::publisher("Alice"))
            .expect("Should generate token");

        let decoded = decode_token(&token);
        let (header, data) = decoded.split_once(':').expect("header and data");
        assert!(header.starts_with("partner_id=46000001&sig="));

        assert_eq!(field(data, "session_id").as_deref(), Some("1_MX40NjAwMDAwMX4"));
        assert_eq!(field(data, "role").as_deref(), Some("publisher"));
        assert_eq!(field(data, "connection_data").as_deref(), Some("name=Alice"));
    }

    #[test]
    fn test_token_signature_matches_data() {
        let client = OpenTokClient::new(&test_config()).unwrap();
        let token = client
            .generate_token("session-1", &TokenOptions::publisher("Bob"))
            .unwrap();

        let decoded = decode_token(&token);
        let (header, data) = decoded.split_once(':').unwrap();
        let sig = header.split("&sig=").nth(1).unwrap();
        assert_eq!(sig, client.sign(data).unwrap());
    }

    #[test]
    fn test_token_ttl_is_capped() {
        let client = OpenTokClient::new(&test_config()).unwrap();
        let options = TokenOptions {
            role: Role::Subscriber,
            data: String::new(),
            ttl_seconds: Some(MAX_TOKEN_TTL_SECONDS * 4),
        };
        let decoded = decode_token(&client.generate_token("session-1", &options).unwrap());
        let (_, data) = decoded.split_once(':').unwrap();

        let create: u64 = field(data, "create_time").unwrap().parse().unwrap();
        let expire: u64 = field(data, "expire_time").unwrap().parse().unwrap();
        assert_eq!(expire - create, MAX_TOKEN_TTL_SECONDS);
    }

    #[test]
    fn test_token_rejects_oversized_data() {
        let client = OpenTokClient::new(&test_config()).unwrap();
        let options = TokenOptions::publisher(&"x".repeat(MAX_CONNECTION_DATA_LEN));
        assert!(client.generate_token("session-1", &options).is_err());
        assert!(client
            .generate_token("", &TokenOptions::publisher("Alice"))
            .is_err());
    }

    #[test]
    fn test_project_jwt_claims() {
        let client = OpenTokClient::new(&test_config()).unwrap();
        let jwt = client.project_jwt().unwrap();

        let claims = decode::<ProjectClaims>(
            &jwt,
            &DecodingKey::from_secret(b"video-secret"),
            &Validation::default(),
        )
        .expect("Should validate project JWT")
        .claims;

        assert_eq!(claims.iss, "46000001");
        assert_eq!(claims.ist, "project");
        assert_eq!(claims.exp - claims.iat, PROJECT_JWT_TTL_SECONDS);
    }

    #[tokio::test]
    async fn test_create_routed_session() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/session/create")
            .match_header("accept", "application/json")
            .match_header(AUTH_HEADER, mockito::Matcher::Any)
            .match_body(mockito::Matcher::AllOf(vec![
                mockito::Matcher::UrlEncoded("archiveMode".into(), "manual".into()),
                mockito::Matcher::UrlEncoded("p2p.preference".into(), "disabled".into()),
            ]))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"[{"session_id":"2_MX40NjAwMDAwMX4","project_id":"46000001"}]"#)
            .create_async()
            .await;

        let mut config = test_config();
        config.video_api_url = server.url();
        let client = OpenTokClient::new(&config).unwrap();

        let session_id = client.create_session(MediaMode::Routed).await.unwrap();
        assert_eq!(session_id, "2_MX40NjAwMDAwMX4");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_create_session_platform_error() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/session/create")
            .with_status(403)
            .with_body(r#"{"code":-1,"message":"Invalid token"}"#)
            .create_async()
            .await;

        let mut config = test_config();
        config.video_api_url = server.url();
        let client = OpenTokClient::new(&config).unwrap();

        let err = client.create_session(MediaMode::Routed).await.unwrap_err();
        assert!(matches!(err, AppError::SessionCreation(_)));
    }

    #[tokio::test]
    async fn test_create_session_empty_response() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/session/create")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body("[]")
            .create_async()
            .await;

        let mut config = test_config();
        config.video_api_url = server.url();
        let client = OpenTokClient::new(&config).unwrap();

        assert!(client.create_session(MediaMode::Relayed).await.is_err());
    }
}
