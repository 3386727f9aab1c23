use std::env;

/// Minimum length of `SESSION_SECRET`, in bytes.
pub const MIN_SESSION_SECRET_LEN: usize = 32;

#[derive(Debug, Clone)]
pub struct Config {
    pub server_host: String,
    pub server_port: u16,
    pub server_url: String,
    pub static_dir: String,
    pub session_secret: String,
    pub video_api_key: String,
    pub video_api_secret: String,
    pub video_api_url: String,
    pub video_token_ttl_seconds: u64,
    pub auth_authority: String,
    pub auth_client_id: String,
    pub auth_client_secret: String,
    pub auth_redirect_url: String,
    pub auth_known_authorities: Vec<String>,
    pub http_timeout_seconds: u64,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let server_url =
            env::var("SERVER_URL").unwrap_or_else(|_| "http://localhost:3000".to_string());

        let session_secret = required("SESSION_SECRET")?;
        if session_secret.len() < MIN_SESSION_SECRET_LEN {
            return Err(ConfigError::WeakSessionSecret);
        }

        Ok(Config {
            server_host: env::var("SERVER_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            server_port: env::var("SERVER_PORT")
                .unwrap_or_else(|_| "3000".to_string())
                .parse()
                .map_err(|_| ConfigError::InvalidPort)?,
            static_dir: env::var("STATIC_DIR").unwrap_or_else(|_| "public".to_string()),
            session_secret,
            video_api_key: required("VIDEO_API_KEY")?,
            video_api_secret: required("VIDEO_API_SECRET")?,
            video_api_url: env::var("VIDEO_API_URL")
                .unwrap_or_else(|_| "https://api.opentok.com".to_string()),
            video_token_ttl_seconds: env::var("VIDEO_TOKEN_TTL_SECONDS")
                .unwrap_or_else(|_| "86400".to_string())
                .parse()
                .unwrap_or(86400),
            auth_authority: required("AUTH_AUTHORITY")?,
            auth_client_id: required("AUTH_CLIENT_ID")?,
            auth_client_secret: required("AUTH_CLIENT_SECRET")?,
            auth_redirect_url: env::var("AUTH_REDIRECT_URL")
                .unwrap_or_else(|_| format!("{}/redirect", server_url.trim_end_matches('/'))),
            auth_known_authorities: env::var("AUTH_KNOWN_AUTHORITIES")
                .map(|raw| parse_list(&raw))
                .unwrap_or_default(),
            http_timeout_seconds: env::var("HTTP_TIMEOUT_SECONDS")
                .unwrap_or_else(|_| "10".to_string())
                .parse()
                .unwrap_or(10),
            server_url,
        })
    }

    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server_host, self.server_port)
    }
}

fn required(name: &'static str) -> Result<String, ConfigError> {
    env::var(name)
        .ok()
        .filter(|value| !value.trim().is_empty())
        .ok_or(ConfigError::Missing(name))
}

/// Split a comma separated list, dropping blanks.
fn parse_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid server port")]
    InvalidPort,
    #[error("{0} environment variable is required")]
    Missing(&'static str),
    #[error("SESSION_SECRET must be at least {} bytes", MIN_SESSION_SECRET_LEN)]
    WeakSessionSecret,
    #[error("Invalid identity authority URL: {0}")]
    InvalidAuthority(String),
    #[error("Identity authority host {0} is not in AUTH_KNOWN_AUTHORITIES")]
    UnknownAuthority(String),
    #[error("Failed to build HTTP client: {0}")]
    HttpClient(String),
}

#[cfg(test)]
pub(crate) fn test_config() -> Config {
    Config {
        server_host: "localhost".to_string(),
        server_port: 3000,
        server_url: "http://localhost:3000".to_string(),
        static_dir: "public".to_string(),
        session_secret: "a-test-session-secret-that-is-long-enough".to_string(),
        video_api_key: "46000001".to_string(),
        video_api_secret: "video-secret".to_string(),
        video_api_url: "https://api.opentok.com".to_string(),
        video_token_ttl_seconds: 86400,
        auth_authority: "https://contoso.b2clogin.com/contoso.onmicrosoft.com/B2C_1_signin"
            .to_string(),
        auth_client_id: "client-id".to_string(),
        auth_client_secret: "client-secret".to_string(),
        auth_redirect_url: "http://localhost:3000/redirect".to_string(),
        auth_known_authorities: vec!["contoso.b2clogin.com".to_string()],
        http_timeout_seconds: 10,
    }
}
