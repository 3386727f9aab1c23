//! In-process fakes of the two external services.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;

use crate::auth::{AuthorizationRequest, IdentityProvider, TokenRequest};
use crate::error::{AppError, Result};
use crate::models::Identity;
use crate::video::{MediaMode, TokenOptions, VideoPlatform};

pub const FAKE_API_KEY: &str = "46000001";

/// Video platform that numbers its sessions and can fail on demand
#[derive(Default)]
pub struct FakeVideoPlatform {
    attempts: AtomicUsize,
    created: AtomicUsize,
    failures_left: AtomicUsize,
    delay: Duration,
}

impl FakeVideoPlatform {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Fail the next `n` creation attempts.
    pub fn failing(self, n: usize) -> Self {
        self.failures_left.store(n, Ordering::SeqCst);
        self
    }

    pub fn attempts(&self) -> usize {
        self.attempts.load(Ordering::SeqCst)
    }

    pub fn created(&self) -> usize {
        self.created.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl VideoPlatform for FakeVideoPlatform {
    fn api_key(&self) -> &str {
        FAKE_API_KEY
    }

    async fn create_session(&self, _mode: MediaMode) -> Result<String> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }

        let should_fail = self
            .failures_left
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();
        if should_fail {
            return Err(AppError::SessionCreation("platform unavailable".to_string()));
        }

        let n = self.created.fetch_add(1, Ordering::SeqCst);
        Ok(format!("session-{}", n))
    }

    fn generate_token(&self, session_id: &str, options: &TokenOptions) -> Result<String> {
        Ok(format!(
            "token:{}:{}:{}",
            session_id,
            options.role.as_str(),
            options.data
        ))
    }
}

/// Identity authority accepting a single code
pub struct FakeIdentityProvider {
    pub valid_code: String,
    pub username: String,
}

impl Default for FakeIdentityProvider {
    fn default() -> Self {
        Self {
            valid_code: "good-code".to_string(),
            username: "Alice".to_string(),
        }
    }
}

#[async_trait]
impl IdentityProvider for FakeIdentityProvider {
    async fn authorization_url(&self, request: &AuthorizationRequest) -> Result<String> {
        Ok(format!(
            "https://login.example.com/authorize?scope={}&state={}",
            urlencoding::encode(&request.scopes.join(" ")),
            urlencoding::encode(&request.state)
        ))
    }

    async fn redeem_code(&self, request: &TokenRequest) -> Result<Identity> {
        if request.code == self.valid_code {
            Ok(Identity {
                subject: "user-123".to_string(),
                username: self.username.clone(),
            })
        } else {
            Err(AppError::IdentityExchange(
                "AADB2C90090: The provided JWE is not a valid 5 segment token".to_string(),
            ))
        }
    }
}
