//! OpenStack Authentication
//!
//! Handles authentication with either a pre-issued token or Keystone v3
//! password credentials. Password-issued tokens are cached until shortly
//! before they expire.

use super::http::{error_for_status, sanitize_for_log};
use crate::error::{Error, Result};
use chrono::{DateTime, Utc};
use serde_json::{json, Value};
use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;

/// Token expiry buffer - refresh tokens this much before they actually expire
const TOKEN_EXPIRY_BUFFER: Duration = Duration::from_secs(60);

/// Default token TTL if we can't determine expiry (conservative: 30 minutes)
const DEFAULT_TOKEN_TTL: Duration = Duration::from_secs(30 * 60);

const SUBJECT_TOKEN_HEADER: &str = "X-Subject-Token";

/// Keystone v3 password credentials scoped to a project
#[derive(Clone, PartialEq)]
pub struct PasswordAuth {
    pub auth_url: String,
    pub username: String,
    pub password: String,
    pub project_name: String,
    pub user_domain_name: String,
    pub project_domain_name: String,
}

impl fmt::Debug for PasswordAuth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PasswordAuth")
            .field("auth_url", &self.auth_url)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("project_name", &self.project_name)
            .field("user_domain_name", &self.user_domain_name)
            .field("project_domain_name", &self.project_domain_name)
            .finish()
    }
}

impl PasswordAuth {
    fn tokens_url(&self) -> String {
        let base = self.auth_url.trim_end_matches('/');
        if base.ends_with("/v3") {
            format!("{}/auth/tokens", base)
        } else {
            format!("{}/v3/auth/tokens", base)
        }
    }

    fn request_body(&self) -> Value {
        json!({
            "auth": {
                "identity": {
                    "methods": ["password"],
                    "password": {
                        "user": {
                            "name": self.username,
                            "domain": { "name": self.user_domain_name },
                            "password": self.password,
                        }
                    }
                },
                "scope": {
                    "project": {
                        "name": self.project_name,
                        "domain": { "name": self.project_domain_name },
                    }
                }
            }
        })
    }
}

/// How requests are authenticated
#[derive(Debug, Clone, PartialEq)]
pub enum AuthMethod {
    /// A token obtained out of band (e.g. `openstack token issue`)
    Token(String),
    Password(PasswordAuth),
}

#[derive(Clone)]
struct CachedToken {
    token: String,
    /// When this token expires (with buffer applied)
    expires_at: Instant,
}

impl CachedToken {
    fn is_valid(&self) -> bool {
        Instant::now() < self.expires_at
    }
}

/// OpenStack credentials holder with token caching
#[derive(Clone)]
pub struct Credentials {
    method: AuthMethod,
    http: reqwest::Client,
    token_cache: Arc<RwLock<Option<CachedToken>>>,
}

impl Credentials {
    pub fn new(method: AuthMethod, http: reqwest::Client) -> Self {
        Self {
            method,
            http,
            token_cache: Arc::new(RwLock::new(None)),
        }
    }

    /// Get a token for API calls
    /// Security: Checks token expiry before returning cached token
    pub async fn get_token(&self) -> Result<String> {
        let password = match &self.method {
            AuthMethod::Token(token) => return Ok(token.clone()),
            AuthMethod::Password(password) => password,
        };

        {
            let cache = self.token_cache.read().await;
            if let Some(cached) = cache.as_ref() {
                if cached.is_valid() {
                    return Ok(cached.token.clone());
                }
                tracing::debug!("Cached token expired, fetching new token");
            }
        }

        let (token, ttl) = self.issue_token(password).await?;
        let expires_at = Instant::now() + ttl.saturating_sub(TOKEN_EXPIRY_BUFFER);

        {
            let mut cache = self.token_cache.write().await;
            *cache = Some(CachedToken {
                token: token.clone(),
                expires_at,
            });
        }

        tracing::debug!(
            "New token cached, expires in ~{} minutes",
            ttl.saturating_sub(TOKEN_EXPIRY_BUFFER).as_secs() / 60
        );

        Ok(token)
    }

    async fn issue_token(&self, password: &PasswordAuth) -> Result<(String, Duration)> {
        let url = password.tokens_url();
        tracing::debug!("POST {} (user={})", url, password.username);

        let response = self
            .http
            .post(&url)
            .json(&password.request_body())
            .send()
            .await?;

        let status = response.status();
        let token = response
            .headers()
            .get(SUBJECT_TOKEN_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let body = response.text().await?;

        if !status.is_success() {
            tracing::error!("Keystone error: {} - {}", status, sanitize_for_log(&body));
            return Err(keystone_error(status.as_u16(), &body, &url));
        }

        let Some(token) = token else {
            return Err(Error::Unauthorized {
                status: status.as_u16(),
                message: format!("Keystone response carried no {} header", SUBJECT_TOKEN_HEADER),
            });
        };

        let ttl = serde_json::from_str::<Value>(&body)
            .ok()
            .as_ref()
            .and_then(|v| v.pointer("/token/expires_at"))
            .and_then(|v| v.as_str())
            .and_then(token_ttl)
            .unwrap_or(DEFAULT_TOKEN_TTL);

        Ok((token, ttl))
    }
}

/// Classify a failed token request. A 404 here means a wrong `auth_url`,
/// never an absent resource, so it must not reach the not-found fallbacks.
fn keystone_error(status: u16, body: &str, url: &str) -> Error {
    match error_for_status(status, body, url) {
        Error::NotFound(_) => Error::Config(format!(
            "no Keystone token endpoint at {} (check auth_url)",
            url
        )),
        other => other,
    }
}

/// Remaining lifetime of a token given its RFC 3339 `expires_at`; zero once
/// it has passed
fn token_ttl(expires_at: &str) -> Option<Duration> {
    let expires_at: DateTime<Utc> = DateTime::parse_from_rfc3339(expires_at).ok()?.into();
    Some((expires_at - Utc::now()).to_std().unwrap_or(Duration::ZERO))
}
