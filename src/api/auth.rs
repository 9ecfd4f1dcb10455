//! Palette Authentication
//!
//! Handles authentication with either an API key or a username/password
//! login that yields a session token.

use super::http::PaletteHttpClient;
use crate::error::{Error, Result};
use serde_json::json;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;

pub const API_KEY_ENV: &str = "SPECTROCLOUD_APIKEY";
pub const USERNAME_ENV: &str = "SPECTROCLOUD_USERNAME";
pub const PASSWORD_ENV: &str = "SPECTROCLOUD_PASSWORD";

const API_KEY_HEADER: &str = "ApiKey";
const AUTHORIZATION_HEADER: &str = "Authorization";

/// Token expiry buffer - refresh tokens this much before they actually expire
const TOKEN_EXPIRY_BUFFER: Duration = Duration::from_secs(60);

/// Palette session tokens are valid for 15 minutes
const DEFAULT_TOKEN_TTL: Duration = Duration::from_secs(15 * 60);

/// A single header that authenticates a request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthHeader {
    pub name: &'static str,
    pub value: String,
}

/// Session token with its local expiry
#[derive(Clone)]
pub struct CachedToken {
    token: String,
    expires_at: Instant,
}

impl CachedToken {
    fn is_valid(&self) -> bool {
        Instant::now() < self.expires_at
    }
}

/// Palette credentials holder with token caching
#[derive(Clone)]
pub enum Credentials {
    ApiKey(String),
    Password {
        username: String,
        password: String,
        token_cache: Arc<RwLock<Option<CachedToken>>>,
    },
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Credentials::ApiKey(_) => f.write_str("Credentials::ApiKey(***)"),
            Credentials::Password { username, .. } => {
                write!(f, "Credentials::Password({username}, ***)")
            }
        }
    }
}

impl Credentials {
    pub fn api_key(key: &str) -> Self {
        Credentials::ApiKey(key.to_string())
    }

    pub fn password(username: &str, password: &str) -> Self {
        Credentials::Password {
            username: username.to_string(),
            password: password.to_string(),
            token_cache: Arc::new(RwLock::new(None)),
        }
    }

    /// Read credentials from the environment (API key wins over username/password)
    pub fn from_env() -> Result<Self> {
        if let Ok(key) = std::env::var(API_KEY_ENV) {
            if !key.trim().is_empty() {
                return Ok(Self::api_key(key.trim()));
            }
        }

        match (std::env::var(USERNAME_ENV), std::env::var(PASSWORD_ENV)) {
            (Ok(user), Ok(pass)) if !user.is_empty() && !pass.is_empty() => {
                Ok(Self::password(&user, &pass))
            }
            _ => Err(Error::Auth(format!(
                "no credentials found; set {API_KEY_ENV} or {USERNAME_ENV}/{PASSWORD_ENV}"
            ))),
        }
    }

    /// Header to attach to an API request, logging in first if needed
    pub async fn header(&self, http: &PaletteHttpClient, base_url: &str) -> Result<AuthHeader> {
        match self {
            Credentials::ApiKey(key) => Ok(AuthHeader {
                name: API_KEY_HEADER,
                value: key.clone(),
            }),
            Credentials::Password {
                username,
                password,
                token_cache,
            } => {
                {
                    let cache = token_cache.read().await;
                    if let Some(cached) = cache.as_ref() {
                        if cached.is_valid() {
                            return Ok(AuthHeader {
                                name: AUTHORIZATION_HEADER,
                                value: cached.token.clone(),
                            });
                        }
                        tracing::debug!("Cached token expired, logging in again");
                    }
                }

                let token = login(http, base_url, username, password).await?;
                let expires_at = Instant::now() + DEFAULT_TOKEN_TTL - TOKEN_EXPIRY_BUFFER;

                {
                    let mut cache = token_cache.write().await;
                    *cache = Some(CachedToken {
                        token: token.clone(),
                        expires_at,
                    });
                }

                Ok(AuthHeader {
                    name: AUTHORIZATION_HEADER,
                    value: token,
                })
            }
        }
    }
}

async fn login(
    http: &PaletteHttpClient,
    base_url: &str,
    username: &str,
    password: &str,
) -> Result<String> {
    let url = format!("{}/v1/auth/authenticate", base_url);
    let body = json!({ "emailId": username, "password": password });

    let response = http.post_anonymous(&url, &body).await.map_err(|e| match e {
        Error::Api { status: 401, .. } => Error::Auth("invalid username or password".to_string()),
        other => other,
    })?;

    response
        .get("Authorization")
        .and_then(|v| v.as_str())
        .map(String::from)
        .ok_or_else(|| Error::Auth("login response carried no token".to_string()))
}
