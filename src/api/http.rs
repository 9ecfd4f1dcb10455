//! HTTP utilities for Palette REST API calls

use super::auth::AuthHeader;
use crate::error::{Error, Result};
use reqwest::{Client, RequestBuilder};
use serde_json::Value;

/// Maximum length of response body to log (to avoid logging sensitive data)
const MAX_LOG_BODY_LENGTH: usize = 200;

/// Header carrying the project scope of a request
const PROJECT_UID_HEADER: &str = "ProjectUid";

/// Sanitize response body for logging
/// Truncates long responses and strips control characters
fn sanitize_for_log(body: &str) -> String {
    let truncated = if body.len() > MAX_LOG_BODY_LENGTH {
        let mut end = MAX_LOG_BODY_LENGTH;
        while !body.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}... [truncated, {} bytes total]", &body[..end], body.len())
    } else {
        body.to_string()
    };

    truncated.replace(|c: char| !c.is_ascii_graphic() && c != ' ', "")
}

/// Pull the `message` field out of a Palette error body, if there is one
fn error_message(body: &str) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|v| v.get("message").and_then(|m| m.as_str()).map(String::from))
        .unwrap_or_else(|| sanitize_for_log(body))
}

/// HTTP client wrapper for Palette API calls
#[derive(Clone, Debug)]
pub struct PaletteHttpClient {
    client: Client,
}

impl PaletteHttpClient {
    /// Create a new HTTP client
    pub fn new() -> Result<Self> {
        let client = Client::builder()
            .user_agent(concat!("spectro-registry/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self { client })
    }

    fn scoped(
        &self,
        request: RequestBuilder,
        auth: &AuthHeader,
        project_uid: Option<&str>,
    ) -> RequestBuilder {
        let request = request.header(auth.name, &auth.value);
        match project_uid {
            Some(uid) if !uid.is_empty() => request.header(PROJECT_UID_HEADER, uid),
            _ => request,
        }
    }

    async fn execute(&self, request: RequestBuilder) -> Result<Value> {
        let response = request.send().await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            // Only log sanitized/truncated error body to avoid leaking sensitive data
            tracing::error!("API error: {} - {}", status, sanitize_for_log(&body));
            return Err(Error::Api {
                status: status.as_u16(),
                message: error_message(&body),
            });
        }

        // Update and delete endpoints answer 204 with no content
        if body.is_empty() {
            return Ok(Value::Null);
        }

        Ok(serde_json::from_str(&body)?)
    }

    /// Make a GET request to the Palette API
    pub async fn get(&self, url: &str, auth: &AuthHeader, project_uid: Option<&str>) -> Result<Value> {
        tracing::debug!("GET {}", url);
        let request = self.scoped(self.client.get(url), auth, project_uid);
        self.execute(request).await
    }

    /// Make a POST request to the Palette API
    pub async fn post(
        &self,
        url: &str,
        auth: &AuthHeader,
        project_uid: Option<&str>,
        body: Option<&Value>,
    ) -> Result<Value> {
        tracing::debug!("POST {}", url);

        let mut request = self.scoped(self.client.post(url), auth, project_uid);
        if let Some(body) = body {
            request = request.json(body);
        }

        self.execute(request).await
    }

    /// Make a PUT request to the Palette API
    pub async fn put(
        &self,
        url: &str,
        auth: &AuthHeader,
        project_uid: Option<&str>,
        body: &Value,
    ) -> Result<Value> {
        tracing::debug!("PUT {}", url);
        let request = self.scoped(self.client.put(url), auth, project_uid).json(body);
        self.execute(request).await
    }

    /// Make a DELETE request to the Palette API
    pub async fn delete(&self, url: &str, auth: &AuthHeader, project_uid: Option<&str>) -> Result<Value> {
        tracing::debug!("DELETE {}", url);
        let request = self.scoped(self.client.delete(url), auth, project_uid);
        self.execute(request).await
    }

    /// Unauthenticated POST, used for password login
    pub async fn post_anonymous(&self, url: &str, body: &Value) -> Result<Value> {
        tracing::debug!("POST {}", url);
        self.execute(self.client.post(url).json(body)).await
    }
}

/// Format an API error for display
/// Maps status codes to short hints instead of echoing raw API details
pub fn format_api_error(error: &Error) -> String {
    match error {
        Error::NotFound { .. } | Error::Validation(_) => return error.to_string(),
        Error::Auth(_) => {
            return "Authentication failed. Set SPECTROCLOUD_APIKEY or SPECTROCLOUD_USERNAME/SPECTROCLOUD_PASSWORD.".to_string()
        }
        _ => {}
    }

    match error.status() {
        Some(401) => "Authentication failed. Check your Palette API key.".to_string(),
        Some(403) => "Permission denied. Check your Palette project permissions.".to_string(),
        Some(404) => "Resource not found.".to_string(),
        Some(409) => "Resource conflict. The registry may already exist or be in use.".to_string(),
        Some(429) => "Rate limit exceeded. Please try again later.".to_string(),
        Some(400) => "Invalid request. Check your parameters.".to_string(),
        Some(500) | Some(503) => "Palette service temporarily unavailable. Please try again.".to_string(),
        _ => {
            let error_str = error.to_string();
            let sanitized = error_str
                .chars()
                .filter(|c| c.is_ascii_graphic() || *c == ' ')
                .take(80)
                .collect::<String>();

            if sanitized.len() < error_str.len() {
                format!("{}...", sanitized)
            } else {
                sanitized
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_truncates_long_bodies() {
        let body = "x".repeat(500);
        let sanitized = sanitize_for_log(&body);
        assert!(sanitized.starts_with(&"x".repeat(MAX_LOG_BODY_LENGTH)));
        assert!(sanitized.contains("500 bytes total"));
    }

    #[test]
    fn test_error_message_prefers_json_message() {
        let body = r#"{"code":"ResourceNotFound","message":"Registry not found"}"#;
        assert_eq!(error_message(body), "Registry not found");
        assert_eq!(error_message("plain text"), "plain text");
    }

    #[test]
    fn test_format_api_error_by_status() {
        let err = Error::Api {
            status: 403,
            message: "nope".to_string(),
        };
        assert!(format_api_error(&err).starts_with("Permission denied"));

        let err = Error::not_found("r1");
        assert_eq!(format_api_error(&err), "Registry 'r1' not found.");
    }
}
