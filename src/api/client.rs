//! Palette Client
//!
//! Main client for interacting with the Palette API, combining authentication
//! and HTTP functionality.

use super::auth::{AuthHeader, Credentials};
use super::http::PaletteHttpClient;
use crate::error::{Error, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use url::Url;

pub const DEFAULT_HOST: &str = "api.spectrocloud.com";

/// Main Palette client
#[derive(Clone, Debug)]
pub struct PaletteClient {
    pub credentials: Credentials,
    pub http: PaletteHttpClient,
    pub base_url: String,
    pub project_uid: Option<String>,
}

impl PaletteClient {
    /// Create a new Palette client
    ///
    /// `host` is either a bare host name (`api.spectrocloud.com`), which is
    /// reached over https, or a full base URL.
    pub fn new(host: &str, credentials: Credentials, project_uid: Option<&str>) -> Result<Self> {
        Ok(Self {
            credentials,
            http: PaletteHttpClient::new()?,
            base_url: normalize_host(host)?,
            project_uid: project_uid.filter(|p| !p.is_empty()).map(String::from),
        })
    }

    /// Scope subsequent calls to a different project (`None` for tenant scope)
    pub fn switch_project(&mut self, project_uid: Option<&str>) {
        self.project_uid = project_uid.filter(|p| !p.is_empty()).map(String::from);
    }

    async fn auth(&self) -> Result<AuthHeader> {
        self.credentials.header(&self.http, &self.base_url).await
    }

    /// Make a GET request to the Palette API
    pub async fn get(&self, url: &str) -> Result<Value> {
        let auth = self.auth().await?;
        self.http.get(url, &auth, self.project_uid.as_deref()).await
    }

    /// Make a POST request to the Palette API
    pub async fn post(&self, url: &str, body: Option<&Value>) -> Result<Value> {
        let auth = self.auth().await?;
        self.http
            .post(url, &auth, self.project_uid.as_deref(), body)
            .await
    }

    /// Make a PUT request to the Palette API
    pub async fn put(&self, url: &str, body: &Value) -> Result<Value> {
        let auth = self.auth().await?;
        self.http
            .put(url, &auth, self.project_uid.as_deref(), body)
            .await
    }

    /// Make a DELETE request to the Palette API
    pub async fn delete(&self, url: &str) -> Result<Value> {
        let auth = self.auth().await?;
        self.http
            .delete(url, &auth, self.project_uid.as_deref())
            .await
    }

    /// GET and decode into a typed entity
    pub async fn get_as<T: DeserializeOwned>(&self, url: &str) -> Result<T> {
        let value = self.get(url).await?;
        Ok(serde_json::from_value(value)?)
    }

    /// POST a typed entity and decode the typed response
    pub async fn post_as<B: Serialize, T: DeserializeOwned>(&self, url: &str, body: &B) -> Result<T> {
        let body = serde_json::to_value(body)?;
        let value = self.post(url, Some(&body)).await?;
        Ok(serde_json::from_value(value)?)
    }

    /// PUT a typed entity, discarding the (empty) response
    pub async fn put_entity<B: Serialize>(&self, url: &str, body: &B) -> Result<()> {
        let body = serde_json::to_value(body)?;
        self.put(url, &body).await?;
        Ok(())
    }

    // =========================================================================
    // Registry API helpers
    // =========================================================================

    /// Build v1 API URL
    pub fn v1_url(&self, path: &str) -> String {
        format!("{}/v1/{}", self.base_url, path)
    }

    /// Build registries URL
    pub fn registries_url(&self, path: &str) -> String {
        self.v1_url(&format!("registries/{}", path))
    }

    /// Build URL of a single OCI registry of the given flavor (`ecr`, `basic`)
    pub fn oci_registry_url(&self, uid: &str, flavor: &str) -> String {
        self.registries_url(&format!("oci/{}/{}", urlencoding::encode(uid), flavor))
    }
}

/// Turn a configured host into a base URL without trailing slash
fn normalize_host(host: &str) -> Result<String> {
    let host = host.trim();
    let candidate = if host.contains("://") {
        host.to_string()
    } else {
        format!("https://{}", host)
    };

    let url = Url::parse(&candidate)
        .map_err(|e| Error::validation(format!("invalid Palette host '{}': {}", host, e)))?;
    if url.host_str().is_none() {
        return Err(Error::validation(format!("invalid Palette host '{}'", host)));
    }

    Ok(url.as_str().trim_end_matches('/').to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(host: &str) -> PaletteClient {
        PaletteClient::new(host, Credentials::api_key("k"), None).unwrap()
    }

    #[test]
    fn test_bare_host_uses_https() {
        assert_eq!(client("api.spectrocloud.com").base_url, "https://api.spectrocloud.com");
    }

    #[test]
    fn test_full_url_kept() {
        assert_eq!(client("http://127.0.0.1:8080/").base_url, "http://127.0.0.1:8080");
    }

    #[test]
    fn test_registry_urls() {
        let c = client("api.spectrocloud.com");
        assert_eq!(
            c.registries_url("pack"),
            "https://api.spectrocloud.com/v1/registries/pack"
        );
        assert_eq!(
            c.oci_registry_url("abc 1", "ecr"),
            "https://api.spectrocloud.com/v1/registries/oci/abc%201/ecr"
        );
    }

    #[test]
    fn test_empty_project_is_tenant_scope() {
        let mut c = PaletteClient::new("h.example.com", Credentials::api_key("k"), Some("")).unwrap();
        assert_eq!(c.project_uid, None);
        c.switch_project(Some("p-1"));
        assert_eq!(c.project_uid.as_deref(), Some("p-1"));
    }

    #[test]
    fn test_invalid_host_rejected() {
        assert!(PaletteClient::new("http://", Credentials::api_key("k"), None).is_err());
    }
}
