//! HTTP client for a v3 management API.
//!
//! Category values live under `/api/nutanix/v3/categories/{name}/{value}`.
//! Writes are `PUT` (create-or-update), reads `GET`, removals `DELETE`.
//! Requests authenticate with HTTP basic auth.

use crate::client::ResourceClient;
use crate::error::{RemoteError, RemoteResult};
use crate::types::{RemoteRequest, RemoteResource};
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use std::time::Duration;

/// Path prefix of the v3 API.
const API_PREFIX: &str = "api/nutanix/v3";

/// Default per-request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Username and password for basic auth.
#[derive(Clone)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    fn header_value(&self) -> String {
        let raw = format!("{}:{}", self.username, self.password);
        format!("Basic {}", STANDARD.encode(raw))
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Blocking client for category values.
///
/// # Example
///
/// ```no_run
/// use reconcile::client::http::{Credentials, HttpClient};
/// use reconcile::Reconciler;
///
/// let client = HttpClient::new("https://prism.example.com:9440", Credentials::new("admin", "secret"));
/// let reconciler = Reconciler::new(Box::new(client));
/// ```
pub struct HttpClient {
    /// HTTP agent for requests.
    agent: ureq::Agent,
    /// Base URL without the API prefix.
    endpoint: String,
    credentials: Credentials,
}

impl HttpClient {
    /// Create a client with the default timeout.
    #[must_use]
    pub fn new(endpoint: impl Into<String>, credentials: Credentials) -> Self {
        Self::with_timeout(endpoint, credentials, DEFAULT_TIMEOUT)
    }

    /// Create a client whose requests give up after `timeout`.
    #[must_use]
    pub fn with_timeout(
        endpoint: impl Into<String>,
        credentials: Credentials,
        timeout: Duration,
    ) -> Self {
        let config = ureq::Agent::config_builder()
            .timeout_global(Some(timeout))
            .build();
        Self {
            agent: ureq::Agent::new_with_config(config),
            endpoint: endpoint.into().trim_end_matches('/').to_string(),
            credentials,
        }
    }

    /// Get the configured endpoint.
    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Build the URL of a single category value.
    fn value_url(&self, name: &str, value: &str) -> String {
        format!(
            "{}/{}/categories/{}/{}",
            self.endpoint,
            API_PREFIX,
            urlencoding::encode(name),
            urlencoding::encode(value)
        )
    }
}

impl ResourceClient for HttpClient {
    fn create_or_update(&self, name: &str, request: &RemoteRequest) -> RemoteResult<RemoteResource> {
        let value = request
            .value
            .as_deref()
            .ok_or_else(|| RemoteError::InvalidRequest("value is required in the URL path".into()))?;
        let url = self.value_url(name, value);
        log::debug!("PUT {url}");

        self.agent
            .put(&url)
            .header("Authorization", &self.credentials.header_value())
            .header("Accept", "application/json")
            .send_json(request)
            .map_err(|e| map_error(e, name, value))?
            .body_mut()
            .read_json()
            .map_err(|e| map_error(e, name, value))
    }

    fn get_by_name_and_id(&self, name: &str, id: &str) -> RemoteResult<RemoteResource> {
        let url = self.value_url(name, id);
        log::debug!("GET {url}");

        self.agent
            .get(&url)
            .header("Authorization", &self.credentials.header_value())
            .header("Accept", "application/json")
            .call()
            .map_err(|e| map_error(e, name, id))?
            .body_mut()
            .read_json()
            .map_err(|e| map_error(e, name, id))
    }

    fn delete_by_name_and_id(&self, name: &str, id: &str) -> RemoteResult<()> {
        let url = self.value_url(name, id);
        log::debug!("DELETE {url}");

        self.agent
            .delete(&url)
            .header("Authorization", &self.credentials.header_value())
            .header("Accept", "application/json")
            .call()
            .map_err(|e| map_error(e, name, id))?;
        Ok(())
    }
}

/// Translate a transport-level failure into a [`RemoteError`].
fn map_error(err: ureq::Error, name: &str, id: &str) -> RemoteError {
    match err {
        ureq::Error::StatusCode(code) => map_status(code, name, id),
        ureq::Error::Json(e) => RemoteError::InvalidResponse(e.to_string()),
        other => RemoteError::Transport(other.to_string()),
    }
}

fn map_status(code: u16, name: &str, id: &str) -> RemoteError {
    match code {
        404 => RemoteError::not_found(name, id),
        401 | 403 => RemoteError::Unauthorized(format!("HTTP {code}")),
        _ => RemoteError::Status {
            code,
            message: format!("request for {name}/{id} failed"),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> HttpClient {
        HttpClient::new("https://prism.local:9440/", Credentials::new("admin", "secret"))
    }

    #[test]
    fn test_endpoint_trailing_slash_trimmed() {
        assert_eq!(client().endpoint(), "https://prism.local:9440");
    }

    #[test]
    fn test_value_url() {
        assert_eq!(
            client().value_url("env", "prod"),
            "https://prism.local:9440/api/nutanix/v3/categories/env/prod"
        );
    }

    #[test]
    fn test_value_url_encodes_segments() {
        assert_eq!(
            client().value_url("team name", "a/b"),
            "https://prism.local:9440/api/nutanix/v3/categories/team%20name/a%2Fb"
        );
    }

    #[test]
    fn test_value_url_keeps_unreserved() {
        assert_eq!(
            client().value_url("Env-1.x_y~z", "100%"),
            "https://prism.local:9440/api/nutanix/v3/categories/Env-1.x_y~z/100%25"
        );
    }

    #[test]
    fn test_basic_auth_header() {
        let credentials = Credentials::new("admin", "secret");
        assert_eq!(credentials.header_value(), "Basic YWRtaW46c2VjcmV0");
    }

    #[test]
    fn test_credentials_debug_redacts_password() {
        let debug = format!("{:?}", Credentials::new("admin", "secret"));
        assert!(debug.contains("admin"));
        assert!(!debug.contains("secret"));
    }

    #[test]
    fn test_map_status() {
        assert!(map_status(404, "env", "").is_not_found());
        assert!(matches!(map_status(401, "env", "env"), RemoteError::Unauthorized(_)));
        assert!(matches!(map_status(403, "env", "env"), RemoteError::Unauthorized(_)));
        assert!(matches!(
            map_status(500, "env", "env"),
            RemoteError::Status { code: 500, .. }
        ));
    }

    #[test]
    fn test_create_without_value_is_rejected_locally() {
        let err = client()
            .create_or_update("env", &RemoteRequest::default())
            .unwrap_err();
        assert!(matches!(err, RemoteError::InvalidRequest(_)));
    }
}
