// ============================================================================
// Thesis Infrastructure - REST Client
// File: crates/thesis-infrastructure/src/http/client.rs
// ============================================================================

use std::time::Duration;

use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, error, warn};

use thesis_core::error::SessionError;
use thesis_shared::config::ApiSettings;

/// Thin wrapper over `reqwest` that maps transport and status failures
/// onto [`SessionError`].
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    token: Option<String>,
}

impl ApiClient {
    pub fn new(settings: &ApiSettings, token: Option<String>) -> Result<Self, SessionError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(settings.timeout_seconds))
            .build()
            .map_err(|e| SessionError::Network(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: settings.base_url.trim_end_matches('/').to_string(),
            token,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, SessionError> {
        let resp = self.send(self.client.get(self.url(path)), path).await?;
        let resp = ensure_ok(resp, path)?;
        decode(resp, path).await
    }

    /// Like [`ApiClient::get_json`], but a 404 is `Ok(None)`.
    pub async fn get_optional<T: DeserializeOwned>(&self, path: &str) -> Result<Option<T>, SessionError> {
        let resp = self.send(self.client.get(self.url(path)), path).await?;
        if resp.status() == StatusCode::NOT_FOUND {
            debug!("GET {} returned 404", path);
            return Ok(None);
        }
        let resp = ensure_ok(resp, path)?;
        decode(resp, path).await.map(Some)
    }

    pub async fn post_json<B, T>(&self, path: &str, body: &B) -> Result<T, SessionError>
    where
        B: Serialize + ?Sized + Sync,
        T: DeserializeOwned,
    {
        let resp = self.send(self.client.post(self.url(path)).json(body), path).await?;
        let resp = ensure_ok(resp, path)?;
        decode(resp, path).await
    }

    pub async fn put_json<B, T>(&self, path: &str, body: &B) -> Result<T, SessionError>
    where
        B: Serialize + ?Sized + Sync,
        T: DeserializeOwned,
    {
        let resp = self.send(self.client.put(self.url(path)).json(body), path).await?;
        let resp = ensure_ok(resp, path)?;
        decode(resp, path).await
    }

    async fn send(&self, request: RequestBuilder, label: &str) -> Result<Response, SessionError> {
        let request = match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        };
        request.send().await.map_err(|e| {
            error!("Request {} failed: {}", label, e);
            SessionError::Network(e.to_string())
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

fn ensure_ok(resp: Response, label: &str) -> Result<Response, SessionError> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    warn!("{} returned {}", label, status);
    Err(match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
            SessionError::Permission(format!("{} ({})", label, status))
        }
        StatusCode::NOT_FOUND => SessionError::NotFound(label.to_string()),
        _ => SessionError::Network(format!("{} returned {}", label, status)),
    })
}

async fn decode<T: DeserializeOwned>(resp: Response, label: &str) -> Result<T, SessionError> {
    resp.json::<T>().await.map_err(|e| {
        error!("Invalid response body from {}: {}", label, e);
        SessionError::Network(format!("invalid response from {}", label))
    })
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    pub(crate) fn client_for(server: &MockServer) -> ApiClient {
        let settings = ApiSettings {
            base_url: server.uri(),
            timeout_seconds: 5,
        };
        ApiClient::new(&settings, Some("token-123".to_string())).unwrap()
    }

    #[tokio::test]
    async fn test_bearer_token_sent() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/ping"))
            .and(header("authorization", "Bearer token-123"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"ok": true})))
            .mount(&server)
            .await;

        let body: serde_json::Value = client_for(&server).get_json("/ping").await.unwrap();
        assert_eq!(body["ok"], true);
    }

    #[tokio::test]
    async fn test_status_mapping() {
        let server = MockServer::start().await;
        Mock::given(path("/forbidden"))
            .respond_with(ResponseTemplate::new(403))
            .mount(&server)
            .await;
        Mock::given(path("/missing"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;
        Mock::given(path("/broken"))
            .respond_with(ResponseTemplate::new(502))
            .mount(&server)
            .await;
        let client = client_for(&server);

        let forbidden = client.get_json::<serde_json::Value>("/forbidden").await.unwrap_err();
        assert!(matches!(forbidden, SessionError::Permission(_)));
        let missing = client.get_json::<serde_json::Value>("/missing").await.unwrap_err();
        assert!(matches!(missing, SessionError::NotFound(_)));
        assert_eq!(client.get_optional::<serde_json::Value>("/missing").await.unwrap(), None);
        let broken = client.get_json::<serde_json::Value>("/broken").await.unwrap_err();
        assert!(broken.is_retryable());
    }

    #[tokio::test]
    async fn test_invalid_body_is_network_error() {
        let server = MockServer::start().await;
        Mock::given(path("/garbage"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&server)
            .await;

        let err = client_for(&server).get_json::<Vec<String>>("/garbage").await.unwrap_err();
        assert!(matches!(err, SessionError::Network(_)));
    }
}
