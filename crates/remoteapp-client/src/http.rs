//! HTTP backend for the application manager REST API
//!
//! Resources live under `{base_url}/api/v1/`:
//! - `GET applications/` lists the catalog with running containers
//! - `POST containers/` starts a container
//! - `DELETE containers/{url_id}/` stops one
//!
//! Requests carry `Authorization: token <api_token>` when a token is set.

use crate::types::{ApplicationItem, ItemsResponse, StartResponse};
use crate::urlutils::path_join;
use crate::{
    ApplicationData, Backend, BackendInfo, ClientError, Container, Result, StartRequest,
};
use async_trait::async_trait;
use reqwest::{header, Response, StatusCode};
use std::time::Duration;

/// Backend talking to a running application manager over HTTP
pub struct HttpBackend {
    client: reqwest::Client,
    base_url: String,
}

impl HttpBackend {
    /// Create a backend for the session rooted at `base_url`
    pub fn new(base_url: &str, timeout: Duration, api_token: Option<&str>) -> Result<Self> {
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(ClientError::InvalidUrl(base_url.to_string()));
        }

        let mut headers = header::HeaderMap::new();
        if let Some(token) = api_token.map(str::trim).filter(|t| !t.is_empty()) {
            let mut value = header::HeaderValue::from_str(&format!("token {}", token))
                .map_err(|_| ClientError::InvalidToken)?;
            value.set_sensitive(true);
            headers.insert(header::AUTHORIZATION, value);
        }

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .default_headers(headers)
            .build()
            .map_err(|e| ClientError::Transport(e.to_string()))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Base URL of the session
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// URL of a REST collection or item; REST resources end with a slash
    fn api_url(&self, segments: &[&str]) -> String {
        let mut parts = vec![self.base_url.as_str(), "api", "v1"];
        parts.extend_from_slice(segments);
        format!("{}/", path_join(&parts))
    }

    async fn fetch_container(&self, url_id: &str) -> Result<Container> {
        let url = self.api_url(&["containers", url_id]);
        tracing::debug!("GET {}", url);
        let response = check_status(self.client.get(&url).send().await?).await?;
        let mut container: Container = response.json().await?;
        if container.url_id.is_empty() {
            container.url_id = url_id.to_string();
        }
        Ok(container)
    }
}

#[async_trait]
impl Backend for HttpBackend {
    async fn applications(&self) -> Result<Vec<ApplicationData>> {
        let url = self.api_url(&["applications"]);
        tracing::debug!("GET {}", url);
        let response = check_status(self.client.get(&url).send().await?).await?;
        let items: ItemsResponse<ApplicationItem> = response.json().await?;
        Ok(items.into_applications())
    }

    async fn start(&self, request: &StartRequest) -> Result<Container> {
        let url = self.api_url(&["containers"]);
        tracing::debug!("POST {} mapping_id={}", url, request.mapping_id);
        let response = check_status(self.client.post(&url).json(request).send().await?).await?;

        // Newer servers answer with the container body, older ones with a
        // 201 and a Location header pointing at the new resource.
        let location = response
            .headers()
            .get(header::LOCATION)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let body = response.text().await?;

        if let Ok(parsed) = serde_json::from_str::<StartResponse>(&body) {
            if !parsed.container.url_id.is_empty() {
                return Ok(parsed.container);
            }
        }

        let url_id = location
            .as_deref()
            .and_then(url_id_from_location)
            .ok_or_else(|| {
                ClientError::Decode("start response carries no container identifier".to_string())
            })?;
        self.fetch_container(&url_id).await
    }

    async fn stop(&self, url_id: &str) -> Result<()> {
        let url = self.api_url(&["containers", url_id]);
        tracing::debug!("DELETE {}", url);
        check_status(self.client.delete(&url).send().await?).await?;
        Ok(())
    }

    fn info(&self) -> BackendInfo {
        BackendInfo {
            name: "http".to_string(),
            base_url: self.base_url.clone(),
        }
    }
}

/// Turn non-success responses into `ClientError::Status`
async fn check_status(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(ClientError::Status {
        code: status.as_u16(),
        message: error_message(status, &body),
    })
}

/// Pick the most useful message from an error body
fn error_message(status: StatusCode, body: &str) -> String {
    if let Ok(value) = serde_json::from_str::<serde_json::Value>(body) {
        if let Some(message) = value.get("message").and_then(|m| m.as_str()) {
            if !message.is_empty() {
                return message.to_string();
            }
        }
    }
    let trimmed = body.trim();
    if !trimmed.is_empty() && trimmed.len() <= 200 && !trimmed.starts_with('<') {
        return trimmed.to_string();
    }
    status
        .canonical_reason()
        .unwrap_or("Unknown error")
        .to_string()
}

/// Last non-empty path segment of a Location header
fn url_id_from_location(location: &str) -> Option<String> {
    location
        .trim_end_matches('/')
        .rsplit('/')
        .next()
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}
