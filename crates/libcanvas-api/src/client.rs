//! Async HTTP client for the project store API

use std::time::Duration;

use serde::de::DeserializeOwned;

use libcanvas_core::{Project, ProjectId};

use crate::error::ApiError;
use crate::messages::{CreateProjectRequest, DeleteBody, ErrorBody, HealthBody, UpdateProjectRequest};

/// Default request timeout in milliseconds
pub const DEFAULT_TIMEOUT_MS: u64 = 15_000;

/// API client for project store communication
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    timeout_ms: u64,
}

impl ApiClient {
    /// Create a client against the given base URL
    pub fn new(base_url: &str) -> Result<Self, ApiError> {
        Self::with_timeout(base_url, DEFAULT_TIMEOUT_MS)
    }

    /// Create a client with a custom timeout
    pub fn with_timeout(base_url: &str, timeout_ms: u64) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_millis(timeout_ms))
            .build()
            .map_err(|e| ApiError::ConnectionFailed(e.to_string()))?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            timeout_ms,
        })
    }

    /// Get the base URL this client talks to
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Get the configured timeout in milliseconds
    pub fn timeout_ms(&self) -> u64 {
        self.timeout_ms
    }

    /// Probe liveness and store connectivity
    pub async fn health(&self) -> Result<HealthBody, ApiError> {
        let response = self
            .http
            .get(self.url("/api/health"))
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;
        self.parse(response).await
    }

    /// List projects visible to the optional requester
    pub async fn list(&self, user_id: Option<&str>) -> Result<Vec<Project>, ApiError> {
        let mut request = self.http.get(self.url("/api/projects"));
        if let Some(user) = user_id {
            request = request.query(&[("userId", user)]);
        }
        let response = request.send().await.map_err(|e| self.transport_error(e))?;
        self.parse(response).await
    }

    /// Fetch one project by id
    pub async fn get(&self, project_id: &ProjectId) -> Result<Project, ApiError> {
        let response = self
            .http
            .get(self.url(&format!("/api/projects/{}", project_id)))
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;
        self.parse(response).await
    }

    /// Create a project; conflict error when the id is already taken
    pub async fn create(&self, request: &CreateProjectRequest) -> Result<Project, ApiError> {
        let response = self
            .http
            .post(self.url("/api/projects"))
            .json(request)
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;
        self.parse(response).await
    }

    /// Replace the mutable fields of an existing project
    pub async fn update(
        &self,
        project_id: &ProjectId,
        changes: &UpdateProjectRequest,
    ) -> Result<Project, ApiError> {
        let response = self
            .http
            .put(self.url(&format!("/api/projects/{}", project_id)))
            .json(changes)
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;
        self.parse(response).await
    }

    /// Remove a project
    pub async fn delete(&self, project_id: &ProjectId) -> Result<DeleteBody, ApiError> {
        let response = self
            .http
            .delete(self.url(&format!("/api/projects/{}", project_id)))
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;
        self.parse(response).await
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Decode a success body, or map a non-success status to the taxonomy
    /// using the server's `{"message": ...}` payload
    async fn parse<T: DeserializeOwned>(&self, response: reqwest::Response) -> Result<T, ApiError> {
        let status = response.status();
        if status.is_success() {
            return response
                .json::<T>()
                .await
                .map_err(|e| ApiError::Decode(e.to_string()));
        }

        let message = match response.json::<ErrorBody>().await {
            Ok(body) => body.message,
            Err(_) => status.to_string(),
        };
        Err(ApiError::from_status(status.as_u16(), message))
    }

    fn transport_error(&self, error: reqwest::Error) -> ApiError {
        if error.is_timeout() {
            ApiError::Timeout(self.timeout_ms)
        } else {
            ApiError::ConnectionFailed(error.to_string())
        }
    }
}
