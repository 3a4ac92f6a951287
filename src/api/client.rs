//! HTTP client for the project backend.
//!
//! Handles multipart uploads, collection fetches and login.

use crate::api::error::ApiError;
use crate::api::models::{
    CollectionResponse, LoginRequest, LoginResponse, Payload, PayloadPart, RecordSummary,
};
use crate::config::Config;
use crate::session::Session;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Project backend client.
///
/// Cheap to clone; clones share the underlying connection pool so a copy can
/// be moved into a spawned task.
#[derive(Debug, Clone)]
pub struct ApiClient {
    /// HTTP client for API requests
    client: Client,
    /// Bearer token from the current session (if any)
    access_token: Option<String>,
    upload_url: String,
    collection_url: String,
    login_url: String,
    /// Upper bound for a whole request, including reading the body
    timeout: Duration,
}

impl ApiClient {
    /// Create a new client from configuration and the current session.
    pub fn new(config: &Config, session: &Session) -> Result<Self, ApiError> {
        let timeout = config.request_timeout();
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            access_token: session.token().map(str::to_string),
            upload_url: config.upload_url.clone(),
            collection_url: config.collection_url(),
            login_url: config.login_url.clone(),
            timeout,
        })
    }

    /// Pick up a new or cleared session token.
    pub fn set_session(&mut self, session: &Session) {
        self.access_token = session.token().map(str::to_string);
    }

    /// Upload a project record as `multipart/form-data`.
    ///
    /// # Returns
    /// * `Result<serde_json::Value>` - Parsed JSON response body
    ///
    /// # Details
    /// Any non-2xx status, transport failure or non-JSON body is an error.
    pub async fn upload_project(&self, payload: Payload) -> Result<serde_json::Value, ApiError> {
        let parts = payload.len();
        let form = build_form(payload)?;
        let request = self.authorized(self.client.post(&self.upload_url)).multipart(form);

        debug!(url = %self.upload_url, parts, "uploading project");
        let response = self.send(request).await?;
        let body = self.read_json(response).await?;
        info!("project uploaded");
        Ok(body)
    }

    /// Fetch every project summary.
    pub async fn fetch_projects(&self) -> Result<Vec<RecordSummary>, ApiError> {
        let request = self.authorized(self.client.get(&self.collection_url));

        debug!(url = %self.collection_url, "fetching projects");
        let response = self.send(request).await?;
        let envelope: CollectionResponse = self.read_json(response).await?;
        let records = envelope.into_records();
        info!(count = records.len(), "projects fetched");
        Ok(records)
    }

    /// Exchange credentials for a session token.
    pub async fn login(&self, email: &str, password: &str) -> Result<String, ApiError> {
        let request = self
            .client
            .post(&self.login_url)
            .json(&LoginRequest { email, password });

        let response = self.send(request).await?;
        let body: LoginResponse = self.read_json(response).await?;
        body.token
            .filter(|token| !token.is_empty())
            .ok_or(ApiError::MissingToken)
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.access_token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    /// Send a request, bounded by the client timeout, and reject non-2xx statuses.
    async fn send(&self, request: RequestBuilder) -> Result<Response, ApiError> {
        let response = tokio::time::timeout(self.timeout, request.send())
            .await
            .map_err(|_| ApiError::Timeout(self.timeout))??;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(%status, "backend rejected request");
            return Err(ApiError::Status { status, body });
        }
        Ok(response)
    }

    async fn read_json<T: DeserializeOwned>(&self, response: Response) -> Result<T, ApiError> {
        let bytes = tokio::time::timeout(self.timeout, response.bytes())
            .await
            .map_err(|_| ApiError::Timeout(self.timeout))??;
        Ok(serde_json::from_slice(&bytes)?)
    }
}

/// Convert the payload into a reqwest multipart form, keeping part order.
fn build_form(payload: Payload) -> Result<Form, ApiError> {
    let mut form = Form::new();
    for part in payload.parts {
        form = match part {
            PayloadPart::Text { key, value } => form.text(key, value),
            PayloadPart::File {
                key,
                file_name,
                content_type,
                bytes,
            } => {
                let part = Part::bytes(bytes)
                    .file_name(file_name)
                    .mime_str(&content_type)
                    .map_err(|e| ApiError::Attachment(e.to_string()))?;
                form.part(key, part)
            }
        };
    }
    Ok(form)
}
