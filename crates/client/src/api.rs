//! REST client for the event badge endpoints.
//!
//! Wraps the backend HTTP API (event fetch, badge template CRUD, active
//! pointer update) using [`reqwest`].

use async_trait::async_trait;
use lanyard_core::codec::{ApiPayload, BadgeTemplateRecord, EventPointerPayload, EventRecord};
use lanyard_core::error::CoreError;
use lanyard_core::repository::TemplateRepository;
use lanyard_core::types::DbId;

use crate::config::ClientConfig;

/// HTTP client for one badge backend.
#[derive(Debug, Clone)]
pub struct BadgeApi {
    client: reqwest::Client,
    api_url: String,
}

/// Errors from the badge REST API layer.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The HTTP request itself failed (network, DNS, TLS, timeout, body decode).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The backend returned a non-2xx status code.
    #[error("Badge API error ({status}): {}", status_detail(.message, .body))]
    Status {
        /// HTTP status code.
        status: u16,
        /// Human-readable message pulled from the body, if any.
        message: Option<String>,
        /// Raw response body for debugging.
        body: String,
    },
}

impl ApiError {
    /// Build a status error, extracting the backend's message from `body`.
    pub fn from_status(status: u16, body: String) -> Self {
        ApiError::Status {
            status,
            message: backend_message(&body),
            body,
        }
    }

    /// The human-readable message the backend put in its error body, if any.
    pub fn backend_message(&self) -> Option<&str> {
        match self {
            ApiError::Status { message, .. } => message.as_deref(),
            ApiError::Request(_) => None,
        }
    }
}

fn status_detail<'a>(message: &'a Option<String>, body: &'a str) -> &'a str {
    message.as_deref().unwrap_or(body)
}

/// Badge endpoints report failures as `{"error": ...}` or `{"message": ...}`;
/// anything else (proxy pages, plain text) is used verbatim.
fn backend_message(body: &str) -> Option<String> {
    let parsed = serde_json::from_str::<serde_json::Value>(body).ok();
    let from_json = parsed.as_ref().and_then(|value| {
        ["error", "message"]
            .iter()
            .find_map(|key| value.get(*key).and_then(|v| v.as_str()))
            .map(str::to_string)
    });
    from_json.or_else(|| {
        let text = body.trim();
        (!text.is_empty()).then(|| text.to_string())
    })
}

impl From<ApiError> for CoreError {
    fn from(err: ApiError) -> Self {
        match &err {
            ApiError::Request(inner) if inner.is_decode() => CoreError::Decode(inner.to_string()),
            ApiError::Request(inner) => CoreError::Network {
                status: inner.status().map(|s| s.as_u16()),
                message: inner.to_string(),
            },
            ApiError::Status {
                status, message, ..
            } => CoreError::Network {
                status: Some(*status),
                message: message
                    .clone()
                    .unwrap_or_else(|| format!("request failed with status {status}")),
            },
        }
    }
}

impl BadgeApi {
    /// Create a new API client.
    ///
    /// * `api_url` - Base HTTP URL, e.g. `http://host:3000/api`.
    pub fn new(api_url: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), api_url)
    }

    /// Create an API client reusing an existing [`reqwest::Client`].
    pub fn with_client(client: reqwest::Client, api_url: impl Into<String>) -> Self {
        let api_url = api_url.into().trim_end_matches('/').to_string();
        Self { client, api_url }
    }

    /// Build a client with the configured timeout.
    pub fn from_config(config: &ClientConfig) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout())
            .build()?;
        Ok(Self::with_client(client, config.api_url.clone()))
    }

    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    pub async fn fetch_event(&self, event_id: &str) -> Result<EventRecord, ApiError> {
        let response = self
            .client
            .get(format!("{}/events/{}", self.api_url, event_id))
            .send()
            .await?;

        Self::parse_response(response).await
    }

    pub async fn fetch_templates(
        &self,
        event_id: &str,
    ) -> Result<Vec<BadgeTemplateRecord>, ApiError> {
        let response = self
            .client
            .get(format!("{}/events/{}/badges", self.api_url, event_id))
            .send()
            .await?;

        Self::parse_response(response).await
    }

    pub async fn post_template(
        &self,
        event_id: &str,
        payload: &ApiPayload,
    ) -> Result<BadgeTemplateRecord, ApiError> {
        let response = self
            .client
            .post(format!("{}/events/{}/badges", self.api_url, event_id))
            .json(payload)
            .send()
            .await?;

        Self::parse_response(response).await
    }

    pub async fn put_template(
        &self,
        event_id: &str,
        id: DbId,
        payload: &ApiPayload,
    ) -> Result<BadgeTemplateRecord, ApiError> {
        let response = self
            .client
            .put(format!("{}/events/{}/badges/{}", self.api_url, event_id, id))
            .json(payload)
            .send()
            .await?;

        Self::parse_response(response).await
    }

    pub async fn remove_template(&self, event_id: &str, id: DbId) -> Result<(), ApiError> {
        let response = self
            .client
            .delete(format!("{}/events/{}/badges/{}", self.api_url, event_id, id))
            .send()
            .await?;

        Self::check_status(response).await
    }

    pub async fn put_active_pointer(
        &self,
        event_id: &str,
        template_id: DbId,
    ) -> Result<EventRecord, ApiError> {
        let response = self
            .client
            .put(format!("{}/events/{}", self.api_url, event_id))
            .json(&EventPointerPayload::new(template_id))
            .send()
            .await?;

        Self::parse_response(response).await
    }

    // ---- private helpers ----

    /// Turn a non-2xx response into [`ApiError::Status`], carrying the
    /// backend's own message when the body has one.
    async fn ensure_success(response: reqwest::Response) -> Result<reqwest::Response, ApiError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let url = response.url().to_string();
        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "<unreadable body>".to_string());
        let err = ApiError::from_status(status.as_u16(), body);
        tracing::warn!(
            status = status.as_u16(),
            url = %url,
            backend_message = err.backend_message().unwrap_or("-"),
            "Badge API rejected request",
        );
        Err(err)
    }

    /// Decode a successful JSON body. A 2xx with a body that is not the
    /// expected shape surfaces as a decode error.
    async fn parse_response<T: serde::de::DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, ApiError> {
        let response = Self::ensure_success(response).await?;
        let url = response.url().to_string();
        response.json::<T>().await.map_err(|e| {
            tracing::warn!(url = %url, error = %e, "Badge API returned an unexpected body");
            ApiError::Request(e)
        })
    }

    /// Check the status of a response whose body is not needed (deletes).
    async fn check_status(response: reqwest::Response) -> Result<(), ApiError> {
        Self::ensure_success(response).await.map(drop)
    }
}

#[async_trait]
impl TemplateRepository for BadgeApi {
    async fn get_event(&self, event_id: &str) -> Result<EventRecord, CoreError> {
        tracing::debug!(event_id, "Fetching event");
        Ok(self.fetch_event(event_id).await?)
    }

    async fn list_templates(&self, event_id: &str) -> Result<Vec<BadgeTemplateRecord>, CoreError> {
        tracing::debug!(event_id, "Fetching badge templates");
        Ok(self.fetch_templates(event_id).await?)
    }

    async fn create_template(
        &self,
        event_id: &str,
        payload: &ApiPayload,
    ) -> Result<BadgeTemplateRecord, CoreError> {
        tracing::debug!(event_id, name = %payload.badge_template.name, "Creating badge template");
        Ok(self.post_template(event_id, payload).await?)
    }

    async fn update_template(
        &self,
        event_id: &str,
        id: DbId,
        payload: &ApiPayload,
    ) -> Result<BadgeTemplateRecord, CoreError> {
        tracing::debug!(event_id, template_id = id, "Updating badge template");
        Ok(self.put_template(event_id, id, payload).await?)
    }

    async fn delete_template(&self, event_id: &str, id: DbId) -> Result<(), CoreError> {
        tracing::debug!(event_id, template_id = id, "Deleting badge template");
        Ok(self.remove_template(event_id, id).await?)
    }

    async fn set_active_template(
        &self,
        event_id: &str,
        template_id: DbId,
    ) -> Result<EventRecord, CoreError> {
        tracing::debug!(event_id, template_id, "Moving active badge pointer");
        Ok(self.put_active_pointer(event_id, template_id).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn status(body: &str) -> ApiError {
        ApiError::from_status(422, body.to_string())
    }

    #[test]
    fn backend_message_from_error_field() {
        assert_eq!(
            status(r#"{"error":"Name can't be blank"}"#).backend_message(),
            Some("Name can't be blank")
        );
    }

    #[test]
    fn backend_message_from_message_field() {
        assert_eq!(
            status(r#"{"message":"Event is locked"}"#).backend_message(),
            Some("Event is locked")
        );
    }

    #[test]
    fn backend_message_falls_back_to_raw_text() {
        assert_eq!(
            status("Bad Gateway").backend_message(),
            Some("Bad Gateway")
        );
        assert_eq!(status("   ").backend_message(), None);
    }

    #[test]
    fn status_error_displays_backend_message() {
        let err = status(r#"{"error":"Name can't be blank"}"#);
        assert_eq!(err.to_string(), "Badge API error (422): Name can't be blank");
    }

    #[test]
    fn status_without_body_falls_back_to_generic_message() {
        let core: CoreError = status("").into();
        assert_eq!(
            core,
            CoreError::Network {
                status: Some(422),
                message: "request failed with status 422".to_string(),
            }
        );
    }

    #[test]
    fn status_error_becomes_network_error() {
        let core: CoreError = status(r#"{"error":"Name can't be blank"}"#).into();
        assert_eq!(
            core,
            CoreError::Network {
                status: Some(422),
                message: "Name can't be blank".to_string(),
            }
        );
    }

    #[test]
    fn base_url_trailing_slash_trimmed() {
        let api = BadgeApi::new("http://localhost:3000/api/");
        assert_eq!(api.api_url(), "http://localhost:3000/api");
    }
}
