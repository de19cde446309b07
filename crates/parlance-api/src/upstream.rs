//! Client for the upstream dialogue service.
//!
//! The relay forwards each prompt to `<endpoint>/state/user/{id}/interact`.
//! The upstream keeps all conversation state keyed by that id; the relay
//! never stores anything between calls.

use async_trait::async_trait;
use reqwest::header::{HeaderName, ACCEPT, AUTHORIZATION, CONTENT_TYPE};
use url::Url;
use uuid::Uuid;

use parlance_core::config::{ApiKey, UpstreamConfig, VersionId};
use parlance_core::{ParlanceError, PromptRequest};

use crate::error::RelayError;

const VERSION_HEADER: HeaderName = HeaderName::from_static("versionid");

/// Seam between the relay handler and the upstream dialogue service.
#[async_trait]
pub trait DialogueService: Send + Sync {
    /// Send one turn upstream and return the raw reply body.
    ///
    /// Implementations return `RelayError::UpstreamStatus` for non-success
    /// HTTP statuses. Parsing the body is left to the caller so the raw text
    /// is still available for diagnostics.
    async fn interact(&self, request: &PromptRequest) -> Result<String, RelayError>;
}

/// Production [`DialogueService`] backed by reqwest.
#[derive(Debug, Clone)]
pub struct HttpDialogueClient {
    client: reqwest::Client,
    endpoint: Url,
    api_key: ApiKey,
    version_id: VersionId,
}

impl HttpDialogueClient {
    /// Build a client from validated upstream settings.
    pub fn new(config: &UpstreamConfig) -> Result<Self, ParlanceError> {
        let endpoint = config.endpoint_url()?;
        let version_id = config.version_id.ok_or_else(|| {
            ParlanceError::Config("upstream.version_id is required".to_string())
        })?;
        if config.api_key.is_empty() {
            return Err(ParlanceError::Config(
                "upstream.api_key is required".to_string(),
            ));
        }

        let client = reqwest::Client::builder()
            .connect_timeout(config.timeout())
            .timeout(config.timeout())
            .build()
            .map_err(|e| ParlanceError::Config(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            endpoint,
            api_key: config.api_key.clone(),
            version_id,
        })
    }

    /// Per-session interaction URL. Any path on the endpoint is kept as a prefix.
    pub fn interaction_url(&self, id: &Uuid) -> Url {
        let mut url = self.endpoint.clone();
        let id = id.to_string();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments
                .pop_if_empty()
                .extend(["state", "user", id.as_str(), "interact"]);
        }
        url
    }
}

#[async_trait]
impl DialogueService for HttpDialogueClient {
    async fn interact(&self, request: &PromptRequest) -> Result<String, RelayError> {
        let url = self.interaction_url(&request.id);
        let body = serde_json::to_vec(&request.upstream_body())
            .map_err(|e| RelayError::Internal(e.to_string()))?;

        tracing::debug!(
            session_id = %request.id,
            request_type = %request.request_type,
            url = %url,
            "Forwarding prompt upstream"
        );

        let response = self
            .client
            .post(url)
            .header(ACCEPT, "application/json")
            .header(AUTHORIZATION, self.api_key.expose())
            .header(CONTENT_TYPE, "application/json")
            .header(VERSION_HEADER, self.version_id.as_str())
            .body(body)
            .send()
            .await
            .map_err(RelayError::from_transport)?;

        let status = response.status();
        if !status.is_success() {
            return Err(RelayError::UpstreamStatus {
                status: status.as_u16(),
                reason: status
                    .canonical_reason()
                    .map(str::to_string)
                    .unwrap_or_else(|| status.to_string()),
            });
        }

        response.text().await.map_err(RelayError::from_transport)
    }
}
