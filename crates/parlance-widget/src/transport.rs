use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use url::Url;

use parlance_core::PromptRequest;

use crate::error::TransportError;

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// Delivers a prompt to the relay and returns the reply body of a 200.
#[async_trait]
pub trait RelayTransport: Send + Sync {
    async fn send(&self, request: &PromptRequest) -> Result<String, TransportError>;
}

/// Relay transport over HTTP: `POST {base}/api/prompt`.
#[derive(Debug, Clone)]
pub struct HttpRelay {
    client: reqwest::Client,
    prompt_url: Url,
}

impl HttpRelay {
    pub fn new(base_url: &str) -> Result<Self, TransportError> {
        Self::with_timeout(base_url, DEFAULT_TIMEOUT)
    }

    pub fn with_timeout(base_url: &str, timeout: Duration) -> Result<Self, TransportError> {
        let prompt_url = prompt_url(base_url)?;
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(TransportError::from)?;
        Ok(Self { client, prompt_url })
    }

    pub fn prompt_url(&self) -> &Url {
        &self.prompt_url
    }
}

fn prompt_url(base_url: &str) -> Result<Url, TransportError> {
    let mut url =
        Url::parse(base_url).map_err(|e| TransportError::InvalidUrl(format!("{base_url}: {e}")))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(TransportError::InvalidUrl(format!(
            "{base_url}: scheme must be http or https"
        )));
    }
    url.path_segments_mut()
        .map_err(|_| TransportError::InvalidUrl(base_url.to_string()))?
        .pop_if_empty()
        .extend(["api", "prompt"]);
    Ok(url)
}

#[async_trait]
impl RelayTransport for HttpRelay {
    async fn send(&self, request: &PromptRequest) -> Result<String, TransportError> {
        let body =
            serde_json::to_vec(request).map_err(|e| TransportError::Encode(e.to_string()))?;

        tracing::debug!(
            session_id = %request.id,
            request_type = %request.request_type,
            "Posting prompt to relay"
        );

        let response = self
            .client
            .post(self.prompt_url.clone())
            .header(ACCEPT, "text/plain")
            .header(CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await?;
        if !status.is_success() {
            return Err(TransportError::Status {
                status: status.as_u16(),
                message: text,
            });
        }
        Ok(text)
    }
}
