use async_trait::async_trait;

use super::errors::WebhookError;
use super::types::WebhookPayload;

#[async_trait]
pub trait WebhookSink: Send + Sync {
    async fn deliver(&self, payload: &WebhookPayload) -> Result<(), WebhookError>;
}

/// Posts the payload as JSON to a fixed URL. The response body is ignored.
#[derive(Debug, Clone)]
pub struct HttpWebhook {
    url: String,
    client: reqwest::Client,
}

impl HttpWebhook {
    pub fn new(url: impl Into<String>, client: reqwest::Client) -> Self {
        Self {
            url: url.into(),
            client,
        }
    }
}

#[async_trait]
impl WebhookSink for HttpWebhook {
    async fn deliver(&self, payload: &WebhookPayload) -> Result<(), WebhookError> {
        let response = self
            .client
            .post(self.url.as_str())
            .json(payload)
            .send()
            .await
            .map_err(|e| WebhookError::Request(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(WebhookError::Status(status.to_string()));
        }

        tracing::debug!("Webhook accepted payload with status {}", status);
        Ok(())
    }
}
