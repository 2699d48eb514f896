use thiserror::Error;

#[derive(Debug, Error, Clone)]
pub enum WebhookError {
    #[error("Webhook request failed: {0}")]
    Request(String),

    #[error("Webhook returned status: {0}")]
    Status(String),
}
