mod client;
mod config;
mod errors;
mod types;

pub use client::{HttpWebhook, WebhookSink};
pub use config::WebhookConfig;
pub use errors::WebhookError;
pub use types::WebhookPayload;
