use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;

use crate::oauth2::{TokenSet, UserProfile};
use crate::state::{AppId, CallbackContext};

/// Flat record relayed to the webhook after a successful exchange.
#[derive(Clone, PartialEq, Serialize)]
pub struct WebhookPayload {
    pub mail_customer_key: String,
    pub mail_email: String,
    pub mail_name: Option<String>,
    pub mail_picture: Option<String>,
    pub mail_access_token: String,
    pub mail_refresh_token: Option<String>,
    pub mail_token_type: String,
    pub mail_expires_in: i64,
    /// `YYYY-MM-DD`, UTC.
    pub mail_expires_at: String,
    /// `YYYY-MM-DD`, UTC.
    pub mail_created_at: String,
    pub return_domain: String,
    pub app_id: AppId,
}

impl WebhookPayload {
    /// `expires_at` is the already validated [`TokenSet::expires_at`].
    pub fn new(
        customer_key: &str,
        profile: &UserProfile,
        tokens: &TokenSet,
        expires_at: DateTime<Utc>,
        context: &CallbackContext,
    ) -> Self {
        Self {
            mail_customer_key: customer_key.to_string(),
            mail_email: profile.email.clone(),
            mail_name: profile.name.clone(),
            mail_picture: profile.picture.clone(),
            mail_access_token: tokens.access_token.clone(),
            mail_refresh_token: tokens.refresh_token.clone(),
            mail_token_type: tokens.token_type.clone(),
            mail_expires_in: tokens.expires_in,
            mail_expires_at: format_date(expires_at),
            mail_created_at: format_date(tokens.issued_at),
            return_domain: context.return_domain.clone(),
            app_id: context.app_id.clone(),
        }
    }
}

fn format_date(at: DateTime<Utc>) -> String {
    at.format("%Y-%m-%d").to_string()
}

impl fmt::Debug for WebhookPayload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WebhookPayload")
            .field("mail_customer_key", &self.mail_customer_key)
            .field("mail_email", &self.mail_email)
            .field("mail_access_token", &"SET")
            .field(
                "mail_refresh_token",
                &if self.mail_refresh_token.is_some() {
                    "SET"
                } else {
                    "NOT_SET"
                },
            )
            .field("mail_token_type", &self.mail_token_type)
            .field("mail_expires_at", &self.mail_expires_at)
            .field("mail_created_at", &self.mail_created_at)
            .field("return_domain", &self.return_domain)
            .field("app_id", &self.app_id)
            .finish()
    }
}
