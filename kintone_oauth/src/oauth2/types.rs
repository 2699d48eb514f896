use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::errors::OAuth2Error;

/// Raw token endpoint body. Everything is optional here so that a body
/// without `access_token` is reported as such instead of as a parse failure.
#[derive(Deserialize)]
pub(super) struct TokenResponse {
    access_token: Option<String>,
    refresh_token: Option<String>,
    token_type: Option<String>,
    expires_in: Option<i64>,
    scope: Option<String>,
    error: Option<String>,
    error_description: Option<String>,
}

impl TokenResponse {
    pub(super) fn into_token_set(self, issued_at: DateTime<Utc>) -> Result<TokenSet, OAuth2Error> {
        let detail = self.upstream_detail();
        let access_token = match self.access_token {
            Some(token) if !token.is_empty() => token,
            _ => {
                return Err(OAuth2Error::TokenExchange(format!(
                    "access_token not present in response{detail}"
                )));
            }
        };

        let tokens = TokenSet {
            access_token,
            refresh_token: self.refresh_token.filter(|t| !t.is_empty()),
            token_type: self.token_type.unwrap_or_else(|| "Bearer".to_string()),
            expires_in: self.expires_in.unwrap_or_default(),
            scope: self.scope,
            issued_at,
        };
        tokens.expires_at()?;
        Ok(tokens)
    }

    pub(super) fn upstream_detail(&self) -> String {
        match (&self.error, &self.error_description) {
            (Some(error), Some(description)) => format!(" ({error}: {description})"),
            (Some(error), None) => format!(" ({error})"),
            _ => String::new(),
        }
    }
}

/// Tokens returned by a successful code exchange.
#[derive(Clone, PartialEq)]
pub struct TokenSet {
    pub access_token: String,
    /// Absent when the user already granted offline access earlier.
    pub refresh_token: Option<String>,
    pub token_type: String,
    pub expires_in: i64,
    pub scope: Option<String>,
    /// When the token response was received.
    pub issued_at: DateTime<Utc>,
}

impl TokenSet {
    /// Fails when `expires_in` does not fit in a representable date.
    pub fn expires_at(&self) -> Result<DateTime<Utc>, OAuth2Error> {
        Duration::try_seconds(self.expires_in)
            .and_then(|lifetime| self.issued_at.checked_add_signed(lifetime))
            .ok_or_else(|| {
                OAuth2Error::TokenExchange(format!("invalid expires_in: {}", self.expires_in))
            })
    }
}

impl fmt::Debug for TokenSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenSet")
            .field("access_token", &"[redacted]")
            .field(
                "refresh_token",
                &self.refresh_token.as_ref().map(|_| "[redacted]"),
            )
            .field("token_type", &self.token_type)
            .field("expires_in", &self.expires_in)
            .field("scope", &self.scope)
            .field("issued_at", &self.issued_at)
            .finish()
    }
}

/// Profile returned by the userinfo endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    pub email: String,
    pub name: Option<String>,
    pub picture: Option<String>,
    pub id: Option<String>,
    pub verified_email: Option<bool>,
}
