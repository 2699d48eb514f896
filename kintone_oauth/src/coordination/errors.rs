//! Error types for the callback coordination layer

use http::StatusCode;
use serde_json::{Value, json};
use thiserror::Error;

use crate::oauth2::OAuth2Error;
use crate::state::StateError;
use crate::utils::UtilError;
use crate::webhook::WebhookError;

/// Errors that can occur while handling an OAuth2 callback
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CoordinationError {
    /// The callback was reached with a method other than GET
    #[error("Method not allowed")]
    MethodNotAllowed,

    /// Google redirected back with an `error` parameter
    #[error("OAuth authentication failed: {0}")]
    ProviderDenied(String),

    /// `code` or `state` is missing
    #[error("Missing required parameters")]
    MissingParameters,

    /// The state token could not be decoded
    #[error("Invalid state parameter: {0}")]
    InvalidState(String),

    #[error("Token exchange failed: {0}")]
    TokenExchangeFailed(String),

    #[error("Profile fetch failed: {0}")]
    ProfileFetchFailed(String),

    /// Never surfaces to the caller; only logged
    #[error("Webhook delivery failed: {0}")]
    WebhookDeliveryFailed(String),

    #[error("Internal error: {0}")]
    UnknownInternal(String),
}

impl CoordinationError {
    /// Log the error and return self
    ///
    /// Webhook failures are logged as warnings since they never change the
    /// outcome of the callback.
    pub fn log(self) -> Self {
        match &self {
            Self::MethodNotAllowed => tracing::error!("Method not allowed"),
            Self::ProviderDenied(err) => tracing::error!("OAuth error from Google: {}", err),
            Self::MissingParameters => tracing::error!("Missing required parameters"),
            Self::InvalidState(err) => tracing::error!("State decode error: {}", err),
            Self::TokenExchangeFailed(err) => tracing::error!("Token exchange failed: {}", err),
            Self::ProfileFetchFailed(err) => tracing::error!("Profile fetch failed: {}", err),
            Self::WebhookDeliveryFailed(err) => tracing::warn!("Webhook delivery failed: {}", err),
            Self::UnknownInternal(err) => tracing::error!("Internal error: {}", err),
        }
        self
    }

    /// Whether the error is answered with a JSON body instead of a redirect.
    ///
    /// These are detected before a trustworthy return domain exists.
    pub fn is_direct_response(&self) -> bool {
        matches!(
            self,
            Self::MethodNotAllowed
                | Self::ProviderDenied(_)
                | Self::MissingParameters
                | Self::InvalidState(_)
        )
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            Self::ProviderDenied(_) | Self::MissingParameters | Self::InvalidState(_) => {
                StatusCode::BAD_REQUEST
            }
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// JSON body of a direct error response.
    pub fn response_body(&self) -> Value {
        match self {
            Self::MethodNotAllowed => json!({ "error": "Method not allowed" }),
            Self::ProviderDenied(details) => json!({
                "error": "OAuth authentication failed",
                "details": details,
            }),
            Self::MissingParameters => json!({ "error": "Missing required parameters" }),
            Self::InvalidState(details) => json!({
                "error": "Invalid state parameter",
                "details": details,
            }),
            other => json!({ "error": other.user_message() }),
        }
    }

    /// Message embedded in error redirects. Upstream detail stays in the logs.
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::MethodNotAllowed => "Method not allowed",
            Self::ProviderDenied(_) => "OAuth authentication failed",
            Self::MissingParameters => "Missing required parameters",
            Self::InvalidState(_) => "Invalid state parameter",
            Self::TokenExchangeFailed(_) => "Failed to obtain access token",
            Self::ProfileFetchFailed(_) => "Failed to fetch user info",
            Self::WebhookDeliveryFailed(_) => "Failed to deliver webhook",
            Self::UnknownInternal(_) => "Internal error",
        }
    }
}

impl From<StateError> for CoordinationError {
    fn from(err: StateError) -> Self {
        Self::InvalidState(err.to_string())
    }
}

impl From<OAuth2Error> for CoordinationError {
    fn from(err: OAuth2Error) -> Self {
        match err {
            OAuth2Error::TokenExchange(detail) => Self::TokenExchangeFailed(detail),
            OAuth2Error::FetchUserInfo(detail) => Self::ProfileFetchFailed(detail),
        }
    }
}

impl From<WebhookError> for CoordinationError {
    fn from(err: WebhookError) -> Self {
        Self::WebhookDeliveryFailed(err.to_string())
    }
}

impl From<UtilError> for CoordinationError {
    fn from(err: UtilError) -> Self {
        Self::UnknownInternal(err.to_string())
    }
}
