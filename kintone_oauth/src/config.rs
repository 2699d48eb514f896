//! Central configuration for the kintone_oauth crate
//!
//! Everything is read once at startup into an immutable [`CallbackConfig`].
//! Nothing in the callback flow reads the environment afterwards.

use thiserror::Error;
use url::Url;

use crate::customer_key::CustomerKeyPolicy;
use crate::oauth2::{GOOGLE_TOKEN_URL, GOOGLE_USERINFO_URL, ProviderConfig};
use crate::utils::mask_secret;
use crate::webhook::WebhookConfig;

/// Route the callback handler is mounted on.
pub const DEFAULT_CALLBACK_ROUTE: &str = "/api/oauth/callback";

/// Path segment of Kintone application URLs: `{domain}/k/{app_id}/`.
pub const DEFAULT_APP_PATH: &str = "k";

/// Authorization code that short-circuits the flow for diagnostics.
pub const DEFAULT_TEST_CODE: &str = "test";

/// Error redirect target used when no return domain could be decoded.
pub const FALLBACK_REDIRECT: &str = "about:blank";

#[derive(Debug, Error, Clone, PartialEq)]
pub enum ConfigError {
    #[error("Missing configuration: {0}")]
    Missing(String),

    #[error("Invalid configuration {key}: {reason}")]
    Invalid { key: String, reason: String },
}

#[derive(Debug, Clone)]
pub struct CallbackConfig {
    pub provider: ProviderConfig,
    /// `None` disables the webhook relay.
    pub webhook: Option<WebhookConfig>,
    pub callback_route: String,
    pub app_path: String,
    pub customer_key_policy: CustomerKeyPolicy,
    /// `None` disables the diagnostic code.
    pub test_code: Option<String>,
    pub fallback_redirect: String,
}

impl CallbackConfig {
    /// Builds a configuration with defaults for everything but the credentials.
    pub fn new(provider: ProviderConfig) -> Self {
        Self {
            provider,
            webhook: None,
            callback_route: DEFAULT_CALLBACK_ROUTE.to_string(),
            app_path: DEFAULT_APP_PATH.to_string(),
            customer_key_policy: CustomerKeyPolicy::default(),
            test_code: Some(DEFAULT_TEST_CODE.to_string()),
            fallback_redirect: FALLBACK_REDIRECT.to_string(),
        }
    }

    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary key lookup.
    ///
    /// Empty values count as unset, except `OAUTH2_TEST_CODE` where an empty
    /// value disables the diagnostic code.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let client_id =
            get("GOOGLE_CLIENT_ID").ok_or_else(|| ConfigError::Missing("GOOGLE_CLIENT_ID".into()))?;
        let client_secret = get("GOOGLE_CLIENT_SECRET")
            .ok_or_else(|| ConfigError::Missing("GOOGLE_CLIENT_SECRET".into()))?;

        let callback_route =
            get("CALLBACK_ROUTE").unwrap_or_else(|| DEFAULT_CALLBACK_ROUTE.to_string());
        if !callback_route.starts_with('/') {
            return Err(ConfigError::Invalid {
                key: "CALLBACK_ROUTE".to_string(),
                reason: "must start with '/'".to_string(),
            });
        }

        let redirect_uri = match (get("OAUTH2_REDIRECT_URI"), get("ORIGIN")) {
            (Some(uri), _) => uri,
            (None, Some(origin)) => format!("{}{}", origin.trim_end_matches('/'), callback_route),
            (None, None) => {
                return Err(ConfigError::Missing(
                    "OAUTH2_REDIRECT_URI or ORIGIN".to_string(),
                ));
            }
        };
        validate_url("OAUTH2_REDIRECT_URI", &redirect_uri)?;

        let token_url = get("OAUTH2_TOKEN_URL").unwrap_or_else(|| GOOGLE_TOKEN_URL.to_string());
        validate_url("OAUTH2_TOKEN_URL", &token_url)?;
        let userinfo_url =
            get("OAUTH2_USERINFO_URL").unwrap_or_else(|| GOOGLE_USERINFO_URL.to_string());
        validate_url("OAUTH2_USERINFO_URL", &userinfo_url)?;

        let webhook = match get("ZAPIER_WEBHOOK_URL") {
            Some(url) => {
                validate_url("ZAPIER_WEBHOOK_URL", &url)?;
                Some(WebhookConfig {
                    url,
                    placeholder_marker: get("ZAPIER_WEBHOOK_PLACEHOLDER"),
                })
            }
            None => None,
        };

        let customer_key_policy = match get("CUSTOMER_KEY_STRATEGY") {
            Some(value) => value
                .parse::<CustomerKeyPolicy>()
                .map_err(|reason| ConfigError::Invalid {
                    key: "CUSTOMER_KEY_STRATEGY".to_string(),
                    reason,
                })?,
            None => CustomerKeyPolicy::default(),
        };

        let test_code = match lookup("OAUTH2_TEST_CODE") {
            Some(code) if code.trim().is_empty() => None,
            Some(code) => Some(code),
            None => Some(DEFAULT_TEST_CODE.to_string()),
        };

        Ok(Self {
            provider: ProviderConfig {
                client_id,
                client_secret,
                redirect_uri,
                token_url,
                userinfo_url,
            },
            webhook,
            callback_route,
            app_path: get("KINTONE_APP_PATH")
                .map(|path| path.trim_matches('/').to_string())
                .unwrap_or_else(|| DEFAULT_APP_PATH.to_string()),
            customer_key_policy,
            test_code,
            fallback_redirect: get("FALLBACK_REDIRECT")
                .unwrap_or_else(|| FALLBACK_REDIRECT.to_string()),
        })
    }

    /// Logs which settings are present without printing any secret.
    pub fn log_summary(&self) {
        tracing::info!(
            client_id = %mask_secret(&self.provider.client_id, 20),
            has_client_secret = !self.provider.client_secret.is_empty(),
            redirect_uri = %self.provider.redirect_uri,
            callback_route = %self.callback_route,
            webhook_enabled = self.webhook.as_ref().is_some_and(WebhookConfig::is_enabled),
            customer_key_strategy = self.customer_key_policy.as_str(),
            test_code_enabled = self.test_code.is_some(),
            "Callback configuration loaded"
        );
    }
}

fn validate_url(key: &str, value: &str) -> Result<(), ConfigError> {
    Url::parse(value)
        .map(|_| ())
        .map_err(|e| ConfigError::Invalid {
            key: key.to_string(),
            reason: e.to_string(),
        })
}
