use chrono::Utc;
use http::{Method, StatusCode};
use serde_json::json;
use std::sync::Arc;

use crate::config::CallbackConfig;
use crate::customer_key::CustomerKeyStrategy;
use crate::oauth2::{GoogleProvider, IdentityProvider, get_client};
use crate::state::{CallbackContext, decode_state};
use crate::webhook::{HttpWebhook, WebhookPayload, WebhookSink};

use super::errors::CoordinationError;
use super::outcome::{CallbackOutcome, error_redirect_url, success_redirect_url};

/// Customer key returned by the diagnostic code path.
pub const TEST_CUSTOMER_KEY: &str = "test_customer_key_12345";

/// Query parameters Google sends to the callback.
#[derive(Debug, Clone, Default)]
pub struct CallbackParams {
    pub code: Option<String>,
    pub state: Option<String>,
    pub error: Option<String>,
}

/// Builds the parameters from raw query pairs. The first value of a repeated key
/// wins and unknown keys are ignored.
impl FromIterator<(String, String)> for CallbackParams {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(pairs: I) -> Self {
        let mut params = Self::default();
        for (key, value) in pairs {
            let slot = match key.as_str() {
                "code" => &mut params.code,
                "state" => &mut params.state,
                "error" => &mut params.error,
                _ => continue,
            };
            if slot.is_none() {
                *slot = Some(value);
            }
        }
        params
    }
}

/// Runs the callback flow: validate, decode state, exchange, route the outcome.
///
/// Holds only immutable collaborators, so one instance serves all requests.
pub struct CallbackService {
    provider: Arc<dyn IdentityProvider>,
    webhook: Option<Arc<dyn WebhookSink>>,
    customer_keys: Box<dyn CustomerKeyStrategy>,
    app_path: String,
    test_code: Option<String>,
    fallback_redirect: String,
}

impl CallbackService {
    /// Wires the Google provider and, when enabled, the HTTP webhook.
    pub fn from_config(config: &CallbackConfig) -> Result<Self, CoordinationError> {
        let client = get_client().map_err(|e| {
            CoordinationError::UnknownInternal(format!("Failed to build HTTP client: {e}"))
        })?;

        let provider = GoogleProvider::with_client(config.provider.clone(), client.clone());
        let mut service = Self::new(config, Arc::new(provider));

        match &config.webhook {
            Some(webhook) if webhook.is_enabled() => {
                tracing::info!("Webhook relay enabled");
                service = service.with_webhook(Arc::new(HttpWebhook::new(&webhook.url, client)));
            }
            Some(_) => tracing::info!("Skipping webhook relay - placeholder URL configured"),
            None => tracing::info!("No webhook URL configured"),
        }

        Ok(service)
    }

    pub fn new(config: &CallbackConfig, provider: Arc<dyn IdentityProvider>) -> Self {
        Self {
            provider,
            webhook: None,
            customer_keys: config.customer_key_policy.strategy(),
            app_path: config.app_path.clone(),
            test_code: config.test_code.clone(),
            fallback_redirect: config.fallback_redirect.clone(),
        }
    }

    pub fn with_webhook(mut self, webhook: Arc<dyn WebhookSink>) -> Self {
        self.webhook = Some(webhook);
        self
    }

    pub fn with_customer_key_strategy(mut self, strategy: Box<dyn CustomerKeyStrategy>) -> Self {
        self.customer_keys = strategy;
        self
    }

    /// Handles one callback invocation. Always produces an outcome.
    pub async fn handle_callback(&self, method: &Method, params: &CallbackParams) -> CallbackOutcome {
        tracing::info!("OAuth callback start: method={}", method);
        tracing::debug!(
            "Query parameters: code={}, state={}, error={:?}",
            params.code.is_some(),
            params.state.is_some(),
            params.error
        );

        let (code, state) = match validate_request(method, params) {
            Ok(required) => required,
            Err(err) => return self.error_outcome(err.log(), None),
        };

        let context = match decode_state(state) {
            Ok(context) => context,
            Err(err) => return self.error_outcome(CoordinationError::from(err).log(), None),
        };

        if self.test_code.as_deref() == Some(code) {
            tracing::info!("Test mode detected");
            return CallbackOutcome::json(
                StatusCode::OK,
                json!({
                    "message": "OAuth callback test successful",
                    "decodedState": context,
                    "customerKey": TEST_CUSTOMER_KEY,
                }),
            );
        }

        match self.complete_authorization(code, &context).await {
            Ok(location) => {
                tracing::info!("Redirecting to: {}", location);
                CallbackOutcome::redirect(location)
            }
            Err(err) => self.error_outcome(err.log(), Some(&context)),
        }
    }

    async fn complete_authorization(
        &self,
        code: &str,
        context: &CallbackContext,
    ) -> Result<String, CoordinationError> {
        let tokens = self.provider.exchange_code(code).await?;
        let expires_at = tokens.expires_at()?;
        tracing::debug!("Access token obtained successfully");

        let profile = self.provider.fetch_profile(&tokens.access_token).await?;

        let customer_key = self
            .customer_keys
            .derive_customer_key(context, Utc::now())?;
        tracing::info!("Generated customer key: {}", customer_key);

        let payload = WebhookPayload::new(&customer_key, &profile, &tokens, expires_at, context);
        self.relay_to_webhook(&payload).await;

        Ok(success_redirect_url(
            context,
            &self.app_path,
            &customer_key,
            &profile.email,
        ))
    }

    /// Best-effort delivery. A failure is logged and otherwise ignored.
    async fn relay_to_webhook(&self, payload: &WebhookPayload) {
        let Some(webhook) = &self.webhook else {
            tracing::debug!("Webhook relay disabled");
            return;
        };

        tracing::debug!("Sending payload to webhook: {:?}", payload);
        match webhook.deliver(payload).await {
            Ok(()) => tracing::info!("Webhook payload sent successfully"),
            Err(err) => {
                CoordinationError::from(err).log();
            }
        }
    }

    fn error_outcome(
        &self,
        err: CoordinationError,
        context: Option<&CallbackContext>,
    ) -> CallbackOutcome {
        if err.is_direct_response() {
            return CallbackOutcome::json(err.status_code(), err.response_body());
        }

        let return_domain = context
            .map(|c| c.return_domain.as_str())
            .unwrap_or(self.fallback_redirect.as_str());
        let location = error_redirect_url(return_domain, err.user_message());
        tracing::info!("Error redirect URL: {}", location);
        CallbackOutcome::redirect(location)
    }
}

/// Method, then provider error, then required parameters; first failure wins.
fn validate_request<'a>(
    method: &Method,
    params: &'a CallbackParams,
) -> Result<(&'a str, &'a str), CoordinationError> {
    if method != Method::GET {
        return Err(CoordinationError::MethodNotAllowed);
    }

    if let Some(error) = params.error.as_deref().filter(|e| !e.is_empty()) {
        return Err(CoordinationError::ProviderDenied(error.to_string()));
    }

    let code = params.code.as_deref().filter(|c| !c.is_empty());
    let state = params.state.as_deref().filter(|s| !s.is_empty());
    match (code, state) {
        (Some(code), Some(state)) => Ok((code, state)),
        _ => Err(CoordinationError::MissingParameters),
    }
}
