use async_trait::async_trait;
use chrono::Utc;
use std::time::Duration;

use super::config::ProviderConfig;
use super::errors::OAuth2Error;
use super::provider::IdentityProvider;
use super::types::{TokenResponse, TokenSet, UserProfile};

/// Creates the HTTP client shared by the provider and the webhook.
///
/// - `pool_idle_timeout`: 90 seconds, the reqwest default made explicit.
/// - `pool_max_idle_per_host`: 32 idle connections per host.
///
/// No request timeout is set; requests run until the transport gives up.
pub(crate) fn get_client() -> Result<reqwest::Client, reqwest::Error> {
    reqwest::Client::builder()
        .pool_idle_timeout(Duration::from_secs(90))
        .pool_max_idle_per_host(32)
        .build()
}

/// Google implementation of [`IdentityProvider`].
#[derive(Debug, Clone)]
pub struct GoogleProvider {
    config: ProviderConfig,
    client: reqwest::Client,
}

impl GoogleProvider {
    pub fn new(config: ProviderConfig) -> Result<Self, OAuth2Error> {
        let client = get_client()
            .map_err(|e| OAuth2Error::TokenExchange(format!("Failed to build HTTP client: {e}")))?;
        Ok(Self::with_client(config, client))
    }

    pub fn with_client(config: ProviderConfig, client: reqwest::Client) -> Self {
        Self { config, client }
    }
}

#[async_trait]
impl IdentityProvider for GoogleProvider {
    async fn exchange_code(&self, code: &str) -> Result<TokenSet, OAuth2Error> {
        tracing::debug!(
            "Token request: url={}, redirect_uri={}",
            self.config.token_url,
            self.config.redirect_uri
        );

        let response = self
            .client
            .post(self.config.token_url.as_str())
            .form(&[
                ("client_id", self.config.client_id.as_str()),
                ("client_secret", self.config.client_secret.as_str()),
                ("code", code),
                ("grant_type", "authorization_code"),
                ("redirect_uri", self.config.redirect_uri.as_str()),
            ])
            .send()
            .await
            .map_err(|e| OAuth2Error::TokenExchange(e.to_string()))?;

        let issued_at = Utc::now();
        let status = response.status();
        tracing::debug!("Token response status: {}", status);

        let response_body = response
            .text()
            .await
            .map_err(|e| OAuth2Error::TokenExchange(e.to_string()))?;

        let token_response: Option<TokenResponse> = serde_json::from_str(&response_body).ok();

        if !status.is_success() {
            let detail = token_response
                .map(|r| r.upstream_detail())
                .unwrap_or_default();
            return Err(OAuth2Error::TokenExchange(format!("{status}{detail}")));
        }

        let token_response = token_response.ok_or_else(|| {
            OAuth2Error::TokenExchange("Failed to deserialize token response".to_string())
        })?;

        let tokens = token_response.into_token_set(issued_at)?;
        tracing::debug!("Token set: {:?}", tokens);
        Ok(tokens)
    }

    async fn fetch_profile(&self, access_token: &str) -> Result<UserProfile, OAuth2Error> {
        let response = self
            .client
            .get(self.config.userinfo_url.as_str())
            .bearer_auth(access_token)
            .send()
            .await
            .map_err(|e| OAuth2Error::FetchUserInfo(e.to_string()))?;

        let status = response.status();
        tracing::debug!("User info response status: {}", status);
        if !status.is_success() {
            return Err(OAuth2Error::FetchUserInfo(status.to_string()));
        }

        let response_body = response
            .text()
            .await
            .map_err(|e| OAuth2Error::FetchUserInfo(e.to_string()))?;

        let profile: UserProfile = serde_json::from_str(&response_body).map_err(|e| {
            OAuth2Error::FetchUserInfo(format!("Failed to deserialize response body: {e}"))
        })?;

        tracing::debug!("User info: email={}, name={:?}", profile.email, profile.name);
        Ok(profile)
    }
}
