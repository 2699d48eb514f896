use async_trait::async_trait;

use super::errors::OAuth2Error;
use super::types::{TokenSet, UserProfile};

/// The two calls made against the identity provider during a callback.
///
/// Both are single attempts; callers decide what a failure means.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Exchanges an authorization code for a token set.
    async fn exchange_code(&self, code: &str) -> Result<TokenSet, OAuth2Error>;

    /// Fetches the profile of the user the access token belongs to.
    async fn fetch_profile(&self, access_token: &str) -> Result<UserProfile, OAuth2Error>;
}
