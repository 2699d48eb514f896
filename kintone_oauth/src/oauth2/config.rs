use std::fmt;

use crate::utils::mask_secret;

pub const GOOGLE_TOKEN_URL: &str = "https://oauth2.googleapis.com/token";
pub const GOOGLE_USERINFO_URL: &str = "https://www.googleapis.com/oauth2/v1/userinfo";

/// Client registration and endpoints used by [`super::GoogleProvider`].
///
/// Built once at startup and never re-read from the environment mid-flow.
#[derive(Clone)]
pub struct ProviderConfig {
    pub client_id: String,
    pub client_secret: String,
    /// Must match the redirect URI registered with Google byte for byte.
    pub redirect_uri: String,
    pub token_url: String,
    pub userinfo_url: String,
}

impl ProviderConfig {
    pub fn google(
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
        redirect_uri: impl Into<String>,
    ) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            redirect_uri: redirect_uri.into(),
            token_url: GOOGLE_TOKEN_URL.to_string(),
            userinfo_url: GOOGLE_USERINFO_URL.to_string(),
        }
    }
}

impl fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderConfig")
            .field("client_id", &mask_secret(&self.client_id, 20))
            .field("client_secret", &mask_secret(&self.client_secret, 0))
            .field("redirect_uri", &self.redirect_uri)
            .field("token_url", &self.token_url)
            .field("userinfo_url", &self.userinfo_url)
            .finish()
    }
}
