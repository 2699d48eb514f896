//! kintone_oauth - Google OAuth2 callback bridge for Kintone applications
//!
//! Receives the authorization-code redirect from Google, recovers the Kintone
//! context carried in `state`, exchanges the code for tokens, fetches the
//! user profile, optionally relays the result to a webhook and tells the
//! HTTP layer where to send the browser next.

mod config;
mod coordination;
mod customer_key;
mod oauth2;
mod state;
mod utils;
mod webhook;

pub use config::{
    CallbackConfig, ConfigError, DEFAULT_APP_PATH, DEFAULT_CALLBACK_ROUTE, DEFAULT_TEST_CODE,
    FALLBACK_REDIRECT,
};

pub use coordination::{
    CallbackOutcome, CallbackParams, CallbackService, CoordinationError, TEST_CUSTOMER_KEY,
    error_redirect_url, success_redirect_url,
};

pub use customer_key::{CustomerKeyPolicy, CustomerKeyStrategy, RandomStrategy, SubdomainStrategy};

pub use oauth2::{
    GOOGLE_TOKEN_URL, GOOGLE_USERINFO_URL, GoogleProvider, IdentityProvider, OAuth2Error,
    ProviderConfig, TokenSet, UserProfile,
};

pub use state::{AppId, CallbackContext, StateError, decode_state, encode_state};

pub use utils::UtilError;

pub use webhook::{HttpWebhook, WebhookConfig, WebhookError, WebhookPayload, WebhookSink};
