mod config;
mod errors;
mod google;
mod provider;
mod types;

pub use config::{GOOGLE_TOKEN_URL, GOOGLE_USERINFO_URL, ProviderConfig};
pub use errors::OAuth2Error;
pub use google::GoogleProvider;
pub use provider::IdentityProvider;
pub use types::{TokenSet, UserProfile};

pub(crate) use google::get_client;
