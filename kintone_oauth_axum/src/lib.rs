mod callback;
mod error;
mod router;

pub use error::IntoResponseError;
pub use router::{kintone_oauth_router, kintone_oauth_router_no_trace};

// Re-export what a binary needs to build the service
pub use kintone_oauth::{CallbackConfig, CallbackService, ConfigError, CoordinationError};
