mod callback;
mod errors;
mod outcome;

pub use callback::{CallbackParams, CallbackService, TEST_CUSTOMER_KEY};
pub use errors::CoordinationError;
pub use outcome::{CallbackOutcome, error_redirect_url, success_redirect_url};
