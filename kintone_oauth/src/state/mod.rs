mod codec;
mod errors;
mod types;

pub use codec::{decode_state, encode_state};
pub use errors::StateError;
pub use types::{AppId, CallbackContext};
