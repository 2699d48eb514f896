use base64::{
    Engine as _, alphabet,
    engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig, general_purpose::STANDARD},
};
use serde_json::Value;
use url::Url;

use super::errors::StateError;
use super::types::CallbackContext;

const LENIENT: GeneralPurposeConfig =
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent);

const STANDARD_LENIENT: GeneralPurpose = GeneralPurpose::new(&alphabet::STANDARD, LENIENT);
const URL_SAFE_LENIENT: GeneralPurpose = GeneralPurpose::new(&alphabet::URL_SAFE, LENIENT);

/// Encodes a context as standard base64 of its JSON form.
pub fn encode_state(context: &CallbackContext) -> Result<String, StateError> {
    let state_json =
        serde_json::to_string(context).map_err(|e| StateError::Serde(e.to_string()))?;
    Ok(STANDARD.encode(state_json))
}

/// Decodes the `state` query parameter into a [`CallbackContext`].
///
/// Both the standard and the URL-safe base64 alphabets are accepted, with or
/// without padding. A space is read as `+`, since an unescaped `+` in a query
/// string arrives form-decoded as a space.
pub fn decode_state(state: &str) -> Result<CallbackContext, StateError> {
    let normalized = state.trim().replace(' ', "+");

    let decoded_bytes = STANDARD_LENIENT
        .decode(&normalized)
        .or_else(|_| URL_SAFE_LENIENT.decode(&normalized))
        .map_err(|e| StateError::Base64(e.to_string()))?;
    let decoded_string =
        String::from_utf8(decoded_bytes).map_err(|e| StateError::Utf8(e.to_string()))?;

    let value: Value =
        serde_json::from_str(&decoded_string).map_err(|e| StateError::Json(e.to_string()))?;
    if !value.is_object() {
        return Err(StateError::NotAnObject);
    }

    let context: CallbackContext =
        serde_json::from_value(value).map_err(|e| StateError::InvalidField(e.to_string()))?;

    validate_return_domain(&context.return_domain)?;
    if context.app_id.is_blank() {
        return Err(StateError::InvalidField("app_id is empty".to_string()));
    }

    tracing::debug!(
        "Decoded state: return_domain={}, app_id={}",
        context.return_domain,
        context.app_id
    );
    Ok(context)
}

fn validate_return_domain(return_domain: &str) -> Result<(), StateError> {
    // Url::parse strips tabs and newlines, but the raw value ends up in `Location`
    if !return_domain.chars().all(|c| c.is_ascii_graphic()) {
        return Err(StateError::InvalidReturnDomain(
            "only printable ASCII without whitespace is allowed".to_string(),
        ));
    }

    let parsed = Url::parse(return_domain)
        .map_err(|e| StateError::InvalidReturnDomain(format!("{return_domain}: {e}")))?;

    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(StateError::InvalidReturnDomain(format!(
            "unsupported scheme: {}",
            parsed.scheme()
        )));
    }
    if parsed.host_str().is_none_or(str::is_empty) {
        return Err(StateError::InvalidReturnDomain(
            "missing host".to_string(),
        ));
    }
    if parsed.query().is_some() || parsed.fragment().is_some() {
        return Err(StateError::InvalidReturnDomain(
            "query and fragment are not allowed".to_string(),
        ));
    }
    Ok(())
}
