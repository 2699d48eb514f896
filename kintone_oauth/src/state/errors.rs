use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum StateError {
    #[error("Failed to decode base64: {0}")]
    Base64(String),

    #[error("Failed to decode UTF-8: {0}")]
    Utf8(String),

    #[error("Failed to parse JSON: {0}")]
    Json(String),

    #[error("State is not a JSON object")]
    NotAnObject,

    #[error("Invalid field: {0}")]
    InvalidField(String),

    #[error("Invalid return_domain: {0}")]
    InvalidReturnDomain(String),

    #[error("Serde error: {0}")]
    Serde(String),
}
