use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};
use std::fmt;

/// Identifier of the target application inside the Kintone domain.
///
/// Callers send it either as a JSON number or as a string; it is written back
/// in the same form it arrived in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AppId {
    Number(Number),
    Text(String),
}

impl AppId {
    pub(crate) fn is_blank(&self) -> bool {
        match self {
            Self::Number(_) => false,
            Self::Text(text) => text.trim().is_empty(),
        }
    }
}

impl fmt::Display for AppId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::Text(s) => write!(f, "{s}"),
        }
    }
}

impl From<u64> for AppId {
    fn from(value: u64) -> Self {
        Self::Number(Number::from(value))
    }
}

impl From<&str> for AppId {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

/// Context carried across the Google redirect inside the `state` parameter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CallbackContext {
    /// Base URL of the Kintone domain, e.g. `https://acme.cybozu.com`.
    pub return_domain: String,
    pub app_id: AppId,
    /// Caller state, passed through unexamined.
    #[serde(default)]
    pub state: Value,
    /// Keys the caller added beyond the known ones.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl CallbackContext {
    pub fn new(return_domain: impl Into<String>, app_id: impl Into<AppId>, state: Value) -> Self {
        Self {
            return_domain: return_domain.into(),
            app_id: app_id.into(),
            state,
            extra: Map::new(),
        }
    }

    /// `return_domain` without trailing slashes, ready for path concatenation.
    pub fn base_url(&self) -> &str {
        self.return_domain.trim_end_matches('/')
    }
}
