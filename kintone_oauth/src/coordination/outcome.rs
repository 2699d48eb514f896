use http::StatusCode;
use serde_json::Value;

use crate::state::CallbackContext;

/// What the HTTP layer should send back to the browser.
#[derive(Debug, Clone, PartialEq)]
pub enum CallbackOutcome {
    /// 302 to `location`.
    Redirect { location: String },
    /// JSON body with the given status.
    Json { status: StatusCode, body: Value },
}

impl CallbackOutcome {
    pub fn redirect(location: impl Into<String>) -> Self {
        Self::Redirect {
            location: location.into(),
        }
    }

    pub fn json(status: StatusCode, body: Value) -> Self {
        Self::Json { status, body }
    }

    pub fn location(&self) -> Option<&str> {
        match self {
            Self::Redirect { location } => Some(location),
            Self::Json { .. } => None,
        }
    }
}

/// `{return_domain}/{app_path}/{app_id}/?auth_success=1&customer_key=..&email=..`
pub fn success_redirect_url(
    context: &CallbackContext,
    app_path: &str,
    customer_key: &str,
    email: &str,
) -> String {
    let mut url = context.base_url().to_string();
    if !app_path.is_empty() {
        url.push('/');
        url.push_str(app_path);
    }
    url.push('/');
    url.push_str(&urlencoding::encode(&context.app_id.to_string()));
    url.push_str(&format!(
        "/?auth_success=1&customer_key={}&email={}",
        urlencoding::encode(customer_key),
        urlencoding::encode(email)
    ));
    url
}

/// `{return_domain}?auth_error=1&error_message=..`
pub fn error_redirect_url(return_domain: &str, message: &str) -> String {
    format!(
        "{return_domain}?auth_error=1&error_message={}",
        urlencoding::encode(message)
    )
}
