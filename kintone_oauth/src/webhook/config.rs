/// Outbound webhook destination.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WebhookConfig {
    pub url: String,
    /// A URL containing this marker is the unconfigured sample and is skipped.
    pub placeholder_marker: Option<String>,
}

impl WebhookConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            placeholder_marker: None,
        }
    }

    pub fn with_placeholder_marker(mut self, marker: impl Into<String>) -> Self {
        self.placeholder_marker = Some(marker.into());
        self
    }

    pub fn is_placeholder(&self) -> bool {
        match &self.placeholder_marker {
            Some(marker) if !marker.is_empty() => self.url.contains(marker.as_str()),
            _ => false,
        }
    }

    /// Whether payloads should actually be sent.
    pub fn is_enabled(&self) -> bool {
        !self.url.trim().is_empty() && !self.is_placeholder()
    }
}
