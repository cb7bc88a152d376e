use serde::{Deserialize, Serialize};

/// Factory configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Probe for `jQuery` before the first query and inject it when missing.
    pub auto_inject_jquery: bool,
    /// Script URL injected when the page has no jQuery of its own.
    pub jquery_source_url: String,
    /// How long to wait for an injected jQuery to become available.
    pub injection_timeout_ms: u64,
    /// Poll interval while waiting for the injected script to load.
    pub poll_interval_ms: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            auto_inject_jquery: true,
            jquery_source_url: "https://code.jquery.com/jquery-3.7.1.min.js".to_string(),
            injection_timeout_ms: 5000,
            poll_interval_ms: 100,
        }
    }
}
