//! Engine configuration.
//!
//! Configuration is an explicit value threaded through construction of the
//! root view and inherited by every child; `Config::default()` is the
//! process-wide fallback for callers that don't care.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Default wait timeout (20 seconds)
pub const DEFAULT_WAIT_TIMEOUT_SECS: u64 = 20;

/// Default polling interval (250ms)
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 250;

/// JavaScript library probed for outstanding asynchronous requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JsLibrary {
    /// jQuery (`$.active`)
    #[default]
    JQuery,
    /// Prototype (`Ajax.activeRequestCount`)
    Prototype,
}

impl JsLibrary {
    /// Script evaluating to the number of outstanding async requests.
    #[must_use]
    pub const fn pending_requests_script(&self) -> &'static str {
        match self {
            Self::JQuery => "return $.active;",
            Self::Prototype => "return Ajax.activeRequestCount;",
        }
    }
}

/// Configuration for a view tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Library probed by ajax-idle waits
    pub js_library: JsLibrary,
    /// Timeout applied to waits with no explicit timeout
    pub wait_timeout: Duration,
    /// Poll interval of the wait loop
    pub poll_interval: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            js_library: JsLibrary::JQuery,
            wait_timeout: Duration::from_secs(DEFAULT_WAIT_TIMEOUT_SECS),
            poll_interval: Duration::from_millis(DEFAULT_POLL_INTERVAL_MS),
        }
    }
}

impl Config {
    /// Create a config with defaults.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the ajax-idle probe library.
    #[must_use]
    pub const fn with_js_library(mut self, js_library: JsLibrary) -> Self {
        self.js_library = js_library;
        self
    }

    /// Set the default wait timeout.
    #[must_use]
    pub const fn with_wait_timeout(mut self, timeout: Duration) -> Self {
        self.wait_timeout = timeout;
        self
    }

    /// Set the wait-loop poll interval.
    #[must_use]
    pub const fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    mod config_tests {
        use super::*;

        #[test]
        fn test_defaults() {
            let config = Config::default();
            assert_eq!(config.js_library, JsLibrary::JQuery);
            assert_eq!(config.wait_timeout, Duration::from_secs(20));
            assert_eq!(config.poll_interval, Duration::from_millis(250));
        }

        #[test]
        fn test_builder_chain() {
            let config = Config::new()
                .with_js_library(JsLibrary::Prototype)
                .with_wait_timeout(Duration::from_secs(5))
                .with_poll_interval(Duration::from_millis(50));
            assert_eq!(config.js_library, JsLibrary::Prototype);
            assert_eq!(config.wait_timeout, Duration::from_secs(5));
            assert_eq!(config.poll_interval, Duration::from_millis(50));
        }
    }

    mod js_library_tests {
        use super::*;

        #[test]
        fn test_jquery_probe_script() {
            assert_eq!(
                JsLibrary::JQuery.pending_requests_script(),
                "return $.active;"
            );
        }

        #[test]
        fn test_prototype_probe_script() {
            assert!(JsLibrary::Prototype
                .pending_requests_script()
                .contains("activeRequestCount"));
        }
    }
}
