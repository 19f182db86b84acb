//! Client configuration.

use std::time::Duration;

use crate::game::GridSize;

/// Base URL of the game server API.
pub const DEFAULT_BASE_URL: &str = "http://localhost:8080/api";

/// Interval between background state polls.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(1);

/// Lifetime of a transient notice before it clears itself.
pub const DEFAULT_NOTICE_DURATION: Duration = Duration::from_millis(1500);

/// Per-request timeout for HTTP calls.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(5);

/// Configuration for a client session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Base URL of the server API, e.g. `http://localhost:8080/api`.
    pub base_url: String,
    /// Side length of the square grid.
    pub grid: GridSize,
    /// Interval between background state polls.
    pub poll_interval: Duration,
    /// Lifetime of a transient notice.
    pub notice_duration: Duration,
    /// Timeout applied to every request.
    pub request_timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            grid: GridSize::default(),
            poll_interval: DEFAULT_POLL_INTERVAL,
            notice_duration: DEFAULT_NOTICE_DURATION,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }
}

impl ClientConfig {
    /// Full URL of a server operation, e.g. `endpoint("state")`.
    #[must_use]
    pub fn endpoint(&self, operation: &str) -> String {
        format!("{}/{operation}", self.base_url.trim_end_matches('/'))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_server_contract() {
        let config = ClientConfig::default();
        assert_eq!(config.endpoint("state"), "http://localhost:8080/api/state");
        assert_eq!(config.notice_duration, Duration::from_millis(1500));
        assert_eq!(config.grid.side(), 20);
    }

    #[test]
    fn test_endpoint_tolerates_trailing_slash() {
        let config = ClientConfig {
            base_url: "http://example.test:8080/api/".to_string(),
            ..ClientConfig::default()
        };
        assert_eq!(
            config.endpoint("clear-collision"),
            "http://example.test:8080/api/clear-collision"
        );
    }
}
