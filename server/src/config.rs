// Configuration constants for the server

use std::time::Duration;

use tracing::warn;

/// What `/chat` does when narrating the reply fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NarrationFailureMode {
    /// Log the failure and return the reply without audio.
    #[default]
    Silent,
    /// Also report the failure in the response body.
    Surface,
}

impl NarrationFailureMode {
    fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "silent" => Some(Self::Silent),
            "surface" => Some(Self::Surface),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub port: u16,
    pub llm_timeout_secs: u64,
    pub narration_timeout_secs: u64,
    pub request_timeout_secs: u64,
    pub cors_allowed_origins: Option<Vec<String>>,
    pub narration_failure: NarrationFailureMode,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 8085,
            llm_timeout_secs: 30,
            narration_timeout_secs: 20,
            request_timeout_secs: 60,
            cors_allowed_origins: None,
            narration_failure: NarrationFailureMode::Silent,
        }
    }
}

impl ServerConfig {
    pub fn from_env() -> Self {
        let port = std::env::var("PORT")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(8085);

        let llm_timeout_secs = std::env::var("LLM_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(30);

        let narration_timeout_secs = std::env::var("NARRATION_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(20);

        let request_timeout_secs = std::env::var("REQUEST_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(60);

        let cors_allowed_origins = std::env::var("CORS_ALLOWED_ORIGINS")
            .ok()
            .map(|origins| {
                origins
                    .split(',')
                    .map(|s| s.trim().to_string())
                    .filter(|s| !s.is_empty())
                    .collect()
            });

        let narration_failure = std::env::var("NARRATION_FAILURE_MODE")
            .ok()
            .and_then(|v| NarrationFailureMode::parse(&v))
            .unwrap_or_default();

        Self {
            port,
            llm_timeout_secs,
            narration_timeout_secs,
            request_timeout_secs,
            cors_allowed_origins,
            narration_failure,
        }
        .fit_timeouts()
    }

    /// Shrink the tutor and narration timeouts so that both, run back to
    /// back, finish before the request timeout cuts the response off.
    pub fn fit_timeouts(mut self) -> Self {
        self.request_timeout_secs = self.request_timeout_secs.max(3);
        if self.narration_timeout_secs >= self.request_timeout_secs {
            self.narration_timeout_secs = (self.request_timeout_secs / 3).max(1);
        }
        let reserved = self.narration_timeout_secs + 1;
        if self.llm_timeout_secs + reserved > self.request_timeout_secs {
            let fitted = (self.request_timeout_secs - reserved).max(1);
            warn!(
                "LLM_TIMEOUT_SECS={} does not fit in REQUEST_TIMEOUT_SECS={}, using {}",
                self.llm_timeout_secs, self.request_timeout_secs, fitted
            );
            self.llm_timeout_secs = fitted;
        }
        self
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn llm_timeout(&self) -> Duration {
        Duration::from_secs(self.llm_timeout_secs)
    }

    pub fn narration_timeout(&self) -> Duration {
        Duration::from_secs(self.narration_timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_failure_mode() {
        assert_eq!(NarrationFailureMode::parse("silent"), Some(NarrationFailureMode::Silent));
        assert_eq!(NarrationFailureMode::parse(" Surface "), Some(NarrationFailureMode::Surface));
        assert_eq!(NarrationFailureMode::parse("loud"), None);
    }

    #[test]
    fn test_default_timeouts_fit_request_timeout() {
        let config = ServerConfig::default();
        assert!(config.llm_timeout() + config.narration_timeout() < config.request_timeout());
        assert_eq!(config.clone().fit_timeouts().llm_timeout_secs, config.llm_timeout_secs);
    }

    #[test]
    fn test_fit_timeouts_clamps_slow_stages() {
        let config = ServerConfig {
            llm_timeout_secs: 120,
            narration_timeout_secs: 20,
            request_timeout_secs: 60,
            ..ServerConfig::default()
        }
        .fit_timeouts();
        assert_eq!(config.narration_timeout_secs, 20);
        assert_eq!(config.llm_timeout_secs, 39);

        let config = ServerConfig {
            llm_timeout_secs: 30,
            narration_timeout_secs: 30,
            request_timeout_secs: 6,
            ..ServerConfig::default()
        }
        .fit_timeouts();
        assert_eq!(config.narration_timeout_secs, 2);
        assert_eq!(config.llm_timeout_secs, 3);
        assert!(config.llm_timeout() + config.narration_timeout() < config.request_timeout());
    }
}
