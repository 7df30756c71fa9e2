use core_config::{ConfigError, FromEnv, env_parse};
use std::time::Duration;

/// Tuning for the streaming search pipeline.
///
/// Loaded from environment variables:
/// - `SEARCH_SEND_TIMEOUT_MS`: how long the store waits for the consumer to
///   accept one result before abandoning the scan (default: 2000)
/// - `SEARCH_BUFFER`: capacity of each search channel (default: 100)
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SearchConfig {
    pub send_timeout: Duration,
    pub buffer: usize,
}

impl SearchConfig {
    pub fn new(send_timeout: Duration, buffer: usize) -> Self {
        Self {
            send_timeout,
            buffer: buffer.max(1),
        }
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            send_timeout: Duration::from_secs(2),
            buffer: 100,
        }
    }
}

impl FromEnv for SearchConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let timeout_ms: u64 = env_parse("SEARCH_SEND_TIMEOUT_MS", 2000)?;
        let buffer: usize = env_parse("SEARCH_BUFFER", 100)?;

        if buffer == 0 {
            return Err(ConfigError::ParseError {
                key: "SEARCH_BUFFER".to_string(),
                details: "must be greater than zero".to_string(),
            });
        }

        Ok(Self::new(Duration::from_millis(timeout_ms), buffer))
    }
}
