//! Test case configuration
//!
//! [`TestCaseConfig`] controls how often a test body runs, on how many worker
//! threads, and how long the whole batch may take. Values are validated once
//! when built and never change afterwards.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Default wall-clock bound for a whole batch of invocations
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(600);

/// Errors raised while building a configuration
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("threads must be at least 1, got {0}")]
    InvalidThreads(usize),

    #[error("invocations must be at least 1, got {0}")]
    InvalidInvocations(usize),

    #[error("timeout must be greater than zero")]
    ZeroTimeout,
}

/// Execution settings for one test case
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawConfig", into = "RawConfig")]
pub struct TestCaseConfig {
    threads: usize,
    invocations: usize,
    timeout: Duration,
}

impl TestCaseConfig {
    pub fn builder() -> TestCaseConfigBuilder {
        TestCaseConfigBuilder::default()
    }

    /// Worker pool size
    pub fn threads(&self) -> usize {
        self.threads
    }

    /// Number of times the body is run
    pub fn invocations(&self) -> usize {
        self.invocations
    }

    /// Bound on the entire batch, not on each invocation
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Threads actually worth spawning: never more than there are invocations.
    pub(crate) fn effective_threads(&self) -> usize {
        self.threads.min(self.invocations)
    }

    fn validate(self) -> Result<Self, ConfigError> {
        if self.threads == 0 {
            return Err(ConfigError::InvalidThreads(self.threads));
        }
        if self.invocations == 0 {
            return Err(ConfigError::InvalidInvocations(self.invocations));
        }
        if self.timeout.is_zero() {
            return Err(ConfigError::ZeroTimeout);
        }
        Ok(self)
    }
}

impl Default for TestCaseConfig {
    fn default() -> Self {
        Self {
            threads: 1,
            invocations: 1,
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

/// Builder for [`TestCaseConfig`]
#[derive(Debug, Clone)]
pub struct TestCaseConfigBuilder {
    config: TestCaseConfig,
}

impl Default for TestCaseConfigBuilder {
    fn default() -> Self {
        Self {
            config: TestCaseConfig::default(),
        }
    }
}

impl TestCaseConfigBuilder {
    pub fn threads(mut self, threads: usize) -> Self {
        self.config.threads = threads;
        self
    }

    pub fn invocations(mut self, invocations: usize) -> Self {
        self.config.invocations = invocations;
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = timeout;
        self
    }

    pub fn build(self) -> Result<TestCaseConfig, ConfigError> {
        self.config.validate()
    }
}

/// Serialized shape; the timeout travels as milliseconds.
#[derive(Serialize, Deserialize)]
struct RawConfig {
    #[serde(default = "one")]
    threads: usize,
    #[serde(default = "one")]
    invocations: usize,
    #[serde(default = "default_timeout_ms")]
    timeout_ms: u64,
}

fn one() -> usize {
    1
}

fn default_timeout_ms() -> u64 {
    DEFAULT_TIMEOUT.as_millis() as u64
}

impl TryFrom<RawConfig> for TestCaseConfig {
    type Error = ConfigError;

    fn try_from(raw: RawConfig) -> Result<Self, Self::Error> {
        TestCaseConfig {
            threads: raw.threads,
            invocations: raw.invocations,
            timeout: Duration::from_millis(raw.timeout_ms),
        }
        .validate()
    }
}

impl From<TestCaseConfig> for RawConfig {
    fn from(config: TestCaseConfig) -> Self {
        RawConfig {
            threads: config.threads,
            invocations: config.invocations,
            timeout_ms: u64::try_from(config.timeout.as_millis()).unwrap_or(u64::MAX),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = TestCaseConfig::default();
        assert_eq!(config.threads(), 1);
        assert_eq!(config.invocations(), 1);
        assert_eq!(config.timeout(), Duration::from_secs(600));
    }

    #[test]
    fn test_builder_validates() {
        assert_eq!(
            TestCaseConfig::builder().threads(0).build(),
            Err(ConfigError::InvalidThreads(0))
        );
        assert_eq!(
            TestCaseConfig::builder().invocations(0).build(),
            Err(ConfigError::InvalidInvocations(0))
        );
        assert_eq!(
            TestCaseConfig::builder().timeout(Duration::ZERO).build(),
            Err(ConfigError::ZeroTimeout)
        );

        let config = TestCaseConfig::builder()
            .threads(8)
            .invocations(100)
            .timeout(Duration::from_secs(5))
            .build()
            .unwrap();
        assert_eq!(config.threads(), 8);
        assert_eq!(config.invocations(), 100);
    }

    #[test]
    fn test_effective_threads_capped_by_invocations() {
        let config = TestCaseConfig::builder()
            .threads(8)
            .invocations(3)
            .build()
            .unwrap();
        assert_eq!(config.effective_threads(), 3);
    }

    #[test]
    fn test_deserialize_fills_defaults_and_validates() {
        let config: TestCaseConfig = serde_json::from_str(r#"{"threads": 4}"#).unwrap();
        assert_eq!(config.threads(), 4);
        assert_eq!(config.invocations(), 1);
        assert_eq!(config.timeout(), DEFAULT_TIMEOUT);

        let config: TestCaseConfig =
            serde_json::from_str(r#"{"invocations": 50, "timeout_ms": 1500}"#).unwrap();
        assert_eq!(config.timeout(), Duration::from_millis(1500));

        let error = serde_json::from_str::<TestCaseConfig>(r#"{"threads": 0}"#).unwrap_err();
        assert!(error.to_string().contains("threads must be at least 1"));
    }

    #[test]
    fn test_serialize_uses_milliseconds() {
        let config = TestCaseConfig::builder()
            .timeout(Duration::from_secs(2))
            .build()
            .unwrap();
        let json = serde_json::to_value(config).unwrap();
        assert_eq!(json["timeout_ms"], 2000);
        assert_eq!(json["threads"], 1);
    }
}
