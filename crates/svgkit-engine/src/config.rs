//! Engine configuration.

use std::time::Duration;
use svgkit_common::BackoffConfig;

/// Extension substituted for `.svg` when none is configured.
pub const DEFAULT_FALLBACK_EXTENSION: &str = "png";

/// Configuration for a fallback engine instance.
#[derive(Debug, Clone)]
pub struct FallbackConfig {
    /// Extension substituted for `.svg` (without the dot).
    pub fallback_extension: String,
    /// Delay policy between document passes while the document loads.
    pub backoff: BackoffConfig,
    /// Delay before the single trailing pass after the document completes.
    pub settle_delay: Duration,
}

impl Default for FallbackConfig {
    fn default() -> Self {
        Self {
            fallback_extension: DEFAULT_FALLBACK_EXTENSION.to_string(),
            backoff: BackoffConfig::default(),
            settle_delay: Duration::from_millis(50),
        }
    }
}

impl FallbackConfig {
    /// Create a config with the given fallback extension.
    pub fn new(fallback_extension: impl Into<String>) -> Self {
        Self {
            fallback_extension: fallback_extension.into(),
            ..Default::default()
        }
    }

    /// Set the backoff policy.
    pub fn with_backoff(mut self, backoff: BackoffConfig) -> Self {
        self.backoff = backoff;
        self
    }

    /// Set the trailing-pass delay.
    pub fn with_settle_delay(mut self, settle_delay: Duration) -> Self {
        self.settle_delay = settle_delay;
        self
    }
}
