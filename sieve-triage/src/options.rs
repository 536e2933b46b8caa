//! Per-batch knobs, defaulted from configuration.

use sieve_core::config::SieveConfig;
use sieve_core::ClassificationMode;

/// Options for one `classify_batch` call.
#[derive(Debug, Clone, Copy)]
pub struct BatchOptions {
    pub mode: ClassificationMode,
    /// Concurrent arbiter calls; clamped to [1, MAX_ARBITER_CONCURRENCY]
    /// at dispatch.
    pub concurrency: usize,
    /// Whether gray-zone references are sent to the arbiter. Ignored in
    /// `Llm` mode, where everything is.
    pub llm_fallback: bool,
}

impl BatchOptions {
    pub fn from_config(config: &SieveConfig) -> Self {
        Self {
            mode: config.triage.mode,
            concurrency: config.arbiter.concurrency,
            llm_fallback: config.triage.llm_fallback,
        }
    }
}

impl Default for BatchOptions {
    fn default() -> Self {
        Self::from_config(&SieveConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_follow_the_config_sections() {
        let config = SieveConfig::default();
        let options = BatchOptions::default();
        assert_eq!(options.mode, config.triage.mode);
        assert_eq!(options.concurrency, config.arbiter.concurrency);
        assert_eq!(options.llm_fallback, config.triage.llm_fallback);
    }
}
