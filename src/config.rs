//! Shrink pipeline configuration
//!
//! This is the externally-owned tuning surface: hosts persist these values
//! however they like and hand them in read-only. Per-call
//! [`ShrinkOptions`](crate::shrink::ShrinkOptions) fields override the
//! corresponding config value when set.

use serde::{Deserialize, Serialize};

/// Default fraction of the context window the pipeline tries to stay under,
/// leaving headroom for the model's response
pub const DEFAULT_TARGET_RATIO: f32 = 0.7;

/// Default number of trailing messages the drop-middle tier preserves
pub const DEFAULT_LAST_N_MESSAGES: usize = 3;

/// Default content length above which a message becomes a summarization
/// candidate
pub const DEFAULT_SUMMARIZE_CHAR_THRESHOLD: usize = 2_000;

/// Default overflow multiple of the target at which the drop-middle tier
/// halves its retained tail. The 1.5 value is workload-dependent; it is a
/// config field rather than a hard-coded constant so hosts can tune it.
pub const DEFAULT_HALVING_TRIGGER_RATIO: f32 = 1.5;

/// Configuration for the shrink pipeline
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShrinkConfig {
    /// Whether context reduction is enabled at all. When disabled, `shrink`
    /// reports the raw estimate and resolved window without touching
    /// messages.
    pub enabled: bool,

    /// Fraction of the context window to stay under (0, 1]
    pub target_ratio: f32,

    /// Number of trailing messages preserved by the drop-middle tier
    pub last_n_messages: usize,

    /// Content length above which a message becomes a summarization
    /// candidate
    pub summarize_char_threshold: usize,

    /// Overflow multiple of the target beyond which the drop-middle tier
    /// halves its retained tail
    pub halving_trigger_ratio: f32,

    /// Explicit context-window override in tokens. A positive value
    /// short-circuits registry lookup entirely; anything else is ignored.
    pub max_tokens_override: Option<i64>,
}

impl Default for ShrinkConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            target_ratio: DEFAULT_TARGET_RATIO,
            last_n_messages: DEFAULT_LAST_N_MESSAGES,
            summarize_char_threshold: DEFAULT_SUMMARIZE_CHAR_THRESHOLD,
            halving_trigger_ratio: DEFAULT_HALVING_TRIGGER_RATIO,
            max_tokens_override: None,
        }
    }
}

impl ShrinkConfig {
    /// Create a config with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable or disable context reduction
    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    /// Set the target ratio
    pub fn with_target_ratio(mut self, ratio: f32) -> Self {
        self.target_ratio = ratio;
        self
    }

    /// Set the number of trailing messages to preserve
    pub fn with_last_n_messages(mut self, n: usize) -> Self {
        self.last_n_messages = n;
        self
    }

    /// Set the summarization candidate threshold
    pub fn with_summarize_char_threshold(mut self, chars: usize) -> Self {
        self.summarize_char_threshold = chars;
        self
    }

    /// Set the tail-halving trigger ratio
    pub fn with_halving_trigger_ratio(mut self, ratio: f32) -> Self {
        self.halving_trigger_ratio = ratio;
        self
    }

    /// Set an explicit context-window override
    pub fn with_max_tokens_override(mut self, tokens: Option<i64>) -> Self {
        self.max_tokens_override = tokens;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ShrinkConfig::default();
        assert!(config.enabled);
        assert!((config.target_ratio - 0.7).abs() < f32::EPSILON);
        assert_eq!(config.last_n_messages, 3);
        assert_eq!(config.summarize_char_threshold, 2_000);
        assert!((config.halving_trigger_ratio - 1.5).abs() < f32::EPSILON);
        assert_eq!(config.max_tokens_override, None);
    }

    #[test]
    fn test_builder_pattern() {
        let config = ShrinkConfig::new()
            .with_enabled(false)
            .with_target_ratio(0.5)
            .with_last_n_messages(6)
            .with_summarize_char_threshold(1_000)
            .with_max_tokens_override(Some(32_000));

        assert!(!config.enabled);
        assert!((config.target_ratio - 0.5).abs() < f32::EPSILON);
        assert_eq!(config.last_n_messages, 6);
        assert_eq!(config.summarize_char_threshold, 1_000);
        assert_eq!(config.max_tokens_override, Some(32_000));
    }

    #[test]
    fn test_serde_round_trip() {
        let config = ShrinkConfig::new().with_target_ratio(0.8);
        let json = serde_json::to_string(&config).unwrap();
        let back: ShrinkConfig = serde_json::from_str(&json).unwrap();
        assert!((back.target_ratio - 0.8).abs() < f32::EPSILON);
    }
}
