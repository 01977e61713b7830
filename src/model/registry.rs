//! Static registry of known model context windows
//!
//! Patterns are written in already-normalized form (see
//! [`normalize_model_name`](super::normalize_model_name)) so they compare
//! directly against normalized input. The registry is an ordered list, not
//! a map: equal-score ties keep the first entry encountered, so order is
//! part of the contract.

use std::sync::LazyLock;

/// Context window and output ceiling for a known model family
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModelSpec {
    /// Maximum context window (input + output), in tokens
    pub context_window: u64,
    /// Maximum output tokens, where published
    pub max_output_tokens: Option<u64>,
}

impl ModelSpec {
    const fn new(context_window: u64, max_output_tokens: Option<u64>) -> Self {
        Self {
            context_window,
            max_output_tokens,
        }
    }
}

/// Known model patterns, in tie-break order
pub static MODEL_REGISTRY: LazyLock<Vec<(&'static str, ModelSpec)>> = LazyLock::new(|| {
    vec![
        // Anthropic
        ("claude-3.7-sonnet", ModelSpec::new(200_000, Some(64_000))),
        ("claude-3.5-sonnet", ModelSpec::new(200_000, Some(8_192))),
        ("claude-3.5-haiku", ModelSpec::new(200_000, Some(8_192))),
        ("claude-sonnet-4", ModelSpec::new(200_000, Some(64_000))),
        ("claude-opus-4", ModelSpec::new(200_000, Some(32_000))),
        ("claude-3-opus", ModelSpec::new(200_000, Some(4_096))),
        ("claude-3-sonnet", ModelSpec::new(200_000, Some(4_096))),
        ("claude-3-haiku", ModelSpec::new(200_000, Some(4_096))),
        // OpenAI
        ("gpt-4.1-mini", ModelSpec::new(1_047_576, Some(32_768))),
        ("gpt-4.1", ModelSpec::new(1_047_576, Some(32_768))),
        ("gpt-4o-mini", ModelSpec::new(128_000, Some(16_384))),
        ("gpt-4o", ModelSpec::new(128_000, Some(16_384))),
        ("gpt-4-turbo", ModelSpec::new(128_000, Some(4_096))),
        ("gpt-4", ModelSpec::new(8_192, Some(8_192))),
        ("gpt-3.5-turbo", ModelSpec::new(16_385, Some(4_096))),
        ("o-1-mini", ModelSpec::new(128_000, Some(65_536))),
        ("o-1", ModelSpec::new(200_000, Some(100_000))),
        ("o-3-mini", ModelSpec::new(200_000, Some(100_000))),
        ("o-3", ModelSpec::new(200_000, Some(100_000))),
        // Google
        ("gemini-2.5-pro", ModelSpec::new(1_048_576, Some(65_536))),
        ("gemini-2.0-flash", ModelSpec::new(1_048_576, Some(8_192))),
        ("gemini-1.5-pro", ModelSpec::new(2_097_152, Some(8_192))),
        ("gemini-1.5-flash", ModelSpec::new(1_048_576, Some(8_192))),
        // Meta
        ("llama-3.3", ModelSpec::new(128_000, Some(4_096))),
        ("llama-3.1", ModelSpec::new(128_000, Some(4_096))),
        ("llama-3", ModelSpec::new(8_192, Some(4_096))),
        // Mistral
        ("mistral-large", ModelSpec::new(128_000, Some(4_096))),
        ("mistral-small", ModelSpec::new(32_000, Some(4_096))),
        // DeepSeek
        ("deepseek-chat", ModelSpec::new(64_000, Some(8_192))),
        ("deepseek-reasoner", ModelSpec::new(64_000, Some(8_192))),
        ("deepseek-r-1", ModelSpec::new(64_000, Some(8_192))),
        // Qwen
        ("qwen-2.5", ModelSpec::new(131_072, Some(8_192))),
        ("qwen-3", ModelSpec::new(131_072, Some(8_192))),
        // Zhipu
        ("glm-4", ModelSpec::new(128_000, Some(4_096))),
    ]
});

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::normalize_model_name;

    #[test]
    fn test_patterns_are_normalized() {
        // Every registry key must already be in canonical form, otherwise
        // it can never match normalized input.
        for (pattern, _) in MODEL_REGISTRY.iter() {
            assert_eq!(
                normalize_model_name(pattern),
                *pattern,
                "registry pattern not normalized: {pattern}"
            );
        }
    }

    #[test]
    fn test_windows_are_plausible() {
        for (pattern, spec) in MODEL_REGISTRY.iter() {
            assert!(spec.context_window >= 4_096, "tiny window for {pattern}");
            if let Some(out) = spec.max_output_tokens {
                assert!(out <= spec.context_window, "output > window for {pattern}");
            }
        }
    }
}
