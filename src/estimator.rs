//! Token estimation for conversation budgeting
//!
//! Intentionally crude: a character-count heuristic, not a real tokenizer.
//! Estimates must be fast and deterministic, and are only ever used for
//! relative budget decisions, never exact billing.

use crate::message::Message;

/// Characters per token (common approximation for English text)
const CHARS_PER_TOKEN: usize = 4;

/// Token estimator for conversation messages
#[derive(Debug, Clone, Copy, Default)]
pub struct TokenEstimator;

impl TokenEstimator {
    /// Create a new token estimator
    pub fn new() -> Self {
        Self
    }

    /// Estimate tokens for a message list
    ///
    /// Sums content lengths, divides by four, rounds up.
    pub fn estimate_messages(&self, messages: &[Message]) -> usize {
        let chars: usize = messages.iter().map(|m| m.content.len()).sum();
        chars.div_ceil(CHARS_PER_TOKEN)
    }

    /// Estimate tokens for a single string
    pub fn estimate_str(&self, text: &str) -> usize {
        text.len().div_ceil(CHARS_PER_TOKEN)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::Message;

    #[test]
    fn test_estimate_str() {
        let estimator = TokenEstimator::new();
        assert_eq!(estimator.estimate_str(&"a".repeat(100)), 25);
        assert_eq!(estimator.estimate_str(""), 0);
        // Rounds up, not down
        assert_eq!(estimator.estimate_str("abcde"), 2);
    }

    #[test]
    fn test_estimate_messages_sums_before_dividing() {
        let estimator = TokenEstimator::new();
        // Three 1-char messages: 3 chars total -> 1 token, not 3
        let messages = vec![
            Message::user("a"),
            Message::assistant("b"),
            Message::user("c"),
        ];
        assert_eq!(estimator.estimate_messages(&messages), 1);
    }

    #[test]
    fn test_estimate_empty_conversation() {
        let estimator = TokenEstimator::new();
        assert_eq!(estimator.estimate_messages(&[]), 0);
    }

    #[test]
    fn test_estimate_is_deterministic() {
        let estimator = TokenEstimator::new();
        let messages = vec![Message::user("x".repeat(4_001))];
        let first = estimator.estimate_messages(&messages);
        let second = estimator.estimate_messages(&messages);
        assert_eq!(first, second);
        assert_eq!(first, 1_001);
    }
}
