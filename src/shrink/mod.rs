//! Tiered message shrinking
//!
//! When a conversation threatens to exceed its context-window budget, the
//! pipeline applies increasingly aggressive reduction strategies in strict
//! order, re-estimating tokens after each and stopping the first time the
//! estimate is back under budget:
//!
//! 0. aggressive truncation of oversized tool-shaped payloads
//! 1. selective summarization of the longest messages
//! 2. dropping middle history while preserving anchors and synthesizing
//!    summaries of the discarded tool results
//! 3. swapping in a minimal system prompt
//!
//! Each tier takes a message list and returns a new one; nothing is shared
//! between tiers except the running token estimate.

pub mod options;
pub mod pipeline;
pub mod summarize;
pub mod tool_drop;

pub use options::{ProgressCallback, ShrinkOptions};
pub use pipeline::{AGGRESSIVE_TRUNCATE_THRESHOLD, ShrinkPipeline, ShrinkResult};
pub use summarize::{SUMMARY_CHUNK_SIZE, summarize_content};
pub use tool_drop::{TOOL_DROP_SUMMARY_CAP, summarize_dropped_tools};

use serde::{Deserialize, Serialize};

/// One discrete, ordered reduction strategy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShrinkStrategy {
    /// Truncate oversized tool-shaped user payloads
    AggressiveTruncate,
    /// Summarize the longest messages through the external summarizer
    Summarize,
    /// Drop middle history, keeping system / first user / recent tail
    DropMiddle,
    /// Replace the system prompt with a minimal variant
    MinimalSystemPrompt,
}

impl ShrinkStrategy {
    /// All strategies, in application order
    pub const ORDERED: [ShrinkStrategy; 4] = [
        ShrinkStrategy::AggressiveTruncate,
        ShrinkStrategy::Summarize,
        ShrinkStrategy::DropMiddle,
        ShrinkStrategy::MinimalSystemPrompt,
    ];

    /// Stable name used in reports and logs
    pub fn as_str(&self) -> &'static str {
        match self {
            ShrinkStrategy::AggressiveTruncate => "aggressive_truncate",
            ShrinkStrategy::Summarize => "summarize",
            ShrinkStrategy::DropMiddle => "drop_middle",
            ShrinkStrategy::MinimalSystemPrompt => "minimal_system_prompt",
        }
    }
}

impl std::fmt::Display for ShrinkStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ordered_covers_all_tiers() {
        assert_eq!(ShrinkStrategy::ORDERED.len(), 4);
        assert_eq!(
            ShrinkStrategy::ORDERED[0],
            ShrinkStrategy::AggressiveTruncate
        );
        assert_eq!(
            ShrinkStrategy::ORDERED[3],
            ShrinkStrategy::MinimalSystemPrompt
        );
    }

    #[test]
    fn test_display_names() {
        assert_eq!(
            ShrinkStrategy::AggressiveTruncate.to_string(),
            "aggressive_truncate"
        );
        assert_eq!(ShrinkStrategy::DropMiddle.to_string(), "drop_middle");
    }

    #[test]
    fn test_serde_snake_case() {
        let json = serde_json::to_string(&ShrinkStrategy::MinimalSystemPrompt).unwrap();
        assert_eq!(json, "\"minimal_system_prompt\"");
    }
}
