//! Collaborator contracts consumed by the shrink pipeline
//!
//! These are the seams to services this crate does not implement: remote
//! summarization, persisted session progress, cooperative cancellation, and
//! minimal prompt construction. Every contract is infallible by design:
//! implementations degrade internally (a failed summarization call returns
//! the original text, an unknown session reports no progress) rather than
//! surfacing errors here. Timeouts belong on the implementor's side of the
//! boundary, not in this core.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// External summarization service
#[async_trait]
pub trait Summarizer: Send + Sync {
    /// Condense `text` into a shorter string.
    ///
    /// Must return the original text on internal failure; never panics or
    /// errors toward the caller.
    async fn summarize(&self, text: &str, session_id: Option<&str>) -> String;
}

/// Answers whether a session has been asked to stop
pub trait CancellationOracle: Send + Sync {
    /// Whether the owning session is stopping. Checked before each
    /// potentially expensive summarization step.
    fn is_session_stopping(&self, session_id: &str) -> bool;
}

/// Importance tag on a recorded progress step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StepImportance {
    Low,
    Normal,
    High,
}

impl std::fmt::Display for StepImportance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StepImportance::Low => write!(f, "low"),
            StepImportance::Normal => write!(f, "normal"),
            StepImportance::High => write!(f, "high"),
        }
    }
}

/// One recorded step of session progress
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepSummary {
    /// Position of the step in the session, 1-based
    pub step_number: u32,
    /// How much the step mattered
    pub importance: StepImportance,
    /// One-line description of what the step accomplished
    pub action_summary: String,
}

/// Persisted, structured step-by-step session summaries
#[async_trait]
pub trait ProgressLedger: Send + Sync {
    /// Ordered step summaries for the session, oldest first. Empty when the
    /// session is unknown.
    async fn recent_step_summaries(&self, session_id: &str) -> Vec<StepSummary>;
}

/// Builds a reduced system prompt from a tool inventory
pub trait PromptBuilder: Send + Sync {
    /// Construct the minimal system prompt text
    fn build_minimal_system_prompt(
        &self,
        tools: &[String],
        is_agent_mode: bool,
        relevant_tools: &[String],
    ) -> String;
}

/// Optional provider-direct context window lookup
///
/// When injected into the resolver, tried before the registry path by
/// [`max_context_tokens`](crate::model::ContextWindowResolver::max_context_tokens).
pub trait LiveWindowLookup: Send + Sync {
    /// The provider-reported context window, if the provider answers
    fn context_window(&self, provider: &str, model: &str) -> Option<u64>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_step_importance_display() {
        assert_eq!(StepImportance::Low.to_string(), "low");
        assert_eq!(StepImportance::High.to_string(), "high");
    }

    #[test]
    fn test_step_summary_serde() {
        let step = StepSummary {
            step_number: 3,
            importance: StepImportance::High,
            action_summary: "wrote the parser module".to_string(),
        };
        let json = serde_json::to_string(&step).unwrap();
        assert!(json.contains("\"high\""));
        let back: StepSummary = serde_json::from_str(&json).unwrap();
        assert_eq!(back, step);
    }
}
