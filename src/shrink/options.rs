//! Per-call options for the shrink pipeline

use std::sync::Arc;

use crate::message::Message;

/// Progress callback invoked before each summarization call:
/// `(candidate index, total candidates, content preview)`
pub type ProgressCallback = Arc<dyn Fn(usize, usize, &str) + Send + Sync>;

/// Options for a single shrink call
///
/// Tuning fields left `None` fall back to the pipeline's
/// [`ShrinkConfig`](crate::config::ShrinkConfig) values.
#[derive(Clone)]
pub struct ShrinkOptions {
    /// Conversation to shrink, in chronological order
    pub messages: Vec<Message>,
    /// Provider identifier, e.g. "anthropic"
    pub provider: String,
    /// Raw model name, possibly decorated or aliased
    pub model: String,
    /// Full tool inventory, used for minimal prompt construction
    pub available_tools: Vec<String>,
    /// Tools relevant to the current task
    pub relevant_tools: Vec<String>,
    /// Whether the session runs in agent mode
    pub is_agent_mode: bool,
    /// Fraction of the window to stay under; must be in (0, 1]
    pub target_ratio: Option<f32>,
    /// Trailing messages preserved by the drop-middle tier
    pub last_n_messages: Option<usize>,
    /// Content length above which a message becomes a summarization
    /// candidate
    pub summarize_char_threshold: Option<usize>,
    /// Session identifier for cancellation and progress-ledger lookups
    pub session_id: Option<String>,
    /// Invoked before each summarization call
    pub on_progress: Option<ProgressCallback>,
}

impl ShrinkOptions {
    /// Create options for a conversation against a provider/model pair
    pub fn new(
        provider: impl Into<String>,
        model: impl Into<String>,
        messages: Vec<Message>,
    ) -> Self {
        Self {
            messages,
            provider: provider.into(),
            model: model.into(),
            available_tools: Vec::new(),
            relevant_tools: Vec::new(),
            is_agent_mode: false,
            target_ratio: None,
            last_n_messages: None,
            summarize_char_threshold: None,
            session_id: None,
            on_progress: None,
        }
    }

    /// Set the tool inventory used for minimal prompt construction
    pub fn with_tools(mut self, available: Vec<String>, relevant: Vec<String>) -> Self {
        self.available_tools = available;
        self.relevant_tools = relevant;
        self
    }

    /// Set agent mode
    pub fn with_agent_mode(mut self, agent_mode: bool) -> Self {
        self.is_agent_mode = agent_mode;
        self
    }

    /// Override the target ratio for this call
    pub fn with_target_ratio(mut self, ratio: f32) -> Self {
        self.target_ratio = Some(ratio);
        self
    }

    /// Override the retained-tail length for this call
    pub fn with_last_n_messages(mut self, n: usize) -> Self {
        self.last_n_messages = Some(n);
        self
    }

    /// Override the summarization candidate threshold for this call
    pub fn with_summarize_char_threshold(mut self, chars: usize) -> Self {
        self.summarize_char_threshold = Some(chars);
        self
    }

    /// Attach the owning session identifier
    pub fn with_session_id(mut self, session_id: impl Into<String>) -> Self {
        self.session_id = Some(session_id.into());
        self
    }

    /// Attach a progress callback
    pub fn with_progress(mut self, callback: ProgressCallback) -> Self {
        self.on_progress = Some(callback);
        self
    }
}

impl std::fmt::Debug for ShrinkOptions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ShrinkOptions")
            .field("messages", &self.messages.len())
            .field("provider", &self.provider)
            .field("model", &self.model)
            .field("available_tools", &self.available_tools.len())
            .field("relevant_tools", &self.relevant_tools.len())
            .field("is_agent_mode", &self.is_agent_mode)
            .field("target_ratio", &self.target_ratio)
            .field("last_n_messages", &self.last_n_messages)
            .field("summarize_char_threshold", &self.summarize_char_threshold)
            .field("session_id", &self.session_id)
            .field("has_progress", &self.on_progress.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let options = ShrinkOptions::new("anthropic", "claude-3.5-sonnet", vec![]);
        assert_eq!(options.target_ratio, None);
        assert_eq!(options.last_n_messages, None);
        assert_eq!(options.summarize_char_threshold, None);
        assert!(!options.is_agent_mode);
        assert!(options.session_id.is_none());
        assert!(options.on_progress.is_none());
    }

    #[test]
    fn test_builder() {
        let options = ShrinkOptions::new("openai", "gpt-4o", vec![Message::user("hi")])
            .with_tools(vec!["grep".into()], vec!["grep".into()])
            .with_agent_mode(true)
            .with_target_ratio(0.6)
            .with_last_n_messages(5)
            .with_summarize_char_threshold(1_500)
            .with_session_id("session-1");

        assert_eq!(options.messages.len(), 1);
        assert_eq!(options.available_tools, vec!["grep".to_string()]);
        assert!(options.is_agent_mode);
        assert_eq!(options.target_ratio, Some(0.6));
        assert_eq!(options.last_n_messages, Some(5));
        assert_eq!(options.summarize_char_threshold, Some(1_500));
        assert_eq!(options.session_id.as_deref(), Some("session-1"));
    }

    #[test]
    fn test_debug_hides_callback() {
        let options = ShrinkOptions::new("openai", "gpt-4o", vec![])
            .with_progress(Arc::new(|_, _, _| {}));
        let rendered = format!("{options:?}");
        assert!(rendered.contains("has_progress: true"));
    }
}
