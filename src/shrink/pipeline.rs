//! The tiered shrink pipeline
//!
//! Resolves the token budget, estimates usage, and runs tiers 0-3 in
//! strict order, re-estimating after each and returning the moment the
//! estimate is at or under `floor(max_tokens * target_ratio)`. Tiers are
//! never interleaved or parallelized; summarization calls run one at a
//! time, in descending-length order, trading throughput for the ability to
//! stop exactly when the target is reached.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::ShrinkStrategy;
use super::options::{ProgressCallback, ShrinkOptions};
use super::summarize::summarize_content;
use super::tool_drop::summarize_dropped_tools;
use crate::collab::{CancellationOracle, ProgressLedger, PromptBuilder, StepSummary, Summarizer};
use crate::config::ShrinkConfig;
use crate::error::{ContextError, ContextResult};
use crate::estimator::TokenEstimator;
use crate::message::{Message, MessageRole};
use crate::model::ContextWindowResolver;
use crate::observer::{ContextObserver, NoopObserver};

/// Content length above which a tool-shaped user payload is truncated by
/// the aggressive-truncate tier
pub const AGGRESSIVE_TRUNCATE_THRESHOLD: usize = 5_000;

/// Characters of content shown to progress callbacks
const PREVIEW_LEN: usize = 60;

/// Result of a shrink call
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShrinkResult {
    /// The (possibly reduced) conversation
    pub messages: Vec<Message>,
    /// Tiers attempted, in order; always a prefix of
    /// [`ShrinkStrategy::ORDERED`]
    pub applied_strategies: Vec<ShrinkStrategy>,
    /// Token estimate before any reduction
    pub est_tokens_before: usize,
    /// Token estimate of the returned conversation
    pub est_tokens_after: usize,
    /// Resolved context window used as the budget base
    pub max_tokens: usize,
    /// Whether dropped tool results were condensed into a summary message
    pub tool_results_summarized: bool,
}

impl ShrinkResult {
    fn unchanged(messages: Vec<Message>, est_tokens: usize, max_tokens: usize) -> Self {
        Self {
            messages,
            applied_strategies: Vec::new(),
            est_tokens_before: est_tokens,
            est_tokens_after: est_tokens,
            max_tokens,
            tool_results_summarized: false,
        }
    }

    /// Whether any reduction tier ran
    pub fn was_reduced(&self) -> bool {
        !self.applied_strategies.is_empty()
    }

    /// Tokens saved by the reduction
    pub fn tokens_saved(&self) -> usize {
        self.est_tokens_before.saturating_sub(self.est_tokens_after)
    }

    /// Final size as a fraction of the original estimate
    pub fn compression_ratio(&self) -> f32 {
        if self.est_tokens_before == 0 {
            1.0
        } else {
            self.est_tokens_after as f32 / self.est_tokens_before as f32
        }
    }
}

/// Tiered reduction pipeline for over-budget conversations
pub struct ShrinkPipeline {
    resolver: Arc<ContextWindowResolver>,
    estimator: TokenEstimator,
    summarizer: Arc<dyn Summarizer>,
    prompt_builder: Arc<dyn PromptBuilder>,
    cancellation: Option<Arc<dyn CancellationOracle>>,
    ledger: Option<Arc<dyn ProgressLedger>>,
    config: ShrinkConfig,
    observer: Arc<dyn ContextObserver>,
}

impl ShrinkPipeline {
    /// Create a pipeline with default config and no optional collaborators
    pub fn new(
        resolver: Arc<ContextWindowResolver>,
        summarizer: Arc<dyn Summarizer>,
        prompt_builder: Arc<dyn PromptBuilder>,
    ) -> Self {
        Self {
            resolver,
            estimator: TokenEstimator::new(),
            summarizer,
            prompt_builder,
            cancellation: None,
            ledger: None,
            config: ShrinkConfig::default(),
            observer: Arc::new(NoopObserver),
        }
    }

    /// Replace the configuration
    pub fn with_config(mut self, config: ShrinkConfig) -> Self {
        self.config = config;
        self
    }

    /// Inject a cancellation oracle
    pub fn with_cancellation(mut self, oracle: Arc<dyn CancellationOracle>) -> Self {
        self.cancellation = Some(oracle);
        self
    }

    /// Inject a progress ledger
    pub fn with_ledger(mut self, ledger: Arc<dyn ProgressLedger>) -> Self {
        self.ledger = Some(ledger);
        self
    }

    /// Inject an observer for tier events
    pub fn with_observer(mut self, observer: Arc<dyn ContextObserver>) -> Self {
        self.observer = observer;
        self
    }

    /// Get the current configuration
    pub fn config(&self) -> &ShrinkConfig {
        &self.config
    }

    /// Shrink a conversation to fit its budget
    ///
    /// Returns the input unchanged when it is already within budget or when
    /// reduction is disabled by configuration. Otherwise runs tiers in
    /// order, stopping the first time the estimate is back under
    /// `floor(max_tokens * target_ratio)`.
    pub async fn shrink(&self, options: ShrinkOptions) -> ContextResult<ShrinkResult> {
        let ShrinkOptions {
            messages,
            provider,
            model,
            available_tools,
            relevant_tools,
            is_agent_mode,
            target_ratio,
            last_n_messages,
            summarize_char_threshold,
            session_id,
            on_progress,
        } = options;

        let target_ratio = target_ratio.unwrap_or(self.config.target_ratio);
        if !(target_ratio > 0.0 && target_ratio <= 1.0) {
            return Err(ContextError::invalid_options(format!(
                "target_ratio must be in (0, 1], got {target_ratio}"
            )));
        }
        let last_n = last_n_messages.unwrap_or(self.config.last_n_messages);
        let char_threshold =
            summarize_char_threshold.unwrap_or(self.config.summarize_char_threshold);
        let session = session_id.as_deref();

        let max_tokens = match self.config.max_tokens_override {
            Some(explicit) if explicit > 0 => {
                tracing::debug!(explicit, "using configured context window override");
                explicit as usize
            }
            _ => self.resolver.max_context_tokens(&provider, &model) as usize,
        };
        let est_before = self.estimator.estimate_messages(&messages);

        if !self.config.enabled {
            tracing::debug!(
                est_tokens = est_before,
                max_tokens,
                "context reduction disabled, returning conversation unchanged"
            );
            return Ok(ShrinkResult::unchanged(messages, est_before, max_tokens));
        }

        let target_tokens = (max_tokens as f32 * target_ratio).floor() as usize;
        if est_before <= target_tokens {
            for strategy in ShrinkStrategy::ORDERED {
                self.observer.tier_skipped(strategy);
            }
            return Ok(ShrinkResult::unchanged(messages, est_before, max_tokens));
        }

        tracing::info!(
            est_tokens = est_before,
            target_tokens,
            max_tokens,
            "conversation over budget, shrinking"
        );

        let mut applied = Vec::new();
        let mut tool_results_summarized = false;

        // Tier 0: aggressive truncation of oversized tool-shaped payloads
        applied.push(ShrinkStrategy::AggressiveTruncate);
        let messages = truncate_tool_payloads(messages);
        let mut est = self.estimator.estimate_messages(&messages);
        self.observer
            .tier_applied(ShrinkStrategy::AggressiveTruncate, est);
        if est <= target_tokens {
            return Ok(self.finish(
                messages,
                applied,
                est_before,
                est,
                max_tokens,
                tool_results_summarized,
                1,
            ));
        }

        // Tier 1: selective summarization, longest message first
        applied.push(ShrinkStrategy::Summarize);
        let (messages, new_est) = self
            .summarize_oversized(
                messages,
                target_tokens,
                char_threshold,
                session,
                on_progress.as_ref(),
            )
            .await;
        est = new_est;
        self.observer.tier_applied(ShrinkStrategy::Summarize, est);
        if est <= target_tokens {
            return Ok(self.finish(
                messages,
                applied,
                est_before,
                est,
                max_tokens,
                tool_results_summarized,
                2,
            ));
        }

        // Tier 2: drop middle history with tool-result preservation
        applied.push(ShrinkStrategy::DropMiddle);
        let (messages, summarized_tools) = self
            .drop_middle(messages, est, target_tokens, last_n, session)
            .await;
        tool_results_summarized = summarized_tools;
        est = self.estimator.estimate_messages(&messages);
        self.observer.tier_applied(ShrinkStrategy::DropMiddle, est);
        if est <= target_tokens {
            return Ok(self.finish(
                messages,
                applied,
                est_before,
                est,
                max_tokens,
                tool_results_summarized,
                3,
            ));
        }

        // Tier 3: minimal system prompt. Applied unconditionally; there is
        // no further fallback, the result is returned either way.
        applied.push(ShrinkStrategy::MinimalSystemPrompt);
        let messages =
            self.apply_minimal_prompt(messages, &available_tools, is_agent_mode, &relevant_tools);
        est = self.estimator.estimate_messages(&messages);
        self.observer
            .tier_applied(ShrinkStrategy::MinimalSystemPrompt, est);

        Ok(self.finish(
            messages,
            applied,
            est_before,
            est,
            max_tokens,
            tool_results_summarized,
            4,
        ))
    }

    #[allow(clippy::too_many_arguments)]
    fn finish(
        &self,
        messages: Vec<Message>,
        applied_strategies: Vec<ShrinkStrategy>,
        est_tokens_before: usize,
        est_tokens_after: usize,
        max_tokens: usize,
        tool_results_summarized: bool,
        tiers_run: usize,
    ) -> ShrinkResult {
        for strategy in ShrinkStrategy::ORDERED.into_iter().skip(tiers_run) {
            self.observer.tier_skipped(strategy);
        }
        tracing::info!(
            est_tokens_before,
            est_tokens_after,
            applied = ?applied_strategies,
            "shrink complete"
        );
        ShrinkResult {
            messages,
            applied_strategies,
            est_tokens_before,
            est_tokens_after,
            max_tokens,
            tool_results_summarized,
        }
    }

    /// Tier 1: summarize the longest over-threshold messages until the
    /// budget is met, the candidates run out, or the session is cancelled
    async fn summarize_oversized(
        &self,
        mut messages: Vec<Message>,
        target_tokens: usize,
        char_threshold: usize,
        session: Option<&str>,
        on_progress: Option<&ProgressCallback>,
    ) -> (Vec<Message>, usize) {
        let mut candidates: Vec<usize> = messages
            .iter()
            .enumerate()
            .filter(|(_, m)| m.role != MessageRole::System && m.content.len() > char_threshold)
            .map(|(i, _)| i)
            .collect();
        // Longest first: the single largest message yields the most budget
        // per summarizer call.
        candidates.sort_by(|a, b| messages[*b].content.len().cmp(&messages[*a].content.len()));

        let total = candidates.len();
        let mut est = self.estimator.estimate_messages(&messages);

        for (position, index) in candidates.into_iter().enumerate() {
            if let (Some(oracle), Some(sid)) = (&self.cancellation, session) {
                if oracle.is_session_stopping(sid) {
                    tracing::debug!(
                        session = sid,
                        "session stopping, abandoning further summarization"
                    );
                    break;
                }
            }

            if let Some(callback) = on_progress {
                callback(position, total, &preview(&messages[index].content));
            }

            let condensed =
                summarize_content(self.summarizer.as_ref(), &messages[index].content, session)
                    .await;
            messages[index] = messages[index].with_content(condensed);

            est = self.estimator.estimate_messages(&messages);
            if est <= target_tokens {
                break;
            }
        }

        (messages, est)
    }

    /// Tier 2: keep the system anchor, the first user turn, and the recent
    /// tail; condense the tool results being discarded
    async fn drop_middle(
        &self,
        messages: Vec<Message>,
        est: usize,
        target_tokens: usize,
        last_n: usize,
        session: Option<&str>,
    ) -> (Vec<Message>, bool) {
        // The further over budget, the harder the tail gets trimmed.
        let severely_over =
            est as f32 > target_tokens as f32 * self.config.halving_trigger_ratio;
        let effective_n = if severely_over {
            (last_n / 2).max(1)
        } else {
            last_n
        };

        let total = messages.len();
        let first_system = messages.iter().position(|m| m.role == MessageRole::System);
        let first_user = messages.iter().position(|m| m.role == MessageRole::User);
        let tail_start = total.saturating_sub(effective_n);

        let retained =
            |i: usize| Some(i) == first_system || Some(i) == first_user || i >= tail_start;

        let dropped_tools: Vec<Message> = messages
            .iter()
            .enumerate()
            .filter(|(i, m)| m.role == MessageRole::Tool && !retained(*i))
            .map(|(_, m)| m.clone())
            .collect();

        let tool_summary = if dropped_tools.is_empty() {
            None
        } else {
            Some(Message::assistant(summarize_dropped_tools(&dropped_tools)))
        };
        let tool_results_summarized = tool_summary.is_some();

        let mut rebuilt = Vec::with_capacity(effective_n + 4);
        if let Some(i) = first_system {
            rebuilt.push(messages[i].clone());
        }
        if let Some(i) = first_user {
            rebuilt.push(messages[i].clone());
        }

        // Dropped work the agent can no longer see verbatim comes back as
        // compact memory, right after the first user turn.
        if tool_results_summarized {
            if let (Some(ledger), Some(sid)) = (&self.ledger, session) {
                let steps = ledger.recent_step_summaries(sid).await;
                if !steps.is_empty() {
                    rebuilt.push(Message::assistant(format_progress(&steps)));
                }
            }
        }

        if let Some(summary) = tool_summary {
            rebuilt.push(summary);
        }

        for (i, message) in messages.iter().enumerate() {
            if i >= tail_start && Some(i) != first_system && Some(i) != first_user {
                rebuilt.push(message.clone());
            }
        }

        tracing::debug!(
            before = total,
            after = rebuilt.len(),
            effective_n,
            tool_results_summarized,
            "dropped middle history"
        );

        (rebuilt, tool_results_summarized)
    }

    /// Tier 3: replace the system prompt with the minimal variant, or
    /// insert one at the front if none exists
    fn apply_minimal_prompt(
        &self,
        mut messages: Vec<Message>,
        available_tools: &[String],
        is_agent_mode: bool,
        relevant_tools: &[String],
    ) -> Vec<Message> {
        let prompt = self.prompt_builder.build_minimal_system_prompt(
            available_tools,
            is_agent_mode,
            relevant_tools,
        );

        if let Some(position) = messages.iter().position(|m| m.role == MessageRole::System) {
            messages[position] = messages[position].with_content(prompt);
        } else {
            messages.insert(0, Message::system(prompt));
        }
        messages
    }
}

/// Tier 0: truncate user messages that are oversized serialized tool/API
/// output, in one pass over the whole list
fn truncate_tool_payloads(messages: Vec<Message>) -> Vec<Message> {
    messages.into_iter().map(truncate_if_tool_payload).collect()
}

fn truncate_if_tool_payload(message: Message) -> Message {
    // The threshold is in characters; the byte length is only a cheap
    // lower-bound filter (bytes >= chars).
    if message.role != MessageRole::User
        || message.content.len() <= AGGRESSIVE_TRUNCATE_THRESHOLD
        || !looks_like_tool_payload(&message.content)
    {
        return message;
    }
    let total_chars = message.content.chars().count();
    if total_chars <= AGGRESSIVE_TRUNCATE_THRESHOLD {
        return message;
    }

    let kept: String = message
        .content
        .chars()
        .take(AGGRESSIVE_TRUNCATE_THRESHOLD)
        .collect();
    let cut = total_chars - AGGRESSIVE_TRUNCATE_THRESHOLD;
    message.with_content(format!("{kept}\n[... truncated {cut} characters]"))
}

fn looks_like_tool_payload(content: &str) -> bool {
    content.contains(r#""url":"#) || content.contains(r#""id":"#)
}

fn preview(content: &str) -> String {
    if content.chars().count() <= PREVIEW_LEN {
        content.to_string()
    } else {
        let head: String = content.chars().take(PREVIEW_LEN).collect();
        format!("{head}...")
    }
}

fn format_progress(steps: &[StepSummary]) -> String {
    let mut out = String::from("Progress completed earlier in this session:\n");
    for step in steps {
        out.push_str(&format!(
            "- step {} [{}]: {}\n",
            step.step_number, step.importance, step.action_summary
        ));
    }
    out.trim_end().to_string()
}
