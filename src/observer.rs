//! Observation hooks for resolver and pipeline decisions
//!
//! Diagnostics flow through an injected observer invoked at defined
//! extension points, so tests can assert on behavior without parsing log
//! text and production hosts can swap reporters freely. Every method has a
//! no-op default; implementors override only what they care about.

use crate::shrink::ShrinkStrategy;

/// Extension points for resolver and shrink pipeline events
pub trait ContextObserver: Send + Sync {
    /// A registry pattern matched during context-window resolution
    fn model_matched(&self, pattern: &str, score: u32, context_window: u64) {
        let _ = (pattern, score, context_window);
    }

    /// No registry match; a provider fallback (or the global default)
    /// supplied the window
    fn fallback_applied(&self, provider: &str, context_window: u64) {
        let _ = (provider, context_window);
    }

    /// A reduction tier ran, with the token estimate after it finished
    fn tier_applied(&self, strategy: ShrinkStrategy, est_tokens: usize) {
        let _ = (strategy, est_tokens);
    }

    /// A reduction tier was not reached because the budget was already met
    fn tier_skipped(&self, strategy: ShrinkStrategy) {
        let _ = strategy;
    }
}

/// Observer that ignores every event
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl ContextObserver for NoopObserver {}
