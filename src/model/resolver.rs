//! Context-window resolution with caching and provider fallbacks
//!
//! Resolution order: explicit user override, optional provider-direct live
//! lookup, memoized registry match, provider fallback policy, global
//! conservative default. Models are assumed static for the process
//! lifetime, so cache entries are never invalidated; losing the cache only
//! costs a recomputation.

use std::sync::Arc;

use dashmap::DashMap;

use super::matcher::find_best_match;
use super::normalizer::normalize_model_name;
use crate::collab::LiveWindowLookup;
use crate::observer::{ContextObserver, NoopObserver};

/// Global conservative fallback when no registry entry or provider policy
/// applies
pub const DEFAULT_CONTEXT_WINDOW: u64 = 8_192;

/// Conservative output ceiling for unknown models
pub const DEFAULT_MAX_OUTPUT_TOKENS: u64 = 4_096;

type FallbackFn = fn(&str) -> u64;

// Conservative per-provider defaults. Some policies inspect size hints in
// the raw name to pick among tiers. Adding a provider is a data change.
fn anthropic_fallback(_raw: &str) -> u64 {
    100_000
}

fn openai_fallback(raw: &str) -> u64 {
    if raw.contains("32k") {
        32_768
    } else if raw.contains("16k") {
        16_385
    } else {
        8_192
    }
}

fn google_fallback(_raw: &str) -> u64 {
    32_000
}

fn openrouter_fallback(_raw: &str) -> u64 {
    32_000
}

fn deepseek_fallback(_raw: &str) -> u64 {
    64_000
}

fn mistral_fallback(_raw: &str) -> u64 {
    32_000
}

fn ollama_fallback(raw: &str) -> u64 {
    if raw.contains("128k") {
        131_072
    } else if raw.contains("64k") {
        65_536
    } else if raw.contains("32k") {
        32_768
    } else {
        8_192
    }
}

static PROVIDER_FALLBACKS: &[(&str, FallbackFn)] = &[
    ("anthropic", anthropic_fallback),
    ("openai", openai_fallback),
    ("google", google_fallback),
    ("openrouter", openrouter_fallback),
    ("deepseek", deepseek_fallback),
    ("mistral", mistral_fallback),
    ("ollama", ollama_fallback),
];

/// Resolves usable context windows for `(provider, model)` pairs
///
/// Owns its memoization cache; independent resolver instances do not share
/// state, which keeps tests isolated.
pub struct ContextWindowResolver {
    cache: DashMap<(String, String), u64>,
    max_tokens_override: Option<i64>,
    live_lookup: Option<Arc<dyn LiveWindowLookup>>,
    observer: Arc<dyn ContextObserver>,
}

impl ContextWindowResolver {
    /// Create a resolver with an empty cache and no override
    pub fn new() -> Self {
        Self {
            cache: DashMap::new(),
            max_tokens_override: None,
            live_lookup: None,
            observer: Arc::new(NoopObserver),
        }
    }

    /// Set the explicit context-window override. Non-positive values are
    /// ignored at lookup time.
    pub fn with_override(mut self, tokens: Option<i64>) -> Self {
        self.max_tokens_override = tokens;
        self
    }

    /// Inject a provider-direct lookup, tried before the registry path
    pub fn with_live_lookup(mut self, lookup: Arc<dyn LiveWindowLookup>) -> Self {
        self.live_lookup = Some(lookup);
        self
    }

    /// Inject an observer for match/fallback events
    pub fn with_observer(mut self, observer: Arc<dyn ContextObserver>) -> Self {
        self.observer = observer;
        self
    }

    /// Resolve the context window for `(provider, model)`
    ///
    /// Pure function of its inputs plus the memoization cache: the second
    /// call for the same pair is a cache hit and emits no further
    /// match/fallback events.
    pub fn resolve_context_window(&self, provider: &str, model: &str) -> u64 {
        let key = (provider.to_string(), model.to_string());
        if let Some(hit) = self.cache.get(&key) {
            return *hit;
        }

        let window = self.lookup_window(provider, model);
        // Racing writers recompute the same value; last write wins.
        self.cache.insert(key, window);
        window
    }

    /// Usable context window with the user override and optional live
    /// lookup applied
    ///
    /// A positive override short-circuits everything, bypassing cache and
    /// registry. An injected live lookup is tried next; the memoized
    /// registry path is the final word.
    pub fn max_context_tokens(&self, provider: &str, model: &str) -> u64 {
        if let Some(explicit) = self.max_tokens_override {
            if explicit > 0 {
                tracing::debug!(explicit, "using explicit context window override");
                return explicit as u64;
            }
            tracing::debug!(explicit, "ignoring non-positive context window override");
        }

        if let Some(lookup) = &self.live_lookup {
            if let Some(window) = lookup.context_window(provider, model) {
                tracing::debug!(provider, model, window, "context window from live lookup");
                return window;
            }
        }

        self.resolve_context_window(provider, model)
    }

    /// Output-token ceiling for the model, conservative when unknown
    pub fn max_output_tokens(&self, model: &str) -> u64 {
        let normalized = normalize_model_name(model);
        find_best_match(&normalized)
            .and_then(|(_, spec, _)| spec.max_output_tokens)
            .unwrap_or(DEFAULT_MAX_OUTPUT_TOKENS)
    }

    fn lookup_window(&self, provider: &str, model: &str) -> u64 {
        let normalized = normalize_model_name(model);

        if let Some((pattern, spec, score)) = find_best_match(&normalized) {
            tracing::debug!(
                provider,
                model,
                %normalized,
                pattern,
                score,
                window = spec.context_window,
                "context window resolved from registry"
            );
            self.observer.model_matched(pattern, score, spec.context_window);
            return spec.context_window;
        }

        let raw = model.to_lowercase();
        let window = PROVIDER_FALLBACKS
            .iter()
            .find(|(id, _)| provider.eq_ignore_ascii_case(id))
            .map(|(_, policy)| policy(&raw))
            .unwrap_or(DEFAULT_CONTEXT_WINDOW);

        tracing::debug!(provider, model, window, "context window from provider fallback");
        self.observer.fallback_applied(provider, window);
        window
    }
}

impl Default for ContextWindowResolver {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shrink::ShrinkStrategy;
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingObserver {
        matches: Mutex<Vec<(String, u32, u64)>>,
        fallbacks: Mutex<Vec<(String, u64)>>,
    }

    impl ContextObserver for RecordingObserver {
        fn model_matched(&self, pattern: &str, score: u32, context_window: u64) {
            self.matches
                .lock()
                .unwrap()
                .push((pattern.to_string(), score, context_window));
        }

        fn fallback_applied(&self, provider: &str, context_window: u64) {
            self.fallbacks
                .lock()
                .unwrap()
                .push((provider.to_string(), context_window));
        }

        fn tier_applied(&self, _strategy: ShrinkStrategy, _est_tokens: usize) {}

        fn tier_skipped(&self, _strategy: ShrinkStrategy) {}
    }

    #[test]
    fn test_decorated_anthropic_name() {
        let resolver = ContextWindowResolver::new();
        let window =
            resolver.resolve_context_window("anthropic", "anthropic/claude-3.7-sonnet-20250219");
        assert_eq!(window, 200_000);
    }

    #[test]
    fn test_hyphen_insertion_match() {
        let resolver = ContextWindowResolver::new();
        assert_eq!(resolver.resolve_context_window("openai", "gpt4o"), 128_000);
    }

    #[test]
    fn test_cache_hit_is_pure() {
        let observer = Arc::new(RecordingObserver::default());
        let resolver = ContextWindowResolver::new().with_observer(observer.clone());

        let first = resolver.resolve_context_window("openai", "gpt-4o");
        let second = resolver.resolve_context_window("openai", "gpt-4o");

        assert_eq!(first, second);
        // Only the first call touched the registry
        assert_eq!(observer.matches.lock().unwrap().len(), 1);
    }

    #[test]
    fn test_provider_fallback_with_size_hint() {
        let resolver = ContextWindowResolver::new();
        assert_eq!(
            resolver.resolve_context_window("ollama", "custom-model-32k"),
            32_768
        );
        assert_eq!(
            resolver.resolve_context_window("ollama", "custom-model"),
            8_192
        );
    }

    #[test]
    fn test_anthropic_fallback_is_conservative() {
        let resolver = ContextWindowResolver::new();
        assert_eq!(
            resolver.resolve_context_window("anthropic", "claude-next-unreleased"),
            100_000
        );
    }

    #[test]
    fn test_unknown_provider_uses_global_default() {
        let observer = Arc::new(RecordingObserver::default());
        let resolver = ContextWindowResolver::new().with_observer(observer.clone());

        let window = resolver.resolve_context_window("somehost", "mystery-model");
        assert_eq!(window, DEFAULT_CONTEXT_WINDOW);
        assert_eq!(
            observer.fallbacks.lock().unwrap()[0],
            ("somehost".to_string(), DEFAULT_CONTEXT_WINDOW)
        );
    }

    #[test]
    fn test_positive_override_short_circuits() {
        let resolver = ContextWindowResolver::new().with_override(Some(50_000));
        assert_eq!(resolver.max_context_tokens("openai", "gpt-4o"), 50_000);
    }

    #[test]
    fn test_non_positive_override_ignored() {
        let resolver = ContextWindowResolver::new().with_override(Some(0));
        assert_eq!(resolver.max_context_tokens("openai", "gpt-4o"), 128_000);

        let resolver = ContextWindowResolver::new().with_override(Some(-5));
        assert_eq!(resolver.max_context_tokens("openai", "gpt-4o"), 128_000);
    }

    #[test]
    fn test_live_lookup_precedes_registry() {
        struct FixedLookup;
        impl crate::collab::LiveWindowLookup for FixedLookup {
            fn context_window(&self, _provider: &str, _model: &str) -> Option<u64> {
                Some(42_000)
            }
        }

        let resolver = ContextWindowResolver::new().with_live_lookup(Arc::new(FixedLookup));
        assert_eq!(resolver.max_context_tokens("openai", "gpt-4o"), 42_000);
        // resolve_context_window itself stays on the registry path
        assert_eq!(resolver.resolve_context_window("openai", "gpt-4o"), 128_000);
    }

    #[test]
    fn test_max_output_tokens() {
        let resolver = ContextWindowResolver::new();
        assert_eq!(resolver.max_output_tokens("gpt-4o"), 16_384);
        assert_eq!(
            resolver.max_output_tokens("mystery-model"),
            DEFAULT_MAX_OUTPUT_TOKENS
        );
    }
}
