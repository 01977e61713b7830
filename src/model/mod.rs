//! Model identity: name normalization, fuzzy registry matching, and
//! context-window resolution
//!
//! Raw model identifiers arrive decorated in provider-specific ways
//! ("openrouter/anthropic/claude-3.7-sonnet:free",
//! "accounts/fireworks/models/llama-v3p1-70b-instruct"). This module
//! canonicalizes them, scores them against a registry of known model
//! families, and resolves a usable context window with conservative
//! fallbacks when nothing matches.

pub mod matcher;
pub mod normalizer;
pub mod registry;
pub mod resolver;

pub use matcher::{EXACT_MATCH_SCORE, calculate_match_score, find_best_match};
pub use normalizer::normalize_model_name;
pub use registry::{MODEL_REGISTRY, ModelSpec};
pub use resolver::{
    ContextWindowResolver, DEFAULT_CONTEXT_WINDOW, DEFAULT_MAX_OUTPUT_TOKENS,
};
