//! Model name canonicalization
//!
//! Turns a raw, possibly decorated model identifier into a canonical
//! lowercase form the registry patterns are written in. The step order is
//! load-bearing: provider prefixes must go before hyphen insertion, and
//! version syntax must be normalized before hyphen insertion, otherwise
//! provider segments or version numbers get corrupted.

use regex::Regex;
use std::sync::LazyLock;

// Provider path prefixes, most specific form first. Only the first
// matching pattern is stripped, never two.
static PREFIX_VENDOR_PATH: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^accounts/[a-z0-9_.-]+/models/").expect("vendor prefix regex"));
static PREFIX_TWO_SEGMENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-z0-9_.-]+/[a-z0-9_.-]+/").expect("two-segment prefix regex"));
static PREFIX_ONE_SEGMENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-z0-9_.-]+/").expect("one-segment prefix regex"));

// Trailing date suffixes: -YYYYMMDD, -YYYY-MM-DD, -YYMMDD
static DATE_COMPACT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"-\d{8}$").expect("compact date regex"));
static DATE_DASHED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"-\d{4}-\d{2}-\d{2}$").expect("dashed date regex"));
static DATE_SHORT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"-\d{6}$").expect("short date regex"));

// Trailing colon tag (":latest", ":free", ...)
static COLON_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r":[a-z0-9_.-]+$").expect("colon tag regex"));

// Version syntax: v<N>p<M> and v<N>-<M> become <N>.<M>, bare v<N> becomes <N>
static VERSION_P: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\bv(\d+)p(\d+)\b").expect("vNpM regex"));
static VERSION_DASH: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\bv(\d+)-(\d+)\b").expect("vN-M regex"));
static VERSION_BARE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\bv(\d+)\b").expect("bare vN regex"));

// Letter immediately followed by a digit with no separator
static LETTER_DIGIT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([a-z])(\d)").expect("letter-digit regex"));

/// Canonicalize a raw model identifier into a comparable lowercase form
///
/// Idempotent: normalizing an already-normalized name returns it unchanged.
///
/// ```
/// use shrinkray::model::normalize_model_name;
///
/// assert_eq!(
///     normalize_model_name("anthropic/claude-3.7-sonnet-20250219"),
///     "claude-3.7-sonnet"
/// );
/// assert_eq!(normalize_model_name("gpt4o"), "gpt-4o");
/// ```
pub fn normalize_model_name(raw: &str) -> String {
    let mut name = raw.trim().to_lowercase();

    for prefix in [&*PREFIX_VENDOR_PATH, &*PREFIX_TWO_SEGMENT, &*PREFIX_ONE_SEGMENT] {
        if prefix.is_match(&name) {
            name = prefix.replace(&name, "").into_owned();
            break;
        }
    }

    for date in [&*DATE_COMPACT, &*DATE_DASHED, &*DATE_SHORT] {
        if date.is_match(&name) {
            name = date.replace(&name, "").into_owned();
        }
    }

    name = COLON_TAG.replace(&name, "").into_owned();

    name = VERSION_P.replace_all(&name, "${1}.${2}").into_owned();
    name = VERSION_DASH.replace_all(&name, "${1}.${2}").into_owned();
    name = VERSION_BARE.replace_all(&name, "${1}").into_owned();

    name = LETTER_DIGIT.replace_all(&name, "${1}-${2}").into_owned();

    name
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lowercases() {
        assert_eq!(normalize_model_name("GPT-4o"), "gpt-4o");
    }

    #[test]
    fn test_strips_single_segment_prefix() {
        assert_eq!(
            normalize_model_name("anthropic/claude-3.5-sonnet"),
            "claude-3.5-sonnet"
        );
    }

    #[test]
    fn test_strips_two_segment_prefix() {
        assert_eq!(
            normalize_model_name("openrouter/anthropic/claude-3-opus"),
            "claude-3-opus"
        );
    }

    #[test]
    fn test_strips_vendor_path_prefix() {
        assert_eq!(
            normalize_model_name("accounts/fireworks/models/llama-v3p1-70b-instruct"),
            "llama-3.1-70b-instruct"
        );
    }

    #[test]
    fn test_strips_only_first_matching_prefix() {
        // The two-segment form wins; the remaining name keeps its slashes
        // stripped only once.
        assert_eq!(
            normalize_model_name("groupname/provider/claude-3-haiku"),
            "claude-3-haiku"
        );
    }

    #[test]
    fn test_strips_compact_date_suffix() {
        assert_eq!(
            normalize_model_name("claude-3-opus-20240229"),
            "claude-3-opus"
        );
    }

    #[test]
    fn test_strips_dashed_date_suffix() {
        assert_eq!(
            normalize_model_name("claude-3.7-sonnet-2025-02-19"),
            "claude-3.7-sonnet"
        );
    }

    #[test]
    fn test_strips_short_date_suffix() {
        assert_eq!(normalize_model_name("gpt-4-turbo-240409"), "gpt-4-turbo");
    }

    #[test]
    fn test_strips_colon_tag() {
        assert_eq!(normalize_model_name("llama-3.1:latest"), "llama-3.1");
        assert_eq!(
            normalize_model_name("deepseek/deepseek-chat:free"),
            "deepseek-chat"
        );
    }

    #[test]
    fn test_version_syntax() {
        assert_eq!(normalize_model_name("llama-v3p1-405b"), "llama-3.1-405b");
        assert_eq!(normalize_model_name("claude-v3-5-sonnet"), "claude-3.5-sonnet");
        assert_eq!(normalize_model_name("qwen-v2"), "qwen-2");
    }

    #[test]
    fn test_letter_digit_hyphenation() {
        assert_eq!(normalize_model_name("gpt4"), "gpt-4");
        assert_eq!(normalize_model_name("gpt4o"), "gpt-4o");
        assert_eq!(normalize_model_name("llama3.1"), "llama-3.1");
    }

    #[test]
    fn test_full_decoration() {
        assert_eq!(
            normalize_model_name("anthropic/claude-3.7-sonnet-20250219"),
            "claude-3.7-sonnet"
        );
    }

    #[test]
    fn test_idempotent() {
        let inputs = [
            "anthropic/claude-3.7-sonnet-20250219",
            "gpt4o",
            "accounts/fireworks/models/llama-v3p1-70b-instruct",
            "openrouter/openai/o1:free",
        ];
        for raw in inputs {
            let once = normalize_model_name(raw);
            assert_eq!(normalize_model_name(&once), once, "not idempotent: {raw}");
        }
    }

    #[test]
    fn test_plain_names_pass_through() {
        assert_eq!(normalize_model_name("gemini-1.5-pro"), "gemini-1.5-pro");
        assert_eq!(normalize_model_name("mistral-large"), "mistral-large");
    }
}
