//! Compact summaries of tool results about to be dropped
//!
//! Before the drop-middle tier discards interior tool messages, it
//! condenses them into one short assistant message so the agent keeps a
//! trace of what its tools did. The summary is hard-capped so it can never
//! become a budget problem itself.

use std::sync::LazyLock;

use regex::Regex;

use crate::message::Message;

/// Character cap for the synthesized drop summary
pub const TOOL_DROP_SUMMARY_CAP: usize = 800;

const ERROR_BRIEF_LEN: usize = 60;
const LINE_BRIEF_LEN: usize = 80;

// Leading "[toolName]" prefix, optionally followed by "ERROR:"
static TOOL_PREFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\[([^\]]*)\]\s*(ERROR:)?\s*").expect("tool prefix regex"));

/// Build the compact summary body covering `dropped` tool messages
///
/// One `[toolName] brief` line per result. The output never exceeds
/// [`TOOL_DROP_SUMMARY_CAP`] characters; once the cap would be crossed the
/// remaining entries collapse into a single `... and N more tool results`
/// marker.
pub fn summarize_dropped_tools(dropped: &[Message]) -> String {
    let mut lines: Vec<String> = Vec::new();
    let mut used = 0;

    for (position, message) in dropped.iter().enumerate() {
        let (tool_name, error_prefix, body) = parse_tool_result(&message.content);
        let is_error = error_prefix || classify_error(&message.content, &body);
        let line = format!("[{}] {}", tool_name, brief_for(&body, is_error));

        let separator = usize::from(!lines.is_empty());
        if used + separator + line.len() > TOOL_DROP_SUMMARY_CAP {
            push_overflow_marker(&mut lines, &mut used, dropped.len() - position);
            break;
        }

        used += separator + line.len();
        lines.push(line);
    }

    lines.join("\n")
}

// The marker replaces the entry that overflowed; rendered lines are given
// back until the marker itself fits under the cap.
fn push_overflow_marker(lines: &mut Vec<String>, used: &mut usize, mut remaining: usize) {
    loop {
        let marker = format!("... and {remaining} more tool results");
        let separator = usize::from(!lines.is_empty());
        if *used + separator + marker.len() <= TOOL_DROP_SUMMARY_CAP {
            lines.push(marker);
            return;
        }
        if let Some(popped) = lines.pop() {
            *used -= popped.len() + usize::from(!lines.is_empty());
            remaining += 1;
        } else {
            lines.push(marker);
            return;
        }
    }
}

/// Recover `(tool name, had ERROR: prefix, result body)` from tool content
///
/// Content without a bracket prefix reports the tool as `unknown` and the
/// whole content as the body.
fn parse_tool_result(content: &str) -> (String, bool, String) {
    if let Some(caps) = TOOL_PREFIX.captures(content) {
        let name = caps[1].trim().to_string();
        let name = if name.is_empty() {
            "unknown".to_string()
        } else {
            name
        };
        let error_prefix = caps.get(2).is_some();
        let body = content[caps[0].len()..].to_string();
        (name, error_prefix, body)
    } else {
        ("unknown".to_string(), false, content.to_string())
    }
}

fn classify_error(content: &str, body: &str) -> bool {
    let lower = content.to_lowercase();
    lower.contains("[error]")
        || lower.contains("] error:")
        || body.trim_start().to_lowercase().starts_with("error")
}

fn brief_for(body: &str, is_error: bool) -> String {
    let trimmed = body.trim();
    if is_error {
        return format!("FAILED: {}", take_chars(trimmed, ERROR_BRIEF_LEN));
    }
    if trimmed.is_empty() || trimmed == "(no output)" || trimmed == "null" {
        return "completed (no output)".to_string();
    }
    let first_line = trimmed.lines().next().unwrap_or_default();
    if first_line.chars().count() <= LINE_BRIEF_LEN {
        first_line.to_string()
    } else {
        format!("{}...", take_chars(first_line, LINE_BRIEF_LEN))
    }
}

fn take_chars(text: &str, max: usize) -> String {
    text.chars().take(max).collect()
}
