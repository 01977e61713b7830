//! Chunked summarization policy for oversized message content
//!
//! The external summarizer handles bounded inputs well; very large content
//! is split into chunks, each summarized independently, and the joined
//! partial summaries are compressed once more if they are still oversized.
//! Calls are strictly sequential, never parallel, so the pipeline can stop
//! the moment its budget is met.

use crate::collab::Summarizer;

/// Maximum characters handed to the summarizer in one call
pub const SUMMARY_CHUNK_SIZE: usize = 16_000;

/// Summarize `content` through the external summarizer
///
/// Content at or under [`SUMMARY_CHUNK_SIZE`] goes out in a single call.
/// Larger content is chunked; the partial summaries are joined by newline
/// and re-summarized once if the concatenation still exceeds the chunk
/// size. A blank result keeps the original content, so a misbehaving
/// summarizer can never erase a message.
pub async fn summarize_content(
    summarizer: &dyn Summarizer,
    content: &str,
    session_id: Option<&str>,
) -> String {
    if content.len() <= SUMMARY_CHUNK_SIZE {
        let summary = summarizer.summarize(content, session_id).await;
        return keep_if_blank(summary, content);
    }

    let mut parts = Vec::new();
    for chunk in chunk_by_chars(content, SUMMARY_CHUNK_SIZE) {
        parts.push(summarizer.summarize(&chunk, session_id).await);
    }
    let combined = parts.join("\n");

    if combined.len() > SUMMARY_CHUNK_SIZE {
        // Final compression pass over the concatenated partial summaries
        let summary = summarizer.summarize(&combined, session_id).await;
        return keep_if_blank(summary, content);
    }

    keep_if_blank(combined, content)
}

fn keep_if_blank(summary: String, original: &str) -> String {
    if summary.trim().is_empty() {
        original.to_string()
    } else {
        summary
    }
}

/// Split on char boundaries into chunks of at most `max_chars` characters
fn chunk_by_chars(text: &str, max_chars: usize) -> Vec<String> {
    let mut chunks = Vec::new();
    let mut current = String::new();
    let mut count = 0;
    for ch in text.chars() {
        current.push(ch);
        count += 1;
        if count == max_chars {
            chunks.push(std::mem::take(&mut current));
            count = 0;
        }
    }
    if !current.is_empty() {
        chunks.push(current);
    }
    chunks
}
