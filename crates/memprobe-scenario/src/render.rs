//! Plain-text transcript formatting

use memprobe_core::{HealthStatus, MemoryRetrieval, SimilarMemories, SimilarMemory};
use serde_json::Value;
use std::borrow::Cow;
use std::io::{self, Write};

const NOT_AVAILABLE: &str = "N/A";

/// How much of each retrieval to show
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DisplayOptions {
    /// Maximum memories printed per retrieval
    pub limit: usize,
    /// Characters of content printed per memory
    pub preview_chars: usize,
}

impl Default for DisplayOptions {
    fn default() -> Self {
        Self {
            limit: 3,
            preview_chars: 100,
        }
    }
}

/// First `max` characters of `text`
pub fn truncate_chars(text: &str, max: usize) -> &str {
    match text.char_indices().nth(max) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

/// Wire form of a memory field: strings bare, other JSON as sent
fn field_text(value: Option<&Value>) -> Cow<'_, str> {
    match value {
        None | Some(Value::Null) => Cow::Borrowed(NOT_AVAILABLE),
        Some(Value::String(text)) => Cow::Borrowed(text.as_str()),
        Some(other) => Cow::Owned(other.to_string()),
    }
}

/// Section header such as `=== Testing Health Check ===`
pub fn write_section<W: Write>(out: &mut W, title: &str) -> io::Result<()> {
    writeln!(out, "\n=== {} ===", title)
}

/// Health body as the service sent it, unknown fields included
pub fn write_health<W: Write>(out: &mut W, status: &HealthStatus) -> io::Result<()> {
    writeln!(out, "Status Code: 200")?;
    let body = serde_json::to_string(status).unwrap_or_else(|_| status.status.clone());
    writeln!(out, "Response: {}", body)
}

pub fn write_memory<W: Write>(
    out: &mut W,
    position: usize,
    memory: &SimilarMemory,
    options: &DisplayOptions,
) -> io::Result<()> {
    let content = field_text(memory.content.as_ref());
    writeln!(out, "\nMemory {}:", position)?;
    writeln!(out, "Content: {}...", truncate_chars(&content, options.preview_chars))?;
    writeln!(out, "Summary: {}", field_text(memory.summary.as_ref()))?;
    writeln!(out, "Importance: {}", field_text(memory.importance.as_ref()))?;
    writeln!(out, "Similarity: {}", field_text(memory.similarity.as_ref()))
}

/// Summary block followed by the top memories
pub fn write_retrieval<W: Write>(
    out: &mut W,
    retrieval: &MemoryRetrieval,
    options: &DisplayOptions,
) -> io::Result<()> {
    writeln!(out, "\n--- Conversation Summary ---")?;
    writeln!(
        out,
        "{}",
        retrieval
            .conversation_summary
            .as_deref()
            .unwrap_or("No summary available")
    )?;

    writeln!(out, "\n--- Similar Memories ---")?;
    match &retrieval.similar_memories {
        SimilarMemories::Ranked(memories) => {
            for (i, memory) in memories.iter().take(options.limit).enumerate() {
                write_memory(out, i + 1, memory, options)?;
            }
        }
        SimilarMemories::Other(raw) => writeln!(out, "{}", raw)?,
    }
    Ok(())
}
