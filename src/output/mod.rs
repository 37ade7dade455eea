// Output formatting: terminal display of batches and summaries.

pub mod terminal;

/// Truncate a string to at most `max_chars` characters, appending "..." if truncated.
///
/// Byte slicing would panic on multi-byte characters; label descriptions and
/// CDN URLs are routinely non-ASCII, so count chars instead.
pub fn truncate_chars(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        text.to_string()
    } else {
        let truncated: String = text.chars().take(max_chars).collect();
        format!("{truncated}...")
    }
}
