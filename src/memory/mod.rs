pub mod access;
pub mod error;
pub mod overview;
pub mod relations;
pub mod search;
pub mod stats;
pub mod store;
pub mod types;

/// Truncate `content` to `max_chars` characters, appending "..." if anything was cut.
pub fn truncate_preview(content: &str, max_chars: usize) -> String {
    match content.char_indices().nth(max_chars) {
        None => content.to_string(),
        Some((end, _)) => format!("{}...", &content[..end]),
    }
}

#[cfg(test)]
mod tests {
    use super::truncate_preview;

    #[test]
    fn preview_keeps_short_content() {
        assert_eq!(truncate_preview("Meeting A", 50), "Meeting A");
        assert_eq!(truncate_preview(&"a".repeat(50), 50), "a".repeat(50));
    }

    #[test]
    fn preview_cuts_on_char_boundary() {
        assert_eq!(truncate_preview(&"b".repeat(51), 50), format!("{}...", "b".repeat(50)));
        assert_eq!(truncate_preview("héllo wörld", 4), "héll...");
    }
}
