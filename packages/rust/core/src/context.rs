//! Grounding context assembled from retrieved sources.

use qros_shared::RetrievedSource;

/// Line placed between consecutive sources.
pub const SOURCE_DELIMITER: &str = "\n\n---\n\n";

/// Render sources as `Source: <id>\n<excerpt>` blocks joined by
/// [`SOURCE_DELIMITER`]. No sources yields an empty string.
pub fn compose_context(sources: &[RetrievedSource]) -> String {
    sources
        .iter()
        .map(|s| format!("Source: {}\n{}", s.source_id, s.excerpt))
        .collect::<Vec<_>>()
        .join(SOURCE_DELIMITER)
}
