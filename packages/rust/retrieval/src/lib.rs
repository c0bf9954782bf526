//! Keyword-overlap retrieval over a small document collection.
//!
//! Given a question, [`KeywordRetriever::retrieve`] scores every document by
//! how many distinct query tokens it contains, keeps the documents that match
//! at all, and returns the best few with a short excerpt each. The
//! collection is rescanned on every call; there is no index.

mod collection;
mod tokenizer;

use std::collections::HashSet;

use tracing::{debug, instrument};

use qros_shared::{Document, Result, RetrievedSource};

pub use collection::{DirectoryCollection, DocumentCollection, MemoryCollection};
pub use tokenizer::{fold_case, tokenize};

/// Characters of context kept before the anchor token.
const EXCERPT_LEAD_CHARS: usize = 50;

/// Total excerpt length in characters.
const EXCERPT_LEN_CHARS: usize = 300;

/// A matching document inside one retrieval call.
#[derive(Debug)]
struct ScoredDocument<'a> {
    doc: &'a Document,
    score: usize,
    excerpt: String,
}

/// Scores documents from a [`DocumentCollection`] by keyword overlap.
#[derive(Debug, Clone)]
pub struct KeywordRetriever<C> {
    collection: C,
}

impl<C: DocumentCollection> KeywordRetriever<C> {
    pub fn new(collection: C) -> Self {
        Self { collection }
    }

    pub fn collection(&self) -> &C {
        &self.collection
    }

    /// Return up to `max_results` documents relevant to `question`, best first.
    ///
    /// A query with no word tokens returns an empty list without touching
    /// the collection. Fails with
    /// [`QrosError::DocumentCollectionUnavailable`](qros_shared::QrosError)
    /// when the collection cannot be enumerated.
    #[instrument(skip_all, fields(max_results = max_results))]
    pub fn retrieve(&self, question: &str, max_results: usize) -> Result<Vec<RetrievedSource>> {
        let tokens = tokenize(question);
        let Some(anchor) = tokens.first() else {
            debug!("query has no tokens, skipping scan");
            return Ok(Vec::new());
        };

        let mut seen = HashSet::new();
        let distinct: Vec<&str> = tokens
            .iter()
            .map(String::as_str)
            .filter(|t| seen.insert(*t))
            .collect();

        let docs = self.collection.documents()?;

        let mut scored: Vec<ScoredDocument<'_>> = docs
            .iter()
            .filter_map(|doc| score_document(doc, &distinct, anchor))
            .collect();

        // `sort_by` is stable: equal scores keep collection order.
        scored.sort_by(|a, b| b.score.cmp(&a.score));
        scored.truncate(max_results);

        debug!(
            scanned = docs.len(),
            tokens = distinct.len(),
            returned = scored.len(),
            "retrieval complete"
        );

        Ok(scored
            .into_iter()
            .map(|s| RetrievedSource {
                source_id: s.doc.id.clone(),
                excerpt: s.excerpt,
            })
            .collect())
    }
}

/// Count distinct tokens present in `doc`. Documents without a hit are dropped.
fn score_document<'a>(
    doc: &'a Document,
    distinct: &[&str],
    anchor: &str,
) -> Option<ScoredDocument<'a>> {
    let folded = fold_case(&doc.text);
    let score = distinct.iter().filter(|t| folded.contains(**t)).count();
    if score == 0 {
        return None;
    }

    Some(ScoredDocument {
        doc,
        score,
        excerpt: excerpt(&doc.text, &folded, anchor),
    })
}

/// Cut a window around the first occurrence of `anchor`.
///
/// `folded` must be `fold_case(text)`, so char offsets line up. The window
/// starts [`EXCERPT_LEAD_CHARS`] before the hit (clamped to the start) and
/// runs [`EXCERPT_LEN_CHARS`] or to the end of the text. Without a hit the
/// window is the start of the document.
fn excerpt(text: &str, folded: &str, anchor: &str) -> String {
    let start = folded
        .find(anchor)
        .map(|byte_idx| {
            folded[..byte_idx]
                .chars()
                .count()
                .saturating_sub(EXCERPT_LEAD_CHARS)
        })
        .unwrap_or(0);

    text.chars().skip(start).take(EXCERPT_LEN_CHARS).collect()
}
