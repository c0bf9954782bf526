//! Core domain types shared across QROS crates.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Document
// ---------------------------------------------------------------------------

/// A grounding document: an identifier (usually a file name) and its full text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    /// Unique identifier within its collection.
    pub id: String,
    /// Full text content.
    pub text: String,
}

impl Document {
    pub fn new(id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
        }
    }
}

// ---------------------------------------------------------------------------
// RetrievedSource
// ---------------------------------------------------------------------------

/// A document selected as grounding for a question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetrievedSource {
    /// Identifier of the matching document.
    pub source_id: String,
    /// Short window of the document around the first keyword hit.
    pub excerpt: String,
}
