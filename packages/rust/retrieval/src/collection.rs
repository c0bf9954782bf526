//! Document collections the retriever can scan.

use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use qros_shared::{Document, QrosError, Result};

/// A read-only, ordered source of grounding documents.
///
/// The order of the returned documents is the "discovery order" used to
/// break score ties.
pub trait DocumentCollection {
    /// Load every document currently in the collection.
    fn documents(&self) -> Result<Vec<Document>>;
}

impl<T: DocumentCollection + ?Sized> DocumentCollection for &T {
    fn documents(&self) -> Result<Vec<Document>> {
        (**self).documents()
    }
}

impl<T: DocumentCollection + ?Sized> DocumentCollection for Box<T> {
    fn documents(&self) -> Result<Vec<Document>> {
        (**self).documents()
    }
}

// ---------------------------------------------------------------------------
// DirectoryCollection
// ---------------------------------------------------------------------------

/// A flat directory of text files. Each regular file is one document whose
/// id is its file name. Re-read on every call.
#[derive(Debug, Clone)]
pub struct DirectoryCollection {
    root: PathBuf,
    extensions: Vec<String>,
}

impl DirectoryCollection {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            extensions: Vec::new(),
        }
    }

    /// Only include files with one of these extensions (case-insensitive,
    /// no leading dot). An empty list includes every file.
    pub fn with_extensions(mut self, extensions: Vec<String>) -> Self {
        self.extensions = extensions
            .into_iter()
            .map(|e| e.trim_start_matches('.').to_lowercase())
            .collect();
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn accepts(&self, path: &Path) -> bool {
        if self.extensions.is_empty() {
            return true;
        }
        path.extension()
            .map(|ext| ext.to_string_lossy().to_lowercase())
            .is_some_and(|ext| self.extensions.iter().any(|e| *e == ext))
    }
}

impl DocumentCollection for DirectoryCollection {
    fn documents(&self) -> Result<Vec<Document>> {
        let entries = std::fs::read_dir(&self.root)
            .map_err(|e| QrosError::collection_unavailable(&self.root, e))?;

        let mut files: Vec<PathBuf> = Vec::new();
        for entry in entries {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    warn!(root = ?self.root, error = %e, "skipping unreadable directory entry");
                    continue;
                }
            };
            let path = entry.path();
            // `Path::is_file` follows symlinks.
            if path.is_file() && self.accepts(&path) {
                files.push(path);
            }
        }
        files.sort();

        let mut docs = Vec::with_capacity(files.len());
        for path in files {
            let Some(name) = path.file_name() else {
                continue;
            };
            match std::fs::read_to_string(&path) {
                Ok(text) => docs.push(Document::new(name.to_string_lossy(), text)),
                Err(e) => warn!(?path, error = %e, "skipping unreadable document"),
            }
        }

        debug!(root = ?self.root, count = docs.len(), "enumerated document collection");
        Ok(docs)
    }
}

// ---------------------------------------------------------------------------
// MemoryCollection
// ---------------------------------------------------------------------------

/// An in-memory collection, kept in insertion order.
#[derive(Debug, Clone, Default)]
pub struct MemoryCollection {
    docs: Vec<Document>,
}

impl MemoryCollection {
    pub fn new(docs: Vec<Document>) -> Self {
        Self { docs }
    }

    pub fn push(&mut self, doc: Document) {
        self.docs.push(doc);
    }

    pub fn len(&self) -> usize {
        self.docs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.docs.is_empty()
    }
}

impl<I: Into<String>, T: Into<String>> FromIterator<(I, T)> for MemoryCollection {
    fn from_iter<It: IntoIterator<Item = (I, T)>>(iter: It) -> Self {
        Self::new(
            iter.into_iter()
                .map(|(id, text)| Document::new(id, text))
                .collect(),
        )
    }
}

impl DocumentCollection for MemoryCollection {
    fn documents(&self) -> Result<Vec<Document>> {
        Ok(self.docs.clone())
    }
}
