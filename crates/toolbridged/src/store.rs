//! Open-document store fed by text synchronisation notifications.

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

use toolbridge_core::{Document, DocumentStore};

/// Documents currently open in the editor, keyed by URI.
///
/// Requests read snapshots while the message loop applies updates, so the
/// map sits behind a read-write lock.
#[derive(Debug, Default)]
pub struct MemoryDocumentStore {
    documents: RwLock<HashMap<String, Document>>,
}

impl MemoryDocumentStore {
    /// Builds an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a newly opened document.
    pub fn open(&self, uri: &str, language_id: &str, text: String) {
        self.documents
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(uri.to_owned(), Document::new(text, language_id));
    }

    /// Replaces the text of an open document, keeping its language.
    ///
    /// Returns `false` when the document is not open.
    pub fn update(&self, uri: &str, text: String) -> bool {
        let mut documents = self
            .documents
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        match documents.get_mut(uri) {
            Some(document) => {
                *document = Document::new(text, document.language_id());
                true
            }
            None => false,
        }
    }

    /// Forgets a closed document.
    pub fn close(&self, uri: &str) {
        self.documents
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(uri);
    }

    /// Number of open documents.
    #[must_use]
    pub fn len(&self) -> usize {
        self.documents
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Whether no documents are open.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl DocumentStore for MemoryDocumentStore {
    fn lookup(&self, uri: &str) -> Option<Document> {
        self.documents
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(uri)
            .cloned()
    }
}
