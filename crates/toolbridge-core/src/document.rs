//! Read-only access to open documents.

/// Snapshot of an open document taken for the duration of one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    text: String,
    language_id: String,
}

impl Document {
    /// Builds a snapshot.
    #[must_use]
    pub fn new(text: impl Into<String>, language_id: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            language_id: language_id.into(),
        }
    }

    /// Current full text.
    #[must_use]
    pub fn text(&self) -> &str {
        self.text.as_str()
    }

    /// Declared language identifier.
    #[must_use]
    pub fn language_id(&self) -> &str {
        self.language_id.as_str()
    }
}

/// Lookup of open documents by URI.
pub trait DocumentStore {
    /// Returns a snapshot of the document, or `None` when it is not open.
    fn lookup(&self, uri: &str) -> Option<Document>;
}

impl<T: DocumentStore + ?Sized> DocumentStore for &T {
    fn lookup(&self, uri: &str) -> Option<Document> {
        (**self).lookup(uri)
    }
}
