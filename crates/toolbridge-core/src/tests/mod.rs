//! Dispatcher tests with scripted tool runners.

mod hover_behaviour;
#[cfg(unix)]
mod shell;

use std::collections::HashMap;

use mockall::mock;

use crate::document::{Document, DocumentStore};
use crate::errors::RunError;
use crate::runner::{CommandRunner, Invocation};

mock! {
    pub Runner {}
    impl CommandRunner for Runner {
        fn run(&self, invocation: &Invocation) -> Result<Vec<u8>, RunError>;
    }
}

pub(crate) const GO_URI: &str = "file:///workspace/main.go";

/// In-memory store keyed by URI.
#[derive(Debug, Default)]
pub(crate) struct StaticStore {
    documents: HashMap<String, Document>,
}

impl StaticStore {
    pub(crate) fn with(mut self, uri: &str, text: &str, language_id: &str) -> Self {
        self.documents
            .insert(uri.to_owned(), Document::new(text, language_id));
        self
    }
}

impl DocumentStore for StaticStore {
    fn lookup(&self, uri: &str) -> Option<Document> {
        self.documents.get(uri).cloned()
    }
}

pub(crate) fn exit_failure(command: &str) -> RunError {
    RunError::NonZeroExit {
        command: command.to_owned(),
        status: Some(1),
        output: String::from("boom"),
    }
}
