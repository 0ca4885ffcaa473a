//! Request dispatcher shared by the formatting and hover handlers.

use toolbridge_config::ConfigTable;

use crate::document::{Document, DocumentStore};
use crate::errors::DispatchError;
use crate::runner::CommandRunner;

/// Routes editor requests to the external tools configured for a language.
///
/// The dispatcher holds only read-only state, so one instance can serve
/// concurrent requests when the store and runner allow shared access.
#[derive(Debug)]
pub struct Dispatcher<S, R> {
    table: ConfigTable,
    store: S,
    runner: R,
}

impl<S, R> Dispatcher<S, R> {
    /// Creates a dispatcher over `table`, reading documents from `store` and
    /// running tools with `runner`.
    #[must_use]
    pub const fn new(table: ConfigTable, store: S, runner: R) -> Self {
        Self {
            table,
            store,
            runner,
        }
    }

    /// Tool configuration table.
    #[must_use]
    pub const fn table(&self) -> &ConfigTable {
        &self.table
    }

    /// Document store backing this dispatcher.
    #[must_use]
    pub const fn store(&self) -> &S {
        &self.store
    }

    pub(crate) const fn runner(&self) -> &R
    where
        R: CommandRunner,
    {
        &self.runner
    }

    pub(crate) fn document(&self, uri: &str) -> Result<Document, DispatchError>
    where
        S: DocumentStore,
    {
        self.store
            .lookup(uri)
            .ok_or_else(|| DispatchError::DocumentNotFound {
                uri: uri.to_owned(),
            })
    }
}
