//! Dispatch engine that answers editor requests with external tools.
//!
//! The crate resolves which configured tool applies to a document's
//! language, runs it through the platform shell, and shapes its output into
//! protocol results: a whole-document [`lsp_types::TextEdit`] for formatting
//! and ranged [`lsp_types::Hover`] markup for the word under the cursor.
//!
//! Process execution sits behind the [`CommandRunner`] trait and document
//! access behind [`DocumentStore`], so everything except [`ShellRunner`] is
//! deterministic and can be exercised with test doubles.
//!
//! Formatting and hover deliberately differ when a tool fails: formatting
//! moves on to the next configured formatter, while hover reports the first
//! failure as an error.

mod capability;
mod command;
mod dispatcher;
mod document;
mod errors;
mod format;
mod hover;
mod runner;
mod text;
mod tokenizer;

pub use capability::{Capability, Resolution, resolve};
pub use command::build;
pub use dispatcher::Dispatcher;
pub use document::{Document, DocumentStore};
pub use errors::{DispatchError, RunError};
pub use runner::{CommandRunner, Invocation, ProcessEnvironment, ShellRunner};
pub use text::{CharClass, classify, classify_units, split_lines, to_utf16, utf16_len};
pub use tokenizer::{WordSpan, word_at};

#[cfg(test)]
mod tests;
