//! Message loop routing protocol traffic to the dispatcher.
//!
//! Formatting and hover requests run on scoped worker threads so a slow tool
//! does not hold up text synchronisation. Each worker writes its response
//! through the shared writer as soon as the tool finishes, which means
//! responses may arrive out of request order. Document notifications are
//! applied on the loop thread in arrival order.

use std::io::{BufRead, Write};
use std::process::ExitCode;
use std::sync::{Mutex, PoisonError};
use std::thread;

use lsp_types::{
    DidChangeTextDocumentParams, DidCloseTextDocumentParams, DidOpenTextDocumentParams,
    DocumentFormattingParams, HoverParams, HoverProviderCapability, InitializeResult, OneOf,
    Position, ServerCapabilities, ServerInfo, TextDocumentSyncCapability, TextDocumentSyncKind,
};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use toolbridge_config::{ConfigTable, ToolConfig};
use toolbridge_core::{CommandRunner, DispatchError, Dispatcher};
use tracing::{debug, info, warn};

use crate::errors::ServerError;
use crate::jsonrpc::{
    INTERNAL_ERROR, INVALID_PARAMS, INVALID_REQUEST, IncomingMessage, JsonRpcError,
    JsonRpcResponse, METHOD_NOT_FOUND, PARSE_ERROR, REQUEST_FAILED,
};
use crate::store::MemoryDocumentStore;
use crate::transport::{MessageReader, MessageWriter, TransportError};

/// Tracing target for the message loop.
const SERVER_TARGET: &str = "toolbridged::server";

/// How a session finished.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEnd {
    /// `exit` arrived after `shutdown`.
    Clean,
    /// `exit` arrived without a preceding `shutdown`.
    ExitWithoutShutdown,
    /// The client closed the input stream.
    Disconnected,
}

impl SessionEnd {
    /// Process exit status for this outcome.
    #[must_use]
    pub const fn exit_code(self) -> ExitCode {
        match self {
            Self::Clean | Self::Disconnected => ExitCode::SUCCESS,
            Self::ExitWithoutShutdown => ExitCode::FAILURE,
        }
    }
}

/// Tool-backed request handed to a worker thread.
enum Work {
    Format {
        id: Value,
        uri: String,
    },
    Hover {
        id: Value,
        uri: String,
        position: Position,
    },
}

enum Routed {
    Reply(JsonRpcResponse),
    Spawn(Work),
}

/// Language server over a framed byte stream.
#[derive(Debug)]
pub struct Server<R> {
    dispatcher: Dispatcher<MemoryDocumentStore, R>,
}

impl<R> Server<R> {
    /// Creates a server answering from `table` with tools run by `runner`.
    #[must_use]
    pub fn new(table: ConfigTable, runner: R) -> Self {
        Self {
            dispatcher: Dispatcher::new(table, MemoryDocumentStore::new(), runner),
        }
    }

    /// Documents the client currently has open.
    #[must_use]
    pub const fn documents(&self) -> &MemoryDocumentStore {
        self.dispatcher.store()
    }

    fn initialize_result(&self) -> InitializeResult {
        let table = self.dispatcher.table();
        let formats = table.tools().any(ToolConfig::formats);
        let hovers = table.tools().any(ToolConfig::hovers);
        InitializeResult {
            capabilities: ServerCapabilities {
                text_document_sync: Some(TextDocumentSyncCapability::Kind(
                    TextDocumentSyncKind::FULL,
                )),
                document_formatting_provider: formats.then_some(OneOf::Left(true)),
                hover_provider: hovers.then_some(HoverProviderCapability::Simple(true)),
                ..ServerCapabilities::default()
            },
            server_info: Some(ServerInfo {
                name: String::from("toolbridge"),
                version: Some(String::from(env!("CARGO_PKG_VERSION"))),
            }),
        }
    }

    fn synchronise(&self, method: &str, params: Option<Value>) -> Result<(), serde_json::Error> {
        let documents = self.dispatcher.store();
        match method {
            "textDocument/didOpen" => {
                let item = decode::<DidOpenTextDocumentParams>(params)?.text_document;
                debug!(target: SERVER_TARGET, uri = item.uri.as_str(), language = item.language_id.as_str(), "document opened");
                documents.open(item.uri.as_str(), &item.language_id, item.text);
            }
            "textDocument/didChange" => {
                let mut change_set = decode::<DidChangeTextDocumentParams>(params)?;
                let uri = change_set.text_document.uri;
                // Full synchronisation: the last change carries the whole text.
                if let Some(change) = change_set.content_changes.pop()
                    && !documents.update(uri.as_str(), change.text)
                {
                    warn!(target: SERVER_TARGET, uri = uri.as_str(), "change for a document that is not open");
                }
            }
            "textDocument/didClose" => {
                let uri = decode::<DidCloseTextDocumentParams>(params)?.text_document.uri;
                documents.close(uri.as_str());
            }
            other => debug!(target: SERVER_TARGET, method = other, "ignoring notification"),
        }
        Ok(())
    }
}

impl<R: CommandRunner + Sync> Server<R> {
    /// Serves one session, reading requests from `input` and writing
    /// responses to `output`.
    ///
    /// Returns once `exit` arrives or the input ends, after every in-flight
    /// request has been answered.
    ///
    /// # Errors
    ///
    /// Returns [`ServerError`] when the stream cannot be read or written.
    pub fn serve<I, O>(&self, input: I, output: O) -> Result<SessionEnd, ServerError>
    where
        I: BufRead,
        O: Write + Send,
    {
        let mut reader = MessageReader::new(input);
        let shared_writer = Mutex::new(MessageWriter::new(output));
        let writer = &shared_writer;
        let mut shutdown_requested = false;

        info!(target: SERVER_TARGET, "session started");
        thread::scope(|scope| -> Result<SessionEnd, ServerError> {
            loop {
                let payload = match reader.receive() {
                    Ok(payload) => payload,
                    Err(TransportError::Closed) => {
                        info!(target: SERVER_TARGET, "client closed the connection");
                        return Ok(SessionEnd::Disconnected);
                    }
                    Err(error) => return Err(error.into()),
                };

                let message: IncomingMessage = match serde_json::from_slice(&payload) {
                    Ok(message) => message,
                    Err(error) => {
                        warn!(target: SERVER_TARGET, %error, "discarding malformed message");
                        let failure = JsonRpcError::new(PARSE_ERROR, error.to_string());
                        send(writer, &JsonRpcResponse::failure(Value::Null, failure))?;
                        continue;
                    }
                };

                match (message.id, message.method) {
                    (Some(id), Some(method)) => {
                        match self.route(id, &method, message.params, &mut shutdown_requested) {
                            Routed::Reply(response) => send(writer, &response)?,
                            Routed::Spawn(work) => {
                                scope.spawn(move || self.complete(work, writer));
                            }
                        }
                    }
                    (None, Some(method)) if method == "exit" => {
                        let end = if shutdown_requested {
                            SessionEnd::Clean
                        } else {
                            SessionEnd::ExitWithoutShutdown
                        };
                        info!(target: SERVER_TARGET, ?end, "exit requested");
                        return Ok(end);
                    }
                    (None, Some(method)) => {
                        if let Err(error) = self.synchronise(&method, message.params) {
                            warn!(target: SERVER_TARGET, method = method.as_str(), %error, "invalid notification parameters");
                        }
                    }
                    (_, None) => debug!(target: SERVER_TARGET, "ignoring response from client"),
                }
            }
        })
    }

    fn route(
        &self,
        id: Value,
        method: &str,
        params: Option<Value>,
        shutdown_requested: &mut bool,
    ) -> Routed {
        if *shutdown_requested {
            let error = JsonRpcError::new(
                INVALID_REQUEST,
                format!("'{method}' received after shutdown"),
            );
            return Routed::Reply(JsonRpcResponse::failure(id, error));
        }

        debug!(target: SERVER_TARGET, method, "received request");
        match method {
            "initialize" => Routed::Reply(reply(id, &self.initialize_result())),
            "shutdown" => {
                *shutdown_requested = true;
                Routed::Reply(JsonRpcResponse::success(id, Value::Null))
            }
            "textDocument/formatting" => match decode::<DocumentFormattingParams>(params) {
                Ok(request) => Routed::Spawn(Work::Format {
                    id,
                    uri: request.text_document.uri.as_str().to_owned(),
                }),
                Err(error) => Routed::Reply(invalid_params(id, &error)),
            },
            "textDocument/hover" => match decode::<HoverParams>(params) {
                Ok(request) => {
                    let target = request.text_document_position_params;
                    Routed::Spawn(Work::Hover {
                        id,
                        uri: target.text_document.uri.as_str().to_owned(),
                        position: target.position,
                    })
                }
                Err(error) => Routed::Reply(invalid_params(id, &error)),
            },
            _ => {
                let error = JsonRpcError::new(METHOD_NOT_FOUND, format!("method not found: {method}"));
                Routed::Reply(JsonRpcResponse::failure(id, error))
            }
        }
    }

    fn complete<O: Write>(&self, work: Work, writer: &Mutex<MessageWriter<O>>) {
        let response = match work {
            Work::Format { id, uri } => respond(id, self.dispatcher.format(&uri)),
            Work::Hover { id, uri, position } => respond(id, self.dispatcher.hover(&uri, position)),
        };
        if let Err(error) = send(writer, &response) {
            warn!(target: SERVER_TARGET, %error, "failed to deliver response");
        }
    }
}

fn decode<P: DeserializeOwned>(params: Option<Value>) -> Result<P, serde_json::Error> {
    serde_json::from_value(params.unwrap_or(Value::Null))
}

fn reply<T: Serialize>(id: Value, result: &T) -> JsonRpcResponse {
    match serde_json::to_value(result) {
        Ok(value) => JsonRpcResponse::success(id, value),
        Err(error) => JsonRpcResponse::failure(id, JsonRpcError::new(INTERNAL_ERROR, error.to_string())),
    }
}

fn respond<T: Serialize>(id: Value, outcome: Result<T, DispatchError>) -> JsonRpcResponse {
    match outcome {
        Ok(result) => reply(id, &result),
        Err(error) => {
            let code = if error.is_validation() {
                INVALID_PARAMS
            } else {
                REQUEST_FAILED
            };
            debug!(target: SERVER_TARGET, code, %error, "request failed");
            JsonRpcResponse::failure(id, JsonRpcError::new(code, error.to_string()))
        }
    }
}

fn invalid_params(id: Value, error: &serde_json::Error) -> JsonRpcResponse {
    JsonRpcResponse::failure(id, JsonRpcError::new(INVALID_PARAMS, format!("invalid params: {error}")))
}

fn send<O: Write>(
    writer: &Mutex<MessageWriter<O>>,
    response: &JsonRpcResponse,
) -> Result<(), ServerError> {
    let payload = serde_json::to_vec(response)?;
    writer
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .send(&payload)?;
    Ok(())
}
