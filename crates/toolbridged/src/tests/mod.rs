//! Session tests driving the server over in-memory streams.


use std::io::Cursor;

use serde_json::{Value, json};
use toolbridge_config::ConfigTable;
use toolbridge_core::{CommandRunner, Invocation, RunError};

use crate::server::{Server, SessionEnd};
use crate::transport::{MessageReader, TransportError};

pub(crate) const GO_URI: &str = "file:///workspace/main.go";

/// Runner that answers with the command line it was given followed by any
/// stdin, failing for commands that start with `fail`.
#[derive(Debug, Default)]
pub(crate) struct EchoRunner;

impl CommandRunner for EchoRunner {
    fn run(&self, invocation: &Invocation) -> Result<Vec<u8>, RunError> {
        let command = invocation.command_line();
        if command.starts_with("fail") {
            return Err(RunError::NonZeroExit {
                command: command.to_owned(),
                status: Some(2),
                output: String::from("tool failed"),
            });
        }
        let mut output = command.as_bytes().to_vec();
        output.extend_from_slice(invocation.stdin().unwrap_or_default());
        Ok(output)
    }
}

/// Frames raw payloads the way a client would send them.
pub(crate) fn frame_raw(payloads: &[&[u8]]) -> Vec<u8> {
    let mut framed = Vec::new();
    for payload in payloads {
        framed.extend_from_slice(format!("Content-Length: {}\r\n\r\n", payload.len()).as_bytes());
        framed.extend_from_slice(payload);
    }
    framed
}

pub(crate) fn frame(messages: &[Value]) -> Vec<u8> {
    let encoded: Vec<Vec<u8>> = messages
        .iter()
        .map(|message| serde_json::to_vec(message).expect("message should encode"))
        .collect();
    let payloads: Vec<&[u8]> = encoded.iter().map(Vec::as_slice).collect();
    frame_raw(&payloads)
}

/// Decodes every framed response the server wrote.
pub(crate) fn responses(output: Vec<u8>) -> Vec<Value> {
    let mut reader = MessageReader::new(Cursor::new(output));
    let mut decoded = Vec::new();
    loop {
        match reader.receive() {
            Ok(payload) => {
                decoded.push(serde_json::from_slice(&payload).expect("response should be JSON"));
            }
            Err(TransportError::Closed) => return decoded,
            Err(error) => panic!("malformed server output: {error}"),
        }
    }
}

/// Outcome of one scripted session.
pub(crate) struct Transcript {
    pub(crate) end: SessionEnd,
    pub(crate) responses: Vec<Value>,
    pub(crate) server: Server<EchoRunner>,
}

impl Transcript {
    pub(crate) fn response(&self, id: i64) -> &Value {
        self.responses
            .iter()
            .find(|response| response.get("id") == Some(&json!(id)))
            .unwrap_or_else(|| panic!("no response for request {id}: {:?}", self.responses))
    }

    pub(crate) fn result(&self, id: i64) -> &Value {
        let response = self.response(id);
        response
            .get("result")
            .unwrap_or_else(|| panic!("request {id} failed: {response}"))
    }

    pub(crate) fn error_code(&self, id: i64) -> i64 {
        let response = self.response(id);
        response
            .pointer("/error/code")
            .and_then(Value::as_i64)
            .unwrap_or_else(|| panic!("request {id} succeeded: {response}"))
    }
}

pub(crate) fn run_session_raw(table: ConfigTable, input: Vec<u8>) -> Transcript {
    let server = Server::new(table, EchoRunner);
    let mut output = Vec::new();
    let end = server
        .serve(Cursor::new(input), &mut output)
        .expect("session should complete");
    Transcript {
        end,
        responses: responses(output),
        server,
    }
}

pub(crate) fn run_session(table: ConfigTable, messages: &[Value]) -> Transcript {
    run_session_raw(table, frame(messages))
}

pub(crate) fn request(id: i64, method: &str, params: Value) -> Value {
    json!({"jsonrpc": "2.0", "id": id, "method": method, "params": params})
}

pub(crate) fn notification(method: &str, params: Value) -> Value {
    json!({"jsonrpc": "2.0", "method": method, "params": params})
}

pub(crate) fn did_open(text: &str) -> Value {
    notification(
        "textDocument/didOpen",
        json!({
            "textDocument": {"uri": GO_URI, "languageId": "go", "version": 1, "text": text}
        }),
    )
}

pub(crate) fn formatting(id: i64) -> Value {
    request(
        id,
        "textDocument/formatting",
        json!({
            "textDocument": {"uri": GO_URI},
            "options": {"tabSize": 4, "insertSpaces": true}
        }),
    )
}

pub(crate) fn hover(id: i64, line: u32, character: u32) -> Value {
    request(
        id,
        "textDocument/hover",
        json!({
            "textDocument": {"uri": GO_URI},
            "position": {"line": line, "character": character}
        }),
    )
}
