//! Stdio transport layer with LSP header framing.
//!
//! LSP uses a simple framing protocol over stdio:
//! ```text
//! Content-Length: <length>\r\n
//! \r\n
//! <payload>
//! ```

use std::io::{self, BufRead, Write};

use thiserror::Error;

/// Transport-layer errors.
#[derive(Debug, Error)]
pub enum TransportError {
    /// I/O error during read or write.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The peer closed the stream between messages.
    #[error("connection closed")]
    Closed,

    /// Missing Content-Length header.
    #[error("missing Content-Length header")]
    MissingContentLength,

    /// Invalid header format.
    #[error("invalid header format")]
    InvalidHeader,
}

/// Reads LSP-framed messages from a buffered reader.
#[derive(Debug)]
pub struct MessageReader<R> {
    reader: R,
}

impl<R: BufRead> MessageReader<R> {
    /// Wraps a buffered reader such as locked stdin.
    #[must_use]
    pub fn new(reader: R) -> Self {
        Self { reader }
    }

    /// Receives an LSP-framed message (blocks until complete).
    ///
    /// # Errors
    ///
    /// Returns `TransportError::Closed` on end of input before a header,
    /// `TransportError::MissingContentLength` if no Content-Length header is
    /// found, and `TransportError::Io` if reading fails.
    pub fn receive(&mut self) -> Result<Vec<u8>, TransportError> {
        let content_length = self.read_headers()?;
        let mut content = vec![0u8; content_length];
        self.reader.read_exact(&mut content)?;
        Ok(content)
    }

    /// Reads headers and extracts the Content-Length value.
    fn read_headers(&mut self) -> Result<usize, TransportError> {
        let mut content_length: Option<usize> = None;
        let mut started = false;

        loop {
            let mut line = String::new();
            let bytes_read = self.reader.read_line(&mut line)?;
            if bytes_read == 0 {
                if started {
                    return Err(TransportError::Io(io::Error::new(
                        io::ErrorKind::UnexpectedEof,
                        "connection closed while reading headers",
                    )));
                }
                return Err(TransportError::Closed);
            }
            started = true;

            let trimmed = line.trim();
            if trimmed.is_empty() {
                // Empty line marks end of headers
                break;
            }

            if let Some((name, value)) = trimmed.split_once(':')
                && name.trim().eq_ignore_ascii_case("content-length")
            {
                content_length = Some(
                    value
                        .trim()
                        .parse()
                        .map_err(|_| TransportError::InvalidHeader)?,
                );
            }
            // Ignore other headers (e.g., Content-Type)
        }

        content_length.ok_or(TransportError::MissingContentLength)
    }
}

/// Writes LSP-framed messages.
#[derive(Debug)]
pub struct MessageWriter<W> {
    writer: W,
}

impl<W: Write> MessageWriter<W> {
    /// Wraps a writer such as stdout.
    #[must_use]
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    /// Sends an LSP-framed message.
    ///
    /// # Errors
    ///
    /// Returns `TransportError::Io` if writing fails.
    pub fn send(&mut self, message: &[u8]) -> Result<(), TransportError> {
        let header = format!("Content-Length: {}\r\n\r\n", message.len());
        self.writer.write_all(header.as_bytes())?;
        self.writer.write_all(message)?;
        self.writer.flush()?;
        Ok(())
    }

    /// Returns the wrapped writer.
    pub fn into_inner(self) -> W {
        self.writer
    }
}
