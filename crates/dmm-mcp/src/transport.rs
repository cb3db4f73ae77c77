//! Line-delimited JSON transport over stdin/stdout.
//!
//! Each JSON-RPC message is a single line terminated by `\n`. Only protocol
//! frames are written here; logs go to stderr.

use crate::error::McpError;
use crate::protocol::JsonRpcResponse;
use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncWrite, AsyncWriteExt, BufReader, Lines};

/// Reads JSON-RPC messages from a reader, writes responses to a writer.
///
/// Generic over reader/writer so tests can drive it with in-memory pipes.
pub struct StdioTransport<R, W> {
    lines: Lines<BufReader<R>>,
    writer: W,
}

impl StdioTransport<tokio::io::Stdin, tokio::io::Stdout> {
    /// Transport over the process's stdin and stdout.
    pub fn stdio() -> Self {
        Self::new(tokio::io::stdin(), tokio::io::stdout())
    }
}

impl<R, W> StdioTransport<R, W>
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin,
{
    /// Creates a new transport with the given reader and writer.
    pub fn new(reader: R, writer: W) -> Self {
        Self {
            lines: BufReader::new(reader).lines(),
            writer,
        }
    }

    /// Reads the next line, trimmed. Returns `None` on EOF.
    ///
    /// Cancel safe: a line is never lost if this future is dropped before it
    /// completes.
    pub async fn read_line(&mut self) -> Result<Option<String>, McpError> {
        let Some(line) = self.lines.next_line().await? else {
            return Ok(None);
        };
        let trimmed = line.trim();
        tracing::trace!(len = trimmed.len(), "read message");
        Ok(Some(trimmed.to_string()))
    }

    /// Writes one line and flushes.
    pub async fn write_line(&mut self, message: &str) -> Result<(), McpError> {
        tracing::trace!(len = message.len(), "writing message");
        self.writer.write_all(message.as_bytes()).await?;
        self.writer.write_all(b"\n").await?;
        self.writer.flush().await?;
        Ok(())
    }

    /// Serializes a response onto a single line.
    pub async fn write_response(&mut self, response: &JsonRpcResponse) -> Result<(), McpError> {
        let json = serde_json::to_string(response)?;
        self.write_line(&json).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn read_single_line() {
        let input = b"{\"jsonrpc\":\"2.0\"}\n";
        let mut transport = StdioTransport::new(&input[..], Vec::new());

        let line = transport.read_line().await.expect("read");
        assert_eq!(line, Some("{\"jsonrpc\":\"2.0\"}".to_string()));
    }

    #[tokio::test]
    async fn read_eof_returns_none() {
        let mut transport = StdioTransport::new(&b""[..], Vec::new());

        let line = transport.read_line().await.expect("read");
        assert_eq!(line, None);
    }

    #[tokio::test]
    async fn read_trims_and_keeps_blank_lines() {
        let input = b"  one \r\n\nlast-without-newline";
        let mut transport = StdioTransport::new(&input[..], Vec::new());

        assert_eq!(transport.read_line().await.unwrap(), Some("one".into()));
        assert_eq!(transport.read_line().await.unwrap(), Some(String::new()));
        assert_eq!(
            transport.read_line().await.unwrap(),
            Some("last-without-newline".into())
        );
        assert_eq!(transport.read_line().await.unwrap(), None);
    }

    #[tokio::test]
    async fn write_response_is_one_line() {
        let mut transport = StdioTransport::new(&b""[..], Vec::new());
        let response = JsonRpcResponse::success(Some(json!(1)), json!({"text": "a\nb"}));

        transport.write_response(&response).await.expect("write");

        let output = String::from_utf8(transport.writer.clone()).expect("utf8");
        assert!(output.ends_with('\n'));
        assert_eq!(output.matches('\n').count(), 1);
        let parsed: serde_json::Value = serde_json::from_str(output.trim_end()).unwrap();
        assert_eq!(parsed["result"]["text"], json!("a\nb"));
    }
}
