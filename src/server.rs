use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing::{debug, info, warn};

use crate::config::ServerConfig;
use crate::handlers;
use crate::protocol::{JsonRpcError, JsonRpcRequest, JsonRpcResponse};

/// Maximum bytes per JSON-RPC message (1 MiB).
const MAX_MESSAGE_BYTES: usize = 1024 * 1024;

/// MCP server that communicates over stdio using newline-delimited JSON-RPC 2.0.
pub struct McpServer {
    config: ServerConfig,
    initialized: bool,
}

impl McpServer {
    pub fn new(config: ServerConfig) -> Self {
        Self {
            config,
            initialized: false,
        }
    }

    pub async fn run(&mut self) -> Result<(), Box<dyn std::error::Error>> {
        let mut stdout = tokio::io::stdout();
        let mut reader = BufReader::new(tokio::io::stdin());
        let mut raw = Vec::new();
        let mut served = 0u64;

        loop {
            raw.clear();
            if reader.read_until(b'\n', &mut raw).await? == 0 {
                info!(served, "stdin closed, shutting down");
                return Ok(());
            }

            if let Some(resp) = self.handle_line(&raw).await {
                served += 1;
                write_response(&mut stdout, &resp).await?;
            }
        }
    }

    /// One framed message in, at most one response out.
    async fn handle_line(&mut self, raw: &[u8]) -> Option<JsonRpcResponse> {
        if raw.len() > MAX_MESSAGE_BYTES {
            warn!(bytes = raw.len(), limit = MAX_MESSAGE_BYTES, "message too large");
            return Some(JsonRpcResponse::error(None, JsonRpcError::parse_error()));
        }

        let Ok(text) = std::str::from_utf8(raw) else {
            warn!(bytes = raw.len(), "message is not valid UTF-8");
            return Some(JsonRpcResponse::error(None, JsonRpcError::parse_error()));
        };
        let text = text.trim();
        if text.is_empty() {
            return None;
        }

        let req: JsonRpcRequest = match serde_json::from_str(text) {
            Ok(r) => r,
            Err(e) => {
                warn!(error = %e, "parse error");
                return Some(JsonRpcResponse::error(None, JsonRpcError::parse_error()));
            }
        };

        if req.jsonrpc != "2.0" {
            warn!(version = %req.jsonrpc, method = %req.method, "unsupported jsonrpc version");
            return Some(JsonRpcResponse::error(req.id, JsonRpcError::invalid_request()));
        }

        if let Some(rejected) = self.reject_before_initialize(&req) {
            return rejected;
        }

        debug!(method = %req.method, id = ?req.id, "dispatching");
        let resp = handlers::dispatch(&req, &self.config).await;

        if req.method == "initialize" && !self.initialized {
            self.initialized = true;
            let pom = self.config.pom_path();
            info!(pom = %pom.display(), "client initialized");
        }
        resp
    }

    /// Until `initialize` has been answered, calls get `Server not initialized`
    /// and notifications are dropped.
    fn reject_before_initialize(&self, req: &JsonRpcRequest) -> Option<Option<JsonRpcResponse>> {
        if self.initialized || req.method == "initialize" {
            return None;
        }
        debug!(method = %req.method, id = ?req.id, "request before initialize");
        Some(req.id.clone().map(|id| {
            JsonRpcResponse::error(
                Some(id),
                JsonRpcError::invalid_request_with("Server not initialized"),
            )
        }))
    }
}

async fn write_response(
    stdout: &mut tokio::io::Stdout,
    resp: &JsonRpcResponse,
) -> Result<(), Box<dyn std::error::Error>> {
    let out = serde_json::to_string(resp)?;
    stdout.write_all(out.as_bytes()).await?;
    stdout.write_all(b"\n").await?;
    stdout.flush().await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn server() -> McpServer {
        McpServer::new(ServerConfig::with_pom_path("missing/pom.xml"))
    }

    #[tokio::test]
    async fn test_calls_before_initialize_are_rejected() {
        let mut server = server();
        let resp = server
            .handle_line(br#"{"jsonrpc":"2.0","id":1,"method":"ping"}"#)
            .await
            .unwrap();
        let err = resp.error.unwrap();
        assert_eq!(err.code, -32600);
        assert_eq!(err.message, "Server not initialized");

        // notifications get no answer
        assert!(server
            .handle_line(br#"{"jsonrpc":"2.0","method":"tools/list"}"#)
            .await
            .is_none());
    }

    #[tokio::test]
    async fn test_initialize_opens_the_gate() {
        let mut server = server();
        let init = server
            .handle_line(br#"{"jsonrpc":"2.0","id":1,"method":"initialize","params":{}}"#)
            .await
            .unwrap();
        assert!(init.error.is_none());

        let ping = server
            .handle_line(b"{\"jsonrpc\":\"2.0\",\"id\":2,\"method\":\"ping\"}\r\n")
            .await
            .unwrap();
        assert_eq!(ping.id, Some(crate::protocol::RpcId::Number(2)));
        assert!(ping.result.is_some());
    }

    #[tokio::test]
    async fn test_framing_errors() {
        let mut server = server();
        assert!(server.handle_line(b"   \n").await.is_none());

        let garbage = server.handle_line(b"{not json}\n").await.unwrap();
        assert_eq!(garbage.error.unwrap().code, -32700);

        let invalid = server.handle_line(&[0xff, 0xfe, b'\n']).await.unwrap();
        assert_eq!(invalid.error.unwrap().code, -32700);

        let oversized = vec![b' '; MAX_MESSAGE_BYTES + 1];
        assert_eq!(server.handle_line(&oversized).await.unwrap().error.unwrap().code, -32700);

        let version = server
            .handle_line(br#"{"jsonrpc":"1.0","id":3,"method":"initialize"}"#)
            .await
            .unwrap();
        assert_eq!(version.error.unwrap().code, -32600);
        assert!(!server.initialized);
    }
}
