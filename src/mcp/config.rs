//! Transport configuration
//!
//! The server speaks MCP either over its own stdin/stdout or over HTTP with
//! server-sent events. The SSE endpoints are `/sse` for the event stream and
//! `/message` for client posts.

use rmcp::transport::sse_server::SseServer;
use rmcp::ServiceExt;
use std::net::{Ipv4Addr, SocketAddr};
use tracing::info;

use super::CrawlServer;

/// Port used for the SSE transport when none is given
pub const DEFAULT_SSE_PORT: u16 = 8000;

/// How the server is reached
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportConfig {
    /// JSON-RPC frames over stdin/stdout
    Stdio,

    /// HTTP with server-sent events
    Sse {
        /// Address the HTTP listener binds to
        bind: SocketAddr,
    },
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self::Stdio
    }
}

impl TransportConfig {
    /// SSE on the loopback interface
    pub fn sse_on_port(port: u16) -> Self {
        Self::Sse {
            bind: SocketAddr::from((Ipv4Addr::LOCALHOST, port)),
        }
    }

    /// Serve `server` until the client disconnects (stdio) or the process
    /// receives Ctrl-C (SSE)
    pub async fn serve(&self, server: CrawlServer) -> anyhow::Result<()> {
        match self {
            TransportConfig::Stdio => {
                info!("Serving MCP over stdio");
                let service = server.serve(rmcp::transport::stdio()).await?;
                let reason = service.waiting().await?;
                info!("Session ended: {:?}", reason);
            }
            TransportConfig::Sse { bind } => {
                let cancel = SseServer::serve(*bind)
                    .await?
                    .with_service(move || server.clone());
                info!("Serving MCP over SSE at http://{}/sse", bind);

                tokio::signal::ctrl_c().await?;
                info!("Shutting down SSE server");
                cancel.cancel();
            }
        }
        Ok(())
    }
}
