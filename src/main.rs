use pom_mcp_server::config::ServerConfig;
use pom_mcp_server::server::McpServer;
use tracing::{error, info};

#[tokio::main(flavor = "current_thread")]
async fn main() {
    // stdout carries the protocol
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let config = match std::env::args_os().nth(1) {
        Some(path) => ServerConfig::with_pom_path(path),
        None => ServerConfig::from_env(),
    };
    info!(pom = %config.pom_path().display(), "pom-mcp-server starting");

    let mut server = McpServer::new(config);
    if let Err(e) = server.run().await {
        error!(error = %e, "fatal error");
        std::process::exit(1);
    }
}
