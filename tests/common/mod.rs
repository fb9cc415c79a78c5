//! Shared utilities for integration testing.

use std::net::SocketAddr;

use crypto_server::config::ServerConfig;
use crypto_server::http::HttpServer;

/// Start the service on an ephemeral loopback port, returning its address.
/// The listener is bound before the task is spawned, so requests can be
/// issued immediately.
pub async fn spawn_server(config: ServerConfig) -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let server = HttpServer::new(config).expect("server construction failed");
    tokio::spawn(async move {
        let _ = server.run(listener).await;
    });

    addr
}

/// A config that admits the loopback client the tests connect from.
pub fn loopback_config() -> ServerConfig {
    let mut config = ServerConfig::default();
    config.access.allowed_ips = vec!["127.0.0.1".to_string()];
    config
}
