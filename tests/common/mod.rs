//! Shared utilities for integration testing.

use std::net::SocketAddr;
use std::time::Duration;

use address_gate::config::{parse_config, GateServiceConfig};
use address_gate::{GateServer, Shutdown};
use tokio::sync::mpsc;

/// A running gate service.
pub struct TestServer {
    pub addr: SocketAddr,
    pub shutdown: Shutdown,
    pub updates: mpsc::UnboundedSender<GateServiceConfig>,
}

impl TestServer {
    pub fn url(&self) -> String {
        format!("http://{}/", self.addr)
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.shutdown.trigger();
    }
}

/// Parse `gates` (TOML `[[gates]]` tables) and serve them on `addr`.
pub async fn start_gate_server(addr: SocketAddr, gates: &str) -> TestServer {
    let mut config = parse_config(gates).unwrap();
    config.listener.bind_address = addr.to_string();

    let shutdown = Shutdown::new();
    let (updates, config_updates) = mpsc::unbounded_channel();
    let server = GateServer::new(config);
    let listener = tokio::net::TcpListener::bind(addr).await.unwrap();
    let server_shutdown = shutdown.subscribe();

    tokio::spawn(async move {
        let _ = server.run(listener, config_updates, server_shutdown).await;
    });

    tokio::time::sleep(Duration::from_millis(100)).await;

    TestServer {
        addr,
        shutdown,
        updates,
    }
}

/// Client that never reuses connections or goes through a proxy.
pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .pool_max_idle_per_host(0)
        .no_proxy()
        .build()
        .unwrap()
}
