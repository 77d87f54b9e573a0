//! Shared utilities for integration tests.

use std::net::SocketAddr;
use std::time::Duration;

use domain_culture::config::{AppConfig, DomainSettings};
use domain_culture::{HttpServer, Shutdown};
use tokio::net::TcpListener;
use tokio::sync::mpsc;

/// The whitelist used across tests: `com` (default, en-US) and `commx` (es-MX).
pub fn test_config() -> AppConfig {
    let mut config = AppConfig::default();
    config.listener.bind_address = "127.0.0.1:0".into();
    config.culture.default = "com".into();
    config.culture.white_list.insert(
        "com".into(),
        DomainSettings::new(
            ["en-AU", "en-GB", "en-IE", "en-US", "es-MX", "fr-CA"],
            "en-US",
        ),
    );
    config
        .culture
        .white_list
        .insert("commx".into(), DomainSettings::new(["es-MX", "en-US"], "es-MX"));
    config
}

/// A server running on an ephemeral port.
pub struct TestServer {
    pub addr: SocketAddr,
    pub config_updates: mpsc::UnboundedSender<AppConfig>,
    pub shutdown: Shutdown,
    pub handle: tokio::task::JoinHandle<Result<(), std::io::Error>>,
}

impl TestServer {
    pub fn url(&self, path_and_query: &str) -> String {
        format!("http://{}{}", self.addr, path_and_query)
    }
}

/// Start the server with `config` and wait until it accepts connections.
pub async fn start_server(config: AppConfig) -> TestServer {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let server = HttpServer::new(config).unwrap();
    let shutdown = Shutdown::new();
    let (config_updates, updates_rx) = mpsc::unbounded_channel();
    let server_shutdown = shutdown.subscribe();

    let handle = tokio::spawn(async move { server.run(listener, updates_rx, server_shutdown).await });

    for _ in 0..50 {
        if tokio::net::TcpStream::connect(addr).await.is_ok() {
            break;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }

    TestServer {
        addr,
        config_updates,
        shutdown,
        handle,
    }
}

pub fn client() -> reqwest::Client {
    reqwest::Client::builder().no_proxy().build().unwrap()
}
