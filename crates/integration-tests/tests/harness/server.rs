//! Test server wrapper that starts figurine on a random port

use std::net::SocketAddr;

use figurine_client::FigurineClient;
use figurine_config::Config;
use figurine_server::Server;
use tokio_util::sync::CancellationToken;

/// A running test server instance
pub struct TestServer {
    addr: SocketAddr,
    shutdown: CancellationToken,
    http: reqwest::Client,
}

impl TestServer {
    /// Start a test server with the given configuration
    ///
    /// Binds to port 0 for automatic port assignment
    pub async fn start(config: Config) -> anyhow::Result<Self> {
        let server = Server::new(&config)?;
        let shutdown = CancellationToken::new();
        let shutdown_clone = shutdown.clone();

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;

        tokio::spawn(async move {
            axum::serve(listener, server.into_router())
                .with_graceful_shutdown(async move {
                    shutdown_clone.cancelled().await;
                })
                .await
                .ok();
        });

        Ok(Self {
            addr,
            shutdown,
            http: reqwest::Client::new(),
        })
    }

    /// Full URL for `path` on the running test server
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{path}", self.addr)
    }

    /// Raw HTTP client for wire-level assertions
    pub fn http(&self) -> &reqwest::Client {
        &self.http
    }

    /// Typed client pointed at this server
    pub fn client(&self) -> FigurineClient {
        FigurineClient::new(&self.url("/")).expect("valid test server URL")
    }

    /// POST a JSON body to the generation endpoint
    pub async fn post_generate(&self, body: &serde_json::Value) -> (u16, serde_json::Value) {
        let response = self
            .http
            .post(self.url("/api/generate"))
            .json(body)
            .send()
            .await
            .expect("request reaches test server");

        let status = response.status().as_u16();
        let json = response.json().await.expect("JSON response body");
        (status, json)
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.shutdown.cancel();
    }
}
