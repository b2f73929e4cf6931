#![allow(dead_code)]

use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use reqwest::{Response, StatusCode};
use serde_json::{json, Value};

use apitest_server::auth::CredentialVerifier;
use apitest_server::config::SecurityConfig;
use apitest_server::database::MemoryStore;
use apitest_server::AppState;

pub const TEST_SECRET: &str = "integration-test-secret";

pub struct TestServer {
    pub port: u16,
    pub base_url: String,
    pub client: reqwest::Client,
}

impl TestServer {
    /// Serve the real router over an in-memory store on a free port
    pub async fn spawn() -> Result<Self> {
        let port = portpicker::pick_unused_port().context("failed to pick free port")?;
        let base_url = format!("http://127.0.0.1:{}", port);

        let verifier = CredentialVerifier::new(TEST_SECRET)?;
        let state = AppState::new(Arc::new(MemoryStore::new()), verifier);
        let app = apitest_server::app(state, &SecurityConfig::default());

        let listener = tokio::net::TcpListener::bind(("127.0.0.1", port))
            .await
            .context("failed to bind test port")?;
        tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });

        let server = Self {
            port,
            base_url,
            client: reqwest::Client::new(),
        };
        server.wait_ready(Duration::from_secs(5)).await?;
        Ok(server)
    }

    async fn wait_ready(&self, timeout: Duration) -> Result<()> {
        let deadline = Instant::now() + timeout;
        loop {
            if Instant::now() > deadline {
                break;
            }
            if let Ok(resp) = self.client.get(self.url("/ping")).send().await {
                if resp.status() == StatusCode::OK {
                    return Ok(());
                }
            }
            tokio::time::sleep(Duration::from_millis(50)).await;
        }
        anyhow::bail!("server did not become ready on {} within {:?}", self.base_url, timeout)
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub async fn register(&self, id: &str, password: &str) -> Result<Response> {
        Ok(self
            .client
            .post(self.url("/user"))
            .json(&json!({ "id": id, "name": id, "password": password }))
            .send()
            .await?)
    }

    pub async fn login(&self, id: &str, password: &str) -> Result<Response> {
        Ok(self
            .client
            .post(self.url("/login"))
            .json(&json!({ "id": id, "password": password }))
            .send()
            .await?)
    }

    /// Register and log in, returning the session token
    pub async fn sign_up(&self, id: &str, password: &str) -> Result<String> {
        let res = self.register(id, password).await?;
        anyhow::ensure!(res.status() == StatusCode::OK, "register failed: {}", res.status());
        let res = self.login(id, password).await?;
        anyhow::ensure!(res.status() == StatusCode::OK, "login failed: {}", res.status());
        let body = res.json::<Value>().await?;
        body["token"]
            .as_str()
            .map(str::to_string)
            .context("login response has no token")
    }

    pub async fn create_folder(&self, token: &str, name: &str) -> Result<Value> {
        let res = self
            .client
            .post(self.url("/folder"))
            .header("Authorization", token)
            .query(&[("name", name)])
            .send()
            .await?;
        anyhow::ensure!(res.status() == StatusCode::OK, "create folder failed: {}", res.status());
        Ok(res.json().await?)
    }

    pub async fn create_request(&self, token: &str, folder_id: i64, body: Value) -> Result<Response> {
        let mut body = body;
        body["folderId"] = json!(folder_id);
        Ok(self
            .client
            .post(self.url("/request"))
            .header("Authorization", token)
            .json(&body)
            .send()
            .await?)
    }

    pub async fn get_request(&self, token: &str, request_id: i64) -> Result<Response> {
        Ok(self
            .client
            .get(self.url("/request"))
            .header("Authorization", token)
            .query(&[("requestId", request_id)])
            .send()
            .await?)
    }
}

/// A request body with two parameters
pub fn ping_request() -> Value {
    json!({
        "name": "ping",
        "url": "example.com",
        "protocolHeader": "http",
        "method": "GET",
        "parameters": [
            { "kind": "header", "key": "Accept", "value": "application/json" },
            { "kind": "query", "key": "q", "value": "1" }
        ]
    })
}
