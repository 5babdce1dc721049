//! Shared helpers for the HTTP integration tests.

#![allow(dead_code)]

use mimic_server::{MimicServer, ServerConfig};
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;

pub const TEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Start a server on ephemeral ports.
pub async fn start_server() -> MimicServer {
    start_server_with(ServerConfig::ephemeral()).await
}

pub async fn start_server_with(config: ServerConfig) -> MimicServer {
    MimicServer::start(&config)
        .await
        .expect("Failed to start mimic server")
}

pub fn client() -> Client {
    Client::builder().timeout(TEST_TIMEOUT).build().unwrap()
}

pub fn stub_url(server: &MimicServer, path: &str) -> String {
    format!("http://{}{}", server.stub_addr(), path)
}

pub fn admin_url(server: &MimicServer, path: &str) -> String {
    format!("http://{}/__admin{}", server.admin_addr(), path)
}

/// Register a mapping via the admin API and return the response body.
pub async fn register(client: &Client, server: &MimicServer, mapping: Value) -> Value {
    let response = client
        .post(admin_url(server, "/mappings/new"))
        .json(&mapping)
        .send()
        .await
        .expect("Failed to register mapping");

    assert_eq!(
        response.status(),
        201,
        "Failed to register mapping: {}",
        response.text().await.unwrap_or_default()
    );
    response.json().await.expect("Failed to parse response")
}
