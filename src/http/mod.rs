//! Outbound HTTP for the tools
//!
//! Every tool talks to the network through the [`Fetcher`] trait so the
//! lookups can run against a mock in tests. [`HttpClient`] is the reqwest
//! implementation used by the CLI and the TUI worker.

use crate::config::Config;
use crate::error::{Result, ToolsError};
use async_trait::async_trait;
use reqwest::Client;
use reqwest::header::{ACCEPT, HeaderMap, HeaderValue};

/// Accepted by both JSON DNS-over-HTTPS dialects and plain JSON endpoints
const ACCEPT_JSON: &str = "application/dns-json, application/json;q=0.9";

/// Unauthenticated JSON GET
#[async_trait]
pub trait Fetcher: Send + Sync {
    async fn get_json(&self, url: &str, query: &[(&str, &str)]) -> Result<serde_json::Value>;
}

/// reqwest-backed fetcher. No retries; failures go straight back to the tool.
#[derive(Clone, Debug)]
pub struct HttpClient {
    client: Client,
}

impl HttpClient {
    pub fn new() -> Result<Self> {
        Self::from_config(&Config::default())
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static(ACCEPT_JSON));

        let mut builder = Client::builder()
            .user_agent(concat!("m365tools/", env!("CARGO_PKG_VERSION")))
            .default_headers(headers);

        if let Some(timeout) = config.request_timeout() {
            builder = builder.timeout(timeout);
        }

        let client = builder
            .build()
            .map_err(|e| ToolsError::ConfigError(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self { client })
    }
}

#[async_trait]
impl Fetcher for HttpClient {
    async fn get_json(&self, url: &str, query: &[(&str, &str)]) -> Result<serde_json::Value> {
        tracing::debug!(url, ?query, "GET");

        let resp = self.client.get(url).query(query).send().await?;
        let status = resp.status();

        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            tracing::debug!(
                url,
                "{}",
                crate::error::describe_http_failure(status.as_u16(), &body)
            );
            return Err(ToolsError::HttpStatus {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        let data = resp.json::<serde_json::Value>().await?;
        Ok(data)
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Mutex;

    /// Canned responses keyed by `url?k=v&k=v`
    #[derive(Default)]
    pub struct StubFetcher {
        responses: HashMap<String, std::result::Result<serde_json::Value, String>>,
        pub calls: Mutex<Vec<String>>,
    }

    impl StubFetcher {
        pub fn new() -> Self {
            Self::default()
        }

        fn key(url: &str, query: &[(&str, &str)]) -> String {
            let params: Vec<String> = query.iter().map(|(k, v)| format!("{}={}", k, v)).collect();
            if params.is_empty() {
                url.to_string()
            } else {
                format!("{}?{}", url, params.join("&"))
            }
        }

        pub fn ok(mut self, key: &str, body: serde_json::Value) -> Self {
            self.responses.insert(key.to_string(), Ok(body));
            self
        }

        pub fn fail(mut self, key: &str, reason: &str) -> Self {
            self.responses.insert(key.to_string(), Err(reason.to_string()));
            self
        }

        pub fn call_count(&self) -> usize {
            self.calls.lock().map(|c| c.len()).unwrap_or(0)
        }
    }

    #[async_trait]
    impl Fetcher for StubFetcher {
        async fn get_json(&self, url: &str, query: &[(&str, &str)]) -> Result<serde_json::Value> {
            let key = Self::key(url, query);
            if let Ok(mut calls) = self.calls.lock() {
                calls.push(key.clone());
            }
            match self.responses.get(&key) {
                Some(Ok(body)) => Ok(body.clone()),
                Some(Err(reason)) => Err(ToolsError::ToolFailed(reason.clone())),
                None => Err(ToolsError::HttpStatus {
                    status: 404,
                    url: key,
                }),
            }
        }
    }
}
