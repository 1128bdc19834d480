// Copyright 2026 BadCompany
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! HTTP client for the gateway under test.
//!
//! One `GatewayClient` (and therefore one connection pool) is shared by every
//! worker of a run. Transport failures are returned as plain strings because
//! they end up as the `error` cell of a record, never as a run failure.

use reqwest::Client;
use serde::Serialize;
use std::time::Duration;
use tracing::debug;

use crate::bench_core::errors::BenchError;

/// Status and fully read body of one exchange.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GatewayResponse {
    pub status: u16,
    pub body: String,
}

#[derive(Debug, Clone)]
pub struct GatewayClient {
    http_client: Client,
    base_url: String,
    timeout: Duration,
}

impl GatewayClient {
    /// Create a client with a per-request ceiling of `timeout_secs`.
    ///
    /// The ceiling covers connect, send and reading the whole body.
    pub fn new(base_url: &str, timeout_secs: u64) -> Result<Self, BenchError> {
        let timeout = Duration::from_secs(timeout_secs);

        let http_client = Client::builder()
            .timeout(timeout)
            .tcp_nodelay(true)
            .pool_idle_timeout(Duration::from_secs(90))
            .build()?;

        Ok(Self {
            http_client,
            base_url: normalize_base_url(base_url),
            timeout,
        })
    }

    pub fn url_for(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// POST a JSON body and read the full response.
    pub async fn post_json<B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<GatewayResponse, String> {
        let url = self.url_for(path);

        let response = self
            .http_client
            .post(&url)
            .json(body)
            .send()
            .await
            .map_err(|e| self.describe_error(&e))?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| self.describe_error(&e))?;

        debug!(url = %url, status, bytes = body.len(), "Gateway responded");
        Ok(GatewayResponse { status, body })
    }

    fn describe_error(&self, e: &reqwest::Error) -> String {
        if e.is_timeout() {
            format!("Request timeout after {}s", self.timeout.as_secs())
        } else if e.is_connect() {
            format!("Connection failed: {}", e)
        } else {
            format!("HTTP request failed: {}", e)
        }
    }
}

/// Strip trailing slashes so paths can be appended verbatim.
pub fn normalize_base_url(base_url: &str) -> String {
    base_url.trim_end_matches('/').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_base_url() {
        assert_eq!(
            normalize_base_url("http://localhost:4000/api/"),
            "http://localhost:4000/api"
        );
        assert_eq!(
            normalize_base_url("http://localhost:4000/api"),
            "http://localhost:4000/api"
        );
    }

    #[test]
    fn test_client_creation() {
        let client = GatewayClient::new("http://127.0.0.1:4000/api/", 5).unwrap();
        assert_eq!(client.url_for("/access"), "http://127.0.0.1:4000/api/access");
    }

    #[tokio::test]
    async fn test_unreachable_target_is_described() {
        // Port 9 (discard) is essentially never listening on loopback
        let client = GatewayClient::new("http://127.0.0.1:9", 2).unwrap();
        let err = client
            .post_json("/access", &serde_json::json!({}))
            .await
            .unwrap_err();
        assert!(!err.is_empty());
    }
}
