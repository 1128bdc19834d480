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

//! Policy-update benchmark.
//!
//! Each iteration sends a freshly synthesized policy to `POST /policy` and,
//! on success, keeps the transaction hash, gas used and block number for the
//! cost analysis.

use async_trait::async_trait;
use chrono::Utc;
use serde_json::Value;
use std::time::Instant;
use tracing::{debug, warn};

use crate::bench_core::constants::endpoints;
use crate::bench_core::models::{scalar_text, PolicyRecord, WorkToken};
use crate::driver::builder::RequestBuilder;
use crate::driver::client::GatewayClient;
use crate::driver::runner::Workload;
use crate::utils::time::{iso_timestamp, unix_now};

pub struct PolicyWorkload {
    client: GatewayClient,
    builder: RequestBuilder,
}

impl PolicyWorkload {
    pub fn new(client: GatewayClient, builder: RequestBuilder) -> Self {
        Self { client, builder }
    }
}

/// Response fields kept from a confirmed policy update.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PolicyReceipt {
    pub tx_hash: Option<String>,
    pub gas_used: Option<String>,
    pub block_number: Option<String>,
    pub error: Option<String>,
}

#[async_trait]
impl Workload for PolicyWorkload {
    type Record = PolicyRecord;

    fn name(&self) -> &'static str {
        "policy"
    }

    async fn execute(&self, worker: &str, token: WorkToken) -> PolicyRecord {
        let body = self.builder.policy_update(unix_now());

        let started_at = Utc::now();
        let start = Instant::now();
        let result = self.client.post_json(endpoints::POLICY_PATH, &body).await;
        let latency_ms = start.elapsed().as_secs_f64() * 1000.0;

        let (status, receipt) = match result {
            Ok(response) => (
                Some(response.status),
                extract_receipt(response.status, &response.body),
            ),
            Err(e) => (
                None,
                PolicyReceipt {
                    error: Some(e),
                    ..PolicyReceipt::default()
                },
            ),
        };

        if let Some(e) = &receipt.error {
            warn!(worker, index = token.index, status = ?status, latency_ms, error = %e, "Policy update failed");
        } else {
            debug!(worker, index = token.index, latency_ms, tx_hash = ?receipt.tx_hash, "Policy update confirmed");
        }

        PolicyRecord {
            worker: worker.to_string(),
            index: token.index,
            start_time_iso: iso_timestamp(started_at),
            latency_ms,
            status,
            tx_hash: receipt.tx_hash,
            gas_used: receipt.gas_used,
            block_number: receipt.block_number,
            error: receipt.error,
        }
    }
}

/// Pull the receipt fields out of a `/policy` response. Only a 200 carries
/// them; anything else becomes an error description with the raw body.
pub fn extract_receipt(status: u16, body: &str) -> PolicyReceipt {
    if status != endpoints::STATUS_OK {
        return PolicyReceipt {
            error: Some(format!("Unexpected status {}, body={}", status, body.trim())),
            ..PolicyReceipt::default()
        };
    }

    match serde_json::from_str::<Value>(body) {
        Ok(Value::Object(map)) => {
            let field = |key: &str| map.get(key).and_then(scalar_text);
            PolicyReceipt {
                tx_hash: field("txHash"),
                gas_used: field("gasUsed"),
                block_number: field("blockNumber"),
                error: None,
            }
        }
        Ok(_) => PolicyReceipt {
            error: Some("Response body is not a JSON object".to_string()),
            ..PolicyReceipt::default()
        },
        Err(e) => PolicyReceipt {
            error: Some(format!("Failed to parse response body: {}", e)),
            ..PolicyReceipt::default()
        },
    }
}
