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

//! Access-check benchmark.
//!
//! Each iteration samples a (subject, resource, action) triple, sends it to
//! `POST /access` and records the gateway's decision.

use async_trait::async_trait;
use chrono::Utc;
use serde_json::Value;
use std::time::Instant;
use tracing::{debug, warn};

use crate::bench_core::constants::endpoints;
use crate::bench_core::errors::BenchError;
use crate::bench_core::models::{scalar_text, AccessRecord, Decision, WorkToken};
use crate::bench_core::reference::ReferenceData;
use crate::driver::builder::RequestBuilder;
use crate::driver::client::GatewayClient;
use crate::driver::runner::Workload;
use crate::utils::time::iso_timestamp;

pub struct AccessWorkload {
    client: GatewayClient,
    reference: ReferenceData,
    actions: Vec<String>,
    builder: RequestBuilder,
}

impl AccessWorkload {
    pub fn new(
        client: GatewayClient,
        reference: ReferenceData,
        actions: Vec<String>,
        builder: RequestBuilder,
    ) -> Result<Self, BenchError> {
        if actions.is_empty() {
            return Err(BenchError::ConfigurationError(
                "at least one action is required".to_string(),
            ));
        }
        Ok(Self {
            client,
            reference,
            actions,
            builder,
        })
    }
}

#[async_trait]
impl Workload for AccessWorkload {
    type Record = AccessRecord;

    fn name(&self) -> &'static str {
        "access"
    }

    async fn execute(&self, worker: &str, _token: WorkToken) -> AccessRecord {
        let Some(sample) = self.builder.access_sample(
            &self.reference.subjects,
            &self.reference.resources,
            &self.actions,
        ) else {
            // ReferenceData::new and AccessWorkload::new rule this out
            return AccessRecord {
                worker: worker.to_string(),
                start_time_iso: iso_timestamp(Utc::now()),
                latency_ms: 0.0,
                status: None,
                allowed: Decision::Unknown,
                subject_address: String::new(),
                subject_role: None,
                resource_id: None,
                resource_type: None,
                resource_sensitivity: None,
                action: String::new(),
                error: Some("Empty sampling domain".to_string()),
            };
        };
        let body = sample.body();

        let started_at = Utc::now();
        let start = Instant::now();
        let result = self.client.post_json(endpoints::ACCESS_PATH, &body).await;
        let latency_ms = start.elapsed().as_secs_f64() * 1000.0;

        let (status, allowed, error) = match result {
            Ok(response) => {
                let (decision, error) = classify_access(response.status, &response.body);
                (Some(response.status), decision, error)
            }
            Err(e) => (None, Decision::Unknown, Some(e)),
        };

        if let Some(e) = &error {
            warn!(worker, status = ?status, latency_ms, error = %e, "Access check failed");
        } else {
            debug!(worker, status = ?status, latency_ms, allowed = allowed.as_cell(), "Access check");
        }

        AccessRecord {
            worker: worker.to_string(),
            start_time_iso: iso_timestamp(started_at),
            latency_ms,
            status,
            allowed,
            subject_address: sample.subject.address.clone(),
            subject_role: scalar_text(&sample.subject.role),
            resource_id: scalar_text(&sample.resource.resource_id),
            resource_type: scalar_text(&sample.resource.r_type),
            resource_sensitivity: scalar_text(&sample.resource.sensitivity),
            action: sample.action.to_string(),
            error,
        }
    }
}

/// Classify a completed `/access` exchange.
///
/// - 200 with a JSON object carrying a boolean `allowed` uses that boolean;
/// - 403 is a denial whatever the body says;
/// - every other status, and a 200 without a usable body, is `Unknown`.
pub fn classify_access(status: u16, body: &str) -> (Decision, Option<String>) {
    match status {
        endpoints::STATUS_OK => match serde_json::from_str::<Value>(body) {
            Ok(Value::Object(map)) => match map.get("allowed") {
                Some(Value::Bool(allowed)) => (Decision::from_allowed(*allowed), None),
                _ => (
                    Decision::Unknown,
                    Some("Response body has no boolean 'allowed' field".to_string()),
                ),
            },
            Ok(_) => (
                Decision::Unknown,
                Some("Response body is not a JSON object".to_string()),
            ),
            Err(e) => (
                Decision::Unknown,
                Some(format!("Failed to parse response body: {}", e)),
            ),
        },
        endpoints::STATUS_FORBIDDEN => (Decision::Denied, None),
        other => (Decision::Unknown, Some(format!("Unexpected status {}", other))),
    }
}
