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

//! Domain models for the benchmark harness.
//!
//! This module contains the reference data loaded before a run, the request
//! bodies sent to the gateway, and the per-request records collected during
//! a run. It is free of I/O side effects.

use serde::{Deserialize, Serialize, Serializer};
use serde_json::Value;

/// A requesting principal, as exported by the gateway seeding tool.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Subject {
    pub address: String,
    #[serde(default)]
    pub role: Value,
}

/// A protected resource, as exported by the gateway seeding tool.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Resource {
    #[serde(rename = "resourceId")]
    pub resource_id: Value,
    #[serde(rename = "rType", default)]
    pub r_type: Value,
    #[serde(default)]
    pub sensitivity: Value,
}

/// Body of `POST /access`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AccessRequestBody {
    pub subject: String,
    #[serde(rename = "resourceId")]
    pub resource_id: Value,
    pub action: String,
}

/// Body of `POST /policy`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PolicyUpdateBody {
    pub role: u8,
    pub org_id: String,
    pub jurisdiction: String,
    pub r_type: u8,
    pub case_id: String,
    pub action: u8,
    pub max_sensitivity: u8,
    pub not_before: u64,
    pub not_after: u64,
    pub allow: bool,
}

impl PolicyUpdateBody {
    /// True when both validity bounds are zero.
    pub fn is_unbounded(&self) -> bool {
        self.not_before == 0 && self.not_after == 0
    }
}

/// Outcome of one authorization check.
///
/// `Unknown` is distinct from `Denied`: it covers transport failures,
/// unparseable bodies and statuses other than 200/403.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Decision {
    Allowed,
    Denied,
    Unknown,
}

impl Decision {
    pub fn from_allowed(allowed: bool) -> Self {
        if allowed {
            Decision::Allowed
        } else {
            Decision::Denied
        }
    }

    /// CSV cell text: `True`, `False`, or empty.
    pub fn as_cell(&self) -> &'static str {
        match self {
            Decision::Allowed => "True",
            Decision::Denied => "False",
            Decision::Unknown => "",
        }
    }

    /// Parse a CSV cell back into a decision. Anything unrecognized is `Unknown`.
    pub fn from_cell(cell: &str) -> Self {
        match cell.trim().to_ascii_lowercase().as_str() {
            "true" | "1" => Decision::Allowed,
            "false" | "0" => Decision::Denied,
            _ => Decision::Unknown,
        }
    }
}

impl Serialize for Decision {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_cell())
    }
}

/// One unit of work handed out by the queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct WorkToken {
    pub index: usize,
}

/// One row of the access benchmark CSV.
///
/// Field order is the CSV column order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AccessRecord {
    pub worker: String,
    pub start_time_iso: String,
    #[serde(serialize_with = "serialize_latency")]
    pub latency_ms: f64,
    pub status: Option<u16>,
    pub allowed: Decision,
    pub subject_address: String,
    pub subject_role: Option<String>,
    pub resource_id: Option<String>,
    pub resource_type: Option<String>,
    pub resource_sensitivity: Option<String>,
    pub action: String,
    pub error: Option<String>,
}

/// One row of the policy benchmark CSV.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PolicyRecord {
    pub worker: String,
    pub index: usize,
    pub start_time_iso: String,
    #[serde(serialize_with = "serialize_latency")]
    pub latency_ms: f64,
    pub status: Option<u16>,
    pub tx_hash: Option<String>,
    pub gas_used: Option<String>,
    pub block_number: Option<String>,
    pub error: Option<String>,
}

/// Latencies are written with three decimals.
pub fn format_latency(ms: f64) -> String {
    format!("{:.3}", ms)
}

fn serialize_latency<S: Serializer>(ms: &f64, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&format_latency(*ms))
}

/// Render a JSON scalar as plain CSV text. Strings lose their quotes and
/// `null` becomes an empty cell.
pub fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}
