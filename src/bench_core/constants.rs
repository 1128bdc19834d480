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

//! claimguard-bench Constants - Single source of truth for all configuration values.
//!
//! This module centralizes endpoint paths, CSV schemas, defaults and the
//! experiment plan so the drivers, the orchestrator and the aggregator agree.

/// Gateway HTTP contract
pub mod endpoints {
    /// Authorization check route, relative to the base URL
    pub const ACCESS_PATH: &str = "/access";
    /// Policy update route, relative to the base URL
    pub const POLICY_PATH: &str = "/policy";
    /// Status the gateway returns for a granted check or a confirmed update
    pub const STATUS_OK: u16 = 200;
    /// Status the gateway returns for a denied check
    pub const STATUS_FORBIDDEN: u16 = 403;
}

/// Defaults shared by the CLI and the orchestrator
pub mod defaults {
    pub const BASE_URL: &str = "http://localhost:4000/api";
    pub const SUBJECTS_PATH: &str = "./claimguard-peg/outputs/subjects.json";
    pub const RESOURCES_PATH: &str = "./claimguard-peg/outputs/resources.json";
    pub const ACTION: &str = "READ";

    pub const ACCESS_REQUESTS: usize = 1000;
    pub const ACCESS_CONCURRENCY: usize = 100;
    pub const ACCESS_TIMEOUT_SECS: u64 = 10;
    pub const ACCESS_OUTPUT: &str = "results.csv";

    pub const POLICY_COUNT: usize = 50;
    pub const POLICY_CONCURRENCY: usize = 1;
    pub const POLICY_TIMEOUT_SECS: u64 = 60;
    pub const POLICY_OUTPUT: &str = "policy_updates.csv";

    /// Orchestration root (holds `outputs/` and `experiment_results/`)
    pub const ROOT_DIR: &str = "claimguard-peg";
    pub const RESULTS_DIR: &str = "claimguard-peg/experiment_results";
    pub const FIGURES_DIR: &str = "claimguard-peg/figures";
    pub const POLICY_RESULTS_FILE: &str = "policy_updates_10.csv";

    pub const LOG_LEVEL: &str = "info";
    pub const LOG_FORMAT: &str = "text";
}

/// Policy update sampling domains (numeric values mirror the on-chain enums)
pub mod policy_space {
    /// INSURER, ADJUSTER, POLICE, COURT
    pub const ROLES: &[u8] = &[2, 4, 5, 6];
    /// GENERIC, MEDICAL_REPORT, IMAGE, VIDEO, TELEMATICS
    pub const RESOURCE_TYPES: &[u8] = &[0, 2, 5, 6, 8];
    /// READ, APPEND, UPDATE
    pub const ACTIONS: &[u8] = &[0, 1, 2];
    pub const MAX_SENSITIVITIES: &[u8] = &[2, 3, 4, 5];
    /// Wildcard bytes32 accepted by the gateway for org, jurisdiction and case
    pub const WILDCARD: &str = "0x0";
    /// Length of a bounded validity window (30 days)
    pub const VALIDITY_WINDOW_SECS: u64 = 30 * 24 * 60 * 60;
    /// Probability that a generated policy has an unbounded window
    pub const UNBOUNDED_WINDOW_PROBABILITY: f64 = 0.5;
}

/// Fixed CSV column schemas
pub mod columns {
    pub const ACCESS: [&str; 12] = [
        "worker",
        "start_time_iso",
        "latency_ms",
        "status",
        "allowed",
        "subject_address",
        "subject_role",
        "resource_id",
        "resource_type",
        "resource_sensitivity",
        "action",
        "error",
    ];

    pub const POLICY: [&str; 9] = [
        "worker",
        "index",
        "start_time_iso",
        "latency_ms",
        "status",
        "tx_hash",
        "gas_used",
        "block_number",
        "error",
    ];

    pub const LATENCY_SUMMARY: [&str; 6] = [
        "test",
        "requests",
        "concurrency",
        "P50_ms",
        "P90_ms",
        "P99_ms",
    ];

    pub const THROUGHPUT_SUMMARY: [&str; 2] = ["concurrency", "throughput_rps"];

    pub const POLICY_SUMMARY: [&str; 3] = ["avg_latency_ms", "avg_gas_used", "avg_block_number"];

    pub const CORRECTNESS_SUMMARY: [&str; 5] = [
        "total_decisions",
        "allowed",
        "denied",
        "allow_ratio",
        "deny_ratio",
    ];
}

/// Experiment plan driven by the `run` subcommand
pub mod plan {
    pub const LATENCY_REQUESTS: &[usize] = &[50, 100, 200, 500];
    pub const LATENCY_CONCURRENCY: usize = 10;

    pub const THROUGHPUT_TOTAL_REQUESTS: usize = 1000;
    pub const THROUGHPUT_CONCURRENCY: &[usize] = &[10, 50, 100, 200];

    pub const POLICY_UPDATE_COUNT: usize = 10;

    pub const LATENCY_FILE_PREFIX: &str = "latency_read_n";
    pub const THROUGHPUT_FILE_PREFIX: &str = "throughput_read_n";
}

/// Summary file names written by the aggregator
pub mod summaries {
    pub const LATENCY: &str = "latency_summary.csv";
    pub const THROUGHPUT: &str = "throughput_summary.csv";
    pub const POLICY: &str = "policy_update_summary.csv";
    pub const CORRECTNESS: &str = "correctness_summary.csv";
}

/// Configuration Environment Variables
pub mod config {
    pub const ENV_BASE_URL: &str = "CLAIMGUARD_BASE_URL";
    pub const ENV_ROOT_DIR: &str = "CLAIMGUARD_ROOT";
    pub const ENV_LOG_LEVEL: &str = "LOG_LEVEL";
    pub const ENV_LOG_FORMAT: &str = "LOG_FORMAT";
}
