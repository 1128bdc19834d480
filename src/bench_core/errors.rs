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

// Harness error types. Per-request failures never use these: they are
// captured as data on the request record instead.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for the harness
#[derive(Error, Debug)]
pub enum BenchError {
    /// Reference data file could not be read
    #[error("Failed to read {kind} file {}: {source}", path.display())]
    ReferenceDataIo {
        kind: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Reference data file is not a JSON array of the expected shape
    #[error("Failed to parse {kind} file {}: {source}", path.display())]
    ReferenceDataParse {
        kind: &'static str,
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// Reference data file parsed but holds no entries
    #[error("No {0} loaded")]
    EmptyReferenceData(&'static str),

    /// Rejected configuration value (zero concurrency, empty action list, ...)
    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    /// HTTP client could not be constructed
    #[error("HTTP client error: {0}")]
    HttpClient(#[from] reqwest::Error),

    /// CSV encoding or decoding error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Expected column absent from an input CSV
    #[error("Column '{column}' missing from {}", path.display())]
    MissingColumn { column: String, path: PathBuf },

    /// I/O Error
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// Orchestrated subprocess exited unsuccessfully
    #[error("Command failed with code {code}: {command}")]
    SubprocessFailed { command: String, code: i32 },
}

impl BenchError {
    /// Process exit code to report for this error.
    ///
    /// A failed orchestration step propagates the child's own code.
    pub fn exit_code(&self) -> i32 {
        match self {
            BenchError::SubprocessFailed { code, .. } if *code != 0 => *code,
            _ => 1,
        }
    }
}
