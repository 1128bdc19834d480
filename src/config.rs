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

use crate::bench_core::constants::{config as keys, defaults};
use crate::bench_core::errors::BenchError;
use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub base_url: String,
    pub root_dir: PathBuf,
    pub log_level: String,
    pub log_format: String, // "json" or "text"
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build a config from any key lookup. Unset keys take their defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        Self {
            base_url: lookup(keys::ENV_BASE_URL).unwrap_or_else(|| defaults::BASE_URL.to_string()),
            root_dir: lookup(keys::ENV_ROOT_DIR)
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(defaults::ROOT_DIR)),
            log_level: lookup(keys::ENV_LOG_LEVEL)
                .unwrap_or_else(|| defaults::LOG_LEVEL.to_string()),
            log_format: lookup(keys::ENV_LOG_FORMAT)
                .map(|f| f.to_lowercase())
                .unwrap_or_else(|| defaults::LOG_FORMAT.to_string()),
        }
    }

    /// Reset each invalid field to its default and report what was replaced.
    /// Valid fields are left untouched.
    pub fn repair(&mut self) -> Vec<BenchError> {
        let defaults = Self::default();
        let mut rejected = Vec::new();
        if self.base_url.trim().is_empty() {
            rejected.push(BenchError::ConfigurationError(format!(
                "{} must not be empty",
                keys::ENV_BASE_URL
            )));
            self.base_url = defaults.base_url;
        }
        if !matches!(self.log_format.as_str(), "json" | "text") {
            rejected.push(BenchError::ConfigurationError(format!(
                "Unsupported log format '{}' (expected json or text)",
                self.log_format
            )));
            self.log_format = defaults.log_format;
        }
        rejected
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: defaults::BASE_URL.to_string(),
            root_dir: PathBuf::from(defaults::ROOT_DIR),
            log_level: defaults::LOG_LEVEL.to_string(),
            log_format: defaults::LOG_FORMAT.to_string(),
        }
    }
}
