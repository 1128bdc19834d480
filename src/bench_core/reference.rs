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

//! Reference data loading.
//!
//! Subjects and resources are read once before a run and never change
//! afterwards. Missing, malformed or empty files are fatal.

use serde::de::DeserializeOwned;
use std::path::Path;
use tracing::info;

use crate::bench_core::errors::BenchError;
use crate::bench_core::models::{Resource, Subject};

/// Immutable lookup tables shared by every access worker.
#[derive(Debug, Clone)]
pub struct ReferenceData {
    pub subjects: Vec<Subject>,
    pub resources: Vec<Resource>,
}

impl ReferenceData {
    pub fn new(subjects: Vec<Subject>, resources: Vec<Resource>) -> Result<Self, BenchError> {
        if subjects.is_empty() {
            return Err(BenchError::EmptyReferenceData("subjects"));
        }
        if resources.is_empty() {
            return Err(BenchError::EmptyReferenceData("resources"));
        }
        Ok(Self {
            subjects,
            resources,
        })
    }

    pub fn load(subjects_path: &Path, resources_path: &Path) -> Result<Self, BenchError> {
        let subjects: Vec<Subject> = load_json_array(subjects_path, "subjects")?;
        let resources: Vec<Resource> = load_json_array(resources_path, "resources")?;
        let data = Self::new(subjects, resources)?;
        info!(
            subjects = data.subjects.len(),
            resources = data.resources.len(),
            "Loaded reference data"
        );
        Ok(data)
    }
}

fn load_json_array<T: DeserializeOwned>(
    path: &Path,
    kind: &'static str,
) -> Result<Vec<T>, BenchError> {
    let content = std::fs::read_to_string(path).map_err(|source| BenchError::ReferenceDataIo {
        kind,
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&content).map_err(|source| BenchError::ReferenceDataParse {
        kind,
        path: path.to_path_buf(),
        source,
    })
}
