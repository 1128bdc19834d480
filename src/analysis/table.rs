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

//! Reading result CSVs back for aggregation.

use std::path::{Path, PathBuf};

use crate::bench_core::errors::BenchError;

/// A result CSV loaded into memory, addressed by column name.
#[derive(Debug, Clone)]
pub struct ResultTable {
    path: PathBuf,
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl ResultTable {
    pub fn read(path: &Path) -> Result<Self, BenchError> {
        let mut reader = csv::ReaderBuilder::new()
            .flexible(true)
            .from_path(path)?;
        let headers = reader.headers()?.iter().map(str::to_string).collect();
        let rows = reader
            .records()
            .map(|r| r.map(|rec| rec.iter().map(str::to_string).collect()))
            .collect::<Result<Vec<Vec<String>>, csv::Error>>()?;
        Ok(Self {
            path: path.to_path_buf(),
            headers,
            rows,
        })
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.headers.iter().any(|h| h == name)
    }

    /// Every cell of `name`; short rows yield empty cells.
    pub fn column(&self, name: &str) -> Result<Vec<&str>, BenchError> {
        let idx = self
            .headers
            .iter()
            .position(|h| h == name)
            .ok_or_else(|| BenchError::MissingColumn {
                column: name.to_string(),
                path: self.path.clone(),
            })?;
        Ok(self
            .rows
            .iter()
            .map(|row| row.get(idx).map(String::as_str).unwrap_or(""))
            .collect())
    }

    /// Numeric cells of `name`; blank or non-numeric cells are skipped.
    pub fn numeric_column(&self, name: &str) -> Result<Vec<f64>, BenchError> {
        Ok(self
            .column(name)?
            .into_iter()
            .filter_map(|cell| cell.trim().parse::<f64>().ok())
            .filter(|v| !v.is_nan())
            .collect())
    }
}

/// CSV files in `dir` whose name starts with `prefix`, sorted by file name.
pub fn matching_files(dir: &Path, prefix: &str) -> Result<Vec<PathBuf>, BenchError> {
    let mut files: Vec<PathBuf> = std::fs::read_dir(dir)?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| {
            path.is_file()
                && path
                    .file_name()
                    .and_then(|n| n.to_str())
                    .is_some_and(|n| n.starts_with(prefix) && n.ends_with(".csv"))
        })
        .collect();
    files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    Ok(files)
}

/// File name without directory or `.csv` extension.
pub fn test_name(path: &Path) -> String {
    path.file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or_default()
        .to_string()
}

/// Request count and concurrency encoded in a sweep file name,
/// e.g. `latency_read_n50_c10` → `(Some(50), Some(10))`.
pub fn sweep_parameters(test: &str) -> (Option<usize>, Option<usize>) {
    let tagged = |tag: char| {
        test.split('_').find_map(|part| {
            part.strip_prefix(tag)
                .filter(|digits| !digits.is_empty())
                .and_then(|digits| digits.parse::<usize>().ok())
        })
    };
    (tagged('n'), tagged('c'))
}
