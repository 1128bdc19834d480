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

//! CSV output.
//!
//! The header row is written explicitly from the fixed column schema so a
//! file is well-formed even when it holds no records.

use serde::Serialize;
use std::io::Write;
use std::path::Path;

use crate::bench_core::constants::columns;
use crate::bench_core::errors::BenchError;
use crate::bench_core::models::{AccessRecord, PolicyRecord};

/// Serialize `records` below `header` into any writer.
pub fn write_records<W: Write, R: Serialize>(
    writer: W,
    header: &[&str],
    records: &[R],
) -> Result<(), BenchError> {
    let mut csv = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(writer);
    csv.write_record(header)?;
    for record in records {
        csv.serialize(record)?;
    }
    csv.flush()?;
    Ok(())
}

/// Write string rows below `header`. Used for the summary tables.
pub fn write_rows<W: Write>(
    writer: W,
    header: &[&str],
    rows: &[Vec<String>],
) -> Result<(), BenchError> {
    let mut csv = csv::Writer::from_writer(writer);
    csv.write_record(header)?;
    for row in rows {
        csv.write_record(row)?;
    }
    csv.flush()?;
    Ok(())
}

pub fn write_access_csv(path: &Path, records: &[AccessRecord]) -> Result<(), BenchError> {
    let file = std::fs::File::create(path)?;
    write_records(file, &columns::ACCESS, records)
}

pub fn write_policy_csv(path: &Path, records: &[PolicyRecord]) -> Result<(), BenchError> {
    let file = std::fs::File::create(path)?;
    write_records(file, &columns::POLICY, records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bench_core::models::Decision;

    fn access_record(allowed: Decision, status: Option<u16>, error: Option<&str>) -> AccessRecord {
        AccessRecord {
            worker: "w0".to_string(),
            start_time_iso: "2026-01-01T00:00:00.000000Z".to_string(),
            latency_ms: 12.3456,
            status,
            allowed,
            subject_address: "0xaa".to_string(),
            subject_role: Some("INSURER".to_string()),
            resource_id: Some("7".to_string()),
            resource_type: Some("IMAGE".to_string()),
            resource_sensitivity: Some("2".to_string()),
            action: "READ".to_string(),
            error: error.map(str::to_string),
        }
    }

    fn render<R: Serialize>(header: &[&str], records: &[R]) -> String {
        let mut buf = Vec::new();
        write_records(&mut buf, header, records).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn test_access_row_layout() {
        let out = render(
            &columns::ACCESS,
            &[access_record(Decision::Allowed, Some(200), None)],
        );
        let mut lines = out.lines();
        assert_eq!(lines.next().unwrap(), columns::ACCESS.join(","));
        assert_eq!(
            lines.next().unwrap(),
            "w0,2026-01-01T00:00:00.000000Z,12.346,200,True,0xaa,INSURER,7,IMAGE,2,READ,"
        );
        assert!(lines.next().is_none());
    }

    #[test]
    fn test_transport_failure_row_has_empty_cells() {
        let out = render(
            &columns::ACCESS,
            &[access_record(
                Decision::Unknown,
                None,
                Some("Connection failed: refused, retry later"),
            )],
        );
        let row = out.lines().nth(1).unwrap();
        assert!(row.starts_with("w0,2026-01-01T00:00:00.000000Z,12.346,,,0xaa"));
        // commas inside the error are quoted
        assert!(row.ends_with("\"Connection failed: refused, retry later\""));
    }

    #[test]
    fn test_empty_run_still_has_header() {
        let out = render::<PolicyRecord>(&columns::POLICY, &[]);
        assert_eq!(out, format!("{}\n", columns::POLICY.join(",")));
    }

    #[test]
    fn test_policy_row_layout() {
        let rec = PolicyRecord {
            worker: "w0".to_string(),
            index: 3,
            start_time_iso: "2026-01-01T00:00:00.000000Z".to_string(),
            latency_ms: 1500.0,
            status: Some(200),
            tx_hash: Some("0xabc".to_string()),
            gas_used: Some("51234".to_string()),
            block_number: Some("42".to_string()),
            error: None,
        };
        let out = render(&columns::POLICY, &[rec]);
        assert_eq!(
            out.lines().nth(1).unwrap(),
            "w0,3,2026-01-01T00:00:00.000000Z,1500.000,200,0xabc,51234,42,"
        );
    }
}
