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

use std::sync::{Mutex, PoisonError};

/// Append-only sink shared by all workers.
///
/// The lock is held only for the push itself, never across an await point.
#[derive(Debug)]
pub struct ResultCollector<R> {
    records: Mutex<Vec<R>>,
}

impl<R> ResultCollector<R> {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            records: Mutex::new(Vec::with_capacity(capacity)),
        }
    }

    pub fn append(&self, record: R) {
        // A poisoned lock still holds every record pushed so far
        self.records
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(record);
    }

    /// Move every record out. Called once, after all workers have joined.
    pub fn take_records(&self) -> Vec<R> {
        std::mem::take(
            &mut *self
                .records
                .lock()
                .unwrap_or_else(PoisonError::into_inner),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn test_concurrent_appends_are_not_lost() {
        let c = Arc::new(ResultCollector::with_capacity(16));
        let handles: Vec<_> = (0..4)
            .map(|t| {
                let c = Arc::clone(&c);
                std::thread::spawn(move || {
                    for i in 0..250 {
                        c.append(t * 1000 + i);
                    }
                })
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }
        let mut records = c.take_records();
        records.sort_unstable();
        records.dedup();
        assert_eq!(records.len(), 1000);
        assert!(c.take_records().is_empty());
    }
}
