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

//! Work queue.
//!
//! A fixed pool of `N` tokens handed out by an atomic cursor. Taking never
//! blocks and never suspends, so a worker can loop straight back after its
//! previous request completes.

use std::sync::atomic::{AtomicUsize, Ordering};

use crate::bench_core::models::WorkToken;

#[derive(Debug)]
pub struct WorkQueue {
    capacity: usize,
    cursor: AtomicUsize,
}

impl WorkQueue {
    /// Populate the queue with tokens `0..capacity`.
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            cursor: AtomicUsize::new(0),
        }
    }

    /// Take the next token, or `None` once all tokens are gone.
    pub fn try_take(&self) -> Option<WorkToken> {
        // fetch_update keeps the cursor from running past capacity
        self.cursor
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |next| {
                (next < self.capacity).then_some(next + 1)
            })
            .ok()
            .map(|index| WorkToken { index })
    }
}
