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

//! claimguard-bench: load generation and result analysis for the ClaimGuard
//! policy enforcement gateway.
//!
//! The crate drives concurrent `POST /access` and `POST /policy` traffic
//! against a running gateway, records one CSV row per request, and
//! aggregates result directories into summary tables offline.

pub mod analysis;
pub mod bench_core;
pub mod config;
pub mod driver;
pub mod orchestrator;
pub mod report;
pub mod utils;
