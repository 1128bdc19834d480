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

//! Request builder.
//!
//! Produces one request body per iteration from an injected random source.
//! Passing a seeded `StdRng` makes the sequence of generated bodies
//! reproducible; the interleaving of workers is still not.

use rand::rngs::StdRng;
use rand::seq::IndexedRandom;
use rand::{Rng, SeedableRng};
use std::sync::{Mutex, PoisonError};

use crate::bench_core::constants::policy_space;
use crate::bench_core::models::{AccessRequestBody, PolicyUpdateBody, Resource, Subject};

pub struct RequestBuilder {
    rng: Mutex<StdRng>,
}

/// A sampled authorization check together with the reference rows it came from.
#[derive(Debug, Clone)]
pub struct AccessSample<'a> {
    pub subject: &'a Subject,
    pub resource: &'a Resource,
    pub action: &'a str,
}

impl<'a> AccessSample<'a> {
    pub fn body(&self) -> AccessRequestBody {
        AccessRequestBody {
            subject: self.subject.address.clone(),
            resource_id: self.resource.resource_id.clone(),
            action: self.action.to_string(),
        }
    }
}

impl RequestBuilder {
    pub fn new(rng: StdRng) -> Self {
        Self {
            rng: Mutex::new(rng),
        }
    }

    pub fn seeded(seed: u64) -> Self {
        Self::new(StdRng::seed_from_u64(seed))
    }

    pub fn from_os_rng() -> Self {
        Self::new(StdRng::from_os_rng())
    }

    /// Seeded when `seed` is given, OS entropy otherwise.
    pub fn from_seed_option(seed: Option<u64>) -> Self {
        match seed {
            Some(seed) => Self::seeded(seed),
            None => Self::from_os_rng(),
        }
    }

    /// Pick a uniformly random (subject, resource, action) triple.
    ///
    /// Returns `None` only if one of the slices is empty, which the
    /// reference loader and CLI validation rule out before a run.
    pub fn access_sample<'a>(
        &self,
        subjects: &'a [Subject],
        resources: &'a [Resource],
        actions: &'a [String],
    ) -> Option<AccessSample<'a>> {
        let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);
        let subject = subjects.choose(&mut *rng)?;
        let resource = resources.choose(&mut *rng)?;
        let action = actions.choose(&mut *rng)?;
        Some(AccessSample {
            subject,
            resource,
            action: action.as_str(),
        })
    }

    /// Synthesize a policy update. `now` is Unix seconds.
    ///
    /// Half of the generated policies are unbounded (both window bounds
    /// zero); the rest are valid from `now` for thirty days.
    pub fn policy_update(&self, now: u64) -> PolicyUpdateBody {
        let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);
        let role = pick(&mut *rng, policy_space::ROLES);
        let r_type = pick(&mut *rng, policy_space::RESOURCE_TYPES);
        let action = pick(&mut *rng, policy_space::ACTIONS);
        let max_sensitivity = pick(&mut *rng, policy_space::MAX_SENSITIVITIES);

        let (not_before, not_after) =
            if rng.random_bool(policy_space::UNBOUNDED_WINDOW_PROBABILITY) {
                (0, 0)
            } else {
                (now, now + policy_space::VALIDITY_WINDOW_SECS)
            };

        PolicyUpdateBody {
            role,
            org_id: policy_space::WILDCARD.to_string(),
            jurisdiction: policy_space::WILDCARD.to_string(),
            r_type,
            case_id: policy_space::WILDCARD.to_string(),
            action,
            max_sensitivity,
            not_before,
            not_after,
            allow: true,
        }
    }
}

fn pick<R: Rng + ?Sized>(rng: &mut R, values: &[u8]) -> u8 {
    values.choose(rng).copied().unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn subjects() -> Vec<Subject> {
        (0..4)
            .map(|i| Subject {
                address: format!("0x{:02}", i),
                role: json!("INSURER"),
            })
            .collect()
    }

    fn resources() -> Vec<Resource> {
        (1..=3)
            .map(|i| Resource {
                resource_id: json!(i),
                r_type: json!("IMAGE"),
                sensitivity: json!(2),
            })
            .collect()
    }

    #[test]
    fn test_same_seed_same_sequence() {
        let a = RequestBuilder::seeded(42);
        let b = RequestBuilder::seeded(42);
        for _ in 0..50 {
            assert_eq!(a.policy_update(1_000), b.policy_update(1_000));
        }
    }

    #[test]
    fn test_policy_update_domains() {
        let builder = RequestBuilder::seeded(7);
        let now = 1_700_000_000;
        let mut saw_bounded = false;
        let mut saw_unbounded = false;
        for _ in 0..500 {
            let p = builder.policy_update(now);
            assert!(policy_space::ROLES.contains(&p.role));
            assert!(policy_space::RESOURCE_TYPES.contains(&p.r_type));
            assert!(policy_space::ACTIONS.contains(&p.action));
            assert!(policy_space::MAX_SENSITIVITIES.contains(&p.max_sensitivity));
            assert_eq!(p.org_id, "0x0");
            assert_eq!(p.jurisdiction, "0x0");
            assert_eq!(p.case_id, "0x0");
            assert!(p.allow);
            if p.is_unbounded() {
                saw_unbounded = true;
            } else {
                saw_bounded = true;
                assert_eq!(p.not_before, now);
                assert_eq!(p.not_after, now + 30 * 24 * 60 * 60);
            }
        }
        assert!(saw_bounded && saw_unbounded);
    }

    #[test]
    fn test_access_sample_draws_from_inputs() {
        let builder = RequestBuilder::seeded(1);
        let subjects = subjects();
        let resources = resources();
        let actions = vec!["READ".to_string(), "APPEND".to_string()];
        for _ in 0..100 {
            let sample = builder
                .access_sample(&subjects, &resources, &actions)
                .unwrap();
            assert!(subjects.contains(sample.subject));
            assert!(resources.contains(sample.resource));
            assert!(actions.iter().any(|a| a == sample.action));
            let body = sample.body();
            assert_eq!(body.subject, sample.subject.address);
        }
    }

    #[test]
    fn test_access_sample_empty_input() {
        let builder = RequestBuilder::seeded(1);
        assert!(builder.access_sample(&[], &resources(), &["READ".to_string()]).is_none());
    }
}
