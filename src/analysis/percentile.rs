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

//! Descriptive statistics over latency columns.

/// Values sorted once so several percentiles can be read cheaply.
#[derive(Debug, Clone, PartialEq)]
pub struct SortedSample {
    values: Vec<f64>,
}

impl SortedSample {
    /// NaN values are dropped.
    pub fn new(mut values: Vec<f64>) -> Self {
        values.retain(|v| !v.is_nan());
        values.sort_by(f64::total_cmp);
        Self { values }
    }

    /// Percentile with linear interpolation between closest ranks.
    ///
    /// The rank of `p` is `p / 100 * (n - 1)`; `p` is clamped to `[0, 100]`.
    pub fn percentile(&self, p: f64) -> Option<f64> {
        let last = self.values.len().checked_sub(1)?;
        let rank = p.clamp(0.0, 100.0) / 100.0 * last as f64;
        let lo = rank.floor() as usize;
        let hi = rank.ceil() as usize;
        let (a, b) = (self.values[lo], self.values[hi]);
        let v = a + (b - a) * (rank - lo as f64);
        // Rounding must not push the result outside its bracket
        Some(v.clamp(a, b))
    }

    pub fn mean(&self) -> Option<f64> {
        mean(&self.values)
    }
}

pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        None
    } else {
        Some(values.iter().sum::<f64>() / values.len() as f64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_interpolated_percentiles() {
        let s = SortedSample::new(vec![4.0, 1.0, 3.0, 2.0]);
        assert_eq!(s.percentile(0.0), Some(1.0));
        assert_eq!(s.percentile(50.0), Some(2.5));
        assert_eq!(s.percentile(100.0), Some(4.0));
        // rank 0.9 * 3 = 2.7 -> 3 + 0.7
        assert!((s.percentile(90.0).unwrap() - 3.7).abs() < 1e-12);
    }

    #[test]
    fn test_single_value() {
        let s = SortedSample::new(vec![12.5]);
        assert_eq!(s.percentile(50.0), Some(12.5));
        assert_eq!(s.percentile(99.0), Some(12.5));
    }

    #[test]
    fn test_empty() {
        let s = SortedSample::new(vec![]);
        assert_eq!(s.percentile(50.0), None);
        assert_eq!(s.mean(), None);
    }

    #[test]
    fn test_nan_dropped() {
        let s = SortedSample::new(vec![f64::NAN, 2.0, 4.0]);
        assert_eq!(s.percentile(0.0), Some(2.0));
        assert_eq!(s.percentile(100.0), Some(4.0));
        assert_eq!(s.mean(), Some(3.0));
    }
}
