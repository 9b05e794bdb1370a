//! Containment-based overlap suppression.
//!
//! Contour hierarchies naturally produce nested candidates (a drawer outline
//! inside a cabinet face, the hole contour inside an outer contour). The
//! [`OverlapSuppressor`] keeps the more rectangular of two candidates whenever
//! their intersection covers more than the threshold of either one's area.

use crate::core::config::{ConfigError, ConfigValidator};
use crate::core::constants::{DEFAULT_OVERLAP_THRESHOLD, FEATURE_EPSILON};
use crate::domain::Region;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use tracing::debug;

/// Configuration for [`OverlapSuppressor`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SuppressionConfig {
    /// Containment ratio above which a candidate is discarded.
    pub overlap_threshold: f32,
}

impl Default for SuppressionConfig {
    fn default() -> Self {
        Self {
            overlap_threshold: DEFAULT_OVERLAP_THRESHOLD,
        }
    }
}

impl ConfigValidator for SuppressionConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        self.validate_ratio("overlap_threshold", self.overlap_threshold)
    }

    fn get_defaults() -> Self {
        Self::default()
    }
}

/// Greedy deduplication of classified regions.
#[derive(Debug, Clone, Default)]
pub struct OverlapSuppressor {
    config: SuppressionConfig,
}

impl OverlapSuppressor {
    /// Creates a new suppressor with the given configuration.
    pub fn new(config: SuppressionConfig) -> Self {
        Self { config }
    }

    /// Creates a suppressor with the given containment threshold.
    pub fn with_threshold(overlap_threshold: f32) -> Self {
        Self::new(SuppressionConfig { overlap_threshold })
    }

    /// Removes near-duplicate and contained regions.
    ///
    /// Candidates are visited in descending extent order; a candidate is
    /// dropped as soon as its intersection with an already kept region
    /// exceeds the threshold of either region's area. The survivors are
    /// returned in descending area order. Both sorts are stable.
    pub fn suppress(&self, regions: Vec<Region>) -> Vec<Region> {
        let total = regions.len();
        let mut candidates = regions;
        candidates.sort_by(|a, b| descending(a.extent(), b.extent()));

        let mut kept: Vec<Region> = Vec::with_capacity(candidates.len());
        for candidate in candidates {
            let duplicate = kept
                .iter()
                .any(|existing| self.is_contained(&candidate, existing));
            if !duplicate {
                kept.push(candidate);
            }
        }

        kept.sort_by(|a, b| descending(a.area(), b.area()));

        debug!(
            candidates = total,
            kept = kept.len(),
            suppressed = total - kept.len(),
            "Suppressed overlapping regions"
        );
        kept
    }

    /// Returns true if either region covers more than the threshold of the other.
    fn is_contained(&self, candidate: &Region, kept: &Region) -> bool {
        let intersection = candidate.bbox().intersection_area(kept.bbox());
        if intersection == 0 {
            return false;
        }
        let intersection = intersection as f32;
        let candidate_ratio = intersection / candidate.area().max(FEATURE_EPSILON);
        let kept_ratio = intersection / kept.area().max(FEATURE_EPSILON);
        candidate_ratio > self.config.overlap_threshold || kept_ratio > self.config.overlap_threshold
    }
}

fn descending(a: f32, b: f32) -> Ordering {
    b.partial_cmp(&a).unwrap_or(Ordering::Equal)
}
