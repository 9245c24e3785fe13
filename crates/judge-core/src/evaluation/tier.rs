//! Score-tier classification policy.
//!
//! Two tier schemes have shipped: the current one (mid cutoff 70) and a
//! legacy two-tier scheme (mid cutoff 60). The cutoffs are configuration,
//! not derived values: one [`TierPolicy`] instance is threaded through
//! every scoring surface so the breakpoints exist exactly once.

use super::result::ScoreDimension;
use serde::{Deserialize, Serialize};
use strum::IntoEnumIterator;

/// Qualitative tier of a numeric score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreTier {
    High,
    Mid,
    Low,
}

/// The configured tier breakpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TierPolicy {
    /// Scores at or above this value are `High`.
    pub high_cutoff: u8,
    /// Scores at or above this value (but below `high_cutoff`) are `Mid`.
    pub mid_cutoff: u8,
}

impl Default for TierPolicy {
    fn default() -> Self {
        Self {
            high_cutoff: 80,
            mid_cutoff: 70,
        }
    }
}

impl TierPolicy {
    /// The legacy two-tier scheme observed in older deployments.
    pub fn legacy() -> Self {
        Self {
            high_cutoff: 80,
            mid_cutoff: 60,
        }
    }

    /// Classifies a score against the configured breakpoints.
    pub fn classify(&self, score: u8) -> ScoreTier {
        if score >= self.high_cutoff {
            ScoreTier::High
        } else if score >= self.mid_cutoff {
            ScoreTier::Mid
        } else {
            ScoreTier::Low
        }
    }
}

/// Scoring configuration for one session: tier breakpoints plus the set of
/// dimensions the session surfaces.
///
/// The dimension set is configuration because two score-set versions
/// coexist on the wire (three mandatory dimensions vs. five). The default
/// surfaces the mandatory three; [`ScorePolicy::extended`] surfaces all
/// five.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScorePolicy {
    pub tiers: TierPolicy,
    pub dimensions: Vec<ScoreDimension>,
}

impl Default for ScorePolicy {
    fn default() -> Self {
        Self {
            tiers: TierPolicy::default(),
            dimensions: ScoreDimension::MANDATORY.to_vec(),
        }
    }
}

impl ScorePolicy {
    /// Policy surfacing all five dimensions.
    pub fn extended() -> Self {
        Self {
            tiers: TierPolicy::default(),
            dimensions: ScoreDimension::iter().collect(),
        }
    }

    /// Replaces the tier breakpoints, keeping the dimension set.
    pub fn with_tiers(mut self, tiers: TierPolicy) -> Self {
        self.tiers = tiers;
        self
    }
}
