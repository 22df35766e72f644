//! Viability scoring engines.
//!
//! [`ViabilityModel`] is the seam between the session flow and whatever
//! produces verdicts. The shipped implementation, [`SimulatedModel`],
//! stands in for a remote scoring service: it sleeps for a configurable
//! latency, refuses over-limit sessions, and draws the outcome from a
//! weighted location profile. The randomness is a placeholder for a real
//! model and is seedable for reproducible runs.

mod simulated;

pub use simulated::{weighted_location_score, ModelSettings, SimulatedModel};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use viability_types::{unix_ms_now, Category, CompanyData};

/// Attempts consumed so far, sampled by the caller before the run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UsageSnapshot {
    pub used: u32,
    pub max: u32,
}

impl UsageSnapshot {
    #[must_use]
    pub const fn new(used: u32, max: u32) -> Self {
        Self { used, max }
    }

    /// True once the attempt budget is spent.
    #[must_use]
    pub const fn limit_reached(self) -> bool {
        self.used >= self.max
    }

    /// True when more attempts were consumed than the budget allows.
    #[must_use]
    pub const fn over_limit(self) -> bool {
        self.used > self.max
    }
}

/// Outcome of one analysis run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Verdict {
    pub category: Category,
    pub company: CompanyData,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score: Option<u8>,
    pub issued_at_ms: u64,
    pub attempts_used: u32,
    pub attempts_max: u32,
}

impl Verdict {
    #[must_use]
    pub fn new(category: Category, company: CompanyData, usage: UsageSnapshot) -> Self {
        Self {
            category,
            company,
            score: None,
            issued_at_ms: unix_ms_now(),
            attempts_used: usage.used,
            attempts_max: usage.max,
        }
    }

    #[must_use]
    pub fn with_score(mut self, score: Option<u8>) -> Self {
        self.score = score;
        self
    }
}

/// A scoring backend. Runs may take seconds; callers surface progress
/// while awaiting.
#[async_trait]
pub trait ViabilityModel: Send + Sync {
    async fn analyze(&self, company: &CompanyData, usage: UsageSnapshot) -> Verdict;
}
