use rand::{Rng, RngCore};
use serde::{Deserialize, Serialize};

/// Default width of the `[n, n + span)` window used by minimum policies.
pub const DEFAULT_MIN_SPAN: usize = 10;

/// How an item count is derived.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunKind {
    /// Exactly `count` items.
    Exact,
    /// `count` plus a random offset below `span`.
    Min,
    /// Anywhere from zero to `count`, inclusive.
    Max,
}

/// Item-count policy for a run or for a single field's entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunPolicy {
    pub kind: RunKind,
    pub count: usize,
    pub span: usize,
}

impl RunPolicy {
    pub fn exact(count: usize) -> Self {
        Self {
            kind: RunKind::Exact,
            count,
            span: 0,
        }
    }

    pub fn min(count: usize) -> Self {
        Self::min_with_span(count, DEFAULT_MIN_SPAN)
    }

    /// A zero span falls back to [`DEFAULT_MIN_SPAN`].
    pub fn min_with_span(count: usize, span: usize) -> Self {
        Self {
            kind: RunKind::Min,
            count,
            span: if span > 0 { span } else { DEFAULT_MIN_SPAN },
        }
    }

    pub fn max(count: usize) -> Self {
        Self {
            kind: RunKind::Max,
            count,
            span: 0,
        }
    }

    /// Draw a concrete count from this policy.
    pub fn resolve(&self, rng: &mut dyn RngCore) -> PlanRun {
        let count = match self.kind {
            RunKind::Exact => self.count,
            RunKind::Min => self.count + rng.random_range(0..self.span.max(1)),
            RunKind::Max => rng.random_range(0..=self.count),
        };

        PlanRun {
            kind: self.kind,
            count,
        }
    }
}

impl Default for RunPolicy {
    fn default() -> Self {
        Self::exact(1)
    }
}

/// A resolved item count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanRun {
    pub kind: RunKind,
    pub count: usize,
}
