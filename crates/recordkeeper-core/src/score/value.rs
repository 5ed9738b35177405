//! Score - metric tuple plus penalty flags

use std::cmp::Ordering;
use std::fmt;

use smallvec::SmallVec;

use super::flags::FlagSet;
use crate::error::ScoreError;

/// Inline storage for metric values; puzzles rarely track more than four.
pub type Metrics = SmallVec<[u64; 4]>;

/// Result of comparing two metric tuples position by position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MetricComparison {
    /// Every position is equal.
    Equal,
    /// No position is worse and at least one is strictly lower.
    Better,
    /// No position is better and at least one is strictly higher.
    Worse,
    /// Some positions are better and some worse, or arities differ.
    Incomparable,
}

impl MetricComparison {
    /// True for `Equal` and `Better`: the left side weakly dominates.
    #[inline]
    pub fn is_no_worse(self) -> bool {
        matches!(self, MetricComparison::Equal | MetricComparison::Better)
    }

    /// Swaps the roles of the two compared tuples.
    pub fn reverse(self) -> Self {
        match self {
            MetricComparison::Better => MetricComparison::Worse,
            MetricComparison::Worse => MetricComparison::Better,
            other => other,
        }
    }
}

/// An immutable solution score: ordered lower-is-better metrics and a set
/// of penalty flags.
///
/// Equality and hashing are structural over both parts. Metrics are
/// non-negative by construction; the value [`Score::UNKNOWN`] marks a metric
/// that was never measured and compares as the worst possible value.
///
/// A `Score` does not know its own metric names or flag meanings; those live
/// in the [`ScoreSchema`](super::ScoreSchema) that built it.
///
/// # Examples
///
/// ```
/// use recordkeeper_core::score::{FlagSet, MetricComparison, Score};
///
/// let fast = Score::new([10, 100, 1000], FlagSet::EMPTY).unwrap();
/// let small = Score::new([1000, 100, 10], FlagSet::EMPTY).unwrap();
/// let best = Score::new([10, 10, 10], FlagSet::EMPTY).unwrap();
///
/// assert_eq!(fast.compare_metrics(&small), MetricComparison::Incomparable);
/// assert!(best.strictly_dominates_metrics(&fast));
/// assert!(best.strictly_dominates_metrics(&small));
/// ```
#[derive(Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Score {
    metrics: Metrics,
    flags: FlagSet,
}

impl Score {
    /// Placeholder for a metric that was not measured.
    pub const UNKNOWN: u64 = u64::MAX;

    /// Creates a score from metric values and flags.
    ///
    /// # Errors
    /// Returns [`ScoreError::NoMetrics`] if `metrics` is empty.
    pub fn new(metrics: impl IntoIterator<Item = u64>, flags: FlagSet) -> Result<Self, ScoreError> {
        let metrics: Metrics = metrics.into_iter().collect();
        if metrics.is_empty() {
            return Err(ScoreError::NoMetrics);
        }
        Ok(Score { metrics, flags })
    }

    /// Creates a score from signed metric values, rejecting negatives.
    pub fn from_signed(metrics: &[i64], flags: FlagSet) -> Result<Self, ScoreError> {
        let converted = metrics
            .iter()
            .enumerate()
            .map(|(index, &value)| {
                u64::try_from(value).map_err(|_| ScoreError::NegativeMetric { index, value })
            })
            .collect::<Result<Metrics, _>>()?;
        Self::new(converted, flags)
    }

    #[inline]
    pub fn metrics(&self) -> &[u64] {
        &self.metrics
    }

    /// Returns the metric at `index`.
    ///
    /// # Panics
    /// Panics if `index >= self.arity()`.
    #[inline]
    pub fn metric(&self, index: usize) -> u64 {
        self.metrics[index]
    }

    /// Number of metrics.
    #[inline]
    pub fn arity(&self) -> usize {
        self.metrics.len()
    }

    #[inline]
    pub fn flags(&self) -> FlagSet {
        self.flags
    }

    #[inline]
    pub fn has_flag(&self, index: usize) -> bool {
        self.flags.contains(index)
    }

    /// Returns true if any metric is [`Score::UNKNOWN`].
    pub fn has_unknown_metric(&self) -> bool {
        self.metrics.contains(&Self::UNKNOWN)
    }

    /// Compares metrics component-wise, ignoring flags.
    pub fn compare_metrics(&self, other: &Score) -> MetricComparison {
        if self.arity() != other.arity() {
            return MetricComparison::Incomparable;
        }

        let mut any_better = false;
        let mut any_worse = false;
        for (a, b) in self.metrics.iter().zip(other.metrics.iter()) {
            match a.cmp(b) {
                Ordering::Less => any_better = true,
                Ordering::Greater => any_worse = true,
                Ordering::Equal => {}
            }
            if any_better && any_worse {
                return MetricComparison::Incomparable;
            }
        }

        match (any_better, any_worse) {
            (false, false) => MetricComparison::Equal,
            (true, false) => MetricComparison::Better,
            (false, true) => MetricComparison::Worse,
            (true, true) => MetricComparison::Incomparable,
        }
    }

    /// True if every metric is `<=` the other's.
    #[inline]
    pub fn weakly_dominates_metrics(&self, other: &Score) -> bool {
        self.compare_metrics(other).is_no_worse()
    }

    /// True if every metric is `<=` the other's and at least one is `<`.
    #[inline]
    pub fn strictly_dominates_metrics(&self, other: &Score) -> bool {
        self.compare_metrics(other) == MetricComparison::Better
    }
}

impl fmt::Debug for Score {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Score(")?;
        for (i, value) in self.metrics.iter().enumerate() {
            if i > 0 {
                write!(f, "/")?;
            }
            if *value == Self::UNKNOWN {
                write!(f, "?")?;
            } else {
                write!(f, "{}", value)?;
            }
        }
        write!(f, ", flags={:?})", self.flags)
    }
}
