//! Score types for representing solution quality
//!
//! A score is a tuple of lower-is-better metrics plus a set of penalty
//! flags. Scores are only partially ordered: two scores that trade one
//! metric against another are incomparable, which is exactly what keeps
//! several of them alive on a puzzle's frontier.

mod flags;
mod penalty;
mod schema;
mod value;

#[cfg(test)]
mod tests;

pub use flags::{FlagSet, MAX_FLAGS};
pub use penalty::FlagPenaltyOrder;
pub use schema::{FlagDef, ScoreDisplay, ScoreSchema};
pub use value::{MetricComparison, Metrics, Score};

pub use crate::error::{ScoreError, ScoreParseError};
