//! recordkeeper core - value types for multi-metric puzzle leaderboards
//!
//! This crate provides the fundamental abstractions for recordkeeper:
//! - Score types: metric tuples, penalty flags and their ordering
//! - Score schemas describing a puzzle family's metrics and flags
//! - Category definitions (eligibility plus ranking rules)
//! - Records tying a score to its author and solution content

pub mod category;
pub mod error;
pub mod record;
pub mod score;

#[cfg(test)]
mod record_tests;
#[cfg(test)]
mod test_utils;

pub use category::{Category, Eligibility, RankKey};
pub use error::{CategoryError, CoreError, RecordError, SchemaError};
pub use record::{normalize_content, PuzzleId, Record, RecordBuilder};
pub use score::{
    FlagDef, FlagPenaltyOrder, FlagSet, MetricComparison, Score, ScoreError, ScoreParseError,
    ScoreSchema,
};
