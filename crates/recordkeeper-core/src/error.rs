//! Error types for recordkeeper core types

use thiserror::Error;

use crate::score::FlagSet;

/// A score could not be constructed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScoreError {
    #[error("score must have at least one metric")]
    NoMetrics,

    #[error("metric {index} is negative ({value})")]
    NegativeMetric { index: usize, value: i64 },

    #[error("expected {expected} metrics, got {actual}")]
    ArityMismatch { expected: usize, actual: usize },

    #[error("flag set {flags:?} uses flags outside the {flag_count} declared")]
    UnknownFlags { flags: FlagSet, flag_count: usize },
}

/// A score could not be parsed from its display form.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Score parse error: {message}")]
pub struct ScoreParseError {
    pub message: String,
}

impl ScoreParseError {
    pub(crate) fn new(message: impl Into<String>) -> Self {
        ScoreParseError {
            message: message.into(),
        }
    }
}

impl From<ScoreError> for ScoreParseError {
    fn from(err: ScoreError) -> Self {
        ScoreParseError::new(err.to_string())
    }
}

/// A score schema or flag-penalty order is misconfigured.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    #[error("schema must declare at least one metric")]
    NoMetrics,

    #[error("{0} flags declared, at most 8 are supported")]
    TooManyFlags(usize),

    #[error("flag index {index} is outside the {flag_count} declared flags")]
    UnknownFlag { index: usize, flag_count: usize },

    #[error("duplicate {kind} '{name}'")]
    Duplicate { kind: &'static str, name: String },

    #[error("flag combination {0:?} listed twice in penalty order")]
    DuplicatePenaltyEntry(FlagSet),

    #[error("flag combination {0:?} missing from penalty order")]
    MissingPenaltyEntry(FlagSet),

    #[error("penalty order ranks {better:?} ahead of its subset {worse:?}")]
    NonMonotonicPenalty { better: FlagSet, worse: FlagSet },

    #[error("penalty order covers {actual} flags, schema declares {expected}")]
    PenaltyFlagCount { expected: usize, actual: usize },
}

/// A category definition is misconfigured for its schema.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CategoryError {
    #[error("category '{category}': rank key references metric {index}, schema has {arity}")]
    UnknownMetric {
        category: String,
        index: usize,
        arity: usize,
    },

    #[error("category '{category}': forbidden flags {flags:?} not declared by schema")]
    UnknownFlags { category: String, flags: FlagSet },

    #[error("category '{category}': rank key {key} listed twice")]
    DuplicateRankKey { category: String, key: String },

    #[error("category '{category}': ranking never compares {missing}, so distinct scores can tie")]
    NotStrict { category: String, missing: String },

    #[error(
        "category '{category}': rejects flags {rejected:?}, which rank ahead of accepted flags {accepted:?}"
    )]
    NotDownClosed {
        category: String,
        rejected: FlagSet,
        accepted: FlagSet,
    },

    #[error("category id must not be empty")]
    EmptyId,
}

/// A record is missing required identification.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RecordError {
    #[error("record is missing a puzzle id")]
    MissingPuzzle,

    #[error("record is missing an author")]
    MissingAuthor,
}

/// Aggregate error for core operations.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error(transparent)]
    Score(#[from] ScoreError),

    #[error(transparent)]
    Parse(#[from] ScoreParseError),

    #[error(transparent)]
    Schema(#[from] SchemaError),

    #[error(transparent)]
    Category(#[from] CategoryError),

    #[error(transparent)]
    Record(#[from] RecordError),
}

/// Result type alias for core operations.
pub type Result<T> = std::result::Result<T, CoreError>;
