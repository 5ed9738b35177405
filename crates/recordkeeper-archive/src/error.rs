//! Error types for archive operations.
//!
//! Archive outcomes (success, already archived, dominated) are values of
//! [`crate::ArchiveResult`]; the errors here cover candidates that do not
//! belong to an archive, broken frontiers, and storage failures.

use recordkeeper_core::record::PuzzleId;
use recordkeeper_core::score::{Score, ScoreError};
use thiserror::Error;

use crate::result::ArchiveResult;

/// A candidate or frontier could not be processed by an [`crate::Archive`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ArchiveError {
    #[error("record for puzzle '{actual}' submitted to the archive of '{expected}'")]
    WrongPuzzle { expected: PuzzleId, actual: PuzzleId },

    #[error("record does not fit the puzzle's score schema: {0}")]
    Score(#[from] ScoreError),

    #[error(transparent)]
    Frontier(#[from] FrontierViolation),
}

/// The frontier holds a pair of records it must never hold together.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FrontierViolation {
    #[error("puzzle '{puzzle}': {dominating:?} dominates {dominated:?}")]
    Dominated {
        puzzle: PuzzleId,
        dominating: Score,
        dominated: Score,
    },

    #[error("puzzle '{puzzle}': identical solution archived twice at {score:?}")]
    Duplicate { puzzle: PuzzleId, score: Score },
}

/// A [`crate::FrontierStore`] failed to load or save.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("storage backend error: {0}")]
    Backend(String),
}

/// A registry operation failed.
#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("unknown puzzle '{0}'")]
    UnknownPuzzle(PuzzleId),

    #[error("archive of puzzle '{0}' is poisoned by a panicked submission")]
    Poisoned(PuzzleId),

    #[error(transparent)]
    Archive(#[from] ArchiveError),

    #[error("storage failed for puzzle '{puzzle}': {source}")]
    Store {
        puzzle: PuzzleId,
        #[source]
        source: StoreError,
    },

    /// Every replayed record was applied in memory, but some puzzles could
    /// not be saved. Each listed puzzle needs a reload.
    #[error("replay applied every record but {} puzzle(s) were not saved", .unsaved.len())]
    ReplayUnsaved {
        results: Vec<ArchiveResult>,
        unsaved: Vec<(PuzzleId, StoreError)>,
    },
}

/// Result type alias for registry operations.
pub type Result<T> = std::result::Result<T, RegistryError>;
