//! ArchiveResult - the outcome of offering a record to an archive

use std::fmt;

use recordkeeper_core::record::Record;

/// What happened to a submitted record.
///
/// Only [`ArchiveResult::Success`] changes the archive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArchiveResult {
    /// The record joined the frontier, evicting every record it dominates.
    Success { removed: Vec<Record> },
    /// An equal-score record with the same solution body is already held.
    AlreadyArchived,
    /// Existing records dominate the submission.
    Failure { dominated_by: Vec<Record> },
}

impl ArchiveResult {
    #[inline]
    pub fn is_success(&self) -> bool {
        matches!(self, ArchiveResult::Success { .. })
    }

    #[inline]
    pub fn is_already_archived(&self) -> bool {
        matches!(self, ArchiveResult::AlreadyArchived)
    }

    #[inline]
    pub fn is_failure(&self) -> bool {
        matches!(self, ArchiveResult::Failure { .. })
    }

    /// Records evicted by a successful submission; empty otherwise.
    pub fn removed(&self) -> &[Record] {
        match self {
            ArchiveResult::Success { removed } => removed,
            _ => &[],
        }
    }

    /// Records that beat a failed submission; empty otherwise.
    pub fn dominated_by(&self) -> &[Record] {
        match self {
            ArchiveResult::Failure { dominated_by } => dominated_by,
            _ => &[],
        }
    }

    /// Short outcome name used in log events.
    pub fn outcome(&self) -> &'static str {
        match self {
            ArchiveResult::Success { .. } => "success",
            ArchiveResult::AlreadyArchived => "already_archived",
            ArchiveResult::Failure { .. } => "failure",
        }
    }
}

impl fmt::Display for ArchiveResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArchiveResult::Success { removed } => write!(f, "success ({} removed)", removed.len()),
            ArchiveResult::AlreadyArchived => f.write_str("already archived"),
            ArchiveResult::Failure { dominated_by } => {
                write!(f, "failure (dominated by {})", dominated_by.len())
            }
        }
    }
}
