//! Archive - the Pareto frontier of one puzzle
//!
//! The archive holds exactly the records no other record dominates. A record
//! `x` dominates `y` when `x` is no worse on every metric, no worse under the
//! flag penalty order, and strictly better on at least one of the two.
//!
//! Logging levels:
//! - **DEBUG**: frontier rebuilds and category recomputation
//! - **ERROR**: a broken frontier found by verification

use recordkeeper_config::PuzzleDefinition;
use recordkeeper_core::category::Category;
use recordkeeper_core::record::{PuzzleId, Record};
use recordkeeper_core::score::ScoreSchema;
use tracing::{debug, error};

use crate::category_record::CategoryRecord;
use crate::error::{ArchiveError, FrontierViolation};
use crate::result::ArchiveResult;

/// All surviving records of one puzzle.
///
/// Records are kept in insertion order, which is what breaks exact ranking
/// ties in favour of the first record to arrive.
///
/// # Examples
///
/// ```
/// use recordkeeper_archive::Archive;
/// use recordkeeper_test::{definition, record, score};
///
/// let mut archive = Archive::new(definition());
///
/// let slow = record(score([100, 100, 100], false, false), "slow");
/// let fast = record(score([50, 100, 100], false, false), "fast");
///
/// assert!(archive.archive(slow).unwrap().is_success());
/// let result = archive.archive(fast).unwrap();
///
/// assert_eq!(result.removed().len(), 1);
/// assert_eq!(archive.len(), 1);
/// ```
#[derive(Debug, Clone)]
pub struct Archive {
    definition: PuzzleDefinition,
    records: Vec<Record>,
    revision: u64,
    verify: bool,
}

impl Archive {
    /// Creates an empty archive for the puzzle.
    pub fn new(definition: PuzzleDefinition) -> Self {
        Archive {
            definition,
            records: Vec::new(),
            revision: 0,
            verify: false,
        }
    }

    /// Re-checks the whole frontier after every mutation, in release builds
    /// too. Debug builds always check.
    pub fn with_verification(mut self, verify: bool) -> Self {
        self.verify = verify;
        self
    }

    pub fn puzzle(&self) -> &PuzzleId {
        self.definition.id()
    }

    pub fn definition(&self) -> &PuzzleDefinition {
        &self.definition
    }

    pub fn schema(&self) -> &ScoreSchema {
        self.definition.schema()
    }

    pub fn categories(&self) -> &[Category] {
        self.definition.categories()
    }

    /// Current frontier, in insertion order.
    pub fn frontier(&self) -> &[Record] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Counts frontier changes; bumped by every successful submission,
    /// rebuild and restore.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Offers a record to the frontier.
    ///
    /// Returns [`ArchiveResult::AlreadyArchived`] if an equal-score record
    /// with the same normalized content is present, and
    /// [`ArchiveResult::Failure`] if any record dominates the candidate. In
    /// both cases the archive is unchanged. Otherwise the candidate is
    /// appended and every record it dominates is removed.
    ///
    /// # Errors
    ///
    /// Fails without touching the archive if the record belongs to another
    /// puzzle or its score does not fit the puzzle's schema.
    pub fn archive(&mut self, candidate: Record) -> Result<ArchiveResult, ArchiveError> {
        self.check_candidate(&candidate)?;
        if let Some(rejected) = self.reject(&candidate) {
            return Ok(rejected);
        }

        let removed = self.commit(candidate);
        self.revision += 1;
        self.verify_frontier();
        Ok(ArchiveResult::Success { removed })
    }

    /// Offers each record in turn, returning one result per input.
    ///
    /// Final frontier membership does not depend on the order of `records`;
    /// only which of several equal-score records arrives first does.
    pub fn archive_all(
        &mut self,
        records: impl IntoIterator<Item = Record>,
    ) -> Vec<Result<ArchiveResult, ArchiveError>> {
        records
            .into_iter()
            .map(|record| self.archive(record))
            .collect()
    }

    /// Replaces the frontier with `records`, rebuilt through the insertion
    /// algorithm.
    ///
    /// Records that would not survive insertion (dominated or duplicated
    /// entries in stored data) are dropped and returned.
    ///
    /// # Errors
    ///
    /// Fails without touching the archive if any record does not belong to
    /// this puzzle.
    pub fn replace_all(
        &mut self,
        records: impl IntoIterator<Item = Record>,
    ) -> Result<Vec<Record>, ArchiveError> {
        let records: Vec<Record> = records.into_iter().collect();
        for record in &records {
            self.check_candidate(record)?;
        }

        let offered = records.len();
        self.records.clear();
        let mut dropped = Vec::new();
        for record in records {
            if self.reject(&record).is_some() {
                dropped.push(record);
            } else {
                dropped.extend(self.commit(record));
            }
        }

        debug!(
            event = "frontier_rebuild",
            puzzle = %self.puzzle(),
            offered,
            kept = self.records.len(),
            dropped = dropped.len(),
        );
        self.revision += 1;
        self.verify_frontier();
        Ok(dropped)
    }

    /// Installs `records` as the frontier verbatim, provided they already
    /// form a valid frontier.
    ///
    /// # Errors
    ///
    /// Fails without touching the archive on a foreign record or if any
    /// record dominates or duplicates another.
    pub fn restore(&mut self, records: Vec<Record>) -> Result<(), ArchiveError> {
        for record in &records {
            self.check_candidate(record)?;
        }
        check_records(self.puzzle(), self.schema(), &records)?;
        self.records = records;
        self.revision += 1;
        Ok(())
    }

    /// Checks that no frontier record dominates or duplicates another.
    pub fn check_frontier(&self) -> Result<(), FrontierViolation> {
        check_records(self.puzzle(), self.schema(), &self.records)
    }

    /// The best eligible record of every category, in declaration order.
    ///
    /// `None` marks a category no frontier record is eligible for.
    pub fn holders(&self) -> Vec<(&Category, Option<&Record>)> {
        let schema = self.schema();
        self.categories()
            .iter()
            .map(|category| (category, category.best(schema, &self.records, Record::score)))
            .collect()
    }

    /// The holder of one category, matched case-insensitively by id.
    pub fn holder(&self, category_id: &str) -> Option<&Record> {
        let category = self.definition.category(category_id)?;
        category.best(self.schema(), &self.records, Record::score)
    }

    /// Every held category mapped to its holder.
    ///
    /// Categories without an eligible record are omitted. Each
    /// [`CategoryRecord`] lists all categories its record holds, not just
    /// the one it is paired with.
    pub fn category_holders(&self) -> Vec<(Category, CategoryRecord)> {
        let holders = self.holder_indices();
        let grouped = self.group_holders(&holders);

        let result: Vec<(Category, CategoryRecord)> = self
            .categories()
            .iter()
            .zip(&holders)
            .filter_map(|(category, index)| {
                let index = (*index)?;
                let (_, record) = grouped.iter().find(|(i, _)| *i == index)?;
                Some((category.clone(), record.clone()))
            })
            .collect();

        debug!(
            event = "categories",
            puzzle = %self.puzzle(),
            categories = self.categories().len(),
            held = result.len(),
        );
        result
    }

    /// One entry per record holding at least one category, ordered by the
    /// first category each holds.
    pub fn category_records(&self) -> Vec<CategoryRecord> {
        let holders = self.holder_indices();
        self.group_holders(&holders)
            .into_iter()
            .map(|(_, record)| record)
            .collect()
    }

    fn holder_indices(&self) -> Vec<Option<usize>> {
        self.holders()
            .into_iter()
            .map(|(_, holder)| {
                holder.and_then(|best| self.records.iter().position(|r| std::ptr::eq(r, best)))
            })
            .collect()
    }

    fn group_holders(&self, holders: &[Option<usize>]) -> Vec<(usize, CategoryRecord)> {
        let mut order: Vec<usize> = Vec::new();
        for index in holders.iter().flatten() {
            if !order.contains(index) {
                order.push(*index);
            }
        }

        order
            .into_iter()
            .map(|index| {
                let categories = self
                    .categories()
                    .iter()
                    .zip(holders)
                    .filter(|(_, holder)| **holder == Some(index))
                    .map(|(category, _)| category.clone())
                    .collect();
                (
                    index,
                    CategoryRecord::new(self.records[index].clone(), categories),
                )
            })
            .collect()
    }

    /// Checks that `candidate` belongs to this puzzle and fits its schema,
    /// without judging its score.
    pub fn check_candidate(&self, candidate: &Record) -> Result<(), ArchiveError> {
        if candidate.puzzle() != self.puzzle() {
            return Err(ArchiveError::WrongPuzzle {
                expected: self.puzzle().clone(),
                actual: candidate.puzzle().clone(),
            });
        }
        self.schema().check(candidate.score())?;
        Ok(())
    }

    // The outcome for a candidate that must not enter the frontier.
    fn reject(&self, candidate: &Record) -> Option<ArchiveResult> {
        let schema = self.schema();
        let score = candidate.score();

        if self
            .records
            .iter()
            .any(|r| r.score() == score && r.is_content_identical(candidate))
        {
            return Some(ArchiveResult::AlreadyArchived);
        }

        let dominated_by: Vec<Record> = self
            .records
            .iter()
            .filter(|r| schema.dominates(r.score(), score))
            .cloned()
            .collect();
        if dominated_by.is_empty() {
            None
        } else {
            Some(ArchiveResult::Failure { dominated_by })
        }
    }

    // Appends an accepted candidate and evicts what it dominates.
    fn commit(&mut self, candidate: Record) -> Vec<Record> {
        let schema = self.definition.schema();
        let (removed, kept): (Vec<Record>, Vec<Record>) = std::mem::take(&mut self.records)
            .into_iter()
            .partition(|r| schema.dominates(candidate.score(), r.score()));
        self.records = kept;
        self.records.push(candidate);
        removed
    }

    fn verify_frontier(&self) {
        if !(self.verify || cfg!(debug_assertions)) {
            return;
        }
        let checked = self.check_frontier();
        if let Err(violation) = &checked {
            error!(event = "frontier_violation", puzzle = %self.puzzle(), %violation);
        }
        debug_assert!(checked.is_ok(), "frontier invariant broken: {:?}", checked);
    }
}

fn check_records(
    puzzle: &PuzzleId,
    schema: &ScoreSchema,
    records: &[Record],
) -> Result<(), FrontierViolation> {
    for (i, a) in records.iter().enumerate() {
        for b in &records[i + 1..] {
            if a.score() == b.score() && a.is_content_identical(b) {
                return Err(FrontierViolation::Duplicate {
                    puzzle: puzzle.clone(),
                    score: a.score().clone(),
                });
            }
            let (dominating, dominated) = if schema.dominates(a.score(), b.score()) {
                (a, b)
            } else if schema.dominates(b.score(), a.score()) {
                (b, a)
            } else {
                continue;
            };
            return Err(FrontierViolation::Dominated {
                puzzle: puzzle.clone(),
                dominating: dominating.score().clone(),
                dominated: dominated.score().clone(),
            });
        }
    }
    Ok(())
}
