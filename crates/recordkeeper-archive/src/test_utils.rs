//! Test utilities for recordkeeper-archive
//!
//! Re-exports fixtures from recordkeeper-test and adds archive-specific
//! helpers.

use std::sync::atomic::{AtomicBool, Ordering};

use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use recordkeeper_core::record::{PuzzleId, Record};

pub use recordkeeper_test::{catalog, definition, record, record_by, score, PUZZLE, SECOND_PUZZLE};

use crate::archive::Archive;
use crate::error::StoreError;
use crate::store::{FrontierStore, MemoryStore};

/// An empty, verifying archive for [`PUZZLE`].
pub fn archive() -> Archive {
    Archive::new(definition()).with_verification(true)
}

/// Archives `records` in order, asserting nothing.
pub fn archive_of(records: &[Record]) -> Archive {
    let mut archive = archive();
    for record in records {
        archive.archive(record.clone()).unwrap();
    }
    archive
}

/// Frontier contents as sorted `(score, content)` descriptions.
pub fn membership(archive: &Archive) -> Vec<String> {
    let schema = archive.schema();
    let mut entries: Vec<String> = archive
        .frontier()
        .iter()
        .map(|r| format!("{} {}", schema.display(r.score()), r.normalized_content()))
        .collect();
    entries.sort();
    entries
}

/// Deterministic shuffle.
pub fn shuffled(records: &[Record], seed: u64) -> Vec<Record> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut records = records.to_vec();
    records.shuffle(&mut rng);
    records
}

/// A store whose saves fail while `failing` is set.
#[derive(Debug, Default)]
pub struct FlakyStore {
    pub inner: MemoryStore,
    pub failing: AtomicBool,
}

impl FlakyStore {
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }
}

impl FrontierStore for FlakyStore {
    fn load_frontier(&self, puzzle: &PuzzleId) -> Result<Vec<Record>, StoreError> {
        self.inner.load_frontier(puzzle)
    }

    fn save_frontier(&self, puzzle: &PuzzleId, records: &[Record]) -> Result<(), StoreError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(StoreError::Backend("disk full".into()));
        }
        self.inner.save_frontier(puzzle, records)
    }
}
