//! Durable storage seam for archived frontiers.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use recordkeeper_core::record::{PuzzleId, Record};

use crate::error::StoreError;

/// Loads and saves whole frontiers.
///
/// Saving overwrites the stored frontier of a puzzle; it never appends.
/// Implementations are shared between threads by the registry, which calls
/// them outside any archive lock.
pub trait FrontierStore: Send + Sync {
    /// Loads the stored frontier of `puzzle`, empty if nothing is stored.
    fn load_frontier(&self, puzzle: &PuzzleId) -> Result<Vec<Record>, StoreError>;

    /// Replaces the stored frontier of `puzzle` with `records`.
    fn save_frontier(&self, puzzle: &PuzzleId, records: &[Record]) -> Result<(), StoreError>;
}

impl<S: FrontierStore + ?Sized> FrontierStore for std::sync::Arc<S> {
    fn load_frontier(&self, puzzle: &PuzzleId) -> Result<Vec<Record>, StoreError> {
        (**self).load_frontier(puzzle)
    }

    fn save_frontier(&self, puzzle: &PuzzleId, records: &[Record]) -> Result<(), StoreError> {
        (**self).save_frontier(puzzle, records)
    }
}

/// Thread-safe in-memory store.
#[derive(Debug, Default)]
pub struct MemoryStore {
    frontiers: Mutex<HashMap<PuzzleId, Vec<Record>>>,
    saves: AtomicUsize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-populates the stored frontier of a puzzle.
    pub fn with_frontier(self, puzzle: impl Into<PuzzleId>, records: Vec<Record>) -> Self {
        if let Ok(mut frontiers) = self.frontiers.lock() {
            frontiers.insert(puzzle.into(), records);
        }
        self
    }

    /// Number of successful saves so far.
    pub fn save_count(&self) -> usize {
        self.saves.load(Ordering::SeqCst)
    }

    /// Copy of the stored frontier of `puzzle`.
    pub fn stored(&self, puzzle: &PuzzleId) -> Vec<Record> {
        self.load_frontier(puzzle).unwrap_or_default()
    }
}

impl FrontierStore for MemoryStore {
    fn load_frontier(&self, puzzle: &PuzzleId) -> Result<Vec<Record>, StoreError> {
        let frontiers = self
            .frontiers
            .lock()
            .map_err(|_| StoreError::Backend("memory store lock poisoned".into()))?;
        Ok(frontiers.get(puzzle).cloned().unwrap_or_default())
    }

    fn save_frontier(&self, puzzle: &PuzzleId, records: &[Record]) -> Result<(), StoreError> {
        let mut frontiers = self
            .frontiers
            .lock()
            .map_err(|_| StoreError::Backend("memory store lock poisoned".into()))?;
        frontiers.insert(puzzle.clone(), records.to_vec());
        self.saves.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
