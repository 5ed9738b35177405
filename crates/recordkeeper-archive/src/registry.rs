//! ArchiveRegistry - per-puzzle archives shared across threads
//!
//! The registry owns one [`Archive`] per catalog puzzle behind its own mutex.
//! The puzzle map never changes after [`ArchiveRegistry::open`], so
//! submissions for different puzzles never contend. A submission holds its
//! puzzle's lock only while the archive decides; the frontier snapshot is
//! saved after the lock is released.
//!
//! Snapshots carry the archive revision they were taken at. Saves for one
//! puzzle are serialized and a snapshot older than the last saved one is
//! skipped, so the store always ends up with the newest frontier.
//!
//! Logging levels:
//! - **INFO**: every submission outcome
//! - **DEBUG**: frontier loads and skipped stale saves
//! - **WARN**: save failures and stored frontiers repaired on load

use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex, MutexGuard};

use recordkeeper_config::Catalog;
use recordkeeper_core::category::Category;
use recordkeeper_core::record::{PuzzleId, Record};
use tracing::{debug, info, warn};

use crate::archive::Archive;
use crate::category_record::CategoryRecord;
use crate::error::{RegistryError, Result};
use crate::result::ArchiveResult;
use crate::store::FrontierStore;

struct Slot {
    archive: Arc<Mutex<Archive>>,
    // revision of the last frontier handed to the store
    saved: Mutex<u64>,
}

/// A frontier copied out of an archive for saving.
struct Snapshot {
    revision: u64,
    frontier: Vec<Record>,
}

impl Snapshot {
    fn of(archive: &Archive) -> Self {
        Snapshot {
            revision: archive.revision(),
            frontier: archive.frontier().to_vec(),
        }
    }
}

/// Process-wide map from puzzle to archive.
///
/// # Examples
///
/// ```
/// use recordkeeper_archive::{ArchiveRegistry, MemoryStore};
/// use recordkeeper_test::{catalog, record, score, PUZZLE};
///
/// let registry = ArchiveRegistry::open(&catalog(), MemoryStore::new()).unwrap();
///
/// let result = registry
///     .submit(record(score([45, 1, 14], false, false), "body"))
///     .unwrap();
/// assert!(result.is_success());
///
/// let holders = registry.category_holders(&PUZZLE.into()).unwrap();
/// assert_eq!(holders.len(), 9);
/// assert_eq!(registry.store().save_count(), 1);
/// ```
pub struct ArchiveRegistry<S> {
    slots: HashMap<PuzzleId, Slot>,
    store: S,
    repair_on_load: bool,
}

impl<S: FrontierStore> ArchiveRegistry<S> {
    /// Creates an archive for every catalog puzzle and loads its stored
    /// frontier.
    ///
    /// With `repair_on_load` set, stored frontiers are rebuilt through the
    /// insertion algorithm and dominated entries dropped. Otherwise a stored
    /// frontier that breaks the invariant is an error.
    pub fn open(catalog: &Catalog, store: S) -> Result<Self> {
        let settings = catalog.settings();
        let mut registry = ArchiveRegistry {
            slots: HashMap::with_capacity(catalog.len()),
            store,
            repair_on_load: settings.repair_on_load,
        };

        for definition in catalog.puzzles() {
            let mut archive =
                Archive::new(definition.clone()).with_verification(settings.verify_frontier);
            registry.load_into(&mut archive)?;
            let slot = Slot {
                saved: Mutex::new(archive.revision()),
                archive: Arc::new(Mutex::new(archive)),
            };
            registry.slots.insert(definition.id().clone(), slot);
        }

        Ok(registry)
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Registered puzzles, in no particular order.
    pub fn puzzles(&self) -> impl Iterator<Item = &PuzzleId> {
        self.slots.keys()
    }

    /// Shared handle to a puzzle's archive.
    ///
    /// Changes made through the handle are not saved.
    pub fn archive(&self, puzzle: &PuzzleId) -> Option<Arc<Mutex<Archive>>> {
        self.slots.get(puzzle).map(|slot| Arc::clone(&slot.archive))
    }

    /// Offers a record to its puzzle's archive and saves the new frontier on
    /// success.
    ///
    /// # Errors
    ///
    /// A failed save leaves the in-memory archive ahead of the store and is
    /// reported as [`RegistryError::Store`]; [`ArchiveRegistry::reload`]
    /// reconciles the two.
    pub fn submit(&self, record: Record) -> Result<ArchiveResult> {
        let puzzle = record.puzzle().clone();
        let (result, score, snapshot) = {
            let mut archive = self.lock(&puzzle)?;
            let score = archive.schema().display(record.score()).to_string();
            let result = archive.archive(record)?;
            let snapshot = result.is_success().then(|| Snapshot::of(&archive));
            (result, score, snapshot)
        };

        info!(
            event = "archive",
            puzzle = %puzzle,
            score = %score,
            outcome = result.outcome(),
            removed = result.removed().len(),
        );

        if let Some(snapshot) = snapshot {
            self.save(&puzzle, snapshot)?;
        }
        Ok(result)
    }

    /// Offers a batch of records, possibly spanning puzzles, and returns one
    /// result per input in input order.
    ///
    /// Every record is checked against its archive before any archive
    /// changes. Each touched puzzle is locked once and saved once, if any of
    /// its records succeeded.
    ///
    /// # Errors
    ///
    /// A failed save does not stop the replay. Once every puzzle has been
    /// processed, [`RegistryError::ReplayUnsaved`] carries the results
    /// together with the puzzles that need [`ArchiveRegistry::reload`].
    pub fn replay(&self, records: impl IntoIterator<Item = Record>) -> Result<Vec<ArchiveResult>> {
        let mut batches: BTreeMap<PuzzleId, Vec<(usize, Record)>> = BTreeMap::new();
        let mut total = 0;
        for (position, record) in records.into_iter().enumerate() {
            batches
                .entry(record.puzzle().clone())
                .or_default()
                .push((position, record));
            total += 1;
        }

        for (puzzle, batch) in &batches {
            let archive = self.lock(puzzle)?;
            for (_, record) in batch {
                archive.check_candidate(record)?;
            }
        }

        let mut results: Vec<Option<ArchiveResult>> = vec![None; total];
        let mut unsaved = Vec::new();
        for (puzzle, batch) in batches {
            let (successes, snapshot) = {
                let mut archive = self.lock(&puzzle)?;
                let mut successes = 0usize;
                for (position, record) in batch {
                    let result = archive.archive(record)?;
                    if result.is_success() {
                        successes += 1;
                    }
                    results[position] = Some(result);
                }
                let snapshot = (successes > 0).then(|| Snapshot::of(&archive));
                (successes, snapshot)
            };

            info!(event = "replay", puzzle = %puzzle, successes);
            if let Some(snapshot) = snapshot {
                match self.save(&puzzle, snapshot) {
                    Ok(()) => {}
                    Err(RegistryError::Store { puzzle, source }) => unsaved.push((puzzle, source)),
                    Err(other) => return Err(other),
                }
            }
        }

        let results = results.into_iter().flatten().collect();
        if unsaved.is_empty() {
            Ok(results)
        } else {
            Err(RegistryError::ReplayUnsaved { results, unsaved })
        }
    }

    /// Discards a puzzle's in-memory frontier and rebuilds it from the store.
    ///
    /// Returns the stored records that did not survive the rebuild.
    pub fn reload(&self, puzzle: &PuzzleId) -> Result<Vec<Record>> {
        let mut saved = self.saved(puzzle)?;

        let stored = self.load(puzzle)?;
        let (dropped, revision) = {
            let mut archive = self.lock(puzzle)?;
            let dropped = archive.replace_all(stored)?;
            (dropped, archive.revision())
        };
        *saved = revision;

        if !dropped.is_empty() {
            warn!(event = "frontier_repaired", puzzle = %puzzle, dropped = dropped.len());
        }
        Ok(dropped)
    }

    /// Snapshot of a puzzle's frontier.
    pub fn frontier(&self, puzzle: &PuzzleId) -> Result<Vec<Record>> {
        Ok(self.lock(puzzle)?.frontier().to_vec())
    }

    /// Every held category of a puzzle mapped to its holder, in category
    /// declaration order.
    pub fn category_holders(&self, puzzle: &PuzzleId) -> Result<Vec<(Category, CategoryRecord)>> {
        Ok(self.lock(puzzle)?.category_holders())
    }

    /// Category holders of a puzzle grouped per record.
    pub fn category_records(&self, puzzle: &PuzzleId) -> Result<Vec<CategoryRecord>> {
        Ok(self.lock(puzzle)?.category_records())
    }

    fn slot(&self, puzzle: &PuzzleId) -> Result<&Slot> {
        self.slots
            .get(puzzle)
            .ok_or_else(|| RegistryError::UnknownPuzzle(puzzle.clone()))
    }

    fn lock(&self, puzzle: &PuzzleId) -> Result<MutexGuard<'_, Archive>> {
        self.slot(puzzle)?
            .archive
            .lock()
            .map_err(|_| RegistryError::Poisoned(puzzle.clone()))
    }

    fn saved(&self, puzzle: &PuzzleId) -> Result<MutexGuard<'_, u64>> {
        self.slot(puzzle)?
            .saved
            .lock()
            .map_err(|_| RegistryError::Poisoned(puzzle.clone()))
    }

    fn load(&self, puzzle: &PuzzleId) -> Result<Vec<Record>> {
        let stored = self
            .store
            .load_frontier(puzzle)
            .map_err(|source| RegistryError::Store {
                puzzle: puzzle.clone(),
                source,
            })?;
        debug!(event = "frontier_load", puzzle = %puzzle, records = stored.len());
        Ok(stored)
    }

    fn load_into(&self, archive: &mut Archive) -> Result<()> {
        let puzzle = archive.puzzle().clone();
        let stored = self.load(&puzzle)?;
        if self.repair_on_load {
            let dropped = archive.replace_all(stored)?;
            if !dropped.is_empty() {
                warn!(event = "frontier_repaired", puzzle = %puzzle, dropped = dropped.len());
            }
        } else {
            archive.restore(stored)?;
        }
        Ok(())
    }

    fn save(&self, puzzle: &PuzzleId, snapshot: Snapshot) -> Result<()> {
        let mut saved = self.saved(puzzle)?;
        if snapshot.revision <= *saved {
            debug!(
                event = "save_skipped",
                puzzle = %puzzle,
                revision = snapshot.revision,
                saved = *saved,
            );
            return Ok(());
        }

        match self.store.save_frontier(puzzle, &snapshot.frontier) {
            Ok(()) => {
                *saved = snapshot.revision;
                Ok(())
            }
            Err(source) => {
                warn!(event = "save_failed", puzzle = %puzzle, error = %source);
                Err(RegistryError::Store {
                    puzzle: puzzle.clone(),
                    source,
                })
            }
        }
    }
}
