//! Tests for the archive registry.

use std::sync::Arc;
use std::thread;

use recordkeeper_config::CatalogConfig;
use recordkeeper_core::record::{PuzzleId, Record};

use crate::error::{ArchiveError, RegistryError};
use crate::registry::ArchiveRegistry;
use crate::store::{FrontierStore, MemoryStore};
use crate::test_utils::{catalog, record, record_by, score, FlakyStore, PUZZLE, SECOND_PUZZLE};

fn puzzle() -> PuzzleId {
    PuzzleId::from(PUZZLE)
}

fn registry() -> ArchiveRegistry<MemoryStore> {
    ArchiveRegistry::open(&catalog(), MemoryStore::new()).unwrap()
}

fn on_second_puzzle(record: &Record) -> Record {
    Record::builder(SECOND_PUZZLE, record.score().clone())
        .author(record.author())
        .content(record.content())
        .build()
        .unwrap()
}

#[test]
fn test_open_creates_every_catalog_puzzle() {
    let registry = registry();
    let mut puzzles: Vec<&str> = registry.puzzles().map(PuzzleId::as_str).collect();
    puzzles.sort();
    assert_eq!(puzzles, vec![PUZZLE, SECOND_PUZZLE]);
    assert!(registry.frontier(&puzzle()).unwrap().is_empty());
}

#[test]
fn test_saves_only_after_success() {
    let registry = registry();
    let best = record(score([10, 10, 10], false, false), "best");

    assert!(registry.submit(best.clone()).unwrap().is_success());
    assert_eq!(registry.store().save_count(), 1);
    assert_eq!(registry.store().stored(&puzzle()), vec![best.clone()]);

    assert!(registry.submit(best).unwrap().is_already_archived());
    let worse = record(score([11, 10, 10], false, false), "worse");
    assert!(registry.submit(worse).unwrap().is_failure());
    assert_eq!(registry.store().save_count(), 1);
}

#[test]
fn test_puzzles_are_independent() {
    let registry = registry();
    let first = record(score([10, 10, 10], false, false), "a");
    let second = on_second_puzzle(&record(score([50, 50, 50], false, false), "b"));

    registry.submit(first.clone()).unwrap();
    registry.submit(second.clone()).unwrap();

    assert_eq!(registry.frontier(&puzzle()).unwrap(), vec![first]);
    assert_eq!(
        registry.frontier(&PuzzleId::from(SECOND_PUZZLE)).unwrap(),
        vec![second]
    );
}

#[test]
fn test_unknown_puzzle() {
    let registry = registry();
    let stray = Record::builder("nowhere", score([1, 1, 1], false, false))
        .author("tester")
        .build()
        .unwrap();

    assert!(matches!(
        registry.submit(stray),
        Err(RegistryError::UnknownPuzzle(_))
    ));
    assert!(matches!(
        registry.category_holders(&PuzzleId::from("nowhere")),
        Err(RegistryError::UnknownPuzzle(_))
    ));
}

#[test]
fn test_open_repairs_stored_frontier() {
    let stored = vec![
        record(score([50, 50, 50], false, false), "old"),
        record(score([40, 40, 40], false, false), "new"),
    ];
    let store = MemoryStore::new().with_frontier(PUZZLE, stored);
    let registry = ArchiveRegistry::open(&catalog(), store).unwrap();

    let frontier = registry.frontier(&puzzle()).unwrap();
    assert_eq!(frontier.len(), 1);
    assert_eq!(frontier[0].content(), "new");
    assert_eq!(registry.store().save_count(), 0);
}

#[test]
fn test_open_without_repair_rejects_broken_frontier() {
    let mut config = CatalogConfig::new().with_puzzle(PUZZLE, "spacechem");
    config.archive.repair_on_load = false;
    let catalog = config.build().unwrap();

    let broken = vec![
        record(score([50, 50, 50], false, false), "old"),
        record(score([40, 40, 40], false, false), "new"),
    ];
    let store = MemoryStore::new().with_frontier(PUZZLE, broken);
    assert!(matches!(
        ArchiveRegistry::open(&catalog, store),
        Err(RegistryError::Archive(ArchiveError::Frontier(_)))
    ));

    let valid = vec![record(score([40, 40, 40], false, false), "new")];
    let store = MemoryStore::new().with_frontier(PUZZLE, valid.clone());
    let registry = ArchiveRegistry::open(&catalog, store).unwrap();
    assert_eq!(registry.frontier(&puzzle()).unwrap(), valid);
}

#[test]
fn test_failed_save_then_reload() {
    let registry = ArchiveRegistry::open(&catalog(), FlakyStore::default()).unwrap();
    let kept = record(score([20, 20, 20], false, false), "kept");
    registry.submit(kept.clone()).unwrap();

    registry.store().set_failing(true);
    let lost = record(score([10, 10, 10], false, false), "lost");
    let err = registry.submit(lost.clone()).unwrap_err();
    assert!(matches!(err, RegistryError::Store { .. }));

    // Memory is ahead of the store until reconciled.
    assert_eq!(registry.frontier(&puzzle()).unwrap(), vec![lost]);

    registry.store().set_failing(false);
    let dropped = registry.reload(&puzzle()).unwrap();
    assert!(dropped.is_empty());
    assert_eq!(registry.frontier(&puzzle()).unwrap(), vec![kept]);
}

#[test]
fn test_reload_reports_dropped_records() {
    let registry = registry();
    let stored = vec![
        record(score([5, 5, 5], false, false), "a"),
        record(score([5, 5, 5], false, false), "a"),
    ];
    registry.store().save_frontier(&puzzle(), &stored).unwrap();

    let dropped = registry.reload(&puzzle()).unwrap();
    assert_eq!(dropped.len(), 1);
    assert_eq!(registry.frontier(&puzzle()).unwrap().len(), 1);
}

#[test]
fn test_replay_groups_by_puzzle() {
    let registry = registry();
    let records = vec![
        record(score([50, 50, 50], false, false), "slow"),
        on_second_puzzle(&record(score([1, 1, 1], false, false), "other")),
        record(score([40, 40, 40], false, false), "fast"),
        record(score([60, 60, 60], false, false), "slower"),
    ];

    let results = registry.replay(records).unwrap();
    let outcomes: Vec<&str> = results.iter().map(|r| r.outcome()).collect();
    assert_eq!(outcomes, vec!["success", "success", "success", "failure"]);
    assert_eq!(results[2].removed().len(), 1);

    // One save per touched puzzle.
    assert_eq!(registry.store().save_count(), 2);
    assert_eq!(registry.frontier(&puzzle()).unwrap().len(), 1);
}

#[test]
fn test_replay_checks_before_mutating() {
    let registry = registry();
    let stray = Record::builder("nowhere", score([1, 1, 1], false, false))
        .author("tester")
        .build()
        .unwrap();
    let records = vec![record(score([5, 5, 5], false, false), "fine"), stray];

    assert!(registry.replay(records).is_err());
    assert!(registry.frontier(&puzzle()).unwrap().is_empty());
    assert_eq!(registry.store().save_count(), 0);
}

#[test]
fn test_replay_continues_past_failed_saves() {
    let registry = ArchiveRegistry::open(&catalog(), FlakyStore::default()).unwrap();
    registry.store().set_failing(true);

    let records = vec![
        record(score([50, 50, 50], false, false), "first"),
        on_second_puzzle(&record(score([1, 1, 1], false, false), "other")),
        record(score([40, 40, 40], false, false), "second"),
    ];
    let (results, unsaved) = match registry.replay(records) {
        Err(RegistryError::ReplayUnsaved { results, unsaved }) => (results, unsaved),
        other => panic!("expected unsaved replay, got {:?}", other),
    };

    let outcomes: Vec<&str> = results.iter().map(|r| r.outcome()).collect();
    assert_eq!(outcomes, vec!["success", "success", "success"]);
    let mut puzzles: Vec<&str> = unsaved.iter().map(|(p, _)| p.as_str()).collect();
    puzzles.sort();
    assert_eq!(puzzles, vec![PUZZLE, SECOND_PUZZLE]);

    // both archives were updated before the store caught up
    assert_eq!(registry.frontier(&puzzle()).unwrap().len(), 1);
    assert_eq!(registry.frontier(&PuzzleId::from(SECOND_PUZZLE)).unwrap().len(), 1);

    registry.store().set_failing(false);
    for (puzzle, _) in &unsaved {
        registry.reload(puzzle).unwrap();
        assert!(registry.frontier(puzzle).unwrap().is_empty());
    }
}

#[test]
fn test_category_queries() {
    let registry = registry();
    registry
        .submit(record_by("alice", score([100, 100, 100], false, false), "clean"))
        .unwrap();
    registry
        .submit(record_by("bob", score([10, 10, 10], true, false), "bugged"))
        .unwrap();

    let holders = registry.category_holders(&puzzle()).unwrap();
    let cycles = holders.iter().find(|(c, _)| c.id() == "C").unwrap();
    assert_eq!(cycles.1.record().author(), "bob");
    let no_bugs = holders.iter().find(|(c, _)| c.id() == "CNB").unwrap();
    assert_eq!(no_bugs.1.record().author(), "alice");

    let records = registry.category_records(&puzzle()).unwrap();
    let authors: Vec<&str> = records.iter().map(|r| r.record().author()).collect();
    assert_eq!(authors, vec!["bob", "alice"]);
}

#[test]
fn test_poisoned_archive() {
    let registry = registry();
    let handle = registry.archive(&puzzle()).unwrap();

    let result = thread::spawn(move || {
        let _guard = handle.lock().unwrap();
        panic!("submission panicked");
    })
    .join();
    assert!(result.is_err());

    let submission = registry.submit(record(score([1, 1, 1], false, false), "late"));
    assert!(matches!(submission, Err(RegistryError::Poisoned(_))));
}

#[test]
fn test_concurrent_submissions_keep_valid_frontier() {
    let registry = Arc::new(registry());

    let workers: Vec<_> = (0..4u64)
        .map(|worker| {
            let registry = Arc::clone(&registry);
            thread::spawn(move || {
                for i in 0..25u64 {
                    let cycles = 10 + (i * 7 + worker * 3) % 20;
                    let symbols = 10 + (i * 5 + worker) % 20;
                    let candidate = record(
                        score([cycles, 5, symbols], worker % 2 == 0, false),
                        &format!("worker {} solution {}", worker, i),
                    );
                    registry.submit(candidate).unwrap();
                }
            })
        })
        .collect();
    for worker in workers {
        worker.join().unwrap();
    }

    let handle = registry.archive(&puzzle()).unwrap();
    let archive = handle.lock().unwrap();
    assert!(archive.check_frontier().is_ok());
    assert_eq!(registry.store().stored(&puzzle()), archive.frontier());
}
