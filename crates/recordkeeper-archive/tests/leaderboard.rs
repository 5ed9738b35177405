//! End-to-end tests: a TOML catalog, a registry over a memory store, and
//! submissions read back through the category queries.

use std::sync::Arc;

use recordkeeper_archive::{ArchiveRegistry, ArchiveResult, FrontierStore, MemoryStore};
use recordkeeper_config::CatalogConfig;
use recordkeeper_core::record::{PuzzleId, Record};

const CATALOG: &str = r#"
    [archive]
    verify_frontier = true

    [[families]]
    name = "opus"
    metrics = ["cost", "cycles", "area"]
    flags = [
        { name = "overlap", letter = "O" },
        { name = "trackless", letter = "T" },
        { name = "loop", letter = "L" },
    ]

    [[families.categories]]
    id = "G"
    display_name = "Cost"
    rank = ["cost", "cycles", "area", "flags"]

    [[families.categories]]
    id = "GNOT"
    display_name = "Cost (no overlap, tracks)"
    rank = ["cost", "cycles", "area", "flags"]
    forbid = ["overlap", "trackless"]

    [[families.categories]]
    id = "C"
    display_name = "Cycles"
    rank = ["cycles", "cost", "area", "flags"]

    [[families.categories]]
    id = "CB"
    display_name = "Cycles (cost at most 145)"
    rank = ["cycles", "cost", "area", "flags"]
    limits = { cost = 145 }

    [[puzzles]]
    id = "stabilized-water"
    family = "opus"

    [[puzzles]]
    id = "hangover-cure"
    family = "opus"
    categories = ["G", "C"]
"#;

fn registry(store: Arc<MemoryStore>) -> ArchiveRegistry<Arc<MemoryStore>> {
    let catalog = CatalogConfig::from_toml_str(CATALOG)
        .unwrap()
        .build()
        .unwrap();
    ArchiveRegistry::open(&catalog, store).unwrap()
}

fn submission(puzzle: &str, score: &str, author: &str, content: &str) -> Record {
    let catalog = CatalogConfig::from_toml_str(CATALOG)
        .unwrap()
        .build()
        .unwrap();
    let schema = catalog.get(&puzzle.into()).unwrap().schema().clone();
    Record::builder(puzzle, schema.parse_score(score).unwrap())
        .author(author)
        .content(content)
        .display_link(format!("https://example.com/{}.gif", content))
        .build()
        .unwrap()
}

#[test]
fn test_submissions_update_leaderboard() {
    let store = Arc::new(MemoryStore::new());
    let registry = registry(Arc::clone(&store));
    let water = PuzzleId::from("stabilized-water");

    let cheap = submission("stabilized-water", "60/120/30", "ada", "cheap");
    let fast_overlap = submission("stabilized-water", "150/40/20/O", "bea", "fast");
    let looping = submission("stabilized-water", "140/45/25/L", "cy", "loop");

    assert!(registry.submit(cheap).unwrap().is_success());
    assert!(registry.submit(fast_overlap).unwrap().is_success());
    assert!(registry.submit(looping).unwrap().is_success());

    let holders: Vec<(String, String)> = registry
        .category_holders(&water)
        .unwrap()
        .into_iter()
        .map(|(category, holder)| (category.id().to_string(), holder.record().author().to_string()))
        .collect();
    assert_eq!(
        holders,
        vec![
            ("G".to_string(), "ada".to_string()),
            ("GNOT".to_string(), "ada".to_string()),
            ("C".to_string(), "bea".to_string()),
            ("CB".to_string(), "cy".to_string()),
        ]
    );

    // Same metrics as "fast" without overlap: strictly better flags.
    let clean_fast = submission("stabilized-water", "150/40/20", "dee", "clean fast");
    let result = registry.submit(clean_fast).unwrap();
    assert_eq!(result.removed().len(), 1);
    assert_eq!(result.removed()[0].author(), "bea");

    assert_eq!(store.stored(&water), registry.frontier(&water).unwrap());
    assert_eq!(store.save_count(), 4);
}

#[test]
fn test_category_subset_per_puzzle() {
    let registry = registry(Arc::new(MemoryStore::new()));
    let cure = PuzzleId::from("hangover-cure");

    registry
        .submit(submission("hangover-cure", "100/50/10/OTL", "ada", "all flags"))
        .unwrap();
    let records = registry.category_records(&cure).unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].category_ids(), vec!["G", "C"]);
}

#[test]
fn test_default_penalty_order_for_three_flags() {
    let registry = registry(Arc::new(MemoryStore::new()));

    // Flags are declared most severe first: overlap, trackless, loop.
    let order = [
        ("", "clean"),
        ("L", "loop"),
        ("T", "trackless"),
        ("O", "overlap"),
        ("TL", "trackless loop"),
    ];
    let mut previous: Option<Record> = None;
    for (flags, content) in order.iter().rev() {
        let score = if flags.is_empty() {
            "100/100/100".to_string()
        } else {
            format!("100/100/100/{}", flags)
        };
        let candidate = submission("stabilized-water", &score, "ada", content);
        let result = registry.submit(candidate.clone()).unwrap();
        match &previous {
            None => assert_eq!(result, ArchiveResult::Success { removed: vec![] }),
            Some(beaten) => assert_eq!(
                result,
                ArchiveResult::Success {
                    removed: vec![beaten.clone()]
                },
                "{} should beat {}",
                content,
                beaten.content()
            ),
        }
        previous = Some(candidate);
    }
}

#[test]
fn test_restart_restores_frontier() {
    let store = Arc::new(MemoryStore::new());
    let water = PuzzleId::from("stabilized-water");
    {
        let registry = registry(Arc::clone(&store));
        registry
            .replay(vec![
                submission("stabilized-water", "60/120/30", "ada", "cheap"),
                submission("stabilized-water", "150/40/20", "bea", "fast"),
                submission("stabilized-water", "160/41/21", "cy", "slow"),
            ])
            .unwrap();
    }

    let reopened = registry(Arc::clone(&store));
    let authors: Vec<String> = reopened
        .frontier(&water)
        .unwrap()
        .iter()
        .map(|r| r.author().to_string())
        .collect();
    assert_eq!(authors, vec!["ada", "bea"]);
    assert_eq!(store.load_frontier(&water).unwrap().len(), 2);
}
