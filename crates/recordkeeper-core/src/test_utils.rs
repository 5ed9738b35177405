//! Test utilities for recordkeeper-core
//!
//! Provides common fixtures used across the crate's test modules.

use crate::category::{Category, Eligibility, RankKey};
use crate::record::Record;
use crate::score::{FlagDef, FlagSet, Score, ScoreSchema};

pub const BUGGED: usize = 0;
pub const PRECOG: usize = 1;

/// Three metrics, bugged and precognitive flags, default penalty order.
pub fn schema() -> ScoreSchema {
    ScoreSchema::new(
        "spacechem",
        ["cycles", "reactors", "symbols"],
        vec![
            FlagDef::new("bugged", 'B'),
            FlagDef::new("precognitive", 'P'),
        ],
    )
    .unwrap()
}

pub fn flags(bugged: bool, precog: bool) -> FlagSet {
    let mut set = FlagSet::EMPTY;
    if bugged {
        set = set.with(BUGGED);
    }
    if precog {
        set = set.with(PRECOG);
    }
    set
}

pub fn score(m: [u64; 3], bugged: bool, precog: bool) -> Score {
    schema().score(&m, flags(bugged, precog)).unwrap()
}

pub fn record(score: Score, content: &str) -> Record {
    Record::builder("research_example_1", score)
        .author("tester")
        .content(content)
        .build()
        .unwrap()
}

/// Ranks cycles, then reactors, symbols, and flags.
pub fn cycles_category(id: &str, forbidden: FlagSet) -> Category {
    Category::new(
        id,
        vec![
            RankKey::Metric(0),
            RankKey::Metric(1),
            RankKey::Metric(2),
            RankKey::Flags,
        ],
    )
    .with_eligibility(Eligibility::any().forbid(forbidden))
}
