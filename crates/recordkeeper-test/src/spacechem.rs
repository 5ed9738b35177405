//! SpaceChem-style score fixtures.
//!
//! Metrics are cycles, reactors and symbols; flag 0 is `bugged` (`B`),
//! flag 1 is `precognitive` (`P`).

use recordkeeper_core::record::Record;
use recordkeeper_core::score::{FlagDef, FlagSet, Score, ScoreSchema};

use crate::catalog::PUZZLE;

/// Index of the bugged flag.
pub const BUGGED: usize = 0;
/// Index of the precognitive flag.
pub const PRECOG: usize = 1;

/// The built-in two-flag family schema with the default penalty order.
pub fn schema() -> ScoreSchema {
    ScoreSchema::new(
        "spacechem",
        ["cycles", "reactors", "symbols"],
        vec![
            FlagDef::new("bugged", 'B'),
            FlagDef::new("precognitive", 'P'),
        ],
    )
    .expect("fixture schema is valid")
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

/// Builds a `cycles/reactors/symbols` score.
pub fn score(metrics: [u64; 3], bugged: bool, precog: bool) -> Score {
    schema()
        .score(&metrics, flags(bugged, precog))
        .expect("fixture score is valid")
}

/// A record on [`PUZZLE`] by `tester`.
pub fn record(score: Score, content: &str) -> Record {
    record_by("tester", score, content)
}

/// A record on [`PUZZLE`] by `author`.
pub fn record_by(author: &str, score: Score, content: &str) -> Record {
    Record::builder(PUZZLE, score)
        .author(author)
        .content(content)
        .build()
        .expect("fixture record is valid")
}
