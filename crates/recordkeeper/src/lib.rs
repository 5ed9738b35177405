//! recordkeeper - Pareto frontier leaderboards for puzzle solutions
//!
//! Scores have several lower-is-better metrics plus penalty flags. Every
//! puzzle keeps only the submissions nothing else beats, and each
//! leaderboard category points at its best eligible submission.
//!
//! # Example
//!
//! ```rust
//! use recordkeeper::prelude::*;
//!
//! let catalog = CatalogConfig::new()
//!     .with_puzzle("research_example_1", "spacechem")
//!     .build()
//!     .unwrap();
//! let registry = ArchiveRegistry::open(&catalog, MemoryStore::new()).unwrap();
//!
//! let puzzle = catalog.get(&"research_example_1".into()).unwrap();
//! let score = puzzle.schema().parse_score("45/1/14").unwrap();
//! let record = Record::builder("research_example_1", score)
//!     .author("12345ieee")
//!     .content("SOLUTION:Of Pancakes and Spaceships,12345ieee,45-1-14")
//!     .build()
//!     .unwrap();
//!
//! assert!(registry.submit(record).unwrap().is_success());
//! let records = registry.category_records(puzzle.id()).unwrap();
//! assert_eq!(records[0].categories().len(), 9);
//! ```

// Score, category and record types
pub use recordkeeper_core::{
    normalize_content, Category, CategoryError, CoreError, Eligibility, FlagDef,
    FlagPenaltyOrder, FlagSet, MetricComparison, PuzzleId, RankKey, Record, RecordBuilder,
    RecordError, SchemaError, Score, ScoreError, ScoreParseError, ScoreSchema,
};

// Catalog configuration
pub use recordkeeper_config::{
    ArchiveSettings, Catalog, CatalogConfig, CategoryConfig, ConfigError, FamilyConfig,
    FlagConfig, PuzzleConfig, PuzzleDefinition,
};

// Archive engine
pub use recordkeeper_archive::{
    Archive, ArchiveError, ArchiveRegistry, ArchiveResult, CategoryRecord, FrontierStore,
    FrontierViolation, MemoryStore, RegistryError, StoreError,
};

#[cfg(feature = "console")]
pub mod console;

pub mod prelude {
    pub use super::{ArchiveRegistry, ArchiveResult, CategoryRecord, FrontierStore, MemoryStore};
    pub use super::{Catalog, CatalogConfig, PuzzleDefinition};
    pub use super::{Category, FlagSet, PuzzleId, Record, Score, ScoreSchema};
}
