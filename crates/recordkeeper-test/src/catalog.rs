//! Catalog fixtures.

use recordkeeper_config::{Catalog, CatalogConfig, PuzzleDefinition};
use recordkeeper_core::record::PuzzleId;

/// Puzzle every [`crate::spacechem`] record belongs to.
pub const PUZZLE: &str = "research_example_1";

/// A second puzzle of the same family, for isolation tests.
pub const SECOND_PUZZLE: &str = "research_example_2";

/// Both fixture puzzles under the built-in family, with frontier
/// verification enabled.
pub fn catalog() -> Catalog {
    CatalogConfig::new()
        .with_verify_frontier(true)
        .with_puzzle(PUZZLE, "spacechem")
        .with_puzzle(SECOND_PUZZLE, "spacechem")
        .build()
        .expect("fixture catalog is valid")
}

/// The resolved definition of [`PUZZLE`].
pub fn definition() -> PuzzleDefinition {
    catalog()
        .get(&PuzzleId::from(PUZZLE))
        .cloned()
        .expect("fixture puzzle is defined")
}
