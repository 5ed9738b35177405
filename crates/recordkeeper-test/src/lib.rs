//! Shared test fixtures for recordkeeper crates.
//!
//! This crate provides schemas, scores, records and catalogs for testing.
//! It does NOT depend on `recordkeeper-archive` so the archive crate can use
//! it as a dev-dependency without a cycle.
//!
//! - [`spacechem`] - three-metric, two-flag score fixtures
//! - [`catalog`] - ready-built catalogs and puzzle definitions
//!
//! # Usage
//!
//! Add as a dev-dependency in your crate's `Cargo.toml`:
//!
//! ```toml
//! [dev-dependencies]
//! recordkeeper-test = { workspace = true }
//! ```
//!
//! Then import the fixtures you need:
//!
//! ```
//! use recordkeeper_test::spacechem::{record, score};
//!
//! let clean = record(score([100, 100, 100], false, false), "first");
//! assert_eq!(clean.author(), "tester");
//! ```

pub mod catalog;
pub mod spacechem;

pub use catalog::{catalog, definition, PUZZLE, SECOND_PUZZLE};
pub use spacechem::{flags, record, record_by, schema, score, BUGGED, PRECOG};
