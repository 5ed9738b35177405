//! recordkeeper Archive Engine
//!
//! This crate keeps the leaderboard state of every puzzle:
//! - [`Archive`]: the Pareto frontier of one puzzle and its category holders
//! - [`ArchiveResult`]: the outcome of a submission
//! - [`CategoryRecord`]: a frontier record with the categories it holds
//! - [`FrontierStore`]: the load/save seam to durable storage
//! - [`ArchiveRegistry`]: thread-safe per-puzzle archives over a store

pub mod archive;
pub mod category_record;
pub mod error;
pub mod registry;
pub mod result;
pub mod store;

#[cfg(test)]
mod registry_tests;
#[cfg(test)]
mod test_utils;

pub use archive::Archive;
pub use category_record::CategoryRecord;
pub use error::{ArchiveError, FrontierViolation, RegistryError, StoreError};
pub use registry::ArchiveRegistry;
pub use result::ArchiveResult;
pub use store::{FrontierStore, MemoryStore};
