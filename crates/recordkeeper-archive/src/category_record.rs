//! CategoryRecord - a frontier record with the categories it holds

use recordkeeper_core::category::Category;
use recordkeeper_core::record::Record;

/// Read-only projection of a record and every category it currently holds.
///
/// Built fresh on each query; it is never updated in place.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryRecord {
    record: Record,
    categories: Vec<Category>,
}

impl CategoryRecord {
    pub(crate) fn new(record: Record, categories: Vec<Category>) -> Self {
        CategoryRecord { record, categories }
    }

    pub fn record(&self) -> &Record {
        &self.record
    }

    /// Held categories, in the puzzle's declaration order.
    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    pub fn category_ids(&self) -> Vec<&str> {
        self.categories.iter().map(Category::id).collect()
    }

    pub fn holds(&self, category_id: &str) -> bool {
        self.categories
            .iter()
            .any(|c| c.id().eq_ignore_ascii_case(category_id))
    }

    pub fn into_record(self) -> Record {
        self.record
    }
}
