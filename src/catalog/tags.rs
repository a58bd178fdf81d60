//! Tag index over a product table.
//!
//! Every family is listed under each of its own tags. Rule application and
//! tag lookups go through this index instead of re-walking the catalog tree.

use crate::catalog::table::ProductTable;
use std::collections::{BTreeMap, BTreeSet};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagIndex {
    by_tag: BTreeMap<String, BTreeSet<usize>>,
}

impl TagIndex {
    /// Index every family of `table` under each of its tags.
    pub fn build(table: &ProductTable) -> Self {
        let mut by_tag: BTreeMap<String, BTreeSet<usize>> = BTreeMap::new();
        for (idx, family) in table.families().iter().enumerate() {
            for tag in &family.tags {
                by_tag.entry(tag.clone()).or_default().insert(idx);
            }
        }
        Self { by_tag }
    }

    /// Table positions of every family carrying any of `tags`, deduplicated
    /// and in catalog order. Unknown tags contribute nothing.
    pub fn resolve<S: AsRef<str>>(&self, tags: &[S]) -> BTreeSet<usize> {
        tags.iter()
            .filter_map(|tag| self.by_tag.get(tag.as_ref()))
            .flatten()
            .copied()
            .collect()
    }

    /// Whether any family carries `tag`.
    pub fn contains(&self, tag: &str) -> bool {
        self.by_tag.contains_key(tag)
    }
}
