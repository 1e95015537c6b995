//! An in-memory implementation of the `RecordStore` trait.
//!
//! Note: this is compiled even in the "production" version of this app so
//! that the whole pipeline can run without a database file. It is also what
//! the engine tests run against.
//!
//! The record set lives behind an `Arc` snapshot; `replace_all` swaps the
//! snapshot in one assignment, so readers always see a complete set.

use crate::model::SaleRecord;
use crate::store::{CategoryCount, RecordFilter, RecordStore};
use crate::Result;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

#[derive(Debug, Default)]
pub struct MemoryStore {
    snapshot: RwLock<Arc<Vec<SaleRecord>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store pre-populated with `records`, in insertion order.
    pub fn with_records(records: Vec<SaleRecord>) -> Self {
        Self {
            snapshot: RwLock::new(Arc::new(records)),
        }
    }

    /// Clones the current snapshot handle. A poisoned lock only means a
    /// writer panicked mid-swap of an `Arc`, which cannot leave the data
    /// itself inconsistent, so the poison is ignored.
    fn snapshot(&self) -> Arc<Vec<SaleRecord>> {
        match self.snapshot.read() {
            Ok(guard) => Arc::clone(&guard),
            Err(poisoned) => Arc::clone(&poisoned.into_inner()),
        }
    }
}

#[async_trait::async_trait]
impl RecordStore for MemoryStore {
    async fn count(&self, filter: &RecordFilter) -> Result<u64> {
        let snapshot = self.snapshot();
        Ok(snapshot.iter().filter(|r| filter.matches(r)).count() as u64)
    }

    async fn find(
        &self,
        filter: &RecordFilter,
        offset: u64,
        limit: Option<u64>,
    ) -> Result<Vec<SaleRecord>> {
        let snapshot = self.snapshot();
        let matching = snapshot
            .iter()
            .filter(|r| filter.matches(r))
            .skip(offset as usize);
        let records = match limit {
            Some(limit) => matching.take(limit as usize).cloned().collect(),
            None => matching.cloned().collect(),
        };
        Ok(records)
    }

    async fn sum_price(&self, filter: &RecordFilter) -> Result<f64> {
        let snapshot = self.snapshot();
        Ok(snapshot
            .iter()
            .filter(|r| filter.matches(r))
            .map(|r| r.price)
            .sum())
    }

    async fn count_by_category(&self, filter: &RecordFilter) -> Result<Vec<CategoryCount>> {
        let snapshot = self.snapshot();
        let mut groups: HashMap<&str, u64> = HashMap::new();
        for record in snapshot.iter().filter(|r| filter.matches(r)) {
            *groups.entry(record.category.as_str()).or_default() += 1;
        }
        Ok(groups
            .into_iter()
            .map(|(category, count)| CategoryCount {
                category: category.to_string(),
                count,
            })
            .collect())
    }

    async fn replace_all(&self, records: Vec<SaleRecord>) -> Result<()> {
        let next = Arc::new(records);
        let mut guard = match self.snapshot.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        *guard = next;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test::record;

    #[tokio::test]
    async fn test_replace_all_swaps_the_whole_set() {
        let store = MemoryStore::with_records(vec![record(1, 10.0, 1, 5, true, "books")]);
        let all = RecordFilter::default();
        assert_eq!(store.count(&all).await.unwrap(), 1);

        store
            .replace_all(vec![
                record(2, 20.0, 2, 1, false, "toys"),
                record(3, 30.0, 2, 2, true, "toys"),
            ])
            .await
            .unwrap();

        assert_eq!(store.count(&all).await.unwrap(), 2);
        let found = store.find(&all, 0, None).await.unwrap();
        assert!(found.iter().all(|r| r.id != 1));
    }

    #[tokio::test]
    async fn test_find_respects_offset_and_limit() {
        let records: Vec<_> = (1..=5i64).map(|i| record(i, i as f64, 1, 1, true, "c")).collect();
        let store = MemoryStore::with_records(records);
        let all = RecordFilter::default();

        let page = store.find(&all, 2, Some(2)).await.unwrap();
        assert_eq!(page.iter().map(|r| r.id).collect::<Vec<_>>(), vec![3, 4]);

        let rest = store.find(&all, 4, None).await.unwrap();
        assert_eq!(rest.len(), 1);
        assert_eq!(rest[0].id, 5);
    }

    #[tokio::test]
    async fn test_sum_price_over_empty_match_is_zero() {
        let store = MemoryStore::new();
        let sum = store.sum_price(&RecordFilter::default()).await.unwrap();
        assert_eq!(sum, 0.0);
    }

    #[tokio::test]
    async fn test_count_by_category_groups_distinct_values() {
        let store = MemoryStore::with_records(vec![
            record(1, 1.0, 3, 1, true, "electronics"),
            record(2, 2.0, 3, 2, true, "electronics"),
            record(3, 3.0, 3, 3, false, "jewelery"),
        ]);
        let mut groups = store
            .count_by_category(&RecordFilter::default())
            .await
            .unwrap();
        groups.sort_by(|a, b| a.category.cmp(&b.category));
        assert_eq!(
            groups,
            vec![
                CategoryCount {
                    category: "electronics".to_string(),
                    count: 2
                },
                CategoryCount {
                    category: "jewelery".to_string(),
                    count: 1
                },
            ]
        );
    }

    #[tokio::test]
    async fn test_search_matches_price_text() {
        let store = MemoryStore::with_records(vec![
            record(1, 150.0, 3, 1, true, "c"),
            record(2, 99.0, 3, 2, true, "c"),
        ]);
        let filter = RecordFilter::default().search("150");
        assert_eq!(store.count(&filter).await.unwrap(), 1);
    }
}
