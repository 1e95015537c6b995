//! The record store abstraction.
//!
//! The engine never talks to a database directly; it goes through the
//! [`RecordStore`] trait so the same query logic runs against the SQLite
//! store in production and the in-memory store in tests.

mod memory;
mod sqlite;

use crate::model::{Period, SaleRecord};
use crate::Result;
use serde::Serialize;

pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

/// Filter criteria for store queries. An empty filter matches every record.
#[derive(Debug, Default, Clone)]
pub struct RecordFilter {
    period: Option<Period>,
    search: Option<String>,
    sold: Option<bool>,
    price_above: Option<f64>,
    price_at_most: Option<f64>,
}

impl RecordFilter {
    /// Restricts matches to records whose sale date falls within `period`.
    pub fn in_period(mut self, period: Period) -> Self {
        self.period = Some(period);
        self
    }

    /// Restricts matches to records containing `term` (case-insensitively) in
    /// the title, the description, or the textual form of the price. An empty
    /// term is treated as no search at all.
    pub fn search(mut self, term: impl Into<String>) -> Self {
        let term = term.into();
        if !term.is_empty() {
            self.search = Some(term);
        }
        self
    }

    /// Restricts matches by the `sold` flag.
    pub fn sold(mut self, sold: bool) -> Self {
        self.sold = Some(sold);
        self
    }

    /// Restricts matches to prices strictly above `floor`.
    pub fn price_above(mut self, floor: f64) -> Self {
        self.price_above = Some(floor);
        self
    }

    /// Restricts matches to prices at or below `ceiling`.
    pub fn price_at_most(mut self, ceiling: f64) -> Self {
        self.price_at_most = Some(ceiling);
        self
    }

    pub fn period(&self) -> Option<&Period> {
        self.period.as_ref()
    }

    pub fn search_term(&self) -> Option<&str> {
        self.search.as_deref()
    }

    pub fn sold_flag(&self) -> Option<bool> {
        self.sold
    }

    pub fn price_floor(&self) -> Option<f64> {
        self.price_above
    }

    pub fn price_ceiling(&self) -> Option<f64> {
        self.price_at_most
    }

    /// Evaluates the filter against one record. This is the reference
    /// semantics; the SQLite store expresses the same predicate in SQL.
    pub fn matches(&self, record: &SaleRecord) -> bool {
        if let Some(period) = &self.period {
            if !period.contains(record.date_of_sale) {
                return false;
            }
        }
        if let Some(term) = &self.search {
            let needle = term.to_lowercase();
            let hit = record.title.to_lowercase().contains(&needle)
                || record.description.to_lowercase().contains(&needle)
                || record.price.to_string().contains(&needle);
            if !hit {
                return false;
            }
        }
        if let Some(sold) = self.sold {
            if record.sold != sold {
                return false;
            }
        }
        if let Some(floor) = self.price_above {
            if record.price <= floor {
                return false;
            }
        }
        if let Some(ceiling) = self.price_at_most {
            if record.price > ceiling {
                return false;
            }
        }
        true
    }
}

/// One group from a category aggregation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryCount {
    pub category: String,
    pub count: u64,
}

/// The query capability the engine consumes.
///
/// Listing order is fixed to insertion order in both implementations so that
/// pagination is reproducible.
#[async_trait::async_trait]
pub trait RecordStore: Send + Sync {
    /// Counts records matching `filter`.
    async fn count(&self, filter: &RecordFilter) -> Result<u64>;

    /// Returns matching records in insertion order, skipping `offset` and
    /// returning at most `limit` of them (all of them when `limit` is None).
    async fn find(
        &self,
        filter: &RecordFilter,
        offset: u64,
        limit: Option<u64>,
    ) -> Result<Vec<SaleRecord>>;

    /// Sums the price of matching records. Zero for an empty match set.
    async fn sum_price(&self, filter: &RecordFilter) -> Result<f64>;

    /// Groups matching records by category and counts each group. Group
    /// order is unspecified.
    async fn count_by_category(&self, filter: &RecordFilter) -> Result<Vec<CategoryCount>>;

    /// Replaces the entire record set. The swap is atomic: a concurrent
    /// reader sees either the old set or the new one, never a partial mix.
    async fn replace_all(&self, records: Vec<SaleRecord>) -> Result<()>;
}
