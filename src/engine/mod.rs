//! The query engine: the analytical operations over the record store.
//!
//! Every operation is a pure read; the engine holds no state of its own
//! beyond the store handle, so operations for the same or different months
//! can run concurrently without coordination.

mod bucket;

use crate::model::{Month, Period, SaleRecord};
use crate::store::{CategoryCount, RecordFilter, RecordStore};
use crate::{Error, Result};
use serde::Serialize;

pub use bucket::{PriceBucket, PRICE_BUCKETS};

/// Parameters for the paginated listing. The listing is global (not scoped to
/// a month) and optionally filtered by a free-text search.
#[derive(Debug, Clone)]
pub struct ListQuery {
    search: Option<String>,
    page: u64,
    per_page: u64,
}

impl ListQuery {
    pub fn new(search: Option<String>, page: u64, per_page: u64) -> Self {
        Self {
            search,
            page,
            per_page,
        }
    }

    pub fn search(&self) -> Option<&str> {
        self.search.as_deref()
    }

    pub fn page(&self) -> u64 {
        self.page
    }

    pub fn per_page(&self) -> u64 {
        self.per_page
    }
}

/// One page of listing results, with the pre-pagination match count.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionPage {
    pub page: u64,
    pub per_page: u64,
    pub total_count: u64,
    pub transactions: Vec<SaleRecord>,
}

/// Sales statistics for one month.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Statistics {
    pub total_sales_amount: f64,
    pub total_sold_items: u64,
    pub total_not_sold_items: u64,
}

/// One bar of the price histogram.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BucketCount {
    pub range: &'static str,
    pub count: u64,
}

/// All four analytical views for one month. The `transactions` member is the
/// full month's record set, unpaginated, unlike the standalone listing.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CombinedView {
    pub transactions: Vec<SaleRecord>,
    pub statistics: Statistics,
    pub histogram: Vec<BucketCount>,
    pub category_breakdown: Vec<CategoryCount>,
}

pub struct QueryEngine<S> {
    store: S,
}

impl<S: RecordStore> QueryEngine<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Lists records page by page, optionally narrowed by a search term.
    ///
    /// `page` and `per_page` must both be at least 1. A page past the end of
    /// the results is not an error; it returns an empty slice with the true
    /// `total_count`.
    pub async fn list_transactions(&self, query: &ListQuery) -> Result<TransactionPage> {
        if query.page() < 1 {
            return Err(Error::validation("page must be at least 1"));
        }
        if query.per_page() < 1 {
            return Err(Error::validation("perPage must be at least 1"));
        }
        let mut filter = RecordFilter::default();
        if let Some(term) = query.search() {
            filter = filter.search(term);
        }
        let total_count = self.store.count(&filter).await?;
        let offset = (query.page() - 1).saturating_mul(query.per_page());
        let transactions = self
            .store
            .find(&filter, offset, Some(query.per_page()))
            .await?;
        Ok(TransactionPage {
            page: query.page(),
            per_page: query.per_page(),
            total_count,
            transactions,
        })
    }

    /// Computes the sold amount, sold count and unsold count for a month.
    /// An empty month yields zeros, never an error.
    pub async fn statistics(&self, period: Period) -> Result<Statistics> {
        let sold = RecordFilter::default().in_period(period).sold(true);
        let not_sold = RecordFilter::default().in_period(period).sold(false);
        let (total_sales_amount, total_sold_items, total_not_sold_items) = tokio::try_join!(
            self.store.sum_price(&sold),
            self.store.count(&sold),
            self.store.count(&not_sold),
        )?;
        Ok(Statistics {
            total_sales_amount,
            total_sold_items,
            total_not_sold_items,
        })
    }

    /// Counts the month's records into the ten fixed price buckets. Buckets
    /// come back in their fixed order, zero-count buckets included.
    pub async fn histogram(&self, period: Period) -> Result<Vec<BucketCount>> {
        let mut bars = Vec::with_capacity(PRICE_BUCKETS.len());
        for (ix, bucket) in PRICE_BUCKETS.iter().enumerate() {
            let mut filter = RecordFilter::default().in_period(period);
            if let Some(floor) = PriceBucket::floor(ix) {
                filter = filter.price_above(floor);
            }
            if let Some(ceiling) = bucket.ceiling {
                filter = filter.price_at_most(ceiling);
            }
            let count = self.store.count(&filter).await?;
            bars.push(BucketCount {
                range: bucket.label,
                count,
            });
        }
        Ok(bars)
    }

    /// Groups the month's records by category. One entry per distinct
    /// category present; group order is unspecified.
    pub async fn category_breakdown(&self, period: Period) -> Result<Vec<CategoryCount>> {
        let filter = RecordFilter::default().in_period(period);
        self.store.count_by_category(&filter).await
    }

    /// Produces all four views for one month. The month is validated once;
    /// the four operations then fan out concurrently, and the first failure
    /// fails the whole combine.
    pub async fn combined(&self, month: Month) -> Result<CombinedView> {
        let period = Period::for_month(month);
        let month_filter = RecordFilter::default().in_period(period);
        let (transactions, statistics, histogram, category_breakdown) = tokio::try_join!(
            self.store.find(&month_filter, 0, None),
            self.statistics(period),
            self.histogram(period),
            self.category_breakdown(period),
        )?;
        Ok(CombinedView {
            transactions,
            statistics,
            histogram,
            category_breakdown,
        })
    }
}
