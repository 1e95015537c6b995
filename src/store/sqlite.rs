//! Implements the `RecordStore` trait on top of a local SQLite database.

use crate::model::SaleRecord;
use crate::store::{CategoryCount, RecordFilter, RecordStore};
use crate::{Error, Result};
use chrono::NaiveDate;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions};
use sqlx::{QueryBuilder, Sqlite};
use std::path::Path;
use tracing::debug;

/// The `sale_records` table. `date_of_sale` is stored as `YYYY-MM-DD` text so
/// that lexicographic `BETWEEN` matches calendar order.
const SCHEMA: &str = "\
CREATE TABLE IF NOT EXISTS sale_records (
    id INTEGER NOT NULL,
    title TEXT NOT NULL,
    description TEXT NOT NULL,
    price REAL NOT NULL,
    category TEXT NOT NULL,
    image TEXT NOT NULL,
    sold INTEGER NOT NULL,
    date_of_sale TEXT NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_sale_records_date ON sale_records (date_of_sale);
";

pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    /// Opens (or creates) the database at `path` and ensures the schema
    /// exists. WAL mode keeps readers unblocked while `replace_all` commits.
    pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(sqlx::Error::Io)?;
            }
        }
        let options = SqliteConnectOptions::new()
            .filename(path)
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal);
        let pool = SqlitePoolOptions::new().connect_with(options).await?;
        sqlx::raw_sql(SCHEMA).execute(&pool).await?;
        debug!("Opened sale record store at {}", path.display());
        Ok(Self { pool })
    }
}

/// Appends the WHERE clause for `filter` to a query.
///
/// This must stay semantically identical to `RecordFilter::matches`; the
/// engine tests exercise the predicate through both stores.
fn push_filter(builder: &mut QueryBuilder<'_, Sqlite>, filter: &RecordFilter) {
    builder.push(" WHERE 1 = 1");
    if let Some(period) = filter.period() {
        builder
            .push(" AND date_of_sale BETWEEN ")
            .push_bind(period.start().to_string())
            .push(" AND ")
            .push_bind(period.end().to_string());
    }
    if let Some(term) = filter.search_term() {
        // LIKE wildcards in the user's term are literal characters, not
        // patterns, so they get escaped.
        let escaped = term
            .to_lowercase()
            .replace('\\', "\\\\")
            .replace('%', "\\%")
            .replace('_', "\\_");
        let pattern = format!("%{escaped}%");
        // SQLite renders a REAL as e.g. "150.0" where Rust's f64 Display
        // gives "150"; trimming trailing zeros (and a bare trailing dot)
        // keeps the textual form of the price identical in both stores. A
        // REAL always renders with a decimal point, so the inner trim never
        // eats significant digits.
        builder
            .push(" AND (LOWER(title) LIKE ")
            .push_bind(pattern.clone())
            .push(" ESCAPE '\\' OR LOWER(description) LIKE ")
            .push_bind(pattern.clone())
            .push(" ESCAPE '\\' OR RTRIM(RTRIM(CAST(price AS TEXT), '0'), '.') LIKE ")
            .push_bind(pattern)
            .push(" ESCAPE '\\')");
    }
    if let Some(sold) = filter.sold_flag() {
        builder.push(" AND sold = ").push_bind(sold);
    }
    if let Some(floor) = filter.price_floor() {
        builder.push(" AND price > ").push_bind(floor);
    }
    if let Some(ceiling) = filter.price_ceiling() {
        builder.push(" AND price <= ").push_bind(ceiling);
    }
}

/// A row of the `sale_records` table as SQLite hands it back.
#[derive(Debug, sqlx::FromRow)]
struct SaleRecordRow {
    id: i64,
    title: String,
    description: String,
    price: f64,
    category: String,
    image: String,
    sold: bool,
    date_of_sale: String,
}

impl SaleRecordRow {
    fn into_record(self) -> Result<SaleRecord> {
        let date_of_sale =
            NaiveDate::parse_from_str(&self.date_of_sale, "%Y-%m-%d").map_err(|_| {
                Error::Corrupt(format!(
                    "record {} has unreadable date_of_sale '{}'",
                    self.id, self.date_of_sale
                ))
            })?;
        Ok(SaleRecord {
            id: self.id,
            title: self.title,
            description: self.description,
            price: self.price,
            category: self.category,
            image: self.image,
            sold: self.sold,
            date_of_sale,
        })
    }
}

#[async_trait::async_trait]
impl RecordStore for SqliteStore {
    async fn count(&self, filter: &RecordFilter) -> Result<u64> {
        let mut builder = QueryBuilder::new("SELECT COUNT(*) FROM sale_records");
        push_filter(&mut builder, filter);
        let count: i64 = builder
            .build_query_scalar()
            .fetch_one(&self.pool)
            .await?;
        Ok(count as u64)
    }

    async fn find(
        &self,
        filter: &RecordFilter,
        offset: u64,
        limit: Option<u64>,
    ) -> Result<Vec<SaleRecord>> {
        let mut builder = QueryBuilder::new(
            "SELECT id, title, description, price, category, image, sold, date_of_sale \
             FROM sale_records",
        );
        push_filter(&mut builder, filter);
        // LIMIT -1 is SQLite for "no limit"; OFFSET still applies.
        builder
            .push(" ORDER BY rowid LIMIT ")
            .push_bind(limit.map(|l| l as i64).unwrap_or(-1))
            .push(" OFFSET ")
            .push_bind(offset as i64);
        let rows: Vec<SaleRecordRow> = builder
            .build_query_as()
            .fetch_all(&self.pool)
            .await?;
        rows.into_iter().map(SaleRecordRow::into_record).collect()
    }

    async fn sum_price(&self, filter: &RecordFilter) -> Result<f64> {
        let mut builder =
            QueryBuilder::new("SELECT COALESCE(SUM(price), 0.0) FROM sale_records");
        push_filter(&mut builder, filter);
        let sum: f64 = builder
            .build_query_scalar()
            .fetch_one(&self.pool)
            .await?;
        Ok(sum)
    }

    async fn count_by_category(&self, filter: &RecordFilter) -> Result<Vec<CategoryCount>> {
        let mut builder = QueryBuilder::new("SELECT category, COUNT(*) FROM sale_records");
        push_filter(&mut builder, filter);
        builder.push(" GROUP BY category");
        let rows: Vec<(String, i64)> = builder
            .build_query_as()
            .fetch_all(&self.pool)
            .await?;
        Ok(rows
            .into_iter()
            .map(|(category, count)| CategoryCount {
                category,
                count: count as u64,
            })
            .collect())
    }

    async fn replace_all(&self, records: Vec<SaleRecord>) -> Result<()> {
        // One transaction makes the clear-then-insert atomic: readers see
        // either the previous set or the full new one.
        let mut tx = self.pool.begin().await?;
        sqlx::query("DELETE FROM sale_records").execute(&mut *tx).await?;
        for record in &records {
            sqlx::query(
                "INSERT INTO sale_records \
                 (id, title, description, price, category, image, sold, date_of_sale) \
                 VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
            )
            .bind(record.id)
            .bind(&record.title)
            .bind(&record.description)
            .bind(record.price)
            .bind(&record.category)
            .bind(&record.image)
            .bind(record.sold)
            .bind(record.date_of_sale.to_string())
            .execute(&mut *tx)
            .await?;
        }
        tx.commit().await?;
        debug!("Replaced record set with {} records", records.len());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Month, Period};
    use crate::store::MemoryStore;
    use crate::test::record;
    use tempfile::TempDir;

    async fn store_with(records: Vec<SaleRecord>) -> (TempDir, SqliteStore) {
        let dir = TempDir::new().unwrap();
        let store = SqliteStore::open(dir.path().join("records.db")).await.unwrap();
        store.replace_all(records).await.unwrap();
        (dir, store)
    }

    #[tokio::test]
    async fn test_open_creates_missing_parent_directories() {
        let dir = TempDir::new().unwrap();
        let nested = dir.path().join("a").join("b").join("records.db");
        let store = SqliteStore::open(&nested).await.unwrap();
        assert_eq!(store.count(&RecordFilter::default()).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_replace_all_is_a_full_swap() {
        let (_dir, store) = store_with(vec![record(1, 10.0, 1, 5, true, "books")]).await;
        store
            .replace_all(vec![
                record(2, 20.0, 2, 1, false, "toys"),
                record(3, 30.0, 2, 2, true, "toys"),
            ])
            .await
            .unwrap();
        let found = store.find(&RecordFilter::default(), 0, None).await.unwrap();
        assert_eq!(found.iter().map(|r| r.id).collect::<Vec<_>>(), vec![2, 3]);
    }

    #[tokio::test]
    async fn test_round_trip_preserves_record_fields() {
        let original = record(42, 55.99, 11, 27, true, "men's clothing");
        let (_dir, store) = store_with(vec![original.clone()]).await;
        let found = store.find(&RecordFilter::default(), 0, None).await.unwrap();
        assert_eq!(found, vec![original]);
    }

    #[tokio::test]
    async fn test_period_filter_is_inclusive_of_month_boundaries() {
        let (_dir, store) = store_with(vec![
            record(1, 1.0, 3, 1, true, "c"),
            record(2, 2.0, 3, 31, true, "c"),
            record(3, 3.0, 4, 1, true, "c"),
        ])
        .await;
        let march = RecordFilter::default().in_period(Period::for_month(Month::new(3).unwrap()));
        assert_eq!(store.count(&march).await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_search_is_case_insensitive() {
        let (_dir, store) = store_with(vec![
            record(1, 10.0, 3, 1, true, "c"),
            record(2, 20.0, 3, 2, true, "c"),
        ])
        .await;
        let filter = RecordFilter::default().search("TITLE 1");
        let found = store.find(&filter, 0, None).await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id, 1);
    }

    #[tokio::test]
    async fn test_price_text_search_matches_memory_store() {
        let records = vec![
            record(1, 150.0, 3, 1, true, "c"),
            record(2, 100.5, 3, 2, true, "c"),
        ];
        let (_dir, store) = store_with(records.clone()).await;
        let memory = MemoryStore::with_records(records);
        for term in ["150", "150.0", "50", "100.5", "0.5"] {
            let filter = RecordFilter::default().search(term);
            assert_eq!(
                store.count(&filter).await.unwrap(),
                memory.count(&filter).await.unwrap(),
                "stores disagree on price-text search for term '{term}'"
            );
        }
    }

    #[tokio::test]
    async fn test_sum_price_and_sold_filter() {
        let (_dir, store) = store_with(vec![
            record(1, 50.0, 3, 1, true, "c"),
            record(2, 150.0, 3, 2, true, "c"),
            record(3, 75.0, 3, 3, false, "c"),
        ])
        .await;
        let sold = RecordFilter::default().sold(true);
        assert_eq!(store.sum_price(&sold).await.unwrap(), 200.0);
        assert_eq!(store.count(&sold).await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_price_bounds_floor_exclusive_ceiling_inclusive() {
        let (_dir, store) = store_with(vec![
            record(1, 100.0, 3, 1, true, "c"),
            record(2, 100.5, 3, 2, true, "c"),
            record(3, 200.0, 3, 3, true, "c"),
        ])
        .await;
        let filter = RecordFilter::default().price_above(100.0).price_at_most(200.0);
        let found = store.find(&filter, 0, None).await.unwrap();
        assert_eq!(found.iter().map(|r| r.id).collect::<Vec<_>>(), vec![2, 3]);
    }

    #[tokio::test]
    async fn test_count_by_category_groups() {
        let (_dir, store) = store_with(vec![
            record(1, 1.0, 3, 1, true, "electronics"),
            record(2, 2.0, 3, 2, false, "electronics"),
            record(3, 3.0, 3, 3, true, "jewelery"),
        ])
        .await;
        let mut groups = store
            .count_by_category(&RecordFilter::default())
            .await
            .unwrap();
        groups.sort_by(|a, b| a.category.cmp(&b.category));
        assert_eq!(groups[0].category, "electronics");
        assert_eq!(groups[0].count, 2);
        assert_eq!(groups[1].category, "jewelery");
        assert_eq!(groups[1].count, 1);
    }
}
