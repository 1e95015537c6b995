//! Command handlers for the salescope CLI.
//!
//! Each handler opens the store, runs the corresponding engine operation and
//! wraps the outcome in an [`Out`] for printing.

use crate::args::{InitArgs, TransactionsArgs};
use crate::engine::{BucketCount, CombinedView, ListQuery, QueryEngine, Statistics, TransactionPage};
use crate::model::Period;
use crate::seed;
use crate::store::{CategoryCount, RecordStore, SqliteStore};
use crate::Result;
use serde::Serialize;
use std::fmt::Debug;
use std::path::Path;
use tracing::info;

/// The output type for a command: a human message plus, optionally, the
/// structured result that gets printed as JSON.
#[derive(Debug, Clone, Serialize)]
pub struct Out<T>
where
    T: Serialize + Clone + Debug,
{
    /// A message regarding the outcome of the command execution.
    message: String,

    /// Any structured data that needs to be output from the call.
    structure: Option<T>,
}

impl<T> Out<T>
where
    T: Serialize + Clone + Debug,
{
    /// Create a new `Out` object that has `Some(structure)`.
    pub fn new<S>(message: S, structure: T) -> Self
    where
        S: Into<String>,
    {
        Self {
            message: message.into(),
            structure: Some(structure),
        }
    }

    /// Create a new `Out` object that has `None` for `structure`.
    pub fn new_message<S>(message: S) -> Self
    where
        S: Into<String>,
    {
        Self {
            message: message.into(),
            structure: None,
        }
    }

    /// Get the `message`.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Get the structured data stored in `structure`.
    pub fn structure(&self) -> Option<&T> {
        self.structure.as_ref()
    }

    /// Log the message and print the structured data (if any) as JSON to
    /// stdout, where callers and scripts expect query results.
    pub fn print(&self) {
        info!("{}", self.message);
        if let Some(structure) = self.structure() {
            if let Ok(json) = serde_json::to_string_pretty(structure) {
                println!("{json}");
            }
        }
    }
}

/// What `init` did with the fetched dataset.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InitSummary {
    pub fetched: usize,
    pub loaded: usize,
    pub rejected: usize,
}

/// Fetches the seed dataset and replaces the store contents with it.
pub async fn init(db: &Path, args: &InitArgs) -> Result<Out<InitSummary>> {
    let store = SqliteStore::open(db).await?;
    let raw = seed::fetch_seed_records(args.source_url()).await?;
    let fetched = raw.len();
    let records = seed::validate_records(raw);
    let loaded = records.len();
    store.replace_all(records).await?;
    let summary = InitSummary {
        fetched,
        loaded,
        rejected: fetched - loaded,
    };
    Ok(Out::new(
        format!("Loaded {loaded} of {fetched} records into {}", db.display()),
        summary,
    ))
}

/// Lists records with search and pagination.
pub async fn transactions(db: &Path, args: &TransactionsArgs) -> Result<Out<TransactionPage>> {
    let engine = engine(db).await?;
    let query = ListQuery::new(args.search().map(str::to_string), args.page(), args.per_page());
    let page = engine.list_transactions(&query).await?;
    Ok(Out::new(
        format!(
            "Page {} of {} matching records",
            page.page, page.total_count
        ),
        page,
    ))
}

/// Monthly sales statistics.
pub async fn statistics(db: &Path, raw_month: &str) -> Result<Out<Statistics>> {
    let engine = engine(db).await?;
    let period = Period::resolve(raw_month)?;
    let stats = engine.statistics(period).await?;
    Ok(Out::new(format!("Statistics for {period}"), stats))
}

/// Monthly price-range histogram.
pub async fn histogram(db: &Path, raw_month: &str) -> Result<Out<Vec<BucketCount>>> {
    let engine = engine(db).await?;
    let period = Period::resolve(raw_month)?;
    let bars = engine.histogram(period).await?;
    Ok(Out::new(format!("Price histogram for {period}"), bars))
}

/// Monthly category breakdown.
pub async fn categories(db: &Path, raw_month: &str) -> Result<Out<Vec<CategoryCount>>> {
    let engine = engine(db).await?;
    let period = Period::resolve(raw_month)?;
    let groups = engine.category_breakdown(period).await?;
    Ok(Out::new(format!("Category breakdown for {period}"), groups))
}

/// All four monthly views in one payload.
pub async fn combined(db: &Path, raw_month: &str) -> Result<Out<CombinedView>> {
    let engine = engine(db).await?;
    let month = raw_month.parse()?;
    let view = engine.combined(month).await?;
    Ok(Out::new(format!("Combined view for month {month}"), view))
}

async fn engine(db: &Path) -> Result<QueryEngine<SqliteStore>> {
    Ok(QueryEngine::new(SqliteStore::open(db).await?))
}
