//! The bulk loader: fetches the seed dataset and prepares it for the store.

use crate::model::{RawRecord, SaleRecord};
use crate::Result;
use tracing::{debug, warn};

/// Where the product-sale seed dataset lives.
pub const SEED_URL: &str = "https://s3.amazonaws.com/roxiler.com/product_transaction.json";

/// Downloads the seed dataset. Any HTTP or decode failure surfaces as a fetch
/// error; there is no retry here, that policy belongs to the caller.
pub async fn fetch_seed_records(url: &str) -> Result<Vec<RawRecord>> {
    debug!("Fetching seed records from {url}");
    let response = reqwest::get(url).await?.error_for_status()?;
    let records: Vec<RawRecord> = response.json().await?;
    debug!("Fetched {} raw records", records.len());
    Ok(records)
}

/// Validates raw records, dropping (with a warning) any that are rejected.
/// Only validated records may reach the store.
pub fn validate_records(raw: Vec<RawRecord>) -> Vec<SaleRecord> {
    let mut records = Vec::with_capacity(raw.len());
    for raw_record in raw {
        match raw_record.validate() {
            Ok(record) => records.push(record),
            Err(reason) => warn!("Skipping seed record: {reason}"),
        }
    }
    records
}
