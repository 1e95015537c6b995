//! Shared test utilities.
//!
//! This module is only compiled when running tests (`#[cfg(test)]`).

use crate::model::{SaleRecord, REFERENCE_YEAR};
use chrono::NaiveDate;

/// Builds a sale record dated in the reference year with boilerplate text
/// fields derived from the id.
pub fn record(id: i64, price: f64, month: u32, day: u32, sold: bool, category: &str) -> SaleRecord {
    SaleRecord {
        id,
        title: format!("Title {id}"),
        description: format!("Description {id}"),
        price,
        category: category.to_string(),
        image: format!("https://example.com/{id}.jpg"),
        sold,
        date_of_sale: NaiveDate::from_ymd_opt(REFERENCE_YEAR, month, day).unwrap(),
    }
}
