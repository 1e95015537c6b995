//! The sale record data model and load-time validation.

use crate::{Error, Result};
use chrono::{DateTime, NaiveDate};
use serde::{Deserialize, Serialize};

/// A single product-sale record.
///
/// Records are read-only once stored; the only mutation path is the bulk
/// loader replacing the whole set. `id` is assumed unique within one dataset
/// but is not enforced; duplicates are simply both counted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaleRecord {
    pub id: i64,
    pub title: String,
    pub description: String,
    /// Non-negative sale price. Guaranteed by load-time validation.
    pub price: f64,
    pub category: String,
    /// Opaque image reference, carried through but never interpreted.
    pub image: String,
    pub sold: bool,
    pub date_of_sale: NaiveDate,
}

/// The wire form of a record as it arrives from the seed dataset.
///
/// `date_of_sale` is kept as a string here because the upstream dataset mixes
/// RFC 3339 timestamps with plain dates; [`RawRecord::validate`] normalizes
/// it down to the calendar date, which is all the engine uses.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawRecord {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub price: f64,
    pub category: String,
    #[serde(default)]
    pub image: String,
    pub sold: bool,
    pub date_of_sale: String,
}

impl RawRecord {
    /// Validates the raw record and converts it into a [`SaleRecord`].
    ///
    /// A record is rejected when its date does not parse or its price is
    /// negative or non-finite. Rejection is a load-time concern; nothing
    /// invalid ever reaches the store.
    pub fn validate(self) -> Result<SaleRecord> {
        if !self.price.is_finite() || self.price < 0.0 {
            return Err(Error::validation(format!(
                "record {} has invalid price {}",
                self.id, self.price
            )));
        }
        let date_of_sale = parse_date_of_sale(&self.date_of_sale).ok_or_else(|| {
            Error::validation(format!(
                "record {} has unparseable dateOfSale '{}'",
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

/// Accepts an RFC 3339 timestamp or a plain `YYYY-MM-DD` date.
fn parse_date_of_sale(raw: &str) -> Option<NaiveDate> {
    if let Ok(timestamp) = DateTime::parse_from_rfc3339(raw) {
        return Some(timestamp.date_naive());
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(price: f64, date: &str) -> RawRecord {
        RawRecord {
            id: 7,
            title: "Mens Cotton Jacket".to_string(),
            description: "great outerwear jackets".to_string(),
            price,
            category: "men's clothing".to_string(),
            image: "https://example.com/7.jpg".to_string(),
            sold: true,
            date_of_sale: date.to_string(),
        }
    }

    #[test]
    fn test_validate_accepts_rfc3339_timestamp() {
        let record = raw(55.99, "2021-11-27T20:29:54+05:30").validate().unwrap();
        assert_eq!(
            record.date_of_sale,
            NaiveDate::from_ymd_opt(2021, 11, 27).unwrap()
        );
        assert_eq!(record.price, 55.99);
    }

    #[test]
    fn test_validate_accepts_plain_date() {
        let record = raw(10.0, "2021-03-05").validate().unwrap();
        assert_eq!(
            record.date_of_sale,
            NaiveDate::from_ymd_opt(2021, 3, 5).unwrap()
        );
    }

    #[test]
    fn test_validate_rejects_bad_date() {
        assert!(raw(10.0, "not-a-date").validate().is_err());
        assert!(raw(10.0, "2021-13-40").validate().is_err());
    }

    #[test]
    fn test_validate_rejects_negative_price() {
        assert!(raw(-0.01, "2021-03-05").validate().is_err());
    }

    #[test]
    fn test_validate_rejects_non_finite_price() {
        assert!(raw(f64::NAN, "2021-03-05").validate().is_err());
        assert!(raw(f64::INFINITY, "2021-03-05").validate().is_err());
    }

    #[test]
    fn test_sale_record_serializes_with_original_field_names() {
        let record = raw(12.5, "2021-06-15").validate().unwrap();
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["dateOfSale"], "2021-06-15");
        assert_eq!(json["price"], 12.5);
        assert_eq!(json["sold"], true);
    }
}
