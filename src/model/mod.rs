//! Data model types: sale records and month/period resolution.

mod period;
mod record;

pub use period::{Month, Period, REFERENCE_YEAR};
pub use record::{RawRecord, SaleRecord};
