//! Fixed price buckets for the histogram.

/// One histogram bucket. A price belongs to the first bucket whose ceiling it
/// does not exceed, so the buckets partition `[0, ∞)`: a price exactly on a
/// ceiling (100, 200, ...) counts in the lower bucket only, and nothing is
/// dropped or double-counted.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PriceBucket {
    /// Label in the dataset's original form, e.g. "101-200" or "901-above".
    pub label: &'static str,
    /// Inclusive upper bound; `None` for the open-ended final bucket.
    pub ceiling: Option<f64>,
}

/// The ten buckets, in the fixed order they are always emitted.
pub const PRICE_BUCKETS: [PriceBucket; 10] = [
    PriceBucket { label: "0-100", ceiling: Some(100.0) },
    PriceBucket { label: "101-200", ceiling: Some(200.0) },
    PriceBucket { label: "201-300", ceiling: Some(300.0) },
    PriceBucket { label: "301-400", ceiling: Some(400.0) },
    PriceBucket { label: "401-500", ceiling: Some(500.0) },
    PriceBucket { label: "501-600", ceiling: Some(600.0) },
    PriceBucket { label: "601-700", ceiling: Some(700.0) },
    PriceBucket { label: "701-800", ceiling: Some(800.0) },
    PriceBucket { label: "801-900", ceiling: Some(900.0) },
    PriceBucket { label: "901-above", ceiling: None },
];

impl PriceBucket {
    /// The exclusive floor of this bucket: the previous bucket's ceiling, or
    /// no floor at all for the first bucket.
    pub fn floor(ix: usize) -> Option<f64> {
        if ix == 0 {
            None
        } else {
            PRICE_BUCKETS[ix - 1].ceiling
        }
    }
}
