use chrono::{NaiveDate, NaiveTime};

use super::{category::Category, receipt::ReceiptItem};

/// Structured data the annotation service derived from one receipt image.
///
/// Everything except `is_readable` is optional; defaults are applied when a
/// receipt is built from the extraction, not here.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ExtractionResult {
    pub is_readable: bool,
    pub store_name: Option<String>,
    pub date: Option<NaiveDate>,
    pub time: Option<NaiveTime>,
    pub total: Option<f64>,
    pub dominant_category: Option<Category>,
    pub items: Option<Vec<ReceiptItem>>,
}

impl ExtractionResult {
    pub fn unreadable() -> Self {
        Self {
            is_readable: false,
            ..Default::default()
        }
    }
}
