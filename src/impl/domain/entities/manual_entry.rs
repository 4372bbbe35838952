use chrono::{DateTime, Local, NaiveDate, NaiveTime, Timelike as _, Utc};

use super::category::Category;

/// Contents of the manual entry form, as typed by the user. Prices are kept
/// as raw text and only parsed when the form is submitted.
#[derive(Debug, Clone, PartialEq)]
pub struct ManualEntryForm {
    pub store_name: String,
    pub date: NaiveDate,
    pub time: NaiveTime,
    pub dominant_category: Category,
    pub items: Vec<ManualEntryItem>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ManualEntryItem {
    pub name: String,
    pub price: String,
    pub category: Category,
}

impl ManualEntryForm {
    /// An empty form dated at `now` (local time, minute precision) with a
    /// single blank item row.
    pub fn blank(now: DateTime<Utc>) -> Self {
        let local = now.with_timezone(&Local);
        Self {
            store_name: String::new(),
            date: local.date_naive(),
            time: NaiveTime::from_hms_opt(local.hour(), local.minute(), 0).unwrap_or_default(),
            dominant_category: Category::Other,
            items: vec![ManualEntryItem::default()],
        }
    }
}

impl ManualEntryItem {
    pub fn new(name: impl Into<String>, price: impl Into<String>, category: Category) -> Self {
        Self {
            name: name.into(),
            price: price.into(),
            category,
        }
    }

    pub(crate) fn is_blank(&self) -> bool {
        self.name.trim().is_empty() && self.price.trim().is_empty()
    }
}
