use chrono::{DateTime, NaiveDate, NaiveTime, Utc};

use super::{category::Category, gallery_image::ImageId};

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ReceiptId(pub(crate) String);

impl ReceiptId {
    pub(crate) fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ReceiptId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl std::fmt::Display for ReceiptId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReceiptItem {
    pub name: String,
    pub price: f64,
    pub category: Category,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Receipt {
    pub id: ReceiptId,
    pub store_name: String,
    pub date: NaiveDate,
    pub time: NaiveTime,
    pub dominant_category: Category,
    pub created_at: DateTime<Utc>,
    /// Gallery image the receipt was extracted from. Absent for manual
    /// entries.
    pub source_image_id: Option<ImageId>,
    items: Vec<ReceiptItem>,
    total: f64,
}

// --

impl ReceiptItem {
    pub fn new(name: impl Into<String>, price: f64, category: Category) -> Self {
        Self {
            name: name.into(),
            price,
            category,
        }
    }
}

impl Receipt {
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn new(
        id: ReceiptId,
        store_name: impl Into<String>,
        date: NaiveDate,
        time: NaiveTime,
        dominant_category: Category,
        items: Vec<ReceiptItem>,
        created_at: DateTime<Utc>,
        source_image_id: Option<ImageId>,
    ) -> Self {
        let total = sum_prices(&items);
        Self {
            id,
            store_name: store_name.into(),
            date,
            time,
            dominant_category,
            created_at,
            source_image_id,
            items,
            total,
        }
    }

    pub fn items(&self) -> &[ReceiptItem] {
        &self.items
    }

    /// Always the exact sum of the item prices.
    pub fn total(&self) -> f64 {
        self.total
    }

    /// Removes the item at `index` and recomputes the total. Out-of-range
    /// indices leave the receipt untouched and return `None`.
    pub(crate) fn remove_item(&mut self, index: usize) -> Option<ReceiptItem> {
        if index >= self.items.len() {
            return None;
        }
        let removed = self.items.remove(index);
        self.total = sum_prices(&self.items);
        Some(removed)
    }
}

fn sum_prices(items: &[ReceiptItem]) -> f64 {
    items.iter().map(|i| i.price).sum()
}
