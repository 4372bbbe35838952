use std::str::FromStr as _;

use chrono::{DateTime, Local, NaiveDate, NaiveTime};
use tracing::warn;

use crate::{
    data::models::{clock_time_model::ClockTimeModel, iso_date_model::ISODateModel},
    domain::logic::receipt_builder::{minute_of, ReceiptBuilder},
    entities::{Category, ImageId, Receipt, ReceiptId, ReceiptItem},
};

/// The single persisted ledger document.
#[derive(Debug, Clone, Default, PartialEq, serde_derive::Serialize, serde_derive::Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct LedgerDocumentModel {
    #[serde(default)]
    pub receipts: Vec<ReceiptModel>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub monthly_budget: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, serde_derive::Serialize, serde_derive::Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ReceiptModel {
    pub id: String,
    pub store_name: String,
    /// `YYYY-MM-DD`.
    pub date: String,
    /// `HH:MM`.
    pub time: String,
    #[serde(default)]
    pub items: Vec<ReceiptItemModel>,
    #[serde(default)]
    pub total: f64,
    /// Dominant category label.
    pub category: String,
    /// Milliseconds since the Unix epoch.
    pub timestamp: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gallery_image_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, serde_derive::Serialize, serde_derive::Deserialize)]
pub(crate) struct ReceiptItemModel {
    pub name: String,
    pub price: f64,
    pub category: String,
}

// --

impl From<&Receipt> for ReceiptModel {
    fn from(receipt: &Receipt) -> Self {
        ReceiptModel {
            id: receipt.id.as_str().to_string(),
            store_name: receipt.store_name.clone(),
            date: ISODateModel::from(receipt.date).to_string(),
            time: ClockTimeModel::from(receipt.time).to_string(),
            items: receipt.items().iter().map(ReceiptItemModel::from).collect(),
            total: receipt.total(),
            category: receipt.dominant_category.label().to_string(),
            timestamp: receipt.created_at.timestamp_millis(),
            gallery_image_id: receipt
                .source_image_id
                .as_ref()
                .map(|id| id.as_str().to_string()),
        }
    }
}

impl From<&ReceiptItem> for ReceiptItemModel {
    fn from(item: &ReceiptItem) -> Self {
        ReceiptItemModel {
            name: item.name.clone(),
            price: item.price,
            category: item.category.label().to_string(),
        }
    }
}

/// Stored dates and times that do not parse fall back to the record timestamp.
impl From<ReceiptModel> for Receipt {
    fn from(model: ReceiptModel) -> Self {
        let created_at = DateTime::from_timestamp_millis(model.timestamp).unwrap_or_default();
        let recorded = created_at.with_timezone(&Local);
        let date: NaiveDate = match ISODateModel::from_str(&model.date) {
            Ok(date) => date.into(),
            Err(e) => {
                warn!(
                    receipt_id = %model.id,
                    date = %model.date,
                    error = %e,
                    "unreadable stored date; using record timestamp"
                );
                recorded.date_naive()
            }
        };
        let time: NaiveTime = match ClockTimeModel::from_str(&model.time) {
            Ok(time) => time.into(),
            Err(e) => {
                warn!(
                    receipt_id = %model.id,
                    time = %model.time,
                    error = %e,
                    "unreadable stored time; using record timestamp"
                );
                minute_of(&recorded)
            }
        };
        let dominant_category = Category::from_label(&model.category);
        let items = model
            .items
            .into_iter()
            .map(|i| ReceiptItem::new(i.name, i.price, Category::from_label(&i.category)))
            .collect();
        Receipt::new(
            ReceiptId(model.id),
            model.store_name,
            date,
            time,
            dominant_category,
            ReceiptBuilder::reconcile_items(items, Some(model.total), dominant_category),
            created_at,
            model.gallery_image_id.map(ImageId),
        )
    }
}

#[cfg(test)]
mod tests {
    use chrono::Timelike as _;

    use super::*;

    const DOCUMENT: &str = r#"{
        "receipts": [
            {
                "id": "r-1",
                "storeName": "Food City",
                "date": "2025-03-14",
                "time": "09:30",
                "items": [
                    { "name": "Rice", "price": 900, "category": "Food" },
                    { "name": "Pen", "price": 600, "category": "Stationery" }
                ],
                "total": 1500,
                "category": "Food",
                "timestamp": 1741944600000,
                "galleryImageId": "img-1"
            }
        ],
        "monthlyBudget": 25000
    }"#;

    #[test]
    fn reads_persisted_document() {
        let doc: LedgerDocumentModel = serde_json::from_str(DOCUMENT).unwrap();
        assert_eq!(doc.monthly_budget, Some(25000.0));
        let receipt = Receipt::from(doc.receipts[0].clone());
        assert_eq!(receipt.store_name, "Food City");
        assert_eq!(receipt.total(), 1500.0);
        assert_eq!(receipt.items()[1].category, Category::Stationery);
        assert_eq!(receipt.source_image_id.as_ref().unwrap().as_str(), "img-1");
    }

    #[test]
    fn stored_total_is_recomputed_from_items() {
        let mut doc: LedgerDocumentModel = serde_json::from_str(DOCUMENT).unwrap();
        doc.receipts[0].total = 9999.0;
        let receipt = Receipt::from(doc.receipts.remove(0));
        assert_eq!(receipt.total(), 1500.0);
    }

    #[test]
    fn missing_budget_and_receipts_default() {
        let doc: LedgerDocumentModel = serde_json::from_str("{}").unwrap();
        assert!(doc.receipts.is_empty());
        assert!(doc.monthly_budget.is_none());
    }

    #[test]
    fn malformed_date_and_time_fall_back_to_record_timestamp() {
        let mut doc: LedgerDocumentModel = serde_json::from_str(DOCUMENT).unwrap();
        doc.receipts[0].date = "14/03/2025".to_string();
        doc.receipts[0].time = "9.30am".to_string();
        let receipt = Receipt::from(doc.receipts.remove(0));

        let recorded = receipt.created_at.with_timezone(&Local);
        assert_eq!(receipt.date, recorded.date_naive());
        assert_eq!(receipt.time.hour(), recorded.hour());
        assert_eq!(receipt.time.minute(), recorded.minute());
        assert_eq!(receipt.time.second(), 0);
        assert_eq!(receipt.total(), 1500.0);
    }
}
