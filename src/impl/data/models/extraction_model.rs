use std::str::FromStr as _;

use tracing::debug;

use crate::{
    data::models::{clock_time_model::ClockTimeModel, iso_date_model::ISODateModel},
    entities::{Category, ExtractionResult, ReceiptItem},
};

/// JSON object produced by the annotation service.
#[derive(Debug, Default, serde_derive::Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ExtractionModel {
    #[serde(default)]
    pub is_readable: bool,
    pub store_name: Option<String>,
    pub date: Option<String>,
    pub time: Option<String>,
    pub total: Option<f64>,
    pub category: Option<String>,
    pub items: Option<Vec<ExtractedItemModel>>,
}

#[derive(Debug, serde_derive::Deserialize)]
pub(crate) struct ExtractedItemModel {
    pub name: Option<String>,
    pub price: Option<f64>,
    pub category: Option<String>,
}

impl Into<ExtractionResult> for ExtractionModel {
    fn into(self) -> ExtractionResult {
        ExtractionResult {
            is_readable: self.is_readable,
            store_name: non_blank(self.store_name),
            date: non_blank(self.date).and_then(|raw| {
                ISODateModel::from_str(&raw)
                    .inspect_err(|e| debug!(date = %raw, error = ?e, "ignoring extracted date"))
                    .ok()
                    .map(Into::into)
            }),
            time: non_blank(self.time).and_then(|raw| {
                ClockTimeModel::from_str(&raw)
                    .inspect_err(|e| debug!(time = %raw, error = ?e, "ignoring extracted time"))
                    .ok()
                    .map(Into::into)
            }),
            total: self.total,
            dominant_category: non_blank(self.category).map(|c| Category::from_label(&c)),
            items: self.items.map(|items| {
                items
                    .into_iter()
                    .map(|i| {
                        ReceiptItem::new(
                            i.name.unwrap_or_default(),
                            i.price.unwrap_or(0.0),
                            i.category
                                .as_deref()
                                .map(Category::from_label)
                                .unwrap_or_default(),
                        )
                    })
                    .collect()
            }),
        }
    }
}

fn non_blank(s: Option<String>) -> Option<String> {
    s.map(|s| s.trim().to_string()).filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;

    fn parse(json: &str) -> ExtractionResult {
        serde_json::from_str::<ExtractionModel>(json).unwrap().into()
    }

    #[test]
    fn full_extraction() {
        let result = parse(
            r#"{
                "isReadable": true,
                "storeName": "Food City",
                "date": "2025-03-14",
                "time": "09:30",
                "total": 1500,
                "category": "Food",
                "items": [
                    { "name": "Rice", "price": 900, "category": "Food" },
                    { "name": "Pen", "price": 600, "category": "Stationery" }
                ]
            }"#,
        );
        assert!(result.is_readable);
        assert_eq!(result.store_name.as_deref(), Some("Food City"));
        assert_eq!(result.date, NaiveDate::from_ymd_opt(2025, 3, 14));
        assert_eq!(result.total, Some(1500.0));
        assert_eq!(result.dominant_category, Some(Category::Food));
        let items = result.items.unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[1], ReceiptItem::new("Pen", 600.0, Category::Stationery));
    }

    #[test]
    fn unreadable_extraction_only_carries_flag() {
        let result = parse(r#"{ "isReadable": false }"#);
        assert_eq!(result, ExtractionResult::unreadable());
    }

    #[test]
    fn malformed_fields_are_treated_as_missing() {
        let result = parse(
            r#"{
                "isReadable": true,
                "storeName": "   ",
                "date": "last tuesday",
                "time": "noon",
                "category": "Groceries",
                "items": [ { "name": "Tea" } ]
            }"#,
        );
        assert!(result.store_name.is_none());
        assert!(result.date.is_none());
        assert!(result.time.is_none());
        assert_eq!(result.dominant_category, Some(Category::Other));
        assert_eq!(
            result.items.unwrap(),
            vec![ReceiptItem::new("Tea", 0.0, Category::Other)]
        );
    }
}
