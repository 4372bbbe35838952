use chrono::{DateTime, Local, NaiveTime, Timelike, Utc};
use tracing::warn;

use crate::{
    data::models::price_model::{sanitize_price, PriceModel},
    entities::{
        Category, ExtractionResult, ImageId, ManualEntryForm, Receipt, ReceiptId, ReceiptItem,
    },
};

const UNKNOWN_STORE: &str = "Unknown Store";
const MANUAL_STORE: &str = "Manual Entry";
const LUMP_SUM_ITEM: &str = "Receipt total";

/// Tolerance when comparing a declared total against the sum of its items.
const TOTAL_EPSILON: f64 = 0.005;

pub(crate) struct ReceiptBuilder;

impl ReceiptBuilder {
    /// Builds a receipt from a readable extraction, filling in anything the
    /// service left out.
    pub(crate) fn from_extraction(
        extraction: ExtractionResult,
        image_id: ImageId,
        now: DateTime<Utc>,
    ) -> Receipt {
        let local = now.with_timezone(&Local);
        let dominant_category = extraction.dominant_category.unwrap_or_default();
        let items = Self::reconcile_items(
            extraction.items.unwrap_or_default(),
            extraction.total,
            dominant_category,
        );
        Receipt::new(
            ReceiptId::generate(),
            extraction
                .store_name
                .unwrap_or_else(|| UNKNOWN_STORE.to_string()),
            extraction.date.unwrap_or_else(|| local.date_naive()),
            extraction.time.unwrap_or_else(|| minute_of(&local)),
            dominant_category,
            items,
            now,
            Some(image_id),
        )
    }

    pub(crate) fn from_manual_entry(form: ManualEntryForm, now: DateTime<Utc>) -> Receipt {
        let store_name = match form.store_name.trim() {
            "" => MANUAL_STORE.to_string(),
            name => name.to_string(),
        };
        let items = form
            .items
            .into_iter()
            .filter(|row| !row.is_blank())
            .map(|row| {
                ReceiptItem::new(
                    row.name.trim(),
                    PriceModel::parse_lenient(&row.price).into(),
                    row.category,
                )
            })
            .collect();
        Receipt::new(
            ReceiptId::generate(),
            store_name,
            form.date,
            form.time,
            form.dominant_category,
            items,
            now,
            None,
        )
    }

    /// Sanitizes item prices and reconciles them with a declared total.
    ///
    /// Items always win over the declared total. A positive total without
    /// any items becomes a single lump-sum item so the receipt total is
    /// preserved.
    pub(crate) fn reconcile_items(
        items: Vec<ReceiptItem>,
        declared_total: Option<f64>,
        dominant_category: Category,
    ) -> Vec<ReceiptItem> {
        let items: Vec<ReceiptItem> = items
            .into_iter()
            .map(|mut item| {
                let price = sanitize_price(item.price);
                if price != item.price {
                    warn!(item = %item.name, price = item.price, "discarding invalid item price");
                    item.price = price;
                }
                item
            })
            .collect();

        let declared = declared_total.map(sanitize_price).unwrap_or(0.0);
        if items.is_empty() {
            if declared > 0.0 {
                return vec![ReceiptItem::new(LUMP_SUM_ITEM, declared, dominant_category)];
            }
            return items;
        }

        let computed: f64 = items.iter().map(|i| i.price).sum();
        if declared_total.is_some() && (computed - declared).abs() > TOTAL_EPSILON {
            warn!(
                declared,
                computed, "declared receipt total differs from its items; using item sum"
            );
        }
        items
    }
}

pub(crate) fn minute_of<T: Timelike>(t: &T) -> NaiveTime {
    NaiveTime::from_hms_opt(t.hour(), t.minute(), 0).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use chrono::{NaiveDate, TimeZone as _};
    use rstest::rstest;

    use super::*;
    use crate::entities::ManualEntryItem;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 14, 12, 35, 42).unwrap()
    }

    fn food_city() -> ExtractionResult {
        ExtractionResult {
            is_readable: true,
            store_name: Some("Food City".to_string()),
            date: NaiveDate::from_ymd_opt(2025, 3, 14),
            time: NaiveTime::from_hms_opt(9, 30, 0),
            total: Some(1500.0),
            dominant_category: Some(Category::Food),
            items: Some(vec![
                ReceiptItem::new("Rice", 900.0, Category::Food),
                ReceiptItem::new("Pen", 600.0, Category::Stationery),
            ]),
        }
    }

    #[test]
    fn extraction_is_carried_into_receipt() {
        let image_id = ImageId::from("img-1");
        let receipt = ReceiptBuilder::from_extraction(food_city(), image_id.clone(), now());
        assert_eq!(receipt.store_name, "Food City");
        assert_eq!(receipt.total(), 1500.0);
        assert_eq!(receipt.items().len(), 2);
        assert_eq!(receipt.dominant_category, Category::Food);
        assert_eq!(receipt.created_at, now());
        assert_eq!(receipt.source_image_id, Some(image_id));
    }

    #[test]
    fn missing_extraction_fields_are_defaulted() {
        let extraction = ExtractionResult {
            is_readable: true,
            ..Default::default()
        };
        let receipt = ReceiptBuilder::from_extraction(extraction, ImageId::from("i"), now());
        let local = now().with_timezone(&Local);
        assert_eq!(receipt.store_name, "Unknown Store");
        assert_eq!(receipt.date, local.date_naive());
        assert_eq!(receipt.time, minute_of(&local));
        assert_eq!(receipt.dominant_category, Category::Other);
        assert!(receipt.items().is_empty());
        assert_eq!(receipt.total(), 0.0);
    }

    #[test]
    fn lump_sum_extraction_keeps_declared_total() {
        let extraction = ExtractionResult {
            is_readable: true,
            total: Some(780.0),
            dominant_category: Some(Category::Medicine),
            ..Default::default()
        };
        let receipt = ReceiptBuilder::from_extraction(extraction, ImageId::from("i"), now());
        assert_eq!(
            receipt.items(),
            &[ReceiptItem::new("Receipt total", 780.0, Category::Medicine)]
        );
        assert_eq!(receipt.total(), 780.0);
    }

    #[test]
    fn item_sum_wins_over_declared_total() {
        let mut extraction = food_city();
        extraction.total = Some(2000.0);
        let receipt = ReceiptBuilder::from_extraction(extraction, ImageId::from("i"), now());
        assert_eq!(receipt.total(), 1500.0);
    }

    #[rstest]
    #[case(-10.0, 0.0)]
    #[case(f64::NAN, 0.0)]
    #[case(f64::INFINITY, 0.0)]
    #[case(42.5, 42.5)]
    fn item_prices_are_sanitized(#[case] price: f64, #[case] expected: f64) {
        let items = ReceiptBuilder::reconcile_items(
            vec![ReceiptItem::new("x", price, Category::Other)],
            None,
            Category::Other,
        );
        assert_eq!(items[0].price, expected);
    }

    #[test]
    fn manual_entry_parses_prices_leniently() {
        let form = ManualEntryForm {
            store_name: "Corner Shop".to_string(),
            date: NaiveDate::from_ymd_opt(2025, 3, 10).unwrap(),
            time: NaiveTime::from_hms_opt(8, 15, 0).unwrap(),
            dominant_category: Category::Food,
            items: vec![
                ManualEntryItem::new("Bread", "250", Category::Food),
                ManualEntryItem::new("Milk", "not-a-number", Category::Food),
            ],
        };
        let receipt = ReceiptBuilder::from_manual_entry(form, now());
        assert_eq!(receipt.total(), 250.0);
        assert_eq!(receipt.items().len(), 2);
        assert_eq!(receipt.items()[1].price, 0.0);
        assert!(receipt.source_image_id.is_none());
        assert_eq!(receipt.date, NaiveDate::from_ymd_opt(2025, 3, 10).unwrap());
    }

    #[test]
    fn manual_entry_skips_blank_rows_and_names_store() {
        let mut form = ManualEntryForm::blank(now());
        form.store_name = "   ".to_string();
        form.items.push(ManualEntryItem::new(" Tea ", "120", Category::Food));
        let receipt = ReceiptBuilder::from_manual_entry(form, now());
        assert_eq!(receipt.store_name, "Manual Entry");
        assert_eq!(
            receipt.items(),
            &[ReceiptItem::new("Tea", 120.0, Category::Food)]
        );
    }
}
