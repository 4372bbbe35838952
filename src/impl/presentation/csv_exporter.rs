use fractic_server_error::ServerError;

use crate::{
    entities::{Receipt, ReceiptItem},
    errors::CsvExportFailed,
};

#[derive(serde_derive::Serialize)]
struct ArchiveRow<'a> {
    receipt_id: &'a str,
    store_name: &'a str,
    date: String,
    time: String,
    dominant_category: &'static str,
    item_name: &'a str,
    item_category: &'static str,
    item_price: Option<f64>,
    receipt_total: f64,
}

impl<'a> ArchiveRow<'a> {
    fn new(receipt: &'a Receipt, item: Option<&'a ReceiptItem>) -> Self {
        Self {
            receipt_id: receipt.id.as_str(),
            store_name: &receipt.store_name,
            date: receipt.date.format("%Y-%m-%d").to_string(),
            time: receipt.time.format("%H:%M").to_string(),
            dominant_category: receipt.dominant_category.label(),
            item_name: item.map_or("", |i| i.name.as_str()),
            item_category: item.map_or("", |i| i.category.label()),
            item_price: item.map(|i| i.price),
            receipt_total: receipt.total(),
        }
    }
}

/// Flattens the archive to CSV, one row per line item. A receipt without
/// items still gets one row, with the item columns left empty.
pub(crate) struct CsvExporter;

impl CsvExporter {
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) fn export(&self, receipts: &[Receipt]) -> Result<Vec<u8>, ServerError> {
        let mut writer = csv::Writer::from_writer(Vec::new());
        for receipt in receipts {
            if receipt.items().is_empty() {
                writer
                    .serialize(ArchiveRow::new(receipt, None))
                    .map_err(|e| CsvExportFailed::with_debug(&e))?;
            }
            for item in receipt.items() {
                writer
                    .serialize(ArchiveRow::new(receipt, Some(item)))
                    .map_err(|e| CsvExportFailed::with_debug(&e))?;
            }
        }
        writer
            .into_inner()
            .map_err(|e| CsvExportFailed::with_debug(&e))
    }
}

#[cfg(test)]
mod tests {
    use chrono::{NaiveDate, NaiveTime, Utc};

    use super::*;
    use crate::entities::{Category, ReceiptId};

    fn receipt(id: &str, items: Vec<ReceiptItem>) -> Receipt {
        Receipt::new(
            ReceiptId::from(id),
            "Food City, Colombo",
            NaiveDate::from_ymd_opt(2025, 3, 14).unwrap(),
            NaiveTime::from_hms_opt(9, 30, 0).unwrap(),
            Category::Food,
            items,
            Utc::now(),
            None,
        )
    }

    #[test]
    fn one_row_per_item() {
        let receipts = vec![
            receipt(
                "r-1",
                vec![
                    ReceiptItem::new("Rice", 900.0, Category::Food),
                    ReceiptItem::new("Pen", 600.0, Category::Stationery),
                ],
            ),
            receipt("r-2", Vec::new()),
        ];
        let csv = String::from_utf8(CsvExporter::new().export(&receipts).unwrap()).unwrap();
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(
            lines,
            vec![
                "receipt_id,store_name,date,time,dominant_category,item_name,item_category,item_price,receipt_total",
                "r-1,\"Food City, Colombo\",2025-03-14,09:30,Food,Rice,Food,900.0,1500.0",
                "r-1,\"Food City, Colombo\",2025-03-14,09:30,Food,Pen,Stationery,600.0,1500.0",
                "r-2,\"Food City, Colombo\",2025-03-14,09:30,Food,,,,0.0",
            ]
        );
    }
}
