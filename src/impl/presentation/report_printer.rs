use chrono::Local;
use iso_currency::Currency;

use crate::{
    entities::{DashboardSummary, GalleryImage, Receipt},
    presentation::utils::{bar, format_amount, section_header},
};

const BAR_WIDTH: usize = 24;
const ITEM_NAME_WIDTH: usize = 36;

/// Plain-text rendering of the dashboard, vault and archive views.
pub(crate) struct ReportPrinter {
    currency: Currency,
}

impl ReportPrinter {
    pub(crate) fn new(currency: Currency) -> Self {
        Self { currency }
    }

    pub(crate) fn print_dashboard(&self, summary: &DashboardSummary) -> String {
        let mut out = String::new();

        out.push_str(&section_header("Budget"));
        out.push_str(&format!(
            "Spent    {}\n",
            format_amount(summary.total_spent, self.currency)
        ));
        out.push_str(&format!(
            "Limit    {}\n",
            format_amount(summary.monthly_budget, self.currency)
        ));
        out.push_str(&format!(
            "Used     [{}] {:.1}%{}\n",
            bar(summary.budget_progress_percent, 100.0, BAR_WIDTH),
            summary.budget_progress_percent,
            if summary.over_budget { "  OVER BUDGET" } else { "" }
        ));
        out.push('\n');

        out.push_str(&section_header("Last 7 days"));
        let busiest = summary
            .last_seven_days
            .iter()
            .map(|d| d.amount)
            .fold(0.0, f64::max);
        for day in &summary.last_seven_days {
            out.push_str(&format!(
                "{}  [{}] {}\n",
                day.date.format("%a %m-%d"),
                bar(day.amount, busiest, BAR_WIDTH),
                format_amount(day.amount, self.currency)
            ));
        }
        out.push('\n');

        out.push_str(&section_header("Categories"));
        if summary.category_spend.is_empty() {
            out.push_str("No spending recorded.\n");
        }
        for entry in &summary.category_spend {
            let share = if summary.total_spent > 0.0 {
                entry.amount / summary.total_spent * 100.0
            } else {
                0.0
            };
            out.push_str(&format!(
                "{:<20}{:>20}  {:>5.1}%\n",
                entry.category.label(),
                format_amount(entry.amount, self.currency),
                share
            ));
        }
        out
    }

    pub(crate) fn print_vault(&self, images: &[GalleryImage]) -> String {
        let pending = images.iter().filter(|i| !i.is_processed()).count();
        let mut out = section_header(&format!(
            "Vault ({} images, {} unprocessed)",
            images.len(),
            pending
        ));
        if images.is_empty() {
            out.push_str("No images captured yet.\n");
        }
        for image in images {
            let status = match image.linked_receipt_id() {
                Some(receipt_id) => format!("processed -> {receipt_id}"),
                None => "pending".to_string(),
            };
            out.push_str(&format!(
                "{}  {}  {}\n",
                image.id,
                image
                    .captured_at
                    .with_timezone(&Local)
                    .format("%Y-%m-%d %H:%M"),
                status
            ));
        }
        out
    }

    pub(crate) fn print_archive(&self, receipts: &[Receipt]) -> String {
        let mut out = section_header(&format!("Archive ({} receipts)", receipts.len()));
        if receipts.is_empty() {
            out.push_str("No receipts yet.\n");
        }
        for receipt in receipts {
            out.push_str(&format!(
                "{} {}  {}  [{}]  {}\n",
                receipt.date.format("%Y-%m-%d"),
                receipt.time.format("%H:%M"),
                receipt.store_name,
                receipt.dominant_category,
                format_amount(receipt.total(), self.currency)
            ));
            out.push_str(&format!("    id: {}\n", receipt.id));
            for (index, item) in receipt.items().iter().enumerate() {
                let lines = textwrap::wrap(&item.name, ITEM_NAME_WIDTH);
                let first = lines.first().map(|l| l.as_ref()).unwrap_or("");
                out.push_str(&format!(
                    "  {index:>2}. {first:<width$} {:<18} {:>18}\n",
                    item.category.label(),
                    format_amount(item.price, self.currency),
                    width = ITEM_NAME_WIDTH
                ));
                for rest in lines.iter().skip(1) {
                    out.push_str(&format!("      {rest}\n"));
                }
            }
            out.push('\n');
        }
        out
    }
}
