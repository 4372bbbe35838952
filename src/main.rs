use std::{path::PathBuf, process::ExitCode};

use chrono::{NaiveDate, NaiveTime};
use clap::{Parser, Subcommand};
use fractic_receipt_scanner::{
    config::ScannerConfig,
    entities::{
        Category, Connectivity, ImageId, IngestionOutcome, IngestionReport, ManualEntryItem,
        ReceiptId,
    },
    util::ReceiptScannerUtil,
};
use fractic_server_error::ServerError;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser)]
#[command(name = "receipt-scanner")]
#[command(about = "Scan receipts into a local expense ledger")]
struct Cli {
    /// RON configuration file.
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Overrides the configured data directory.
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Store a receipt photo and analyze it.
    Capture {
        file: PathBuf,
        /// Only store the image; analyze later with `retry`.
        #[arg(long, default_value_t = false)]
        offline: bool,
    },
    /// Analyze a stored, unprocessed image again.
    Retry { image_id: String },
    /// Record a receipt by hand.
    Manual {
        #[arg(long, default_value = "")]
        store: String,
        /// YYYY-MM-DD; defaults to today.
        #[arg(long)]
        date: Option<String>,
        /// HH:MM; defaults to now.
        #[arg(long)]
        time: Option<String>,
        #[arg(long, default_value = "Other")]
        category: String,
        /// `name=price[=category]`, repeatable.
        #[arg(long = "item")]
        items: Vec<String>,
    },
    /// Remove one line item (0-based) from a receipt.
    RemoveItem { receipt_id: String, index: usize },
    DeleteReceipt {
        receipt_id: String,
        #[arg(long, default_value_t = false)]
        yes: bool,
    },
    /// Delete every receipt. Images and the budget are kept.
    Clear {
        #[arg(long, default_value_t = false)]
        yes: bool,
    },
    DeleteImage { image_id: String },
    /// Show or set the monthly budget.
    Budget { amount: Option<f64> },
    Dashboard,
    Vault,
    Archive,
    /// Write the archive as CSV.
    Export { path: PathBuf },
}

#[tokio::main]
async fn main() -> ExitCode {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .try_init()
    {
        eprintln!("warning: tracing init failed: {e}");
    }

    let cli = Cli::parse();
    match run(cli).await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<ExitCode, ServerError> {
    let mut config = match &cli.config {
        Some(path) => ScannerConfig::from_file(path)?,
        None => ScannerConfig::default(),
    };
    if let Some(data_dir) = cli.data_dir {
        config.data_dir = data_dir;
    }
    let scanner = ReceiptScannerUtil::new(&config)?;

    match cli.command {
        Commands::Capture { file, offline } => {
            let connectivity = if offline {
                Connectivity::Offline
            } else {
                Connectivity::Online
            };
            let report = scanner.capture_file(file, connectivity).await?;
            return Ok(print_report(&report));
        }
        Commands::Retry { image_id } => {
            let report = scanner.retry(&ImageId::from(image_id.as_str())).await;
            return Ok(print_report(&report));
        }
        Commands::Manual {
            store,
            date,
            time,
            category,
            items,
        } => {
            let mut form = scanner.blank_manual_entry();
            form.store_name = store;
            if let Some(date) = date {
                match NaiveDate::parse_from_str(date.trim(), "%Y-%m-%d") {
                    Ok(date) => form.date = date,
                    Err(_) => return Ok(usage_error(&format!("invalid date '{date}'"))),
                }
            }
            if let Some(time) = time {
                match NaiveTime::parse_from_str(time.trim(), "%H:%M") {
                    Ok(time) => form.time = time,
                    Err(_) => return Ok(usage_error(&format!("invalid time '{time}'"))),
                }
            }
            form.dominant_category = Category::from_label(&category);
            if !items.is_empty() {
                form.items = items.iter().map(String::as_str).map(parse_item).collect();
            }
            let receipt = scanner.submit_manual_entry(form).await?;
            println!("Recorded receipt {} ({} items).", receipt.id, receipt.items().len());
        }
        Commands::RemoveItem { receipt_id, index } => {
            match scanner
                .remove_item(&ReceiptId::from(receipt_id.as_str()), index)
                .await?
            {
                Some(total) => println!("Removed item {index}. New total: {total:.2}"),
                None => println!("No item {index} on receipt {receipt_id}; nothing changed."),
            }
        }
        Commands::DeleteReceipt { receipt_id, yes } => {
            if !yes {
                return Ok(usage_error("deleting a receipt needs --yes"));
            }
            scanner
                .delete_receipt(&ReceiptId::from(receipt_id.as_str()))
                .await?;
            println!("Deleted receipt {receipt_id}.");
        }
        Commands::Clear { yes } => {
            if !yes {
                return Ok(usage_error("clearing all receipts needs --yes"));
            }
            scanner.clear_receipts().await?;
            println!("Cleared all receipts.");
        }
        Commands::DeleteImage { image_id } => {
            scanner
                .delete_image(&ImageId::from(image_id.as_str()))
                .await?;
            println!("Deleted image {image_id}.");
        }
        Commands::Budget { amount } => {
            if let Some(amount) = amount {
                scanner.set_monthly_budget(amount).await?;
            }
            println!("Monthly budget: {:.2}", scanner.monthly_budget().await?);
        }
        Commands::Dashboard => print!("{}", scanner.render_dashboard().await?),
        Commands::Vault => print!("{}", scanner.render_vault().await?),
        Commands::Archive => print!("{}", scanner.render_archive().await?),
        Commands::Export { path } => {
            scanner.export_csv(&path).await?;
            println!("Exported archive to {}.", path.display());
        }
    }
    Ok(ExitCode::SUCCESS)
}

/// `name=price[=category]`. A missing price is left blank and parsed as 0.
fn parse_item(raw: &str) -> ManualEntryItem {
    let mut parts = raw.splitn(3, '=');
    let name = parts.next().unwrap_or_default();
    let price = parts.next().unwrap_or_default();
    let category = parts.next().map(Category::from_label).unwrap_or_default();
    ManualEntryItem::new(name, price, category)
}

fn print_report(report: &IngestionReport) -> ExitCode {
    if let Some(image_id) = &report.image_id {
        println!("Image: {image_id}");
    }
    match report.outcome.receipt() {
        Some(receipt) => {
            println!(
                "Receipt {}: {} on {} {}, {} items, total {:.2}",
                receipt.id,
                receipt.store_name,
                receipt.date,
                receipt.time.format("%H:%M"),
                receipt.items().len(),
                receipt.total()
            );
            ExitCode::SUCCESS
        }
        None => {
            if let Some(notice) = report.outcome.notice() {
                println!("{notice}");
            }
            match report.outcome {
                IngestionOutcome::Offline => ExitCode::SUCCESS,
                _ => ExitCode::from(2),
            }
        }
    }
}

fn usage_error(message: &str) -> ExitCode {
    eprintln!("error: {message}");
    ExitCode::from(64)
}
