//! Runtime configuration, read from a RON file.
//!
//! Every field has a default, so an empty file (or no file at all) is a
//! valid configuration:
//!
//! ```ron
//! (
//!     data_dir: "/var/lib/receipts",
//!     reporting_currency: "LKR",
//!     annotation_timeout_secs: 45,
//! )
//! ```

use std::{
    path::{Path, PathBuf},
    time::Duration,
};

use fractic_server_error::ServerError;
use iso_currency::Currency;

use crate::errors::{InvalidIsoCurrencyCode, InvalidRon, MissingApiKey, ReadError};

#[derive(Debug, Clone, PartialEq, serde_derive::Deserialize)]
#[serde(default)]
pub struct ScannerConfig {
    /// Holds `ledger.json` and the `gallery/` directory.
    pub data_dir: PathBuf,
    /// Environment variable the annotation service key is read from.
    pub api_key_env: String,
    pub endpoint: String,
    pub model: String,
    /// ISO 4217 code amounts are reported in.
    pub reporting_currency: String,
    pub annotation_timeout_secs: u64,
    pub default_monthly_budget: f64,
}

impl Default for ScannerConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("receipt-scanner-data"),
            api_key_env: "GEMINI_API_KEY".to_string(),
            endpoint: "https://generativelanguage.googleapis.com/v1beta".to_string(),
            model: "gemini-3-flash-preview".to_string(),
            reporting_currency: "LKR".to_string(),
            annotation_timeout_secs: 60,
            default_monthly_budget: 20000.0,
        }
    }
}

impl ScannerConfig {
    pub fn from_ron(s: &str) -> Result<Self, ServerError> {
        ron::from_str(s).map_err(|e| InvalidRon::with_debug("ScannerConfig", &e))
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ServerError> {
        let s = std::fs::read_to_string(path).map_err(|e| ReadError::with_debug(&e))?;
        Self::from_ron(&s)
    }

    pub fn currency(&self) -> Result<Currency, ServerError> {
        Currency::from_code(self.reporting_currency.trim())
            .ok_or_else(|| InvalidIsoCurrencyCode::new(&self.reporting_currency))
    }

    pub fn api_key(&self) -> Result<String, ServerError> {
        std::env::var(&self.api_key_env)
            .ok()
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| MissingApiKey::new(&self.api_key_env))
    }

    pub fn annotation_deadline(&self) -> Duration {
        Duration::from_secs(self.annotation_timeout_secs)
    }

    pub fn ledger_path(&self) -> PathBuf {
        self.data_dir.join("ledger.json")
    }

    pub fn gallery_dir(&self) -> PathBuf {
        self.data_dir.join("gallery")
    }
}
