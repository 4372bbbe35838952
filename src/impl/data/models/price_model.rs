use std::sync::LazyLock;

use regex::Regex;

static LEADING_NUMBER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[+-]?(\d+\.?\d*|\.\d+)([eE][+-]?\d+)?")
        .expect("hardcoded regex should be valid")
});

/// Price typed into a form field.
///
/// Parsing is forgiving: the longest leading number is used ("120 Rs" -> 120,
/// "1,250" -> 1), and anything that does not yield a finite, non-negative
/// amount becomes 0.
#[derive(Debug, PartialEq)]
pub(crate) struct PriceModel(f64);

impl PriceModel {
    pub(crate) fn parse_lenient(raw: &str) -> Self {
        let parsed = LEADING_NUMBER
            .find(raw.trim())
            .and_then(|m| m.as_str().parse::<f64>().ok())
            .unwrap_or(0.0);
        PriceModel(sanitize_price(parsed))
    }
}

impl Into<f64> for PriceModel {
    fn into(self) -> f64 {
        self.0
    }
}

/// Clamps prices to finite, non-negative values.
pub(crate) fn sanitize_price(price: f64) -> f64 {
    if price.is_finite() && price > 0.0 {
        price
    } else {
        0.0
    }
}
