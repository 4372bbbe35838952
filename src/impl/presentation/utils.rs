use iso_currency::Currency;
use num_format::{Locale, ToFormattedString as _};

const LINE_WIDTH: usize = 80;

/// Standard number decimal places for the given currency
/// (ex. JPY = 0, LKR = 2).
fn decimal_places(currency: Currency) -> u32 {
    currency.exponent().unwrap_or(0) as u32
}

/// Format an amount prefixed with the currency code, with the currency's
/// number of decimal places and thousands separators (ex. "LKR 1,500.00").
///
/// Uses en locale ('.' as decimal mark) regardless of the user's locale.
pub(crate) fn format_amount(amount: f64, currency: Currency) -> String {
    let decimal_places = decimal_places(currency);
    let scale = 10_i64.pow(decimal_places);
    let minor_units = (amount * scale as f64).round() as i64;
    let sign = if minor_units < 0 { "-" } else { "" };
    let minor_units = minor_units.abs();
    let integer_part = (minor_units / scale).to_formatted_string(&Locale::en);
    if decimal_places == 0 {
        format!("{} {}{}", currency.code(), sign, integer_part)
    } else {
        format!(
            "{} {}{}.{:0width$}",
            currency.code(),
            sign,
            integer_part,
            minor_units % scale,
            width = decimal_places as usize
        )
    }
}

/// Section header padded with dashes to the full line width.
pub(crate) fn section_header(title: &str) -> String {
    let head = format!("; --- {title} ");
    let pad = LINE_WIDTH.saturating_sub(head.chars().count());
    format!("{head}{}\n\n", "-".repeat(pad))
}

/// Horizontal bar of `width` cells, filled in proportion to
/// `value / max`.
pub(crate) fn bar(value: f64, max: f64, width: usize) -> String {
    let filled = if max > 0.0 && value > 0.0 {
        (((value / max) * width as f64).round() as usize).clamp(1, width)
    } else {
        0
    };
    format!("{}{}", "#".repeat(filled), ".".repeat(width - filled))
}
