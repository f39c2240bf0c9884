//! Price text normalization.
//!
//! Turns raw price strings such as `"$1,234.56"` or `"USD 99"` into a number.
//! Commas are always treated as thousands separators, so comma-decimal
//! locales (`"12,99"`) normalize to the wrong magnitude (`1299.0`).

/// Parse a decimal price out of decorated text.
///
/// Keeps only ASCII digits and `.`, drops thousands separators and parses
/// what is left. Returns `None` when nothing parseable remains.
pub fn normalize_price(raw: &str) -> Option<f64> {
    let cleaned: String = raw
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.')
        .collect();

    if cleaned.is_empty() {
        return None;
    }

    cleaned.parse::<f64>().ok()
}
