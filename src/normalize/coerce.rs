//! Cell coercion rules. Malformed cells never fail: they take a default.

use crate::sheet::RawCell;

/// Quantity or amount: numeric cells as-is, everything else 0.
#[inline]
pub fn number_or_zero(cell: &RawCell) -> f64 {
    cell.as_number().unwrap_or(0.0)
}

/// Unit price: numeric cells as-is, everything else `None` (price withheld).
#[inline]
pub fn price_or_none(cell: &RawCell) -> Option<f64> {
    cell.as_number()
}

/// Non-negative discount; anything else is 0.
pub fn discount_or_zero(cell: &RawCell) -> f64 {
    match cell.as_number() {
        Some(v) if v.is_finite() && v > 0.0 => v,
        _ => 0.0,
    }
}

/// Trimmed display text, "" for blank cells.
pub fn text_or_empty(cell: &RawCell) -> String {
    cell.to_trimmed().unwrap_or_default()
}

/// Trimmed display text, `None` for blank cells.
pub fn text_or_none(cell: &RawCell) -> Option<String> {
    cell.to_trimmed()
}

/// Parse numeric text such as `"1,200"` or `" 35 "`.
pub fn parse_number_text(raw: &str) -> Option<f64> {
    let cleaned: String = raw.chars().filter(|c| *c != ',' && !c.is_whitespace()).collect();
    if cleaned.is_empty() {
        return None;
    }
    cleaned.parse::<f64>().ok().filter(|v| v.is_finite())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numeric_only() {
        assert_eq!(number_or_zero(&RawCell::Number(10.0)), 10.0);
        assert_eq!(number_or_zero(&RawCell::from("10")), 0.0);
        assert_eq!(number_or_zero(&RawCell::Empty), 0.0);
        assert_eq!(price_or_none(&RawCell::Number(0.0)), Some(0.0));
        assert_eq!(price_or_none(&RawCell::from("별도")), None);
    }

    #[test]
    fn test_discount() {
        assert_eq!(discount_or_zero(&RawCell::Number(500.0)), 500.0);
        assert_eq!(discount_or_zero(&RawCell::Number(-5.0)), 0.0);
        assert_eq!(discount_or_zero(&RawCell::from("500")), 0.0);
    }

    #[test]
    fn test_text() {
        assert_eq!(text_or_empty(&RawCell::from("  ACME ")), "ACME");
        assert_eq!(text_or_empty(&RawCell::Number(7.0)), "7");
        assert_eq!(text_or_none(&RawCell::Empty), None);
    }

    #[test]
    fn test_parse_number_text() {
        assert_eq!(parse_number_text("1,200"), Some(1200.0));
        assert_eq!(parse_number_text(" 35 "), Some(35.0));
        assert_eq!(parse_number_text("12.5"), Some(12.5));
        assert_eq!(parse_number_text("TBD"), None);
        assert_eq!(parse_number_text(""), None);
    }
}
