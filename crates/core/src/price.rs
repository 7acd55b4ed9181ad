//! Price normalization and display formatting for Hungarian forint
//! amounts. The browsing agent reports prices in whatever shape the store
//! page used ("210 000 Ft", "210.000", 210000), so normalization strips
//! everything but digits before interpreting the value.

use thiserror::Error;

use crate::domain::PriceValue;

/// Failure to interpret an extracted price as a positive forint amount.
#[derive(Debug, Error, PartialEq)]
pub enum NormalizeError {
    /// No digit characters survived stripping.
    #[error("extracted price {raw:?} contains no digits")]
    EmptyPrice { raw: String },
    /// The digit run does not fit the integer range.
    #[error("extracted price {raw:?} is out of range")]
    OutOfRange { raw: String },
}

/// Strip every non-digit character and parse the remainder as a whole
/// forint amount. Decimal separators are not given special treatment, so
/// "1999.50" normalizes to 199950; store listings quote whole forints and
/// the agent is instructed to report them as such.
pub fn normalize(price: &PriceValue) -> Result<i64, NormalizeError> {
    let raw = price.raw_string();
    let digits: String = raw.chars().filter(|ch| ch.is_ascii_digit()).collect();

    if digits.is_empty() {
        return Err(NormalizeError::EmptyPrice { raw });
    }

    digits
        .parse::<i64>()
        .map_err(|_| NormalizeError::OutOfRange { raw })
}

/// Render a forint amount the way Hungarian storefronts do: rounded to a
/// whole number, thousands separated by spaces, and a non-breaking space
/// before the currency marker.
pub fn format_huf(amount: f64) -> String {
    let rounded = amount.round_ties_even() as i64;
    let negative = rounded < 0;
    let digits = rounded.unsigned_abs().to_string();

    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 + 4);
    let leading = digits.len() % 3;
    if leading > 0 {
        grouped.push_str(&digits[..leading]);
    }
    for chunk in digits[leading..].as_bytes().chunks(3) {
        if !grouped.is_empty() {
            grouped.push(' ');
        }
        grouped.push_str(std::str::from_utf8(chunk).unwrap_or_default());
    }

    let sign = if negative { "-" } else { "" };
    format!("{sign}{grouped}\u{00A0}Ft")
}

#[cfg(test)]
mod tests {
    use super::{format_huf, normalize, NormalizeError};
    use crate::domain::PriceValue;

    fn text(raw: &str) -> PriceValue {
        PriceValue::Text(raw.to_string())
    }

    #[test]
    fn normalize_strips_currency_markers_and_separators() {
        assert_eq!(normalize(&text("210 000 Ft")), Ok(210_000));
        assert_eq!(normalize(&text("210.000,-")), Ok(210_000));
        assert_eq!(normalize(&text("Ft 1 999")), Ok(1_999));
    }

    #[test]
    fn normalize_accepts_plain_numbers() {
        let price: PriceValue =
            serde_json::from_str("210000").expect("number should deserialize");
        assert_eq!(normalize(&price), Ok(210_000));
    }

    #[test]
    fn normalize_concatenates_digits_across_decimal_separators() {
        assert_eq!(normalize(&text("1999.50")), Ok(199_950));
    }

    #[test]
    fn normalize_drops_a_leading_minus_sign() {
        assert_eq!(normalize(&text("-5")), Ok(5));
    }

    #[test]
    fn normalize_rejects_digitless_input() {
        assert_eq!(
            normalize(&text("n/a")),
            Err(NormalizeError::EmptyPrice { raw: "n/a".to_string() })
        );
        assert_eq!(
            normalize(&text("")),
            Err(NormalizeError::EmptyPrice { raw: String::new() })
        );
    }

    #[test]
    fn normalize_rejects_absurdly_long_digit_runs() {
        let raw = "9".repeat(40);
        assert_eq!(
            normalize(&text(&raw)),
            Err(NormalizeError::OutOfRange { raw })
        );
    }

    #[test]
    fn format_huf_groups_thousands_with_spaces() {
        assert_eq!(format_huf(250_000.0), "250 000\u{00A0}Ft");
        assert_eq!(format_huf(1_234_567.0), "1 234 567\u{00A0}Ft");
        assert_eq!(format_huf(999.0), "999\u{00A0}Ft");
    }

    #[test]
    fn format_huf_rounds_halves_to_even() {
        assert_eq!(format_huf(1000.5), "1 000\u{00A0}Ft");
        assert_eq!(format_huf(1001.5), "1 002\u{00A0}Ft");
    }

    #[test]
    fn format_huf_keeps_the_sign_outside_the_grouping() {
        assert_eq!(format_huf(-125_000.0), "-125 000\u{00A0}Ft");
    }
}
