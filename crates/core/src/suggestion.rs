//! Pricing advice derived from the caller's current price and the lowest
//! price the browsing agent found. The wording is part of the public
//! contract and is matched verbatim by downstream consumers.

use crate::price::format_huf;

/// Advisory returned when the normalized lowest price is zero or negative.
/// A degenerate market price is reported, not treated as a failure.
pub const DEGENERATE_ADVISORY: &str =
    "Lowest price found was zero or negative, cannot provide comparison.";

/// Percentage gap between the caller's price and the lowest found, rounded
/// to the nearest whole percent with ties going to even. `None` when the
/// lowest price is degenerate and no meaningful ratio exists.
pub fn percent_difference(current: f64, lowest: i64) -> Option<i64> {
    if lowest <= 0 {
        return None;
    }

    let lowest = lowest as f64;
    let ratio = (current - lowest) / lowest * 100.0;
    Some(ratio.round_ties_even() as i64)
}

/// Build the advisory sentence for a comparison. Gaps strictly beyond five
/// percent in either direction get directional advice; anything inside the
/// band, boundary included, is called competitive.
pub fn suggest(current: f64, lowest: i64) -> String {
    let Some(diff_pct) = percent_difference(current, lowest) else {
        return DEGENERATE_ADVISORY.to_string();
    };

    let current_fmt = format_huf(current);
    let lowest_fmt = format_huf(lowest as f64);

    if diff_pct > 5 {
        format!(
            "Your price ({current_fmt}) is {diff_pct}% above the lowest found ({lowest_fmt}); consider lowering."
        )
    } else if diff_pct < -5 {
        format!(
            "Your price ({current_fmt}) is {}% below the lowest found ({lowest_fmt}); you could potentially raise it.",
            diff_pct.abs()
        )
    } else {
        format!(
            "Your price ({current_fmt}) is competitive with the lowest found ({lowest_fmt})."
        )
    }
}
