//! Human-readable number labels for bars and metric tiles.
//!
//! All rounding is half-to-even, so `2_500.0` prints as `"2K"` and
//! `1_250_000.0` as `"1.2M"`.

use crate::services::aggregation::Metric;

/// Label used wherever a value is undefined or not finite.
pub const NOT_AVAILABLE: &str = "n/a";

/// Round to the nearest integer, ties to even.
pub fn round_half_even(value: f64) -> f64 {
    // adding zero folds -0.0 into 0.0 so it never prints as "-0"
    value.round_ties_even() + 0.0
}

/// Magnitude-scaled label for revenue-style amounts.
///
/// # Examples
///
/// ```
/// use hotel_dashboard::services::formatting::format_amount;
///
/// assert_eq!(format_amount(1_250_000.0), "1.2M");
/// assert_eq!(format_amount(3_500.0), "4K");
/// assert_eq!(format_amount(999.0), "999");
/// ```
pub fn format_amount(value: f64) -> String {
    if !value.is_finite() {
        return NOT_AVAILABLE.to_string();
    }
    if value >= 1_000_000.0 {
        let tenths = round_half_even(value / 100_000.0);
        format!("{:.1}M", tenths / 10.0)
    } else if value >= 1_000.0 {
        format!("{:.0}K", round_half_even(value / 1_000.0))
    } else {
        format!("{:.0}", round_half_even(value))
    }
}

/// Rounded integer with `,` thousands separators.
pub fn format_thousands(value: f64) -> String {
    if !value.is_finite() {
        return NOT_AVAILABLE.to_string();
    }
    let rounded = round_half_even(value);
    let digits = format!("{:.0}", rounded.abs());

    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if rounded < 0.0 {
        grouped.push('-');
    }
    for (idx, ch) in digits.chars().enumerate() {
        if idx > 0 && (digits.len() - idx) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    grouped
}

/// Text for a headline metric tile, e.g. `"12,345 EGP"`.
pub fn format_metric(value: Option<f64>, symbol: Option<&str>) -> String {
    match value.filter(|v| v.is_finite()) {
        None => NOT_AVAILABLE.to_string(),
        Some(v) => match symbol {
            Some(symbol) => format!("{} {}", format_thousands(v), symbol),
            None => format_thousands(v),
        },
    }
}

/// Bar label for a metric value: amounts are magnitude-scaled, counts and
/// rates use thousands separators.
pub fn label_for(metric: Metric, value: Option<f64>) -> String {
    match (metric, value) {
        (_, None) => NOT_AVAILABLE.to_string(),
        (Metric::Revenue, Some(v)) => format_amount(v),
        (Metric::Nights | Metric::Adr, Some(v)) => format_thousands(v),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_amount_magnitudes() {
        assert_eq!(format_amount(1_250_000.0), "1.2M");
        assert_eq!(format_amount(1_500_000.0), "1.5M");
        assert_eq!(format_amount(1_000_000.0), "1.0M");
        assert_eq!(format_amount(2_500.0), "2K");
        assert_eq!(format_amount(3_500.0), "4K");
        assert_eq!(format_amount(340_000.0), "340K");
        assert_eq!(format_amount(999.0), "999");
        assert_eq!(format_amount(0.5), "0");
        assert_eq!(format_amount(1.5), "2");
    }

    #[test]
    fn test_format_amount_non_finite() {
        assert_eq!(format_amount(f64::NAN), "n/a");
        assert_eq!(format_amount(f64::INFINITY), "n/a");
    }

    #[test]
    fn test_format_amount_small_negative_has_no_sign() {
        assert_eq!(format_amount(-0.2), "0");
        assert_eq!(format_amount(-12.0), "-12");
    }

    #[test]
    fn test_format_thousands() {
        assert_eq!(format_thousands(0.0), "0");
        assert_eq!(format_thousands(999.4), "999");
        assert_eq!(format_thousands(1_000.0), "1,000");
        assert_eq!(format_thousands(1_234_567.5), "1,234,568");
        assert_eq!(format_thousands(12_345.5), "12,346");
        assert_eq!(format_thousands(12_344.5), "12,344");
        assert_eq!(format_thousands(-4_500.0), "-4,500");
    }

    #[test]
    fn test_format_metric() {
        assert_eq!(format_metric(Some(12_345.0), Some("EGP")), "12,345 EGP");
        assert_eq!(format_metric(Some(250.0), None), "250");
        assert_eq!(format_metric(None, Some("USD")), "n/a");
        assert_eq!(format_metric(Some(f64::NAN), Some("USD")), "n/a");
    }

    #[test]
    fn test_label_for_metric() {
        assert_eq!(label_for(Metric::Revenue, Some(1_500_000.0)), "1.5M");
        assert_eq!(label_for(Metric::Nights, Some(1_500.0)), "1,500");
        assert_eq!(label_for(Metric::Adr, None), "n/a");
    }
}
