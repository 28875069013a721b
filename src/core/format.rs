//! Number presentation shared by the shell and CSV export.

pub const CURRENCY_SYMBOL: &str = "₦";

/// Formats a value with exactly two decimals.
pub fn two_decimals(value: f64) -> String {
    // Avoid printing "-0.00" for values that round to zero.
    let rounded = (value * 100.0).round() / 100.0;
    if rounded == 0.0 {
        return "0.00".into();
    }
    format!("{:.2}", value)
}

pub fn money(value: f64) -> String {
    format!("{}{}", CURRENCY_SYMBOL, two_decimals(value))
}
