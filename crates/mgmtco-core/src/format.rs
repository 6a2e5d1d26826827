//! Display helpers shared by the CLI and the bindings.

use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;

use crate::types::Money;

fn round_half_up(value: Decimal, dp: u32) -> Decimal {
    value.round_dp_with_strategy(dp, RoundingStrategy::MidpointAwayFromZero)
}

fn group_thousands(digits: &str) -> String {
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    grouped
}

/// Compact currency: `$2.5M`, `$42K`, `$950`.
///
/// Values below $1K (negatives included) are printed in full with
/// thousands separators and no decimals.
pub fn format_currency(value: Money) -> String {
    if value >= dec!(1000000) {
        return format!("${:.1}M", round_half_up(value / dec!(1000000), 1));
    }
    if value >= dec!(1000) {
        return format!("${}K", round_half_up(value / dec!(1000), 0));
    }

    let whole = round_half_up(value, 0);
    let digits = whole.abs().trunc().to_string();
    let sign = if whole < Decimal::ZERO { "-" } else { "" };
    format!("{sign}${}", group_thousands(&digits))
}

/// Human-readable runway: `Infinite`, `1 month`, `9 months`, then `X.X years`
/// from twelve months on (`1.0 years`, `2.5 years`).
pub fn format_runway(months: Option<u32>) -> String {
    match months {
        None => "Infinite".to_string(),
        Some(1) => "1 month".to_string(),
        Some(m) if m < 12 => format!("{m} months"),
        Some(m) => format!("{:.1} years", round_half_up(Decimal::from(m) / dec!(12), 1)),
    }
}
