pub mod csv_out;
pub mod json;
pub mod minimal;
pub mod table;

use crate::OutputFormat;
use rust_decimal::Decimal;
use serde_json::Value;

/// Dispatch output to the appropriate formatter.
pub fn format_output(format: &OutputFormat, value: &Value) {
    match format {
        OutputFormat::Json => json::print_json(value),
        OutputFormat::Table => table::print_table(value),
        OutputFormat::Csv => csv_out::print_csv(value),
        OutputFormat::Minimal => minimal::print_minimal(value),
    }
}

/// Result fields holding money amounts.
const CURRENCY_FIELDS: &[&str] = &[
    "revenue",
    "expenses",
    "net_cash_flow",
    "cash_balance",
    "monthly_burn",
    "annual_budget",
    "annual_revenue",
    "seed_capital_needed",
    "seed_capital_delta",
    "team_cost",
    "operations_cost",
    "overhead_cost",
    "total_carry",
    "amount",
    "ending_cash",
];

/// Result fields holding a runway in months (null = never depleted).
const RUNWAY_FIELDS: &[&str] = &["runway_months", "achieved_runway_months"];

/// Human-readable rendering of known budget fields, or `None` to fall back
/// to the formatter's generic rendering.
pub fn humanize(key: &str, value: &Value) -> Option<String> {
    if CURRENCY_FIELDS.contains(&key) {
        let amount: Decimal = match value {
            Value::String(s) => s.parse().ok()?,
            Value::Number(n) => n.to_string().parse().ok()?,
            _ => return None,
        };
        return Some(mgmtco_core::format_currency(amount));
    }
    if RUNWAY_FIELDS.contains(&key) {
        return match value {
            Value::Null => Some(mgmtco_core::format_runway(None)),
            Value::Number(n) => n
                .as_u64()
                .and_then(|m| u32::try_from(m).ok())
                .map(|m| mgmtco_core::format_runway(Some(m))),
            _ => None,
        };
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_humanize_currency_from_decimal_string() {
        assert_eq!(humanize("monthly_burn", &json!("40000")).as_deref(), Some("$40K"));
        assert_eq!(humanize("annual_revenue", &json!("2500000")).as_deref(), Some("$2.5M"));
    }

    #[test]
    fn test_humanize_runway() {
        assert_eq!(humanize("runway_months", &Value::Null).as_deref(), Some("Infinite"));
        assert_eq!(humanize("runway_months", &json!(24)).as_deref(), Some("2.0 years"));
    }

    #[test]
    fn test_humanize_leaves_other_fields() {
        assert_eq!(humanize("break_even_month", &json!(3)), None);
    }
}
