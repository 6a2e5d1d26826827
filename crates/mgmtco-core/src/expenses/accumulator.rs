use rust_decimal::{Decimal, MathematicalOps};
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::model::budget::{BudgetData, ExpenseItem, DEFAULT_INFLATION_RATE};
use crate::types::{Money, Rate};

/// Expenses for one month, by bucket.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ExpenseBreakdown {
    pub total: Money,
    pub team: Money,
    pub operations: Money,
    pub overhead: Money,
}

/// Un-inflated monthly cost of each bucket.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ExpenseBase {
    pub team: Money,
    pub operations: Money,
    pub overhead: Money,
}

fn bucket_total(items: &[ExpenseItem]) -> Money {
    items.iter().map(|item| item.monthly_cost).sum()
}

/// Compound inflation factor for a zero-based month: steps once per full year.
pub fn inflation_factor(inflation_rate: Rate, month_index: u32) -> Decimal {
    let elapsed_years = i64::from(month_index / 12);
    (Decimal::ONE + inflation_rate).powi(elapsed_years)
}

impl ExpenseBase {
    pub fn from_data(data: &BudgetData) -> Self {
        ExpenseBase {
            team: bucket_total(&data.team),
            operations: bucket_total(&data.operations),
            overhead: bucket_total(&data.overhead),
        }
    }

    pub fn total(&self) -> Money {
        self.team + self.operations + self.overhead
    }

    /// Bucket costs at `month_index` with the same escalation on every bucket.
    pub fn at_month(&self, inflation_rate: Rate, month_index: u32) -> ExpenseBreakdown {
        let factor = inflation_factor(inflation_rate, month_index);
        let team = self.team * factor;
        let operations = self.operations * factor;
        let overhead = self.overhead * factor;
        ExpenseBreakdown {
            total: team + operations + overhead,
            team,
            operations,
            overhead,
        }
    }
}

/// Expenses for zero-based `month_index`, using the input's inflation setting.
pub fn monthly_expenses(data: &BudgetData, month_index: u32) -> ExpenseBreakdown {
    let inflation_rate = data
        .settings
        .as_ref()
        .map(|s| s.inflation_rate)
        .unwrap_or(DEFAULT_INFLATION_RATE)
        / dec!(100);
    ExpenseBase::from_data(data).at_month(inflation_rate, month_index)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::budget::Settings;

    fn sample_data(inflation: Decimal) -> BudgetData {
        BudgetData {
            starting_cash: dec!(500000),
            funds: vec![],
            team: vec![
                ExpenseItem::new("Managing Partner", dec!(20000)),
                ExpenseItem::new("Associate", dec!(8000)),
            ],
            operations: vec![ExpenseItem::new("Fund Admin", dec!(7000))],
            overhead: vec![ExpenseItem::new("Office", dec!(5000))],
            settings: Some(Settings {
                inflation_rate: inflation,
                ..Settings::default()
            }),
        }
    }

    #[test]
    fn test_bucket_sums() {
        let e = monthly_expenses(&sample_data(dec!(0)), 0);
        assert_eq!(e.team, dec!(28000));
        assert_eq!(e.operations, dec!(7000));
        assert_eq!(e.overhead, dec!(5000));
        assert_eq!(e.total, dec!(40000));
    }

    #[test]
    fn test_no_inflation_within_first_year() {
        let data = sample_data(dec!(10));
        assert_eq!(monthly_expenses(&data, 0).total, dec!(40000));
        assert_eq!(monthly_expenses(&data, 11).total, dec!(40000));
    }

    #[test]
    fn test_inflation_steps_yearly() {
        let data = sample_data(dec!(10));
        assert_eq!(monthly_expenses(&data, 12).total, dec!(44000));
        assert_eq!(monthly_expenses(&data, 23).total, dec!(44000));
        assert_eq!(monthly_expenses(&data, 24).total, dec!(48400));
    }

    #[test]
    fn test_inflation_applies_to_every_bucket() {
        let e = monthly_expenses(&sample_data(dec!(10)), 12);
        assert_eq!(e.team, dec!(30800));
        assert_eq!(e.operations, dec!(7700));
        assert_eq!(e.overhead, dec!(5500));
    }

    #[test]
    fn test_default_inflation_without_settings() {
        let mut data = sample_data(dec!(0));
        data.settings = None;
        // Default 3%
        assert_eq!(monthly_expenses(&data, 12).total, dec!(41200));
    }

    #[test]
    fn test_empty_buckets() {
        let mut data = sample_data(dec!(3));
        data.team.clear();
        data.operations.clear();
        data.overhead.clear();
        assert_eq!(monthly_expenses(&data, 36).total, Decimal::ZERO);
    }
}
