use chrono::{Datelike, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::carry::curve::RealizationCurve;
use crate::error::MgmtCoError;
use crate::model::fund::{Fund, ResolvedFund};
use crate::types::*;
use crate::MgmtCoResult;

pub const DEFAULT_INFLATION_RATE: Percent = dec!(3);
pub const DEFAULT_PROJECTION_YEARS: u32 = 5;

fn default_inflation_rate() -> Percent {
    DEFAULT_INFLATION_RATE
}

fn default_projection_years() -> u32 {
    DEFAULT_PROJECTION_YEARS
}

/// A recurring monthly cost line (a hire, a subscription, rent...).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpenseItem {
    /// Role or line-item name
    pub name: String,
    /// Cost per month, in currency units
    pub monthly_cost: Money,
}

impl ExpenseItem {
    pub fn new(name: impl Into<String>, monthly_cost: Money) -> Self {
        ExpenseItem {
            name: name.into(),
            monthly_cost,
        }
    }
}

/// Global projection parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// Annual expense inflation (percent)
    #[serde(default = "default_inflation_rate")]
    pub inflation_rate: Percent,
    /// Horizon of the monthly projection
    #[serde(default = "default_projection_years")]
    pub projection_years: u32,
    /// Calendar year of projection month 0 (current UTC year when absent)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_year: Option<i32>,
    /// Replacement for the standard carry realization curve
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub realization_curve: Option<RealizationCurve>,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            inflation_rate: DEFAULT_INFLATION_RATE,
            projection_years: DEFAULT_PROJECTION_YEARS,
            start_year: None,
            realization_curve: None,
        }
    }
}

/// Settings with every default applied and rates as decimals.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedSettings {
    pub inflation_rate: Rate,
    pub projection_years: u32,
    pub start_year: i32,
    pub realization_curve: RealizationCurve,
}

impl ResolvedSettings {
    pub fn total_months(&self) -> u32 {
        self.projection_years * 12
    }
}

/// Everything the engine needs for one run. Self-contained: no lookups
/// outside this value happen during a projection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BudgetData {
    /// Cash on hand at the start of month 0
    pub starting_cash: Money,
    /// Funds under management, in priority order
    #[serde(default)]
    pub funds: Vec<Fund>,
    /// Team compensation lines
    #[serde(default)]
    pub team: Vec<ExpenseItem>,
    /// Operating cost lines (fund admin, legal, audit...)
    #[serde(default)]
    pub operations: Vec<ExpenseItem>,
    /// Overhead lines (rent, travel, software...)
    #[serde(default)]
    pub overhead: Vec<ExpenseItem>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub settings: Option<Settings>,
}

impl BudgetData {
    /// Resolve settings. `start_year` falls back to the current UTC year,
    /// the only value not taken from the input.
    pub fn resolve_settings(&self) -> ResolvedSettings {
        let settings = self.settings.clone().unwrap_or_default();
        ResolvedSettings {
            inflation_rate: settings.inflation_rate / dec!(100),
            projection_years: settings.projection_years,
            start_year: settings.start_year.unwrap_or_else(|| Utc::now().year()),
            realization_curve: settings.realization_curve.unwrap_or_default(),
        }
    }

    /// Copy with `start_year` fixed, so repeated projections of variants of
    /// this input share one calendar.
    pub fn with_pinned_start_year(&self) -> BudgetData {
        let start_year = self.resolve_settings().start_year;
        let mut pinned = self.clone();
        let mut settings = pinned.settings.take().unwrap_or_default();
        settings.start_year = Some(start_year);
        pinned.settings = Some(settings);
        pinned
    }

    pub fn resolved_funds(&self) -> Vec<ResolvedFund> {
        self.funds.iter().map(Fund::resolve).collect()
    }

    /// Check the preconditions the engine assumes but never enforces.
    pub fn validate(&self) -> MgmtCoResult<()> {
        for (i, fund) in self.funds.iter().enumerate() {
            fund.validate(i)?;
        }

        for (bucket, items) in [
            ("team", &self.team),
            ("operations", &self.operations),
            ("overhead", &self.overhead),
        ] {
            for (i, item) in items.iter().enumerate() {
                if item.monthly_cost < Decimal::ZERO {
                    return Err(MgmtCoError::InvalidInput {
                        field: format!("{bucket}[{i}].monthly_cost"),
                        reason: format!("Cost for '{}' cannot be negative", item.name),
                    });
                }
            }
        }

        if let Some(settings) = &self.settings {
            if settings.projection_years == 0 {
                return Err(MgmtCoError::InvalidInput {
                    field: "settings.projection_years".into(),
                    reason: "Projection horizon must be at least one year".into(),
                });
            }
            if settings.inflation_rate <= dec!(-100) {
                return Err(MgmtCoError::InvalidInput {
                    field: "settings.inflation_rate".into(),
                    reason: "Inflation rate must be greater than -100%".into(),
                });
            }
            if let Some(curve) = &settings.realization_curve {
                curve.validate()?;
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_settings_defaults_when_absent() {
        let data = BudgetData {
            starting_cash: dec!(100000),
            funds: vec![],
            team: vec![],
            operations: vec![],
            overhead: vec![],
            settings: None,
        };
        let resolved = data.resolve_settings();
        assert_eq!(resolved.inflation_rate, dec!(0.03));
        assert_eq!(resolved.projection_years, 5);
        assert_eq!(resolved.total_months(), 60);
        assert_eq!(resolved.realization_curve, RealizationCurve::standard());
    }

    #[test]
    fn test_partial_settings_json_fills_defaults() {
        let settings: Settings = serde_json::from_str(r#"{"projection_years": 3}"#).unwrap();
        assert_eq!(settings.inflation_rate, dec!(3));
        assert_eq!(settings.projection_years, 3);
        assert_eq!(settings.start_year, None);
    }

    #[test]
    fn test_budget_accepts_numeric_json() {
        let data: BudgetData = serde_json::from_str(
            r#"{
                "starting_cash": 250000,
                "funds": [{"id": "f1", "size": 75, "fee_rate": 2.0, "first_close_year": 2026}],
                "team": [{"name": "Partner", "monthly_cost": 25000}]
            }"#,
        )
        .unwrap();
        assert_eq!(data.starting_cash, dec!(250000));
        assert_eq!(data.funds[0].fee_rate, dec!(2));
        assert!(data.operations.is_empty());
        assert!(data.settings.is_none());
    }

    #[test]
    fn test_validate_rejects_negative_cost() {
        let data = BudgetData {
            starting_cash: dec!(0),
            funds: vec![],
            team: vec![ExpenseItem::new("Analyst", dec!(-10))],
            operations: vec![],
            overhead: vec![],
            settings: None,
        };
        match data.validate() {
            Err(MgmtCoError::InvalidInput { field, .. }) => assert_eq!(field, "team[0].monthly_cost"),
            other => panic!("expected InvalidInput, got {other:?}"),
        }
    }

    #[test]
    fn test_pinned_start_year() {
        let data = BudgetData {
            starting_cash: dec!(0),
            funds: vec![],
            team: vec![],
            operations: vec![],
            overhead: vec![],
            settings: None,
        };
        let pinned = data.with_pinned_start_year();
        let settings = pinned.settings.unwrap();
        assert_eq!(settings.start_year, Some(Utc::now().year()));
        assert_eq!(settings.projection_years, DEFAULT_PROJECTION_YEARS);
    }

    #[test]
    fn test_validate_rejects_zero_horizon() {
        let data = BudgetData {
            starting_cash: dec!(0),
            funds: vec![],
            team: vec![],
            operations: vec![],
            overhead: vec![],
            settings: Some(Settings {
                projection_years: 0,
                ..Settings::default()
            }),
        };
        assert!(data.validate().is_err());
    }
}
