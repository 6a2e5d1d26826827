use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::error::MgmtCoError;
use crate::types::*;
use crate::MgmtCoResult;

// ---------------------------------------------------------------------------
// Defaults for the optional fund terms
// ---------------------------------------------------------------------------

/// Share of commitments raised at first close (percent).
pub const DEFAULT_FIRST_CLOSE_PERCENT: Percent = dec!(50);
/// Months from first close to final close.
pub const DEFAULT_FINAL_CLOSE_MONTH: u32 = 12;
/// Investment period in years.
pub const DEFAULT_INVESTMENT_PERIOD: Years = dec!(5);
/// GP carried interest share of profits (percent).
pub const DEFAULT_CARRY_RATE: Percent = dec!(20);
/// LP preferred return hurdle (percent, annual).
pub const DEFAULT_PREFERRED_RETURN: Percent = dec!(8);
/// Fund term in years.
pub const DEFAULT_FUND_LIFE: Years = dec!(10);

const MILLION: Decimal = dec!(1000000);
const HUNDRED: Decimal = dec!(100);

// ---------------------------------------------------------------------------
// Input types
// ---------------------------------------------------------------------------

/// Capital base on which management fees are charged.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeeBasis {
    /// Fees on total LP commitments, regardless of deployment pace
    #[default]
    Committed,
    /// Fees on capital actually deployed into investments
    Invested,
}

/// A capital vehicle managed by the firm, generating fee revenue.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Fund {
    /// Caller-assigned identifier
    pub id: String,
    /// Display name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Total commitments, in currency-millions
    pub size: Millions,
    /// Annual management fee (percent of fee basis)
    pub fee_rate: Percent,
    /// Calendar year of the first close
    pub first_close_year: i32,
    /// Share of commitments raised at first close (percent, default 50)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_close_percent: Option<Percent>,
    /// Months from first close until fully subscribed (default 12)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub final_close_month: Option<u32>,
    /// Committed or invested capital fee basis (default committed)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fee_basis: Option<FeeBasis>,
    /// Investment period in years (default 5)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub investment_period: Option<Years>,
    /// Expected gross multiple on invested capital; carry is only estimated above 1.0x
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_return: Option<Multiple>,
    /// Carried interest (percent, default 20)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub carry_rate: Option<Percent>,
    /// Preferred return hurdle (percent, default 8)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preferred_return: Option<Percent>,
    /// Fund term in years (default 10)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fund_life: Option<Years>,
}

/// A fund with every optional term filled in and rates converted to decimals.
///
/// Built once per run by [`Fund::resolve`]; the fee ramp and carry logic
/// only ever see this form.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedFund {
    pub id: String,
    pub size: Millions,
    pub fee_rate: Rate,
    pub first_close_year: i32,
    /// First-close share as a fraction (0.5 = 50%)
    pub first_close_fraction: Rate,
    pub final_close_month: u32,
    pub fee_basis: FeeBasis,
    pub investment_period: Years,
    pub target_return: Option<Multiple>,
    pub carry_rate: Rate,
    pub preferred_return: Rate,
    pub fund_life: Years,
}

impl Fund {
    /// Minimal fund with all advanced terms left at their defaults.
    pub fn new(id: impl Into<String>, size: Millions, fee_rate: Percent, first_close_year: i32) -> Self {
        Fund {
            id: id.into(),
            name: None,
            size,
            fee_rate,
            first_close_year,
            first_close_percent: None,
            final_close_month: None,
            fee_basis: None,
            investment_period: None,
            target_return: None,
            carry_rate: None,
            preferred_return: None,
            fund_life: None,
        }
    }

    /// Apply defaults to every optional term.
    pub fn resolve(&self) -> ResolvedFund {
        ResolvedFund {
            id: self.id.clone(),
            size: self.size,
            fee_rate: self.fee_rate / HUNDRED,
            first_close_year: self.first_close_year,
            first_close_fraction: self
                .first_close_percent
                .unwrap_or(DEFAULT_FIRST_CLOSE_PERCENT)
                / HUNDRED,
            final_close_month: self.final_close_month.unwrap_or(DEFAULT_FINAL_CLOSE_MONTH),
            fee_basis: self.fee_basis.unwrap_or_default(),
            investment_period: self.investment_period.unwrap_or(DEFAULT_INVESTMENT_PERIOD),
            target_return: self.target_return,
            carry_rate: self.carry_rate.unwrap_or(DEFAULT_CARRY_RATE) / HUNDRED,
            preferred_return: self.preferred_return.unwrap_or(DEFAULT_PREFERRED_RETURN) / HUNDRED,
            fund_life: self.fund_life.unwrap_or(DEFAULT_FUND_LIFE),
        }
    }

    /// Check the documented preconditions. The engine itself never calls this.
    pub fn validate(&self, index: usize) -> MgmtCoResult<()> {
        let field = |name: &str| format!("funds[{index}].{name}");

        if self.size < Decimal::ZERO {
            return Err(MgmtCoError::InvalidInput {
                field: field("size"),
                reason: "Fund size cannot be negative".into(),
            });
        }
        if self.fee_rate < Decimal::ZERO {
            return Err(MgmtCoError::InvalidInput {
                field: field("fee_rate"),
                reason: "Management fee rate cannot be negative".into(),
            });
        }
        if let Some(pct) = self.first_close_percent {
            if pct < Decimal::ZERO || pct > HUNDRED {
                return Err(MgmtCoError::InvalidInput {
                    field: field("first_close_percent"),
                    reason: "First close percentage must be between 0 and 100".into(),
                });
            }
        }
        if self.final_close_month == Some(0) {
            return Err(MgmtCoError::InvalidInput {
                field: field("final_close_month"),
                reason: "Final close month must be positive".into(),
            });
        }
        if let Some(period) = self.investment_period {
            if period <= Decimal::ZERO {
                return Err(MgmtCoError::InvalidInput {
                    field: field("investment_period"),
                    reason: "Investment period must be positive".into(),
                });
            }
        }
        for (name, value) in [
            ("carry_rate", self.carry_rate),
            ("preferred_return", self.preferred_return),
        ] {
            if matches!(value, Some(v) if v < Decimal::ZERO) {
                return Err(MgmtCoError::InvalidInput {
                    field: field(name),
                    reason: "Rate cannot be negative".into(),
                });
            }
        }
        if matches!(self.fund_life, Some(life) if life <= Decimal::ZERO) {
            return Err(MgmtCoError::InvalidInput {
                field: field("fund_life"),
                reason: "Fund life must be positive".into(),
            });
        }

        Ok(())
    }
}

impl ResolvedFund {
    /// Commitments in currency units.
    pub fn committed_capital(&self) -> Money {
        self.size * MILLION
    }

    /// Annual management fee once fully raised and deployed.
    pub fn steady_state_annual_fee(&self) -> Money {
        self.committed_capital() * self.fee_rate
    }

    /// Months elapsed since first close for a projection month that falls in
    /// `calendar_year` at zero-based `month_in_year`. Negative before first close.
    pub fn months_from_first_close(&self, calendar_year: i32, month_in_year: u32) -> i64 {
        i64::from(calendar_year - self.first_close_year) * 12 + i64::from(month_in_year)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_applies_defaults() {
        let resolved = Fund::new("fund-i", dec!(50), dec!(2), 2026).resolve();
        assert_eq!(resolved.fee_rate, dec!(0.02));
        assert_eq!(resolved.first_close_fraction, dec!(0.5));
        assert_eq!(resolved.final_close_month, 12);
        assert_eq!(resolved.fee_basis, FeeBasis::Committed);
        assert_eq!(resolved.investment_period, dec!(5));
        assert_eq!(resolved.carry_rate, dec!(0.2));
        assert_eq!(resolved.preferred_return, dec!(0.08));
        assert_eq!(resolved.fund_life, dec!(10));
        assert_eq!(resolved.target_return, None);
    }

    #[test]
    fn test_resolve_keeps_explicit_terms() {
        let mut fund = Fund::new("fund-ii", dec!(120), dec!(1.75), 2027);
        fund.first_close_percent = Some(dec!(30));
        fund.final_close_month = Some(18);
        fund.fee_basis = Some(FeeBasis::Invested);
        fund.carry_rate = Some(dec!(25));
        let resolved = fund.resolve();
        assert_eq!(resolved.fee_rate, dec!(0.0175));
        assert_eq!(resolved.first_close_fraction, dec!(0.3));
        assert_eq!(resolved.final_close_month, 18);
        assert_eq!(resolved.fee_basis, FeeBasis::Invested);
        assert_eq!(resolved.carry_rate, dec!(0.25));
    }

    #[test]
    fn test_months_from_first_close() {
        let resolved = Fund::new("f", dec!(10), dec!(2), 2027).resolve();
        assert_eq!(resolved.months_from_first_close(2026, 3), -9);
        assert_eq!(resolved.months_from_first_close(2027, 0), 0);
        assert_eq!(resolved.months_from_first_close(2028, 5), 17);
    }

    #[test]
    fn test_steady_state_fee() {
        let resolved = Fund::new("f", dec!(50), dec!(2), 2026).resolve();
        assert_eq!(resolved.committed_capital(), dec!(50000000));
        assert_eq!(resolved.steady_state_annual_fee(), dec!(1000000));
    }

    #[test]
    fn test_validate_rejects_bad_terms() {
        let mut fund = Fund::new("f", dec!(-1), dec!(2), 2026);
        assert!(fund.validate(0).is_err());

        fund.size = dec!(10);
        fund.first_close_percent = Some(dec!(120));
        assert!(fund.validate(0).is_err());

        fund.first_close_percent = Some(dec!(40));
        fund.final_close_month = Some(0);
        assert!(fund.validate(0).is_err());

        fund.final_close_month = Some(6);
        assert!(fund.validate(0).is_ok());
    }

    #[test]
    fn test_fee_basis_serde() {
        let json = serde_json::to_string(&FeeBasis::Invested).unwrap();
        assert_eq!(json, "\"invested\"");
        let parsed: FeeBasis = serde_json::from_str("\"committed\"").unwrap();
        assert_eq!(parsed, FeeBasis::Committed);
    }
}
