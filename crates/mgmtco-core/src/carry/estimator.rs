use std::collections::BTreeMap;

use rust_decimal::{Decimal, MathematicalOps};
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::carry::curve::RealizationCurve;
use crate::model::fund::ResolvedFund;
use crate::model::results::CarryYear;
use crate::types::{Money, Years};

/// Estimated carried interest for one fund.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CarryEstimate {
    pub fund_id: String,
    /// Gross value at the target multiple
    pub total_value: Money,
    /// Gross profit above contributed capital
    pub profit: Money,
    /// Preferred return owed to LPs before carry
    pub hurdle: Money,
    /// Carry to the GP
    pub total: Money,
    /// Carry by calendar year of realization
    pub timeline: Vec<CarryYear>,
}

/// Average holding period used to compound the hurdle:
/// fund life less half the investment period.
///
/// Not clamped; a fund life shorter than half its investment period yields
/// a negative value and an economically meaningless hurdle.
pub fn average_holding_period(fund: &ResolvedFund) -> Years {
    fund.fund_life - fund.investment_period / dec!(2)
}

/// Growth factor of the preferred return over the average holding period,
/// `None` when it exceeds the decimal range (fund lives of several centuries).
pub fn hurdle_growth(fund: &ResolvedFund) -> Option<Decimal> {
    (Decimal::ONE + fund.preferred_return).checked_powd(average_holding_period(fund))
}

/// Estimate carry with the standard realization curve.
pub fn estimate_carry(fund: &ResolvedFund) -> Option<CarryEstimate> {
    estimate_carry_with_curve(fund, &RealizationCurve::standard())
}

/// Estimate carry for a fund exiting at its target multiple, net of a
/// preferred-return hurdle, spread across `curve`.
///
/// Returns `None` unless the fund has a target return above 1.0x.
pub fn estimate_carry_with_curve(
    fund: &ResolvedFund,
    curve: &RealizationCurve,
) -> Option<CarryEstimate> {
    let target_return = fund.target_return.filter(|m| *m > Decimal::ONE)?;

    let invested = fund.committed_capital();
    let total_value = invested * target_return;
    let profit = total_value - invested;

    let avg_holding = average_holding_period(fund);
    if avg_holding < Decimal::ZERO {
        log::warn!(
            "fund {}: negative average holding period ({avg_holding} years); hurdle is not meaningful",
            fund.id
        );
    }
    // Past Decimal range the hurdle swallows all profit
    let hurdle = match hurdle_growth(fund).and_then(|g| invested.checked_mul(g - Decimal::ONE)) {
        Some(hurdle) => hurdle,
        None => {
            log::warn!(
                "fund {}: preferred return compounded over {avg_holding} years overflows; no carry estimated",
                fund.id
            );
            profit
        }
    };

    let carryable = (profit - hurdle).max(Decimal::ZERO);
    let total = carryable * fund.carry_rate;

    let timeline = curve
        .points()
        .iter()
        .map(|p| CarryYear {
            year: fund.first_close_year + p.year_offset as i32,
            amount: total * p.weight,
        })
        .collect();

    Some(CarryEstimate {
        fund_id: fund.id.clone(),
        total_value,
        profit,
        hurdle,
        total,
        timeline,
    })
}

/// Sum several timelines by calendar year, ascending.
pub fn merge_timelines<'a>(timelines: impl IntoIterator<Item = &'a [CarryYear]>) -> Vec<CarryYear> {
    let mut by_year: BTreeMap<i32, Money> = BTreeMap::new();
    for timeline in timelines {
        for entry in timeline {
            *by_year.entry(entry.year).or_default() += entry.amount;
        }
    }
    by_year
        .into_iter()
        .map(|(year, amount)| CarryYear { year, amount })
        .collect()
}
