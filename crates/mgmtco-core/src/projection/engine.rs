use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::time::Instant;

use crate::carry::estimator::{
    average_holding_period, estimate_carry_with_curve, hurdle_growth, merge_timelines,
};
use crate::expenses::accumulator::ExpenseBase;
use crate::fees::ramp::monthly_fee_revenue;
use crate::format::format_currency;
use crate::model::budget::BudgetData;
use crate::model::fund::ResolvedFund;
use crate::model::results::{BudgetResults, MonthlyProjection};
use crate::types::*;
use crate::MgmtCoResult;

// ---------------------------------------------------------------------------
// Calculation
// ---------------------------------------------------------------------------

fn month_label(year: i32, month_in_year: u32) -> String {
    NaiveDate::from_ymd_opt(year, month_in_year + 1, 1)
        .map(|d| d.format("%b %Y").to_string())
        .unwrap_or_else(|| format!("M{} {year}", month_in_year + 1))
}

/// Fee revenue across all funds for a projection month.
fn total_revenue(funds: &[ResolvedFund], year: i32, month_in_year: u32) -> Money {
    funds
        .iter()
        .map(|fund| monthly_fee_revenue(fund, fund.months_from_first_close(year, month_in_year)))
        .sum()
}

/// Starting capital required to stay solvent until revenue first covers
/// expenses.
///
/// Walks the cumulative balance only up to the first crossover month; a
/// later dip below break-even is not considered.
pub fn seed_capital_needed(starting_cash: Money, projections: &[MonthlyProjection]) -> Money {
    let mut balance = starting_cash;
    let mut lowest = starting_cash;

    for p in projections {
        if p.revenue >= p.expenses {
            break;
        }
        balance += p.net_cash_flow;
        lowest = lowest.min(balance);
    }

    if lowest < Decimal::ZERO {
        starting_cash + lowest.abs()
    } else {
        starting_cash
    }
}

/// Project monthly revenue, expenses and cash for a management company.
///
/// Pure and total: no validation, no I/O, the same input always yields the
/// same output. Callers wanting precondition checks use [`run_budget`] or
/// [`BudgetData::validate`].
pub fn calculate_budget(data: &BudgetData) -> BudgetResults {
    let settings = data.resolve_settings();
    let funds = data.resolved_funds();
    let expense_base = ExpenseBase::from_data(data);
    let total_months = settings.total_months();

    let mut projections: Vec<MonthlyProjection> = Vec::with_capacity(total_months as usize);
    // Unclamped: a real deficit keeps depressing later balances
    let mut running_balance = data.starting_cash;
    let mut break_even_month: Option<u32> = None;
    let mut runway_months: Option<u32> = None;

    for month in 0..total_months {
        let year = settings.start_year + (month / 12) as i32;
        let month_in_year = month % 12;

        let revenue = total_revenue(&funds, year, month_in_year);
        let expenses = expense_base.at_month(settings.inflation_rate, month).total;
        let net_cash_flow = revenue - expenses;
        running_balance += net_cash_flow;

        if break_even_month.is_none() && expenses > Decimal::ZERO && revenue >= expenses {
            break_even_month = Some(month + 1);
        }
        if runway_months.is_none() && running_balance <= Decimal::ZERO {
            runway_months = Some(month + 1);
        }

        projections.push(MonthlyProjection {
            month: month + 1,
            year,
            label: month_label(year, month_in_year),
            revenue,
            expenses,
            net_cash_flow,
            cash_balance: running_balance.max(Decimal::ZERO),
        });
    }

    let baseline = expense_base.at_month(settings.inflation_rate, 0);
    let monthly_burn = baseline.total;
    let annual_revenue: Money = funds.iter().map(ResolvedFund::steady_state_annual_fee).sum();
    let seed = seed_capital_needed(data.starting_cash, &projections);

    let estimates: Vec<_> = funds
        .iter()
        .filter_map(|fund| estimate_carry_with_curve(fund, &settings.realization_curve))
        .collect();
    let (total_carry, carry_timeline) = if estimates.is_empty() {
        (None, None)
    } else {
        let total: Money = estimates.iter().map(|e| e.total).sum();
        let timeline = merge_timelines(estimates.iter().map(|e| e.timeline.as_slice()));
        (Some(total), Some(timeline))
    };

    log::debug!(
        "projected {total_months} months for {} funds: break-even {break_even_month:?}, runway {runway_months:?}",
        funds.len()
    );

    BudgetResults {
        monthly_burn,
        annual_budget: monthly_burn * Decimal::from(12),
        annual_revenue,
        break_even_month,
        runway_months,
        seed_capital_needed: seed,
        projections,
        team_cost: baseline.team,
        operations_cost: baseline.operations,
        overhead_cost: baseline.overhead,
        total_carry,
        carry_timeline,
    }
}

/// Validate, project, and wrap the results with methodology and warnings.
pub fn run_budget(data: &BudgetData) -> MgmtCoResult<ComputationOutput<BudgetResults>> {
    let start = Instant::now();
    data.validate()?;

    let settings = data.resolve_settings();
    let results = calculate_budget(data);
    let mut warnings: Vec<String> = Vec::new();

    if data.funds.is_empty() {
        warnings.push("No funds configured; projection carries no fee revenue".into());
    }
    for fund in data.resolved_funds() {
        let carry_fund = fund.target_return.is_some_and(|m| m > Decimal::ONE);
        if carry_fund && average_holding_period(&fund) < Decimal::ZERO {
            warnings.push(format!(
                "Fund '{}': fund life is shorter than half the investment period; carry hurdle is not meaningful",
                fund.id
            ));
        }
        if carry_fund && hurdle_growth(&fund).is_none() {
            warnings.push(format!(
                "Fund '{}': preferred return over the fund life exceeds numeric range; carry reported as zero",
                fund.id
            ));
        }
    }
    if let Some(month) = results.runway_months {
        let label = results
            .projections
            .get(month as usize - 1)
            .map(|p| p.label.clone())
            .unwrap_or_default();
        warnings.push(format!("Cash is exhausted in month {month} ({label})"));
    }
    if results.break_even_month.is_none() && results.monthly_burn > Decimal::ZERO {
        warnings.push(format!(
            "Revenue never covers expenses within the {}-year horizon",
            settings.projection_years
        ));
    }
    let shortfall = results.seed_capital_needed - data.starting_cash;
    if shortfall > Decimal::ZERO {
        warnings.push(format!(
            "Starting cash is {} short of reaching break-even",
            format_currency(shortfall)
        ));
    }

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Management Company Monthly Cash Projection",
        &serde_json::json!({
            "start_year": settings.start_year,
            "projection_years": settings.projection_years,
            "inflation_rate": settings.inflation_rate.to_string(),
            "num_funds": data.funds.len(),
            "fee_ramp": "linear from first close to final close",
            "inflation": "compounded once per elapsed year",
        }),
        warnings,
        elapsed,
        results,
    ))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
