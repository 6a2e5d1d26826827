//! Runway goal-seeking.
//!
//! Inverts the projection: find the first fund's size, or the starting
//! cash, whose projected runway lands within a tolerance of a target. Both
//! searches rely on runway being non-decreasing in the searched input.

use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::error::MgmtCoError;
use crate::goal_seek::bisect::{bisect, BisectOutcome, Probe, Termination};
use crate::model::budget::BudgetData;
use crate::projection::engine::calculate_budget;
use crate::types::*;
use crate::MgmtCoResult;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Default acceptable distance from the target runway, in months.
pub const DEFAULT_TOLERANCE_MONTHS: u32 = 1;

/// Maximum projections per search.
pub const MAX_SEEK_ITERATIONS: u32 = 50;

/// Fund size search domain (currency-millions).
pub const MIN_FUND_SIZE: Millions = dec!(10);
pub const MAX_FUND_SIZE: Millions = dec!(2000);
/// Stop once the fund-size bracket is this narrow.
const FUND_SIZE_RESOLUTION: Millions = dec!(1);

/// Starting cash search domain.
pub const MIN_STARTING_CASH: Money = dec!(0);
pub const MAX_STARTING_CASH: Money = dec!(10000000);
/// Cash results are snapped to this increment; also the bracket resolution.
pub const CASH_INCREMENT: Money = dec!(10000);

// ---------------------------------------------------------------------------
// Output types
// ---------------------------------------------------------------------------

/// Input being solved for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SeekVariable {
    /// Size of the first fund, in currency-millions
    FundSize,
    StartingCash,
}

/// Result of a runway goal-seek.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GoalSeekOutput {
    pub variable: SeekVariable,
    /// Solved input value, snapped to the variable's resolution
    pub solution: Decimal,
    pub target_months: u32,
    pub tolerance_months: u32,
    /// Runway projected at the snapped solution (`None` = never depleted)
    pub achieved_runway_months: Option<u32>,
    pub iterations: u32,
    pub termination: Termination,
}

// ---------------------------------------------------------------------------
// Search
// ---------------------------------------------------------------------------

/// Compare a projected runway to the target. A run that never depletes
/// counts as overshooting.
fn classify_runway(runway: Option<u32>, target: u32, tolerance: u32) -> Probe {
    let (target, tolerance) = (i64::from(target), i64::from(tolerance));
    match runway.map(i64::from) {
        None => Probe::TooHigh,
        Some(r) if r < target - tolerance => Probe::TooLow,
        Some(r) if r > target + tolerance => Probe::TooHigh,
        Some(_) => Probe::OnTarget,
    }
}

fn snap_fund_size(value: Millions) -> Millions {
    value.ceil()
}

fn snap_cash(value: Money) -> Money {
    (value / CASH_INCREMENT).round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        * CASH_INCREMENT
}

fn finish(
    variable: SeekVariable,
    outcome: BisectOutcome,
    solution: Decimal,
    achieved_runway_months: Option<u32>,
    target_months: u32,
    tolerance_months: u32,
) -> GoalSeekOutput {
    log::debug!(
        "{variable:?} goal-seek: {solution} after {} iterations ({:?}), runway {achieved_runway_months:?}",
        outcome.iterations,
        outcome.termination
    );
    GoalSeekOutput {
        variable,
        solution,
        target_months,
        tolerance_months,
        achieved_runway_months,
        iterations: outcome.iterations,
        termination: outcome.termination,
    }
}

/// Solve for the first fund's size. Other funds are held fixed.
///
/// Returns `None` when there is no fund to size.
pub fn solve_fund_size(
    data: &BudgetData,
    target_months: u32,
    tolerance_months: u32,
) -> Option<GoalSeekOutput> {
    if data.funds.is_empty() {
        return None;
    }

    let mut candidate = data.with_pinned_start_year();
    let outcome = bisect(
        MIN_FUND_SIZE,
        MAX_FUND_SIZE,
        FUND_SIZE_RESOLUTION,
        MAX_SEEK_ITERATIONS,
        |size| {
            candidate.funds[0].size = size;
            let runway = calculate_budget(&candidate).runway_months;
            log::debug!("fund size {size}m -> runway {runway:?}");
            classify_runway(runway, target_months, tolerance_months)
        },
    );

    let solution = snap_fund_size(outcome.value);
    candidate.funds[0].size = solution;
    let achieved = calculate_budget(&candidate).runway_months;

    Some(finish(
        SeekVariable::FundSize,
        outcome,
        solution,
        achieved,
        target_months,
        tolerance_months,
    ))
}

/// Solve for starting cash, snapped to the nearest 10,000.
pub fn solve_starting_cash(
    data: &BudgetData,
    target_months: u32,
    tolerance_months: u32,
) -> GoalSeekOutput {
    let mut candidate = data.with_pinned_start_year();
    let outcome = bisect(
        MIN_STARTING_CASH,
        MAX_STARTING_CASH,
        CASH_INCREMENT,
        MAX_SEEK_ITERATIONS,
        |cash| {
            candidate.starting_cash = cash;
            let runway = calculate_budget(&candidate).runway_months;
            log::debug!("starting cash {cash} -> runway {runway:?}");
            classify_runway(runway, target_months, tolerance_months)
        },
    );

    let solution = snap_cash(outcome.value);
    candidate.starting_cash = solution;
    let achieved = calculate_budget(&candidate).runway_months;

    finish(
        SeekVariable::StartingCash,
        outcome,
        solution,
        achieved,
        target_months,
        tolerance_months,
    )
}

/// Smallest first-fund size (currency-millions, rounded up) giving a runway
/// within `tolerance_months` of `target_months`; `None` without funds.
pub fn find_fund_size_for_runway(
    data: &BudgetData,
    target_months: u32,
    tolerance_months: u32,
) -> Option<Millions> {
    solve_fund_size(data, target_months, tolerance_months).map(|out| out.solution)
}

/// Starting cash (nearest 10,000) giving a runway within `tolerance_months`
/// of `target_months`. Always `Some`; the option mirrors the fund-size search.
pub fn find_cash_for_runway(
    data: &BudgetData,
    target_months: u32,
    tolerance_months: u32,
) -> Option<Money> {
    Some(solve_starting_cash(data, target_months, tolerance_months).solution)
}

// ---------------------------------------------------------------------------
// Envelope entry points
// ---------------------------------------------------------------------------

fn seek_warnings(output: &GoalSeekOutput) -> Vec<String> {
    let mut warnings = Vec::new();
    match output.termination {
        Termination::OnTarget => {}
        Termination::BracketCollapsed => warnings.push(
            "Search bracket collapsed before the target runway was reached; result is the closest bound"
                .into(),
        ),
        Termination::IterationsExhausted => warnings.push(format!(
            "No convergence after {} iterations; returning best estimate",
            output.iterations
        )),
    }
    if output.achieved_runway_months.is_none() {
        warnings.push("Cash is never exhausted at the solved value".into());
    }
    warnings
}

/// Validate and solve for the first fund's size, with metadata.
pub fn seek_fund_size(
    data: &BudgetData,
    target_months: u32,
    tolerance_months: u32,
) -> MgmtCoResult<ComputationOutput<GoalSeekOutput>> {
    let start = Instant::now();
    data.validate()?;

    let output = solve_fund_size(data, target_months, tolerance_months).ok_or_else(|| {
        MgmtCoError::InsufficientData("At least one fund is required to solve for fund size".into())
    })?;
    let warnings = seek_warnings(&output);

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Runway Goal-Seek: First Fund Size (Bisection)",
        &serde_json::json!({
            "fund_id": data.funds[0].id,
            "search_range_millions": [MIN_FUND_SIZE.to_string(), MAX_FUND_SIZE.to_string()],
            "max_iterations": MAX_SEEK_ITERATIONS,
            "target_months": target_months,
            "tolerance_months": tolerance_months,
        }),
        warnings,
        elapsed,
        output,
    ))
}

/// Validate and solve for starting cash, with metadata.
pub fn seek_starting_cash(
    data: &BudgetData,
    target_months: u32,
    tolerance_months: u32,
) -> MgmtCoResult<ComputationOutput<GoalSeekOutput>> {
    let start = Instant::now();
    data.validate()?;

    let output = solve_starting_cash(data, target_months, tolerance_months);
    let warnings = seek_warnings(&output);

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Runway Goal-Seek: Starting Cash (Bisection)",
        &serde_json::json!({
            "search_range": [MIN_STARTING_CASH.to_string(), MAX_STARTING_CASH.to_string()],
            "increment": CASH_INCREMENT.to_string(),
            "max_iterations": MAX_SEEK_ITERATIONS,
            "target_months": target_months,
            "tolerance_months": tolerance_months,
        }),
        warnings,
        elapsed,
        output,
    ))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
