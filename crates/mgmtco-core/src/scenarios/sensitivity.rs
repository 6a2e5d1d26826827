use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::error::MgmtCoError;
use crate::model::budget::BudgetData;
use crate::model::results::BudgetResults;
use crate::projection::engine::calculate_budget;
use crate::types::*;
use crate::MgmtCoResult;

// ---------------------------------------------------------------------------
// Input types
// ---------------------------------------------------------------------------

/// Budget input that a sensitivity sweep can vary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BudgetVariable {
    /// Size of the first fund (currency-millions)
    FirstFundSize,
    /// Fee rate of the first fund (percent)
    FirstFundFeeRate,
    StartingCash,
    /// Annual expense inflation (percent)
    InflationRate,
    /// Multiplier on every expense line (1.0 = as entered)
    ExpenseScale,
}

/// Projection output measured in each grid cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BudgetMetric {
    RunwayMonths,
    BreakEvenMonth,
    SeedCapitalNeeded,
    AnnualRevenue,
    EndingCash,
}

/// One swept variable: values from `min` to `max` in `step` increments.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BudgetSweep {
    pub variable: BudgetVariable,
    pub min: Decimal,
    pub max: Decimal,
    pub step: Decimal,
}

/// Input for a 2-way budget sensitivity grid
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BudgetSensitivityInput {
    /// Base case budget
    pub base: BudgetData,
    /// Swept along the rows
    pub variable_1: BudgetSweep,
    /// Swept along the columns
    pub variable_2: BudgetSweep,
    pub metric: BudgetMetric,
}

// ---------------------------------------------------------------------------
// Output types
// ---------------------------------------------------------------------------

/// Output of a 2-way budget sensitivity grid
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BudgetSensitivityOutput {
    pub variable_1: BudgetVariable,
    pub variable_2: BudgetVariable,
    pub variable_1_values: Vec<Decimal>,
    pub variable_2_values: Vec<Decimal>,
    pub metric: BudgetMetric,
    /// Matrix[i][j] = metric at variable_1_values[i], variable_2_values[j].
    /// `None` where the event (runway, break-even) never occurs.
    pub matrix: Vec<Vec<Option<Decimal>>>,
    /// Metric for the unmodified base budget
    pub base_case_value: Option<Decimal>,
    /// Grid cell closest to the base budget's own values (row, col)
    pub base_case_position: (usize, usize),
}

// ---------------------------------------------------------------------------
// Calculation
// ---------------------------------------------------------------------------

/// Generate the sweep values from min to max with step.
fn generate_sweep_values(sweep: &BudgetSweep) -> MgmtCoResult<Vec<Decimal>> {
    let field = format!("variable:{:?}", sweep.variable);
    if sweep.step <= Decimal::ZERO {
        return Err(MgmtCoError::InvalidInput {
            field,
            reason: "Step must be positive".into(),
        });
    }
    if sweep.min > sweep.max {
        return Err(MgmtCoError::InvalidInput {
            field,
            reason: "Min must be <= max".into(),
        });
    }

    let mut values = Vec::new();
    let mut current = sweep.min;
    while current <= sweep.max {
        values.push(current);
        current += sweep.step;
    }
    // Ensure max is included if step doesn't land exactly on it
    if let Some(&last) = values.last() {
        if last < sweep.max {
            values.push(sweep.max);
        }
    }

    Ok(values)
}

/// Find the closest index to a target value in a sorted list.
fn closest_index(values: &[Decimal], target: Decimal) -> usize {
    values
        .iter()
        .enumerate()
        .min_by_key(|(_, v)| (**v - target).abs())
        .map(|(i, _)| i)
        .unwrap_or(0)
}

/// Current value of `variable` in a budget.
fn current_value(data: &BudgetData, variable: BudgetVariable) -> Decimal {
    match variable {
        BudgetVariable::FirstFundSize => data.funds.first().map(|f| f.size).unwrap_or_default(),
        BudgetVariable::FirstFundFeeRate => {
            data.funds.first().map(|f| f.fee_rate).unwrap_or_default()
        }
        BudgetVariable::StartingCash => data.starting_cash,
        BudgetVariable::InflationRate => data.settings.clone().unwrap_or_default().inflation_rate,
        BudgetVariable::ExpenseScale => Decimal::ONE,
    }
}

/// Overwrite `variable` in a budget. The base must already have a pinned
/// settings block and, for fund variables, at least one fund.
fn apply_variable(data: &mut BudgetData, variable: BudgetVariable, value: Decimal, base: &BudgetData) {
    match variable {
        BudgetVariable::FirstFundSize => {
            if let Some(fund) = data.funds.first_mut() {
                fund.size = value;
            }
        }
        BudgetVariable::FirstFundFeeRate => {
            if let Some(fund) = data.funds.first_mut() {
                fund.fee_rate = value;
            }
        }
        BudgetVariable::StartingCash => data.starting_cash = value,
        BudgetVariable::InflationRate => {
            if let Some(settings) = data.settings.as_mut() {
                settings.inflation_rate = value;
            }
        }
        BudgetVariable::ExpenseScale => {
            let buckets = [
                (&mut data.team, &base.team),
                (&mut data.operations, &base.operations),
                (&mut data.overhead, &base.overhead),
            ];
            for (items, base_items) in buckets {
                for (item, base_item) in items.iter_mut().zip(base_items) {
                    item.monthly_cost = base_item.monthly_cost * value;
                }
            }
        }
    }
}

fn measure(results: &BudgetResults, metric: BudgetMetric) -> Option<Decimal> {
    match metric {
        BudgetMetric::RunwayMonths => results.runway_months.map(Decimal::from),
        BudgetMetric::BreakEvenMonth => results.break_even_month.map(Decimal::from),
        BudgetMetric::SeedCapitalNeeded => Some(results.seed_capital_needed),
        BudgetMetric::AnnualRevenue => Some(results.annual_revenue),
        BudgetMetric::EndingCash => Some(results.ending_cash()),
    }
}

fn needs_fund(variable: BudgetVariable) -> bool {
    matches!(
        variable,
        BudgetVariable::FirstFundSize | BudgetVariable::FirstFundFeeRate
    )
}

/// Evaluate a 2-way sensitivity grid by re-projecting the base budget for
/// every pair of swept values.
pub fn run_budget_sensitivity(
    input: &BudgetSensitivityInput,
) -> MgmtCoResult<ComputationOutput<BudgetSensitivityOutput>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    input.base.validate()?;
    if input.variable_1.variable == input.variable_2.variable {
        return Err(MgmtCoError::InvalidInput {
            field: "variable_2".into(),
            reason: "Sensitivity variables must differ".into(),
        });
    }
    for sweep in [&input.variable_1, &input.variable_2] {
        if needs_fund(sweep.variable) && input.base.funds.is_empty() {
            return Err(MgmtCoError::InsufficientData(format!(
                "{:?} requires at least one fund",
                sweep.variable
            )));
        }
    }

    let v1_values = generate_sweep_values(&input.variable_1)?;
    let v2_values = generate_sweep_values(&input.variable_2)?;

    let base = input.base.with_pinned_start_year();
    let mut matrix = Vec::with_capacity(v1_values.len());

    for v1 in &v1_values {
        let mut row = Vec::with_capacity(v2_values.len());
        for v2 in &v2_values {
            let mut candidate = base.clone();
            apply_variable(&mut candidate, input.variable_1.variable, *v1, &base);
            apply_variable(&mut candidate, input.variable_2.variable, *v2, &base);
            match candidate.validate() {
                Ok(()) => row.push(measure(&calculate_budget(&candidate), input.metric)),
                Err(e) => {
                    warnings.push(format!("Skipped ({v1}, {v2}): {e}"));
                    row.push(None);
                }
            }
        }
        matrix.push(row);
    }

    let base_case_value = measure(&calculate_budget(&base), input.metric);
    let base_row = closest_index(&v1_values, current_value(&base, input.variable_1.variable));
    let base_col = closest_index(&v2_values, current_value(&base, input.variable_2.variable));

    if matches!(
        input.metric,
        BudgetMetric::RunwayMonths | BudgetMetric::BreakEvenMonth
    ) && matrix.iter().flatten().any(Option::is_none)
    {
        warnings.push(format!(
            "Some cells are null: {:?} does not occur within the projection horizon",
            input.metric
        ));
    }

    let output = BudgetSensitivityOutput {
        variable_1: input.variable_1.variable,
        variable_2: input.variable_2.variable,
        variable_1_values: v1_values,
        variable_2_values: v2_values,
        metric: input.metric,
        matrix,
        base_case_value,
        base_case_position: (base_row, base_col),
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "2-Way Budget Sensitivity Analysis",
        &serde_json::json!({
            "variable_1": input.variable_1.variable,
            "variable_2": input.variable_2.variable,
            "metric": input.metric,
        }),
        warnings,
        elapsed,
        output,
    ))
}
