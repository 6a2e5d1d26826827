use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::error::MgmtCoError;
use crate::model::budget::BudgetData;
use crate::projection::engine::calculate_budget;
use crate::types::*;
use crate::MgmtCoResult;

/// A named variant of the budget (e.g. "Lean team", "Fund II slips a year").
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NamedScenario {
    pub name: String,
    pub data: BudgetData,
}

/// Input for scenario comparison. The first scenario is the base case.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioComparisonInput {
    pub scenarios: Vec<NamedScenario>,
}

/// Headline metrics for one scenario
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioSummary {
    pub name: String,
    pub monthly_burn: Money,
    pub annual_revenue: Money,
    pub break_even_month: Option<u32>,
    pub runway_months: Option<u32>,
    pub seed_capital_needed: Money,
    pub ending_cash: Money,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_carry: Option<Money>,
    /// Runway change against the base, in months. `None` when either side
    /// never runs out of cash.
    pub runway_delta_months: Option<i64>,
    /// Seed capital change against the base
    pub seed_capital_delta: Money,
}

/// Output of scenario comparison
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioComparisonOutput {
    pub base_scenario: String,
    pub results: Vec<ScenarioSummary>,
    /// Scenario needing the least seed capital
    pub lowest_seed_scenario: String,
}

/// Project every scenario and compare it with the first.
pub fn compare_scenarios(
    input: &ScenarioComparisonInput,
) -> MgmtCoResult<ComputationOutput<ScenarioComparisonOutput>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    let Some(base_scenario) = input.scenarios.first() else {
        return Err(MgmtCoError::InsufficientData(
            "At least one scenario required".into(),
        ));
    };

    for (i, scenario) in input.scenarios.iter().enumerate() {
        scenario.data.validate().map_err(|e| MgmtCoError::InvalidInput {
            field: format!("scenarios[{i}] '{}'", scenario.name),
            reason: e.to_string(),
        })?;
        if input.scenarios[..i].iter().any(|s| s.name == scenario.name) {
            warnings.push(format!("Duplicate scenario name '{}'", scenario.name));
        }
    }

    let projected: Vec<_> = input
        .scenarios
        .iter()
        .map(|s| (s, calculate_budget(&s.data)))
        .collect();
    let base = &projected[0].1;

    let results: Vec<ScenarioSummary> = projected
        .iter()
        .map(|(scenario, r)| {
            let runway_delta_months = match (r.runway_months, base.runway_months) {
                (Some(a), Some(b)) => Some(i64::from(a) - i64::from(b)),
                _ => None,
            };
            ScenarioSummary {
                name: scenario.name.clone(),
                monthly_burn: r.monthly_burn,
                annual_revenue: r.annual_revenue,
                break_even_month: r.break_even_month,
                runway_months: r.runway_months,
                seed_capital_needed: r.seed_capital_needed,
                ending_cash: r.ending_cash(),
                total_carry: r.total_carry,
                runway_delta_months,
                seed_capital_delta: r.seed_capital_needed - base.seed_capital_needed,
            }
        })
        .collect();

    let lowest_seed_scenario = results
        .iter()
        .min_by_key(|s| s.seed_capital_needed)
        .map(|s| s.name.clone())
        .unwrap_or_default();

    let horizons: Vec<u32> = input
        .scenarios
        .iter()
        .map(|s| s.data.resolve_settings().projection_years)
        .collect();
    if horizons.iter().any(|h| *h != horizons[0]) {
        warnings.push("Scenarios use different projection horizons; runway and ending cash are not like-for-like".into());
    }

    let output = ScenarioComparisonOutput {
        base_scenario: base_scenario.name.clone(),
        results,
        lowest_seed_scenario,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Management Company Scenario Comparison",
        &serde_json::json!({
            "num_scenarios": input.scenarios.len(),
            "base_scenario": base_scenario.name,
            "total_base_seed": base.seed_capital_needed.to_string(),
        }),
        warnings,
        elapsed,
        output,
    ))
}
