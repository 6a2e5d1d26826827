use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;

use mgmtco_core::model::budget::BudgetData;
use mgmtco_core::scenarios::compare::{self, ScenarioComparisonInput};
use mgmtco_core::scenarios::sensitivity::{
    self, BudgetMetric, BudgetSensitivityInput, BudgetSweep, BudgetVariable,
};

use crate::input;

/// Arguments for a two-way budget sensitivity grid
#[derive(Args)]
pub struct SensitivityArgs {
    /// Path to a JSON or YAML base budget file
    #[arg(long)]
    pub input: Option<String>,

    /// Row variable in format name:min:max:step
    /// (e.g. "first_fund_size:25:150:25")
    #[arg(long)]
    pub var1: String,

    /// Column variable in format name:min:max:step
    /// (e.g. "starting_cash:250000:1000000:250000")
    #[arg(long)]
    pub var2: String,

    /// Metric measured in each cell: runway_months, break_even_month,
    /// seed_capital_needed, annual_revenue, ending_cash
    #[arg(long, default_value = "runway_months")]
    pub metric: String,
}

/// Arguments for side-by-side scenario comparison
#[derive(Args)]
pub struct CompareArgs {
    /// Path to a JSON or YAML file with a `scenarios` list of {name, data}
    #[arg(long)]
    pub input: Option<String>,
}

/// Parse a snake_case name through the enum's own serde representation.
fn parse_name<T: serde::de::DeserializeOwned>(
    name: &str,
    kind: &str,
) -> Result<T, Box<dyn std::error::Error>> {
    serde_json::from_value(Value::String(name.to_string()))
        .map_err(|_| format!("Unknown {kind} '{name}'").into())
}

fn parse_sweep(arg: &str) -> Result<BudgetSweep, Box<dyn std::error::Error>> {
    let parts: Vec<&str> = arg.split(':').collect();
    if parts.len() != 4 {
        return Err(format!(
            "Sensitivity variable must be name:min:max:step, got '{}'",
            arg
        )
        .into());
    }
    let variable: BudgetVariable = parse_name(parts[0], "sensitivity variable")?;
    Ok(BudgetSweep {
        variable,
        min: parts[1].parse::<Decimal>()?,
        max: parts[2].parse::<Decimal>()?,
        step: parts[3].parse::<Decimal>()?,
    })
}

pub fn run_sensitivity(args: SensitivityArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let base: BudgetData = input::read_input(args.input.as_deref(), "sensitivity analysis")?;
    let metric: BudgetMetric = parse_name(&args.metric, "metric")?;

    let sens_input = BudgetSensitivityInput {
        base,
        variable_1: parse_sweep(&args.var1)?,
        variable_2: parse_sweep(&args.var2)?,
        metric,
    };
    let result = sensitivity::run_budget_sensitivity(&sens_input)?;
    Ok(serde_json::to_value(result)?)
}

pub fn run_compare(args: CompareArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let comparison: ScenarioComparisonInput =
        input::read_input(args.input.as_deref(), "scenario comparison")?;
    let result = compare::compare_scenarios(&comparison)?;
    Ok(serde_json::to_value(result)?)
}
