use clap::Args;
use serde_json::Value;

use mgmtco_core::goal_seek::runway::{self, DEFAULT_TOLERANCE_MONTHS};
use mgmtco_core::model::budget::BudgetData;

use crate::input;

/// Arguments shared by the runway goal-seek commands
#[derive(Args)]
pub struct RunwayTargetArgs {
    /// Path to a JSON or YAML budget file
    #[arg(long)]
    pub input: Option<String>,

    /// Desired runway in months
    #[arg(long)]
    pub target_months: u32,

    /// Accept any runway within this many months of the target
    #[arg(long, default_value_t = DEFAULT_TOLERANCE_MONTHS)]
    pub tolerance: u32,
}

/// Solve for the first fund's size (in millions) that yields the target runway.
pub fn run_fund_size(args: RunwayTargetArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let data: BudgetData = input::read_input(args.input.as_deref(), "fund-size goal-seek")?;
    let result = runway::seek_fund_size(&data, args.target_months, args.tolerance)?;
    Ok(serde_json::to_value(result)?)
}

/// Solve for the starting cash that yields the target runway.
pub fn run_seed_cash(args: RunwayTargetArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let data: BudgetData = input::read_input(args.input.as_deref(), "seed-cash goal-seek")?;
    let result = runway::seek_starting_cash(&data, args.target_months, args.tolerance)?;
    Ok(serde_json::to_value(result)?)
}
