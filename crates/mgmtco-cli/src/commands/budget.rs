use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;

use mgmtco_core::model::budget::BudgetData;
use mgmtco_core::projection::engine;

use crate::input;

/// Arguments for the monthly cash projection
#[derive(Args)]
pub struct ProjectArgs {
    /// Path to a JSON or YAML budget file
    #[arg(long)]
    pub input: Option<String>,

    /// Override the budget's starting cash
    #[arg(long)]
    pub starting_cash: Option<Decimal>,

    /// Override the projection horizon in years
    #[arg(long)]
    pub years: Option<u32>,

    /// Override the calendar year of the first projected month
    #[arg(long)]
    pub start_year: Option<i32>,
}

pub fn run_project(args: ProjectArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let mut data: BudgetData = input::read_input(args.input.as_deref(), "budget projection")?;

    if let Some(cash) = args.starting_cash {
        data.starting_cash = cash;
    }
    if args.years.is_some() || args.start_year.is_some() {
        let mut settings = data.settings.take().unwrap_or_default();
        if let Some(years) = args.years {
            settings.projection_years = years;
        }
        if args.start_year.is_some() {
            settings.start_year = args.start_year;
        }
        data.settings = Some(settings);
    }

    let result = engine::run_budget(&data)?;
    Ok(serde_json::to_value(result)?)
}
