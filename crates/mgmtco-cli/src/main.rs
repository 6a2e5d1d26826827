mod commands;
mod input;
mod output;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::process;

use commands::budget::ProjectArgs;
use commands::goal_seek::RunwayTargetArgs;
use commands::scenarios::{CompareArgs, SensitivityArgs};

/// Management-company budget projections and runway goal-seeking
#[derive(Parser)]
#[command(
    name = "mgmtco",
    version,
    about = "Management-company budget projections and runway goal-seeking",
    long_about = "A CLI for projecting a fund manager's monthly fee revenue, expenses and \
                  cash balance with decimal precision. Supports runway and break-even \
                  analysis, fund-size and seed-cash goal-seeking, sensitivity grids, \
                  and scenario comparison."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, default_value = "json", global = true)]
    output: OutputFormat,
}

#[derive(Subcommand)]
enum Commands {
    /// Project monthly revenue, expenses and cash balance
    Project(ProjectArgs),
    /// Find the first fund's size (millions) that gives a target runway
    FundSize(RunwayTargetArgs),
    /// Find the starting cash that gives a target runway
    SeedCash(RunwayTargetArgs),
    /// Two-way sensitivity grid over budget inputs
    Sensitivity(SensitivityArgs),
    /// Compare named budget scenarios against the first
    Compare(CompareArgs),
    /// Print version information
    Version,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Csv,
    Minimal,
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    let result: Result<serde_json::Value, Box<dyn std::error::Error>> = match cli.command {
        Commands::Project(args) => commands::budget::run_project(args),
        Commands::FundSize(args) => commands::goal_seek::run_fund_size(args),
        Commands::SeedCash(args) => commands::goal_seek::run_seed_cash(args),
        Commands::Sensitivity(args) => commands::scenarios::run_sensitivity(args),
        Commands::Compare(args) => commands::scenarios::run_compare(args),
        Commands::Version => {
            println!("mgmtco {}", env!("CARGO_PKG_VERSION"));
            return;
        }
    };

    match result {
        Ok(value) => {
            output::format_output(&cli.output, &value);
            process::exit(0);
        }
        Err(e) => {
            eprintln!("{}: {}", "error".red().bold(), e);
            process::exit(1);
        }
    }
}
